use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Springs", inline)]
#[serde(default)]
/// Secondary-motion spring parameters.
pub struct SpringOptions {
    /// Stiffness `k` of a unit-strength impulse. Scaled by impulse strength.
    #[schemars(title = "Stiffness", range(min = 1.0, max = 400.0), extend("step" = 1.0))]
    pub base_stiffness: f32,
    /// Damping `c` for head joints.
    #[schemars(title = "Head Damping", range(min = 0.0, max = 60.0), extend("step" = 0.5))]
    pub head_damping: f32,
    /// Damping `c` for torso/body joints.
    #[schemars(title = "Body Damping", range(min = 0.0, max = 60.0), extend("step" = 0.5))]
    pub body_damping: f32,
    /// Damping `c` for hair joints (lightly oscillatory by default).
    #[schemars(title = "Hair Damping", range(min = 0.0, max = 60.0), extend("step" = 0.5))]
    pub hair_damping: f32,
    /// Damping `c` for accessories.
    #[schemars(title = "Accessory Damping", range(min = 0.0, max = 60.0), extend("step" = 0.5))]
    pub accessory_damping: f32,
    /// Lower and upper clamp applied to impulse strength.
    #[schemars(skip)]
    pub strength_range: [f32; 2],
    /// Magnitude cap on impulse velocity.
    #[schemars(skip)]
    pub max_impulse_speed: f32,
    /// Squared displacement below which a spring may settle.
    #[schemars(skip)]
    pub displacement_epsilon: f32,
    /// Squared velocity below which a spring may settle.
    #[schemars(skip)]
    pub velocity_epsilon: f32,
    /// Largest integration step; longer frames are sub-stepped.
    #[schemars(skip)]
    pub max_substep: f32,
}

impl Default for SpringOptions {
    fn default() -> Self {
        Self {
            base_stiffness: 60.0,
            head_damping: 12.0,
            body_damping: 15.5,
            hair_damping: 6.0,
            accessory_damping: 8.0,
            strength_range: [0.1, 4.0],
            max_impulse_speed: 10.0,
            displacement_epsilon: 1e-6,
            velocity_epsilon: 1e-6,
            max_substep: 1.0 / 120.0,
        }
    }
}

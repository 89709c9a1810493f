//! Static character content: per-state configuration and animation pools.
//!
//! A profile is authored once per avatar and loaded from TOML next to the
//! avatar's assets. Tuning knobs live in [`Options`](crate::options::Options)
//! instead.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::animation::{AnimationPool, WeightedAnimation};
use crate::behavior::{CharacterState, StateConfigs};
use crate::error::MotionError;

/// State configurations plus the pools they reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterProfile {
    /// Per-state configuration.
    #[serde(default)]
    pub states: StateConfigs,
    /// Every animation pool, referenced by name from `states`.
    #[serde(default)]
    pub pools: Vec<AnimationPool>,
}

impl Default for CharacterProfile {
    fn default() -> Self {
        let idle = AnimationPool::new("idle")
            .with_play_time(4.0, 8.0)
            .with_transition(0.8)
            .with_clip(WeightedAnimation::new("idle_breathe", 5.0))
            .with_clip(WeightedAnimation::new("idle_sway", 3.0))
            .with_clip(
                WeightedAnimation::new("idle_look_around", 1.0).with_cooldown(15.0),
            )
            .with_clip(
                WeightedAnimation::new("idle_stretch", 0.5)
                    .with_duration(3.0)
                    .with_cooldown(30.0),
            );
        let listening = AnimationPool::new("listening")
            .with_play_time(3.0, 6.0)
            .with_clip(WeightedAnimation::new("listen_attentive", 4.0))
            .with_clip(WeightedAnimation::new("listen_nod", 1.0).with_cooldown(6.0));
        let thinking = AnimationPool::new("thinking")
            .with_play_time(2.0, 4.0)
            .with_clip(WeightedAnimation::new("think_chin", 2.0))
            .with_clip(WeightedAnimation::new("think_look_up", 1.0));
        let speaking = AnimationPool::new("speaking")
            .with_play_time(2.0, 5.0)
            .with_transition(0.4)
            .with_clip(WeightedAnimation::new("talk_calm", 4.0))
            .with_clip(WeightedAnimation::new("talk_explain", 2.0))
            .with_clip(WeightedAnimation::new("talk_emphasis", 1.0).with_cooldown(8.0));
        Self {
            states: StateConfigs::default(),
            pools: vec![idle, listening, thinking, speaking],
        }
    }
}

impl CharacterProfile {
    /// Pool by name.
    #[must_use]
    pub fn pool(&self, name: &str) -> Option<&AnimationPool> {
        self.pools.iter().find(|p| p.name == name)
    }

    /// Check that every state's pool exists.
    pub fn validate(&self) -> Result<(), MotionError> {
        for state in CharacterState::ALL {
            let pool = &self.states.get(state).pool;
            if self.pool(pool).is_none() {
                return Err(MotionError::UnknownPool(pool.clone()));
            }
        }
        Ok(())
    }

    /// Parse a profile from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, MotionError> {
        toml::from_str(content)
            .map_err(|e| MotionError::OptionsParse(e.to_string()))
    }

    /// Load a profile from a TOML file.
    pub fn load(path: &Path) -> Result<Self, MotionError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Save the profile as pretty-printed TOML.
    pub fn save(&self, path: &Path) -> Result<(), MotionError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| MotionError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_is_valid() {
        let profile = CharacterProfile::default();
        profile.validate().unwrap();
        assert_eq!(profile.pools.len(), 4);
    }

    #[test]
    fn test_missing_pool_fails_validation() {
        let mut profile = CharacterProfile::default();
        profile.states.thinking.pool = "ponder".to_owned();
        let err = profile.validate().unwrap_err();
        assert!(matches!(err, MotionError::UnknownPool(name) if name == "ponder"));
    }

    #[test]
    fn test_profile_round_trips_through_file() {
        let path = std::env::temp_dir()
            .join(format!("marionette-profile-{}", std::process::id()))
            .join("avatar.toml");
        let profile = CharacterProfile::default();
        profile.save(&path).unwrap();
        let loaded = CharacterProfile::load(&path).unwrap();
        assert_eq!(loaded, profile);
        std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn test_partial_profile_uses_default_states() {
        let profile = CharacterProfile::from_toml(
            r#"
[[pools]]
name = "idle"

[[pools.clips]]
clip = "breathe"
weight = 1.0
"#,
        )
        .unwrap();
        assert_eq!(profile.states, StateConfigs::default());
        assert_eq!(profile.pools[0].clips[0].clip, "breathe");
        assert!(profile.validate().is_err());
    }
}

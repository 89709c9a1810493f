//! Centralized engine tuning options with TOML preset support.
//!
//! All tweakable timings and gains (behavior timeouts, scheduling, gestures,
//! springs, idle motion, expression easing, lip-sync) are consolidated here.
//! Options serialize to/from TOML so presets can live next to an avatar's
//! assets.

mod behavior;
mod expression;
mod idle;
mod scheduler;
mod spring;

use std::path::Path;

pub use behavior::BehaviorOptions;
pub use expression::{ExpressionOptions, LipSyncOptions};
pub use idle::IdleOptions;
pub use scheduler::{GestureOptions, SchedulerOptions};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
pub use spring::SpringOptions;

use crate::error::MotionError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[idle]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// State machine timeouts.
    pub behavior: BehaviorOptions,
    /// Background clip scheduling.
    pub scheduler: SchedulerOptions,
    /// Gesture overlay fades.
    pub gesture: GestureOptions,
    /// Secondary-motion springs.
    pub spring: SpringOptions,
    /// Blink, gaze, breathing and drag.
    pub idle: IdleOptions,
    /// Expression easing.
    pub expression: ExpressionOptions,
    /// Audio-driven mouth openness.
    pub lip_sync: LipSyncOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Parse options from TOML text. Missing fields use defaults.
    pub fn from_toml(content: &str) -> Result<Self, MotionError> {
        toml::from_str(content)
            .map_err(|e| MotionError::OptionsParse(e.to_string()))
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, MotionError> {
        let content = std::fs::read_to_string(path).map_err(MotionError::Io)?;
        Self::from_toml(&content)
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), MotionError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| MotionError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(MotionError::Io)?;
        }
        std::fs::write(path, content).map_err(MotionError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let toml_str = r"
[idle]
blink_duration = 0.2
";
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.idle.blink_duration, 0.2);
        // Everything else should be default
        assert_eq!(opts.idle.blink_interval, [2.0, 6.0]);
        assert_eq!(opts.lip_sync.gain, 45.0);
        assert_eq!(opts.scheduler.repeat_retries, 3);
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let err = Options::from_toml("[idle\nblink = ").unwrap_err();
        assert!(matches!(err, MotionError::OptionsParse(_)));
    }

    #[test]
    fn test_save_load_and_list_presets() {
        let dir = std::env::temp_dir()
            .join(format!("marionette-presets-{}", std::process::id()));
        let mut opts = Options::default();
        opts.behavior.thinking_min_dwell = 4.5;
        opts.save(&dir.join("calm.toml")).unwrap();

        let loaded = Options::load(&dir.join("calm.toml")).unwrap();
        assert_eq!(loaded.behavior.thinking_min_dwell, 4.5);
        assert_eq!(Options::list_presets(&dir), vec!["calm".to_owned()]);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        for section in [
            "behavior",
            "scheduler",
            "gesture",
            "spring",
            "idle",
            "expression",
            "lip_sync",
        ] {
            assert!(props.contains_key(section), "missing {section}");
        }

        // Skipped fields stay out of the UI schema
        let idle = &props["idle"]["properties"];
        assert!(idle.get("blink_duration").is_some());
        assert!(idle.get("blink_interval").is_none());
        let lip_sync = &props["lip_sync"]["properties"];
        assert!(lip_sync.get("mouth_parameter").is_none());
    }
}

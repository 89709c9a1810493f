//! Crate-level error types.

use std::fmt;

/// Errors produced by the marionette crate.
///
/// None of these cross the [`update`](crate::engine::MotionEngine::update)
/// boundary: the engine logs them and no-ops the offending operation.
#[derive(Debug)]
pub enum MotionError {
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options or profile parsing/serialization failure.
    OptionsParse(String),
    /// The rig has no animation clip with this name.
    MissingClip(String),
    /// The rig has no joint with this name.
    MissingJoint(String),
    /// The rig has no expression/parameter with this name.
    MissingParameter(String),
    /// No animation pool is registered under this name.
    UnknownPool(String),
    /// The behavior rule table cannot resolve every state.
    RuleTable(String),
    /// A non-finite value was produced for the named quantity.
    InvalidNumber(&'static str),
}

impl fmt::Display for MotionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::MissingClip(name) => write!(f, "no clip named '{name}'"),
            Self::MissingJoint(name) => write!(f, "no joint named '{name}'"),
            Self::MissingParameter(name) => {
                write!(f, "no expression parameter named '{name}'")
            }
            Self::UnknownPool(name) => {
                write!(f, "no animation pool named '{name}'")
            }
            Self::RuleTable(msg) => write!(f, "rule table error: {msg}"),
            Self::InvalidNumber(what) => {
                write!(f, "non-finite value for {what}")
            }
        }
    }
}

impl std::error::Error for MotionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for MotionError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn test_display_names_the_resource() {
        let err = MotionError::MissingClip("wave".to_owned());
        assert_eq!(err.to_string(), "no clip named 'wave'");

        let err = MotionError::UnknownPool("dance".to_owned());
        assert!(err.to_string().contains("dance"));
    }

    #[test]
    fn test_io_error_has_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = MotionError::from(io);
        assert!(err.source().is_some());
        assert!(MotionError::InvalidNumber("spring").source().is_none());
    }
}

//! Parameter path derivation.

use std::fmt;

use crate::error::{ConfigError, ConfigResult};

/// The parameter store prefix `/{stage}/{app}` this deployment reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPath {
    stage: String,
    app: String,
}

impl ConfigPath {
    /// Build a path from the deployment stage (e.g. `dev`) and the
    /// application segment (e.g. `digitized_av_trigger`).
    ///
    /// Surrounding slashes on either part are ignored.
    pub fn new(stage: &str, app: &str) -> ConfigResult<Self> {
        let stage = stage.trim_matches('/');
        let app = app.trim_matches('/');
        if stage.is_empty() || app.is_empty() {
            return Err(ConfigError::InvalidPath(format!("/{stage}/{app}")));
        }
        Ok(Self {
            stage: stage.to_string(),
            app: app.to_string(),
        })
    }

    pub fn as_path(&self) -> String {
        format!("/{}/{}", self.stage, self.app)
    }
}

impl fmt::Display for ConfigPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.stage, self.app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_stage_app_path() {
        let path = ConfigPath::new("dev", "digitized_av_trigger").unwrap();
        assert_eq!(path.as_path(), "/dev/digitized_av_trigger");
        assert_eq!(path.to_string(), "/dev/digitized_av_trigger");
    }

    #[test]
    fn strips_surrounding_slashes() {
        let path = ConfigPath::new("/prod/", "/digitized_av_trigger/").unwrap();
        assert_eq!(path.as_path(), "/prod/digitized_av_trigger");
    }

    #[test]
    fn rejects_empty_segments() {
        assert!(matches!(ConfigPath::new("", "app"), Err(ConfigError::InvalidPath(_))));
        assert!(matches!(ConfigPath::new("dev", "/"), Err(ConfigError::InvalidPath(_))));
    }
}

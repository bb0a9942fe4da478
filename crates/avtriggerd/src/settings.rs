//! Process settings, from flags or the Lambda environment.

use avtrigger_config::{ConfigPath, ConfigResult};
use clap::Args;

#[derive(Args, Debug, Clone)]
pub struct Settings {
    /// Deployment stage; first segment of the parameter path.
    #[arg(long, env = "ENV", global = true)]
    pub stage: Option<String>,

    /// Application segment of the parameter path.
    #[arg(long, env = "APP_CONFIG_PATH", global = true)]
    pub app_config_path: Option<String>,

    /// Region for the parameter store and cluster clients.
    #[arg(long, env = "AWS_DEFAULT_REGION", default_value = "us-east-1", global = true)]
    pub region: String,
}

impl Settings {
    /// `/{stage}/{app}`; fails if either part is unset.
    pub fn config_path(&self) -> ConfigResult<ConfigPath> {
        ConfigPath::new(
            self.stage.as_deref().unwrap_or_default(),
            self.app_config_path.as_deref().unwrap_or_default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(stage: Option<&str>, app: Option<&str>) -> Settings {
        Settings {
            stage: stage.map(str::to_string),
            app_config_path: app.map(str::to_string),
            region: "us-east-1".to_string(),
        }
    }

    #[test]
    fn config_path_from_stage_and_app() {
        let path = settings(Some("prod"), Some("digitized_av_trigger")).config_path().unwrap();
        assert_eq!(path.as_path(), "/prod/digitized_av_trigger");
    }

    #[test]
    fn config_path_requires_both_parts() {
        assert!(settings(None, Some("digitized_av_trigger")).config_path().is_err());
        assert!(settings(Some("dev"), None).config_path().is_err());
    }
}

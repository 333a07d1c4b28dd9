use crate::config::toml_config::AppConfig;
use crate::utils::error::Result;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "survival-predictor")]
#[command(about = "Titanic survival prediction server with optional generated explanations")]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override [server].listen_addr
    #[arg(long)]
    pub listen_addr: Option<String>,

    /// Override [model].path
    #[arg(long)]
    pub model_path: Option<String>,

    /// Turn off explanation requests regardless of configuration
    #[arg(long)]
    pub no_explanations: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl CliArgs {
    /// Load the configuration file (or environment defaults) and apply
    /// command line overrides on top.
    pub fn load_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::from_env(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(addr) = &self.listen_addr {
            config.server.listen_addr = addr.clone();
        }
        if let Some(path) = &self.model_path {
            config.model.path = path.clone();
        }
        if self.no_explanations {
            config.explanation.enabled = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_file_values() {
        let args = CliArgs::parse_from([
            "survival-predictor",
            "--listen-addr",
            "0.0.0.0:9000",
            "--model-path",
            "other.json",
            "--no-explanations",
        ]);
        let mut config = AppConfig::default();
        config.explanation.api_key = Some("sk-abc".to_string());

        args.apply_overrides(&mut config);

        assert_eq!(config.server.listen_addr, "0.0.0.0:9000");
        assert_eq!(config.model.path, "other.json");
        assert!(!config.explanation.is_active());
    }

    #[test]
    fn test_no_flags_keep_config() {
        let args = CliArgs::parse_from(["survival-predictor"]);
        let mut config = AppConfig::default();

        args.apply_overrides(&mut config);

        assert_eq!(config.server.listen_addr, "127.0.0.1:5000");
        assert!(config.explanation.enabled);
        assert!(!args.verbose);
    }
}

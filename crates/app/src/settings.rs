///! Handles settings for the migration runner. Configuration is written in
///! a TOML file; every field can also be supplied on the command line or
///! through the environment, which take precedence.
use config::{Config, ConfigError, File};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    pub source_url: Option<String>,
    pub target_url: Option<String>,
    pub batch_size: Option<usize>,
    pub level: Option<String>,
    pub log_path: Option<String>,
    pub ddl_script: Option<String>,
}

impl Settings {
    /// Loads the settings file; a missing file yields empty settings.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .build()?;

        settings.try_deserialize()
    }
}

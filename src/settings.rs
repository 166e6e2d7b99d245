use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Runtime configuration, read from an optional `trivia.toml` and then from
/// `TRIVIA_*` environment variables (a `.env` file is honoured).
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::load_from("trivia")
    }

    pub fn load_from(config_path: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("db_path", "trivia.db")?
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8080)?
            .set_default("log_level", "info")?
            .add_source(File::with_name(config_path).required(false))
            .add_source(Environment::with_prefix("TRIVIA"))
            .build()?
            .try_deserialize()
    }

    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trivia.toml");
        std::fs::write(&path, "port = 5000\ndb_path = \"/tmp/quiz.db\"\n").unwrap();

        let settings = Settings::load_from(path.with_extension("").to_str().unwrap()).unwrap();
        assert_eq!(settings.port, 5000);
        assert_eq!(settings.db_path, PathBuf::from("/tmp/quiz.db"));
        assert_eq!(settings.host, "0.0.0.0");
        assert_eq!(settings.socket_addr(), "0.0.0.0:5000");
    }
}

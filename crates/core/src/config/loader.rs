use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

const ENV_PREFIX: &str = "RESTORRENT_";

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    extract(
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(env_provider(ENV_PREFIX)),
    )
}

/// Load configuration from defaults and environment variables only
pub fn load_config_from_env() -> Result<Config, ConfigError> {
    extract(
        Figment::from(Serialized::defaults(Config::default())).merge(env_provider(ENV_PREFIX)),
    )
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Nested keys use a double underscore: `RESTORRENT_TRACKER__TIMEOUT_SECS`.
fn env_provider(prefix: &str) -> Env {
    Env::prefixed(prefix).split("__")
}

fn extract(figment: Figment) -> Result<Config, ConfigError> {
    figment
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[tracker]
username = "alice"

[restore]
batch_mode = true
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.tracker.username, "alice");
        assert!(config.restore.batch_mode);
    }

    #[test]
    fn test_load_config_from_str_invalid_type() {
        let toml = r#"
[restore]
batch_mode = "sometimes"
"#;
        let result = load_config_from_str(toml);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/restorrent.toml"));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[tracker]
url = "https://tracker.example"

[transmission]
url = "http://127.0.0.1:9091/transmission/rpc"
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.tracker.url, "https://tracker.example");
        assert_eq!(
            config.transmission.url,
            "http://127.0.0.1:9091/transmission/rpc"
        );
        assert_eq!(config.restore.marker, ".nfo");
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[tracker]
timeout_secs = 10
"#
        )
        .unwrap();

        // A prefix of its own keeps this test independent of the real environment.
        std::env::set_var("RESTORRENT_LOADER_TEST_TRACKER__TIMEOUT_SECS", "45");
        std::env::set_var("RESTORRENT_LOADER_TEST_RESTORE__MARKER", ".sfv");

        let config: Config = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(temp_file.path()))
            .merge(env_provider("RESTORRENT_LOADER_TEST_"))
            .extract()
            .unwrap();

        assert_eq!(config.tracker.timeout_secs, 45);
        assert_eq!(config.restore.marker, ".sfv");
        assert_eq!(config.tracker.url, "https://ncore.cc");
    }
}

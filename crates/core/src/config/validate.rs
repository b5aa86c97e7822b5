use url::Url;

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Tracker and Transmission URLs are absolute http(s) URLs
/// - Tracker timeout is not 0
/// - Transmission user and password are set together or not at all
/// - Candidate marker is not empty
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    validate_http_url("tracker.url", &config.tracker.url)?;
    validate_http_url("transmission.url", &config.transmission.url)?;

    if config.tracker.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "tracker.timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.transmission.username.is_some() != config.transmission.password.is_some() {
        return Err(ConfigError::ValidationError(
            "transmission.username and transmission.password must be set together".to_string(),
        ));
    }

    if config.restore.marker.is_empty() {
        return Err(ConfigError::ValidationError(
            "restore.marker cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::ValidationError(format!("{} is not a valid URL: {}", field, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::ValidationError(format!(
            "{} must use http or https, got {}",
            field, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_bad_tracker_url_fails() {
        let mut config = Config::default();
        config.tracker.url = "not a url".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        assert!(err.to_string().contains("tracker.url"));
    }

    #[test]
    fn test_validate_non_http_scheme_fails() {
        let mut config = Config::default();
        config.transmission.url = "ftp://nas/transmission/rpc".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("transmission.url"));
    }

    #[test]
    fn test_validate_zero_timeout_fails() {
        let mut config = Config::default();
        config.tracker.timeout_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_empty_marker_fails() {
        let mut config = Config::default();
        config.restore.marker = String::new();
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_transmission_credentials_set_together() {
        let mut config = Config::default();
        config.transmission.username = Some("admin".to_string());
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("transmission.password"));

        config.transmission.password = Some("secret".to_string());
        assert!(validate_config(&config).is_ok());

        config.transmission.username = None;
        assert!(validate_config(&config).is_err());
    }
}

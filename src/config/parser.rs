use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[crawler]
concurrency = 8
request-delay-ms = 500
deadline-secs = 600

[user-agent]
crawler-name = "TestCrawler"
crawler-version = "1.0"
contact-url = "https://example.com/about"
contact-email = "admin@example.com"

[fetcher]
timeout-secs = 5

[table]
fallback-encoding = "windows-1252"
not-found-marker = "-"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.concurrency, 8);
        assert_eq!(config.crawler.request_delay_ms, 500);
        assert_eq!(config.crawler.deadline_secs, 600);
        assert_eq!(config.crawler.progress_interval_secs, 5);
        assert_eq!(config.user_agent.crawler_name, "TestCrawler");
        assert_eq!(config.fetcher.timeout_secs, 5);
        assert_eq!(config.fetcher.max_redirects, 10);
        assert_eq!(config.table.fallback_encoding, "windows-1252");
        assert_eq!(config.table.not_found_marker, "-");
        assert_eq!(config.table.output_suffix, "_updated");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();

        assert_eq!(config.crawler.concurrency, 5);
        assert_eq!(config.crawler.request_delay_ms, 200);
        assert_eq!(config.fetcher.timeout_secs, 15);
        assert_eq!(config.table.fallback_encoding, "EUC-KR");
        assert_eq!(config.table.not_found_marker, "X");
        assert!(config
            .extractor
            .denied_extensions
            .contains(&".png".to_string()));
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/enricher.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[crawler]
concurrency = 0
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }
}

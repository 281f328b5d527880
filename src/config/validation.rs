use crate::config::types::{
    Config, CrawlerConfig, ExtractorConfig, FetcherConfig, TableConfig, UserAgentConfig,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_extractor_config(&config.extractor)?;
    validate_table_config(&config.table)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.concurrency < 1 || config.concurrency > 100 {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and 100, got {}",
            config.concurrency
        )));
    }

    if config.request_delay_ms > 60_000 {
        return Err(ConfigError::Validation(format!(
            "request_delay_ms must be <= 60000ms, got {}ms",
            config.request_delay_ms
        )));
    }

    if config.deadline_secs < 1 {
        return Err(ConfigError::Validation(
            "deadline_secs must be >= 1".to_string(),
        ));
    }

    if config.progress_interval_secs < 1 {
        return Err(ConfigError::Validation(
            "progress_interval_secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    if let Some(contact_url) = &config.contact_url {
        Url::parse(contact_url)
            .map_err(|e| ConfigError::Validation(format!("Invalid contact_url: {}", e)))?;
    }

    if let Some(contact_email) = &config.contact_email {
        validate_email(contact_email)?;
    }

    Ok(())
}

/// Validates fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.max_redirects > 50 {
        return Err(ConfigError::Validation(format!(
            "max_redirects must be <= 50, got {}",
            config.max_redirects
        )));
    }

    Ok(())
}

/// Validates the extension denylist
fn validate_extractor_config(config: &ExtractorConfig) -> Result<(), ConfigError> {
    for ext in &config.denied_extensions {
        if !ext.starts_with('.') || ext.len() < 2 {
            return Err(ConfigError::Validation(format!(
                "denied extension '{}' must look like '.ext'",
                ext
            )));
        }
    }

    Ok(())
}

/// Validates header synonyms, encoding and output settings
fn validate_table_config(config: &TableConfig) -> Result<(), ConfigError> {
    for (role, synonyms) in [
        ("company_headers", &config.company_headers),
        ("website_headers", &config.website_headers),
        ("email_headers", &config.email_headers),
    ] {
        if synonyms.is_empty() || synonyms.iter().any(|s| s.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "{} must contain at least one non-empty entry",
                role
            )));
        }
    }

    if encoding_rs::Encoding::for_label(config.fallback_encoding.trim().as_bytes()).is_none() {
        return Err(ConfigError::InvalidEncoding(
            config.fallback_encoding.clone(),
        ));
    }

    if config.output_suffix.is_empty() {
        return Err(ConfigError::Validation(
            "output_suffix cannot be empty".to_string(),
        ));
    }

    if config.not_found_marker.is_empty() {
        return Err(ConfigError::Validation(
            "not_found_marker cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Basic contact email check
fn validate_email(email: &str) -> Result<(), ConfigError> {
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || !parts[1].contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    Ok(())
}

use crate::config::types::{Config, CrawlerConfig, OcrConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
///
/// Called once the file values and command-line overrides have been merged.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_ocr_config(&config.ocr)?;
    Ok(())
}

/// Validates only what the OCR subcommand uses (no seeds or year window)
pub fn validate_ocr_settings(config: &Config) -> Result<(), ConfigError> {
    validate_user_agent_config(&config.user_agent)?;
    validate_ocr_config(&config.ocr)
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.start_urls.is_empty() {
        return Err(ConfigError::Validation(
            "at least one start URL is required".to_string(),
        ));
    }

    for seed in &config.start_urls {
        validate_seed(seed)?;
    }

    if config.out_dir.is_empty() {
        return Err(ConfigError::Validation("out_dir cannot be empty".to_string()));
    }

    if config.from_year > config.to_year {
        return Err(ConfigError::Validation(format!(
            "from_year ({}) must not be after to_year ({})",
            config.from_year, config.to_year
        )));
    }

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.page_timeout_secs == 0 || config.pdf_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeouts must be at least one second".to_string(),
        ));
    }

    Ok(())
}

/// Validates one seed URL: parseable, http(s), with a host
fn validate_seed(seed: &str) -> Result<(), ConfigError> {
    let url = Url::parse(seed)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid start URL '{}': {}", seed, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "Start URL '{}' must use HTTP or HTTPS",
            seed
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "Start URL '{}' has no host",
            seed
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
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

    Ok(())
}

fn validate_ocr_config(config: &OcrConfig) -> Result<(), ConfigError> {
    Url::parse(&config.api_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid OCR api_url: {}", e)))?;

    if config.max_retries < 1 {
        return Err(ConfigError::Validation(
            "ocr max_retries must be >= 1".to_string(),
        ));
    }

    if !config.backoff_secs.is_finite() || config.backoff_secs < 0.0 {
        return Err(ConfigError::Validation(format!(
            "ocr backoff_secs must be a non-negative number, got {}",
            config.backoff_secs
        )));
    }

    Ok(())
}

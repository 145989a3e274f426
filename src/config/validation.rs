use crate::config::types::{
    Config, CrawlerConfig, FilterConfig, OutputConfig, SiteConfig, UserAgentConfig,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_filter_config(&config.filter)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Parses a site origin, which must be a bare scheme and host (and port)
///
/// Links are resolved against the origin's root, so an origin carrying a
/// path, query or fragment is rejected.
pub fn parse_origin(origin: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(origin)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid origin '{}': {}", origin, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Origin '{}' must use http or https",
            origin
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "Origin '{}' has no host",
            origin
        )));
    }

    if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
        return Err(ConfigError::InvalidUrl(format!(
            "Origin '{}' must not carry a path, query or fragment",
            origin
        )));
    }

    Ok(url)
}

/// Validates the site origin and seed
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    parse_origin(&config.origin)?;

    if config.seed.trim().is_empty() {
        return Err(ConfigError::Validation("seed cannot be empty".to_string()));
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_links < 1 {
        return Err(ConfigError::Validation(format!(
            "max_links must be >= 1, got {}",
            config.max_links
        )));
    }

    if config.concurrent_fetches < 1 || config.concurrent_fetches > 256 {
        return Err(ConfigError::Validation(format!(
            "concurrent_fetches must be between 1 and 256, got {}",
            config.concurrent_fetches
        )));
    }

    if config.queue_capacity < 1 {
        return Err(ConfigError::Validation(format!(
            "queue_capacity must be >= 1, got {}",
            config.queue_capacity
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
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

/// Validates link filter configuration
fn validate_filter_config(config: &FilterConfig) -> Result<(), ConfigError> {
    if config.include_prefixes.is_empty() {
        return Err(ConfigError::Validation(
            "include_prefixes must name at least one namespace".to_string(),
        ));
    }

    if let Some(prefix) = config.include_prefixes.iter().find(|p| !p.starts_with('/')) {
        return Err(ConfigError::Validation(format!(
            "include prefix '{}' must start with '/'",
            prefix
        )));
    }

    if config.excluded_facets.iter().any(|f| f.is_empty()) {
        return Err(ConfigError::Validation(
            "excluded_facets cannot contain an empty marker".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

use crate::config::types::{
    Config, CrawlerConfig, ExtractConfig, FilterSection, OutputConfig, UserAgentConfig,
};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_filter_section(&config.filter)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    validate_extract_config(&config.extract)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.workers < 1 || config.workers > 256 {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and 256, got {}",
            config.workers
        )));
    }

    if config.limit < 1 {
        return Err(ConfigError::Validation(format!(
            "limit must be >= 1, got {}",
            config.limit
        )));
    }

    if config.fetch_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "fetch_timeout_secs must be >= 1, got {}",
            config.fetch_timeout_secs
        )));
    }

    Ok(())
}

/// Validates the link admission rules
fn validate_filter_section(section: &FilterSection) -> Result<(), ConfigError> {
    if let Some(schemes) = &section.allowed_schemes {
        for scheme in schemes {
            validate_scheme(scheme)?;
        }
    }

    if let Some(filetypes) = &section.allowed_filetypes {
        for filetype in filetypes {
            if !filetype.is_empty() && !filetype.starts_with('.') {
                return Err(ConfigError::Validation(format!(
                    "allowed filetype '{}' must be empty or start with '.'",
                    filetype
                )));
            }
        }
    }

    if let Some(denylist) = &section.denylist {
        if denylist.iter().any(|pattern| pattern.is_empty()) {
            return Err(ConfigError::Validation(
                "denylist entries cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}

/// A scheme is lowercase ASCII letters, digits, '+', '-' or '.', starting with a letter
fn validate_scheme(scheme: &str) -> Result<(), ConfigError> {
    let valid = scheme
        .chars()
        .next()
        .map_or(false, |c| c.is_ascii_lowercase())
        && scheme
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || "+-.".contains(c));

    if !valid {
        return Err(ConfigError::Validation(format!(
            "Invalid URL scheme in allowed-schemes: '{}'",
            scheme
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.name.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent name cannot be empty".to_string(),
        ));
    }

    if !config
        .name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "user-agent name must contain only alphanumeric characters, hyphens and underscores, got '{}'",
            config.name
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates extraction configuration
fn validate_extract_config(config: &ExtractConfig) -> Result<(), ConfigError> {
    if config.workers < 1 {
        return Err(ConfigError::Validation(format!(
            "extract workers must be >= 1, got {}",
            config.workers
        )));
    }

    if config.output_directory.is_empty() {
        return Err(ConfigError::Validation(
            "extract output-directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

//! `${VAR}` expansion for values read from `fxchangelog.toml`.
//!
//! Credentials and the base URL are expanded verbatim. Page IDs are also
//! trimmed, since IDs exported from shell scripts often carry a newline.

use crate::{ConfigError, ConfluenceConfig, MonitorConfig};

/// Expand the credentials and base URL of the `[confluence]` section.
pub(crate) fn expand_confluence(confluence: &mut ConfluenceConfig) -> Result<(), ConfigError> {
    expand_field(&mut confluence.base_url, "confluence.base_url")?;
    expand_field(&mut confluence.email, "confluence.email")?;
    expand_field(&mut confluence.api_token, "confluence.api_token")
}

/// Expand the page IDs of the `[monitor]` section.
pub(crate) fn expand_monitor(monitor: &mut MonitorConfig) -> Result<(), ConfigError> {
    expand_page_id(&mut monitor.include, "monitor.include")?;
    expand_page_id(&mut monitor.log_page, "monitor.log_page")?;
    if let Some(exclude) = monitor.exclude.as_mut() {
        expand_page_id(exclude, "monitor.exclude")?;
    }
    Ok(())
}

fn expand_field(value: &mut String, field: &str) -> Result<(), ConfigError> {
    if let Some(expanded) = expand_env(value, field)? {
        *value = expanded;
    }
    Ok(())
}

fn expand_page_id(value: &mut String, field: &str) -> Result<(), ConfigError> {
    expand_field(value, field)?;
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_owned();
    }
    Ok(())
}

/// Expand `${VAR}` and `${VAR:-default}` references.
///
/// Returns `None` when `value` has no references. Bare `$VAR` is left
/// alone, so API tokens containing `$` survive.
fn expand_env(value: &str, field: &str) -> Result<Option<String>, ConfigError> {
    if !value.contains("${") {
        return Ok(None);
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, UnsetVar> {
        std::env::var(var)
            .map(Some)
            .map_err(|_| UnsetVar(var.to_owned()))
    })
    .map(|expanded| Some(expanded.into_owned()))
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.0),
    })
}

/// Variable referenced without a default but missing from the environment.
struct UnsetVar(String);

use anyhow::Result;
use regex::Regex;
use std::env;
use tracing::{debug, warn};

const ENV_VAR_PATTERN: &str = r"\$\{(\w+)(?::-([^}]*))?\}|\$(\w+)";

/// Substitute environment variables in the format ${VAR_NAME}, $VAR_NAME or
/// ${VAR_NAME:-default}. The default applies when the variable is unset or empty.
pub fn substitute_env_vars(content: &str) -> Result<String> {
    let re = Regex::new(ENV_VAR_PATTERN)?;
    let mut missing_vars = Vec::new();

    let result = re.replace_all(content, |caps: &regex::Captures| {
        let placeholder = &caps[0];
        let var_name = caps
            .get(1)
            .or_else(|| caps.get(3))
            .map(|m| m.as_str())
            .unwrap_or_default();
        let default = caps.get(2).map(|m| m.as_str());

        match (env::var(var_name), default) {
            (Ok(value), Some(default)) if value.is_empty() => {
                debug!("Environment variable '{}' empty; using default \"{}\"", var_name, default);
                default.to_string()
            }
            (Ok(value), _) => {
                debug!("Substituting environment variable: {} = \"{}\"", var_name, value);
                value
            }
            (Err(_), Some(default)) => {
                debug!("Environment variable '{}' not set; using default \"{}\"", var_name, default);
                default.to_string()
            }
            (Err(_), None) => {
                warn!("Environment variable '{}' not set", var_name);
                missing_vars.push(var_name.to_string());
                // Unresolved placeholders surface later as parse or validation errors
                placeholder.to_string()
            }
        }
    });

    if !missing_vars.is_empty() {
        debug!(
            "Environment variables not set (may use defaults or fail validation): {:?}",
            missing_vars
        );
    }

    Ok(result.into_owned())
}

/// Check if a string contains unresolved environment variable placeholders
pub fn has_unresolved_env_vars(content: &str) -> bool {
    Regex::new(ENV_VAR_PATTERN)
        .map(|re| re.is_match(content))
        .unwrap_or(false)
}

//! Environment variable substitution in config files

use anyhow::Result;
use regex::Regex;
use std::env;
use tracing::{debug, warn};

/// Substitute environment variables in the format ${VAR_NAME}
///
/// Unset variables keep their placeholder; the validator or YAML parser
/// will reject the config later if the value mattered.
pub fn substitute_env_vars(content: &str) -> Result<String> {
    let re = Regex::new(r"\$\{(\w+)\}").expect("static regex");
    let mut result = content.to_string();

    for caps in re.captures_iter(content) {
        let var_name = caps.get(1).expect("capture group").as_str();
        let placeholder = caps.get(0).expect("whole match").as_str();

        match env::var(var_name) {
            Ok(value) => {
                debug!("Substituting environment variable: {}", var_name);
                result = result.replace(placeholder, &value);
            }
            Err(_) => {
                warn!("Environment variable '{}' not set", var_name);
            }
        }
    }

    Ok(result)
}

/// Check if a string contains unresolved environment variable placeholders
pub fn has_unresolved_env_vars(content: &str) -> bool {
    let re = Regex::new(r"\$\{(\w+)\}").expect("static regex");
    re.is_match(content)
}

// ============================================================================
// Tests
// ============================================================================

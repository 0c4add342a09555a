//! Environment variable expansion for configuration strings.
//!
//! Supports:
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Values without a `${` reference are returned unchanged, so plain paths
//! containing `$` survive.

use crate::ConfigError;

/// Expand `${VAR}` references in `value`.
///
/// `field` names the configuration key for error messages.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| match std::env::var(var) {
        Ok(val) => Ok(Some(val)),
        Err(_) => Err(UnsetVar(var.to_owned())),
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{0}}} not set", e.cause.0),
    })
}

/// Variable referenced without a default and not set.
struct UnsetVar(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("STENCIL_TEST_SITE_ROOT", "/srv/site");
        }
        let result = expand_env("${STENCIL_TEST_SITE_ROOT}/source", "site.source_dir").unwrap();
        assert_eq!(result, "/srv/site/source");
        unsafe {
            std::env::remove_var("STENCIL_TEST_SITE_ROOT");
        }
    }

    #[test]
    fn test_expand_default() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("STENCIL_TEST_UNSET_EXT");
        }
        let result = expand_env("${STENCIL_TEST_UNSET_EXT:-rst}", "site.content_extension").unwrap();
        assert_eq!(result, "rst");
    }

    #[test]
    fn test_expand_missing_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("STENCIL_TEST_MISSING");
        }
        let err = expand_env("${STENCIL_TEST_MISSING}", "site.output_dir").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("STENCIL_TEST_MISSING"));
        assert!(err.to_string().contains("site.output_dir"));
    }

    #[test]
    fn test_literal_unchanged() {
        assert_eq!(expand_env("output", "site.output_dir").unwrap(), "output");
    }

    #[test]
    fn test_bare_dollar_not_expanded() {
        assert_eq!(expand_env("out/$name", "site.output_dir").unwrap(), "out/$name");
    }
}

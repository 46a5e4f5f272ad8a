//! Resolver options.
//!
//! Options can be built in code, read from prefixed environment variables,
//! or (with the `config` feature) deserialized from JSON.

use std::env;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::error::{ResolverError, ResolverResult};

/// Default environment variable prefix.
pub const ENV_PREFIX: &str = "FERROUS_RESOLVER";

/// Options applied by [`DependencyResolverBuilder`](crate::DependencyResolverBuilder).
///
/// # Examples
///
/// ```
/// use ferrous_resolver::ResolverOptions;
///
/// let options = ResolverOptions::default()
///     .with_logging(true)
///     .with_log_prefix("[app]");
///
/// assert!(options.logging);
/// assert!(options.catch_panics);
/// assert_eq!(options.log_prefix, "[app]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ResolverOptions {
    /// Attach a [`LoggingObserver`](crate::LoggingObserver)
    pub logging: bool,
    /// Prefix used by the logging observer
    pub log_prefix: String,
    /// Contain panics raised by single-instance delegate functions.
    ///
    /// When false, such panics unwind to the caller, which is handy when
    /// debugging a misbehaving container bridge.
    pub catch_panics: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            logging: false,
            log_prefix: "[ferrous-resolver]".to_string(),
            catch_panics: true,
        }
    }
}

impl ResolverOptions {
    pub fn with_logging(mut self, logging: bool) -> Self {
        self.logging = logging;
        self
    }

    pub fn with_log_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.log_prefix = prefix.into();
        self
    }

    pub fn with_catch_panics(mut self, catch_panics: bool) -> Self {
        self.catch_panics = catch_panics;
        self
    }

    /// Reads options from `FERROUS_RESOLVER_*` environment variables.
    ///
    /// Recognized keys are `LOGGING`, `LOG_PREFIX` and `CATCH_PANICS`.
    /// Unset variables keep their default value.
    pub fn from_env() -> ResolverResult<Self> {
        Self::from_env_with_prefix(ENV_PREFIX)
    }

    /// Reads options from environment variables with a custom prefix.
    pub fn from_env_with_prefix(prefix: &str) -> ResolverResult<Self> {
        let prefix = prefix.to_uppercase();
        Self::from_lookup(|key| env::var(format!("{}_{}", prefix, key)).ok())
    }

    /// Reads options through an arbitrary key lookup.
    ///
    /// Keys are passed upper-case and unprefixed (e.g. `"LOGGING"`).
    pub fn from_lookup<F>(lookup: F) -> ResolverResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = Self::default();

        if let Some(value) = lookup("LOGGING") {
            options.logging = parse_bool("LOGGING", &value)?;
        }
        if let Some(value) = lookup("LOG_PREFIX") {
            options.log_prefix = value;
        }
        if let Some(value) = lookup("CATCH_PANICS") {
            options.catch_panics = parse_bool("CATCH_PANICS", &value)?;
        }

        Ok(options)
    }

    /// Parses options from a JSON document. Missing fields keep their default.
    #[cfg(feature = "config")]
    pub fn from_json(json: &str) -> ResolverResult<Self> {
        serde_json::from_str(json).map_err(|e| ResolverError::InvalidOption {
            key: "json".to_string(),
            value: e.to_string(),
        })
    }
}

fn parse_bool(key: &str, value: &str) -> ResolverResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ResolverError::InvalidOption {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let options = ResolverOptions::from_lookup(|_| None).unwrap();
        assert_eq!(options, ResolverOptions::default());
    }

    #[test]
    fn test_lookup_overrides() {
        let options = ResolverOptions::from_lookup(lookup_from(&[
            ("LOGGING", "yes"),
            ("LOG_PREFIX", "[svc]"),
            ("CATCH_PANICS", "0"),
        ]))
        .unwrap();

        assert!(options.logging);
        assert_eq!(options.log_prefix, "[svc]");
        assert!(!options.catch_panics);
    }

    #[test]
    fn test_invalid_bool_rejected() {
        let err = ResolverOptions::from_lookup(lookup_from(&[("LOGGING", "maybe")])).unwrap_err();
        match err {
            ResolverError::InvalidOption { key, value } => {
                assert_eq!(key, "LOGGING");
                assert_eq!(value, "maybe");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    #[serial_test::serial]
    fn test_env_prefix() {
        env::set_var("FR_UNIT_TEST_LOGGING", "true");
        let options = ResolverOptions::from_env_with_prefix("fr_unit_test").unwrap();
        env::remove_var("FR_UNIT_TEST_LOGGING");
        assert!(options.logging);
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_from_json_partial() {
        let options = ResolverOptions::from_json(r#"{ "logging": true }"#).unwrap();
        assert!(options.logging);
        assert!(options.catch_panics);
    }
}

//! Routing configuration resolved from the process environment.
//!
//! The configuration is built once at startup and handed to
//! [`crate::RoutingService`]; nothing in the pipeline reads the environment
//! on its own.
//!
//! # Environment Variables
//!
//! - `ORS_API_KEY`: provider credential (required)
//! - `ORS_BASE_URL`: directions endpoint root (default: [`DEFAULT_BASE_URL`])
//! - `ORS_TIMEOUT_SECS`: outbound request timeout (default: 30)
//! - `ORS_WHEELCHAIR_MAX_GRADIENT`: default wheelchair incline restriction
//! - `ORS_WHEELCHAIR_MAX_SLOPED_KERB`: default wheelchair kerb restriction
//! - `ORS_WHEELCHAIR_AVOID_STEPS`: default for avoiding steps

use std::time::Duration;

use crate::error::{Error, Result};

/// Directions endpoint used when `ORS_BASE_URL` is unset.
pub const DEFAULT_BASE_URL: &str = "https://api.openrouteservice.org/v2/directions";

/// Outbound timeout used when `ORS_TIMEOUT_SECS` is unset or invalid.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const API_KEY_ENV: &str = "ORS_API_KEY";
pub const BASE_URL_ENV: &str = "ORS_BASE_URL";
pub const TIMEOUT_ENV: &str = "ORS_TIMEOUT_SECS";
pub const MAX_GRADIENT_ENV: &str = "ORS_WHEELCHAIR_MAX_GRADIENT";
pub const MAX_SLOPED_KERB_ENV: &str = "ORS_WHEELCHAIR_MAX_SLOPED_KERB";
pub const AVOID_STEPS_ENV: &str = "ORS_WHEELCHAIR_AVOID_STEPS";

/// Server-side defaults for the wheelchair profile.
///
/// Each field is the middle tier of the merge: used only when the client did
/// not supply a value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RoutingDefaults {
    pub avoid_steps: Option<bool>,
    pub max_gradient: Option<f64>,
    pub max_sloped_kerb: Option<f64>,
}

impl RoutingDefaults {
    /// True when at least one wheelchair default is configured.
    pub fn is_configured(&self) -> bool {
        self.avoid_steps.is_some() || self.max_gradient.is_some() || self.max_sloped_kerb.is_some()
    }
}

/// Everything needed to talk to the routing provider.
#[derive(Clone)]
pub struct RoutingConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
    pub defaults: RoutingDefaults,
}

impl RoutingConfig {
    /// Create a configuration with the default endpoint and no wheelchair defaults.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            defaults: RoutingDefaults::default(),
        }
    }

    /// Override the provider endpoint root. A trailing `/` is dropped.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_defaults(mut self, defaults: RoutingDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Only `ORS_API_KEY` is mandatory; every other value falls back to its
    /// default when absent or unparsable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_ENV)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::config(format!("{API_KEY_ENV} must be set")))?;

        let mut config = Self::new(api_key);

        if let Some(base_url) = lookup(BASE_URL_ENV).filter(|url| !url.trim().is_empty()) {
            config = config.with_base_url(base_url.trim());
        }

        if let Some(secs) = lookup(TIMEOUT_ENV)
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
        {
            config.timeout = Duration::from_secs(secs);
        }

        config.defaults = RoutingDefaults {
            avoid_steps: parse_optional_bool(lookup(AVOID_STEPS_ENV).as_deref()),
            max_gradient: parse_optional_finite_number(lookup(MAX_GRADIENT_ENV).as_deref()),
            max_sloped_kerb: parse_optional_finite_number(lookup(MAX_SLOPED_KERB_ENV).as_deref()),
        };

        Ok(config)
    }
}

impl std::fmt::Debug for RoutingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutingConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("defaults", &self.defaults)
            .finish()
    }
}

/// Parse an optional numeric setting.
///
/// Absent, blank, unparsable, `NaN` and infinite inputs all yield `None`;
/// a bad value never becomes zero.
pub fn parse_optional_finite_number(raw: Option<&str>) -> Option<f64> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .and_then(|value| value.parse::<f64>().ok())
        .filter(|value| value.is_finite())
}

/// Parse an optional boolean flag (`true/false`, `1/0`, `yes/no`, `on/off`).
pub fn parse_optional_bool(raw: Option<&str>) -> Option<bool> {
    match raw?.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
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
    fn test_parse_optional_finite_number() {
        assert_eq!(parse_optional_finite_number(Some("0.05")), Some(0.05));
        assert_eq!(parse_optional_finite_number(Some(" 6 ")), Some(6.0));
        assert_eq!(parse_optional_finite_number(Some("-1.5")), Some(-1.5));
        assert_eq!(parse_optional_finite_number(None), None);
        assert_eq!(parse_optional_finite_number(Some("")), None);
        assert_eq!(parse_optional_finite_number(Some("   ")), None);
        assert_eq!(parse_optional_finite_number(Some("steep")), None);
        assert_eq!(parse_optional_finite_number(Some("NaN")), None);
        assert_eq!(parse_optional_finite_number(Some("inf")), None);
        assert_eq!(parse_optional_finite_number(Some("-infinity")), None);
    }

    #[test]
    fn test_parse_optional_bool() {
        assert_eq!(parse_optional_bool(Some("true")), Some(true));
        assert_eq!(parse_optional_bool(Some("YES")), Some(true));
        assert_eq!(parse_optional_bool(Some("0")), Some(false));
        assert_eq!(parse_optional_bool(Some("off")), Some(false));
        assert_eq!(parse_optional_bool(Some("maybe")), None);
        assert_eq!(parse_optional_bool(None), None);
    }

    #[test]
    fn test_from_lookup_requires_api_key() {
        let err = RoutingConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(err.to_string().contains(API_KEY_ENV));

        let err = RoutingConfig::from_lookup(lookup_from(&[(API_KEY_ENV, "  ")])).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config = RoutingConfig::from_lookup(lookup_from(&[(API_KEY_ENV, "key")])).unwrap();
        assert_eq!(config.api_key, "key");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.defaults, RoutingDefaults::default());
        assert!(!config.defaults.is_configured());
    }

    #[test]
    fn test_from_lookup_reads_wheelchair_defaults() {
        let config = RoutingConfig::from_lookup(lookup_from(&[
            (API_KEY_ENV, "key"),
            (BASE_URL_ENV, "http://localhost:8082/ors/v2/directions/"),
            (TIMEOUT_ENV, "5"),
            (MAX_GRADIENT_ENV, "0.05"),
            (MAX_SLOPED_KERB_ENV, "not-a-number"),
            (AVOID_STEPS_ENV, "true"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "http://localhost:8082/ors/v2/directions");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.defaults.max_gradient, Some(0.05));
        assert_eq!(config.defaults.max_sloped_kerb, None);
        assert_eq!(config.defaults.avoid_steps, Some(true));
        assert!(config.defaults.is_configured());
    }

    #[test]
    fn test_invalid_timeout_keeps_default() {
        let config = RoutingConfig::from_lookup(lookup_from(&[
            (API_KEY_ENV, "key"),
            (TIMEOUT_ENV, "0"),
        ]))
        .unwrap();
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = RoutingConfig::new("super-secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }
}

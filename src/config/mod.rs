//! Configuration loading and management
//!
//! Configuration comes from a YAML file with a handful of environment
//! overrides for deployment knobs. `default_config()` mirrors the values
//! used throughout the test suites.

use crate::query::plan::{DEFAULT_PER_PAGE, MAX_PER_PAGE, PageLimits};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// One provisioned API token. Issuance happens outside this service;
/// operators drop tokens here and hand them to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiToken {
    /// The opaque bearer token value
    pub token: String,

    /// Caller name, surfaced by `/api/auth/me`
    pub name: String,

    /// Roles granted to the caller (e.g. "admin")
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Pagination bounds for list endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    #[serde(default = "default_per_page")]
    pub default_per_page: usize,

    #[serde(default = "default_max_per_page")]
    pub max_per_page: usize,
}

fn default_per_page() -> usize {
    DEFAULT_PER_PAGE
}

fn default_max_per_page() -> usize {
    MAX_PER_PAGE
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_per_page: DEFAULT_PER_PAGE,
            max_per_page: MAX_PER_PAGE,
        }
    }
}

impl PaginationConfig {
    pub fn limits(&self) -> PageLimits {
        PageLimits {
            default_per_page: self.default_per_page,
            max_per_page: self.max_per_page,
        }
    }
}

/// Fixed-window rate-limit settings; absent means disabled
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window_secs: u64,
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Listen address, e.g. "0.0.0.0:5000"
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default)]
    pub pagination: PaginationConfig,

    /// Provisioned bearer tokens
    #[serde(default)]
    pub tokens: Vec<ApiToken>,

    /// Rate limiting, disabled when absent
    #[serde(default)]
    pub rate_limit: Option<RateLimitConfig>,

    /// Pre-populate the stores with the demo catalog on startup
    #[serde(default)]
    pub seed_demo: bool,
}

fn default_bind_addr() -> String {
    "0.0.0.0:5000".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            pagination: PaginationConfig::default(),
            tokens: Vec::new(),
            rate_limit: None,
            seed_demo: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Apply environment overrides (`STOREFRONT_BIND`, `STOREFRONT_SEED_DEMO`)
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(bind) = std::env::var("STOREFRONT_BIND") {
            self.bind_addr = bind;
        }
        if let Ok(seed) = std::env::var("STOREFRONT_SEED_DEMO") {
            self.seed_demo = seed == "1" || seed.eq_ignore_ascii_case("true");
        }
        self
    }

    /// Create a default configuration for testing: two well-known tokens,
    /// no rate limiting.
    pub fn default_config() -> Self {
        Self {
            tokens: vec![
                ApiToken {
                    token: "test-admin-token".to_string(),
                    name: "test-admin".to_string(),
                    roles: vec!["admin".to_string()],
                },
                ApiToken {
                    token: "test-user-token".to_string(),
                    name: "test-user".to_string(),
                    roles: vec![],
                },
            ],
            ..Self::default()
        }
    }
}

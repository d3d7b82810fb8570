use crate::error::ConfigError;
use hxcomp_core::DEFAULT_BASE_PATH;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

pub const ENV_SECRET: &str = "HXCOMP_SECRET";
pub const ENV_BASE_PATH: &str = "HXCOMP_BASE_PATH";
pub const ENV_REQUIRE_HTMX: &str = "HXCOMP_REQUIRE_HTMX";
pub const ENV_MAX_BODY_BYTES: &str = "HXCOMP_MAX_BODY_BYTES";

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryConfig {
    /// Token key material. Without one a random per-process key is used
    /// and tokens die with the process.
    #[serde(default)]
    pub secret: Option<String>,
    #[serde(default = "default_base_path")]
    pub base_path: String,
    /// Reject non-GET/HEAD requests that lack `HX-Request: true`.
    #[serde(default = "default_require_htmx_header")]
    pub require_htmx_header: bool,
    /// Body limit applied by server adapters.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_base_path() -> String {
    DEFAULT_BASE_PATH.to_string()
}

fn default_require_htmx_header() -> bool {
    true
}

fn default_max_body_bytes() -> usize {
    1024 * 1024
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            secret: None,
            base_path: default_base_path(),
            require_htmx_header: default_require_htmx_header(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl fmt::Debug for RegistryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryConfig")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("base_path", &self.base_path)
            .field("require_htmx_header", &self.require_htmx_header)
            .field("max_body_bytes", &self.max_body_bytes)
            .finish()
    }
}

impl RegistryConfig {
    pub fn minimal(secret: impl Into<String>) -> Self {
        Self {
            secret: Some(secret.into()),
            ..Self::default()
        }
    }

    /// Reads a JSON config file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Defaults overlaid with `HXCOMP_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(secret) = lookup(ENV_SECRET).filter(|s| !s.is_empty()) {
            self.secret = Some(secret);
        }
        if let Some(base) = lookup(ENV_BASE_PATH).filter(|s| !s.is_empty()) {
            self.base_path = base;
        }
        if let Some(flag) = lookup(ENV_REQUIRE_HTMX) {
            match flag.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.require_htmx_header = true,
                "0" | "false" | "no" | "off" => self.require_htmx_header = false,
                other => tracing::warn!(value = other, "ignoring unrecognized {ENV_REQUIRE_HTMX}"),
            }
        }
        if let Some(limit) = lookup(ENV_MAX_BODY_BYTES) {
            match limit.trim().parse() {
                Ok(v) => self.max_body_bytes = v,
                Err(_) => tracing::warn!(value = %limit, "ignoring unparsable {ENV_MAX_BODY_BYTES}"),
            }
        }
        self
    }

    /// Base path without a trailing slash, starting with `/`. Mounting at
    /// the root (`/` or empty) yields `""`, so prefixes are `/<name>-<hash>`.
    pub fn normalized_base_path(&self) -> String {
        let trimmed = self.base_path.trim().trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{trimmed}")
        }
    }
}

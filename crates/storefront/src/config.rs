//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Backend (both or neither)
//! - `SUPABASE_URL` - Hosted backend base URL (e.g., <https://abc.supabase.co>)
//! - `SUPABASE_ANON_KEY` - Anonymous API key
//!
//! If either is missing the storefront runs in offline mode: every remote
//! call fails immediately and the local fallback tier answers instead.
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_DATA_DIR` - Local blob store directory (default: .zoco)
//! - `SUPABASE_STORAGE_BUCKET` - Image upload bucket (default: products)
//! - `SUPABASE_TIMEOUT_SECS` - Backend request timeout (default: 10)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Blocklist of placeholder values shipped in sample `.env` files (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "insert",
    "put-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Directory holding the local blob store (cart, site content)
    pub data_dir: PathBuf,
    /// Hosted backend; `None` selects offline mode
    pub supabase: Option<SupabaseConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Hosted backend (PostgREST + storage) configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct SupabaseConfig {
    /// Backend base URL
    pub url: Url,
    /// Anonymous API key sent as `apikey` and bearer token
    pub anon_key: SecretString,
    /// Storage bucket for uploaded images
    pub storage_bucket: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl std::fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url.as_str())
            .field("anon_key", &"[REDACTED]")
            .field("storage_bucket", &self.storage_bucket)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid, or if the
    /// anon key is an obvious placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = parse_var(&get, "STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_var(&get, "STOREFRONT_PORT", "3000")?;
        let data_dir = PathBuf::from(get("STOREFRONT_DATA_DIR").unwrap_or_else(|| ".zoco".into()));
        let supabase = SupabaseConfig::from_lookup(&get)?;
        let sentry_dsn = get("SENTRY_DSN");

        Ok(Self {
            host,
            port,
            data_dir,
            supabase,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Configuration for tests and local tooling: offline, in-repo data dir.
    #[must_use]
    pub fn offline(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            data_dir: data_dir.into(),
            supabase: None,
            sentry_dsn: None,
        }
    }
}

impl SupabaseConfig {
    fn from_lookup(get: &impl Fn(&str) -> Option<String>) -> Result<Option<Self>, ConfigError> {
        let (Some(url), Some(anon_key)) = (get("SUPABASE_URL"), get("SUPABASE_ANON_KEY")) else {
            return Ok(None);
        };

        let url = Url::parse(&url)
            .map_err(|e| ConfigError::InvalidEnvVar("SUPABASE_URL".to_string(), e.to_string()))?;
        reject_placeholder(&anon_key, "SUPABASE_ANON_KEY")?;

        let storage_bucket = get("SUPABASE_STORAGE_BUCKET").unwrap_or_else(|| "products".into());
        let timeout_secs: u64 = parse_var(get, "SUPABASE_TIMEOUT_SECS", "10")?;

        Ok(Some(Self {
            url,
            anon_key: SecretString::from(anon_key),
            storage_bucket,
            timeout: Duration::from_secs(timeout_secs),
        }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable, falling back to a default when unset.
fn parse_var<T>(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get(key)
        .unwrap_or_else(|| default.to_string())
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Reject keys copied verbatim from a sample `.env`.
fn reject_placeholder(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults_are_offline() {
        let config = load(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.data_dir, PathBuf::from(".zoco"));
        assert!(config.supabase.is_none());
    }

    #[test]
    fn test_one_backend_value_is_not_enough() {
        let config = load(&[("SUPABASE_URL", "https://abc.supabase.co")]).unwrap();
        assert!(config.supabase.is_none());

        let config = load(&[("SUPABASE_URL", "https://abc.supabase.co"), ("SUPABASE_ANON_KEY", "")])
            .unwrap();
        assert!(config.supabase.is_none());
    }

    #[test]
    fn test_backend_configured() {
        let config = load(&[
            ("SUPABASE_URL", "https://abc.supabase.co"),
            ("SUPABASE_ANON_KEY", "eyJhbGciOiJIUzI1NiJ9.k3y"),
            ("SUPABASE_TIMEOUT_SECS", "3"),
        ])
        .unwrap();
        let supabase = config.supabase.unwrap();
        assert_eq!(supabase.url.host_str(), Some("abc.supabase.co"));
        assert_eq!(supabase.anon_key.expose_secret(), "eyJhbGciOiJIUzI1NiJ9.k3y");
        assert_eq!(supabase.storage_bucket, "products");
        assert_eq!(supabase.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            load(&[("STOREFRONT_PORT", "http")]),
            Err(ConfigError::InvalidEnvVar(key, _)) if key == "STOREFRONT_PORT"
        ));
        assert!(matches!(
            load(&[("SUPABASE_URL", "not a url"), ("SUPABASE_ANON_KEY", "k3y")]),
            Err(ConfigError::InvalidEnvVar(key, _)) if key == "SUPABASE_URL"
        ));
    }

    #[test]
    fn test_placeholder_key_rejected() {
        let result = load(&[
            ("SUPABASE_URL", "https://abc.supabase.co"),
            ("SUPABASE_ANON_KEY", "placeholder-key"),
        ]);
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = SupabaseConfig {
            url: Url::parse("https://abc.supabase.co").unwrap(),
            anon_key: SecretString::from("super_secret_anon_key"),
            storage_bucket: "products".to_string(),
            timeout: Duration::from_secs(10),
        };
        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("abc.supabase.co"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_anon_key"));
    }
}

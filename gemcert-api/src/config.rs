//! API Configuration Module
//!
//! Configuration for CORS, bind address, asset/photo directories, and
//! session lifetime. Loaded from environment variables with development
//! defaults.

use std::time::Duration;

/// API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Allowed CORS origins (comma-separated in env var).
    /// Empty means allow all origins (dev mode).
    pub cors_origins: Vec<String>,

    /// Max age for CORS preflight cache in seconds.
    pub cors_max_age_secs: u64,

    /// Directory holding the static image assets (logo, header, gemstone).
    pub asset_dir: String,

    /// Directory the local object store writes certificate photos into.
    pub photo_dir: String,

    /// Lifetime of a login session.
    pub session_ttl: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            cors_origins: Vec::new(), // Empty = allow all
            cors_max_age_secs: 86400,
            asset_dir: "assets".to_string(),
            photo_dir: "photos".to_string(),
            session_ttl: Duration::from_secs(8 * 3600),
        }
    }
}

impl ApiConfig {
    /// Create ApiConfig from environment variables.
    ///
    /// Environment variables:
    /// - `GEMCERT_CORS_ORIGINS`: Comma-separated allowed origins (empty = allow all)
    /// - `GEMCERT_CORS_MAX_AGE_SECS`: Preflight cache duration (default: 86400)
    /// - `GEMCERT_ASSET_DIR`: Static asset directory (default: "assets")
    /// - `GEMCERT_PHOTO_DIR`: Photo object directory (default: "photos")
    /// - `GEMCERT_SESSION_TTL_SECS`: Session lifetime in seconds (default: 28800)
    pub fn from_env() -> Self {
        let cors_origins = std::env::var("GEMCERT_CORS_ORIGINS")
            .ok()
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let cors_max_age_secs = std::env::var("GEMCERT_CORS_MAX_AGE_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(86400);

        let asset_dir =
            std::env::var("GEMCERT_ASSET_DIR").unwrap_or_else(|_| "assets".to_string());
        let photo_dir =
            std::env::var("GEMCERT_PHOTO_DIR").unwrap_or_else(|_| "photos".to_string());

        let session_ttl = Duration::from_secs(
            std::env::var("GEMCERT_SESSION_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8 * 3600),
        );

        Self {
            cors_origins,
            cors_max_age_secs,
            asset_dir,
            photo_dir,
            session_ttl,
        }
    }

    /// Check if running in production mode (strict CORS).
    pub fn is_production(&self) -> bool {
        !self.cors_origins.is_empty()
    }

    /// Check if a given origin is allowed.
    pub fn is_origin_allowed(&self, origin: &str) -> bool {
        if self.cors_origins.is_empty() {
            // Dev mode: allow all
            return true;
        }
        self.cors_origins.iter().any(|allowed| allowed == origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert!(config.cors_origins.is_empty());
        assert_eq!(config.cors_max_age_secs, 86400);
        assert_eq!(config.asset_dir, "assets");
        assert_eq!(config.photo_dir, "photos");
        assert_eq!(config.session_ttl, Duration::from_secs(28800));
    }

    #[test]
    fn test_origin_allowed_dev_mode() {
        let config = ApiConfig::default();
        assert!(config.is_origin_allowed("https://anything.example"));
        assert!(config.is_origin_allowed("http://localhost:5000"));
        assert!(!config.is_production());
    }

    #[test]
    fn test_origin_allowed_production() {
        let mut config = ApiConfig::default();
        config.cors_origins = vec!["https://registry.gemcert.example".to_string()];

        assert!(config.is_production());
        assert!(config.is_origin_allowed("https://registry.gemcert.example"));
        assert!(!config.is_origin_allowed("https://evil.example"));
    }
}

//! Client configuration

use std::path::{Path, PathBuf};

use flugo_clock::DurationSecs;
use flugo_session::SessionConfig;
use serde::Deserialize;

/// Configuration for a platform [`Client`][crate::Client]
///
/// Deserializable so deployments can load it from a configuration file;
/// the `with_` methods cover programmatic construction. Only the base URL
/// is required.
#[derive(Clone, Debug, Deserialize)]
pub struct ClientConfig {
    base_url: String,
    #[serde(default = "defaults::timeout")]
    timeout: DurationSecs,
    #[serde(default = "defaults::cache_enabled")]
    cache_enabled: bool,
    #[serde(default)]
    cache_file: Option<PathBuf>,
    #[serde(default = "defaults::session_lifetime")]
    session_lifetime: DurationSecs,
    #[serde(default = "defaults::expiring_soon_threshold")]
    expiring_soon_threshold: DurationSecs,
}

mod defaults {
    use flugo_clock::DurationSecs;

    pub(super) fn timeout() -> DurationSecs {
        DurationSecs(30)
    }

    pub(super) fn cache_enabled() -> bool {
        true
    }

    pub(super) fn session_lifetime() -> DurationSecs {
        DurationSecs(1200)
    }

    pub(super) fn expiring_soon_threshold() -> DurationSecs {
        DurationSecs(120)
    }
}

impl ClientConfig {
    /// Constructs a configuration for the platform at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: defaults::timeout(),
            cache_enabled: defaults::cache_enabled(),
            cache_file: None,
            session_lifetime: defaults::session_lifetime(),
            expiring_soon_threshold: defaults::expiring_soon_threshold(),
        }
    }

    /// Sets the HTTP timeout applied to every platform call
    pub fn with_timeout(mut self, timeout: DurationSecs) -> Self {
        self.timeout = timeout;
        self
    }

    /// Persists the session cache in the file at `path`
    ///
    /// Without a file the cache lives in process memory only.
    pub fn with_cache_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_file = Some(path.into());
        self
    }

    /// Disables session caching entirely
    pub fn without_cache(mut self) -> Self {
        self.cache_enabled = false;
        self.cache_file = None;
        self
    }

    /// Sets the lifetime presumed when the platform issues a session
    /// without an expiry
    pub fn with_session_lifetime(mut self, lifetime: DurationSecs) -> Self {
        self.session_lifetime = lifetime;
        self
    }

    /// Sets the threshold under which a session counts as expiring soon
    pub fn with_expiring_soon_threshold(mut self, threshold: DurationSecs) -> Self {
        self.expiring_soon_threshold = threshold;
        self
    }

    /// The platform's base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The HTTP timeout applied to every platform call
    pub fn timeout(&self) -> DurationSecs {
        self.timeout
    }

    /// Whether sessions are cached at all
    pub fn cache_enabled(&self) -> bool {
        self.cache_enabled
    }

    /// The session cache file, if one is configured
    pub fn cache_file(&self) -> Option<&Path> {
        self.cache_file.as_deref()
    }

    pub(crate) fn session_config(&self) -> SessionConfig {
        let config = SessionConfig::default()
            .with_default_lifetime(self.session_lifetime)
            .with_expiring_soon_threshold(self.expiring_soon_threshold);
        if self.cache_enabled {
            config
        } else {
            config.without_cache()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_minimal_config_file_fills_in_the_defaults() {
        let config: ClientConfig =
            serde_json::from_value(serde_json::json!({ "base_url": "https://api.flugo.test/v2/" }))
                .unwrap();

        assert_eq!(config.base_url(), "https://api.flugo.test/v2/");
        assert_eq!(config.timeout(), DurationSecs(30));
        assert!(config.cache_enabled());
        assert_eq!(config.cache_file(), None);

        let session = config.session_config();
        assert_eq!(session.default_lifetime(), DurationSecs(1200));
        assert_eq!(session.expiring_soon_threshold(), DurationSecs(120));
        assert!(session.cache_enabled());
    }

    #[test]
    fn a_full_config_file_overrides_the_defaults() {
        let config: ClientConfig = serde_json::from_value(serde_json::json!({
            "base_url": "https://api.flugo.test/v2/",
            "timeout": 5,
            "cache_enabled": true,
            "cache_file": "/var/cache/flugo-session.json",
            "session_lifetime": 600,
            "expiring_soon_threshold": 60,
        }))
        .unwrap();

        assert_eq!(config.timeout(), DurationSecs(5));
        assert_eq!(
            config.cache_file(),
            Some(Path::new("/var/cache/flugo-session.json"))
        );
        assert_eq!(config.session_config().default_lifetime(), DurationSecs(600));
        assert_eq!(
            config.session_config().expiring_soon_threshold(),
            DurationSecs(60)
        );
    }

    #[test]
    fn disabling_the_cache_carries_through_to_the_session_config() {
        let config = ClientConfig::new("https://api.flugo.test/v2/")
            .with_cache_file("/tmp/session.json")
            .without_cache();

        assert!(!config.cache_enabled());
        assert_eq!(config.cache_file(), None);
        assert!(!config.session_config().cache_enabled());
    }
}

use flugo_clock::DurationSecs;

/// Configuration for how the manager computes and judges token lifetimes
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    cache_enabled: bool,
    default_lifetime: DurationSecs,
    expiring_soon_threshold: DurationSecs,
}

impl Default for SessionConfig {
    /// Default session configuration
    ///
    /// Caching is enabled, tokens issued without an explicit expiry are
    /// presumed to live for 1200 seconds, and a token with less than 120
    /// seconds remaining is considered to be expiring soon.
    fn default() -> Self {
        Self {
            cache_enabled: true,
            default_lifetime: DurationSecs(1200),
            expiring_soon_threshold: DurationSecs(120),
        }
    }
}

impl SessionConfig {
    /// Constructs the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Disables the credential store
    ///
    /// The manager still tracks the current token in process memory, but
    /// nothing is persisted and sessions cannot be restored.
    pub fn without_cache(mut self) -> Self {
        self.cache_enabled = false;
        self
    }

    /// Sets the lifetime presumed for tokens the authority issues without
    /// an explicit expiry
    pub fn with_default_lifetime(mut self, lifetime: DurationSecs) -> Self {
        self.default_lifetime = lifetime;
        self
    }

    /// Sets the threshold below which a token counts as expiring soon
    pub fn with_expiring_soon_threshold(mut self, threshold: DurationSecs) -> Self {
        self.expiring_soon_threshold = threshold;
        self
    }

    /// Whether tokens are persisted to the credential store
    #[inline]
    pub fn cache_enabled(&self) -> bool {
        self.cache_enabled
    }

    /// The lifetime presumed when the authority omits an expiry
    #[inline]
    pub fn default_lifetime(&self) -> DurationSecs {
        self.default_lifetime
    }

    /// The default threshold for expiring-soon checks
    #[inline]
    pub fn expiring_soon_threshold(&self) -> DurationSecs {
        self.expiring_soon_threshold
    }
}

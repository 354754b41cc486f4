//! The session lifecycle manager

use std::{error, fmt, sync::Arc};

use arc_swap::ArcSwapOption;
use tokio::sync::broadcast;

use flugo_clock::{Clock, DurationSecs, System, UnixTime};

use crate::{
    events::EventSink,
    gateway::{AuthorityGateway, Credentials, ExpiryHint, Renewal, RevokeStyle, SessionGrant},
    store::{current_slot, token_key, SessionStore},
    BearerToken, BearerTokenRef, CacheKeyRef, NoActiveSession, ProviderKey, ProviderToken,
    ServerId, SessionConfig, SessionContext, SessionError, SessionEvent, SessionToken,
};

/// Orchestrates the lifecycle of the platform session token
///
/// One manager owns one notion of "the current session". Remote work is
/// delegated to the injected [`AuthorityGateway`], persistence to the
/// injected [`SessionStore`], and lifetime math to the injected [`Clock`],
/// so the lifecycle rules here never touch a wire, a disk, or the wall
/// clock directly.
///
/// Operations that reach the authority suspend for the round trip and
/// nothing else; expiry inspection reads only the store and the clock and
/// never suspends. Concurrent lifecycle calls race last-write-wins, the
/// admission order of their responses; callers that need a deterministic
/// order serialize themselves. Reads are safe at any time and reflect the
/// most recently completed admission.
///
/// Store failures never fail a lifecycle operation: a store that errors is
/// treated as one that holds nothing, and the degradation is logged.
pub struct SessionManager<C = System> {
    gateway: Arc<dyn AuthorityGateway>,
    store: Arc<dyn SessionStore>,
    config: SessionConfig,
    current: ArcSwapOption<SessionToken>,
    events: EventSink,
    clock: C,
}

impl SessionManager<System> {
    /// Constructs a manager with the default configuration, running on the
    /// system clock
    pub fn new(gateway: Arc<dyn AuthorityGateway>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            gateway,
            store,
            config: SessionConfig::default(),
            current: ArcSwapOption::from(None),
            events: EventSink::new(),
            clock: System,
        }
    }
}

impl<C> SessionManager<C> {
    /// Replaces the configuration
    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets a custom clock to be used
    ///
    /// Useful for testing purposes
    pub fn with_clock<D>(self, clock: D) -> SessionManager<D> {
        SessionManager {
            gateway: self.gateway,
            store: self.store,
            config: self.config,
            current: self.current,
            events: self.events,
            clock,
        }
    }

    /// The configuration in effect
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Subscribes to session lifecycle events
    ///
    /// Delivery is best effort; a subscriber that falls behind loses the
    /// oldest events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// The bearer credential of the current session
    ///
    /// This is the value domain calls attach to their outgoing requests.
    pub fn current_token(&self) -> Result<BearerToken, NoActiveSession> {
        self.current
            .load_full()
            .map(|token| token.token().to_owned())
            .ok_or(NoActiveSession)
    }

    /// The current session record, if one is established
    pub fn current_session(&self) -> Option<Arc<SessionToken>> {
        self.current.load_full()
    }

    fn current_bearer(&self) -> Option<BearerToken> {
        self.current
            .load_full()
            .map(|token| token.token().to_owned())
    }
}

impl<C: Clock> SessionManager<C> {
    /// Establishes a new session from `credentials`
    ///
    /// Locally-required fields are checked before anything is sent. On
    /// success the grant fully supersedes any prior current session: it is
    /// cached under its digest key and the current slot with a TTL equal
    /// to its remaining life, becomes the in-process current token, and a
    /// [`SessionEvent::Created`] is published. On failure nothing is
    /// changed.
    ///
    /// A superseded token's digest entry is left to age out on its own
    /// TTL, so it remains restorable until it would have expired anyway.
    pub async fn create(
        &self,
        credentials: Credentials,
    ) -> Result<Arc<SessionToken>, SessionError> {
        credentials.validate()?;

        // Only a transfer operates on the current session; the other
        // exchanges establish one from nothing.
        let bearer = if credentials.is_transfer() {
            self.current_bearer()
        } else {
            None
        };

        let grant = self
            .gateway
            .issue(&credentials, bearer.as_deref())
            .await
            .map_err(SessionError::Authentication)?;

        let token = self.admit(grant)?;
        self.events.publish(SessionEvent::Created {
            token: token.token().to_owned(),
            expiry: token.expiry(),
            context: token.context().clone(),
        });
        Ok(token)
    }

    /// Describes the current session as the platform sees it
    ///
    /// A pure probe: no local state is read into or changed on either
    /// outcome.
    pub async fn session_info(&self) -> Result<SessionContext, SessionError> {
        let bearer = self.current_bearer();
        self.gateway
            .describe(bearer.as_deref())
            .await
            .map_err(SessionError::Authentication)
    }

    /// Renews the current session
    ///
    /// Without `upgrade` this is a keep-alive, and the authority's answer
    /// decides what happens: a replacement token supersedes the current
    /// one exactly as a creation would; a bare expiry extends the current
    /// token in place; a bare acknowledgement leaves everything as it was
    /// and returns the current session. A bare acknowledgement for a
    /// session that has already expired locally is reported as
    /// [`SessionError::ExpiredKeepAlive`].
    ///
    /// With `upgrade` credentials the session is logged into the asserted
    /// identity, and the authority must come back with a token;
    /// an acknowledgement without one is
    /// [`SessionError::NoTokenIssued`].
    ///
    /// A successful renewal that changed anything publishes a
    /// [`SessionEvent::Refreshed`].
    pub async fn refresh(
        &self,
        upgrade: Option<Credentials>,
    ) -> Result<Arc<SessionToken>, SessionError> {
        if let Some(credentials) = &upgrade {
            credentials.validate()?;
        }
        let upgrading = upgrade.is_some();

        let bearer = self.current_bearer();
        let renewal = self
            .gateway
            .renew(upgrade.as_ref(), bearer.as_deref())
            .await
            .map_err(SessionError::Authentication)?;

        self.absorb_renewal(renewal, upgrading)
    }

    /// Logs the session out through the platform's session endpoint
    ///
    /// Local state is cleared whether or not the platform call succeeds: a
    /// caller that logged out is never left holding a seemingly valid
    /// session. The error, if any, reports what the platform said. With no
    /// session established this is a local no-op.
    pub async fn logout(&self) -> Result<(), SessionError> {
        self.end_session(RevokeStyle::Standard).await
    }

    /// Logs the session out through the platform's legacy endpoint
    ///
    /// Same semantics as [`logout`][Self::logout]; only the endpoint
    /// differs. Kept for deployments that predate the session endpoints.
    pub async fn legacy_logout(&self) -> Result<(), SessionError> {
        self.end_session(RevokeStyle::Legacy).await
    }

    async fn end_session(&self, style: RevokeStyle) -> Result<(), SessionError> {
        let Some(bearer) = self.current_bearer() else {
            tracing::debug!("logout without an active session is a no-op");
            return Ok(());
        };

        let outcome = self.gateway.revoke(Some(&*bearer), style).await;

        // Local state goes regardless of what the platform said.
        self.clear_local(&bearer);

        outcome.map_err(SessionError::Authentication)
    }

    /// Moves the current session to another reservation server
    ///
    /// Create-shaped: the transferred grant supersedes the current session
    /// and announces itself as a creation.
    pub async fn server_transfer(
        &self,
        target_server: ServerId,
    ) -> Result<Arc<SessionToken>, SessionError> {
        self.create(Credentials::Transfer { target_server }).await
    }

    /// Establishes a session from a single sign-on assertion
    pub async fn sso_create(
        &self,
        provider_key: ProviderKey,
        token: ProviderToken,
    ) -> Result<Arc<SessionToken>, SessionError> {
        self.create(Credentials::SingleSignOn {
            provider_key,
            token,
        })
        .await
    }

    /// Upgrades the current session to the identity asserted by a single
    /// sign-on provider
    ///
    /// The usual shape is an anonymous session gaining a login without
    /// losing its server-side state.
    pub async fn sso_upgrade(
        &self,
        provider_key: ProviderKey,
        token: ProviderToken,
    ) -> Result<Arc<SessionToken>, SessionError> {
        self.refresh(Some(Credentials::SingleSignOn {
            provider_key,
            token,
        }))
        .await
    }

    /// Whether the platform currently recognizes the session
    ///
    /// A best-effort probe built on [`session_info`][Self::session_info]:
    /// any failure, including a plain transport error, reads as `false`.
    /// Use [`session_info`][Self::session_info] directly where the
    /// distinction matters; no other operation shares this lenient
    /// behavior.
    pub async fn is_authenticated(&self) -> bool {
        match self.session_info().await {
            Ok(_) => true,
            Err(error) => {
                tracing::debug!(
                    error = (&error as &dyn error::Error),
                    "treating session probe failure as unauthenticated"
                );
                false
            }
        }
    }

    /// The current session's context, if the platform recognizes it
    ///
    /// Best-effort sibling of [`is_authenticated`][Self::is_authenticated];
    /// failures read as `None`.
    pub async fn authenticated_session(&self) -> Option<SessionContext> {
        match self.session_info().await {
            Ok(context) => Some(context),
            Err(error) => {
                tracing::debug!(
                    error = (&error as &dyn error::Error),
                    "treating session probe failure as unauthenticated"
                );
                None
            }
        }
    }

    /// Seconds of validity remaining on the current session
    ///
    /// Zero when no session is established, when the store no longer holds
    /// the token's entry, or when the expiry has passed; never negative. A
    /// pure read: no network, no mutation. With caching disabled the
    /// in-process record alone is consulted.
    pub fn token_expires_in(&self) -> DurationSecs {
        let Some(current) = self.current.load_full() else {
            return DurationSecs(0);
        };

        let now = self.clock.now();
        if !self.config.cache_enabled() {
            return current.until_expired_at(now);
        }

        match self.lookup(&token_key(current.token())) {
            Some(entry) => entry.until_expired_at(now),
            None => DurationSecs(0),
        }
    }

    /// Whether the current session has less than `threshold` seconds of
    /// validity remaining
    ///
    /// Exactly `threshold` seconds remaining is not yet expiring.
    pub fn is_token_expiring_within(&self, threshold: DurationSecs) -> bool {
        self.token_expires_in() < threshold
    }

    /// [`is_token_expiring_within`][Self::is_token_expiring_within] at the
    /// configured threshold
    pub fn is_token_expiring_soon(&self) -> bool {
        self.is_token_expiring_within(self.config.expiring_soon_threshold())
    }

    /// Whether the current session is past its expiry
    ///
    /// Also true when no session is established at all.
    pub fn is_token_expired(&self) -> bool {
        self.token_expires_in() == DurationSecs(0)
    }

    /// Adopts a previously-issued token as the current session
    ///
    /// Succeeds only while the token's digest entry is still in the store,
    /// neither aged out by TTL nor cleared by a logout. On success the
    /// entry becomes the in-process current session and `true` is
    /// returned; otherwise nothing changes. With a persistent store this
    /// is how a fresh process resumes a still-valid session without
    /// re-authenticating. Always `false` when caching is disabled.
    pub fn restore_token(&self, token: &BearerTokenRef) -> bool {
        if !self.config.cache_enabled() {
            return false;
        }

        match self.lookup(&token_key(token)) {
            Some(entry) => {
                tracing::debug!(
                    expiry = entry.expiry().0,
                    "restored session from credential store"
                );
                self.current.store(Some(Arc::new(entry)));
                true
            }
            None => {
                tracing::debug!("no credential store entry for the offered token");
                false
            }
        }
    }

    /// Adopts whatever session the store's current slot holds
    ///
    /// The slot names the store namespace's active session, so this is the
    /// restore path for processes that do not know any token value.
    /// Always `false` when caching is disabled.
    pub fn restore_latest(&self) -> bool {
        if !self.config.cache_enabled() {
            return false;
        }

        match self.lookup(&current_slot()) {
            Some(entry) => {
                tracing::debug!(
                    expiry = entry.expiry().0,
                    "restored session from credential store"
                );
                self.current.store(Some(Arc::new(entry)));
                true
            }
            None => false,
        }
    }

    fn absorb_renewal(
        &self,
        renewal: Renewal,
        upgrading: bool,
    ) -> Result<Arc<SessionToken>, SessionError> {
        if let Some(replacement) = renewal.token {
            // A replacement token supersedes the current session wholesale,
            // keeping the old context unless the authority sent a new one.
            let context = renewal.context.unwrap_or_else(|| {
                self.current
                    .load_full()
                    .map(|current| current.context().clone())
                    .unwrap_or_default()
            });
            let token = self.admit(SessionGrant {
                token: replacement,
                expiry: renewal.expiry,
                context,
            })?;
            self.events.publish(SessionEvent::Refreshed {
                token: token.token().to_owned(),
                expiry: token.expiry(),
            });
            return Ok(token);
        }

        if upgrading {
            // An upgrade that issued no token did not produce the upgraded
            // session it promised.
            return Err(SessionError::NoTokenIssued);
        }

        let Some(current) = self.current.load_full() else {
            return Err(SessionError::NoTokenIssued);
        };

        let now = self.clock.now();
        if let Some(hint) = renewal.expiry {
            // Same token value, extended validity.
            let expiry = self.resolve_expiry(Some(hint), now)?;
            let extended = Arc::new(current.extended_to(expiry));
            self.persist(&extended, now);
            self.current.store(Some(extended.clone()));
            self.events.publish(SessionEvent::Refreshed {
                token: extended.token().to_owned(),
                expiry,
            });
            return Ok(extended);
        }

        if current.is_expired_at(now) {
            // A bare acknowledgement cannot revive a session that is
            // already past its expiry.
            return Err(SessionError::ExpiredKeepAlive);
        }

        tracing::trace!("keep-alive acknowledged with no state change");
        Ok(current)
    }

    fn admit(&self, grant: SessionGrant) -> Result<Arc<SessionToken>, SessionError> {
        let issued = self.clock.now();
        let expiry = self.resolve_expiry(grant.expiry, issued)?;

        let token = Arc::new(SessionToken::new(
            grant.token,
            grant.context,
            issued,
            expiry,
        ));
        self.persist(&token, issued);
        self.current.store(Some(token.clone()));

        tracing::debug!(
            issued = issued.0,
            expiry = expiry.0,
            lifetime = (expiry - issued).0,
            "admitted session token"
        );

        Ok(token)
    }

    fn resolve_expiry(
        &self,
        hint: Option<ExpiryHint>,
        issued: UnixTime,
    ) -> Result<UnixTime, SessionError> {
        let expiry = match hint {
            Some(ExpiryHint::At(at)) => at,
            Some(ExpiryHint::In(within)) => issued + within,
            None => issued + self.config.default_lifetime(),
        };

        if expiry <= issued {
            return Err(SessionError::ImplausibleExpiry { issued, expiry });
        }

        Ok(expiry)
    }

    fn persist(&self, token: &Arc<SessionToken>, now: UnixTime) {
        if !self.config.cache_enabled() {
            return;
        }

        // One expiry drives both the entry and its TTL, so the store
        // cannot outlive the manager's own lifetime math.
        let ttl = token.until_expired_at(now);
        if let Err(error) = self.store.put(&token_key(token.token()), token, ttl) {
            tracing::warn!(
                error = (&*error as &dyn error::Error),
                "unable to write digest entry to credential store"
            );
        }
        if let Err(error) = self.store.put(&current_slot(), token, ttl) {
            tracing::warn!(
                error = (&*error as &dyn error::Error),
                "unable to write current slot to credential store"
            );
        }
    }

    fn clear_local(&self, bearer: &BearerTokenRef) {
        if self.config.cache_enabled() {
            if let Err(error) = self.store.forget(&token_key(bearer)) {
                tracing::warn!(
                    error = (&*error as &dyn error::Error),
                    "unable to drop digest entry from credential store"
                );
            }
            if let Err(error) = self.store.forget(&current_slot()) {
                tracing::warn!(
                    error = (&*error as &dyn error::Error),
                    "unable to drop current slot from credential store"
                );
            }
        }
        self.current.store(None);
    }

    fn lookup(&self, key: &CacheKeyRef) -> Option<SessionToken> {
        match self.store.get(key) {
            Ok(found) => found,
            Err(error) => {
                tracing::warn!(
                    error = (&*error as &dyn error::Error),
                    "credential store read failed, treating the entry as absent"
                );
                None
            }
        }
    }
}

impl<C: fmt::Debug> fmt::Debug for SessionManager<C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("config", &self.config)
            .field("has_session", &self.current.load().is_some())
            .field("clock", &self.clock)
            .finish()
    }
}

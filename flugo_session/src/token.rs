use flugo_clock::{Clock, DurationSecs, System, UnixTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::BearerTokenRef;

/// Session attributes as reported by the platform
///
/// Whatever the authentication service attaches to a session (identity,
/// roles, server-assigned settings) rides along here uninterpreted. The
/// manager stores and returns it but never reads into it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionContext(serde_json::Map<String, Value>);

impl SessionContext {
    /// An empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a single attribute by name
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Whether the platform reported any attributes at all
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the attributes in the context
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl From<serde_json::Map<String, Value>> for SessionContext {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        Self(map)
    }
}

/// A session token as admitted by the manager, carrying its validity
/// window and the context the platform attached to it
///
/// This is both the in-process record of the current session and the unit
/// the credential store persists.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionToken {
    token: Box<BearerTokenRef>,
    context: SessionContext,
    issued: UnixTime,
    expiry: UnixTime,
}

impl SessionToken {
    pub(crate) fn new(
        token: crate::BearerToken,
        context: SessionContext,
        issued: UnixTime,
        expiry: UnixTime,
    ) -> Self {
        Self {
            token: token.into_boxed_ref(),
            context,
            issued,
            expiry,
        }
    }

    pub(crate) fn clone_entry(&self) -> Self {
        Self {
            token: self.token.to_owned().into_boxed_ref(),
            context: self.context.clone(),
            issued: self.issued,
            expiry: self.expiry,
        }
    }

    pub(crate) fn extended_to(&self, expiry: UnixTime) -> Self {
        Self {
            token: self.token.to_owned().into_boxed_ref(),
            context: self.context.clone(),
            issued: self.issued,
            expiry,
        }
    }
}

/// A token's lifecycle status
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    /// Valid, with comfortable life remaining
    Active,
    /// Valid, but within the renewal threshold
    ExpiringSoon,
    /// Past expiry; the platform will reject it
    Expired,
}

impl SessionToken {
    /// Gets the bearer credential itself
    #[inline]
    pub fn token(&self) -> &BearerTokenRef {
        &self.token
    }

    /// Gets the context the platform attached when the session was
    /// established or last refreshed
    #[inline]
    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// Gets the time the token was admitted by the manager
    #[inline]
    pub fn issued(&self) -> UnixTime {
        self.issued
    }

    /// Gets the time after which the token is void
    #[inline]
    pub fn expiry(&self) -> UnixTime {
        self.expiry
    }

    /// Gets a duration for how much longer the token will be valid
    #[inline]
    pub fn until_expired(&self) -> DurationSecs {
        self.until_expired_with_clock(&System)
    }

    /// Gets a duration for how much longer the token will be valid based
    /// on the current time as reported by the provided clock
    #[inline]
    pub fn until_expired_with_clock<C: Clock>(&self, clock: &C) -> DurationSecs {
        self.until_expired_at(clock.now())
    }

    /// Gets a duration for how much longer the token would be valid as of
    /// the provided time
    ///
    /// Zero once expired; never negative.
    #[inline]
    pub fn until_expired_at(&self, time: UnixTime) -> DurationSecs {
        if time < self.expiry {
            self.expiry - time
        } else {
            DurationSecs(0)
        }
    }

    /// Whether the token is void as of the provided time
    #[inline]
    pub fn is_expired_at(&self, time: UnixTime) -> bool {
        self.until_expired_at(time) == DurationSecs(0)
    }

    /// Gets the token's lifecycle status as of the provided time, treating
    /// less than `threshold` seconds of remaining life as expiring soon
    #[inline]
    pub fn status_at(&self, time: UnixTime, threshold: DurationSecs) -> SessionStatus {
        let remaining = self.until_expired_at(time);
        if remaining == DurationSecs(0) {
            SessionStatus::Expired
        } else if remaining < threshold {
            SessionStatus::ExpiringSoon
        } else {
            SessionStatus::Active
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BearerToken;

    fn token(issued: u64, expiry: u64) -> SessionToken {
        SessionToken::new(
            BearerToken::new("t-0001".to_string()),
            SessionContext::new(),
            UnixTime(issued),
            UnixTime(expiry),
        )
    }

    #[test]
    fn remaining_life_counts_down_to_zero() {
        let t = token(100, 160);

        assert_eq!(t.until_expired_at(UnixTime(100)), DurationSecs(60));
        assert_eq!(t.until_expired_at(UnixTime(159)), DurationSecs(1));
        assert_eq!(t.until_expired_at(UnixTime(160)), DurationSecs(0));
        assert_eq!(t.until_expired_at(UnixTime(500)), DurationSecs(0));
    }

    #[test]
    fn expiry_is_inclusive_of_the_expiry_instant() {
        let t = token(100, 160);

        assert!(!t.is_expired_at(UnixTime(159)));
        assert!(t.is_expired_at(UnixTime(160)));
        assert!(t.is_expired_at(UnixTime(161)));
    }

    #[test]
    fn status_transitions_at_the_threshold_and_expiry() {
        let t = token(100, 160);
        let threshold = DurationSecs(30);

        assert_eq!(t.status_at(UnixTime(100), threshold), SessionStatus::Active);
        assert_eq!(t.status_at(UnixTime(130), threshold), SessionStatus::Active);
        assert_eq!(
            t.status_at(UnixTime(131), threshold),
            SessionStatus::ExpiringSoon
        );
        assert_eq!(t.status_at(UnixTime(160), threshold), SessionStatus::Expired);
    }

    #[test]
    fn tokens_round_trip_through_json() {
        let mut attrs = serde_json::Map::new();
        attrs.insert("userName".into(), serde_json::json!("ada"));
        let original = SessionToken::new(
            BearerToken::new("t-0002".to_string()),
            SessionContext::from(attrs),
            UnixTime(100),
            UnixTime(1300),
        );

        let json = serde_json::to_string(&original).unwrap();
        let restored: SessionToken = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.token(), original.token());
        assert_eq!(restored.context(), original.context());
        assert_eq!(restored.issued(), UnixTime(100));
        assert_eq!(restored.expiry(), UnixTime(1300));
    }
}

//! Wire shapes for the platform's session endpoints

use serde::{Deserialize, Serialize};

use crate::gateway::ExpiryHint;
use crate::{
    BearerToken, PasswordRef, ProviderKeyRef, ProviderTokenRef, ServerIdRef, SessionContext,
    UsernameRef,
};
use flugo_clock::{DurationSecs, UnixTime};

/// Body of a password credential exchange
#[derive(Debug, Serialize)]
pub(super) struct PasswordBody<'a> {
    pub username: &'a UsernameRef,
    pub password: &'a PasswordRef,
}

/// Body of a single sign-on exchange or upgrade
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SingleSignOnBody<'a> {
    pub provider_key: &'a ProviderKeyRef,
    pub token: &'a ProviderTokenRef,
}

/// Body of a server transfer
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct TransferBody<'a> {
    pub target_server: &'a ServerIdRef,
}

/// A freshly issued session as the platform reports it
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SessionResponse {
    pub token: BearerToken,
    #[serde(default)]
    pub expires_at: Option<UnixTime>,
    #[serde(default)]
    pub expires_in: Option<DurationSecs>,
    #[serde(default)]
    pub session: SessionContext,
}

impl SessionResponse {
    pub(super) fn expiry_hint(&self) -> Option<ExpiryHint> {
        expiry_hint(self.expires_at, self.expires_in)
    }
}

/// A renewal as the platform reports it; every field is optional
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RenewResponse {
    #[serde(default)]
    pub token: Option<BearerToken>,
    #[serde(default)]
    pub expires_at: Option<UnixTime>,
    #[serde(default)]
    pub expires_in: Option<DurationSecs>,
    #[serde(default)]
    pub session: Option<SessionContext>,
}

impl RenewResponse {
    pub(super) fn expiry_hint(&self) -> Option<ExpiryHint> {
        expiry_hint(self.expires_at, self.expires_in)
    }
}

/// The current session as described by the platform
#[derive(Debug, Deserialize)]
pub(super) struct InfoResponse {
    #[serde(default)]
    pub session: SessionContext,
}

// An absolute instant wins over a relative one when the platform reports
// both.
fn expiry_hint(at: Option<UnixTime>, within: Option<DurationSecs>) -> Option<ExpiryHint> {
    at.map(ExpiryHint::At)
        .or_else(|| within.map(ExpiryHint::In))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_responses_tolerate_missing_expiry_and_context() {
        let resp: SessionResponse = serde_json::from_str(r#"{"token":"t-1"}"#).unwrap();

        assert_eq!(resp.token.as_str(), "t-1");
        assert_eq!(resp.expiry_hint(), None);
        assert!(resp.session.is_empty());
    }

    #[test]
    fn absolute_expiry_wins_over_relative() {
        let resp: SessionResponse = serde_json::from_str(
            r#"{"token":"t-2","expiresAt":1700,"expiresIn":600}"#,
        )
        .unwrap();

        assert_eq!(resp.expiry_hint(), Some(ExpiryHint::At(UnixTime(1700))));
    }

    #[test]
    fn a_bare_acknowledgement_parses_as_an_empty_renewal() {
        let resp: RenewResponse = serde_json::from_str("{}").unwrap();

        assert!(resp.token.is_none());
        assert_eq!(resp.expiry_hint(), None);
        assert!(resp.session.is_none());
    }

    #[test]
    fn renewals_carry_context_when_the_identity_changes() {
        let resp: RenewResponse = serde_json::from_str(
            r#"{"token":"t-3","expiresIn":1200,"session":{"userName":"ada"}}"#,
        )
        .unwrap();

        assert_eq!(resp.token.as_deref().map(|t| t.as_str()), Some("t-3"));
        assert_eq!(resp.expiry_hint(), Some(ExpiryHint::In(DurationSecs(1200))));
        let session = resp.session.unwrap();
        assert_eq!(session.get("userName"), Some(&serde_json::json!("ada")));
    }
}

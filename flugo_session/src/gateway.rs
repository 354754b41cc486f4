//! The remote authentication gateway contract
//!
//! The manager orchestrates token lifecycle but never speaks a wire
//! protocol itself; everything that leaves the process goes through this
//! capability. An implementation owns transport entirely, including how
//! the bearer credential it is handed rides on the request and how long it
//! is willing to wait for an answer. Errors cross the boundary opaque: the
//! manager wraps them without inspecting them and never retries.

use async_trait::async_trait;

use flugo_clock::{DurationSecs, UnixTime};

use crate::{
    BearerToken, BearerTokenRef, GatewayError, Password, ProviderKey, ProviderToken, ServerId,
    SessionContext, Username, ValidationError,
};

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::HttpGateway;

/// Authentication parameters for establishing or upgrading a session
#[derive(Clone, Debug)]
pub enum Credentials {
    /// The platform's default exchange, yielding an anonymous session
    Anonymous,
    /// A named account with its password
    Password {
        /// The account name
        username: Username,
        /// The account password
        password: Password,
    },
    /// An assertion from a registered single sign-on provider
    SingleSignOn {
        /// The provider that minted the assertion
        provider_key: ProviderKey,
        /// The assertion itself
        token: ProviderToken,
    },
    /// Moves the current session to another reservation server
    Transfer {
        /// The server to transfer to
        target_server: ServerId,
    },
}

impl Credentials {
    /// Checks the fields the platform requires, before anything is sent
    ///
    /// A single sign-on exchange needs both its provider key and its
    /// token; a transfer needs its target server. The anonymous and
    /// password exchanges have no locally-enforced shape.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Credentials::SingleSignOn {
                provider_key,
                token,
            } => {
                if provider_key.as_str().is_empty() {
                    return Err(ValidationError::MissingField("provider_key"));
                }
                if token.as_str().is_empty() {
                    return Err(ValidationError::MissingField("token"));
                }
                Ok(())
            }
            Credentials::Transfer { target_server } => {
                if target_server.as_str().is_empty() {
                    return Err(ValidationError::MissingField("target_server"));
                }
                Ok(())
            }
            Credentials::Anonymous | Credentials::Password { .. } => Ok(()),
        }
    }

    pub(crate) fn is_transfer(&self) -> bool {
        matches!(self, Credentials::Transfer { .. })
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Credentials::Anonymous => "anonymous",
            Credentials::Password { .. } => "password",
            Credentials::SingleSignOn { .. } => "sso",
            Credentials::Transfer { .. } => "transfer",
        }
    }
}

/// When the authority says a grant will stop being valid
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExpiryHint {
    /// An absolute instant
    At(UnixTime),
    /// Seconds from now, by the authority's reckoning
    In(DurationSecs),
}

/// A session issued by the authority
#[derive(Clone, Debug)]
pub struct SessionGrant {
    /// The bearer credential
    pub token: BearerToken,
    /// The authority's expiry, if it stated one
    pub expiry: Option<ExpiryHint>,
    /// Identity and server-assigned attributes, uninterpreted
    pub context: SessionContext,
}

/// The authority's answer to a renew call
///
/// Every field may be absent; a bare acknowledgement is a successful
/// keep-alive that changed nothing.
#[derive(Clone, Debug, Default)]
pub struct Renewal {
    /// A replacement bearer credential, if one was issued
    pub token: Option<BearerToken>,
    /// A new expiry, if the session's life was extended
    pub expiry: Option<ExpiryHint>,
    /// Refreshed context, if the session's identity changed
    pub context: Option<SessionContext>,
}

/// Which revocation endpoint a logout goes through
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevokeStyle {
    /// The session revocation endpoint
    Standard,
    /// The platform's legacy logout endpoint, kept for older deployments
    Legacy,
}

/// The remote authority that issues, describes, renews, and revokes
/// session tokens
///
/// `bearer` is the credential of the session a call operates on, `None`
/// when no session is established yet.
#[async_trait]
pub trait AuthorityGateway: Send + Sync {
    /// Exchanges credentials for a new session grant
    async fn issue(
        &self,
        credentials: &Credentials,
        bearer: Option<&BearerTokenRef>,
    ) -> Result<SessionGrant, GatewayError>;

    /// Describes the session the bearer credential belongs to
    async fn describe(
        &self,
        bearer: Option<&BearerTokenRef>,
    ) -> Result<SessionContext, GatewayError>;

    /// Extends the bearer's session, optionally logging it into the
    /// identity asserted by `upgrade`
    async fn renew(
        &self,
        upgrade: Option<&Credentials>,
        bearer: Option<&BearerTokenRef>,
    ) -> Result<Renewal, GatewayError>;

    /// Invalidates the bearer's session
    async fn revoke(
        &self,
        bearer: Option<&BearerTokenRef>,
        style: RevokeStyle,
    ) -> Result<(), GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_sign_on_requires_both_halves() {
        let missing_token = Credentials::SingleSignOn {
            provider_key: ProviderKey::new("acme-idp".to_string()),
            token: ProviderToken::new("".to_string()),
        };
        assert_eq!(
            missing_token.validate(),
            Err(ValidationError::MissingField("token"))
        );

        let missing_key = Credentials::SingleSignOn {
            provider_key: ProviderKey::new("".to_string()),
            token: ProviderToken::new("assertion".to_string()),
        };
        assert_eq!(
            missing_key.validate(),
            Err(ValidationError::MissingField("provider_key"))
        );
    }

    #[test]
    fn transfers_require_a_target_server() {
        let missing = Credentials::Transfer {
            target_server: ServerId::new("".to_string()),
        };
        assert_eq!(
            missing.validate(),
            Err(ValidationError::MissingField("target_server"))
        );

        let present = Credentials::Transfer {
            target_server: ServerId::new("srv-2".to_string()),
        };
        assert_eq!(present.validate(), Ok(()));
    }

    #[test]
    fn anonymous_and_password_exchanges_have_no_local_shape() {
        assert_eq!(Credentials::Anonymous.validate(), Ok(()));
        assert_eq!(
            Credentials::Password {
                username: Username::new("".to_string()),
                password: Password::new("".to_string()),
            }
            .validate(),
            Ok(())
        );
    }
}

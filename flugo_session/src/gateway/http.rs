//! A gateway speaking the platform's session endpoints over HTTP

use async_trait::async_trait;
use thiserror::Error;

use super::{AuthorityGateway, Credentials, Renewal, RevokeStyle, SessionGrant};
use crate::{BearerTokenRef, GatewayError, SessionContext};

mod dto;

/// Talks to the reservation platform's session endpoints
///
/// Construct it with the platform base URL; the session paths are joined
/// onto it. Request timeouts and TLS policy belong to the
/// [`reqwest::Client`] the gateway is built with.
#[derive(Clone, Debug)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: reqwest::Url,
}

impl HttpGateway {
    /// Constructs a gateway for the platform at `base_url`
    pub fn new(client: reqwest::Client, mut base_url: reqwest::Url) -> Self {
        // Joining relative paths drops the last segment of a base that
        // lacks a trailing slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Self { client, base_url }
    }

    fn endpoint(&self, path: &str) -> Result<reqwest::Url, HttpGatewayError> {
        self.base_url
            .join(path)
            .map_err(HttpGatewayError::InvalidEndpoint)
    }

    fn attach_bearer(
        req: reqwest::RequestBuilder,
        bearer: Option<&BearerTokenRef>,
    ) -> reqwest::RequestBuilder {
        match bearer {
            Some(token) => req.bearer_auth(token.as_str()),
            None => req,
        }
    }

    async fn send<T: serde::de::DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<T, HttpGatewayError> {
        let resp = req.send().await.map_err(HttpGatewayError::RequestSend)?;

        tracing::debug!(
            response.status = resp.status().as_u16(),
            "received session response from the platform"
        );

        if let Err(error) = resp.error_for_status_ref() {
            let body = resp
                .text()
                .await
                .map_err(HttpGatewayError::BodyReadError)?;
            return Err(HttpGatewayError::ErrorWithBody {
                source: error,
                body,
            });
        }

        let body = resp
            .bytes()
            .await
            .map_err(HttpGatewayError::BodyReadError)?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn send_ignoring_body(&self, req: reqwest::RequestBuilder) -> Result<(), HttpGatewayError> {
        let resp = req.send().await.map_err(HttpGatewayError::RequestSend)?;

        tracing::debug!(
            response.status = resp.status().as_u16(),
            "received session response from the platform"
        );

        if let Err(error) = resp.error_for_status_ref() {
            let body = resp
                .text()
                .await
                .map_err(HttpGatewayError::BodyReadError)?;
            return Err(HttpGatewayError::ErrorWithBody {
                source: error,
                body,
            });
        }

        Ok(())
    }

    fn credentialed(
        &self,
        path: &str,
        credentials: &Credentials,
    ) -> Result<reqwest::RequestBuilder, HttpGatewayError> {
        let req = self.client.post(self.endpoint(path)?);
        let req = match credentials {
            Credentials::Anonymous => req.json(&serde_json::json!({})),
            Credentials::Password { username, password } => req.json(&dto::PasswordBody {
                username,
                password,
            }),
            Credentials::SingleSignOn {
                provider_key,
                token,
            } => req.json(&dto::SingleSignOnBody {
                provider_key,
                token,
            }),
            Credentials::Transfer { target_server } => req.json(&dto::TransferBody {
                target_server,
            }),
        };
        Ok(req)
    }
}

/// An error while calling the platform's session endpoints
#[derive(Debug, Error)]
pub enum HttpGatewayError {
    /// An error from the platform with an error body
    #[error("error from the platform session service: {body}")]
    ErrorWithBody {
        /// The underlying request error
        source: reqwest::Error,
        /// The body of the error
        body: String,
    },
    /// Unable to deserialize the session body
    #[error("error deserializing session body from the platform")]
    SessionBodyError(#[from] serde_json::Error),
    /// Unable to read the response
    #[error("error reading response body")]
    BodyReadError(reqwest::Error),
    /// Unable to send a session request to the platform
    #[error("error sending request to the platform")]
    RequestSend(reqwest::Error),
    /// The session path could not be joined onto the base URL
    #[error("error building session endpoint URL")]
    InvalidEndpoint(url::ParseError),
}

#[async_trait]
impl AuthorityGateway for HttpGateway {
    async fn issue(
        &self,
        credentials: &Credentials,
        bearer: Option<&BearerTokenRef>,
    ) -> Result<SessionGrant, GatewayError> {
        tracing::trace!(
            credentials.kind = credentials.kind(),
            "requesting session from the platform"
        );

        let path = match credentials {
            Credentials::SingleSignOn { .. } => "session/sso",
            Credentials::Transfer { .. } => "session/transfer",
            Credentials::Anonymous | Credentials::Password { .. } => "session/create",
        };

        let req = Self::attach_bearer(self.credentialed(path, credentials)?, bearer);
        let resp: dto::SessionResponse = self.send(req).await?;

        let expiry = resp.expiry_hint();
        Ok(SessionGrant {
            token: resp.token,
            expiry,
            context: resp.session,
        })
    }

    async fn describe(
        &self,
        bearer: Option<&BearerTokenRef>,
    ) -> Result<SessionContext, GatewayError> {
        let req = Self::attach_bearer(self.client.get(self.endpoint("session/info")?), bearer);
        let resp: dto::InfoResponse = self.send(req).await?;
        Ok(resp.session)
    }

    async fn renew(
        &self,
        upgrade: Option<&Credentials>,
        bearer: Option<&BearerTokenRef>,
    ) -> Result<Renewal, GatewayError> {
        let req = match upgrade {
            Some(credentials) => {
                tracing::trace!(
                    credentials.kind = credentials.kind(),
                    "requesting session upgrade from the platform"
                );
                self.credentialed("session/upgrade", credentials)?
            }
            None => {
                tracing::trace!("requesting session keep-alive from the platform");
                self.client
                    .post(self.endpoint("session/keepalive")?)
                    .json(&serde_json::json!({}))
            }
        };

        let resp: dto::RenewResponse = self.send(Self::attach_bearer(req, bearer)).await?;

        let expiry = resp.expiry_hint();
        Ok(Renewal {
            token: resp.token,
            expiry,
            context: resp.session,
        })
    }

    async fn revoke(
        &self,
        bearer: Option<&BearerTokenRef>,
        style: RevokeStyle,
    ) -> Result<(), GatewayError> {
        let path = match style {
            RevokeStyle::Standard => "session/logout",
            RevokeStyle::Legacy => "logout",
        };

        let req = Self::attach_bearer(
            self.client
                .post(self.endpoint(path)?)
                .json(&serde_json::json!({})),
            bearer,
        );
        self.send_ignoring_body(req).await?;
        Ok(())
    }
}

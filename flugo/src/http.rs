//! The authenticated transport underneath every domain service

use std::sync::Arc;

use flugo_session::SessionManager;
use serde::{de::DeserializeOwned, Serialize};

use crate::ApiError;

/// Joins request paths onto the configured base URL, attaches the current
/// session token as a bearer credential, and normalizes responses: a
/// success status decodes into the requested shape, anything else becomes
/// an [`ApiError`].
///
/// The session check happens before the request is sent, so calls made
/// without an established session fail locally with
/// [`ApiError::NoSession`].
#[derive(Debug)]
pub(crate) struct Transport {
    client: reqwest::Client,
    base_url: reqwest::Url,
    sessions: Arc<SessionManager>,
}

impl Transport {
    pub(crate) fn new(
        client: reqwest::Client,
        mut base_url: reqwest::Url,
        sessions: Arc<SessionManager>,
    ) -> Self {
        // Joining relative paths drops the last segment of a base that
        // lacks a trailing slash.
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        Self {
            client,
            base_url,
            sessions,
        }
    }

    pub(crate) async fn get<T>(&self, path: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let req = self.client.get(self.endpoint(path)?);
        self.dispatch(req, path).await
    }

    pub(crate) async fn get_with_query<Q, T>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let req = self.client.get(self.endpoint(path)?).query(query);
        self.dispatch(req, path).await
    }

    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let req = self.client.post(self.endpoint(path)?).json(body);
        self.dispatch(req, path).await
    }

    pub(crate) async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let req = self.client.put(self.endpoint(path)?).json(body);
        self.dispatch(req, path).await
    }

    pub(crate) async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let req = self.client.patch(self.endpoint(path)?).json(body);
        self.dispatch(req, path).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let req = self.client.delete(self.endpoint(path)?);
        let response = self.exchange(req, path).await?;
        tracing::debug!(path, status = response.status().as_u16(), "platform response");
        Ok(())
    }

    fn endpoint(&self, path: &str) -> Result<reqwest::Url, ApiError> {
        Ok(self.base_url.join(path)?)
    }

    async fn dispatch<T>(&self, req: reqwest::RequestBuilder, path: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let response = self.exchange(req, path).await?;
        tracing::debug!(path, status = response.status().as_u16(), "platform response");

        let bytes = response.bytes().await.map_err(ApiError::Request)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn exchange(
        &self,
        req: reqwest::RequestBuilder,
        path: &str,
    ) -> Result<reqwest::Response, ApiError> {
        let bearer = self.sessions.current_token()?;

        let response = req
            .bearer_auth(bearer.as_str())
            .send()
            .await
            .map_err(ApiError::Request)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status,
                path: path.to_owned(),
                body,
            });
        }

        Ok(response)
    }
}

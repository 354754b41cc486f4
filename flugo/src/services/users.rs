//! The user account service

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::{http::Transport, validate::require_fields, ApiError};

/// A user account on the platform
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    /// The account's numeric identifier
    pub id: u64,
    /// The login name
    pub login: String,
    /// The person record the account is linked to, if any
    #[serde(default)]
    pub person_id: Option<u64>,
    /// Role names granted to the account
    #[serde(default)]
    pub roles: Vec<String>,
    /// Whether the account can currently sign in
    pub active: bool,
}

/// Operations on user accounts
#[derive(Clone, Debug)]
pub struct UserService {
    transport: Arc<Transport>,
}

impl UserService {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// The account the current session is signed in as
    pub async fn current(&self) -> Result<UserAccount, ApiError> {
        self.transport.get("users/current").await
    }

    /// Looks up an account by its identifier
    pub async fn find(&self, id: u64) -> Result<UserAccount, ApiError> {
        self.transport.get(&format!("users/{id}")).await
    }

    /// Creates an account
    ///
    /// The payload must carry `login` and `password`; everything else
    /// passes through to the platform untouched.
    pub async fn create(&self, payload: &Value) -> Result<UserAccount, ApiError> {
        require_fields(payload, &["login", "password"])?;
        self.transport.post("users", payload).await
    }

    /// Replaces an account's mutable fields
    pub async fn update(&self, id: u64, payload: &Value) -> Result<UserAccount, ApiError> {
        require_fields(payload, &["login"])?;
        self.transport.put(&format!("users/{id}"), payload).await
    }
}

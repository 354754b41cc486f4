//! The organization service

use std::sync::Arc;

use serde::Deserialize;

use crate::{http::Transport, services::users::UserAccount, ApiError};

/// A sales organization, such as an agency or an airline office
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    /// The organization's numeric identifier
    pub id: u64,
    /// Display name
    pub name: String,
    /// Short sales code
    pub code: String,
    /// Whether the organization can currently transact
    pub active: bool,
}

/// Operations on organizations
#[derive(Clone, Debug)]
pub struct OrganizationService {
    transport: Arc<Transport>,
}

impl OrganizationService {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// All organizations visible to the current session
    pub async fn list(&self) -> Result<Vec<Organization>, ApiError> {
        self.transport.get("organizations").await
    }

    /// Looks up an organization by its identifier
    pub async fn find(&self, id: u64) -> Result<Organization, ApiError> {
        self.transport.get(&format!("organizations/{id}")).await
    }

    /// The user accounts belonging to an organization
    pub async fn members(&self, id: u64) -> Result<Vec<UserAccount>, ApiError> {
        self.transport
            .get(&format!("organizations/{id}/users"))
            .await
    }
}

//! The person registry service
//!
//! Persons are the platform's traveler records; accounts, bookings, and
//! boarding passes all hang off a person.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::{http::Transport, validate::require_fields, ApiError};

/// A person record
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    /// The record's numeric identifier
    pub id: u64,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Date of birth, as the platform's `YYYY-MM-DD` string
    #[serde(default)]
    pub date_of_birth: Option<String>,
    /// Contact email address
    #[serde(default)]
    pub contact_email: Option<String>,
}

/// Operations on person records
#[derive(Clone, Debug)]
pub struct PersonService {
    transport: Arc<Transport>,
}

impl PersonService {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// Looks up a person by their identifier
    pub async fn find(&self, id: u64) -> Result<Person, ApiError> {
        self.transport.get(&format!("persons/{id}")).await
    }

    /// All persons with the given family name
    pub async fn search_by_last_name(&self, last_name: &str) -> Result<Vec<Person>, ApiError> {
        self.transport
            .get_with_query("persons", &[("lastName", last_name)])
            .await
    }

    /// Creates a person record
    ///
    /// The payload must carry `firstName` and `lastName`.
    pub async fn create(&self, payload: &Value) -> Result<Person, ApiError> {
        require_fields(payload, &["firstName", "lastName"])?;
        self.transport.post("persons", payload).await
    }

    /// Applies a partial update to a person record
    pub async fn amend(&self, id: u64, payload: &Value) -> Result<Person, ApiError> {
        self.transport.patch(&format!("persons/{id}"), payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::offline_transport;
    use flugo_session::ValidationError;
    use serde_json::json;

    #[test]
    fn persons_decode_from_the_platform_shape() {
        let person: Person = serde_json::from_value(json!({
            "id": 7,
            "firstName": "Ada",
            "lastName": "Lovelace",
            "dateOfBirth": "1815-12-10",
        }))
        .unwrap();

        assert_eq!(person.first_name, "Ada");
        assert_eq!(person.date_of_birth.as_deref(), Some("1815-12-10"));
        assert_eq!(person.contact_email, None);
    }

    #[tokio::test]
    async fn create_requires_both_names() {
        let service = PersonService::new(offline_transport());

        let err = service
            .create(&json!({ "firstName": "Ada" }))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ApiError::Validation(ValidationError::MissingField("lastName"))
        ));
    }
}

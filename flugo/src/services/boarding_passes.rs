//! The boarding pass service

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::{http::Transport, validate::require_fields, ApiError};

/// An issued boarding pass
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardingPass {
    /// The pass's numeric identifier
    pub id: u64,
    /// The booking it was issued against
    pub booking_id: u64,
    /// The traveling person
    pub person_id: u64,
    /// The flight it admits to
    pub flight_id: u64,
    /// Assigned seat, once seated
    #[serde(default)]
    pub seat: Option<String>,
    /// The scannable barcode payload
    pub barcode: String,
}

/// Operations on boarding passes
#[derive(Clone, Debug)]
pub struct BoardingPassService {
    transport: Arc<Transport>,
}

impl BoardingPassService {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// All passes issued against one booking
    pub async fn for_booking(&self, booking_id: u64) -> Result<Vec<BoardingPass>, ApiError> {
        self.transport
            .get_with_query("boardingpasses", &[("bookingId", booking_id)])
            .await
    }

    /// Issues a pass
    ///
    /// The payload must carry `bookingId`, `personId`, and `flightId`.
    pub async fn issue(&self, payload: &Value) -> Result<BoardingPass, ApiError> {
        require_fields(payload, &["bookingId", "personId", "flightId"])?;
        self.transport.post("boardingpasses", payload).await
    }

    /// Revokes a pass, invalidating its barcode
    pub async fn revoke(&self, id: u64) -> Result<(), ApiError> {
        self.transport.delete(&format!("boardingpasses/{id}")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::offline_transport;
    use flugo_session::ValidationError;
    use serde_json::json;

    #[test]
    fn passes_decode_from_the_platform_shape() {
        let pass: BoardingPass = serde_json::from_value(json!({
            "id": 3101,
            "bookingId": 542,
            "personId": 7,
            "flightId": 88001,
            "seat": "12A",
            "barcode": "M1LOVELACE/ADA...",
        }))
        .unwrap();

        assert_eq!(pass.booking_id, 542);
        assert_eq!(pass.seat.as_deref(), Some("12A"));
    }

    #[tokio::test]
    async fn issuing_requires_the_full_reference_triple() {
        let service = BoardingPassService::new(offline_transport());

        let err = service
            .issue(&json!({ "bookingId": 542, "personId": 7 }))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ApiError::Validation(ValidationError::MissingField("flightId"))
        ));
    }
}

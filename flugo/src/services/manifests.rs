//! The flight manifest service

use std::sync::Arc;

use serde::Deserialize;

use crate::{http::Transport, ApiError};

/// The headline figures for one departure
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// The flight's numeric identifier
    pub flight_id: u64,
    /// Marketing flight number, such as `FO451`
    pub flight_number: String,
    /// Departure airport code
    pub departure: String,
    /// Destination airport code
    pub destination: String,
    /// Number of passengers on the manifest
    pub passenger_count: u32,
}

/// One passenger line on a manifest
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestPassenger {
    /// The passenger's person record
    pub person_id: u64,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Assigned seat, once seated
    #[serde(default)]
    pub seat: Option<String>,
    /// Whether the passenger has checked in
    pub checked_in: bool,
}

/// Read access to flight manifests
#[derive(Clone, Debug)]
pub struct ManifestService {
    transport: Arc<Transport>,
}

impl ManifestService {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// The manifest for one flight
    pub async fn for_flight(&self, flight_id: u64) -> Result<Manifest, ApiError> {
        self.transport
            .get(&format!("manifests/flights/{flight_id}"))
            .await
    }

    /// The passenger lines of one flight's manifest
    pub async fn passengers(&self, flight_id: u64) -> Result<Vec<ManifestPassenger>, ApiError> {
        self.transport
            .get(&format!("manifests/flights/{flight_id}/passengers"))
            .await
    }
}

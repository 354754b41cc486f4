//! The voucher service

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::{http::Transport, validate::require_fields, ApiError};

/// A stored-value voucher
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voucher {
    /// The redeemable voucher code
    pub code: String,
    /// Remaining value
    pub amount: f64,
    /// ISO 4217 currency of the value
    pub currency: String,
    /// The platform's status word, such as `issued` or `redeemed`
    pub status: String,
    /// Last day of validity, when limited
    #[serde(default)]
    pub valid_until: Option<String>,
}

/// Operations on vouchers
#[derive(Clone, Debug)]
pub struct VoucherService {
    transport: Arc<Transport>,
}

impl VoucherService {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// Looks up a voucher by its code
    pub async fn find(&self, code: &str) -> Result<Voucher, ApiError> {
        self.transport.get(&format!("vouchers/{code}")).await
    }

    /// Issues a new voucher
    ///
    /// The payload must carry `amount` and `currency`.
    pub async fn issue(&self, payload: &Value) -> Result<Voucher, ApiError> {
        require_fields(payload, &["amount", "currency"])?;
        self.transport.post("vouchers", payload).await
    }

    /// Cancels a voucher, voiding its remaining value
    pub async fn cancel(&self, code: &str) -> Result<(), ApiError> {
        self.transport.delete(&format!("vouchers/{code}")).await
    }
}

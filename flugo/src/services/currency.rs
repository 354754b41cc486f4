//! The currency conversion service

use std::{collections::HashMap, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{http::Transport, ApiError};

/// The result of converting an amount between currencies
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversion {
    /// The amount that was converted
    pub amount: f64,
    /// The source currency
    pub from: String,
    /// The target currency
    pub to: String,
    /// The converted amount
    pub converted: f64,
    /// The rate applied
    pub rate: f64,
}

/// A table of exchange rates against one base currency
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rates {
    /// The base currency the rates are quoted against
    pub base: String,
    /// Rate per target currency
    pub rates: HashMap<String, f64>,
}

#[derive(Serialize)]
struct ConvertQuery<'a> {
    amount: f64,
    from: &'a str,
    to: &'a str,
}

/// Currency conversion at the platform's rates
#[derive(Clone, Debug)]
pub struct CurrencyService {
    transport: Arc<Transport>,
}

impl CurrencyService {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// Converts `amount` from one ISO 4217 currency to another
    pub async fn convert(&self, amount: f64, from: &str, to: &str) -> Result<Conversion, ApiError> {
        self.transport
            .get_with_query("currencies/convert", &ConvertQuery { amount, from, to })
            .await
    }

    /// The rate table quoted against `base`
    pub async fn rates(&self, base: &str) -> Result<Rates, ApiError> {
        self.transport
            .get_with_query("currencies/rates", &[("base", base)])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn conversions_decode_from_the_platform_shape() {
        let conversion: Conversion = serde_json::from_value(json!({
            "amount": 100.0,
            "from": "EUR",
            "to": "RON",
            "converted": 497.3,
            "rate": 4.973,
        }))
        .unwrap();

        assert_eq!(conversion.to, "RON");
        assert!((conversion.rate - 4.973).abs() < f64::EPSILON);
    }

    #[test]
    fn rate_tables_decode_from_the_platform_shape() {
        let rates: Rates = serde_json::from_value(json!({
            "base": "EUR",
            "rates": { "RON": 4.973, "USD": 1.09 },
        }))
        .unwrap();

        assert_eq!(rates.base, "EUR");
        assert_eq!(rates.rates.get("USD"), Some(&1.09));
    }
}

//! Local request validation
//!
//! The platform rejects malformed payloads on its own, but the easy rules
//! are checked here first so the common mistakes surface immediately and
//! never touch the wire.

use flugo_session::ValidationError;
use serde_json::Value;

/// Checks that `payload` carries every field named in `required`
///
/// A field is missing when it is absent, `null`, or an empty string. A
/// payload that is not a JSON object fails on the first required field.
pub fn require_fields(payload: &Value, required: &[&'static str]) -> Result<(), ValidationError> {
    for &field in required {
        let missing = match payload.get(field) {
            None | Some(Value::Null) => true,
            Some(Value::String(value)) => value.is_empty(),
            Some(_) => false,
        };
        if missing {
            return Err(ValidationError::MissingField(field));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn a_complete_payload_passes() {
        let payload = json!({ "login": "ada", "password": "s3cret", "note": null });

        assert!(require_fields(&payload, &["login", "password"]).is_ok());
    }

    #[test]
    fn absent_null_and_empty_fields_are_all_missing() {
        let payload = json!({ "login": "", "role": null });

        assert_eq!(
            require_fields(&payload, &["login"]),
            Err(ValidationError::MissingField("login"))
        );
        assert_eq!(
            require_fields(&payload, &["role"]),
            Err(ValidationError::MissingField("role"))
        );
        assert_eq!(
            require_fields(&payload, &["password"]),
            Err(ValidationError::MissingField("password"))
        );
    }

    #[test]
    fn non_object_payloads_fail_on_the_first_rule() {
        let payload = json!(["not", "an", "object"]);

        assert_eq!(
            require_fields(&payload, &["login", "password"]),
            Err(ValidationError::MissingField("login"))
        );
    }

    #[test]
    fn no_rules_means_nothing_to_fail() {
        assert!(require_fields(&json!(null), &[]).is_ok());
    }
}

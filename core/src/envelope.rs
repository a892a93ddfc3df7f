//! Per-endpoint response shape adapter.
//!
//! # Design
//! The backend is inconsistent: some endpoints answer with the payload
//! itself, others wrap it in `{ success, data, message }`. Each parse method
//! declares which `ResponseShape` its endpoint uses and `decode` turns the
//! body into a plain `Result<T, ApiError>` before any domain mapping runs.

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::types::Envelope;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// The body is the payload.
    Bare,
    /// The body is an `Envelope<T>`.
    Enveloped,
    /// Try the envelope first, then the bare payload.
    Either,
}

/// Decode a 2xx body according to `shape`.
///
/// A `success: false` envelope fails with `on_rejected(message)`, which lets
/// command endpoints report `CommandRejected` while fetches report
/// `FetchRejected`.
pub fn decode<T, F>(body: &str, shape: ResponseShape, on_rejected: F) -> Result<T, ApiError>
where
    T: DeserializeOwned,
    F: FnOnce(String) -> ApiError,
{
    match shape {
        ResponseShape::Bare => parse_json(body),
        ResponseShape::Enveloped => {
            let envelope: Envelope<T> = parse_json(body)?;
            unwrap_envelope(envelope, on_rejected)
        }
        ResponseShape::Either => {
            let value: serde_json::Value = parse_json(body)?;
            if looks_enveloped(&value) {
                let envelope: Envelope<T> = from_value(value)?;
                unwrap_envelope(envelope, on_rejected)
            } else {
                from_value(value)
            }
        }
    }
}

fn unwrap_envelope<T, F>(envelope: Envelope<T>, on_rejected: F) -> Result<T, ApiError>
where
    F: FnOnce(String) -> ApiError,
{
    if !envelope.success {
        let message = envelope
            .message
            .unwrap_or_else(|| "server reported failure".to_string());
        return Err(on_rejected(message));
    }
    envelope
        .data
        .ok_or_else(|| ApiError::DeserializationError("envelope has no data".to_string()))
}

fn looks_enveloped(value: &serde_json::Value) -> bool {
    value
        .as_object()
        .is_some_and(|obj| obj.get("success").is_some_and(|s| s.is_boolean()))
}

fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

fn from_value<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected(msg: String) -> ApiError {
        ApiError::CommandRejected(msg)
    }

    #[test]
    fn bare_payload() {
        let v: Vec<u32> = decode("[1,2,3]", ResponseShape::Bare, rejected).unwrap();
        assert_eq!(v, vec![1, 2, 3]);
    }

    #[test]
    fn enveloped_payload() {
        let v: Vec<u32> =
            decode(r#"{"success":true,"data":[4]}"#, ResponseShape::Enveloped, rejected).unwrap();
        assert_eq!(v, vec![4]);
    }

    #[test]
    fn enveloped_failure_uses_message() {
        let err = decode::<Vec<u32>, _>(
            r#"{"success":false,"message":"database offline"}"#,
            ResponseShape::Enveloped,
            rejected,
        )
        .unwrap_err();
        assert_eq!(err, ApiError::CommandRejected("database offline".to_string()));
    }

    #[test]
    fn enveloped_failure_without_message() {
        let err =
            decode::<bool, _>(r#"{"success":false}"#, ResponseShape::Enveloped, rejected).unwrap_err();
        assert_eq!(err, ApiError::CommandRejected("server reported failure".to_string()));
    }

    #[test]
    fn enveloped_success_without_data_is_malformed() {
        let err = decode::<bool, _>(r#"{"success":true}"#, ResponseShape::Enveloped, rejected).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[test]
    fn either_accepts_both_shapes() {
        let a: Vec<u32> = decode("[1]", ResponseShape::Either, rejected).unwrap();
        let b: Vec<u32> = decode(r#"{"success":true,"data":[1]}"#, ResponseShape::Either, rejected).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn bare_rejects_envelope() {
        let err = decode::<Vec<u32>, _>(r#"{"success":true,"data":[1]}"#, ResponseShape::Bare, rejected)
            .unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[test]
    fn not_json() {
        let err = decode::<bool, _>("<html>", ResponseShape::Either, rejected).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }
}

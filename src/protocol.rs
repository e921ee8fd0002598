//! Wire protocol: one call envelope in, one response envelope out.
//!
//! A call carries a method name and an ordered list of typed parameter values.
//! Parameter values are tagged with their runtime type; a `wrapped` value boxes
//! another value one level deep and must be unwrapped before use. A response
//! carries exactly one value, and only `string` and `boolean` results are
//! encodable — the closed set for the current method surface.

use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, EncodeError};

/// A typed value on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum WireValue {
    String(String),
    Boolean(bool),
    Wrapped(Box<WireValue>),
}

impl WireValue {
    pub fn string(s: impl Into<String>) -> Self {
        WireValue::String(s.into())
    }

    pub fn wrapped(inner: WireValue) -> Self {
        WireValue::Wrapped(Box::new(inner))
    }

    /// Unwrap a boxed string parameter: exactly one `wrapped` layer around a
    /// `string`. Any other shape is a parameter mismatch, not a fault.
    pub fn unwrap_str(&self) -> Result<&str, DecodeError> {
        match self {
            WireValue::Wrapped(inner) => match inner.as_ref() {
                WireValue::String(s) => Ok(s),
                other => Err(DecodeError::MalformedParameter(format!(
                    "expected wrapped string, got wrapped {}",
                    other.type_name()
                ))),
            },
            other => Err(DecodeError::MalformedParameter(format!(
                "expected wrapped string, got {}",
                other.type_name()
            ))),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            WireValue::String(_) => "string",
            WireValue::Boolean(_) => "boolean",
            WireValue::Wrapped(_) => "wrapped",
        }
    }
}

/// One decoded request. Lives only for the duration of a single dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallEnvelope {
    pub method: String,
    #[serde(default)]
    pub params: Vec<WireValue>,
}

/// One encoded response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub result: WireValue,
}

/// Parse an inbound payload into a call. Truncated or structurally invalid
/// payloads are reported, never propagated as a fault.
pub fn decode_call(raw: &[u8]) -> Result<CallEnvelope, DecodeError> {
    serde_json::from_slice(raw).map_err(|e| DecodeError::MalformedEnvelope(e.to_string()))
}

/// Serialize a single result value into a response envelope. Only the closed
/// set of result types (`string`, `boolean`) is supported.
pub fn encode_result(value: &WireValue) -> Result<Vec<u8>, EncodeError> {
    match value {
        WireValue::String(_) | WireValue::Boolean(_) => {}
        WireValue::Wrapped(_) => return Err(EncodeError::UnsupportedValue("wrapped")),
    }
    let envelope = ResponseEnvelope {
        result: value.clone(),
    };
    serde_json::to_vec(&envelope).map_err(|e| {
        // serde_json can only fail here on non-string map keys or I/O, neither
        // of which a ResponseEnvelope can produce.
        tracing::error!(error = %e, "response serialization failed");
        EncodeError::UnsupportedValue("unserializable")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_call_with_wrapped_param() {
        let raw = br#"{"method":"window.delete","params":[{"type":"wrapped","value":{"type":"string","value":"w1"}}]}"#;
        let call = decode_call(raw).unwrap();
        assert_eq!(call.method, "window.delete");
        assert_eq!(call.params.len(), 1);
        assert_eq!(call.params[0].unwrap_str().unwrap(), "w1");
    }

    #[test]
    fn decodes_call_without_params() {
        let call = decode_call(br#"{"method":"window.make"}"#).unwrap();
        assert_eq!(call.method, "window.make");
        assert!(call.params.is_empty());
    }

    #[test]
    fn truncated_payload_is_malformed_envelope() {
        let err = decode_call(br#"{"method":"window.ma"#).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedEnvelope(_)));
    }

    #[test]
    fn wrong_top_level_shape_is_malformed_envelope() {
        let err = decode_call(br#"["window.make"]"#).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedEnvelope(_)));

        let err = decode_call(b"").unwrap_err();
        assert!(matches!(err, DecodeError::MalformedEnvelope(_)));
    }

    #[test]
    fn unwrap_str_rejects_bare_string() {
        let err = WireValue::string("w1").unwrap_str().unwrap_err();
        assert!(matches!(err, DecodeError::MalformedParameter(_)));
    }

    #[test]
    fn unwrap_str_rejects_wrapped_boolean() {
        let value = WireValue::wrapped(WireValue::Boolean(true));
        let err = value.unwrap_str().unwrap_err();
        assert!(matches!(err, DecodeError::MalformedParameter(_)));
    }

    #[test]
    fn encodes_string_result() {
        let bytes = encode_result(&WireValue::string("w1")).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["result"]["type"], "string");
        assert_eq!(json["result"]["value"], "w1");
    }

    #[test]
    fn encodes_boolean_result() {
        let bytes = encode_result(&WireValue::Boolean(false)).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["result"]["type"], "boolean");
        assert_eq!(json["result"]["value"], false);
    }

    #[test]
    fn wrapped_result_is_unsupported() {
        let value = WireValue::wrapped(WireValue::string("w1"));
        let err = encode_result(&value).unwrap_err();
        assert!(matches!(err, EncodeError::UnsupportedValue("wrapped")));
    }
}

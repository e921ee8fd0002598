//! Error taxonomy for the window RPC server.
//!
//! Every error here is scoped to a single request. Decode and encode failures
//! drop the request (or fall back to a `false` result), registry misses are
//! handled by the method that triggered them, and toolkit faults abort the one
//! request they occurred in. Nothing in this module is process-fatal.

/// Failure to turn an inbound payload into a call.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed call envelope: {0}")]
    MalformedEnvelope(String),

    #[error("malformed parameter: {0}")]
    MalformedParameter(String),
}

/// Failure to turn a method result into an outbound payload.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("unsupported result value: {0}")]
    UnsupportedValue(&'static str),
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("no window registered under {0:?}")]
    NotFound(String),
}

/// Fault reported by the toolkit collaborator.
#[derive(Debug, thiserror::Error)]
pub enum ToolkitError {
    #[error("window creation failed: {0}")]
    CreateFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_display() {
        let err = DecodeError::MalformedEnvelope("unexpected end of input".into());
        assert_eq!(
            err.to_string(),
            "malformed call envelope: unexpected end of input"
        );

        let err = DecodeError::MalformedParameter("expected wrapped string".into());
        assert_eq!(err.to_string(), "malformed parameter: expected wrapped string");
    }

    #[test]
    fn encode_error_display() {
        let err = EncodeError::UnsupportedValue("wrapped");
        assert_eq!(err.to_string(), "unsupported result value: wrapped");
    }

    #[test]
    fn registry_error_display() {
        let err = RegistryError::NotFound("w7".into());
        assert_eq!(err.to_string(), "no window registered under \"w7\"");
    }

    #[test]
    fn toolkit_error_display() {
        let err = ToolkitError::CreateFailed("display unavailable".into());
        assert_eq!(err.to_string(), "window creation failed: display unavailable");
    }
}

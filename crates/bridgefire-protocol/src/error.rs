//! Error types for the protocol layer.
//!
//! Each crate in Bridgefire defines its own error enum. A `ProtocolError`
//! always means the bytes were wrong (or would have been), never that the
//! network misbehaved.

/// Errors that can occur while building requests or reading replies.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The key and value lists handed to the encoder differ in length.
    ///
    /// Nothing was produced, so there is nothing to send. Retrying the
    /// same call can never succeed.
    #[error("malformed request: {keys} keys but {values} values")]
    MalformedRequest { keys: usize, values: usize },

    /// Serialization failed (turning a key or value into JSON text).
    #[error("encode failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// The reply is not valid JSON.
    #[error("decode failed: {0}")]
    Decode(#[source] serde_json::Error),

    /// The reply parsed, but its top level is not a JSON object.
    #[error("reply is not an object")]
    NotAnObject,

    /// A field the client depends on is absent from the reply.
    #[error("reply is missing field `{0}`")]
    MissingField(&'static str),

    /// A field is present but has the wrong shape.
    #[error("field `{field}` is invalid: {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
    },
}

impl ProtocolError {
    /// Returns `true` for errors about the *content* of a reply, as opposed
    /// to a request the client failed to build.
    pub fn is_violation(&self) -> bool {
        !matches!(self, Self::MalformedRequest { .. } | Self::Encode(_))
    }
}

//! Codec trait and the JSON implementation used by the game server.
//!
//! A codec turns a request's key/value lists into bytes and turns reply
//! bytes into [`Fields`]. The orchestrator only talks to the [`Codec`]
//! trait, so a test can swap in a codec that records what was sent.

use crate::{Fields, ProtocolError, WireValue};

/// Encodes requests and decodes replies.
///
/// `Send + Sync + 'static` so a codec can live inside long-running async
/// tasks alongside the channels it serves.
pub trait Codec: Send + Sync + 'static {
    /// Builds one request from positional key/value lists.
    ///
    /// # Errors
    /// Returns `ProtocolError::MalformedRequest` if the lists differ in
    /// length. No partial output is produced in that case.
    fn encode(
        &self,
        keys: &[&str],
        values: &[WireValue],
    ) -> Result<Vec<u8>, ProtocolError>;

    /// Parses one reply into a named-field tree.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` for malformed bytes and
    /// `ProtocolError::NotAnObject` if the top level isn't an object.
    fn decode(&self, data: &[u8]) -> Result<Fields, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] producing the flat JSON objects the game server speaks.
///
/// ```rust
/// use bridgefire_protocol::{Codec, JsonCodec, WireValue};
///
/// let bytes = JsonCodec
///     .encode(
///         &["type", "turn"],
///         &[WireValue::Text("getturn".into()), WireValue::Number(3)],
///     )
///     .unwrap();
/// assert_eq!(bytes, br#"{"type": "getturn", "turn": 3}"#);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl JsonCodec {
    /// Encodes untyped values, classifying each with [`WireValue::infer`].
    ///
    /// This is the legacy contract, kept for counterparts that depend on
    /// the old value typing byte for byte.
    pub fn encode_inferred(
        &self,
        keys: &[&str],
        values: &[&str],
    ) -> Result<Vec<u8>, ProtocolError> {
        let values: Vec<WireValue> =
            values.iter().map(|v| WireValue::infer(v)).collect();
        self.encode(keys, &values)
    }
}

impl Codec for JsonCodec {
    fn encode(
        &self,
        keys: &[&str],
        values: &[WireValue],
    ) -> Result<Vec<u8>, ProtocolError> {
        if keys.len() != values.len() {
            return Err(ProtocolError::MalformedRequest {
                keys: keys.len(),
                values: values.len(),
            });
        }

        let mut out = String::from("{");
        for (i, (key, value)) in keys.iter().zip(values).enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(
                &serde_json::to_string(key).map_err(ProtocolError::Encode)?,
            );
            out.push_str(": ");
            value.write_json(&mut out)?;
        }
        out.push('}');

        Ok(out.into_bytes())
    }

    fn decode(&self, data: &[u8]) -> Result<Fields, ProtocolError> {
        // Datagram buffers may carry trailing NULs from fixed-size senders.
        let end = data.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        let value: serde_json::Value =
            serde_json::from_slice(&data[..end]).map_err(ProtocolError::Decode)?;
        Fields::from_value(value)
    }
}

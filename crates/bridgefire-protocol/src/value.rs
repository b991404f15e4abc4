//! Typed values for outbound request fields.

use std::fmt::Write as _;

use crate::ProtocolError;

/// A request field value, tagged with how it must appear on the wire.
///
/// The caller decides the representation where the value is built, so
/// `"0042"` can be sent as text and `42` as a number without the encoder
/// guessing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireValue {
    /// An unquoted integer literal: `42`.
    Number(i64),
    /// A quoted, escaped string: `"authreq"`.
    Text(String),
    /// Emitted verbatim. Used for literal arrays such as `[3,1]`.
    Raw(String),
}

impl WireValue {
    /// Classifies untyped text using the legacy value-typing rules.
    ///
    /// - text containing both `[` and `]` is a literal array ([`Raw`])
    /// - text with any character outside `0-9` is a string ([`Text`])
    /// - anything else is a numeric literal, written out verbatim
    ///
    /// Negative numbers contain `-` and so come out as strings, and the
    /// empty string has no non-digit so it is written as an empty literal.
    /// Both match what deployed counterparts already expect.
    ///
    /// [`Raw`]: WireValue::Raw
    /// [`Text`]: WireValue::Text
    pub fn infer(value: &str) -> Self {
        if value.contains('[') && value.contains(']') {
            return Self::Raw(value.to_string());
        }
        if value.chars().any(|c| !c.is_ascii_digit()) {
            return Self::Text(value.to_string());
        }
        // Digit-only text. Keep it verbatim rather than parsing, so leading
        // zeros and values past i64 survive byte for byte.
        match value.parse::<i64>() {
            Ok(n) if n.to_string() == value => Self::Number(n),
            _ => Self::Raw(value.to_string()),
        }
    }

    /// Appends this value's JSON representation to `out`.
    pub(crate) fn write_json(&self, out: &mut String) -> Result<(), ProtocolError> {
        match self {
            Self::Number(n) => {
                // Writing to a String cannot fail.
                let _ = write!(out, "{n}");
            }
            Self::Text(s) => {
                out.push_str(&serde_json::to_string(s).map_err(ProtocolError::Encode)?);
            }
            Self::Raw(s) => out.push_str(s),
        }
        Ok(())
    }
}

impl From<i64> for WireValue {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for WireValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for WireValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json(value: &WireValue) -> String {
        let mut out = String::new();
        value.write_json(&mut out).unwrap();
        out
    }

    #[test]
    fn test_infer_array() {
        assert_eq!(WireValue::infer("[3,1]"), WireValue::Raw("[3,1]".into()));
    }

    #[test]
    fn test_infer_bracket_alone_is_text() {
        assert_eq!(WireValue::infer("[3"), WireValue::Text("[3".into()));
    }

    #[test]
    fn test_infer_digits_are_numeric() {
        assert_eq!(WireValue::infer("12"), WireValue::Number(12));
        assert_eq!(json(&WireValue::infer("007")), "007");
        assert_eq!(
            json(&WireValue::infer("99999999999999999999")),
            "99999999999999999999"
        );
    }

    #[test]
    fn test_infer_negative_number_is_quoted() {
        assert_eq!(WireValue::infer("-5"), WireValue::Text("-5".into()));
        assert_eq!(json(&WireValue::infer("-5")), "\"-5\"");
    }

    #[test]
    fn test_infer_empty_is_bare_literal() {
        assert_eq!(json(&WireValue::infer("")), "");
    }

    #[test]
    fn test_text_is_escaped() {
        let v = WireValue::Text("a\"b".into());
        assert_eq!(json(&v), r#""a\"b""#);
    }
}

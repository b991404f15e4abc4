//! Outbound requests.

use crate::fields::field;
use crate::{Codec, ProtocolError, ShipId, WireValue};

/// Every request the client sends to a river.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Presents the shared secret. Sent once per river.
    Authenticate,
    /// Asks for the cannon inventory. Sent on river 0 only.
    GetCannons,
    /// Asks a river for its sightings during `turn`.
    GetTurn { turn: u32 },
    /// Fires the cannon at (`bridge`, `row`) at `ship`. `bridge` is 1-based.
    Shot { bridge: u32, row: u32, ship: ShipId },
    /// Tells the server the client is leaving.
    Quit,
}

impl Request {
    /// The `type` tag this request carries on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Authenticate => "authreq",
            Self::GetCannons => "getcannons",
            Self::GetTurn { .. } => "getturn",
            Self::Shot { .. } => "shot",
            Self::Quit => "quit",
        }
    }

    /// Lays the request out as parallel key and value lists.
    pub fn fields(&self, secret: &str) -> (Vec<&'static str>, Vec<WireValue>) {
        let mut keys = vec![field::TYPE, field::AUTH];
        let mut values = vec![
            WireValue::Text(self.kind().to_string()),
            WireValue::Text(secret.to_string()),
        ];

        match self {
            Self::GetTurn { turn } => {
                keys.push(field::TURN);
                values.push(WireValue::Number(i64::from(*turn)));
            }
            Self::Shot { bridge, row, ship } => {
                keys.push(field::CANNON);
                values.push(WireValue::Raw(format!("[{bridge},{row}]")));
                keys.push(field::ID);
                values.push(match ship {
                    ShipId::Number(n) => WireValue::Number(*n),
                    ShipId::Text(s) => WireValue::Text(s.clone()),
                });
            }
            Self::Authenticate | Self::GetCannons | Self::Quit => {}
        }

        (keys, values)
    }

    /// Encodes the request with `codec`, authenticated by `secret`.
    pub fn encode<C: Codec>(
        &self,
        codec: &C,
        secret: &str,
    ) -> Result<Vec<u8>, ProtocolError> {
        let (keys, values) = self.fields(secret);
        codec.encode(&keys, &values)
    }
}

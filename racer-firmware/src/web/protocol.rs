// WebSocket-Protokoll-Definitionen
// JSON-Nachrichten für Client ↔ Server Kommunikation
//
// Server → Client ist die `Telemetry`-Nachricht selbst (getaggt mit "type")
// plus `WsServerMessage::Error` für abgelehnte Kommandos.

use racer_core::types::{HEADLIGHT_COMMAND_LEN, MOTOR_COMMAND_LEN};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    Drive,
    Headlight,
    /// Einzelfarbe einer LED-Zone setzen (mit `r,g,b`) oder löschen (ohne)
    Zone,
    /// Einen Motor sofort anhalten
    Stop,
}

/// Client → Server Nachrichten
///
/// Flache Struktur mit optionalen Feldern für serde-json-core Kompatibilität.
/// Die Felder entsprechen 1:1 den Byte-Tupeln des Funk-Protokolls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct WsClientMessage {
    #[serde(rename = "type")]
    pub msg_type: MessageType,
    #[serde(default)]
    pub speed_a: Option<u8>,
    #[serde(default)]
    pub dir_a: Option<u8>,
    #[serde(default)]
    pub speed_b: Option<u8>,
    #[serde(default)]
    pub dir_b: Option<u8>,
    #[serde(default)]
    pub seconds: Option<u8>,
    #[serde(default)]
    pub r: Option<u8>,
    #[serde(default)]
    pub g: Option<u8>,
    #[serde(default)]
    pub b: Option<u8>,
    #[serde(default)]
    pub zone: Option<u8>,
    #[serde(default)]
    pub motor: Option<u8>,
}

impl WsClientMessage {
    /// `{speed_a, dir_a, speed_b, dir_b, seconds}`; `None` wenn ein Feld fehlt
    pub fn drive_bytes(&self) -> Option<[u8; MOTOR_COMMAND_LEN]> {
        Some([
            self.speed_a?,
            self.dir_a?,
            self.speed_b?,
            self.dir_b?,
            self.seconds?,
        ])
    }

    /// `{r, g, b}`; `None` wenn ein Feld fehlt
    pub fn headlight_bytes(&self) -> Option<[u8; HEADLIGHT_COMMAND_LEN]> {
        Some([self.r?, self.g?, self.b?])
    }

    /// `true` wenn keiner der Farbkanäle gesetzt ist (Zone löschen)
    pub fn has_no_color(&self) -> bool {
        self.r.is_none() && self.g.is_none() && self.b.is_none()
    }
}

/// Server → Client Fehlermeldung
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum WsServerMessage {
    #[serde(rename = "error")]
    Error { message: &'static str },
}

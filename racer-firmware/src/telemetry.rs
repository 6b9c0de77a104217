// Telemetrie-Nachrichten für MQTT und WebSocket-Clients
use racer_core::{ColorClass, GameEffect};
use serde::Serialize;

/// Broadcast-Nachricht der Fahrzeug-Tasks
///
/// Wird über den `TelemetryChannel` an alle Subscriber verteilt und für
/// WebSocket-Clients direkt als JSON serialisiert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, defmt::Format)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Telemetry {
    /// Sensor-Task: Farbe nach einem Trigger
    Color { color: ColorClass },
    /// Game-Task: neuer aktiver Effekt (auch Rückkehr zu `off`)
    Effect { effect: GameEffect },
    /// Battery-Task: Spannung und Warn-Latch
    Battery { millivolts: u32, low: bool },
}

// Library-Root: Hardware-Anbindung und Embassy Tasks des Racers
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

pub mod config;
pub mod hal;
pub mod tasks;
pub mod telemetry;
pub mod web;

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};
use embassy_sync::mutex::Mutex;
use embassy_sync::pubsub::{PubSubChannel, Publisher, Subscriber};
use embassy_sync::signal::Signal;

use racer_core::motor::NUM_MOTORS;
use racer_core::{ColorClass, GameEffect, LedState, MotorCommand, MotorUpdate};

use crate::config::{
    COLOR_QUEUE_SIZE, MOTOR_QUEUE_SIZE, TELEMETRY_CAPACITY, TELEMETRY_PUBLISHERS,
    TELEMETRY_SUBSCRIBERS, TRIGGER_QUEUE_SIZE,
};
pub use crate::telemetry::Telemetry;

// ============================================================================
// Type-Aliase für Sync-Primitive
// ============================================================================
//
// Alle Primitive nutzen CriticalSectionRawMutex, damit sie in `static`s
// liegen und von jedem Task aus erreichbar sind.

/// Queue für genau einen Motor (Controller → Motor-Task)
pub type MotorQueue = Channel<CriticalSectionRawMutex, MotorUpdate, MOTOR_QUEUE_SIZE>;

/// Eine Queue pro Motor, indiziert über `MotorIndex::as_usize()`
pub type MotorQueues = [MotorQueue; NUM_MOTORS];

/// Neuestes Fahrkommando (Fernsteuerung → Controller-Task)
pub type CommandSignal = Signal<CriticalSectionRawMutex, MotorCommand>;

/// Entprellte Trigger (Flanken-Task → Sensor-Task)
pub type TriggerChannel = Channel<CriticalSectionRawMutex, (), TRIGGER_QUEUE_SIZE>;
pub type TriggerSender = Sender<'static, CriticalSectionRawMutex, (), TRIGGER_QUEUE_SIZE>;
pub type TriggerReceiver = Receiver<'static, CriticalSectionRawMutex, (), TRIGGER_QUEUE_SIZE>;

/// Klassifizierte Farben (Sensor-Task → Game-Task)
pub type ColorChannel = Channel<CriticalSectionRawMutex, ColorClass, COLOR_QUEUE_SIZE>;
pub type ColorSender = Sender<'static, CriticalSectionRawMutex, ColorClass, COLOR_QUEUE_SIZE>;
pub type ColorReceiver = Receiver<'static, CriticalSectionRawMutex, ColorClass, COLOR_QUEUE_SIZE>;

/// Gemeinsamer LED-Zustand (async Lock mit Timeout im Render-Loop)
pub type SharedLedState = Mutex<CriticalSectionRawMutex, LedState>;

/// Aktiver Spiel-Effekt; einziger Schreiber ist der Game-Task
pub type ActiveEffect = BlockingMutex<CriticalSectionRawMutex, Cell<GameEffect>>;

/// PubSubChannel für Telemetrie (MQTT + WebSocket-Clients)
pub type TelemetryChannel = PubSubChannel<
    CriticalSectionRawMutex,
    Telemetry,
    TELEMETRY_CAPACITY,
    TELEMETRY_SUBSCRIBERS,
    TELEMETRY_PUBLISHERS,
>;

pub type TelemetryPublisher = Publisher<
    'static,
    CriticalSectionRawMutex,
    Telemetry,
    TELEMETRY_CAPACITY,
    TELEMETRY_SUBSCRIBERS,
    TELEMETRY_PUBLISHERS,
>;

pub type TelemetrySubscriber = Subscriber<
    'static,
    CriticalSectionRawMutex,
    Telemetry,
    TELEMETRY_CAPACITY,
    TELEMETRY_SUBSCRIBERS,
    TELEMETRY_PUBLISHERS,
>;

/// Liest den aktiven Effekt
pub fn current_effect(effect: &ActiveEffect) -> GameEffect {
    effect.lock(|cell| cell.get())
}

//! Hardware Abstraction Traits
//!
//! Diese Traits definieren Schnittstellen für Hardware-Zugriff
//! ohne konkrete Implementierung.

use crate::led::LedFrame;
use crate::types::MotorIndex;

/// Fehler-Typ für LED-Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedError {
    WriteFailed,
    /// Zonen-Index außerhalb von 0..5
    InvalidZone(usize),
}

/// Trait für SmartLED Hardware-Zugriff
///
/// Abstrahiert den Zugriff auf die 5 RGB LEDs (WS2812/Neopixel) des Fahrzeugs.
///
/// # Implementierungen
/// - **Production:** RmtLedWriter (ESP32 RMT Peripheral)
/// - **Testing:** MockLedWriter (in-memory Mock)
pub trait SmartLedWriter: Send {
    /// Schreibt einen kompletten Frame (eine Farbe pro Zone)
    ///
    /// # Fehlerbehandlung
    /// Gibt `LedError::WriteFailed` zurück wenn Hardware-Zugriff fehlschlägt
    fn write(&mut self, frame: &LedFrame) -> Result<(), LedError>;
}

/// Fehler-Typ für PWM-Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PwmError {
    WriteFailed,
    /// Kanal gehört zu einer anderen H-Brücke
    ForeignMotor(MotorIndex),
}

/// Zweig der H-Brücke eines Motors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BridgeLeg {
    Forward,
    Backward,
}

/// Ein PWM-Kanal: Motor + Brückenzweig
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PwmChannel {
    pub motor: MotorIndex,
    pub leg: BridgeLeg,
}

impl PwmChannel {
    pub const fn new(motor: MotorIndex, leg: BridgeLeg) -> Self {
        Self { motor, leg }
    }
}

/// Trait für die vier Motor-PWM-Kanäle
///
/// # Implementierungen
/// - **Production:** LedcMotorPwm (ESP32 LEDC Peripheral, 10 Bit)
/// - **Testing:** MockMotorPwm (zeichnet alle Schreibzugriffe auf)
pub trait MotorPwm {
    /// Setzt den Duty-Cycle eines Kanals (0..=MAX_DUTY)
    fn set_duty(&mut self, channel: PwmChannel, duty: u16) -> Result<(), PwmError>;
}

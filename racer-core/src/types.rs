//! Core Types für das Racer-Fahrzeug
//!
//! Datenstrukturen ohne Hardware-Dependencies: Farbmessungen, Farbklassen,
//! Motor-Kommandos und deren Byte-Format.

use rgb::RGB8;

/// Minimaler Clear-Kanal, unter dem ein Sensor-Frame als zu dunkel gilt
pub const MIN_CLEAR_COUNTS: u16 = 10;

/// Anzahl der Bytes eines Motor-Kommandos auf dem Draht
pub const MOTOR_COMMAND_LEN: usize = 5;

/// Anzahl der Bytes eines Scheinwerfer-Farbwerts auf dem Draht
pub const HEADLIGHT_COMMAND_LEN: usize = 3;

/// Fehler beim Dekodieren externer Kommandos
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Falsche Anzahl Bytes (erwartet, erhalten)
    InvalidLength { expected: usize, actual: usize },
    /// Motor-Index außerhalb von 0..=1
    InvalidMotorIndex(u8),
}

// ============================================================================
// Farbmessungen
// ============================================================================

/// Rohwerte des Farbsensors (16-Bit Zählerstände pro Kanal)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawRgbc {
    pub clear: u16,
    pub red: u16,
    pub green: u16,
    pub blue: u16,
}

/// Normalisierte Farbmessung (0..=65535 pro Kanal)
///
/// Rot, Grün und Blau sind auf den Clear-Kanal bezogen. Eine normalisierte
/// Messung hat `clear == u16::MAX`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ColorSample {
    pub red: u16,
    pub green: u16,
    pub blue: u16,
    pub clear: u16,
}

impl ColorSample {
    pub const fn new(red: u16, green: u16, blue: u16, clear: u16) -> Self {
        Self {
            red,
            green,
            blue,
            clear,
        }
    }

    /// Normalisiert einen Roh-Frame auf den Clear-Kanal
    ///
    /// Gibt `None` zurück, wenn der Clear-Kanal unter [`MIN_CLEAR_COUNTS`]
    /// liegt (zu dunkel, nur Rauschen).
    ///
    /// # Beispiele
    ///
    /// ```
    /// # use racer_core::{ColorSample, RawRgbc};
    /// let raw = RawRgbc { clear: 1000, red: 500, green: 250, blue: 0 };
    /// let sample = ColorSample::normalized(raw).unwrap();
    /// assert_eq!(sample.red, 32768);
    /// assert_eq!(sample.green, 16384);
    /// assert_eq!(sample.blue, 0);
    /// assert_eq!(sample.clear, u16::MAX);
    /// ```
    pub fn normalized(raw: RawRgbc) -> Option<Self> {
        if raw.clear < MIN_CLEAR_COUNTS {
            return None;
        }

        let clear = u32::from(raw.clear);
        // Gerundete Division: (x * 65535 + c/2) / c
        let scale = |channel: u16| -> u16 {
            let scaled = (u32::from(channel) * u32::from(u16::MAX) + clear / 2) / clear;
            scaled.min(u32::from(u16::MAX)) as u16
        };

        Some(Self {
            red: scale(raw.red),
            green: scale(raw.green),
            blue: scale(raw.blue),
            clear: u16::MAX,
        })
    }
}

/// Farbklassen, die der Klassifikator unterscheidet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ColorClass {
    Red,
    Cyan,
    Blue,
    Green,
    Yellow,
    White,
    Unknown,
}

impl ColorClass {
    /// Lesbarer Name für Logs und Telemetrie
    pub fn name(self) -> &'static str {
        match self {
            ColorClass::Red => "Red",
            ColorClass::Cyan => "Cyan",
            ColorClass::Blue => "Blue",
            ColorClass::Green => "Green",
            ColorClass::Yellow => "Yellow",
            ColorClass::White => "White",
            ColorClass::Unknown => "Unknown",
        }
    }
}

// ============================================================================
// Motor-Typen
// ============================================================================

/// Drehrichtung eines Motors
///
/// Auf dem Draht steht `0` für vorwärts, jeder andere Wert für rückwärts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    pub fn from_wire(byte: u8) -> Self {
        if byte == 0 {
            Direction::Forward
        } else {
            Direction::Backward
        }
    }

    pub fn to_wire(self) -> u8 {
        match self {
            Direction::Forward => 0,
            Direction::Backward => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::Forward => "FORWARD",
            Direction::Backward => "BACKWARD",
        }
    }
}

/// Index eines der beiden Motoren
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorIndex {
    A,
    B,
}

impl MotorIndex {
    pub const ALL: [MotorIndex; 2] = [MotorIndex::A, MotorIndex::B];

    pub fn as_usize(self) -> usize {
        match self {
            MotorIndex::A => 0,
            MotorIndex::B => 1,
        }
    }
}

impl TryFrom<u8> for MotorIndex {
    type Error = CommandError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        match index {
            0 => Ok(MotorIndex::A),
            1 => Ok(MotorIndex::B),
            other => Err(CommandError::InvalidMotorIndex(other)),
        }
    }
}

/// Fahrkommando für beide Motoren
///
/// Kommt als 5-Byte-Tupel `{speed_a, dir_a, speed_b, dir_b, duration_secs}`
/// vom Transport und wird vor dem Versand vom aktiven Spiel-Effekt verändert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MotorCommand {
    pub speed_a: u8,
    pub dir_a: Direction,
    pub speed_b: u8,
    pub dir_b: Direction,
    pub duration_secs: u8,
}

impl MotorCommand {
    pub const fn new(
        speed_a: u8,
        dir_a: Direction,
        speed_b: u8,
        dir_b: Direction,
        duration_secs: u8,
    ) -> Self {
        Self {
            speed_a,
            dir_a,
            speed_b,
            dir_b,
            duration_secs,
        }
    }

    /// Teilt das Kommando in je ein Update pro Motor-Queue
    pub fn split(&self) -> [MotorUpdate; 2] {
        [
            MotorUpdate::new(MotorIndex::A, self.speed_a, self.dir_a),
            MotorUpdate::new(MotorIndex::B, self.speed_b, self.dir_b),
        ]
    }

    pub fn to_bytes(&self) -> [u8; MOTOR_COMMAND_LEN] {
        [
            self.speed_a,
            self.dir_a.to_wire(),
            self.speed_b,
            self.dir_b.to_wire(),
            self.duration_secs,
        ]
    }
}

impl TryFrom<&[u8]> for MotorCommand {
    type Error = CommandError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let [speed_a, dir_a, speed_b, dir_b, duration_secs] = bytes else {
            return Err(CommandError::InvalidLength {
                expected: MOTOR_COMMAND_LEN,
                actual: bytes.len(),
            });
        };

        Ok(Self {
            speed_a: *speed_a,
            dir_a: Direction::from_wire(*dir_a),
            speed_b: *speed_b,
            dir_b: Direction::from_wire(*dir_b),
            duration_secs: *duration_secs,
        })
    }
}

/// Update für genau einen Motor (Inhalt einer Motor-Queue)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotorUpdate {
    pub motor: MotorIndex,
    pub speed_percent: u8,
    pub direction: Direction,
}

impl MotorUpdate {
    pub const fn new(motor: MotorIndex, speed_percent: u8, direction: Direction) -> Self {
        Self {
            motor,
            speed_percent,
            direction,
        }
    }

    /// Stopp-Update des Watchdogs: Geschwindigkeit 0, Richtung 0
    pub const fn stop(motor: MotorIndex) -> Self {
        Self::new(motor, 0, Direction::Forward)
    }
}

/// Dekodiert ein 3-Byte `{R, G, B}` Tupel für die Scheinwerfer
pub fn parse_headlight(bytes: &[u8]) -> Result<RGB8, CommandError> {
    let [r, g, b] = bytes else {
        return Err(CommandError::InvalidLength {
            expected: HEADLIGHT_COMMAND_LEN,
            actual: bytes.len(),
        });
    };
    Ok(RGB8 {
        r: *r,
        g: *g,
        b: *b,
    })
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for MotorCommand {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "MotorCommand {{ a: {}% {}, b: {}% {}, secs: {} }}",
            self.speed_a,
            self.dir_a.name(),
            self.speed_b,
            self.dir_b.name(),
            self.duration_secs
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_motor_command_from_bytes() {
        let cmd = MotorCommand::try_from(&[80u8, 0, 70, 1, 5][..]).unwrap();
        assert_eq!(
            cmd,
            MotorCommand::new(80, Direction::Forward, 70, Direction::Backward, 5)
        );
    }

    #[test]
    fn test_motor_command_wrong_length() {
        let result = MotorCommand::try_from(&[80u8, 0, 70, 1][..]);
        assert_eq!(
            result,
            Err(CommandError::InvalidLength {
                expected: 5,
                actual: 4
            })
        );
    }

    #[test]
    fn test_any_nonzero_direction_byte_is_backward() {
        assert_eq!(Direction::from_wire(0), Direction::Forward);
        assert_eq!(Direction::from_wire(1), Direction::Backward);
        assert_eq!(Direction::from_wire(200), Direction::Backward);
    }

    #[test]
    fn test_motor_index_bounds() {
        assert_eq!(MotorIndex::try_from(0), Ok(MotorIndex::A));
        assert_eq!(MotorIndex::try_from(1), Ok(MotorIndex::B));
        assert_eq!(
            MotorIndex::try_from(2),
            Err(CommandError::InvalidMotorIndex(2))
        );
    }

    #[test]
    fn test_normalize_rejects_dark_frame() {
        let raw = RawRgbc {
            clear: 9,
            red: 5,
            green: 5,
            blue: 5,
        };
        assert_eq!(ColorSample::normalized(raw), None);
    }

    #[test]
    fn test_normalize_clamps_channel_above_clear() {
        let raw = RawRgbc {
            clear: 100,
            red: 300,
            green: 100,
            blue: 50,
        };
        let sample = ColorSample::normalized(raw).unwrap();
        assert_eq!(sample.red, u16::MAX);
        assert_eq!(sample.green, u16::MAX);
        assert_eq!(sample.blue, 32768);
    }

    #[test]
    fn test_headlight_bytes() {
        assert_eq!(
            parse_headlight(&[1, 2, 3]),
            Ok(RGB8 { r: 1, g: 2, b: 3 })
        );
        assert!(parse_headlight(&[1, 2]).is_err());
    }
}

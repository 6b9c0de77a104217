//! Gemeinsame Mocks für die Integration Tests

#![allow(dead_code)]

use racer_core::{BridgeLeg, LedError, LedFrame, MotorIndex, MotorPwm, PwmChannel, PwmError, SmartLedWriter};

// ============================================================================
// Mock LED Writer
// ============================================================================

#[derive(Default)]
pub struct MockLedWriter {
    pub last_frame: Option<LedFrame>,
    pub write_count: usize,
    pub fail_next_write: bool,
}

impl MockLedWriter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SmartLedWriter for MockLedWriter {
    fn write(&mut self, frame: &LedFrame) -> Result<(), LedError> {
        if self.fail_next_write {
            self.fail_next_write = false;
            return Err(LedError::WriteFailed);
        }

        self.last_frame = Some(*frame);
        self.write_count += 1;
        Ok(())
    }
}

// ============================================================================
// Mock Motor PWM
// ============================================================================

/// Zeichnet jeden Schreibzugriff auf und hält die aktuellen Duty-Werte
#[derive(Default)]
pub struct MockMotorPwm {
    pub writes: Vec<(PwmChannel, u16)>,
    /// [Motor][Zweig] → aktueller Duty
    pub duty: [[u16; 2]; 2],
    /// Wurden jemals beide Zweige eines Motors gleichzeitig angesteuert?
    pub shoot_through: bool,
    pub fail_next_write: bool,
    /// Wie eine einzelne H-Brücke: nur dieser Motor ist angeschlossen
    pub owner: Option<MotorIndex>,
}

impl MockMotorPwm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Brücke für genau einen Motor
    pub fn for_motor(motor: MotorIndex) -> Self {
        Self {
            owner: Some(motor),
            ..Self::default()
        }
    }

    pub fn duty_of(&self, motor: MotorIndex, leg: BridgeLeg) -> u16 {
        self.duty[motor.as_usize()][leg_index(leg)]
    }
}

fn leg_index(leg: BridgeLeg) -> usize {
    match leg {
        BridgeLeg::Forward => 0,
        BridgeLeg::Backward => 1,
    }
}

impl MotorPwm for MockMotorPwm {
    fn set_duty(&mut self, channel: PwmChannel, duty: u16) -> Result<(), PwmError> {
        if self.fail_next_write {
            self.fail_next_write = false;
            return Err(PwmError::WriteFailed);
        }
        if let Some(owner) = self.owner {
            if owner != channel.motor {
                return Err(PwmError::ForeignMotor(channel.motor));
            }
        }

        let legs = &mut self.duty[channel.motor.as_usize()];
        legs[leg_index(channel.leg)] = duty;
        if legs[0] != 0 && legs[1] != 0 {
            self.shoot_through = true;
        }
        self.writes.push((channel, duty));
        Ok(())
    }
}

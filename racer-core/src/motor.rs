//! Motor-Ansteuerung
//!
//! Jeder Motor hängt an einer H-Brücke mit zwei PWM-Kanälen (vorwärts /
//! rückwärts). Es ist immer höchstens ein Zweig aktiv.
//!
//! Der Soft-Start wird als Iterator von [`RampStep`]s beschrieben. Die
//! Firmware wartet die `hold_ms` jedes Schritts asynchron ab; Tests und
//! blockierende Aufrufer nutzen [`MotorActuator::soft_start_blocking`].

use crate::traits::{BridgeLeg, MotorPwm, PwmChannel, PwmError};
use crate::types::{Direction, MotorIndex};

pub const NUM_MOTORS: usize = 2;

/// Unterhalb dieser Geschwindigkeit dreht der Motor nicht zuverlässig an
pub const MIN_SPEED_PERCENT: u8 = 15;

/// 10-Bit PWM
pub const MAX_DUTY: u16 = 1023;

pub const MIN_DUTY: u16 = (MIN_SPEED_PERCENT as u32 * MAX_DUTY as u32 / 100) as u16;

/// Haltezeit pro Rampenschritt
pub const SOFT_START_STEP_MS: u32 = 30;

/// Haltezeit nach dem Anlauf-Kick aus dem Stand
pub const SOFT_START_KICK_MS: u32 = 2 * SOFT_START_STEP_MS;

/// Rechnet eine Geschwindigkeit in Prozent in einen Duty-Cycle um
///
/// Werte über 100 werden auf 100 begrenzt, Werte unter
/// [`MIN_SPEED_PERCENT`] ergeben 0. Dazwischen linear
/// `[MIN_SPEED_PERCENT, 100] → [MIN_DUTY, MAX_DUTY]`.
///
/// ```
/// # use racer_core::motor::{duty_for_speed, MAX_DUTY, MIN_DUTY};
/// assert_eq!(duty_for_speed(14), 0);
/// assert_eq!(duty_for_speed(15), MIN_DUTY);
/// assert_eq!(duty_for_speed(100), MAX_DUTY);
/// assert_eq!(duty_for_speed(250), MAX_DUTY);
/// ```
pub fn duty_for_speed(speed_percent: u8) -> u16 {
    let speed = speed_percent.min(100);
    if speed < MIN_SPEED_PERCENT {
        return 0;
    }

    let span = u32::from(MAX_DUTY - MIN_DUTY);
    let above_min = u32::from(speed - MIN_SPEED_PERCENT);
    MIN_DUTY + (above_min * span / u32::from(100 - MIN_SPEED_PERCENT)) as u16
}

/// Zuletzt angefahrener Sollwert eines Motors (Anker für die nächste Rampe)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotorRuntimeState {
    pub speed_percent: u8,
    pub direction: Direction,
}

/// Ein Schritt des Soft-Starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RampStep {
    pub speed_percent: u8,
    pub direction: Direction,
    /// Wartezeit nach dem Schreiben dieses Schritts
    pub hold_ms: u32,
}

impl RampStep {
    const fn new(speed_percent: u8, direction: Direction, hold_ms: u32) -> Self {
        Self {
            speed_percent,
            direction,
            hold_ms,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RampPhase {
    /// Abbremsen in alter Richtung bis MIN_SPEED_PERCENT
    Braking { speed: u8 },
    /// Harter Stopp nach dem Abbremsen
    Stopped,
    /// Anlauf aus dem Stand mit MIN_SPEED_PERCENT
    Kick,
    /// Einzelschritte Richtung Ziel
    Ramping { speed: u8 },
    /// Ziel 0: direkt aus
    Direct,
    /// Exakter Zielwert
    Final,
    Done,
}

/// Iterator über die Schritte eines Soft-Starts
#[derive(Debug, Clone)]
pub struct SoftStartRamp {
    from: MotorRuntimeState,
    target: MotorRuntimeState,
    phase: RampPhase,
}

impl SoftStartRamp {
    /// Plant die Rampe von `from` nach (`target_speed`, `target_direction`)
    ///
    /// Zielwerte über 100 werden auf 100 begrenzt.
    pub fn new(from: MotorRuntimeState, target_speed: u8, target_direction: Direction) -> Self {
        let target = MotorRuntimeState {
            speed_percent: target_speed.min(100),
            direction: target_direction,
        };

        let phase = if from.direction != target.direction && from.speed_percent > 0 {
            if from.speed_percent >= MIN_SPEED_PERCENT {
                RampPhase::Braking {
                    speed: from.speed_percent,
                }
            } else {
                RampPhase::Stopped
            }
        } else {
            Self::approach(from.speed_percent, target.speed_percent)
        };

        Self {
            from,
            target,
            phase,
        }
    }

    /// Zustand, der nach Abschluss der Rampe gespeichert wird
    pub fn target(&self) -> MotorRuntimeState {
        self.target
    }

    fn approach(start_speed: u8, target_speed: u8) -> RampPhase {
        if target_speed == 0 {
            RampPhase::Direct
        } else if start_speed == 0 {
            RampPhase::Kick
        } else {
            RampPhase::Ramping { speed: start_speed }
        }
    }
}

impl Iterator for SoftStartRamp {
    type Item = RampStep;

    fn next(&mut self) -> Option<RampStep> {
        let target = self.target;

        loop {
            match self.phase {
                RampPhase::Braking { speed } => {
                    self.phase = if speed > MIN_SPEED_PERCENT {
                        RampPhase::Braking { speed: speed - 1 }
                    } else {
                        RampPhase::Stopped
                    };
                    return Some(RampStep::new(
                        speed,
                        self.from.direction,
                        SOFT_START_STEP_MS,
                    ));
                }
                RampPhase::Stopped => {
                    self.phase = Self::approach(0, target.speed_percent);
                    return Some(RampStep::new(0, self.from.direction, 0));
                }
                RampPhase::Kick => {
                    self.phase = RampPhase::Ramping {
                        speed: MIN_SPEED_PERCENT,
                    };
                    return Some(RampStep::new(
                        MIN_SPEED_PERCENT,
                        target.direction,
                        SOFT_START_KICK_MS,
                    ));
                }
                RampPhase::Ramping { speed } => {
                    if speed == target.speed_percent {
                        self.phase = RampPhase::Final;
                        continue;
                    }
                    let next = if target.speed_percent > speed {
                        speed + 1
                    } else {
                        speed - 1
                    };
                    self.phase = RampPhase::Ramping { speed: next };
                    return Some(RampStep::new(
                        speed,
                        target.direction,
                        SOFT_START_STEP_MS,
                    ));
                }
                RampPhase::Direct => {
                    self.phase = RampPhase::Final;
                    return Some(RampStep::new(0, target.direction, 0));
                }
                RampPhase::Final => {
                    self.phase = RampPhase::Done;
                    return Some(RampStep::new(target.speed_percent, target.direction, 0));
                }
                RampPhase::Done => return None,
            }
        }
    }
}

// ============================================================================
// Aktuator
// ============================================================================

/// Besitzt die PWM-Kanäle beider Motoren und deren Laufzeit-Zustand
pub struct MotorActuator<P: MotorPwm> {
    pwm: P,
    state: [MotorRuntimeState; NUM_MOTORS],
}

impl<P: MotorPwm> MotorActuator<P> {
    pub fn new(pwm: P) -> Self {
        Self {
            pwm,
            state: [MotorRuntimeState::default(); NUM_MOTORS],
        }
    }

    pub fn state(&self, motor: MotorIndex) -> MotorRuntimeState {
        self.state[motor.as_usize()]
    }

    pub fn pwm(&self) -> &P {
        &self.pwm
    }

    pub fn into_pwm(self) -> P {
        self.pwm
    }

    /// Schreibt Geschwindigkeit und Richtung sofort auf die Brücke
    ///
    /// Der inaktive Zweig wird vor dem aktiven geschrieben. Der gespeicherte
    /// Laufzeit-Zustand bleibt unverändert.
    pub fn set_speed(
        &mut self,
        motor: MotorIndex,
        speed_percent: u8,
        direction: Direction,
    ) -> Result<u16, PwmError> {
        let duty = duty_for_speed(speed_percent);
        let (active, inactive) = match direction {
            Direction::Forward => (BridgeLeg::Forward, BridgeLeg::Backward),
            Direction::Backward => (BridgeLeg::Backward, BridgeLeg::Forward),
        };

        self.pwm.set_duty(PwmChannel::new(motor, inactive), 0)?;
        self.pwm.set_duty(PwmChannel::new(motor, active), duty)?;
        Ok(duty)
    }

    /// Plant eine Rampe ausgehend vom gespeicherten Zustand
    pub fn soft_start_ramp(
        &self,
        motor: MotorIndex,
        target_speed: u8,
        target_direction: Direction,
    ) -> SoftStartRamp {
        SoftStartRamp::new(self.state(motor), target_speed, target_direction)
    }

    /// Schreibt einen Rampenschritt
    pub fn apply_step(&mut self, motor: MotorIndex, step: &RampStep) -> Result<u16, PwmError> {
        self.set_speed(motor, step.speed_percent, step.direction)
    }

    /// Speichert das Ziel einer abgeschlossenen Rampe als neuen Anker
    pub fn complete_soft_start(&mut self, motor: MotorIndex, ramp: &SoftStartRamp) {
        self.state[motor.as_usize()] = ramp.target();
    }

    /// Soft-Start mit blockierender Wartefunktion
    pub fn soft_start_blocking<D>(
        &mut self,
        motor: MotorIndex,
        target_speed: u8,
        target_direction: Direction,
        mut delay_ms: D,
    ) -> Result<(), PwmError>
    where
        D: FnMut(u32),
    {
        let mut ramp = self.soft_start_ramp(motor, target_speed, target_direction);
        for step in ramp.by_ref() {
            self.apply_step(motor, &step)?;
            if step.hold_ms > 0 {
                delay_ms(step.hold_ms);
            }
        }
        self.complete_soft_start(motor, &ramp);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(speed_percent: u8, direction: Direction) -> MotorRuntimeState {
        MotorRuntimeState {
            speed_percent,
            direction,
        }
    }

    fn speeds(ramp: SoftStartRamp) -> ([u8; 64], usize) {
        let mut out = [0u8; 64];
        let mut len = 0;
        for step in ramp {
            out[len] = step.speed_percent;
            len += 1;
        }
        (out, len)
    }

    #[test]
    fn test_duty_mapping() {
        assert_eq!(MIN_DUTY, 153);
        assert_eq!(duty_for_speed(0), 0);
        assert_eq!(duty_for_speed(15), 153);
        assert_eq!(duty_for_speed(50), 153 + 35 * 870 / 85);
        assert_eq!(duty_for_speed(100), 1023);
    }

    #[test]
    fn test_ramp_from_standstill_kicks_then_steps() {
        let ramp = SoftStartRamp::new(state(0, Direction::Forward), 18, Direction::Forward);
        let steps: [Option<RampStep>; 6] = {
            let mut it = ramp;
            core::array::from_fn(|_| it.next())
        };

        assert_eq!(steps[0], Some(RampStep::new(15, Direction::Forward, 60)));
        assert_eq!(steps[1], Some(RampStep::new(15, Direction::Forward, 30)));
        assert_eq!(steps[2], Some(RampStep::new(16, Direction::Forward, 30)));
        assert_eq!(steps[3], Some(RampStep::new(17, Direction::Forward, 30)));
        assert_eq!(steps[4], Some(RampStep::new(18, Direction::Forward, 0)));
        assert_eq!(steps[5], None);
    }

    #[test]
    fn test_direction_change_brakes_to_zero_first() {
        let ramp = SoftStartRamp::new(state(17, Direction::Forward), 16, Direction::Backward);
        let all: [Option<RampStep>; 9] = {
            let mut it = ramp;
            core::array::from_fn(|_| it.next())
        };

        assert_eq!(all[0], Some(RampStep::new(17, Direction::Forward, 30)));
        assert_eq!(all[1], Some(RampStep::new(16, Direction::Forward, 30)));
        assert_eq!(all[2], Some(RampStep::new(15, Direction::Forward, 30)));
        assert_eq!(all[3], Some(RampStep::new(0, Direction::Forward, 0)));
        assert_eq!(all[4], Some(RampStep::new(15, Direction::Backward, 60)));
        assert_eq!(all[5], Some(RampStep::new(15, Direction::Backward, 30)));
        assert_eq!(all[6], Some(RampStep::new(16, Direction::Backward, 0)));
        assert_eq!(all[7], None);
    }

    #[test]
    fn test_ramp_down_same_direction() {
        let (out, len) = speeds(SoftStartRamp::new(
            state(20, Direction::Forward),
            17,
            Direction::Forward,
        ));
        assert_eq!(&out[..len], &[20, 19, 18, 17]);
    }

    #[test]
    fn test_target_zero_is_direct() {
        let mut ramp = SoftStartRamp::new(state(60, Direction::Forward), 0, Direction::Forward);
        assert_eq!(ramp.next(), Some(RampStep::new(0, Direction::Forward, 0)));
        assert_eq!(ramp.next(), Some(RampStep::new(0, Direction::Forward, 0)));
        assert_eq!(ramp.next(), None);
    }

    #[test]
    fn test_target_is_clamped() {
        let ramp = SoftStartRamp::new(state(100, Direction::Forward), 200, Direction::Forward);
        assert_eq!(ramp.target().speed_percent, 100);
        let (out, len) = speeds(ramp);
        assert_eq!(&out[..len], &[100]);
    }
}

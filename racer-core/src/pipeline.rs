//! Motor-Kommando-Pipeline
//!
//! Basis-Kommando + aktiver Effekt → verändertes Kommando → zwei
//! Motor-Updates. Jedes Kommando armiert den Stopp-Watchdog neu.

use crate::game::GameEffect;
use crate::timer::OneShot;
use crate::types::{Direction, MotorCommand, MotorIndex, MotorUpdate};

/// Skalierung der Kommando-Dauer auf die Watchdog-Periode
///
/// Die Dauer wird mit 100 ms pro Einheit gerechnet, nicht mit 1000 ms.
pub const WATCHDOG_MS_PER_UNIT: u64 = 100;

/// Einstellbare Stärke der Spiel-Effekte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EffectTuning {
    /// Aufschlag bei SpeedUp (Prozentpunkte)
    pub increment: u8,
    /// Abzug bei SlowDown (Prozentpunkte)
    pub decrement: u8,
    pub spin_speed: u8,
    pub spin_duration_secs: u8,
}

impl Default for EffectTuning {
    fn default() -> Self {
        Self {
            increment: 10,
            decrement: 10,
            spin_speed: 60,
            spin_duration_secs: 10,
        }
    }
}

/// Wendet den aktiven Effekt auf ein Basis-Kommando an
pub fn apply_effect(effect: GameEffect, command: MotorCommand, tuning: &EffectTuning) -> MotorCommand {
    let mut out = command;

    match effect {
        GameEffect::SpinOut => {
            out.speed_a = tuning.spin_speed;
            out.dir_a = Direction::Backward;
            out.speed_b = tuning.spin_speed;
            out.dir_b = Direction::Forward;
            out.duration_secs = tuning.spin_duration_secs;
        }
        GameEffect::SpeedUp => {
            let limit = 100u8.saturating_sub(tuning.increment);
            if out.speed_a < limit && out.speed_b < limit {
                out.speed_a += tuning.increment;
                out.speed_b += tuning.increment;
            }
        }
        GameEffect::SlowDown => {
            if out.speed_a > tuning.decrement && out.speed_b > tuning.decrement {
                out.speed_a -= tuning.decrement;
                out.speed_b -= tuning.decrement;
            }
        }
        GameEffect::Off => {}
    }

    out
}

/// Watchdog-Periode für eine Kommando-Dauer
pub fn watchdog_period_ms(duration_secs: u8) -> u64 {
    u64::from(duration_secs) * WATCHDOG_MS_PER_UNIT
}

/// Stopp-Updates für beide Motoren
pub fn stop_updates() -> [MotorUpdate; 2] {
    MotorIndex::ALL.map(MotorUpdate::stop)
}

/// Pipeline-Zustand: Effekt-Stärke und Stopp-Watchdog
#[derive(Debug, Clone, Default)]
pub struct CommandPipeline {
    tuning: EffectTuning,
    watchdog: OneShot,
}

impl CommandPipeline {
    pub fn new(tuning: EffectTuning) -> Self {
        Self {
            tuning,
            watchdog: OneShot::new(),
        }
    }

    pub fn tuning(&self) -> &EffectTuning {
        &self.tuning
    }

    /// Verarbeitet ein Basis-Kommando und armiert den Watchdog neu
    ///
    /// Liefert das veränderte Kommando; `split()` ergibt die Queue-Einträge.
    pub fn submit(&mut self, effect: GameEffect, command: MotorCommand, now_ms: u64) -> MotorCommand {
        let applied = apply_effect(effect, command, &self.tuning);
        self.watchdog
            .arm(now_ms, watchdog_period_ms(applied.duration_secs));
        applied
    }

    /// Stopp-Updates, sobald der Watchdog abgelaufen ist
    pub fn poll_watchdog(&mut self, now_ms: u64) -> Option<[MotorUpdate; 2]> {
        if self.watchdog.poll(now_ms) {
            Some(stop_updates())
        } else {
            None
        }
    }

    pub fn watchdog_deadline(&self) -> Option<u64> {
        self.watchdog.deadline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forward(speed_a: u8, speed_b: u8, secs: u8) -> MotorCommand {
        MotorCommand::new(speed_a, Direction::Forward, speed_b, Direction::Forward, secs)
    }

    #[test]
    fn test_speed_up_near_limit_is_unchanged() {
        let tuning = EffectTuning::default();
        let cmd = forward(90, 90, 5);
        assert_eq!(apply_effect(GameEffect::SpeedUp, cmd, &tuning), cmd);
    }

    #[test]
    fn test_speed_up_adds_increment() {
        let tuning = EffectTuning::default();
        assert_eq!(
            apply_effect(GameEffect::SpeedUp, forward(50, 50, 5), &tuning),
            forward(60, 60, 5)
        );
    }

    #[test]
    fn test_speed_up_requires_both_below_limit() {
        let tuning = EffectTuning::default();
        let cmd = forward(50, 95, 5);
        assert_eq!(apply_effect(GameEffect::SpeedUp, cmd, &tuning), cmd);
    }

    #[test]
    fn test_slow_down() {
        let tuning = EffectTuning::default();
        assert_eq!(
            apply_effect(GameEffect::SlowDown, forward(50, 40, 5), &tuning),
            forward(40, 30, 5)
        );

        let slow = forward(10, 40, 5);
        assert_eq!(apply_effect(GameEffect::SlowDown, slow, &tuning), slow);
    }

    #[test]
    fn test_spin_out_overrides_command() {
        let tuning = EffectTuning::default();
        let out = apply_effect(GameEffect::SpinOut, forward(20, 20, 1), &tuning);
        assert_eq!(
            out,
            MotorCommand::new(60, Direction::Backward, 60, Direction::Forward, 10)
        );
    }

    #[test]
    fn test_off_is_identity() {
        let cmd = forward(33, 44, 2);
        assert_eq!(apply_effect(GameEffect::Off, cmd, &EffectTuning::default()), cmd);
    }

    #[test]
    fn test_watchdog_rearm_replaces_deadline() {
        let mut pipeline = CommandPipeline::default();
        pipeline.submit(GameEffect::Off, forward(50, 50, 5), 0);
        pipeline.submit(GameEffect::Off, forward(50, 50, 5), 400);

        assert_eq!(pipeline.watchdog_deadline(), Some(900));
        assert_eq!(pipeline.poll_watchdog(500), None);
        assert_eq!(pipeline.poll_watchdog(900), Some(stop_updates()));
        assert_eq!(pipeline.poll_watchdog(1_000), None);
    }

    #[test]
    fn test_stop_updates_zero_both_motors() {
        let [a, b] = stop_updates();
        assert_eq!(a, MotorUpdate::new(MotorIndex::A, 0, Direction::Forward));
        assert_eq!(b, MotorUpdate::new(MotorIndex::B, 0, Direction::Forward));
    }
}

//! Spiel-Effekte
//!
//! Wandelt eine erkannte Streckenfarbe in einen zeitlich begrenzten Effekt
//! um. Es ist immer höchstens ein Effekt aktiv; jeder neue Trigger ersetzt
//! den laufenden Effekt samt Timer.

use core::fmt;

use crate::led::{colors, FlashMode, LedSignal};
use crate::timer::OneShot;
use crate::types::ColorClass;

/// Dauer von Beschleunigung und Bremse
pub const BOOST_DURATION_MS: u64 = 10_000;

/// Dauer des Schleuderns
pub const SPIN_OUT_DURATION_MS: u64 = 1_000;

/// Sperrzeit nach einem Schleudern, in der Gelb ignoriert wird
pub const SPIN_OUT_COOLDOWN_MS: u64 = 1_000;

/// Aktiver Spiel-Effekt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum GameEffect {
    #[default]
    Off,
    SpeedUp,
    SlowDown,
    SpinOut,
}

impl GameEffect {
    pub fn name(self) -> &'static str {
        match self {
            GameEffect::Off => "off",
            GameEffect::SpeedUp => "speed_up",
            GameEffect::SlowDown => "slow_down",
            GameEffect::SpinOut => "spin_out",
        }
    }

    pub fn is_active(self) -> bool {
        self != GameEffect::Off
    }
}

impl fmt::Display for GameEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ein neu gestarteter Effekt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EffectActivation {
    pub effect: GameEffect,
    pub duration_ms: u64,
    /// Anzeige, die der Aufrufer auf den LED-Zustand anwendet
    pub signal: LedSignal,
}

/// Warum ein Farbereignis nichts bewirkt hat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IgnoreReason {
    /// Gelb innerhalb der Sperrzeit
    Cooldown { remaining_ms: u64 },
    /// Farbe ohne zugeordneten Effekt
    NoEffect,
}

/// Ergebnis eines Farbereignisses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Transition {
    Activated(EffectActivation),
    Ignored(IgnoreReason),
}

/// Zustandsmaschine der Spiel-Effekte
///
/// Besitzt den Dauer-Timer selbst. Der Besitzer ruft [`poll`](Self::poll)
/// spätestens zur [`deadline`](Self::deadline) auf.
#[derive(Debug, Clone, Default)]
pub struct GameStateMachine {
    effect: GameEffect,
    cooldown_until_ms: u64,
    duration: OneShot,
}

impl GameStateMachine {
    pub const fn new() -> Self {
        Self {
            effect: GameEffect::Off,
            cooldown_until_ms: 0,
            duration: OneShot::new(),
        }
    }

    pub fn effect(&self) -> GameEffect {
        self.effect
    }

    pub fn cooldown_until_ms(&self) -> u64 {
        self.cooldown_until_ms
    }

    /// Zeitpunkt, zu dem der aktive Effekt abläuft
    pub fn deadline(&self) -> Option<u64> {
        self.duration.deadline()
    }

    /// Verarbeitet eine erkannte Farbe zum Zeitpunkt `now_ms`
    pub fn color_detected(&mut self, color: ColorClass, now_ms: u64) -> Transition {
        let (effect, duration_ms, signal) = match color {
            ColorClass::Yellow => {
                if now_ms < self.cooldown_until_ms {
                    return Transition::Ignored(IgnoreReason::Cooldown {
                        remaining_ms: self.cooldown_until_ms - now_ms,
                    });
                }
                self.cooldown_until_ms = now_ms + SPIN_OUT_COOLDOWN_MS;
                (
                    GameEffect::SpinOut,
                    SPIN_OUT_DURATION_MS,
                    LedSignal::new(colors::YELLOW, FlashMode::FlashAll),
                )
            }
            ColorClass::Red | ColorClass::Green => (
                GameEffect::SpeedUp,
                BOOST_DURATION_MS,
                LedSignal::new(colors::RED, FlashMode::FlashFrontAlternate),
            ),
            ColorClass::Blue => (
                GameEffect::SlowDown,
                BOOST_DURATION_MS,
                LedSignal::new(colors::BLUE, FlashMode::FlashBack),
            ),
            ColorClass::Cyan | ColorClass::White | ColorClass::Unknown => {
                return Transition::Ignored(IgnoreReason::NoEffect);
            }
        };

        self.effect = effect;
        self.duration.arm(now_ms, duration_ms);

        Transition::Activated(EffectActivation {
            effect,
            duration_ms,
            signal,
        })
    }

    /// Prüft den Dauer-Timer; liefert beim Ablauf das Reset-Signal für die LEDs
    pub fn poll(&mut self, now_ms: u64) -> Option<LedSignal> {
        if self.duration.poll(now_ms) {
            Some(self.expire())
        } else {
            None
        }
    }

    /// Beendet den aktiven Effekt
    ///
    /// Mehrfacher Aufruf ist unschädlich und liefert immer dasselbe Signal.
    pub fn expire(&mut self) -> LedSignal {
        self.effect = GameEffect::Off;
        self.duration.cancel();
        LedSignal::CLEARED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "defmt")]
    #[test]
    fn test_effect_types_are_loggable() {
        fn assert_format<T: defmt::Format>() {}
        assert_format::<LedSignal>();
        assert_format::<EffectActivation>();
        assert_format::<Transition>();
    }

    fn activated(transition: Transition) -> EffectActivation {
        match transition {
            Transition::Activated(activation) => activation,
            other => panic!("expected activation, got {:?}", other),
        }
    }

    #[test]
    fn test_yellow_starts_spin_out_with_cooldown() {
        let mut game = GameStateMachine::new();
        let activation = activated(game.color_detected(ColorClass::Yellow, 2_000));

        assert_eq!(activation.effect, GameEffect::SpinOut);
        assert_eq!(activation.duration_ms, 1_000);
        assert_eq!(
            activation.signal,
            LedSignal::new(colors::YELLOW, FlashMode::FlashAll)
        );
        assert_eq!(game.cooldown_until_ms(), 3_000);
        assert_eq!(game.deadline(), Some(3_000));
    }

    #[test]
    fn test_yellow_during_cooldown_is_ignored() {
        let mut game = GameStateMachine::new();
        game.color_detected(ColorClass::Yellow, 0);

        let transition = game.color_detected(ColorClass::Yellow, 500);
        assert_eq!(
            transition,
            Transition::Ignored(IgnoreReason::Cooldown { remaining_ms: 500 })
        );
        assert_eq!(game.cooldown_until_ms(), 1_000);
        assert_eq!(game.deadline(), Some(1_000));

        // Ab Ende der Sperrzeit wieder erlaubt
        activated(game.color_detected(ColorClass::Yellow, 1_000));
    }

    #[test]
    fn test_red_and_green_speed_up() {
        for color in [ColorClass::Red, ColorClass::Green] {
            let mut game = GameStateMachine::new();
            let activation = activated(game.color_detected(color, 0));
            assert_eq!(activation.effect, GameEffect::SpeedUp);
            assert_eq!(activation.duration_ms, 10_000);
            assert_eq!(activation.signal.flash_mode, FlashMode::FlashFrontAlternate);
            assert_eq!(activation.signal.indicator, colors::RED);
        }
    }

    #[test]
    fn test_blue_slows_down() {
        let mut game = GameStateMachine::new();
        let activation = activated(game.color_detected(ColorClass::Blue, 0));
        assert_eq!(activation.effect, GameEffect::SlowDown);
        assert_eq!(
            activation.signal,
            LedSignal::new(colors::BLUE, FlashMode::FlashBack)
        );
    }

    #[test]
    fn test_colors_without_effect() {
        let mut game = GameStateMachine::new();
        for color in [ColorClass::Cyan, ColorClass::White, ColorClass::Unknown] {
            assert_eq!(
                game.color_detected(color, 0),
                Transition::Ignored(IgnoreReason::NoEffect)
            );
        }
        assert_eq!(game.effect(), GameEffect::Off);
        assert_eq!(game.deadline(), None);
    }

    #[test]
    fn test_last_trigger_wins() {
        let mut game = GameStateMachine::new();
        game.color_detected(ColorClass::Red, 0);
        game.color_detected(ColorClass::Blue, 4_000);

        assert_eq!(game.effect(), GameEffect::SlowDown);
        assert_eq!(game.poll(10_000), None);
        assert_eq!(game.poll(14_000), Some(LedSignal::CLEARED));
        assert_eq!(game.effect(), GameEffect::Off);
    }

    #[test]
    fn test_expire_is_idempotent() {
        let mut game = GameStateMachine::new();
        game.color_detected(ColorClass::Blue, 0);

        assert_eq!(game.expire(), LedSignal::CLEARED);
        assert_eq!(game.expire(), LedSignal::CLEARED);
        assert_eq!(game.effect(), GameEffect::Off);
        assert_eq!(game.poll(20_000), None);
    }
}

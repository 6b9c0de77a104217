// LEDC PWM für die beiden H-Brücken
//
// Vier Low-Speed-Kanäle an einem gemeinsamen 10-Bit Timer (15 kHz):
// Kanal 0/1 = Motor A vorwärts/rückwärts, Kanal 2/3 = Motor B.
// Pro Motor entsteht eine eigene Brücke (`LedcMotorPwm`).

use esp_hal::gpio::AnyPin;
use esp_hal::ledc::channel::{self, ChannelHW, ChannelIFace};
use esp_hal::ledc::timer::{self, TimerIFace};
use esp_hal::ledc::{LSGlobalClkSource, Ledc, LowSpeed};
use esp_hal::time::Rate;
use racer_core::{BridgeLeg, MotorIndex, MotorPwm, PwmChannel, PwmError};
use static_cell::StaticCell;

use crate::config::MOTOR_PWM_FREQUENCY_KHZ;

/// Timer muss 'static sein, da die Kanäle ihn referenzieren
static MOTOR_TIMER: StaticCell<timer::Timer<'static, LowSpeed>> = StaticCell::new();

/// Die vier Brücken-Pins (mit `degrade()` auf `AnyPin` gebracht)
pub struct MotorPins {
    pub a_forward: AnyPin<'static>,
    pub a_backward: AnyPin<'static>,
    pub b_forward: AnyPin<'static>,
    pub b_backward: AnyPin<'static>,
}

/// Real Hardware H-Brücke eines Motors über LEDC
///
/// Jeder Motor-Task besitzt genau eine Brücke, damit Rampen der beiden
/// Motoren unabhängig voneinander laufen.
pub struct LedcMotorPwm {
    motor: MotorIndex,
    /// [Vorwärts, Rückwärts]
    channels: [channel::Channel<'static, LowSpeed>; 2],
}

impl LedcMotorPwm {
    /// Konfiguriert Timer und Kanäle; alle Duty-Werte starten bei 0
    ///
    /// Liefert die Brücken von Motor A und B (Index = `MotorIndex::as_usize()`).
    /// Darf nur einmal aufgerufen werden (StaticCell für den Timer).
    pub fn split(
        ledc_peripheral: esp_hal::peripherals::LEDC<'static>,
        pins: MotorPins,
    ) -> Result<[Self; 2], PwmError> {
        let mut ledc = Ledc::new(ledc_peripheral);
        ledc.set_global_slow_clock(LSGlobalClkSource::APBClk);

        let motor_timer = MOTOR_TIMER.init(ledc.timer::<LowSpeed>(timer::Number::Timer0));
        motor_timer
            .configure(timer::config::Config {
                duty: timer::config::Duty::Duty10Bit,
                clock_source: timer::LSClockSource::APBClk,
                frequency: Rate::from_khz(MOTOR_PWM_FREQUENCY_KHZ),
            })
            .map_err(|_| PwmError::WriteFailed)?;

        let MotorPins {
            a_forward,
            a_backward,
            b_forward,
            b_backward,
        } = pins;

        let configure = |number: channel::Number, pin: AnyPin<'static>| {
            let mut ch = ledc.channel(number, pin);
            ch.configure(channel::config::Config {
                timer: &*motor_timer,
                duty_pct: 0,
                pin_config: channel::config::PinConfig::PushPull,
            })
            .map(|_| ch)
            .map_err(|_| PwmError::WriteFailed)
        };

        let motor_a = Self {
            motor: MotorIndex::A,
            channels: [
                configure(channel::Number::Channel0, a_forward)?,
                configure(channel::Number::Channel1, a_backward)?,
            ],
        };
        let motor_b = Self {
            motor: MotorIndex::B,
            channels: [
                configure(channel::Number::Channel2, b_forward)?,
                configure(channel::Number::Channel3, b_backward)?,
            ],
        };

        Ok([motor_a, motor_b])
    }

    pub fn motor(&self) -> MotorIndex {
        self.motor
    }
}

impl MotorPwm for LedcMotorPwm {
    fn set_duty(&mut self, channel: PwmChannel, duty: u16) -> Result<(), PwmError> {
        let leg = match channel.leg {
            BridgeLeg::Forward => 0,
            BridgeLeg::Backward => 1,
        };
        if channel.motor != self.motor {
            return Err(PwmError::ForeignMotor(channel.motor));
        }
        self.channels[leg].set_duty_hw(u32::from(duty));
        Ok(())
    }
}

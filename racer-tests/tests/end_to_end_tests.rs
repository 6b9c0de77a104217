//! End-to-End: Trigger → Burst → Klassifikation → Effekt → Kommando → PWM
//!
//! Spielt die Arbeit der Firmware-Tasks mit expliziten Zeitstempeln nach.

mod common;

use common::{MockLedWriter, MockMotorPwm};
use racer_core::led::colors;
use racer_core::{
    classify, BridgeLeg, ColorClass, ColorSample, CommandPipeline, Debouncer, Direction,
    EffectTuning, FlashMode, GameEffect, GameStateMachine, LedRenderer, LedState, MotorActuator,
    MotorCommand, MotorIndex, MotorUpdate, SampleBuffer, SmartLedWriter, Transition,
};

const BLUE_SAMPLE: ColorSample = ColorSample::new(12_093, 23_398, 31_486, u16::MAX);

struct Racer {
    debouncer: Debouncer,
    samples: SampleBuffer,
    game: GameStateMachine,
    pipeline: CommandPipeline,
    motors: MotorActuator<MockMotorPwm>,
    leds: LedState,
}

impl Racer {
    fn new(tuning: EffectTuning) -> Self {
        Self {
            debouncer: Debouncer::default(),
            samples: SampleBuffer::new(),
            game: GameStateMachine::new(),
            pipeline: CommandPipeline::new(tuning),
            motors: MotorActuator::new(MockMotorPwm::new()),
            leds: LedState::new(),
        }
    }

    /// Sensor-Task: Burst einlesen, mitteln, klassifizieren
    fn trigger(&mut self, now: u64, burst: &[ColorSample]) -> Option<ColorClass> {
        if !self.debouncer.accept(now) {
            return None;
        }
        for sample in burst {
            self.samples.put(*sample);
        }
        Some(classify(&self.samples.average()))
    }

    /// Game-Task
    fn color(&mut self, color: ColorClass, now: u64) {
        if let Transition::Activated(activation) = self.game.color_detected(color, now) {
            self.leds.show_signal(activation.signal);
        }
    }

    /// Motor-Task
    fn dispatch(&mut self, updates: [MotorUpdate; 2]) {
        for update in updates {
            self.motors
                .soft_start_blocking(update.motor, update.speed_percent, update.direction, |_| {})
                .unwrap();
        }
    }
}

#[test]
fn test_blue_burst_slows_down_and_watchdog_stops() {
    let tuning = EffectTuning {
        decrement: 30,
        ..EffectTuning::default()
    };
    let mut racer = Racer::new(tuning);

    let color = racer.trigger(1_000, &[BLUE_SAMPLE; 5]).unwrap();
    assert_eq!(color, ColorClass::Blue);

    racer.color(color, 1_025);
    assert_eq!(racer.game.effect(), GameEffect::SlowDown);
    assert_eq!(racer.leds.flash_mode, FlashMode::FlashBack);
    assert_eq!(racer.leds.indicator, colors::BLUE);

    let base = MotorCommand::new(80, Direction::Forward, 80, Direction::Forward, 5);
    let applied = racer.pipeline.submit(racer.game.effect(), base, 2_000);
    assert_eq!(
        applied,
        MotorCommand::new(50, Direction::Forward, 50, Direction::Forward, 5)
    );

    racer.dispatch(applied.split());
    for motor in MotorIndex::ALL {
        assert_eq!(racer.motors.state(motor).speed_percent, 50);
        assert!(racer.motors.pwm().duty_of(motor, BridgeLeg::Forward) > 0);
    }

    assert_eq!(racer.pipeline.poll_watchdog(2_499), None);
    let stop = racer.pipeline.poll_watchdog(2_500).unwrap();
    racer.dispatch(stop);

    for motor in MotorIndex::ALL {
        assert_eq!(racer.motors.state(motor).speed_percent, 0);
        assert_eq!(racer.motors.pwm().duty_of(motor, BridgeLeg::Forward), 0);
        assert_eq!(racer.motors.pwm().duty_of(motor, BridgeLeg::Backward), 0);
    }
    assert!(!racer.motors.pwm().shoot_through);
}

#[test]
fn test_bounced_trigger_is_ignored() {
    let mut racer = Racer::new(EffectTuning::default());
    assert!(racer.trigger(0, &[BLUE_SAMPLE; 5]).is_some());
    assert!(racer.trigger(150, &[BLUE_SAMPLE; 5]).is_none());
}

#[test]
fn test_spin_out_reverses_motor_a() {
    let mut racer = Racer::new(EffectTuning::default());
    racer.color(ColorClass::Yellow, 0);

    let base = MotorCommand::new(40, Direction::Forward, 40, Direction::Forward, 2);
    let applied = racer.pipeline.submit(racer.game.effect(), base, 10);
    racer.dispatch(applied.split());

    let pwm = racer.motors.pwm();
    assert_eq!(pwm.duty_of(MotorIndex::A, BridgeLeg::Forward), 0);
    assert!(pwm.duty_of(MotorIndex::A, BridgeLeg::Backward) > 0);
    assert!(pwm.duty_of(MotorIndex::B, BridgeLeg::Forward) > 0);
    assert_eq!(racer.pipeline.watchdog_deadline(), Some(1_010));
}

#[test]
fn test_effect_expiry_reaches_the_strip() {
    let mut racer = Racer::new(EffectTuning::default());
    let mut renderer = LedRenderer::new();
    let mut writer = MockLedWriter::new();
    racer.leds.set_headlight(colors::CYAN);

    racer.color(ColorClass::Red, 0);
    writer.write(&renderer.tick(Some(&racer.leds))).unwrap();
    writer.write(&renderer.tick(Some(&racer.leds))).unwrap();
    let frame = writer.last_frame.unwrap();
    assert_eq!((frame[0], frame[1]), (colors::CYAN, colors::OFF));
    assert_eq!(frame[4], colors::RED);

    let signal = racer.game.poll(10_000).unwrap();
    racer.leds.show_signal(signal);
    writer.write(&renderer.tick(Some(&racer.leds))).unwrap();
    assert_eq!(
        writer.last_frame,
        Some([colors::CYAN, colors::CYAN, colors::RED, colors::RED, colors::OFF])
    );
}

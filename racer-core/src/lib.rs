//! Racer Core - Platform-agnostic Logic and Traits
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Sie definiert Traits, Zustandsmaschinen und Pure Functions.
//! Zeit wird überall als expliziter Millisekunden-Zeitstempel übergeben.

#![no_std]

pub mod battery;
pub mod classifier;
pub mod debounce;
pub mod game;
pub mod led;
pub mod motor;
pub mod pipeline;
pub mod ring_buffer;
pub mod timer;
pub mod traits;
pub mod types;

// Re-exports für einfachen Zugriff
pub use battery::{millivolts_from_raw, BatteryEvent, BatteryMonitor};
pub use classifier::classify;
pub use debounce::Debouncer;
pub use game::{EffectActivation, GameEffect, GameStateMachine, IgnoreReason, Transition};
pub use led::{render_frame, FlashMode, LedFrame, LedRenderer, LedSignal, LedState, LedZone};
pub use motor::{MotorActuator, MotorRuntimeState, RampStep, SoftStartRamp};
pub use pipeline::{apply_effect, CommandPipeline, EffectTuning};
pub use ring_buffer::{SampleBuffer, SampleRingBuffer};
pub use timer::OneShot;
pub use traits::{BridgeLeg, LedError, MotorPwm, PwmChannel, PwmError, SmartLedWriter};
pub use types::{
    parse_headlight, ColorClass, ColorSample, CommandError, Direction, MotorCommand, MotorIndex,
    MotorUpdate, RawRgbc,
};

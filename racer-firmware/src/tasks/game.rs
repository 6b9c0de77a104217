// Game Task - Farbereignisse und Ablauf der Spiel-Effekte
use core::future::pending;
use defmt::info;
use embassy_futures::select::{Either, select};
use embassy_time::{Instant, Timer};
use racer_core::{GameEffect, GameStateMachine, IgnoreReason, LedSignal, Transition};

use crate::{ActiveEffect, ColorReceiver, SharedLedState, Telemetry, TelemetryPublisher};

/// Game Task
///
/// Einziger Schreiber des aktiven Effekts. Farbereignis und Ablauf des
/// Effekt-Timers werden in derselben Schleife behandelt und können sich
/// daher nicht überholen.
#[embassy_executor::task]
pub async fn game_task(
    colors: ColorReceiver,
    effect: &'static ActiveEffect,
    led_state: &'static SharedLedState,
    publisher: TelemetryPublisher,
) {
    let mut game = GameStateMachine::new();
    info!("Game: Task started");

    loop {
        let deadline = game.deadline();
        let expiry = async move {
            match deadline {
                Some(deadline) => Timer::at(Instant::from_millis(deadline)).await,
                None => pending::<()>().await,
            }
        };

        match select(colors.receive(), expiry).await {
            Either::First(color) => {
                let now = Instant::now().as_millis();
                match game.color_detected(color, now) {
                    Transition::Activated(activation) => {
                        info!(
                            "Game: {} -> {} for {} ms",
                            color, activation.effect, activation.duration_ms
                        );
                        publish_effect(
                            effect,
                            led_state,
                            &publisher,
                            activation.effect,
                            activation.signal,
                        )
                        .await;
                    }
                    Transition::Ignored(IgnoreReason::Cooldown { remaining_ms }) => {
                        info!("Game: {} ignored, cooldown {} ms left", color, remaining_ms);
                    }
                    Transition::Ignored(IgnoreReason::NoEffect) => {}
                }
            }
            Either::Second(()) => {
                if let Some(signal) = game.poll(Instant::now().as_millis()) {
                    info!("Game: Effect expired");
                    publish_effect(effect, led_state, &publisher, GameEffect::Off, signal).await;
                }
            }
        }
    }
}

/// Setzt Effekt und LED-Anzeige und meldet den Wechsel als Telemetrie
async fn publish_effect(
    effect: &'static ActiveEffect,
    led_state: &'static SharedLedState,
    publisher: &TelemetryPublisher,
    new_effect: GameEffect,
    signal: LedSignal,
) {
    effect.lock(|cell| cell.set(new_effect));

    // Der Lock wird hier ohne Timeout genommen: das Signal darf nicht verloren gehen
    led_state.lock().await.show_signal(signal);

    publisher.publish_immediate(Telemetry::Effect { effect: new_effect });
}

// Controller Task - Fahrkommandos → Spiel-Effekt → Motor-Queues
use core::future::pending;
use defmt::{error, info, warn};
use embassy_futures::select::{Either, select};
use embassy_time::{Instant, Timer};
use racer_core::{CommandPipeline, EffectTuning, MotorUpdate};

use crate::{ActiveEffect, CommandSignal, MotorQueues, current_effect};

/// Controller Task
///
/// Wartet gleichzeitig auf ein neues Kommando und auf den Ablauf des
/// Stopp-Watchdogs. Jedes Kommando wird mit dem aktiven Effekt verrechnet,
/// in zwei Motor-Updates zerlegt und armiert den Watchdog neu. Läuft der
/// Watchdog ab, gehen Stopp-Updates an beide Motoren.
#[embassy_executor::task]
pub async fn controller_task(
    commands: &'static CommandSignal,
    effect: &'static ActiveEffect,
    queues: &'static MotorQueues,
) {
    let mut pipeline = CommandPipeline::new(EffectTuning::default());
    info!("Controller: Task started");

    loop {
        let deadline = pipeline.watchdog_deadline();
        let watchdog = async move {
            match deadline {
                Some(deadline) => Timer::at(Instant::from_millis(deadline)).await,
                None => pending::<()>().await,
            }
        };

        match select(commands.wait(), watchdog).await {
            Either::First(command) => {
                let active = current_effect(effect);
                let now = Instant::now().as_millis();
                let applied = pipeline.submit(active, command, now);
                info!(
                    "Controller: {} under {} -> {}",
                    command, active, applied
                );
                dispatch(queues, applied.split());
            }
            Either::Second(()) => {
                if let Some(stop) = pipeline.poll_watchdog(Instant::now().as_millis()) {
                    warn!("Controller: Command expired, stopping motors");
                    dispatch(queues, stop);
                }
            }
        }
    }
}

/// Reiht die Updates ohne zu warten ein; volle Queues verwerfen das Update
fn dispatch(queues: &'static MotorQueues, updates: [MotorUpdate; 2]) {
    for update in updates {
        if queues[update.motor.as_usize()].try_send(update).is_err() {
            error!("Controller: Queue for motor {} full, dropping update", update.motor);
        }
    }
}

// Motor Tasks - Eine Instanz pro Motor arbeitet dessen Queue ab
use defmt::{error, info};
use embassy_time::{Duration, Timer};
use racer_core::{MotorActuator, MotorIndex, MotorPwm, MotorUpdate};

use crate::MotorQueue;
use crate::hal::LedcMotorPwm;

/// Motor Logic - Testbare Schleife über den `MotorPwm` Trait
///
/// Wartet auf Updates für genau einen Motor. Jedes Update fährt eine
/// Soft-Start-Rampe; die Haltezeiten werden mit `Timer::after` abgewartet,
/// eine laufende Rampe wird nicht unterbrochen. Der andere Motor hat seinen
/// eigenen Task und wird davon nicht aufgehalten.
pub async fn motor_logic<P: MotorPwm>(
    motor: MotorIndex,
    mut actuator: MotorActuator<P>,
    queue: &'static MotorQueue,
) {
    loop {
        let update = queue.receive().await;
        if update.motor != motor {
            error!("Motor {}: Update for motor {} ignored", motor, update.motor);
            continue;
        }
        soft_start(&mut actuator, update).await;
    }
}

/// Fährt die Rampe für ein Update und speichert das Ziel als neuen Anker
///
/// PWM-Fehler werden geloggt; die Rampe läuft trotzdem zu Ende, damit der
/// gespeicherte Zustand zum letzten Kommando passt.
async fn soft_start<P: MotorPwm>(actuator: &mut MotorActuator<P>, update: MotorUpdate) {
    let MotorUpdate {
        motor,
        speed_percent,
        direction,
    } = update;

    info!(
        "Motor {}: -> {}% {}",
        motor,
        speed_percent,
        direction.name()
    );

    let mut ramp = actuator.soft_start_ramp(motor, speed_percent, direction);
    for step in ramp.by_ref() {
        if let Err(e) = actuator.apply_step(motor, &step) {
            error!("Motor {}: PWM write failed: {}", motor, e);
        }
        if step.hold_ms > 0 {
            Timer::after(Duration::from_millis(u64::from(step.hold_ms))).await;
        }
    }
    actuator.complete_soft_start(motor, &ramp);
}

/// Motor Task - Embassy Task mit echter LEDC-Brücke
///
/// Wird pro `MotorIndex` einmal gespawnt.
#[embassy_executor::task(pool_size = 2)]
pub async fn motor_task(pwm: LedcMotorPwm, queue: &'static MotorQueue) {
    let motor = pwm.motor();
    info!("Motor {}: Task started", motor);
    motor_logic(motor, MotorActuator::new(pwm), queue).await;
}

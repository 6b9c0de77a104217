// Battery Task - Akkuspannung überwachen und Warnung anzeigen
use defmt::{info, warn};
use embassy_time::{Duration, Timer};
use racer_core::battery::BATTERY_CHECK_INTERVAL_MS;
use racer_core::{BatteryEvent, BatteryMonitor, millivolts_from_raw};

use crate::config::BATTERY_REPORT_EVERY;
use crate::hal::BatteryAdc;
use crate::{SharedLedState, Telemetry, TelemetryPublisher};

/// Battery Task
///
/// Misst alle 100 ms. Übergänge (leer / erholt) werden einmal geloggt und
/// sofort veröffentlicht, sonst nur jede `BATTERY_REPORT_EVERY`-te Messung.
#[embassy_executor::task]
pub async fn battery_task(
    mut adc: BatteryAdc,
    led_state: &'static SharedLedState,
    publisher: TelemetryPublisher,
) {
    let mut monitor = BatteryMonitor::new();
    let mut checks: u32 = 0;
    info!("Battery: Task started");

    loop {
        let millivolts = millivolts_from_raw(adc.read_raw().await);
        let event = monitor.update(millivolts);

        match event {
            Some(BatteryEvent::Low { millivolts }) => {
                warn!("Battery: Low voltage {} mV", millivolts);
            }
            Some(BatteryEvent::Recovered { millivolts }) => {
                info!("Battery: Recovered at {} mV", millivolts);
            }
            None => {}
        }

        if monitor.is_low() || event.is_some() {
            monitor.apply(event, &mut *led_state.lock().await);
        }

        checks = checks.wrapping_add(1);
        if event.is_some() || checks % BATTERY_REPORT_EVERY == 0 {
            publisher.publish_immediate(Telemetry::Battery {
                millivolts,
                low: monitor.is_low(),
            });
        }

        Timer::after(Duration::from_millis(BATTERY_CHECK_INTERVAL_MS)).await;
    }
}

// LED Render Task - Zeichnet den 5-Zonen Strip über RMT
use defmt::{error, warn};
use embassy_time::{Duration, Timer, with_timeout};
use esp_hal_smartled::smart_led_buffer;
use racer_core::led::NUM_ZONES;
use racer_core::{LedRenderer, SmartLedWriter};

use crate::SharedLedState;
use crate::config::{LED_LOCK_TIMEOUT_MS, RMT_CLOCK_MHZ};
use crate::hal::RmtLedWriter;

/// LED Render Logic - Testbare Schleife ohne Hardware-Abhängigkeit
///
/// Pro Tick:
/// - Lock auf den gemeinsamen Zustand (mit Timeout) und Kopie ziehen
/// - Bei Timeout mit dem letzten Snapshot weiterzeichnen (Degraded Mode)
/// - Frame über den `SmartLedWriter` ausgeben
/// - `BASE_TICK_MS` warten, beim Blinken zusätzlich die Blinkperiode
///
/// Der Lock wird nie über das Schreiben auf den Strip gehalten.
pub async fn led_render_logic<L: SmartLedWriter>(mut led: L, led_state: &'static SharedLedState) {
    let mut renderer = LedRenderer::new();
    let mut degraded = false;

    loop {
        let fresh = with_timeout(Duration::from_millis(LED_LOCK_TIMEOUT_MS), led_state.lock())
            .await
            .ok()
            .map(|guard| *guard);

        match (fresh.is_some(), degraded) {
            (false, false) => {
                warn!("LED: State lock timed out, rendering last snapshot");
                degraded = true;
            }
            (true, true) => degraded = false,
            _ => {}
        }

        let frame = renderer.tick(fresh.as_ref());

        if let Err(e) = led.write(&frame) {
            error!("LED: Failed to write frame: {}", e);
        }

        Timer::after(Duration::from_millis(u64::from(renderer.tick_period_ms()))).await;
    }
}

/// LED Render Task - Embassy Task für parallele Ausführung
///
/// Initialisiert RMT + Strip und ruft dann `led_render_logic()` auf.
#[embassy_executor::task]
pub async fn led_task(
    gpio8: esp_hal::peripherals::GPIO8<'static>,
    rmt_peripheral: esp_hal::peripherals::RMT<'static>,
    led_state: &'static SharedLedState,
) {
    let mut rmt_buffer = smart_led_buffer!(NUM_ZONES);

    let led = match RmtLedWriter::new(gpio8, rmt_peripheral, RMT_CLOCK_MHZ, &mut rmt_buffer) {
        Ok(led) => led,
        Err(e) => {
            error!("LED: RMT init failed: {}", e);
            return;
        }
    };

    led_render_logic(led, led_state).await;
}

// Sensor Tasks - Trigger-Flanke entprellen, Farbe messen und klassifizieren
use defmt::{debug, error, info, warn};
use embassy_time::{Duration, Instant, Timer};
use esp_hal::gpio::{Input, InputConfig, Pull};
use racer_core::{ColorSample, Debouncer, SampleBuffer, classify};

use crate::config::{
    SAMPLE_SETTLE_MS, SAMPLE_SPACING_MS, SAMPLES_PER_BURST, SENSOR_RETRY_DELAY_SECS,
};
use crate::hal::{ColorSensor, SensorError};
use crate::{ColorSender, Telemetry, TelemetryPublisher, TriggerReceiver, TriggerSender};

/// Trigger Task
///
/// Wartet auf fallende Flanken am Trigger-Eingang (Pull-Up). Flanken
/// innerhalb des Entprell-Fensters werden verworfen, alle anderen landen
/// ohne Warten in der Trigger-Queue.
#[embassy_executor::task]
pub async fn trigger_task(pin: esp_hal::peripherals::GPIO10<'static>, triggers: TriggerSender) {
    let mut input = Input::new(pin, InputConfig::default().with_pull(Pull::Up));
    let mut debouncer = Debouncer::default();

    loop {
        input.wait_for_falling_edge().await;

        if !debouncer.accept(Instant::now().as_millis()) {
            continue;
        }

        if triggers.try_send(()).is_err() {
            error!("Sensor: Trigger queue full, dropping edge");
        }
    }
}

/// Sensor Task
///
/// Pro Trigger ein Burst: nach `SAMPLE_SETTLE_MS` eine Messung, danach vier
/// weitere im Abstand von `SAMPLE_SPACING_MS`. Der Mittelwert des
/// Ringpuffers wird klassifiziert und an den Game-Task übergeben.
#[embassy_executor::task]
pub async fn sensor_task(
    mut sensor: ColorSensor,
    triggers: TriggerReceiver,
    colors: ColorSender,
    publisher: TelemetryPublisher,
) {
    while let Err(e) = sensor.init().await {
        error!(
            "Sensor: Init failed: {}, retrying in {}s",
            e, SENSOR_RETRY_DELAY_SECS
        );
        Timer::after(Duration::from_secs(SENSOR_RETRY_DELAY_SECS)).await;
    }
    info!("Sensor: TCS3400 ready");

    // Startet mit Nullen; die ersten Bursts sind dadurch abgeschwächt
    let mut samples = SampleBuffer::new();

    loop {
        triggers.receive().await;

        Timer::after(Duration::from_millis(SAMPLE_SETTLE_MS)).await;
        for i in 0..SAMPLES_PER_BURST {
            if i > 0 {
                Timer::after(Duration::from_millis(SAMPLE_SPACING_MS)).await;
            }
            match read_sample(&mut sensor).await {
                Ok(Some(sample)) => samples.put(sample),
                Ok(None) => debug!("Sensor: Dark frame skipped"),
                Err(e) => warn!("Sensor: Read failed: {}", e),
            }
        }

        let average = samples.average();
        let color = classify(&average);
        info!(
            "Sensor: avg=({}, {}, {}) -> {}",
            average.red,
            average.green,
            average.blue,
            color.name()
        );

        publisher.publish_immediate(Telemetry::Color { color });
        colors.send(color).await;
    }
}

/// Liest und normalisiert eine Messung; `None` bei zu dunklem Frame
async fn read_sample(sensor: &mut ColorSensor) -> Result<Option<ColorSample>, SensorError> {
    let raw = sensor.read_raw().await?;
    Ok(ColorSample::normalized(raw))
}

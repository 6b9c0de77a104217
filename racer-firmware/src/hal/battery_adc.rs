// Akku-Messung über ADC1 (GPIO2, 11 dB Dämpfung)
//
// Die Umrechnung Counts → Millivolt liegt in racer-core
// (`millivolts_from_raw`), hier wird nur der Rohwert gelesen.

use esp_hal::Async;
use esp_hal::analog::adc::{Adc, AdcConfig, AdcPin, Attenuation};
use esp_hal::peripherals::{ADC1, GPIO2};

pub struct BatteryAdc {
    adc: Adc<'static, ADC1<'static>, Async>,
    pin: AdcPin<GPIO2<'static>, ADC1<'static>>,
}

impl BatteryAdc {
    pub fn new(adc1: ADC1<'static>, gpio2: GPIO2<'static>) -> Self {
        let mut config = AdcConfig::new();
        let pin = config.enable_pin(gpio2, Attenuation::_11dB);
        let adc = Adc::new(adc1, config).into_async();

        Self { adc, pin }
    }

    /// Eine Oneshot-Messung (12 Bit Rohwert)
    pub async fn read_raw(&mut self) -> u16 {
        self.adc.read_oneshot(&mut self.pin).await
    }
}

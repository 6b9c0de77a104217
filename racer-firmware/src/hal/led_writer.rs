// WS2812 Writer für den 5-Zonen LED-Strip
//
// Implementiert `SmartLedWriter` aus racer-core über das RMT Peripheral.

use esp_hal::Blocking;
use esp_hal::rmt::Rmt;
use esp_hal::time::Rate;
use esp_hal_smartled::SmartLedsAdapter;
use racer_core::led::NUM_ZONES;
use racer_core::{LedError, LedFrame, SmartLedWriter};
use smart_leds_trait::SmartLedsWrite;

/// RMT Pulse-Buffer: 24 Bit pro LED + 1 Reset-Puls
pub const LED_BUFFER_SIZE: usize = NUM_ZONES * 24 + 1;

/// Real Hardware LED Writer
///
/// Der Pulse-Buffer muss länger leben als der Writer, daher wird er im
/// Task erstellt (`smart_led_buffer!`) und hier nur ausgeliehen.
pub struct RmtLedWriter<'a> {
    strip: SmartLedsAdapter<'a, LED_BUFFER_SIZE>,
}

impl<'a> RmtLedWriter<'a> {
    /// Erstellt den Writer
    ///
    /// # Parameter
    /// - `gpio8`: Datenleitung des Strips
    /// - `rmt_peripheral`: RMT Peripheral
    /// - `rmt_clock_mhz`: RMT Clock Frequenz in MHz (z.B. 80)
    /// - `buffer`: Pulse-Buffer (erstellt mit `smart_led_buffer!(NUM_ZONES)`)
    pub fn new(
        gpio8: esp_hal::peripherals::GPIO8<'a>,
        rmt_peripheral: esp_hal::peripherals::RMT<'a>,
        rmt_clock_mhz: u32,
        buffer: &'a mut [esp_hal::rmt::PulseCode; LED_BUFFER_SIZE],
    ) -> Result<Self, LedError> {
        let rmt: Rmt<'a, Blocking> = Rmt::new(rmt_peripheral, Rate::from_mhz(rmt_clock_mhz))
            .map_err(|_| LedError::WriteFailed)?;

        let strip = SmartLedsAdapter::new(rmt.channel0, gpio8, buffer);
        Ok(Self { strip })
    }
}

impl<'a> SmartLedWriter for RmtLedWriter<'a> {
    fn write(&mut self, frame: &LedFrame) -> Result<(), LedError> {
        self.strip
            .write(frame.iter().copied())
            .map_err(|_| LedError::WriteFailed)
    }
}

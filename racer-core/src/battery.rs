//! Akku-Überwachung
//!
//! Der ADC misst die Akkuspannung über einen 10k-Widerstand, der mit dem
//! internen Eingangswiderstand einen Teiler bildet. Die Umrechnung ist daher
//! eine Geradengleichung statt einer reinen Skalierung.

use crate::led::{colors, FlashMode, LedState, RUN_FLASH_PERIOD_MS};

/// Unterhalb dieser Spannung wird gewarnt
pub const LOW_BATTERY_MV: u32 = 3_300;

/// Blinkperiode der Indikator-LED bei leerem Akku
pub const LOW_BATTERY_FLASH_PERIOD_MS: u32 = 200;

/// Prüfintervall
pub const BATTERY_CHECK_INTERVAL_MS: u64 = 100;

/// Rechnet ADC-Counts in Millivolt um
///
/// `mV = 1.4925 * raw - 511.83`, in Ganzzahlen, bei 0 gesättigt.
///
/// ```
/// # use racer_core::battery::millivolts_from_raw;
/// assert_eq!(millivolts_from_raw(2556), 3303);
/// assert_eq!(millivolts_from_raw(0), 0);
/// ```
pub fn millivolts_from_raw(raw: u16) -> u32 {
    (14_925 * u32::from(raw)).saturating_sub(5_118_300) / 10_000
}

/// Zustandswechsel der Akku-Überwachung
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BatteryEvent {
    Low { millivolts: u32 },
    Recovered { millivolts: u32 },
}

/// Latch für die Unterspannungswarnung
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatteryMonitor {
    low: bool,
}

impl BatteryMonitor {
    pub const fn new() -> Self {
        Self { low: false }
    }

    pub fn is_low(&self) -> bool {
        self.low
    }

    /// Verarbeitet eine Messung; liefert nur bei Zustandswechsel ein Event
    pub fn update(&mut self, millivolts: u32) -> Option<BatteryEvent> {
        let below = millivolts < LOW_BATTERY_MV;

        match (self.low, below) {
            (false, true) => {
                self.low = true;
                Some(BatteryEvent::Low { millivolts })
            }
            (true, false) => {
                self.low = false;
                Some(BatteryEvent::Recovered { millivolts })
            }
            _ => None,
        }
    }

    /// Spiegelt den Latch auf den LED-Zustand
    ///
    /// Solange der Akku leer ist, wird die Warnung bei jeder Prüfung erneut
    /// gesetzt (Spiel-Effekte überschreiben den Indikator sonst). Nach der
    /// Erholung wird nur zurückgesetzt, wenn die Warnung noch angezeigt wird.
    pub fn apply(&self, event: Option<BatteryEvent>, state: &mut LedState) {
        if self.low {
            state.set_indicator(colors::RED);
            state.set_flash_mode(FlashMode::FlashIndicator);
            state.set_flash_period(LOW_BATTERY_FLASH_PERIOD_MS);
        } else if let Some(BatteryEvent::Recovered { .. }) = event {
            if state.flash_mode == FlashMode::FlashIndicator {
                state.set_indicator(colors::OFF);
                state.set_flash_mode(FlashMode::Const);
            }
            state.set_flash_period(RUN_FLASH_PERIOD_MS);
        }
    }
}

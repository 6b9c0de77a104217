// TCS3400 Farbsensor (I2C, async)
//
// Liefert Roh-RGBC-Werte; die Normalisierung auf den Clear-Kanal passiert
// in racer-core (`ColorSample::normalized`).

use esp_hal::Async;
use esp_hal::i2c::master::{Config, I2c};
use esp_hal::time::Rate;
use racer_core::RawRgbc;

use crate::config::{COLOR_SENSOR_ADDR, I2C_FREQUENCY_KHZ};

/// ENABLE: Power On + ADC Enable
const REG_ENABLE: u8 = 0x80;
const ENABLE_PON_AEN: u8 = 0x03;

/// CONTROL: Gain 16x
const REG_CONTROL: u8 = 0x8F;
const GAIN_16X: u8 = 0x02;

/// Erstes Datenregister (CDATAL); es folgen R, G, B jeweils Low/High
const REG_CDATAL: u8 = 0x94;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// I2C-Konfiguration abgelehnt
    BusConfig,
    /// Sensor antwortet nicht auf Schreibzugriff
    WriteFailed,
    /// Datenregister konnten nicht gelesen werden
    ReadFailed,
}

impl defmt::Format for SensorError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            SensorError::BusConfig => defmt::write!(fmt, "I2C config rejected"),
            SensorError::WriteFailed => defmt::write!(fmt, "Register write failed"),
            SensorError::ReadFailed => defmt::write!(fmt, "Data read failed"),
        }
    }
}

/// Real Hardware Farbsensor
pub struct ColorSensor {
    i2c: I2c<'static, Async>,
}

impl ColorSensor {
    /// Öffnet den I2C-Bus (SCL/SDA laut Pin-Belegung)
    pub fn new(
        i2c0: esp_hal::peripherals::I2C0<'static>,
        scl: esp_hal::peripherals::GPIO0<'static>,
        sda: esp_hal::peripherals::GPIO1<'static>,
    ) -> Result<Self, SensorError> {
        let config = Config::default().with_frequency(Rate::from_khz(I2C_FREQUENCY_KHZ));
        let i2c = I2c::new(i2c0, config)
            .map_err(|_| SensorError::BusConfig)?
            .with_scl(scl)
            .with_sda(sda)
            .into_async();

        Ok(Self { i2c })
    }

    /// Schaltet den Sensor ein und setzt die Verstärkung
    pub async fn init(&mut self) -> Result<(), SensorError> {
        self.write_register(REG_ENABLE, ENABLE_PON_AEN).await?;
        self.write_register(REG_CONTROL, GAIN_16X).await
    }

    /// Liest alle vier Kanäle in einem Burst (8 Bytes, Little Endian)
    pub async fn read_raw(&mut self) -> Result<RawRgbc, SensorError> {
        let mut data = [0u8; 8];
        self.i2c
            .write_read_async(COLOR_SENSOR_ADDR, &[REG_CDATAL], &mut data)
            .await
            .map_err(|_| SensorError::ReadFailed)?;

        Ok(RawRgbc {
            clear: u16::from_le_bytes([data[0], data[1]]),
            red: u16::from_le_bytes([data[2], data[3]]),
            green: u16::from_le_bytes([data[4], data[5]]),
            blue: u16::from_le_bytes([data[6], data[7]]),
        })
    }

    async fn write_register(&mut self, register: u8, value: u8) -> Result<(), SensorError> {
        self.i2c
            .write_async(COLOR_SENSOR_ADDR, &[register, value])
            .await
            .map_err(|_| SensorError::WriteFailed)
    }
}

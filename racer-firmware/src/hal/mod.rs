// Hardware Abstraction Layer (HAL) Module
//
// Kapselt die ESP32-C6 Peripherie hinter den Traits aus racer-core,
// damit die Logik mit Mocks auf dem Host getestet werden kann.

pub mod battery_adc;
pub mod color_sensor;
pub mod led_writer;
pub mod motor_pwm;

pub use battery_adc::BatteryAdc;
pub use color_sensor::{ColorSensor, SensorError};
pub use led_writer::RmtLedWriter;
pub use motor_pwm::LedcMotorPwm;

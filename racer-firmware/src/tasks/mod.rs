// Task-Modul: Enthält alle Embassy Tasks
//
// Fahrzeug-Tasks (LED, Motor, Controller, Game, Sensor, Battery) laufen
// unabhängig vom Netzwerk. Die Netzwerk-Tasks (WiFi, HTTP, MQTT) speisen
// Kommandos ein und verteilen Telemetrie.

pub mod battery;
pub mod controller;
pub mod game;
pub mod http;
pub mod led;
pub mod motor;
pub mod mqtt;
pub mod sensor;
pub mod wifi;

// Re-export Tasks für einfachen Import
pub use battery::battery_task;
pub use controller::controller_task;
pub use game::game_task;
pub use http::http_server_task;
pub use led::led_task;
pub use motor::motor_task;
pub use mqtt::mqtt_task;
pub use sensor::{sensor_task, trigger_task};
pub use wifi::{connection_task, dhcp_task, net_task};

// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen
#![allow(dead_code)]

// ============================================================================
// Pin-Belegung (siehe Schaltplan des Racer-Boards)
// ============================================================================
//
// Die Pins selbst werden in main.rs aus `peripherals` entnommen, die
// Nummern hier dienen der Dokumentation und den Logs.

/// WS2812 Datenleitung (5 LEDs)
pub const LED_GPIO_PIN: u8 = 8;

/// Motor A: H-Brücke vorwärts / rückwärts
pub const MOTOR_A_FORWARD_PIN: u8 = 13;
pub const MOTOR_A_BACKWARD_PIN: u8 = 14;

/// Motor B: H-Brücke vorwärts / rückwärts
pub const MOTOR_B_FORWARD_PIN: u8 = 4;
pub const MOTOR_B_BACKWARD_PIN: u8 = 5;

/// Farbsensor TCS3400 (I2C)
pub const COLOR_SENSOR_SCL_PIN: u8 = 0;
pub const COLOR_SENSOR_SDA_PIN: u8 = 1;

/// Trigger-Eingang (Pull-Up, fallende Flanke)
pub const TRIGGER_GPIO_PIN: u8 = 10;

/// Akku-Messung (ADC1)
pub const BATTERY_ADC_PIN: u8 = 2;

// ============================================================================
// LED Konfiguration
// ============================================================================

/// RMT Taktfrequenz in MHz
/// 80 MHz ist optimal für WS2812 LED-Timing
pub const RMT_CLOCK_MHZ: u32 = 80;

/// Timeout für den Lock auf den LED-Zustand
pub const LED_LOCK_TIMEOUT_MS: u64 = 100;

// ============================================================================
// Motor Konfiguration
// ============================================================================

/// LEDC PWM-Frequenz
pub const MOTOR_PWM_FREQUENCY_KHZ: u32 = 15;

/// Kapazität jeder Motor-Queue
pub const MOTOR_QUEUE_SIZE: usize = 10;

// ============================================================================
// Sensor Konfiguration
// ============================================================================

/// I2C Adresse des TCS3400
pub const COLOR_SENSOR_ADDR: u8 = 0x39;

/// I2C Bus-Takt
pub const I2C_FREQUENCY_KHZ: u32 = 400;

/// Kapazität der Trigger-Queue (Flanke → Sensor-Task)
pub const TRIGGER_QUEUE_SIZE: usize = 10;

/// Kapazität der Farb-Queue (Sensor-Task → Game-Task)
pub const COLOR_QUEUE_SIZE: usize = 4;

/// Wartezeit nach dem Trigger, bis der Sensor über der Markierung steht
pub const SAMPLE_SETTLE_MS: u64 = 10;

/// Messungen pro Trigger
pub const SAMPLES_PER_BURST: usize = 5;

/// Abstand zwischen den Messungen eines Bursts
pub const SAMPLE_SPACING_MS: u64 = 3;

/// Pause nach einem fehlgeschlagenen Sensor-Init
pub const SENSOR_RETRY_DELAY_SECS: u64 = 2;

// ============================================================================
// Akku Konfiguration
// ============================================================================

/// Alle N Prüfungen wird die Spannung als Telemetrie veröffentlicht
pub const BATTERY_REPORT_EVERY: u32 = 50;

// ============================================================================
// Telemetrie (PubSubChannel)
// ============================================================================

pub const TELEMETRY_CAPACITY: usize = 4;

/// 1 MQTT + bis zu 5 WebSockets
pub const TELEMETRY_SUBSCRIBERS: usize = 6;

/// Sensor-, Game- und Battery-Task
pub const TELEMETRY_PUBLISHERS: usize = 3;

// ============================================================================
// WiFi Konfiguration
// ============================================================================

/// WiFi SSID (Netzwerk-Name)
/// Wird zur Build-Zeit aus der Environment Variable WIFI_SSID geladen
pub const WIFI_SSID: &str = env!(
    "WIFI_SSID",
    "WiFi SSID nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// WiFi Passwort
pub const WIFI_PASSWORD: &str = env!(
    "WIFI_PASSWORD",
    "WiFi Password nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// Wartezeit nach einem fehlgeschlagenen Verbindungsversuch
pub const WIFI_RETRY_DELAY_SECS: u64 = 5;

/// Heap-Größe für WiFi (Bytes)
pub const WIFI_HEAP_SIZE: usize = 65536; // 64 KB

/// Zusätzliche Heap-Größe (Bytes)
pub const EXTRA_HEAP_SIZE: usize = 36864; // 36 KB

// ============================================================================
// MQTT Konfiguration
// ============================================================================

/// MQTT Broker Hostname oder IP-Adresse
pub const MQTT_BROKER: &str = env!(
    "MQTT_BROKER",
    "MQTT Broker nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// MQTT Broker Port
pub const MQTT_PORT: u16 = 1883;

/// MQTT Client ID
pub const MQTT_CLIENT_ID: &str = env!(
    "MQTT_CLIENT_ID",
    "MQTT Client ID nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// Topic für erkannte Streckenfarben
pub const MQTT_TOPIC_COLOR: &str = env!(
    "MQTT_TOPIC_COLOR",
    "MQTT Topic Color nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// Topic für Wechsel des Spiel-Effekts
pub const MQTT_TOPIC_EFFECT: &str = env!(
    "MQTT_TOPIC_EFFECT",
    "MQTT Topic Effect nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// Topic für die Akkuspannung in Millivolt
pub const MQTT_TOPIC_BATTERY: &str = env!(
    "MQTT_TOPIC_BATTERY",
    "MQTT Topic Battery nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// MQTT Reconnect Delay in Sekunden
pub const MQTT_RECONNECT_DELAY_SECS: u64 = 5;

/// MQTT Buffer-Größe in Bytes
pub const MQTT_BUFFER_SIZE: usize = 1024;

/// DNS Query Timeout in Sekunden
pub const DNS_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// HTTP Server Konfiguration
// ============================================================================

/// Anzahl paralleler HTTP-Server-Tasks
pub const HTTP_TASK_POOL_SIZE: usize = 4;

/// HTTP Buffer-Größe in Bytes
pub const HTTP_BUFFER_SIZE: usize = 1024;

/// TCP RX/TX Buffer-Größen in Bytes
pub const TCP_RX_BUFFER_SIZE: usize = 1024;
pub const TCP_TX_BUFFER_SIZE: usize = 1024;

/// WebSocket Message Buffer-Größe in Bytes
pub const WEBSOCKET_BUFFER_SIZE: usize = 512;

/// JSON Serialisierungs-Buffer für WebSocket-Nachrichten
pub const JSON_BUFFER_SIZE: usize = 192;

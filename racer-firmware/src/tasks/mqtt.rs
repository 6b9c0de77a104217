// MQTT Task - Published Farben, Effekte und Akkuspannung
use core::fmt::Write;
use defmt::{Debug2Format, error, info, warn};
use embassy_net::{IpAddress, Stack, dns::DnsQueryType, tcp::TcpSocket};
use embassy_time::{Duration, Timer, with_timeout};
use heapless::String;

use rust_mqtt::client::client::MqttClient;
use rust_mqtt::client::client_config::{ClientConfig, MqttVersion};
use rust_mqtt::packet::v5::publish_packet::QualityOfService;
use rust_mqtt::utils::rng_generator::CountingRng;
use rust_mqtt::utils::types::EncodedString;

use super::wifi::wait_for_network;
use crate::config::*;
use crate::{Telemetry, TelemetrySubscriber};

/// Payload-Puffer: Farb-/Effektname oder Millivolt als Dezimalzahl
type Payload = String<16>;

/// MQTT Task
///
/// Verbindet nach dem Netzwerk-Start mit dem Broker und leitet jede
/// Telemetrie-Nachricht sofort auf das passende Topic weiter. Fehler führen
/// zu einem Reconnect nach `MQTT_RECONNECT_DELAY_SECS`.
#[embassy_executor::task]
pub async fn mqtt_task(stack: &'static Stack<'static>, mut telemetry: TelemetrySubscriber) {
    info!("MQTT: Task started, waiting for network...");
    wait_for_network(stack).await;
    info!("MQTT: Network ready");

    loop {
        match mqtt_connect_and_publish(stack, &mut telemetry).await {
            Ok(_) => warn!("MQTT: Connection closed normally"),
            Err(e) => error!("MQTT: Error: {}", e),
        }
        info!("MQTT: Reconnecting in {}s...", MQTT_RECONNECT_DELAY_SECS);
        Timer::after(Duration::from_secs(MQTT_RECONNECT_DELAY_SECS)).await;
    }
}

/// Ordnet eine Telemetrie-Nachricht Topic und Payload zu
fn topic_and_payload(msg: &Telemetry) -> Result<(&'static str, Payload), MqttError> {
    let mut payload = Payload::new();
    let topic = match msg {
        Telemetry::Color { color } => {
            payload
                .push_str(color.name())
                .map_err(|_| MqttError::PayloadTooLong)?;
            MQTT_TOPIC_COLOR
        }
        Telemetry::Effect { effect } => {
            payload
                .push_str(effect.name())
                .map_err(|_| MqttError::PayloadTooLong)?;
            MQTT_TOPIC_EFFECT
        }
        Telemetry::Battery { millivolts, .. } => {
            write!(payload, "{}", millivolts).map_err(|_| MqttError::PayloadTooLong)?;
            MQTT_TOPIC_BATTERY
        }
    };
    Ok((topic, payload))
}

/// Kompletter MQTT-Lifecycle: DNS, TCP, CONNECT, Publish-Schleife
///
/// Kehrt bei jedem Fehler zurück; der Aufrufer verbindet neu.
async fn mqtt_connect_and_publish(
    stack: &'static Stack<'static>,
    telemetry: &mut TelemetrySubscriber,
) -> Result<(), MqttError> {
    info!("MQTT: Resolving '{}'...", MQTT_BROKER);
    let broker_ip = resolve_hostname(stack, MQTT_BROKER).await?;
    info!("MQTT: Resolved to {}", Debug2Format(&broker_ip));

    let mut rx_buffer = [0u8; 4096];
    let mut tx_buffer = [0u8; 4096];
    let mut socket = TcpSocket::new(*stack, &mut rx_buffer, &mut tx_buffer);
    socket.set_timeout(Some(Duration::from_secs(10)));

    socket
        .connect((broker_ip, MQTT_PORT))
        .await
        .map_err(|_| MqttError::ConnectionFailed)?;
    info!("MQTT: TCP connected");

    let rng = CountingRng(20000);
    let mut config = ClientConfig::<5, _>::new(MqttVersion::MQTTv5, rng);
    config.client_id = EncodedString {
        string: MQTT_CLIENT_ID,
        len: MQTT_CLIENT_ID.len() as u16,
    };
    config.keep_alive = 30;
    config.max_packet_size = MQTT_BUFFER_SIZE as u32;

    let mut send_buffer = [0u8; MQTT_BUFFER_SIZE];
    let mut recv_buffer = [0u8; MQTT_BUFFER_SIZE];

    let mut client = MqttClient::<_, 5, _>::new(
        socket,
        &mut send_buffer,
        MQTT_BUFFER_SIZE,
        &mut recv_buffer,
        MQTT_BUFFER_SIZE,
        config,
    );

    client
        .connect_to_broker()
        .await
        .map_err(|_| MqttError::ProtocolError)?;
    info!("MQTT: Connected to broker");

    loop {
        let msg = telemetry.next_message_pure().await;
        let (topic, payload) = topic_and_payload(&msg)?;

        client
            .send_message(topic, payload.as_bytes(), QualityOfService::QoS0, false)
            .await
            .map_err(|_| MqttError::PublishFailed)?;

        info!("MQTT: Published '{}' to {}", payload.as_str(), topic);
    }
}

/// Löst den Broker-Hostnamen zu einer IPv4-Adresse auf
async fn resolve_hostname(
    stack: &'static Stack<'static>,
    hostname: &str,
) -> Result<embassy_net::Ipv4Address, MqttError> {
    let result = with_timeout(
        Duration::from_secs(DNS_TIMEOUT_SECS),
        stack.dns_query(hostname, DnsQueryType::A),
    )
    .await;

    match result {
        Ok(Ok(addrs)) => addrs
            .iter()
            .find_map(|addr| match addr {
                IpAddress::Ipv4(ipv4) => Some(*ipv4),
                #[allow(unreachable_patterns)]
                _ => None,
            })
            .ok_or(MqttError::DnsResolutionFailed),
        Ok(Err(_)) => Err(MqttError::DnsResolutionFailed),
        Err(_) => Err(MqttError::DnsTimeout),
    }
}

#[derive(Debug)]
enum MqttError {
    DnsResolutionFailed,
    DnsTimeout,
    ConnectionFailed,
    ProtocolError,
    PublishFailed,
    PayloadTooLong,
}

impl defmt::Format for MqttError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            MqttError::DnsResolutionFailed => defmt::write!(fmt, "DNS failed"),
            MqttError::DnsTimeout => defmt::write!(fmt, "DNS timeout"),
            MqttError::ConnectionFailed => defmt::write!(fmt, "Connection failed"),
            MqttError::ProtocolError => defmt::write!(fmt, "Protocol error"),
            MqttError::PublishFailed => defmt::write!(fmt, "Publish failed"),
            MqttError::PayloadTooLong => defmt::write!(fmt, "Payload too long"),
        }
    }
}

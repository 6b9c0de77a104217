// HTTP Server Task - Steuerseite und WebSocket-Fernsteuerung
use core::future::pending;
use defmt::{info, warn};
use embassy_futures::select::{Either, select};
use embassy_net::Stack;
use embassy_time::Duration;
use picoserve::{io::embedded_io_async, response::IntoResponse, response::ws, routing::get};
use racer_core::{MotorCommand, MotorIndex, MotorUpdate, parse_headlight};
use rgb::RGB8;
use serde::Serialize;

use crate::config::*;
use crate::web::{
    INDEX_HTML,
    protocol::{MessageType, WsClientMessage, WsServerMessage},
};
use crate::{CommandSignal, MotorQueues, SharedLedState, TelemetryChannel, TelemetrySubscriber};

/// Antwort des `/ws` Endpoints: Upgrade oder 503 ohne freien Subscriber-Slot
enum WebSocketResponse {
    Upgrade(
        ws::UpgradedWebSocket<ws::UnspecifiedProtocol, ws::CallbackNotUsingState<WebSocketHandler>>,
    ),
    ServiceUnavailable,
}

impl IntoResponse for WebSocketResponse {
    async fn write_to<
        R: embedded_io_async::Read,
        W: picoserve::response::ResponseWriter<Error = R::Error>,
    >(
        self,
        connection: picoserve::response::Connection<'_, R>,
        response_writer: W,
    ) -> Result<picoserve::ResponseSent, W::Error> {
        match self {
            WebSocketResponse::Upgrade(ws) => ws.write_to(connection, response_writer).await,
            WebSocketResponse::ServiceUnavailable => {
                picoserve::response::Response::new(
                    picoserve::response::StatusCode::new(503),
                    "Service Unavailable: Too many remote controls connected",
                )
                .with_header("Retry-After", "5")
                .write_to(connection, response_writer)
                .await
            }
        }
    }
}

/// HTTP Server Task
///
/// - `GET /` liefert die Steuerseite
/// - `/ws` nimmt Fahr-, Scheinwerfer-, Zonen- und Stopp-Kommandos als JSON
///   entgegen und schickt jede Telemetrie-Nachricht an den Browser
///
/// Wird `HTTP_TASK_POOL_SIZE`-mal gespawnt, damit Seite und WebSocket
/// parallel bedient werden können.
#[embassy_executor::task(pool_size = HTTP_TASK_POOL_SIZE)]
pub async fn http_server_task(
    task_id: usize,
    stack: &'static Stack<'static>,
    telemetry: &'static TelemetryChannel,
    commands: &'static CommandSignal,
    motor_queues: &'static MotorQueues,
    led_state: &'static SharedLedState,
) {
    info!("HTTP: Server task {} starting on port 80...", task_id);

    let app = picoserve::Router::new().route("/", get(serve_html)).route(
        "/ws",
        get(
            move |upgrade: picoserve::response::WebSocketUpgrade| async move {
                match telemetry.subscriber() {
                    Ok(subscriber) => {
                        let handler = WebSocketHandler {
                            commands,
                            motor_queues,
                            led_state,
                            telemetry: subscriber,
                        };
                        WebSocketResponse::Upgrade(upgrade.on_upgrade(handler))
                    }
                    Err(_) => {
                        warn!("HTTP: No telemetry subscriber slot left, sending 503");
                        WebSocketResponse::ServiceUnavailable
                    }
                }
            },
        ),
    );

    let config = picoserve::Config::new(picoserve::Timeouts {
        start_read_request: Some(Duration::from_secs(5)),
        read_request: Some(Duration::from_secs(1)),
        write: Some(Duration::from_secs(1)),
        persistent_start_read_request: Some(Duration::from_secs(5)),
    })
    .keep_connection_alive();

    let mut http_buffer = [0u8; HTTP_BUFFER_SIZE];
    let mut rx_buffer = [0u8; TCP_RX_BUFFER_SIZE];
    let mut tx_buffer = [0u8; TCP_TX_BUFFER_SIZE];

    let server = picoserve::Server::new(&app, &config, &mut http_buffer);
    let _ = server
        .listen_and_serve(task_id, *stack, 80, &mut rx_buffer, &mut tx_buffer)
        .await;

    info!("HTTP: Server task {} ended", task_id);
}

async fn serve_html() -> impl IntoResponse {
    picoserve::response::Response::new(picoserve::response::StatusCode::OK, INDEX_HTML)
        .with_header("Content-Type", "text/html; charset=utf-8")
}

/// Zustand einer WebSocket-Verbindung
struct WebSocketHandler {
    commands: &'static CommandSignal,
    motor_queues: &'static MotorQueues,
    led_state: &'static SharedLedState,
    telemetry: TelemetrySubscriber,
}

impl ws::WebSocketCallback for WebSocketHandler {
    async fn run<R: embedded_io_async::Read, W: embedded_io_async::Write<Error = R::Error>>(
        mut self,
        mut rx: ws::SocketRx<R>,
        mut tx: ws::SocketTx<W>,
    ) -> Result<(), W::Error> {
        info!("HTTP: Remote control connected");

        let mut buffer = [0u8; WEBSOCKET_BUFFER_SIZE];

        let close_reason = loop {
            match select(
                rx.next_message(&mut buffer, pending()),
                self.telemetry.next_message_pure(),
            )
            .await
            {
                Either::First(ws_result) => match ws_result?.ignore_never_b() {
                    Ok(ws::Message::Text(data)) => {
                        let targets = CommandTargets {
                            commands: self.commands,
                            motor_queues: self.motor_queues,
                            led_state: self.led_state,
                        };
                        if let Err(message) = handle_command(targets, data.as_bytes()).await {
                            warn!("HTTP: Rejected command: {}", message);
                            send_json(&mut tx, &WsServerMessage::Error { message }).await?;
                        }
                    }
                    Ok(ws::Message::Binary(data)) => {
                        info!("HTTP: Binary message ignored ({} bytes)", data.len());
                    }
                    Ok(ws::Message::Ping(data)) => tx.send_pong(data).await?,
                    Ok(ws::Message::Pong(_)) => {}
                    Ok(ws::Message::Close(_)) => break None,
                    Err(error) => {
                        warn!("HTTP: WebSocket error");
                        break Some((error.code(), "WebSocket Error"));
                    }
                },
                Either::Second(msg) => send_json(&mut tx, &msg).await?,
            }
        };

        info!("HTTP: Remote control disconnected");
        tx.close(close_reason).await
    }
}

/// Empfänger der dekodierten Kommandos
struct CommandTargets {
    commands: &'static CommandSignal,
    motor_queues: &'static MotorQueues,
    led_state: &'static SharedLedState,
}

/// Dekodiert ein JSON-Kommando über dieselben Decoder wie das Funk-Protokoll
async fn handle_command(targets: CommandTargets, data: &[u8]) -> Result<(), &'static str> {
    let CommandTargets {
        commands,
        motor_queues,
        led_state,
    } = targets;

    let (msg, _) =
        serde_json_core::from_slice::<WsClientMessage>(data).map_err(|_| "JSON parse error")?;

    match msg.msg_type {
        MessageType::Drive => {
            let bytes = msg.drive_bytes().ok_or("drive: missing field")?;
            let command =
                MotorCommand::try_from(&bytes[..]).map_err(|_| "drive: invalid command")?;
            info!("HTTP: Drive {}", command);
            commands.signal(command);
        }
        MessageType::Headlight => {
            let bytes = msg.headlight_bytes().ok_or("headlight: missing field")?;
            let color: RGB8 = parse_headlight(&bytes).map_err(|_| "headlight: invalid color")?;
            info!("HTTP: Headlight ({}, {}, {})", color.r, color.g, color.b);
            led_state.lock().await.set_headlight(color);
        }
        MessageType::Zone => {
            let zone = usize::from(msg.zone.ok_or("zone: missing index")?);
            let mut state = led_state.lock().await;
            let result = if msg.has_no_color() {
                info!("HTTP: Zone {} cleared", zone);
                state.clear_zone_color(zone)
            } else {
                let bytes = msg.headlight_bytes().ok_or("zone: incomplete color")?;
                let color: RGB8 = parse_headlight(&bytes).map_err(|_| "zone: invalid color")?;
                info!("HTTP: Zone {} ({}, {}, {})", zone, color.r, color.g, color.b);
                state.set_zone_color(zone, color)
            };
            result.map_err(|_| "zone: invalid index")?;
        }
        MessageType::Stop => {
            let index = msg.motor.ok_or("stop: missing motor")?;
            let motor = MotorIndex::try_from(index).map_err(|_| "stop: invalid motor")?;
            info!("HTTP: Stop motor {}", motor);
            motor_queues[motor.as_usize()]
                .try_send(MotorUpdate::stop(motor))
                .map_err(|_| "stop: motor queue full")?;
        }
    }
    Ok(())
}

/// Serialisiert eine Nachricht und sendet sie als Text-Frame
///
/// Zu große Nachrichten werden verworfen, die Verbindung bleibt offen.
async fn send_json<W: embedded_io_async::Write, T: Serialize>(
    tx: &mut ws::SocketTx<W>,
    msg: &T,
) -> Result<(), W::Error> {
    let mut json_buffer = [0u8; JSON_BUFFER_SIZE];
    let Ok(n) = serde_json_core::to_slice(msg, &mut json_buffer) else {
        warn!("HTTP: Message exceeds JSON buffer");
        return Ok(());
    };
    match core::str::from_utf8(&json_buffer[..n]) {
        Ok(json) => tx.send_text(json).await,
        Err(_) => Ok(()),
    }
}

// Keine Standard-Bibliothek verwenden (Embedded System)
#![no_std]
// Kein normaler main() Einstiegspunkt (wird von esp_rtos bereitgestellt)
#![no_main]
// Verbiete mem::forget - gefährlich bei ESP HAL Types mit DMA-Buffern
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
// Verbiete große Stack-Frames (Stack ist auf Embedded Systemen begrenzt)
#![deny(clippy::large_stack_frames)]

// Heap Allocator (WiFi benötigt dynamischen Speicher)
extern crate alloc;

use core::cell::Cell;

use defmt::info;
use embassy_executor::Spawner;
use embassy_net::{Config as NetConfig, Stack, StackResources};
use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_time::{Duration, Timer};
use esp_hal::clock::CpuClock;
use esp_hal::gpio::Pin;
use esp_hal::rng::Rng;
use esp_hal::timer::timg::TimerGroup;
use static_cell::StaticCell;

// Backtrace bei Panic und println!() Support
use {esp_backtrace as _, esp_println as _};

use racer_core::led::RUN_FLASH_PERIOD_MS;
use racer_core::{GameEffect, LedState};
use racer_firmware::config::{EXTRA_HEAP_SIZE, HTTP_TASK_POOL_SIZE, WIFI_HEAP_SIZE};
use racer_firmware::hal::motor_pwm::MotorPins;
use racer_firmware::hal::{BatteryAdc, ColorSensor, LedcMotorPwm};
use racer_firmware::tasks::{
    battery_task, connection_task, controller_task, dhcp_task, game_task, http_server_task,
    led_task, motor_task, mqtt_task, net_task, sensor_task, trigger_task,
};
use racer_firmware::{
    ActiveEffect, ColorChannel, CommandSignal, MotorQueue, MotorQueues, SharedLedState,
    TelemetryChannel, TriggerChannel,
};

// ESP-IDF App Descriptor - erforderlich für den Bootloader!
// Ohne diesen schlägt das Flashen mit "ESP-IDF App Descriptor missing" fehl
esp_bootloader_esp_idf::esp_app_desc!();

// ============================================================================
// Statische Sync-Primitive (von allen Tasks erreichbar)
// ============================================================================

static MOTOR_QUEUES: MotorQueues = [MotorQueue::new(), MotorQueue::new()];
static COMMANDS: CommandSignal = CommandSignal::new();
static TRIGGERS: TriggerChannel = TriggerChannel::new();
static COLORS: ColorChannel = ColorChannel::new();
static TELEMETRY: TelemetryChannel = TelemetryChannel::new();
static ACTIVE_EFFECT: ActiveEffect = BlockingMutex::new(Cell::new(GameEffect::Off));
static LED_STATE: StaticCell<SharedLedState> = StaticCell::new();

/// Main Entry Point
///
/// Initialisiert Hardware, WiFi und spawnt alle Tasks.
/// Danach schläft main() - alle Arbeit läuft in Tasks.
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    esp_alloc::heap_allocator!(
        #[esp_hal::ram(reclaimed)]
        size: WIFI_HEAP_SIZE
    );
    esp_alloc::heap_allocator!(size: EXTRA_HEAP_SIZE);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_interrupt =
        esp_hal::interrupt::software::SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    info!("Racer: Booting");

    // ------------------------------------------------------------------------
    // Fahrzeug: LED, Motoren, Sensor, Akku
    // ------------------------------------------------------------------------

    // Blinktakt im Fahrbetrieb
    let mut initial_leds = LedState::new();
    initial_leds.set_flash_period(RUN_FLASH_PERIOD_MS);
    let led_state = &*LED_STATE.init(SharedLedState::new(initial_leds));

    let motor_bridges = LedcMotorPwm::split(
        peripherals.LEDC,
        MotorPins {
            a_forward: peripherals.GPIO13.degrade(),
            a_backward: peripherals.GPIO14.degrade(),
            b_forward: peripherals.GPIO4.degrade(),
            b_backward: peripherals.GPIO5.degrade(),
        },
    )
    .expect("Failed to configure motor PWM");

    let color_sensor = ColorSensor::new(peripherals.I2C0, peripherals.GPIO0, peripherals.GPIO1)
        .expect("Failed to configure I2C for color sensor");

    let battery_adc = BatteryAdc::new(peripherals.ADC1, peripherals.GPIO2);

    spawner
        .spawn(led_task(peripherals.GPIO8, peripherals.RMT, led_state))
        .unwrap();
    // Ein Task pro Motor, jeder nur mit seiner eigenen Queue
    for bridge in motor_bridges {
        let queue = &MOTOR_QUEUES[bridge.motor().as_usize()];
        spawner.spawn(motor_task(bridge, queue)).unwrap();
    }
    spawner
        .spawn(controller_task(&COMMANDS, &ACTIVE_EFFECT, &MOTOR_QUEUES))
        .unwrap();
    spawner
        .spawn(game_task(
            COLORS.receiver(),
            &ACTIVE_EFFECT,
            led_state,
            TELEMETRY.publisher().unwrap(),
        ))
        .unwrap();
    spawner
        .spawn(trigger_task(peripherals.GPIO10, TRIGGERS.sender()))
        .unwrap();
    spawner
        .spawn(sensor_task(
            color_sensor,
            TRIGGERS.receiver(),
            COLORS.sender(),
            TELEMETRY.publisher().unwrap(),
        ))
        .unwrap();
    spawner
        .spawn(battery_task(
            battery_adc,
            led_state,
            TELEMETRY.publisher().unwrap(),
        ))
        .unwrap();

    // ------------------------------------------------------------------------
    // Netzwerk: WiFi, MQTT, HTTP
    // ------------------------------------------------------------------------

    static RADIO_INIT: StaticCell<esp_radio::Controller> = StaticCell::new();
    let radio_init =
        RADIO_INIT.init(esp_radio::init().expect("Failed to initialize Wi-Fi/BLE controller"));

    let (wifi_controller, wifi_interface) =
        esp_radio::wifi::new(radio_init, peripherals.WIFI, Default::default())
            .expect("Failed to initialize Wi-Fi");

    let rng = Rng::new();
    let seed = (rng.random() as u64) << 32 | rng.random() as u64;

    // MQTT (1) + HTTP-Listener + WebSocket-Clients
    static RESOURCES: StaticCell<StackResources<8>> = StaticCell::new();
    let resources = RESOURCES.init(StackResources::new());

    let (stack, runner) = embassy_net::new(
        wifi_interface.sta,
        NetConfig::dhcpv4(Default::default()),
        resources,
        seed,
    );

    static STACK: StaticCell<Stack<'static>> = StaticCell::new();
    let stack = &*STACK.init(stack);

    spawner.spawn(connection_task(wifi_controller)).unwrap();
    spawner.spawn(net_task(runner)).unwrap();
    spawner.spawn(dhcp_task(stack)).unwrap();

    spawner
        .spawn(mqtt_task(stack, TELEMETRY.subscriber().unwrap()))
        .unwrap();

    for task_id in 0..HTTP_TASK_POOL_SIZE {
        spawner
            .spawn(http_server_task(
                task_id,
                stack,
                &TELEMETRY,
                &COMMANDS,
                &MOTOR_QUEUES,
                led_state,
            ))
            .unwrap();
    }

    info!("Racer: All tasks running");

    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}

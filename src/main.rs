//! SensorNode Firmware: Main Entry Point
//!
//! Wires the adapters around the session controller and runs it forever.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  SensorHub (I2C + ADC)   TcpTransport   WifiAdapter          │
//! │  LogEventSink + IndicatorSink            SystemDelay         │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ────────────────        │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │        SessionController (pure logic)                  │  │
//! │  │  connect · handshake · serve · dispatch                │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::units::Hertz;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{BlockingWifi, EspWifi};
use log::{info, warn};

use sensornode::adapters::device_id;
use sensornode::adapters::indicator::IndicatorSink;
use sensornode::adapters::log_sink::LogEventSink;
use sensornode::adapters::tcp_transport::TcpTransport;
use sensornode::adapters::time::SystemDelay;
use sensornode::adapters::wifi::{join_network, WifiAdapter};
use sensornode::app::events::{BootStage, NodeEvent};
use sensornode::app::ports::EventSink;
use sensornode::app::session::SessionController;
use sensornode::config::{ClientConfig, WIFI_PASSWORD, WIFI_SSID};
use sensornode::drivers::hw_init;
use sensornode::drivers::status_led::StatusLeds;
use sensornode::error::Error;
use sensornode::pins;
use sensornode::sensors::sen0308::Sen0308;
use sensornode::sensors::sht20::Sht20;
use sensornode::sensors::tsl2591::{Gain, IntegrationTime, Tsl2591};
use sensornode::sensors::SensorHub;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("SensorNode v{}", env!("CARGO_PKG_VERSION"));

    let config = ClientConfig::default();
    config.validate()?;

    // ── 2. Peripherals ────────────────────────────────────────
    hw_init::init_peripherals().map_err(Error::from)?;

    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    let mut delay = SystemDelay::new();
    let mut sink = (
        LogEventSink::new(),
        IndicatorSink::new(StatusLeds::new(), SystemDelay::new(), config.blink_ms),
    );

    // ── 3. Sensors ────────────────────────────────────────────
    let i2c_config = I2cConfig::new().baudrate(Hertz(pins::I2C_BAUDRATE_HZ));
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio21,
        peripherals.pins.gpio22,
        &i2c_config,
    )?;
    let mut sensors = SensorHub::new(
        i2c,
        Sht20::new(),
        Tsl2591::new(Gain::Medium, IntegrationTime::Ms300),
        Sen0308::new(pins::SEN0308_ADC_GPIO),
    );
    let report = sensors.init(&mut delay);
    info!(
        "Sensors: SHT20={} TSL2591={}",
        if report.sht20_ok { "OK" } else { "MISSING" },
        if report.tsl2591_ok { "OK" } else { "MISSING" },
    );
    sink.emit(&NodeEvent::Boot(BootStage::SensorsReady));

    // ── 4. WiFi ───────────────────────────────────────────────
    let driver = BlockingWifi::wrap(
        EspWifi::new(peripherals.modem, sysloop.clone(), Some(nvs))?,
        sysloop,
    )?;
    let mut wifi = WifiAdapter::new(driver);
    if let Err(e) = wifi.set_credentials(WIFI_SSID, WIFI_PASSWORD) {
        warn!("WiFi credentials rejected: {}", e);
    }
    let attempts = join_network(&mut wifi, &mut delay, config.wifi_retry_ms);
    sink.emit(&NodeEvent::Boot(BootStage::NetworkJoined { attempts }));

    // ── 5. Identity ───────────────────────────────────────────
    let identity = device_id::format_mac(&device_id::read_mac());
    info!("Device identity: {}", identity);

    // ── 6. Session ────────────────────────────────────────────
    let transport = TcpTransport::new(config.connect_timeout_ms);
    let mut session = SessionController::new(config, &identity, transport)?;
    session.run(&mut sensors, &mut sink, &mut delay)
}

#![no_std]
#![no_main]

extern crate alloc;

use esp_backtrace as _;
use esp_hal::clock::CpuClock;
use esp_hal::delay::Delay;
use esp_hal::main;
use esp_hal::rng::Rng;
use esp_hal::timer::timg::TimerGroup;
use log::{LevelFilter, error, info, warn};

use esp_wifi::init;

use esp_wifi_connect::esp::{EspConsole, EspStation};
use esp_wifi_connect::{
    ConnectPolicy, ConnectionCredentials, ConnectionManager, LinkStatus, StationDriver,
};

/// Heartbeat interval once connected (milliseconds)
const HEARTBEAT_MS: u32 = 10_000;

esp_bootloader_esp_idf::esp_app_desc!();

// WiFi credentials loaded from .env file at compile time
const WIFI_SSID: &str = env!("WIFI_SSID");
const WIFI_PASSWORD: &str = env!("WIFI_PASSWORD");
const WIFI_CONNECT_TIMEOUT_MS: Option<&str> = option_env!("WIFI_CONNECT_TIMEOUT_MS");

#[main]
fn main() -> ! {
    // Initialize heap allocator (required for WiFi)
    esp_alloc::heap_allocator!(size: 72 * 1024);

    esp_println::logger::init_logger_from_env();
    log::set_max_level(LevelFilter::Info);

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    info!("=== ESP32 WiFi station ===");

    // Initialize timer for WiFi
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let rng = Rng::new(peripherals.RNG);

    let init = match init(timg0.timer0, rng) {
        Ok(init) => init,
        Err(e) => halt(format_args!("esp-wifi init failed: {:?}", e)),
    };

    let (controller, interfaces) = match esp_wifi::wifi::new(&init, peripherals.WIFI) {
        Ok(parts) => parts,
        Err(e) => halt(format_args!("WiFi driver unavailable: {:?}", e)),
    };

    let policy = match ConnectPolicy::from_timeout_env(WIFI_CONNECT_TIMEOUT_MS) {
        Ok(policy) => policy,
        Err(e) => {
            warn!("{}, waiting without a limit", e);
            ConnectPolicy::default()
        }
    };

    let credentials = ConnectionCredentials::new(WIFI_SSID, WIFI_PASSWORD);
    let station = EspStation::new(controller, interfaces.sta);

    let mut manager =
        ConnectionManager::new(credentials, station, Delay::new(), EspConsole).with_policy(policy);

    match manager.policy().max_attempts {
        Some(waits) => info!(
            "Connecting to '{}', giving up after {} waits",
            manager.credentials().identifier(),
            waits
        ),
        None => info!("Connecting to '{}'", manager.credentials().identifier()),
    }

    // Blocks until the link is up unless WIFI_CONNECT_TIMEOUT_MS bounds it
    let ip = match manager.connect() {
        Ok(ip) => ip,
        Err(e) => halt(format_args!("WiFi connect failed: {}", e)),
    };

    info!("WiFi connection established!");

    let delay = Delay::new();
    loop {
        delay.delay_millis(HEARTBEAT_MS);

        // Link drops are reported, not repaired
        match manager.driver_mut().status() {
            LinkStatus::Connected => info!("WiFi: link up, IP {}", ip),
            status => warn!("WiFi: link down ({:?})", status),
        }
    }
}

fn halt(reason: core::fmt::Arguments<'_>) -> ! {
    error!("{}", reason);
    let delay = Delay::new();
    loop {
        delay.delay_millis(1_000);
    }
}

//! Connects to a Firmata board over serial, synchronizes, and logs analog pin 0.
//!
//! Usage: `firmata-monitor [config.json]`

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::{debug, error, info};

use firmata_host::core::Config;
use firmata_host::dispatch::{Dispatcher, VersionCheck};
use firmata_host::protocol::constants::{sysex, ANALOG_MESSAGE, DIGITAL_MESSAGE, REPORT_VERSION};
use firmata_host::protocol::decode_u14;
use firmata_host::transport::{attach, open_serial};

/// Latest reading per analog pin
type AnalogValues = Arc<Mutex<HashMap<u8, u16>>>;

fn build_dispatcher(analog_values: AnalogValues) -> Dispatcher {
    let mut dispatcher = Dispatcher::new();

    dispatcher.register(REPORT_VERSION, VersionCheck::default());
    dispatcher.register(ANALOG_MESSAGE, move |_: u8, data: &[u8]| {
        let [status, lo, hi] = data else { return };
        let pin = status & 0x0F;
        let value = decode_u14(*lo, *hi);
        if let Ok(mut values) = analog_values.lock() {
            values.insert(pin, value);
        }
        if pin == 0 {
            info!("{}: {}", Utc::now().to_rfc3339(), value);
        }
    });
    dispatcher.register(DIGITAL_MESSAGE, |_: u8, data: &[u8]| debug!(?data, "digital"));
    dispatcher.register_sysex(sysex::REPORT_FIRMWARE, |_: u8, _: &[u8]| {});
    dispatcher.register_sysex(sysex::ANALOG_MAPPING_RESPONSE, |_: u8, _: &[u8]| {
        info!("Mapping response")
    });

    dispatcher
}

#[tokio::main]
async fn main() {
    let config = match std::env::args().nth(1) {
        Some(path) => match Config::load(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load {}: {}", path, e);
                std::process::exit(2);
            }
        },
        None => Config::default(),
    };

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::from(config.log_level))
        .init();

    let port = match open_serial(&config.port, config.baud_rate) {
        Ok(port) => port,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let analog_values = AnalogValues::default();
    let (mut controller, reader) = attach(port, build_dispatcher(analog_values), config.sync);

    tokio::select! {
        result = controller.run() => {
            if let Err(e) = result {
                error!("session ended: {}", e);
            }
            match reader.await {
                Ok(Err(e)) => error!("reader failed: {}", e),
                Err(e) => error!("reader task panicked: {}", e),
                Ok(Ok(())) => {}
            }
            std::process::exit(1);
        }
        _ = tokio::signal::ctrl_c() => {
            info!("interrupted, closing port");
            reader.abort();
            drop(controller);
            std::process::exit(0);
        }
    }
}

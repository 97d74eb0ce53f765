use std::{collections::HashMap, error::Error, path::PathBuf};

use clap::{Parser, Subcommand};
use tabled::{
    settings::{Panel, Style},
    Table, Tabled,
};

use crate::{
    config::{AdapterConfig, BackendKind},
    drivers::{
        n64::{
            channel::TransceiverBackend,
            emulated::{EmulatedBackend, EmulatedController},
            tty::TtyBackend,
        },
        usb_gamepad::report_descriptor::REPORT_DESCRIPTOR,
    },
    input::{
        manager::Manager,
        target::{create_sink, SinkKind},
    },
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the adapter config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// Use emulated controllers instead of transceiver hardware
    #[arg(long, global = true)]
    pub emulate: bool,
    /// Where to send gamepad reports, overrides the config
    #[arg(long, global = true)]
    pub sink: Option<SinkKind>,
    #[command(subcommand)]
    pub cmd: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the adapter (default)
    Run,
    /// Initialize every port once and show its channel binding
    Probe,
    /// Print the HID report descriptor of the virtual gamepads
    Descriptor,
}

#[derive(Tabled)]
struct PortRow {
    port: String,
    pin: String,
    lane: String,
    slot: String,
    offset: String,
    connected: bool,
}

/// Load the config, applying command line overrides
pub fn load_config(args: &Args) -> Result<AdapterConfig, Box<dyn Error>> {
    let mut config = AdapterConfig::load(args.config.clone())?;
    if args.emulate {
        config.backend = BackendKind::Emulated;
    }
    if let Some(sink) = args.sink {
        config.sink = sink;
    }
    Ok(config)
}

/// Create the transceiver backend selected by the config
pub fn create_backend(config: &AdapterConfig) -> Box<dyn TransceiverBackend> {
    match config.backend {
        BackendKind::Tty => {
            let devices: HashMap<u8, String> = config
                .ports
                .iter()
                .filter_map(|port| port.device.clone().map(|device| (port.pin, device)))
                .collect();
            Box::new(TtyBackend::new(devices, config.baud_rate))
        }
        BackendKind::Emulated => {
            let mut backend = EmulatedBackend::new();
            for port in config.ports.iter() {
                backend.attach(port.pin, EmulatedController::plugged());
            }
            Box::new(backend)
        }
    }
}

pub fn handle_probe(config: &AdapterConfig) -> Result<(), Box<dyn Error>> {
    let mut backend = create_backend(config);
    let sink = create_sink(SinkKind::Debug, config.ports.len())?;
    let manager = Manager::new(config, backend.as_mut(), sink);

    let connected = manager.connected_states();
    let mut rows = Vec::with_capacity(manager.port_count());
    for i in 0..manager.port_count() {
        let pin = manager.pin(i).map(|pin| format!("GP{pin}")).unwrap_or_default();
        let row = match manager.binding(i) {
            Some(binding) => PortRow {
                port: format!("P{}", i + 1),
                pin,
                lane: binding.lane.to_string(),
                slot: binding.slot.to_string(),
                offset: binding.offset.to_string(),
                connected: connected[i],
            },
            None => PortRow {
                port: format!("P{}", i + 1),
                pin,
                lane: "-".to_string(),
                slot: "-".to_string(),
                offset: "-".to_string(),
                connected: false,
            },
        };
        rows.push(row);
    }

    let mut table = Table::new(rows);
    table
        .with(Style::modern_rounded())
        .with(Panel::header("Controller Ports"));
    println!("{table}");
    println!(
        "{} of {} controller(s) connected",
        manager.connected_count(),
        manager.port_count()
    );

    Ok(())
}

pub fn handle_descriptor() -> Result<(), Box<dyn Error>> {
    for line in REPORT_DESCRIPTOR.chunks(8) {
        let bytes: Vec<String> = line.iter().map(|b| format!("{b:02x}")).collect();
        println!("{}", bytes.join(" "));
    }
    println!("{} bytes", REPORT_DESCRIPTOR.len());

    Ok(())
}

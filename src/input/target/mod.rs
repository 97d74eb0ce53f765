pub mod debug;
pub mod uhid;

use std::io;

use clap::ValueEnum;
use packed_struct::PackingError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::drivers::usb_gamepad::hid_report::GamepadReport;

/// Possible errors when publishing reports to the host
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("failed to create virtual device: {0}")]
    Create(io::Error),
    #[error("unable to pack report: {0:?}")]
    Pack(PackingError),
    #[error("failed to write input report: {0}")]
    Write(String),
    #[error("no target device for port {0}")]
    UnknownPort(usize),
}

impl From<PackingError> for SinkError {
    fn from(err: PackingError) -> Self {
        SinkError::Pack(err)
    }
}

/// A [ReportSink] publishes one gamepad report per port to the host
pub trait ReportSink {
    /// Handle pending requests from the host side. Called once at the start
    /// of every polling cycle.
    fn poll(&mut self) -> Result<(), SinkError> {
        Ok(())
    }

    /// Whether the host side is ready to receive reports
    fn is_ready(&self) -> bool {
        true
    }

    /// Send the report for the given port. Returns whether the report was
    /// accepted; the caller never retries within the same cycle.
    fn send_report(&mut self, port: usize, report: &GamepadReport) -> Result<bool, SinkError>;
}

/// Available [ReportSink] implementations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SinkKind {
    /// Virtual HID gamepads created through uhid
    #[default]
    Uhid,
    /// Log reports instead of publishing them
    Debug,
}

/// Create the sink of the given kind for the given number of ports
pub fn create_sink(kind: SinkKind, ports: usize) -> Result<Box<dyn ReportSink>, SinkError> {
    let sink: Box<dyn ReportSink> = match kind {
        SinkKind::Uhid => Box::new(uhid::UhidGamepads::new(ports)?),
        SinkKind::Debug => Box::new(debug::DebugSink::new()),
    };
    Ok(sink)
}

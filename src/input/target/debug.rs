use packed_struct::prelude::*;

use crate::drivers::usb_gamepad::hid_report::GamepadReport;

use super::{ReportSink, SinkError};

/// A [DebugSink] logs every report instead of sending it to a host
#[derive(Debug, Default)]
pub struct DebugSink {
    last: Vec<Option<GamepadReport>>,
}

impl DebugSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReportSink for DebugSink {
    fn send_report(&mut self, port: usize, report: &GamepadReport) -> Result<bool, SinkError> {
        if self.last.len() <= port {
            self.last.resize(port + 1, None);
        }
        // Only log changes, reports are sent every cycle
        if self.last[port] == Some(*report) {
            return Ok(true);
        }
        self.last[port] = Some(*report);

        let data = report.pack()?;
        log::info!(
            "[P{}] buttons={:?} hat={:?} x={} y={} raw={data:02x?}",
            port + 1,
            report.buttons(),
            report.hat,
            report.lx,
            report.ly
        );

        Ok(true)
    }
}

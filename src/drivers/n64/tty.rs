//! Transceiver backend for a serial bridge that performs the bit-level
//! joybus signalling and exchanges raw bytes over a TTY.
use std::{
    collections::HashMap,
    io::{Read, Write},
    time::Duration,
};

use serialport::{ClearBuffer, DataBits, Parity, SerialPort, StopBits, TTYPort};

use super::channel::{ChannelBinding, Transceiver, TransceiverBackend, Unavailable};

pub const TTY_TIMEOUT: u64 = 4;
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Channel backed by a TTY port
pub struct TtyChannel {
    port: TTYPort,
    devnode: String,
}

impl TtyChannel {
    pub fn open(devnode: &str, baud_rate: u32) -> Result<Self, serialport::Error> {
        let builder = serialport::new(devnode, baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .timeout(Duration::from_millis(TTY_TIMEOUT));
        let port = TTYPort::open(&builder)?;

        Ok(Self {
            port,
            devnode: devnode.to_string(),
        })
    }
}

impl Transceiver for TtyChannel {
    fn send(&mut self, byte: u8) {
        if let Err(e) = self.port.write_all(&[byte]) {
            log::debug!("Failed to write to {}: {e}", self.devnode);
        }
    }

    fn try_receive(&mut self) -> Option<u8> {
        match self.port.bytes_to_read() {
            Ok(0) => None,
            Ok(_) => {
                let mut buf = [0; 1];
                self.port.read_exact(&mut buf).ok()?;
                Some(buf[0])
            }
            Err(e) => {
                log::debug!("Failed to poll {}: {e}", self.devnode);
                None
            }
        }
    }

    fn reset(&mut self) {
        if let Err(e) = self.port.clear(ClearBuffer::All) {
            log::debug!("Failed to clear buffers on {}: {e}", self.devnode);
        }
        // A line break tells the bridge to abandon any partial frame
        if let Err(e) = self.port.set_break() {
            log::debug!("Failed to set break on {}: {e}", self.devnode);
            return;
        }
        if let Err(e) = self.port.clear_break() {
            log::debug!("Failed to clear break on {}: {e}", self.devnode);
        }
    }
}

/// Opens one [TtyChannel] per data pin using the configured device nodes
#[derive(Debug, Clone, Default)]
pub struct TtyBackend {
    devices: HashMap<u8, String>,
    baud_rate: u32,
}

impl TtyBackend {
    pub fn new(devices: HashMap<u8, String>, baud_rate: u32) -> Self {
        Self { devices, baud_rate }
    }
}

impl TransceiverBackend for TtyBackend {
    fn open(&mut self, binding: &ChannelBinding) -> Result<Box<dyn Transceiver>, Unavailable> {
        let Some(devnode) = self.devices.get(&binding.pin) else {
            return Err(Unavailable::Open {
                pin: binding.pin,
                reason: "no device configured".to_string(),
            });
        };

        log::debug!("Opening {devnode} for {binding}");
        let channel = TtyChannel::open(devnode, self.baud_rate).map_err(|e| Unavailable::Open {
            pin: binding.pin,
            reason: e.to_string(),
        })?;

        Ok(Box::new(channel))
    }
}

use std::time::{Duration, Instant};

use packed_struct::prelude::*;
use thiserror::Error;

use super::{
    channel::{ChannelBinding, ChannelPool, Transceiver, TransceiverBackend, Unavailable},
    status_report::StatusReport,
    Command, DEVICE_TYPE_STANDARD, INFO_SIZE, LENGTH_HINT_MASK, STATUS_SIZE,
};

/// Possible errors when talking to a controller
#[derive(Error, Debug)]
pub enum JoybusError {
    #[error("transceiver hardware unavailable: {0}")]
    HardwareUnavailable(#[from] Unavailable),
    #[error("timed out waiting for response byte {index} of {expected}")]
    Timeout { index: usize, expected: usize },
    #[error("controller disconnected")]
    Disconnected,
}

/// Response deadline and post-transfer settling parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// How long to wait for each response byte
    pub byte_timeout: Duration,
    /// Line settling time per transferred byte
    pub settle_per_byte: Duration,
    /// Fixed settling time after every successful transfer
    pub settle_floor: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            byte_timeout: Duration::from_micros(600),
            settle_per_byte: Duration::from_micros(4),
            settle_floor: Duration::from_micros(450),
        }
    }
}

impl Timing {
    /// Settling delay after a transfer with the given response length. One
    /// extra byte time accounts for the command byte.
    pub fn settle_delay(&self, response_len: usize) -> Duration {
        self.settle_per_byte * (response_len as u32 + 1) + self.settle_floor
    }
}

/// A controller port bound to one transceiver channel
pub struct Port {
    binding: ChannelBinding,
    channel: Box<dyn Transceiver>,
    timing: Timing,
    connected: bool,
}

impl std::fmt::Debug for Port {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Port")
            .field("binding", &self.binding)
            .field("timing", &self.timing)
            .field("connected", &self.connected)
            .finish()
    }
}

impl Port {
    /// Claim a channel for the given data pin and probe it with an info
    /// command. A channel that cannot be opened stays free for later ports.
    /// A port with no controller attached is still a valid port so that it
    /// can be hot-plugged later.
    pub fn init(
        pool: &mut ChannelPool,
        backend: &mut dyn TransceiverBackend,
        pin: u8,
        timing: Timing,
    ) -> Result<Self, JoybusError> {
        // The channel is only claimed once it could be opened
        let binding = pool.reserve(pin)?;
        let channel = backend.open(&binding)?;
        pool.commit(&binding);
        let mut port = Self::new(binding, channel, timing);

        match port.transfer::<INFO_SIZE>(Command::Info) {
            Ok(info) => {
                log::debug!("Got info response on GP{pin}: {info:02x?}");
                port.connected = info[0] == DEVICE_TYPE_STANDARD;
            }
            Err(e) => {
                log::debug!("No info response on GP{pin}: {e}");
            }
        }

        Ok(port)
    }

    /// Wrap an already opened channel
    pub fn new(binding: ChannelBinding, channel: Box<dyn Transceiver>, timing: Timing) -> Self {
        Self {
            binding,
            channel,
            timing,
            connected: false,
        }
    }

    pub fn binding(&self) -> &ChannelBinding {
        &self.binding
    }

    pub fn pin(&self) -> u8 {
        self.binding.pin
    }

    /// Whether the last exchange with the controller succeeded
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Read the current controller state. On failure the port is marked as
    /// disconnected and any previously read state must not be trusted.
    pub fn read(&mut self) -> Result<StatusReport, JoybusError> {
        let buf = match self.transfer::<STATUS_SIZE>(Command::Status) {
            Ok(buf) => buf,
            Err(e) => {
                log::trace!("Status read failed on GP{}: {e}", self.pin());
                self.connected = false;
                return Err(JoybusError::Disconnected);
            }
        };

        let report = match StatusReport::unpack(&buf) {
            Ok(report) => report,
            Err(e) => {
                log::warn!("Unable to unpack status on GP{}: {e:?}", self.pin());
                self.connected = false;
                return Err(JoybusError::Disconnected);
            }
        };
        log::trace!("Got status on GP{}: {report:?}", self.pin());
        self.connected = true;

        Ok(report)
    }

    /// Send a command and collect a response of exactly `N` bytes
    pub fn transfer<const N: usize>(&mut self, command: Command) -> Result<[u8; N], JoybusError> {
        // Start from a clean channel in case a previous exchange was cut short
        self.channel.reset();

        let hint = (N.saturating_sub(1) as u8) & LENGTH_HINT_MASK;
        self.channel.send(hint);
        self.channel.send(command.to_primitive());

        let mut response = [0; N];
        if let Err(e) = self.receive(&mut response) {
            self.channel.reset();
            return Err(e);
        }

        busy_wait(self.timing.settle_delay(N));

        Ok(response)
    }

    fn receive(&mut self, response: &mut [u8]) -> Result<(), JoybusError> {
        let expected = response.len();
        for (index, byte) in response.iter_mut().enumerate() {
            let deadline = Instant::now() + self.timing.byte_timeout;
            *byte = loop {
                if let Some(value) = self.channel.try_receive() {
                    break value;
                }
                if Instant::now() >= deadline {
                    return Err(JoybusError::Timeout { index, expected });
                }
                std::hint::spin_loop();
            };
        }

        Ok(())
    }
}

/// Spin until the given duration has elapsed
fn busy_wait(duration: Duration) {
    let start = Instant::now();
    while start.elapsed() < duration {
        std::hint::spin_loop();
    }
}

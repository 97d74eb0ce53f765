//! Publishes gamepad reports through virtual HID devices created with uhid,
//! one device per controller port.
//!
//! The kernel tells us through output events when a device is started and
//! when some process opens it. Reports are only written to devices that are
//! open; the latest report of every port is kept so it can be written as
//! soon as the device is opened and served for GET_REPORT requests.
use std::{fs::File, io::ErrorKind};

use packed_struct::prelude::*;
use uhid_virt::{Bus, CreateParams, OutputEvent, ReportType, StreamError, UHIDDevice};

use crate::drivers::usb_gamepad::{
    hid_report::GamepadReport, report_descriptor::REPORT_DESCRIPTOR, MANUFACTURER, PID, PRODUCT,
    VERSION, VID,
};

use super::{ReportSink, SinkError};

/// Maximum number of output events handled per device in one cycle
const MAX_EVENTS_PER_POLL: usize = 16;

/// Error code sent back for report requests the device does not support
const EIO: u16 = 5;

/// Host side state of one virtual device
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum HostState {
    /// Device was created but the kernel has not started it yet
    #[default]
    Created,
    /// Kernel driver is bound, nobody reads the device
    Started,
    /// At least one process reads the device
    Opened,
    /// Kernel driver was unbound
    Stopped,
}

/// Reply the kernel expects for an output event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    None,
    /// Answer a GET_REPORT request with the current input report
    InputReport { id: u32 },
    /// Reject a GET_REPORT request
    GetReportError { id: u32 },
    /// Reject a SET_REPORT request
    SetReportError { id: u32 },
}

impl HostState {
    pub fn is_open(&self) -> bool {
        *self == HostState::Opened
    }

    /// Apply an output event to the state and return the reply to send
    pub fn handle_event(&mut self, event: &OutputEvent) -> Reply {
        match event {
            OutputEvent::Start { dev_flags: _ } => {
                log::debug!("Start event received");
                *self = HostState::Started;
                Reply::None
            }
            OutputEvent::Stop => {
                log::debug!("Stop event received");
                *self = HostState::Stopped;
                Reply::None
            }
            OutputEvent::Open => {
                log::debug!("Open event received");
                *self = HostState::Opened;
                Reply::None
            }
            OutputEvent::Close => {
                log::debug!("Close event received");
                if *self == HostState::Opened {
                    *self = HostState::Started;
                }
                Reply::None
            }
            OutputEvent::Output { data } => {
                log::trace!("Got output data: {:?}", data);
                Reply::None
            }
            OutputEvent::GetReport {
                id,
                report_number,
                report_type,
            } => {
                log::trace!(
                    "Received GetReport event: id: {id}, num: {report_number}, type: {:?}",
                    report_type
                );
                if *report_type == ReportType::Input {
                    Reply::InputReport { id: *id }
                } else {
                    Reply::GetReportError { id: *id }
                }
            }
            OutputEvent::SetReport {
                id,
                report_number,
                report_type,
                data,
            } => {
                log::debug!(
                    "Received SetReport event: id: {id}, num: {report_number}, type: {:?}, data: {:?}",
                    report_type,
                    data
                );
                Reply::SetReportError { id: *id }
            }
        }
    }
}

/// One virtual gamepad and what the host knows about it
struct VirtualGamepad {
    device: UHIDDevice<File>,
    host: HostState,
    state: GamepadReport,
}

impl VirtualGamepad {
    /// Write the current state to the virtual HID
    fn write_state(&mut self) -> Result<(), SinkError> {
        let data = self.state.pack()?;
        if let Err(e) = self.device.write(&data) {
            return Err(SinkError::Write(format!("{e:?}")));
        }
        Ok(())
    }

    /// Handle pending output events from the kernel
    fn poll(&mut self) -> Result<(), SinkError> {
        for _ in 0..MAX_EVENTS_PER_POLL {
            let event = match self.device.read() {
                Ok(event) => event,
                Err(StreamError::Io(e)) if e.kind() == ErrorKind::WouldBlock => break,
                Err(StreamError::Io(e)) => return Err(SinkError::Write(format!("{e:?}"))),
                Err(StreamError::UnknownEventType(e)) => {
                    log::debug!("Unknown event type: {:?}", e);
                    continue;
                }
            };

            let was_open = self.host.is_open();
            let reply = self.host.handle_event(&event);
            self.reply(reply)?;
            if !was_open && self.host.is_open() {
                self.write_state()?;
            }
        }

        Ok(())
    }

    fn reply(&mut self, reply: Reply) -> Result<(), SinkError> {
        let result = match reply {
            Reply::None => return Ok(()),
            Reply::InputReport { id } => {
                let data = self.state.pack()?;
                self.device.write_get_report_reply(id, 0, data.to_vec())
            }
            Reply::GetReportError { id } => self.device.write_get_report_reply(id, EIO, vec![]),
            Reply::SetReportError { id } => self.device.write_set_report_reply(id, EIO),
        };
        if let Err(e) = result {
            return Err(SinkError::Write(format!("{e:?}")));
        }
        Ok(())
    }
}

pub struct UhidGamepads {
    gamepads: Vec<VirtualGamepad>,
}

impl UhidGamepads {
    pub fn new(ports: usize) -> Result<Self, SinkError> {
        let gamepads = (0..ports)
            .map(|port| {
                Ok(VirtualGamepad {
                    device: create_virtual_device(port)?,
                    host: HostState::default(),
                    state: GamepadReport::default(),
                })
            })
            .collect::<Result<Vec<_>, SinkError>>()?;
        Ok(Self { gamepads })
    }
}

/// Create the virtual device for the given port
fn create_virtual_device(port: usize) -> Result<UHIDDevice<File>, SinkError> {
    let device = UHIDDevice::create(CreateParams {
        name: format!("{PRODUCT} P{}", port + 1),
        phys: String::from(""),
        uniq: format!("{:04}", port + 1),
        bus: Bus::USB,
        vendor: VID as u32,
        product: PID as u32,
        version: VERSION as u32,
        country: 0,
        rd_data: REPORT_DESCRIPTOR.to_vec(),
    })
    .map_err(SinkError::Create)?;
    log::debug!(
        "Created virtual {MANUFACTURER} gamepad {VID:04x}:{PID:04x} for P{}",
        port + 1
    );

    Ok(device)
}

impl ReportSink for UhidGamepads {
    /// Handle output events of every device. A failing device does not keep
    /// the others from being serviced.
    fn poll(&mut self) -> Result<(), SinkError> {
        let mut result = Ok(());
        for (port, gamepad) in self.gamepads.iter_mut().enumerate() {
            if let Err(e) = gamepad.poll() {
                log::debug!("Failed to handle events for P{}: {e}", port + 1);
                result = Err(e);
            }
        }
        result
    }

    /// The host is ready once it has opened any of the virtual gamepads
    fn is_ready(&self) -> bool {
        self.gamepads.iter().any(|gamepad| gamepad.host.is_open())
    }

    fn send_report(&mut self, port: usize, report: &GamepadReport) -> Result<bool, SinkError> {
        let Some(gamepad) = self.gamepads.get_mut(port) else {
            return Err(SinkError::UnknownPort(port));
        };
        gamepad.state = *report;

        // Nobody reads this device, it gets the state once it is opened
        if !gamepad.host.is_open() {
            return Ok(true);
        }
        gamepad.write_state()?;

        Ok(true)
    }
}

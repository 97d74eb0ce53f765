//! In-process software controllers that answer joybus commands. Used to run
//! the adapter without transceiver hardware attached.
use std::{cell::RefCell, collections::HashMap, collections::VecDeque, rc::Rc};

use super::{
    channel::{ChannelBinding, Transceiver, TransceiverBackend, Unavailable},
    Command, DEVICE_TYPE_STANDARD, STATUS_SIZE,
};

#[derive(Debug, Clone)]
struct ControllerState {
    plugged: bool,
    device_type: u8,
    status: [u8; STATUS_SIZE],
    /// Number of bytes to answer with on the next command before going silent
    stall: Option<usize>,
    resets: usize,
    commands: Vec<u8>,
}

/// Shared handle to an emulated controller. Clones refer to the same
/// controller, so a handle kept by the caller can plug, unplug and press
/// buttons on a controller whose channel is owned by a port.
#[derive(Debug, Clone)]
pub struct EmulatedController {
    state: Rc<RefCell<ControllerState>>,
}

impl Default for EmulatedController {
    fn default() -> Self {
        Self::new()
    }
}

impl EmulatedController {
    /// Create an unplugged standard controller
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(ControllerState {
                plugged: false,
                device_type: DEVICE_TYPE_STANDARD,
                status: [0; STATUS_SIZE],
                stall: None,
                resets: 0,
                commands: Vec::new(),
            })),
        }
    }

    /// Create a standard controller that is plugged in
    pub fn plugged() -> Self {
        let controller = Self::new();
        controller.plug();
        controller
    }

    pub fn plug(&self) {
        self.state.borrow_mut().plugged = true;
    }

    pub fn unplug(&self) {
        self.state.borrow_mut().plugged = false;
    }

    pub fn is_plugged(&self) -> bool {
        self.state.borrow().plugged
    }

    /// Set the device type reported in the info response
    pub fn set_device_type(&self, device_type: u8) {
        self.state.borrow_mut().device_type = device_type;
    }

    /// Set the raw status bytes returned for the status command
    pub fn set_status(&self, buttons0: u8, buttons1: u8, stick_x: i8, stick_y: i8) {
        self.state.borrow_mut().status = [buttons0, buttons1, stick_x as u8, stick_y as u8];
    }

    /// Answer only `bytes` bytes of the next command, then go silent
    pub fn stall_next(&self, bytes: usize) {
        self.state.borrow_mut().stall = Some(bytes);
    }

    /// Number of times a channel bound to this controller was reset
    pub fn reset_count(&self) -> usize {
        self.state.borrow().resets
    }

    /// Command bytes received so far
    pub fn commands(&self) -> Vec<u8> {
        self.state.borrow().commands.clone()
    }

    fn respond(&self, command: u8, length: usize) -> Vec<u8> {
        let mut state = self.state.borrow_mut();
        state.commands.push(command);
        if !state.plugged {
            return Vec::new();
        }

        let mut response = if command == Command::Info as u8 {
            vec![state.device_type, 0x00, 0x00]
        } else if command == Command::Status as u8 {
            state.status.to_vec()
        } else {
            return Vec::new();
        };
        response.resize(length, 0x00);

        if let Some(bytes) = state.stall.take() {
            response.truncate(bytes);
        }

        response
    }
}

/// [Transceiver] connected to an [EmulatedController]
#[derive(Debug)]
pub struct EmulatedChannel {
    controller: EmulatedController,
    hint: Option<u8>,
    rx: VecDeque<u8>,
}

impl EmulatedChannel {
    pub fn new(controller: EmulatedController) -> Self {
        Self {
            controller,
            hint: None,
            rx: VecDeque::new(),
        }
    }
}

impl Transceiver for EmulatedChannel {
    fn send(&mut self, byte: u8) {
        // The first byte of a request is the response length hint
        let Some(hint) = self.hint.take() else {
            self.hint = Some(byte);
            return;
        };
        let response = self.controller.respond(byte, hint as usize + 1);
        self.rx.extend(response);
    }

    fn try_receive(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }

    fn reset(&mut self) {
        self.hint = None;
        self.rx.clear();
        self.controller.state.borrow_mut().resets += 1;
    }
}

/// Backend that binds each data pin to an [EmulatedController]
#[derive(Debug, Default)]
pub struct EmulatedBackend {
    controllers: HashMap<u8, EmulatedController>,
}

impl EmulatedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a controller to the given data pin
    pub fn attach(&mut self, pin: u8, controller: EmulatedController) {
        self.controllers.insert(pin, controller);
    }

    /// Returns the controller attached to the given pin
    pub fn controller(&self, pin: u8) -> Option<EmulatedController> {
        self.controllers.get(&pin).cloned()
    }
}

impl TransceiverBackend for EmulatedBackend {
    fn open(&mut self, binding: &ChannelBinding) -> Result<Box<dyn Transceiver>, Unavailable> {
        let controller = self.controllers.entry(binding.pin).or_default().clone();
        Ok(Box::new(EmulatedChannel::new(controller)))
    }
}

pub mod channel;
#[cfg(test)]
pub mod channel_test;
pub mod driver;
pub mod emulated;
pub mod status_report;
#[cfg(test)]
pub mod status_report_test;
pub mod tty;

use packed_struct::prelude::*;

// Response sizes
pub const INFO_SIZE: usize = 3;
pub const STATUS_SIZE: usize = 4;

/// Device type reported in byte 0 of the info response by a standard controller
pub const DEVICE_TYPE_STANDARD: u8 = 0x05;

/// Length hint is carried in 5 bits
pub const LENGTH_HINT_MASK: u8 = 0x1F;

/// Typical maximum absolute stick value
pub const JOYSTICK_MAX: i8 = 80;

/// Joybus commands understood by the driver
#[derive(PrimitiveEnum_u8, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    /// Get controller info (3 byte response)
    Info = 0x00,
    /// Get button/joystick status (4 byte response)
    Status = 0x01,
}

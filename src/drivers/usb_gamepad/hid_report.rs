use bitflags::bitflags;
use packed_struct::prelude::*;

use super::JOY_AXIS_CENTER;

/// Size of the packed [GamepadReport]
pub const GAMEPAD_REPORT_SIZE: usize = 5;

bitflags! {
    /// Button bits of the gamepad report. Only the low 10 bits are used.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Buttons: u16 {
        const A       = 1 << 0;
        const B       = 1 << 1;
        const Z       = 1 << 2;
        const C_UP    = 1 << 3;
        const L       = 1 << 4;
        const R       = 1 << 5;
        const C_DOWN  = 1 << 6;
        const C_LEFT  = 1 << 7;
        const C_RIGHT = 1 << 8;
        const START   = 1 << 9;
    }
}

/// Hat switch value, clockwise from up
#[derive(PrimitiveEnum_u8, Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Direction {
    Up = 0,
    UpRight = 1,
    Right = 2,
    DownRight = 3,
    Down = 4,
    DownLeft = 5,
    Left = 6,
    UpLeft = 7,
    #[default]
    Center = 8,
}

/// Gamepad input report. Each port is its own HID device, so there is no
/// report ID prefix.
#[derive(PackedStruct, Debug, Copy, Clone, PartialEq)]
#[packed_struct(bit_numbering = "msb0", size_bytes = "5")]
pub struct GamepadReport {
    // byte 0-1
    #[packed_field(bytes = "0..=1", endian = "lsb")]
    pub buttons: u16,

    // byte 2
    #[packed_field(bytes = "2", ty = "enum")]
    pub hat: Direction,

    // byte 3-4
    #[packed_field(bytes = "3")]
    pub lx: u8, // left stick X axis
    #[packed_field(bytes = "4")]
    pub ly: u8, // left stick Y axis
}

/// The all-released, centered report
impl Default for GamepadReport {
    fn default() -> Self {
        Self {
            buttons: 0,
            hat: Direction::Center,
            lx: JOY_AXIS_CENTER,
            ly: JOY_AXIS_CENTER,
        }
    }
}

impl GamepadReport {
    pub fn buttons(&self) -> Buttons {
        Buttons::from_bits_truncate(self.buttons)
    }

    pub fn set_buttons(&mut self, buttons: Buttons) {
        self.buttons = buttons.bits();
    }
}

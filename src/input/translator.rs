//! Translates N64 status frames into USB gamepad reports.
use crate::drivers::{
    n64::{status_report::StatusReport, JOYSTICK_MAX},
    usb_gamepad::{
        hid_report::{Buttons, Direction, GamepadReport},
        JOY_AXIS_MAX,
    },
};

/// D-Pad bit combinations (up=8, down=4, left=2, right=1) to hat values.
/// Opposing pairs cancel out; with three directions held the one without
/// an opposite wins.
const DPAD_TO_HAT: [Direction; 16] = [
    Direction::Center,    // 0b0000 - nothing
    Direction::Right,     // 0b0001 - right
    Direction::Left,      // 0b0010 - left
    Direction::Center,    // 0b0011 - left+right
    Direction::Down,      // 0b0100 - down
    Direction::DownRight, // 0b0101 - down+right
    Direction::DownLeft,  // 0b0110 - down+left
    Direction::Down,      // 0b0111 - down+left+right
    Direction::Up,        // 0b1000 - up
    Direction::UpRight,   // 0b1001 - up+right
    Direction::UpLeft,    // 0b1010 - up+left
    Direction::Up,        // 0b1011 - up+left+right
    Direction::Center,    // 0b1100 - up+down
    Direction::Right,     // 0b1101 - up+down+right
    Direction::Left,      // 0b1110 - up+down+left
    Direction::Center,    // 0b1111 - all
];

/// Scale an N64 axis value (nominally -80..=80) onto 0..=255. The division
/// truncates, so the stick center maps to 127 rather than 128.
pub fn scale_axis(raw: i8) -> u8 {
    let max = JOYSTICK_MAX as i32;
    let clamped = (raw as i32).clamp(-max, max);
    let scaled = ((clamped + max) * JOY_AXIS_MAX as i32) / (max * 2);
    scaled as u8
}

/// Convert the d-pad nibble into a hat switch value. Only the low 4 bits
/// are considered.
pub fn map_direction(dpad: u8) -> Direction {
    DPAD_TO_HAT[(dpad & 0x0F) as usize]
}

/// Build the gamepad report for the given status frame
pub fn convert(status: &StatusReport) -> GamepadReport {
    let mut buttons = Buttons::empty();
    buttons.set(Buttons::A, status.a);
    buttons.set(Buttons::B, status.b);
    buttons.set(Buttons::Z, status.z);
    buttons.set(Buttons::START, status.start);
    buttons.set(Buttons::L, status.l);
    buttons.set(Buttons::R, status.r);
    buttons.set(Buttons::C_UP, status.c_up);
    buttons.set(Buttons::C_DOWN, status.c_down);
    buttons.set(Buttons::C_LEFT, status.c_left);
    buttons.set(Buttons::C_RIGHT, status.c_right);

    let (x, y) = status.stick();
    let mut report = GamepadReport {
        buttons: 0,
        hat: map_direction(status.dpad_bits()),
        lx: scale_axis(x),
        // USB convention has Y growing downwards
        ly: JOY_AXIS_MAX - scale_axis(y),
    };
    report.set_buttons(buttons);

    report
}

/// The report sent when a controller goes away. This uses the nominal
/// center directly and is not the same as converting a zeroed frame.
pub fn neutral() -> GamepadReport {
    GamepadReport::default()
}

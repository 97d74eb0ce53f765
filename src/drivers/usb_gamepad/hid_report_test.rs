use std::error::Error;

use packed_struct::prelude::*;

use crate::drivers::usb_gamepad::hid_report::{
    Buttons, Direction, GamepadReport, GAMEPAD_REPORT_SIZE,
};

#[test]
fn test_pack_layout() -> Result<(), Box<dyn Error>> {
    let mut report = GamepadReport::default();
    report.set_buttons(Buttons::A | Buttons::C_RIGHT | Buttons::START);
    report.hat = Direction::DownLeft;
    report.lx = 0x12;
    report.ly = 0xEF;

    let data = report.pack()?;
    assert_eq!(data.len(), GAMEPAD_REPORT_SIZE);
    assert_eq!(
        data,
        [0x01, 0x03, 0x05, 0x12, 0xEF],
        "buttons should be little endian, followed by hat, X and Y"
    );

    Ok(())
}

#[test]
fn test_unpack_rejects_invalid_hat() {
    let result = GamepadReport::unpack(&[0x00, 0x00, 0x09, 0x80, 0x80]);
    assert!(result.is_err(), "hat values above 8 are not valid");
}

#[test]
fn test_buttons_truncate_unused_bits() {
    let report = GamepadReport {
        buttons: 0xFC01,
        ..Default::default()
    };
    assert_eq!(report.buttons(), Buttons::A);
}

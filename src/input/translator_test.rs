use std::error::Error;

use packed_struct::prelude::*;

use crate::{
    drivers::{
        n64::status_report::StatusReport,
        usb_gamepad::hid_report::{Buttons, Direction},
    },
    input::translator::{convert, map_direction, neutral, scale_axis},
};

fn frame(
    buttons0: u8,
    buttons1: u8,
    stick_x: i8,
    stick_y: i8,
) -> Result<StatusReport, Box<dyn Error>> {
    let report = StatusReport::unpack(&[buttons0, buttons1, stick_x as u8, stick_y as u8])?;
    Ok(report)
}

#[test]
fn test_scale_axis_endpoints() {
    assert_eq!(scale_axis(-80), 0);
    assert_eq!(scale_axis(80), 255);
    assert_eq!(scale_axis(40), 191);
    assert_eq!(scale_axis(-40), 63);
}

#[test]
fn test_scale_axis_center_truncates() {
    // Truncation puts the stick center one below the nominal HID center
    assert_eq!(scale_axis(0), 127);
    assert_eq!(scale_axis(1), 129);
    assert_eq!(scale_axis(-1), 125);
}

#[test]
fn test_scale_axis_monotonic() {
    let mut previous = scale_axis(-80);
    for raw in -79..=80 {
        let scaled = scale_axis(raw);
        assert!(scaled >= previous, "scale_axis({raw}) went backwards");
        previous = scaled;
    }
}

#[test]
fn test_scale_axis_clamps() {
    for raw in 81..=127 {
        assert_eq!(scale_axis(raw), 255, "{raw} should clamp to +80");
    }
    for raw in -128..=-81 {
        assert_eq!(scale_axis(raw), 0, "{raw} should clamp to -80");
    }
}

#[test]
fn test_map_direction_table() {
    let expected = [
        (0b0000, Direction::Center),
        (0b0001, Direction::Right),
        (0b0010, Direction::Left),
        (0b0011, Direction::Center),
        (0b0100, Direction::Down),
        (0b0101, Direction::DownRight),
        (0b0110, Direction::DownLeft),
        (0b0111, Direction::Down),
        (0b1000, Direction::Up),
        (0b1001, Direction::UpRight),
        (0b1010, Direction::UpLeft),
        (0b1011, Direction::Up),
        (0b1100, Direction::Center),
        (0b1101, Direction::Right),
        (0b1110, Direction::Left),
        (0b1111, Direction::Center),
    ];
    for (dpad, direction) in expected {
        assert_eq!(map_direction(dpad), direction, "d-pad {dpad:04b}");
    }
}

#[test]
fn test_map_direction_ignores_high_bits() {
    assert_eq!(map_direction(0xF8), Direction::Up);
    assert_eq!(map_direction(0x90), Direction::Center);
}

#[test]
fn test_convert_a_start_l() -> Result<(), Box<dyn Error>> {
    let status = frame(0b1001_0000, 0b0010_0000, 80, -80)?;
    let report = convert(&status);

    assert_eq!(report.buttons(), Buttons::A | Buttons::START | Buttons::L);
    // The d-pad nibble is empty here, so the hat stays centered
    assert_eq!(report.hat, Direction::Center);
    assert_eq!(report.lx, 255);
    assert_eq!(report.ly, 255, "Y is inverted: 255 - scale_axis(-80)");

    Ok(())
}

#[test]
fn test_convert_each_button_has_its_own_bit() -> Result<(), Box<dyn Error>> {
    let cases = [
        (0x80, 0x00, Buttons::A),
        (0x40, 0x00, Buttons::B),
        (0x20, 0x00, Buttons::Z),
        (0x10, 0x00, Buttons::START),
        (0x00, 0x20, Buttons::L),
        (0x00, 0x10, Buttons::R),
        (0x00, 0x08, Buttons::C_UP),
        (0x00, 0x04, Buttons::C_DOWN),
        (0x00, 0x02, Buttons::C_LEFT),
        (0x00, 0x01, Buttons::C_RIGHT),
    ];
    for (buttons0, buttons1, expected) in cases {
        let report = convert(&frame(buttons0, buttons1, 0, 0)?);
        assert_eq!(report.buttons(), expected, "{buttons0:08b} {buttons1:08b}");
    }

    // Reset is not mapped
    let report = convert(&frame(0x00, 0x80, 0, 0)?);
    assert_eq!(report.buttons, 0);

    // Only the low 10 bits are ever used
    let report = convert(&frame(0xFF, 0xFF, 0, 0)?);
    assert_eq!(report.buttons, 0x03FF);

    Ok(())
}

#[test]
fn test_convert_dpad_and_stick() -> Result<(), Box<dyn Error>> {
    let report = convert(&frame(0b0000_1001, 0x00, -80, 80)?);
    assert_eq!(report.hat, Direction::UpRight);
    assert_eq!(report.buttons, 0, "d-pad does not set button bits");
    assert_eq!(report.lx, 0);
    assert_eq!(report.ly, 0);

    Ok(())
}

#[test]
fn test_convert_is_idempotent() -> Result<(), Box<dyn Error>> {
    let status = frame(0b1100_0110, 0b0011_0101, 33, -71)?;
    let first = convert(&status).pack()?;
    let second = convert(&status).pack()?;
    assert_eq!(first, second);

    Ok(())
}

#[test]
fn test_neutral() -> Result<(), Box<dyn Error>> {
    let report = neutral();
    assert_eq!(report.buttons, 0);
    assert_eq!(report.hat, Direction::Center);
    assert_eq!(report.lx, 128);
    assert_eq!(report.ly, 128);
    assert_eq!(report.pack()?, [0x00, 0x00, 0x08, 0x80, 0x80]);

    Ok(())
}

#[test]
fn test_neutral_differs_from_zeroed_frame() -> Result<(), Box<dyn Error>> {
    // A live centered stick reports 127/128 while the synthetic neutral
    // report uses 128/128. Both values are relied on by hosts.
    let zeroed = convert(&frame(0, 0, 0, 0)?);
    assert_eq!(zeroed.lx, 127);
    assert_eq!(zeroed.ly, 128);
    assert_ne!(zeroed, neutral());

    Ok(())
}

use std::error::Error;

use packed_struct::prelude::*;

use crate::drivers::n64::status_report::StatusReport;

#[test]
fn test_unpack_status() -> Result<(), Box<dyn Error>> {
    let buf = [0b1001_0101, 0b1010_1010, 80, (-80_i8) as u8];
    let report = StatusReport::unpack(&buf)?;

    assert!(report.a, "A is bit 7 of buttons0");
    assert!(!report.b);
    assert!(!report.z);
    assert!(report.start, "Start is bit 4 of buttons0");
    assert_eq!(report.dpad_bits(), 0b0101, "d-pad is the low nibble");

    assert!(report.reset);
    assert!(report.l, "L is bit 5 of buttons1");
    assert!(!report.r);
    assert!(report.c_up);
    assert!(!report.c_down);
    assert!(report.c_left);
    assert!(!report.c_right);

    assert_eq!(report.stick(), (80, -80));

    Ok(())
}

#[test]
fn test_unpack_out_of_range_stick() -> Result<(), Box<dyn Error>> {
    // Values outside the nominal range are passed through untouched
    let buf = [0, 0, 127, 0x80];
    let report = StatusReport::unpack(&buf)?;
    assert_eq!(report.stick(), (127, -128));

    Ok(())
}

#[test]
fn test_pack_default() -> Result<(), Box<dyn Error>> {
    let report = StatusReport::default();
    assert_eq!(report.pack()?, [0, 0, 0, 0]);

    Ok(())
}

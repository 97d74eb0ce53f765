pub mod hid_report;
#[cfg(test)]
pub mod hid_report_test;
pub mod report_descriptor;

// pid.codes test VID, PID spells "n4"
pub const VID: u16 = 0x1209;
pub const PID: u16 = 0x6E34;
pub const VERSION: u16 = 0x0100;

pub const MANUFACTURER: &str = "N64-USB";
pub const PRODUCT: &str = "N64 Controller Adapter";

// Input report axis ranges
pub const JOY_AXIS_MAX: u8 = 255;
pub const JOY_AXIS_CENTER: u8 = 128;

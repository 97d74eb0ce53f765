use packed_struct::prelude::*;

/// Controller status frame returned by the [super::Command::Status] command
#[derive(PackedStruct, Debug, Copy, Clone, PartialEq)]
#[packed_struct(bit_numbering = "msb0", size_bytes = "4")]
pub struct StatusReport {
    // byte 0 (buttons0)
    #[packed_field(bits = "0")]
    pub a: bool,
    #[packed_field(bits = "1")]
    pub b: bool,
    #[packed_field(bits = "2")]
    pub z: bool,
    #[packed_field(bits = "3")]
    pub start: bool,
    /// D-Pad bits: up=8, down=4, left=2, right=1
    #[packed_field(bits = "4..=7")]
    pub dpad: Integer<u8, packed_bits::Bits<4>>,

    // byte 1 (buttons1)
    #[packed_field(bits = "8")]
    pub reset: bool,
    #[packed_field(bits = "10")]
    pub l: bool,
    #[packed_field(bits = "11")]
    pub r: bool,
    #[packed_field(bits = "12")]
    pub c_up: bool,
    #[packed_field(bits = "13")]
    pub c_down: bool,
    #[packed_field(bits = "14")]
    pub c_left: bool,
    #[packed_field(bits = "15")]
    pub c_right: bool,

    // byte 2-3
    #[packed_field(bytes = "2")]
    pub stick_x: Integer<i8, packed_bits::Bits<8>>,
    #[packed_field(bytes = "3")]
    pub stick_y: Integer<i8, packed_bits::Bits<8>>,
}

impl Default for StatusReport {
    fn default() -> Self {
        Self {
            a: false,
            b: false,
            z: false,
            start: false,
            dpad: Integer::from_primitive(0),
            reset: false,
            l: false,
            r: false,
            c_up: false,
            c_down: false,
            c_left: false,
            c_right: false,
            stick_x: Integer::from_primitive(0),
            stick_y: Integer::from_primitive(0),
        }
    }
}

impl StatusReport {
    /// Raw d-pad nibble
    pub fn dpad_bits(&self) -> u8 {
        self.dpad.to_primitive()
    }

    /// Signed stick position as `(x, y)`
    pub fn stick(&self) -> (i8, i8) {
        (self.stick_x.to_primitive(), self.stick_y.to_primitive())
    }
}

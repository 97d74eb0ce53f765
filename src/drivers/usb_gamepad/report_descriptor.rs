/// Gamepad with 16 buttons (10 used), a hat switch and two 8-bit axes
pub const REPORT_DESCRIPTOR: [u8; 67] = [
    0x05, 0x01, // Usage Page (Generic Desktop)        0
    0x09, 0x05, // Usage (Game Pad)                    2
    0xa1, 0x01, // Collection (Application)            4
    0x05, 0x09, //  Usage Page (Button)                6
    0x19, 0x01, //  Usage Minimum (1)                  8
    0x29, 0x10, //  Usage Maximum (16)                 10
    0x15, 0x00, //  Logical Minimum (0)                12
    0x25, 0x01, //  Logical Maximum (1)                14
    0x75, 0x01, //  Report Size (1)                    16
    0x95, 0x10, //  Report Count (16)                  18
    0x81, 0x02, //  Input (Data,Var,Abs)               20
    0x05, 0x01, //  Usage Page (Generic Desktop)       22
    0x09, 0x39, //  Usage (Hat switch)                 24
    0x15, 0x00, //  Logical Minimum (0)                26
    0x25, 0x07, //  Logical Maximum (7)                28
    0x35, 0x00, //  Physical Minimum (0)               30
    0x46, 0x3b, 0x01, //  Physical Maximum (315)       32
    0x65, 0x14, //  Unit (EnglishRotation: deg)        35
    0x75, 0x04, //  Report Size (4)                    37
    0x95, 0x01, //  Report Count (1)                   39
    0x81, 0x42, //  Input (Data,Var,Abs,Null)          41
    0x75, 0x04, //  Report Size (4)                    43
    0x95, 0x01, //  Report Count (1)                   45
    0x81, 0x03, //  Input (Cnst,Var,Abs)               47
    0x05, 0x01, //  Usage Page (Generic Desktop)       49
    0x09, 0x30, //  Usage (X)                          51
    0x09, 0x31, //  Usage (Y)                          53
    0x15, 0x00, //  Logical Minimum (0)                55
    0x26, 0xff, 0x00, //  Logical Maximum (255)        57
    0x75, 0x08, //  Report Size (8)                    60
    0x95, 0x02, //  Report Count (2)                   62
    0x81, 0x02, //  Input (Data,Var,Abs)               64
    0xc0, // End Collection                            66
];

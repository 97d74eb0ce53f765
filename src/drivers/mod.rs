pub mod n64;
pub mod usb_gamepad;

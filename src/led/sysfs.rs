use std::{
    fs::{self, read_to_string},
    path::{Path, PathBuf},
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedError {
    #[error("Error reading value: {0}")]
    Read(std::io::Error),

    #[error("Error writing value: {0}")]
    Write(std::io::Error),

    #[error("Path not found: {0}")]
    Path(PathBuf),

    #[error("Invalid brightness value: {0}")]
    Parse(String),
}

/// LED exposed through the sysfs leds class
#[derive(Debug)]
pub struct SysfsLed {
    brightness_path: PathBuf,
    max_brightness: u32,
    lit: Option<bool>,
}

impl SysfsLed {
    /// Open the LED in the given sysfs directory, e.g.
    /// "/sys/class/leds/adapter:green:status"
    pub fn new(syspath: &Path) -> Result<Self, LedError> {
        let brightness_path = syspath.join("brightness");
        if !brightness_path.exists() {
            return Err(LedError::Path(brightness_path));
        }

        let max_brightness_path = syspath.join("max_brightness");
        if !max_brightness_path.exists() {
            return Err(LedError::Path(max_brightness_path));
        }
        let max_brightness = read_brightness(max_brightness_path.as_path())?;
        log::debug!("LED {syspath:?} setup complete. max_brightness: {max_brightness}");

        Ok(Self {
            brightness_path,
            max_brightness,
            lit: None,
        })
    }

    /// Turn the LED fully on or off. Writes are skipped if the state did
    /// not change.
    pub fn set(&mut self, lit: bool) -> Result<(), LedError> {
        if self.lit == Some(lit) {
            return Ok(());
        }
        let brightness = if lit { self.max_brightness } else { 0 };
        fs::write(
            self.brightness_path.as_path(),
            brightness.to_string().as_str(),
        )
        .map_err(LedError::Write)?;
        self.lit = Some(lit);

        Ok(())
    }
}

fn read_brightness(path: &Path) -> Result<u32, LedError> {
    let contents = read_to_string(path).map_err(LedError::Read)?;
    let value = contents.trim();
    value
        .parse()
        .map_err(|_| LedError::Parse(value.to_string()))
}

//! Adapter status indication. The status LED pattern reflects whether the
//! host is ready and how many controllers are connected, and each port can
//! have its own LED lit while a controller is connected.
pub mod sysfs;

use std::{
    path::Path,
    time::{Duration, Instant},
};

use crate::config::AdapterConfig;

use self::sysfs::SysfsLed;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LedStatus {
    /// Host is not ready
    #[default]
    Off,
    /// No controllers connected, or a port failed to initialize
    BlinkSlow,
    /// One controller connected
    BlinkMedium,
    /// Two or more controllers connected
    On,
}

impl LedStatus {
    pub fn from_state(host_ready: bool, init_ok: bool, connected: usize) -> Self {
        if !host_ready {
            return LedStatus::Off;
        }
        if !init_ok {
            return LedStatus::BlinkSlow;
        }
        match connected {
            0 => LedStatus::BlinkSlow,
            1 => LedStatus::BlinkMedium,
            _ => LedStatus::On,
        }
    }

    /// Toggle period of blinking patterns
    pub fn period(&self) -> Option<Duration> {
        match self {
            LedStatus::BlinkSlow => Some(Duration::from_millis(1000)),
            LedStatus::BlinkMedium => Some(Duration::from_millis(300)),
            LedStatus::Off | LedStatus::On => None,
        }
    }
}

/// Turns a [LedStatus] into an on/off state over time
#[derive(Debug, Clone)]
pub struct Blinker {
    status: LedStatus,
    lit: bool,
    last_toggle: Instant,
}

impl Blinker {
    pub fn new(now: Instant) -> Self {
        Self {
            status: LedStatus::default(),
            lit: false,
            last_toggle: now,
        }
    }

    pub fn set_status(&mut self, status: LedStatus) {
        self.status = status;
    }

    pub fn status(&self) -> LedStatus {
        self.status
    }

    /// Returns whether the LED should be lit at the given time
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.status {
            LedStatus::Off => self.lit = false,
            LedStatus::On => self.lit = true,
            LedStatus::BlinkSlow | LedStatus::BlinkMedium => {
                let period = self.status.period().unwrap_or_default();
                if now.saturating_duration_since(self.last_toggle) > period {
                    self.lit = !self.lit;
                    self.last_toggle = now;
                }
            }
        }
        self.lit
    }
}

/// Drives the optional status and per-port LEDs
#[derive(Debug)]
pub struct StatusIndicator {
    blinker: Blinker,
    status_led: Option<SysfsLed>,
    port_leds: Vec<Option<SysfsLed>>,
}

impl StatusIndicator {
    /// Open every LED named in the config. LEDs that cannot be opened are
    /// skipped.
    pub fn new(config: &AdapterConfig) -> Self {
        let status_led = config.status_led.as_deref().and_then(open_led);
        let port_leds = config
            .ports
            .iter()
            .map(|port| port.led.as_deref().and_then(open_led))
            .collect();

        Self {
            blinker: Blinker::new(Instant::now()),
            status_led,
            port_leds,
        }
    }

    /// Update all LEDs from the current adapter state
    pub fn update(&mut self, host_ready: bool, init_ok: bool, connected: &[bool]) {
        let count = connected.iter().filter(|c| **c).count();
        let status = LedStatus::from_state(host_ready, init_ok, count);
        if status != self.blinker.status() {
            log::debug!("Status LED: {status:?}");
            self.blinker.set_status(status);
        }
        let lit = self.blinker.tick(Instant::now());

        if let Some(led) = self.status_led.as_mut() {
            if let Err(e) = led.set(lit) {
                log::warn!("Failed to update status LED: {e}");
            }
        }

        for (i, led) in self.port_leds.iter_mut().enumerate() {
            let Some(led) = led.as_mut() else {
                continue;
            };
            let lit = connected.get(i).copied().unwrap_or_default();
            if let Err(e) = led.set(lit) {
                log::warn!("Failed to update LED for P{}: {e}", i + 1);
            }
        }
    }
}

fn open_led(path: &str) -> Option<SysfsLed> {
    match SysfsLed::new(Path::new(path)) {
        Ok(led) => Some(led),
        Err(e) => {
            log::warn!("Unable to use LED {path}: {e}");
            None
        }
    }
}

//! Polling orchestrator. The [Manager] owns every controller port, the
//! connection session of each port and the sink reports are published to.
use crate::{
    config::AdapterConfig,
    drivers::{
        n64::{
            channel::{ChannelBinding, ChannelPool, TransceiverBackend},
            driver::{Port, Timing},
        },
        usb_gamepad::hid_report::GamepadReport,
    },
    input::{
        session::{ConnectionSession, Transition},
        target::ReportSink,
        translator,
    },
};

/// State kept for one configured controller port
#[derive(Debug)]
struct PortSlot {
    pin: u8,
    /// None if no channel could be claimed for this port
    port: Option<Port>,
    session: ConnectionSession,
}

/// Connects every controller port to the report sink
pub struct Manager {
    slots: Vec<PortSlot>,
    sink: Box<dyn ReportSink>,
    init_ok: bool,
}

impl Manager {
    /// Claim a channel and probe the controller for every configured port.
    /// Ports that cannot get a channel are kept as failed ports so port
    /// numbering stays stable.
    pub fn new(
        config: &AdapterConfig,
        backend: &mut dyn TransceiverBackend,
        sink: Box<dyn ReportSink>,
    ) -> Self {
        let mut pool = ChannelPool::from_config(&config.lanes, config.program_length);
        let timing: Timing = config.timing.into();

        let mut init_ok = true;
        let mut slots = Vec::with_capacity(config.ports.len());
        for (i, port_config) in config.ports.iter().enumerate() {
            let pin = port_config.pin;
            let port = match Port::init(&mut pool, backend, pin, timing) {
                Ok(port) => {
                    log::info!("Controller {} on GP{pin}: OK", i + 1);
                    log::debug!("P{} bound to {}", i + 1, port.binding());
                    Some(port)
                }
                Err(e) => {
                    log::info!("Controller {} on GP{pin}: FAILED", i + 1);
                    log::warn!("Unable to initialize P{}: {e}", i + 1);
                    init_ok = false;
                    None
                }
            };
            slots.push(PortSlot {
                pin,
                port,
                session: ConnectionSession::new(),
            });
        }

        Self {
            slots,
            sink,
            init_ok,
        }
    }

    /// Whether every configured port got a channel
    pub fn init_ok(&self) -> bool {
        self.init_ok
    }

    /// Whether the sink can currently accept reports
    pub fn is_ready(&self) -> bool {
        self.sink.is_ready()
    }

    /// Number of configured ports, including failed ones
    pub fn port_count(&self) -> usize {
        self.slots.len()
    }

    /// Channel binding of the given port, if it has one
    pub fn binding(&self, index: usize) -> Option<&ChannelBinding> {
        self.slots.get(index)?.port.as_ref().map(|p| p.binding())
    }

    /// Data pin of the given port
    pub fn pin(&self, index: usize) -> Option<u8> {
        self.slots.get(index).map(|slot| slot.pin)
    }

    pub fn session(&self, index: usize) -> Option<&ConnectionSession> {
        self.slots.get(index).map(|slot| &slot.session)
    }

    /// Connected flag of every port, in port order
    pub fn connected_states(&self) -> Vec<bool> {
        self.slots
            .iter()
            .map(|slot| slot.port.as_ref().is_some_and(|p| p.is_connected()))
            .collect()
    }

    pub fn connected_count(&self) -> usize {
        self.connected_states().into_iter().filter(|c| *c).count()
    }

    /// Run one polling cycle across all ports. Nothing is read while the
    /// sink is not ready.
    pub fn poll(&mut self) {
        if let Err(e) = self.sink.poll() {
            log::warn!("Failed to handle host requests: {e}");
        }
        if !self.sink.is_ready() {
            return;
        }

        for (index, slot) in self.slots.iter_mut().enumerate() {
            let Some(port) = slot.port.as_mut() else {
                continue;
            };

            let result = port.read();
            match slot.session.update(result.is_ok()) {
                Transition::Connected => {
                    log::info!("[P{}] Connected (GP{})", index + 1, slot.pin);
                }
                Transition::Reconnected(count) => {
                    log::info!(
                        "[P{}] Reconnected (GP{}) - #{count}",
                        index + 1,
                        slot.pin
                    );
                }
                Transition::Disconnected => {
                    log::info!("[P{}] Disconnected (GP{})", index + 1, slot.pin);
                    publish(self.sink.as_mut(), index, &translator::neutral());
                }
                Transition::Unchanged => (),
            }

            match result {
                Ok(status) => {
                    let report = translator::convert(&status);
                    publish(self.sink.as_mut(), index, &report);
                }
                Err(e) => {
                    log::trace!("[P{}] {e}", index + 1);
                }
            }
        }
    }

    /// Send a neutral report to every port with an active session so the
    /// host does not keep stale input after exit.
    pub fn shutdown(&mut self) {
        log::info!("Releasing all controller ports");
        for (index, slot) in self.slots.iter().enumerate() {
            if !slot.session.is_active() {
                continue;
            }
            publish(self.sink.as_mut(), index, &translator::neutral());
        }
    }
}

/// Send a report, logging instead of failing when it is not accepted
fn publish(sink: &mut dyn ReportSink, index: usize, report: &GamepadReport) {
    match sink.send_report(index, report) {
        Ok(true) => log::trace!("[P{}] Sent report: {report:?}", index + 1),
        Ok(false) => log::warn!("[P{}] Report was not accepted", index + 1),
        Err(e) => log::warn!("[P{}] Failed to send report: {e}", index + 1),
    }
}

use std::{cell::RefCell, error::Error, rc::Rc};

use joybridge::{
    config::AdapterConfig,
    drivers::{
        n64::emulated::{EmulatedBackend, EmulatedController},
        usb_gamepad::hid_report::{Buttons, Direction, GamepadReport},
    },
    input::{
        manager::Manager,
        session::Transition,
        target::{ReportSink, SinkError},
        translator,
    },
    led::LedStatus,
};

type Sent = Rc<RefCell<Vec<(usize, GamepadReport)>>>;

struct RecordingSink {
    sent: Sent,
}

impl ReportSink for RecordingSink {
    fn send_report(&mut self, port: usize, report: &GamepadReport) -> Result<bool, SinkError> {
        self.sent.borrow_mut().push((port, *report));
        Ok(true)
    }
}

fn setup(controllers: &[EmulatedController]) -> (Manager, Sent) {
    let config = AdapterConfig::from_yaml(
        r#"
version: 1
kind: AdapterConfig
name: Test Adapter
backend: emulated
sink: debug
timing:
  byte_timeout_us: 200
  settle_per_byte_us: 0
  settle_floor_us: 0
ports:
  - pin: 18
  - pin: 19
"#
        .to_string(),
    )
    .expect("valid test config");

    let mut backend = EmulatedBackend::new();
    for (port, controller) in config.ports.iter().zip(controllers) {
        backend.attach(port.pin, controller.clone());
    }
    let sent: Sent = Rc::new(RefCell::new(Vec::new()));
    let sink = RecordingSink { sent: sent.clone() };
    let manager = Manager::new(&config, &mut backend, Box::new(sink));

    (manager, sent)
}

#[test]
fn test_standard_controller_connects_at_init() -> Result<(), Box<dyn Error>> {
    let p1 = EmulatedController::plugged();
    let (manager, _) = setup(&[p1]);

    assert!(manager.init_ok());
    assert_eq!(manager.connected_states(), vec![true, false]);

    Ok(())
}

#[test]
fn test_unknown_device_type_is_not_connected() -> Result<(), Box<dyn Error>> {
    let p1 = EmulatedController::plugged();
    p1.set_device_type(0xFF);
    let (manager, _) = setup(&[p1]);

    assert!(manager.init_ok(), "init still succeeds");
    assert_eq!(manager.connected_states(), vec![false, false]);

    Ok(())
}

#[test]
fn test_buttons_and_sticks_reach_the_host() -> Result<(), Box<dyn Error>> {
    let p1 = EmulatedController::plugged();
    p1.set_status(0b1001_0000, 0b0010_0000, 80, -80);
    let (mut manager, sent) = setup(&[p1]);

    manager.poll();

    let sent = sent.borrow();
    let (port, report) = sent.first().ok_or("no report sent")?;
    assert_eq!(*port, 0);
    assert_eq!(report.buttons(), Buttons::A | Buttons::START | Buttons::L);
    assert_eq!(report.hat, Direction::Center, "d-pad nibble is zero");
    assert_eq!(report.lx, 255);
    assert_eq!(report.ly, 255);

    Ok(())
}

#[test]
fn test_unplug_flushes_neutral_report() -> Result<(), Box<dyn Error>> {
    let p1 = EmulatedController::plugged();
    p1.set_status(0b1000_0000, 0, 40, 40);
    let (mut manager, sent) = setup(&[p1.clone()]);
    manager.poll();

    p1.unplug();
    sent.borrow_mut().clear();
    manager.poll();

    assert_eq!(sent.borrow().as_slice(), &[(0, translator::neutral())]);
    let session = manager.session(0).ok_or("no session")?;
    assert_eq!(session.reconnect_count(), 1);
    assert!(!session.is_active());

    Ok(())
}

#[test]
fn test_reconnect_counting() -> Result<(), Box<dyn Error>> {
    let p1 = EmulatedController::plugged();
    let (mut manager, _) = setup(&[p1.clone()]);

    manager.poll();
    assert_eq!(manager.session(0).ok_or("no session")?.reconnect_count(), 1);

    p1.unplug();
    manager.poll();
    p1.plug();
    manager.poll();
    assert_eq!(manager.session(0).ok_or("no session")?.reconnect_count(), 2);

    // Replaying the same sequence on a fresh session gives the same edges
    let mut session = joybridge::input::session::ConnectionSession::new();
    assert_eq!(session.update(true), Transition::Connected);
    assert_eq!(session.update(false), Transition::Disconnected);
    assert_eq!(session.update(true), Transition::Reconnected(2));

    Ok(())
}

#[test]
fn test_status_led_follows_connections() -> Result<(), Box<dyn Error>> {
    let p1 = EmulatedController::plugged();
    let p2 = EmulatedController::new();
    let (mut manager, _) = setup(&[p1, p2.clone()]);
    manager.poll();
    let status = LedStatus::from_state(true, manager.init_ok(), manager.connected_count());
    assert_eq!(status, LedStatus::BlinkMedium);

    p2.plug();
    manager.poll();
    let status = LedStatus::from_state(true, manager.init_ok(), manager.connected_count());
    assert_eq!(status, LedStatus::On);

    Ok(())
}

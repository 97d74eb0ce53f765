use crate::input::session::{ConnectionSession, SessionState, Transition};

#[test]
fn test_initial_state() {
    let session = ConnectionSession::new();
    assert_eq!(session.state(), SessionState::Idle);
    assert_eq!(session.reconnect_count(), 0);
    assert!(!session.is_active());
}

#[test]
fn test_connect_then_reconnect() {
    let mut session = ConnectionSession::new();

    assert_eq!(session.update(true), Transition::Connected);
    assert_eq!(session.reconnect_count(), 1);
    assert_eq!(session.update(true), Transition::Unchanged);

    assert_eq!(session.update(false), Transition::Disconnected);
    assert_eq!(
        session.reconnect_count(),
        1,
        "disconnecting should not change the count"
    );
    assert_eq!(session.update(false), Transition::Unchanged);

    assert_eq!(session.update(true), Transition::Reconnected(2));
    assert_eq!(session.reconnect_count(), 2);

    session.update(false);
    assert_eq!(session.update(true), Transition::Reconnected(3));
}

#[test]
fn test_idle_stays_idle() {
    let mut session = ConnectionSession::new();
    for _ in 0..5 {
        assert_eq!(session.update(false), Transition::Unchanged);
    }
    assert_eq!(session.reconnect_count(), 0);
    assert_eq!(session.state(), SessionState::Idle);
}

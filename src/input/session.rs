//! Per-port connection tracking. Transitions are edge-triggered between two
//! consecutive polling cycles, there is no time-windowed filtering.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No confirmed responder
    #[default]
    Idle,
    /// Controller answered the last status read
    Active,
}

/// Result of feeding one polling cycle into a [ConnectionSession]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// First controller seen on this port
    Connected,
    /// A controller came back; carries the connect ordinal (2, 3, ...)
    Reconnected(u32),
    /// The controller stopped responding
    Disconnected,
    /// Nothing changed
    Unchanged,
}

#[derive(Debug, Clone, Default)]
pub struct ConnectionSession {
    state: SessionState,
    reconnect_count: u32,
}

impl ConnectionSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the session with whether the controller responded this cycle
    pub fn update(&mut self, responding: bool) -> Transition {
        let transition = match (self.state, responding) {
            (SessionState::Idle, true) => {
                self.reconnect_count += 1;
                if self.reconnect_count == 1 {
                    Transition::Connected
                } else {
                    Transition::Reconnected(self.reconnect_count)
                }
            }
            (SessionState::Active, false) => Transition::Disconnected,
            _ => Transition::Unchanged,
        };

        self.state = if responding {
            SessionState::Active
        } else {
            SessionState::Idle
        };

        transition
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    /// Number of idle to active transitions seen so far
    pub fn reconnect_count(&self) -> u32 {
        self.reconnect_count
    }
}

//! Connection lifecycle state.
//!
//! The socket owns the state cell; views observe it through a cheap clone
//! that cannot change it.

use std::cell::Cell;
use std::rc::Rc;

/// Connection state of the game socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// Created, transport not yet open
    #[default]
    Connecting,
    /// Open and able to carry frames
    Connected,
    /// Closed by either side; a closed socket is never reopened
    Closed,
}

impl ConnectionState {
    pub fn is_open(self) -> bool {
        self == ConnectionState::Connected
    }
}

/// Read-only view of a socket's connection state for UI binding.
#[derive(Clone, Debug)]
pub struct ConnectionStateObserver {
    state: Rc<Cell<ConnectionState>>,
}

impl ConnectionStateObserver {
    pub(crate) fn new(state: Rc<Cell<ConnectionState>>) -> Self {
        Self { state }
    }

    /// Get the current connection state.
    pub fn state(&self) -> ConnectionState {
        self.state.get()
    }

    /// Check if currently connected.
    pub fn is_connected(&self) -> bool {
        self.state().is_open()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observer_reads_state() {
        let state = Rc::new(Cell::new(ConnectionState::default()));
        let observer = ConnectionStateObserver::new(Rc::clone(&state));

        assert_eq!(observer.state(), ConnectionState::Connecting);
        assert!(!observer.is_connected());

        state.set(ConnectionState::Connected);
        assert!(observer.is_connected());

        state.set(ConnectionState::Closed);
        assert_eq!(observer.state(), ConnectionState::Closed);
        assert!(!observer.is_connected());
    }
}

use std::sync::atomic::{AtomicU8, Ordering};

use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Lifecycle state of a single peripheral. The only legal edges are
/// Disconnected→Connecting→Connected→Disconnecting→Disconnected, plus
/// Connecting→Disconnected for a failed or cancelled attempt.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Display, Serialize, Deserialize)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Disconnecting,
}

impl ConnectionState {
    /// Whether the peripheral occupies a slot counted against the device
    /// connection limit.
    pub fn is_engaged(&self) -> bool {
        matches!(self, ConnectionState::Connecting | ConnectionState::Connected)
    }

    pub(crate) fn can_transition_to(&self, next: ConnectionState) -> bool {
        use ConnectionState::*;
        matches!(
            (self, next),
            (Disconnected, Connecting)
                | (Connecting, Connected)
                | (Connecting, Disconnected)
                | (Connected, Disconnecting)
                | (Disconnecting, Disconnected)
        )
    }
}

/// Connection state cell shared between the coordinator (sole writer) and
/// any number of handle clones held by callers.
#[derive(Debug)]
pub(crate) struct SharedConnectionState(AtomicU8);

impl SharedConnectionState {
    pub(crate) fn new(state: ConnectionState) -> Self {
        Self(AtomicU8::new(state as u8))
    }

    pub(crate) fn load(&self) -> ConnectionState {
        match self.0.load(Ordering::SeqCst) {
            0 => ConnectionState::Disconnected,
            1 => ConnectionState::Connecting,
            2 => ConnectionState::Connected,
            3 => ConnectionState::Disconnecting,
            other => unreachable!("Invalid connection state discriminant: {other}"),
        }
    }

    pub(crate) fn store(&self, state: ConnectionState) {
        self.0.store(state as u8, Ordering::SeqCst);
    }
}

impl Default for SharedConnectionState {
    fn default() -> Self {
        Self::new(ConnectionState::Disconnected)
    }
}

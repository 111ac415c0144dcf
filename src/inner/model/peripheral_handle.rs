use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::inner::model::connection_state::{ConnectionState, SharedConnectionState};
use crate::inner::model::peripheral_id::PeripheralId;

/// Caller-facing reference to one physical device. Cloning is cheap and all
/// clones share the same connection state cell; the coordinator owning the
/// peripheral is the only writer of that cell.
#[derive(Debug, Clone)]
pub struct PeripheralHandle {
    id: PeripheralId,
    name: Option<Arc<String>>,
    state: Arc<SharedConnectionState>,
}

impl PeripheralHandle {
    pub fn new(id: PeripheralId, name: Option<&str>) -> Self {
        Self {
            id,
            name: name.map(|name| Arc::new(name.to_string())),
            state: Arc::new(SharedConnectionState::default()),
        }
    }

    pub fn id(&self) -> PeripheralId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().map(String::as_str)
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.state.load()
    }

    pub(crate) fn set_connection_state(&self, next: ConnectionState) {
        debug_assert!(
            self.state.load().can_transition_to(next),
            "Illegal transition {} -> {next} for {self}",
            self.state.load(),
        );
        self.state.store(next);
    }
}

impl Display for PeripheralHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = self.name().unwrap_or("Unknown");
        write!(f, "{name}[{}]", self.id)
    }
}

impl PartialEq for PeripheralHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PeripheralHandle {}

impl Hash for PeripheralHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let handle = PeripheralHandle::new(PeripheralId::random(), Some("Scale"));
        let clone = handle.clone();
        handle.set_connection_state(ConnectionState::Connecting);
        assert_eq!(clone.connection_state(), ConnectionState::Connecting);
    }

    #[test]
    fn equality_by_id_only() {
        let id = PeripheralId::random();
        let first = PeripheralHandle::new(id, Some("Left bud"));
        let second = PeripheralHandle::new(id, Some("Right bud"));
        assert_eq!(first, second);
        assert_ne!(first, PeripheralHandle::new(PeripheralId::random(), None));
    }

    #[test]
    fn displays_name_and_id() {
        let id = PeripheralId::random();
        let named = PeripheralHandle::new(id, Some("Thermometer"));
        assert_eq!(format!("{named}"), format!("Thermometer[{id}]"));
        let unnamed = PeripheralHandle::new(id, None);
        assert_eq!(format!("{unnamed}"), format!("Unknown[{id}]"));
    }
}

use dashmap::DashMap;
use tracing::debug;

use crate::inner::error::ConnectionError;
use crate::inner::model::connection_state::ConnectionState;
use crate::inner::model::peripheral_handle::PeripheralHandle;
use crate::inner::model::peripheral_id::PeripheralId;

/// Pre-flight policy check for connection requests. Pure: it never mutates
/// the registry, the coordinator event loop performs the transition right
/// after a successful check, so check-then-mutate is atomic on that loop.
#[derive(Debug)]
pub(crate) struct AdmissionController {
    device_connection_limit: usize,
}

impl AdmissionController {
    pub(crate) fn new(device_connection_limit: usize) -> Self {
        Self {
            device_connection_limit,
        }
    }

    pub(crate) fn admit(
        &self,
        handle: &PeripheralHandle,
        registry: &DashMap<PeripheralId, PeripheralHandle>,
    ) -> Result<(), ConnectionError> {
        // The registry entry is authoritative: a caller may hold a fresh
        // handle instance for an identity that is already tracked.
        let state = registry
            .get(&handle.id())
            .map(|tracked| tracked.connection_state())
            .unwrap_or_else(|| handle.connection_state());

        if state != ConnectionState::Disconnected {
            debug!(%handle, %state, "Rejecting connect: peripheral is not disconnected");
            return Err(ConnectionError::DeviceAlreadyConnected);
        }

        let engaged = self.engaged_count(registry);
        if engaged >= self.device_connection_limit {
            debug!(%handle, engaged, limit = self.device_connection_limit, "Rejecting connect: device limit reached");
            return Err(ConnectionError::DeviceConnectionLimitExceed);
        }

        Ok(())
    }

    pub(crate) fn engaged_count(&self, registry: &DashMap<PeripheralId, PeripheralHandle>) -> usize {
        registry
            .iter()
            .filter(|entry| entry.value().connection_state().is_engaged())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(states: &[ConnectionState]) -> DashMap<PeripheralId, PeripheralHandle> {
        let registry = DashMap::new();
        for state in states {
            let handle = PeripheralHandle::new(PeripheralId::random(), None);
            if *state != ConnectionState::Disconnected {
                handle.set_connection_state(ConnectionState::Connecting);
                if *state != ConnectionState::Connecting {
                    handle.set_connection_state(ConnectionState::Connected);
                    if *state == ConnectionState::Disconnecting {
                        handle.set_connection_state(ConnectionState::Disconnecting);
                    }
                }
            }
            registry.insert(handle.id(), handle);
        }
        registry
    }

    #[test]
    fn admits_fresh_peripheral() {
        let controller = AdmissionController::new(8);
        let registry = registry_with(&[ConnectionState::Connected]);
        let handle = PeripheralHandle::new(PeripheralId::random(), None);
        assert!(controller.admit(&handle, &registry).is_ok());
    }

    #[test]
    fn rejects_non_disconnected_handle() {
        let controller = AdmissionController::new(8);
        let registry = DashMap::new();
        let handle = PeripheralHandle::new(PeripheralId::random(), None);
        handle.set_connection_state(ConnectionState::Connecting);
        assert_eq!(
            controller.admit(&handle, &registry),
            Err(ConnectionError::DeviceAlreadyConnected)
        );
    }

    #[test]
    fn rejects_tracked_identity_behind_fresh_handle() {
        let controller = AdmissionController::new(8);
        let registry = DashMap::new();
        let tracked = PeripheralHandle::new(PeripheralId::random(), None);
        tracked.set_connection_state(ConnectionState::Connecting);
        registry.insert(tracked.id(), tracked.clone());

        // Same identity, separate state cell.
        let fresh = PeripheralHandle::new(tracked.id(), None);
        assert_eq!(
            controller.admit(&fresh, &registry),
            Err(ConnectionError::DeviceAlreadyConnected)
        );
    }

    #[test]
    fn rejects_when_engaged_count_reaches_limit() {
        let controller = AdmissionController::new(2);
        let registry = registry_with(&[ConnectionState::Connecting, ConnectionState::Connected]);
        let handle = PeripheralHandle::new(PeripheralId::random(), None);
        assert_eq!(
            controller.admit(&handle, &registry),
            Err(ConnectionError::DeviceConnectionLimitExceed)
        );
    }

    #[test]
    fn disconnecting_peripherals_do_not_hold_slots() {
        let controller = AdmissionController::new(2);
        let registry = registry_with(&[ConnectionState::Connected, ConnectionState::Disconnecting]);
        let handle = PeripheralHandle::new(PeripheralId::random(), None);
        assert!(controller.admit(&handle, &registry).is_ok());
        assert_eq!(controller.engaged_count(&registry), 1);
    }
}

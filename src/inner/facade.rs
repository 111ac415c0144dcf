use std::sync::{Arc, RwLock};

use crate::inner::conf::ConnectionConf;
use crate::inner::coordinator::ConnectionCoordinator;
use crate::inner::error::{ConnectionError, DisconnectionError};
use crate::inner::model::peripheral_handle::PeripheralHandle;
use crate::inner::transport::{AdvertisementValidationHandler, NativeTransport};

/// Public surface combining admission control and the connection
/// coordinator behind `connect`/`disconnect`. Construct one instance at the
/// application's composition root and share it by reference; the native
/// transport owns the underlying radio resource, so no explicit teardown is
/// needed beyond dropping this value.
pub struct BluetoothConnection {
    coordinator: ConnectionCoordinator,
    transport: Arc<dyn NativeTransport>,
    advertisement_validation_handler: RwLock<Option<AdvertisementValidationHandler>>,
}

impl BluetoothConnection {
    /// Spawns the coordinator event loop, so this must be called within a
    /// Tokio runtime.
    pub fn new(transport: Arc<dyn NativeTransport>, conf: ConnectionConf) -> Self {
        Self {
            coordinator: ConnectionCoordinator::new(Arc::clone(&transport), &conf),
            transport,
            advertisement_validation_handler: RwLock::new(None),
        }
    }

    /// Connect to a device. Resolves exactly once: `Ok` when the transport
    /// reports the link up, or with one of the admission or translated
    /// transport errors.
    pub async fn connect(&self, peripheral: &PeripheralHandle) -> Result<(), ConnectionError> {
        self.coordinator.request_connect(peripheral.clone()).await
    }

    /// Disconnect a device. An in-flight connection attempt is abandoned:
    /// its original `connect` caller resolves with
    /// [`ConnectionError::ConnectionAborted`] and the transport is asked to
    /// cancel the attempt.
    pub async fn disconnect(&self, peripheral: &PeripheralHandle) -> Result<(), DisconnectionError> {
        self.coordinator.request_disconnect(peripheral.clone()).await
    }

    /// Amount of peripherals currently holding a connection slot, i.e. in
    /// Connecting or Connected state.
    pub fn connected_devices_amount(&self) -> usize {
        self.coordinator.engaged_count()
    }

    pub fn connected_peripherals(&self) -> Vec<PeripheralHandle> {
        self.coordinator.connected_peripherals()
    }

    /// The discovery-time validation hook, if any.
    pub fn advertisement_validation_handler(&self) -> Option<AdvertisementValidationHandler> {
        self.advertisement_validation_handler
            .read()
            .expect("Advertisement handler lock poisoned")
            .clone()
    }

    /// Install (or clear) the discovery-time validation hook and propagate
    /// it to the transport's scanning subsystem. The coordinator itself
    /// performs no logic on it.
    pub fn set_advertisement_validation_handler(
        &self,
        handler: Option<AdvertisementValidationHandler>,
    ) {
        self.transport
            .set_advertisement_validation_handler(handler.clone());
        *self
            .advertisement_validation_handler
            .write()
            .expect("Advertisement handler lock poisoned") = handler;
    }
}

use std::sync::Arc;

use dashmap::DashMap;
use kanal::AsyncSender;
use tokio::task::JoinHandle;
use tracing::trace;

use crate::inner::admission::AdmissionController;
use crate::inner::conf::ConnectionConf;
use crate::inner::coordinator::command::Command;
use crate::inner::coordinator::event_loop::EventLoop;
use crate::inner::error::{ConnectResult, ConnectionError, DisconnectResult, DisconnectionError};
use crate::inner::model::connection_state::ConnectionState;
use crate::inner::model::peripheral_handle::PeripheralHandle;
use crate::inner::model::peripheral_id::PeripheralId;
use crate::inner::transport::NativeTransport;

mod command;
mod event_loop;

/// Owns the serialized event loop task and the shared peripheral registry.
/// Requests are messages; each carries a oneshot responder that fires
/// exactly once when the request resolves.
pub(crate) struct ConnectionCoordinator {
    command_sender: AsyncSender<Command>,
    registry: Arc<DashMap<PeripheralId, PeripheralHandle>>,
    event_loop: JoinHandle<()>,
}

impl Drop for ConnectionCoordinator {
    fn drop(&mut self) {
        self.event_loop.abort();
    }
}

impl ConnectionCoordinator {
    pub(crate) fn new(transport: Arc<dyn NativeTransport>, conf: &ConnectionConf) -> Self {
        let (command_sender, command_receiver) = kanal::unbounded_async::<Command>();
        let registry = Arc::new(DashMap::new());

        let event_loop = EventLoop::new(
            transport,
            AdmissionController::new(conf.device_connection_limit),
            Arc::clone(&registry),
            command_sender.clone(),
        );

        Self {
            command_sender,
            registry,
            event_loop: tokio::spawn(event_loop.run(command_receiver)),
        }
    }

    pub(crate) async fn request_connect(&self, handle: PeripheralHandle) -> ConnectResult {
        let (responder, completion) = tokio::sync::oneshot::channel();
        self.command_sender
            .send(Command::Connect { handle, responder })
            .await
            .map_err(|err| ConnectionError::ConnectionFailed(err.to_string()))?;
        completion
            .await
            .unwrap_or_else(|_| Err(ConnectionError::ConnectionFailed("Coordinator stopped".to_string())))
    }

    pub(crate) async fn request_disconnect(&self, handle: PeripheralHandle) -> DisconnectResult {
        let (responder, completion) = tokio::sync::oneshot::channel();
        if self
            .command_sender
            .send(Command::Disconnect { handle, responder })
            .await
            .is_err()
        {
            trace!("Coordinator stopped, treating disconnect as not connected");
            return Err(DisconnectionError::DeviceNotConnected);
        }
        completion
            .await
            .unwrap_or(Err(DisconnectionError::DeviceNotConnected))
    }

    /// Peripherals currently occupying a connection slot.
    pub(crate) fn engaged_count(&self) -> usize {
        self.registry
            .iter()
            .filter(|entry| entry.value().connection_state().is_engaged())
            .count()
    }

    pub(crate) fn connected_peripherals(&self) -> Vec<PeripheralHandle> {
        self.registry
            .iter()
            .filter(|entry| entry.value().connection_state() == ConnectionState::Connected)
            .map(|entry| entry.value().clone())
            .collect()
    }
}

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use futures_util::StreamExt;
use kanal::{AsyncReceiver, AsyncSender};
use tokio::sync::oneshot;
use tracing::{debug, info, trace, warn};

use crate::inner::admission::AdmissionController;
use crate::inner::coordinator::command::{Command, PendingRequest, TransportOutcome};
use crate::inner::error::{ConnectResult, ConnectionError, DisconnectResult, DisconnectionError};
use crate::inner::metrics::measure_execution_time::Measure;
use crate::inner::metrics::{
    CONNECTING_DURATION, CONNECTING_ERRORS, CONNECTIONS_ABORTED, CONNECTIONS_DROPPED,
    CONNECTIONS_ESTABLISHED, CONNECTIONS_REJECTED, CONNECTIONS_REQUESTED, DISCONNECTING_DURATION,
    ENGAGED_PERIPHERALS, STALE_COMPLETIONS_DISCARDED,
};
use crate::inner::model::connection_state::ConnectionState;
use crate::inner::model::peripheral_handle::PeripheralHandle;
use crate::inner::model::peripheral_id::PeripheralId;
use crate::inner::transport::NativeTransport;

/// Serialized execution context of the coordinator. Owns the pending-request
/// table outright and is the sole writer of the registry and of every
/// tracked handle's connection state.
pub(super) struct EventLoop {
    transport: Arc<dyn NativeTransport>,
    admission: AdmissionController,
    registry: Arc<DashMap<PeripheralId, PeripheralHandle>>,
    pending: HashMap<PeripheralId, PendingRequest>,
    next_sequence: u64,
    command_sender: AsyncSender<Command>,
}

impl EventLoop {
    pub(super) fn new(
        transport: Arc<dyn NativeTransport>,
        admission: AdmissionController,
        registry: Arc<DashMap<PeripheralId, PeripheralHandle>>,
        command_sender: AsyncSender<Command>,
    ) -> Self {
        Self {
            transport,
            admission,
            registry,
            pending: HashMap::new(),
            next_sequence: 0,
            command_sender,
        }
    }

    pub(super) async fn run(mut self, command_receiver: AsyncReceiver<Command>) {
        let mut commands = command_receiver.stream();
        while let Some(command) = commands.next().await {
            match command {
                Command::Connect { handle, responder } => self.handle_connect(handle, responder),
                Command::Disconnect { handle, responder } => {
                    self.handle_disconnect(handle, responder)
                }
                Command::TransportResolved {
                    id,
                    sequence,
                    outcome,
                } => self.handle_transport_resolved(id, sequence, outcome),
            }
            ENGAGED_PERIPHERALS.gauge(self.admission.engaged_count(&self.registry) as f64);
        }
        info!("Coordinator command channel closed, event loop exiting");
    }

    fn next_sequence(&mut self) -> u64 {
        self.next_sequence += 1;
        self.next_sequence
    }

    #[tracing::instrument(level = "debug", skip_all, fields(peripheral = %handle))]
    fn handle_connect(&mut self, handle: PeripheralHandle, responder: oneshot::Sender<ConnectResult>) {
        CONNECTIONS_REQUESTED.increment();

        if let Err(err) = self.admission.admit(&handle, &self.registry) {
            CONNECTIONS_REJECTED.increment();
            respond(responder, Err(err));
            return;
        }

        // Register the caller's handle instance so its state cell is the one
        // the coordinator keeps writing from now on.
        let handle = self
            .registry
            .entry(handle.id())
            .or_insert(handle)
            .value()
            .clone();

        let sequence = self.next_sequence();
        handle.set_connection_state(ConnectionState::Connecting);
        self.pending
            .insert(handle.id(), PendingRequest::Connect { sequence, responder });

        info!(%handle, sequence, "Dispatching connection attempt");
        let id = handle.id();
        let transport = Arc::clone(&self.transport);
        let sender = self.command_sender.clone();
        tokio::spawn(async move {
            let outcome = match transport
                .begin_connect(id)
                .measure_execution_time(CONNECTING_DURATION)
                .await
            {
                Ok(()) => TransportOutcome::Connected,
                Err(failure) => TransportOutcome::ConnectFailed(failure),
            };
            let _ = sender
                .send(Command::TransportResolved {
                    id,
                    sequence,
                    outcome,
                })
                .await;
        });
    }

    #[tracing::instrument(level = "debug", skip_all, fields(peripheral = %handle))]
    fn handle_disconnect(
        &mut self,
        handle: PeripheralHandle,
        responder: oneshot::Sender<DisconnectResult>,
    ) {
        let Some(tracked) = self.registry.get(&handle.id()).map(|entry| entry.value().clone())
        else {
            debug!(%handle, "Rejecting disconnect: peripheral is not tracked");
            respond(responder, Err(DisconnectionError::DeviceNotConnected));
            return;
        };

        match tracked.connection_state() {
            ConnectionState::Connecting => self.abandon_attempt(tracked, responder),
            ConnectionState::Connected => self.begin_disconnect(tracked, responder),
            state => {
                debug!(%tracked, %state, "Rejecting disconnect: nothing to tear down");
                respond(responder, Err(DisconnectionError::DeviceNotConnected));
            }
        }
    }

    /// Disconnect while an attempt is in flight: ask the transport to cancel
    /// (best-effort), resolve the original connect caller with a
    /// cancellation error exactly once and retire the peripheral right away.
    /// A completion for the cancelled attempt may still arrive; its sequence
    /// no longer matches anything and it is discarded as stale.
    fn abandon_attempt(
        &mut self,
        tracked: PeripheralHandle,
        responder: oneshot::Sender<DisconnectResult>,
    ) {
        let Some(PendingRequest::Connect {
            responder: connect_responder,
            sequence,
        }) = self.pending.remove(&tracked.id())
        else {
            warn!(%tracked, "Connecting peripheral had no pending connect request");
            respond(responder, Err(DisconnectionError::DeviceNotConnected));
            return;
        };

        info!(%tracked, sequence, "Abandoning in-flight connection attempt");
        CONNECTIONS_ABORTED.increment();

        tracked.set_connection_state(ConnectionState::Disconnected);
        self.registry.remove(&tracked.id());

        let id = tracked.id();
        let transport = Arc::clone(&self.transport);
        tokio::spawn(async move {
            transport.cancel_connect(id).await;
        });

        respond(connect_responder, Err(ConnectionError::ConnectionAborted));
        respond(responder, Ok(()));
    }

    fn begin_disconnect(
        &mut self,
        tracked: PeripheralHandle,
        responder: oneshot::Sender<DisconnectResult>,
    ) {
        let sequence = self.next_sequence();
        tracked.set_connection_state(ConnectionState::Disconnecting);
        self.pending
            .insert(tracked.id(), PendingRequest::Disconnect { sequence, responder });

        info!(%tracked, sequence, "Dispatching disconnect");
        let id = tracked.id();
        let transport = Arc::clone(&self.transport);
        let sender = self.command_sender.clone();
        tokio::spawn(async move {
            transport
                .disconnect(id)
                .measure_execution_time(DISCONNECTING_DURATION)
                .await;
            let _ = sender
                .send(Command::TransportResolved {
                    id,
                    sequence,
                    outcome: TransportOutcome::DisconnectAcknowledged,
                })
                .await;
        });
    }

    #[tracing::instrument(level = "debug", skip_all, fields(peripheral = %id, sequence))]
    fn handle_transport_resolved(
        &mut self,
        id: PeripheralId,
        sequence: u64,
        outcome: TransportOutcome,
    ) {
        match self.pending.get(&id) {
            Some(pending) if pending.sequence() == sequence => {}
            _ => {
                trace!(?outcome, "Discarding stale transport completion");
                STALE_COMPLETIONS_DISCARDED.increment();
                return;
            }
        }

        let Some(tracked) = self.registry.get(&id).map(|entry| entry.value().clone()) else {
            warn!(%id, "Pending request without a registry entry");
            self.pending.remove(&id);
            return;
        };

        match (self.pending.remove(&id), outcome) {
            (
                Some(PendingRequest::Connect { responder, .. }),
                TransportOutcome::Connected,
            ) => {
                tracked.set_connection_state(ConnectionState::Connected);
                CONNECTIONS_ESTABLISHED.increment();
                info!(%tracked, "Peripheral connected");
                respond(responder, Ok(()));
            }
            (
                Some(PendingRequest::Connect { responder, .. }),
                TransportOutcome::ConnectFailed(failure),
            ) => {
                tracked.set_connection_state(ConnectionState::Disconnected);
                self.registry.remove(&id);
                CONNECTING_ERRORS.increment();
                warn!(%tracked, %failure, "Connection attempt failed");
                respond(responder, Err(failure.into()));
            }
            (
                Some(PendingRequest::Disconnect { responder, .. }),
                TransportOutcome::DisconnectAcknowledged,
            ) => {
                tracked.set_connection_state(ConnectionState::Disconnected);
                self.registry.remove(&id);
                CONNECTIONS_DROPPED.increment();
                info!(%tracked, "Peripheral disconnected");
                respond(responder, Ok(()));
            }
            (pending, outcome) => {
                // Sequences are unique per request, so a matching sequence
                // with a mismatched outcome kind cannot be produced by the
                // dispatch paths above.
                warn!(%tracked, ?pending, ?outcome, "Mismatched transport completion, ignoring");
            }
        }
    }
}

fn respond<T: std::fmt::Debug>(responder: oneshot::Sender<T>, result: T) {
    if let Err(unsent) = responder.send(result) {
        trace!(?unsent, "Completion receiver dropped before resolution");
    }
}

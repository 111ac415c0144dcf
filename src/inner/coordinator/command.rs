use tokio::sync::oneshot;

use crate::inner::error::{ConnectResult, DisconnectResult};
use crate::inner::model::peripheral_handle::PeripheralHandle;
use crate::inner::model::peripheral_id::PeripheralId;
use crate::inner::transport::TransportFailure;

/// Everything entering the coordinator event loop travels as a command so
/// admission checks, state transitions and completion matching all run on
/// one serialized task.
#[derive(Debug)]
pub(crate) enum Command {
    Connect {
        handle: PeripheralHandle,
        responder: oneshot::Sender<ConnectResult>,
    },
    Disconnect {
        handle: PeripheralHandle,
        responder: oneshot::Sender<DisconnectResult>,
    },
    /// A transport call resolved. Re-enters the loop instead of running
    /// concurrently with it; `sequence` identifies the originating request.
    TransportResolved {
        id: PeripheralId,
        sequence: u64,
        outcome: TransportOutcome,
    },
}

#[derive(Debug)]
pub(crate) enum TransportOutcome {
    Connected,
    ConnectFailed(TransportFailure),
    DisconnectAcknowledged,
}

/// A dispatched request awaiting its transport completion. At most one
/// exists per peripheral identity at any time.
#[derive(Debug)]
pub(crate) enum PendingRequest {
    Connect {
        sequence: u64,
        responder: oneshot::Sender<ConnectResult>,
    },
    Disconnect {
        sequence: u64,
        responder: oneshot::Sender<DisconnectResult>,
    },
}

impl PendingRequest {
    pub(crate) fn sequence(&self) -> u64 {
        match self {
            PendingRequest::Connect { sequence, .. } => *sequence,
            PendingRequest::Disconnect { sequence, .. } => *sequence,
        }
    }
}

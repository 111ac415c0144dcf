use crate::inner::transport::TransportFailure;

/// Errors a `connect` call can resolve with. Admission errors are produced
/// locally before any transport call; the rest are translated from the
/// native layer so the public taxonomy stays stable regardless of which
/// stack backs the transport.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum ConnectionError {
    #[error("Device connection limit exceeded")]
    DeviceConnectionLimitExceed,

    #[error("Device is already connected or has a connection in flight")]
    DeviceAlreadyConnected,

    #[error("Bluetooth adapter is unavailable")]
    BluetoothUnavailable,

    #[error("Device is incompatible")]
    IncompatibleDevice,

    #[error("Connection attempt was aborted by a disconnect request")]
    ConnectionAborted,

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
}

impl From<TransportFailure> for ConnectionError {
    fn from(failure: TransportFailure) -> Self {
        match failure {
            TransportFailure::AdapterUnavailable => ConnectionError::BluetoothUnavailable,
            TransportFailure::IncompatibleDevice => ConnectionError::IncompatibleDevice,
            TransportFailure::Other(reason) => ConnectionError::ConnectionFailed(reason),
        }
    }
}

/// Errors a `disconnect` call can resolve with.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum DisconnectionError {
    #[error("Device is not connected")]
    DeviceNotConnected,
}

pub(crate) type ConnectResult = Result<(), ConnectionError>;
pub(crate) type DisconnectResult = Result<(), DisconnectionError>;

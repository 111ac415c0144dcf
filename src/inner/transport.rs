use std::sync::Arc;

use crate::inner::model::peripheral_id::PeripheralId;

/// Advertisement packet attributes as delivered by the scanning subsystem.
pub type AdvertisementAttributes = serde_json::Map<String, serde_json::Value>;

/// Decides whether a discovered peripheral should be offered for connection
/// at all. Invoked by the scanning side of the transport on every discovery;
/// the coordinator only stores and propagates it.
pub type AdvertisementValidationHandler =
    Arc<dyn Fn(PeripheralId, &str, &AdvertisementAttributes) -> bool + Send + Sync>;

/// Failure kinds the native layer reports for a connection attempt. These
/// never reach callers raw; the coordinator translates them into the public
/// error taxonomy.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum TransportFailure {
    #[error("Adapter unavailable")]
    AdapterUnavailable,

    #[error("Incompatible device")]
    IncompatibleDevice,

    #[error("{0}")]
    Other(String),
}

/// The platform BLE stack, reduced to the three radio operations the
/// coordinator sequences. Resolution of the returned future is the
/// completion signal: `begin_connect` resolves once the link is up or the
/// attempt failed, `disconnect` resolves on teardown acknowledgment.
/// `cancel_connect` is best-effort; a completion for the cancelled attempt
/// may still arrive afterwards and is absorbed by the coordinator's
/// stale-sequence check.
#[async_trait::async_trait]
pub trait NativeTransport: Send + Sync + 'static {
    async fn begin_connect(&self, id: PeripheralId) -> Result<(), TransportFailure>;

    async fn cancel_connect(&self, id: PeripheralId);

    async fn disconnect(&self, id: PeripheralId);

    /// Store the discovery-time validation hook. The transport's scanning
    /// subsystem consults it before offering peripherals upstream.
    fn set_advertisement_validation_handler(&self, handler: Option<AdvertisementValidationHandler>);
}

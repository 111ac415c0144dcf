//! Connection lifecycle coordination for BLE peripherals.
//!
//! The crate owns the bookkeeping around connecting and disconnecting many
//! peripherals at once: admission control (duplicate and device-limit
//! policy), attempt sequencing against a pluggable [`NativeTransport`], and
//! stale-completion rejection. It deliberately implements no radio protocol
//! itself; the platform BLE stack is injected behind the transport trait.
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use ble_connector_rs::*;
//! # async fn example(transport: Arc<dyn NativeTransport>) -> anyhow::Result<()> {
//! let connection = BluetoothConnection::new(transport, ConnectionConf::default());
//! let headphones = PeripheralHandle::new(PeripheralId::random(), Some("WH-1000XM4"));
//!
//! connection.connect(&headphones).await?;
//! assert_eq!(headphones.connection_state(), ConnectionState::Connected);
//! connection.disconnect(&headphones).await?;
//! # Ok(())
//! # }
//! ```

mod inner;

pub use inner::conf::ConnectionConf;
pub use inner::error::{ConnectionError, DisconnectionError};
pub use inner::facade::BluetoothConnection;
pub use inner::metrics::describe_metrics;
pub use inner::model::connection_state::ConnectionState;
pub use inner::model::peripheral_handle::PeripheralHandle;
pub use inner::model::peripheral_id::PeripheralId;
pub use inner::transport::{
    AdvertisementAttributes, AdvertisementValidationHandler, NativeTransport, TransportFailure,
};

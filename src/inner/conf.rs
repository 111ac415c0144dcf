/// Coordinator construction parameters.
#[derive(Debug, Clone)]
pub struct ConnectionConf {
    /// Maximum amount of peripherals that may be Connecting or Connected
    /// at the same time.
    pub device_connection_limit: usize,
}

impl ConnectionConf {
    pub(crate) const DEFAULT_DEVICE_CONNECTION_LIMIT: usize = 8;

    pub fn with_device_connection_limit(device_connection_limit: usize) -> Self {
        Self {
            device_connection_limit,
        }
    }
}

impl Default for ConnectionConf {
    fn default() -> Self {
        Self {
            device_connection_limit: Self::DEFAULT_DEVICE_CONNECTION_LIMIT,
        }
    }
}

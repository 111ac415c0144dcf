pub(crate) mod connection_state;
pub(crate) mod peripheral_handle;
pub(crate) mod peripheral_id;

pub(crate) mod admission;
pub(crate) mod conf;
pub(crate) mod coordinator;
pub(crate) mod error;
pub(crate) mod facade;
pub(crate) mod metrics;
pub(crate) mod model;
pub(crate) mod transport;

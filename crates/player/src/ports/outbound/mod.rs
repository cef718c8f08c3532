//! Outbound ports (driven adapters)

pub mod transport_port;

pub use transport_port::{TransportError, TransportEvent, TransportEvents, TransportPort};

#[cfg(any(test, feature = "testing"))]
pub use transport_port::MockTransportPort;

//! The transport module contains the components responsible for moving
//! framed packets over a serial stream: the packet construction and parsing
//! state machine, the serial port facade, and a mock link for testing
//! without hardware.

pub mod layer;
pub mod serial;
pub mod serial_mock;

pub use layer::{TransportConfig, TransportLayer};
pub use serial::{list_ports, PortDescriptor, SerialLink, SerialPortLink};
pub use serial_mock::MockSerialLink;

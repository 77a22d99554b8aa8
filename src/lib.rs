//! # axtl-rs - Host-Side Ataraxis Transport Layer
//!
//! The axtl-rs crate provides the host side of the Ataraxis transport layer,
//! which exchanges fixed-framed byte packets with a microcontroller over a
//! serial stream (USB CDC or UART). Payloads are framed with
//! Consistent-Overhead Byte Stuffing so a delimiter byte unambiguously ends
//! each packet, and protected end-to-end with a table-driven CRC.
//!
//! ## Features
//!
//! - Connect to a microcontroller over any OS serial port
//! - Stage payload bytes through a cursor API over fixed, pre-sized buffers
//! - Frame, checksum, and transmit payloads with a single `send` call
//! - Recover payloads from a noisy inbound stream with timeout-bounded
//!   reception that resynchronizes on the packet start byte
//! - CRC widths of 8, 16, and 32 bits, parametric over the register type
//! - A byte status register with a library-wide code space that pinpoints
//!   whether a failure arose in framing, integrity checking, or transport
//!   logic
//! - Support for logging and error handling
//!
//! ## Usage
//!
//! To use the axtl-rs crate in your Rust project, add the following to your
//! Cargo.toml file:
//!
//! ```toml
//! [dependencies]
//! axtl-rs = "1.0"
//! ```
//!
//! Then connect with the firmware defaults and exchange payloads:
//!
//! ```rust,no_run
//! use axtl_rs::{connect, TransportError};
//!
//! fn main() -> Result<(), TransportError> {
//!     let mut transport = connect("/dev/ttyUSB0", 115_200)?;
//!
//!     transport.write_bytes(&42u32.to_le_bytes(), 0)?;
//!     transport.send()?;
//!
//!     while !transport.available() {}
//!     transport.receive()?;
//!
//!     let mut value = [0u8; 4];
//!     transport.read_bytes(&mut value, 0)?;
//!     Ok(())
//! }
//! ```

pub mod codec;
pub mod constants;
pub mod error;
pub mod logging;
pub mod transport;
pub mod util;

pub use crate::error::{CobsError, CrcError, SerialError, TransportError};
pub use crate::logging::{init_logger, log_info};

// Core transport types
pub use codec::cobs;
pub use codec::crc::{CrcProcessor, CrcWord};
pub use transport::layer::{TransportConfig, TransportLayer};
pub use transport::serial::{list_ports, PortDescriptor, SerialLink, SerialPortLink};

/// Transport layer over a real serial port with the firmware-default CRC-16.
pub type DefaultTransportLayer = TransportLayer<u16, SerialPortLink>;

/// Connects to a microcontroller with the firmware default configuration:
/// CRC-16/CCITT-FALSE postamble, start byte 129, delimiter 0x00, and a
/// 20 000 us inter-byte timeout.
///
/// # Arguments
/// * `port` - Serial port path (e.g., "/dev/ttyUSB0" on Linux, "COM3" on
///   Windows)
/// * `baud_rate` - Line rate; ignored by USB CDC devices
///
/// # Returns
/// * `Ok(DefaultTransportLayer)` - Connected transport layer
/// * `Err(TransportError)` - Connection failed
pub fn connect(port: &str, baud_rate: u32) -> Result<DefaultTransportLayer, TransportError> {
    let link = SerialPortLink::open(port, baud_rate)?;
    TransportLayer::new(
        link,
        CrcProcessor::crc16_ccitt_false(),
        TransportConfig::default(),
    )
}

//! # Serial Port Facade
//!
//! This module abstracts the OS serial stream behind the small surface the
//! transport layer needs: an available-byte count, a non-blocking single-byte
//! read, a deadline-bounded exact read, and a blocking write. The facade owns
//! the OS handle exclusively from open to drop and exposes nothing else to
//! the core, so the packet logic can be exercised against
//! [`crate::transport::serial_mock::MockSerialLink`] without hardware.

use crate::error::SerialError;
use std::io::{Read, Write};
use std::time::{Duration, Instant};

/// The operations the transport layer requires from a byte stream.
///
/// `read_exact` uses an inter-byte deadline: the clock restarts whenever at
/// least one byte arrives, so a slow-but-alive peer is never cut off while a
/// silent one trips [`SerialError::TimedOut`].
pub trait SerialLink {
    /// Count of inbound bytes that can be read without blocking.
    fn bytes_available(&mut self) -> Result<usize, SerialError>;

    /// Reads one inbound byte without blocking. `None` when the stream is
    /// currently empty.
    fn read_byte(&mut self) -> Result<Option<u8>, SerialError>;

    /// Fills `dest`, waiting at most `timeout` between consecutive bytes.
    fn read_exact(&mut self, dest: &mut [u8], timeout: Duration) -> Result<(), SerialError>;

    /// Writes all of `data`, blocking until the OS buffer accepts it.
    fn write_all(&mut self, data: &[u8]) -> Result<(), SerialError>;
}

/// Serial link backed by an OS serial port (USB CDC or UART).
pub struct SerialPortLink {
    port: Box<dyn serialport::SerialPort>,
}

impl SerialPortLink {
    /// Opens the named port in the 8N1 framing the firmware expects.
    ///
    /// # Arguments
    /// * `port_name` - Serial port path (e.g., "/dev/ttyUSB0" on Linux,
    ///   "COM3" on Windows)
    /// * `baud_rate` - Line rate; ignored by USB CDC devices
    pub fn open(port_name: &str, baud_rate: u32) -> Result<SerialPortLink, SerialError> {
        let port = serialport::new(port_name, baud_rate)
            .data_bits(serialport::DataBits::Eight)
            .stop_bits(serialport::StopBits::One)
            .parity(serialport::Parity::None)
            .timeout(Duration::from_millis(100))
            .open()
            .map_err(|e| SerialError::Io(e.to_string()))?;

        Ok(SerialPortLink { port })
    }
}

impl SerialLink for SerialPortLink {
    fn bytes_available(&mut self) -> Result<usize, SerialError> {
        self.port
            .bytes_to_read()
            .map(|count| count as usize)
            .map_err(|e| SerialError::Io(e.to_string()))
    }

    fn read_byte(&mut self) -> Result<Option<u8>, SerialError> {
        if self.bytes_available()? == 0 {
            return Ok(None);
        }

        let mut byte = [0u8; 1];
        match self.port.read(&mut byte) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(byte[0])),
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Ok(None),
            Err(e) => Err(SerialError::Io(e.to_string())),
        }
    }

    fn read_exact(&mut self, dest: &mut [u8], timeout: Duration) -> Result<(), SerialError> {
        self.port
            .set_timeout(timeout)
            .map_err(|e| SerialError::Io(e.to_string()))?;

        let mut filled = 0;
        while filled < dest.len() {
            match self.port.read(&mut dest[filled..]) {
                Ok(0) => return Err(SerialError::TimedOut),
                Ok(count) => filled += count,
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => {
                    return Err(SerialError::TimedOut)
                }
                Err(e) => return Err(SerialError::Io(e.to_string())),
            }
        }

        Ok(())
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), SerialError> {
        self.port
            .write_all(data)
            .and_then(|()| self.port.flush())
            .map_err(|e| SerialError::Io(e.to_string()))
    }
}

/// One addressable serial port, as reported by the OS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortDescriptor {
    /// OS port name, usable with [`SerialPortLink::open`].
    pub name: String,
    /// Identifying descriptor (USB VID:PID and product string where known).
    pub description: String,
}

/// Enumerates the serial ports addressable on this machine.
pub fn list_ports() -> Result<Vec<PortDescriptor>, SerialError> {
    let ports = serialport::available_ports().map_err(|e| SerialError::Io(e.to_string()))?;

    Ok(ports
        .into_iter()
        .map(|info| PortDescriptor {
            name: info.port_name,
            description: describe_port_type(info.port_type),
        })
        .collect())
}

fn describe_port_type(port_type: serialport::SerialPortType) -> String {
    match port_type {
        serialport::SerialPortType::UsbPort(usb) => {
            let product = usb.product.unwrap_or_else(|| "unknown device".to_string());
            format!("USB {:04x}:{:04x} {product}", usb.vid, usb.pid)
        }
        serialport::SerialPortType::PciPort => "PCI serial device".to_string(),
        serialport::SerialPortType::BluetoothPort => "Bluetooth serial device".to_string(),
        serialport::SerialPortType::Unknown => "unknown serial device".to_string(),
    }
}

/// Used by `Instant`-driven poll loops while waiting for the next byte.
pub(crate) const POLL_INTERVAL: Duration = Duration::from_micros(50);

/// Sleeps one poll interval, or until `deadline` if that is sooner.
pub(crate) fn poll_wait(deadline: Instant) {
    let now = Instant::now();
    if now < deadline {
        std::thread::sleep(POLL_INTERVAL.min(deadline - now));
    }
}

//! Mock serial link implementation for testing
//!
//! This module provides a mock serial link that can be used to test the
//! transport layer without requiring actual hardware. Inbound bytes are
//! queued ahead of time; outbound bytes are captured for inspection.

use crate::error::SerialError;
use crate::transport::serial::{poll_wait, SerialLink};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Mock serial link that simulates bidirectional communication
#[derive(Clone, Default)]
pub struct MockSerialLink {
    /// Data written to the link (outgoing)
    tx_buffer: Arc<Mutex<Vec<u8>>>,
    /// Data to be read from the link (incoming)
    rx_buffer: Arc<Mutex<VecDeque<u8>>>,
    /// Simulated error, returned by the next operation
    next_error: Arc<Mutex<Option<String>>>,
}

impl MockSerialLink {
    pub fn new() -> Self {
        MockSerialLink::default()
    }

    /// Queue data to be read from the link
    pub fn queue_rx_data(&self, data: &[u8]) {
        let mut rx = self.rx_buffer.lock().unwrap();
        rx.extend(data);
    }

    /// Get data that was written to the link
    pub fn get_tx_data(&self) -> Vec<u8> {
        self.tx_buffer.lock().unwrap().clone()
    }

    /// Clear all buffers
    pub fn clear(&self) {
        self.tx_buffer.lock().unwrap().clear();
        self.rx_buffer.lock().unwrap().clear();
    }

    /// Set an error to be returned by the next operation
    pub fn set_next_error(&self, message: &str) {
        *self.next_error.lock().unwrap() = Some(message.to_string());
    }

    fn take_error(&self) -> Option<SerialError> {
        self.next_error.lock().unwrap().take().map(SerialError::Io)
    }
}

impl SerialLink for MockSerialLink {
    fn bytes_available(&mut self) -> Result<usize, SerialError> {
        if let Some(error) = self.take_error() {
            return Err(error);
        }
        Ok(self.rx_buffer.lock().unwrap().len())
    }

    fn read_byte(&mut self) -> Result<Option<u8>, SerialError> {
        if let Some(error) = self.take_error() {
            return Err(error);
        }
        Ok(self.rx_buffer.lock().unwrap().pop_front())
    }

    fn read_exact(&mut self, dest: &mut [u8], timeout: Duration) -> Result<(), SerialError> {
        if let Some(error) = self.take_error() {
            return Err(error);
        }

        let mut filled = 0;
        let mut deadline = Instant::now() + timeout;
        while filled < dest.len() {
            let drained = {
                let mut rx = self.rx_buffer.lock().unwrap();
                let count = rx.len().min(dest.len() - filled);
                for slot in dest[filled..filled + count].iter_mut() {
                    *slot = rx.pop_front().unwrap_or_default();
                }
                count
            };

            if drained > 0 {
                filled += drained;
                deadline = Instant::now() + timeout;
                continue;
            }
            if Instant::now() >= deadline {
                return Err(SerialError::TimedOut);
            }
            poll_wait(deadline);
        }

        Ok(())
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), SerialError> {
        if let Some(error) = self.take_error() {
            return Err(error);
        }
        self.tx_buffer.lock().unwrap().extend_from_slice(data);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_and_read_data() {
        let mut link = MockSerialLink::new();
        link.queue_rx_data(&[0x01, 0x02, 0x03]);

        assert_eq!(link.bytes_available().unwrap(), 3);
        assert_eq!(link.read_byte().unwrap(), Some(0x01));
        assert_eq!(link.read_byte().unwrap(), Some(0x02));
        assert_eq!(link.read_byte().unwrap(), Some(0x03));
        assert_eq!(link.read_byte().unwrap(), None);
    }

    #[test]
    fn test_write_capture() {
        let mut link = MockSerialLink::new();
        link.write_all(&[0x81, 0x0A]).unwrap();
        link.write_all(&[0x0B]).unwrap();
        assert_eq!(link.get_tx_data(), vec![0x81, 0x0A, 0x0B]);
    }

    #[test]
    fn test_read_exact_times_out_when_starved() {
        let mut link = MockSerialLink::new();
        link.queue_rx_data(&[0x01]);

        let mut dest = [0u8; 3];
        let result = link.read_exact(&mut dest, Duration::from_millis(5));
        assert!(matches!(result, Err(SerialError::TimedOut)));
        assert_eq!(dest[0], 0x01);
    }

    #[test]
    fn test_error_injection() {
        let mut link = MockSerialLink::new();
        link.set_next_error("simulated failure");

        assert!(link.read_byte().is_err());
        // The injected error fires once.
        assert_eq!(link.read_byte().unwrap(), None);
    }

    #[test]
    fn test_clear_buffers() {
        let mut link = MockSerialLink::new();
        link.queue_rx_data(&[1, 2, 3]);
        link.write_all(&[4, 5]).unwrap();
        link.clear();

        assert_eq!(link.bytes_available().unwrap(), 0);
        assert!(link.get_tx_data().is_empty());
    }
}

//! # Transport Layer Packet Construction and Parsing
//!
//! This module provides the host-side transport layer that exchanges
//! COBS-framed, CRC-protected packets with a microcontroller over a serial
//! stream. Callers stage payload bytes through a cursor API, `send` frames
//! and transmits the staged payload, and `receive` runs the reception state
//! machine that recovers one payload from the inbound stream.
//!
//! ## Wire Format
//!
//! Outbound (host to microcontroller):
//!
//! ```text
//! ┌────────────┬──────────────┬────────────┬──────────────────┬────────────┬─────────────┐
//! │ start byte │ payload size │  overhead  │ encoded payload  │ delimiter  │ CRC (BE)    │
//! │  (1 byte)  │   (1 byte)   │  (1 byte)  │ (1..=254 bytes)  │  (1 byte)  │ (1/2/4 B)   │
//! └────────────┴──────────────┴────────────┴──────────────────┴────────────┴─────────────┘
//! ```
//!
//! Inbound (microcontroller to host) is identical except that the
//! microcontroller sends no payload-size byte. The asymmetry is part of the
//! firmware contract: the first byte after the start byte lands directly in
//! the overhead cell, and the packet end is found through the delimiter.
//!
//! ## Reception State Machine
//!
//! `receive` hunts for the start byte while discarding line noise, reads the
//! packet body until the delimiter arrives (bounded by an inter-byte
//! timeout), blocks for the CRC postamble, validates the checksum residual,
//! and COBS-decodes in place. Every failure is a clean abort: the reception
//! tracker stays zero and the next call starts fresh.

use crate::codec::cobs;
use crate::codec::crc::{CrcProcessor, CrcWord};
use crate::constants::{
    self, COBS_FRAME_OVERHEAD, DEFAULT_DELIMITER_BYTE, DEFAULT_START_BYTE, DEFAULT_TIMEOUT_US,
    MAX_PAYLOAD_SIZE,
};
use crate::error::{SerialError, TransportError};
use crate::transport::serial::{poll_wait, SerialLink};
use crate::util::hex::format_hex_compact;
use crate::util::logging::LogThrottle;
use log::{debug, trace, warn};
use std::time::{Duration, Instant};

/// Configuration for the transport layer. Immutable after construction.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Byte that marks the beginning of every packet on the wire.
    pub start_byte: u8,
    /// Byte value COBS eliminates from the packet body; prefer 0x00.
    pub delimiter_byte: u8,
    /// Inter-byte reception timeout.
    pub timeout: Duration,
    /// When true, an empty hunt for the start byte reports the hard
    /// `StartByteNotFound` code instead of the soft `NoBytesToParse`.
    pub allow_start_byte_errors: bool,
    /// Largest payload either staging buffer accepts, 1..=254.
    pub max_payload_size: u8,
    /// Size of the microcontroller's serial reception buffer. Outgoing
    /// payloads are capped so the framed packet fits inside it.
    pub controller_buffer_size: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        TransportConfig {
            start_byte: DEFAULT_START_BYTE,
            delimiter_byte: DEFAULT_DELIMITER_BYTE,
            timeout: Duration::from_micros(DEFAULT_TIMEOUT_US),
            allow_start_byte_errors: false,
            max_payload_size: MAX_PAYLOAD_SIZE,
            // 254 payload bytes + overhead + delimiter + CRC-16 postamble
            controller_buffer_size: 258,
        }
    }
}

/// Host-side transport layer over one serial link.
///
/// Owns both staging buffers and the CRC engine for its whole lifetime. The
/// buffers are sized at construction (`max_payload_size + 2 + crc width`)
/// and never grow: index 0 is the COBS overhead cell, indices
/// `1..=payload` hold the user payload, the next cell receives the
/// delimiter, and the trailing cells are reserved for the CRC postamble.
///
/// Every operation records its outcome in a byte status register drawn from
/// the library-wide code space, so one read after any call identifies the
/// component that failed.
pub struct TransportLayer<W: CrcWord, L: SerialLink> {
    link: L,
    crc: CrcProcessor<W>,
    config: TransportConfig,
    tx_buffer: Vec<u8>,
    rx_buffer: Vec<u8>,
    /// Count of payload bytes staged for transmission.
    tx_payload_size: usize,
    /// Count of payload bytes recovered by the last successful receive.
    rx_payload_size: usize,
    /// Outgoing payload cap after accounting for the controller's buffer.
    max_outgoing_payload: usize,
    status: u8,
    noise_throttle: LogThrottle,
}

impl<W: CrcWord, L: SerialLink> TransportLayer<W, L> {
    /// Builds a transport layer over `link`.
    ///
    /// # Arguments
    ///
    /// * `link` - Serial link connected to the microcontroller
    /// * `crc` - CRC engine configured to match the firmware
    /// * `config` - Wire-format configuration; must match the firmware
    ///
    /// # Returns
    ///
    /// * `Err(TransportError::InvalidConfiguration)` - The payload bounds
    ///   are unusable or the controller buffer cannot fit a single framed
    ///   payload byte
    pub fn new(
        link: L,
        crc: CrcProcessor<W>,
        config: TransportConfig,
    ) -> Result<TransportLayer<W, L>, TransportError> {
        if config.max_payload_size == 0 || config.max_payload_size > MAX_PAYLOAD_SIZE {
            return Err(TransportError::InvalidConfiguration(format!(
                "max_payload_size must be 1..={}, got {}",
                MAX_PAYLOAD_SIZE, config.max_payload_size
            )));
        }

        let framing = COBS_FRAME_OVERHEAD + W::BYTES;
        if config.controller_buffer_size <= framing {
            return Err(TransportError::InvalidConfiguration(format!(
                "controller_buffer_size of {} leaves no room for payload bytes \
                 ({framing} are taken by framing)",
                config.controller_buffer_size
            )));
        }

        let max_outgoing_payload =
            (config.max_payload_size as usize).min(config.controller_buffer_size - framing);
        let buffer_size = config.max_payload_size as usize + framing;

        Ok(TransportLayer {
            link,
            crc,
            config,
            tx_buffer: vec![0; buffer_size],
            rx_buffer: vec![0; buffer_size],
            tx_payload_size: 0,
            rx_payload_size: 0,
            max_outgoing_payload,
            status: constants::TRANSPORT_STANDBY,
            noise_throttle: LogThrottle::new(1000, 5),
        })
    }

    /// The status code recorded by the most recent operation.
    pub fn status(&self) -> u8 {
        self.status
    }

    /// Count of payload bytes currently staged for transmission.
    pub fn bytes_in_transmission_buffer(&self) -> usize {
        self.tx_payload_size
    }

    /// Count of payload bytes recovered by the last successful receive.
    pub fn bytes_in_reception_buffer(&self) -> usize {
        self.rx_payload_size
    }

    /// Largest payload `send` will accept, after capping against the
    /// microcontroller's reception buffer.
    pub fn max_outgoing_payload_size(&self) -> usize {
        self.max_outgoing_payload
    }

    /// The active configuration.
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Copies `data` into the outgoing payload region at `start_index`.
    ///
    /// Overwriting previously staged bytes never shrinks the staged payload:
    /// the tracker only grows, and `send` transmits every tracked byte.
    ///
    /// # Returns
    ///
    /// * `Ok(next_index)` - Index one past the written region, usable as the
    ///   `start_index` of a sequential write
    pub fn write_bytes(&mut self, data: &[u8], start_index: usize) -> Result<usize, TransportError> {
        let end = start_index.saturating_add(data.len());
        if end > self.max_outgoing_payload {
            return Err(self.fail(TransportError::WritePayloadTooSmall {
                start_index,
                byte_count: data.len(),
                capacity: self.max_outgoing_payload,
            }));
        }

        self.tx_buffer[start_index + 1..end + 1].copy_from_slice(data);
        self.tx_payload_size = self.tx_payload_size.max(end);
        self.status = constants::TRANSPORT_PAYLOAD_WRITTEN;
        Ok(end)
    }

    /// Copies received payload bytes from `start_index` into `dest`.
    ///
    /// Reads are bounded by the payload recovered by the last receive, so
    /// stale bytes from an earlier packet can never leak out. The reception
    /// tracker is not modified.
    ///
    /// # Returns
    ///
    /// * `Ok(next_index)` - Index one past the read region
    pub fn read_bytes(&mut self, dest: &mut [u8], start_index: usize) -> Result<usize, TransportError> {
        let end = start_index.saturating_add(dest.len());
        if end > self.rx_payload_size {
            return Err(self.fail(TransportError::ReadPayloadTooSmall {
                start_index,
                byte_count: dest.len(),
                payload_size: self.rx_payload_size,
            }));
        }

        dest.copy_from_slice(&self.rx_buffer[start_index + 1..end + 1]);
        self.status = constants::TRANSPORT_PAYLOAD_READ;
        Ok(end)
    }

    /// Frames and transmits the staged payload.
    ///
    /// Encodes the payload in place, appends the CRC postamble, emits the
    /// `[start_byte, payload_size]` preamble followed by the packet and
    /// postamble, then resets the transmission buffer. A codec or CRC
    /// failure surfaces its own status code and leaves the staged payload
    /// untouched; nothing is transmitted partially.
    pub fn send(&mut self) -> Result<(), TransportError> {
        let payload_size = self.tx_payload_size;
        let packet_size = match cobs::encode_payload(
            &mut self.tx_buffer,
            payload_size as u8,
            self.config.delimiter_byte,
        ) {
            Ok(size) => size as usize,
            Err(error) => return Err(self.fail(error.into())),
        };

        let checksum = match self.crc.compute(&self.tx_buffer, 0, packet_size) {
            Ok(value) => value,
            Err(error) => return Err(self.fail(error.into())),
        };
        let packet_end = match self.crc.append(&mut self.tx_buffer, packet_size, checksum) {
            Ok(end) => end,
            Err(error) => return Err(self.fail(error.into())),
        };

        let preamble = [self.config.start_byte, payload_size as u8];
        if let Err(error) = self.link.write_all(&preamble) {
            return Err(self.fail(error.into()));
        }
        if let Err(error) = self.link.write_all(&self.tx_buffer[..packet_end]) {
            return Err(self.fail(error.into()));
        }

        trace!(
            "sent packet: {} {}",
            format_hex_compact(&preamble),
            format_hex_compact(&self.tx_buffer[..packet_end])
        );
        self.reset_transmission_buffer();
        self.status = constants::TRANSPORT_PACKET_SENT;
        debug!("sent {payload_size}-byte payload");
        Ok(())
    }

    /// True when the link holds at least one unread inbound byte.
    pub fn available(&mut self) -> bool {
        match self.link.bytes_available() {
            Ok(count) => count > 0,
            Err(error) => {
                warn!("failed to query serial link: {error}");
                false
            }
        }
    }

    /// Attempts to receive one packet from the inbound stream.
    ///
    /// Runs the reception state machine described in the module docs. On
    /// success the decoded payload is readable through [`Self::read_bytes`]
    /// and the reception tracker holds its size. On any failure the attempt
    /// is discarded, the tracker stays zero, and the status code identifies
    /// the fault; the caller simply polls again.
    pub fn receive(&mut self) -> Result<(), TransportError> {
        self.reset_reception_buffer();

        match self.run_reception() {
            Ok(payload_size) => {
                self.rx_payload_size = payload_size;
                self.status = constants::TRANSPORT_PACKET_RECEIVED;
                debug!("received {payload_size}-byte payload");
                Ok(())
            }
            Err(error) => {
                self.rx_payload_size = 0;
                Err(self.fail(error))
            }
        }
    }

    /// Clears the transmission staging state: overhead cell zeroed (the
    /// encoder's unencoded sentinel) and tracker reset.
    pub fn reset_transmission_buffer(&mut self) {
        self.tx_buffer[0] = 0;
        self.tx_payload_size = 0;
        self.status = constants::TRANSPORT_STANDBY;
    }

    /// Clears the reception staging state.
    pub fn reset_reception_buffer(&mut self) {
        self.rx_buffer[0] = 0;
        self.rx_payload_size = 0;
        self.status = constants::TRANSPORT_STANDBY;
    }

    fn fail(&mut self, error: TransportError) -> TransportError {
        self.status = error.status_code();
        error
    }

    fn run_reception(&mut self) -> Result<usize, TransportError> {
        self.hunt_start_byte()?;
        let packet_size = self.read_packet()?;
        self.read_postamble(packet_size)?;
        self.validate_packet(packet_size)?;

        let payload_size = cobs::decode_payload(
            &mut self.rx_buffer,
            packet_size as u16,
            self.config.delimiter_byte,
        )?;
        Ok(payload_size as usize)
    }

    /// HUNT_START: drain inbound bytes until one equals the start byte.
    ///
    /// Noise ahead of a packet is expected on a healthy link, so the bytes
    /// are discarded with a rate-limited warning. Running out of bytes
    /// reports the soft `NoBytesToParse` unless the layer is configured to
    /// escalate start-byte misses.
    fn hunt_start_byte(&mut self) -> Result<(), TransportError> {
        loop {
            match self.link.read_byte().map_err(TransportError::from)? {
                Some(byte) if byte == self.config.start_byte => return Ok(()),
                Some(byte) => {
                    if self.noise_throttle.allow() {
                        warn!("discarding noise byte 0x{byte:02X} while hunting for start byte");
                    }
                }
                None => {
                    return Err(if self.config.allow_start_byte_errors {
                        TransportError::StartByteNotFound
                    } else {
                        TransportError::NoBytesToParse
                    });
                }
            }
        }
    }

    /// READ_PACKET: read the packet body until the delimiter arrives.
    ///
    /// The microcontroller sends no payload-size byte, so bytes stream
    /// straight into the buffer from the overhead cell onward. The
    /// inter-byte timer restarts on every byte; the CRC-reserved tail of the
    /// buffer is never written.
    fn read_packet(&mut self) -> Result<usize, TransportError> {
        let capacity = self.rx_buffer.len() - W::BYTES;
        let timeout = self.config.timeout;
        let mut cursor = 0;
        let mut deadline = Instant::now() + timeout;

        loop {
            match self.link.read_byte().map_err(TransportError::from)? {
                Some(byte) => {
                    if cursor >= capacity {
                        return Err(TransportError::PacketOutOfBufferSpace { capacity });
                    }
                    self.rx_buffer[cursor] = byte;
                    cursor += 1;
                    deadline = Instant::now() + timeout;
                    if byte == self.config.delimiter_byte {
                        return Ok(cursor);
                    }
                }
                None => {
                    if Instant::now() >= deadline {
                        return Err(TransportError::PacketTimeout {
                            timeout_us: timeout.as_micros() as u64,
                        });
                    }
                    poll_wait(deadline);
                }
            }
        }
    }

    /// READ_POSTAMBLE: block for the CRC bytes that follow the packet.
    fn read_postamble(&mut self, packet_size: usize) -> Result<(), TransportError> {
        let timeout = self.config.timeout;
        let tail = &mut self.rx_buffer[packet_size..packet_size + W::BYTES];

        self.link.read_exact(tail, timeout).map_err(|error| match error {
            SerialError::TimedOut => TransportError::PostambleTimeout {
                timeout_us: timeout.as_micros() as u64,
            },
            other => other.into(),
        })
    }

    /// VALIDATE: one CRC pass over packet plus postamble must leave a zero
    /// residual.
    fn validate_packet(&mut self, packet_size: usize) -> Result<(), TransportError> {
        let residual = self
            .crc
            .compute(&self.rx_buffer, 0, packet_size + W::BYTES)?;
        if residual != W::default() {
            trace!(
                "corrupt packet: {}",
                format_hex_compact(&self.rx_buffer[..packet_size + W::BYTES])
            );
            return Err(TransportError::CrcCheckFailed {
                residual: residual.as_u32(),
            });
        }
        Ok(())
    }
}

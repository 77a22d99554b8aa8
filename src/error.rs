//! # Transport Layer Error Handling
//!
//! This module defines the error enums for the three fault domains of the
//! crate: COBS framing, CRC integrity, and transport-level logic. Every
//! variant maps to a byte value from the library-wide status-code space
//! declared in [`crate::constants`], so a single status byte read after any
//! operation pinpoints the component that failed.

use crate::constants;
use thiserror::Error;

/// Errors raised by the in-place COBS encoder and decoder.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CobsError {
    /// The payload is empty; there is nothing to frame.
    #[error("payload of {payload_size} bytes is too small to encode (minimum 1)")]
    EncoderTooSmall { payload_size: u8 },

    /// The payload exceeds the 254-byte limit of a single-overhead COBS frame.
    #[error("payload of {payload_size} bytes is too large to encode (maximum 254)")]
    EncoderTooLarge { payload_size: u16 },

    /// The staging buffer cannot hold the payload plus overhead and delimiter.
    #[error("encoded packet of {packet_size} bytes does not fit the {buffer_size}-byte buffer")]
    EncoderPacketLargerThanBuffer {
        packet_size: usize,
        buffer_size: usize,
    },

    /// The overhead cell is non-zero, so the buffer already holds an encoded
    /// packet.
    #[error("payload is already encoded (overhead byte is {overhead}, expected 0)")]
    PayloadAlreadyEncoded { overhead: u8 },

    /// The packet is below the 3-byte minimum (overhead + payload + delimiter).
    #[error("packet of {packet_size} bytes is too small to decode (minimum 3)")]
    DecoderTooSmall { packet_size: u16 },

    /// The packet exceeds the 256-byte maximum.
    #[error("packet of {packet_size} bytes is too large to decode (maximum 256)")]
    DecoderTooLarge { packet_size: u16 },

    /// The buffer does not hold the declared packet size.
    #[error("packet of {packet_size} bytes does not fit the {buffer_size}-byte buffer")]
    DecoderPacketLargerThanBuffer {
        packet_size: u16,
        buffer_size: usize,
    },

    /// A literal delimiter was hit before the final packet index, which means
    /// the distance chain is corrupted.
    #[error("delimiter byte encountered at index {index} before the end of the packet")]
    DelimiterFoundTooEarly { index: usize },

    /// The distance chain exited the packet without landing on the delimiter.
    #[error("delimiter byte not found within the packet")]
    DelimiterNotFound,

    /// The overhead cell is already zero, so the buffer was decoded before.
    #[error("packet is already decoded (overhead byte is 0)")]
    PacketAlreadyDecoded,
}

impl CobsError {
    /// Returns the byte value this error occupies in the status-code space.
    pub fn status_code(&self) -> u8 {
        match self {
            CobsError::EncoderTooSmall { .. } => constants::COBS_ENCODER_TOO_SMALL,
            CobsError::EncoderTooLarge { .. } => constants::COBS_ENCODER_TOO_LARGE,
            CobsError::EncoderPacketLargerThanBuffer { .. } => {
                constants::COBS_ENCODER_PACKET_LARGER_THAN_BUFFER
            }
            CobsError::PayloadAlreadyEncoded { .. } => constants::COBS_PAYLOAD_ALREADY_ENCODED,
            CobsError::DecoderTooSmall { .. } => constants::COBS_DECODER_TOO_SMALL,
            CobsError::DecoderTooLarge { .. } => constants::COBS_DECODER_TOO_LARGE,
            CobsError::DecoderPacketLargerThanBuffer { .. } => {
                constants::COBS_DECODER_PACKET_LARGER_THAN_BUFFER
            }
            CobsError::DelimiterFoundTooEarly { .. } => constants::COBS_DELIMITER_FOUND_TOO_EARLY,
            CobsError::DelimiterNotFound => constants::COBS_DELIMITER_NOT_FOUND,
            CobsError::PacketAlreadyDecoded => constants::COBS_PACKET_ALREADY_DECODED,
        }
    }
}

/// Errors raised by the CRC engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CrcError {
    /// The requested checksum range runs past the end of the buffer.
    #[error("cannot compute CRC over bytes {start}..{}, buffer holds {buffer_size}", .start + .length)]
    CalculateTooSmall {
        start: usize,
        length: usize,
        buffer_size: usize,
    },

    /// The buffer lacks room for the checksum bytes.
    #[error("cannot append {crc_size}-byte CRC at index {start}, buffer holds {buffer_size}")]
    AddTooSmall {
        start: usize,
        crc_size: usize,
        buffer_size: usize,
    },

    /// The buffer holds fewer bytes than one checksum past the start index.
    #[error("cannot read {crc_size}-byte CRC at index {start}, buffer holds {buffer_size}")]
    ReadTooSmall {
        start: usize,
        crc_size: usize,
        buffer_size: usize,
    },
}

impl CrcError {
    /// Returns the byte value this error occupies in the status-code space.
    pub fn status_code(&self) -> u8 {
        match self {
            CrcError::CalculateTooSmall { .. } => constants::CRC_CALCULATE_TOO_SMALL,
            CrcError::AddTooSmall { .. } => constants::CRC_ADD_TOO_SMALL,
            CrcError::ReadTooSmall { .. } => constants::CRC_READ_TOO_SMALL,
        }
    }
}

/// Errors raised by the serial port facade.
#[derive(Debug, Error)]
pub enum SerialError {
    /// The read deadline expired before the requested bytes arrived.
    #[error("serial read timed out")]
    TimedOut,

    /// The OS serial layer reported a failure.
    #[error("serial port error: {0}")]
    Io(String),
}

/// Represents the different error types that can occur in the transport
/// layer, including sub-component failures surfaced verbatim.
#[derive(Debug, Error)]
pub enum TransportError {
    /// A cursor write would run past the outgoing payload region.
    #[error(
        "cannot write bytes {start_index}..{} of the payload, capacity is {capacity}",
        .start_index + .byte_count
    )]
    WritePayloadTooSmall {
        start_index: usize,
        byte_count: usize,
        capacity: usize,
    },

    /// A cursor read would run past the received payload.
    #[error(
        "cannot read bytes {start_index}..{} of the payload, {payload_size} bytes are staged",
        .start_index + .byte_count
    )]
    ReadPayloadTooSmall {
        start_index: usize,
        byte_count: usize,
        payload_size: usize,
    },

    /// The inbound stream emptied before a start byte was seen. Soft
    /// condition: poll again.
    #[error("no packet bytes to parse in the reception stream")]
    NoBytesToParse,

    /// The inbound stream emptied before a start byte was seen and the layer
    /// is configured to treat that as a hard fault.
    #[error("packet start byte not found in the reception stream")]
    StartByteNotFound,

    /// The incoming packet would overrun the reception buffer's payload
    /// region.
    #[error("incoming packet exceeds the {capacity}-byte reception buffer")]
    PacketOutOfBufferSpace { capacity: usize },

    /// The inter-byte timer expired while the packet body was being read.
    #[error("packet reception stalled, no byte arrived within {timeout_us} us")]
    PacketTimeout { timeout_us: u64 },

    /// The postamble did not arrive in time after the packet body.
    #[error("postamble reception stalled, no byte arrived within {timeout_us} us")]
    PostambleTimeout { timeout_us: u64 },

    /// The checksum over packet and postamble was non-zero.
    #[error("CRC check failed, residual value 0x{residual:X}")]
    CrcCheckFailed { residual: u32 },

    /// The OS serial layer reported a failure.
    #[error("serial port error: {0}")]
    SerialPort(String),

    /// The construction-time configuration is unusable.
    #[error("invalid transport configuration: {0}")]
    InvalidConfiguration(String),

    /// A COBS codec failure, surfaced verbatim.
    #[error(transparent)]
    Cobs(#[from] CobsError),

    /// A CRC engine failure, surfaced verbatim.
    #[error(transparent)]
    Crc(#[from] CrcError),
}

impl TransportError {
    /// Returns the byte value this error occupies in the status-code space.
    ///
    /// Sub-component failures report the sub-component's own code, so the
    /// status register always identifies the fault origin.
    pub fn status_code(&self) -> u8 {
        match self {
            TransportError::WritePayloadTooSmall { .. } => {
                constants::TRANSPORT_WRITE_PAYLOAD_TOO_SMALL
            }
            TransportError::ReadPayloadTooSmall { .. } => {
                constants::TRANSPORT_READ_PAYLOAD_TOO_SMALL
            }
            TransportError::NoBytesToParse => constants::TRANSPORT_NO_BYTES_TO_PARSE,
            TransportError::StartByteNotFound => constants::TRANSPORT_START_BYTE_NOT_FOUND,
            TransportError::PacketOutOfBufferSpace { .. } => {
                constants::TRANSPORT_PACKET_OUT_OF_BUFFER_SPACE
            }
            TransportError::PacketTimeout { .. } => constants::TRANSPORT_PACKET_TIMEOUT,
            TransportError::PostambleTimeout { .. } => constants::TRANSPORT_POSTAMBLE_TIMEOUT,
            TransportError::CrcCheckFailed { .. } => constants::TRANSPORT_CRC_CHECK_FAILED,
            TransportError::SerialPort(_) => constants::TRANSPORT_SERIAL_PORT_ERROR,
            TransportError::InvalidConfiguration(_) => constants::TRANSPORT_INVALID_CONFIGURATION,
            TransportError::Cobs(e) => e.status_code(),
            TransportError::Crc(e) => e.status_code(),
        }
    }
}

impl From<SerialError> for TransportError {
    fn from(error: SerialError) -> Self {
        match error {
            SerialError::TimedOut => TransportError::SerialPort("read timed out".to_string()),
            SerialError::Io(message) => TransportError::SerialPort(message),
        }
    }
}

//! Ataraxis Transport Layer Constants
//!
//! This module defines the wire-format defaults shared with the
//! microcontroller firmware and the library-wide status-code space used by
//! the transport status register.

/// Default packet start byte. Chosen by the firmware because 129 rarely
/// occurs in ASCII-heavy line noise.
pub const DEFAULT_START_BYTE: u8 = 129;

/// Default COBS delimiter byte. Callers should prefer 0x00: after a
/// successful encoding no overhead byte can be zero.
pub const DEFAULT_DELIMITER_BYTE: u8 = 0x00;

/// Default inter-byte reception timeout, in microseconds.
pub const DEFAULT_TIMEOUT_US: u64 = 20_000;

/// Largest payload COBS can frame with a single overhead byte.
pub const MAX_PAYLOAD_SIZE: u8 = 254;

/// Smallest payload worth framing.
pub const MIN_PAYLOAD_SIZE: u8 = 1;

/// Smallest valid packet: overhead + one payload byte + delimiter.
pub const MIN_PACKET_SIZE: u16 = 3;

/// Largest valid packet: overhead + 254 payload bytes + delimiter.
pub const MAX_PACKET_SIZE: u16 = 256;

/// Framing overhead added by COBS encoding (overhead byte + delimiter byte).
pub const COBS_FRAME_OVERHEAD: usize = 2;

// ----------------------------------------------------------------------------
// CRC-16/CCITT-FALSE parameters (firmware default postamble)
// ----------------------------------------------------------------------------

pub const CRC16_CCITT_FALSE_POLYNOMIAL: u16 = 0x1021;
pub const CRC16_CCITT_FALSE_INITIAL: u16 = 0xFFFF;
pub const CRC16_CCITT_FALSE_FINAL_XOR: u16 = 0x0000;

// ----------------------------------------------------------------------------
// Status-code space
//
// Every operation in the library reports through a single byte-valued status
// register. Each component owns a disjoint range, so one status byte is
// enough to pinpoint whether a failure arose in framing, integrity checking,
// or transport logic. Error variants map to these values through
// `status_code()` on the enums in `crate::error`.
// ----------------------------------------------------------------------------

/// First code owned by the COBS codec.
pub const COBS_STATUS_MIN: u8 = 11;
/// Last code owned by the COBS codec.
pub const COBS_STATUS_MAX: u8 = 50;

/// First code owned by the CRC engine.
pub const CRC_STATUS_MIN: u8 = 51;
/// Last code owned by the CRC engine.
pub const CRC_STATUS_MAX: u8 = 100;

/// First code owned by the transport layer.
pub const TRANSPORT_STATUS_MIN: u8 = 101;
/// Last code owned by the transport layer.
pub const TRANSPORT_STATUS_MAX: u8 = 150;

// COBS codec codes (11-50)
pub const COBS_STANDBY: u8 = 11;
pub const COBS_PAYLOAD_ENCODED: u8 = 12;
pub const COBS_ENCODER_TOO_SMALL: u8 = 13;
pub const COBS_ENCODER_TOO_LARGE: u8 = 14;
pub const COBS_ENCODER_PACKET_LARGER_THAN_BUFFER: u8 = 15;
pub const COBS_PAYLOAD_ALREADY_ENCODED: u8 = 16;
pub const COBS_PAYLOAD_DECODED: u8 = 17;
pub const COBS_DECODER_TOO_SMALL: u8 = 18;
pub const COBS_DECODER_TOO_LARGE: u8 = 19;
pub const COBS_DECODER_PACKET_LARGER_THAN_BUFFER: u8 = 20;
pub const COBS_DELIMITER_FOUND_TOO_EARLY: u8 = 21;
pub const COBS_DELIMITER_NOT_FOUND: u8 = 22;
pub const COBS_PACKET_ALREADY_DECODED: u8 = 23;

// CRC engine codes (51-100)
pub const CRC_STANDBY: u8 = 51;
pub const CRC_CHECKSUM_CALCULATED: u8 = 52;
pub const CRC_CALCULATE_TOO_SMALL: u8 = 53;
pub const CRC_CHECKSUM_APPENDED: u8 = 54;
pub const CRC_ADD_TOO_SMALL: u8 = 55;
pub const CRC_CHECKSUM_EXTRACTED: u8 = 56;
pub const CRC_READ_TOO_SMALL: u8 = 57;

// Transport layer codes (101-150)
pub const TRANSPORT_STANDBY: u8 = 101;
pub const TRANSPORT_PAYLOAD_WRITTEN: u8 = 102;
pub const TRANSPORT_WRITE_PAYLOAD_TOO_SMALL: u8 = 103;
pub const TRANSPORT_PAYLOAD_READ: u8 = 104;
pub const TRANSPORT_READ_PAYLOAD_TOO_SMALL: u8 = 105;
pub const TRANSPORT_PACKET_SENT: u8 = 106;
pub const TRANSPORT_PACKET_RECEIVED: u8 = 107;
pub const TRANSPORT_NO_BYTES_TO_PARSE: u8 = 108;
pub const TRANSPORT_START_BYTE_NOT_FOUND: u8 = 109;
pub const TRANSPORT_PACKET_OUT_OF_BUFFER_SPACE: u8 = 110;
pub const TRANSPORT_PACKET_TIMEOUT: u8 = 111;
pub const TRANSPORT_POSTAMBLE_TIMEOUT: u8 = 112;
pub const TRANSPORT_CRC_CHECK_FAILED: u8 = 113;
pub const TRANSPORT_SERIAL_PORT_ERROR: u8 = 114;
pub const TRANSPORT_INVALID_CONFIGURATION: u8 = 115;

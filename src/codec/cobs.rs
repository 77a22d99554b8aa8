//! # COBS Codec
//!
//! This module provides in-place Consistent-Overhead Byte Stuffing over the
//! transport staging buffers. Encoding removes every occurrence of a
//! configurable delimiter byte from the payload body, so the delimiter
//! becomes an unambiguous end-of-frame marker; decoding restores the payload
//! byte-exactly.
//!
//! ## Packet Structure
//!
//! Both routines operate on a packet laid out in place around the payload:
//!
//! ```text
//! ┌──────────────┬──────────────────────────┬──────────────┐
//! │  overhead    │  payload                 │  delimiter   │
//! │  (1 byte)    │  (1..=254 bytes)         │  (1 byte)    │
//! └──────────────┴──────────────────────────┴──────────────┘
//! ```
//!
//! Each payload byte equal to the delimiter is replaced with the forward
//! distance to the next such byte (or to the appended delimiter), and the
//! overhead byte stores the distance to the first. The delimiter value
//! therefore never appears inside the packet body, and the decoder can walk
//! the distance chain to restore every stuffed byte.
//!
//! Two integrity checks are folded into the routines: the encoder requires a
//! zeroed overhead cell (unencoded sentinel) and the decoder zeroes it on
//! entry, so double-encoding and double-decoding are both rejected instead of
//! silently corrupting the buffer.

use crate::constants::{MAX_PACKET_SIZE, MAX_PAYLOAD_SIZE, MIN_PACKET_SIZE};
use crate::error::CobsError;

/// Encodes the payload staged in `buffer` in place.
///
/// On entry the payload occupies `buffer[1..=payload_size]` and `buffer[0]`
/// must be zero. On success the packet occupies
/// `buffer[0..payload_size + 2]`: the overhead byte, the stuffed payload,
/// and the literal delimiter.
///
/// # Arguments
///
/// * `buffer` - Staging buffer holding the payload; must span at least
///   `payload_size + 2` bytes
/// * `payload_size` - Count of staged payload bytes, 1..=254
/// * `delimiter` - Byte value to eliminate from the packet body
///
/// # Returns
///
/// * `Ok(packet_size)` - The encoded packet size, `payload_size + 2`
/// * `Err(CobsError)` - The buffer was left untouched
pub fn encode_payload(buffer: &mut [u8], payload_size: u8, delimiter: u8) -> Result<u16, CobsError> {
    if payload_size == 0 {
        return Err(CobsError::EncoderTooSmall { payload_size });
    }
    if payload_size > MAX_PAYLOAD_SIZE {
        return Err(CobsError::EncoderTooLarge {
            payload_size: payload_size as u16,
        });
    }

    let payload_size = payload_size as usize;
    let packet_size = payload_size + 2;
    if buffer.len() < packet_size {
        return Err(CobsError::EncoderPacketLargerThanBuffer {
            packet_size,
            buffer_size: buffer.len(),
        });
    }
    if buffer[0] != 0 {
        return Err(CobsError::PayloadAlreadyEncoded {
            overhead: buffer[0],
        });
    }

    // Walk the payload backwards, replacing each delimiter occurrence with
    // the distance to the next occurrence. The appended delimiter at
    // payload_size + 1 seeds the chain.
    let mut next_delimiter_index = payload_size + 1;
    for index in (1..=payload_size).rev() {
        if buffer[index] == delimiter {
            buffer[index] = (next_delimiter_index - index) as u8;
            next_delimiter_index = index;
        }
    }

    buffer[0] = next_delimiter_index as u8;
    buffer[payload_size + 1] = delimiter;

    Ok(packet_size as u16)
}

/// Decodes the packet staged in `buffer[0..packet_size]` in place.
///
/// Walks the distance chain from the overhead byte, restoring the delimiter
/// value at every hop. The traversal must land exactly on the final packet
/// index and find the literal delimiter there; anything else indicates
/// corruption. The overhead cell is zeroed on entry, marking the buffer as
/// decoded.
///
/// # Arguments
///
/// * `buffer` - Buffer holding the packet in its first `packet_size` bytes
/// * `packet_size` - Declared packet size, 3..=256
/// * `delimiter` - Byte value the encoder eliminated
///
/// # Returns
///
/// * `Ok(payload_size)` - The restored payload size, `packet_size - 2`
/// * `Err(CobsError)` - The packet is corrupted or was already decoded
pub fn decode_payload(buffer: &mut [u8], packet_size: u16, delimiter: u8) -> Result<u8, CobsError> {
    if packet_size < MIN_PACKET_SIZE {
        return Err(CobsError::DecoderTooSmall { packet_size });
    }
    if packet_size > MAX_PACKET_SIZE {
        return Err(CobsError::DecoderTooLarge { packet_size });
    }

    let packet_size = packet_size as usize;
    if buffer.len() < packet_size {
        return Err(CobsError::DecoderPacketLargerThanBuffer {
            packet_size: packet_size as u16,
            buffer_size: buffer.len(),
        });
    }
    if buffer[0] == 0 {
        return Err(CobsError::PacketAlreadyDecoded);
    }

    let last_index = packet_size - 1;
    let mut index = buffer[0] as usize;
    buffer[0] = 0;

    loop {
        if index > last_index {
            return Err(CobsError::DelimiterNotFound);
        }
        if index == last_index {
            if buffer[index] == delimiter {
                return Ok((packet_size - 2) as u8);
            }
            return Err(CobsError::DelimiterNotFound);
        }
        if buffer[index] == delimiter {
            // A literal delimiter inside the body means the distance chain
            // was damaged in transit.
            return Err(CobsError::DelimiterFoundTooEarly { index });
        }

        let distance = buffer[index] as usize;
        if distance == 0 {
            // Stored distances are always positive. The delimiter check
            // above only catches a zero byte when the delimiter is 0, and a
            // zero distance would never advance the walk.
            return Err(CobsError::DelimiterNotFound);
        }
        buffer[index] = delimiter;
        index += distance;
    }
}

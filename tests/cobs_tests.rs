//! Tests for the in-place COBS codec
//!
//! Verifies the distance-chain encoding, byte-exact roundtrips, the
//! double-encode/double-decode guards, and the size boundaries of both
//! routines.

use axtl_rs::cobs::{decode_payload, encode_payload};
use axtl_rs::CobsError;

/// Stages `payload` the way the transport layer does: overhead cell at
/// index 0, payload from index 1, one spare cell for the delimiter.
fn stage(payload: &[u8]) -> Vec<u8> {
    let mut buffer = vec![0u8; payload.len() + 2];
    buffer[1..=payload.len()].copy_from_slice(payload);
    buffer
}

#[test]
fn test_roundtrip_mixed_payload() {
    let payload = [1u8, 2, 3, 0, 0, 6, 0, 8, 0, 0];
    let mut buffer = stage(&payload);

    let packet_size = encode_payload(&mut buffer, payload.len() as u8, 0).unwrap();
    assert_eq!(packet_size, 12);
    assert_eq!(buffer, vec![4, 1, 2, 3, 1, 2, 6, 2, 8, 1, 1, 0]);

    let payload_size = decode_payload(&mut buffer, packet_size, 0).unwrap();
    assert_eq!(payload_size as usize, payload.len());
    assert_eq!(&buffer[1..=payload.len()], &payload);
}

#[test]
fn test_encoded_body_never_contains_delimiter() {
    let payload = [0u8, 5, 0, 5, 0, 5, 0];
    let mut buffer = stage(&payload);

    let packet_size = encode_payload(&mut buffer, payload.len() as u8, 0).unwrap();

    // Only the appended terminator may hold the delimiter value.
    let body = &buffer[..packet_size as usize - 1];
    assert!(body.iter().all(|&byte| byte != 0));
    assert_eq!(buffer[packet_size as usize - 1], 0);
}

#[test]
fn test_single_byte_payload() {
    let mut buffer = stage(&[0]);
    let packet_size = encode_payload(&mut buffer, 1, 0).unwrap();
    assert_eq!(packet_size, 3);
    assert_eq!(buffer, vec![1, 1, 0]);

    let payload_size = decode_payload(&mut buffer, 3, 0).unwrap();
    assert_eq!(payload_size, 1);
    assert_eq!(buffer[1], 0);
}

#[test]
fn test_max_size_payload() {
    let payload: Vec<u8> = (0..254u16).map(|i| (i % 251) as u8 + 1).collect();
    let mut buffer = stage(&payload);

    let packet_size = encode_payload(&mut buffer, 254, 0).unwrap();
    assert_eq!(packet_size, 256);

    let payload_size = decode_payload(&mut buffer, 256, 0).unwrap();
    assert_eq!(payload_size, 254);
    assert_eq!(&buffer[1..=254], payload.as_slice());
}

#[test]
fn test_all_delimiters_payload() {
    // 254 zeros with delimiter zero: the chain threads every single cell,
    // so the overhead and every payload byte become 1.
    let payload = [0u8; 254];
    let mut buffer = stage(&payload);

    let packet_size = encode_payload(&mut buffer, 254, 0).unwrap();
    assert_eq!(packet_size, 256);
    assert_eq!(buffer[0], 1);
    assert!(buffer[1..=254].iter().all(|&byte| byte == 1));
    assert_eq!(buffer[255], 0);

    let payload_size = decode_payload(&mut buffer, 256, 0).unwrap();
    assert_eq!(payload_size, 254);
    assert!(buffer[1..=254].iter().all(|&byte| byte == 0));
}

#[test]
fn test_encoder_size_boundaries() {
    let mut buffer = vec![0u8; 300];

    assert_eq!(
        encode_payload(&mut buffer, 0, 0),
        Err(CobsError::EncoderTooSmall { payload_size: 0 })
    );
    assert_eq!(
        encode_payload(&mut buffer, 255, 0),
        Err(CobsError::EncoderTooLarge { payload_size: 255 })
    );
}

#[test]
fn test_encoder_rejects_short_buffer() {
    // 10 payload bytes need 12 cells.
    let mut buffer = vec![0u8; 11];
    assert_eq!(
        encode_payload(&mut buffer, 10, 0),
        Err(CobsError::EncoderPacketLargerThanBuffer {
            packet_size: 12,
            buffer_size: 11,
        })
    );
}

#[test]
fn test_decoder_size_boundaries() {
    let mut buffer = vec![0u8; 300];
    buffer[0] = 1;

    assert_eq!(
        decode_payload(&mut buffer, 2, 0),
        Err(CobsError::DecoderTooSmall { packet_size: 2 })
    );
    assert_eq!(
        decode_payload(&mut buffer, 257, 0),
        Err(CobsError::DecoderTooLarge { packet_size: 257 })
    );
}

#[test]
fn test_decoder_rejects_short_buffer() {
    let mut buffer = vec![1u8; 5];
    assert_eq!(
        decode_payload(&mut buffer, 6, 0),
        Err(CobsError::DecoderPacketLargerThanBuffer {
            packet_size: 6,
            buffer_size: 5,
        })
    );
}

#[test]
fn test_minimum_and_maximum_packet_sizes_decode() {
    // Packet size 3: one payload byte.
    let mut small = stage(&[7]);
    let small_size = encode_payload(&mut small, 1, 0).unwrap();
    assert_eq!(small_size, 3);
    assert_eq!(decode_payload(&mut small, small_size, 0), Ok(1));

    // Packet size 256: 254 payload bytes.
    let mut large = stage(&[9u8; 254]);
    let large_size = encode_payload(&mut large, 254, 0).unwrap();
    assert_eq!(large_size, 256);
    assert_eq!(decode_payload(&mut large, large_size, 0), Ok(254));
}

#[test]
fn test_double_encode_and_double_decode_are_rejected() {
    let mut buffer = stage(&[1, 0, 3]);
    let packet_size = encode_payload(&mut buffer, 3, 0).unwrap();

    let encoded_snapshot = buffer.clone();
    assert!(matches!(
        encode_payload(&mut buffer, 3, 0),
        Err(CobsError::PayloadAlreadyEncoded { .. })
    ));
    assert_eq!(buffer, encoded_snapshot);

    decode_payload(&mut buffer, packet_size, 0).unwrap();
    assert_eq!(
        decode_payload(&mut buffer, packet_size, 0),
        Err(CobsError::PacketAlreadyDecoded)
    );
}

#[test]
fn test_nonzero_delimiter_with_matching_overhead() {
    // With delimiter 0x03 and the first occurrence at payload index 3, the
    // overhead byte itself equals the delimiter. The decoder must tolerate
    // this and restore the payload.
    let payload = [10u8, 20, 3, 30];
    let mut buffer = stage(&payload);

    let packet_size = encode_payload(&mut buffer, 4, 3).unwrap();
    assert_eq!(buffer[0], 3);

    let payload_size = decode_payload(&mut buffer, packet_size, 3).unwrap();
    assert_eq!(payload_size, 4);
    assert_eq!(&buffer[1..=4], &payload);
}

mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn roundtrip_preserves_any_payload(
            payload in proptest::collection::vec(any::<u8>(), 1..=254)
        ) {
            let mut buffer = stage(&payload);
            let packet_size = encode_payload(&mut buffer, payload.len() as u8, 0).unwrap();

            prop_assert_eq!(packet_size as usize, payload.len() + 2);
            prop_assert!(buffer[..packet_size as usize - 1].iter().all(|&b| b != 0));

            let payload_size = decode_payload(&mut buffer, packet_size, 0).unwrap();
            prop_assert_eq!(payload_size as usize, payload.len());
            prop_assert_eq!(&buffer[1..=payload.len()], payload.as_slice());
        }
    }
}

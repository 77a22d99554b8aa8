//! End-to-end transport scenarios
//!
//! Drives full frames through the transport layer over the mock link,
//! including the literal wire bytes the firmware expects, sequential frame
//! streams, and the non-default CRC widths.

use axtl_rs::constants;
use axtl_rs::transport::serial_mock::MockSerialLink;
use axtl_rs::util::hex::{encode_hex, hex_to_bytes};
use axtl_rs::{cobs, CrcProcessor, CrcWord, TransportConfig, TransportLayer};
use std::time::Duration;

fn fast_config() -> TransportConfig {
    TransportConfig {
        timeout: Duration::from_millis(10),
        ..TransportConfig::default()
    }
}

fn layer_with<W: CrcWord>(
    crc: CrcProcessor<W>,
) -> (TransportLayer<W, MockSerialLink>, MockSerialLink) {
    let link = MockSerialLink::new();
    let layer = TransportLayer::new(link.clone(), crc, fast_config()).unwrap();
    (layer, link)
}

/// Builds a device-style inbound frame (no payload-size byte) for any CRC
/// width.
fn build_inbound_frame<W: CrcWord>(crc: &CrcProcessor<W>, payload: &[u8]) -> Vec<u8> {
    let mut packet = vec![0u8; payload.len() + 2];
    packet[1..=payload.len()].copy_from_slice(payload);
    let packet_size = cobs::encode_payload(&mut packet, payload.len() as u8, 0).unwrap() as usize;

    let checksum = crc.compute(&packet, 0, packet_size).unwrap();
    let mut postamble = vec![0u8; crc.crc_size()];
    crc.append(&mut postamble, 0, checksum).unwrap();

    let mut frame = vec![constants::DEFAULT_START_BYTE];
    frame.extend_from_slice(&packet[..packet_size]);
    frame.extend_from_slice(&postamble);
    frame
}

#[test]
fn test_outbound_frame_matches_firmware_contract() {
    let (mut layer, link) = layer_with(CrcProcessor::crc16_ccitt_false());

    layer
        .write_bytes(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10], 0)
        .unwrap();
    layer.send().unwrap();

    let sent = link.get_tx_data();

    // start byte, payload size, overhead, 10 payload bytes, delimiter,
    // 2 CRC bytes
    assert_eq!(sent.len(), 16);
    assert_eq!(encode_hex(&sent[..14]), "810a0b0102030405060708090a00");

    // The postamble is the big-endian CRC over the packet.
    let crc = CrcProcessor::<u16>::crc16_ccitt_false();
    let checksum = crc.compute(&sent, 2, 12).unwrap();
    assert_eq!(&sent[14..], &checksum.to_be_bytes());
}

#[test]
fn test_back_to_back_frames_arrive_in_order() {
    let (mut layer, link) = layer_with(CrcProcessor::crc16_ccitt_false());
    let crc = CrcProcessor::<u16>::crc16_ccitt_false();

    let first = [1u8, 0, 2, 0, 3];
    let second = [0xFFu8, 0xFE, 0xFD];
    link.queue_rx_data(&build_inbound_frame(&crc, &first));
    link.queue_rx_data(&build_inbound_frame(&crc, &second));

    layer.receive().unwrap();
    let mut recovered = [0u8; 5];
    layer.read_bytes(&mut recovered, 0).unwrap();
    assert_eq!(recovered, first);

    layer.receive().unwrap();
    let mut recovered = [0u8; 3];
    layer.read_bytes(&mut recovered, 0).unwrap();
    assert_eq!(recovered, second);
}

#[test]
fn test_noise_between_frames_is_survived() {
    let (mut layer, link) = layer_with(CrcProcessor::crc16_ccitt_false());
    let crc = CrcProcessor::<u16>::crc16_ccitt_false();

    link.queue_rx_data(&hex_to_bytes("00 7f 80"));
    link.queue_rx_data(&build_inbound_frame(&crc, &[11, 12]));
    link.queue_rx_data(&hex_to_bytes("55 55 55 55 55 55 55"));
    link.queue_rx_data(&build_inbound_frame(&crc, &[13, 14]));

    layer.receive().unwrap();
    let mut recovered = [0u8; 2];
    layer.read_bytes(&mut recovered, 0).unwrap();
    assert_eq!(recovered, [11, 12]);

    layer.receive().unwrap();
    layer.read_bytes(&mut recovered, 0).unwrap();
    assert_eq!(recovered, [13, 14]);
}

#[test]
fn test_payload_size_sweep_roundtrips() {
    let (mut layer, link) = layer_with(CrcProcessor::crc16_ccitt_false());

    for size in [1usize, 2, 127, 253, 254] {
        let payload: Vec<u8> = (0..size).map(|i| (i % 256) as u8).collect();

        layer.write_bytes(&payload, 0).unwrap();
        layer.send().unwrap();

        // Loop the transmission back, dropping the outbound-only
        // payload-size byte.
        let sent = link.get_tx_data();
        let mut inbound = vec![sent[0]];
        inbound.extend_from_slice(&sent[2..]);
        link.clear();
        link.queue_rx_data(&inbound);

        layer.receive().unwrap();
        assert_eq!(layer.bytes_in_reception_buffer(), size);

        let mut recovered = vec![0u8; size];
        layer.read_bytes(&mut recovered, 0).unwrap();
        assert_eq!(recovered, payload, "payload size {size}");
        link.clear();
    }
}

#[test]
fn test_crc8_postamble_end_to_end() {
    let crc = CrcProcessor::<u8>::new(0x07, 0x00, 0x00);
    let (mut layer, link) = layer_with(CrcProcessor::<u8>::new(0x07, 0x00, 0x00));

    link.queue_rx_data(&build_inbound_frame(&crc, &[1, 0, 2, 0, 3]));
    layer.receive().unwrap();

    let mut recovered = [0u8; 5];
    layer.read_bytes(&mut recovered, 0).unwrap();
    assert_eq!(recovered, [1, 0, 2, 0, 3]);
}

#[test]
fn test_crc32_postamble_end_to_end() {
    let crc = CrcProcessor::<u32>::new(0x04C1_1DB7, 0xFFFF_FFFF, 0x0000_0000);
    let (mut layer, link) = layer_with(CrcProcessor::<u32>::new(
        0x04C1_1DB7,
        0xFFFF_FFFF,
        0x0000_0000,
    ));

    layer.write_bytes(&[0xAB, 0x00, 0xCD], 0).unwrap();
    layer.send().unwrap();

    // The 4-byte postamble rides at the end of the frame.
    let sent = link.get_tx_data();
    assert_eq!(sent.len(), 2 + 5 + 4);

    link.clear();
    link.queue_rx_data(&build_inbound_frame(&crc, &[0xAB, 0x00, 0xCD]));
    layer.receive().unwrap();

    let mut recovered = [0u8; 3];
    layer.read_bytes(&mut recovered, 0).unwrap();
    assert_eq!(recovered, [0xAB, 0x00, 0xCD]);
}

#[test]
fn test_firmware_default_parameters() {
    let config = TransportConfig::default();

    assert_eq!(config.start_byte, 129);
    assert_eq!(config.delimiter_byte, 0x00);
    assert_eq!(config.timeout, Duration::from_micros(20_000));
    assert!(!config.allow_start_byte_errors);
    assert_eq!(config.max_payload_size, 254);

    assert_eq!(constants::CRC16_CCITT_FALSE_POLYNOMIAL, 0x1021);
    assert_eq!(constants::CRC16_CCITT_FALSE_INITIAL, 0xFFFF);
    assert_eq!(constants::CRC16_CCITT_FALSE_FINAL_XOR, 0x0000);
}

//! The codec module contains the components responsible for turning a raw
//! payload into a self-delimiting, corruption-detecting packet: the COBS
//! byte-stuffing codec and the table-driven CRC engine.

pub mod cobs;
pub mod crc;

pub use cobs::{decode_payload, encode_payload};
pub use crc::{CrcProcessor, CrcWord};

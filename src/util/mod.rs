//! # Utility Modules
//!
//! This module provides common utility functions and types used throughout
//! the axtl-rs crate: hex encoding/decoding for frame diagnostics and
//! rate-limited logging for noisy serial lines.

pub mod hex;
pub mod logging;

// Re-export commonly used types and functions
pub use hex::{decode_hex, encode_hex, format_hex_compact, hex_to_bytes};
pub use logging::LogThrottle;

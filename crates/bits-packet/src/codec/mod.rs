//! Bit-level decoding for BITS transmissions.
//!
//! [`bits`] turns hex input into a bit cursor; [`packet`] parses the packet
//! tree on top of it.

pub mod bits;
pub mod packet;

pub use bits::{BitReader, Bits};
pub use packet::{decode, decode_strict, decode_with_options, parse_packet, DecodeOptions};

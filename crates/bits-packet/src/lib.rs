//! BITS: decoder and evaluator for hex-encoded nested packet transmissions.
//!
//! A transmission is a single line of hex digits. Its bits (most significant
//! bit first) encode one outermost packet, optionally followed by zero padding
//! up to the next hex digit.
//!
//! # Overview
//!
//! Every packet starts with a 3-bit version and a 3-bit type id:
//! - **Literal** (type id 4): a value split over 5-bit groups
//! - **Operator** (any other type id): an expression over nested subpackets,
//!   framed either by their total length in bits or by their count
//!
//! # Quick Start
//!
//! ```rust
//! use bits_packet::{decode, evaluate, version_sum, OperatorKind, Packet};
//!
//! let packet = decode("C200B40A82").unwrap();
//! assert_eq!(
//!     packet,
//!     Packet::operator(
//!         6,
//!         OperatorKind::Sum,
//!         vec![Packet::literal(6, 1), Packet::literal(2, 2)],
//!     )
//! );
//!
//! assert_eq!(version_sum(&packet), 14);
//! assert_eq!(evaluate(&packet).unwrap(), 3);
//! ```
//!
//! # Modules
//!
//! - [`codec`]: Bit reader and packet decoder
//! - [`model`]: Packet tree types
//! - [`eval`]: Version sums and expression evaluation
//! - [`error`]: Error types
//! - [`limits`]: Field widths and decode limits
//!
//! # Security
//!
//! The decoder is safe to run on untrusted input:
//! - Nesting is tracked on an explicit stack and capped by [`DecodeOptions`]
//! - Decoding, evaluation and dropping a tree never recurse per nesting level
//! - Literals wider than 64 bits are rejected, never truncated
//! - Evaluation uses checked arithmetic

pub mod codec;
pub mod error;
pub mod eval;
pub mod limits;
pub mod model;

// Re-export commonly used types at crate root
pub use codec::{decode, decode_strict, decode_with_options, BitReader, Bits, DecodeOptions};
pub use error::{DecodeError, Error, ErrorCode, EvalError};
pub use eval::{evaluate, evaluate_hex, version_sum, version_sum_hex};
pub use model::{OperatorKind, Packet, PacketType};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

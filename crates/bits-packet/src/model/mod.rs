//! Data model types for BITS packets.
//!
//! A transmission decodes to a single [`Packet`] tree whose leaves are
//! literal values and whose inner nodes are operators.

pub mod packet;

pub use packet::{OperatorKind, Packet, PacketType, LITERAL_TYPE_ID};

//! Field widths of the BITS wire format and default decode limits.

/// Width of the packet version field.
pub const VERSION_BITS: usize = 3;

/// Width of the packet type id field.
pub const TYPE_ID_BITS: usize = 3;

/// Width of one literal group: a continuation flag plus one nibble.
pub const LITERAL_GROUP_BITS: usize = 5;

/// Width of the operator length-type-id flag.
pub const LENGTH_TYPE_BITS: usize = 1;

/// Width of the total-bit-length field (length type 0).
pub const TOTAL_LENGTH_BITS: usize = 15;

/// Width of the subpacket-count field (length type 1).
pub const SUBPACKET_COUNT_BITS: usize = 11;

/// Bits encoded by a single hex digit.
pub const BITS_PER_HEX_DIGIT: usize = 4;

/// Default maximum operator nesting depth.
pub const MAX_NESTING_DEPTH: usize = 1 << 16;

/// Default maximum input length in hex digits (512 KiB of payload).
pub const MAX_INPUT_LEN: usize = 1 << 20;

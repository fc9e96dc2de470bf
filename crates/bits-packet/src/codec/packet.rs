//! Packet decoding for the BITS format.
//!
//! Wire layout of a packet header:
//!
//! ```text
//! version:3 type_id:3 body
//! ```
//!
//! A literal body is a run of 5-bit groups (`flag:1 nibble:4`) ending with the
//! first group whose flag is clear. An operator body starts with a 1-bit
//! length type: `0` is followed by a 15-bit total length of the subpacket
//! region in bits, `1` by an 11-bit subpacket count.
//!
//! Nested operators are tracked on an explicit frame stack, so input depth
//! never turns into native call depth.

use tracing::{debug, trace};

use crate::codec::bits::{BitReader, Bits};
use crate::error::DecodeError;
use crate::limits::{
    LENGTH_TYPE_BITS, LITERAL_GROUP_BITS, MAX_INPUT_LEN, MAX_NESTING_DEPTH, SUBPACKET_COUNT_BITS,
    TOTAL_LENGTH_BITS, TYPE_ID_BITS, VERSION_BITS,
};
use crate::model::{OperatorKind, Packet, PacketType};

// Length type ids
const LENGTH_TYPE_TOTAL_LENGTH: u32 = 0;
const LENGTH_TYPE_COUNT: u32 = 1;

// =============================================================================
// OPTIONS
// =============================================================================

/// Limits applied while decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Maximum number of operators nested inside one another.
    ///
    /// Also bounds the call depth of the recursive trait impls on [`Packet`]
    /// (`Clone`, `PartialEq`, `Debug`, `Display`).
    pub max_depth: usize,
    /// Maximum input length in hex digits, checked before any bit is read.
    pub max_input_len: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: MAX_NESTING_DEPTH,
            max_input_len: MAX_INPUT_LEN,
        }
    }
}

impl DecodeOptions {
    /// Creates options with the default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options with every limit disabled.
    ///
    /// Decoding, evaluation and dropping stay iterative at any depth; only the
    /// recursive trait impls on [`Packet`] are unsafe on very deep trees.
    pub fn unbounded() -> Self {
        Self {
            max_depth: usize::MAX,
            max_input_len: usize::MAX,
        }
    }
}

// =============================================================================
// ENTRY POINTS
// =============================================================================

/// Decodes the outermost packet of a hex transmission.
///
/// Surrounding whitespace is ignored. Bits left over after the outermost
/// packet are hex-alignment padding and are not inspected.
pub fn decode(hex: &str) -> Result<Packet, DecodeError> {
    decode_with_options(hex, &DecodeOptions::default())
}

/// Decodes the outermost packet with explicit limits.
pub fn decode_with_options(hex: &str, options: &DecodeOptions) -> Result<Packet, DecodeError> {
    let (packet, _) = decode_reader(hex, options)?;
    Ok(packet)
}

/// Decodes the outermost packet and requires the padding after it to be zero.
pub fn decode_strict(hex: &str) -> Result<Packet, DecodeError> {
    let (packet, reader) = decode_reader(hex, &DecodeOptions::default())?;
    if !reader.is_padding_zero() {
        return Err(DecodeError::TrailingData {
            bits: reader.remaining_len(),
        });
    }
    Ok(packet)
}

fn decode_reader(hex: &str, options: &DecodeOptions) -> Result<(Packet, BitReader), DecodeError> {
    let hex = hex.trim();
    if hex.len() > options.max_input_len {
        return Err(DecodeError::InputTooLong {
            len: hex.len(),
            max: options.max_input_len,
        });
    }

    let mut reader = BitReader::from_hex(hex)?;
    let packet = parse_packet(&mut reader, options)?;
    debug!(
        consumed = reader.position(),
        padding = reader.remaining_len(),
        packets = packet.packet_count(),
        "decoded outermost packet"
    );
    Ok((packet, reader))
}

// =============================================================================
// DECODING
// =============================================================================

/// How an operator announces the extent of its subpackets.
#[derive(Debug, Clone, Copy)]
enum Framing {
    /// Subpackets end exactly at this bit offset.
    TotalLength { end: usize },
    /// Exactly this many subpackets follow.
    Count { count: usize },
}

/// An operator whose subpackets are still being decoded.
#[derive(Debug)]
struct Frame {
    version: u8,
    kind: OperatorKind,
    framing: Framing,
    operands: Vec<Packet>,
}

impl Frame {
    fn new(version: u8, kind: OperatorKind, framing: Framing) -> Self {
        let operands = match framing {
            Framing::Count { count } => Vec::with_capacity(count),
            Framing::TotalLength { .. } => Vec::new(),
        };
        Self {
            version,
            kind,
            framing,
            operands,
        }
    }

    /// Returns true once the framing is satisfied at `position`.
    fn is_complete(&self, position: usize) -> Result<bool, DecodeError> {
        match self.framing {
            Framing::TotalLength { end } if position > end => Err(DecodeError::LengthMismatch {
                expected_end: end,
                position,
            }),
            Framing::TotalLength { end } => Ok(position == end),
            Framing::Count { count } => Ok(self.operands.len() == count),
        }
    }

    fn into_packet(self) -> Packet {
        Packet::Operator {
            version: self.version,
            kind: self.kind,
            operands: self.operands,
        }
    }
}

/// Decodes exactly one packet (with all of its subpackets) at the cursor.
///
/// The cursor is left just past the packet; trailing padding is the caller's
/// business.
pub fn parse_packet(
    reader: &mut BitReader,
    options: &DecodeOptions,
) -> Result<Packet, DecodeError> {
    let mut stack: Vec<Frame> = Vec::new();

    'packets: loop {
        let (version, packet_type) = read_header(reader)?;
        let mut packet = match packet_type {
            PacketType::Literal => Packet::Literal {
                version,
                value: read_literal_value(reader)?,
            },
            PacketType::Operator(kind) => {
                if stack.len() >= options.max_depth {
                    return Err(DecodeError::NestingTooDeep {
                        max: options.max_depth,
                    });
                }
                let frame = Frame::new(version, kind, read_framing(reader)?);
                if !frame.is_complete(reader.position())? {
                    stack.push(frame);
                    continue;
                }
                frame.into_packet()
            }
        };

        // Hand the finished packet to its parent, closing every frame it completes.
        while let Some(mut parent) = stack.pop() {
            parent.operands.push(packet);
            if !parent.is_complete(reader.position())? {
                stack.push(parent);
                continue 'packets;
            }
            packet = parent.into_packet();
        }
        return Ok(packet);
    }
}

fn read_header(reader: &mut BitReader) -> Result<(u8, PacketType), DecodeError> {
    let position = reader.position();
    let version = reader.read_u32(VERSION_BITS, "version")? as u8;
    let type_id = reader.read_u32(TYPE_ID_BITS, "type_id")? as u8;
    let packet_type = PacketType::from_u8(type_id).ok_or(DecodeError::MalformedHeader { type_id })?;
    trace!(position, version, type_id, "packet header");
    Ok((version, packet_type))
}

/// Reads literal groups until one has its continuation flag clear.
fn read_literal_value(reader: &mut BitReader) -> Result<u64, DecodeError> {
    let mut buffer = Bits::with_capacity(64);
    loop {
        let group = reader.read_bits(LITERAL_GROUP_BITS, "literal group")?;
        buffer.extend(group.iter().skip(1));
        if group.get(0) != Some(true) {
            break;
        }
    }
    buffer.to_u64().map_err(|_| DecodeError::LiteralOverflow {
        bits: buffer.significant_len(),
    })
}

fn read_framing(reader: &mut BitReader) -> Result<Framing, DecodeError> {
    let length_type = reader.read_u32(LENGTH_TYPE_BITS, "length_type_id")?;
    if length_type == LENGTH_TYPE_COUNT {
        let count = reader.read_u32(SUBPACKET_COUNT_BITS, "subpacket_count")? as usize;
        return Ok(Framing::Count { count });
    }
    debug_assert_eq!(length_type, LENGTH_TYPE_TOTAL_LENGTH);
    let length = reader.read_u32(TOTAL_LENGTH_BITS, "subpacket_length")? as usize;
    Ok(Framing::TotalLength {
        end: reader.position() + length,
    })
}

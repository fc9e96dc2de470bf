//! Bit-level reading over hex-encoded input.
//!
//! Each hex digit contributes four bits, most significant bit first, so the
//! digit `A` yields the bits `1010`. The reader keeps a single bit cursor and
//! never moves backwards.

use crate::error::DecodeError;
use crate::limits::BITS_PER_HEX_DIGIT;

// =============================================================================
// BIT SEQUENCES
// =============================================================================

/// An ordered sequence of bits, first bit most significant.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bits {
    bits: Vec<bool>,
}

impl Bits {
    /// Creates an empty bit sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty bit sequence with room for `capacity` bits.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bits: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of bits.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Returns true if the sequence holds no bits.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Returns the bit at `index`, if present.
    pub fn get(&self, index: usize) -> Option<bool> {
        self.bits.get(index).copied()
    }

    /// Iterates over the bits in order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }

    /// Appends a bit.
    pub fn push(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    /// Number of bits after stripping leading zeros.
    pub fn significant_len(&self) -> usize {
        self.bits
            .iter()
            .position(|&bit| bit)
            .map_or(0, |first_set| self.bits.len() - first_set)
    }

    /// Interprets the bits as an unsigned 32-bit integer.
    ///
    /// Leading zero bits are ignored; any significant bit beyond the 32nd is
    /// an error rather than being truncated.
    pub fn to_u32(&self) -> Result<u32, DecodeError> {
        self.to_unsigned(32).map(|value| value as u32)
    }

    /// Interprets the bits as an unsigned 64-bit integer.
    ///
    /// Same leading-zero rule as [`Bits::to_u32`].
    pub fn to_u64(&self) -> Result<u64, DecodeError> {
        self.to_unsigned(64)
    }

    fn to_unsigned(&self, max: usize) -> Result<u64, DecodeError> {
        let bits = self.significant_len();
        if bits > max {
            return Err(DecodeError::IntegerOverflow { bits, max });
        }
        Ok(self.bits[self.bits.len() - bits..]
            .iter()
            .fold(0u64, |acc, &bit| (acc << 1) | u64::from(bit)))
    }
}

impl From<Vec<bool>> for Bits {
    fn from(bits: Vec<bool>) -> Self {
        Self { bits }
    }
}

impl FromIterator<bool> for Bits {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self {
            bits: iter.into_iter().collect(),
        }
    }
}

impl Extend<bool> for Bits {
    fn extend<I: IntoIterator<Item = bool>>(&mut self, iter: I) {
        self.bits.extend(iter);
    }
}

// =============================================================================
// READER
// =============================================================================

/// Reader over the bits of a hex string.
///
/// The hex source is validated and frozen at construction; only the cursor
/// moves afterwards. Every read is bounds-checked and a failed read leaves the
/// cursor where it was.
#[derive(Debug, Clone)]
pub struct BitReader {
    digits: Vec<u8>,
    pos: usize,
}

impl BitReader {
    /// Creates a reader from hex digits (case-insensitive).
    pub fn from_hex(hex: &str) -> Result<Self, DecodeError> {
        let digits = hex
            .chars()
            .enumerate()
            .map(|(index, digit)| {
                digit
                    .to_digit(16)
                    .map(|nibble| nibble as u8)
                    .ok_or(DecodeError::InvalidHexDigit { digit, index })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { digits, pos: 0 })
    }

    /// Returns the total number of bits in the stream.
    pub fn len(&self) -> usize {
        self.digits.len() * BITS_PER_HEX_DIGIT
    }

    /// Returns true if the stream holds no bits at all.
    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    /// Returns the current bit offset.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the number of unread bits.
    pub fn remaining_len(&self) -> usize {
        self.len() - self.pos
    }

    /// Returns true if unread bits remain.
    pub fn has_remaining(&self) -> bool {
        self.pos < self.len()
    }

    /// Reads the next `n` bits.
    pub fn read_bits(&mut self, n: usize, context: &'static str) -> Result<Bits, DecodeError> {
        self.ensure(n, context)?;
        let bits = (self.pos..self.pos + n).map(|at| self.bit_at(at)).collect();
        self.pos += n;
        Ok(bits)
    }

    /// Reads the next `n` bits (at most 32) as an unsigned integer.
    #[inline]
    pub fn read_u32(&mut self, n: usize, context: &'static str) -> Result<u32, DecodeError> {
        if n > 32 {
            return self.read_bits(n, context)?.to_u32();
        }
        self.ensure(n, context)?;
        let value = (self.pos..self.pos + n)
            .fold(0u32, |acc, at| (acc << 1) | u32::from(self.bit_at(at)));
        self.pos += n;
        Ok(value)
    }

    /// Reads a single bit.
    #[inline]
    pub fn read_bool(&mut self, context: &'static str) -> Result<bool, DecodeError> {
        self.ensure(1, context)?;
        let bit = self.bit_at(self.pos);
        self.pos += 1;
        Ok(bit)
    }

    /// Moves the cursor to the end of the stream, returning the bits skipped.
    pub fn skip_remaining(&mut self) -> usize {
        let skipped = self.remaining_len();
        self.pos = self.len();
        skipped
    }

    /// Returns true if every unread bit is zero.
    pub fn is_padding_zero(&self) -> bool {
        (self.pos..self.len()).all(|at| !self.bit_at(at))
    }

    fn ensure(&self, n: usize, context: &'static str) -> Result<(), DecodeError> {
        let available = self.remaining_len();
        if n > available {
            return Err(DecodeError::TruncatedStream {
                context,
                position: self.pos,
                requested: n,
                available,
            });
        }
        Ok(())
    }

    #[inline]
    fn bit_at(&self, at: usize) -> bool {
        let nibble = self.digits[at / BITS_PER_HEX_DIGIT];
        let shift = BITS_PER_HEX_DIGIT - 1 - at % BITS_PER_HEX_DIGIT;
        (nibble >> shift) & 1 == 1
    }
}

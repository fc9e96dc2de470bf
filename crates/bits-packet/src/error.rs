//! Error types for BITS decoding and evaluation.

use thiserror::Error;

use crate::model::OperatorKind;

/// Stable error codes grouping the decode and evaluation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// E001: Unknown packet type id
    MalformedHeader,
    /// E002: Read past the end of the bit stream
    TruncatedStream,
    /// E003: Subpackets overran their declared bit length
    LengthMismatch,
    /// E004: Comparison operator without exactly two operands
    ArityViolation,
    /// E005: Minimum/maximum over zero operands
    EmptyOperandList,
    /// E006: Input rejected before or after decoding (hex digits, limits, padding)
    InvalidInput,
    /// E007: Value does not fit the numeric range
    NumericRange,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "E001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::MalformedHeader => "E001",
            ErrorCode::TruncatedStream => "E002",
            ErrorCode::LengthMismatch => "E003",
            ErrorCode::ArityViolation => "E004",
            ErrorCode::EmptyOperandList => "E005",
            ErrorCode::InvalidInput => "E006",
            ErrorCode::NumericRange => "E007",
        }
    }
}

/// Error during packet decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    // === E001: Malformed header ===
    #[error("[E001] unknown packet type id: {type_id}")]
    MalformedHeader { type_id: u8 },

    // === E002: Truncated stream ===
    #[error(
        "[E002] unexpected end of stream while reading {context} at bit {position}: \
         need {requested} bits, {available} available"
    )]
    TruncatedStream {
        context: &'static str,
        position: usize,
        requested: usize,
        available: usize,
    },

    // === E003: Length mismatch ===
    #[error("[E003] subpackets ended at bit {position}, past declared end {expected_end}")]
    LengthMismatch { expected_end: usize, position: usize },

    // === E006: Invalid input ===
    #[error("[E006] invalid hex digit {digit:?} at index {index}")]
    InvalidHexDigit { digit: char, index: usize },

    #[error("[E006] input length {len} exceeds maximum {max} hex digits")]
    InputTooLong { len: usize, max: usize },

    #[error("[E006] packet nesting exceeds maximum depth {max}")]
    NestingTooDeep { max: usize },

    #[error("[E006] {bits} trailing bits after the outermost packet are not zero padding")]
    TrailingData { bits: usize },

    // === E007: Numeric range ===
    #[error("[E007] literal value with {bits} significant bits exceeds 64 bits")]
    LiteralOverflow { bits: usize },

    #[error("[E007] {bits} significant bits do not fit in {max} bits")]
    IntegerOverflow { bits: usize, max: usize },
}

impl DecodeError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            DecodeError::MalformedHeader { .. } => ErrorCode::MalformedHeader,
            DecodeError::TruncatedStream { .. } => ErrorCode::TruncatedStream,
            DecodeError::LengthMismatch { .. } => ErrorCode::LengthMismatch,
            DecodeError::LiteralOverflow { .. } | DecodeError::IntegerOverflow { .. } => {
                ErrorCode::NumericRange
            }
            _ => ErrorCode::InvalidInput,
        }
    }
}

/// Error during expression evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    // === E004: Arity violation ===
    #[error("[E004] {kind} requires exactly {expected} operands, found {actual}")]
    ArityViolation {
        kind: OperatorKind,
        expected: usize,
        actual: usize,
    },

    // === E005: Empty operand list ===
    #[error("[E005] {kind} over an empty operand list")]
    EmptyOperandList { kind: OperatorKind },

    // === E007: Numeric range ===
    #[error("[E007] literal value {value} exceeds i64 range")]
    ValueOutOfRange { value: u64 },

    #[error("[E007] {kind} overflowed i64")]
    ArithmeticOverflow { kind: OperatorKind },
}

impl EvalError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            EvalError::ArityViolation { .. } => ErrorCode::ArityViolation,
            EvalError::EmptyOperandList { .. } => ErrorCode::EmptyOperandList,
            EvalError::ValueOutOfRange { .. } | EvalError::ArithmeticOverflow { .. } => {
                ErrorCode::NumericRange
            }
        }
    }
}

/// Either stage failing, for callers that decode and evaluate in one step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}

impl Error {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::Decode(e) => e.code(),
            Error::Eval(e) => e.code(),
        }
    }
}

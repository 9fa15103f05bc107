use std::fmt;

/// Error returned by every encode or decode operation.
///
/// None of these are recovered internally: the first failure aborts the
/// whole top-level call and no partial value or partial byte buffer is
/// handed back to the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CodecError {
    /// The cursor holds fewer bytes than the current field requires.
    BufferUnderflow {
        /// Bytes the field needed. For a length prefix this is the announced
        /// element count, a lower bound on the bytes the collection spans.
        needed: usize,
        /// Bytes left in the cursor.
        remaining: usize,
        /// Cursor offset at which the read was attempted.
        offset: usize,
    },
    /// A compact integer whose prefix and payload do not form the shortest
    /// encoding of any value.
    InvalidCompactInteger {
        /// Prefix byte that was read.
        prefix: u8,
        /// Offset of the prefix byte.
        offset: usize,
    },
    /// A parameter-sized array whose in-memory length disagrees with the
    /// active protocol parameters.
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    /// A length-prefixed sequence exceeding its protocol bound.
    LengthLimitExceeded {
        what: &'static str,
        limit: usize,
        actual: usize,
    },
    /// A tagged union discriminant that matches no declared variant.
    InvalidDiscriminant { type_name: &'static str, value: u8 },
    /// Attempt to build a union with zero or several populated variants.
    InvalidUnion {
        type_name: &'static str,
        populated: usize,
    },
    /// A presence byte other than `0x00` or `0x01`.
    InvalidPresence { value: u8 },
    /// A boolean byte other than `0x00` or `0x01`.
    InvalidBool { value: u8 },
    /// Map keys or set elements that are not strictly ascending.
    NonCanonical { what: &'static str },
    /// A value that does not fit the declared fixed width, or a decoded
    /// length that does not fit in memory.
    ValueOverflow { width: usize, value: u64 },
    /// Input left over after the top-level value was decoded.
    TrailingBytes { consumed: usize, remaining: usize },
}

/// Convenient alias for codec results.
pub type CodecResult<T> = Result<T, CodecError>;

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::BufferUnderflow {
                needed,
                remaining,
                offset,
            } => write!(
                f,
                "buffer underflow at offset {offset}: needed {needed} bytes, {remaining} remaining"
            ),
            CodecError::InvalidCompactInteger { prefix, offset } => write!(
                f,
                "invalid compact integer at offset {offset} (prefix {prefix:#04x})"
            ),
            CodecError::LengthMismatch {
                what,
                expected,
                actual,
            } => write!(f, "{what}: expected exactly {expected} items, got {actual}"),
            CodecError::LengthLimitExceeded {
                what,
                limit,
                actual,
            } => write!(f, "{what}: {actual} items exceeds limit of {limit}"),
            CodecError::InvalidDiscriminant { type_name, value } => {
                write!(f, "{type_name}: invalid discriminant {value}")
            }
            CodecError::InvalidUnion {
                type_name,
                populated,
            } => write!(
                f,
                "{type_name}: exactly one variant must be populated, found {populated}"
            ),
            CodecError::InvalidPresence { value } => {
                write!(f, "invalid presence byte {value:#04x}")
            }
            CodecError::InvalidBool { value } => write!(f, "invalid boolean byte {value:#04x}"),
            CodecError::NonCanonical { what } => {
                write!(f, "{what}: keys must be sorted and unique")
            }
            CodecError::ValueOverflow { width, value } => {
                write!(f, "value {value} does not fit in {width} bytes")
            }
            CodecError::TrailingBytes {
                consumed,
                remaining,
            } => write!(
                f,
                "{remaining} trailing bytes after decoding {consumed} bytes"
            ),
        }
    }
}

impl std::error::Error for CodecError {}

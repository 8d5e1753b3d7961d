//! Errors reported by bit set operations.

use core::fmt;

/// Errors from bit set construction, access, and conversion.
///
/// Every failing operation leaves its receiver unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Bit index at or past the capacity.
    OutOfRange { index: usize, capacity: usize },
    /// Character outside the two-symbol alphabet. `position` counts characters
    /// from the left of the input.
    InvalidFormat { position: usize, found: char },
    /// Binary operation between sets of different capacity.
    CapacityMismatch { left: usize, right: usize },
    /// Negative shift count.
    InvalidArgument { shift: isize },
    /// Set bit `bit` does not fit an unsigned integer of `width` bits.
    Overflow { bit: usize, width: u32 },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::OutOfRange { index, capacity } => {
                write!(f, "bit index {index} out of range for capacity {capacity}")
            }
            Error::InvalidFormat { position, found } => {
                write!(f, "invalid bit character {found:?} at position {position}")
            }
            Error::CapacityMismatch { left, right } => {
                write!(f, "capacity mismatch: {left} != {right}")
            }
            Error::InvalidArgument { shift } => write!(f, "negative shift count: {shift}"),
            Error::Overflow { bit, width } => {
                write!(f, "bit {bit} is set but target integer is {width} bits wide")
            }
        }
    }
}

impl std::error::Error for Error {}

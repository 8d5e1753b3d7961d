//! Compile-time configuration for the bit set containers.
//!
//! All invariants verified at compile time via `const` assertions.

use crate::stdx::words::Word;

// =============================================================================
// Storage layout
// =============================================================================

/// Bits per storage word.
pub const WORD_BITS: usize = Word::BITS as usize;

const _: () = assert!(WORD_BITS.is_power_of_two());
const _: () = assert!(WORD_BITS == 64, "kernels assume u64 words");

// =============================================================================
// Text encoding
// =============================================================================

/// Character for a clear bit in the default alphabet.
pub const ZERO_CHAR: char = '0';

/// Character for a set bit in the default alphabet.
pub const ONE_CHAR: char = '1';

const _: () = assert!(ZERO_CHAR != ONE_CHAR);

// =============================================================================
// Integer conversion
// =============================================================================

/// Widest unsigned integer a bit set converts to or from.
pub const UNSIGNED_WIDTH_MAX: u32 = u128::BITS;

const _: () = assert!(UNSIGNED_WIDTH_MAX as usize == 2 * WORD_BITS);

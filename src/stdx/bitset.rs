//! Fixed-size bitset backed by an array of `u64` words; capacity is compile-time known.

use core::fmt;
use core::ops::{
    BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not, Shl, ShlAssign, Shr,
    ShrAssign,
};
use core::str::FromStr;

use super::words::{self, Word, tail_mask};
use crate::constants::{ONE_CHAR, WORD_BITS, ZERO_CHAR};
use crate::error::Error;

/// Fixed-size bitset backed by an array of `u64` words.
///
/// The const parameter `N` is the bit capacity, and `WORDS` is the number of `u64` words.
/// Use `WORDS = words_for_bits(N)` to get the correct value. Because the capacity is
/// part of the type, binary operators only accept operands of the same capacity.
///
/// Bit 0 is the least-significant bit. Text renders most-significant bit first, so
/// the rightmost character of a bit string is bit 0.
///
/// `is_set`, `set`, `unset`, `set_value` and `flip` panic when `idx >= N`; `get`,
/// `try_set_value` and `try_flip` report [`Error::OutOfRange`] instead.
///
/// # Examples
/// ```
/// use fixed_bitset::stdx::{BitSet, words_for_bits};
///
/// type Byte = BitSet<8, { words_for_bits(8) }>;
///
/// let mut bits: Byte = "00001100".parse().unwrap();
/// bits.set(1);
/// assert_eq!(bits.to_bits_string(), "00001110");
/// assert_eq!(bits.to_u64(), Ok(14));
/// assert_eq!(bits.iter().collect::<Vec<_>>(), vec![1, 2, 3]);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BitSet<const N: usize, const WORDS: usize> {
    words: [Word; WORDS],
}

impl<const N: usize, const WORDS: usize> BitSet<N, WORDS> {
    const fn validate() {
        assert!(WORDS == N.div_ceil(WORD_BITS), "WORDS must equal N.div_ceil(64)");
    }

    /// Returns the number of addressable bits (`N`).
    ///
    /// Panics at compile time if `WORDS` is incorrect.
    #[inline(always)]
    pub const fn capacity() -> usize {
        Self::validate();
        N
    }

    /// Creates an empty bitset.
    #[inline]
    pub const fn empty() -> Self {
        Self::validate();
        Self {
            words: [0; WORDS],
        }
    }

    /// Creates a bitset with all bits set.
    #[inline]
    pub const fn full() -> Self {
        Self::validate();
        let mut set = Self {
            words: [Word::MAX; WORDS],
        };
        set.clear_tail();
        set
    }

    /// Creates a bitset from raw words; bits past `N` are dropped.
    #[inline]
    pub const fn from_words(words: [Word; WORDS]) -> Self {
        Self::validate();
        let mut set = Self { words };
        set.clear_tail();
        set
    }

    /// Bit `i` is `(value >> i) & 1`; bits of `value` at or past `N` are dropped.
    #[inline]
    pub const fn from_u64(value: u64) -> Self {
        Self::from_u128(value as u128)
    }

    /// Bit `i` is `(value >> i) & 1`; bits of `value` at or past `N` are dropped.
    #[inline]
    pub const fn from_u128(value: u128) -> Self {
        let mut set = Self::empty();
        let mut i = 0;
        while i < WORDS && i < 2 {
            set.words[i] = (value >> (i * WORD_BITS)) as Word;
            i += 1;
        }
        set.clear_tail();
        set
    }

    /// Parses a string of `'0'`/`'1'` characters, rightmost character first.
    ///
    /// Shorter input leaves the high bits clear; longer input keeps only its
    /// rightmost `N` characters. Any other character is [`Error::InvalidFormat`].
    pub fn from_bits_str(text: &str) -> Result<Self, Error> {
        Self::from_bits_str_with(text, ZERO_CHAR, ONE_CHAR)
    }

    /// Like [`from_bits_str`](Self::from_bits_str) with a custom alphabet.
    ///
    /// Panics if `zero == one`.
    pub fn from_bits_str_with(text: &str, zero: char, one: char) -> Result<Self, Error> {
        let mut set = Self::empty();
        words::parse_into(&mut set.words, N, text, zero, one)?;
        Ok(set)
    }

    #[inline]
    const fn clear_tail(&mut self) {
        if WORDS > 0 {
            self.words[WORDS - 1] &= tail_mask(N);
        }
    }

    /// Raw storage; bits past `N` are always clear.
    #[inline]
    pub const fn words(&self) -> &[Word; WORDS] {
        &self.words
    }

    // ============================================
    // Inspection
    // ============================================

    /// Counts set bits; never exceeds `N`.
    #[inline]
    pub const fn count(&self) -> usize {
        let mut total: usize = 0;
        let mut i = 0;
        while i < WORDS {
            total += self.words[i].count_ones() as usize;
            i += 1;
        }
        debug_assert!(total <= N);
        total
    }

    /// Returns `true` when no bits are set.
    #[inline]
    pub const fn none(&self) -> bool {
        let mut i = 0;
        while i < WORDS {
            if self.words[i] != 0 {
                return false;
            }
            i += 1;
        }
        true
    }

    /// Returns `true` when at least one bit is set.
    #[inline]
    pub const fn any(&self) -> bool {
        !self.none()
    }

    /// Returns `true` when every bit in `[0, N)` is set; vacuously `true` when `N == 0`.
    #[inline]
    pub const fn all(&self) -> bool {
        let mut i = 0;
        // Check all complete words.
        while i + 1 < WORDS {
            if self.words[i] != Word::MAX {
                return false;
            }
            i += 1;
        }

        // Last word only holds the remaining bits.
        WORDS == 0 || self.words[WORDS - 1] == tail_mask(N)
    }

    /// Lowest set bit, if any.
    #[inline]
    pub const fn first_set(&self) -> Option<usize> {
        let mut word_idx = 0;
        while word_idx < WORDS {
            let word = self.words[word_idx];
            if word != 0 {
                let idx = word_idx * WORD_BITS + word.trailing_zeros() as usize;
                debug_assert!(idx < N);
                return Some(idx);
            }
            word_idx += 1;
        }
        None
    }

    /// Lowest unset bit; `None` when full.
    #[inline]
    pub const fn first_unset(&self) -> Option<usize> {
        let mut word_idx = 0;
        while word_idx < WORDS {
            let inverted = !self.words[word_idx];
            if inverted != 0 {
                let idx = word_idx * WORD_BITS + inverted.trailing_zeros() as usize;
                if idx < N {
                    return Some(idx);
                }
                // The unset bit is beyond our capacity.
                return None;
            }
            word_idx += 1;
        }
        None
    }

    /// Returns `true` if every set bit in `self` is also set in `other`.
    ///
    /// An empty bitset is a subset of any bitset; any bitset is a subset of a full bitset.
    #[inline]
    pub const fn is_subset(&self, other: &Self) -> bool {
        let mut i = 0;
        while i < WORDS {
            if self.words[i] & !other.words[i] != 0 {
                return false;
            }
            i += 1;
        }
        true
    }

    /// Iterates over set bits in ascending order using a snapshot of the current state.
    #[inline]
    pub const fn iter(&self) -> BitSetIterator<N, WORDS> {
        BitSetIterator {
            words: self.words,
            word_idx: 0,
            current_word: if WORDS > 0 { self.words[0] } else { 0 },
        }
    }

    // ============================================
    // Single-bit access
    // ============================================

    /// Returns whether `idx` is set.
    ///
    /// Panics if `idx >= N`.
    #[inline]
    pub const fn is_set(&self, idx: usize) -> bool {
        assert!(idx < N, "bit index out of bounds");
        (self.words[idx / WORD_BITS] & (1 << (idx % WORD_BITS))) != 0
    }

    /// Returns whether `idx` is set, or [`Error::OutOfRange`].
    #[inline]
    pub fn get(&self, idx: usize) -> Result<bool, Error> {
        words::check_index(idx, N)?;
        Ok(words::get(&self.words, idx))
    }

    /// Sets the bit at `idx`.
    ///
    /// Panics if `idx >= N`.
    #[inline]
    pub const fn set(&mut self, idx: usize) {
        assert!(idx < N, "bit index out of bounds");
        self.words[idx / WORD_BITS] |= 1 << (idx % WORD_BITS);
        debug_assert!(self.is_set(idx));
    }

    /// Clears the bit at `idx`.
    ///
    /// Panics if `idx >= N`.
    #[inline]
    pub const fn unset(&mut self, idx: usize) {
        assert!(idx < N, "bit index out of bounds");
        self.words[idx / WORD_BITS] &= !(1 << (idx % WORD_BITS));
        debug_assert!(!self.is_set(idx));
    }

    /// Sets or clears the bit at `idx` based on `value`.
    ///
    /// Panics if `idx >= N`.
    #[inline]
    pub fn set_value(&mut self, idx: usize, value: bool) {
        assert!(idx < N, "bit index out of bounds");
        words::set_value(&mut self.words, idx, value);
        debug_assert!(self.is_set(idx) == value);
    }

    /// Sets or clears the bit at `idx`, or returns [`Error::OutOfRange`] without
    /// touching any bit.
    #[inline]
    pub fn try_set_value(&mut self, idx: usize, value: bool) -> Result<(), Error> {
        words::check_index(idx, N)?;
        words::set_value(&mut self.words, idx, value);
        Ok(())
    }

    /// Toggles the bit at `idx`.
    ///
    /// Panics if `idx >= N`.
    #[inline]
    pub fn flip(&mut self, idx: usize) {
        assert!(idx < N, "bit index out of bounds");
        words::flip(&mut self.words, idx);
    }

    #[inline]
    pub fn try_flip(&mut self, idx: usize) -> Result<(), Error> {
        words::check_index(idx, N)?;
        words::flip(&mut self.words, idx);
        Ok(())
    }

    // ============================================
    // Whole-set mutation
    // ============================================

    /// Clears all bits.
    #[inline]
    pub const fn clear(&mut self) {
        let mut i = 0;
        while i < WORDS {
            self.words[i] = 0;
            i += 1;
        }

        debug_assert!(self.none());
    }

    /// Sets all bits.
    #[inline]
    pub const fn fill(&mut self) {
        *self = Self::full();
        debug_assert!(self.all());
    }

    /// Toggles all bits.
    #[inline]
    pub const fn flip_all(&mut self) {
        let mut i = 0;
        while i < WORDS {
            self.words[i] = !self.words[i];
            i += 1;
        }
        self.clear_tail();
    }

    /// Bit `i` of the result is bit `i - count` of `self`, or zero.
    #[inline]
    pub fn shift_left(mut self, count: usize) -> Self {
        words::shift_left(&mut self.words, N, count);
        self
    }

    /// Bit `i` of the result is bit `i + count` of `self`, or zero.
    #[inline]
    pub fn shift_right(mut self, count: usize) -> Self {
        words::shift_right(&mut self.words, N, count);
        self
    }

    /// [`shift_left`](Self::shift_left) for a signed count; negative counts are
    /// [`Error::InvalidArgument`].
    #[inline]
    pub fn try_shift_left(self, count: isize) -> Result<Self, Error> {
        Ok(self.shift_left(words::shift_count(count)?))
    }

    /// [`shift_right`](Self::shift_right) for a signed count; negative counts are
    /// [`Error::InvalidArgument`].
    #[inline]
    pub fn try_shift_right(self, count: isize) -> Result<Self, Error> {
        Ok(self.shift_right(words::shift_count(count)?))
    }

    // ============================================
    // Conversion
    // ============================================

    /// Exactly `N` characters of `'0'`/`'1'`, most-significant bit first.
    pub fn to_bits_string(&self) -> String {
        self.to_bits_string_with(ZERO_CHAR, ONE_CHAR)
    }

    pub fn to_bits_string_with(&self, zero: char, one: char) -> String {
        words::render(&self.words, N, zero, one)
    }

    /// Returns [`Error::Overflow`] if a bit at index 32 or above is set.
    pub fn to_u32(&self) -> Result<u32, Error> {
        words::to_unsigned(&self.words, u32::BITS).map(|v| v as u32)
    }

    /// Returns [`Error::Overflow`] if a bit at index 64 or above is set.
    pub fn to_u64(&self) -> Result<u64, Error> {
        words::to_unsigned(&self.words, u64::BITS).map(|v| v as u64)
    }

    /// Returns [`Error::Overflow`] if a bit at index 128 or above is set.
    pub fn to_u128(&self) -> Result<u128, Error> {
        words::to_unsigned(&self.words, u128::BITS)
    }
}

impl<const N: usize, const WORDS: usize> Default for BitSet<N, WORDS> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<const N: usize, const WORDS: usize> From<u64> for BitSet<N, WORDS> {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl<const N: usize, const WORDS: usize> TryFrom<BitSet<N, WORDS>> for u64 {
    type Error = Error;

    fn try_from(set: BitSet<N, WORDS>) -> Result<Self, Self::Error> {
        set.to_u64()
    }
}

impl<const N: usize, const WORDS: usize> FromStr for BitSet<N, WORDS> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bits_str(s)
    }
}

impl<const N: usize, const WORDS: usize> fmt::Display for BitSet<N, WORDS> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.to_bits_string())
    }
}

impl<const N: usize, const WORDS: usize> fmt::Binary for BitSet<N, WORDS> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad_integral(true, "0b", &self.to_bits_string())
    }
}

// ============================================
// Operators
// ============================================

macro_rules! bitset_binary_op {
    ($op:ident, $method:ident, $op_assign:ident, $method_assign:ident, $tok:tt) => {
        impl<const N: usize, const WORDS: usize> $op_assign for BitSet<N, WORDS> {
            #[inline]
            fn $method_assign(&mut self, rhs: Self) {
                words::zip_assign(&mut self.words, &rhs.words, |a, b| a $tok b);
            }
        }

        impl<const N: usize, const WORDS: usize> $op for BitSet<N, WORDS> {
            type Output = Self;

            #[inline]
            fn $method(mut self, rhs: Self) -> Self {
                self.$method_assign(rhs);
                self
            }
        }
    };
}

bitset_binary_op!(BitAnd, bitand, BitAndAssign, bitand_assign, &);
bitset_binary_op!(BitOr, bitor, BitOrAssign, bitor_assign, |);
bitset_binary_op!(BitXor, bitxor, BitXorAssign, bitxor_assign, ^);

impl<const N: usize, const WORDS: usize> Not for BitSet<N, WORDS> {
    type Output = Self;

    #[inline]
    fn not(mut self) -> Self {
        self.flip_all();
        self
    }
}

impl<const N: usize, const WORDS: usize> ShlAssign<usize> for BitSet<N, WORDS> {
    #[inline]
    fn shl_assign(&mut self, count: usize) {
        words::shift_left(&mut self.words, N, count);
    }
}

impl<const N: usize, const WORDS: usize> Shl<usize> for BitSet<N, WORDS> {
    type Output = Self;

    #[inline]
    fn shl(self, count: usize) -> Self {
        self.shift_left(count)
    }
}

impl<const N: usize, const WORDS: usize> ShrAssign<usize> for BitSet<N, WORDS> {
    #[inline]
    fn shr_assign(&mut self, count: usize) {
        words::shift_right(&mut self.words, N, count);
    }
}

impl<const N: usize, const WORDS: usize> Shr<usize> for BitSet<N, WORDS> {
    type Output = Self;

    #[inline]
    fn shr(self, count: usize) -> Self {
        self.shift_right(count)
    }
}

/// Iterator over set bit indices in ascending order, produced by `BitSet::iter`.
#[derive(Clone, Copy)]
pub struct BitSetIterator<const N: usize, const WORDS: usize> {
    words: [Word; WORDS],
    word_idx: usize,
    current_word: Word,
}

impl<const N: usize, const WORDS: usize> Iterator for BitSetIterator<N, WORDS> {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        loop {
            if self.current_word != 0 {
                let bit_idx = self.current_word.trailing_zeros() as usize;
                let idx = self.word_idx * WORD_BITS + bit_idx;

                // Clear the lowest set bit.
                self.current_word &= self.current_word.wrapping_sub(1);

                debug_assert!(idx < N);
                return Some(idx);
            }

            self.word_idx += 1;
            if self.word_idx >= WORDS {
                return None;
            }
            self.current_word = self.words[self.word_idx];
        }
    }
}

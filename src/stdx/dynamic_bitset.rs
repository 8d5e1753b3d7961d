//! Bitset whose capacity is chosen at construction and never changes.
//!
//! Same bit layout and text/integer conventions as [`BitSet`]; binary operations
//! check capacities at runtime and report [`Error::CapacityMismatch`].

use core::fmt;
use core::ops::{Not, Shl, Shr};
use core::str::FromStr;

use super::bitset::BitSet;
use super::words::{self, Word};
use crate::constants::{ONE_CHAR, WORD_BITS, ZERO_CHAR};
use crate::error::Error;

/// Heap-backed bitset of `bit_length` bits.
///
/// # Examples
/// ```
/// use fixed_bitset::{Error, stdx::DynamicBitSet};
///
/// let a = DynamicBitSet::from_bits_str(4, "1").unwrap();
/// let b = DynamicBitSet::from_u64(8, 0b1010);
/// assert_eq!(a.try_and(&b), Err(Error::CapacityMismatch { left: 4, right: 8 }));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DynamicBitSet {
    bit_length: usize,
    words: Box<[Word]>,
}

impl DynamicBitSet {
    /// Creates an empty bitset of `bit_length` bits.
    pub fn empty(bit_length: usize) -> Self {
        Self {
            bit_length,
            words: vec![0; words::words_for_bits(bit_length)].into_boxed_slice(),
        }
    }

    /// Creates a bitset of `bit_length` bits, all set.
    pub fn full(bit_length: usize) -> Self {
        let mut set = Self::empty(bit_length);
        set.toggle_all();
        set
    }

    /// Bit `i` is `(value >> i) & 1`; bits of `value` at or past `bit_length` are dropped.
    pub fn from_u64(bit_length: usize, value: u64) -> Self {
        Self::from_u128(bit_length, value as u128)
    }

    pub fn from_u128(bit_length: usize, value: u128) -> Self {
        let mut set = Self::empty(bit_length);
        words::load_unsigned(&mut set.words, bit_length, value);
        set
    }

    /// Parses `'0'`/`'1'` characters, rightmost character first, padding or
    /// truncating on the left to `bit_length`.
    pub fn from_bits_str(bit_length: usize, text: &str) -> Result<Self, Error> {
        Self::from_bits_str_with(bit_length, text, ZERO_CHAR, ONE_CHAR)
    }

    pub fn from_bits_str_with(
        bit_length: usize,
        text: &str,
        zero: char,
        one: char,
    ) -> Result<Self, Error> {
        let mut set = Self::empty(bit_length);
        words::parse_into(&mut set.words, bit_length, text, zero, one)?;
        Ok(set)
    }

    #[inline]
    pub fn bit_length(&self) -> usize {
        self.bit_length
    }

    #[inline]
    pub fn word_len(&self) -> usize {
        self.words.len()
    }

    /// Raw storage; bits past `bit_length` are always clear.
    #[inline]
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    fn check_capacity(&self, other: &Self) -> Result<(), Error> {
        if self.bit_length == other.bit_length {
            Ok(())
        } else {
            log::debug!(
                "capacity mismatch: {} != {}",
                self.bit_length,
                other.bit_length
            );
            Err(Error::CapacityMismatch {
                left: self.bit_length,
                right: other.bit_length,
            })
        }
    }

    // ============================================
    // Inspection
    // ============================================

    #[inline]
    pub fn count(&self) -> usize {
        words::count_ones(&self.words)
    }

    #[inline]
    pub fn none(&self) -> bool {
        words::none_set(&self.words)
    }

    #[inline]
    pub fn any(&self) -> bool {
        !self.none()
    }

    /// Vacuously `true` when `bit_length() == 0`.
    #[inline]
    pub fn all(&self) -> bool {
        words::all_set(&self.words, self.bit_length)
    }

    #[inline]
    pub fn first_set(&self) -> Option<usize> {
        words::first_set(&self.words)
    }

    #[inline]
    pub fn first_unset(&self) -> Option<usize> {
        words::first_unset(&self.words, self.bit_length)
    }

    pub fn is_subset(&self, other: &Self) -> Result<bool, Error> {
        self.check_capacity(other)?;
        Ok(words::is_subset(&self.words, &other.words))
    }

    /// Bitwise equality that treats differing capacities as an error rather
    /// than as inequality.
    pub fn try_eq(&self, other: &Self) -> Result<bool, Error> {
        self.check_capacity(other)?;
        Ok(self.words == other.words)
    }

    /// Iterates over set bits in ascending order.
    #[inline]
    pub fn iter_set(&self) -> SetBits<'_> {
        SetBits {
            words: &self.words,
            word_idx: 0,
            current_word: self.words.first().copied().unwrap_or(0),
        }
    }

    // ============================================
    // Single-bit access
    // ============================================

    /// Panics if `idx >= bit_length()`.
    #[inline]
    pub fn is_set(&self, idx: usize) -> bool {
        assert!(idx < self.bit_length, "bit index out of bounds");
        words::get(&self.words, idx)
    }

    #[inline]
    pub fn get(&self, idx: usize) -> Result<bool, Error> {
        words::check_index(idx, self.bit_length)?;
        Ok(words::get(&self.words, idx))
    }

    /// Panics if `idx >= bit_length()`.
    #[inline]
    pub fn set(&mut self, idx: usize) {
        self.set_value(idx, true);
    }

    /// Panics if `idx >= bit_length()`.
    #[inline]
    pub fn unset(&mut self, idx: usize) {
        self.set_value(idx, false);
    }

    /// Panics if `idx >= bit_length()`.
    #[inline]
    pub fn set_value(&mut self, idx: usize, value: bool) {
        assert!(idx < self.bit_length, "bit index out of bounds");
        words::set_value(&mut self.words, idx, value);
    }

    #[inline]
    pub fn try_set_value(&mut self, idx: usize, value: bool) -> Result<(), Error> {
        words::check_index(idx, self.bit_length)?;
        words::set_value(&mut self.words, idx, value);
        Ok(())
    }

    /// Panics if `idx >= bit_length()`.
    #[inline]
    pub fn flip(&mut self, idx: usize) {
        assert!(idx < self.bit_length, "bit index out of bounds");
        words::flip(&mut self.words, idx);
    }

    #[inline]
    pub fn try_flip(&mut self, idx: usize) -> Result<(), Error> {
        words::check_index(idx, self.bit_length)?;
        words::flip(&mut self.words, idx);
        Ok(())
    }

    // ============================================
    // Whole-set mutation
    // ============================================

    pub fn clear(&mut self) {
        self.words.fill(0);
    }

    pub fn fill(&mut self) {
        self.words.fill(Word::MAX);
        words::clear_tail(&mut self.words, self.bit_length);
    }

    pub fn toggle_all(&mut self) {
        words::not_assign(&mut self.words, self.bit_length);
    }

    /// In-place AND; `self` is unchanged on [`Error::CapacityMismatch`].
    pub fn and_assign(&mut self, other: &Self) -> Result<(), Error> {
        self.check_capacity(other)?;
        words::zip_assign(&mut self.words, &other.words, |a, b| a & b);
        Ok(())
    }

    pub fn or_assign(&mut self, other: &Self) -> Result<(), Error> {
        self.check_capacity(other)?;
        words::zip_assign(&mut self.words, &other.words, |a, b| a | b);
        Ok(())
    }

    pub fn xor_assign(&mut self, other: &Self) -> Result<(), Error> {
        self.check_capacity(other)?;
        words::zip_assign(&mut self.words, &other.words, |a, b| a ^ b);
        Ok(())
    }

    pub fn try_and(&self, other: &Self) -> Result<Self, Error> {
        let mut result = self.clone();
        result.and_assign(other)?;
        Ok(result)
    }

    pub fn try_or(&self, other: &Self) -> Result<Self, Error> {
        let mut result = self.clone();
        result.or_assign(other)?;
        Ok(result)
    }

    pub fn try_xor(&self, other: &Self) -> Result<Self, Error> {
        let mut result = self.clone();
        result.xor_assign(other)?;
        Ok(result)
    }

    pub fn shift_left_assign(&mut self, count: usize) {
        words::shift_left(&mut self.words, self.bit_length, count);
    }

    pub fn shift_right_assign(&mut self, count: usize) {
        words::shift_right(&mut self.words, self.bit_length, count);
    }

    /// Shifts toward higher indices; negative counts are [`Error::InvalidArgument`].
    pub fn try_shift_left(&self, count: isize) -> Result<Self, Error> {
        Ok(self << words::shift_count(count)?)
    }

    /// Shifts toward lower indices; negative counts are [`Error::InvalidArgument`].
    pub fn try_shift_right(&self, count: isize) -> Result<Self, Error> {
        Ok(self >> words::shift_count(count)?)
    }

    // ============================================
    // Conversion
    // ============================================

    /// Exactly `bit_length()` characters, most-significant bit first.
    pub fn to_bits_string(&self) -> String {
        self.to_bits_string_with(ZERO_CHAR, ONE_CHAR)
    }

    pub fn to_bits_string_with(&self, zero: char, one: char) -> String {
        words::render(&self.words, self.bit_length, zero, one)
    }

    pub fn to_u32(&self) -> Result<u32, Error> {
        words::to_unsigned(&self.words, u32::BITS).map(|v| v as u32)
    }

    pub fn to_u64(&self) -> Result<u64, Error> {
        words::to_unsigned(&self.words, u64::BITS).map(|v| v as u64)
    }

    pub fn to_u128(&self) -> Result<u128, Error> {
        words::to_unsigned(&self.words, u128::BITS)
    }
}

/// Capacity is the number of characters in the input.
impl FromStr for DynamicBitSet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bits_str(s.chars().count(), s)
    }
}

impl fmt::Display for DynamicBitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.to_bits_string())
    }
}

impl fmt::Binary for DynamicBitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad_integral(true, "0b", &self.to_bits_string())
    }
}

impl Not for &DynamicBitSet {
    type Output = DynamicBitSet;

    fn not(self) -> DynamicBitSet {
        let mut result = self.clone();
        result.toggle_all();
        result
    }
}

impl Shl<usize> for &DynamicBitSet {
    type Output = DynamicBitSet;

    fn shl(self, count: usize) -> DynamicBitSet {
        let mut result = self.clone();
        result.shift_left_assign(count);
        result
    }
}

impl Shr<usize> for &DynamicBitSet {
    type Output = DynamicBitSet;

    fn shr(self, count: usize) -> DynamicBitSet {
        let mut result = self.clone();
        result.shift_right_assign(count);
        result
    }
}

impl<const N: usize, const WORDS: usize> From<BitSet<N, WORDS>> for DynamicBitSet {
    fn from(set: BitSet<N, WORDS>) -> Self {
        Self {
            bit_length: N,
            words: set.words().to_vec().into_boxed_slice(),
        }
    }
}

impl<const N: usize, const WORDS: usize> TryFrom<&DynamicBitSet> for BitSet<N, WORDS> {
    type Error = Error;

    fn try_from(set: &DynamicBitSet) -> Result<Self, Self::Error> {
        if set.bit_length != N {
            log::debug!("capacity mismatch: {} != {}", set.bit_length, N);
            return Err(Error::CapacityMismatch {
                left: set.bit_length,
                right: N,
            });
        }

        let mut words = [0; WORDS];
        words.copy_from_slice(&set.words);
        Ok(BitSet::from_words(words))
    }
}

/// Iterator over set bit indices in ascending order, produced by
/// [`DynamicBitSet::iter_set`].
#[derive(Clone)]
pub struct SetBits<'a> {
    words: &'a [Word],
    word_idx: usize,
    current_word: Word,
}

impl Iterator for SetBits<'_> {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        while self.current_word == 0 {
            self.word_idx += 1;
            self.current_word = *self.words.get(self.word_idx)?;
        }

        let idx = self.word_idx * WORD_BITS + self.current_word.trailing_zeros() as usize;
        self.current_word &= self.current_word.wrapping_sub(1);
        Some(idx)
    }
}

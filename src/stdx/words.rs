//! Word-slice kernels shared by [`BitSet`](super::BitSet) and
//! [`DynamicBitSet`](super::DynamicBitSet).
//!
//! Bit `i` lives in word `i / WORD_BITS` at offset `i % WORD_BITS`. Bits past
//! `bit_len` in the last word are always clear on entry, and every kernel that
//! writes leaves them clear on exit.

use crate::constants::{UNSIGNED_WIDTH_MAX, WORD_BITS};
use crate::error::Error;

/// Storage word.
pub type Word = u64;

/// Computes the number of words needed to store `n` bits.
#[inline]
pub const fn words_for_bits(n: usize) -> usize {
    n.div_ceil(WORD_BITS)
}

/// Mask of the valid bits in the last word of a `bit_len`-bit set.
#[inline]
pub const fn tail_mask(bit_len: usize) -> Word {
    let remaining_bits = bit_len % WORD_BITS;
    if remaining_bits == 0 {
        Word::MAX
    } else {
        (1 << remaining_bits) - 1
    }
}

#[inline]
pub fn clear_tail(words: &mut [Word], bit_len: usize) {
    debug_assert_eq!(words.len(), words_for_bits(bit_len));
    if let Some(last) = words.last_mut() {
        *last &= tail_mask(bit_len);
    }
}

#[inline]
pub fn check_index(index: usize, bit_len: usize) -> Result<(), Error> {
    if index < bit_len {
        Ok(())
    } else {
        Err(Error::OutOfRange {
            index,
            capacity: bit_len,
        })
    }
}

/// Converts a signed shift count, rejecting negative values.
#[inline]
pub fn shift_count(shift: isize) -> Result<usize, Error> {
    usize::try_from(shift).map_err(|_| {
        log::debug!("rejecting negative shift count {shift}");
        Error::InvalidArgument { shift }
    })
}

// =============================================================================
// Single-bit access
// =============================================================================

#[inline]
pub fn get(words: &[Word], index: usize) -> bool {
    (words[index / WORD_BITS] >> (index % WORD_BITS)) & 1 != 0
}

#[inline]
pub fn set_value(words: &mut [Word], index: usize, value: bool) {
    let word_idx = index / WORD_BITS;
    let bit_idx = index % WORD_BITS;
    let bit_mask: Word = 1 << bit_idx;

    // Branchless: clear the bit, then OR in the new value.
    let val_mask = (value as Word) << bit_idx;
    words[word_idx] = (words[word_idx] & !bit_mask) | val_mask;
}

#[inline]
pub fn flip(words: &mut [Word], index: usize) {
    words[index / WORD_BITS] ^= 1 << (index % WORD_BITS);
}

// =============================================================================
// Whole-set queries
// =============================================================================

#[inline]
pub fn count_ones(words: &[Word]) -> usize {
    words.iter().map(|w| w.count_ones() as usize).sum()
}

#[inline]
pub fn none_set(words: &[Word]) -> bool {
    words.iter().all(|&w| w == 0)
}

/// Returns `true` when every bit in `[0, bit_len)` is set; vacuously `true`
/// for an empty set.
pub fn all_set(words: &[Word], bit_len: usize) -> bool {
    match words.split_last() {
        None => true,
        Some((last, complete)) => {
            complete.iter().all(|&w| w == Word::MAX) && *last == tail_mask(bit_len)
        }
    }
}

pub fn first_set(words: &[Word]) -> Option<usize> {
    words
        .iter()
        .position(|&w| w != 0)
        .map(|word_idx| word_idx * WORD_BITS + words[word_idx].trailing_zeros() as usize)
}

pub fn first_unset(words: &[Word], bit_len: usize) -> Option<usize> {
    let word_idx = words.iter().position(|&w| w != Word::MAX)?;
    let idx = word_idx * WORD_BITS + (!words[word_idx]).trailing_zeros() as usize;
    // A clear tail bit is past capacity.
    (idx < bit_len).then_some(idx)
}

pub fn highest_set(words: &[Word]) -> Option<usize> {
    let word_idx = words.iter().rposition(|&w| w != 0)?;
    let bit_idx = WORD_BITS - 1 - words[word_idx].leading_zeros() as usize;
    Some(word_idx * WORD_BITS + bit_idx)
}

pub fn is_subset(words: &[Word], other: &[Word]) -> bool {
    debug_assert_eq!(words.len(), other.len());
    words.iter().zip(other).all(|(&a, &b)| a & !b == 0)
}

// =============================================================================
// Bitwise algebra
// =============================================================================

#[inline]
pub fn zip_assign(words: &mut [Word], other: &[Word], op: impl Fn(Word, Word) -> Word) {
    debug_assert_eq!(words.len(), other.len());
    for (dst, &src) in words.iter_mut().zip(other) {
        *dst = op(*dst, src);
    }
}

#[inline]
pub fn not_assign(words: &mut [Word], bit_len: usize) {
    for word in words.iter_mut() {
        *word = !*word;
    }
    clear_tail(words, bit_len);
}

/// Moves bit `i` to `i + count`; bits shifted past `bit_len` are discarded.
pub fn shift_left(words: &mut [Word], bit_len: usize, count: usize) {
    if count == 0 {
        return;
    }
    if count >= bit_len {
        words.fill(0);
        return;
    }

    let word_shift = count / WORD_BITS;
    let bit_shift = count % WORD_BITS;

    // Descending, so every source word is read before it is overwritten.
    for dst in (0..words.len()).rev() {
        words[dst] = if dst < word_shift {
            0
        } else {
            let src = dst - word_shift;
            let carry = if bit_shift != 0 && src > 0 {
                words[src - 1] >> (WORD_BITS - bit_shift)
            } else {
                0
            };
            (words[src] << bit_shift) | carry
        };
    }

    clear_tail(words, bit_len);
}

/// Moves bit `i` to `i - count`; vacated high bits become zero.
pub fn shift_right(words: &mut [Word], bit_len: usize, count: usize) {
    if count == 0 {
        return;
    }
    if count >= bit_len {
        words.fill(0);
        return;
    }

    let word_shift = count / WORD_BITS;
    let bit_shift = count % WORD_BITS;
    let len = words.len();

    // Ascending, so every source word is read before it is overwritten.
    for dst in 0..len {
        let src = dst + word_shift;
        words[dst] = if src >= len {
            0
        } else {
            let carry = if bit_shift != 0 && src + 1 < len {
                words[src + 1] << (WORD_BITS - bit_shift)
            } else {
                0
            };
            (words[src] >> bit_shift) | carry
        };
    }

    debug_assert_eq!(words.last().map_or(0, |&w| w & !tail_mask(bit_len)), 0);
}

// =============================================================================
// Text and integer conversion
// =============================================================================

/// Parses `text` into zeroed `words`. The rightmost character is bit 0; only
/// the rightmost `bit_len` characters are stored, but the whole input must be
/// drawn from `{zero, one}`. On error `words` is left untouched.
pub fn parse_into(
    words: &mut [Word],
    bit_len: usize,
    text: &str,
    zero: char,
    one: char,
) -> Result<(), Error> {
    assert!(zero != one, "bit alphabet needs two distinct characters");
    debug_assert!(none_set(words));

    if let Some((position, found)) = text
        .chars()
        .enumerate()
        .find(|&(_, c)| c != zero && c != one)
    {
        log::debug!("rejecting bit string: {found:?} at position {position}");
        return Err(Error::InvalidFormat { position, found });
    }

    for (index, c) in text.chars().rev().take(bit_len).enumerate() {
        if c == one {
            set_value(words, index, true);
        }
    }
    Ok(())
}

/// Renders exactly `bit_len` characters, most-significant bit first.
pub fn render(words: &[Word], bit_len: usize, zero: char, one: char) -> String {
    (0..bit_len)
        .rev()
        .map(|i| if get(words, i) { one } else { zero })
        .collect()
}

/// Loads the low bits of `value` into zeroed `words`; bits of `value` at or
/// past `bit_len` are dropped.
pub fn load_unsigned(words: &mut [Word], bit_len: usize, value: u128) {
    debug_assert!(none_set(words));
    for (i, word) in words.iter_mut().take(2).enumerate() {
        *word = (value >> (i * WORD_BITS)) as Word;
    }
    clear_tail(words, bit_len);
}

/// Reads the set as an unsigned integer of `width` bits.
pub fn to_unsigned(words: &[Word], width: u32) -> Result<u128, Error> {
    assert!(width <= UNSIGNED_WIDTH_MAX);

    if let Some(bit) = highest_set(words)
        && bit >= width as usize
    {
        log::debug!("bit {bit} does not fit a {width}-bit integer");
        return Err(Error::Overflow { bit, width });
    }

    let value = words
        .iter()
        .take(2)
        .enumerate()
        .fold(0u128, |acc, (i, &w)| acc | (w as u128) << (i * WORD_BITS));
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const PROPTEST_CASES: u32 = 256;

    fn pack(bits: &[bool]) -> Vec<Word> {
        let mut words = vec![0; words_for_bits(bits.len())];
        for (i, &bit) in bits.iter().enumerate() {
            set_value(&mut words, i, bit);
        }
        words
    }

    fn unpack(words: &[Word], bit_len: usize) -> Vec<bool> {
        (0..bit_len).map(|i| get(words, i)).collect()
    }

    fn shifted_left(bits: &[bool], count: usize) -> Vec<bool> {
        (0..bits.len())
            .map(|i| i >= count && bits[i - count])
            .collect()
    }

    fn shifted_right(bits: &[bool], count: usize) -> Vec<bool> {
        (0..bits.len())
            .map(|i| i + count < bits.len() && bits[i + count])
            .collect()
    }

    fn tail_is_clear(words: &[Word], bit_len: usize) -> bool {
        words.last().map_or(true, |&w| w & !tail_mask(bit_len) == 0)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(
            crate::test_utils::proptest_cases(PROPTEST_CASES)
        ))]

        #[test]
        fn shift_left_matches_model(
            bits in prop::collection::vec(any::<bool>(), 0..200),
            count in 0usize..260,
        ) {
            let mut words = pack(&bits);
            shift_left(&mut words, bits.len(), count);

            prop_assert_eq!(unpack(&words, bits.len()), shifted_left(&bits, count));
            prop_assert!(tail_is_clear(&words, bits.len()));
        }

        #[test]
        fn shift_right_matches_model(
            bits in prop::collection::vec(any::<bool>(), 0..200),
            count in 0usize..260,
        ) {
            let mut words = pack(&bits);
            shift_right(&mut words, bits.len(), count);

            prop_assert_eq!(unpack(&words, bits.len()), shifted_right(&bits, count));
        }

        #[test]
        fn queries_match_model(bits in prop::collection::vec(any::<bool>(), 0..200)) {
            let words = pack(&bits);

            prop_assert_eq!(count_ones(&words), bits.iter().filter(|&&b| b).count());
            prop_assert_eq!(none_set(&words), !bits.contains(&true));
            prop_assert_eq!(all_set(&words, bits.len()), !bits.contains(&false));
            prop_assert_eq!(first_set(&words), bits.iter().position(|&b| b));
            prop_assert_eq!(first_unset(&words, bits.len()), bits.iter().position(|&b| !b));
            prop_assert_eq!(highest_set(&words), bits.iter().rposition(|&b| b));
        }

        #[test]
        fn not_keeps_tail_clear(bits in prop::collection::vec(any::<bool>(), 0..200)) {
            let mut words = pack(&bits);
            not_assign(&mut words, bits.len());

            let expected: Vec<bool> = bits.iter().map(|&b| !b).collect();
            prop_assert_eq!(unpack(&words, bits.len()), expected);
            prop_assert!(tail_is_clear(&words, bits.len()));
        }

        #[test]
        fn render_then_parse_is_identity(bits in prop::collection::vec(any::<bool>(), 0..200)) {
            let words = pack(&bits);
            let text = render(&words, bits.len(), '0', '1');
            prop_assert_eq!(text.chars().count(), bits.len());

            let mut parsed = vec![0; words.len()];
            parse_into(&mut parsed, bits.len(), &text, '0', '1').unwrap();
            prop_assert_eq!(parsed, words);
        }
    }

    #[test]
    fn tail_mask_boundaries() {
        assert_eq!(tail_mask(0), Word::MAX);
        assert_eq!(tail_mask(1), 1);
        assert_eq!(tail_mask(63), Word::MAX >> 1);
        assert_eq!(tail_mask(64), Word::MAX);
        assert_eq!(tail_mask(65), 1);
    }

    #[test]
    fn words_for_bits_rounds_up() {
        assert_eq!(words_for_bits(0), 0);
        assert_eq!(words_for_bits(1), 1);
        assert_eq!(words_for_bits(64), 1);
        assert_eq!(words_for_bits(65), 2);
    }

    #[test]
    fn shift_across_word_boundary() {
        let mut words = pack(&[true; 70]);
        shift_left(&mut words, 70, 65);
        assert_eq!(highest_set(&words), Some(69));
        assert_eq!(first_set(&words), Some(65));
        assert_eq!(count_ones(&words), 5);

        shift_right(&mut words, 70, 65);
        assert_eq!(first_set(&words), Some(0));
        assert_eq!(count_ones(&words), 5);
    }

    #[test]
    fn parse_rejects_anywhere_in_input() {
        // The ignored prefix is validated too.
        let mut words = [0; 1];
        assert_eq!(
            parse_into(&mut words, 4, "x0101", '0', '1'),
            Err(Error::InvalidFormat {
                position: 0,
                found: 'x'
            })
        );
        assert_eq!(words, [0]);
    }

    #[test]
    fn parse_counts_positions_in_chars() {
        let mut words = [0; 1];
        assert_eq!(
            parse_into(&mut words, 8, "1é0", '0', '1'),
            Err(Error::InvalidFormat {
                position: 1,
                found: 'é'
            })
        );
    }

    #[test]
    fn unsigned_overflow_reports_highest_bit() {
        let mut words = [0; 2];
        set_value(&mut words, 3, true);
        set_value(&mut words, 70, true);

        assert_eq!(
            to_unsigned(&words, 64),
            Err(Error::Overflow { bit: 70, width: 64 })
        );
        assert_eq!(to_unsigned(&words, 128), Ok((1u128 << 70) | 8));
    }

    #[test]
    fn load_unsigned_truncates_to_capacity() {
        let mut words = [0; 1];
        load_unsigned(&mut words, 4, 0xff);
        assert_eq!(words, [0x0f]);

        let mut words = [0; 0];
        load_unsigned(&mut words, 0, u128::MAX);
        assert_eq!(to_unsigned(&words, 64), Ok(0));
    }

    #[test]
    fn negative_shift_is_rejected() {
        assert_eq!(shift_count(3), Ok(3));
        assert_eq!(
            shift_count(-1),
            Err(Error::InvalidArgument { shift: -1 })
        );
    }
}

pub mod bitset;
pub mod dynamic_bitset;
pub mod words;

pub use bitset::{BitSet, BitSetIterator};
pub use dynamic_bitset::{DynamicBitSet, SetBits};
pub use words::{Word, words_for_bits};

//! Fixed-capacity packed bit sets.
//!
//! [`stdx::BitSet`] carries its capacity in the type; [`stdx::DynamicBitSet`]
//! takes it at construction. Both pack bits into `u64` words, index bit 0 as
//! the least-significant bit, and render text most-significant bit first.

pub mod constants;
pub mod error;
pub mod stdx;
#[cfg(test)]
pub(crate) mod test_utils;

pub use error::Error;

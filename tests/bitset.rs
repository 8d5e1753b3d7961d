use fixed_bitset::Error;
use fixed_bitset::stdx::{BitSet, DynamicBitSet, words_for_bits};
use proptest::prelude::*;

type BitSet8 = BitSet<8, { words_for_bits(8) }>;
type BitSet200 = BitSet<200, { words_for_bits(200) }>;

fn bitset200() -> impl Strategy<Value = BitSet200> {
    any::<[u64; 4]>().prop_map(BitSet200::from_words)
}

#[test]
fn parse_short_string_pads_high_bits() {
    let set: BitSet8 = "1100".parse().unwrap();
    assert_eq!(set.to_bits_string(), "00001100");
}

#[test]
fn from_integer_renders_msb_first() {
    assert_eq!(BitSet8::from_u64(42).to_bits_string(), "00101010");
}

#[test]
fn string_and_integer_orderings_agree() {
    // Leftmost character is the highest bit; integer bit 0 is the lowest.
    let from_text: BitSet8 = "00000001".parse().unwrap();
    assert_eq!(from_text.to_u64(), Ok(1));
    assert!(from_text.is_set(0));
    assert!(!from_text.is_set(7));
}

#[test]
fn set_bit_on_parsed_value() {
    let mut set = BitSet8::from_bits_str("00001100").unwrap();
    set.set_value(1, true);
    assert_eq!(set.to_bits_string(), "00001110");
}

#[test]
fn and_of_parsed_values() {
    let a = BitSet8::from_bits_str("00001100").unwrap();
    let b = BitSet8::from_bits_str("00001010").unwrap();
    assert_eq!((a & b).to_bits_string(), "00001000");
}

#[test]
fn mismatched_capacities_are_rejected() {
    let narrow = DynamicBitSet::from_bits_str(4, "1").unwrap();
    let wide = DynamicBitSet::from_u64(8, 0xff);

    assert_eq!(
        narrow.try_and(&wide),
        Err(Error::CapacityMismatch { left: 4, right: 8 })
    );
}

#[test]
fn invalid_character_is_rejected() {
    assert_eq!(
        "102".parse::<BitSet8>(),
        Err(Error::InvalidFormat {
            position: 2,
            found: '2'
        })
    );
    assert!(DynamicBitSet::from_bits_str(8, "102").is_err());
}

#[test]
fn errors_box_into_std_error() {
    fn parse(text: &str) -> Result<u64, Box<dyn std::error::Error>> {
        Ok(text.parse::<BitSet8>()?.to_u64()?)
    }

    assert_eq!(parse("101").unwrap(), 5);
    assert_eq!(
        parse("12").unwrap_err().to_string(),
        "invalid bit character '2' at position 1"
    );
}

proptest! {
    #[test]
    fn integer_roundtrip(value in any::<u64>()) {
        prop_assert_eq!(BitSet200::from_u64(value).to_u64(), Ok(value));
        prop_assert_eq!(DynamicBitSet::from_u64(64, value).to_u64(), Ok(value));
    }

    #[test]
    fn narrow_integer_roundtrip(value in any::<u8>()) {
        prop_assert_eq!(BitSet8::from_u64(value as u64).to_u32(), Ok(value as u32));
    }

    #[test]
    fn string_roundtrip(set in bitset200()) {
        let parsed: BitSet200 = set.to_bits_string().parse().unwrap();
        prop_assert_eq!(parsed, set);
    }

    #[test]
    fn to_u64_fails_only_with_high_bits(set in bitset200()) {
        let high_bits = set.iter().any(|i| i >= 64);
        prop_assert_eq!(set.to_u64().is_err(), high_bits);
        if let Ok(value) = set.to_u64() {
            prop_assert_eq!(BitSet200::from_u64(value), set);
        }
    }

    #[test]
    fn static_and_dynamic_agree(a in bitset200(), b in bitset200()) {
        let da = DynamicBitSet::from(a);
        let db = DynamicBitSet::from(b);

        prop_assert_eq!(DynamicBitSet::from(a & b), da.try_and(&db).unwrap());
        prop_assert_eq!(DynamicBitSet::from(a | b), da.try_or(&db).unwrap());
        prop_assert_eq!(DynamicBitSet::from(a ^ b), da.try_xor(&db).unwrap());
        prop_assert_eq!(DynamicBitSet::from(!a), !&da);
        prop_assert_eq!(a.count(), da.count());
        prop_assert_eq!(BitSet200::try_from(&da).unwrap(), a);
    }
}

//! Property-based tests for the bridge
//!
//! These tests use randomized inputs to check the round-trip, length, validity
//! and truncation guarantees across a wide range of data patterns.

use proptest::prelude::*;
use snappy_bridge::{
    compress, compress_bytes, decompress, is_valid, uncompressed_length, GrowableSink, Outcome,
    Reason, Sink,
};

proptest! {
    #[test]
    fn test_round_trip(data in prop::collection::vec(any::<u8>(), 0..5000)) {
        let compressed = compress_bytes(&data)?;
        prop_assert_eq!(decompress(&compressed), Outcome::Binary(data));
    }
}

proptest! {
    #[test]
    fn test_length_and_validity_agree(data in prop::collection::vec(any::<u8>(), 0..5000)) {
        let compressed = compress_bytes(&data)?;
        prop_assert_eq!(uncompressed_length(&compressed), Outcome::Length(data.len()));
        prop_assert_eq!(is_valid(&compressed), Outcome::Valid(true));
    }
}

proptest! {
    #[test]
    fn test_repetitive_patterns(
        pattern in prop::collection::vec(any::<u8>(), 1..20),
        repeat_count in 2..500usize
    ) {
        let data = pattern.repeat(repeat_count);
        let compressed = compress_bytes(&data)?;
        prop_assert_eq!(decompress(&compressed), Outcome::Binary(data.clone()));

        // Repetition should pay for the preamble and tags
        if data.len() > 200 {
            prop_assert!(compressed.len() < data.len(),
                "repetitive data did not shrink: {} -> {}", data.len(), compressed.len());
        }
    }
}

proptest! {
    #[test]
    fn test_no_slack_in_result(data in prop::collection::vec(any::<u8>(), 0..3000)) {
        match compress(&data) {
            Outcome::Binary(bytes) => prop_assert_eq!(bytes.capacity(), bytes.len()),
            other => prop_assert!(false, "unexpected outcome {:?}", other),
        }
    }
}

proptest! {
    #[test]
    fn test_truncation_never_succeeds(
        data in prop::collection::vec(any::<u8>(), 1..2000),
        cut in any::<prop::sample::Index>()
    ) {
        let compressed = compress_bytes(&data)?;
        let prefix = &compressed[..cut.index(compressed.len())];

        match decompress(prefix) {
            Outcome::Error(Reason::CorruptedData) | Outcome::Error(Reason::DataNotCompressed) => {}
            other => prop_assert!(false, "prefix decompressed to {:?}", other),
        }
        prop_assert_eq!(is_valid(prefix), Outcome::Valid(false));
    }
}

proptest! {
    #[test]
    fn test_arbitrary_input_is_consistent(data in prop::collection::vec(any::<u8>(), 0..200)) {
        // Arbitrary bytes never panic, and whatever decompresses is also valid
        // and matches its declared length.
        match decompress(&data) {
            Outcome::Binary(bytes) => {
                prop_assert_eq!(is_valid(&data), Outcome::Valid(true));
                prop_assert_eq!(uncompressed_length(&data), Outcome::Length(bytes.len()));
            }
            Outcome::Error(Reason::CorruptedData) => {
                prop_assert_eq!(is_valid(&data), Outcome::Valid(false));
            }
            Outcome::Error(Reason::DataNotCompressed) => {
                prop_assert_eq!(is_valid(&data), Outcome::Valid(false));
                prop_assert_eq!(uncompressed_length(&data), Outcome::Error(Reason::DataNotCompressed));
            }
            Outcome::Error(Reason::InsufficientMemory) => {}
            other => prop_assert!(false, "unexpected outcome {:?}", other),
        }
    }
}

proptest! {
    #[test]
    fn test_sink_preserves_mixed_writes(
        pieces in prop::collection::vec((prop::collection::vec(any::<u8>(), 0..3000), any::<bool>()), 0..20)
    ) {
        let mut sink = GrowableSink::new();
        let mut expected = Vec::new();

        for (piece, in_place) in &pieces {
            if *in_place {
                let slot = sink.append_slot(piece.len())?;
                slot[..piece.len()].copy_from_slice(piece);
                sink.commit(piece.len())?;
            } else {
                sink.append(piece)?;
            }
            expected.extend_from_slice(piece);
            prop_assert!(sink.capacity() >= sink.len());
        }

        let output = Vec::from(sink.finalize());
        prop_assert_eq!(output.capacity(), output.len());
        prop_assert_eq!(output, expected);
    }
}

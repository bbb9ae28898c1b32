//! Serialization round trips for synthesized and minimized automata

#[cfg(feature = "serialization")]
mod serialization_tests {
    use checksum_automata::prelude::*;
    use std::fs::File;
    use std::io::{BufReader, BufWriter};
    use tempfile::TempDir;

    fn automata() -> Vec<(&'static str, Automaton)> {
        let mastercard = schemes::mastercard_legacy().synthesize();
        let minimal = mastercard.minimize();
        let empty = ChecksumScheme::builder()
            .length(2)
            .modulus(2)
            .target_residue(1)
            .prefix([DigitSet::range(0..=0), DigitSet::range(0..=0)])
            .build()
            .unwrap()
            .synthesize();
        vec![
            ("mastercard", mastercard),
            ("mastercard-minimal", minimal),
            ("empty-with-dead-states", empty),
        ]
    }

    fn roundtrip<S: AutomatonSerializer>(automaton: &Automaton) -> Automaton {
        let mut buffer = Vec::new();
        S::serialize(automaton, &mut buffer).expect("Failed to serialize");
        S::deserialize(&buffer[..]).expect("Failed to deserialize")
    }

    // ============================================================================
    // In-memory Round-Trip Tests
    // ============================================================================

    #[test]
    fn test_bincode_roundtrip() {
        for (name, fsm) in automata() {
            assert_eq!(roundtrip::<BincodeSerializer>(&fsm), fsm, "{}", name);
        }
    }

    #[test]
    fn test_json_roundtrip() {
        for (name, fsm) in automata() {
            assert_eq!(roundtrip::<JsonSerializer>(&fsm), fsm, "{}", name);
        }
    }

    #[test]
    fn test_plaintext_roundtrip() {
        for (name, fsm) in automata() {
            assert_eq!(roundtrip::<PlainTextSerializer>(&fsm), fsm, "{}", name);
        }
    }

    #[test]
    fn test_dead_states_survive_roundtrip() {
        let (_, fsm) = automata().pop().unwrap();
        assert!(!fsm.dead_states().is_empty());

        for loaded in [
            roundtrip::<BincodeSerializer>(&fsm),
            roundtrip::<JsonSerializer>(&fsm),
            roundtrip::<PlainTextSerializer>(&fsm),
        ] {
            assert_eq!(loaded.dead_states(), fsm.dead_states());
        }
    }

    // ============================================================================
    // File Tests
    // ============================================================================

    #[test]
    fn test_file_roundtrip_preserves_acceptance() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mastercard.bin");
        let fsm = schemes::mastercard_legacy().synthesize();

        let writer = BufWriter::new(File::create(&path).unwrap());
        BincodeSerializer::serialize(&fsm, writer).unwrap();

        let reader = BufReader::new(File::open(&path).unwrap());
        let loaded = BincodeSerializer::deserialize(reader).unwrap();

        assert!(loaded.accepts("5222084305213022"));
        assert!(!loaded.accepts("5216055885117469"));
        assert!(!loaded.accepts("5016055885117460"));
    }

    // ============================================================================
    // Malformed Input Tests
    // ============================================================================

    #[test]
    fn test_json_rejects_duplicate_edges() {
        let json = r#"{
            "initial": "Initial",
            "finals": ["Accept"],
            "transitions": [
                ["Initial", 1, "Accept"],
                ["Initial", 1, "Initial"]
            ]
        }"#;
        assert!(JsonSerializer::deserialize(json.as_bytes()).is_err());
    }

    #[test]
    fn test_truncated_bincode_fails() {
        let fsm = schemes::isbn13().synthesize();
        let mut buffer = Vec::new();
        BincodeSerializer::serialize(&fsm, &mut buffer).unwrap();
        buffer.truncate(buffer.len() / 2);

        assert!(matches!(
            BincodeSerializer::deserialize(&buffer[..]),
            Err(SerializationError::Bincode(_))
        ));
    }

    // ============================================================================
    // Scheme Configuration Tests
    // ============================================================================

    #[test]
    fn test_scheme_config_roundtrip() {
        let scheme = schemes::mastercard_legacy();
        let config = SchemeConfig::from(&scheme);
        let json = serde_json::to_string(&config).unwrap();

        let parsed = SchemeConfig::from_json(&json).unwrap();
        assert_eq!(parsed, config);
        assert_eq!(ChecksumScheme::try_from(parsed), Ok(scheme));
    }

    #[test]
    fn test_scheme_config_defaults() {
        let config = SchemeConfig::from_json(r#"{ "length": 16 }"#).unwrap();
        assert_eq!(config.modulus, 10);
        assert_eq!(config.target_residue, 0);
        assert_eq!(config.weight, WeightRule::Luhn);
        assert!(config.prefix.is_empty());
    }

    #[test]
    fn test_scheme_config_weight_rules() {
        let config = SchemeConfig::from_json(
            r#"{ "length": 13, "weight": { "alternating": { "even": 1, "odd": 3 } } }"#,
        )
        .unwrap();
        let scheme = ChecksumScheme::try_from(config).unwrap();
        assert_eq!(scheme, schemes::ean13());

        let table = SchemeConfig::from_json(r#"{ "length": 2, "weight": { "table": [[1, 2]] } }"#)
            .unwrap();
        assert_eq!(
            ChecksumScheme::try_from(table),
            Err(SchemeError::UndefinedWeight { row: 0, len: 2 })
        );
    }

    #[test]
    fn test_scheme_config_rejects_bad_digits() {
        assert!(SchemeConfig::from_json(r#"{ "length": 4, "prefix": { "0": [12] } }"#).is_err());
    }
}

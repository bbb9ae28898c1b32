//! Property-based tests for synthesis and minimization using proptest
//!
//! The reference checker `ChecksumScheme::validate_number` computes the
//! checksum directly; every synthesized automaton must agree with it.

use checksum_automata::prelude::*;
use proptest::prelude::*;

// Strategy for generating a random digit set, never empty
fn digit_set_strategy() -> impl Strategy<Value = DigitSet> {
    (1u16..1024).prop_map(|mask| {
        (0..10u8)
            .filter(|d| mask & (1 << d) != 0)
            .filter_map(Digit::new)
            .collect()
    })
}

fn weight_strategy() -> impl Strategy<Value = WeightRule> {
    prop_oneof![
        Just(WeightRule::Luhn),
        Just(WeightRule::LuhnOddPositions),
        Just(WeightRule::Uniform),
        (0u32..20, 0u32..20).prop_map(|(even, odd)| WeightRule::Alternating { even, odd }),
        prop::collection::vec(prop::collection::vec(0u32..50, 10), 1..4)
            .prop_map(WeightRule::Table),
    ]
}

// Strategy for generating small, valid schemes
fn scheme_strategy() -> impl Strategy<Value = ChecksumScheme> {
    (1usize..=6, 1u32..=12, weight_strategy())
        .prop_flat_map(|(length, modulus, weight)| {
            (
                Just(length),
                Just(modulus),
                0..modulus,
                prop::collection::btree_map(0..length, digit_set_strategy(), 0..=2),
                Just(weight),
            )
        })
        .prop_map(|(length, modulus, target, constraints, weight)| {
            ChecksumScheme::new(length, modulus, target, constraints, weight)
                .expect("strategy only produces valid schemes")
        })
}

// Digit strings of any length up to 8
fn digits_strategy() -> impl Strategy<Value = String> {
    "[0-9]{0,8}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: the automaton accepts a string iff the checksum holds
    #[test]
    fn prop_accepts_iff_checksum_holds(
        scheme in scheme_strategy(),
        inputs in prop::collection::vec(digits_strategy(), 1..20),
    ) {
        let fsm = scheme.synthesize();
        for input in &inputs {
            prop_assert_eq!(
                fsm.accepts(input),
                scheme.validate_number(input),
                "disagreement on {:?}",
                input
            );
        }
    }

    /// Property: strings of the right length built from allowed digits are
    /// accepted exactly when the weighted sum hits the target
    #[test]
    fn prop_full_length_strings(
        scheme in scheme_strategy(),
        seed in prop::collection::vec(0u8..10, 6),
    ) {
        let fsm = scheme.synthesize();
        let input: String = seed
            .iter()
            .take(scheme.length())
            .enumerate()
            .map(|(pos, d)| {
                // Snap each digit into the allowed set
                let allowed: Vec<Digit> = scheme.allowed(pos).iter().collect();
                allowed[*d as usize % allowed.len()].as_char()
            })
            .collect();

        let sum: u64 = input
            .chars()
            .enumerate()
            .map(|(pos, c)| {
                let digit = Digit::from_char(c).unwrap();
                scheme.weight().weight(pos, digit) as u64
            })
            .sum();
        let expected = sum % scheme.modulus() as u64 == scheme.target_residue() as u64;
        prop_assert_eq!(fsm.accepts(&input), expected);
    }

    /// Property: strings of the wrong length are always rejected
    #[test]
    fn prop_wrong_length_rejected(
        scheme in scheme_strategy(),
        input in digits_strategy(),
    ) {
        prop_assume!(input.len() != scheme.length());
        prop_assert!(!scheme.synthesize().accepts(&input));
    }

    /// Property: synthesized automata are layered DAGs
    #[test]
    fn prop_synthesized_is_layered(scheme in scheme_strategy()) {
        let fsm = scheme.synthesize();
        prop_assert!(fsm.is_acyclic());
        prop_assert!(fsm.state_count() <= 2 + (scheme.length() - 1) * scheme.modulus() as usize);
        for (from, _, to) in fsm.edges() {
            match (from, to) {
                (State::Initial, State::Working { position, .. }) => {
                    prop_assert_eq!(position, 1);
                }
                (State::Working { position: p, .. }, State::Working { position: q, .. }) => {
                    prop_assert_eq!(q, p + 1);
                }
                (State::Working { position, .. }, State::Accept) => {
                    prop_assert_eq!(position, scheme.length() - 1);
                }
                (State::Initial, State::Accept) => {
                    prop_assert_eq!(scheme.length(), 1);
                }
                _ => {
                    prop_assert!(false, "unexpected edge {} -> {}", from, to);
                }
            }
        }
    }

    /// Property: minimization preserves the language
    #[test]
    fn prop_minimize_preserves_language(
        scheme in scheme_strategy(),
        inputs in prop::collection::vec(digits_strategy(), 1..20),
    ) {
        let fsm = scheme.synthesize();
        let minimal = fsm.minimize();
        prop_assert!(minimal.state_count() <= fsm.state_count());
        if !minimal.finals().is_empty() {
            prop_assert!(minimal.dead_states().is_empty());
        }
        for input in &inputs {
            prop_assert_eq!(minimal.accepts(input), fsm.accepts(input));
        }
    }

    /// Property: minimizing twice changes nothing
    #[test]
    fn prop_minimize_idempotent(scheme in scheme_strategy()) {
        let once = scheme.synthesize().minimize();
        let twice = once.minimize();
        prop_assert_eq!(once, twice);
    }
}

//! Per-position digit weighting rules.
//!
//! A weight function maps `(position, digit)` to the digit's contribution
//! to the running checksum. Positions count from the leftmost digit (0).

use crate::automaton::Digit;
use crate::synthesis::error::SchemeError;

/// Contribution of a digit at a given position to the checksum.
///
/// Implemented by [`WeightRule`] and by any `Fn(usize, Digit) -> u32`, so
/// ad-hoc schemes can be synthesized from a closure:
///
/// ```rust
/// use checksum_automata::prelude::*;
///
/// // Weights 7, 3, 1 repeating, as used by many national ID schemes
/// let weights = |position: usize, digit: Digit| [7, 3, 1][position % 3] * digit.value() as u32;
/// let scheme = ChecksumScheme::builder()
///     .length(6)
///     .weight(weights)
///     .build()
///     .unwrap();
/// let fsm = scheme.synthesize();
/// assert!(fsm.accepts("100003")); // 1*7 + 3*1 = 10
/// assert!(!fsm.accepts("100007"));
/// ```
pub trait WeightFunction {
    /// The weighted contribution of `digit` at `position`.
    fn weight(&self, position: usize, digit: Digit) -> u32;

    /// Check that the rule is defined for every digit.
    ///
    /// Called once when a scheme is built. The default accepts everything.
    fn validate(&self) -> Result<(), SchemeError> {
        Ok(())
    }
}

impl<F> WeightFunction for F
where
    F: Fn(usize, Digit) -> u32,
{
    fn weight(&self, position: usize, digit: Digit) -> u32 {
        self(position, digit)
    }
}

/// Built-in weighting rules.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum WeightRule {
    /// Luhn doubling at even positions: double the digit and subtract 9 if
    /// the result exceeds 9; odd positions count the digit unchanged.
    ///
    /// This is right-aligned Luhn for identifiers of even length.
    #[default]
    Luhn,

    /// Luhn doubling at odd positions; right-aligned Luhn for identifiers
    /// of odd length.
    LuhnOddPositions,

    /// Every digit counts once.
    Uniform,

    /// Fixed multipliers for even and odd positions (EAN-13 uses 1 and 3,
    /// UPC-A uses 3 and 1).
    Alternating {
        /// Multiplier at positions 0, 2, 4, ...
        even: u32,
        /// Multiplier at positions 1, 3, 5, ...
        odd: u32,
    },

    /// Explicit contributions: row `position % rows.len()`, column digit.
    /// Every row must have exactly ten entries.
    Table(Vec<Vec<u32>>),
}

impl WeightRule {
    /// Right-aligned Luhn for an identifier of `length` digits.
    ///
    /// Luhn doubles every second digit counting from the check digit, so
    /// which positions double depends on the parity of the length.
    pub fn luhn_for_length(length: usize) -> Self {
        if length % 2 == 0 {
            WeightRule::Luhn
        } else {
            WeightRule::LuhnOddPositions
        }
    }
}

/// Double a digit and fold it back into a single digit.
#[inline]
fn luhn_double(d: u32) -> u32 {
    if d > 4 {
        d * 2 - 9
    } else {
        d * 2
    }
}

impl WeightFunction for WeightRule {
    fn weight(&self, position: usize, digit: Digit) -> u32 {
        let d = digit.value() as u32;
        match self {
            WeightRule::Luhn if position % 2 == 0 => luhn_double(d),
            WeightRule::Luhn => d,
            WeightRule::LuhnOddPositions if position % 2 == 1 => luhn_double(d),
            WeightRule::LuhnOddPositions => d,
            WeightRule::Uniform => d,
            // validate() bounds multipliers so these never saturate
            WeightRule::Alternating { even, .. } if position % 2 == 0 => even.saturating_mul(d),
            WeightRule::Alternating { odd, .. } => odd.saturating_mul(d),
            WeightRule::Table(rows) => {
                // Validated schemes never hand out an empty or short table
                rows.get(position % rows.len().max(1))
                    .and_then(|row| row.get(digit.value() as usize))
                    .copied()
                    .unwrap_or(0)
            }
        }
    }

    fn validate(&self) -> Result<(), SchemeError> {
        match self {
            WeightRule::Table(rows) => {
                if rows.is_empty() {
                    return Err(SchemeError::EmptyWeightTable);
                }
                if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != 10) {
                    return Err(SchemeError::UndefinedWeight { row, len: r.len() });
                }
            }
            WeightRule::Alternating { even, odd } => {
                let overflowing = [even, odd].into_iter().find(|m| m.checked_mul(9).is_none());
                if let Some(&multiplier) = overflowing {
                    return Err(SchemeError::WeightOverflow { multiplier });
                }
            }
            _ => {}
        }
        Ok(())
    }
}

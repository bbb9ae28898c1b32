//! Built-in checksum schemes.
//!
//! All presets use modulus 10 and target residue 0.

use std::collections::BTreeMap;
use std::fmt;

use crate::automaton::DigitSet;
use crate::synthesis::{ChecksumScheme, SchemeError, WeightRule};

/// Legacy Mastercard numbers: 16 digits, issuer range 51–55, Luhn.
///
/// The second digit is restricted to 1..=5; numbers starting `50` are
/// rejected even when their Luhn checksum holds.
pub fn mastercard_legacy() -> ChecksumScheme {
    ChecksumScheme::preset(
        16,
        BTreeMap::from([(0, DigitSet::range(5..=5)), (1, DigitSet::range(1..=5))]),
        WeightRule::Luhn,
    )
}

/// Unconstrained Luhn identifiers of `length` digits.
///
/// Doubling is aligned to the check digit (the rightmost one), so odd
/// lengths such as 15-digit Amex numbers validate correctly.
///
/// # Errors
///
/// Returns [`SchemeError::ZeroLength`] if `length` is 0.
pub fn luhn(length: usize) -> Result<ChecksumScheme, SchemeError> {
    if length == 0 {
        return Err(SchemeError::ZeroLength);
    }
    Ok(ChecksumScheme::preset(
        length,
        BTreeMap::new(),
        WeightRule::luhn_for_length(length),
    ))
}

/// EAN-13 barcodes: weights 1 and 3 alternating from the left.
pub fn ean13() -> ChecksumScheme {
    ChecksumScheme::preset(
        13,
        BTreeMap::new(),
        WeightRule::Alternating { even: 1, odd: 3 },
    )
}

/// UPC-A barcodes: weights 3 and 1 alternating from the left.
pub fn upc_a() -> ChecksumScheme {
    ChecksumScheme::preset(
        12,
        BTreeMap::new(),
        WeightRule::Alternating { even: 3, odd: 1 },
    )
}

/// ISBN-13: EAN-13 restricted to the 978 and 979 "Bookland" prefixes.
pub fn isbn13() -> ChecksumScheme {
    ChecksumScheme::preset(
        13,
        BTreeMap::from([
            (0, DigitSet::range(9..=9)),
            (1, DigitSet::range(7..=7)),
            (2, DigitSet::range(8..=9)),
        ]),
        WeightRule::Alternating { even: 1, odd: 3 },
    )
}

/// Named presets, selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum Preset {
    /// 16-digit Mastercard, issuer range 51–55
    #[default]
    Mastercard,
    /// Any 16-digit Luhn number
    Luhn16,
    /// EAN-13 barcode
    Ean13,
    /// UPC-A barcode
    UpcA,
    /// ISBN-13
    Isbn13,
}

impl Preset {
    /// Get the scheme for this preset.
    pub fn scheme(&self) -> ChecksumScheme {
        match self {
            Preset::Mastercard => mastercard_legacy(),
            Preset::Luhn16 => {
                ChecksumScheme::preset(16, BTreeMap::new(), WeightRule::luhn_for_length(16))
            }
            Preset::Ean13 => ean13(),
            Preset::UpcA => upc_a(),
            Preset::Isbn13 => isbn13(),
        }
    }

    /// Get a human-readable name for this preset.
    pub fn name(&self) -> &'static str {
        match self {
            Preset::Mastercard => "mastercard",
            Preset::Luhn16 => "luhn16",
            Preset::Ean13 => "ean13",
            Preset::UpcA => "upc-a",
            Preset::Isbn13 => "isbn13",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

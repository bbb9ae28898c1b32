//! Checksum scheme configuration.

use std::collections::BTreeMap;

use crate::automaton::{Automaton, DigitSet};
use crate::synthesis::error::{Result, SchemeError};
use crate::synthesis::table;
use crate::synthesis::weight::{WeightFunction, WeightRule};

/// A fixed-length numeric identifier validated by a weighted checksum.
///
/// An identifier of `length` digits belongs to the scheme if every
/// constrained position holds an allowed digit and the sum of weighted
/// digit contributions is congruent to `target_residue` modulo `modulus`.
///
/// Schemes are always valid: they can only be created through
/// [`ChecksumScheme::builder`] or [`ChecksumScheme::new`], which reject
/// inconsistent configurations.
///
/// # Type Parameters
///
/// - `W`: Weight function (defaults to the serializable [`WeightRule`])
///
/// # Example
///
/// ```rust
/// use checksum_automata::prelude::*;
///
/// let scheme = ChecksumScheme::builder()
///     .length(16)
///     .constrain(0, DigitSet::range(5..=5))
///     .constrain(1, DigitSet::range(1..=5))
///     .weight(WeightRule::Luhn)
///     .build()
///     .unwrap();
///
/// let fsm = scheme.synthesize();
/// assert!(fsm.accepts("5222084305213022"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumScheme<W = WeightRule> {
    length: usize,
    modulus: u32,
    target_residue: u32,
    constraints: BTreeMap<usize, DigitSet>,
    weight: W,
}

impl ChecksumScheme<WeightRule> {
    /// Start building a scheme. Modulus defaults to 10, target residue to
    /// 0 and the weight rule to [`WeightRule::Luhn`].
    pub fn builder() -> ChecksumSchemeBuilder<WeightRule> {
        ChecksumSchemeBuilder::new()
    }
}

impl<W: WeightFunction> ChecksumScheme<W> {
    /// Create a scheme from its parts.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemeError`] if the length or modulus is zero, the
    /// target residue is not below the modulus, a constraint lies past the
    /// last position, or the weight rule is not defined for every digit.
    pub fn new(
        length: usize,
        modulus: u32,
        target_residue: u32,
        constraints: BTreeMap<usize, DigitSet>,
        weight: W,
    ) -> Result<Self> {
        if length == 0 {
            return Err(SchemeError::ZeroLength);
        }
        if modulus == 0 {
            return Err(SchemeError::ZeroModulus);
        }
        if target_residue >= modulus {
            return Err(SchemeError::TargetOutOfRange {
                target: target_residue,
                modulus,
            });
        }
        if let Some(&position) = constraints.keys().find(|p| **p >= length) {
            return Err(SchemeError::ConstraintOutOfRange { position, length });
        }
        weight.validate()?;

        Ok(Self {
            length,
            modulus,
            target_residue,
            constraints,
            weight,
        })
    }

    /// Create a scheme known to be valid. Used for the built-in presets.
    pub(crate) fn preset(
        length: usize,
        constraints: BTreeMap<usize, DigitSet>,
        weight: W,
    ) -> Self {
        debug_assert!(length > 0 && constraints.keys().all(|p| *p < length));
        Self {
            length,
            modulus: 10,
            target_residue: 0,
            constraints,
            weight,
        }
    }

    /// Identifier length in digits.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Checksum modulus.
    pub fn modulus(&self) -> u32 {
        self.modulus
    }

    /// Residue the weighted sum must reach.
    pub fn target_residue(&self) -> u32 {
        self.target_residue
    }

    /// The weight function.
    pub fn weight(&self) -> &W {
        &self.weight
    }

    /// Explicit per-position constraints; unlisted positions are free.
    pub fn constraints(&self) -> &BTreeMap<usize, DigitSet> {
        &self.constraints
    }

    /// Digits allowed at `position`.
    #[inline]
    pub fn allowed(&self, position: usize) -> DigitSet {
        self.constraints
            .get(&position)
            .copied()
            .unwrap_or_else(DigitSet::all)
    }

    /// Check an identifier directly, without building an automaton.
    ///
    /// This is the reference the synthesized automaton must agree with.
    pub fn validate_number(&self, input: &str) -> bool {
        let mut sum: u64 = 0;
        let mut count = 0;
        for (position, c) in input.chars().enumerate() {
            let digit = match crate::automaton::Digit::from_char(c) {
                Some(d) if position < self.length && self.allowed(position).contains(d) => d,
                _ => return false,
            };
            sum = (sum + self.weight.weight(position, digit) as u64) % self.modulus as u64;
            count += 1;
        }
        count == self.length && sum == self.target_residue as u64
    }
}

impl<W: WeightFunction + Sync> ChecksumScheme<W> {
    /// Synthesize the automaton accepting exactly this scheme's identifiers.
    pub fn synthesize(&self) -> Automaton {
        table::build(self)
    }
}

/// Builder for [`ChecksumScheme`].
#[derive(Debug, Clone)]
pub struct ChecksumSchemeBuilder<W = WeightRule> {
    length: Option<usize>,
    modulus: u32,
    target_residue: u32,
    constraints: BTreeMap<usize, DigitSet>,
    weight: W,
}

impl ChecksumSchemeBuilder<WeightRule> {
    /// Create a builder with modulus 10, target residue 0 and Luhn weights.
    pub fn new() -> Self {
        Self {
            length: None,
            modulus: 10,
            target_residue: 0,
            constraints: BTreeMap::new(),
            weight: WeightRule::Luhn,
        }
    }
}

impl Default for ChecksumSchemeBuilder<WeightRule> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: WeightFunction> ChecksumSchemeBuilder<W> {
    /// Set the identifier length.
    pub fn length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }

    /// Set the checksum modulus.
    pub fn modulus(mut self, modulus: u32) -> Self {
        self.modulus = modulus;
        self
    }

    /// Set the residue a valid identifier's weighted sum must reach.
    pub fn target_residue(mut self, target_residue: u32) -> Self {
        self.target_residue = target_residue;
        self
    }

    /// Restrict `position` to `allowed`. A later call for the same
    /// position replaces the earlier one.
    pub fn constrain(mut self, position: usize, allowed: DigitSet) -> Self {
        self.constraints.insert(position, allowed);
        self
    }

    /// Constrain a run of leading positions, one set per position
    /// starting at 0.
    pub fn prefix<I>(mut self, sets: I) -> Self
    where
        I: IntoIterator<Item = DigitSet>,
    {
        for (position, set) in sets.into_iter().enumerate() {
            self.constraints.insert(position, set);
        }
        self
    }

    /// Use a different weight function.
    pub fn weight<V: WeightFunction>(self, weight: V) -> ChecksumSchemeBuilder<V> {
        ChecksumSchemeBuilder {
            length: self.length,
            modulus: self.modulus,
            target_residue: self.target_residue,
            constraints: self.constraints,
            weight,
        }
    }

    /// Validate and build the scheme.
    ///
    /// # Errors
    ///
    /// Returns [`SchemeError::MissingLength`] if no length was set, or any
    /// error from [`ChecksumScheme::new`].
    pub fn build(self) -> Result<ChecksumScheme<W>> {
        let length = self.length.ok_or(SchemeError::MissingLength)?;
        ChecksumScheme::new(
            length,
            self.modulus,
            self.target_residue,
            self.constraints,
            self.weight,
        )
    }
}

/// Serializable scheme description, as read from a configuration file.
///
/// ```json
/// {
///   "length": 16,
///   "prefix": { "0": [5], "1": [1, 2, 3, 4, 5] },
///   "weight": "luhn"
/// }
/// ```
///
/// `modulus` defaults to 10, `target_residue` to 0, `weight` to Luhn.
#[cfg(feature = "serialization")]
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SchemeConfig {
    /// Identifier length in digits
    pub length: usize,
    /// Checksum modulus
    #[serde(default = "SchemeConfig::default_modulus")]
    pub modulus: u32,
    /// Residue a valid identifier reaches
    #[serde(default)]
    pub target_residue: u32,
    /// Allowed digits per constrained position
    #[serde(default)]
    pub prefix: BTreeMap<usize, DigitSet>,
    /// Weighting rule
    #[serde(default)]
    pub weight: WeightRule,
}

#[cfg(feature = "serialization")]
impl SchemeConfig {
    fn default_modulus() -> u32 {
        10
    }

    /// Parse a JSON scheme description.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(feature = "serialization")]
impl TryFrom<SchemeConfig> for ChecksumScheme<WeightRule> {
    type Error = SchemeError;

    fn try_from(config: SchemeConfig) -> Result<Self> {
        ChecksumScheme::new(
            config.length,
            config.modulus,
            config.target_residue,
            config.prefix,
            config.weight,
        )
    }
}

#[cfg(feature = "serialization")]
impl From<&ChecksumScheme<WeightRule>> for SchemeConfig {
    fn from(scheme: &ChecksumScheme<WeightRule>) -> Self {
        SchemeConfig {
            length: scheme.length,
            modulus: scheme.modulus,
            target_residue: scheme.target_residue,
            prefix: scheme.constraints.clone(),
            weight: scheme.weight.clone(),
        }
    }
}

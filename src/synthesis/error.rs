//! Error types for checksum scheme configuration.

use thiserror::Error;

/// Configuration errors, detected before any automaton is built.
///
/// Synthesis itself cannot fail: once a [`ChecksumScheme`] exists it has
/// passed these checks.
///
/// [`ChecksumScheme`]: crate::synthesis::ChecksumScheme
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemeError {
    /// No identifier length was given to the builder.
    #[error("Length is required. Use .length() to set it.")]
    MissingLength,

    /// Identifiers must have at least one digit.
    #[error("Identifier length must be at least 1")]
    ZeroLength,

    /// The checksum modulus must be positive.
    #[error("Checksum modulus must be at least 1")]
    ZeroModulus,

    /// The target residue is not a residue of the modulus.
    #[error("Target residue {target} is out of range for modulus {modulus}")]
    TargetOutOfRange {
        /// Requested residue
        target: u32,
        /// Scheme modulus
        modulus: u32,
    },

    /// A prefix constraint names a position past the end of the identifier.
    #[error("Constraint at position {position} is outside an identifier of length {length}")]
    ConstraintOutOfRange {
        /// Constrained position
        position: usize,
        /// Identifier length
        length: usize,
    },

    /// A weight table has no rows.
    #[error("Weight table has no rows")]
    EmptyWeightTable,

    /// A weight table row does not define all ten digits.
    #[error("Weight table row {row} defines {len} digits, expected 10")]
    UndefinedWeight {
        /// Offending row
        row: usize,
        /// Number of entries in that row
        len: usize,
    },

/// A weight multiplier times nine does not fit in a `u32`.
    #[error("Weight multiplier {multiplier} overflows for digit 9")]
    WeightOverflow {
        /// Offending multiplier
        multiplier: u32,
    },
}

/// A specialized `Result` type for scheme configuration.
pub type Result<T> = std::result::Result<T, SchemeError>;

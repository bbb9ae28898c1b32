//! # checksum-automata
//!
//! Synthesize deterministic finite automata that accept exactly the
//! fixed-length digit strings satisfying a modular checksum, such as
//! Luhn-validated Mastercard numbers or EAN-13 barcodes.
//!
//! A [`ChecksumScheme`](synthesis::ChecksumScheme) describes the identifier:
//! its length, allowed digits per position, a weight function and a target
//! residue. Synthesis lays the automaton out as a DAG of `(position,
//! residue)` states, which can then be minimized, rendered as a transition
//! table, or converted into a regular expression.
//!
//! ## Example
//!
//! ```rust
//! use checksum_automata::prelude::*;
//!
//! let fsm = synthesize(&schemes::mastercard_legacy());
//!
//! assert!(fsm.accepts("5222084305213022"));
//! assert!(!fsm.accepts("5222084305213023")); // bad check digit
//! assert!(!fsm.accepts("4111111111111111")); // not a Mastercard prefix
//!
//! // Every synthesized state is already distinguishable
//! assert_eq!(fsm.minimize(), fsm);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod automaton;
pub mod schemes;
pub mod synthesis;

#[cfg(feature = "serialization")]
pub mod serialization;

/// CLI interface and utilities
#[cfg(feature = "cli")]
pub mod cli;

/// Common imports for convenient usage
pub mod prelude {
    pub use crate::automaton::regex::{derive_regex, derive_regex_with_limit, Regex, RegexError};
    pub use crate::automaton::{Automaton, AutomatonError, Digit, DigitSet, State, Step};
    pub use crate::schemes::{self, Preset};
    pub use crate::synthesis::{
        state_name, synthesize, ChecksumScheme, ChecksumSchemeBuilder, SchemeError,
        WeightFunction, WeightRule,
    };

    #[cfg(feature = "serialization")]
    pub use crate::serialization::{
        AutomatonSerializer, BincodeSerializer, JsonSerializer, PlainTextSerializer,
        SerializationError,
    };

    #[cfg(feature = "serialization")]
    pub use crate::synthesis::SchemeConfig;
}

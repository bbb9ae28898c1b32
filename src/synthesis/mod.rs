//! Checksum automaton synthesis.
//!
//! Turns a [`ChecksumScheme`] (length, modulus, target residue, prefix
//! constraints and a weight function) into an [`Automaton`] that accepts a
//! digit string if and only if it satisfies the prefix constraints and the
//! weighted checksum together.
//!
//! The construction tracks the running weighted sum modulo the scheme's
//! modulus in the automaton state, so the state count is bounded by
//! `(length - 1) * modulus + 2` regardless of how many identifiers the
//! language contains.
//!
//! # Example
//!
//! ```rust
//! use checksum_automata::prelude::*;
//!
//! let fsm = synthesize(&schemes::mastercard_legacy());
//! assert!(fsm.accepts("5306937024627310"));
//! assert!(!fsm.accepts("6216055885117468"));
//! ```

pub mod error;
mod namer;
mod scheme;
mod table;
pub mod weight;

pub use error::SchemeError;
pub use namer::state_name;
pub use scheme::{ChecksumScheme, ChecksumSchemeBuilder};
pub use weight::{WeightFunction, WeightRule};

#[cfg(feature = "serialization")]
pub use scheme::SchemeConfig;

use crate::automaton::Automaton;

/// Synthesize the automaton for `scheme`.
///
/// Equivalent to [`ChecksumScheme::synthesize`].
pub fn synthesize<W>(scheme: &ChecksumScheme<W>) -> Automaton
where
    W: WeightFunction + Sync,
{
    scheme.synthesize()
}

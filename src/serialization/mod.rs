//! Automaton serialization support.
//!
//! This module provides serialization and deserialization of automata
//! using JSON, bincode, or a plain-text edge list. Deserialized automata
//! are checked for determinism before they are returned.
//!
//! # Example
//!
//! ```rust,ignore
//! use checksum_automata::prelude::*;
//! use checksum_automata::serialization::{AutomatonSerializer, BincodeSerializer};
//! use std::fs::File;
//!
//! let fsm = schemes::mastercard_legacy().synthesize().minimize();
//!
//! // Serialize to file
//! let file = File::create("mastercard.bin")?;
//! BincodeSerializer::serialize(&fsm, file)?;
//!
//! // Deserialize from file
//! let file = File::open("mastercard.bin")?;
//! let loaded = BincodeSerializer::deserialize(file)?;
//! assert_eq!(loaded, fsm);
//! ```

use crate::automaton::{Automaton, AutomatonError};
use std::io::{Read, Write};

// Serializer implementations
mod bincode_impl;
mod json_impl;
mod plaintext_impl;

// Re-exports
pub use self::bincode_impl::BincodeSerializer;
pub use self::json_impl::JsonSerializer;
pub use self::plaintext_impl::PlainTextSerializer;

/// Trait for serializing and deserializing automata.
pub trait AutomatonSerializer {
    /// Serialize an automaton to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or writing fails.
    fn serialize<W: Write>(automaton: &Automaton, writer: W) -> Result<(), SerializationError>;

    /// Deserialize an automaton from a reader.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails, the data is malformed, or the
    /// edges do not describe a deterministic automaton.
    fn deserialize<R: Read>(reader: R) -> Result<Automaton, SerializationError>;
}

/// Errors that can occur during serialization/deserialization.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    /// Error during bincode serialization
    #[error("Bincode error")]
    Bincode(#[from] bincode::Error),
    /// Error during JSON serialization
    #[error("JSON error")]
    Json(#[from] serde_json::Error),
    /// I/O error
    #[error("I/O error")]
    Io(#[from] std::io::Error),
    /// The serialized edges are not deterministic
    #[error("Invalid automaton: {0}")]
    Automaton(#[from] AutomatonError),
    /// A line of a plain-text edge list could not be parsed
    #[error("Line {line}: {message}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// What was wrong with it
        message: String,
    },
}

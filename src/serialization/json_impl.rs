//! JSON serializer for human-readable format.

use crate::automaton::Automaton;
use std::io::{Read, Write};

use super::{AutomatonSerializer, SerializationError};

/// JSON serializer for human-readable format.
///
/// This serializer uses JSON for easy debugging and manual inspection.
/// It's less efficient than bincode but useful for handing an automaton
/// to tools outside Rust.
pub struct JsonSerializer;

impl AutomatonSerializer for JsonSerializer {
    fn serialize<W: Write>(automaton: &Automaton, mut writer: W) -> Result<(), SerializationError> {
        serde_json::to_writer_pretty(&mut writer, automaton)?;
        Ok(())
    }

    fn deserialize<R: Read>(mut reader: R) -> Result<Automaton, SerializationError> {
        Ok(serde_json::from_reader(&mut reader)?)
    }
}

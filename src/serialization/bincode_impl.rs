//! Bincode serializer for compact binary format.

use crate::automaton::Automaton;
use std::io::{Read, Write};

use super::{AutomatonSerializer, SerializationError};

/// Bincode serializer for compact binary format.
///
/// This serializer uses bincode for fast, space-efficient serialization.
/// It's the format to use when an automaton is synthesized once and
/// loaded many times.
pub struct BincodeSerializer;

impl AutomatonSerializer for BincodeSerializer {
    fn serialize<W: Write>(automaton: &Automaton, mut writer: W) -> Result<(), SerializationError> {
        bincode::serialize_into(&mut writer, automaton)?;
        Ok(())
    }

    fn deserialize<R: Read>(mut reader: R) -> Result<Automaton, SerializationError> {
        Ok(bincode::deserialize_from(&mut reader)?)
    }
}

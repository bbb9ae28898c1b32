//! Plain text serialization for automata.
//!
//! Serializes automata as a newline-delimited edge list. This is the
//! simplest and most human-readable format, ideal for:
//! - Manual editing
//! - Version control diffs
//! - Feeding other automata tools
//!
//! # Format
//!
//! One `initial` line, one `final` line per accepting state, an optional
//! `state` line for each state without edges, then one `from digit to` line
//! per transition. Blank lines and lines starting with `#` are ignored.
//! ```text
//! initial S
//! final E
//! S 5 1:1
//! 1:1 1 2:2
//! ```

use super::{AutomatonSerializer, SerializationError};
use crate::automaton::{Automaton, Digit, State};
use std::io::{BufRead, BufReader, Read, Write};

/// Plain text serializer using a newline-delimited edge list.
pub struct PlainTextSerializer;

impl AutomatonSerializer for PlainTextSerializer {
    fn serialize<W: Write>(automaton: &Automaton, mut writer: W) -> Result<(), SerializationError> {
        writeln!(writer, "initial {}", automaton.initial())?;
        for state in automaton.finals() {
            writeln!(writer, "final {}", state)?;
        }
        for state in automaton.states() {
            if automaton.transitions_from(state).is_empty() && !automaton.is_final(state) {
                writeln!(writer, "state {}", state)?;
            }
        }
        for (from, digit, to) in automaton.edges() {
            writeln!(writer, "{} {} {}", from, digit, to)?;
        }
        Ok(())
    }

    fn deserialize<R: Read>(reader: R) -> Result<Automaton, SerializationError> {
        let buf_reader = BufReader::new(reader);
        let mut initial = None;
        let mut finals = Vec::new();
        let mut isolated = Vec::new();
        let mut edges = Vec::new();

        for (idx, line) in buf_reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let err = |message: String| SerializationError::Parse {
                line: idx + 1,
                message,
            };

            let fields: Vec<&str> = line.split_whitespace().collect();
            match fields.as_slice() {
                ["initial", state] => initial = Some(state.parse::<State>().map_err(err)?),
                ["final", state] => finals.push(state.parse::<State>().map_err(err)?),
                ["state", state] => isolated.push(state.parse::<State>().map_err(err)?),
                [from, digit, to] => {
                    let digit = match digit.chars().collect::<Vec<_>>().as_slice() {
                        [c] => Digit::from_char(*c),
                        _ => None,
                    }
                    .ok_or_else(|| err(format!("Invalid digit: {}", digit)))?;
                    edges.push((
                        from.parse::<State>().map_err(err)?,
                        digit,
                        to.parse::<State>().map_err(err)?,
                    ));
                }
                _ => return Err(err(format!("Unrecognized line: {}", line))),
            }
        }

        let initial = initial.ok_or_else(|| SerializationError::Parse {
            line: 0,
            message: "Missing initial state".to_string(),
        })?;
        // States without edges still belong to the automaton
        Ok(Automaton::from_edges(initial, finals, edges)?.with_states(isolated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemes;

    #[test]
    fn test_plaintext_roundtrip() {
        let fsm = schemes::isbn13().synthesize();
        let mut buffer = Vec::new();

        PlainTextSerializer::serialize(&fsm, &mut buffer).unwrap();
        let loaded = PlainTextSerializer::deserialize(&buffer[..]).unwrap();

        assert_eq!(loaded, fsm);
        assert!(loaded.accepts("9780306406157"));
    }

    #[test]
    fn test_plaintext_format() {
        let fsm = schemes::luhn(1).unwrap().synthesize();
        let mut buffer = Vec::new();

        PlainTextSerializer::serialize(&fsm, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        // Single-digit Luhn: only 0 passes
        assert_eq!(text, "initial S\nfinal E\nS 0 E\n");
    }

    #[test]
    fn test_plaintext_comments_and_blank_lines() {
        let input = "# two-digit strings ending in 0\ninitial S\n\nfinal E\nS 1 1:0\n1:0 0 E\n";
        let loaded = PlainTextSerializer::deserialize(input.as_bytes()).unwrap();

        assert!(loaded.accepts("10"));
        assert!(!loaded.accepts("11"));
    }

    #[test]
    fn test_plaintext_errors() {
        let missing_initial = "final E\nS 1 E\n";
        assert!(matches!(
            PlainTextSerializer::deserialize(missing_initial.as_bytes()),
            Err(SerializationError::Parse { line: 0, .. })
        ));

        let bad_digit = "initial S\nS x E\n";
        assert!(matches!(
            PlainTextSerializer::deserialize(bad_digit.as_bytes()),
            Err(SerializationError::Parse { line: 2, .. })
        ));

        let duplicate = "initial S\nS 1 E\nS 1 S\n";
        assert!(matches!(
            PlainTextSerializer::deserialize(duplicate.as_bytes()),
            Err(SerializationError::Automaton(_))
        ));
    }
}

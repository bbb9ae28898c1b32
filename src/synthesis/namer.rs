//! Mapping from algorithm position and residue to automaton states.

use crate::automaton::State;

/// The state reached after consuming `position` digits whose weighted sum
/// is congruent to `residue`.
///
/// Position 0 is always [`State::Initial`] whatever the residue: nothing
/// has been consumed, so there is only one such state. Callers supply
/// `position < length` and `residue < modulus`.
#[inline]
pub fn state_name(position: usize, residue: u32) -> State {
    if position == 0 {
        State::Initial
    } else {
        State::Working { position, residue }
    }
}

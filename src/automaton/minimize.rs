//! Automaton minimization by partition refinement.
//!
//! Minimization runs in three phases:
//!
//! 1. **Trim**: drop states unreachable from the initial state and states
//!    from which no accepting state can be reached. Missing transitions
//!    then behave as edges into one implicit dead sink.
//! 2. **Refine**: starting from the accepting/non-accepting split, repeatedly
//!    split classes by the signature `(class, successor class per digit)`
//!    until the number of classes stops growing (Moore's algorithm).
//! 3. **Rebuild**: each class becomes one state, named after its least
//!    member. Naming by least member makes the output canonical, so
//!    minimizing an already minimal automaton returns it unchanged.

use rustc_hash::FxHashMap;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

use super::{Automaton, Digit, Edges, State};

/// Successor class for each digit, `None` meaning the dead sink.
type Signature = (usize, [Option<usize>; 10]);

impl Automaton {
    /// Produce the minimal automaton accepting the same language.
    ///
    /// Unreachable and dead states are removed. If the language is empty
    /// the result is a single non-accepting initial state.
    ///
    /// # Example
    ///
    /// ```rust
    /// use checksum_automata::schemes;
    ///
    /// let fsm = schemes::luhn(4).unwrap().synthesize();
    /// let minimal = fsm.minimize();
    /// assert!(minimal.state_count() <= fsm.state_count());
    /// assert!(minimal.accepts("4242") == fsm.accepts("4242"));
    /// ```
    pub fn minimize(&self) -> Automaton {
        let live = self.live_states();
        if !live.contains(&self.initial) {
            tracing::debug!(
                states = self.state_count(),
                "language is empty; minimized to a lone initial state"
            );
            return Automaton::from_sorted(self.initial, BTreeSet::new(), BTreeMap::new());
        }

        let states: Vec<State> = live.into_iter().collect();
        let index: FxHashMap<State, usize> =
            states.iter().enumerate().map(|(i, s)| (*s, i)).collect();

        // Successor indices per state, `None` for the dead sink
        let successors: Vec<[Option<usize>; 10]> = states
            .iter()
            .map(|state| {
                let mut row = [None; 10];
                for (digit, next) in self.transitions_from(*state) {
                    row[digit.value() as usize] = index.get(next).copied();
                }
                row
            })
            .collect();

        let classes = refine(&states, &successors, |s| self.is_final(s));

        // Least member of each class; `states` is sorted so first seen wins
        let mut representative: Vec<Option<State>> = vec![None; states.len()];
        for (i, state) in states.iter().enumerate() {
            if representative[classes[i]].is_none() {
                representative[classes[i]] = Some(*state);
            }
        }
        let rep = |i: usize| representative[classes[i]].unwrap_or(states[i]);

        let mut transitions: BTreeMap<State, Edges> = BTreeMap::new();
        let mut finals = BTreeSet::new();
        for (i, state) in states.iter().enumerate() {
            if rep(i) != *state {
                continue;
            }
            let mut edges = Edges::new();
            for (d, next) in successors[i].iter().enumerate() {
                if let (Some(next), Some(digit)) = (next, Digit::new(d as u8)) {
                    edges.push((digit, rep(*next)));
                }
            }
            transitions.insert(*state, edges);
            if self.is_final(*state) {
                finals.insert(*state);
            }
        }

        let initial = rep(index[&self.initial]);
        let minimized = Automaton::from_sorted(initial, finals, transitions);
        tracing::debug!(
            before = self.state_count(),
            after = minimized.state_count(),
            "minimized automaton"
        );
        minimized
    }

    /// Reachable states from which some accepting state is reachable.
    fn live_states(&self) -> BTreeSet<State> {
        let reachable = self.reachable_states();

        let mut reverse: FxHashMap<State, Vec<State>> = FxHashMap::default();
        for (from, _, to) in self.edges() {
            if reachable.contains(&from) {
                reverse.entry(to).or_default().push(from);
            }
        }

        let mut live = BTreeSet::new();
        let mut queue: VecDeque<State> = self
            .finals
            .iter()
            .filter(|s| reachable.contains(s))
            .copied()
            .collect();
        live.extend(queue.iter().copied());

        while let Some(state) = queue.pop_front() {
            if let Some(preds) = reverse.get(&state) {
                for pred in preds {
                    if live.insert(*pred) {
                        queue.push_back(*pred);
                    }
                }
            }
        }
        live
    }
}

/// Moore partition refinement. Returns the class index of every state.
fn refine<F>(states: &[State], successors: &[[Option<usize>; 10]], is_final: F) -> Vec<usize>
where
    F: Fn(State) -> bool,
{
    let mut classes: Vec<usize> = states.iter().map(|s| usize::from(is_final(*s))).collect();
    let mut class_count = renumber(&mut classes);

    loop {
        let mut ids: FxHashMap<Signature, usize> = FxHashMap::default();
        let next: Vec<usize> = (0..states.len())
            .map(|i| {
                let mut row = [None; 10];
                for (slot, succ) in row.iter_mut().zip(successors[i].iter()) {
                    *slot = succ.map(|j| classes[j]);
                }
                let fresh = ids.len();
                *ids.entry((classes[i], row)).or_insert(fresh)
            })
            .collect();

        let next_count = ids.len();
        classes = next;
        if next_count == class_count {
            return classes;
        }
        class_count = next_count;
    }
}

/// Renumber class ids densely in order of first appearance.
fn renumber(classes: &mut [usize]) -> usize {
    let mut ids: FxHashMap<usize, usize> = FxHashMap::default();
    for class in classes.iter_mut() {
        let fresh = ids.len();
        *class = *ids.entry(*class).or_insert(fresh);
    }
    ids.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(v: u8) -> Digit {
        Digit::new(v).unwrap()
    }

    fn w(position: usize, residue: u32) -> State {
        State::Working { position, residue }
    }

    #[test]
    fn test_equivalent_states_merge() {
        // "10" and "20" lead through two distinct but equivalent states
        let fsm = Automaton::from_edges(
            State::Initial,
            [State::Accept],
            vec![
                (State::Initial, d(1), w(1, 1)),
                (State::Initial, d(2), w(1, 2)),
                (w(1, 1), d(0), State::Accept),
                (w(1, 2), d(0), State::Accept),
            ],
        )
        .unwrap();

        let minimal = fsm.minimize();
        assert_eq!(minimal.state_count(), 3);
        assert_eq!(minimal.step(State::Initial, d(2)).next(), Some(w(1, 1)));
        assert!(minimal.accepts("10"));
        assert!(minimal.accepts("20"));
        assert!(!minimal.accepts("30"));
    }

    #[test]
    fn test_dead_and_unreachable_states_removed() {
        let fsm = Automaton::from_edges(
            State::Initial,
            [State::Accept],
            vec![
                (State::Initial, d(1), State::Accept),
                (State::Initial, d(2), w(1, 0)), // dead end
                (w(5, 5), d(3), State::Accept),  // unreachable
            ],
        )
        .unwrap();

        let minimal = fsm.minimize();
        assert_eq!(minimal.state_count(), 2);
        assert!(minimal.dead_states().is_empty());
        assert!(!minimal.contains_state(w(5, 5)));
        assert!(minimal.accepts("1"));
        assert!(!minimal.accepts("2"));
    }

    #[test]
    fn test_empty_language() {
        let fsm = Automaton::from_edges(
            State::Initial,
            [State::Accept],
            vec![(State::Initial, d(1), w(1, 0))],
        )
        .unwrap();

        let minimal = fsm.minimize();
        assert_eq!(minimal.state_count(), 1);
        assert!(minimal.finals().is_empty());
        assert_eq!(minimal.transition_count(), 0);
    }

    #[test]
    fn test_minimize_is_idempotent() {
        let fsm = Automaton::from_edges(
            State::Initial,
            [State::Accept],
            vec![
                (State::Initial, d(1), w(1, 1)),
                (State::Initial, d(2), w(1, 2)),
                (w(1, 1), d(0), State::Accept),
                (w(1, 2), d(0), State::Accept),
                (w(1, 2), d(1), State::Accept),
            ],
        )
        .unwrap();

        let once = fsm.minimize();
        let twice = once.minimize();
        assert_eq!(once, twice);
        assert_eq!(once.state_count(), 4);
    }

    #[test]
    fn test_cyclic_automaton() {
        // Strings of zeros with even length, two-state loop plus a
        // redundant copy of the even state
        let fsm = Automaton::from_edges(
            State::Initial,
            [State::Initial, w(2, 0)],
            vec![
                (State::Initial, d(0), w(1, 0)),
                (w(1, 0), d(0), w(2, 0)),
                (w(2, 0), d(0), w(1, 0)),
            ],
        )
        .unwrap();

        let minimal = fsm.minimize();
        assert_eq!(minimal.state_count(), 2);
        assert!(minimal.accepts(""));
        assert!(minimal.accepts("0000"));
        assert!(!minimal.accepts("000"));
    }
}

//! Deterministic finite automata over the digit alphabet.
//!
//! An [`Automaton`] is an immutable, partial DFA: every `(state, digit)`
//! pair has at most one successor, and a missing successor is a rejection
//! ([`Step::Reject`]) rather than an error. Automata are produced by the
//! checksum synthesizer in [`crate::synthesis`] and consumed by the three
//! collaborators implemented here:
//!
//! - acceptance testing ([`Automaton::accepts`])
//! - minimization ([`Automaton::minimize`], see [`minimize`])
//! - regular-expression derivation ([`regex::derive_regex`])
//!
//! Because an automaton is never mutated after construction it is `Send +
//! Sync` and can be shared across threads behind an `Arc` without locking.

pub mod minimize;
pub mod regex;
pub mod symbol;

pub use symbol::{Digit, DigitSet};

use smallvec::SmallVec;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;

/// An automaton state.
///
/// States are ordered `Initial < Working(..) < Accept`, with working states
/// ordered by position then residue. The minimizer relies on this ordering
/// to pick a canonical representative for each class of equivalent states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum State {
    /// Nothing consumed yet.
    Initial,
    /// `position` digits consumed, weighted sum congruent to `residue`.
    Working {
        /// Number of digits consumed so far (1-based layer index).
        position: usize,
        /// Running weighted sum modulo the scheme's modulus.
        residue: u32,
    },
    /// The single accepting state.
    Accept,
}

impl State {
    /// Check if this is a working `(position, residue)` state.
    pub fn is_working(&self) -> bool {
        matches!(self, State::Working { .. })
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::Initial => write!(f, "S"),
            State::Working { position, residue } => write!(f, "{}:{}", position, residue),
            State::Accept => write!(f, "E"),
        }
    }
}

/// Parses the [`Display`](fmt::Display) form: `S`, `E` or `position:residue`.
impl std::str::FromStr for State {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "S" => Ok(State::Initial),
            "E" => Ok(State::Accept),
            _ => {
                let (position, residue) = s
                    .split_once(':')
                    .ok_or_else(|| format!("Invalid state name: {}", s))?;
                Ok(State::Working {
                    position: position
                        .parse()
                        .map_err(|_| format!("Invalid position in state: {}", s))?,
                    residue: residue
                        .parse()
                        .map_err(|_| format!("Invalid residue in state: {}", s))?,
                })
            }
        }
    }
}

/// Result of following one symbol from a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// The symbol leads to this state.
    Next(State),
    /// The symbol is not legal here.
    Reject,
}

impl Step {
    /// Convert into an `Option`, mapping `Reject` to `None`.
    pub fn next(self) -> Option<State> {
        match self {
            Step::Next(state) => Some(state),
            Step::Reject => None,
        }
    }
}

/// Outgoing edges of one state, sorted by digit.
pub type Edges = SmallVec<[(Digit, State); 10]>;

/// Errors raised when assembling an automaton from raw edges.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AutomatonError {
    /// Two edges leave the same state on the same digit.
    #[error("State {state} has more than one transition on '{digit}'")]
    Nondeterministic {
        /// Source state
        state: State,
        /// Offending symbol
        digit: Digit,
    },
}

/// An immutable partial DFA over the ten decimal digits.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "RawAutomaton", try_from = "RawAutomaton")
)]
pub struct Automaton {
    initial: State,
    finals: BTreeSet<State>,
    // Every state appears as a key, including those without outgoing edges.
    transitions: BTreeMap<State, Edges>,
}

impl Automaton {
    /// Assemble an automaton from a list of `(from, digit, to)` edges.
    ///
    /// The state set is the initial state, the final states, and every state
    /// mentioned by an edge.
    ///
    /// # Errors
    ///
    /// Returns [`AutomatonError::Nondeterministic`] if two edges share a
    /// source state and digit.
    pub fn from_edges<I>(
        initial: State,
        finals: impl IntoIterator<Item = State>,
        edges: I,
    ) -> Result<Self, AutomatonError>
    where
        I: IntoIterator<Item = (State, Digit, State)>,
    {
        let finals: BTreeSet<State> = finals.into_iter().collect();
        let mut transitions: BTreeMap<State, Edges> = BTreeMap::new();
        transitions.entry(initial).or_default();
        for state in &finals {
            transitions.entry(*state).or_default();
        }

        for (from, digit, to) in edges {
            transitions.entry(to).or_default();
            let out = transitions.entry(from).or_default();
            match out.binary_search_by_key(&digit, |(d, _)| *d) {
                Ok(_) => return Err(AutomatonError::Nondeterministic { state: from, digit }),
                Err(pos) => out.insert(pos, (digit, to)),
            }
        }

        Ok(Self {
            initial,
            finals,
            transitions,
        })
    }

    /// Build from a transition map whose edge lists are already sorted and
    /// deterministic. Used by the synthesizer and minimizer.
    pub(crate) fn from_sorted(
        initial: State,
        finals: BTreeSet<State>,
        mut transitions: BTreeMap<State, Edges>,
    ) -> Self {
        transitions.entry(initial).or_default();
        let targets: Vec<State> = transitions
            .values()
            .flat_map(|edges| edges.iter().map(|(_, to)| *to))
            .chain(finals.iter().copied())
            .collect();
        for state in targets {
            transitions.entry(state).or_default();
        }
        debug_assert!(transitions
            .values()
            .all(|edges| edges.windows(2).all(|w| w[0].0 < w[1].0)));

        Self {
            initial,
            finals,
            transitions,
        }
    }

    /// Add states that have no edges of their own.
    pub(crate) fn with_states(mut self, states: impl IntoIterator<Item = State>) -> Self {
        for state in states {
            self.transitions.entry(state).or_default();
        }
        self
    }

    /// The alphabet; always the ten decimal digits.
    pub fn alphabet(&self) -> &'static [Digit; 10] {
        &Digit::ALL
    }

    /// The initial state.
    pub fn initial(&self) -> State {
        self.initial
    }

    /// The accepting states.
    pub fn finals(&self) -> &BTreeSet<State> {
        &self.finals
    }

    /// Check if `state` is accepting.
    pub fn is_final(&self, state: State) -> bool {
        self.finals.contains(&state)
    }

    /// Iterate over all states in ascending order.
    pub fn states(&self) -> impl Iterator<Item = State> + '_ {
        self.transitions.keys().copied()
    }

    /// Check if `state` belongs to this automaton.
    pub fn contains_state(&self, state: State) -> bool {
        self.transitions.contains_key(&state)
    }

    /// Number of states.
    pub fn state_count(&self) -> usize {
        self.transitions.len()
    }

    /// Total number of defined transitions.
    pub fn transition_count(&self) -> usize {
        self.transitions.values().map(|edges| edges.len()).sum()
    }

    /// Outgoing edges of `state`, sorted by digit. Empty for unknown states.
    pub fn transitions_from(&self, state: State) -> &[(Digit, State)] {
        self.transitions
            .get(&state)
            .map(|edges| edges.as_slice())
            .unwrap_or(&[])
    }

    /// Iterate over every `(from, digit, to)` edge.
    pub fn edges(&self) -> impl Iterator<Item = (State, Digit, State)> + '_ {
        self.transitions
            .iter()
            .flat_map(|(from, edges)| edges.iter().map(move |(d, to)| (*from, *d, *to)))
    }

    /// Follow `digit` from `state`.
    #[inline]
    pub fn step(&self, state: State, digit: Digit) -> Step {
        let edges = self.transitions_from(state);
        match edges.binary_search_by_key(&digit, |(d, _)| *d) {
            Ok(idx) => Step::Next(edges[idx].1),
            Err(_) => Step::Reject,
        }
    }

    /// Run `input` from the initial state and return the state reached.
    ///
    /// Returns `None` if `input` contains a non-digit character or an
    /// undefined transition is encountered.
    pub fn run(&self, input: &str) -> Option<State> {
        let mut state = self.initial;
        for c in input.chars() {
            let digit = Digit::from_char(c)?;
            state = self.step(state, digit).next()?;
        }
        Some(state)
    }

    /// Check whether the automaton accepts `input`.
    ///
    /// Wrong lengths, non-digit characters and undefined transitions are all
    /// plain rejections.
    pub fn accepts(&self, input: &str) -> bool {
        self.run(input).is_some_and(|state| self.is_final(state))
    }

    /// Check whether the automaton accepts a digit sequence.
    pub fn accepts_digits(&self, input: &[Digit]) -> bool {
        let mut state = self.initial;
        for &digit in input {
            match self.step(state, digit) {
                Step::Next(next) => state = next,
                Step::Reject => return false,
            }
        }
        self.is_final(state)
    }

    /// States reachable from the initial state, in ascending order.
    pub fn reachable_states(&self) -> BTreeSet<State> {
        let mut seen = BTreeSet::new();
        let mut queue = VecDeque::new();
        seen.insert(self.initial);
        queue.push_back(self.initial);

        while let Some(state) = queue.pop_front() {
            for (_, next) in self.transitions_from(state) {
                if seen.insert(*next) {
                    queue.push_back(*next);
                }
            }
        }
        seen
    }

    /// Reachable, non-accepting states with no outgoing transition.
    ///
    /// A well-formed synthesized automaton has none; a prefix constraint
    /// that admits no digit, or a weight rule that can never hit the target
    /// residue, shows up here.
    pub fn dead_states(&self) -> Vec<State> {
        self.reachable_states()
            .into_iter()
            .filter(|s| !self.is_final(*s) && self.transitions_from(*s).is_empty())
            .collect()
    }

    /// Check that the transition graph has no cycles.
    pub fn is_acyclic(&self) -> bool {
        // Kahn's algorithm over all states
        let mut in_degree: BTreeMap<State, usize> = self.states().map(|s| (s, 0)).collect();
        for (_, _, to) in self.edges() {
            *in_degree.entry(to).or_default() += 1;
        }
        let mut queue: VecDeque<State> = in_degree
            .iter()
            .filter(|(_, n)| **n == 0)
            .map(|(s, _)| *s)
            .collect();
        let mut visited = 0;
        while let Some(state) = queue.pop_front() {
            visited += 1;
            for (_, next) in self.transitions_from(state) {
                if let Some(n) = in_degree.get_mut(next) {
                    *n -= 1;
                    if *n == 0 {
                        queue.push_back(*next);
                    }
                }
            }
        }
        visited == self.state_count()
    }
}

impl fmt::Debug for Automaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Automaton")
            .field("initial", &self.initial)
            .field("finals", &self.finals)
            .field("states", &self.state_count())
            .field("transitions", &self.transition_count())
            .finish()
    }
}

/// Renders the transition table: one row per state, one column per digit.
/// `>` marks the initial state and `*` the accepting ones.
impl fmt::Display for Automaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .states()
            .map(|s| s.to_string().len())
            .max()
            .unwrap_or(1)
            .max(1);

        write!(f, "  {:width$}", "", width = width)?;
        for digit in Digit::ALL {
            write!(f, " {:>width$}", digit, width = width)?;
        }
        writeln!(f)?;

        for state in self.states() {
            let marker = match (state == self.initial, self.is_final(state)) {
                (true, true) => ">*",
                (true, false) => "> ",
                (false, true) => " *",
                (false, false) => "  ",
            };
            write!(f, "{}{:width$}", marker, state.to_string(), width = width)?;
            for digit in Digit::ALL {
                let cell = match self.step(state, digit) {
                    Step::Next(next) => next.to_string(),
                    Step::Reject => String::new(),
                };
                write!(f, " {:>width$}", cell, width = width)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Flat edge-list form used for serialization.
#[cfg(feature = "serialization")]
#[derive(serde::Serialize, serde::Deserialize)]
struct RawAutomaton {
    initial: State,
    finals: Vec<State>,
    #[serde(default)]
    states: Vec<State>,
    transitions: Vec<(State, Digit, State)>,
}

#[cfg(feature = "serialization")]
impl From<Automaton> for RawAutomaton {
    fn from(automaton: Automaton) -> Self {
        RawAutomaton {
            initial: automaton.initial,
            finals: automaton.finals.iter().copied().collect(),
            states: automaton.states().collect(),
            transitions: automaton.edges().collect(),
        }
    }
}

#[cfg(feature = "serialization")]
impl TryFrom<RawAutomaton> for Automaton {
    type Error = AutomatonError;

    fn try_from(raw: RawAutomaton) -> Result<Self, Self::Error> {
        // Isolated states carry no edges; keep them so round trips are exact.
        Ok(Automaton::from_edges(raw.initial, raw.finals, raw.transitions)?.with_states(raw.states))
    }
}

//! Regular-expression derivation by state elimination.
//!
//! The derived expression is meant for documentation and inspection; the
//! automaton itself remains the validator. States are eliminated by layer
//! bisection (odd layers first, then layers `2 mod 4`, then `4 mod 8`, ...)
//! so the expression for a 16-digit identifier stays in the hundreds of
//! thousands of nodes. Derivation still takes a node budget and fails with
//! [`RegexError::TooLarge`] once an intermediate expression exceeds it.
//! Minimize the automaton first for the smallest result.

use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use super::{Automaton, DigitSet, State};

/// Default node budget for [`derive_regex`].
pub const DEFAULT_NODE_LIMIT: usize = 1_000_000;

/// Errors raised while deriving a regular expression.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegexError {
    /// An intermediate expression exceeded the node budget.
    #[error("Regular expression exceeds {limit} nodes")]
    TooLarge {
        /// The budget that was exceeded
        limit: usize,
    },
}

/// A regular expression over the digit alphabet.
///
/// Build values through [`Regex::concat`], [`Regex::alt`] and
/// [`Regex::star`]; they keep the tree in a simplified, canonical shape.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Regex {
    /// Matches nothing.
    Empty,
    /// Matches only the empty string.
    Epsilon,
    /// Matches one digit from the set.
    Class(DigitSet),
    /// Sequence of two or more expressions.
    Concat(Vec<Regex>),
    /// Choice between two or more expressions, sorted.
    Alt(Vec<Regex>),
    /// Zero or more repetitions.
    Star(Box<Regex>),
}

impl Regex {
    /// A single-digit class. An empty set yields [`Regex::Empty`].
    pub fn class(set: DigitSet) -> Regex {
        if set.is_empty() {
            Regex::Empty
        } else {
            Regex::Class(set)
        }
    }

    /// `a` followed by `b`.
    pub fn concat(a: Regex, b: Regex) -> Regex {
        Self::concat_of(vec![a, b])
    }

    /// `a` or `b`.
    pub fn alt(a: Regex, b: Regex) -> Regex {
        Self::alt_of(vec![a, b])
    }

    /// Zero or more repetitions of `r`.
    pub fn star(r: Regex) -> Regex {
        match r {
            Regex::Empty | Regex::Epsilon => Regex::Epsilon,
            Regex::Star(inner) => Regex::Star(inner),
            // (x|)* == x*
            Regex::Alt(items) if items.contains(&Regex::Epsilon) => Self::star(Self::alt_of(
                items.into_iter().filter(|r| *r != Regex::Epsilon).collect(),
            )),
            other => Regex::Star(Box::new(other)),
        }
    }

    fn concat_of(parts: Vec<Regex>) -> Regex {
        let mut out = Vec::with_capacity(parts.len());
        for part in parts {
            match part {
                Regex::Empty => return Regex::Empty,
                Regex::Epsilon => {}
                Regex::Concat(items) => out.extend(items),
                other => out.push(other),
            }
        }
        match out.len() {
            0 => Regex::Epsilon,
            1 => out.remove(0),
            _ => Regex::Concat(out),
        }
    }

    fn alt_of(items: Vec<Regex>) -> Regex {
        let mut class = DigitSet::empty();
        let mut rest: Vec<Regex> = Vec::with_capacity(items.len());
        for item in items {
            match item {
                Regex::Empty => {}
                Regex::Class(set) => class = class.union(set),
                Regex::Alt(inner) => {
                    for r in inner {
                        match r {
                            Regex::Class(set) => class = class.union(set),
                            r if !rest.contains(&r) => rest.push(r),
                            _ => {}
                        }
                    }
                }
                other if !rest.contains(&other) => rest.push(other),
                _ => {}
            }
        }
        if !class.is_empty() {
            rest.push(Regex::Class(class));
        }
        rest.sort();

        if rest.len() > 1 {
            if let Some(factored) = Self::factor_suffix(&rest) {
                return factored;
            }
        }
        match rest.len() {
            0 => Regex::Empty,
            1 => rest.remove(0),
            _ => Regex::Alt(rest),
        }
    }

    /// `a·t | b·t` becomes `(a|b)·t` when every alternative ends in `t`.
    fn factor_suffix(items: &[Regex]) -> Option<Regex> {
        let tails: Vec<&[Regex]> = items.iter().map(Regex::as_sequence).collect();
        let last = tails.first()?.last()?;
        if !tails.iter().all(|seq| seq.last() == Some(last)) {
            return None;
        }
        let prefixes = tails
            .iter()
            .map(|seq| Self::concat_of(seq[..seq.len() - 1].to_vec()))
            .collect();
        Some(Self::concat(Self::alt_of(prefixes), last.clone()))
    }

    fn as_sequence(&self) -> &[Regex] {
        match self {
            Regex::Epsilon => &[],
            Regex::Concat(items) => items,
            other => std::slice::from_ref(other),
        }
    }

    /// Number of nodes in the expression tree.
    pub fn size(&self) -> usize {
        match self {
            Regex::Empty | Regex::Epsilon | Regex::Class(_) => 1,
            Regex::Concat(items) | Regex::Alt(items) => {
                1 + items.iter().map(Regex::size).sum::<usize>()
            }
            Regex::Star(inner) => 1 + inner.size(),
        }
    }

    fn is_optional(&self) -> bool {
        matches!(self, Regex::Alt(items) if items.contains(&Regex::Epsilon))
    }

    fn fmt_atom(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Regex::Empty | Regex::Epsilon | Regex::Class(_) => write!(f, "{}", self),
            _ if self.is_optional() => write!(f, "{}", self),
            _ => write!(f, "({})", self),
        }
    }
}

impl fmt::Display for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // No digit string matches a non-digit
            Regex::Empty => write!(f, "[^0-9]"),
            Regex::Epsilon => write!(f, "()"),
            Regex::Class(set) => write!(f, "{}", set),
            Regex::Concat(items) => {
                for item in items {
                    match item {
                        Regex::Alt(_) => item.fmt_atom(f)?,
                        _ => write!(f, "{}", item)?,
                    }
                }
                Ok(())
            }
            Regex::Alt(items) if self.is_optional() => {
                let rest: Vec<&Regex> = items.iter().filter(|r| **r != Regex::Epsilon).collect();
                match rest.as_slice() {
                    [single] => single.fmt_atom(f)?,
                    _ => {
                        write!(f, "(")?;
                        for (i, item) in rest.iter().enumerate() {
                            if i > 0 {
                                write!(f, "|")?;
                            }
                            write!(f, "{}", item)?;
                        }
                        write!(f, ")")?;
                    }
                }
                write!(f, "?")
            }
            Regex::Alt(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, "|")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
            Regex::Star(inner) => {
                inner.fmt_atom(f)?;
                write!(f, "*")
            }
        }
    }
}

/// Derive a regular expression equivalent to `automaton` using the
/// default node budget.
///
/// # Errors
///
/// Returns [`RegexError::TooLarge`] if the expression outgrows
/// [`DEFAULT_NODE_LIMIT`] nodes.
pub fn derive_regex(automaton: &Automaton) -> Result<Regex, RegexError> {
    derive_regex_with_limit(automaton, DEFAULT_NODE_LIMIT)
}

/// Derive a regular expression equivalent to `automaton`, failing once any
/// intermediate expression exceeds `max_nodes`.
pub fn derive_regex_with_limit(
    automaton: &Automaton,
    max_nodes: usize,
) -> Result<Regex, RegexError> {
    let states: Vec<State> = automaton.states().collect();
    let index: BTreeMap<State, usize> = states.iter().enumerate().map(|(i, s)| (*s, i)).collect();
    let start = states.len();
    let end = start + 1;

    // Generalized transition graph: at most one expression per ordered pair
    let mut graph: BTreeMap<(usize, usize), Regex> = BTreeMap::new();
    let mut labels: BTreeMap<(usize, usize), DigitSet> = BTreeMap::new();
    for (from, digit, to) in automaton.edges() {
        labels
            .entry((index[&from], index[&to]))
            .or_default()
            .insert(digit);
    }
    for (key, set) in labels {
        graph.insert(key, Regex::class(set));
    }
    graph.insert((start, index[&automaton.initial()]), Regex::Epsilon);
    for state in automaton.finals() {
        graph.insert((index[state], end), Regex::Epsilon);
    }

    for k in elimination_order(automaton, &states) {
        let repeat = graph.remove(&(k, k)).map(Regex::star).unwrap_or(Regex::Epsilon);

        let incoming: Vec<(usize, Regex)> = graph
            .iter()
            .filter(|((_, to), _)| *to == k)
            .map(|((from, _), r)| (*from, r.clone()))
            .collect();
        let outgoing: Vec<(usize, Regex)> = graph
            .iter()
            .filter(|((from, _), _)| *from == k)
            .map(|((_, to), r)| (*to, r.clone()))
            .collect();
        graph.retain(|(from, to), _| *from != k && *to != k);

        for (i, into_k) in &incoming {
            for (j, out_of_k) in &outgoing {
                let path = Regex::concat_of(vec![into_k.clone(), repeat.clone(), out_of_k.clone()]);
                let merged = match graph.remove(&(*i, *j)) {
                    Some(existing) => Regex::alt(existing, path),
                    None => path,
                };
                if merged.size() > max_nodes {
                    tracing::debug!(max_nodes, eliminated = k, "regex derivation over budget");
                    return Err(RegexError::TooLarge { limit: max_nodes });
                }
                graph.insert((*i, *j), merged);
            }
        }
    }

    Ok(graph.remove(&(start, end)).unwrap_or(Regex::Empty))
}

/// Indices of `states` in elimination order.
///
/// Layers are breadth-first depths from the initial state. A state at depth
/// `d` is eliminated in round `d.trailing_zeros()`, so each round joins
/// neighbouring layers and halves the number left. Unreachable states go
/// first and the initial state goes last.
fn elimination_order(automaton: &Automaton, states: &[State]) -> Vec<usize> {
    let mut depth: BTreeMap<State, usize> = BTreeMap::from([(automaton.initial(), 0)]);
    let mut queue = VecDeque::from([automaton.initial()]);
    while let Some(state) = queue.pop_front() {
        let next_depth = depth[&state] + 1;
        for (_, next) in automaton.transitions_from(state) {
            if !depth.contains_key(next) {
                depth.insert(*next, next_depth);
                queue.push_back(*next);
            }
        }
    }

    let rank = |i: usize| match depth.get(&states[i]) {
        None => (0, 0),
        Some(&0) => (u32::MAX, 0),
        Some(&d) => (d.trailing_zeros() + 1, d),
    };
    let mut order: Vec<usize> = (0..states.len()).collect();
    order.sort_by_key(|&i| rank(i));
    order
}

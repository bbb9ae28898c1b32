//! Transition table construction.
//!
//! The automaton is a layered DAG: layer `p` holds the states reached after
//! `p` digits, one per live residue. Layers are expanded strictly in order
//! because the live residues of layer `p + 1` are exactly the residues
//! produced while expanding layer `p`. Residues that no legal prefix can
//! produce are never materialised. States with no legal continuation are
//! kept; removing them is the minimizer's job.

use smallvec::SmallVec;
use std::collections::{BTreeMap, BTreeSet};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::automaton::{Automaton, Edges, State};
use crate::synthesis::namer::state_name;
use crate::synthesis::scheme::ChecksumScheme;
use crate::synthesis::weight::WeightFunction;

/// Build the automaton for `scheme`.
pub(crate) fn build<W>(scheme: &ChecksumScheme<W>) -> Automaton
where
    W: WeightFunction + Sync,
{
    let span = tracing::debug_span!(
        "synthesize",
        length = scheme.length(),
        modulus = scheme.modulus()
    );
    let _enter = span.enter();

    let last = scheme.length() - 1;
    let mut transitions: BTreeMap<State, Edges> = BTreeMap::new();
    let mut live: Vec<u32> = vec![0];

    for position in 0..=last {
        let expanded = expand_layer(scheme, position, &live);

        let mut next = BTreeSet::new();
        for (residue, edges) in expanded {
            next.extend(edges.iter().filter_map(|(_, to)| match to {
                State::Working { residue, .. } => Some(*residue),
                _ => None,
            }));
            transitions.insert(state_name(position, residue), edges);
        }
        live = next.into_iter().collect();
        tracing::trace!(position, live = live.len(), "expanded layer");
    }

    let dead = transitions
        .iter()
        .filter(|(_, edges)| edges.is_empty())
        .count();
    if dead > 0 {
        tracing::warn!(dead, "synthesized automaton has states with no way forward");
    }

    let automaton = Automaton::from_sorted(
        State::Initial,
        BTreeSet::from([State::Accept]),
        transitions,
    );
    tracing::debug!(
        states = automaton.state_count(),
        transitions = automaton.transition_count(),
        "synthesized automaton"
    );
    automaton
}

/// Expand every live residue of one layer.
fn expand_layer<W>(
    scheme: &ChecksumScheme<W>,
    position: usize,
    live: &[u32],
) -> Vec<(u32, Edges)>
where
    W: WeightFunction + Sync,
{
    #[cfg(feature = "parallel")]
    let expanded = live
        .par_iter()
        .map(|&residue| (residue, expand_state(scheme, position, residue)))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let expanded = live
        .iter()
        .map(|&residue| (residue, expand_state(scheme, position, residue)))
        .collect();

    expanded
}

/// Outgoing edges of the state at `(position, residue)`.
///
/// Digits outside the position's constraint get no edge. On the last
/// position only digits completing the target residue lead to ACCEPT;
/// elsewhere every allowed digit leads to the next layer.
fn expand_state<W>(scheme: &ChecksumScheme<W>, position: usize, residue: u32) -> Edges
where
    W: WeightFunction,
{
    let modulus = scheme.modulus() as u64;
    let is_last = position + 1 == scheme.length();
    let mut edges: Edges = SmallVec::new();

    for digit in scheme.allowed(position).iter() {
        let sum = (residue as u64 + scheme.weight().weight(position, digit) as u64) % modulus;
        let sum = sum as u32;
        if !is_last {
            edges.push((digit, state_name(position + 1, sum)));
        } else if sum == scheme.target_residue() {
            edges.push((digit, State::Accept));
        }
    }
    edges
}

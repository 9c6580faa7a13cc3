//! Multiset matching against a live state.
//!
//! A rule's left-hand complexes are pattern slots. A witness fills every
//! slot with a concrete state complex, drawing from the state without
//! exceeding any count:
//!
//! ```text
//! state  {A{p}: 2, A{u}: 1}
//! slots  [A{_}, A{_}]
//!
//! slot 0: A{p} (left 1) ─ slot 1: A{p} (left 0)  -> [A{p}, A{p}]
//!                         slot 1: A{u} (left 0)  -> [A{p}, A{u}]
//! slot 0: A{u} (left 0) ─ slot 1: A{p} (left 1)  -> [A{u}, A{p}]
//!                         slot 1: A{u} (none)
//! ```
//!
//! Each branch works on its own version of the state. `LiveState` is a
//! persistent `im::OrdMap`, so a tentative decrement shares everything but
//! the touched path with its parent.

use crate::Complex;
use crate::rule::Rule;
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::trace;

/// Species counts during simulation.
pub type LiveState = im::OrdMap<Complex, u32>;

/// One state complex per pattern slot, in slot order.
pub type Witness = Vec<Complex>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchMode {
    /// Pick one witness uniformly; stochastic simulation needs one.
    #[default]
    Sample,
    /// Return every witness, e.g. to build an explicit transition system.
    Exhaustive,
}

/// Candidate state complexes for each pattern slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchingMap {
    pub slots: Vec<Vec<Complex>>,
}

impl MatchingMap {
    /// Candidates are the present (count > 0) state complexes compatible
    /// with each pattern.
    pub fn new(patterns: &[Complex], state: &LiveState) -> Self {
        let slots = patterns
            .iter()
            .map(|pattern| {
                state
                    .iter()
                    .filter(|&(complex, &count)| count > 0 && pattern.compatible(complex))
                    .map(|(complex, _)| complex.clone())
                    .collect()
            })
            .collect();
        MatchingMap { slots }
    }

    pub fn for_rule(rule: &Rule, state: &LiveState) -> Self {
        Self::new(&rule.lhs_patterns(), state)
    }

    /// Every slot has at least one candidate.
    ///
    /// This does not check counts: two slots may both need the only copy of
    /// a complex, in which case no witness exists.
    pub fn is_applicable(&self) -> bool {
        self.slots.iter().all(|slot| !slot.is_empty())
    }

    pub fn find_all_matches(&self, state: &LiveState) -> Vec<Witness> {
        let witnesses = search(&self.slots, state);
        trace!(slots = self.slots.len(), witnesses = witnesses.len(), "matches enumerated");
        witnesses
    }

    /// `None` when no witness exists; otherwise one random witness or all of
    /// them, depending on `mode`.
    pub fn choose_a_match<R: Rng + ?Sized>(
        &self,
        state: &LiveState,
        mode: MatchMode,
        rng: &mut R,
    ) -> Option<Vec<Witness>> {
        if !self.is_applicable() {
            return None;
        }
        let all = self.find_all_matches(state);
        match mode {
            MatchMode::Exhaustive if all.is_empty() => None,
            MatchMode::Exhaustive => Some(all),
            MatchMode::Sample => all.choose(rng).map(|witness| vec![witness.clone()]),
        }
    }
}

fn search(slots: &[Vec<Complex>], state: &LiveState) -> Vec<Witness> {
    let Some((candidates, rest)) = slots.split_first() else {
        return vec![Vec::new()];
    };

    let mut witnesses = Vec::new();
    for complex in candidates {
        let available = state.get(complex).copied().unwrap_or(0);
        if available == 0 {
            continue;
        }
        let scratch = state.update(complex.clone(), available - 1);
        for tail in search(rest, &scratch) {
            let mut witness = Vec::with_capacity(slots.len());
            witness.push(complex.clone());
            witness.extend(tail);
            witnesses.push(witness);
        }
    }
    witnesses
}

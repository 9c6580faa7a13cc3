//! Rule expansion.
//!
//! A rule with open contexts denotes a family of concrete reactions. Each
//! entangled pair is completed on its own (see `completion.rs`), and the
//! family is the Cartesian product of those completion sets:
//!
//! ```text
//! pairs:        P1            P2
//! completions:  {c11, c12} x  {c21, c22, c23}   -> 6 agent tuples
//!                                               -> 6 rules -> dedup -> Reactions
//! ```
//!
//! Pairs are treated as independent, which holds as long as no agent index
//! appears in two pairs. Rules that break this are outside the supported
//! input.

use super::completion::{CompletedPair, Counterpart, complete};
use super::product::product;
use crate::complex::Reaction;
use crate::rule::{Pair, Rule};
use crate::signature::Signature;
use std::collections::BTreeSet;
use tracing::trace;

/// Every concrete reaction `rule` stands for under `signature`.
pub fn expand(rule: &Rule, signature: &Signature) -> BTreeSet<Reaction> {
    let completions: Vec<Vec<CompletedPair>> = rule
        .pairs
        .iter()
        .map(|pair| {
            let set = match *pair {
                Pair::Entangled { left, right } => {
                    complete(&rule.agents[left], Counterpart::Paired(&rule.agents[right]), signature)
                }
                Pair::Created { right } => complete(&rule.agents[right], Counterpart::Created, signature),
                Pair::Destroyed { left } => complete(&rule.agents[left], Counterpart::Destroyed, signature),
            };
            set.into_iter().collect()
        })
        .collect();

    let combinations = product(&completions);
    trace!(rule = %rule, pairs = rule.pairs.len(), combinations = combinations.cardinality(), "expanding rule");

    let mut reactions = BTreeSet::new();
    for combination in combinations {
        let agents = assemble(rule, &combination);
        reactions.insert(rule.with_agents(agents).to_reaction());
    }
    reactions
}

/// Write the completed agents of one combination back to their positions.
///
/// Every agent keeps its index, so the rule's complex spans stay valid.
/// Positions not covered by any pair keep the written agent.
fn assemble(rule: &Rule, combination: &[&CompletedPair]) -> Vec<crate::Agent> {
    let mut agents = rule.agents.clone();
    for (pair, (left, right)) in rule.pairs.iter().zip(combination.iter().copied()) {
        let (left_idx, right_idx) = match *pair {
            Pair::Entangled { left, right } => (Some(left), Some(right)),
            Pair::Created { right } => (None, Some(right)),
            Pair::Destroyed { left } => (Some(left), None),
        };
        if let (Some(idx), Some(agent)) = (left_idx, left) {
            agents[idx] = agent.clone();
        }
        if let (Some(idx), Some(agent)) = (right_idx, right) {
            agents[idx] = agent.clone();
        }
    }
    agents
}

//! Context completion.
//!
//! Completion fills open states with every value the signature allows. The
//! rule for entangled agents is that an open state is chosen once and carried
//! across the reaction unchanged: `A{_} -> A{_}` completes to `A{p} -> A{p}`
//! and `A{u} -> A{u}`, never `A{p} -> A{u}`. Agents that are created or
//! destroyed have no partner to agree with and are instantiated on their own.
//!
//! ```text
//! (A{_}, A{_})      -> { (A{s}, A{s}) | s in sig[A] }
//! (A{p}, A{u})      -> { (A{p}, A{u}) }
//! Created   A{_}    -> { (None, A{s}) | s in sig[A] }
//! Destroyed A{_}    -> { (A{s}, None) | s in sig[A] }
//! ```
//!
//! Structures apply the same rule atom by atom over every atomic name the
//! signature records for them. An atom missing from one side counts as open
//! there, so every completed structure lists the same atoms that
//! [`instantiate_complex`] produces.
//!
//! Paired agents are assumed to share name and kind, and to be either both
//! open or both concrete. Other inputs are passed through untouched.

use super::product::product;
use crate::signature::Signature;
use crate::{Agent, AtomicAgent, Complex, StructureAgent};
use std::collections::BTreeSet;

/// What stands opposite an agent in an entangled pair.
#[derive(Debug, Clone, Copy)]
pub enum Counterpart<'a> {
    /// The agent is on the left and survives as this right-hand agent.
    Paired(&'a Agent),
    /// The agent is on the right and has no left-hand origin.
    Created,
    /// The agent is on the left and has no right-hand result.
    Destroyed,
}

/// Left and right agent of one completed pair; `None` on a missing side.
pub type CompletedPair = (Option<Agent>, Option<Agent>);

/// Every concrete pairing of `agent` with `other` consistent with `signature`.
pub fn complete(agent: &Agent, other: Counterpart<'_>, signature: &Signature) -> BTreeSet<CompletedPair> {
    match other {
        Counterpart::Paired(right) => match (agent, right) {
            (Agent::Atomic(l), Agent::Atomic(r)) => complete_atomic(l, r, signature)
                .into_iter()
                .map(|(l, r)| (Some(Agent::Atomic(l)), Some(Agent::Atomic(r))))
                .collect(),
            (Agent::Structure(l), Agent::Structure(r)) => complete_structure(l, r, signature)
                .into_iter()
                .map(|(l, r)| (Some(Agent::Structure(l)), Some(Agent::Structure(r))))
                .collect(),
            _ => BTreeSet::from([(Some(agent.clone()), Some(right.clone()))]),
        },
        Counterpart::Created => instantiate(agent, signature).into_iter().map(|a| (None, Some(a))).collect(),
        Counterpart::Destroyed => instantiate(agent, signature).into_iter().map(|a| (Some(a), None)).collect(),
    }
}

/// Every concrete form of a single agent.
pub fn instantiate(agent: &Agent, signature: &Signature) -> Vec<Agent> {
    match agent {
        Agent::Atomic(a) => instantiate_atomic(a, signature).into_iter().map(Agent::Atomic).collect(),
        Agent::Structure(s) => instantiate_structure(s, signature).into_iter().map(Agent::Structure).collect(),
    }
}

/// Every concrete complex compatible with `complex`.
pub fn instantiate_complex(complex: &Complex, signature: &Signature) -> BTreeSet<Complex> {
    let pools: Vec<Vec<Agent>> = complex.agents().iter().map(|a| instantiate(a, signature)).collect();
    product(&pools)
        .map(|combination| Complex::new(combination.into_iter().cloned(), complex.compartment()))
        .collect()
}

fn complete_atomic(left: &AtomicAgent, right: &AtomicAgent, signature: &Signature) -> Vec<(AtomicAgent, AtomicAgent)> {
    if left.state.is_wildcard() && right.state.is_wildcard() {
        signature
            .states(&left.name)
            .iter()
            .map(|state| {
                let concrete = AtomicAgent::new(left.name.clone(), state.clone());
                (concrete.clone(), concrete)
            })
            .collect()
    } else {
        vec![(left.clone(), right.clone())]
    }
}

fn instantiate_atomic(agent: &AtomicAgent, signature: &Signature) -> Vec<AtomicAgent> {
    if agent.state.is_wildcard() {
        signature.states(&agent.name).iter().map(|s| AtomicAgent::new(agent.name.clone(), s.clone())).collect()
    } else {
        vec![agent.clone()]
    }
}

/// Atomic names to complete inside a structure: the signature's, plus any
/// written in the agents themselves.
fn atom_names<'a>(name: &'a str, written: &[&'a StructureAgent], signature: &'a Signature) -> BTreeSet<&'a str> {
    signature
        .atoms(name)
        .iter()
        .map(String::as_str)
        .chain(written.iter().flat_map(|&s| s.composition.iter().map(|a| a.name.as_str())))
        .collect()
}

fn complete_structure(
    left: &StructureAgent,
    right: &StructureAgent,
    signature: &Signature,
) -> Vec<(StructureAgent, StructureAgent)> {
    let pools: Vec<Vec<(AtomicAgent, AtomicAgent)>> = atom_names(&left.name, &[left, right], signature)
        .into_iter()
        .map(|name| {
            let open = AtomicAgent::wildcard(name);
            let l = left.atom(name).unwrap_or(&open);
            let r = right.atom(name).unwrap_or(&open);
            complete_inner(l, r, signature)
        })
        .collect();

    product(&pools)
        .map(|combination| {
            let l = StructureAgent::new(left.name.clone(), combination.iter().map(|(l, _)| l.clone()));
            let r = StructureAgent::new(right.name.clone(), combination.iter().map(|(_, r)| r.clone()));
            (l, r)
        })
        .collect()
}

/// One atom of a paired structure. An open side takes its partner's state,
/// so an atom written on one side only is carried through the reaction.
fn complete_inner(left: &AtomicAgent, right: &AtomicAgent, signature: &Signature) -> Vec<(AtomicAgent, AtomicAgent)> {
    match (left.state.is_wildcard(), right.state.is_wildcard()) {
        (false, true) => vec![(left.clone(), AtomicAgent::new(right.name.clone(), left.state.clone()))],
        (true, false) => vec![(AtomicAgent::new(left.name.clone(), right.state.clone()), right.clone())],
        _ => complete_atomic(left, right, signature),
    }
}

fn instantiate_structure(agent: &StructureAgent, signature: &Signature) -> Vec<StructureAgent> {
    let pools: Vec<Vec<AtomicAgent>> = atom_names(&agent.name, &[agent], signature)
        .into_iter()
        .map(|name| match agent.atom(name) {
            Some(atom) => instantiate_atomic(atom, signature),
            None => instantiate_atomic(&AtomicAgent::wildcard(name), signature),
        })
        .collect();

    product(&pools)
        .map(|combination| StructureAgent::new(agent.name.clone(), combination.into_iter().cloned()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::State;
    use std::collections::BTreeMap;

    fn signature(entries: &[(&str, &[&str])]) -> Signature {
        let atomic: BTreeMap<String, BTreeSet<State>> = entries
            .iter()
            .map(|(name, states)| (name.to_string(), states.iter().map(|s| State::value(*s)).collect()))
            .collect();
        Signature { atomic, structure: BTreeMap::new() }
    }

    #[test]
    fn open_pair_gets_the_same_state_on_both_sides() {
        let sig = signature(&[("A", &["p", "u"][..])]);
        let a = agent!("A{_}");
        let pairs = complete(&a, Counterpart::Paired(&a), &sig);

        assert_eq!(pairs.len(), 2);
        for (l, r) in &pairs {
            assert_eq!(l, r);
        }
        assert!(pairs.contains(&(Some(agent!("A{p}")), Some(agent!("A{p}")))));
    }

    #[test]
    fn concrete_pair_passes_through() {
        let sig = signature(&[("A", &["p", "u"][..])]);
        let (l, r) = (agent!("A{p}"), agent!("A{u}"));
        let pairs = complete(&l, Counterpart::Paired(&r), &sig);
        assert_eq!(pairs, BTreeSet::from([(Some(l), Some(r))]));
    }

    #[test]
    fn created_and_destroyed_agents_are_instantiated_alone() {
        let sig = signature(&[("A", &["p", "u"][..])]);
        let open = agent!("A{_}");

        let created = complete(&open, Counterpart::Created, &sig);
        assert_eq!(
            created,
            BTreeSet::from([(None, Some(agent!("A{p}"))), (None, Some(agent!("A{u}")))])
        );

        let destroyed = complete(&agent!("A{u}"), Counterpart::Destroyed, &sig);
        assert_eq!(destroyed, BTreeSet::from([(Some(agent!("A{u}")), None)]));
    }

    #[test]
    fn structures_complete_atom_by_atom() {
        let mut sig = signature(&[("a", &["x", "y"][..]), ("b", &["1", "2"][..])]);
        sig.structure.insert("S".into(), BTreeSet::from(["a".to_string(), "b".to_string()]));

        let l = agent!("S(a{x})");
        let r = agent!("S(a{y})");
        let pairs = complete(&l, Counterpart::Paired(&r), &sig);

        // `a` is fixed by the rule, `b` is unspecified on both sides and shared.
        assert_eq!(
            pairs,
            BTreeSet::from([
                (Some(agent!("S(a{x},b{1})")), Some(agent!("S(a{y},b{1})"))),
                (Some(agent!("S(a{x},b{2})")), Some(agent!("S(a{y},b{2})"))),
            ])
        );
    }

    #[test]
    fn atom_written_on_one_side_is_carried_across() {
        let mut sig = signature(&[("a", &["x", "y"][..]), ("b", &["1", "2"][..])]);
        sig.structure.insert("S".into(), BTreeSet::from(["a".to_string(), "b".to_string()]));

        let open = complete(&agent!("S(a{x},b{_})"), Counterpart::Paired(&agent!("S(a{y})")), &sig);
        assert_eq!(
            open,
            BTreeSet::from([
                (Some(agent!("S(a{x},b{1})")), Some(agent!("S(a{y},b{1})"))),
                (Some(agent!("S(a{x},b{2})")), Some(agent!("S(a{y},b{2})"))),
            ])
        );

        let fixed = complete(&agent!("S(a{x})"), Counterpart::Paired(&agent!("S(a{y},b{2})")), &sig);
        assert_eq!(fixed, BTreeSet::from([(Some(agent!("S(a{x},b{2})")), Some(agent!("S(a{y},b{2})")))]));

        for (l, r) in open.iter().chain(&fixed) {
            for agent in [l, r].into_iter().flatten() {
                assert!(instantiate(agent, &sig).contains(agent), "{agent} is not fully completed");
            }
        }
    }

    #[test]
    fn instantiating_a_complex_deduplicates_permutations() {
        let sig = signature(&[("A", &["p", "u"][..])]);
        let all = instantiate_complex(&complex!("A{_}.A{_}::cyt"), &sig);
        assert_eq!(
            all,
            BTreeSet::from([complex!("A{p}.A{p}::cyt"), complex!("A{p}.A{u}::cyt"), complex!("A{u}.A{u}::cyt")])
        );
    }
}

//! Signature inference.
//!
//! The signature is the domain context completion draws from: for every
//! atomic name, the set of states observed anywhere in the model, and for
//! every structure name, the atomic names observed inside it. It is a set
//! union over all agents, so the fold is order-independent.

use crate::{Agent, Complex, Rule, State};
use once_cell::sync::Lazy;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

static WILDCARD_ONLY: Lazy<BTreeSet<State>> = Lazy::new(|| BTreeSet::from([State::Wildcard]));
static NO_ATOMS: Lazy<BTreeSet<String>> = Lazy::new(BTreeSet::new);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    pub atomic: BTreeMap<String, BTreeSet<State>>,
    pub structure: BTreeMap<String, BTreeSet<String>>,
}

impl Signature {
    /// Infer the signature of `rules` and the initial complexes, and report
    /// whether every rule carries a rate.
    ///
    /// Atomic names that never carry a concrete state get `{_}`, so lookups
    /// downstream never fail.
    pub fn extract<'a>(rules: &[Rule], init: impl IntoIterator<Item = &'a Complex>) -> (Signature, bool) {
        let mut signature = Signature::default();
        let mut atomic_names: BTreeSet<String> = BTreeSet::new();
        let mut all_rates = true;

        for rule in rules {
            all_rates &= rule.rate.is_some();
            for agent in &rule.agents {
                signature.absorb(agent, &mut atomic_names);
            }
        }
        for complex in init {
            for agent in complex.agents() {
                signature.absorb(agent, &mut atomic_names);
            }
        }
        for name in atomic_names {
            signature.atomic.entry(name).or_insert_with(|| WILDCARD_ONLY.clone());
        }

        debug!(
            atomics = signature.atomic.len(),
            structures = signature.structure.len(),
            all_rates,
            "signature extracted"
        );
        (signature, all_rates)
    }

    fn absorb(&mut self, agent: &Agent, atomic_names: &mut BTreeSet<String>) {
        match agent {
            Agent::Atomic(a) => {
                atomic_names.insert(a.name.clone());
                if !a.state.is_wildcard() {
                    self.atomic.entry(a.name.clone()).or_default().insert(a.state.clone());
                }
            }
            Agent::Structure(s) => {
                let atoms = self.structure.entry(s.name.clone()).or_default();
                atoms.extend(s.composition.iter().map(|a| a.name.clone()));
                for atom in &s.composition {
                    self.absorb(&Agent::Atomic(atom.clone()), atomic_names);
                }
            }
        }
    }

    /// States an atomic named `name` can take; `{_}` for unknown names.
    pub fn states(&self, name: &str) -> &BTreeSet<State> {
        self.atomic.get(name).unwrap_or(&WILDCARD_ONLY)
    }

    /// Atomic names a structure named `name` can contain.
    pub fn atoms(&self, name: &str) -> &BTreeSet<String> {
        self.structure.get(name).unwrap_or(&NO_ATOMS)
    }
}

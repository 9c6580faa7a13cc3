//! Context completion and vectorization for BCSL-style rewrite rules.
//!
//! A model is a set of rules over molecular agents whose states may be left
//! open (`A{_}`). Before the model can be analyzed, every open state has to be
//! completed into the concrete instantiations the model's signature allows.
//! This crate owns that compilation step and the static analyses that sit
//! next to it:
//!
//! - signature inference ([`Signature`])
//! - context completion and rule expansion (`engine::completion`, `engine::expand`)
//! - canonical ordering and vectorization ([`Ordering`], [`VectorModel`])
//! - redundancy detection and context reduction on [`Model`]
//! - backtracking multiset matching for simulation ([`MatchingMap`])

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[macro_use]
mod macros;
mod api;
mod complex;
mod engine;
mod error;
mod loader;
mod model;
mod notation;
mod rate;
mod rule;
mod signature;

pub use api::{
    CompileReport, Options, choose_matches, compile, compile_verbose, eliminate_redundant, locate, reachable, reduce,
};
pub use complex::{Complex, Reaction, Side, VectorReaction};
pub use engine::{
    CompileMetrics, CompileRun, CompletedPair, Counterpart, LiveState, Located, MatchMode, MatchingMap, Ordering,
    Product, RedundancyReport, RuleMetrics, VectorModel, Witness, analyze_redundancy, complete, compile_with_metrics,
    expand, instantiate, instantiate_complex, product,
};
pub use error::{Error, Result};
pub use loader::{ModelFile, RuleSpec, load_model};
pub use model::Model;
pub use rate::Rate;
pub use rule::{Annotation, AnnotationFlags, Pair, Rule};
pub use signature::Signature;

// --- Agent model -------------------------------------------------------------

/// State carried by an atomic agent.
///
/// `Wildcard` means "any state, not fixed yet". It is never a member of an
/// observed signature unless no concrete state was ever seen for the name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum State {
    Wildcard,
    Value(String),
}

impl State {
    pub fn value(s: impl Into<String>) -> Self {
        State::Value(s.into())
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, State::Wildcard)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::Wildcard => f.write_str("_"),
            State::Value(v) => f.write_str(v),
        }
    }
}

/// Named agent with a single state, e.g. `A{p}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AtomicAgent {
    pub name: String,
    pub state: State,
}

impl AtomicAgent {
    pub fn new(name: impl Into<String>, state: State) -> Self {
        AtomicAgent { name: name.into(), state }
    }

    pub fn wildcard(name: impl Into<String>) -> Self {
        Self::new(name, State::Wildcard)
    }

    /// `self` acts as the pattern: equal agents are compatible, and a
    /// wildcard pattern accepts any state of the same name.
    pub fn compatible(&self, other: &AtomicAgent) -> bool {
        self == other || (self.name == other.name && self.state.is_wildcard())
    }

    pub fn reduce_context(&self) -> AtomicAgent {
        AtomicAgent::wildcard(self.name.clone())
    }
}

impl fmt::Display for AtomicAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{{}}}", self.name, self.state)
    }
}

/// Named composite of atomic agents, e.g. `S(a{x},b{_})`.
///
/// Atomics missing from `composition` are unspecified context.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StructureAgent {
    pub name: String,
    pub composition: BTreeSet<AtomicAgent>,
}

impl StructureAgent {
    pub fn new(name: impl Into<String>, composition: impl IntoIterator<Item = AtomicAgent>) -> Self {
        StructureAgent { name: name.into(), composition: composition.into_iter().collect() }
    }

    /// Every atomic of the pattern must be accepted by some atomic of `other`.
    pub fn compatible(&self, other: &StructureAgent) -> bool {
        self.name == other.name && self.composition.iter().all(|a| other.composition.iter().any(|b| a.compatible(b)))
    }

    pub fn reduce_context(&self) -> StructureAgent {
        StructureAgent { name: self.name.clone(), composition: BTreeSet::new() }
    }

    /// Inner atomic named `name`, if present.
    pub fn atom(&self, name: &str) -> Option<&AtomicAgent> {
        self.composition.iter().find(|a| a.name == name)
    }
}

impl fmt::Display for StructureAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (idx, atom) in self.composition.iter().enumerate() {
            if idx > 0 {
                f.write_str(",")?;
            }
            write!(f, "{atom}")?;
        }
        f.write_str(")")
    }
}

/// Any agent that can appear in a rule or a complex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Agent {
    Atomic(AtomicAgent),
    Structure(StructureAgent),
}

impl Agent {
    pub fn atomic(name: impl Into<String>, state: impl Into<String>) -> Self {
        Agent::Atomic(AtomicAgent::new(name, State::value(state)))
    }

    pub fn wildcard(name: impl Into<String>) -> Self {
        Agent::Atomic(AtomicAgent::wildcard(name))
    }

    pub fn name(&self) -> &str {
        match self {
            Agent::Atomic(a) => &a.name,
            Agent::Structure(s) => &s.name,
        }
    }

    /// Agents of different kinds are never compatible.
    pub fn compatible(&self, other: &Agent) -> bool {
        match (self, other) {
            (Agent::Atomic(a), Agent::Atomic(b)) => a.compatible(b),
            (Agent::Structure(a), Agent::Structure(b)) => a.compatible(b),
            _ => false,
        }
    }

    pub fn reduce_context(&self) -> Agent {
        match self {
            Agent::Atomic(a) => Agent::Atomic(a.reduce_context()),
            Agent::Structure(s) => Agent::Structure(s.reduce_context()),
        }
    }

    /// Names of every atomic agent this agent mentions, itself included.
    pub fn atomic_names(&self) -> Vec<&str> {
        match self {
            Agent::Atomic(a) => vec![a.name.as_str()],
            Agent::Structure(s) => s.composition.iter().map(|a| a.name.as_str()).collect(),
        }
    }
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Agent::Atomic(a) => a.fmt(f),
            Agent::Structure(s) => s.fmt(f),
        }
    }
}

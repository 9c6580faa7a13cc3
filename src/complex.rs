//! Complexes, sides and reactions.
//!
//! A `Complex` is one molecular species: a multiset of agents in a
//! compartment. A `Side` is a multiset of complexes, and a `Reaction` is a
//! pair of sides plus a rate. All three keep their contents sorted so that
//! structural equality, hashing and ordering agree.

use crate::engine::Ordering;
use crate::error::{Error, Result};
use crate::rate::Rate;
use crate::Agent;
use serde::{Deserialize, Serialize};
use std::cmp;
use std::collections::BTreeMap;
use std::fmt;

/// Decide whether every element of `patterns` can be paired with a distinct
/// element of `targets` such that `compatible(pattern, target)` holds.
///
/// Sizes are tiny in practice (agents of one complex, complexes of one side),
/// so plain backtracking is enough.
pub(crate) fn perfect_matching<T>(patterns: &[T], targets: &[T], compatible: impl Fn(&T, &T) -> bool) -> bool {
    fn go<T>(patterns: &[T], targets: &[T], used: &mut [bool], compatible: &impl Fn(&T, &T) -> bool) -> bool {
        let Some((first, rest)) = patterns.split_first() else {
            return true;
        };
        for (idx, target) in targets.iter().enumerate() {
            if !used[idx] && compatible(first, target) {
                used[idx] = true;
                if go(rest, targets, used, compatible) {
                    return true;
                }
                used[idx] = false;
            }
        }
        false
    }

    if patterns.len() != targets.len() {
        return false;
    }
    let mut used = vec![false; targets.len()];
    go(patterns, targets, &mut used, &compatible)
}

// --- Complex -----------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Complex {
    agents: Vec<Agent>,
    compartment: String,
}

impl Complex {
    /// Agents are stored sorted; the written order is not significant.
    pub fn new(agents: impl IntoIterator<Item = Agent>, compartment: impl Into<String>) -> Self {
        let mut agents: Vec<Agent> = agents.into_iter().collect();
        agents.sort();
        Complex { agents, compartment: compartment.into() }
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn compartment(&self) -> &str {
        &self.compartment
    }

    /// Coarse shape used as the primary ordering key: size, then agent names.
    pub fn shape(&self) -> (usize, Vec<&str>) {
        (self.agents.len(), self.agents.iter().map(Agent::name).collect())
    }

    /// `self` acts as the pattern; see [`Agent::compatible`].
    pub fn compatible(&self, other: &Complex) -> bool {
        self.compartment == other.compartment && perfect_matching(&self.agents, &other.agents, Agent::compatible)
    }

    pub fn reduce_context(&self) -> Complex {
        Complex::new(self.agents.iter().map(Agent::reduce_context), self.compartment.clone())
    }

    /// Positions in `ordering` holding a complex this one is compatible with.
    pub fn identify_compatible(&self, ordering: &Ordering) -> Vec<usize> {
        ordering.iter().enumerate().filter(|(_, c)| self.compatible(c)).map(|(idx, _)| idx).collect()
    }
}

impl PartialOrd for Complex {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Complex {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        self.shape()
            .cmp(&other.shape())
            .then_with(|| self.compartment.cmp(&other.compartment))
            .then_with(|| self.agents.cmp(&other.agents))
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, agent) in self.agents.iter().enumerate() {
            if idx > 0 {
                f.write_str(".")?;
            }
            write!(f, "{agent}")?;
        }
        write!(f, "::{}", self.compartment)
    }
}

impl From<Complex> for String {
    fn from(c: Complex) -> String {
        c.to_string()
    }
}

impl TryFrom<String> for Complex {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

// --- Side --------------------------------------------------------------------

/// Multiset of complexes on one side of a reaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Side {
    complexes: Vec<Complex>,
}

impl Side {
    pub fn new(complexes: impl IntoIterator<Item = Complex>) -> Self {
        let mut complexes: Vec<Complex> = complexes.into_iter().collect();
        complexes.sort();
        Side { complexes }
    }

    pub fn complexes(&self) -> &[Complex] {
        &self.complexes
    }

    pub fn is_empty(&self) -> bool {
        self.complexes.is_empty()
    }

    /// Multiplicities as `complex -> count`.
    pub fn counts(&self) -> BTreeMap<&Complex, u32> {
        let mut counts = BTreeMap::new();
        for c in &self.complexes {
            *counts.entry(c).or_insert(0) += 1;
        }
        counts
    }

    pub fn compatible(&self, other: &Side) -> bool {
        perfect_matching(&self.complexes, &other.complexes, Complex::compatible)
    }

    /// True if some complex of this side overlaps `agent` in either direction.
    pub fn exists_compatible_agent(&self, agent: &Complex) -> bool {
        self.complexes.iter().any(|c| c.compatible(agent) || agent.compatible(c))
    }

    pub fn reduce_context(&self) -> Side {
        Side::new(self.complexes.iter().map(Complex::reduce_context))
    }

    /// Count vector indexed by `ordering`.
    pub fn to_vector(&self, ordering: &Ordering) -> Result<Vec<u32>> {
        let mut vector = vec![0; ordering.len()];
        for c in &self.complexes {
            let idx = ordering.index_of(c).ok_or_else(|| Error::ComplexOutOfScope { complex: c.to_string() })?;
            vector[idx] += 1;
        }
        Ok(vector)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, c) in self.complexes.iter().enumerate() {
            if idx > 0 {
                f.write_str(" + ")?;
            }
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

// --- Reactions ---------------------------------------------------------------

/// A fully concrete rule: two multisets of complexes and a rate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Reaction {
    pub lhs: Side,
    pub rhs: Side,
    pub rate: Option<Rate>,
}

impl Reaction {
    pub fn new(lhs: Side, rhs: Side, rate: Option<Rate>) -> Self {
        Reaction { lhs, rhs, rate }
    }

    /// Position-wise compatibility of both sides, `self` acting as pattern.
    pub fn compatible(&self, other: &Reaction) -> bool {
        self.lhs.compatible(&other.lhs) && self.rhs.compatible(&other.rhs)
    }

    /// Rewrite both sides as count vectors over `ordering`. The rate is
    /// expected to be vectorized already.
    pub fn to_vector(&self, ordering: &Ordering) -> Result<VectorReaction> {
        Ok(VectorReaction {
            lhs: self.lhs.to_vector(ordering)?,
            rhs: self.rhs.to_vector(ordering)?,
            rate: self.rate.clone(),
        })
    }
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.lhs, self.rhs)?;
        if let Some(rate) = &self.rate {
            write!(f, " @ {rate}")?;
        }
        Ok(())
    }
}

/// A reaction expressed over the coordinate system of an [`Ordering`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VectorReaction {
    pub lhs: Vec<u32>,
    pub rhs: Vec<u32>,
    pub rate: Option<Rate>,
}

impl fmt::Display for VectorReaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} => {:?}", self.lhs, self.rhs)?;
        if let Some(rate) = &self.rate {
            write!(f, " @ {rate}")?;
        }
        Ok(())
    }
}

//! Rules: pattern-based rewrites over agent tuples.
//!
//! A rule stores both sides as one agent sequence split at `mid`, groups the
//! agents into complexes through `(start, end)` spans, and entangles each
//! left agent with its right-hand counterpart through [`Pair`]s.
//!
//! ```text
//! agents:   [ A{_}  B{p} | A{_}.B{u} ]     mid = 2
//! spans:    (0,0) (1,1)    (2,3)
//! pairs:    Entangled(0,2) Entangled(1,3)
//! ```

use crate::complex::{Reaction, Side};
use crate::engine::LiveState;
use crate::error::{Error, Result};
use crate::notation::parse_complex_parts;
use crate::rate::Rate;
use crate::{Agent, Complex};
use std::collections::HashMap;
use std::fmt;

/// How a left-hand agent relates to the right-hand side.
///
/// Indices point into [`Rule::agents`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Pair {
    /// The agent survives the rule; `left < mid <= right`.
    Entangled { left: usize, right: usize },
    /// The agent only exists on the right-hand side.
    Created { right: usize },
    /// The agent only exists on the left-hand side.
    Destroyed { left: usize },
}

bitflags::bitflags! {
    /// Outcome of redundancy analysis attached to a rule.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct AnnotationFlags: u8 {
        const POSSIBLY_REDUNDANT = 1 << 0;
        /// Qualitative models drop the rule when printing.
        const COMMENTED_OUT      = 1 << 1;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Annotation {
    pub flags: AnnotationFlags,
    /// Redundancy groups this rule belongs to.
    pub groups: Vec<u32>,
}

#[derive(Debug, Clone)]
pub struct Rule {
    pub agents: Vec<Agent>,
    /// Index of the first right-hand agent.
    pub mid: usize,
    /// Compartment of each agent position.
    pub compartments: Vec<String>,
    /// Inclusive `(start, end)` spans over `agents`, one per complex.
    pub complexes: Vec<(usize, usize)>,
    pub pairs: Vec<Pair>,
    pub rate: Option<Rate>,
    pub annotation: Annotation,
}

impl PartialEq for Rule {
    fn eq(&self, other: &Self) -> bool {
        self.agents == other.agents
            && self.mid == other.mid
            && self.compartments == other.compartments
            && self.complexes == other.complexes
            && self.pairs == other.pairs
            && self.rate == other.rate
    }
}

impl Eq for Rule {}

impl Rule {
    /// Assemble a rule from complexes given as `(agents, compartment)` in
    /// written order. Pair indices are positions in the concatenated agent
    /// sequence (left side first).
    pub fn from_sides(
        lhs: Vec<(Vec<Agent>, String)>,
        rhs: Vec<(Vec<Agent>, String)>,
        pairs: Vec<Pair>,
        rate: Option<Rate>,
    ) -> Self {
        let mut agents = Vec::new();
        let mut compartments = Vec::new();
        let mut complexes = Vec::new();
        let mut mid = 0;

        for (side, parts) in [lhs, rhs].into_iter().enumerate() {
            for (members, compartment) in parts {
                let start = agents.len();
                for agent in members {
                    agents.push(agent);
                    compartments.push(compartment.clone());
                }
                if agents.len() > start {
                    complexes.push((start, agents.len() - 1));
                }
            }
            if side == 0 {
                mid = agents.len();
            }
        }

        Rule { agents, mid, compartments, complexes, pairs, rate, annotation: Annotation::default() }
    }

    /// Like [`Rule::from_sides`], with complexes written as literals.
    pub fn from_literals(lhs: &[&str], rhs: &[&str], pairs: Vec<Pair>, rate: Option<Rate>) -> Result<Self> {
        let parse = |side: &[&str]| side.iter().map(|s| parse_complex_parts(s)).collect::<Result<Vec<_>>>();
        Ok(Rule::from_sides(parse(lhs)?, parse(rhs)?, pairs, rate))
    }

    /// Check that every pair points at an agent on the expected side.
    ///
    /// Name agreement between paired agents stays the caller's responsibility.
    pub(crate) fn check_indices(&self, rule: usize) -> Result<()> {
        let bad = |reason: String| Err(Error::MalformedRule { rule, reason });
        for pair in &self.pairs {
            let (left, right) = match *pair {
                Pair::Entangled { left, right } => (Some(left), Some(right)),
                Pair::Created { right } => (None, Some(right)),
                Pair::Destroyed { left } => (Some(left), None),
            };
            if let Some(l) = left {
                if l >= self.mid {
                    return bad(format!("left index {l} is not on the left-hand side"));
                }
            }
            if let Some(r) = right {
                if r < self.mid || r >= self.agents.len() {
                    return bad(format!("right index {r} is not on the right-hand side"));
                }
            }
        }
        Ok(())
    }

    /// Same rule with a different agent tuple.
    pub fn with_agents(&self, agents: Vec<Agent>) -> Rule {
        Rule { agents, ..self.clone() }
    }

    /// Slice `agents` into complexes and sort them into left and right sides
    /// by where each span ends.
    pub fn create_complexes(&self) -> (Side, Side) {
        let mut lhs = Vec::new();
        let mut rhs = Vec::new();
        for &(start, end) in &self.complexes {
            let c = Complex::new(self.agents[start..=end].iter().cloned(), self.compartments[start].clone());
            if end < self.mid { lhs.push(c) } else { rhs.push(c) }
        }
        (Side::new(lhs), Side::new(rhs))
    }

    pub fn to_reaction(&self) -> Reaction {
        let (lhs, rhs) = self.create_complexes();
        Reaction::new(lhs, rhs, self.rate.clone())
    }

    /// Left-hand complexes in span order; these are the pattern slots the
    /// match engine fills.
    pub fn lhs_patterns(&self) -> Vec<Complex> {
        self.complexes
            .iter()
            .filter(|&&(_, end)| end < self.mid)
            .map(|&(start, end)| Complex::new(self.agents[start..=end].iter().cloned(), self.compartments[start].clone()))
            .collect()
    }

    pub fn compatible(&self, other: &Rule) -> bool {
        self.to_reaction().compatible(&other.to_reaction())
    }

    /// Generalize every agent (and the rate's species) to its wildcard form.
    pub fn reduce_context(&self) -> Rule {
        Rule {
            agents: self.agents.iter().map(Agent::reduce_context).collect(),
            rate: self.rate.as_ref().map(Rate::reduce_context),
            annotation: Annotation::default(),
            ..self.clone()
        }
    }

    /// A rule is meaningful unless both of its sides are the same multiset.
    pub fn is_meaningful(&self) -> bool {
        let (lhs, rhs) = self.create_complexes();
        lhs != rhs
    }

    pub fn exists_compatible_agent(&self, agent: &Complex) -> bool {
        self.create_complexes().1.exists_compatible_agent(agent)
    }

    /// Evaluate the rate against a live state: each species reference is
    /// valued by the total count of state complexes it is compatible with.
    pub fn evaluate_rate(&self, state: &LiveState, params: &HashMap<String, f64>) -> Result<Option<f64>> {
        let Some(rate) = &self.rate else {
            return Ok(None);
        };
        let (agents, _) = rate.params_and_agents();
        let values: HashMap<Complex, u32> = agents
            .into_iter()
            .map(|agent| {
                let count = state.iter().filter(|(c, _)| agent.compatible(c)).map(|(_, n)| *n).sum();
                (agent, count)
            })
            .collect();
        rate.evaluate_direct(&values, params).map(Some)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let groups = if self.annotation.groups.is_empty() {
            None
        } else {
            let ids: Vec<String> = self.annotation.groups.iter().map(u32::to_string).collect();
            Some(format!("// redundant #{{{}}}", ids.join(", ")))
        };
        let commented = self.annotation.flags.contains(AnnotationFlags::COMMENTED_OUT);

        if let (Some(comment), true) = (&groups, commented) {
            write!(f, "{comment} // ")?;
        }
        write!(f, "{}", self.to_reaction())?;
        if let (Some(comment), false) = (&groups, commented) {
            write!(f, " {comment}")?;
        }
        Ok(())
    }
}

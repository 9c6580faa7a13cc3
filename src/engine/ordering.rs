//! Canonical ordering and vectorization.
//!
//! The ordering is the coordinate system of a compiled model: every concrete
//! complex a rule can produce or consume, plus every initial complex, sorted
//! by a fixed key. Position `i` in the ordering is coordinate `i` in every
//! count vector.
//!
//! ```text
//! rules ── create_complexes ── instantiate_complex ─┐
//!                                                   ├─ BTreeSet ── Vec (sorted)
//! init ─────────────────────────────────────────────┘
//! ```
//!
//! Sorting is by `Complex`'s `Ord` (shape, then compartment, then agents), so
//! the ordering never depends on iteration order of the inputs.

use super::completion::instantiate_complex;
use super::expand::expand;
use super::metrics::{CompileMetrics, CompileRun, RuleMetrics};
use crate::complex::{Complex, VectorReaction};
use crate::error::{Error, Result};
use crate::model::Model;
use crate::rule::{AnnotationFlags, Rule};
use std::collections::BTreeSet;
use std::fmt;
use std::time::Instant;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ordering {
    complexes: Vec<Complex>,
}

/// Where a query complex sits in an [`Ordering`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Located {
    /// The complex itself is a coordinate.
    Exact(usize),
    /// The complex is a pattern; these coordinates are compatible with it.
    Abstract(Vec<usize>),
}

impl Ordering {
    pub fn build(model: &Model) -> Ordering {
        let mut all = BTreeSet::new();
        for rule in model.rules() {
            let (lhs, rhs) = rule.create_complexes();
            for complex in lhs.complexes().iter().chain(rhs.complexes()) {
                all.extend(instantiate_complex(complex, model.signature()));
            }
        }
        all.extend(model.init().keys().cloned());

        let ordering = Ordering { complexes: all.into_iter().collect() };
        debug!(size = ordering.len(), "ordering built");
        ordering
    }

    pub fn from_complexes(complexes: impl IntoIterator<Item = Complex>) -> Ordering {
        let set: BTreeSet<Complex> = complexes.into_iter().collect();
        Ordering { complexes: set.into_iter().collect() }
    }

    pub fn len(&self) -> usize {
        self.complexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.complexes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Complex> {
        self.complexes.iter()
    }

    pub fn get(&self, idx: usize) -> Option<&Complex> {
        self.complexes.get(idx)
    }

    pub fn index_of(&self, complex: &Complex) -> Option<usize> {
        self.complexes.binary_search(complex).ok()
    }

    /// Resolve a query complex to coordinates.
    ///
    /// A complex that is neither a coordinate nor compatible with any is out
    /// of scope; it is reported rather than treated as unreachable.
    pub fn locate(&self, complex: &Complex) -> Result<Located> {
        if let Some(idx) = self.index_of(complex) {
            return Ok(Located::Exact(idx));
        }
        let compatible = complex.identify_compatible(self);
        if compatible.is_empty() {
            return Err(Error::ComplexOutOfScope { complex: complex.to_string() });
        }
        Ok(Located::Abstract(compatible))
    }
}

impl<'a> IntoIterator for &'a Ordering {
    type Item = &'a Complex;
    type IntoIter = std::slice::Iter<'a, Complex>;

    fn into_iter(self) -> Self::IntoIter {
        self.complexes.iter()
    }
}

/// Compiled network handed to the transition-system builder.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorModel {
    pub reactions: Vec<VectorReaction>,
    pub init: Vec<u32>,
    pub ordering: Ordering,
    /// Per-species population ceiling; carried, not enforced.
    pub bound: Option<u32>,
}

impl fmt::Display for VectorModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "#! ordering")?;
        for (idx, complex) in self.ordering.iter().enumerate() {
            writeln!(f, "x_{idx} = {complex}")?;
        }
        writeln!(f, "#! reactions")?;
        for reaction in &self.reactions {
            writeln!(f, "{reaction}")?;
        }
        writeln!(f, "#! init")?;
        writeln!(f, "{:?}", self.init)?;
        if let Some(bound) = self.bound {
            writeln!(f, "#! bound")?;
            writeln!(f, "{bound}")?;
        }
        Ok(())
    }
}

pub fn compile(model: &Model, bound: Option<u32>) -> Result<VectorModel> {
    compile_with_metrics(model, bound).map(|run| run.vector_model)
}

/// [`compile`], also reporting where the time went.
///
/// Rules commented out by redundancy elimination do not contribute
/// reactions, but their complexes still take part in the ordering.
pub fn compile_with_metrics(model: &Model, bound: Option<u32>) -> Result<CompileRun> {
    let start = Instant::now();
    let mut metrics = CompileMetrics::default();

    let ordering = Ordering::build(model);
    metrics.ordering = start.elapsed();

    let expansion_start = Instant::now();
    let mut reactions = BTreeSet::new();
    for (index, rule) in model.rules().iter().enumerate() {
        if rule.annotation.flags.contains(AnnotationFlags::COMMENTED_OUT) {
            continue;
        }
        let rule_start = Instant::now();
        let rule = Rule {
            rate: rule.rate.as_ref().map(|rate| rate.vectorize(&ordering, model.definitions())),
            ..rule.clone()
        };
        let expanded = expand(&rule, model.signature());
        metrics.rules.push(RuleMetrics { index, reactions: expanded.len(), duration: rule_start.elapsed() });
        reactions.extend(expanded);
    }
    metrics.expansion = expansion_start.elapsed();

    let vectorization_start = Instant::now();
    let vectors: BTreeSet<VectorReaction> =
        reactions.iter().map(|reaction| reaction.to_vector(&ordering)).collect::<Result<_>>()?;
    let mut init = vec![0; ordering.len()];
    for (complex, &count) in model.init() {
        let idx = ordering.index_of(complex).ok_or_else(|| Error::ComplexOutOfScope { complex: complex.to_string() })?;
        init[idx] += count;
    }
    metrics.vectorization = vectorization_start.elapsed();
    metrics.total = start.elapsed();

    debug!(
        complexes = ordering.len(),
        reactions = vectors.len(),
        total_us = metrics.total.as_micros() as u64,
        "model compiled"
    );

    Ok(CompileRun {
        vector_model: VectorModel { reactions: vectors.into_iter().collect(), init, ordering, bound },
        metrics,
    })
}

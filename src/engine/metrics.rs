//! Compile run metrics.
//!
//! The intended usage is:
//!
//! - `compile` for normal operation.
//! - `compile_with_metrics` for profiling, and for seeing which rule blew
//!   up when a model compiles to far more reactions than expected.
//!
//! Metrics are opt-in and cheap: a handful of `Instant` reads per rule.

use super::ordering::VectorModel;
use std::time::Duration;

#[derive(Debug, Default, Clone)]
pub struct CompileMetrics {
    /// Total elapsed time for [`compile_with_metrics`](super::compile_with_metrics).
    pub total: Duration,
    /// Time spent building the ordering.
    pub ordering: Duration,
    /// Time spent expanding all rules.
    pub expansion: Duration,
    /// Time spent turning reactions and the initial state into vectors.
    pub vectorization: Duration,
    /// One entry per expanded rule, in rule order.
    pub rules: Vec<RuleMetrics>,
}

/// Expansion outcome for a single rule.
#[derive(Debug, Default, Clone)]
pub struct RuleMetrics {
    /// Position of the rule in the model.
    pub index: usize,
    /// Distinct concrete reactions the rule expanded to.
    pub reactions: usize,
    pub duration: Duration,
}

impl CompileMetrics {
    /// Reactions produced before cross-rule deduplication.
    pub fn expanded_reactions(&self) -> usize {
        self.rules.iter().map(|r| r.reactions).sum()
    }
}

/// Compiled model bundled with timing information.
#[derive(Debug, Clone)]
pub struct CompileRun {
    pub vector_model: VectorModel,
    pub metrics: CompileMetrics,
}

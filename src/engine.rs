//! Compilation and analysis engine.
//!
//! The engine turns a [`Model`](crate::Model) with open contexts into a fully
//! concrete, vectorized reaction network, and hosts the static analyses and
//! the simulation-time matcher that work on the same rule representation.
//!
//! ## How the parts work together
//!
//! ```text
//! rules + init ── Signature::extract ──┐        (signature.rs)
//!                                      │
//!                                      v
//!                     complete / instantiate     (completion.rs)
//!                       - one pair  -> concrete pairs
//!                       - one agent -> concrete agents
//!                                      │
//!              ┌───────────────────────┴─────────────┐
//!              v                                     v
//!     expand (expand.rs)                  Ordering::build (ordering.rs)
//!       - lazy product over pairs           - every reachable concrete complex
//!       - dedup into Reactions              - sorted, deduplicated
//!              │                                     │
//!              └──────────────┬──────────────────────┘
//!                             v
//!                     compile (ordering.rs)
//!                       - Reaction -> VectorReaction
//!                       - init -> count vector
//!                             │
//!                             v
//!                        VectorModel
//! ```
//!
//! Off to the side:
//!
//! - `redundancy.rs`: pairwise rule comparison, returns group ids.
//! - `reduce.rs`: generalizes rules and initial complexes to wildcard form.
//! - `matching.rs`: backtracking multiset matching over a live state.
//! - `metrics.rs`: timing and per-rule counts for a compile run.
//!
//! ## Debugging
//!
//! Every stage logs through `tracing`; the CLI reads its filter from
//! `BCSL_LOG` (for example `BCSL_LOG=bcsl=debug`).

#[path = "engine/completion.rs"]
mod completion;
#[path = "engine/expand.rs"]
mod expand;
#[path = "engine/matching.rs"]
mod matching;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/ordering.rs"]
mod ordering;
#[path = "engine/product.rs"]
mod product;
#[path = "engine/reduce.rs"]
mod reduce;
#[path = "engine/redundancy.rs"]
mod redundancy;
#[cfg(test)]
#[path = "engine/tests.rs"]
mod tests;

pub use completion::{CompletedPair, Counterpart, complete, instantiate, instantiate_complex};
pub use expand::expand;
pub use matching::{LiveState, MatchMode, MatchingMap, Witness};
pub use metrics::{CompileMetrics, CompileRun, RuleMetrics};
pub use ordering::{Located, Ordering, VectorModel, compile, compile_with_metrics};
pub use product::{Product, product};
pub(crate) use reduce::{reduce_init, reduce_rules};
pub use redundancy::{RedundancyReport, analyze_redundancy};

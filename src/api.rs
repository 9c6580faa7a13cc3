use crate::engine::{self, CompileMetrics, Located, LiveState, MatchMode, MatchingMap, VectorModel, Witness};
use crate::error::Result;
use crate::model::Model;
use crate::rule::Rule;
use crate::Complex;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Duration;

/// Options that affect compilation and matching.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Per-species population ceiling passed through to the vector model.
    pub bound: Option<u32>,
    /// Whether [`choose_matches`] samples one witness or returns all.
    pub match_mode: MatchMode,
    /// Seed for witness sampling. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Options {
    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Result from [`compile_verbose`].
///
/// Meant for debugging and performance inspection: the compiled model plus
/// enough per-rule detail to see where reactions come from.
#[derive(Debug, Clone)]
pub struct CompileReport {
    pub vector_model: VectorModel,
    pub metrics: CompileMetrics,
    /// Printed form of each rule, in model order.
    pub rules: Vec<String>,
    /// Total elapsed time spent compiling.
    pub elapsed: Duration,
}

/// Compile `model` into a vectorized reaction network.
///
/// # Example
/// ```
/// use bcsl::{Model, Options, compile};
///
/// let model = Model::from_json(r#"{
///     "rules": [{ "lhs": ["A{_}::cyt"], "rhs": ["A{_}::nuc"], "pairs": [[0, 0]], "rate": { "param": "k" } }],
///     "init": { "A{p}::cyt": 1, "A{u}::cyt": 1 }
/// }"#).unwrap();
///
/// let vm = compile(&model, &Options::default()).unwrap();
/// assert_eq!(vm.reactions.len(), 2);
/// assert_eq!(vm.ordering.len(), 4);
/// ```
pub fn compile(model: &Model, options: &Options) -> Result<VectorModel> {
    engine::compile(model, options.bound)
}

/// Compile `model` and return timing and per-rule details alongside.
pub fn compile_verbose(model: &Model, options: &Options) -> Result<CompileReport> {
    let run = engine::compile_with_metrics(model, options.bound)?;
    Ok(CompileReport {
        elapsed: run.metrics.total,
        rules: model.rules().iter().map(Rule::to_string).collect(),
        vector_model: run.vector_model,
        metrics: run.metrics,
    })
}

pub fn reduce(model: &Model) -> Model {
    model.reduce_context()
}

pub fn eliminate_redundant(model: &Model) -> Model {
    model.eliminate_redundant()
}

/// Whether any rule can produce a complex compatible with `literal`.
pub fn reachable(model: &Model, literal: &str) -> Result<bool> {
    let complex: Complex = literal.parse()?;
    Ok(model.static_non_reachability(&complex))
}

/// Coordinates of `literal` in the model's ordering.
pub fn locate(model: &Model, literal: &str) -> Result<Located> {
    let complex: Complex = literal.parse()?;
    model.build_ordering().locate(&complex)
}

/// Witnesses for applying `rule` to `state`, per `options.match_mode`.
pub fn choose_matches(rule: &Rule, state: &LiveState, options: &Options) -> Option<Vec<Witness>> {
    let map = MatchingMap::for_rule(rule, state);
    map.choose_a_match(state, options.match_mode, &mut options.rng())
}

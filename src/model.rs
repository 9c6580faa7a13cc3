//! The model: rules, initial state and the artifacts derived from them.
//!
//! A `Model` is immutable. The signature and the `all_rates` flag are
//! derived once in [`Model::new`]; reduction and redundancy elimination
//! return new models instead of editing this one.

use crate::engine::{self, Ordering, VectorModel, analyze_redundancy, reduce_init, reduce_rules};
use crate::error::Result;
use crate::rule::{AnnotationFlags, Rule};
use crate::signature::Signature;
use crate::Complex;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    rules: Vec<Rule>,
    init: BTreeMap<Complex, u32>,
    definitions: BTreeMap<String, f64>,
    params: BTreeSet<String>,
    signature: Signature,
    all_rates: bool,
}

impl Model {
    pub fn new(
        rules: Vec<Rule>,
        init: BTreeMap<Complex, u32>,
        definitions: BTreeMap<String, f64>,
        params: BTreeSet<String>,
    ) -> Self {
        let (signature, all_rates) = Signature::extract(&rules, init.keys());
        Model { rules, init, definitions, params, signature, all_rates }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn init(&self) -> &BTreeMap<Complex, u32> {
        &self.init
    }

    pub fn definitions(&self) -> &BTreeMap<String, f64> {
        &self.definitions
    }

    pub fn params(&self) -> &BTreeSet<String> {
        &self.params
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// False when some rule has no rate: the model is qualitative.
    pub fn all_rates(&self) -> bool {
        self.all_rates
    }

    pub fn build_ordering(&self) -> Ordering {
        Ordering::build(self)
    }

    pub fn to_vector_model(&self, bound: Option<u32>) -> Result<VectorModel> {
        engine::compile(self, bound)
    }

    /// Copy of the model with redundancy annotations on its rules.
    ///
    /// Quantitative models only get the annotation; qualitative ones also
    /// have covered rules commented out.
    pub fn eliminate_redundant(&self) -> Model {
        let report = analyze_redundancy(&self.rules, self.all_rates);
        let rules = self
            .rules
            .iter()
            .enumerate()
            .map(|(idx, rule)| {
                let mut rule = rule.clone();
                if let Some(groups) = report.groups.get(&idx) {
                    rule.annotation.groups = groups.clone();
                    rule.annotation.flags |= AnnotationFlags::POSSIBLY_REDUNDANT;
                }
                if report.eliminable.contains(&idx) {
                    rule.annotation.flags |= AnnotationFlags::COMMENTED_OUT;
                }
                rule
            })
            .collect();
        Model { rules, ..self.clone() }
    }

    /// Generalize every rule and initial complex to wildcard form.
    pub fn reduce_context(&self) -> Model {
        Model::new(reduce_rules(&self.rules), reduce_init(&self.init), self.definitions.clone(), self.params.clone())
    }

    /// True iff some rule produces a complex compatible with `complex`.
    ///
    /// A `false` answer proves the complex can never be created by a rule.
    pub fn static_non_reachability(&self, complex: &Complex) -> bool {
        self.rules.iter().any(|rule| rule.exists_compatible_agent(complex))
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "#! rules")?;
        for rule in &self.rules {
            writeln!(f, "{rule}")?;
        }
        if !self.init.is_empty() {
            writeln!(f, "\n#! inits")?;
            for (complex, count) in &self.init {
                writeln!(f, "{count} {complex}")?;
            }
        }
        if !self.definitions.is_empty() {
            writeln!(f, "\n#! definitions")?;
            for (name, value) in &self.definitions {
                writeln!(f, "{name} = {value}")?;
            }
        }
        Ok(())
    }
}

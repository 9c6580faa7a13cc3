//! JSON model files.
//!
//! The rule language has its own front end; this loader reads the already
//! parsed shape of a model:
//!
//! ```json
//! {
//!   "rules": [
//!     { "lhs": ["A{_}::cyt"], "rhs": ["A{_}::nuc"], "pairs": [[0, 0]], "rate": { "param": "k" } }
//!   ],
//!   "init": { "A{p}::cyt": 10 },
//!   "definitions": { "k": 0.1 },
//!   "params": []
//! }
//! ```
//!
//! Pair indices count agents within their own side, so `[0, 0]` joins the
//! first left agent with the first right agent. `null` marks a created or
//! destroyed agent.

use crate::error::{Error, Result};
use crate::model::Model;
use crate::notation::parse_complex_parts;
use crate::rate::Rate;
use crate::rule::{Pair, Rule};
use crate::Complex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelFile {
    pub rules: Vec<RuleSpec>,
    #[serde(default)]
    pub init: BTreeMap<Complex, u32>,
    #[serde(default)]
    pub definitions: BTreeMap<String, f64>,
    #[serde(default)]
    pub params: BTreeSet<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSpec {
    pub lhs: Vec<String>,
    pub rhs: Vec<String>,
    #[serde(default)]
    pub pairs: Vec<(Option<usize>, Option<usize>)>,
    #[serde(default)]
    pub rate: Option<Rate>,
}

impl RuleSpec {
    /// Build the rule, turning side-relative pair indices into positions in
    /// the concatenated agent sequence.
    pub fn to_rule(&self, idx: usize) -> Result<Rule> {
        let parse = |side: &[String]| side.iter().map(|s| parse_complex_parts(s)).collect::<Result<Vec<_>>>();
        let (lhs, rhs) = (parse(&self.lhs)?, parse(&self.rhs)?);
        let mid: usize = lhs.iter().map(|(agents, _)| agents.len()).sum();

        let pairs = self
            .pairs
            .iter()
            .map(|&pair| match pair {
                (Some(left), Some(right)) => Ok(Pair::Entangled { left, right: mid + right }),
                (None, Some(right)) => Ok(Pair::Created { right: mid + right }),
                (Some(left), None) => Ok(Pair::Destroyed { left }),
                (None, None) => Err(Error::MalformedRule { rule: idx, reason: "pair with no agent on either side".into() }),
            })
            .collect::<Result<Vec<_>>>()?;

        let rule = Rule::from_sides(lhs, rhs, pairs, self.rate.clone());
        rule.check_indices(idx)?;
        Ok(rule)
    }
}

impl ModelFile {
    pub fn into_model(self) -> Result<Model> {
        let rules = self.rules.iter().enumerate().map(|(idx, spec)| spec.to_rule(idx)).collect::<Result<Vec<_>>>()?;
        Ok(Model::new(rules, self.init, self.definitions, self.params))
    }
}

impl Model {
    pub fn from_json(json: &str) -> Result<Model> {
        serde_json::from_str::<ModelFile>(json)?.into_model()
    }
}

pub fn load_model(path: impl AsRef<Path>) -> Result<Model> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let model = Model::from_json(&text)?;
    debug!(path = %path.display(), rules = model.rules().len(), init = model.init().len(), "model loaded");
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIMERIZATION: &str = r#"{
        "rules": [
            { "lhs": ["A{_}::cyt", "B{p}::cyt"], "rhs": ["A{_}.B{p}::cyt"], "pairs": [[0, 0], [1, 1]],
              "rate": { "mul": [{ "param": "k" }, { "species": "A{_}::cyt" }] } },
            { "lhs": [], "rhs": ["B{p}::cyt"], "pairs": [[null, 0]], "rate": { "const": 2.0 } }
        ],
        "init": { "A{p}::cyt": 3, "B{p}::cyt": 1 },
        "definitions": { "k": 0.25 }
    }"#;

    #[test]
    fn pair_indices_are_side_relative() {
        let model = Model::from_json(DIMERIZATION).unwrap();
        let rules = model.rules();

        assert_eq!(rules[0].pairs, vec![Pair::Entangled { left: 0, right: 2 }, Pair::Entangled { left: 1, right: 3 }]);
        assert_eq!(rules[1].pairs, vec![Pair::Created { right: 0 }]);
        assert_eq!(model.init()[&complex!("A{p}::cyt")], 3);
        assert!(model.all_rates());
        assert!(model.params().is_empty());
    }

    #[test]
    fn out_of_range_pair_is_a_malformed_rule() {
        let json = r#"{ "rules": [ { "lhs": ["A{p}::cyt"], "rhs": ["A{u}::cyt"], "pairs": [[0, 4]] } ] }"#;
        let err = Model::from_json(json).unwrap_err();
        assert!(matches!(err, Error::MalformedRule { rule: 0, .. }));
    }

    #[test]
    fn bad_literal_is_a_notation_error() {
        let json = r#"{ "rules": [ { "lhs": ["A{p}"], "rhs": [], "pairs": [[0, null]] } ] }"#;
        assert!(matches!(Model::from_json(json).unwrap_err(), Error::Notation { .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_model("/nonexistent/bcsl/model.json").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}

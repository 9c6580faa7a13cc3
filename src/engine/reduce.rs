//! Context reduction.
//!
//! The inverse of completion: every agent is generalized to its wildcard
//! form. Rules whose sides become the same multiset do nothing and are
//! dropped; rules that collapse onto an earlier reduced rule are dropped too.
//!
//! Initial complexes can collide the same way (`A{p}` and `A{u}` both become
//! `A{_}`). Their counts are summed so no population is lost.

use crate::Complex;
use crate::rule::Rule;
use std::collections::BTreeMap;
use tracing::{debug, trace};

pub(crate) fn reduce_rules(rules: &[Rule]) -> Vec<Rule> {
    let mut reduced: Vec<Rule> = Vec::with_capacity(rules.len());
    for (idx, rule) in rules.iter().enumerate() {
        let general = rule.reduce_context();
        if !general.is_meaningful() {
            trace!(rule = idx, reduced = %general, "dropping rule with no effect");
            continue;
        }
        if reduced.contains(&general) {
            trace!(rule = idx, reduced = %general, "dropping duplicate rule");
            continue;
        }
        reduced.push(general);
    }
    debug!(before = rules.len(), after = reduced.len(), "rules reduced");
    reduced
}

pub(crate) fn reduce_init(init: &BTreeMap<Complex, u32>) -> BTreeMap<Complex, u32> {
    let mut reduced = BTreeMap::new();
    for (complex, count) in init {
        *reduced.entry(complex.reduce_context()).or_insert(0) += count;
    }
    reduced
}

//! Redundancy analysis.
//!
//! Two rules are redundant when their reactions are compatible, in either
//! direction: one rule's pattern accepts the other's sides. Every unordered
//! compatible pair gets its own group id, starting at 1, and both rules record
//! it, so the relation is symmetric by construction.
//!
//! The pass is pure. It returns a report keyed by rule position and leaves it
//! to the caller (`Model::eliminate_redundant`) to build annotated copies.
//!
//! In a quantitative model rates may tell two compatible rules apart, so
//! nothing is eliminated. In a qualitative model the covered rule of each
//! pair is eliminable: the one whose reaction the other accepts as a pattern,
//! or the later one when they accept each other. Some rule covering every
//! eliminated one always survives.

use crate::rule::Rule;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedundancyReport {
    /// Rule position -> ids of the redundancy groups it belongs to.
    pub groups: BTreeMap<usize, Vec<u32>>,
    /// Rules that can be dropped without changing qualitative behavior.
    pub eliminable: BTreeSet<usize>,
}

impl RedundancyReport {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of groups assigned.
    pub fn group_count(&self) -> usize {
        self.groups.values().flatten().collect::<BTreeSet<_>>().len()
    }
}

pub fn analyze_redundancy(rules: &[Rule], all_rates: bool) -> RedundancyReport {
    let reactions: Vec<_> = rules.iter().map(Rule::to_reaction).collect();
    let mut report = RedundancyReport::default();
    let mut next_group = 1u32;

    for i in 0..reactions.len() {
        for j in (i + 1)..reactions.len() {
            let (a, b) = (&reactions[i], &reactions[j]);
            let (a_covers_b, b_covers_a) = (a.compatible(b), b.compatible(a));
            if !(a_covers_b || b_covers_a) {
                continue;
            }
            report.groups.entry(i).or_default().push(next_group);
            report.groups.entry(j).or_default().push(next_group);
            if !all_rates {
                report.eliminable.insert(if a_covers_b { j } else { i });
            }
            next_group += 1;
        }
    }

    debug!(
        rules = rules.len(),
        groups = next_group - 1,
        eliminable = report.eliminable.len(),
        "redundancy analysis done"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate::Rate;
    use crate::rule::Pair;

    fn conversion(lhs: &str, rhs: &str) -> Rule {
        Rule::from_literals(&[lhs], &[rhs], vec![Pair::Entangled { left: 0, right: 1 }], Some(Rate::param("k")))
            .unwrap()
    }

    #[test]
    fn general_rule_covers_specific_rule() {
        let rules = vec![
            conversion("A{_}::cyt", "A{_}::nuc"),
            conversion("A{p}::cyt", "A{p}::nuc"),
            conversion("B{p}::cyt", "B{p}::nuc"),
        ];
        let report = analyze_redundancy(&rules, true);

        assert_eq!(report.groups, BTreeMap::from([(0, vec![1]), (1, vec![1])]));
        assert!(report.eliminable.is_empty());
        assert_eq!(report.group_count(), 1);
    }

    #[test]
    fn qualitative_models_keep_the_covering_rule() {
        let rules = vec![
            conversion("A{p}::cyt", "A{p}::nuc"),
            conversion("A{_}::cyt", "A{_}::nuc"),
            conversion("A{p}::cyt", "A{p}::nuc"),
        ];
        let report = analyze_redundancy(&rules, false);

        assert_eq!(report.groups[&0], vec![1, 2]);
        assert_eq!(report.groups[&1], vec![1, 3]);
        assert_eq!(report.groups[&2], vec![2, 3]);
        // Rule 1 covers both copies of the specific rule.
        assert_eq!(report.eliminable, BTreeSet::from([0, 2]));
    }

    #[test]
    fn unrelated_rules_get_no_group() {
        let rules = vec![conversion("A{p}::cyt", "A{u}::cyt"), conversion("A{u}::cyt", "A{p}::cyt")];
        assert!(analyze_redundancy(&rules, false).is_empty());
    }
}

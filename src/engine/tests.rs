use super::*;
use crate::complex::{Reaction, Side};
use crate::model::Model;
use crate::rate::Rate;
use crate::rule::{Pair, Rule};
use crate::signature::Signature;
use crate::{Agent, Complex, State};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap};

fn signature_of(init: &[&str]) -> Signature {
    let complexes: Vec<Complex> = init.iter().map(|s| s.parse().unwrap()).collect();
    Signature::extract(&[], &complexes).0
}

fn side(literals: &[&str]) -> Side {
    Side::new(literals.iter().map(|s| s.parse::<Complex>().unwrap()))
}

#[test]
fn expansion_scenarios() {
    let sig = signature_of(&["A{p}::cyt", "A{u}::cyt", "B{x}::cyt"]);

    // (lhs, rhs, pairs, expected concrete (lhs, rhs) sides)
    let cases: Vec<Scenario<'_>> = vec![
        (
            vec!["A{_}::cyt"],
            vec!["A{_}::cyt"],
            vec![Pair::Entangled { left: 0, right: 1 }],
            vec![(vec!["A{p}::cyt"], vec!["A{p}::cyt"]), (vec!["A{u}::cyt"], vec!["A{u}::cyt"])],
        ),
        (
            vec!["A{_}::cyt"],
            vec![],
            vec![Pair::Destroyed { left: 0 }],
            vec![(vec!["A{p}::cyt"], vec![]), (vec!["A{u}::cyt"], vec![])],
        ),
        (
            vec![],
            vec!["A{_}::nuc"],
            vec![Pair::Created { right: 0 }],
            vec![(vec![], vec!["A{p}::nuc"]), (vec![], vec!["A{u}::nuc"])],
        ),
        (
            vec!["A{_}::cyt", "B{_}::cyt"],
            vec!["A{_}.B{_}::cyt"],
            vec![Pair::Entangled { left: 0, right: 2 }, Pair::Entangled { left: 1, right: 3 }],
            vec![(vec!["A{p}::cyt", "B{x}::cyt"], vec!["A{p}.B{x}::cyt"]), (vec!["A{u}::cyt", "B{x}::cyt"], vec!["A{u}.B{x}::cyt"])],
        ),
        (
            vec!["A{p}.B{x}::cyt"],
            vec!["A{u}::cyt", "B{x}::cyt"],
            vec![Pair::Entangled { left: 0, right: 2 }, Pair::Entangled { left: 1, right: 3 }],
            vec![(vec!["A{p}.B{x}::cyt"], vec!["A{u}::cyt", "B{x}::cyt"])],
        ),
    ];

    check_expansions(&sig, cases);
}

type Scenario<'a> = (Vec<&'a str>, Vec<&'a str>, Vec<Pair>, Vec<(Vec<&'a str>, Vec<&'a str>)>);

fn check_expansions(sig: &Signature, cases: Vec<Scenario<'_>>) {
    for (lhs, rhs, pairs, expected) in cases {
        let rule = Rule::from_literals(&lhs, &rhs, pairs, Some(Rate::param("k"))).unwrap();
        let expected: BTreeSet<Reaction> =
            expected.into_iter().map(|(l, r)| Reaction::new(side(&l), side(&r), Some(Rate::param("k")))).collect();
        assert_eq!(expand(&rule, sig), expected, "rule {rule}");
    }
}

#[test]
fn structure_expansion_scenarios() {
    // S has atoms a in {x, y} and b in {1, 2}.
    let sig = signature_of(&["S(a{x},b{1})::cyt", "S(a{y},b{2})::cyt"]);

    let cases: Vec<Scenario<'_>> = vec![
        (
            vec!["S(a{x})::cyt"],
            vec!["S(a{y})::cyt"],
            vec![Pair::Entangled { left: 0, right: 1 }],
            vec![
                (vec!["S(a{x},b{1})::cyt"], vec!["S(a{y},b{1})::cyt"]),
                (vec!["S(a{x},b{2})::cyt"], vec!["S(a{y},b{2})::cyt"]),
            ],
        ),
        (
            vec!["S(a{x},b{_})::cyt"],
            vec!["S(a{y})::cyt"],
            vec![Pair::Entangled { left: 0, right: 1 }],
            vec![
                (vec!["S(a{x},b{1})::cyt"], vec!["S(a{y},b{1})::cyt"]),
                (vec!["S(a{x},b{2})::cyt"], vec!["S(a{y},b{2})::cyt"]),
            ],
        ),
        (
            vec!["S(a{x},b{1})::cyt"],
            vec!["S(a{y})::cyt"],
            vec![Pair::Entangled { left: 0, right: 1 }],
            vec![(vec!["S(a{x},b{1})::cyt"], vec!["S(a{y},b{1})::cyt"])],
        ),
        (
            vec!["S(b{2})::cyt"],
            vec![],
            vec![Pair::Destroyed { left: 0 }],
            vec![(vec!["S(a{x},b{2})::cyt"], vec![]), (vec!["S(a{y},b{2})::cyt"], vec![])],
        ),
        (
            vec![],
            vec!["S(b{1})::nuc"],
            vec![Pair::Created { right: 0 }],
            vec![(vec![], vec!["S(a{x},b{1})::nuc"]), (vec![], vec!["S(a{y},b{1})::nuc"])],
        ),
    ];

    check_expansions(&sig, cases);
}

#[test]
fn destroyed_agent_leaves_an_empty_right_side() {
    let sig = signature_of(&["A{p}::cyt", "A{u}::cyt"]);
    let rule = Rule::from_literals(&["A{_}::cyt"], &[], vec![Pair::Destroyed { left: 0 }], None).unwrap();
    for reaction in expand(&rule, &sig) {
        assert!(reaction.rhs.is_empty());
        assert_eq!(reaction.lhs.complexes().len(), 1);
    }
}

#[test]
fn compile_vectorizes_reactions_init_and_rates() {
    let model = Model::from_json(
        r#"{
            "rules": [{ "lhs": ["A{_}::cyt"], "rhs": ["A{_}::nuc"], "pairs": [[0, 0]],
                        "rate": { "mul": [{ "param": "k" }, { "species": "A{_}::cyt" }] } }],
            "init": { "A{p}::cyt": 3, "A{u}::cyt": 1 },
            "definitions": { "k": 0.5 }
        }"#,
    )
    .unwrap();
    let run = compile_with_metrics(&model, Some(10)).unwrap();
    let vm = &run.vector_model;

    let literals: Vec<String> = vm.ordering.iter().map(Complex::to_string).collect();
    assert_eq!(literals, vec!["A{p}::cyt", "A{u}::cyt", "A{p}::nuc", "A{u}::nuc"]);
    assert_eq!(vm.init, vec![3, 1, 0, 0]);
    assert_eq!(vm.bound, Some(10));
    assert_eq!(vm.reactions.len(), 2);
    assert!(vm.reactions.iter().any(|r| r.lhs == vec![1, 0, 0, 0] && r.rhs == vec![0, 0, 1, 0]));

    let rate = vm.reactions[0].rate.as_ref().unwrap();
    assert_eq!(rate.to_string(), "0.5 * (x_0 + x_1)");
    assert_eq!(rate.evaluate_vector(&vm.init, &HashMap::new()).unwrap(), 2.0);

    assert_eq!(run.metrics.rules.len(), 1);
    assert_eq!(run.metrics.expanded_reactions(), 2);
}

#[test]
fn compile_places_every_structure_reaction_in_the_ordering() {
    let model = Model::from_json(
        r#"{
            "rules": [
                { "lhs": ["S(a{x},b{_})::cyt"], "rhs": ["S(a{y})::cyt"], "pairs": [[0, 0]] },
                { "lhs": [], "rhs": ["S(a{x})::nuc"], "pairs": [[null, 0]] },
                { "lhs": ["S(b{_})::nuc"], "rhs": [], "pairs": [[0, null]] }
            ],
            "init": { "S(a{x},b{1})::cyt": 1 }
        }"#,
    )
    .unwrap();
    let vm = compile(&model, None).unwrap();

    assert_eq!(vm.ordering, model.build_ordering());
    for rule in model.rules() {
        for reaction in expand(rule, model.signature()) {
            for complex in reaction.lhs.complexes().iter().chain(reaction.rhs.complexes()) {
                assert!(vm.ordering.index_of(complex).is_some(), "{complex} has no coordinate");
            }
        }
    }

    let cyt = vm.ordering.index_of(&complex!("S(a{x},b{1})::cyt")).unwrap();
    let moved = vm.ordering.index_of(&complex!("S(a{y},b{1})::cyt")).unwrap();
    assert!(vm.reactions.iter().any(|r| r.lhs[cyt] == 1 && r.rhs[moved] == 1));
    assert_eq!(vm.init[cyt], 1);
}

#[test]
fn commented_out_rules_do_not_contribute_reactions() {
    let model = Model::from_json(
        r#"{
            "rules": [
                { "lhs": ["A{_}::cyt"], "rhs": ["A{_}::nuc"], "pairs": [[0, 0]] },
                { "lhs": ["A{p}::cyt"], "rhs": ["A{p}::nuc"], "pairs": [[0, 0]] }
            ],
            "init": { "A{u}::cyt": 1 }
        }"#,
    )
    .unwrap()
    .eliminate_redundant();

    let vm = compile(&model, None).unwrap();
    assert_eq!(vm.reactions.len(), 2);
    assert_eq!(compile_with_metrics(&model, None).unwrap().metrics.rules.len(), 1);
}

#[test]
fn matching_scenario_from_two_wildcard_slots() {
    let state: LiveState = [(complex!("A{p}::cyt"), 2u32), (complex!("A{u}::cyt"), 1u32)].into_iter().collect();
    let rule = Rule::from_literals(
        &["A{_}::cyt", "A{_}::cyt"],
        &["A{_}.A{_}::cyt"],
        vec![Pair::Entangled { left: 0, right: 2 }, Pair::Entangled { left: 1, right: 3 }],
        None,
    )
    .unwrap();
    let map = MatchingMap::for_rule(&rule, &state);
    let witnesses = map.find_all_matches(&state);

    assert_eq!(witnesses.len(), 3);
    assert!(!witnesses.contains(&vec![complex!("A{u}::cyt"), complex!("A{u}::cyt")]));
}

// --- Properties --------------------------------------------------------------

const POOL: [(&str, &str); 5] = [
    ("A{_}::cyt", "A{_}::nuc"),
    ("A{p}::cyt", "A{p}::nuc"),
    ("A{u}::cyt", "A{u}::nuc"),
    ("A{p}::cyt", "A{u}::cyt"),
    ("B{x}::cyt", "B{x}::nuc"),
];

fn pool_rules(picks: &[usize], rated: bool) -> Vec<Rule> {
    picks
        .iter()
        .map(|&idx| {
            let (lhs, rhs) = POOL[idx];
            let rate = rated.then(|| Rate::param("k"));
            Rule::from_literals(&[lhs], &[rhs], vec![Pair::Entangled { left: 0, right: 1 }], rate).unwrap()
        })
        .collect()
}

fn picks() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(0..POOL.len(), 0..6)
}

proptest! {
    #[test]
    fn completion_is_total_and_state_preserving(states in prop::collection::btree_set("[a-z][0-9]?", 1..6)) {
        let mut sig = Signature::default();
        sig.atomic.insert("A".into(), states.iter().cloned().map(State::value).collect());
        let open = Agent::wildcard("A");
        let pairs = complete(&open, Counterpart::Paired(&open), &sig);

        prop_assert_eq!(pairs.len(), states.len());
        for (l, r) in &pairs {
            prop_assert!(l.is_some());
            prop_assert_eq!(l, r);
        }
    }

    #[test]
    fn expansion_cardinality_is_the_product_of_pair_sizes(sizes in prop::collection::vec(1usize..4, 1..4)) {
        let names: Vec<String> = (0..sizes.len()).map(|i| format!("N{i}")).collect();
        let mut sig = Signature::default();
        for (name, &n) in names.iter().zip(&sizes) {
            sig.atomic.insert(name.clone(), (0..n).map(|s| State::value(format!("s{s}"))).collect());
        }
        let lhs = names.iter().map(|n| (vec![Agent::wildcard(n.clone())], "cyt".to_string())).collect();
        let rhs = names.iter().map(|n| (vec![Agent::wildcard(n.clone())], "nuc".to_string())).collect();
        let k = names.len();
        let pairs = (0..k).map(|i| Pair::Entangled { left: i, right: k + i }).collect();
        let rule = Rule::from_sides(lhs, rhs, pairs, Some(Rate::param("k")));

        prop_assert_eq!(expand(&rule, &sig).len(), sizes.iter().product::<usize>());
    }

    #[test]
    fn ordering_is_deterministic(picks in picks(), counts in prop::collection::vec(0u32..5, 2)) {
        let init = BTreeMap::from([(complex!("A{p}::cyt"), counts[0]), (complex!("B{x}::cyt"), counts[1])]);
        let rules = pool_rules(&picks, true);
        let mut reversed = rules.clone();
        reversed.reverse();

        let model = Model::new(rules, init.clone(), BTreeMap::new(), BTreeSet::new());
        let other = Model::new(reversed, init, BTreeMap::new(), BTreeSet::new());

        prop_assert_eq!(model.build_ordering(), model.build_ordering());
        prop_assert_eq!(model.build_ordering(), other.build_ordering());
    }

    #[test]
    fn matching_is_sound_and_complete(counts in prop::collection::vec(0u32..3, 3), slots in 0usize..4) {
        let species = [complex!("A{p}::cyt"), complex!("A{u}::cyt"), complex!("A{x}::cyt")];
        let state: LiveState = species.iter().cloned().zip(counts.iter().copied()).collect();
        let patterns = vec![complex!("A{_}::cyt"); slots];
        let witnesses = MatchingMap::new(&patterns, &state).find_all_matches(&state);

        for witness in &witnesses {
            prop_assert_eq!(witness.len(), slots);
            for (c, &available) in species.iter().zip(&counts) {
                prop_assert!(witness.iter().filter(|w| *w == c).count() as u32 <= available);
            }
        }

        // Count every ordered draw of `slots` species that stays within the counts.
        let expected = (0..3usize.pow(slots as u32))
            .filter(|&code| {
                let mut used = [0u32; 3];
                let mut rest = code;
                for _ in 0..slots {
                    used[rest % 3] += 1;
                    rest /= 3;
                }
                used.iter().zip(&counts).all(|(u, n)| u <= n)
            })
            .count();
        prop_assert_eq!(witnesses.len(), expected);
        prop_assert_eq!(witnesses.iter().collect::<BTreeSet<_>>().len(), witnesses.len());
    }

    #[test]
    fn redundancy_is_symmetric(picks in picks(), rated in any::<bool>()) {
        let rules = pool_rules(&picks, rated);
        let report = analyze_redundancy(&rules, rated);
        let no_groups = Vec::new();
        let groups = |i: usize| report.groups.get(&i).unwrap_or(&no_groups);

        for i in 0..rules.len() {
            for j in (i + 1)..rules.len() {
                let (a, b) = (rules[i].to_reaction(), rules[j].to_reaction());
                let shared = groups(i).iter().any(|g| groups(j).contains(g));
                prop_assert_eq!(shared, a.compatible(&b) || b.compatible(&a));
            }
        }
        if rated {
            prop_assert!(report.eliminable.is_empty());
        }
        // Every eliminated rule is covered by one that stays.
        for &e in &report.eliminable {
            let covered = (0..rules.len())
                .filter(|k| !report.eliminable.contains(k))
                .any(|k| rules[k].to_reaction().compatible(&rules[e].to_reaction()));
            prop_assert!(covered);
        }
    }

    #[test]
    fn reduction_is_idempotent(picks in picks()) {
        let rules = pool_rules(&picks, true);
        let reduced = reduce_rules(&rules);

        prop_assert!(reduced.iter().all(Rule::is_meaningful));
        prop_assert_eq!(reduce_rules(&reduced), reduced.clone());
        for rule in &reduced {
            prop_assert_eq!(&rule.reduce_context(), rule);
        }
    }
}

//! Literal notation for agents and complexes.
//!
//! This is not the rule language; it is the small surface needed to write
//! complexes in model files, CLI queries and tests:
//!
//! ```text
//! A{p}              atomic agent in state p
//! A{_} | A          atomic agent, state left open
//! S(a{x},b{_})      structure with two inner atomics
//! A{p}.S(b{u})::cyt complex: agents joined by '.', compartment after '::'
//! ```
//!
//! Printing any of these values with `Display` yields a literal that parses
//! back to the same value.

use crate::error::{Error, Result};
use crate::{Agent, AtomicAgent, Complex, State, StructureAgent};
use std::str::FromStr;

fn parse_state(raw: Option<&str>) -> State {
    match raw {
        None | Some("_") => State::Wildcard,
        Some(value) => State::value(value),
    }
}

impl FromStr for AtomicAgent {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let input = s.trim();
        let caps = regex!(r"^([A-Za-z][A-Za-z0-9_]*)(?:\{([A-Za-z0-9_+\-]+)\})?$")
            .captures(input)
            .ok_or_else(|| Error::notation(input, "expected NAME or NAME{STATE}"))?;
        let name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        let state = parse_state(caps.get(2).map(|m| m.as_str()));
        Ok(AtomicAgent::new(name, state))
    }
}

impl FromStr for Agent {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let input = s.trim();
        if let Some(caps) = regex!(r"^([A-Za-z][A-Za-z0-9_]*)\((.*)\)$").captures(input) {
            let name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            let body = caps.get(2).map(|m| m.as_str()).unwrap_or_default().trim();
            let mut composition = Vec::new();
            if !body.is_empty() {
                for part in body.split(',') {
                    let atom: AtomicAgent =
                        part.parse().map_err(|_| Error::notation(input, format!("bad inner atomic '{}'", part.trim())))?;
                    if composition.iter().any(|a: &AtomicAgent| a.name == atom.name) {
                        return Err(Error::notation(input, format!("atomic '{}' listed twice", atom.name)));
                    }
                    composition.push(atom);
                }
            }
            return Ok(Agent::Structure(StructureAgent::new(name, composition)));
        }
        input.parse::<AtomicAgent>().map(Agent::Atomic)
    }
}

/// Split a complex literal into its agents (in written order) and compartment.
///
/// Rules need the written order to keep agent indices stable, so this is
/// exposed separately from `Complex::from_str`, which canonicalizes.
pub(crate) fn parse_complex_parts(s: &str) -> Result<(Vec<Agent>, String)> {
    let input = s.trim();
    let caps = regex!(r"^(.+)::([A-Za-z][A-Za-z0-9_]*)$")
        .captures(input)
        .ok_or_else(|| Error::notation(input, "expected AGENTS::COMPARTMENT"))?;
    let body = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
    let compartment = caps.get(2).map(|m| m.as_str()).unwrap_or_default().to_string();

    let agents = body.split('.').map(str::parse).collect::<Result<Vec<Agent>>>()?;
    Ok((agents, compartment))
}

impl FromStr for Complex {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (agents, compartment) = parse_complex_parts(s)?;
        Ok(Complex::new(agents, compartment))
    }
}

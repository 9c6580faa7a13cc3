//! Rate expressions.
//!
//! The rate language itself belongs to the front end; this module carries the
//! minimal expression tree the compiler needs to move rates through
//! vectorization and context reduction, and to evaluate them during
//! simulation.

use crate::Complex;
use crate::engine::Ordering;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::cmp;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rate {
    Const(f64),
    Param(String),
    /// Count of complexes compatible with the given one.
    Species(Complex),
    /// Sum of the listed ordering coordinates; produced by [`Rate::vectorize`].
    Vector(Vec<usize>),
    Add(Box<Rate>, Box<Rate>),
    Sub(Box<Rate>, Box<Rate>),
    Mul(Box<Rate>, Box<Rate>),
    Div(Box<Rate>, Box<Rate>),
    Pow(Box<Rate>, Box<Rate>),
}

/// Where species values come from while evaluating.
///
/// Unvectorized species are looked up directly; vectorized ones are summed
/// from a state vector. A species missing from the counts, or a coordinate
/// past the end of the vector, counts 0. Mixing the two forms is an error.
enum Valuation<'a> {
    Direct(&'a HashMap<Complex, u32>),
    Vector(&'a [u32]),
}

impl Rate {
    pub fn param(name: impl Into<String>) -> Self {
        Rate::Param(name.into())
    }

    pub fn mul(a: Rate, b: Rate) -> Self {
        Rate::Mul(Box::new(a), Box::new(b))
    }

    fn map(&self, f: &impl Fn(&Rate) -> Option<Rate>) -> Rate {
        if let Some(replaced) = f(self) {
            return replaced;
        }
        let bin = |a: &Rate, b: &Rate| (Box::new(a.map(f)), Box::new(b.map(f)));
        match self {
            Rate::Add(a, b) => {
                let (a, b) = bin(a, b);
                Rate::Add(a, b)
            }
            Rate::Sub(a, b) => {
                let (a, b) = bin(a, b);
                Rate::Sub(a, b)
            }
            Rate::Mul(a, b) => {
                let (a, b) = bin(a, b);
                Rate::Mul(a, b)
            }
            Rate::Div(a, b) => {
                let (a, b) = bin(a, b);
                Rate::Div(a, b)
            }
            Rate::Pow(a, b) => {
                let (a, b) = bin(a, b);
                Rate::Pow(a, b)
            }
            leaf => leaf.clone(),
        }
    }

    fn visit<'a>(&'a self, f: &mut impl FnMut(&'a Rate)) {
        f(self);
        match self {
            Rate::Add(a, b) | Rate::Sub(a, b) | Rate::Mul(a, b) | Rate::Div(a, b) | Rate::Pow(a, b) => {
                a.visit(f);
                b.visit(f);
            }
            _ => {}
        }
    }

    /// Rewrite species references as ordering coordinates and substitute
    /// parameters that have a definition.
    pub fn vectorize(&self, ordering: &Ordering, definitions: &BTreeMap<String, f64>) -> Rate {
        self.map(&|node| match node {
            Rate::Species(c) => Some(Rate::Vector(c.identify_compatible(ordering))),
            Rate::Param(name) => definitions.get(name).map(|v| Rate::Const(*v)),
            _ => None,
        })
    }

    pub fn reduce_context(&self) -> Rate {
        self.map(&|node| match node {
            Rate::Species(c) => Some(Rate::Species(c.reduce_context())),
            _ => None,
        })
    }

    /// Species referenced by the expression and the names of its free parameters.
    pub fn params_and_agents(&self) -> (BTreeSet<Complex>, BTreeSet<String>) {
        let mut agents = BTreeSet::new();
        let mut params = BTreeSet::new();
        self.visit(&mut |node| match node {
            Rate::Species(c) => {
                agents.insert(c.clone());
            }
            Rate::Param(name) => {
                params.insert(name.clone());
            }
            _ => {}
        });
        (agents, params)
    }

    pub fn evaluate_direct(&self, values: &HashMap<Complex, u32>, params: &HashMap<String, f64>) -> Result<f64> {
        self.evaluate(&Valuation::Direct(values), params)
    }

    /// Evaluate a vectorized rate against a state vector.
    pub fn evaluate_vector(&self, state: &[u32], params: &HashMap<String, f64>) -> Result<f64> {
        self.evaluate(&Valuation::Vector(state), params)
    }

    fn evaluate(&self, valuation: &Valuation<'_>, params: &HashMap<String, f64>) -> Result<f64> {
        let value = match self {
            Rate::Const(v) => *v,
            Rate::Param(name) => {
                *params.get(name).ok_or_else(|| Error::UnboundParameter { name: name.clone() })?
            }
            Rate::Species(c) => match valuation {
                Valuation::Direct(values) => values.get(c).copied().unwrap_or(0) as f64,
                Valuation::Vector(_) => {
                    return Err(Error::RateValuation { node: self.to_string(), expected: "a state vector" });
                }
            },
            Rate::Vector(indices) => match valuation {
                Valuation::Vector(state) => indices.iter().map(|&i| state.get(i).copied().unwrap_or(0) as f64).sum(),
                Valuation::Direct(_) => {
                    return Err(Error::RateValuation { node: self.to_string(), expected: "species counts" });
                }
            },
            Rate::Add(a, b) => a.evaluate(valuation, params)? + b.evaluate(valuation, params)?,
            Rate::Sub(a, b) => a.evaluate(valuation, params)? - b.evaluate(valuation, params)?,
            Rate::Mul(a, b) => a.evaluate(valuation, params)? * b.evaluate(valuation, params)?,
            Rate::Div(a, b) => a.evaluate(valuation, params)? / b.evaluate(valuation, params)?,
            Rate::Pow(a, b) => a.evaluate(valuation, params)?.powf(b.evaluate(valuation, params)?),
        };
        Ok(value)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rate::Const(v) => write!(f, "{v}"),
            Rate::Param(name) => f.write_str(name),
            Rate::Species(c) => write!(f, "[{c}]"),
            Rate::Vector(indices) if indices.is_empty() => f.write_str("0"),
            Rate::Vector(indices) => {
                f.write_str("(")?;
                for (n, idx) in indices.iter().enumerate() {
                    if n > 0 {
                        f.write_str(" + ")?;
                    }
                    write!(f, "x_{idx}")?;
                }
                f.write_str(")")
            }
            Rate::Add(a, b) => write_binary(f, a, " + ", b, self.precedence()),
            Rate::Sub(a, b) => write_binary(f, a, " - ", b, self.precedence()),
            Rate::Mul(a, b) => write_binary(f, a, " * ", b, self.precedence()),
            Rate::Div(a, b) => write_binary(f, a, " / ", b, self.precedence()),
            Rate::Pow(a, b) => write_binary(f, a, " ** ", b, self.precedence()),
        }
    }
}

/// Brackets an operand that would otherwise re-associate when read back.
/// `+ - * /` group to the left, `**` to the right.
fn write_binary(f: &mut fmt::Formatter<'_>, a: &Rate, op: &str, b: &Rate, precedence: u8) -> fmt::Result {
    let right_assoc = precedence == POW;
    let wrap_left = a.precedence() < precedence || (right_assoc && a.precedence() == precedence);
    let wrap_right = b.precedence() < precedence || (!right_assoc && b.precedence() == precedence);
    write_operand(f, a, wrap_left)?;
    f.write_str(op)?;
    write_operand(f, b, wrap_right)
}

fn write_operand(f: &mut fmt::Formatter<'_>, rate: &Rate, wrap: bool) -> fmt::Result {
    if wrap { write!(f, "({rate})") } else { write!(f, "{rate}") }
}

const POW: u8 = 3;

impl Rate {
    fn precedence(&self) -> u8 {
        match self {
            Rate::Add(..) | Rate::Sub(..) => 1,
            Rate::Mul(..) | Rate::Div(..) => 2,
            Rate::Pow(..) => POW,
            _ => u8::MAX,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Rate::Const(_) => 0,
            Rate::Param(_) => 1,
            Rate::Species(_) => 2,
            Rate::Vector(_) => 3,
            Rate::Add(..) => 4,
            Rate::Sub(..) => 5,
            Rate::Mul(..) => 6,
            Rate::Div(..) => 7,
            Rate::Pow(..) => 8,
        }
    }
}

// Structural identity. Constants compare by bit pattern (`f64::total_cmp`),
// which keeps `Eq`, `Ord` and `Hash` in agreement.

impl PartialEq for Rate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == cmp::Ordering::Equal
    }
}

impl Eq for Rate {}

impl PartialOrd for Rate {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rate {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        match (self, other) {
            (Rate::Const(a), Rate::Const(b)) => a.total_cmp(b),
            (Rate::Param(a), Rate::Param(b)) => a.cmp(b),
            (Rate::Species(a), Rate::Species(b)) => a.cmp(b),
            (Rate::Vector(a), Rate::Vector(b)) => a.cmp(b),
            (Rate::Add(a, b), Rate::Add(c, d))
            | (Rate::Sub(a, b), Rate::Sub(c, d))
            | (Rate::Mul(a, b), Rate::Mul(c, d))
            | (Rate::Div(a, b), Rate::Div(c, d))
            | (Rate::Pow(a, b), Rate::Pow(c, d)) => a.cmp(c).then_with(|| b.cmp(d)),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl Hash for Rate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Rate::Const(v) => v.to_bits().hash(state),
            Rate::Param(name) => name.hash(state),
            Rate::Species(c) => c.hash(state),
            Rate::Vector(indices) => indices.hash(state),
            Rate::Add(a, b) | Rate::Sub(a, b) | Rate::Mul(a, b) | Rate::Div(a, b) | Rate::Pow(a, b) => {
                a.hash(state);
                b.hash(state);
            }
        }
    }
}

//! Solver-independent mixed-integer model.
//!
//! The builder writes variables, named linear constraints and a minimization
//! objective here; solver backends translate the result into their own API.

use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Index of a variable in a [`MilpModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarId(usize);

impl VarId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VarKind {
    Binary,
    Continuous { lower: f64, upper: Option<f64> },
}

impl VarKind {
    pub fn non_negative() -> Self {
        VarKind::Continuous {
            lower: 0.0,
            upper: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Variable {
    pub name: String,
    pub kind: VarKind,
}

/// A linear expression `sum(coef * var)`. Constants live on the constraint side.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpr {
    terms: BTreeMap<VarId, f64>,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn term(var: VarId, coef: f64) -> Self {
        let mut e = Self::new();
        e.add_term(var, coef);
        e
    }

    /// Sum of `vars` with unit coefficients.
    pub fn sum(vars: impl IntoIterator<Item = VarId>) -> Self {
        let mut e = Self::new();
        for v in vars {
            e.add_term(v, 1.0);
        }
        e
    }

    /// Add `coef * var`, merging with an existing term. Near-zero terms are dropped.
    pub fn add_term(&mut self, var: VarId, coef: f64) {
        if coef == 0.0 {
            return;
        }
        let entry = self.terms.entry(var).or_insert(0.0);
        *entry += coef;
        if entry.abs() < 1e-12 {
            self.terms.remove(&var);
        }
    }

    pub fn add_expr(&mut self, other: &LinearExpr, scale: f64) {
        for (&v, &c) in &other.terms {
            self.add_term(v, c * scale);
        }
    }

    pub fn terms(&self) -> impl Iterator<Item = (VarId, f64)> + '_ {
        self.terms.iter().map(|(&v, &c)| (v, c))
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Value of the expression under an assignment indexed by [`VarId`].
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|(v, c)| c * values.get(v.0).copied().unwrap_or(0.0))
            .sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Le,
    Ge,
    Eq,
}

impl Sense {
    fn as_str(&self) -> &'static str {
        match self {
            Sense::Le => "<=",
            Sense::Ge => ">=",
            Sense::Eq => "=",
        }
    }
}

/// `expr sense rhs`
#[derive(Debug, Clone)]
pub struct Constraint {
    pub name: String,
    pub expr: LinearExpr,
    pub sense: Sense,
    pub rhs: f64,
}

impl Constraint {
    /// Whether `values` satisfy the constraint.
    ///
    /// `tolerance` is relative to the larger of `|lhs|`, `|rhs|` and 1.
    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        let lhs = self.expr.evaluate(values);
        let tolerance = tolerance * lhs.abs().max(self.rhs.abs()).max(1.0);
        match self.sense {
            Sense::Le => lhs <= self.rhs + tolerance,
            Sense::Ge => lhs >= self.rhs - tolerance,
            Sense::Eq => (lhs - self.rhs).abs() <= tolerance,
        }
    }
}

/// A minimization problem over binary and continuous variables.
#[derive(Debug, Clone, Default)]
pub struct MilpModel {
    variables: Vec<Variable>,
    constraints: Vec<Constraint>,
    objective: LinearExpr,
}

impl MilpModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_var(&mut self, name: impl Into<String>, kind: VarKind) -> VarId {
        self.variables.push(Variable {
            name: name.into(),
            kind,
        });
        VarId(self.variables.len() - 1)
    }

    pub fn add_constraint(
        &mut self,
        name: impl Into<String>,
        expr: LinearExpr,
        sense: Sense,
        rhs: f64,
    ) {
        self.constraints.push(Constraint {
            name: name.into(),
            expr,
            sense,
            rhs,
        });
    }

    /// Add `lower <= expr <= upper` for whichever sides are given.
    pub fn add_range(
        &mut self,
        name: &str,
        expr: LinearExpr,
        lower: Option<f64>,
        upper: Option<f64>,
    ) {
        match (lower, upper) {
            (Some(lo), Some(hi)) if (lo - hi).abs() < 1e-12 => {
                self.add_constraint(name, expr, Sense::Eq, lo);
            }
            (Some(lo), Some(hi)) => {
                self.add_constraint(format!("{}_lo", name), expr.clone(), Sense::Ge, lo);
                self.add_constraint(format!("{}_hi", name), expr, Sense::Le, hi);
            }
            (Some(lo), None) => self.add_constraint(format!("{}_lo", name), expr, Sense::Ge, lo),
            (None, Some(hi)) => self.add_constraint(format!("{}_hi", name), expr, Sense::Le, hi),
            (None, None) => {}
        }
    }

    pub fn add_objective_term(&mut self, var: VarId, coef: f64) {
        self.objective.add_term(var, coef);
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }

    pub fn binary_count(&self) -> usize {
        self.variables
            .iter()
            .filter(|v| v.kind == VarKind::Binary)
            .count()
    }

    /// Names of constraints violated by `values`.
    pub fn violations(&self, values: &[f64], tolerance: f64) -> Vec<&str> {
        self.constraints
            .iter()
            .filter(|c| !c.is_satisfied(values, tolerance))
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Render the model in CPLEX LP format.
    pub fn to_lp_string(&self) -> String {
        let mut out = String::new();
        out.push_str("Minimize\n obj: ");
        out.push_str(&self.fmt_expr(&self.objective));
        out.push_str("\nSubject To\n");
        for c in &self.constraints {
            let _ = writeln!(
                out,
                " {}: {} {} {}",
                c.name,
                self.fmt_expr(&c.expr),
                c.sense.as_str(),
                fmt_num(c.rhs)
            );
        }

        out.push_str("Bounds\n");
        for v in &self.variables {
            if let VarKind::Continuous { lower, upper } = v.kind {
                match upper {
                    Some(hi) => {
                        let _ = writeln!(out, " {} <= {} <= {}", fmt_num(lower), v.name, fmt_num(hi));
                    }
                    None => {
                        let _ = writeln!(out, " {} >= {}", v.name, fmt_num(lower));
                    }
                }
            }
        }

        out.push_str("Binary\n");
        for v in self.variables.iter().filter(|v| v.kind == VarKind::Binary) {
            let _ = writeln!(out, " {}", v.name);
        }
        out.push_str("End\n");
        out
    }

    fn fmt_expr(&self, e: &LinearExpr) -> String {
        if e.is_empty() {
            return "0".to_string();
        }
        e.terms()
            .map(|(v, c)| {
                let name = &self.variables[v.0].name;
                if (c - 1.0).abs() < 1e-12 {
                    format!("+ {}", name)
                } else if (c + 1.0).abs() < 1e-12 {
                    format!("- {}", name)
                } else if c < 0.0 {
                    format!("- {} {}", fmt_num(-c), name)
                } else {
                    format!("+ {} {}", fmt_num(c), name)
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Integers print without a fraction, everything else with six decimals.
fn fmt_num(v: f64) -> String {
    if (v - v.round()).abs() < 1e-9 {
        format!("{}", v.round() as i64)
    } else {
        format!("{:.6}", v)
    }
}

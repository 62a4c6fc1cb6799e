use crate::{
    algebra::{
        ops::{self, Factor, LinearForm},
        Expression, FactorError,
    },
    Relation, RelationOp,
};
use thiserror::Error;

/// Rearrange a [`Relation`] so `variable` is on its own on the left hand
/// side, using the default [`SolveOptions`].
pub fn solve_for(
    relation: &Relation,
    variable: &str,
) -> Result<Relation, SolveError> {
    RelationSolver::new(relation.clone()).solve_for(variable)
}

/// What to do when dividing an inequality by something whose sign isn't
/// known (e.g. solving `x * y < 1` for `x`).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SymbolicDivisor {
    /// Fail with [`SolveError::IndeterminateSign`].
    Reject,
    /// Pretend the divisor is positive and never flip the inequality.
    AssumePositive,
}

impl Default for SymbolicDivisor {
    fn default() -> Self { SymbolicDivisor::Reject }
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct SolveOptions {
    pub symbolic_divisor: SymbolicDivisor,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    #[error(
        "The given variable ({variable}) wasn't present in the relation ({relation})"
    )]
    UnknownVariable { variable: String, relation: String },
    #[error(
        "Unable to tell whether \"{divisor}\" is negative, so \"{variable}\" can't be isolated without knowing which way the inequality goes"
    )]
    IndeterminateSign { variable: String, divisor: String },
    #[error(transparent)]
    Factor(#[from] FactorError),
}

/// Isolates a variable in a [`Relation`].
///
/// Solving happens in a handful of stages:
///
/// 1. Expand both sides so every term is a simple product
/// 2. Move everything to the left (`left - right <op> 0`)
/// 3. Split the terms into those containing the variable (factoring it out to
///    get its coefficient, `C`) and the remainder, `R`
/// 4. Rewrite as `variable <op> -R / C`, flipping the inequality when `C` is
///    negative
///
/// For example, solving `z * (4 + x) = 6*y + 5*x` for `x` goes like this:
///
/// ```text
/// (z * 4) + (z * x) = (6 * y) + (5 * x)      // 1
/// (z * x) - (5 * x) + (z * 4) - (6 * y) = 0  // 2
/// (x * (z - 5)) + (z * 4) - (6 * y) = 0      // 3
/// x = ((6 * y) - (z * 4)) / (z - 5)          // 4
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RelationSolver {
    relation: Relation,
    options: SolveOptions,
}

impl RelationSolver {
    pub fn new(relation: Relation) -> Self {
        RelationSolver {
            relation,
            options: SolveOptions::default(),
        }
    }

    pub fn with_options(self, options: SolveOptions) -> Self {
        RelationSolver { options, ..self }
    }

    pub fn solve_for(&self, variable: &str) -> Result<Relation, SolveError> {
        if !self.relation.depends_on(variable) {
            return Err(self.unknown_variable(variable));
        }

        let left = self.relation.left().expand();
        let right = self.relation.right().expand();
        tracing::debug!(
            target: "solve",
            variable,
            left = %left,
            right = %right,
            "expanded"
        );

        let difference = (left - right).expand();
        let mut form = LinearForm::new(&difference, variable)?;
        form.cancel_like_terms();

        if form.coefficient.is_empty() {
            return Err(self.unknown_variable(variable));
        }

        let divisor = form.coefficient_expression();
        tracing::debug!(
            target: "solve",
            variable,
            difference = %difference,
            coefficient = %divisor,
            remainder_terms = form.remainder.len(),
            "factored"
        );

        let op = self.orient(variable, &divisor)?;
        let rhs = isolate(&form);

        Ok(Relation::new(Expression::variable(variable), op, rhs))
    }

    /// Figure out which way the relation should point after dividing by the
    /// variable's coefficient.
    fn orient(
        &self,
        variable: &str,
        divisor: &Expression,
    ) -> Result<RelationOp, SolveError> {
        let op = self.relation.op();

        match divisor.evaluate_constant() {
            Some(value) if value == 0.0 || value.is_nan() => {
                // the variable cancelled itself out (e.g. "2*x - x = x")
                Err(self.unknown_variable(variable))
            },
            Some(value) if value < 0.0 => {
                tracing::trace!(
                    target: "solve",
                    divisor = value,
                    "dividing by a negative number flips the relation"
                );
                Ok(op.flipped())
            },
            Some(_) => Ok(op),
            None if op.is_equality() => Ok(op),
            None => match self.options.symbolic_divisor {
                SymbolicDivisor::Reject => Err(SolveError::IndeterminateSign {
                    variable: variable.to_string(),
                    divisor: divisor.to_string(),
                }),
                SymbolicDivisor::AssumePositive => {
                    tracing::warn!(
                        target: "solve",
                        divisor = %divisor,
                        "assuming the divisor is positive"
                    );
                    Ok(op)
                },
            },
        }
    }

    fn unknown_variable(&self, variable: &str) -> SolveError {
        SolveError::UnknownVariable {
            variable: variable.to_string(),
            relation: self.relation.to_string(),
        }
    }
}

/// Calculate `-R / C`.
fn isolate(form: &LinearForm) -> Expression {
    if form.remainder.is_empty() {
        return Expression::zero();
    }

    // With a single term we can divide each part of the remainder
    // individually, cancelling anything that appears in both.
    if let [(sign, factors)] = form.coefficient.as_slice() {
        return ops::sum(
            form.remainder
                .iter()
                .map(|(term_sign, term)| {
                    (term_sign.negated().times(*sign), divide(term, factors))
                })
                .collect(),
        );
    }

    let numerator = ops::sum(
        form.remainder
            .iter()
            .map(|(sign, term)| (sign.negated(), term.clone()))
            .collect(),
    );

    numerator / form.coefficient_expression()
}

/// Divide a term by a product, cancelling common factors.
fn divide(term: &Expression, divisor: &[Factor]) -> Expression {
    if divisor.is_empty() {
        return term.clone();
    }

    let mut factors = ops::factors(term);

    for factor in divisor {
        match factors.iter().position(|f| f == factor) {
            Some(index) => {
                factors.remove(index);
            },
            None => factors.push(factor.inverted()),
        }
    }

    ops::product(&factors)
}

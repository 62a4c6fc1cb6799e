//! [`Expression`] operations.

use crate::algebra::{BinaryOperation, Expression};
use thiserror::Error;

impl Expression {
    /// See [`expand()`].
    pub fn expand(&self) -> Expression { expand(self) }

    /// See [`factor_for()`].
    pub fn factor_for(
        &self,
        variable: &str,
    ) -> Result<Expression, FactorError> {
        factor_for(self, variable)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FactorError {
    #[error(
        "The term \"{term}\" isn't linear in \"{variable}\", only first degree variables are supported"
    )]
    UnsupportedDegree { variable: String, term: String },
}

/// Distribute multiplication over addition and subtraction until there is
/// nothing left to distribute.
///
/// A sum divided by something is distributed as well, so `(a + b) / c`
/// becomes `(a / c) + (b / c)`. Sums in a denominator are left alone.
pub fn expand(expr: &Expression) -> Expression {
    match expr {
        Expression::Binary { left, right, op } => {
            let left = expand(left);
            let right = expand(right);

            match op {
                BinaryOperation::Times => distribute_product(left, right),
                BinaryOperation::Divide => distribute_quotient(left, right),
                BinaryOperation::Plus | BinaryOperation::Minus => {
                    Expression::binary(left, *op, right)
                },
            }
        },
        _ => expr.clone(),
    }
}

fn distribute_product(left: Expression, right: Expression) -> Expression {
    match (left, right) {
        // (a + b) * c = a*c + b*c
        (Expression::Binary { left: a, right: b, op }, right)
            if op.is_additive() =>
        {
            Expression::binary(
                distribute_product(*a, right.clone()),
                op,
                distribute_product(*b, right),
            )
        },
        // a * (b + c) = a*b + a*c
        (left, Expression::Binary { left: b, right: c, op })
            if op.is_additive() =>
        {
            Expression::binary(
                distribute_product(left.clone(), *b),
                op,
                distribute_product(left, *c),
            )
        },
        (left, right) => left * right,
    }
}

fn distribute_quotient(left: Expression, right: Expression) -> Expression {
    match left {
        // (a + b) / c = a/c + b/c
        Expression::Binary { left: a, right: b, op } if op.is_additive() => {
            Expression::binary(
                distribute_quotient(*a, right.clone()),
                op,
                distribute_quotient(*b, right),
            )
        },
        left => left / right,
    }
}

/// Rearrange a sum into the form `(variable * coefficient) + remainder`.
///
/// The expression is expanded first. Each term containing `variable` has it
/// pulled out as a common factor, and the terms which don't are tacked on
/// the end with their original signs. Nothing changes if `variable` doesn't
/// appear at all.
///
/// Only first degree terms can be factored, so things like `x*x` or `1/x`
/// are an error.
pub fn factor_for(
    expr: &Expression,
    variable: &str,
) -> Result<Expression, FactorError> {
    let form = LinearForm::new(expr, variable)?;

    if form.coefficient.is_empty() {
        return Ok(expr.clone());
    }

    let mut factored =
        Expression::variable(variable) * form.coefficient_expression();

    for (sign, term) in form.remainder {
        factored = match sign {
            Sign::Positive => factored + term,
            Sign::Negative => factored - term,
        };
    }

    Ok(factored)
}

/// Replace all references to a variable with an [`Expression`].
pub fn substitute(
    expression: &Expression,
    variable: &str,
    value: &Expression,
) -> Expression {
    match expression {
        Expression::Variable(name) if name.as_str() == variable => {
            value.clone()
        },
        Expression::Number(_) | Expression::Variable(_) => expression.clone(),
        Expression::Binary { left, right, op } => {
            let left = substitute(left, variable, value);
            let right = substitute(right, variable, value);
            Expression::binary(left, *op, right)
        },
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Sign {
    Positive,
    Negative,
}

impl Sign {
    pub(crate) fn negated(self) -> Sign {
        match self {
            Sign::Positive => Sign::Negative,
            Sign::Negative => Sign::Positive,
        }
    }

    pub(crate) fn times(self, other: Sign) -> Sign {
        if self == other {
            Sign::Positive
        } else {
            Sign::Negative
        }
    }
}

/// One factor in a product, and whether we multiply or divide by it.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Factor {
    pub(crate) op: BinaryOperation,
    pub(crate) value: Expression,
}

impl Factor {
    pub(crate) fn inverted(&self) -> Factor {
        Factor {
            op: self.op.inverse(),
            value: self.value.clone(),
        }
    }
}

/// Flatten a sum into its terms, pushing subtraction down into each term's
/// sign.
pub(crate) fn terms(expr: &Expression) -> Vec<(Sign, &Expression)> {
    let mut terms = Vec::new();
    collect_terms(expr, Sign::Positive, &mut terms);
    terms
}

fn collect_terms<'e>(
    expr: &'e Expression,
    sign: Sign,
    terms: &mut Vec<(Sign, &'e Expression)>,
) {
    match expr {
        Expression::Binary {
            left,
            right,
            op: BinaryOperation::Plus,
        } => {
            collect_terms(left, sign, terms);
            collect_terms(right, sign, terms);
        },
        Expression::Binary {
            left,
            right,
            op: BinaryOperation::Minus,
        } => {
            collect_terms(left, sign, terms);
            collect_terms(right, sign.negated(), terms);
        },
        _ => terms.push((sign, expr)),
    }
}

/// Flatten a product into its factors, so `a / (b * c) * d` becomes
/// `[*a, /b, /c, *d]`.
pub(crate) fn factors(term: &Expression) -> Vec<Factor> {
    let mut factors = Vec::new();
    collect_factors(term, BinaryOperation::Times, &mut factors);
    factors
}

fn collect_factors(
    expr: &Expression,
    op: BinaryOperation,
    factors: &mut Vec<Factor>,
) {
    match expr {
        Expression::Binary {
            left,
            right,
            op: BinaryOperation::Times,
        } => {
            collect_factors(left, op, factors);
            collect_factors(right, op, factors);
        },
        Expression::Binary {
            left,
            right,
            op: BinaryOperation::Divide,
        } => {
            collect_factors(left, op, factors);
            collect_factors(right, op.inverse(), factors);
        },
        _ => factors.push(Factor {
            op,
            value: expr.clone(),
        }),
    }
}

/// The inverse of [`factors()`], folding from the left.
pub(crate) fn product(factors: &[Factor]) -> Expression {
    let (mut product, rest) = match factors.split_first() {
        Some((first, rest)) if first.op == BinaryOperation::Times => {
            (first.value.clone(), rest)
        },
        _ => (Expression::one(), factors),
    };

    for factor in rest {
        product = Expression::binary(product, factor.op, factor.value.clone());
    }

    product
}

/// Add up a list of signed terms.
///
/// Positive terms come first (otherwise keeping their order), so we only
/// need a leading `0 - ...` when everything is negative. An empty sum is
/// `0`.
pub(crate) fn sum(terms: Vec<(Sign, Expression)>) -> Expression {
    let (positive, negative): (Vec<_>, Vec<_>) = terms
        .into_iter()
        .partition(|(sign, _)| *sign == Sign::Positive);
    let mut terms = positive.into_iter().chain(negative);

    let mut total = match terms.next() {
        Some((Sign::Positive, first)) => first,
        Some((Sign::Negative, first)) => Expression::zero() - first,
        None => return Expression::zero(),
    };

    for (sign, term) in terms {
        total = match sign {
            Sign::Positive => total + term,
            Sign::Negative => total - term,
        };
    }

    total
}

/// An expanded sum split into the coefficient of a variable and everything
/// else.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LinearForm {
    /// Each term's factors, minus the variable itself.
    pub(crate) coefficient: Vec<(Sign, Vec<Factor>)>,
    /// Terms which don't mention the variable, ignoring any literal zeroes.
    pub(crate) remainder: Vec<(Sign, Expression)>,
}

impl LinearForm {
    pub(crate) fn new(
        expr: &Expression,
        variable: &str,
    ) -> Result<Self, FactorError> {
        let expanded = expand(expr);
        let mut coefficient = Vec::new();
        let mut remainder = Vec::new();

        for (sign, term) in terms(&expanded) {
            if term.depends_on(variable) {
                coefficient.push((sign, coefficient_of(term, variable)?));
            } else if !term.is_zero() {
                remainder.push((sign, term.clone()));
            }
        }

        Ok(LinearForm {
            coefficient,
            remainder,
        })
    }

    /// Remove pairs of coefficient terms which cancel each other out, like
    /// the `a` and `-a` in `(a * x) - (x * a)`.
    pub(crate) fn cancel_like_terms(&mut self) {
        let mut remaining: Vec<(Sign, Vec<Factor>)> = Vec::new();

        for (sign, factors) in self.coefficient.drain(..) {
            let opposite = remaining.iter().position(|(s, f)| {
                *s == sign.negated() && same_factors(f, &factors)
            });

            match opposite {
                Some(index) => {
                    remaining.remove(index);
                },
                None => remaining.push((sign, factors)),
            }
        }

        self.coefficient = remaining;
    }

    pub(crate) fn coefficient_expression(&self) -> Expression {
        sum(self
            .coefficient
            .iter()
            .map(|(sign, factors)| (*sign, product(factors)))
            .collect())
    }
}

/// Do two products contain the same factors, ignoring their order?
fn same_factors(left: &[Factor], right: &[Factor]) -> bool {
    if left.len() != right.len() {
        return false;
    }

    let mut unmatched: Vec<&Factor> = right.iter().collect();

    left.iter().all(|factor| {
        match unmatched.iter().position(|other| *other == factor) {
            Some(index) => {
                unmatched.remove(index);
                true
            },
            None => false,
        }
    })
}

/// Pull a single, multiplied occurrence of `variable` out of a term.
fn coefficient_of(
    term: &Expression,
    variable: &str,
) -> Result<Vec<Factor>, FactorError> {
    let mut factors = factors(term);
    let occurrences: Vec<usize> = factors
        .iter()
        .enumerate()
        .filter(|(_, factor)| factor.value.depends_on(variable))
        .map(|(index, _)| index)
        .collect();

    match occurrences.as_slice() {
        [index]
            if factors[*index].op == BinaryOperation::Times
                && factors[*index].value.is_variable(variable) =>
        {
            factors.remove(*index);
            Ok(factors)
        },
        _ => Err(FactorError::UnsupportedDegree {
            variable: variable.to_string(),
            term: term.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_distributes_multiplication() {
        let inputs = vec![
            ("x", "x"),
            ("x * y", "(x * y)"),
            ("x / (y + z)", "(x / (y + z))"),
            ("x * (y + z)", "((x * y) + (x * z))"),
            ("(y - z) * x", "((y * x) - (z * x))"),
            (
                "(a + x) * (y + z)",
                "(((a * y) + (a * z)) + ((x * y) + (x * z)))",
            ),
            ("(a + b) / c", "((a / c) + (b / c))"),
            (
                "(373.15 - x) * 3/2",
                "(((373.15 * 3) / 2) - ((x * 3) / 2))",
            ),
            (
                "z * (4 + x) - (6 * y + 5 * x)",
                "(((z * 4) + (z * x)) - ((6 * y) + (5 * x)))",
            ),
            ("a * (b * (c + d))", "((a * (b * c)) + (a * (b * d)))"),
        ];

        for (src, should_be) in inputs {
            let expr: Expression = src.parse().unwrap();

            let got = expand(&expr);

            assert_eq!(got.to_string(), should_be, "{}", src);
        }
    }

    #[test]
    fn expanding_twice_changes_nothing() {
        let inputs = vec![
            "(a + x) * (y + z)",
            "(a - b) * (c - d) * (e + f)",
            "((a + b) / c) * (d + e)",
            "x / (y + z) * (a + b)",
        ];

        for src in inputs {
            let expr: Expression = src.parse().unwrap();

            let once = expand(&expr);
            let twice = expand(&once);

            assert_eq!(once, twice, "{}", src);
        }
    }

    #[test]
    fn expansion_preserves_value() {
        let inputs = vec![
            "(1 + 2) * (3 - 4)",
            "(5 - 2) * (7 + 1) / 4",
            "2 * (3 * (4 - 1) + 2) - 6 / (1 + 2)",
        ];

        for src in inputs {
            let expr: Expression = src.parse().unwrap();
            let original = expr.evaluate_constant().unwrap();

            let got = expand(&expr).evaluate_constant().unwrap();

            approx::assert_relative_eq!(got, original);
        }
    }

    #[test]
    fn factor_out_a_variable() {
        let inputs = vec![
            ("(x * a) - (x * b)", "(x * (a - b))"),
            ("x", "(x * 1)"),
            ("x + (x * a) + 5", "((x * (1 + a)) + 5)"),
            ("(x * a) - (x * b) - c", "((x * (a - b)) - c)"),
            ("(a + x) * 2", "((x * 2) + (a * 2))"),
            ("5 - x / 2", "((x * (0 - (1 / 2))) + 5)"),
            ("x * (y + z)", "(x * (y + z))"),
            ("a + b", "(a + b)"),
        ];

        for (src, should_be) in inputs {
            let expr: Expression = src.parse().unwrap();

            let got = factor_for(&expr, "x").unwrap();

            assert_eq!(got.to_string(), should_be, "{}", src);
        }
    }

    #[test]
    fn higher_degrees_cant_be_factored() {
        let inputs = vec![
            ("x * x", "(x * x)"),
            ("a + 2 * x * x", "((2 * x) * x)"),
            ("1 / x", "(1 / x)"),
            ("y / (x + 1)", "(y / (x + 1))"),
        ];

        for (src, term) in inputs {
            let expr: Expression = src.parse().unwrap();

            let got = factor_for(&expr, "x").unwrap_err();

            assert_eq!(
                got,
                FactorError::UnsupportedDegree {
                    variable: String::from("x"),
                    term: String::from(term),
                }
            );
        }
    }

    #[test]
    fn flatten_products() {
        let expr: Expression = "a / (b * c) * d".parse().unwrap();

        let got = factors(&expr);

        let ops: Vec<_> = got.iter().map(|f| f.op).collect();
        assert_eq!(
            ops,
            vec![
                BinaryOperation::Times,
                BinaryOperation::Divide,
                BinaryOperation::Divide,
                BinaryOperation::Times,
            ]
        );
        assert_eq!(product(&got).to_string(), "(((a / b) / c) * d)");
    }

    #[test]
    fn opposite_coefficients_cancel() {
        let inputs = vec![
            ("(a * x) - (x * a)", 0),
            ("(x * y) - (x * y) - 1", 0),
            ("x - x + x", 1),
            ("(a * x) + (x * a)", 2),
            ("(a * b * x) - (x * b * a)", 0),
            ("(a * x) - (x / a)", 2),
            ("(a * a * x) - (x * a)", 2),
        ];

        for (src, should_be) in inputs {
            let expr: Expression = src.parse().unwrap();
            let mut form = LinearForm::new(&expr, "x").unwrap();

            form.cancel_like_terms();

            assert_eq!(form.coefficient.len(), should_be, "{}", src);
        }
    }

    #[test]
    fn sums_put_positive_terms_first() {
        let x = Expression::variable("x");
        let y = Expression::variable("y");

        let inputs = vec![
            (vec![], "0"),
            (vec![(Sign::Negative, x.clone())], "(0 - x)"),
            (
                vec![(Sign::Negative, x.clone()), (Sign::Positive, y.clone())],
                "(y - x)",
            ),
            (
                vec![(Sign::Positive, x.clone()), (Sign::Positive, y.clone())],
                "(x + y)",
            ),
        ];

        for (terms, should_be) in inputs {
            assert_eq!(sum(terms).to_string(), should_be);
        }
    }

    #[test]
    fn basic_substitutions() {
        let inputs = vec![
            ("1 + 2", "3", "1 + 2"),
            ("x", "5", "5"),
            ("y", "5", "y"),
            ("x + 5", "5", " 5 + 5"),
            ("x * (x - y)", "y + y", "(y + y) * ((y + y) - y)"),
        ];

        for (src, new_value, should_be) in inputs {
            let original: Expression = src.parse().unwrap();
            let new_value: Expression = new_value.parse().unwrap();
            let should_be: Expression = should_be.parse().unwrap();

            let got = substitute(&original, "x", &new_value);

            assert_eq!(got, should_be, "{} != {}", got, should_be);
        }
    }
}

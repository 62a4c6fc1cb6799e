use crate::algebra::ParseError;
use smol_str::SmolStr;
use std::{
    fmt::{self, Display, Formatter},
    ops::{Add, Div, Mul, Sub},
    str::FromStr,
};

/// An arithmetic expression.
///
/// Expressions are immutable. Every transformation (e.g.
/// [`Expression::expand()`]) hands back a brand new tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expression {
    /// A numeric literal, kept exactly as it was written.
    Number(SmolStr),
    /// A named variable.
    Variable(SmolStr),
    /// An expression involving two operands.
    Binary {
        left: Box<Expression>,
        right: Box<Expression>,
        op: BinaryOperation,
    },
}

impl Expression {
    /// Create a leaf node, checking that `text` is either a number or a valid
    /// identifier.
    pub fn operand(text: &str) -> Result<Self, ParseError> {
        if is_identifier(text) {
            Ok(Expression::Variable(text.into()))
        } else if text.parse::<f64>().is_ok() {
            Ok(Expression::Number(text.into()))
        } else {
            Err(ParseError::InvalidOperand {
                operand: text.to_string(),
            })
        }
    }

    pub fn variable<S: Into<SmolStr>>(name: S) -> Self {
        Expression::Variable(name.into())
    }

    pub fn binary(
        left: Expression,
        op: BinaryOperation,
        right: Expression,
    ) -> Self {
        Expression::Binary {
            left: Box::new(left),
            right: Box::new(right),
            op,
        }
    }

    pub(crate) fn zero() -> Self { Expression::Number("0".into()) }

    pub(crate) fn one() -> Self { Expression::Number("1".into()) }

    /// Is this the literal number zero?
    pub(crate) fn is_zero(&self) -> bool {
        match self {
            Expression::Number(text) => text.parse::<f64>() == Ok(0.0),
            _ => false,
        }
    }

    pub fn is_operand(&self) -> bool {
        match self {
            Expression::Number(_) | Expression::Variable(_) => true,
            Expression::Binary { .. } => false,
        }
    }

    /// Is this a sum or difference at the top level?
    pub fn is_additive(&self) -> bool {
        match self {
            Expression::Binary { op, .. } => op.is_additive(),
            _ => false,
        }
    }

    pub fn is_variable(&self, name: &str) -> bool {
        match self {
            Expression::Variable(v) => v.as_str() == name,
            _ => false,
        }
    }

    /// Does this expression mention a particular variable?
    pub fn depends_on(&self, name: &str) -> bool {
        match self {
            Expression::Number(_) => false,
            Expression::Variable(v) => v.as_str() == name,
            Expression::Binary { left, right, .. } => {
                left.depends_on(name) || right.depends_on(name)
            },
        }
    }

    /// All the variables in this expression, in the order they first appear.
    pub fn variables(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_variables(&mut names);
        names
    }

    fn collect_variables<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Expression::Number(_) => {},
            Expression::Variable(name) => {
                if !names.contains(&name.as_str()) {
                    names.push(name.as_str());
                }
            },
            Expression::Binary { left, right, .. } => {
                left.collect_variables(names);
                right.collect_variables(names);
            },
        }
    }

    /// Evaluate the expression, provided it contains no variables.
    pub fn evaluate_constant(&self) -> Option<f64> {
        match self {
            Expression::Number(text) => text.parse().ok(),
            Expression::Variable(_) => None,
            Expression::Binary { left, right, op } => {
                let left = left.evaluate_constant()?;
                let right = right.evaluate_constant()?;
                Some(op.apply(left, right))
            },
        }
    }
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();

    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        },
        _ => false,
    }
}

/// An operation that can be applied to two arguments.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BinaryOperation {
    Plus,
    Minus,
    Times,
    Divide,
}

impl BinaryOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOperation::Plus => "+",
            BinaryOperation::Minus => "-",
            BinaryOperation::Times => "*",
            BinaryOperation::Divide => "/",
        }
    }

    /// The conventional precedence, where `*` and `/` bind tighter than `+`
    /// and `-`.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOperation::Times | BinaryOperation::Divide => 1,
            BinaryOperation::Plus | BinaryOperation::Minus => 2,
        }
    }

    pub fn is_additive(self) -> bool {
        match self {
            BinaryOperation::Plus | BinaryOperation::Minus => true,
            BinaryOperation::Times | BinaryOperation::Divide => false,
        }
    }

    /// The operation which undoes this one.
    pub fn inverse(self) -> BinaryOperation {
        match self {
            BinaryOperation::Plus => BinaryOperation::Minus,
            BinaryOperation::Minus => BinaryOperation::Plus,
            BinaryOperation::Times => BinaryOperation::Divide,
            BinaryOperation::Divide => BinaryOperation::Times,
        }
    }

    fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            BinaryOperation::Plus => left + right,
            BinaryOperation::Minus => left - right,
            BinaryOperation::Times => left * right,
            BinaryOperation::Divide => left / right,
        }
    }
}

impl Display for BinaryOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// define some operator overloads to make constructing an expression easier.

impl Add for Expression {
    type Output = Expression;

    fn add(self, rhs: Expression) -> Expression {
        Expression::binary(self, BinaryOperation::Plus, rhs)
    }
}

impl Sub for Expression {
    type Output = Expression;

    fn sub(self, rhs: Expression) -> Expression {
        Expression::binary(self, BinaryOperation::Minus, rhs)
    }
}

impl Mul for Expression {
    type Output = Expression;

    fn mul(self, rhs: Expression) -> Expression {
        Expression::binary(self, BinaryOperation::Times, rhs)
    }
}

impl Div for Expression {
    type Output = Expression;

    fn div(self, rhs: Expression) -> Expression {
        Expression::binary(self, BinaryOperation::Divide, rhs)
    }
}

/// The canonical form, where every binary node gets its own parentheses.
impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Number(text) | Expression::Variable(text) => {
                write!(f, "{}", text)
            },
            Expression::Binary { left, right, op } => {
                write!(f, "({} {} {})", left, op, right)
            },
        }
    }
}

impl FromStr for Expression {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> { crate::algebra::parse(s) }
}

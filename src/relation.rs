use crate::algebra::{self, Expression, ParseError, Token};
use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

/// The operator relating the two halves of a [`Relation`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RelationOp {
    Equal,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
}

impl RelationOp {
    pub const ALL: [RelationOp; 5] = [
        RelationOp::Equal,
        RelationOp::LessThan,
        RelationOp::LessThanOrEqual,
        RelationOp::GreaterThan,
        RelationOp::GreaterThanOrEqual,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RelationOp::Equal => "=",
            RelationOp::LessThan => "<",
            RelationOp::LessThanOrEqual => "<=",
            RelationOp::GreaterThan => ">",
            RelationOp::GreaterThanOrEqual => ">=",
        }
    }

    /// The operator you get after multiplying or dividing both sides by a
    /// negative number.
    pub fn flipped(self) -> RelationOp {
        match self {
            RelationOp::Equal => RelationOp::Equal,
            RelationOp::LessThan => RelationOp::GreaterThan,
            RelationOp::LessThanOrEqual => RelationOp::GreaterThanOrEqual,
            RelationOp::GreaterThan => RelationOp::LessThan,
            RelationOp::GreaterThanOrEqual => RelationOp::LessThanOrEqual,
        }
    }

    pub fn is_equality(self) -> bool { self == RelationOp::Equal }
}

impl Display for RelationOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationOp {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RelationOp::ALL
            .iter()
            .copied()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| ParseError::UnknownRelationOperator {
                operator: s.to_string(),
            })
    }
}

/// Two expressions and the relation between them (e.g. `x + 1 <= 2 * y`).
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    left: Expression,
    op: RelationOp,
    right: Expression,
}

impl Relation {
    pub fn new(left: Expression, op: RelationOp, right: Expression) -> Self {
        Relation { left, op, right }
    }

    /// Create a [`Relation`] using the textual form of its operator.
    pub fn from_parts(
        left: Expression,
        op: &str,
        right: Expression,
    ) -> Result<Self, ParseError> {
        Ok(Relation::new(left, op.parse()?, right))
    }

    pub fn left(&self) -> &Expression { &self.left }

    pub fn op(&self) -> RelationOp { self.op }

    pub fn right(&self) -> &Expression { &self.right }

    pub fn depends_on(&self, name: &str) -> bool {
        self.left.depends_on(name) || self.right.depends_on(name)
    }
}

impl FromStr for Relation {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens = algebra::tokenize(s, &algebra::relation_symbols());

        let relations: Vec<(usize, RelationOp)> = tokens
            .iter()
            .enumerate()
            .filter_map(|(index, token)| match token {
                Token::Relation(op) => Some((index, *op)),
                _ => None,
            })
            .collect();

        let (index, op) = match relations.as_slice() {
            [single] => *single,
            [] => {
                return Err(ParseError::MissingRelationOperator {
                    relation: s.to_string(),
                })
            },
            _ => {
                return Err(ParseError::WrongCountRelationOperators {
                    relation: s.to_string(),
                    found: relations.len(),
                })
            },
        };

        let left = algebra::parse(&algebra::join(&tokens[..index]))?;
        let right = algebra::parse(&algebra::join(&tokens[index + 1..]))?;

        Ok(Relation::new(left, op, right))
    }
}

impl Display for Relation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.op, self.right)
    }
}

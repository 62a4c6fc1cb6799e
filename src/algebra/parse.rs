use crate::algebra::{
    token::{self, Token},
    BinaryOperation, Expression,
};
use thiserror::Error;

/// Parse an [`Expression`] tree from some text.
pub fn parse(s: &str) -> Result<Expression, ParseError> {
    let tokens = token::tokenize(s, &token::operator_symbols());
    parse_tokens(&tokens)
}

/// Recursively build an [`Expression`] from a list of tokens.
///
/// Rather than descending through a grammar, the tree is built top-down by
/// repeatedly splitting the token list at the operator which binds the
/// loosest:
///
/// 1. The parentheses must be balanced
/// 2. Any parentheses wrapping the entire list are redundant and stripped
/// 3. The split point is the operator outside of parentheses with the
///    largest precedence number, taking the right-most of any ties
/// 4. Each half of the split gets parsed the same way, and when there's no
///    operator left we should be looking at a lone operand
///
/// Taking the right-most operator is what makes `1 - 2 + 3` parse as
/// `(1 - 2) + 3`.
///
/// Each operator in a chain adds one level of recursion, here and in the
/// tree's `Drop` and `Display`, so extremely long flat chains (on the order
/// of 100k terms) can exhaust the stack.
pub fn parse_tokens(tokens: &[Token]) -> Result<Expression, ParseError> {
    check_balanced(tokens)?;
    let tokens = strip_outer_parens(tokens);

    match find_split_operator(tokens) {
        Some((index, op)) => {
            let left = parse_tokens(&tokens[..index])?;
            let right = parse_tokens(&tokens[index + 1..])?;

            Ok(Expression::binary(left, op, right))
        },
        None => operand(tokens),
    }
}

fn operand(tokens: &[Token]) -> Result<Expression, ParseError> {
    match tokens {
        // something like "()" or the right hand side of "x+"
        [] => Expression::operand(""),
        [Token::Operand(text)] => Expression::operand(text),
        other => Err(ParseError::InvalidOperand {
            operand: token::join(other),
        }),
    }
}

pub(crate) fn is_balanced(tokens: &[Token]) -> bool {
    let mut depth = 0_isize;

    for token in tokens {
        match token {
            Token::OpenParen => depth += 1,
            Token::CloseParen => {
                depth -= 1;

                if depth < 0 {
                    return false;
                }
            },
            _ => {},
        }
    }

    depth == 0
}

fn check_balanced(tokens: &[Token]) -> Result<(), ParseError> {
    if is_balanced(tokens) {
        Ok(())
    } else {
        Err(ParseError::UnbalancedParentheses {
            expression: token::join(tokens),
        })
    }
}

/// Remove any pairs of parentheses that wrap the whole token list.
///
/// The inside needs to be balanced too, otherwise we'd turn `(a)+(b)` into
/// `a)+(b`.
fn strip_outer_parens(mut tokens: &[Token]) -> &[Token] {
    while let [Token::OpenParen, inner @ .., Token::CloseParen] = tokens {
        if !is_balanced(inner) {
            break;
        }

        tokens = inner;
    }

    tokens
}

/// Find the loosest-binding operator which isn't inside parentheses.
fn find_split_operator(tokens: &[Token]) -> Option<(usize, BinaryOperation)> {
    let mut depth = 0_isize;
    let mut best: Option<(usize, BinaryOperation, u8)> = None;

    // walking backwards means the first operator we see from each
    // precedence group is also the right-most
    for (index, token) in tokens.iter().enumerate().rev() {
        match token {
            Token::CloseParen => depth += 1,
            Token::OpenParen => depth -= 1,
            Token::Operator { op, precedence } if depth == 0 => {
                let looser = match best {
                    Some((_, _, current)) => *precedence > current,
                    None => true,
                };

                if looser {
                    best = Some((index, *op, *precedence));
                }
            },
            _ => {},
        }
    }

    best.map(|(index, op, _)| (index, op))
}

/// Possible errors that may occur while parsing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("There are unbalanced parentheses in the expression \"{expression}\"")]
    UnbalancedParentheses { expression: String },
    #[error("\"{operand}\" is neither a number nor a valid identifier")]
    InvalidOperand { operand: String },
    #[error("No relation operator was found in \"{relation}\"")]
    MissingRelationOperator { relation: String },
    #[error(
        "Expected exactly one relation operator in \"{relation}\" but found {found}"
    )]
    WrongCountRelationOperators { relation: String, found: usize },
    #[error("The given operator ({operator}) is not a valid relation")]
    UnknownRelationOperator { operator: String },
}

#[cfg(test)]
mod parser_tests {
    use super::*;

    macro_rules! parser_test {
        ($name:ident, $src:expr) => {
            parser_test!($name, $src, $src);
        };
        ($name:ident, $src:expr, $should_be:expr) => {
            #[test]
            fn $name() {
                let got = parse($src).unwrap();

                let canonical = got.to_string();
                assert_eq!(canonical, $should_be);

                // the canonical form should always give us the same tree
                let round_tripped = parse(&canonical).unwrap();
                assert_eq!(round_tripped, got);
            }
        };
    }

    parser_test!(simple_integer, "1");
    parser_test!(multi_digit_integer, "12");
    parser_test!(simple_decimal, "12.345");
    parser_test!(simple_identifier, "x");
    parser_test!(longer_identifier, "thingy");
    parser_test!(surrounding_whitespace, "    thingy     ", "thingy");
    parser_test!(identifiers_can_have_underscores, "thingy_thangy");
    parser_test!(number_in_parens, "(1)", "1");
    parser_test!(deeply_nested_parens, "((((((x))))))", "x");
    parser_test!(one_plus_two, "1+2", "(1 + 2)");
    parser_test!(
        separately_parenthesized_halves,
        "(x + y) + (x - y)",
        "((x + y) + (x - y))"
    );
    parser_test!(
        neighbouring_parens_are_not_stripped,
        "(a)+(b)",
        "(a + b)"
    );
    parser_test!(times_binds_tighter, "a+b*c", "(a + (b * c))");
    parser_test!(
        left_to_right_evaluation_order,
        "1+2-3/4*5/6-7+8",
        "((((1 + 2) - (((3 / 4) * 5) / 6)) - 7) + 8)"
    );
    parser_test!(
        left_to_right_with_variables,
        "a+b-c/d*e/f-g+h",
        "((((a + b) - (((c / d) * e) / f)) - g) + h)"
    );
    parser_test!(
        parens_override_precedence,
        "(((373.15 - x) * 3/2))",
        "(((373.15 - x) * 3) / 2)"
    );
    parser_test!(canonical_form_is_a_fixed_point, "((a + (b * c)) - d)");

    #[test]
    fn unbalanced_parentheses() {
        let inputs = vec!["(x+1", "x+1)", "(x+1))", "((x+1)", ")x+1(", "))x+1(("];

        for src in inputs {
            let got = parse(src).unwrap_err();

            match got {
                ParseError::UnbalancedParentheses { .. } => {},
                other => panic!("{:?} gave {:?}", src, other),
            }
        }
    }

    #[test]
    fn long_flat_chains() {
        let src = vec!["1"; 1000].join("+");

        let got = parse(&src).unwrap();

        assert_eq!(got.evaluate_constant(), Some(1000.0));
    }

    #[test]
    fn unbalanced_parentheses_report_the_expression() {
        let got = parse("(x + 1").unwrap_err();

        assert_eq!(
            got,
            ParseError::UnbalancedParentheses {
                expression: String::from("(x+1")
            }
        );
    }

    #[test]
    fn balanced_token_lists_are_never_unbalanced() {
        let symbols = token::operator_symbols();
        let inputs = vec![
            "x+1",
            "(x+1)",
            "((x+1))",
            "(a)(b)",
            "()",
            "(*)",
            "((a) + (b)) * ((c))",
        ];

        for src in inputs {
            let tokens = token::tokenize(src, &symbols);
            assert!(is_balanced(&tokens), "{:?}", src);

            if let Err(ParseError::UnbalancedParentheses { .. }) =
                parse_tokens(&tokens)
            {
                panic!("{:?} was reported as unbalanced", src);
            }
        }
    }

    #[test]
    fn invalid_operands() {
        let inputs = vec![
            ("@", "@"),
            ("&", "&"),
            ("*", ""),
            ("", ""),
            ("x +", ""),
            ("()", ""),
            ("2x + 1", "2x"),
            ("(a)(b)", "(a)(b)"),
            ("x = 1", "x=1"),
        ];

        for (src, operand) in inputs {
            let got = parse(src).unwrap_err();

            assert_eq!(
                got,
                ParseError::InvalidOperand {
                    operand: String::from(operand)
                },
                "{:?}",
                src
            );
        }
    }

    #[test]
    fn split_on_loosest_rightmost_operator() {
        let symbols = token::operator_symbols();
        let inputs = vec![
            ("a+b", Some(1)),
            ("a*b+c", Some(3)),
            ("a+b*c", Some(1)),
            ("a-b+c", Some(3)),
            ("a*b/c", Some(3)),
            ("(a+b)*c", Some(5)),
            ("a", None),
        ];

        for (src, should_be) in inputs {
            let tokens = token::tokenize(src, &symbols);
            let got = find_split_operator(&tokens).map(|(index, _)| index);

            assert_eq!(got, should_be, "{:?}", src);
        }
    }
}

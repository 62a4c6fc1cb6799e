use crate::{algebra::BinaryOperation, relation::RelationOp};
use smol_str::SmolStr;

/// Split some text into [`Token`]s, using `symbols` as the set of recognised
/// symbols.
///
/// Whitespace is insignificant and gets stripped before scanning. Anything
/// which isn't one of the symbols is collected into [`Token::Operand`]s, so
/// concatenating the [`Token::text()`] of each token gives back the original
/// text, minus whitespace.
pub fn tokenize(text: &str, symbols: &[Token]) -> Vec<Token> {
    Tokens::new(text, symbols).collect()
}

/// The symbols making up an arithmetic expression.
pub fn operator_symbols() -> [Token; 6] {
    [
        Token::OpenParen,
        Token::CloseParen,
        Token::operator(BinaryOperation::Times),
        Token::operator(BinaryOperation::Divide),
        Token::operator(BinaryOperation::Plus),
        Token::operator(BinaryOperation::Minus),
    ]
}

/// The symbols which may separate the two halves of a relation.
pub fn relation_symbols() -> [Token; 5] {
    let [a, b, c, d, e] = RelationOp::ALL;

    [
        Token::Relation(a),
        Token::Relation(b),
        Token::Relation(c),
        Token::Relation(d),
        Token::Relation(e),
    ]
}

/// A lexical unit.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Token {
    /// A run of text that isn't one of the recognised symbols.
    Operand(SmolStr),
    /// A binary operator. Lower precedence numbers bind more tightly.
    Operator {
        op: BinaryOperation,
        precedence: u8,
    },
    OpenParen,
    CloseParen,
    Relation(RelationOp),
}

impl Token {
    pub fn operand<S: Into<SmolStr>>(text: S) -> Self {
        Token::Operand(text.into())
    }

    /// An operator token using the operator's conventional precedence.
    pub fn operator(op: BinaryOperation) -> Self {
        Token::Operator {
            op,
            precedence: op.precedence(),
        }
    }

    /// The text this token was created from.
    pub fn text(&self) -> &str {
        match self {
            Token::Operand(text) => text.as_str(),
            Token::Operator { op, .. } => op.as_str(),
            Token::OpenParen => "(",
            Token::CloseParen => ")",
            Token::Relation(op) => op.as_str(),
        }
    }

    pub fn precedence(&self) -> Option<u8> {
        match self {
            Token::Operator { precedence, .. } => Some(*precedence),
            _ => None,
        }
    }
}

/// Concatenate the text of several tokens.
pub(crate) fn join(tokens: &[Token]) -> String {
    tokens.iter().map(Token::text).collect()
}

#[derive(Debug, Clone, PartialEq)]
struct Tokens<'a> {
    src: String,
    cursor: usize,
    symbols: Vec<&'a Token>,
    emitted_anything: bool,
}

impl<'a> Tokens<'a> {
    fn new(text: &str, symbols: &'a [Token]) -> Self {
        let src = text.chars().filter(|c| !c.is_whitespace()).collect();

        // longer symbols get first go, so "<=" is found before "<"
        let mut symbols: Vec<&Token> = symbols
            .iter()
            .filter(|symbol| !symbol.text().is_empty())
            .collect();
        symbols.sort_by(|a, b| b.text().len().cmp(&a.text().len()));

        Tokens {
            src,
            cursor: 0,
            symbols,
            emitted_anything: false,
        }
    }

    fn rest(&self) -> &str { &self.src[self.cursor..] }

    fn peek(&self) -> Option<char> { self.rest().chars().next() }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.cursor += c.len_utf8();
        Some(c)
    }

    fn symbol_at_cursor(&self) -> Option<&'a Token> {
        let rest = self.rest();

        self.symbols
            .iter()
            .copied()
            .find(|symbol| rest.starts_with(symbol.text()))
    }

    fn chomp_operand(&mut self) -> Token {
        let start = self.cursor;

        while self.peek().is_some() && self.symbol_at_cursor().is_none() {
            self.advance();
        }

        Token::operand(&self.src[start..self.cursor])
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest().is_empty() {
            // empty input is still a (blank) operand
            if self.emitted_anything {
                return None;
            }
            self.emitted_anything = true;
            return Some(Token::operand(""));
        }

        self.emitted_anything = true;

        match self.symbol_at_cursor() {
            Some(symbol) => {
                self.cursor += symbol.text().len();
                Some(symbol.clone())
            },
            None => Some(self.chomp_operand()),
        }
    }
}

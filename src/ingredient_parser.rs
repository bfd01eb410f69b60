//! # Ingredient Parser
//!
//! This module turns free-text ingredient lines into [`ParsedIngredient`] values.
//!
//! ## Stages
//!
//! 1. **Tokenize**: split the line on whitespace, classify each token as an integer,
//!    a decimal, a fraction or a word, and split a number glued to a word ("200g").
//! 2. **Quantity**: an optional leading integer, decimal, fraction or mixed number
//!    ("1 1/2").
//! 3. **Unit**: an optional single bare word after the quantity, kept as the unit only
//!    when it is in the recognized vocabulary (see [`crate::measurement_units`]).
//! 4. **Name**: the rest of the line, verbatim. A word rejected as a unit stays here.
//!
//! Parsing never fails: a line without a leading quantity is all name.
//!
//! ## Usage
//!
//! ```rust
//! use cookbook::ingredient_parser::{parse_ingredient_line, parse_ingredient_list};
//!
//! let flour = parse_ingredient_line("1 1/2 cups flour");
//! assert_eq!(flour.quantity, "1 1/2");
//! assert_eq!(flour.unit, "cups");
//! assert_eq!(flour.name, "flour");
//!
//! let parsed = parse_ingredient_list("2 eggs, 1 tbsp milk");
//! assert_eq!(parsed[0].name, "eggs");
//! ```

use log::{debug, trace};
use regex::Regex;
use std::sync::LazyLock;

use crate::ingredient_model::ParsedIngredient;
use crate::measurement_units::is_recognized_unit;
use crate::quantity::{is_fraction_token, is_integer_token, is_quantity_token};

/// A number immediately followed by letters, e.g. "200g" or "1/2cup"
static GLUED_UNIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+(?:\.[0-9]+)?|\.[0-9]+|[0-9]+/[0-9]+)(\p{Alphabetic}+)$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    /// "2"
    Integer,
    /// "1.5"
    Decimal,
    /// "1/2"
    Fraction,
    /// Anything else
    Word,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Token<'a> {
    text: &'a str,
    kind: TokenKind,
    /// Byte offset of the token in the line
    start: usize,
    /// Set on both halves of a split token such as "200g"
    glued: bool,
}

impl Token<'_> {
    fn is_number(&self) -> bool {
        self.kind != TokenKind::Word
    }

    fn is_bare_word(&self) -> bool {
        self.kind == TokenKind::Word && self.text.chars().all(char::is_alphabetic)
    }
}

fn classify(text: &str) -> TokenKind {
    if is_integer_token(text) {
        TokenKind::Integer
    } else if is_fraction_token(text) {
        TokenKind::Fraction
    } else if is_quantity_token(text) {
        TokenKind::Decimal
    } else {
        TokenKind::Word
    }
}

/// Split a line into classified tokens with their byte offsets
fn tokenize(line: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut offset = 0;

    for piece in line.split_whitespace() {
        // split_whitespace yields slices of `line` in order, so find from the last offset
        let start = offset + line[offset..].find(piece).unwrap_or(0);
        offset = start + piece.len();

        if let Some(captures) = GLUED_UNIT.captures(piece) {
            let number = &piece[..captures[1].len()];
            let word = &piece[captures[1].len()..];
            tokens.push(Token {
                text: number,
                kind: classify(number),
                start,
                glued: true,
            });
            tokens.push(Token {
                text: word,
                kind: TokenKind::Word,
                start: start + number.len(),
                glued: true,
            });
            continue;
        }

        tokens.push(Token {
            text: piece,
            kind: classify(piece),
            start,
            glued: false,
        });
    }

    tokens
}

/// Recursive-descent parser over the tokens of one line
struct LineParser<'a> {
    line: &'a str,
    tokens: Vec<Token<'a>>,
    pos: usize,
}

impl<'a> LineParser<'a> {
    fn new(line: &'a str) -> Self {
        Self {
            line,
            tokens: tokenize(line),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<Token<'a>> {
        self.tokens.get(self.pos).copied()
    }

    fn peek_second(&self) -> Option<Token<'a>> {
        self.tokens.get(self.pos + 1).copied()
    }

    /// quantity := integer fraction | integer | decimal | fraction
    fn quantity(&mut self) -> Option<&'a str> {
        let first = self.peek().filter(Token::is_number)?;

        if first.kind == TokenKind::Integer && !first.glued {
            if let Some(second) = self.peek_second().filter(|t| t.kind == TokenKind::Fraction) {
                let line = self.line;
                self.pos += 2;
                return Some(line[first.start..second.start + second.text.len()].trim());
            }
        }

        self.pos += 1;
        Some(first.text)
    }

    /// unit := bare word in the recognized vocabulary
    fn unit(&mut self) -> Option<&'a str> {
        let word = self.peek().filter(Token::is_bare_word)?;
        if !is_recognized_unit(word.text) {
            trace!("'{}' is not a unit, keeping it in the name", word.text);
            return None;
        }
        self.pos += 1;
        Some(word.text)
    }

    /// name := rest of the line
    fn name(&self) -> &'a str {
        let line = self.line;
        match self.peek() {
            Some(token) => line[token.start..].trim(),
            None => "",
        }
    }

    /// A number glued to a word only counts when the word is a unit
    fn glued_word_rejected(&self) -> bool {
        self.peek()
            .map(|token| token.glued && token.kind == TokenKind::Word)
            .unwrap_or(false)
    }

    fn parse(mut self) -> ParsedIngredient {
        let Some(quantity) = self.quantity() else {
            return ParsedIngredient::name_only(self.line);
        };

        let unit = self.unit();
        if unit.is_none() && self.glued_word_rejected() {
            return ParsedIngredient::name_only(self.line);
        }

        ParsedIngredient::new(quantity, unit.unwrap_or(""), self.name())
    }
}

/// Parse a single ingredient line
///
/// The result may carry an empty name (e.g. for "2 cups"); callers drop such
/// entries.
pub fn parse_ingredient_line(line: &str) -> ParsedIngredient {
    let parsed = LineParser::new(line.trim()).parse();
    trace!(
        "Parsed '{}' -> quantity='{}' unit='{}' name='{}'",
        line,
        parsed.quantity,
        parsed.unit,
        parsed.name
    );
    parsed
}

/// Parse a comma-separated ingredient list, dropping entries without a name
pub fn parse_ingredient_list(text: &str) -> Vec<ParsedIngredient> {
    let parsed: Vec<ParsedIngredient> = text
        .split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(parse_ingredient_line)
        .filter(ParsedIngredient::has_name)
        .collect();

    debug!("Parsed {} ingredients from list", parsed.len());
    parsed
}

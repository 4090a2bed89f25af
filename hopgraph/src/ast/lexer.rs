// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Lexer for the traversal query language
//!
//! The lexer turns query text into a flat token stream using small nom
//! parsers tried in a fixed order by [`token`]. Every parser must either
//! consume input or fail; the main loop in [`Lexer::tokenize`] rejects a
//! token that leaves the input unchanged so a faulty parser cannot spin
//! forever.
//!
//! Ordering rules inside [`token`]:
//! 1. Whitespace and comments first.
//! 2. Input references (`$^`, `$$`, `$-`, `$name`) before operators.
//! 3. Float literals before integer literals.
//! 4. Multi-character operators before single-character ones.
//! 5. Keywords are recognized from identifiers through a lookup table, so a
//!    keyword never swallows the prefix of a longer identifier.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_until, take_while},
    character::complete::{alpha1, alphanumeric1, char, digit1, one_of},
    combinator::{map, map_res, opt, recognize},
    multi::many0,
    sequence::{pair, tuple},
    IResult,
};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Token types for the query language
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Keywords
    Go,
    From,
    Over,
    Reversely,
    Bidirect,
    Steps,
    To,
    Where,
    Yield,
    Distinct,
    As,
    Find,
    Shortest,
    All,
    Path,
    Upto,
    Union,
    Minus,
    Intersect,
    And,
    Or,
    Xor,
    Not,
    Contains,
    Is,

    // Operators
    Plus,         // +
    Dash,         // -
    Star,         // *
    Slash,        // /
    Percent,      // %
    Equal,        // ==
    Assign,       // =
    NotEqual,     // != or <>
    LessThan,     // <
    LessEqual,    // <=
    GreaterThan,  // >
    GreaterEqual, // >=
    Regex,        // =~
    Bang,         // !

    // Delimiters
    LeftParen,    // (
    RightParen,   // )
    LeftBracket,  // [
    RightBracket, // ]
    Comma,        // ,
    Semicolon,    // ;
    Dot,          // .
    Pipe,         // |

    // Input references
    SourceRef,        // $^
    DestinationRef,   // $$
    InputRef,         // $-
    Variable(String), // $name

    // Literals
    String(String),
    Integer(u64),
    Float(f64),
    Boolean(bool),
    Null,

    // Identifiers (plain or backtick-quoted)
    Identifier(String),

    // Whitespace and comments
    Whitespace,
    Comment,

    // End of input
    EOF,
}

/// Keyword table, looked up case-insensitively
static KEYWORDS: Lazy<HashMap<&'static str, Token>> = Lazy::new(|| {
    HashMap::from([
        ("GO", Token::Go),
        ("FROM", Token::From),
        ("OVER", Token::Over),
        ("REVERSELY", Token::Reversely),
        ("BIDIRECT", Token::Bidirect),
        ("STEPS", Token::Steps),
        ("STEP", Token::Steps),
        ("TO", Token::To),
        ("WHERE", Token::Where),
        ("YIELD", Token::Yield),
        ("DISTINCT", Token::Distinct),
        ("AS", Token::As),
        ("FIND", Token::Find),
        ("SHORTEST", Token::Shortest),
        ("ALL", Token::All),
        ("PATH", Token::Path),
        ("UPTO", Token::Upto),
        ("UNION", Token::Union),
        ("MINUS", Token::Minus),
        ("INTERSECT", Token::Intersect),
        ("AND", Token::And),
        ("OR", Token::Or),
        ("XOR", Token::Xor),
        ("NOT", Token::Not),
        ("CONTAINS", Token::Contains),
        ("IS", Token::Is),
        ("NULL", Token::Null),
        ("TRUE", Token::Boolean(true)),
        ("FALSE", Token::Boolean(false)),
    ])
});

impl Token {
    /// Source text of a keyword token, used where keywords may act as names
    pub fn keyword_text(&self) -> Option<&'static str> {
        KEYWORDS
            .iter()
            .find(|(text, token)| **token == *self && **text != "STEP")
            .map(|(text, _)| *text)
    }
}

/// Lexer state
#[derive(Debug, Clone)]
pub struct Lexer {
    input: String,
}

impl Lexer {
    pub fn new(input: String) -> Self {
        Self { input }
    }

    pub fn tokenize(&self) -> Result<Vec<Token>, String> {
        let mut remaining = self.input.as_str();
        let mut tokens = Vec::new();

        while !remaining.is_empty() {
            match token(remaining) {
                Ok((next_remaining, token)) => {
                    if next_remaining.len() >= remaining.len() {
                        return Err(format!(
                            "Lexer made no progress at '{}' (token {:?})",
                            preview(remaining),
                            token
                        ));
                    }

                    if !matches!(token, Token::Whitespace | Token::Comment) {
                        tokens.push(token);
                    }
                    remaining = next_remaining;
                }
                Err(_) => {
                    let offset = self.input.len() - remaining.len();
                    return Err(format!(
                        "Unrecognized input at offset {}: '{}'",
                        offset,
                        preview(remaining)
                    ));
                }
            }
        }
        tokens.push(Token::EOF);
        Ok(tokens)
    }
}

fn preview(input: &str) -> String {
    input.chars().take(20).collect()
}

/// Parse a single token
fn token(input: &str) -> IResult<&str, Token> {
    alt((
        whitespace,
        map(comment, |_| Token::Comment),
        input_reference,
        map(float_literal, Token::Float),
        map(integer_literal, Token::Integer),
        map(string_literal, Token::String),
        map(backtick_identifier, Token::Identifier),
        operator,
        word,
    ))(input)
}

/// Parse whitespace; fails when no whitespace is present
fn whitespace(input: &str) -> IResult<&str, Token> {
    let (remaining, whitespace_chars) = take_while(|c: char| c.is_whitespace())(input)?;
    if whitespace_chars.is_empty() {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Space,
        )));
    }
    Ok((remaining, Token::Whitespace))
}

/// Parse `#`, `//` and `/* */` comments
fn comment(input: &str) -> IResult<&str, &str> {
    alt((
        recognize(pair(tag("#"), take_while(|c| c != '\n'))),
        recognize(pair(tag("//"), take_while(|c| c != '\n'))),
        recognize(tuple((tag("/*"), take_until("*/"), tag("*/")))),
    ))(input)
}

/// Parse `$^`, `$$`, `$-` and `$name`
fn input_reference(input: &str) -> IResult<&str, Token> {
    alt((
        map(tag("$^"), |_| Token::SourceRef),
        map(tag("$$"), |_| Token::DestinationRef),
        map(tag("$-"), |_| Token::InputRef),
        map(pair(char('$'), identifier), |(_, name): (char, &str)| {
            Token::Variable(name.to_string())
        }),
    ))(input)
}

/// Parse operators and delimiters, longest match first
fn operator(input: &str) -> IResult<&str, Token> {
    alt((
        alt((
            map(tag("=="), |_| Token::Equal),
            map(tag("=~"), |_| Token::Regex),
            map(tag("!="), |_| Token::NotEqual),
            map(tag("<>"), |_| Token::NotEqual),
            map(tag("<="), |_| Token::LessEqual),
            map(tag(">="), |_| Token::GreaterEqual),
            map(tag("&&"), |_| Token::And),
            map(tag("||"), |_| Token::Or),
        )),
        alt((
            map(char('='), |_| Token::Assign),
            map(char('<'), |_| Token::LessThan),
            map(char('>'), |_| Token::GreaterThan),
            map(char('!'), |_| Token::Bang),
            map(char('+'), |_| Token::Plus),
            map(char('-'), |_| Token::Dash),
            map(char('*'), |_| Token::Star),
            map(char('/'), |_| Token::Slash),
            map(char('%'), |_| Token::Percent),
        )),
        alt((
            map(char('('), |_| Token::LeftParen),
            map(char(')'), |_| Token::RightParen),
            map(char('['), |_| Token::LeftBracket),
            map(char(']'), |_| Token::RightBracket),
            map(char(','), |_| Token::Comma),
            map(char(';'), |_| Token::Semicolon),
            map(char('.'), |_| Token::Dot),
            map(char('|'), |_| Token::Pipe),
        )),
    ))(input)
}

/// Parse a keyword or an identifier
fn word(input: &str) -> IResult<&str, Token> {
    map(identifier, |s: &str| {
        KEYWORDS
            .get(s.to_ascii_uppercase().as_str())
            .cloned()
            .unwrap_or_else(|| Token::Identifier(s.to_string()))
    })(input)
}

/// Parse identifiers
fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))(input)
}

/// Parse a backtick-quoted identifier; a doubled backtick stands for one backtick
fn backtick_identifier(input: &str) -> IResult<&str, String> {
    let (mut rest, _) = char('`')(input)?;
    let mut name = String::new();
    loop {
        let mut chars = rest.chars();
        match chars.next() {
            Some('`') if rest[1..].starts_with('`') => {
                name.push('`');
                rest = &rest[2..];
            }
            Some('`') => return Ok((&rest[1..], name)),
            Some(c) => {
                name.push(c);
                rest = chars.as_str();
            }
            None => {
                return Err(nom::Err::Error(nom::error::Error::new(
                    input,
                    nom::error::ErrorKind::Char,
                )))
            }
        }
    }
}

/// Parse a single- or double-quoted string literal, resolving escapes
fn string_literal(input: &str) -> IResult<&str, String> {
    let (mut rest, quote) = one_of("\"'")(input)?;
    let mut value = String::new();
    loop {
        let mut chars = rest.chars();
        match chars.next() {
            Some('\\') => {
                let escaped = match chars.next() {
                    Some('n') => '\n',
                    Some('t') => '\t',
                    Some('r') => '\r',
                    Some('0') => '\0',
                    Some(c) => c,
                    None => {
                        return Err(nom::Err::Error(nom::error::Error::new(
                            input,
                            nom::error::ErrorKind::Escaped,
                        )))
                    }
                };
                value.push(escaped);
                rest = chars.as_str();
            }
            Some(c) if c == quote => return Ok((chars.as_str(), value)),
            Some(c) => {
                value.push(c);
                rest = chars.as_str();
            }
            None => {
                return Err(nom::Err::Error(nom::error::Error::new(
                    input,
                    nom::error::ErrorKind::Char,
                )))
            }
        }
    }
}

/// Parse integer literals as magnitudes (sign is handled by the parser)
fn integer_literal(input: &str) -> IResult<&str, u64> {
    map_res(digit1, |s: &str| s.parse::<u64>())(input)
}

/// Parse float literals such as `1.5` or `2.0e3`
fn float_literal(input: &str) -> IResult<&str, f64> {
    map_res(
        recognize(tuple((
            digit1,
            char('.'),
            digit1,
            opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
        ))),
        |s: &str| s.parse::<f64>(),
    )(input)
}

/// Public function to tokenize input
pub fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    Lexer::new(input.to_string()).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_go_statement_tokens() {
        let tokens = tokenize("GO 2 STEPS FROM \"Tim Duncan\" OVER like YIELD like._dst").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Go,
                Token::Integer(2),
                Token::Steps,
                Token::From,
                Token::String("Tim Duncan".to_string()),
                Token::Over,
                Token::Identifier("like".to_string()),
                Token::Yield,
                Token::Identifier("like".to_string()),
                Token::Dot,
                Token::Identifier("_dst".to_string()),
                Token::EOF,
            ]
        );
    }

    #[test]
    fn test_keywords_are_case_insensitive_and_bounded() {
        let tokens = tokenize("go From toward").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Go,
                Token::From,
                Token::Identifier("toward".to_string()),
                Token::EOF
            ]
        );
    }

    #[test]
    fn test_references_and_operators() {
        let tokens = tokenize("$^.player.age >= 30 && $$.team.name != 'x' | $-.id, $var.c").unwrap();
        assert_eq!(tokens[0], Token::SourceRef);
        assert_eq!(tokens[5], Token::GreaterEqual);
        assert_eq!(tokens[7], Token::And);
        assert_eq!(tokens[8], Token::DestinationRef);
        assert_eq!(tokens[13], Token::NotEqual);
        assert_eq!(tokens[15], Token::Pipe);
        assert_eq!(tokens[16], Token::InputRef);
        assert_eq!(tokens[20], Token::Variable("var".to_string()));
    }

    #[test]
    fn test_literals() {
        let tokens = tokenize(r#"1.5 42 'it\'s' "a\"b" `my col` true NULL"#).unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Float(1.5),
                Token::Integer(42),
                Token::String("it's".to_string()),
                Token::String("a\"b".to_string()),
                Token::Identifier("my col".to_string()),
                Token::Boolean(true),
                Token::Null,
                Token::EOF,
            ]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        let tokens = tokenize("GO # trailing\n FROM /* block * comment */ 1 // end").unwrap();
        assert_eq!(
            tokens,
            vec![Token::Go, Token::From, Token::Integer(1), Token::EOF]
        );
    }

    #[test]
    fn test_unterminated_string_is_an_error() {
        assert!(tokenize("GO FROM \"Tim").is_err());
        assert!(tokenize("YIELD @").is_err());
    }

    #[test]
    fn test_keyword_text() {
        assert_eq!(Token::Path.keyword_text(), Some("PATH"));
        assert_eq!(Token::Steps.keyword_text(), Some("STEPS"));
        assert_eq!(Token::Dot.keyword_text(), None);
    }

    #[test]
    fn test_integer_magnitude_past_i64() {
        let tokens = tokenize("-9223372036854775808").unwrap();
        assert_eq!(
            tokens,
            vec![Token::Dash, Token::Integer(9_223_372_036_854_775_808), Token::EOF]
        );
        assert!(tokenize("18446744073709551616").is_err());
    }
}

//! A small CSS selector engine for synthetic documents.
//!
//! Supports selector lists of compound selectors built from:
//!
//! - a type selector (`button`) or the universal selector (`*`)
//! - class (`.btn`) and id (`#header`) selectors
//! - attribute selectors: `[role]`, `[type="submit"]`, `[class~=a]`,
//!   `[class|=a]`, `[class^=a]`, `[class$=a]`, `[class*=a]`
//!
//! Combinators and pseudo-classes are rejected.

use cssparser::{ParseError, Parser, ParserInput, Token};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid selector '{selector}': {message}")]
pub struct SelectorError {
    pub selector: String,
    pub message: String,
}

/// What a selector can be matched against.
pub trait Matchable {
    /// Lowercase tag name.
    fn tag(&self) -> &str;

    /// Attribute value by lowercase name.
    fn attribute(&self, name: &str) -> Option<&str>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttrOp {
    Equals,
    Includes,
    DashMatch,
    Prefix,
    Suffix,
    Substring,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Simple {
    Class(String),
    Id(String),
    Attribute {
        name: String,
        test: Option<(AttrOp, String)>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    simple: Vec<Simple>,
}

/// A parsed, comma-separated selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    compounds: Vec<Compound>,
}

impl SelectorList {
    pub fn parse(selectors: &str) -> Result<Self, SelectorError> {
        let mut input = ParserInput::new(selectors);
        let mut parser = Parser::new(&mut input);

        parser
            .parse_comma_separated(|p| parse_compound(p))
            .map(|compounds| SelectorList { compounds })
            .map_err(|e| SelectorError {
                selector: selectors.to_string(),
                message: format!("{:?}", e.kind),
            })
    }

    /// Whether any selector of the list matches.
    pub fn matches(&self, element: &dyn Matchable) -> bool {
        self.compounds.iter().any(|c| c.matches(element))
    }
}

impl Compound {
    fn matches(&self, element: &dyn Matchable) -> bool {
        if let Some(tag) = &self.tag {
            if tag != element.tag() {
                return false;
            }
        }
        self.simple.iter().all(|s| s.matches(element))
    }
}

impl Simple {
    fn matches(&self, element: &dyn Matchable) -> bool {
        match self {
            Simple::Class(class) => element
                .attribute("class")
                .is_some_and(|classes| classes.split_whitespace().any(|c| c == class)),
            Simple::Id(id) => element.attribute("id") == Some(id.as_str()),
            Simple::Attribute { name, test } => {
                let Some(actual) = element.attribute(name) else {
                    return false;
                };
                match test {
                    None => true,
                    Some((op, expected)) => op.test(actual, expected),
                }
            }
        }
    }
}

impl AttrOp {
    fn test(self, actual: &str, expected: &str) -> bool {
        match self {
            AttrOp::Equals => actual == expected,
            AttrOp::Includes => actual.split_whitespace().any(|word| word == expected),
            AttrOp::DashMatch => {
                actual == expected
                    || actual
                        .strip_prefix(expected)
                        .is_some_and(|rest| rest.starts_with('-'))
            }
            // Empty values never match these three.
            AttrOp::Prefix => !expected.is_empty() && actual.starts_with(expected),
            AttrOp::Suffix => !expected.is_empty() && actual.ends_with(expected),
            AttrOp::Substring => !expected.is_empty() && actual.contains(expected),
        }
    }
}

fn parse_compound<'i, 't>(input: &mut Parser<'i, 't>) -> Result<Compound, ParseError<'i, ()>> {
    let mut compound = Compound {
        tag: None,
        simple: Vec::new(),
    };
    let mut universal = false;
    let mut first = true;

    input.skip_whitespace();
    loop {
        let token = match input.next_including_whitespace() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };

        match token {
            Token::Ident(tag) if first => compound.tag = Some(tag.to_ascii_lowercase()),
            Token::Delim('*') if first => universal = true,
            Token::Delim('.') => {
                let next = input.next_including_whitespace()?.clone();
                let class = match next {
                    Token::Ident(class) => class.to_string(),
                    other => return Err(input.new_unexpected_token_error(other)),
                };
                compound.simple.push(Simple::Class(class));
            }
            Token::IDHash(id) | Token::Hash(id) => compound.simple.push(Simple::Id(id.to_string())),
            Token::SquareBracketBlock => {
                let attribute = input.parse_nested_block(parse_attribute)?;
                compound.simple.push(attribute);
            }
            Token::WhiteSpace(_) => {
                // Trailing whitespace is fine; anything after it is a combinator.
                if !input.is_exhausted() {
                    return Err(input.new_custom_error(()));
                }
                break;
            }
            other => return Err(input.new_unexpected_token_error(other)),
        }
        first = false;
    }

    if compound.tag.is_none() && !universal && compound.simple.is_empty() {
        return Err(input.new_custom_error(()));
    }
    Ok(compound)
}

fn parse_attribute<'i, 't>(input: &mut Parser<'i, 't>) -> Result<Simple, ParseError<'i, ()>> {
    let name = input.expect_ident()?.to_ascii_lowercase();
    if input.is_exhausted() {
        return Ok(Simple::Attribute { name, test: None });
    }

    let next = input.next()?.clone();
    let op = match next {
        Token::Delim('=') => AttrOp::Equals,
        Token::IncludeMatch => AttrOp::Includes,
        Token::DashMatch => AttrOp::DashMatch,
        Token::PrefixMatch => AttrOp::Prefix,
        Token::SuffixMatch => AttrOp::Suffix,
        Token::SubstringMatch => AttrOp::Substring,
        other => return Err(input.new_unexpected_token_error(other)),
    };

    let next = input.next()?.clone();
    let value = match next {
        Token::Ident(value) | Token::QuotedString(value) => value.to_string(),
        other => return Err(input.new_unexpected_token_error(other)),
    };
    input.expect_exhausted()?;

    Ok(Simple::Attribute {
        name,
        test: Some((op, value)),
    })
}

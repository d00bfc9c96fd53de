//! Lenient HTML start tag parsing.
//!
//! Image references arrive as HTML serializations (`<img src="...">`), which
//! are not well-formed XML: the tag is never closed and attribute values may
//! be unquoted. This module reads the attributes of a single start tag
//! without requiring the rest of the markup to parse.

use indexmap::IndexMap;
use winnow::{
    Parser as _,
    ascii::multispace0,
    combinator::{alt, delimited, opt, preceded, repeat, terminated},
    error::{ContextError, ErrMode},
    token::{take_till, take_while},
};

use crate::error::{ErrorCode, ParseError, Result};

type Input<'src> = &'src str;
type IResult<O> = std::result::Result<O, ErrMode<ContextError>>;

/// Reads the attributes of the first `<name ...>` start tag in `markup`.
///
/// The tag name is matched case-insensitively. Attribute names are
/// lowercased, values have HTML character references decoded, and
/// attributes without a value map to an empty string. When an attribute is
/// repeated the first occurrence wins, as in HTML.
///
/// # Errors
///
/// Returns [`ErrorCode::E200`] if no such start tag exists and
/// [`ErrorCode::E201`] if its attribute list cannot be read.
///
/// # Examples
///
/// ```
/// # use svgsift_parser::tag::start_tag_attributes;
/// let attributes = start_tag_attributes(r#"<IMG alt=logo SRC="/a.svg?x=1&amp;y=2">"#, "img").unwrap();
/// assert_eq!(attributes.get("src").map(String::as_str), Some("/a.svg?x=1&y=2"));
/// assert_eq!(attributes.get("alt").map(String::as_str), Some("logo"));
/// ```
pub fn start_tag_attributes(markup: &str, name: &str) -> Result<IndexMap<String, String>> {
    let start = find_start_tag(markup, name).ok_or_else(|| {
        ParseError::new(ErrorCode::E200, format!("no <{name}> start tag in markup"))
    })?;

    let mut input: Input<'_> = &markup[start + 1 + name.len()..];
    let raw = start_tag_rest(&mut input).map_err(|_| {
        ParseError::new(ErrorCode::E201, format!("malformed <{name}> start tag"))
    })?;

    let mut attributes = IndexMap::with_capacity(raw.len());
    for (key, value) in raw {
        attributes
            .entry(key.to_ascii_lowercase())
            .or_insert_with(|| value.map(decode_character_references).unwrap_or_default());
    }
    Ok(attributes)
}

/// Byte offset of the `<` opening the first `<name` tag.
///
/// The name must be followed by whitespace, `/` or `>` so that `<image` is
/// not mistaken for `<img`.
fn find_start_tag(markup: &str, name: &str) -> Option<usize> {
    let haystack = markup.as_bytes();
    let needle = name.as_bytes();

    (0..haystack.len()).find(|&at| {
        haystack[at] == b'<'
            && haystack
                .get(at + 1..at + 1 + needle.len())
                .is_some_and(|candidate| candidate.eq_ignore_ascii_case(needle))
            && haystack
                .get(at + 1 + needle.len())
                .is_none_or(|next| next.is_ascii_whitespace() || matches!(next, b'/' | b'>'))
    })
}

/// Parses the attribute list and the closing `>` of a start tag whose
/// `<name` has already been consumed.
fn start_tag_rest<'src>(input: &mut Input<'src>) -> IResult<Vec<(&'src str, Option<&'src str>)>> {
    terminated(repeat(0.., attribute), (multispace0, opt('/'), '>')).parse_next(input)
}

/// Parses `name`, `name=value`, `name="value"` or `name='value'`.
fn attribute<'src>(input: &mut Input<'src>) -> IResult<(&'src str, Option<&'src str>)> {
    preceded(multispace0, (attribute_name, opt(attribute_value))).parse_next(input)
}

fn attribute_name<'src>(input: &mut Input<'src>) -> IResult<&'src str> {
    take_while(1.., |c: char| {
        !c.is_whitespace() && !matches!(c, '=' | '>' | '/' | '"' | '\'')
    })
    .parse_next(input)
}

fn attribute_value<'src>(input: &mut Input<'src>) -> IResult<&'src str> {
    preceded(
        (multispace0, '=', multispace0),
        alt((double_quoted, single_quoted, unquoted)),
    )
    .parse_next(input)
}

fn double_quoted<'src>(input: &mut Input<'src>) -> IResult<&'src str> {
    delimited('"', take_till(0.., '"'), '"').parse_next(input)
}

fn single_quoted<'src>(input: &mut Input<'src>) -> IResult<&'src str> {
    delimited('\'', take_till(0.., '\''), '\'').parse_next(input)
}

fn unquoted<'src>(input: &mut Input<'src>) -> IResult<&'src str> {
    take_while(1.., |c: char| !c.is_whitespace() && c != '>').parse_next(input)
}

/// Decodes the character references a serializer emits in attribute values.
fn decode_character_references(value: &str) -> String {
    if !value.contains('&') {
        return value.to_string();
    }

    let mut decoded = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(at) = rest.find('&') {
        decoded.push_str(&rest[..at]);
        rest = &rest[at..];

        let replacement = rest
            .find(';')
            .and_then(|end| decode_reference(&rest[1..end]).map(|c| (c, end)));
        match replacement {
            Some((c, end)) => {
                decoded.push(c);
                rest = &rest[end + 1..];
            }
            None => {
                decoded.push('&');
                rest = &rest[1..];
            }
        }
    }
    decoded.push_str(rest);
    decoded
}

fn decode_reference(reference: &str) -> Option<char> {
    match reference {
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "lt" => Some('<'),
        "gt" => Some('>'),
        _ => {
            let code = match reference.strip_prefix('#')? {
                hex if hex.starts_with(['x', 'X']) => u32::from_str_radix(&hex[1..], 16).ok()?,
                decimal => decimal.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

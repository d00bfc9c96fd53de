//! Parsing of SVG length and `viewBox` attribute values.

use winnow::{
    Parser as _,
    ascii::{digit1, multispace0, multispace1},
    combinator::{alt, delimited, opt, separated, terminated},
    error::{ContextError, ErrMode},
    token::{one_of, take_while},
};

use svgsift_core::geometry::ViewBox;

type Input<'src> = &'src str;
type IResult<O> = std::result::Result<O, ErrMode<ContextError>>;

/// Parses a length attribute such as `24`, `24px`, `1.5em` or `100%`,
/// returning its number with any unit suffix dropped.
///
/// Only finite, strictly positive lengths are returned: a zero or negative
/// dimension cannot describe a coordinate space.
///
/// # Examples
///
/// ```
/// # use svgsift_parser::length::parse_length;
/// assert_eq!(parse_length("24px"), Some(24.0));
/// assert_eq!(parse_length(" 12.5 "), Some(12.5));
/// assert_eq!(parse_length("auto"), None);
/// assert_eq!(parse_length("0"), None);
/// ```
pub fn parse_length(value: &str) -> Option<f64> {
    delimited(multispace0, length, multispace0)
        .parse(value)
        .ok()
        .filter(|number| number.is_finite() && *number > 0.0)
}

/// Parses a `viewBox` value: four numbers separated by whitespace and/or a comma.
///
/// # Examples
///
/// ```
/// # use svgsift_parser::length::parse_view_box;
/// # use svgsift_core::geometry::ViewBox;
/// assert_eq!(parse_view_box("0 0 24 24"), Some(ViewBox::new(0.0, 0.0, 24.0, 24.0)));
/// assert_eq!(parse_view_box("-1,-1, 10,10"), Some(ViewBox::new(-1.0, -1.0, 10.0, 10.0)));
/// assert_eq!(parse_view_box("0 0 24"), None);
/// ```
pub fn parse_view_box(value: &str) -> Option<ViewBox> {
    let numbers: Vec<f64> = delimited(multispace0, separated(4, number, separator), multispace0)
        .parse(value)
        .ok()?;
    match numbers[..] {
        [min_x, min_y, width, height] => Some(ViewBox::new(min_x, min_y, width, height)),
        _ => None,
    }
}

fn length(input: &mut Input<'_>) -> IResult<f64> {
    terminated(number, unit).parse_next(input)
}

/// A decimal number with optional sign, fraction and exponent.
///
/// The exponent is only taken when digits follow it, so `2.5em` reads as
/// `2.5` followed by the unit `em`.
fn number(input: &mut Input<'_>) -> IResult<f64> {
    (
        opt(one_of(['+', '-'])),
        alt((
            (digit1, opt(('.', opt(digit1)))).void(),
            ('.', digit1).void(),
        )),
        opt((one_of(['e', 'E']), opt(one_of(['+', '-'])), digit1)),
    )
        .take()
        .try_map(str::parse::<f64>)
        .parse_next(input)
}

fn unit<'src>(input: &mut Input<'src>) -> IResult<&'src str> {
    alt((
        take_while(1.., |c: char| c.is_ascii_alphabetic()),
        "%",
        "",
    ))
    .parse_next(input)
}

fn separator(input: &mut Input<'_>) -> IResult<()> {
    alt(((multispace0, ',', multispace0).void(), multispace1.void())).parse_next(input)
}

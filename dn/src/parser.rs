//! RFC 2253 Distinguished Name parser
//!
//! ref: https://www.rfc-editor.org/rfc/rfc2253#section-3
//!
//! ```text
//! distinguishedName = [name]
//! name       = name-component *("," name-component)
//! name-component = attributeTypeAndValue *("+" attributeTypeAndValue)
//! attributeTypeAndValue = attributeType "=" attributeValue
//! attributeValue = string
//! string     = *( stringchar / pair )
//!              / "#" hexstring
//! pair       = "\" ( special / "\" / QUOTATION / hexpair )
//! special    = "," / "=" / "+" / "<" /  ">" / "#" / ";"
//! ```
//!
//! This is not a validating parser. Key listings are expected to hand out
//! well formed strings; the parser only rejects input it cannot decode
//! unambiguously. Quoted strings (`"..."`) are not supported.
//! `+` is treated like `,`: multi-valued RDNs are flattened into the
//! attribute sequence.

use nom::bytes::complete::{take_till, take_while};
use nom::error::{ErrorKind, ParseError};
use nom::{IResult, Parser};

use crate::error::{Error, Result};
use crate::{Attribute, DistinguishedName};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reason {
    MalformedDelimiter,
    EmptyAttributeType,
    MissingEqualsSign,
    InvalidHexRun,
    InvalidEscape,
    UnterminatedQuote,
}

/// nom error carrying the remaining input at the point of failure.
#[derive(Debug)]
struct Failure<'a> {
    input: &'a [u8],
    reason: Reason,
}

impl<'a> Failure<'a> {
    fn into_error(self, source: &[u8]) -> Error {
        let position = source.len() - self.input.len();
        match self.reason {
            Reason::MalformedDelimiter => Error::MalformedDelimiter { position },
            Reason::EmptyAttributeType => Error::EmptyAttributeType { position },
            Reason::MissingEqualsSign => Error::MissingEqualsSign { position },
            Reason::InvalidHexRun => Error::InvalidHexRun { position },
            Reason::InvalidEscape => Error::InvalidEscape { position },
            Reason::UnterminatedQuote => Error::UnterminatedQuote { position },
        }
    }
}

impl<'a> ParseError<&'a [u8]> for Failure<'a> {
    fn from_error_kind(input: &'a [u8], _kind: ErrorKind) -> Self {
        Failure {
            input,
            reason: Reason::MalformedDelimiter,
        }
    }

    fn append(_input: &'a [u8], _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

type PResult<'a, O> = IResult<&'a [u8], O, Failure<'a>>;

fn fail<O>(input: &[u8], reason: Reason) -> PResult<'_, O> {
    Err(nom::Err::Failure(Failure { input, reason }))
}

/// Characters that may follow a backslash and stand for themselves.
fn is_escapable(b: u8) -> bool {
    matches!(
        b,
        b',' | b'=' | b'+' | b'<' | b'>' | b'#' | b';' | b'\\' | b'"' | b' '
    )
}

/// Unescaped characters that end a string value.
fn is_value_delimiter(b: u8) -> bool {
    matches!(b, b',' | b'=' | b'+' | b'<' | b'>' | b'#' | b';')
}

fn spaces(input: &[u8]) -> PResult<'_, &[u8]> {
    take_while(|b: u8| b == b' ').parse(input)
}

fn type_label(input: &[u8]) -> PResult<'_, &[u8]> {
    take_till(|b: u8| b == b'=').parse(input)
}

fn hex_digits(input: &[u8]) -> PResult<'_, &[u8]> {
    take_while(|b: u8| b.is_ascii_hexdigit()).parse(input)
}

/// Attribute type: everything up to `=`, copied verbatim.
fn attribute_type(input: &[u8]) -> PResult<'_, String> {
    let (rest, key) = type_label(input)?;
    let [b'=', rest @ ..] = rest else {
        return fail(input, Reason::MissingEqualsSign);
    };
    if key.is_empty() {
        return fail(input, Reason::EmptyAttributeType);
    }
    // `=` is ASCII, so the split never lands inside a UTF-8 sequence.
    Ok((rest, String::from_utf8_lossy(key).into_owned()))
}

/// `#` hexstring. `input` starts right after the `#`.
fn hex_value(input: &[u8]) -> PResult<'_, Vec<u8>> {
    let (rest, digits) = hex_digits(input)?;
    if digits.is_empty() || digits.len() % 2 != 0 {
        return fail(input, Reason::InvalidHexRun);
    }
    match hex::decode(digits) {
        Ok(value) => Ok((rest, value)),
        Err(_) => fail(input, Reason::InvalidHexRun),
    }
}

fn hex_pair(hi: u8, lo: u8) -> Option<u8> {
    let mut byte = [0u8; 1];
    hex::decode_to_slice([hi, lo], &mut byte).ok()?;
    Some(byte[0])
}

/// Plain string value with backslash escapes.
fn string_value(input: &[u8]) -> PResult<'_, Vec<u8>> {
    let mut value = Vec::new();
    let mut rest = input;
    loop {
        match rest {
            [] => break,
            [b'\\', escaped, tail @ ..] if is_escapable(*escaped) => {
                value.push(*escaped);
                rest = tail;
            }
            [b'\\', hi, lo, tail @ ..] => match hex_pair(*hi, *lo) {
                Some(byte) => {
                    value.push(byte);
                    rest = tail;
                }
                None => return fail(rest, Reason::InvalidEscape),
            },
            [b'\\', ..] => return fail(rest, Reason::InvalidEscape),
            [b'"', ..] => return fail(rest, Reason::UnterminatedQuote),
            [b, ..] if is_value_delimiter(*b) => break,
            [b, tail @ ..] => {
                value.push(*b);
                rest = tail;
            }
        }
    }
    value.shrink_to_fit();
    Ok((rest, value))
}

/// One `type=value` component.
fn component(input: &[u8]) -> PResult<'_, Attribute> {
    let (rest, key) = attribute_type(input)?;
    let (rest, value) = match rest {
        [b'#', hex @ ..] => hex_value(hex)?,
        _ => string_value(rest)?,
    };
    Ok((rest, Attribute::new(key, value)))
}

/// Trailing spaces and the component separator, if any.
fn separator(input: &[u8]) -> PResult<'_, ()> {
    let (rest, _) = spaces(input)?;
    match rest {
        [] => Ok((rest, ())),
        [b',' | b';' | b'+', tail @ ..] => Ok((tail, ())),
        _ => fail(rest, Reason::MalformedDelimiter),
    }
}

fn attributes(input: &[u8]) -> PResult<'_, Vec<Attribute>> {
    let mut attributes = Vec::new();
    let mut rest = input;
    loop {
        let (after, _) = spaces(rest)?;
        if after.is_empty() {
            return Ok((after, attributes));
        }
        let (after, attribute) = component(after)?;
        attributes.push(attribute);
        let (after, _) = separator(after)?;
        rest = after;
    }
}

/// Parse an RFC 2253 string into its attribute sequence.
///
/// Empty input (or input made of spaces only) yields an empty sequence.
/// On error nothing parsed so far is returned.
///
/// # Example
/// ```
/// use dn::parse_dn;
///
/// let dn = parse_dn("CN=John\\,Doe,O=#41636D65").unwrap();
/// assert_eq!(dn.len(), 2);
/// assert_eq!(dn[0].value(), b"John,Doe");
/// assert_eq!(dn[1].value(), b"Acme");
/// ```
pub fn parse_dn(input: &str) -> Result<DistinguishedName> {
    let source = input.as_bytes();
    match attributes(source) {
        Ok((_, attributes)) => Ok(DistinguishedName::new(attributes)),
        Err(nom::Err::Error(failure) | nom::Err::Failure(failure)) => {
            let err = failure.into_error(source);
            log::debug!("rejecting distinguished name {:?}: {}", input, err);
            Err(err)
        }
        Err(nom::Err::Incomplete(_)) => Err(Error::MalformedDelimiter {
            position: source.len(),
        }),
    }
}

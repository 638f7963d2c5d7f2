//! Distinguished Name parsing and display
//!
//! Defined in RFC 2253 (string representation of X.500 names)
//!
//! ```text
//! CN=Alice Example,OU=Eng,O=Acme\, Inc.,C=DE
//! ```
//!
//! A DN string is parsed into a flat, ordered sequence of
//! [`Attribute`]s. The sequence can be displayed in a fixed, human friendly
//! order ([`render`]) or encoded back into an RFC 2253 string.

pub mod charset;
pub mod error;
mod parser;
pub mod render;

use std::borrow::Cow;
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use keyview::decoder::{DecodableFrom, Decoder};
use keyview::encoder::{EncodableTo, Encoder};
use serde::{Serialize, Serializer};

pub use charset::Charset;
pub use error::{Error, Result};
pub use parser::parse_dn;
pub use render::{CANONICAL_ORDER, Renderer, render_dn, render_user_id};

/// One `type=value` component of a Distinguished Name.
///
/// The value is kept as raw bytes: hex encoded values (`#...`) and `\XX`
/// escapes may produce anything, including invalid UTF-8.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    key: String,
    #[serde(serialize_with = "serialize_lossy")]
    value: Vec<u8>,
}

fn serialize_lossy<S>(value: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&String::from_utf8_lossy(value))
}

impl Attribute {
    pub fn new(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Attribute type label, e.g. `CN`
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Decoded value bytes
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Value as text, with invalid UTF-8 replaced
    pub fn value_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.value)
    }
}

/// A parsed Distinguished Name: the attributes in the order they appeared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DistinguishedName {
    attributes: Vec<Attribute>,
}

impl DistinguishedName {
    pub fn new(attributes: Vec<Attribute>) -> Self {
        Self { attributes }
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// All attributes with the given type, in order of appearance.
    pub fn values_of(&self, key: &str) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter().filter(move |a| a.key == key)
    }

    pub fn into_vec(self) -> Vec<Attribute> {
        self.attributes
    }
}

impl Deref for DistinguishedName {
    type Target = [Attribute];

    fn deref(&self) -> &Self::Target {
        &self.attributes
    }
}

impl From<Vec<Attribute>> for DistinguishedName {
    fn from(attributes: Vec<Attribute>) -> Self {
        Self::new(attributes)
    }
}

impl FromIterator<Attribute> for DistinguishedName {
    fn from_iter<I: IntoIterator<Item = Attribute>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a DistinguishedName {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.attributes.iter()
    }
}

impl IntoIterator for DistinguishedName {
    type Item = Attribute;
    type IntoIter = std::vec::IntoIter<Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.attributes.into_iter()
    }
}

/// Display form (see [`render`]), values decoded as UTF-8 lossily.
impl fmt::Display for DistinguishedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for piece in render::layout(self) {
            match piece {
                render::Piece::Text(text) => f.write_str(text)?,
                render::Piece::Value(value) => f.write_str(&String::from_utf8_lossy(value))?,
            }
        }
        Ok(())
    }
}

impl FromStr for DistinguishedName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_dn(s)
    }
}

impl DecodableFrom<&str> for DistinguishedName {}

impl Decoder<&str, DistinguishedName> for &str {
    type Error = Error;

    fn decode(&self) -> Result<DistinguishedName> {
        parse_dn(self)
    }
}

impl DecodableFrom<String> for DistinguishedName {}

impl Decoder<String, DistinguishedName> for String {
    type Error = Error;

    fn decode(&self) -> Result<DistinguishedName> {
        parse_dn(self)
    }
}

/// Escape a value for the RFC 2253 string form.
///
/// Special characters get a backslash, a leading or trailing space is
/// escaped, and bytes outside printable ASCII become `\XX`.
fn escape_value(value: &[u8], out: &mut String) {
    let last = value.len().saturating_sub(1);
    for (i, &b) in value.iter().enumerate() {
        match b {
            b',' | b'=' | b'+' | b'<' | b'>' | b'#' | b';' | b'\\' | b'"' => {
                out.push('\\');
                out.push(b as char);
            }
            b' ' if i == 0 || i == last => out.push_str("\\ "),
            0x20..=0x7e => out.push(b as char),
            _ => {
                out.push('\\');
                out.push_str(&hex::encode_upper([b]));
            }
        }
    }
}

impl EncodableTo<DistinguishedName> for String {}

impl Encoder<DistinguishedName, String> for DistinguishedName {
    type Error = Error;

    /// Encode as an RFC 2253 string, components joined by `,`.
    fn encode(&self) -> Result<String> {
        let mut out = String::new();
        for (i, attribute) in self.attributes.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            if attribute.key.is_empty() {
                return Err(Error::EmptyAttributeType {
                    position: out.len(),
                });
            }
            out.push_str(&attribute.key);
            out.push('=');
            escape_value(&attribute.value, &mut out);
        }
        Ok(out)
    }
}

//! Human readable display of Distinguished Names and user IDs
//!
//! Attributes are shown without their type labels, in a fixed order that
//! puts the most descriptive parts first:
//!
//! ```text
//! C=DE, O=Acme, OU=Eng, CN=Alice, X=1   →   Alice, Eng, Acme, DE (1)
//! ```

use std::io::{self, Write};

use crate::charset::Charset;
use crate::{Attribute, DistinguishedName, parse_dn};

/// Display order of the well-known attribute types.
pub const CANONICAL_ORDER: [&str; 7] = ["CN", "OU", "O", "STREET", "L", "ST", "C"];

/// Shown for user IDs that start with `(`.
pub const UNKNOWN_ENCODING: &str = "[Can't display this user ID (unknown encoding)]";
/// Shown for user IDs that do not start with an ASCII letter or digit.
pub const INVALID_ENCODING: &str = "[Can't display this user ID (invalid encoding)]";
/// Shown for user IDs that look like a DN but fail to parse.
pub const INVALID_DN: &str = "[Can't display this user ID (invalid DN)]";

const GROUP_SEPARATOR: &str = ", ";
const VALUE_SEPARATOR: &str = " + ";

/// Whether `key` is one of [`CANONICAL_ORDER`].
pub fn is_canonical(key: &str) -> bool {
    CANONICAL_ORDER.contains(&key)
}

/// One step of the display form: either fixed punctuation or a value that
/// still needs charset conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Piece<'a> {
    Text(&'static str),
    Value(&'a [u8]),
}

/// Lay out `dn` in display order.
///
/// Every occurrence of a type is grouped with `" + "`. Groups of canonical
/// types come first, in [`CANONICAL_ORDER`], separated by `", "`. Other types
/// follow in order of first appearance inside one pair of parentheses.
pub(crate) fn layout(dn: &DistinguishedName) -> Vec<Piece<'_>> {
    let mut others: Vec<&str> = Vec::new();
    for attribute in dn.iter() {
        let key = attribute.key();
        if !is_canonical(key) && !others.contains(&key) {
            others.push(key);
        }
    }

    let mut pieces = Vec::new();
    let mut any = false;
    for key in CANONICAL_ORDER {
        if dn.values_of(key).next().is_none() {
            continue;
        }
        if any {
            pieces.push(Piece::Text(GROUP_SEPARATOR));
        }
        push_group(&mut pieces, dn.values_of(key));
        any = true;
    }

    if !others.is_empty() {
        if any {
            pieces.push(Piece::Text(" "));
        }
        pieces.push(Piece::Text("("));
        for (i, key) in others.iter().enumerate() {
            if i > 0 {
                pieces.push(Piece::Text(GROUP_SEPARATOR));
            }
            push_group(&mut pieces, dn.values_of(key));
        }
        pieces.push(Piece::Text(")"));
    }
    pieces
}

fn push_group<'a>(pieces: &mut Vec<Piece<'a>>, group: impl Iterator<Item = &'a Attribute>) {
    for (i, attribute) in group.enumerate() {
        if i > 0 {
            pieces.push(Piece::Text(VALUE_SEPARATOR));
        }
        pieces.push(Piece::Value(attribute.value()));
    }
}

/// Writes Distinguished Names and user IDs in display form, converting
/// values to the display charset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Renderer {
    charset: Charset,
}

impl Renderer {
    pub fn new(charset: Charset) -> Self {
        Self { charset }
    }

    pub fn charset(&self) -> Charset {
        self.charset
    }

    /// Write UTF-8 text converted to the display charset.
    pub fn write_text<W: Write + ?Sized>(&self, out: &mut W, utf8: &[u8]) -> io::Result<()> {
        out.write_all(&self.charset.convert(utf8))
    }

    /// Write the display form of `dn`.
    pub fn render_dn<W: Write + ?Sized>(&self, dn: &DistinguishedName, out: &mut W) -> io::Result<()> {
        for piece in layout(dn) {
            match piece {
                Piece::Text(text) => out.write_all(text.as_bytes())?,
                Piece::Value(value) => self.write_text(out, value)?,
            }
        }
        Ok(())
    }

    /// Write a user ID as reported by a key listing.
    ///
    /// - `<addr>`: only the text between the angle brackets; nothing when
    ///   the closing bracket is missing.
    /// - `(...)`: [`UNKNOWN_ENCODING`].
    /// - not starting with an ASCII letter or digit: [`INVALID_ENCODING`].
    /// - anything else is taken as a DN; [`INVALID_DN`] when it does not
    ///   parse.
    pub fn render_user_id<W: Write + ?Sized>(&self, user_id: &str, out: &mut W) -> io::Result<()> {
        match user_id.as_bytes() {
            [b'<', rest @ ..] => match rest.iter().position(|&b| b == b'>') {
                Some(end) => self.write_text(out, &rest[..end]),
                None => Ok(()),
            },
            [b'(', ..] => out.write_all(UNKNOWN_ENCODING.as_bytes()),
            [first, ..] if first.is_ascii_alphanumeric() => match parse_dn(user_id) {
                Ok(dn) => self.render_dn(&dn, out),
                Err(err) => {
                    log::debug!("cannot display user ID {:?}: {}", user_id, err);
                    out.write_all(INVALID_DN.as_bytes())
                }
            },
            _ => out.write_all(INVALID_ENCODING.as_bytes()),
        }
    }
}

/// Write the display form of `dn` as UTF-8.
pub fn render_dn<W: Write + ?Sized>(dn: &DistinguishedName, out: &mut W) -> io::Result<()> {
    Renderer::default().render_dn(dn, out)
}

/// Write a user ID in display form as UTF-8.
pub fn render_user_id<W: Write + ?Sized>(user_id: &str, out: &mut W) -> io::Result<()> {
    Renderer::default().render_user_id(user_id, out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn dn(pairs: &[(&str, &str)]) -> DistinguishedName {
        pairs
            .iter()
            .map(|(key, value)| Attribute::new(*key, *value))
            .collect()
    }

    fn rendered(dn: &DistinguishedName) -> String {
        let mut out = Vec::new();
        render_dn(dn, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn rendered_user_id(renderer: &Renderer, user_id: &str) -> Vec<u8> {
        let mut out = Vec::new();
        renderer.render_user_id(user_id, &mut out).unwrap();
        out
    }

    #[rstest]
    #[case::canonical_order(&[("OU", "Eng"), ("CN", "Alice"), ("O", "Acme")], "Alice, Eng, Acme")]
    #[case::all_canonical(
        &[("C", "DE"), ("ST", "Bavaria"), ("L", "Munich"), ("STREET", "Main St 1"), ("O", "Acme"), ("OU", "Eng"), ("CN", "Alice")],
        "Alice, Eng, Acme, Main St 1, Munich, Bavaria, DE"
    )]
    #[case::gap_in_order(&[("CN", "Alice"), ("C", "DE")], "Alice, DE")]
    #[case::single(&[("CN", "Alice")], "Alice")]
    #[case::multi_value(&[("OU", "Eng"), ("CN", "Alice"), ("OU", "Sales")], "Alice, Eng + Sales")]
    #[case::others(&[("CN", "A"), ("X", "1"), ("Y", "2")], "A (1, 2)")]
    #[case::others_only(&[("EMAIL", "a@example.org")], "(a@example.org)")]
    #[case::others_grouped(&[("X", "1"), ("CN", "A"), ("Y", "2"), ("X", "3")], "A (1 + 3, 2)")]
    #[case::case_sensitive(&[("cn", "lower"), ("CN", "upper")], "upper (lower)")]
    #[case::empty(&[], "")]
    fn test_render_dn(#[case] pairs: &[(&str, &str)], #[case] expected: &str) {
        assert_eq!(rendered(&dn(pairs)), expected);
    }

    #[rstest]
    #[case::dn("CN=Alice,O=Acme,C=DE", "Alice, Acme, DE")]
    #[case::angle("<alice@example.org>", "alice@example.org")]
    #[case::angle_with_trailer("<alice@example.org> extra", "alice@example.org")]
    #[case::angle_unterminated("<alice@example.org", "")]
    #[case::paren("(3:foo)", UNKNOWN_ENCODING)]
    #[case::non_alnum("#deadbeef", INVALID_ENCODING)]
    #[case::empty("", INVALID_ENCODING)]
    #[case::invalid_dn("CN=#ABC", INVALID_DN)]
    #[case::not_a_dn("Alice Example", INVALID_DN)]
    fn test_render_user_id(#[case] user_id: &str, #[case] expected: &str) {
        let out = rendered_user_id(&Renderer::default(), user_id);
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn test_render_converts_charset() {
        let renderer = Renderer::new(Charset::for_label("iso-8859-1").unwrap());
        let out = rendered_user_id(&renderer, "CN=J\\C3\\BCrgen,O=M\\C3\\BCnchen");
        assert_eq!(out, b"J\xfcrgen, M\xfcnchen".to_vec());
    }

    #[test]
    fn test_render_binary_value_unconverted() {
        let renderer = Renderer::new(Charset::for_label("iso-8859-1").unwrap());
        let binary = DistinguishedName::new(vec![Attribute::new("CN", vec![0xff, 0x41])]);
        let mut out = Vec::new();
        renderer.render_dn(&binary, &mut out).unwrap();
        assert_eq!(out, vec![0xff, 0x41]);
    }
}

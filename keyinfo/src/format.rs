//! Key entry line templates
//!
//! A template is literal text with printf-like expandos:
//!
//! | expando | expands to                                        |
//! |---------|---------------------------------------------------|
//! | `%n`    | entry number                                      |
//! | `%p`    | protocol name                                     |
//! | `%t`    | trust character (`x` for X.509)                   |
//! | `%u`    | user ID                                           |
//! | `%a`    | key algorithm, at most 3 characters               |
//! | `%c`    | capabilities, see [`abilities`]                   |
//! | `%f`    | restriction, see [`flag_char`]                    |
//! | `%k`    | key id                                            |
//! | `%l`    | key length                                        |
//! | `%[fmt]`| creation date, `strftime` style                   |
//! | `%%`    | a literal `%`                                     |
//!
//! Each expando takes an optional `[-][0][width][.precision]` prefix.
//! Width and precision are capped at [`MAX_PADDING`].
//! `%?X?if&else?` expands `if` when `X` is set and `else` otherwise.

use std::fmt::{self, Write as _};
use std::iter::Peekable;
use std::str::{Chars, FromStr};

use chrono::DateTime;
use chrono::format::{Item, StrftimeItems};

use crate::entry::KeyEntry;
use crate::error::{Error, Result};
use crate::flags::{KeyFlags, abilities, flag_char};

pub const DEFAULT_ENTRY_FORMAT: &str = "%4n %t%f %4l/0x%k %-4a %2c %u";

const MAX_ALGORITHM_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expando {
    Number,
    Protocol,
    Trust,
    UserId,
    Algorithm,
    Abilities,
    Flags,
    KeyId,
    Length,
    Unknown(char),
}

impl Expando {
    fn from_char(c: char) -> Self {
        match c.to_ascii_lowercase() {
            'n' => Expando::Number,
            'p' => Expando::Protocol,
            't' => Expando::Trust,
            'u' => Expando::UserId,
            'a' => Expando::Algorithm,
            'c' => Expando::Abilities,
            'f' => Expando::Flags,
            'k' => Expando::KeyId,
            'l' => Expando::Length,
            _ => Expando::Unknown(c),
        }
    }
}

/// Upper bound for the width and precision of an expando.
pub const MAX_PADDING: usize = 1024;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Padding {
    left: bool,
    zero: bool,
    width: usize,
    precision: Option<usize>,
}

impl Padding {
    fn text(&self, s: &str, out: &mut String) {
        match self.precision {
            Some(precision) => {
                let truncated: String = s.chars().take(precision).collect();
                self.pad(&truncated, ' ', out);
            }
            None => self.pad(s, ' ', out),
        }
    }

    fn number(&self, n: u64, out: &mut String) {
        let digits = format!("{:0>1$}", n, self.precision.unwrap_or(0));
        let fill = if self.zero && !self.left { '0' } else { ' ' };
        self.pad(&digits, fill, out);
    }

    fn pad(&self, s: &str, fill: char, out: &mut String) {
        let missing = self.width.saturating_sub(s.chars().count());
        if !self.left {
            out.extend(std::iter::repeat_n(fill, missing));
        }
        out.push_str(s);
        if self.left {
            out.extend(std::iter::repeat_n(fill, missing));
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Expando(Padding, Expando),
    Date(Padding, String),
    Conditional {
        expando: Expando,
        if_set: Vec<Token>,
        if_unset: Vec<Token>,
    },
}

/// A compiled entry template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFormat {
    template: String,
    tokens: Vec<Token>,
    long_ids: bool,
}

impl EntryFormat {
    pub fn parse(template: &str) -> Result<Self> {
        Ok(Self {
            template: template.to_string(),
            tokens: parse_tokens(template)?,
            long_ids: true,
        })
    }

    /// Whether `%k` shows the 16 digit key id rather than the last 8.
    pub fn with_long_ids(mut self, long_ids: bool) -> Self {
        self.long_ids = long_ids;
        self
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Expand the template for the `number`th entry.
    pub fn render(&self, entry: &KeyEntry, number: usize) -> String {
        let mut out = String::new();
        self.render_tokens(&self.tokens, entry, number, &mut out);
        out
    }

    fn render_tokens(&self, tokens: &[Token], entry: &KeyEntry, number: usize, out: &mut String) {
        for token in tokens {
            match token {
                Token::Literal(text) => out.push_str(text),
                Token::Expando(padding, expando) => {
                    self.expand(*expando, padding, entry, number, out)
                }
                Token::Date(padding, pattern) => {
                    let created = entry.created().unwrap_or(DateTime::UNIX_EPOCH);
                    let mut date = String::new();
                    if write!(date, "{}", created.format(pattern)).is_err() {
                        log::debug!("cannot format date with {:?}", pattern);
                    }
                    padding.text(&date, out);
                }
                Token::Conditional {
                    expando,
                    if_set,
                    if_unset,
                } => {
                    let branch = if is_set(*expando, entry) {
                        if_set
                    } else {
                        if_unset
                    };
                    self.render_tokens(branch, entry, number, out);
                }
            }
        }
    }

    fn expand(
        &self,
        expando: Expando,
        padding: &Padding,
        entry: &KeyEntry,
        number: usize,
        out: &mut String,
    ) {
        let flags = entry.flags();
        match expando {
            Expando::Number => padding.number(number as u64, out),
            Expando::Protocol => padding.text(entry.key().protocol.name(), out),
            Expando::Trust => {
                let trust = if flags.contains(KeyFlags::IS_X509) {
                    'x'
                } else {
                    entry.validity().as_char()
                };
                padding.text(trust.encode_utf8(&mut [0; 4]), out);
            }
            Expando::UserId => padding.text(entry.uid(), out),
            Expando::Algorithm => {
                let algorithm = entry
                    .key()
                    .primary()
                    .and_then(|s| s.algorithm.as_deref())
                    .unwrap_or("?");
                let limit = padding
                    .precision
                    .map_or(MAX_ALGORITHM_LEN, |p| p.min(MAX_ALGORITHM_LEN));
                let padding = Padding {
                    precision: Some(limit),
                    ..*padding
                };
                padding.text(algorithm, out);
            }
            Expando::Abilities => padding.text(&abilities(flags), out),
            Expando::Flags => padding.text(flag_char(flags).encode_utf8(&mut [0; 4]), out),
            Expando::KeyId => padding.text(entry.key_id(self.long_ids), out),
            Expando::Length => padding.number(u64::from(entry.key_length()), out),
            Expando::Unknown(c) => log::trace!("unknown expando %{}", c),
        }
    }
}

/// `%c` is unset without abilities, `%f` without restrictions; everything
/// else is always set.
fn is_set(expando: Expando, entry: &KeyEntry) -> bool {
    match expando {
        Expando::Abilities => entry.flags().intersects(KeyFlags::ABILITIES),
        Expando::Flags => entry.flags().intersects(KeyFlags::RESTRICTIONS),
        _ => true,
    }
}

impl Default for EntryFormat {
    fn default() -> Self {
        Self {
            template: DEFAULT_ENTRY_FORMAT.to_string(),
            tokens: parse_tokens(DEFAULT_ENTRY_FORMAT).unwrap_or_default(),
            long_ids: true,
        }
    }
}

impl FromStr for EntryFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for EntryFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

/// Reject `strftime` patterns chrono cannot format.
pub(crate) fn check_date_format(pattern: &str) -> Result<()> {
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return Err(Error::Format(format!("invalid date format {:?}", pattern)));
    }
    Ok(())
}

fn parse_tokens(template: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            literal.push(c);
            continue;
        }
        match chars.peek() {
            None => {
                literal.push('%');
                continue;
            }
            Some('%') => {
                chars.next();
                literal.push('%');
                continue;
            }
            Some(_) => {}
        }
        if !literal.is_empty() {
            tokens.push(Token::Literal(std::mem::take(&mut literal)));
        }
        if chars.next_if_eq(&'?').is_some() {
            tokens.push(parse_conditional(&mut chars)?);
            continue;
        }

        let padding = parse_padding(&mut chars);
        match chars.next() {
            Some('[') => {
                let pattern = read_until(&mut chars, &[']'])
                    .map(|(pattern, _)| pattern)
                    .ok_or_else(|| Error::Format("unterminated %[ date format".to_string()))?;
                let pattern = pattern.strip_prefix('!').unwrap_or(&pattern).to_string();
                check_date_format(&pattern)?;
                tokens.push(Token::Date(padding, pattern));
            }
            Some(c) => tokens.push(Token::Expando(padding, Expando::from_char(c))),
            None => return Err(Error::Format("incomplete expando at end".to_string())),
        }
    }
    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }
    Ok(tokens)
}

fn parse_conditional(chars: &mut Peekable<Chars<'_>>) -> Result<Token> {
    let unterminated = || Error::Format("unterminated %? conditional".to_string());

    let expando = chars.next().map(Expando::from_char).ok_or_else(unterminated)?;
    if chars.next() != Some('?') {
        return Err(Error::Format("expected ? after conditional expando".to_string()));
    }
    let (if_set, end) = read_until(chars, &['&', '?']).ok_or_else(unterminated)?;
    let if_unset = match end {
        '&' => read_until(chars, &['?']).ok_or_else(unterminated)?.0,
        _ => String::new(),
    };
    Ok(Token::Conditional {
        expando,
        if_set: parse_tokens(&if_set)?,
        if_unset: parse_tokens(&if_unset)?,
    })
}

fn parse_padding(chars: &mut Peekable<Chars<'_>>) -> Padding {
    let mut padding = Padding {
        left: chars.next_if_eq(&'-').is_some(),
        zero: chars.next_if_eq(&'0').is_some(),
        ..Default::default()
    };
    padding.width = parse_number(chars).unwrap_or(0);
    if chars.next_if_eq(&'.').is_some() {
        padding.precision = Some(parse_number(chars).unwrap_or(0));
    }
    padding
}

fn parse_number(chars: &mut Peekable<Chars<'_>>) -> Option<usize> {
    let mut number: Option<usize> = None;
    while let Some(digit) = chars.next_if(char::is_ascii_digit) {
        let digit = digit.to_digit(10).unwrap_or(0) as usize;
        number = Some(number.unwrap_or(0).saturating_mul(10).saturating_add(digit));
    }
    number.map(|n| n.min(MAX_PADDING))
}

/// Consume up to and including the first of `stops`, returning the text
/// before it and the stop found.
fn read_until(chars: &mut Peekable<Chars<'_>>, stops: &[char]) -> Option<(String, char)> {
    let mut text = String::new();
    for c in chars.by_ref() {
        if stops.contains(&c) {
            return Some((text, c));
        }
        text.push(c);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::{Capabilities, Key, Protocol, Subkey, UserId, Validity};
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    fn sample_entry() -> KeyEntry {
        entry_with_validity(Validity::Full)
    }

    fn entry_with_validity(validity: Validity) -> KeyEntry {
        let key = Key {
            user_ids: vec![UserId {
                validity,
                ..UserId::new("Alice <alice@example.org>")
            }],
            subkeys: vec![Subkey {
                algorithm: Some("RSA".to_string()),
                length: 4096,
                created: Some(Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap()),
                capabilities: Capabilities {
                    encrypt: true,
                    sign: true,
                    certify: true,
                },
                ..Subkey::new("0000111122223333")
            }],
            ..Default::default()
        };
        KeyEntry::from_key(key).remove(0)
    }

    fn bare_entry() -> KeyEntry {
        let key = Key {
            protocol: Protocol::Cms,
            user_ids: vec![UserId::new("CN=Bob")],
            expired: true,
            ..Default::default()
        };
        KeyEntry::from_key(key).remove(0)
    }

    fn render(template: &str, entry: &KeyEntry) -> String {
        EntryFormat::parse(template).unwrap().render(entry, 7)
    }

    #[test]
    fn test_default_format() {
        let format = EntryFormat::default().with_long_ids(false);
        assert_eq!(
            format.render(&sample_entry(), 1),
            "   1 f  4096/0x22223333 RSA  es Alice <alice@example.org>"
        );
    }

    #[test]
    fn test_default_format_without_subkeys() {
        assert_eq!(
            EntryFormat::default().render(&bare_entry(), 12),
            "  12 xX    0/0x ?    -- CN=Bob"
        );
    }

    #[rstest]
    #[case::literal("plain text", "plain text")]
    #[case::percent("100%%", "100%")]
    #[case::trailing_percent("50%", "50%")]
    #[case::number("%n", "7")]
    #[case::zero_padded("%03n", "007")]
    #[case::precision_number("%.3n", "007")]
    #[case::left("[%-4n]", "[7   ]")]
    #[case::right("[%4n]", "[   7]")]
    #[case::protocol("%p", "OpenPGP")]
    #[case::uppercase("%P", "OpenPGP")]
    #[case::truncate("%.5u", "Alice")]
    #[case::long_id("%k", "0000111122223333")]
    #[case::algorithm_precision("%.1a", "R")]
    #[case::unknown("<%z>", "<>")]
    #[case::date("%[%Y-%m-%d]", "2020-01-02")]
    #[case::date_bang("%[!%H:%M]", "03:04")]
    #[case::date_padded("%-12[%Y]|", "2020        |")]
    #[case::conditional_set("%?c?can&cannot?", "can")]
    #[case::conditional_unset("%?f?restricted&clean?", "clean")]
    #[case::conditional_no_else("%?f?restricted?.", ".")]
    #[case::conditional_nested_expando("%?n?#%n&none?", "#7")]
    fn test_render(#[case] template: &str, #[case] expected: &str) {
        assert_eq!(render(template, &sample_entry()), expected);
    }

    #[rstest]
    #[case::ultimate(Validity::Ultimate, "u")]
    #[case::full(Validity::Full, "f")]
    #[case::marginal(Validity::Marginal, "m")]
    #[case::never(Validity::Never, "n")]
    #[case::undefined(Validity::Undefined, "q")]
    #[case::unknown(Validity::Unknown, "?")]
    fn test_render_trust(#[case] validity: Validity, #[case] expected: &str) {
        assert_eq!(render("%t", &entry_with_validity(validity)), expected);
    }

    #[rstest]
    #[case::width("%99999999999n", MAX_PADDING)]
    #[case::precision("%.99999999999n", MAX_PADDING)]
    #[case::text_width("%-5000u", MAX_PADDING)]
    fn test_padding_is_capped(#[case] template: &str, #[case] expected: usize) {
        assert_eq!(render(template, &sample_entry()).len(), expected);
    }

    #[rstest]
    #[case::flags("%?f?[%f]&clean?", "[X]")]
    #[case::abilities("%?c?%c&none?", "none")]
    #[case::epoch("%[%Y]", "1970")]
    fn test_render_bare(#[case] template: &str, #[case] expected: &str) {
        assert_eq!(render(template, &bare_entry()), expected);
    }

    #[rstest]
    #[case::unterminated_date("%[%Y")]
    #[case::unterminated_conditional("%?c?yes&no")]
    #[case::conditional_missing_mark("%?cyes?")]
    #[case::conditional_at_end("%?")]
    #[case::dangling_padding("%-4")]
    #[case::bad_strftime("%[%Q]")]
    fn test_parse_error(#[case] template: &str) {
        assert!(matches!(
            EntryFormat::parse(template),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn test_display_is_template() {
        let format: EntryFormat = "%n %u".parse().unwrap();
        assert_eq!(format.to_string(), "%n %u");
        assert_eq!(EntryFormat::default().template(), DEFAULT_ENTRY_FORMAT);
    }
}

//! Verbose key descriptions
//!
//! ```text
//!        Name: Alice <alice@example.org>
//!  Valid From: Thu Jan  2 03:04:05 2020
//!    Key Type: PGP, 4096 bit RSA
//!   Key Usage: encryption, signing, certification
//! Fingerprint: 0123 4567 89AB CDEF 0123  4567 89AB CDEF 0123 4567
//! ```

use std::io::{self, Write};

use chrono::{DateTime, Utc};
use dn::Renderer;

use crate::entry::KeyEntry;
use crate::error::Result;
use crate::format::check_date_format;
use crate::key::{Capabilities, Capability, Key, KeyLookup, Subkey};

pub const DEFAULT_DATE_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// Issuers followed before a chain is cut off.
pub const MAX_CHAIN_DEPTH: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Label {
    Name,
    Aka,
    ValidFrom,
    ValidTo,
    KeyType,
    KeyUsage,
    Fingerprint,
    SerialNo,
    IssuedBy,
    Subkey,
}

impl Label {
    const ALL: [Label; 10] = [
        Label::Name,
        Label::Aka,
        Label::ValidFrom,
        Label::ValidTo,
        Label::KeyType,
        Label::KeyUsage,
        Label::Fingerprint,
        Label::SerialNo,
        Label::IssuedBy,
        Label::Subkey,
    ];

    fn text(&self) -> &'static str {
        match self {
            Label::Name => "Name: ",
            Label::Aka => "aka: ",
            Label::ValidFrom => "Valid From: ",
            Label::ValidTo => "Valid To: ",
            Label::KeyType => "Key Type: ",
            Label::KeyUsage => "Key Usage: ",
            Label::Fingerprint => "Fingerprint: ",
            Label::SerialNo => "Serial-No: ",
            Label::IssuedBy => "Issued By: ",
            Label::Subkey => "Subkey: ",
        }
    }

    fn width() -> usize {
        Self::ALL
            .iter()
            .map(|label| label.text().chars().count())
            .max()
            .unwrap_or(0)
    }
}

/// Writes key descriptions for a display charset and date format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyReport {
    renderer: Renderer,
    date_format: String,
}

impl Default for KeyReport {
    fn default() -> Self {
        Self::new(Renderer::default())
    }
}

impl KeyReport {
    pub fn new(renderer: Renderer) -> Self {
        Self {
            renderer,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }

    /// Use a `strftime` style `pattern` for dates; fails when chrono cannot
    /// format it.
    pub fn with_date_format(mut self, pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        check_date_format(&pattern)?;
        self.date_format = pattern;
        Ok(self)
    }

    fn label<W: Write + ?Sized>(&self, out: &mut W, label: Label) -> io::Result<()> {
        write!(out, "{:>width$}", label.text(), width = Label::width())
    }

    fn date<W: Write + ?Sized>(&self, out: &mut W, label: Label, time: Option<DateTime<Utc>>) -> io::Result<()> {
        match time {
            Some(time) if time.timestamp() > 0 => {
                self.label(out, label)?;
                writeln!(out, "{}", time.format(&self.date_format))
            }
            _ => Ok(()),
        }
    }

    fn usage<W: Write + ?Sized>(&self, out: &mut W, has: impl Fn(Capability) -> bool) -> io::Result<()> {
        let usages: Vec<&str> = [
            (Capability::Encrypt, "encryption"),
            (Capability::Sign, "signing"),
            (Capability::Certify, "certification"),
        ]
        .into_iter()
        .filter(|(capability, _)| has(*capability))
        .map(|(_, name)| name)
        .collect();
        self.label(out, Label::KeyUsage)?;
        writeln!(out, "{}", usages.join(", "))
    }

    /// Write everything known about `key`.
    pub fn write_key_info<W: Write + ?Sized>(&self, key: &Key, out: &mut W) -> io::Result<()> {
        let is_pgp = !key.is_x509();

        // Only the first listed user ID is the name, even when it is revoked
        // and skipped.
        for (i, uid) in key.user_ids.iter().enumerate() {
            if uid.revoked {
                continue;
            }
            self.label(out, if i == 0 { Label::Name } else { Label::Aka })?;
            if uid.invalid {
                out.write_all(b"[Invalid] ")?;
            }
            if is_pgp {
                self.renderer.write_text(out, uid.uid.as_bytes())?;
            } else {
                self.renderer.render_user_id(&uid.uid, out)?;
            }
            writeln!(out)?;
        }

        let primary = key.primary();
        self.date(out, Label::ValidFrom, primary.and_then(|s| s.created))?;
        self.date(out, Label::ValidTo, primary.and_then(|s| s.expires))?;

        self.label(out, Label::KeyType)?;
        writeln!(
            out,
            "{}, {} bit {}",
            if is_pgp { "PGP" } else { "X.509" },
            primary.map_or(0, |s| s.length),
            primary.map_or("?", algorithm_name),
        )?;

        self.usage(out, |capability| key.has_capability(capability))?;

        if let Some(fingerprint) = key.fingerprint() {
            self.label(out, Label::Fingerprint)?;
            writeln!(out, "{}", format_fingerprint(fingerprint, is_pgp))?;
        }

        if let Some(serial) = &key.issuer_serial {
            self.label(out, Label::SerialNo)?;
            writeln!(out, "0x{}", serial)?;
        }

        if let Some(issuer) = &key.issuer_name {
            self.label(out, Label::IssuedBy)?;
            self.renderer.render_user_id(issuer, out)?;
            writeln!(out)?;
        }

        if is_pgp {
            for subkey in &key.subkeys {
                self.write_subkey(subkey, out)?;
            }
        }
        Ok(())
    }

    fn write_subkey<W: Write + ?Sized>(&self, subkey: &Subkey, out: &mut W) -> io::Result<()> {
        writeln!(out)?;
        self.label(out, Label::Subkey)?;
        write!(out, "0x{}", subkey.short_key_id())?;
        for (set, marker) in [
            (subkey.revoked, "[Revoked]"),
            (subkey.invalid, "[Invalid]"),
            (subkey.expired, "[Expired]"),
            (subkey.disabled, "[Disabled]"),
        ] {
            if set {
                write!(out, " {}", marker)?;
            }
        }
        writeln!(out)?;

        self.date(out, Label::ValidFrom, subkey.created)?;
        self.date(out, Label::ValidTo, subkey.expires)?;

        self.label(out, Label::KeyType)?;
        writeln!(out, "PGP, {} bit {}", subkey.length, algorithm_name(subkey))?;

        let capabilities: Capabilities = subkey.capabilities;
        self.usage(out, |capability| capabilities.has(capability))
    }

    /// Write the report for `key` followed by the reports of its issuers,
    /// looked up through `lookup`.
    ///
    /// The walk ends at a self-signed certificate, at a lookup failure or
    /// after [`MAX_CHAIN_DEPTH`] issuers.
    pub fn write_certificate_chain<W, L>(&self, key: &Key, lookup: &L, out: &mut W) -> io::Result<()>
    where
        W: Write + ?Sized,
        L: KeyLookup + ?Sized,
    {
        self.write_key_info(key, out)?;

        let mut current = key.clone();
        let mut depth = 0;
        while let Some(chain_id) = next_issuer(&current) {
            writeln!(out)?;
            let issuer = match lookup.lookup(&chain_id) {
                Ok(issuer) => issuer,
                Err(err) => {
                    log::warn!("issuer {} of certificate chain not found: {}", chain_id, err);
                    writeln!(out, "Error finding issuer key: {}", err)?;
                    return Ok(());
                }
            };
            self.write_key_info(&issuer, out)?;
            depth += 1;
            if depth >= MAX_CHAIN_DEPTH {
                writeln!(out)?;
                writeln!(out, "Error: certification chain too long - stopping here")?;
                break;
            }
            current = issuer;
        }
        Ok(())
    }
}

/// The issuer to follow, unless `key` has none or issued itself.
fn next_issuer(key: &Key) -> Option<String> {
    let chain_id = key.chain_id.as_deref()?;
    let primary = key.primary()?;
    match primary.fingerprint.as_deref() {
        Some(fingerprint) if fingerprint.eq_ignore_ascii_case(chain_id) => None,
        _ => Some(chain_id.to_string()),
    }
}

fn algorithm_name(subkey: &Subkey) -> &str {
    subkey.algorithm.as_deref().unwrap_or("?")
}

/// Group a fingerprint for reading.
///
/// 40 digit OpenPGP fingerprints are shown in groups of four with a wider
/// gap in the middle. Anything else is shown in pairs, separated by `:` for
/// X.509 and by a space (wider after the eighth pair) for OpenPGP.
pub fn format_fingerprint(fingerprint: &str, is_pgp: bool) -> String {
    let mut out = String::with_capacity(fingerprint.len() * 2);
    if is_pgp && fingerprint.len() == 40 {
        for (i, group) in fingerprint.as_bytes().chunks(4).enumerate() {
            if i > 0 {
                out.push(' ');
            }
            if i == 5 {
                out.push(' ');
            }
            out.push_str(&String::from_utf8_lossy(group));
        }
    } else {
        for (i, pair) in fingerprint.as_bytes().chunks(2).enumerate() {
            if i > 0 {
                out.push(if is_pgp { ' ' } else { ':' });
            }
            if is_pgp && i == 8 {
                out.push(' ');
            }
            out.push_str(&String::from_utf8_lossy(pair));
        }
    }
    out
}

/// Title of a key report: `Key ID: 0x<key id>`.
pub fn chain_title(entry: &KeyEntry, long_ids: bool) -> String {
    format!("Key ID: 0x{}", entry.key_id(long_ids))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::key::{Keyring, Protocol, UserId};
    use chrono::TimeZone;
    use dn::Charset;
    use rstest::rstest;

    fn pgp_key() -> Key {
        Key {
            user_ids: vec![
                UserId::new("Alice <alice@example.org>"),
                UserId {
                    revoked: true,
                    ..UserId::new("Alice <alice@old.example.org>")
                },
                UserId {
                    invalid: true,
                    ..UserId::new("Jürgen <j@example.org>")
                },
            ],
            subkeys: vec![
                Subkey {
                    fingerprint: Some("0123456789ABCDEF0123456789ABCDEF01234567".to_string()),
                    algorithm: Some("RSA".to_string()),
                    length: 4096,
                    created: Some(Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap()),
                    capabilities: Capabilities {
                        sign: true,
                        certify: true,
                        ..Default::default()
                    },
                    ..Subkey::new("89ABCDEF01234567")
                },
                Subkey {
                    algorithm: Some("ECDH".to_string()),
                    length: 256,
                    expired: true,
                    revoked: true,
                    expires: Some(Utc.with_ymd_and_hms(2021, 6, 7, 8, 9, 10).unwrap()),
                    capabilities: Capabilities {
                        encrypt: true,
                        ..Default::default()
                    },
                    ..Subkey::new("FEDCBA9876543210")
                },
            ],
            ..Default::default()
        }
    }

    fn certificate(name: &str, fingerprint: &str, issuer: &str) -> Key {
        Key {
            protocol: Protocol::Cms,
            user_ids: vec![UserId::new(format!("CN={},O=Acme", name))],
            subkeys: vec![Subkey {
                fingerprint: Some(fingerprint.to_string()),
                algorithm: Some("RSA".to_string()),
                length: 2048,
                ..Subkey::new(fingerprint)
            }],
            issuer_serial: Some("01AB".to_string()),
            issuer_name: Some("CN=Root CA,O=Acme".to_string()),
            chain_id: Some(issuer.to_string()),
            ..Default::default()
        }
    }

    fn report_text(report: &KeyReport, key: &Key) -> String {
        let mut out = Vec::new();
        report.write_key_info(key, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_pgp_report() {
        let expected = concat!(
            "       Name: Alice <alice@example.org>\n",
            "        aka: [Invalid] Jürgen <j@example.org>\n",
            " Valid From: Thu Jan  2 03:04:05 2020\n",
            "   Key Type: PGP, 4096 bit RSA\n",
            "  Key Usage: signing, certification\n",
            "Fingerprint: 0123 4567 89AB CDEF 0123  4567 89AB CDEF 0123 4567\n",
            "\n",
            "     Subkey: 0x01234567\n",
            " Valid From: Thu Jan  2 03:04:05 2020\n",
            "   Key Type: PGP, 4096 bit RSA\n",
            "  Key Usage: signing, certification\n",
            "\n",
            "     Subkey: 0x76543210 [Revoked] [Expired]\n",
            "   Valid To: Mon Jun  7 08:09:10 2021\n",
            "   Key Type: PGP, 256 bit ECDH\n",
            "  Key Usage: encryption\n",
        );
        assert_eq!(report_text(&KeyReport::default(), &pgp_key()), expected);
    }

    #[test]
    fn test_x509_report() {
        let key = certificate("Alice", "AABBCCDDEEFF", "112233");
        let expected = concat!(
            "       Name: Alice, Acme\n",
            "   Key Type: X.509, 2048 bit RSA\n",
            "  Key Usage: \n",
            "Fingerprint: AA:BB:CC:DD:EE:FF\n",
            "  Serial-No: 0x01AB\n",
            "  Issued By: Root CA, Acme\n",
        );
        assert_eq!(report_text(&KeyReport::default(), &key), expected);
    }

    #[test]
    fn test_report_without_subkeys() {
        let key = Key {
            user_ids: vec![UserId::new("Bob")],
            ..Default::default()
        };
        let expected = concat!(
            "       Name: Bob\n",
            "   Key Type: PGP, 0 bit ?\n",
            "  Key Usage: \n",
        );
        assert_eq!(report_text(&KeyReport::default(), &key), expected);
    }

    #[test]
    fn test_report_charset_and_date_format() {
        let report = KeyReport::new(Renderer::new(Charset::for_label("iso-8859-1").unwrap()))
            .with_date_format("%Y-%m-%d")
            .unwrap();
        let mut out = Vec::new();
        report.write_key_info(&pgp_key(), &mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(out.windows(7).any(|w| w == b"J\xfcrgen "));
        assert!(text.contains(" Valid From: 2020-01-02\n"));
    }

    #[test]
    fn test_invalid_date_format() {
        assert!(matches!(
            KeyReport::default().with_date_format("%Q"),
            Err(Error::Format(_))
        ));
    }

    #[rstest]
    #[case::pgp_v4(
        "0123456789ABCDEF0123456789ABCDEF01234567",
        true,
        "0123 4567 89AB CDEF 0123  4567 89AB CDEF 0123 4567"
    )]
    #[case::pgp_v3("0123456789ABCDEF0123456789ABCDEF", true, "01 23 45 67 89 AB CD EF  01 23 45 67 89 AB CD EF")]
    #[case::pgp_short("0123456789ABCDEF", true, "01 23 45 67 89 AB CD EF")]
    #[case::x509("0123456789", false, "01:23:45:67:89")]
    #[case::odd("ABCDE", false, "AB:CD:E")]
    #[case::empty("", false, "")]
    fn test_format_fingerprint(#[case] fingerprint: &str, #[case] is_pgp: bool, #[case] expected: &str) {
        assert_eq!(format_fingerprint(fingerprint, is_pgp), expected);
    }

    fn chain_text(key: &Key, keyring: &Keyring) -> String {
        let mut out = Vec::new();
        KeyReport::default()
            .write_certificate_chain(key, keyring, &mut out)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_chain_to_root() {
        let root = certificate("Root CA", "CCCC0000000000000000", "CCCC0000000000000000");
        let intermediate = certificate("Sub CA", "BBBB0000000000000000", "cccc0000000000000000");
        let leaf = certificate("Alice", "AAAA0000000000000000", "BBBB0000000000000000");
        let keyring = Keyring::new(vec![root, intermediate]);

        let text = chain_text(&leaf, &keyring);
        let names: Vec<&str> = text
            .lines()
            .filter(|line| line.trim_start().starts_with("Name:"))
            .collect();
        assert_eq!(
            names,
            vec![
                "       Name: Alice, Acme",
                "       Name: Sub CA, Acme",
                "       Name: Root CA, Acme",
            ]
        );
        assert!(!text.contains("Error"));
    }

    #[test]
    fn test_chain_missing_issuer() {
        let leaf = certificate("Alice", "AAAA0000000000000000", "BBBB0000000000000000");
        let text = chain_text(&leaf, &Keyring::default());
        assert!(text.ends_with("\n\nError finding issuer key: key not found: BBBB0000000000000000\n"));
    }

    #[test]
    fn test_chain_too_long() {
        let a = certificate("A", "AAAA0000000000000000", "BBBB0000000000000000");
        let b = certificate("B", "BBBB0000000000000000", "AAAA0000000000000000");
        let keyring = Keyring::new(vec![a.clone(), b]);

        let text = chain_text(&a, &keyring);
        let reports = text
            .lines()
            .filter(|line| line.trim_start().starts_with("Name:"))
            .count();
        assert_eq!(reports, MAX_CHAIN_DEPTH + 1);
        assert!(text.ends_with("\n\nError: certification chain too long - stopping here\n"));
    }

    #[test]
    fn test_chain_pgp_without_chain_id() {
        let text = chain_text(&pgp_key(), &Keyring::default());
        assert_eq!(text, report_text(&KeyReport::default(), &pgp_key()));
    }

    #[rstest]
    #[case::short(false, "Key ID: 0x01234567")]
    #[case::long(true, "Key ID: 0x89ABCDEF01234567")]
    fn test_chain_title(#[case] long_ids: bool, #[case] expected: &str) {
        let entry = KeyEntry::from_key(pgp_key()).remove(0);
        assert_eq!(chain_title(&entry, long_ids), expected);
    }
}

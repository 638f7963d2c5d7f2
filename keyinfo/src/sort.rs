use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entry::KeyEntry;
use crate::error::{Error, Result};
use crate::flags::KeyFlags;

const REVERSE_PREFIX: &str = "reverse-";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortBy {
    #[default]
    Address,
    KeyId,
    Date,
    Trust,
}

impl SortBy {
    pub fn name(&self) -> &'static str {
        match self {
            SortBy::Address => "address",
            SortBy::KeyId => "keyid",
            SortBy::Date => "date",
            SortBy::Trust => "trust",
        }
    }
}

/// Order of the key table, written as `address`, `keyid`, `date` or
/// `trust`, optionally prefixed with `reverse-`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SortKeys {
    pub by: SortBy,
    pub reverse: bool,
}

impl SortKeys {
    pub fn new(by: SortBy, reverse: bool) -> Self {
        Self { by, reverse }
    }

    pub fn compare(&self, a: &KeyEntry, b: &KeyEntry) -> Ordering {
        let ordering = match self.by {
            SortBy::Address => compare_address(a, b),
            SortBy::KeyId => compare_key_id(a, b),
            SortBy::Date => compare_date(a, b),
            SortBy::Trust => compare_trust(a, b),
        };
        if self.reverse {
            ordering.reverse()
        } else {
            ordering
        }
    }

    /// Stable sort of `entries`.
    pub fn sort(&self, entries: &mut [KeyEntry]) {
        entries.sort_by(|a, b| self.compare(a, b));
    }
}

/// ASCII case-insensitive comparison.
fn compare_ignore_case(a: &str, b: &str) -> Ordering {
    a.bytes()
        .map(|c| c.to_ascii_lowercase())
        .cmp(b.bytes().map(|c| c.to_ascii_lowercase()))
}

fn compare_address(a: &KeyEntry, b: &KeyEntry) -> Ordering {
    compare_ignore_case(a.uid(), b.uid())
        .then_with(|| compare_ignore_case(a.fpr_or_long_key_id(), b.fpr_or_long_key_id()))
}

fn compare_key_id(a: &KeyEntry, b: &KeyEntry) -> Ordering {
    compare_ignore_case(a.fpr_or_long_key_id(), b.fpr_or_long_key_id())
        .then_with(|| compare_ignore_case(a.uid(), b.uid()))
}

fn compare_date(a: &KeyEntry, b: &KeyEntry) -> Ordering {
    let a_time = a.created().map_or(0, |t| t.timestamp());
    let b_time = b.created().map_or(0, |t| t.timestamp());
    a_time
        .cmp(&b_time)
        .then_with(|| compare_ignore_case(a.uid(), b.uid()))
}

/// Most trustworthy first: unrestricted, most valid, longest, newest.
fn compare_trust(a: &KeyEntry, b: &KeyEntry) -> Ordering {
    let restrictions = |e: &KeyEntry| (e.flags() & KeyFlags::RESTRICTIONS).bits();
    let created = |e: &KeyEntry| e.created().map_or(0, |t| t.timestamp());
    restrictions(a)
        .cmp(&restrictions(b))
        .then_with(|| b.validity().cmp(&a.validity()))
        .then_with(|| b.key_length().cmp(&a.key_length()))
        .then_with(|| created(b).cmp(&created(a)))
        .then_with(|| compare_ignore_case(a.uid(), b.uid()))
        .then_with(|| compare_ignore_case(a.fpr_or_long_key_id(), b.fpr_or_long_key_id()))
}

impl FromStr for SortKeys {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (reverse, name) = match s.strip_prefix(REVERSE_PREFIX) {
            Some(name) => (true, name),
            None => (false, s),
        };
        let by = match name.to_ascii_lowercase().as_str() {
            "address" => SortBy::Address,
            "keyid" => SortBy::KeyId,
            "date" => SortBy::Date,
            "trust" => SortBy::Trust,
            _ => return Err(Error::InvalidSortKeys(s.to_string())),
        };
        Ok(Self { by, reverse })
    }
}

impl TryFrom<String> for SortKeys {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<SortKeys> for String {
    fn from(value: SortKeys) -> Self {
        value.to_string()
    }
}

impl fmt::Display for SortKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.reverse {
            f.write_str(REVERSE_PREFIX)?;
        }
        f.write_str(self.by.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::{Key, Subkey, UserId, Validity};
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    struct Row {
        uid: &'static str,
        key_id: &'static str,
        validity: Validity,
        length: u32,
        created: Option<i64>,
        expired: bool,
    }

    impl Default for Row {
        fn default() -> Self {
            Self {
                uid: "",
                key_id: "0000000000000000",
                validity: Validity::Full,
                length: 2048,
                created: None,
                expired: false,
            }
        }
    }

    fn entry(row: Row) -> KeyEntry {
        let key = Key {
            user_ids: vec![UserId {
                validity: row.validity,
                ..UserId::new(row.uid)
            }],
            subkeys: vec![Subkey {
                length: row.length,
                created: row.created.map(|t| Utc.timestamp_opt(t, 0).unwrap()),
                ..Subkey::new(row.key_id)
            }],
            expired: row.expired,
            ..Default::default()
        };
        KeyEntry::from_key(key).remove(0)
    }

    fn sorted_uids(keys: SortKeys, mut entries: Vec<KeyEntry>) -> Vec<String> {
        keys.sort(&mut entries);
        entries.iter().map(|e| e.uid().to_string()).collect()
    }

    #[rstest]
    #[case("address", SortKeys::new(SortBy::Address, false))]
    #[case("keyid", SortKeys::new(SortBy::KeyId, false))]
    #[case("date", SortKeys::new(SortBy::Date, false))]
    #[case("trust", SortKeys::new(SortBy::Trust, false))]
    #[case("reverse-date", SortKeys::new(SortBy::Date, true))]
    #[case("Trust", SortKeys::new(SortBy::Trust, false))]
    fn test_parse(#[case] input: &str, #[case] expected: SortKeys) {
        assert_eq!(input.parse::<SortKeys>().unwrap(), expected);
        assert_eq!(expected.to_string(), input.to_ascii_lowercase());
    }

    #[rstest]
    #[case("size")]
    #[case("reverse-")]
    #[case("")]
    fn test_parse_invalid(#[case] input: &str) {
        assert_eq!(
            input.parse::<SortKeys>().unwrap_err(),
            Error::InvalidSortKeys(input.to_string())
        );
    }

    #[test]
    fn test_sort_address_ignores_case() {
        let entries = vec![
            entry(Row { uid: "carol", ..Default::default() }),
            entry(Row { uid: "Bob", ..Default::default() }),
            entry(Row { uid: "alice", ..Default::default() }),
        ];
        assert_eq!(
            sorted_uids(SortKeys::default(), entries.clone()),
            vec!["alice", "Bob", "carol"]
        );
        assert_eq!(
            sorted_uids(SortKeys::new(SortBy::Address, true), entries),
            vec!["carol", "Bob", "alice"]
        );
    }

    #[test]
    fn test_sort_key_id() {
        let entries = vec![
            entry(Row { uid: "a", key_id: "FFFF000000000000", ..Default::default() }),
            entry(Row { uid: "b", key_id: "aaaa000000000000", ..Default::default() }),
        ];
        assert_eq!(
            sorted_uids(SortKeys::new(SortBy::KeyId, false), entries),
            vec!["b", "a"]
        );
    }

    #[test]
    fn test_sort_date_missing_is_oldest() {
        let entries = vec![
            entry(Row { uid: "new", created: Some(2_000_000_000), ..Default::default() }),
            entry(Row { uid: "none", created: None, ..Default::default() }),
            entry(Row { uid: "old", created: Some(1_000_000_000), ..Default::default() }),
        ];
        assert_eq!(
            sorted_uids(SortKeys::new(SortBy::Date, false), entries),
            vec!["none", "old", "new"]
        );
    }

    #[test]
    fn test_sort_trust() {
        let entries = vec![
            entry(Row { uid: "expired", expired: true, validity: Validity::Ultimate, ..Default::default() }),
            entry(Row { uid: "marginal", validity: Validity::Marginal, ..Default::default() }),
            entry(Row { uid: "short", length: 1024, ..Default::default() }),
            entry(Row { uid: "older", created: Some(1_000), ..Default::default() }),
            entry(Row { uid: "newer", created: Some(2_000), ..Default::default() }),
            entry(Row { uid: "ultimate", validity: Validity::Ultimate, length: 1024, ..Default::default() }),
        ];
        assert_eq!(
            sorted_uids(SortKeys::new(SortBy::Trust, false), entries),
            vec!["ultimate", "newer", "older", "short", "marginal", "expired"]
        );
    }

    #[test]
    fn test_serde() {
        let keys: SortKeys = serde_json::from_str("\"reverse-trust\"").unwrap();
        assert_eq!(keys, SortKeys::new(SortBy::Trust, true));
        assert_eq!(serde_json::to_string(&keys).unwrap(), "\"reverse-trust\"");
        assert!(serde_json::from_str::<SortKeys>("\"bogus\"").is_err());
    }
}

//! Selectable key entries
//!
//! A key with several user IDs appears once per user ID. The entries of one
//! key share it through an [`Arc`].

use std::sync::Arc;

use bitflags::bitflags;
use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::flags::KeyFlags;
use crate::key::{Key, Validity, shorten_key_id};
use crate::sort::SortKeys;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEntry {
    key: Arc<Key>,
    uid: String,
    flags: KeyFlags,
    validity: Validity,
}

impl KeyEntry {
    /// One entry per user ID of `key`, revoked user IDs marked as such.
    pub fn from_key(key: Key) -> Vec<KeyEntry> {
        let key = Arc::new(key);
        let flags = key.flags();
        key.user_ids
            .iter()
            .map(|uid| {
                let mut entry_flags = flags;
                if uid.revoked {
                    entry_flags |= KeyFlags::REVOKED;
                }
                KeyEntry {
                    key: Arc::clone(&key),
                    uid: uid.uid.clone(),
                    flags: entry_flags,
                    validity: uid.validity,
                }
            })
            .collect()
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn flags(&self) -> KeyFlags {
        self.flags
    }

    pub fn validity(&self) -> Validity {
        self.validity
    }

    /// Primary key id, shortened to 8 digits unless `long` is set.
    pub fn key_id(&self, long: bool) -> &str {
        match self.key.key_id() {
            Some(id) if !long => shorten_key_id(id),
            Some(id) => id,
            None => "",
        }
    }

    /// Primary fingerprint, or the long key id when there is none.
    pub fn fpr_or_long_key_id(&self) -> &str {
        self.key
            .fingerprint()
            .or_else(|| self.key.key_id())
            .unwrap_or("")
    }

    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.key.primary().and_then(|s| s.created)
    }

    pub fn key_length(&self) -> u32 {
        self.key.primary().map_or(0, |s| s.length)
    }

    /// Not expired, revoked or disabled.
    pub fn is_valid(&self) -> bool {
        !self.flags.intersects(KeyFlags::CANT_USE)
    }

    /// The user ID is fully trusted to belong to the key.
    pub fn is_strong(&self) -> bool {
        self.flags.contains(KeyFlags::IS_X509)
            || matches!(self.validity, Validity::Full | Validity::Ultimate)
    }
}

/// The entries offered for selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyTable {
    entries: Vec<KeyEntry>,
}

impl KeyTable {
    /// Collect `entries`, leaving out unusable ones unless `show_unusable`.
    ///
    /// Fails with [`Error::NoUsableKeys`] when there were candidates but all
    /// of them were left out.
    pub fn build(entries: impl IntoIterator<Item = KeyEntry>, show_unusable: bool) -> Result<Self> {
        let mut unusable = false;
        let entries: Vec<KeyEntry> = entries
            .into_iter()
            .filter(|entry| {
                if !show_unusable && !entry.is_valid() {
                    log::trace!("skipping unusable key entry {:?}", entry.uid());
                    unusable = true;
                    return false;
                }
                true
            })
            .collect();
        if entries.is_empty() && unusable {
            return Err(Error::NoUsableKeys);
        }
        Ok(Self { entries })
    }

    pub fn sort(&mut self, keys: SortKeys) {
        keys.sort(&mut self.entries);
    }

    pub fn entries(&self) -> &[KeyEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&KeyEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, KeyEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a KeyTable {
    type Item = &'a KeyEntry;
    type IntoIter = std::slice::Iter<'a, KeyEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

bitflags! {
    /// Which kinds of keys a selection is drawn from.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Applications: u8 {
        const PGP = 1 << 0;
        const SMIME = 1 << 1;
    }
}

/// What the keys were searched for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query<'a> {
    Address(&'a str),
    Text(&'a str),
}

/// Heading for a key selection, e.g. `PGP keys matching <alice@example.org>`.
pub fn selection_title(apps: Applications, query: Query<'_>) -> String {
    let kind = if apps.contains(Applications::PGP | Applications::SMIME) {
        "PGP and S/MIME keys matching"
    } else if apps.contains(Applications::PGP) {
        "PGP keys matching"
    } else if apps.contains(Applications::SMIME) {
        "S/MIME keys matching"
    } else {
        "keys matching"
    };
    match query {
        Query::Address(mailbox) => format!("{} <{}>", kind, mailbox),
        Query::Text(text) => format!("{} \"{}\"", kind, text),
    }
}

pub const UNUSABLE_KEY: &str = "This key can't be used: expired/disabled/revoked";
pub const ID_NOT_VALID: &str = "ID is not valid. Do you really want to use the key?";
pub const ID_MARGINAL: &str = "ID is only marginally valid. Do you really want to use the key?";
pub const ID_UNDEFINED: &str = "ID has undefined validity. Do you really want to use the key?";

/// Outcome of choosing an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Accept,
    /// The entry cannot be chosen
    Refuse(&'static str),
    /// The entry can be chosen after the user confirms the question
    Confirm(&'static str),
}

/// Decide whether `entry` may be chosen. Without `check_trust` every entry
/// is accepted.
pub fn check_selection(entry: &KeyEntry, check_trust: bool) -> Selection {
    if !check_trust {
        return Selection::Accept;
    }
    if !entry.is_valid() {
        return Selection::Refuse(UNUSABLE_KEY);
    }
    if entry.is_strong() {
        return Selection::Accept;
    }
    match entry.validity() {
        Validity::Never => Selection::Confirm(ID_NOT_VALID),
        Validity::Marginal => Selection::Confirm(ID_MARGINAL),
        _ => Selection::Confirm(ID_UNDEFINED),
    }
}

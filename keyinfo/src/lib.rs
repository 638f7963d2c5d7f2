//! Presentation of key listings
//!
//! Turns key descriptions ([`Key`]) into what a key selection shows:
//!
//! - one [`KeyEntry`] per user ID, collected into a [`KeyTable`] and ordered
//!   by [`SortKeys`];
//! - entry lines expanded from an [`EntryFormat`] template;
//! - a verbose [`KeyReport`], optionally followed by the issuer chain.
//!
//! User IDs of X.509 certificates are displayed through [`dn`].

pub mod entry;
pub mod error;
pub mod flags;
pub mod format;
pub mod key;
pub mod report;
pub mod sort;

pub use entry::{
    Applications, KeyEntry, KeyTable, Query, Selection, check_selection, selection_title,
};
pub use error::{Error, Result};
pub use flags::{KeyFlags, abilities, flag_char};
pub use format::{DEFAULT_ENTRY_FORMAT, EntryFormat, MAX_PADDING};
pub use key::{
    Capabilities, Capability, Key, KeyLookup, Keyring, Protocol, Subkey, UserId, Validity,
};
pub use report::{DEFAULT_DATE_FORMAT, KeyReport, MAX_CHAIN_DEPTH, chain_title, format_fingerprint};
pub use sort::{SortBy, SortKeys};

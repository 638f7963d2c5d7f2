pub(crate) mod inspect;
pub(crate) mod list;
pub(crate) mod select;

use clap::Subcommand;
use keyinfo::{Applications, KeyEntry, Protocol, Query};

#[derive(Subcommand)]
pub(crate) enum KeyCommands {
    /// List the key entries matching a query
    List {
        #[command(flatten)]
        config: list::Config,
    },
    /// Show a key report and its certification chain
    Inspect {
        #[command(flatten)]
        config: inspect::Config,
    },
    /// Check whether a key may be used
    Select {
        #[command(flatten)]
        config: select::Config,
    },
}

/// Which protocols to list; both when neither flag is given.
pub(crate) fn applications(pgp: bool, smime: bool) -> Applications {
    match (pgp, smime) {
        (false, false) => Applications::all(),
        _ => {
            let mut apps = Applications::empty();
            apps.set(Applications::PGP, pgp);
            apps.set(Applications::SMIME, smime);
            apps
        }
    }
}

pub(crate) fn wants_protocol(apps: Applications, protocol: Protocol) -> bool {
    match protocol {
        Protocol::OpenPgp => apps.contains(Applications::PGP),
        Protocol::Cms => apps.contains(Applications::SMIME),
    }
}

/// An address matches a user ID that is the address or contains `<address>`;
/// text matches any part of the user ID or the key's ids.
pub(crate) fn matches_query(entry: &KeyEntry, query: Query<'_>) -> bool {
    let uid = entry.uid().to_ascii_lowercase();
    match query {
        Query::Address(address) => {
            let address = address.to_ascii_lowercase();
            uid == address || uid.contains(&format!("<{}>", address))
        }
        Query::Text(text) => {
            let text = text.to_ascii_lowercase();
            uid.contains(&text)
                || entry.fpr_or_long_key_id().to_ascii_lowercase().contains(&text)
                || entry.key().matches_id(&text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyinfo::{Key, Subkey, UserId};
    use rstest::rstest;

    fn entry(uid: &str) -> KeyEntry {
        let key = Key {
            user_ids: vec![UserId::new(uid)],
            subkeys: vec![Subkey::new("0123456789ABCDEF")],
            ..Default::default()
        };
        KeyEntry::from_key(key).remove(0)
    }

    #[rstest]
    #[case::neither(false, false, Applications::all())]
    #[case::pgp(true, false, Applications::PGP)]
    #[case::smime(false, true, Applications::SMIME)]
    #[case::both(true, true, Applications::all())]
    fn test_applications(#[case] pgp: bool, #[case] smime: bool, #[case] expected: Applications) {
        assert_eq!(applications(pgp, smime), expected);
    }

    #[rstest]
    #[case::address("Alice <alice@example.org>", Query::Address("Alice@Example.org"), true)]
    #[case::bare_address("alice@example.org", Query::Address("alice@example.org"), true)]
    #[case::address_substring("Alice <malice@example.org>", Query::Address("alice@example.org"), false)]
    #[case::text_name("Alice <alice@example.org>", Query::Text("ALICE"), true)]
    #[case::text_key_id("Alice <alice@example.org>", Query::Text("89abcdef"), true)]
    #[case::text_miss("Alice <alice@example.org>", Query::Text("bob"), false)]
    fn test_matches_query(#[case] uid: &str, #[case] query: Query<'_>, #[case] expected: bool) {
        assert_eq!(matches_query(&entry(uid), query), expected);
    }
}

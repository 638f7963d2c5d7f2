use std::io::{self, Write};

use clap::Args;
use keyinfo::{KeyEntry, KeyTable, Query, SortKeys, selection_title};

use super::{applications, matches_query, wants_protocol};
use crate::config::Settings;
use crate::error::Result;
use crate::utils::read_keyring;

#[derive(Args)]
pub(crate) struct Config {
    /// Key list (JSON). If not specified, reads from stdin
    file: Option<String>,

    /// Sort order: address, keyid, date or trust, optionally prefixed with "reverse-"
    #[arg(long)]
    sort: Option<SortKeys>,

    /// Entry line template
    #[arg(long)]
    format: Option<String>,

    /// Also list expired, revoked and disabled keys
    #[arg(long)]
    show_unusable: bool,

    /// List OpenPGP keys
    #[arg(long)]
    pgp: bool,

    /// List S/MIME (X.509) keys
    #[arg(long)]
    smime: bool,

    /// Only keys with this mail address
    #[arg(long, conflicts_with = "query")]
    address: Option<String>,

    /// Only keys whose user ID or key id contains this text
    #[arg(long)]
    query: Option<String>,
}

impl Config {
    fn query(&self) -> Option<Query<'_>> {
        match (&self.address, &self.query) {
            (Some(address), _) => Some(Query::Address(address)),
            (None, Some(text)) => Some(Query::Text(text)),
            (None, None) => None,
        }
    }
}

pub(crate) fn execute(config: Config, settings: &Settings) -> Result<()> {
    let keyring = read_keyring(config.file.as_deref())?;
    let apps = applications(config.pgp, config.smime);
    let query = config.query();
    let format = settings.entry_format(config.format.as_deref())?;
    let renderer = settings.renderer()?;

    let entries = keyring
        .keys()
        .iter()
        .filter(|key| wants_protocol(apps, key.protocol))
        .flat_map(|key| KeyEntry::from_key(key.clone()))
        .filter(|entry| query.is_none_or(|query| matches_query(entry, query)));
    let mut table = KeyTable::build(entries, config.show_unusable || settings.show_unusable)?;
    table.sort(config.sort.unwrap_or(settings.sort_keys));

    let mut out = io::stdout().lock();
    if let Some(query) = query {
        renderer.write_text(&mut out, selection_title(apps, query).as_bytes())?;
        out.write_all(b"\n")?;
    }
    for (i, entry) in table.iter().enumerate() {
        renderer.write_text(&mut out, format.render(entry, i + 1).as_bytes())?;
        out.write_all(b"\n")?;
    }
    Ok(())
}

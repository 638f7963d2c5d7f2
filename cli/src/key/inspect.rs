use std::io::{self, Write};

use clap::Args;
use keyinfo::{KeyEntry, KeyLookup, chain_title};

use crate::config::Settings;
use crate::error::Result;
use crate::utils::read_keyring;

#[derive(Args)]
pub(crate) struct Config {
    /// Key list (JSON). If not specified, reads from stdin
    file: Option<String>,

    /// Fingerprint or key id of the key to show
    #[arg(long)]
    key: String,
}

pub(crate) fn execute(config: Config, settings: &Settings) -> Result<()> {
    let keyring = read_keyring(config.file.as_deref())?;
    let key = keyring.lookup(&config.key)?;
    let report = settings.report()?;

    let mut out = io::stdout().lock();
    if let Some(entry) = KeyEntry::from_key(key.clone()).first() {
        writeln!(out, "{}", chain_title(entry, settings.long_ids))?;
        writeln!(out)?;
    }
    report.write_certificate_chain(&key, &keyring, &mut out)?;
    Ok(())
}

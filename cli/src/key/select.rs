use clap::Args;
use keyinfo::{KeyEntry, KeyLookup, Query, Selection, check_selection};

use super::matches_query;
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::utils::read_keyring;

#[derive(Args)]
pub(crate) struct Config {
    /// Key list (JSON). If not specified, reads from stdin
    file: Option<String>,

    /// Fingerprint or key id of the chosen key
    #[arg(long)]
    key: String,

    /// Choose the user ID with this mail address instead of the first one
    #[arg(long)]
    address: Option<String>,

    /// Accept keys whose user ID is not fully valid
    #[arg(long)]
    yes: bool,

    /// Do not check expiry, revocation and validity
    #[arg(long)]
    no_check_trust: bool,
}

pub(crate) fn execute(config: Config, settings: &Settings) -> Result<()> {
    let keyring = read_keyring(config.file.as_deref())?;
    let key = keyring.lookup(&config.key)?;

    let entries = KeyEntry::from_key(key);
    let entry = match &config.address {
        Some(address) => entries
            .iter()
            .find(|entry| matches_query(entry, Query::Address(address))),
        None => entries.first(),
    }
    .ok_or_else(|| Error::InvalidInput(format!("no matching user ID on key {}", config.key)))?;

    let check_trust = settings.check_trust && !config.no_check_trust;
    match check_selection(entry, check_trust) {
        Selection::Accept => {}
        Selection::Refuse(reason) => return Err(Error::Refused(reason)),
        Selection::Confirm(question) if config.yes => {
            log::info!("accepted after confirmation: {}", question);
        }
        Selection::Confirm(question) => return Err(Error::Unconfirmed(question)),
    }

    println!("0x{} {}", entry.key_id(settings.long_ids), entry.uid());
    Ok(())
}

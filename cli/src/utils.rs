use std::fs;
use std::io::{self, Read};

use keyinfo::Keyring;

use crate::error::Result;

/// Read input from a file or stdin
///
/// If `file` is `Some`, reads from the specified file path.
/// If `file` is `None`, reads from stdin.
pub(crate) fn read_input(file: Option<&str>) -> Result<Vec<u8>> {
    match file {
        Some(path) => Ok(fs::read(path)?),
        None => {
            let mut buffer = Vec::new();
            io::stdin().read_to_end(&mut buffer)?;
            Ok(buffer)
        }
    }
}

/// Take a single line argument, or read it from stdin without the trailing
/// line break.
pub(crate) fn read_line_arg(arg: Option<String>) -> Result<String> {
    match arg {
        Some(value) => Ok(value),
        None => {
            let text = String::from_utf8(read_input(None)?)?;
            Ok(text.trim_end_matches(['\r', '\n']).to_string())
        }
    }
}

/// Load a JSON key list from a file or stdin.
pub(crate) fn read_keyring(file: Option<&str>) -> Result<Keyring> {
    let input = read_input(file)?;
    let keyring: Keyring = serde_json::from_slice(&input)?;
    log::debug!("loaded {} keys", keyring.keys().len());
    Ok(keyring)
}

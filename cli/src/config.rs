//! `keyview.toml` settings
//!
//! ```toml
//! charset = "iso-8859-1"
//! sort_keys = "reverse-trust"
//! entry_format = "%4n %t%f %4l/0x%k %-4a %2c %u"
//! show_unusable = false
//! check_trust = true
//! long_ids = true
//! date_format = "%Y-%m-%d"
//! ```
//!
//! Every field is optional. Command line flags take precedence.

use std::fs;
use std::path::Path;

use dn::{Charset, Renderer};
use keyinfo::{DEFAULT_DATE_FORMAT, DEFAULT_ENTRY_FORMAT, EntryFormat, KeyReport, SortKeys};
use serde::Deserialize;

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Settings {
    pub(crate) charset: String,
    pub(crate) sort_keys: SortKeys,
    pub(crate) entry_format: String,
    pub(crate) show_unusable: bool,
    pub(crate) check_trust: bool,
    pub(crate) long_ids: bool,
    pub(crate) date_format: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            charset: "utf-8".to_string(),
            sort_keys: SortKeys::default(),
            entry_format: DEFAULT_ENTRY_FORMAT.to_string(),
            show_unusable: false,
            check_trust: true,
            long_ids: true,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl Settings {
    /// Read settings from `path`, or use the defaults without a path, then
    /// apply the global `--charset` override.
    pub(crate) fn load(path: Option<&Path>, charset: Option<&str>) -> Result<Self> {
        let mut settings = match path {
            Some(path) => {
                log::debug!("reading settings from {}", path.display());
                Self::from_toml(&fs::read_to_string(path)?)?
            }
            None => Self::default(),
        };
        if let Some(charset) = charset {
            settings.charset = charset.to_string();
        }
        Ok(settings)
    }

    pub(crate) fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub(crate) fn renderer(&self) -> Result<Renderer> {
        Ok(Renderer::new(Charset::for_label(&self.charset)?))
    }

    pub(crate) fn report(&self) -> Result<KeyReport> {
        Ok(KeyReport::new(self.renderer()?).with_date_format(&self.date_format)?)
    }

    /// The entry template, `template` replacing the configured one.
    pub(crate) fn entry_format(&self, template: Option<&str>) -> Result<EntryFormat> {
        let format = EntryFormat::parse(template.unwrap_or(&self.entry_format))?;
        Ok(format.with_long_ids(self.long_ids))
    }
}

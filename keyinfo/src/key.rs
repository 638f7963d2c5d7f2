//! Key descriptions as a key listing reports them
//!
//! Nothing here is computed from key material; a [`Key`] is plain data,
//! typically deserialized from JSON:
//!
//! ```json
//! {
//!   "protocol": "openpgp",
//!   "user_ids": [{ "uid": "Alice <alice@example.org>", "validity": "full" }],
//!   "subkeys": [{ "key_id": "0123456789ABCDEF", "length": 4096 }]
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::flags::KeyFlags;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Protocol {
    #[default]
    #[serde(rename = "openpgp", alias = "OpenPGP", alias = "pgp")]
    OpenPgp,
    /// X.509 certificates
    #[serde(rename = "cms", alias = "CMS", alias = "x509", alias = "smime")]
    Cms,
}

impl Protocol {
    pub fn name(&self) -> &'static str {
        match self {
            Protocol::OpenPgp => "OpenPGP",
            Protocol::Cms => "CMS",
        }
    }
}

/// How much a user ID is trusted to belong to its key, weakest first.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Validity {
    #[default]
    Unknown,
    Undefined,
    Never,
    Marginal,
    Full,
    Ultimate,
}

impl Validity {
    /// One character trust indicator as shown in key listings.
    pub fn as_char(&self) -> char {
        match self {
            Validity::Ultimate => 'u',
            Validity::Full => 'f',
            Validity::Marginal => 'm',
            Validity::Never => 'n',
            Validity::Undefined => 'q',
            Validity::Unknown => '?',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Encrypt,
    Sign,
    Certify,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    pub encrypt: bool,
    pub sign: bool,
    pub certify: bool,
}

impl Capabilities {
    pub fn has(&self, capability: Capability) -> bool {
        match capability {
            Capability::Encrypt => self.encrypt,
            Capability::Sign => self.sign,
            Capability::Certify => self.certify,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserId {
    pub uid: String,
    #[serde(default)]
    pub revoked: bool,
    #[serde(default)]
    pub invalid: bool,
    #[serde(default)]
    pub validity: Validity,
}

impl UserId {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subkey {
    pub key_id: String,
    #[serde(default)]
    pub fingerprint: Option<String>,
    #[serde(default)]
    pub algorithm: Option<String>,
    #[serde(default)]
    pub length: u32,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub expires: Option<DateTime<Utc>>,
    #[serde(default)]
    pub revoked: bool,
    #[serde(default)]
    pub expired: bool,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub invalid: bool,
    #[serde(default)]
    pub capabilities: Capabilities,
}

impl Subkey {
    pub fn new(key_id: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            ..Default::default()
        }
    }

    pub fn is_usable(&self) -> bool {
        !(self.revoked || self.expired || self.disabled || self.invalid)
    }

    /// The key id, cut to its last 8 digits when it is a 16 digit long id.
    pub fn short_key_id(&self) -> &str {
        shorten_key_id(&self.key_id)
    }
}

pub(crate) fn shorten_key_id(key_id: &str) -> &str {
    match key_id.len() {
        16 => key_id.get(8..).unwrap_or(key_id),
        _ => key_id,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key {
    #[serde(default)]
    pub protocol: Protocol,
    #[serde(default)]
    pub user_ids: Vec<UserId>,
    /// The first subkey is the primary key.
    #[serde(default)]
    pub subkeys: Vec<Subkey>,
    #[serde(default)]
    pub capabilities: Capabilities,
    #[serde(default)]
    pub revoked: bool,
    #[serde(default)]
    pub expired: bool,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub invalid: bool,
    #[serde(default)]
    pub secret: bool,
    /// Marked critical by its owner; counts as a restriction when sorting.
    #[serde(default)]
    pub critical: bool,
    #[serde(default)]
    pub prefer_encryption: bool,
    #[serde(default)]
    pub prefer_signing: bool,
    /// Certificate serial number, hex
    #[serde(default)]
    pub issuer_serial: Option<String>,
    /// Issuer DN in RFC 2253 form
    #[serde(default)]
    pub issuer_name: Option<String>,
    /// Fingerprint of the issuing certificate
    #[serde(default)]
    pub chain_id: Option<String>,
}

impl Key {
    pub fn primary(&self) -> Option<&Subkey> {
        self.subkeys.first()
    }

    pub fn fingerprint(&self) -> Option<&str> {
        self.primary().and_then(|s| s.fingerprint.as_deref())
    }

    pub fn key_id(&self) -> Option<&str> {
        self.primary().map(|s| s.key_id.as_str())
    }

    pub fn is_x509(&self) -> bool {
        self.protocol == Protocol::Cms
    }

    /// Whether the key can be used for `capability`, either directly or
    /// through one of its usable subkeys.
    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities.has(capability)
            || self
                .subkeys
                .iter()
                .any(|s| s.is_usable() && s.capabilities.has(capability))
    }

    /// Flags shared by every entry of this key.
    pub fn flags(&self) -> KeyFlags {
        let mut flags = KeyFlags::empty();
        if self.has_capability(Capability::Encrypt) {
            flags |= KeyFlags::CAN_ENCRYPT;
        }
        if self.has_capability(Capability::Sign) {
            flags |= KeyFlags::CAN_SIGN;
        }
        flags.set(KeyFlags::IS_X509, self.is_x509());
        flags.set(KeyFlags::SECRET, self.secret);
        flags.set(KeyFlags::REVOKED, self.revoked);
        flags.set(KeyFlags::EXPIRED, self.expired);
        flags.set(KeyFlags::DISABLED, self.disabled);
        flags.set(KeyFlags::CRITICAL, self.critical);
        flags.set(KeyFlags::PREFER_ENCRYPTION, self.prefer_encryption);
        flags.set(KeyFlags::PREFER_SIGNING, self.prefer_signing);
        flags
    }

    /// Match against a fingerprint or a long or short key id, ignoring case
    /// and an optional `0x` prefix.
    pub fn matches_id(&self, id: &str) -> bool {
        let id = id
            .strip_prefix("0x")
            .or_else(|| id.strip_prefix("0X"))
            .unwrap_or(id);
        if id.is_empty() {
            return false;
        }
        self.subkeys.iter().take(1).any(|s| {
            s.key_id.eq_ignore_ascii_case(id)
                || s.short_key_id().eq_ignore_ascii_case(id)
                || s.fingerprint
                    .as_deref()
                    .is_some_and(|f| f.eq_ignore_ascii_case(id))
        })
    }
}

/// Source of keys by fingerprint or key id, used to follow issuer chains.
pub trait KeyLookup {
    fn lookup(&self, id: &str) -> Result<Key>;
}

/// An in-memory list of keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Keyring {
    keys: Vec<Key>,
}

impl Keyring {
    pub fn new(keys: Vec<Key>) -> Self {
        Self { keys }
    }

    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    pub fn find(&self, id: &str) -> Option<&Key> {
        self.keys.iter().find(|key| key.matches_id(id))
    }
}

impl KeyLookup for Keyring {
    fn lookup(&self, id: &str) -> Result<Key> {
        self.find(id)
            .cloned()
            .ok_or_else(|| Error::KeyNotFound(id.to_string()))
    }
}

impl From<Vec<Key>> for Keyring {
    fn from(keys: Vec<Key>) -> Self {
        Self::new(keys)
    }
}

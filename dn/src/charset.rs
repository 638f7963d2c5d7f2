//! Display charset conversion
//!
//! Attribute values and user IDs reach us as UTF-8. Before they are written
//! out they are converted to the configured display charset. The source
//! encoding is always known, so no charset guessing or correction is done.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use encoding_rs::{EncoderResult, Encoding, UTF_8};

use crate::error::{Error, Result};

/// Byte written in place of characters the display charset cannot represent.
const REPLACEMENT: u8 = b'?';

/// Target charset for displayed text.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Charset {
    encoding: &'static Encoding,
}

impl Charset {
    /// UTF-8, for which conversion is the identity.
    pub fn utf8() -> Self {
        Self { encoding: UTF_8 }
    }

    /// Look up a charset by its label (`utf-8`, `iso-8859-1`, `koi8-r`, ...).
    pub fn for_label(label: &str) -> Result<Self> {
        Encoding::for_label_no_replacement(label.trim().as_bytes())
            .map(|encoding| Self {
                encoding: encoding.output_encoding(),
            })
            .ok_or_else(|| Error::UnknownCharset(label.to_string()))
    }

    /// Canonical name of the charset.
    pub fn name(&self) -> &'static str {
        self.encoding.name()
    }

    pub fn is_utf8(&self) -> bool {
        self.encoding == UTF_8
    }

    /// Convert UTF-8 bytes to this charset.
    ///
    /// Input that is not valid UTF-8 is returned unconverted. Characters with
    /// no representation in the target charset become `?`.
    pub fn convert<'a>(&self, utf8: &'a [u8]) -> Cow<'a, [u8]> {
        if self.is_utf8() {
            return Cow::Borrowed(utf8);
        }
        let Ok(text) = std::str::from_utf8(utf8) else {
            log::debug!(
                "value is not valid UTF-8, writing it to {} unconverted",
                self.name()
            );
            return Cow::Borrowed(utf8);
        };
        if text.is_ascii() && self.encoding.is_ascii_compatible() {
            return Cow::Borrowed(utf8);
        }

        let mut encoder = self.encoding.new_encoder();
        let mut converted = Vec::with_capacity(text.len() + 16);
        let mut remaining = text;
        loop {
            let (result, read) =
                encoder.encode_from_utf8_to_vec_without_replacement(remaining, &mut converted, true);
            remaining = &remaining[read..];
            match result {
                EncoderResult::InputEmpty => break,
                EncoderResult::OutputFull => converted.reserve(remaining.len() + 16),
                EncoderResult::Unmappable(c) => {
                    log::trace!("{:?} has no representation in {}", c, self.name());
                    converted.push(REPLACEMENT);
                }
            }
        }
        Cow::Owned(converted)
    }
}

impl Default for Charset {
    fn default() -> Self {
        Self::utf8()
    }
}

impl fmt::Debug for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Charset").field(&self.name()).finish()
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Charset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::for_label(s)
    }
}

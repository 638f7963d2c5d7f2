use thiserror::Error;

/// Result type for Distinguished Name operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when parsing, encoding or converting a
/// Distinguished Name.
///
/// Parse errors carry the byte offset in the input where the problem was
/// detected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Something other than `,`, `;`, `+` or the end of input follows a value
    #[error("unexpected character after attribute value at offset {position}")]
    MalformedDelimiter { position: usize },

    /// The attribute type before `=` is empty
    #[error("empty attribute type at offset {position}")]
    EmptyAttributeType { position: usize },

    /// The component has no `=` separating type and value
    #[error("missing '=' after attribute type at offset {position}")]
    MissingEqualsSign { position: usize },

    /// A `#` value has no hex digits or an odd number of them
    #[error("empty or odd-length hex value at offset {position}")]
    InvalidHexRun { position: usize },

    /// A backslash is followed by neither a special character nor two hex digits
    #[error("invalid escape sequence at offset {position}")]
    InvalidEscape { position: usize },

    /// An unescaped double quote appears inside a value
    #[error("unescaped quote in attribute value at offset {position}")]
    UnterminatedQuote { position: usize },

    /// The display charset label is not known
    #[error("unknown charset: {0}")]
    UnknownCharset(String),
}

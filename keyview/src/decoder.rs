//! Decoder trait for type-safe conversions.
//!
//! The `Decoder` trait converts a source type `T` into a destination type
//! `D`. The keyview crates use it to turn raw user-ID strings into parsed
//! Distinguished Names.
//!
//! # Design Pattern
//!
//! 1. `Decoder<T, D>` - performs the conversion
//! 2. `DecodableFrom<T>` - marker trait constraining valid conversions
//!
//! # Implementation Guide
//!
//! ```no_run
//! use keyview::decoder::{Decoder, DecodableFrom};
//!
//! struct Raw(String);
//! struct Parsed(Vec<String>);
//!
//! #[derive(Debug)]
//! struct MyError;
//!
//! impl DecodableFrom<Raw> for Parsed {}
//!
//! impl Decoder<Raw, Parsed> for Raw {
//!     type Error = MyError;
//!
//!     fn decode(&self) -> Result<Parsed, Self::Error> {
//!         Ok(Parsed(self.0.split(',').map(str::to_string).collect()))
//!     }
//! }
//! ```

/// Decoder trait for converting from type `T` to type `D`.
///
/// Implemented by the source type. The destination type must implement
/// `DecodableFrom<T>`.
///
/// # Examples
///
/// ```no_run
/// use keyview::decoder::{Decoder, DecodableFrom};
///
/// struct Label(String);
///
/// #[derive(Debug)]
/// struct EmptyLabel;
///
/// impl DecodableFrom<&str> for Label {}
///
/// impl Decoder<&str, Label> for &str {
///     type Error = EmptyLabel;
///
///     fn decode(&self) -> Result<Label, Self::Error> {
///         if self.is_empty() {
///             return Err(EmptyLabel);
///         }
///         Ok(Label(self.to_string()))
///     }
/// }
///
/// let label: Label = "CN".decode().unwrap();
/// ```
pub trait Decoder<T, D: DecodableFrom<T>> {
    /// The error type returned when decoding fails.
    type Error;

    /// Decodes `self` into type `D`.
    ///
    /// # Errors
    ///
    /// Returns an error if the conversion fails.
    fn decode(&self) -> Result<D, Self::Error>;
}

/// Marker trait indicating that type `D` can be decoded from type `T`.
///
/// Has no methods; implement it for every valid destination/source pair.
pub trait DecodableFrom<T> {}

//! # keyview
//!
//! Core traits for decoding and encoding in the keyview toolkit.
//!
//! This crate defines the `Decoder` and `Encoder` traits that establish the
//! type-safe conversion pattern used by the other keyview crates.
//!
//! ## Overview
//!
//! Key listings hand out user IDs and certificate subjects as strings.
//! The conversions flow like this:
//! ```text
//! &str → DistinguishedName → display bytes
//! ```
//!
//! Parsing a string into a structured value uses the `Decoder` trait, and
//! turning a structured value back into its wire string uses the `Encoder`
//! trait.
//!
//! ## Type Safety
//!
//! The traits use marker traits (`DecodableFrom` and `EncodableTo`) so that
//! only explicitly declared conversions compile.
//!
//! ## Example
//!
//! ```ignore
//! use keyview::decoder::Decoder;
//! use keyview::encoder::Encoder;
//! use dn::DistinguishedName;
//!
//! let dn: DistinguishedName = "CN=Alice,O=Acme".decode().unwrap();
//! let wire: String = dn.encode().unwrap();
//! ```

#![forbid(unsafe_code)]

pub mod decoder;
pub mod encoder;

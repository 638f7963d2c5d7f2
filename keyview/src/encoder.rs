/// Encoder trait for converting a structured value `T` into its
/// representation `E`.
///
/// This is the reverse of [`crate::decoder::Decoder`]. For example a parsed
/// Distinguished Name encodes back into an RFC 2253 string.
pub trait Encoder<T, E: EncodableTo<T>> {
    type Error;

    fn encode(&self) -> Result<E, Self::Error>;
}

/// Marker trait indicating that `Self` can be produced by encoding `T`.
pub trait EncodableTo<T> {}

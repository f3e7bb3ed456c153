/// Errors produced when decoding RLP data.
///
/// Every non-canonical form has a distinct variant so callers can tell a
/// truncated buffer apart from data that was never valid RLP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The input ended before the item's payload did.
    #[error("input too short")]
    InputTooShort,
    /// A declared payload length does not fit in `usize`.
    #[error("payload length overflows usize")]
    Overflow,
    /// An integer payload begins with a zero byte.
    #[error("integer encoding has leading zero bytes")]
    LeadingZero,
    /// A single byte below 0x80 was wrapped in a string header.
    #[error("single byte below 0x80 must encode as itself")]
    NonCanonicalSingleByte,
    /// The long length form was used where the short form is required, or
    /// the length-of-length has a leading zero.
    #[error("length prefix is not minimal")]
    NonCanonicalSize,
    /// A byte-string was found where a list was expected.
    #[error("expected a list, found a byte-string")]
    UnexpectedString,
    /// A list was found where a byte-string was expected.
    #[error("expected a byte-string, found a list")]
    UnexpectedList,
    /// The payload length does not match the decoded type's requirements,
    /// or trailing bytes remain after an exact decode.
    #[error("payload has unexpected length")]
    UnexpectedLength,
    /// A list's items did not consume exactly the declared payload.
    #[error("list payload length does not match its header")]
    ListLengthMismatch,
    /// Free-form error raised by a [`Decodable`](crate::Decodable) impl.
    #[error("{0}")]
    Custom(&'static str),
}

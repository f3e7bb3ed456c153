/// A fixed-length input had the wrong number of bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("expected {expected} bytes, got {got}")]
pub struct InvalidLengthError {
    /// The required length.
    pub expected: usize,
    /// The length that was supplied.
    pub got: usize,
}

/// A signature `v` value that encodes no valid recovery bit, with or without
/// EIP-155 chain-id offsetting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("signature value v = {0} encodes no valid recovery id")]
pub struct InvalidRecoveryIdError(pub u64);

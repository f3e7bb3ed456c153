//! EIP-191 personal-message hashing.

use crate::{keccak256, B256};

/// Hashes a message with the `personal_sign` envelope:
/// `keccak256("\x19Ethereum Signed Message:\n" ++ len(message) ++ message)`.
///
/// The length is the decimal ASCII representation of the byte count.
pub fn hash_message<T: AsRef<[u8]>>(message: T) -> B256 {
    const PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n";

    let message = message.as_ref();
    let len_ascii = message.len().to_string();

    let mut buf = Vec::with_capacity(PREFIX.len() + len_ascii.len() + message.len());
    buf.extend_from_slice(PREFIX);
    buf.extend_from_slice(len_ascii.as_bytes());
    buf.extend_from_slice(message);
    keccak256(&buf)
}

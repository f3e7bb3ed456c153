//! Helpers for deriving contract addresses.

use crate::{keccak256, Address, InvalidLengthError};
use ethflow_rlp::{Encodable, Header};

/// The address for an Ethereum contract is deterministically computed from
/// the address of its creator (sender) and how many transactions the
/// creator has sent (nonce). The sender and nonce are RLP encoded and then
/// hashed with Keccak-256.
///
/// A zero nonce encodes as the empty byte-string, per the minimal-integer
/// rule.
pub fn create_address(sender: Address, nonce: u64) -> Address {
    let payload_length = sender.length() + nonce.length();
    let mut buf = Vec::with_capacity(payload_length + 1);
    Header { list: true, payload_length }.encode(&mut buf);
    sender.encode(&mut buf);
    nonce.encode(&mut buf);
    let hash = keccak256(&buf);
    Address::from_slice(&hash[12..])
}

/// Returns the CREATE2 address of a smart contract as specified in
/// [EIP-1014](https://github.com/ethereum/EIPs/blob/master/EIPS/eip-1014.md),
/// taking the pre-computed hash of the init code as input:
///
/// `keccak256( 0xff ++ senderAddress ++ salt ++ initCodeHash )[12..]`
///
/// The salt and init-code hash must be exactly 32 bytes each.
pub fn create2_address(
    sender: Address,
    salt: &[u8],
    init_code_hash: &[u8],
) -> Result<Address, InvalidLengthError> {
    if salt.len() != 32 {
        return Err(InvalidLengthError { expected: 32, got: salt.len() });
    }
    if init_code_hash.len() != 32 {
        return Err(InvalidLengthError { expected: 32, got: init_code_hash.len() });
    }

    // always 85 bytes: 0xff + 20 + salt + code hash
    let mut preimage = [0xff; 85];
    preimage[1..21].copy_from_slice(sender.as_slice());
    preimage[21..53].copy_from_slice(salt);
    preimage[53..].copy_from_slice(init_code_hash);

    let hash = keccak256(&preimage[..]);
    Ok(Address::from_slice(&hash[12..]))
}

/// Returns the CREATE2 address for the given init code, hashing it first.
pub fn create2_address_from_code(
    sender: Address,
    salt: &[u8],
    init_code: impl AsRef<[u8]>,
) -> Result<Address, InvalidLengthError> {
    let init_code_hash = keccak256(init_code.as_ref());
    create2_address(sender, salt, init_code_hash.as_slice())
}

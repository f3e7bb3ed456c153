//! secp256k1 signing and recovery helpers.

use crate::{keccak256, Address, InvalidLengthError, Signature, B256, U256};
use secp256k1::{
    ecdsa::{RecoverableSignature, RecoveryId},
    Message, PublicKey, SecretKey, SECP256K1,
};

/// Recovers the address of the sender using secp256k1 pubkey recovery.
///
/// Converts the public key into an ethereum address by hashing the public
/// key with keccak256.
pub fn recover_signer(sig: &[u8; 65], msg: &[u8; 32]) -> Result<Address, secp256k1::Error> {
    let sig =
        RecoverableSignature::from_compact(&sig[0..64], RecoveryId::from_i32(sig[64] as i32)?)?;

    let public = SECP256K1.recover_ecdsa(&Message::from_slice(&msg[..32])?, &sig)?;
    Ok(public_key_to_address(public))
}

/// Recovers the uncompressed public key (64 bytes, without the tag byte)
/// from a compact signature and message hash.
pub fn recover_public_key(
    sig: &[u8; 65],
    msg: &[u8; 32],
) -> Result<[u8; 64], secp256k1::Error> {
    let sig =
        RecoverableSignature::from_compact(&sig[0..64], RecoveryId::from_i32(sig[64] as i32)?)?;

    let public = SECP256K1.recover_ecdsa(&Message::from_slice(&msg[..32])?, &sig)?;
    let uncompressed = public.serialize_uncompressed();
    let mut out = [0u8; 64];
    out.copy_from_slice(&uncompressed[1..]);
    Ok(out)
}

/// Signs a message hash with the given secret key, returning the
/// corresponding signature.
pub fn sign_message(secret: B256, message: B256) -> Result<Signature, secp256k1::Error> {
    let sec = SecretKey::from_slice(secret.as_ref())?;
    let s = SECP256K1.sign_ecdsa_recoverable(&Message::from_slice(&message[..])?, &sec);
    let (rec_id, data) = s.serialize_compact();

    let signature = Signature {
        r: U256::try_from_be_slice(&data[..32]).expect("The slice has at most 32 bytes"),
        s: U256::try_from_be_slice(&data[32..64]).expect("The slice has at most 32 bytes"),
        odd_y_parity: rec_id.to_i32() != 0,
    };
    Ok(signature)
}

/// Converts a public key into an ethereum address by hashing the encoded
/// public key with keccak256.
pub fn public_key_to_address(public: PublicKey) -> Address {
    // strip out the first byte because that should be the
    // SECP256K1_TAG_PUBKEY_UNCOMPRESSED tag returned by libsecp's
    // uncompressed pubkey serialization
    let hash = keccak256(&public.serialize_uncompressed()[1..]);
    Address::from_slice(&hash[12..])
}

/// Derives the ethereum address controlled by the given secret key.
pub fn secret_key_to_address(secret: &SecretKey) -> Address {
    public_key_to_address(PublicKey::from_secret_key(SECP256K1, secret))
}

/// Derives the ethereum address of an externally owned account from its
/// 64-byte uncompressed public key (without the tag byte).
pub fn address_from_public_key(public_key: &[u8]) -> Result<Address, InvalidLengthError> {
    if public_key.len() != 64 {
        return Err(InvalidLengthError { expected: 64, got: public_key.len() });
    }
    let hash = keccak256(public_key);
    Ok(Address::from_slice(&hash[12..]))
}

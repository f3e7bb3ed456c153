use crate::{ChainId, InvalidRecoveryIdError, U256};
use ethflow_rlp::{BufMut, DecodeError, Decodable, Encodable};
use serde::{Deserialize, Serialize};

/// The order of the secp256k1 curve.
pub const SECP256K1N: U256 = U256::from_limbs([
    0xbfd25e8cd0364141,
    0xbaaedce6af48a03b,
    0xfffffffffffffffe,
    0xffffffffffffffff,
]);

/// The order of the secp256k1 curve, divided by two. Signatures that should
/// be checked against EIP-2 must have an `s` value below or equal to this.
pub const SECP256K1N_HALF: U256 = U256::from_limbs([
    0xdfe92f46681b20a0,
    0x5d576e7357a4501d,
    0xffffffffffffffff,
    0x7fffffffffffffff,
]);

/// An ECDSA signature over the secp256k1 curve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature {
    /// The R field of the signature.
    pub r: U256,
    /// The S field of the signature.
    pub s: U256,
    /// The parity of the y coordinate of the curve point the signature
    /// recovers to.
    pub odd_y_parity: bool,
}

impl Signature {
    /// The `v` value for this signature.
    ///
    /// With a chain id this is the EIP-155 form `35 + 2 * chain_id +
    /// parity`, without one the pre-EIP-155 form `27 + parity`.
    pub fn v(&self, chain_id: Option<ChainId>) -> u64 {
        let parity = self.odd_y_parity as u64;
        match chain_id {
            Some(chain_id) => parity + 35 + chain_id * 2,
            None => parity + 27,
        }
    }

    /// Extracts the recovery bit from a `v` value, inverting [`Self::v`]
    /// for a known chain context.
    ///
    /// With `Some(chain_id)` only the two EIP-155 values for that chain are
    /// accepted; with `None` only 27 and 28 are.
    pub fn recovery_bit_from_v(
        v: u64,
        chain_id: Option<ChainId>,
    ) -> Result<bool, InvalidRecoveryIdError> {
        match chain_id {
            Some(chain_id) => match v.checked_sub(35 + chain_id * 2) {
                Some(0) => Ok(false),
                Some(1) => Ok(true),
                _ => Err(InvalidRecoveryIdError(v)),
            },
            None => match v {
                27 => Ok(false),
                28 => Ok(true),
                _ => Err(InvalidRecoveryIdError(v)),
            },
        }
    }

    /// Builds a signature from a `(v, r, s)` triple against a known chain
    /// context, rejecting any `v` the context cannot have produced.
    pub fn from_v_r_s(
        v: u64,
        r: U256,
        s: U256,
        chain_id: Option<ChainId>,
    ) -> Result<Self, InvalidRecoveryIdError> {
        Ok(Signature { r, s, odd_y_parity: Self::recovery_bit_from_v(v, chain_id)? })
    }

    /// Recovers the uncompressed public key that produced this signature
    /// over `hash`, or `None` when the signature resolves to no curve
    /// point.
    pub fn recover_public_key(&self, hash: crate::B256) -> Option<[u8; 64]> {
        crate::transaction::util::recover_public_key(&self.to_compact(), &hash.0).ok()
    }

    /// Recovers the signing address, or `None` when the signature resolves
    /// to no curve point.
    pub fn recover_signer(&self, hash: crate::B256) -> Option<crate::Address> {
        crate::transaction::util::recover_signer(&self.to_compact(), &hash.0).ok()
    }

    /// Builds a signature from a legacy-transaction `(v, r, s)` triple,
    /// returning the signature and the chain id the `v` value embeds, if
    /// any.
    pub fn from_legacy_v(
        v: u64,
        r: U256,
        s: U256,
    ) -> Result<(Self, Option<ChainId>), InvalidRecoveryIdError> {
        let (odd_y_parity, chain_id) = match v {
            27 => (false, None),
            28 => (true, None),
            v if v >= 35 => ((v - 35) % 2 != 0, Some((v - 35) / 2)),
            v => return Err(InvalidRecoveryIdError(v)),
        };
        Ok((Signature { r, s, odd_y_parity }, chain_id))
    }

    /// Checks the scalar ranges: `0 < r < n`, `0 < s < n`, and when
    /// `homestead` additionally `s <= n/2` (EIP-2 malleability protection).
    pub fn validate(&self, homestead: bool) -> bool {
        if self.r.is_zero() || self.s.is_zero() {
            return false;
        }
        if self.r >= SECP256K1N || self.s >= SECP256K1N {
            return false;
        }
        if homestead && self.s > SECP256K1N_HALF {
            return false;
        }
        true
    }

    /// The 65-byte compact form `r || s || recovery_bit` used for public
    /// key recovery.
    pub fn to_compact(&self) -> [u8; 65] {
        let mut sig = [0u8; 65];
        sig[..32].copy_from_slice(&self.r.to_be_bytes::<32>());
        sig[32..64].copy_from_slice(&self.s.to_be_bytes::<32>());
        sig[64] = self.odd_y_parity as u8;
        sig
    }

    /// RLP payload length of the `(v, r, s)` tail of a legacy transaction.
    pub(crate) fn legacy_payload_length(&self, chain_id: Option<ChainId>) -> usize {
        self.v(chain_id).length() + self.r.length() + self.s.length()
    }

    /// Encodes the `(v, r, s)` tail of a legacy transaction.
    pub(crate) fn encode_legacy(&self, chain_id: Option<ChainId>, out: &mut dyn BufMut) {
        self.v(chain_id).encode(out);
        self.r.encode(out);
        self.s.encode(out);
    }

    /// RLP payload length of the `(y_parity, r, s)` tail of a typed
    /// transaction.
    pub(crate) fn typed_payload_length(&self) -> usize {
        self.odd_y_parity.length() + self.r.length() + self.s.length()
    }

    /// Encodes the `(y_parity, r, s)` tail of a typed transaction.
    pub(crate) fn encode_typed(&self, out: &mut dyn BufMut) {
        self.odd_y_parity.encode(out);
        self.r.encode(out);
        self.s.encode(out);
    }

    /// Decodes the `(y_parity, r, s)` tail of a typed transaction.
    pub(crate) fn decode_typed(buf: &mut &[u8]) -> Result<Self, DecodeError> {
        Ok(Signature {
            odd_y_parity: bool::decode(buf)?,
            r: U256::decode(buf)?,
            s: U256::decode(buf)?,
        })
    }

    /// Decodes the `(v, r, s)` tail of a legacy transaction, returning the
    /// embedded chain id, if any.
    pub(crate) fn decode_legacy(
        buf: &mut &[u8],
    ) -> Result<(Self, Option<ChainId>), DecodeError> {
        let v = u64::decode(buf)?;
        let r = U256::decode(buf)?;
        let s = U256::decode(buf)?;
        Signature::from_legacy_v(v, r, s)
            .map_err(|_| DecodeError::Custom("invalid v value in legacy signature"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn v_roundtrip() {
        for odd_y_parity in [false, true] {
            let sig = Signature { r: U256::from(1), s: U256::from(1), odd_y_parity };
            for chain_id in [None, Some(1), Some(1337)] {
                let v = sig.v(chain_id);
                assert_eq!(Signature::recovery_bit_from_v(v, chain_id), Ok(odd_y_parity));
            }
        }
    }

    #[test]
    fn recovery_bit_rejects_foreign_v() {
        assert_eq!(Signature::recovery_bit_from_v(29, None), Err(InvalidRecoveryIdError(29)));
        // v for chain 1 presented against chain 5
        assert_eq!(Signature::recovery_bit_from_v(37, Some(5)), Err(InvalidRecoveryIdError(37)));
        assert_eq!(Signature::recovery_bit_from_v(0, Some(1)), Err(InvalidRecoveryIdError(0)));
    }

    #[test]
    fn legacy_v_embeds_chain_id() {
        let (sig, chain_id) = Signature::from_legacy_v(37, U256::from(1), U256::from(2)).unwrap();
        assert!(!sig.odd_y_parity);
        assert_eq!(chain_id, Some(1));

        let (sig, chain_id) = Signature::from_legacy_v(28, U256::from(1), U256::from(2)).unwrap();
        assert!(sig.odd_y_parity);
        assert_eq!(chain_id, None);

        assert!(Signature::from_legacy_v(30, U256::from(1), U256::from(2)).is_err());
    }

    #[test]
    fn validate_scalar_ranges() {
        let half = SECP256K1N_HALF;
        let sig = |r: U256, s: U256| Signature { r, s, odd_y_parity: false };

        assert!(sig(U256::from(1), U256::from(1)).validate(true));
        assert!(!sig(U256::ZERO, U256::from(1)).validate(false));
        assert!(!sig(U256::from(1), U256::ZERO).validate(false));
        assert!(!sig(SECP256K1N, U256::from(1)).validate(false));

        // a high-s signature passes the frontier rules but fails homestead
        let high_s = half + U256::from(1);
        assert!(sig(U256::from(1), high_s).validate(false));
        assert!(!sig(U256::from(1), high_s).validate(true));
        assert!(sig(U256::from(1), half).validate(true));
    }

    #[test]
    fn sign_then_recover_via_v() {
        use crate::{secret_key_to_address, sign_message, B256};
        use secp256k1::SecretKey;

        let secret =
            SecretKey::from_str("4646464646464646464646464646464646464646464646464646464646464646")
                .unwrap();
        let hash = B256::repeat_byte(0x21);
        let signature = sign_message(B256::from_slice(secret.as_ref()), hash).unwrap();

        for chain_id in [None, Some(1u64), Some(1337)] {
            let v = signature.v(chain_id);
            let rebuilt = Signature::from_v_r_s(v, signature.r, signature.s, chain_id).unwrap();
            assert_eq!(rebuilt, signature);
            assert_eq!(rebuilt.recover_signer(hash), Some(secret_key_to_address(&secret)));
            let public = rebuilt.recover_public_key(hash).unwrap();
            assert_eq!(
                crate::address_from_public_key(&public).unwrap(),
                secret_key_to_address(&secret)
            );
        }
    }

    #[test]
    fn half_order_constant() {
        let expected = U256::from_str(
            "0x7fffffffffffffffffffffffffffffff5d576e7357a4501ddfe92f46681b20a0",
        )
        .unwrap();
        assert_eq!(SECP256K1N_HALF, expected);
        assert_eq!(SECP256K1N >> 1, SECP256K1N_HALF);
    }
}

use crate::{keccak256, Bytes, ChainId, Signature, TxKind, B256, U256};
use ethflow_rlp::{BufMut, DecodeError, Decodable, Encodable, Header, EMPTY_STRING_CODE};

/// A legacy transaction, pre EIP-2718.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TxLegacy {
    /// The chain the transaction is replay-protected for, if any. Absent on
    /// pre-EIP-155 transactions.
    pub chain_id: Option<ChainId>,
    /// Sequence number issued by the sender account.
    pub nonce: u64,
    /// Price in wei the sender pays per unit of gas.
    pub gas_price: u128,
    /// Maximum gas the transaction may consume.
    pub gas_limit: u64,
    /// Call target, or contract creation when absent.
    pub to: TxKind,
    /// Value in wei transferred to the target.
    pub value: U256,
    /// Call data.
    pub input: Bytes,
}

impl TxLegacy {
    pub(crate) fn fields_len(&self) -> usize {
        self.nonce.length()
            + self.gas_price.length()
            + self.gas_limit.length()
            + self.to.length()
            + self.value.length()
            + self.input.length()
    }

    pub(crate) fn encode_fields(&self, out: &mut dyn BufMut) {
        self.nonce.encode(out);
        self.gas_price.encode(out);
        self.gas_limit.encode(out);
        self.to.encode(out);
        self.value.encode(out);
        self.input.encode(out);
    }

    /// The hash the sender signs.
    ///
    /// With a chain id the preimage is the nine-field EIP-155 list
    /// `[nonce, gasPrice, gasLimit, to, value, data, chainId, 0, 0]`,
    /// without one the original six-field list.
    pub fn signature_hash(&self) -> B256 {
        let mut payload_length = self.fields_len();
        if let Some(chain_id) = self.chain_id {
            payload_length += chain_id.length() + 2;
        }
        let mut buf = Vec::with_capacity(payload_length + 3);
        Header { list: true, payload_length }.encode(&mut buf);
        self.encode_fields(&mut buf);
        if let Some(chain_id) = self.chain_id {
            chain_id.encode(&mut buf);
            buf.put_u8(EMPTY_STRING_CODE);
            buf.put_u8(EMPTY_STRING_CODE);
        }
        keccak256(&buf)
    }

    /// Encoded length of the signed wire form.
    pub(crate) fn signed_length(&self, signature: &Signature) -> usize {
        let payload_length =
            self.fields_len() + signature.legacy_payload_length(self.chain_id);
        Header { list: true, payload_length }.length()
    }

    /// Encodes the signed wire form `[nonce, gasPrice, gasLimit, to, value,
    /// data, v, r, s]`.
    pub(crate) fn encode_signed(&self, signature: &Signature, out: &mut dyn BufMut) {
        let payload_length =
            self.fields_len() + signature.legacy_payload_length(self.chain_id);
        Header { list: true, payload_length }.encode(out);
        self.encode_fields(out);
        signature.encode_legacy(self.chain_id, out);
    }

    /// Decodes the signed wire form, recovering the chain id from `v`.
    pub(crate) fn decode_signed(buf: &mut &[u8]) -> Result<(Self, Signature), DecodeError> {
        let mut payload = Header::decode_list_payload(buf)?;
        let mut tx = TxLegacy {
            chain_id: None,
            nonce: u64::decode(&mut payload)?,
            gas_price: u128::decode(&mut payload)?,
            gas_limit: u64::decode(&mut payload)?,
            to: TxKind::decode(&mut payload)?,
            value: U256::decode(&mut payload)?,
            input: Bytes::decode(&mut payload)?,
        };
        let (signature, chain_id) = Signature::decode_legacy(&mut payload)?;
        if !payload.is_empty() {
            return Err(DecodeError::ListLengthMismatch);
        }
        tx.chain_id = chain_id;
        Ok((tx, signature))
    }
}

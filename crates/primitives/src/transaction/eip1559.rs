use crate::{keccak256, AccessList, Bytes, ChainId, Signature, TxKind, B256, U256};
use ethflow_rlp::{BufMut, DecodeError, Decodable, Encodable, Header};

/// A dynamic-fee transaction per EIP-1559, envelope type 0x2.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TxEip1559 {
    /// The chain the transaction is valid on.
    pub chain_id: ChainId,
    /// Sequence number issued by the sender account.
    pub nonce: u64,
    /// Maximum tip in wei per unit of gas paid to the block producer.
    pub max_priority_fee_per_gas: u128,
    /// Maximum total fee in wei per unit of gas, base fee included.
    pub max_fee_per_gas: u128,
    /// Maximum gas the transaction may consume.
    pub gas_limit: u64,
    /// Call target, or contract creation when absent.
    pub to: TxKind,
    /// Value in wei transferred to the target.
    pub value: U256,
    /// Call data.
    pub input: Bytes,
    /// Addresses and storage keys declared up front.
    pub access_list: AccessList,
}

impl TxEip1559 {
    pub(crate) fn fields_len(&self) -> usize {
        self.chain_id.length()
            + self.nonce.length()
            + self.max_priority_fee_per_gas.length()
            + self.max_fee_per_gas.length()
            + self.gas_limit.length()
            + self.to.length()
            + self.value.length()
            + self.input.length()
            + self.access_list.length()
    }

    pub(crate) fn encode_fields(&self, out: &mut dyn BufMut) {
        self.chain_id.encode(out);
        self.nonce.encode(out);
        self.max_priority_fee_per_gas.encode(out);
        self.max_fee_per_gas.encode(out);
        self.gas_limit.encode(out);
        self.to.encode(out);
        self.value.encode(out);
        self.input.encode(out);
        self.access_list.encode(out);
    }

    /// The hash the sender signs: `keccak256(0x02 || rlp(fields))`.
    pub fn signature_hash(&self) -> B256 {
        let payload_length = self.fields_len();
        let mut buf = Vec::with_capacity(payload_length + 4);
        buf.push(crate::EIP1559_TX_TYPE_ID);
        Header { list: true, payload_length }.encode(&mut buf);
        self.encode_fields(&mut buf);
        keccak256(&buf)
    }

    /// Encoded length of the signed inner list, excluding the type byte.
    pub(crate) fn signed_length(&self, signature: &Signature) -> usize {
        let payload_length = self.fields_len() + signature.typed_payload_length();
        Header { list: true, payload_length }.length()
    }

    /// Encodes the signed inner list `[fields..., yParity, r, s]`,
    /// excluding the type byte.
    pub(crate) fn encode_signed(&self, signature: &Signature, out: &mut dyn BufMut) {
        let payload_length = self.fields_len() + signature.typed_payload_length();
        Header { list: true, payload_length }.encode(out);
        self.encode_fields(out);
        signature.encode_typed(out);
    }

    /// Decodes the signed inner list, excluding the type byte.
    pub(crate) fn decode_signed(buf: &mut &[u8]) -> Result<(Self, Signature), DecodeError> {
        let mut payload = Header::decode_list_payload(buf)?;
        let tx = TxEip1559 {
            chain_id: u64::decode(&mut payload)?,
            nonce: u64::decode(&mut payload)?,
            max_priority_fee_per_gas: u128::decode(&mut payload)?,
            max_fee_per_gas: u128::decode(&mut payload)?,
            gas_limit: u64::decode(&mut payload)?,
            to: TxKind::decode(&mut payload)?,
            value: U256::decode(&mut payload)?,
            input: Bytes::decode(&mut payload)?,
            access_list: AccessList::decode(&mut payload)?,
        };
        let signature = Signature::decode_typed(&mut payload)?;
        if !payload.is_empty() {
            return Err(DecodeError::ListLengthMismatch);
        }
        Ok((tx, signature))
    }
}

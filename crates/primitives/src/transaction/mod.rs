//! Transaction types.

use crate::{keccak256, Bytes, ChainId, B256};
use ethflow_rlp::{BufMut, DecodeError};

pub use access_list::{AccessList, AccessListItem};
pub use eip1559::TxEip1559;
pub use eip2930::TxEip2930;
pub use legacy::TxLegacy;
pub use request::TransactionRequest;
pub use signature::{Signature, SECP256K1N, SECP256K1N_HALF};
pub use tx_type::{TxType, EIP1559_TX_TYPE_ID, EIP2930_TX_TYPE_ID, LEGACY_TX_TYPE_ID};

mod access_list;
mod eip1559;
mod eip2930;
mod legacy;
mod request;

/// Handling transaction signature operations, including signature recovery,
/// applying chain IDs, and EIP-2 validation.
pub(crate) mod signature;
pub(crate) mod util;

mod tx_type;

/// An unsigned transaction in one of the supported formats.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Transaction {
    /// Legacy transaction, pre EIP-2718.
    Legacy(TxLegacy),
    /// Access-list transaction per EIP-2930.
    Eip2930(TxEip2930),
    /// Dynamic-fee transaction per EIP-1559.
    Eip1559(TxEip1559),
}

impl Transaction {
    /// The envelope type of this transaction.
    pub fn tx_type(&self) -> TxType {
        match self {
            Transaction::Legacy(_) => TxType::Legacy,
            Transaction::Eip2930(_) => TxType::Eip2930,
            Transaction::Eip1559(_) => TxType::Eip1559,
        }
    }

    /// The chain id the transaction is replay-protected for, if any.
    pub fn chain_id(&self) -> Option<ChainId> {
        match self {
            Transaction::Legacy(tx) => tx.chain_id,
            Transaction::Eip2930(tx) => Some(tx.chain_id),
            Transaction::Eip1559(tx) => Some(tx.chain_id),
        }
    }

    /// The hash the sender signs to authorize this transaction.
    pub fn signature_hash(&self) -> B256 {
        match self {
            Transaction::Legacy(tx) => tx.signature_hash(),
            Transaction::Eip2930(tx) => tx.signature_hash(),
            Transaction::Eip1559(tx) => tx.signature_hash(),
        }
    }

    /// Encodes the signed wire form. Typed transactions are prefixed with
    /// their envelope type byte.
    pub(crate) fn encode_with_signature(&self, signature: &Signature, out: &mut dyn BufMut) {
        match self {
            Transaction::Legacy(tx) => tx.encode_signed(signature, out),
            Transaction::Eip2930(tx) => {
                out.put_u8(EIP2930_TX_TYPE_ID);
                tx.encode_signed(signature, out);
            }
            Transaction::Eip1559(tx) => {
                out.put_u8(EIP1559_TX_TYPE_ID);
                tx.encode_signed(signature, out);
            }
        }
    }

    pub(crate) fn signed_length(&self, signature: &Signature) -> usize {
        match self {
            Transaction::Legacy(tx) => tx.signed_length(signature),
            Transaction::Eip2930(tx) => 1 + tx.signed_length(signature),
            Transaction::Eip1559(tx) => 1 + tx.signed_length(signature),
        }
    }
}

/// A signed transaction together with its hash.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TransactionSigned {
    /// The unsigned transaction.
    pub transaction: Transaction,
    /// The authorizing signature.
    pub signature: Signature,
    /// Keccak hash of the signed wire form, the transaction's identity on
    /// the network.
    hash: B256,
}

impl TransactionSigned {
    /// Combines a transaction and a signature, computing the transaction
    /// hash.
    pub fn from_transaction_and_signature(
        transaction: Transaction,
        signature: Signature,
    ) -> Self {
        let mut buf = Vec::with_capacity(transaction.signed_length(&signature));
        transaction.encode_with_signature(&signature, &mut buf);
        let hash = keccak256(&buf);
        TransactionSigned { transaction, signature, hash }
    }

    /// The transaction hash.
    pub fn hash(&self) -> B256 {
        self.hash
    }

    /// The raw signed bytes submitted with `eth_sendRawTransaction`: the
    /// RLP list for legacy transactions, `type || rlp(fields)` for typed
    /// ones.
    pub fn envelope_encoded(&self) -> Bytes {
        let mut buf = Vec::with_capacity(self.transaction.signed_length(&self.signature));
        self.transaction.encode_with_signature(&self.signature, &mut buf);
        buf.into()
    }

    /// Recovers the address that signed this transaction, or `None` when
    /// the signature does not resolve to a curve point.
    pub fn recover_signer(&self) -> Option<crate::Address> {
        let hash = self.transaction.signature_hash();
        util::recover_signer(&self.signature.to_compact(), &hash.0).ok()
    }

    /// Decodes a signed transaction from its raw wire form, the inverse of
    /// [`Self::envelope_encoded`].
    pub fn decode_enveloped(buf: &mut &[u8]) -> Result<Self, DecodeError> {
        let first = *buf.first().ok_or(DecodeError::InputTooShort)?;

        let (transaction, signature) = if first >= ethflow_rlp::EMPTY_LIST_CODE {
            let (tx, signature) = TxLegacy::decode_signed(buf)?;
            (Transaction::Legacy(tx), signature)
        } else {
            *buf = &buf[1..];
            match first {
                EIP2930_TX_TYPE_ID => {
                    let (tx, signature) = TxEip2930::decode_signed(buf)?;
                    (Transaction::Eip2930(tx), signature)
                }
                EIP1559_TX_TYPE_ID => {
                    let (tx, signature) = TxEip1559::decode_signed(buf)?;
                    (Transaction::Eip1559(tx), signature)
                }
                _ => return Err(DecodeError::Custom("unsupported transaction type")),
            }
        };

        Ok(TransactionSigned::from_transaction_and_signature(transaction, signature))
    }
}

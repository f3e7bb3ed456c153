#![warn(missing_debug_implementations, missing_docs, unreachable_pub)]
#![deny(unused_must_use)]

//! Commonly used types for the transaction engine.
//!
//! This crate contains the Ethereum transaction formats (legacy, EIP-2930
//! and EIP-1559), signatures with EIP-155 replay protection, address
//! derivation, and the wire shapes exchanged with a node (requests,
//! receipts, blocks).

mod block;
mod chain;
pub mod contract;
pub mod eip191;
pub mod eip55;
mod error;
mod receipt;
pub mod serde_helper;
mod transaction;

pub use block::{Block, BlockNumberOrTag};
pub use chain::{BaseChain, Common, CustomChain, Hardfork};
pub use error::{InvalidLengthError, InvalidRecoveryIdError};
pub use receipt::{Log, TransactionReceipt};
pub use transaction::{
    util::{
        address_from_public_key, public_key_to_address, recover_public_key, recover_signer,
        secret_key_to_address, sign_message,
    },
    AccessList, AccessListItem, Signature, Transaction, TransactionRequest, TransactionSigned,
    TxEip1559, TxEip2930, TxLegacy, TxType, EIP1559_TX_TYPE_ID, EIP2930_TX_TYPE_ID,
    LEGACY_TX_TYPE_ID, SECP256K1N, SECP256K1N_HALF,
};

pub use alloy_primitives::{keccak256, Address, Bloom, Bytes, TxKind, B256, U128, U256, U64};

/// A transaction hash is the keccak hash of an RLP-encoded signed
/// transaction.
pub type TxHash = B256;
/// A block hash.
pub type BlockHash = B256;
/// A block number.
pub type BlockNumber = u64;
/// Chain identifier type (introduced in EIP-155).
pub type ChainId = u64;

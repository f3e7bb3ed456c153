#![warn(missing_debug_implementations, missing_docs, unreachable_pub)]
#![deny(unused_must_use)]

//! Transaction submission over JSON-RPC.
//!
//! The [`Eth`] API normalizes a caller's [`TransactionRequest`] into one of
//! the protocol transaction formats, submits it through a
//! [`RequestManager`], and tracks it to its receipt and beyond: awaiting
//! the returned [`PendingTransaction`] yields the receipt, while its event
//! bus streams `sending → sent → transactionHash → receipt →
//! confirmation*` along the way.
//!
//! [`TransactionRequest`]: ethflow_primitives::TransactionRequest

mod client;
mod config;
mod error;
pub mod fill;
mod signer;
mod submit;

pub use client::{EthRequests, HttpRequestManager, RequestManager};
pub use config::{SendOptions, TransactionConfig};
pub use error::{RpcError, SignError, TransactionError};
pub use signer::{EthSigner, PrivateKeySigner};
pub use submit::{
    Confirmation, Eth, PendingTransaction, TransactionEvent, TransactionEventKind,
};

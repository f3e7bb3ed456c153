//! An abstraction over ethereum signers.

use crate::error::SignError;
use async_trait::async_trait;
use ethflow_primitives::{
    eip191, secret_key_to_address, sign_message, Address, Signature, Transaction,
    TransactionSigned, B256,
};
use secp256k1::SecretKey;
use std::collections::HashMap;

type Result<T> = std::result::Result<T, SignError>;

/// An Ethereum signer.
#[async_trait]
pub trait EthSigner: Send + Sync {
    /// Returns the available accounts for this signer.
    fn accounts(&self) -> Vec<Address>;

    /// Returns `true` whether this signer can sign for this address.
    fn is_signer_for(&self, addr: &Address) -> bool {
        self.accounts().contains(addr)
    }

    /// Signs a raw message on behalf of `address` after applying the
    /// EIP-191 personal-message envelope.
    async fn sign(&self, address: Address, message: &[u8]) -> Result<Signature>;

    /// Signs a prepared transaction using the given account.
    fn sign_transaction(
        &self,
        transaction: Transaction,
        address: &Address,
    ) -> Result<TransactionSigned>;
}

/// Signs with in-memory secret keys. Meant for development and tests; real
/// deployments keep keys behind a node or an external signer.
#[derive(Debug)]
pub struct PrivateKeySigner {
    addresses: Vec<Address>,
    accounts: HashMap<Address, SecretKey>,
}

impl PrivateKeySigner {
    /// Builds a signer from raw secret keys, deriving their addresses.
    pub fn new(secrets: Vec<SecretKey>) -> Self {
        let accounts: HashMap<_, _> = secrets
            .into_iter()
            .map(|secret| (secret_key_to_address(&secret), secret))
            .collect();
        let addresses = accounts.keys().copied().collect();
        PrivateKeySigner { addresses, accounts }
    }

    fn get_key(&self, account: Address) -> Result<&SecretKey> {
        self.accounts.get(&account).ok_or(SignError::NoAccount)
    }

    fn sign_hash(&self, hash: B256, account: Address) -> Result<Signature> {
        let secret = self.get_key(account)?;
        sign_message(B256::from_slice(secret.as_ref()), hash)
            .map_err(|_| SignError::CouldNotSign)
    }
}

#[async_trait]
impl EthSigner for PrivateKeySigner {
    fn accounts(&self) -> Vec<Address> {
        self.addresses.clone()
    }

    fn is_signer_for(&self, addr: &Address) -> bool {
        self.accounts.contains_key(addr)
    }

    async fn sign(&self, address: Address, message: &[u8]) -> Result<Signature> {
        let hash = eip191::hash_message(message);
        self.sign_hash(hash, address)
    }

    fn sign_transaction(
        &self,
        transaction: Transaction,
        address: &Address,
    ) -> Result<TransactionSigned> {
        let signature_hash = transaction.signature_hash();
        let signature = self.sign_hash(signature_hash, *address)?;
        Ok(TransactionSigned::from_transaction_and_signature(transaction, signature))
    }
}

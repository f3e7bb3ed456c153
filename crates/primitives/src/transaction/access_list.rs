use crate::{Address, B256, U256};
use ethflow_rlp::{BufMut, DecodeError, Decodable, Encodable, Header};
use serde::{Deserialize, Serialize};

/// A list of addresses and storage keys that the transaction plans to
/// access. Accesses outside the list are possible, but become more
/// expensive.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessListItem {
    /// Account address that will be loaded at the start of execution.
    pub address: Address,
    /// Keys of storage that will be loaded at the start of execution.
    pub storage_keys: Vec<B256>,
}

impl AccessListItem {
    fn payload_length(&self) -> usize {
        self.address.length() + self.storage_keys.length()
    }
}

impl Encodable for AccessListItem {
    fn encode(&self, out: &mut dyn BufMut) {
        Header { list: true, payload_length: self.payload_length() }.encode(out);
        self.address.encode(out);
        self.storage_keys.encode(out);
    }

    fn length(&self) -> usize {
        Header { list: true, payload_length: self.payload_length() }.length()
    }
}

impl Decodable for AccessListItem {
    fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
        let mut payload = Header::decode_list_payload(buf)?;
        let item = AccessListItem {
            address: Address::decode(&mut payload)?,
            storage_keys: Vec::<B256>::decode(&mut payload)?,
        };
        if !payload.is_empty() {
            return Err(DecodeError::ListLengthMismatch);
        }
        Ok(item)
    }
}

/// An access list as defined in EIP-2930.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct AccessList(pub Vec<AccessListItem>);

impl AccessList {
    /// Returns an iterator over the list's addresses and storage keys, the
    /// storage keys as words.
    pub fn flatten(&self) -> impl Iterator<Item = (Address, Vec<U256>)> + '_ {
        self.0.iter().map(|item| {
            (
                item.address,
                item.storage_keys.iter().map(|slot| U256::from_be_bytes(slot.0)).collect(),
            )
        })
    }

    /// True if no addresses are declared.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Encodable for AccessList {
    fn encode(&self, out: &mut dyn BufMut) {
        self.0.encode(out);
    }

    fn length(&self) -> usize {
        self.0.length()
    }
}

impl Decodable for AccessList {
    fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
        Vec::<AccessListItem>::decode(buf).map(Self)
    }
}

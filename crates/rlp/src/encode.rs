use crate::{Header, EMPTY_LIST_CODE, EMPTY_STRING_CODE};
use alloy_primitives::{Address, Bytes, FixedBytes, TxKind, U256};
use bytes::BufMut;

/// A type that can be encoded as RLP.
pub trait Encodable {
    /// Appends the RLP encoding of `self` to `out`.
    fn encode(&self, out: &mut dyn BufMut);

    /// The number of bytes [`Self::encode`] will write.
    fn length(&self) -> usize;
}

impl Header {
    /// Writes the length prefix for an item with this header.
    pub fn encode(&self, out: &mut dyn BufMut) {
        let code = if self.list { EMPTY_LIST_CODE } else { EMPTY_STRING_CODE };
        if self.payload_length < 56 {
            out.put_u8(code + self.payload_length as u8);
        } else {
            let len_be = minimal_be_bytes(self.payload_length as u64);
            out.put_u8(code + 55 + len_be.len() as u8);
            out.put_slice(&len_be);
        }
    }

    /// The total encoded length of the item: prefix plus payload.
    pub fn length(&self) -> usize {
        length_of_length(self.payload_length) + self.payload_length
    }
}

/// The number of bytes a length prefix occupies for the given payload length.
pub const fn length_of_length(payload_length: usize) -> usize {
    if payload_length < 56 {
        1
    } else {
        1 + (usize::BITS as usize / 8) - (payload_length.leading_zeros() as usize / 8)
    }
}

/// Encodes a value into a fresh buffer.
pub fn encode<T: Encodable + ?Sized>(value: &T) -> Vec<u8> {
    let mut out = Vec::with_capacity(value.length());
    value.encode(&mut out);
    out
}

/// The summed encoded length of a slice of items, excluding any list header.
pub fn list_length<T: Encodable>(items: &[T]) -> usize {
    items.iter().map(Encodable::length).sum()
}

/// Encodes a slice of items as an RLP list.
pub fn encode_list<T: Encodable>(items: &[T], out: &mut dyn BufMut) {
    let payload_length = list_length(items);
    Header { list: true, payload_length }.encode(out);
    for item in items {
        item.encode(out);
    }
}

fn minimal_be_bytes(value: u64) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    let skip = value.leading_zeros() as usize / 8;
    bytes[skip..].to_vec()
}

fn encode_str_payload(payload: &[u8], out: &mut dyn BufMut) {
    if payload.len() == 1 && payload[0] < EMPTY_STRING_CODE {
        out.put_u8(payload[0]);
    } else {
        Header { list: false, payload_length: payload.len() }.encode(out);
        out.put_slice(payload);
    }
}

fn str_payload_length(payload: &[u8]) -> usize {
    if payload.len() == 1 && payload[0] < EMPTY_STRING_CODE {
        1
    } else {
        length_of_length(payload.len()) + payload.len()
    }
}

impl Encodable for [u8] {
    fn encode(&self, out: &mut dyn BufMut) {
        encode_str_payload(self, out);
    }

    fn length(&self) -> usize {
        str_payload_length(self)
    }
}

impl Encodable for Bytes {
    fn encode(&self, out: &mut dyn BufMut) {
        encode_str_payload(self, out);
    }

    fn length(&self) -> usize {
        str_payload_length(self)
    }
}

impl<const N: usize> Encodable for FixedBytes<N> {
    fn encode(&self, out: &mut dyn BufMut) {
        encode_str_payload(self.as_slice(), out);
    }

    fn length(&self) -> usize {
        str_payload_length(self.as_slice())
    }
}

impl Encodable for Address {
    fn encode(&self, out: &mut dyn BufMut) {
        encode_str_payload(self.as_slice(), out);
    }

    fn length(&self) -> usize {
        // 20 bytes can never hit the single-byte form
        21
    }
}

macro_rules! uint_encodable {
    ($($t:ty),*) => {$(
        impl Encodable for $t {
            fn encode(&self, out: &mut dyn BufMut) {
                let bytes = self.to_be_bytes();
                let skip = self.leading_zeros() as usize / 8;
                encode_str_payload(&bytes[skip..], out);
            }

            fn length(&self) -> usize {
                let bits = <$t>::BITS as usize;
                match *self {
                    0..=0x7f => 1,
                    _ => 1 + bits / 8 - self.leading_zeros() as usize / 8,
                }
            }
        }
    )*};
}

uint_encodable!(u8, u16, u32, u64, u128, usize);

impl Encodable for U256 {
    fn encode(&self, out: &mut dyn BufMut) {
        let bytes = self.to_be_bytes::<32>();
        let skip = self.leading_zeros() / 8;
        encode_str_payload(&bytes[skip..], out);
    }

    fn length(&self) -> usize {
        if *self < U256::from(0x80u8) {
            1
        } else {
            1 + 32 - self.leading_zeros() / 8
        }
    }
}

impl Encodable for bool {
    fn encode(&self, out: &mut dyn BufMut) {
        (*self as u8).encode(out);
    }

    fn length(&self) -> usize {
        1
    }
}

impl Encodable for str {
    fn encode(&self, out: &mut dyn BufMut) {
        encode_str_payload(self.as_bytes(), out);
    }

    fn length(&self) -> usize {
        str_payload_length(self.as_bytes())
    }
}

impl Encodable for String {
    fn encode(&self, out: &mut dyn BufMut) {
        self.as_str().encode(out);
    }

    fn length(&self) -> usize {
        self.as_str().length()
    }
}

impl Encodable for TxKind {
    /// A call target encodes as the 20-byte address, a creation as the empty
    /// byte-string.
    fn encode(&self, out: &mut dyn BufMut) {
        match self {
            TxKind::Call(to) => to.encode(out),
            TxKind::Create => out.put_u8(EMPTY_STRING_CODE),
        }
    }

    fn length(&self) -> usize {
        match self {
            TxKind::Call(to) => to.length(),
            TxKind::Create => 1,
        }
    }
}

/// A `Vec<T>` encodes as a list of its items. Note this applies to
/// `Vec<u8>` as well: byte-strings are [`Bytes`] or `[u8]`, not vectors.
impl<T: Encodable> Encodable for Vec<T> {
    fn encode(&self, out: &mut dyn BufMut) {
        encode_list(self, out);
    }

    fn length(&self) -> usize {
        let payload_length = list_length(self);
        length_of_length(payload_length) + payload_length
    }
}

impl<T: Encodable + ?Sized> Encodable for &T {
    fn encode(&self, out: &mut dyn BufMut) {
        (**self).encode(out);
    }

    fn length(&self) -> usize {
        (**self).length()
    }
}

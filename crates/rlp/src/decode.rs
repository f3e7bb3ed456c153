use crate::{DecodeError, Header, EMPTY_LIST_CODE, EMPTY_STRING_CODE};
use alloy_primitives::{Address, Bytes, FixedBytes, TxKind, U256};

/// A type that can be decoded from RLP.
pub trait Decodable: Sized {
    /// Decodes one item from the front of `buf`, advancing it past the
    /// consumed bytes.
    fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError>;
}

impl Header {
    /// Decodes an item prefix, advancing `buf` past it.
    ///
    /// A single byte below 0x80 is its own payload: the header is returned
    /// as a one-byte string and `buf` is left untouched. Every non-canonical
    /// prefix is rejected.
    pub fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
        let first = *buf.first().ok_or(DecodeError::InputTooShort)?;

        let header = if first < EMPTY_STRING_CODE {
            return Ok(Header { list: false, payload_length: 1 });
        } else if first < 0xb8 {
            let payload_length = (first - EMPTY_STRING_CODE) as usize;
            *buf = &buf[1..];
            if payload_length == 1 {
                let payload = *buf.first().ok_or(DecodeError::InputTooShort)?;
                if payload < EMPTY_STRING_CODE {
                    return Err(DecodeError::NonCanonicalSingleByte);
                }
            }
            Header { list: false, payload_length }
        } else if first < EMPTY_LIST_CODE {
            *buf = &buf[1..];
            let payload_length = decode_long_length(buf, (first - 0xb7) as usize)?;
            Header { list: false, payload_length }
        } else if first < 0xf8 {
            *buf = &buf[1..];
            Header { list: true, payload_length: (first - EMPTY_LIST_CODE) as usize }
        } else {
            *buf = &buf[1..];
            let payload_length = decode_long_length(buf, (first - 0xf7) as usize)?;
            Header { list: true, payload_length }
        };

        if buf.len() < header.payload_length {
            return Err(DecodeError::InputTooShort);
        }
        Ok(header)
    }

    /// Decodes a byte-string header and returns its payload, advancing `buf`
    /// past both.
    pub fn decode_bytes<'a>(buf: &mut &'a [u8]) -> Result<&'a [u8], DecodeError> {
        let header = Header::decode(buf)?;
        if header.list {
            return Err(DecodeError::UnexpectedList);
        }
        let (payload, rest) = buf.split_at(header.payload_length);
        *buf = rest;
        Ok(payload)
    }

    /// Decodes a list header and returns its payload, advancing `buf` past
    /// both.
    pub fn decode_list_payload<'a>(buf: &mut &'a [u8]) -> Result<&'a [u8], DecodeError> {
        let header = Header::decode(buf)?;
        if !header.list {
            return Err(DecodeError::UnexpectedString);
        }
        let (payload, rest) = buf.split_at(header.payload_length);
        *buf = rest;
        Ok(payload)
    }
}

/// Reads a long-form length of `len_of_len` big-endian bytes, enforcing
/// minimality.
fn decode_long_length(buf: &mut &[u8], len_of_len: usize) -> Result<usize, DecodeError> {
    if buf.len() < len_of_len {
        return Err(DecodeError::InputTooShort);
    }
    if len_of_len > core::mem::size_of::<usize>() {
        return Err(DecodeError::Overflow);
    }
    let (len_bytes, rest) = buf.split_at(len_of_len);
    if len_bytes[0] == 0 {
        return Err(DecodeError::NonCanonicalSize);
    }
    let mut payload_length = 0usize;
    for byte in len_bytes {
        payload_length = (payload_length << 8) | *byte as usize;
    }
    if payload_length < 56 {
        return Err(DecodeError::NonCanonicalSize);
    }
    *buf = rest;
    Ok(payload_length)
}

/// Decodes a value that must consume the entire input.
pub fn decode_exact<T: Decodable>(mut buf: &[u8]) -> Result<T, DecodeError> {
    let value = T::decode(&mut buf)?;
    if !buf.is_empty() {
        return Err(DecodeError::UnexpectedLength);
    }
    Ok(value)
}

fn decode_uint_payload(buf: &mut &[u8], max_bytes: usize) -> Result<u128, DecodeError> {
    let payload = Header::decode_bytes(buf)?;
    if payload.len() > max_bytes {
        return Err(DecodeError::Overflow);
    }
    if payload.first() == Some(&0) {
        return Err(DecodeError::LeadingZero);
    }
    let mut value = 0u128;
    for byte in payload {
        value = (value << 8) | *byte as u128;
    }
    Ok(value)
}

macro_rules! uint_decodable {
    ($($t:ty),*) => {$(
        impl Decodable for $t {
            fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
                decode_uint_payload(buf, core::mem::size_of::<$t>()).map(|v| v as $t)
            }
        }
    )*};
}

uint_decodable!(u8, u16, u32, u64, u128, usize);

impl Decodable for U256 {
    fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
        let payload = Header::decode_bytes(buf)?;
        if payload.len() > 32 {
            return Err(DecodeError::Overflow);
        }
        if payload.first() == Some(&0) {
            return Err(DecodeError::LeadingZero);
        }
        Ok(U256::from_be_slice(payload))
    }
}

impl Decodable for bool {
    fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
        match u64::decode(buf)? {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(DecodeError::Custom("boolean out of range")),
        }
    }
}

impl Decodable for Bytes {
    fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
        Header::decode_bytes(buf).map(|payload| Bytes::from(payload.to_vec()))
    }
}

impl<const N: usize> Decodable for FixedBytes<N> {
    fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
        let payload = Header::decode_bytes(buf)?;
        if payload.len() != N {
            return Err(DecodeError::UnexpectedLength);
        }
        Ok(FixedBytes::from_slice(payload))
    }
}

impl Decodable for Address {
    fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
        FixedBytes::<20>::decode(buf).map(Address::from)
    }
}

impl Decodable for TxKind {
    fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
        match buf.first() {
            Some(&EMPTY_STRING_CODE) => {
                *buf = &buf[1..];
                Ok(TxKind::Create)
            }
            Some(_) => Address::decode(buf).map(TxKind::Call),
            None => Err(DecodeError::InputTooShort),
        }
    }
}

impl Decodable for String {
    fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
        let payload = Header::decode_bytes(buf)?;
        core::str::from_utf8(payload)
            .map(str::to_owned)
            .map_err(|_| DecodeError::Custom("string payload is not utf-8"))
    }
}

impl<T: Decodable> Decodable for Vec<T> {
    fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
        let mut payload = Header::decode_list_payload(buf)?;
        let mut items = Vec::new();
        while !payload.is_empty() {
            items.push(T::decode(&mut payload)?);
        }
        Ok(items)
    }
}

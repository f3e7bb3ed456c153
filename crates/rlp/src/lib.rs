#![warn(missing_debug_implementations, missing_docs, unreachable_pub)]
#![deny(unused_must_use)]

//! Recursive-length-prefix (RLP) encoding and decoding.
//!
//! RLP is Ethereum's canonical serialization for nested byte structures. An
//! item is either a byte-string or a list of items; both are length-prefixed,
//! with strings offset at `0x80` and lists at `0xc0`. Every value has exactly
//! one valid encoding, and [`Decodable`] implementations reject all
//! non-canonical forms with a [`DecodeError`].

mod decode;
mod encode;
mod error;

pub use bytes::BufMut;
pub use decode::{decode_exact, Decodable};
pub use encode::{encode, encode_list, length_of_length, list_length, Encodable};
pub use error::DecodeError;

/// The single-byte encoding of the empty byte-string, also the prefix base
/// for short strings.
pub const EMPTY_STRING_CODE: u8 = 0x80;

/// The single-byte encoding of the empty list, also the prefix base for
/// short lists.
pub const EMPTY_LIST_CODE: u8 = 0xc0;

/// The decoded prefix of an RLP item: whether it is a list and how many
/// payload bytes follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// True if the item is a list, false for a byte-string.
    pub list: bool,
    /// Length of the payload in bytes, excluding the prefix itself.
    pub payload_length: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{hex, Address, Bytes, B256, U256};

    fn roundtrip<T>(value: T, expected: &[u8])
    where
        T: Encodable + Decodable + PartialEq + core::fmt::Debug,
    {
        let encoded = encode(&value);
        assert_eq!(encoded, expected, "encoding mismatch for {value:?}");
        assert_eq!(value.length(), expected.len());
        let decoded = decode_exact::<T>(&encoded).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn encode_strings() {
        // canonical vectors from the ethereum wiki
        roundtrip(Bytes::from_static(b"dog"), &[0x83, b'd', b'o', b'g']);
        roundtrip(Bytes::new(), &[0x80]);
        roundtrip(Bytes::from_static(&[0x0f]), &[0x0f]);
        roundtrip(Bytes::from_static(&[0x04, 0x00]), &[0x82, 0x04, 0x00]);

        let lorem = b"Lorem ipsum dolor sit amet, consectetur adipisicing elit";
        let mut expected = vec![0xb8, 0x38];
        expected.extend_from_slice(lorem);
        roundtrip(Bytes::from_static(lorem), &expected);
    }

    #[test]
    fn encode_uints() {
        roundtrip(0u64, &[0x80]);
        roundtrip(15u64, &[0x0f]);
        roundtrip(1024u64, &[0x82, 0x04, 0x00]);
        roundtrip(0x7fu64, &[0x7f]);
        roundtrip(0x80u64, &[0x81, 0x80]);
        roundtrip(U256::ZERO, &[0x80]);
        roundtrip(U256::from(0xffffffffu64), &[0x84, 0xff, 0xff, 0xff, 0xff]);
        roundtrip(
            U256::MAX,
            &{
                let mut v = vec![0xa0];
                v.extend_from_slice(&[0xff; 32]);
                v
            }[..],
        );
    }

    #[test]
    fn encode_fixed_bytes() {
        let address = Address::repeat_byte(0x11);
        let mut expected = vec![0x94];
        expected.extend_from_slice(address.as_slice());
        roundtrip(address, &expected);

        let hash = B256::repeat_byte(0x22);
        let mut expected = vec![0xa0];
        expected.extend_from_slice(hash.as_slice());
        roundtrip(hash, &expected);
    }

    #[test]
    fn encode_lists() {
        // [ "cat", "dog" ]
        let cat_dog = vec![Bytes::from_static(b"cat"), Bytes::from_static(b"dog")];
        roundtrip(
            cat_dog,
            &[0xc8, 0x83, b'c', b'a', b't', 0x83, b'd', b'o', b'g'],
        );

        // the empty list
        roundtrip(Vec::<Bytes>::new(), &[0xc0]);

        // the set-theoretical representation of three
        let nested: Vec<Vec<Vec<Bytes>>> =
            vec![vec![], vec![vec![]], vec![vec![], vec![vec![]]]];
        let encoded = encode(&nested);
        assert_eq!(encoded, hex!("c7c0c1c0c3c0c1c0"));
        assert_eq!(decode_exact::<Vec<Vec<Vec<Bytes>>>>(&encoded).unwrap(), nested);
    }

    #[test]
    fn long_list_header() {
        // 60 single-byte items forces the long list form
        let items = vec![1u64; 60];
        let encoded = encode(&items);
        assert_eq!(encoded[0], 0xf8);
        assert_eq!(encoded[1], 60);
        assert_eq!(decode_exact::<Vec<u64>>(&encoded).unwrap(), items);
    }

    #[test]
    fn reject_non_canonical_single_byte() {
        // 0x05 must encode as itself, not as a one-byte string
        assert_eq!(
            decode_exact::<Bytes>(&[0x81, 0x05]),
            Err(DecodeError::NonCanonicalSingleByte)
        );
        // 0x80 and above legitimately use the one-byte string form
        assert_eq!(
            decode_exact::<Bytes>(&[0x81, 0x80]).unwrap(),
            Bytes::from_static(&[0x80])
        );
    }

    #[test]
    fn reject_non_canonical_size() {
        // 5-byte payload must use the short form, not length-of-length
        let mut buf = vec![0xb8, 0x05];
        buf.extend_from_slice(b"hello");
        assert_eq!(decode_exact::<Bytes>(&buf), Err(DecodeError::NonCanonicalSize));

        // leading zero in the length-of-length
        let mut buf = vec![0xb9, 0x00, 0x38];
        buf.extend_from_slice(&[0x61; 0x38]);
        assert_eq!(decode_exact::<Bytes>(&buf), Err(DecodeError::NonCanonicalSize));
    }

    #[test]
    fn reject_leading_zero_integers() {
        assert_eq!(decode_exact::<u64>(&[0x82, 0x00, 0x01]), Err(DecodeError::LeadingZero));
        assert_eq!(decode_exact::<U256>(&[0x82, 0x00, 0x01]), Err(DecodeError::LeadingZero));
    }

    #[test]
    fn reject_overflow() {
        // nine payload bytes cannot fit a u64
        let mut buf = vec![0x89];
        buf.extend_from_slice(&[0x01; 9]);
        assert_eq!(decode_exact::<u64>(&buf), Err(DecodeError::Overflow));
    }

    #[test]
    fn reject_trailing_bytes() {
        assert_eq!(
            decode_exact::<Bytes>(&[0x83, b'd', b'o', b'g', 0x00]),
            Err(DecodeError::UnexpectedLength)
        );
    }

    #[test]
    fn reject_truncated_input() {
        assert_eq!(decode_exact::<Bytes>(&[0x83, b'd', b'o']), Err(DecodeError::InputTooShort));
        assert_eq!(decode_exact::<Bytes>(&[0xb8]), Err(DecodeError::InputTooShort));
        assert_eq!(decode_exact::<Vec<u64>>(&[0xc3, 0x01]), Err(DecodeError::InputTooShort));
    }

    #[test]
    fn reject_kind_mismatch() {
        assert_eq!(decode_exact::<Vec<u64>>(&[0x83, b'd', b'o', b'g']), Err(DecodeError::UnexpectedString));
        assert_eq!(decode_exact::<Bytes>(&[0xc0]), Err(DecodeError::UnexpectedList));
    }

    #[test]
    fn reject_wrong_fixed_length() {
        // a 19-byte string is not an address
        let mut buf = vec![0x93];
        buf.extend_from_slice(&[0x11; 19]);
        assert_eq!(decode_exact::<Address>(&buf), Err(DecodeError::UnexpectedLength));
    }

    #[test]
    fn header_roundtrip() {
        for payload_length in [0usize, 1, 55, 56, 255, 256, 65_536] {
            for list in [false, true] {
                let header = Header { list, payload_length };
                let mut buf = Vec::new();
                header.encode(&mut buf);
                // fake payload so the decoder's bounds check passes
                buf.resize(buf.len() + payload_length, 0xff);
                let mut slice = &buf[..];
                // the single-byte form is only produced for actual payloads
                if !(payload_length == 1 && !list) {
                    assert_eq!(Header::decode(&mut slice).unwrap(), header);
                }
            }
        }
    }
}

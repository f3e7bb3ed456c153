//! Numeric helpers.
//!
//! Quantities arriving over the wire may be 0x-prefixed hex strings, decimal
//! strings or JSON numbers. These helpers accept all three on input and
//! always serialize back to the canonical 0x-hex quantity form, so the
//! flexible representations never travel further than the boundary.

use crate::U256;
use serde::{de, Deserialize, Deserializer, Serializer};
use std::str::FromStr;

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Int(serde_json::Number),
    Str(String),
}

impl NumberOrString {
    fn try_into_u256<E: de::Error>(self) -> Result<U256, E> {
        match self {
            // arbitrary-precision integers via serde_json's Number; floats
            // and negatives fail the parse
            NumberOrString::Int(num) => {
                U256::from_str(num.to_string().as_str()).map_err(E::custom)
            }
            // FromStr handles both 0x-prefixed hex and decimal
            NumberOrString::Str(s) => U256::from_str(s.as_str()).map_err(E::custom),
        }
    }
}

/// Deserializes a quantity into a [`U256`], accepting 0x-prefixed hex
/// strings, decimal strings and JSON numbers.
pub fn from_int_or_hex<'de, D>(deserializer: D) -> Result<U256, D::Error>
where
    D: Deserializer<'de>,
{
    NumberOrString::deserialize(deserializer)?.try_into_u256()
}

fn downcast<T, E>(value: U256, field: &'static str) -> Result<T, E>
where
    T: TryFrom<U256>,
    E: de::Error,
{
    T::try_from(value).map_err(|_| E::custom(format!("quantity too large for {field}")))
}

macro_rules! quantity_module {
    ($mod_name:ident, $t:ty) => {
        /// serde `with` functions mapping an optional quantity to
        #[doc = concat!("`", stringify!($t), "`.")]
        pub mod $mod_name {
            use super::*;
            use serde::Serialize;

            /// Deserializes an optional quantity from hex, decimal or a
            /// JSON number.
            pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<$t>, D::Error>
            where
                D: Deserializer<'de>,
            {
                match Option::<NumberOrString>::deserialize(deserializer)? {
                    Some(raw) => {
                        let value = raw.try_into_u256()?;
                        downcast::<$t, D::Error>(value, stringify!($t)).map(Some)
                    }
                    None => Ok(None),
                }
            }

            /// Serializes the quantity as a canonical 0x-hex string.
            pub fn serialize<S: Serializer>(
                value: &Option<$t>,
                serializer: S,
            ) -> Result<S::Ok, S::Error> {
                match value {
                    Some(value) => format!("{value:#x}").serialize(serializer),
                    None => serializer.serialize_none(),
                }
            }
        }
    };
}

quantity_module!(u8_opt, u8);
quantity_module!(u64_opt, u64);
quantity_module!(u128_opt, u128);

/// serde `with` functions mapping an optional quantity to [`U256`].
pub mod u256_opt {
    use super::*;
    use serde::Serialize;

    /// Deserializes an optional quantity from hex, decimal or a JSON
    /// number.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<U256>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<NumberOrString>::deserialize(deserializer)? {
            Some(raw) => raw.try_into_u256().map(Some),
            None => Ok(None),
        }
    }

    /// Serializes the quantity as a canonical 0x-hex string.
    pub fn serialize<S: Serializer>(
        value: &Option<U256>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => format!("{value:#x}").serialize(serializer),
            None => serializer.serialize_none(),
        }
    }
}

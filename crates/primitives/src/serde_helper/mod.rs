//! Helpers for working with serde.

pub mod num;

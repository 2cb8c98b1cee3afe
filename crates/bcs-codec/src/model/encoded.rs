//! The immutable output of a successful encode.

use std::ops::Deref;

use crate::util::encoding::{encode_to_string, Encoding};

/// Bytes produced by [`Bcs::encode`](crate::Bcs::encode).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EncodedValue(Vec<u8>);

impl EncodedValue {
    pub(crate) fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Renders the bytes in the given text encoding.
    pub fn to_string_as(&self, encoding: Encoding) -> String {
        encode_to_string(&self.0, encoding)
    }

    pub fn to_hex(&self) -> String {
        self.to_string_as(Encoding::Hex)
    }

    pub fn to_base58(&self) -> String {
        self.to_string_as(Encoding::Base58)
    }

    pub fn to_base64(&self) -> String {
        self.to_string_as(Encoding::Base64)
    }
}

impl Deref for EncodedValue {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for EncodedValue {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<EncodedValue> for Vec<u8> {
    fn from(value: EncodedValue) -> Self {
        value.0
    }
}

//! Text renderings of encoded buffers: hex, base58 and base64.
//!
//! These helpers sit beside the engine; the engine itself only ever deals in
//! raw bytes.

use std::fmt;
use std::str::FromStr;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};

use crate::error::EncodingError;

/// Text encoding for byte buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// Lowercase hex; `0x` prefix accepted on input.
    Hex,
    /// Bitcoin-alphabet base58.
    Base58,
    /// Standard padded base64.
    Base64,
}

impl Encoding {
    pub fn name(self) -> &'static str {
        match self {
            Encoding::Hex => "hex",
            Encoding::Base58 => "base58",
            Encoding::Base64 => "base64",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Encoding {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hex" => Ok(Encoding::Hex),
            "base58" => Ok(Encoding::Base58),
            "base64" => Ok(Encoding::Base64),
            _ => Err(EncodingError::UnknownEncoding {
                name: s.to_string(),
            }),
        }
    }
}

/// Renders bytes as text.
pub fn encode_to_string(bytes: &[u8], encoding: Encoding) -> String {
    match encoding {
        Encoding::Hex => hex::encode(bytes),
        Encoding::Base58 => bs58::encode(bytes).into_string(),
        Encoding::Base64 => BASE64.encode(bytes),
    }
}

/// Parses text back into bytes.
pub fn decode_from_str(text: &str, encoding: Encoding) -> Result<Vec<u8>, EncodingError> {
    let text = text.trim();
    match encoding {
        Encoding::Hex => {
            let digits = text
                .strip_prefix("0x")
                .or_else(|| text.strip_prefix("0X"))
                .unwrap_or(text);
            Ok(hex::decode(digits)?)
        }
        Encoding::Base58 => Ok(bs58::decode(text).into_vec()?),
        Encoding::Base64 => Ok(BASE64.decode(text)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vectors() {
        let bytes = b"hello";
        assert_eq!(encode_to_string(bytes, Encoding::Hex), "68656c6c6f");
        assert_eq!(encode_to_string(bytes, Encoding::Base58), "Cn8eVZg");
        assert_eq!(encode_to_string(bytes, Encoding::Base64), "aGVsbG8=");
    }

    #[test]
    fn test_decode_each_encoding() {
        for encoding in [Encoding::Hex, Encoding::Base58, Encoding::Base64] {
            let text = encode_to_string(&[0, 1, 2, 0xff], encoding);
            assert_eq!(
                decode_from_str(&text, encoding).unwrap(),
                vec![0, 1, 2, 0xff],
                "{}",
                encoding
            );
        }
    }

    #[test]
    fn test_hex_prefix() {
        assert_eq!(decode_from_str("0xC0FFEE", Encoding::Hex).unwrap(), vec![0xc0, 0xff, 0xee]);
    }

    #[test]
    fn test_invalid_input() {
        assert!(matches!(
            decode_from_str("zz", Encoding::Hex),
            Err(EncodingError::Hex(_))
        ));
        assert!(matches!(
            decode_from_str("0OIl", Encoding::Base58),
            Err(EncodingError::Base58(_))
        ));
        assert!(matches!(
            decode_from_str("***", Encoding::Base64),
            Err(EncodingError::Base64(_))
        ));
    }

    #[test]
    fn test_parse_encoding_name() {
        assert_eq!("HEX".parse::<Encoding>().unwrap(), Encoding::Hex);
        assert!(matches!(
            "base32".parse::<Encoding>(),
            Err(EncodingError::UnknownEncoding { .. })
        ));
    }
}

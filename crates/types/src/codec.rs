//! Centralized serialization and deserialization functions.
//!
//! Requests and responses crossing the engine boundary are JSON documents.
//! This module provides the encode/decode entry points with consistent error
//! handling via snafu.

use serde::{Serialize, de::DeserializeOwned};
use snafu::Snafu;

/// Error type for codec operations.
#[derive(Debug, Snafu)]
pub enum CodecError {
    /// Encoding failed.
    #[snafu(display("Encoding failed: {source}"))]
    Encode {
        /// The underlying serde_json error.
        source: serde_json::Error,
    },

    /// Decoding failed.
    #[snafu(display("Decoding failed: {source}"))]
    Decode {
        /// The underlying serde_json error.
        source: serde_json::Error,
    },
}

/// Encodes a value to a JSON string.
///
/// # Errors
///
/// Returns `CodecError::Encode` if serialization fails.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String, CodecError> {
    serde_json::to_string(value).map_err(|source| CodecError::Encode { source })
}

/// Decodes a UTF-8 JSON payload to a value.
///
/// # Errors
///
/// Returns `CodecError::Decode` if the payload is not UTF-8 or does not match `T`.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    serde_json::from_slice(bytes).map_err(|source| CodecError::Decode { source })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Memo {
        transaction_memo: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_chunks: Option<u64>,
    }

    #[test]
    fn test_encode_uses_camel_case_and_skips_none() {
        let value = Memo { transaction_memo: "hi".to_owned(), max_chunks: None };
        assert_eq!(encode(&value).unwrap(), r#"{"transactionMemo":"hi"}"#);
    }

    #[test]
    fn test_optional_field_decodes_when_present_or_missing() {
        let present: Memo = decode(br#"{"transactionMemo":"","maxChunks":20}"#).unwrap();
        assert_eq!(present.max_chunks, Some(20));

        let missing: Memo = decode(br#"{"transactionMemo":""}"#).unwrap();
        assert_eq!(missing.max_chunks, None);
    }

    #[test]
    fn test_decode_invalid_utf8_fails() {
        let result: Result<Memo, _> = decode(&[0xff, 0xfe, 0x00]);
        assert!(matches!(result, Err(CodecError::Decode { .. })));
    }

    #[test]
    fn test_decode_wrong_shape_fails() {
        let result: Result<Memo, _> = decode(br#"{"transactionMemo":7}"#);
        assert!(matches!(result, Err(CodecError::Decode { .. })));
    }
}

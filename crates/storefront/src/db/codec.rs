//! Row encoding for the product list columns.
//!
//! `images`, `videos` and `size_stock` are stored as JSON text. Each product
//! row carries a `media_encoding` version so the layout can evolve without
//! guessing at read time.
//!
//! # Encoding versions
//!
//! | Version | `images` / `videos` | `size_stock` |
//! |---|---|---|
//! | 1 | JSON array of strings | JSON array of `{"size": string, "stock": u32}` |
//!
//! An empty or whitespace-only column decodes as an empty list under every
//! version. Anything else that fails to parse is reported as corruption.

use serde::de::DeserializeOwned;

use boutique_core::SizeStock;

use crate::store::StoreError;

/// Encoding version written by this build.
pub const MEDIA_ENCODING_VERSION: i16 = 1;

/// The list columns of a product row, ready to bind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedLists {
    pub images: String,
    pub videos: String,
    pub size_stock: String,
    pub version: i16,
}

/// The list columns of a product row, decoded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecodedLists {
    pub images: Vec<String>,
    pub videos: Vec<String>,
    pub size_stock: Vec<SizeStock>,
}

/// Encode product lists using [`MEDIA_ENCODING_VERSION`].
///
/// # Errors
///
/// Returns `StoreError::DataCorruption` if serialization fails.
pub fn encode_lists(
    images: &[String],
    videos: &[String],
    size_stock: &[SizeStock],
) -> Result<EncodedLists, StoreError> {
    Ok(EncodedLists {
        images: to_json("images", images)?,
        videos: to_json("videos", videos)?,
        size_stock: to_json("size_stock", size_stock)?,
        version: MEDIA_ENCODING_VERSION,
    })
}

/// Decode product lists written under `version`.
///
/// # Errors
///
/// Returns `StoreError::DataCorruption` for unknown versions or malformed JSON.
pub fn decode_lists(
    version: i16,
    images: &str,
    videos: &str,
    size_stock: &str,
) -> Result<DecodedLists, StoreError> {
    if version != MEDIA_ENCODING_VERSION {
        return Err(StoreError::DataCorruption(format!(
            "unsupported media encoding version {version}"
        )));
    }

    Ok(DecodedLists {
        images: from_json("images", images)?,
        videos: from_json("videos", videos)?,
        size_stock: from_json("size_stock", size_stock)?,
    })
}

fn to_json<T: serde::Serialize + ?Sized>(column: &str, value: &T) -> Result<String, StoreError> {
    serde_json::to_string(value)
        .map_err(|e| StoreError::DataCorruption(format!("failed to encode {column}: {e}")))
}

fn from_json<T: DeserializeOwned>(column: &str, raw: &str) -> Result<Vec<T>, StoreError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(raw)
        .map_err(|e| StoreError::DataCorruption(format!("invalid {column} column: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_encoded_size_stock_layout() {
        let encoded = encode_lists(&[], &[], &[SizeStock::new("M", 5)]).unwrap();
        assert_eq!(encoded.size_stock, r#"[{"size":"M","stock":5}]"#);
        assert_eq!(encoded.images, "[]");
        assert_eq!(encoded.version, MEDIA_ENCODING_VERSION);
    }

    #[test]
    fn test_decode_preserves_order() {
        let decoded = decode_lists(
            1,
            r#"["a.jpg","b.jpg"]"#,
            r#"["/uploads/videos/1.mp4"]"#,
            r#"[{"size":"M","stock":0},{"size":"L","stock":2}]"#,
        )
        .unwrap();

        assert_eq!(decoded.images, vec!["a.jpg", "b.jpg"]);
        assert_eq!(decoded.videos, vec!["/uploads/videos/1.mp4"]);
        assert_eq!(
            decoded.size_stock,
            vec![SizeStock::new("M", 0), SizeStock::new("L", 2)]
        );
    }

    #[test]
    fn test_blank_columns_decode_as_empty() {
        let decoded = decode_lists(1, "", "  ", "").unwrap();
        assert_eq!(decoded, DecodedLists::default());
    }

    #[test]
    fn test_unknown_version_is_corruption() {
        let err = decode_lists(2, "[]", "[]", "[]").unwrap_err();
        assert!(matches!(err, StoreError::DataCorruption(msg) if msg.contains("version 2")));
    }

    #[test]
    fn test_malformed_column_names_the_column() {
        let err = decode_lists(1, "[]", "[]", "{not json").unwrap_err();
        assert!(matches!(err, StoreError::DataCorruption(msg) if msg.contains("size_stock")));
    }
}

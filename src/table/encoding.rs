//! Input encoding detection and decoding

use crate::{TableError, TableResult};
use encoding_rs::Encoding;
use std::path::Path;

/// Chooses the encoding used to read an input table
pub trait EncodingDetector: Send + Sync {
    /// Returns an encoding label understood by [`decode_bytes`]
    fn detect_bytes(&self, bytes: &[u8]) -> String;

    /// Reads the file and runs [`EncodingDetector::detect_bytes`] on its contents
    fn detect(&self, path: &Path) -> TableResult<String> {
        let bytes = std::fs::read(path)?;
        Ok(self.detect_bytes(&bytes))
    }
}

/// Detector that trusts byte-order marks and UTF-8 validity
///
/// Input with a BOM uses the encoding the BOM names. Input that is valid
/// UTF-8 is read as UTF-8. Anything else is inconclusive and always resolves
/// to the configured fallback.
#[derive(Debug, Clone)]
pub struct SniffingDetector {
    fallback: String,
}

impl SniffingDetector {
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            fallback: fallback.into(),
        }
    }
}

impl EncodingDetector for SniffingDetector {
    fn detect_bytes(&self, bytes: &[u8]) -> String {
        if let Some((encoding, _bom_len)) = Encoding::for_bom(bytes) {
            return encoding.name().to_string();
        }

        if std::str::from_utf8(bytes).is_ok() {
            return encoding_rs::UTF_8.name().to_string();
        }

        tracing::debug!("Encoding inconclusive, using {}", self.fallback);
        self.fallback.clone()
    }
}

/// Decodes a byte buffer with the named encoding
///
/// Malformed sequences become U+FFFD instead of failing the run.
pub fn decode_bytes(bytes: &[u8], encoding_label: &str) -> TableResult<String> {
    let encoding = Encoding::for_label(encoding_label.trim().as_bytes())
        .ok_or_else(|| TableError::UnknownEncoding(encoding_label.to_string()))?;

    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        tracing::warn!(
            "Input contained bytes that are not valid {}; they were replaced",
            used.name()
        );
    }

    Ok(text.into_owned())
}

//! Customer signature capture.
//!
//! A signature travels as a `data:image/png;base64,...` URL in the
//! `customerSignature` field.

use std::fs;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{ClientError, Result};

const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const DATA_URL_PREFIX: &str = "data:image/png;base64,";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Signature {
    png: Vec<u8>,
}

impl Signature {
    /// A cleared pad.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_png(bytes: Vec<u8>) -> Result<Self> {
        if !bytes.is_empty() && !bytes.starts_with(&PNG_MAGIC) {
            return Err(ClientError::Request("signature must be a PNG image".to_string()));
        }
        Ok(Self { png: bytes })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        Self::from_png(fs::read(path)?)
    }

    pub fn from_data_url(url: &str) -> Result<Self> {
        let encoded = url
            .strip_prefix(DATA_URL_PREFIX)
            .ok_or_else(|| ClientError::Request("signature must be an image/png data URL".to_string()))?;
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| ClientError::Request(format!("invalid signature encoding: {}", e)))?;
        Self::from_png(bytes)
    }

    pub fn is_empty(&self) -> bool {
        self.png.is_empty()
    }

    pub fn clear(&mut self) {
        self.png.clear();
    }

    pub fn to_data_url(&self) -> String {
        format!("{}{}", DATA_URL_PREFIX, STANDARD.encode(&self.png))
    }
}

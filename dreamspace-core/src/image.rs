//! Images travel through the app as `data:<mime>;base64,<payload>` URIs.

use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ServiceError;

const DATA_PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64";

/// A validated image data URI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EncodedImage {
    uri: String,
    /// Byte offset of the payload (just past the first comma)
    payload_start: usize,
}

impl EncodedImage {
    /// Parse a data URI, accepting only base64 `image/*` payloads
    pub fn parse(uri: impl Into<String>) -> Result<Self, ServiceError> {
        let uri = uri.into();
        let comma = uri
            .find(',')
            .ok_or_else(|| ServiceError::InvalidImage("missing ',' separator".to_string()))?;
        let header = &uri[..comma];

        let media = header
            .strip_prefix(DATA_PREFIX)
            .ok_or_else(|| ServiceError::InvalidImage("not a data URI".to_string()))?;
        let mime = media
            .strip_suffix(BASE64_MARKER)
            .ok_or_else(|| ServiceError::InvalidImage("payload is not base64".to_string()))?;
        if !mime.starts_with("image/") {
            return Err(ServiceError::InvalidImage(format!(
                "unsupported media type: {}",
                if mime.is_empty() { "<none>" } else { mime }
            )));
        }

        let payload = &uri[comma + 1..];
        if payload.is_empty() {
            return Err(ServiceError::InvalidImage("empty payload".to_string()));
        }
        if !payload
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'='))
        {
            return Err(ServiceError::InvalidImage("payload contains non-base64 characters".to_string()));
        }

        Ok(Self {
            payload_start: comma + 1,
            uri,
        })
    }

    /// Wrap raw image bytes
    pub fn from_bytes(mime_type: &str, bytes: &[u8]) -> Result<Self, ServiceError> {
        Self::from_base64(mime_type, &general_purpose::STANDARD.encode(bytes))
    }

    /// Wrap an already-encoded payload, as returned by the image model.
    /// Goes through [`parse`](Self::parse), so empty or non-base64 payloads are rejected.
    pub fn from_base64(mime_type: &str, payload: &str) -> Result<Self, ServiceError> {
        Self::parse(format!("{}{}{},{}", DATA_PREFIX, mime_type, BASE64_MARKER, payload))
    }

    pub fn mime_type(&self) -> &str {
        &self.uri[DATA_PREFIX.len()..self.payload_start - 1 - BASE64_MARKER.len()]
    }

    /// Base64 payload without the data URI header
    pub fn payload(&self) -> &str {
        &self.uri[self.payload_start..]
    }

    pub fn as_str(&self) -> &str {
        &self.uri
    }

    pub fn decode(&self) -> Result<Vec<u8>, ServiceError> {
        general_purpose::STANDARD
            .decode(self.payload())
            .map_err(|e| ServiceError::InvalidImage(format!("failed to decode base64 payload: {}", e)))
    }

    /// File extension matching the mime type, used for downloads
    pub fn extension(&self) -> &str {
        match self.mime_type() {
            "image/jpeg" | "image/jpg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "png",
        }
    }
}

impl fmt::Display for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}

impl TryFrom<String> for EncodedImage {
    type Error = ServiceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<EncodedImage> for String {
    fn from(image: EncodedImage) -> Self {
        image.uri
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_splits_header_and_payload() {
        let image = EncodedImage::parse("data:image/jpeg;base64,/9j/4AAQ").unwrap();
        assert_eq!(image.mime_type(), "image/jpeg");
        assert_eq!(image.payload(), "/9j/4AAQ");
        assert_eq!(image.extension(), "jpg");
    }

    #[test]
    fn test_rejects_non_images() {
        assert!(EncodedImage::parse("data:text/plain;base64,aGVsbG8=").is_err());
        assert!(EncodedImage::parse("data:image/png,rawbytes").is_err());
        assert!(EncodedImage::parse("aGVsbG8=").is_err());
        assert!(EncodedImage::parse("data:image/png;base64,").is_err());
        assert!(EncodedImage::parse("data:image/png;base64,not base64!").is_err());
    }

    #[test]
    fn test_from_bytes_decodes_back() {
        let bytes = [0x89, b'P', b'N', b'G', 0x0d, 0x0a];
        let image = EncodedImage::from_bytes("image/png", &bytes).unwrap();
        assert!(image.as_str().starts_with("data:image/png;base64,"));
        assert_eq!(image.mime_type(), "image/png");
        assert_eq!(image.decode().unwrap(), bytes);
    }

    #[test]
    fn test_from_base64_validates_payload() {
        assert_eq!(
            EncodedImage::from_base64("image/png", ""),
            Err(ServiceError::InvalidImage("empty payload".to_string()))
        );
        assert!(EncodedImage::from_base64("image/png", "%%%").is_err());
        assert!(EncodedImage::from_bytes("image/png", &[]).is_err());
        assert!(EncodedImage::from_base64("text/plain", "aGVsbG8=").is_err());

        let image = EncodedImage::from_base64("image/webp", "UklGRg==").unwrap();
        assert_eq!(image.payload(), "UklGRg==");
        assert_eq!(image.mime_type(), "image/webp");
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Result<EncodedImage, _> = serde_json::from_str("\"data:image/webp;base64,UklGRg==\"");
        assert_eq!(ok.unwrap().extension(), "webp");

        let bad: Result<EncodedImage, _> = serde_json::from_str("\"https://example.com/room.png\"");
        assert!(bad.is_err());
    }
}

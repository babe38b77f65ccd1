//! Gemini `generateContent` payloads.

use dreamspace_core::{EncodedImage, ServiceError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// Single user turn made of `parts`
    pub fn user(parts: Vec<Part>) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts,
            }],
            generation_config: None,
        }
    }

    pub fn with_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = Some(config);
        self
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_config: Option<ImageConfig>,
}

impl GenerationConfig {
    /// Constrain the answer to JSON matching `schema`
    pub fn json(schema: serde_json::Value) -> Self {
        Self {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(schema),
            ..Self::default()
        }
    }

    pub fn image(aspect_ratio: &str) -> Self {
        Self {
            image_config: Some(ImageConfig {
                aspect_ratio: aspect_ratio.to_string(),
            }),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    pub aspect_ratio: String,
}

/// Content container used in both requests and responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// Text or inline media. Response parts may carry neither (e.g. tool calls).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought: Option<bool>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn image(image: &EncodedImage) -> Self {
        Self {
            inline_data: Some(InlineData {
                mime_type: image.mime_type().to_string(),
                data: image.payload().to_string(),
            }),
            ..Self::default()
        }
    }

    fn is_thought(&self) -> bool {
        self.thought.unwrap_or(false)
    }
}

/// Base64 inline payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    #[serde(default)]
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

impl GenerateContentResponse {
    fn first_parts(&self) -> Result<&[Part], ServiceError> {
        let candidate = self.candidates.first().ok_or_else(|| {
            match self.prompt_feedback.as_ref().and_then(|f| f.block_reason.as_deref()) {
                Some(reason) => ServiceError::MalformedResponse(format!("prompt blocked: {}", reason)),
                None => ServiceError::NoCandidates,
            }
        })?;
        Ok(candidate
            .content
            .as_ref()
            .map(|content| content.parts.as_slice())
            .unwrap_or_default())
    }

    /// Concatenated text of the first candidate, skipping thought summaries
    pub fn text(&self) -> Result<String, ServiceError> {
        Ok(self
            .first_parts()?
            .iter()
            .filter(|part| !part.is_thought())
            .filter_map(|part| part.text.as_deref())
            .collect())
    }

    /// First part of the first candidate carrying image data.
    /// Parts with an empty payload carry no image and are skipped.
    pub fn first_image(&self) -> Result<Option<EncodedImage>, ServiceError> {
        self.first_parts()?
            .iter()
            .filter_map(|part| part.inline_data.as_ref())
            .find(|inline| !inline.data.is_empty())
            .map(|inline| {
                let mime = if inline.mime_type.starts_with("image/") {
                    inline.mime_type.as_str()
                } else {
                    "image/png"
                };
                EncodedImage::from_base64(mime, &inline.data)
                    .map_err(|e| ServiceError::MalformedResponse(format!("Inline image: {}", e)))
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let image = EncodedImage::parse("data:image/jpeg;base64,/9j/").unwrap();
        let request = GenerateContentRequest::user(vec![Part::image(&image), Part::text("Redesign")])
            .with_config(GenerationConfig::image("4:3"));

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(json["contents"][0]["parts"][0]["inlineData"]["data"], "/9j/");
        assert!(json["contents"][0]["parts"][0].get("text").is_none());
        assert_eq!(json["contents"][0]["parts"][1]["text"], "Redesign");
        assert_eq!(json["generationConfig"]["imageConfig"]["aspectRatio"], "4:3");
        assert!(json["generationConfig"].get("responseMimeType").is_none());
    }

    #[test]
    fn test_text_joins_parts_and_skips_thoughts() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"role": "model", "parts": [
                {"text": "planning...", "thought": true},
                {"text": "{\"a\":"},
                {"text": "1}"}
            ]}, "finishReason": "STOP"}]}"#,
        )
        .unwrap();

        assert_eq!(response.text().unwrap(), "{\"a\":1}");
    }

    #[test]
    fn test_first_image_takes_first_inline_part() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [
                {"text": "Here is your room"},
                {"inlineData": {"mimeType": "image/png", "data": "AAAA"}},
                {"inlineData": {"mimeType": "image/png", "data": "BBBB"}}
            ]}}]}"#,
        )
        .unwrap();

        let image = response.first_image().unwrap().unwrap();
        assert_eq!(image.as_str(), "data:image/png;base64,AAAA");
    }

    #[test]
    fn test_no_image_is_none() {
        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates": [{"content": {"parts": [{"text": "sorry"}]}}]}"#).unwrap();
        assert!(response.first_image().unwrap().is_none());

        let empty_content: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#).unwrap();
        assert!(empty_content.first_image().unwrap().is_none());
    }

    #[test]
    fn test_empty_inline_payload_is_no_image() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [
                {"inlineData": {"mimeType": "image/png", "data": ""}}
            ]}}]}"#,
        )
        .unwrap();
        assert!(response.first_image().unwrap().is_none());

        let later_part: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [
                {"inlineData": {"mimeType": "image/png", "data": ""}},
                {"inlineData": {"mimeType": "image/jpeg", "data": "/9j/"}}
            ]}}]}"#,
        )
        .unwrap();
        assert_eq!(
            later_part.first_image().unwrap().unwrap().as_str(),
            "data:image/jpeg;base64,/9j/"
        );
    }

    #[test]
    fn test_garbled_inline_payload_is_malformed() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [
                {"inlineData": {"mimeType": "image/png", "data": "not base64!"}}
            ]}}]}"#,
        )
        .unwrap();
        assert!(matches!(
            response.first_image().unwrap_err(),
            ServiceError::MalformedResponse(_)
        ));
    }

    #[test]
    fn test_missing_candidates() {
        let response: GenerateContentResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(response.text().unwrap_err(), ServiceError::NoCandidates);

        let blocked: GenerateContentResponse =
            serde_json::from_str(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#).unwrap();
        assert!(matches!(blocked.text().unwrap_err(), ServiceError::MalformedResponse(_)));
    }
}

use dreamspace_core::styles::{self, ANALYZE_INSTRUCTION, CORE_DESIGNER_SYSTEM_PROMPT};
use dreamspace_core::{
    AspectRatio, DesignStyle, DesignTransformation, EncodedImage, Orchestrator, RoomAnalysis,
    ServiceError,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{info, warn};

pub mod wire;

use wire::{GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";

/// Connection settings for the Gemini API
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    /// Model for analysis, transformation and prompt writing
    pub text_model: String,
    /// Model that renders the redesigned room
    pub image_model: String,
}

impl GeminiConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
        }
    }

    /// Read `GEMINI_API_KEY` (or `API_KEY`) plus optional
    /// `GEMINI_BASE_URL`, `GEMINI_TEXT_MODEL` and `GEMINI_IMAGE_MODEL`
    pub fn from_env() -> anyhow::Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .map_err(|_| anyhow::anyhow!("GEMINI_API_KEY environment variable not set"))?;

        let mut config = Self::new(api_key);
        if let Ok(base_url) = std::env::var("GEMINI_BASE_URL") {
            config.base_url = base_url;
        }
        if let Ok(model) = std::env::var("GEMINI_TEXT_MODEL") {
            config.text_model = model;
        }
        if let Ok(model) = std::env::var("GEMINI_IMAGE_MODEL") {
            config.image_model = model;
        }
        Ok(config)
    }
}

/// Interior designer backed by Gemini
pub struct GeminiDesigner {
    client: Client,
    config: GeminiConfig,
}

/// Transformation fields as the model returns them
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransformationPayload {
    style: String,
    color_palette: String,
    furniture_recommendations: Vec<String>,
    lighting_plan: String,
    summary: String,
}

impl GeminiDesigner {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Create from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self::new(GeminiConfig::from_env()?))
    }

    /// POST one `generateContent` call
    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ServiceError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            model
        );
        info!("Sending request to Gemini API (model: {})", model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!("Gemini API error: {} - {}", status, error_text);
            return Err(ServiceError::Api {
                status: status.as_u16(),
                body: error_text,
            });
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| ServiceError::MalformedResponse(format!("Failed to parse response: {}", e)))
    }

    /// Describe the room in the photo
    pub async fn analyze_room(&self, image: &EncodedImage) -> Result<RoomAnalysis, ServiceError> {
        info!("Analyzing room photo ({})", image.mime_type());

        let request = GenerateContentRequest::user(vec![
            Part::text(CORE_DESIGNER_SYSTEM_PROMPT),
            Part::image(image),
            Part::text(ANALYZE_INSTRUCTION),
        ])
        .with_config(GenerationConfig::json(analysis_schema()));

        let response = self.generate_content(&self.config.text_model, &request).await?;
        let analysis: RoomAnalysis = parse_json(&response.text()?)?;

        info!(
            "Room analysis: {} with {} suggestions",
            analysis.room_type,
            analysis.suggestions.len()
        );
        Ok(analysis)
    }

    /// Derive the redesign rationale for `style`
    pub async fn design_transformation(
        &self,
        style: DesignStyle,
        analysis: &RoomAnalysis,
        custom_ideas: Option<&str>,
    ) -> Result<DesignTransformation, ServiceError> {
        info!("Deriving {} transformation", style);

        let prompt = styles::transformation_prompt(style, analysis, custom_ideas)
            .map_err(|e| ServiceError::MalformedResponse(format!("Failed to encode analysis: {}", e)))?;
        let request = GenerateContentRequest::user(vec![Part::text(prompt)])
            .with_config(GenerationConfig::json(transformation_schema()));

        let response = self.generate_content(&self.config.text_model, &request).await?;
        let payload: TransformationPayload = parse_json(&response.text()?)?;

        if !payload.style.eq_ignore_ascii_case(style.as_str()) {
            warn!("Model answered with style '{}' for a {} request", payload.style, style);
        }

        Ok(DesignTransformation {
            style,
            color_palette: payload.color_palette,
            furniture_recommendations: payload.furniture_recommendations,
            lighting_plan: payload.lighting_plan,
            summary: payload.summary,
            generated_image_base64: None,
        })
    }

    /// Ask the text model to write the prompt for the image model
    pub async fn visual_prompt(
        &self,
        transformation: &DesignTransformation,
        analysis: &RoomAnalysis,
        custom_ideas: Option<&str>,
    ) -> Result<String, ServiceError> {
        let request = GenerateContentRequest::user(vec![Part::text(styles::visual_prompt_request(
            analysis,
            transformation,
            custom_ideas,
        ))]);

        let response = self.generate_content(&self.config.text_model, &request).await?;
        let prompt = response.text()?;
        if prompt.trim().is_empty() {
            return Err(ServiceError::MalformedResponse("empty visual prompt".to_string()));
        }
        Ok(prompt)
    }

    /// Write a visual prompt, then render the original photo with it
    pub async fn render_image(
        &self,
        original: &EncodedImage,
        transformation: &DesignTransformation,
        analysis: &RoomAnalysis,
        custom_ideas: Option<&str>,
        aspect_ratio: AspectRatio,
    ) -> Result<Option<EncodedImage>, ServiceError> {
        let visual_prompt = self.visual_prompt(transformation, analysis, custom_ideas).await?;
        info!(
            "Rendering {} design at {} ({} char prompt)",
            transformation.style,
            aspect_ratio,
            visual_prompt.len()
        );

        let request = GenerateContentRequest::user(vec![
            Part::image(original),
            Part::text(styles::render_instruction(&visual_prompt)),
        ])
        .with_config(GenerationConfig::image(aspect_ratio.as_str()));

        let response = self.generate_content(&self.config.image_model, &request).await?;
        let image = response.first_image()?;
        if image.is_none() {
            warn!("Image model response carried no inline image data");
        }
        Ok(image)
    }
}

impl Orchestrator for GeminiDesigner {
    async fn analyze_room(&self, image: &EncodedImage) -> Result<RoomAnalysis, ServiceError> {
        GeminiDesigner::analyze_room(self, image).await
    }

    async fn design_transformation(
        &self,
        style: DesignStyle,
        analysis: &RoomAnalysis,
        custom_ideas: Option<&str>,
    ) -> Result<DesignTransformation, ServiceError> {
        GeminiDesigner::design_transformation(self, style, analysis, custom_ideas).await
    }

    async fn render_image(
        &self,
        original: &EncodedImage,
        transformation: &DesignTransformation,
        analysis: &RoomAnalysis,
        custom_ideas: Option<&str>,
        aspect_ratio: AspectRatio,
    ) -> Result<Option<EncodedImage>, ServiceError> {
        GeminiDesigner::render_image(self, original, transformation, analysis, custom_ideas, aspect_ratio)
            .await
    }
}

fn analysis_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "roomType": { "type": "STRING" },
            "detectedLayout": { "type": "STRING" },
            "constraints": { "type": "STRING" },
            "suggestions": { "type": "ARRAY", "items": { "type": "STRING" } }
        },
        "required": ["roomType", "detectedLayout", "constraints", "suggestions"]
    })
}

fn transformation_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "style": { "type": "STRING" },
            "colorPalette": { "type": "STRING" },
            "furnitureRecommendations": { "type": "ARRAY", "items": { "type": "STRING" } },
            "lightingPlan": { "type": "STRING" },
            "summary": { "type": "STRING" }
        },
        "required": ["style", "colorPalette", "furnitureRecommendations", "lightingPlan", "summary"]
    })
}

fn parse_json<T: DeserializeOwned>(content: &str) -> Result<T, ServiceError> {
    let json_str = extract_json_from_response(content);
    serde_json::from_str(json_str)
        .map_err(|e| ServiceError::MalformedResponse(format!("{}. Response: {}", e, json_str)))
}

/// Strip a markdown code fence if the model wrapped its JSON in one
fn extract_json_from_response(content: &str) -> &str {
    let trimmed = content.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }

    let body = match trimmed.find('\n') {
        Some(newline) => &trimmed[newline + 1..],
        None => return "",
    };
    match body.rfind("```") {
        Some(end) => body[..end].trim(),
        None => body.trim(),
    }
}

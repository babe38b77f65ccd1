//! Orchestrator that forwards each pipeline step to the backend over HTTP.

use dreamspace_core::{
    AspectRatio, DesignStyle, DesignTransformation, EncodedImage, Orchestrator, RoomAnalysis,
    ServiceError,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

const DEFAULT_API_URL: &str = "http://localhost:3000";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeBody<'a> {
    image: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TransformBody<'a> {
    style: DesignStyle,
    analysis: &'a RoomAnalysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    custom_ideas: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RenderBody<'a> {
    image: &'a str,
    transformation: &'a DesignTransformation,
    analysis: &'a RoomAnalysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    custom_ideas: Option<&'a str>,
    aspect_ratio: AspectRatio,
}

#[derive(Debug, Deserialize)]
struct RenderReply {
    image: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

pub struct HttpOrchestrator {
    client: reqwest::Client,
    base_url: String,
}

impl Default for HttpOrchestrator {
    fn default() -> Self {
        Self::new(option_env!("DREAMSPACE_API_URL").unwrap_or(DEFAULT_API_URL))
    }
}

impl HttpOrchestrator {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ServiceError> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await
            .map_err(|e| ServiceError::Transport(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            return Err(api_error(status, error_text));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ServiceError::MalformedResponse(format!("Failed to parse response: {}", e)))
    }
}

impl Orchestrator for HttpOrchestrator {
    async fn analyze_room(&self, image: &EncodedImage) -> Result<RoomAnalysis, ServiceError> {
        self.post("/api/analyze", &AnalyzeBody { image: image.as_str() }).await
    }

    async fn design_transformation(
        &self,
        style: DesignStyle,
        analysis: &RoomAnalysis,
        custom_ideas: Option<&str>,
    ) -> Result<DesignTransformation, ServiceError> {
        self.post(
            "/api/transform",
            &TransformBody {
                style,
                analysis,
                custom_ideas,
            },
        )
        .await
    }

    async fn render_image(
        &self,
        original: &EncodedImage,
        transformation: &DesignTransformation,
        analysis: &RoomAnalysis,
        custom_ideas: Option<&str>,
        aspect_ratio: AspectRatio,
    ) -> Result<Option<EncodedImage>, ServiceError> {
        let reply: RenderReply = self
            .post(
                "/api/render",
                &RenderBody {
                    image: original.as_str(),
                    transformation,
                    analysis,
                    custom_ideas,
                    aspect_ratio,
                },
            )
            .await?;

        rendered_image(reply)
    }
}

/// Prefer the backend's `message` over the raw error body
fn api_error(status: u16, error_text: String) -> ServiceError {
    let body = serde_json::from_str::<ErrorBody>(&error_text)
        .map(|e| e.message)
        .unwrap_or(error_text);
    ServiceError::Api { status, body }
}

/// `null` means the model produced no image
fn rendered_image(reply: RenderReply) -> Result<Option<EncodedImage>, ServiceError> {
    reply
        .image
        .map(|uri| {
            EncodedImage::parse(uri)
                .map_err(|e| ServiceError::MalformedResponse(format!("Rendered image: {}", e)))
        })
        .transpose()
}


#[cfg(all(test, not(target_arch = "wasm32")))]
mod http_tests {
    use super::*;
    use axum::{http::StatusCode, response::IntoResponse, routing::post, Json, Router};
    use serde_json::json;

    const ROOM_PHOTO: &str = "data:image/jpeg;base64,/9j/4AAQSkZJRg==";

    async fn backend(app: Router) -> HttpOrchestrator {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        HttpOrchestrator::new(&format!("http://{}/", addr))
    }

    fn analysis() -> RoomAnalysis {
        RoomAnalysis {
            room_type: "Studio".to_string(),
            detected_layout: "Open".to_string(),
            constraints: "Radiator under window".to_string(),
            suggestions: vec![],
        }
    }

    fn transformation() -> DesignTransformation {
        DesignTransformation {
            style: DesignStyle::Bohemian,
            color_palette: "Terracotta".to_string(),
            furniture_recommendations: vec!["Floor cushions".to_string()],
            lighting_plan: "Paper lanterns".to_string(),
            summary: "Layered and warm".to_string(),
            generated_image_base64: None,
        }
    }

    #[tokio::test]
    async fn test_backend_error_surfaces_message() {
        let orchestrator = backend(Router::new().route(
            "/api/analyze",
            post(|| async {
                (
                    StatusCode::BAD_GATEWAY,
                    Json(json!({ "error": "UPSTREAM_ERROR", "message": "service returned 429: quota", "stage": "analyze" })),
                )
                    .into_response()
            }),
        ))
        .await;

        let image = EncodedImage::parse(ROOM_PHOTO).unwrap();
        let err = orchestrator.analyze_room(&image).await.unwrap_err();
        assert_eq!(
            err,
            ServiceError::Api {
                status: 502,
                body: "service returned 429: quota".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_null_render_is_none() {
        let orchestrator = backend(Router::new().route(
            "/api/render",
            post(|Json(body): Json<serde_json::Value>| async move {
                assert_eq!(body["aspectRatio"], "9:16");
                assert_eq!(body["customIdeas"], "Macrame");
                Json(json!({ "image": null }))
            }),
        ))
        .await;

        let image = EncodedImage::parse(ROOM_PHOTO).unwrap();
        let rendered = orchestrator
            .render_image(&image, &transformation(), &analysis(), Some("Macrame"), AspectRatio::Portrait)
            .await
            .unwrap();
        assert!(rendered.is_none());
    }
}

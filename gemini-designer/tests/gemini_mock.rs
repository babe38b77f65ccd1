// Drives GeminiDesigner against an in-process mock of the generateContent API
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use dreamspace_core::{
    AppStep, AspectRatio, DesignStyle, EncodedImage, Orchestrator, PipelineStage, ServiceError,
    SessionController,
};
use gemini_designer::{GeminiConfig, GeminiDesigner, DEFAULT_IMAGE_MODEL, DEFAULT_TEXT_MODEL};
use serde_json::{json, Value};

const API_KEY: &str = "test-key";
const ROOM_PHOTO: &str = "data:image/jpeg;base64,/9j/4AAQSkZJRg==";
const RENDER_DATA: &str = "iVBORw0KGgoAAAANSUhEUg==";

#[derive(Clone, Copy, PartialEq)]
enum Behaviour {
    Normal,
    RateLimited,
    NoImage,
    EmptyImage,
}

#[derive(Clone)]
struct MockGemini {
    behaviour: Behaviour,
    requests: Arc<Mutex<Vec<(String, Value)>>>,
}

fn candidate(parts: Value) -> Value {
    json!({ "candidates": [{ "content": { "role": "model", "parts": parts }, "finishReason": "STOP" }] })
}

async fn generate_content(
    State(mock): State<MockGemini>,
    Path(call): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if headers.get("x-goog-api-key").and_then(|v| v.to_str().ok()) != Some(API_KEY) {
        return (StatusCode::UNAUTHORIZED, "missing key").into_response();
    }
    if mock.behaviour == Behaviour::RateLimited {
        return (StatusCode::TOO_MANY_REQUESTS, "quota exhausted").into_response();
    }

    let model = call.trim_end_matches(":generateContent").to_string();
    mock.requests.lock().unwrap().push((model.clone(), body.clone()));

    if model == DEFAULT_IMAGE_MODEL {
        if mock.behaviour == Behaviour::NoImage {
            return Json(candidate(json!([{ "text": "I cannot render this room." }]))).into_response();
        }
        if mock.behaviour == Behaviour::EmptyImage {
            return Json(candidate(json!([{ "inlineData": { "mimeType": "image/png", "data": "" } }])))
                .into_response();
        }
        return Json(candidate(json!([
            { "text": "Here is the redesigned room." },
            { "inlineData": { "mimeType": "image/png", "data": RENDER_DATA } }
        ])))
        .into_response();
    }

    let properties = &body["generationConfig"]["responseSchema"]["properties"];
    let text = if properties.get("roomType").is_some() {
        "```json\n{\"roomType\": \"Living room\", \"detectedLayout\": \"L-shaped\", \"constraints\": \"Low ceiling\", \"suggestions\": [\"Lighter walls\", \"Floor lamp\"]}\n```".to_string()
    } else if properties.get("colorPalette").is_some() {
        json!({
            "style": "Industrial",
            "colorPalette": "Charcoal, rust, raw concrete",
            "furnitureRecommendations": ["Leather sofa", "Steel shelving"],
            "lightingPlan": "Exposed filament pendants",
            "summary": "Warehouse loft energy"
        })
        .to_string()
    } else {
        "A photorealistic industrial loft living room with exposed brick".to_string()
    };
    Json(candidate(json!([{ "text": text }]))).into_response()
}

async fn spawn_mock(behaviour: Behaviour) -> (GeminiDesigner, Arc<Mutex<Vec<(String, Value)>>>) {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/v1beta/models/:call", post(generate_content))
        .with_state(MockGemini {
            behaviour,
            requests: requests.clone(),
        });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let mut config = GeminiConfig::new(API_KEY.to_string());
    config.base_url = format!("http://{}", addr);
    (GeminiDesigner::new(config), requests)
}

#[tokio::test]
async fn test_full_session_against_mock() {
    let (designer, requests) = spawn_mock(Behaviour::Normal).await;

    let mut session = SessionController::new();
    session.upload_image(ROOM_PHOTO).unwrap();
    session.select_style(DesignStyle::Industrial);
    session.set_custom_ideas("Keep the brick wall");
    session.select_aspect_ratio(AspectRatio::Landscape);

    assert!(session.generate(&designer).await);
    assert_eq!(session.step(), AppStep::Result);

    let design = session.transformation().unwrap();
    assert_eq!(design.style, DesignStyle::Industrial);
    assert_eq!(design.furniture_recommendations, vec!["Leather sofa", "Steel shelving"]);
    assert_eq!(
        design.generated_image_base64.as_ref().map(EncodedImage::as_str),
        Some(format!("data:image/png;base64,{}", RENDER_DATA).as_str())
    );

    let requests = requests.lock().unwrap();
    let models: Vec<&str> = requests.iter().map(|(model, _)| model.as_str()).collect();
    assert_eq!(
        models,
        vec![DEFAULT_TEXT_MODEL, DEFAULT_TEXT_MODEL, DEFAULT_TEXT_MODEL, DEFAULT_IMAGE_MODEL]
    );

    let analyze = &requests[0].1;
    assert_eq!(analyze["contents"][0]["parts"][1]["inlineData"]["mimeType"], "image/jpeg");
    assert_eq!(analyze["contents"][0]["parts"][1]["inlineData"]["data"], "/9j/4AAQSkZJRg==");
    assert_eq!(analyze["generationConfig"]["responseMimeType"], "application/json");

    let transform_prompt = requests[1].1["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(transform_prompt.contains("\"roomType\":\"Living room\""));
    assert!(transform_prompt.contains("Additional user requirements to incorporate: Keep the brick wall"));

    let visual_request = &requests[2].1;
    assert!(visual_request.get("generationConfig").is_none());
    assert!(visual_request["contents"][0]["parts"][0]["text"]
        .as_str()
        .unwrap()
        .contains("Specific User Ideas to Include: Keep the brick wall"));

    let render = &requests[3].1;
    assert_eq!(render["generationConfig"]["imageConfig"]["aspectRatio"], "16:9");
    assert_eq!(render["contents"][0]["parts"][0]["inlineData"]["data"], "/9j/4AAQSkZJRg==");
    assert!(render["contents"][0]["parts"][1]["text"]
        .as_str()
        .unwrap()
        .starts_with("Redesign this exact room using the following instructions: A photorealistic"));
}

#[tokio::test]
async fn test_api_error_is_reported_with_status() {
    let (designer, _) = spawn_mock(Behaviour::RateLimited).await;
    let image = EncodedImage::parse(ROOM_PHOTO).unwrap();

    let err = Orchestrator::analyze_room(&designer, &image).await.unwrap_err();
    assert_eq!(
        err,
        ServiceError::Api {
            status: 429,
            body: "quota exhausted".to_string()
        }
    );

    let mut session = SessionController::new();
    session.upload_image(ROOM_PHOTO).unwrap();
    session.generate(&designer).await;
    assert_eq!(session.step(), AppStep::Editing);
    assert_eq!(session.last_failure().unwrap().stage, PipelineStage::Analyze);
}

#[tokio::test]
async fn test_render_without_image_data() {
    let (designer, _) = spawn_mock(Behaviour::NoImage).await;

    let mut session = SessionController::new();
    session.upload_image(ROOM_PHOTO).unwrap();
    session.generate(&designer).await;

    assert_eq!(session.step(), AppStep::Editing);
    assert!(session.transformation().is_none());
    let failure = session.last_failure().unwrap();
    assert_eq!(failure.stage, PipelineStage::Render);
    assert_eq!(failure.message, "no image in response");
}

#[tokio::test]
async fn test_render_with_empty_inline_payload() {
    let (designer, requests) = spawn_mock(Behaviour::EmptyImage).await;

    let mut session = SessionController::new();
    session.upload_image(ROOM_PHOTO).unwrap();
    session.generate(&designer).await;

    assert_eq!(requests.lock().unwrap().len(), 4);
    assert_eq!(session.step(), AppStep::Editing);
    assert!(session.transformation().is_none());
    assert!(session.download().is_none());
    let failure = session.last_failure().unwrap();
    assert_eq!(failure.stage, PipelineStage::Render);
    assert_eq!(failure.message, "no image in response");
}

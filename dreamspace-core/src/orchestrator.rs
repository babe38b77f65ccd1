//! The analyze → transform → render pipeline over a generative backend.

use tracing::{info, warn};

use crate::error::{PipelineError, PipelineStage, ServiceError};
use crate::image::EncodedImage;
use crate::styles::user_notes;
use crate::types::{AspectRatio, DesignStyle, DesignTransformation, RoomAnalysis};

/// The three operations a generative backend must provide.
///
/// Implemented natively by the Gemini client and in the browser by the
/// HTTP client that talks to the backend, so futures carry no `Send` bound.
#[allow(async_fn_in_trait)]
pub trait Orchestrator {
    /// Describe the room in the photo
    async fn analyze_room(&self, image: &EncodedImage) -> Result<RoomAnalysis, ServiceError>;

    /// Derive the textual redesign for `style`; the result carries no image
    async fn design_transformation(
        &self,
        style: DesignStyle,
        analysis: &RoomAnalysis,
        custom_ideas: Option<&str>,
    ) -> Result<DesignTransformation, ServiceError>;

    /// Render the redesigned room. `Ok(None)` when the model answered without image data.
    async fn render_image(
        &self,
        original: &EncodedImage,
        transformation: &DesignTransformation,
        analysis: &RoomAnalysis,
        custom_ideas: Option<&str>,
        aspect_ratio: AspectRatio,
    ) -> Result<Option<EncodedImage>, ServiceError>;
}

/// Snapshot of the session inputs taken when generation starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationJob {
    pub image: EncodedImage,
    pub style: DesignStyle,
    pub custom_ideas: String,
    pub aspect_ratio: AspectRatio,
}

impl GenerationJob {
    pub fn notes(&self) -> Option<&str> {
        user_notes(Some(&self.custom_ideas))
    }
}

/// Run the three calls strictly in sequence. The first failure aborts the run.
pub async fn run_pipeline<O: Orchestrator + ?Sized>(
    orchestrator: &O,
    job: &GenerationJob,
) -> Result<DesignTransformation, PipelineError> {
    info!(
        "Starting design pipeline (style: {}, aspect ratio: {})",
        job.style, job.aspect_ratio
    );

    let analysis = orchestrator
        .analyze_room(&job.image)
        .await
        .map_err(|e| PipelineError::new(PipelineStage::Analyze, e))?;
    info!("Analyzed room: {} ({})", analysis.room_type, analysis.detected_layout);

    let design = orchestrator
        .design_transformation(job.style, &analysis, job.notes())
        .await
        .map_err(|e| PipelineError::new(PipelineStage::Transform, e))?;
    info!(
        "Derived {} design with {} furniture recommendations",
        design.style,
        design.furniture_recommendations.len()
    );

    let rendered = orchestrator
        .render_image(&job.image, &design, &analysis, job.notes(), job.aspect_ratio)
        .await
        .map_err(|e| PipelineError::new(PipelineStage::Render, e))?;

    match rendered {
        Some(image) => {
            info!("Rendered {} image", image.mime_type());
            Ok(design.with_image(image))
        }
        None => {
            warn!("Image model returned no image data");
            Err(PipelineError::new(PipelineStage::Render, ServiceError::NoImage))
        }
    }
}

//! Session state machine
//!
//! `idle → editing` on upload, `editing → generating` on generate,
//! `generating → result | editing` when the pipeline settles, and
//! `reset` back to `idle` from anywhere. Views only read this state and
//! call the methods below; nothing else mutates it.

use tracing::{error, info, warn};

use crate::error::{PipelineError, PipelineFailure, ServiceError};
use crate::image::EncodedImage;
use crate::orchestrator::{run_pipeline, GenerationJob, Orchestrator};
use crate::types::{AppStep, AspectRatio, DesignStyle, DesignTransformation, ViewMode};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("cannot change the photo while a design is being generated")]
    Busy,
    #[error(transparent)]
    Invalid(#[from] ServiceError),
}

/// A generated render ready to be saved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadableImage {
    pub filename: String,
    pub image: EncodedImage,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionController {
    step: AppStep,
    original_image: Option<EncodedImage>,
    selected_style: DesignStyle,
    custom_ideas: String,
    aspect_ratio: AspectRatio,
    transformation: Option<DesignTransformation>,
    is_processing: bool,
    show_modal: bool,
    view_mode: ViewMode,
    last_failure: Option<PipelineFailure>,
}

impl SessionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> AppStep {
        self.step
    }

    pub fn original_image(&self) -> Option<&EncodedImage> {
        self.original_image.as_ref()
    }

    pub fn selected_style(&self) -> DesignStyle {
        self.selected_style
    }

    pub fn custom_ideas(&self) -> &str {
        &self.custom_ideas
    }

    pub fn aspect_ratio(&self) -> AspectRatio {
        self.aspect_ratio
    }

    pub fn transformation(&self) -> Option<&DesignTransformation> {
        self.transformation.as_ref()
    }

    pub fn is_processing(&self) -> bool {
        self.is_processing
    }

    pub fn show_modal(&self) -> bool {
        self.show_modal
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn last_failure(&self) -> Option<&PipelineFailure> {
        self.last_failure.as_ref()
    }

    /// Whether the generate action is currently allowed
    pub fn can_generate(&self) -> bool {
        self.original_image.is_some() && !self.is_processing
    }

    /// Store a freshly read photo and move to editing
    pub fn upload_image(&mut self, data_uri: impl Into<String>) -> Result<(), UploadError> {
        if self.is_processing {
            warn!("Ignoring upload while a generation is in flight");
            return Err(UploadError::Busy);
        }
        let image = EncodedImage::parse(data_uri)?;
        info!("Uploaded {} photo", image.mime_type());

        self.original_image = Some(image);
        self.transformation = None;
        self.show_modal = false;
        self.last_failure = None;
        self.step = AppStep::Editing;
        Ok(())
    }

    pub fn select_style(&mut self, style: DesignStyle) {
        self.selected_style = style;
    }

    pub fn set_custom_ideas(&mut self, ideas: impl Into<String>) {
        self.custom_ideas = ideas.into();
    }

    pub fn select_aspect_ratio(&mut self, ratio: AspectRatio) {
        self.aspect_ratio = ratio;
    }

    /// Enter `generating` and hand back the inputs for the pipeline.
    ///
    /// Returns `None` without a photo or while another run is in flight.
    pub fn begin_generation(&mut self) -> Option<GenerationJob> {
        if !self.can_generate() {
            return None;
        }
        let image = self.original_image.clone()?;

        self.is_processing = true;
        self.step = AppStep::Generating;
        self.transformation = None;
        self.show_modal = false;
        self.last_failure = None;

        Some(GenerationJob {
            image,
            style: self.selected_style,
            custom_ideas: self.custom_ideas.clone(),
            aspect_ratio: self.aspect_ratio,
        })
    }

    /// Settle a run started by [`begin_generation`](Self::begin_generation)
    pub fn finish_generation(&mut self, result: Result<DesignTransformation, PipelineError>) {
        if !self.is_processing {
            warn!("Discarding pipeline result with no generation in flight");
            return;
        }
        self.is_processing = false;

        match result {
            Ok(transformation) => {
                info!("Design ready: {} style", transformation.style);
                self.transformation = Some(transformation);
                self.step = AppStep::Result;
                self.show_modal = true;
                self.view_mode = ViewMode::After;
            }
            Err(err) => {
                error!("Design generation failed: {}", err);
                self.last_failure = Some(PipelineFailure::from(&err));
                self.step = AppStep::Editing;
            }
        }
    }

    /// Run the full pipeline against `orchestrator`. No-op when generation is not allowed.
    pub async fn generate<O: Orchestrator + ?Sized>(&mut self, orchestrator: &O) -> bool {
        let Some(job) = self.begin_generation() else {
            return false;
        };
        let result = run_pipeline(orchestrator, &job).await;
        self.finish_generation(result);
        true
    }

    /// Drop everything derived from the current photo and return to idle
    pub fn reset(&mut self) {
        self.step = AppStep::Idle;
        self.original_image = None;
        self.transformation = None;
        self.custom_ideas.clear();
        self.aspect_ratio = AspectRatio::default();
        self.show_modal = false;
        self.last_failure = None;
    }

    pub fn close_modal(&mut self) {
        self.show_modal = false;
    }

    pub fn open_modal(&mut self) {
        self.show_modal = self.transformation.is_some();
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    pub fn dismiss_failure(&mut self) {
        self.last_failure = None;
    }

    /// The rendered image with a file name such as `dreamspace-modern-design.png`
    pub fn download(&self) -> Option<DownloadableImage> {
        let transformation = self.transformation.as_ref()?;
        let image = transformation.generated_image_base64.clone()?;

        Some(DownloadableImage {
            filename: format!(
                "dreamspace-{}-design.{}",
                transformation.style.as_str().to_lowercase(),
                image.extension()
            ),
            image,
        })
    }
}

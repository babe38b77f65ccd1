//! Domain model and session logic shared by the DreamSpace backend, frontend and CLI.
//!
//! Everything here compiles for both native targets and `wasm32`.

pub mod error;
pub mod image;
pub mod orchestrator;
pub mod session;
pub mod styles;
pub mod theme;
pub mod types;

pub use error::{PipelineError, PipelineFailure, PipelineStage, ServiceError};
pub use image::EncodedImage;
pub use orchestrator::{run_pipeline, GenerationJob, Orchestrator};
pub use session::{DownloadableImage, SessionController, UploadError};
pub use styles::{StyleEntry, DESIGN_STYLES};
pub use theme::Theme;
pub use types::{AppStep, AspectRatio, DesignStyle, DesignTransformation, RoomAnalysis, ViewMode};

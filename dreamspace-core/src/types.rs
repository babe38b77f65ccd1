use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::image::EncodedImage;

/// Structured description of the uploaded room, produced by the analysis call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomAnalysis {
    pub room_type: String,
    pub detected_layout: String,
    pub constraints: String,
    pub suggestions: Vec<String>,
}

/// Design rationale for one style plus the rendered image once available
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignTransformation {
    pub style: DesignStyle,
    pub color_palette: String,
    pub furniture_recommendations: Vec<String>,
    pub lighting_plan: String,
    pub summary: String,
    /// Rendered room, serialized as its data URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_image_base64: Option<EncodedImage>,
}

impl DesignTransformation {
    pub fn with_image(mut self, image: EncodedImage) -> Self {
        self.generated_image_base64 = Some(image);
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DesignStyle {
    #[default]
    Modern,
    Minimalist,
    Rustic,
    Luxury,
    Bohemian,
    Industrial,
    Coastal,
    Scandinavian,
}

impl DesignStyle {
    pub const ALL: [DesignStyle; 8] = [
        Self::Modern,
        Self::Minimalist,
        Self::Rustic,
        Self::Luxury,
        Self::Bohemian,
        Self::Industrial,
        Self::Coastal,
        Self::Scandinavian,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Modern => "Modern",
            Self::Minimalist => "Minimalist",
            Self::Rustic => "Rustic",
            Self::Luxury => "Luxury",
            Self::Bohemian => "Bohemian",
            Self::Industrial => "Industrial",
            Self::Coastal => "Coastal",
            Self::Scandinavian => "Scandinavian",
        }
    }
}

impl fmt::Display for DesignStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DesignStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|style| style.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| format!("unknown design style: {}", s))
    }
}

/// Output aspect ratio accepted by the image model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "9:16")]
    Portrait,
    #[serde(rename = "4:3")]
    Standard,
    #[serde(rename = "3:4")]
    Tall,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 5] = [
        Self::Square,
        Self::Landscape,
        Self::Portrait,
        Self::Standard,
        Self::Tall,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::Landscape => "16:9",
            Self::Portrait => "9:16",
            Self::Standard => "4:3",
            Self::Tall => "3:4",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|ratio| ratio.as_str() == needle)
            .ok_or_else(|| format!("unsupported aspect ratio: {} (expected one of 1:1, 16:9, 9:16, 4:3, 3:4)", s))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppStep {
    #[default]
    Idle,
    Editing,
    Generating,
    Result,
}

/// Which image the result modal is showing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Before,
    #[default]
    After,
}

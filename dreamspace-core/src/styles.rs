//! Design style registry and the prompt templates sent to the generative model.

use crate::types::{DesignStyle, DesignTransformation, RoomAnalysis};
use serde::Serialize;

/// Entry shown in the style picker
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StyleEntry {
    pub id: DesignStyle,
    pub name: &'static str,
    /// 24x24 SVG path for the picker icon
    #[serde(skip)]
    pub icon_path: &'static str,
}

pub const DESIGN_STYLES: [StyleEntry; 8] = [
    StyleEntry {
        id: DesignStyle::Modern,
        name: "Modern",
        icon_path: "M4 4h16v16H4V4zm2 2v12h12V6H6zm2 2h8v8H8V8z",
    },
    StyleEntry {
        id: DesignStyle::Minimalist,
        name: "Minimalist",
        icon_path: "M4 8h16M4 12h16M4 16h16",
    },
    StyleEntry {
        id: DesignStyle::Rustic,
        name: "Rustic",
        icon_path: "M12 3L4 9v12h16V9l-8-6zm0 2.5l6 4.5V19H6v-9l6-4.5zM9 13h6v2H9v-2z",
    },
    StyleEntry {
        id: DesignStyle::Luxury,
        name: "Luxury",
        icon_path: "M12 2l3 7h7l-5.5 4.5 2 7.5-6.5-5-6.5 5 2-7.5L2 9h7l3-7z",
    },
    StyleEntry {
        id: DesignStyle::Bohemian,
        name: "Bohemian",
        icon_path: "M12 22s-8-4.5-8-11.8A8 8 0 0 1 12 2a8 8 0 0 1 8 8.2c0 7.3-8 11.8-8 11.8zM12 13a3 3 0 1 0 0-6 3 3 0 0 0 0 6z",
    },
    StyleEntry {
        id: DesignStyle::Industrial,
        name: "Industrial",
        icon_path: "M3 21h18v-2H3v2zM5 19h2v-7H5v7zm4 0h2V9H9v10zm4 0h2V5h-2v14zm4 0h2v-7h-2v7z",
    },
    StyleEntry {
        id: DesignStyle::Coastal,
        name: "Coastal",
        icon_path: "M12 3L2 12h3v8h14v-8h3L12 3zm0 4.84L18.16 11H17v7H7v-7H5.84L12 7.84z",
    },
    StyleEntry {
        id: DesignStyle::Scandinavian,
        name: "Scandinavian",
        icon_path: "M12 2L2 7l10 5 10-5-10-5zM2 17l10 5 10-5M2 12l10 5 10-5",
    },
];

pub fn style_entry(style: DesignStyle) -> &'static StyleEntry {
    DESIGN_STYLES
        .iter()
        .find(|entry| entry.id == style)
        .unwrap_or(&DESIGN_STYLES[0])
}

pub const CORE_DESIGNER_SYSTEM_PROMPT: &str = "\
You are an expert AI Interior Designer. Analyze the uploaded room image and generate a complete interior design transformation.
Identify the room type and layout. Output in strict JSON format.
{
  \"roomType\": \"string\",
  \"detectedLayout\": \"string\",
  \"constraints\": \"string\",
  \"suggestions\": [\"string\"]
}";

pub const ANALYZE_INSTRUCTION: &str = "Analyze this room and return the JSON analysis.";

pub const IMAGE_PROMPT_ENGINEER_PROMPT: &str = "\
Generate an ultra-detailed cinematic photorealistic prompt for an interior design render.
Focus on: Preserving layout, realistic lighting, textures, and materials.";

pub fn transformation_prompt_template(style: DesignStyle) -> String {
    format!(
        "Using the previous analysis of the room, generate a detailed interior redesign transformation for the style: {style}.\n\
         Provide the response in strict JSON format.\n\
         {{\n  \
           \"style\": \"{style}\",\n  \
           \"colorPalette\": \"string\",\n  \
           \"furnitureRecommendations\": [\"string\"],\n  \
           \"lightingPlan\": \"string\",\n  \
           \"summary\": \"string\"\n\
         }}"
    )
}

/// Blank notes count as no notes
pub fn user_notes(custom_ideas: Option<&str>) -> Option<&str> {
    custom_ideas.map(str::trim).filter(|notes| !notes.is_empty())
}

/// Prompt for the second call: the analysis as JSON, the style template, then any user notes
pub fn transformation_prompt(
    style: DesignStyle,
    analysis: &RoomAnalysis,
    custom_ideas: Option<&str>,
) -> Result<String, serde_json::Error> {
    let analysis_json = serde_json::to_string(analysis)?;
    let mut prompt = format!(
        "Based on this room analysis: {},\n{}.",
        analysis_json,
        transformation_prompt_template(style)
    );
    if let Some(notes) = user_notes(custom_ideas) {
        prompt.push_str(&format!("\nAdditional user requirements to incorporate: {}", notes));
    }
    Ok(prompt)
}

/// Prompt that asks the text model to write the visual prompt for the render
pub fn visual_prompt_request(
    analysis: &RoomAnalysis,
    transformation: &DesignTransformation,
    custom_ideas: Option<&str>,
) -> String {
    let mut prompt = format!(
        "Original Room: {}, Layout: {}.\n\
         Design Style: {}.\n\
         Description: {}.\n\
         Color Palette: {}.\n",
        analysis.room_type,
        analysis.detected_layout,
        transformation.style,
        transformation.summary,
        transformation.color_palette,
    );
    if let Some(notes) = user_notes(custom_ideas) {
        prompt.push_str(&format!("Specific User Ideas to Include: {}\n", notes));
    }
    prompt.push_str(IMAGE_PROMPT_ENGINEER_PROMPT);
    prompt
}

/// Instruction attached to the original photo in the image call
pub fn render_instruction(visual_prompt: &str) -> String {
    format!(
        "Redesign this exact room using the following instructions: {}.\n\
         IMPORTANT: Preserve the architectural structural integrity (windows, doors, floor lines).\n\
         Replace furniture, decor, and wall/floor finishes according to the style and specific ideas provided.",
        visual_prompt.trim()
    )
}

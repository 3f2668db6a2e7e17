//! Presentation generation: outline stage plus one image per slide

use super::Flow;
use crate::generation::ModelId;
use crate::media::ImageAsset;
use crate::pipeline::CompositeResult;
use crate::schema::{FieldShape, OutputShape};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationInput {
    pub topic: String,
}

impl PresentationInput {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
        }
    }
}

/// One slide as planned by the outline stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideOutline {
    pub title: String,
    pub points: Vec<String>,
    pub image_prompt: String,
}

/// Stage-1 plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationOutline {
    pub title: String,
    pub slides: Vec<SlideOutline>,
}

/// Final slide with an optional image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub title: String,
    pub points: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Finished presentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presentation {
    pub title: String,
    pub slides: Vec<Slide>,
}

impl Presentation {
    pub fn output_shape() -> OutputShape {
        OutputShape::object([
            FieldShape::required("title", OutputShape::string()),
            FieldShape::required(
                "slides",
                OutputShape::array(OutputShape::object([
                    FieldShape::required("title", OutputShape::string()),
                    FieldShape::required("points", OutputShape::array(OutputShape::string())),
                    FieldShape::optional("imageUrl", OutputShape::uri()),
                ])),
            ),
        ])
    }

    /// Project a composite pipeline result; absent images become `None`
    pub fn from_composite(
        result: CompositeResult<PresentationOutline, SlideOutline, ImageAsset>,
    ) -> Self {
        let slides = result
            .items
            .into_iter()
            .map(|entry| Slide {
                title: entry.item.title,
                points: entry.item.points,
                image_url: entry.auxiliary.into_option().map(|image| image.to_data_uri()),
            })
            .collect();

        Self {
            title: result.plan.title,
            slides,
        }
    }
}

/// Stage 1 of the presentation pipeline
pub struct PresentationOutlineFlow;

impl PresentationOutlineFlow {
    /// Prompt for the stage-2 image of one slide
    pub fn image_prompt(topic: &str, slide: &SlideOutline) -> String {
        format!(
            "Generate an image for a presentation slide about \"{}\". The slide is titled \"{}\". \
             The image should represent: {}. Use a vibrant and professional style.",
            topic, slide.title, slide.image_prompt
        )
    }
}

impl Flow for PresentationOutlineFlow {
    type Input = PresentationInput;
    type Output = PresentationOutline;

    const NAME: &'static str = "presentation_outline";

    fn render_prompt(input: &PresentationInput) -> String {
        format!(
            r#"Create a presentation outline for the topic: "{}".
The presentation should have a main title and 3-5 slides.
Each slide must have a title and 3-4 bullet points.
For each slide, also provide a short, descriptive prompt that can be used to generate a relevant image.
The image prompt should be simple and visually descriptive. For example: "A scientist looking at a glowing test tube" or "A world map with connected nodes"."#,
            input.topic
        )
    }

    fn output_shape() -> OutputShape {
        OutputShape::object([
            FieldShape::required("title", OutputShape::string()),
            FieldShape::required(
                "slides",
                OutputShape::array(OutputShape::object([
                    FieldShape::required("title", OutputShape::string())
                        .described("The title of the slide."),
                    FieldShape::required("points", OutputShape::array(OutputShape::string()))
                        .described("A list of bullet points for the slide."),
                    FieldShape::required("imagePrompt", OutputShape::string()).described(
                        "A descriptive prompt for generating an image for this slide.",
                    ),
                ])),
            ),
        ])
    }

    fn model() -> Option<ModelId> {
        Some(ModelId::Gemini20Flash)
    }
}

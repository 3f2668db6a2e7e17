//! Flow catalogue
//!
//! A flow couples an input type, a prompt template, an [`OutputShape`] and a
//! typed output. The application layer runs any [`Flow`] through the tool
//! resolution loop and validates the result against the flow's shape.
//!
//! | Flow | Input | Output | Tools |
//! |------|-------|--------|-------|
//! | [`CampusInfoFlow`] | query | answer | events, locations |
//! | [`ResumeAnalysisFlow`] | resume, job description | strengths, gaps, keywords, fit score | - |
//! | [`DashboardInsightsFlow`] | academic history, goals | insights, course picks | - |
//! | [`StudyRecommendationsFlow`] | schedule, style, courses, goals | study times, resources, tips | - |
//! | [`PresentationOutlineFlow`] | topic | title + slides | - |

pub mod campus;
pub mod career;
pub mod insights;
pub mod presentation;
pub mod study;

use crate::generation::ModelId;
use crate::schema::OutputShape;
use serde::de::DeserializeOwned;

pub use campus::{
    CampusEvent, CampusInfoFlow, CampusInfoInput, CampusInfoOutput, CampusLocation,
    GET_CAMPUS_EVENTS, GET_CAMPUS_LOCATIONS,
};
pub use career::{ResumeAnalysisFlow, ResumeAnalysisInput, ResumeAnalysisOutput};
pub use insights::{DashboardInsightsFlow, DashboardInsightsInput, DashboardInsightsOutput};
pub use presentation::{
    Presentation, PresentationInput, PresentationOutline, PresentationOutlineFlow, Slide,
    SlideOutline,
};
pub use study::{
    LearningTip, StudyRecommendationsFlow, StudyRecommendationsInput, StudyRecommendationsOutput,
    StudyResource, StudySession,
};

/// A schema-validated generation with a fixed prompt template
pub trait Flow {
    type Input;
    type Output: DeserializeOwned;

    /// Name used in logs
    const NAME: &'static str;

    fn render_prompt(input: &Self::Input) -> String;

    fn output_shape() -> OutputShape;

    /// Names of registered tools this flow may call
    fn tool_names() -> &'static [&'static str] {
        &[]
    }

    /// Model override; `None` uses the configured text model
    fn model() -> Option<ModelId> {
        None
    }
}

//! Study time and resource recommendations

use super::Flow;
use crate::schema::{FieldShape, OutputShape};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyRecommendationsInput {
    pub schedule: String,
    pub learning_style: String,
    pub courses: String,
    pub academic_goals: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudySession {
    pub day: String,
    pub time: String,
    pub activity: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyResource {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningTip {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyRecommendationsOutput {
    pub optimal_study_times: Vec<StudySession>,
    pub recommended_resources: Vec<StudyResource>,
    pub personalized_learning_tips: Vec<LearningTip>,
}

pub struct StudyRecommendationsFlow;

impl Flow for StudyRecommendationsFlow {
    type Input = StudyRecommendationsInput;
    type Output = StudyRecommendationsOutput;

    const NAME: &'static str = "study_recommendations";

    fn render_prompt(input: &StudyRecommendationsInput) -> String {
        format!(
            r#"You are an AI-powered study optimizer. Analyze the student's schedule, learning style, courses, and academic goals to provide personalized study recommendations.

Schedule: {}
Learning Style: {}
Courses: {}
Academic Goals: {}

Based on this information, provide:

1. Optimal Study Times: A list of specific time slots for studying, broken down by day, time, and recommended activity.
2. Recommended Resources: A list of resources tailored to the student's courses and learning style. Each resource should have a title and a type (e.g., Video, Article, Book).
3. Personalized Learning Tips: A list of personalized tips for improving learning and retention. Each tip should have a clear title and a description.

Format your response as a JSON object that matches the provided output schema. Be as detailed as possible."#,
            input.schedule, input.learning_style, input.courses, input.academic_goals
        )
    }

    fn output_shape() -> OutputShape {
        let session = OutputShape::object([
            FieldShape::required("day", OutputShape::string()),
            FieldShape::required("time", OutputShape::string())
                .described("The suggested time slot (e.g., '7:00 PM - 8:00 PM')."),
            FieldShape::required("activity", OutputShape::string()),
        ]);
        let resource = OutputShape::object([
            FieldShape::required("title", OutputShape::string()),
            FieldShape::required("type", OutputShape::string())
                .described("The type of resource (e.g., Video, Article, Book, Website)."),
            FieldShape::optional("url", OutputShape::string()),
        ]);
        let tip = OutputShape::object([
            FieldShape::required("title", OutputShape::string()),
            FieldShape::required("description", OutputShape::string()),
        ]);

        OutputShape::object([
            FieldShape::required("optimalStudyTimes", OutputShape::array(session)),
            FieldShape::required("recommendedResources", OutputShape::array(resource)),
            FieldShape::required("personalizedLearningTips", OutputShape::array(tip)),
        ])
    }
}

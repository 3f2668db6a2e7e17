//! Dashboard insights and course recommendations

use super::Flow;
use crate::schema::{FieldShape, OutputShape};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardInsightsInput {
    pub academic_history: String,
    pub student_goals: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardInsightsOutput {
    pub insights: Vec<String>,
    pub course_recommendations: Vec<String>,
}

pub struct DashboardInsightsFlow;

impl Flow for DashboardInsightsFlow {
    type Input = DashboardInsightsInput;
    type Output = DashboardInsightsOutput;

    const NAME: &'static str = "dashboard_insights";

    fn render_prompt(input: &DashboardInsightsInput) -> String {
        format!(
            r#"You are an AI assistant that provides personalized insights and course recommendations to students based on their academic history and goals.

Analyze the student's academic history and goals, and provide personalized insights and course recommendations to help them make informed decisions about their studies.

Academic History: {}
Student Goals: {}"#,
            input.academic_history, input.student_goals
        )
    }

    fn output_shape() -> OutputShape {
        OutputShape::object([
            FieldShape::required("insights", OutputShape::array(OutputShape::string())),
            FieldShape::required(
                "courseRecommendations",
                OutputShape::array(OutputShape::string()),
            ),
        ])
    }
}

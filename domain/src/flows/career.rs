//! Resume analysis against a job description

use super::Flow;
use crate::schema::{FieldShape, OutputShape};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeAnalysisInput {
    pub resume_text: String,
    pub job_description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeAnalysisOutput {
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub suggested_keywords: Vec<String>,
    /// 0 to 100
    pub overall_fit_score: f64,
}

pub struct ResumeAnalysisFlow;

impl Flow for ResumeAnalysisFlow {
    type Input = ResumeAnalysisInput;
    type Output = ResumeAnalysisOutput;

    const NAME: &'static str = "resume_analysis";

    fn render_prompt(input: &ResumeAnalysisInput) -> String {
        format!(
            r#"You are an expert career coach and resume writer. Your task is to analyze a student's resume against a specific job description and provide actionable feedback.

Analyze the provided resume and job description. Based on your analysis, provide the following:

1. **Strengths**: Identify specific parts of the resume that align well with the job description. Be specific and quote examples if possible.
2. **Areas for Improvement**: Pinpoint weaknesses or gaps in the resume. Suggest concrete changes, such as rephrasing bullet points, adding missing skills, or quantifying achievements.
3. **Suggested Keywords**: Extract crucial keywords and phrases from the job description that are missing from the resume but should be included to pass through Applicant Tracking Systems (ATS).
4. **Overall Fit Score**: Provide a numerical score from 0 to 100 that represents the resume's match for the job description.

**Resume Text:**
{}

**Job Description:**
{}

Provide your response in the requested JSON format."#,
            input.resume_text, input.job_description
        )
    }

    fn output_shape() -> OutputShape {
        OutputShape::object([
            FieldShape::required("strengths", OutputShape::array(OutputShape::string())),
            FieldShape::required("areasForImprovement", OutputShape::array(OutputShape::string())),
            FieldShape::required("suggestedKeywords", OutputShape::array(OutputShape::string())),
            FieldShape::required("overallFitScore", OutputShape::number().bounded(0.0, 100.0))
                .described("A score from 0-100 indicating how well the resume matches the job description."),
        ])
    }
}

//! Console output formatter for flow results

use colored::Colorize;
use genflow_domain::flows::campus::CampusInfoOutput;
use genflow_domain::flows::career::ResumeAnalysisOutput;
use genflow_domain::flows::insights::DashboardInsightsOutput;
use genflow_domain::flows::presentation::Presentation;
use genflow_domain::flows::study::StudyRecommendationsOutput;
use genflow_domain::Transcript;
use serde::Serialize;

/// Formats flow results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format any result as pretty JSON
    pub fn format_json<T: Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn format_answer(output: &CampusInfoOutput) -> String {
        format!("{}\n{}\n", "Answer:".cyan().bold(), output.answer)
    }

    pub fn format_resume(output: &ResumeAnalysisOutput) -> String {
        let mut out = String::new();
        out.push_str(&Self::header("Resume Analysis"));
        out.push('\n');

        let score = format!("{:.0}/100", output.overall_fit_score);
        let score = if output.overall_fit_score >= 70.0 {
            score.green()
        } else if output.overall_fit_score >= 40.0 {
            score.yellow()
        } else {
            score.red()
        };
        out.push_str(&format!("\n{} {}\n", "Overall fit:".cyan().bold(), score.bold()));

        out.push_str(&Self::bullets("Strengths", &output.strengths));
        out.push_str(&Self::bullets("Areas for Improvement", &output.areas_for_improvement));
        out.push_str(&Self::bullets("Suggested Keywords", &output.suggested_keywords));
        out.push_str(&Self::footer());
        out
    }

    pub fn format_insights(output: &DashboardInsightsOutput) -> String {
        let mut out = String::new();
        out.push_str(&Self::header("Dashboard Insights"));
        out.push('\n');
        out.push_str(&Self::bullets("Insights", &output.insights));
        out.push_str(&Self::bullets("Course Recommendations", &output.course_recommendations));
        out.push_str(&Self::footer());
        out
    }

    pub fn format_study(output: &StudyRecommendationsOutput) -> String {
        let mut out = String::new();
        out.push_str(&Self::header("Study Plan"));
        out.push('\n');

        out.push_str(&Self::section_header("Optimal Study Times"));
        for session in &output.optimal_study_times {
            out.push_str(&format!(
                "  * {} {}: {}\n",
                session.day.bold(),
                session.time,
                session.activity
            ));
        }

        out.push_str(&Self::section_header("Recommended Resources"));
        for resource in &output.recommended_resources {
            out.push_str(&format!("  * {} ({})", resource.title, resource.kind.dimmed()));
            if let Some(url) = &resource.url {
                out.push_str(&format!(" {}", url.blue().underline()));
            }
            out.push('\n');
        }

        out.push_str(&Self::section_header("Learning Tips"));
        for tip in &output.personalized_learning_tips {
            out.push_str(&format!("  * {}\n    {}\n", tip.title.bold(), tip.description));
        }

        out.push_str(&Self::footer());
        out
    }

    pub fn format_presentation(presentation: &Presentation) -> String {
        let mut out = String::new();
        out.push_str(&Self::header(&presentation.title));
        out.push('\n');

        for (i, slide) in presentation.slides.iter().enumerate() {
            out.push_str(&format!(
                "\n{}\n",
                format!("── Slide {}: {} ──", i + 1, slide.title).yellow().bold()
            ));
            for point in &slide.points {
                out.push_str(&format!("  * {}\n", point));
            }
            let image = match &slide.image_url {
                Some(url) => format!("{} image ({} bytes encoded)", "v".green(), url.len()),
                None => format!("{} no image", "x".red()),
            };
            out.push_str(&format!("  {}\n", image));
        }

        let missing = presentation
            .slides
            .iter()
            .filter(|slide| slide.image_url.is_none())
            .count();
        if missing > 0 {
            out.push_str(&format!(
                "\n{} {} of {} slides have no image\n",
                "Note:".yellow().bold(),
                missing,
                presentation.slides.len()
            ));
        }

        out.push_str(&Self::footer());
        out
    }

    pub fn format_transcript(transcript: &Transcript) -> String {
        format!("{}\n{}\n", "Transcript:".cyan().bold(), transcript.text)
    }

    fn bullets(title: &str, items: &[String]) -> String {
        let mut out = Self::section_header(title);
        if items.is_empty() {
            out.push_str(&format!("  {}\n", "(none)".dimmed()));
        }
        for item in items {
            out.push_str(&format!("  * {}\n", item));
        }
        out
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

//! Campus assistant flow and campus data types

use super::Flow;
use crate::schema::{FieldShape, OutputShape};
use serde::{Deserialize, Serialize};

pub const GET_CAMPUS_EVENTS: &str = "getCampusEvents";
pub const GET_CAMPUS_LOCATIONS: &str = "getCampusLocations";

/// An upcoming campus event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampusEvent {
    pub name: String,
    pub date: String,
    pub time: String,
    pub location: String,
}

impl CampusEvent {
    pub fn shape() -> OutputShape {
        OutputShape::object([
            FieldShape::required("name", OutputShape::string()).described("The name of the event."),
            FieldShape::required("date", OutputShape::string()).described("The date of the event."),
            FieldShape::required("time", OutputShape::string()).described("The time of the event."),
            FieldShape::required("location", OutputShape::string())
                .described("The location of the event."),
        ])
    }
}

/// A campus location with its live status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampusLocation {
    pub name: String,
    pub category: String,
    pub status: String,
    pub details: String,
    /// How busy the location is
    pub capacity: String,
    /// Icon key for the UI
    pub icon: String,
    pub color: String,
    pub bg_color: String,
}

impl CampusLocation {
    pub fn shape() -> OutputShape {
        OutputShape::object([
            FieldShape::required("name", OutputShape::string()),
            FieldShape::required("category", OutputShape::string())
                .described("The category of the location (e.g., Academic, Dining)."),
            FieldShape::required("status", OutputShape::string())
                .described("The current status (e.g., Open, Closed)."),
            FieldShape::required("details", OutputShape::string()),
            FieldShape::required("capacity", OutputShape::string())
                .described("How busy the location is."),
            FieldShape::required("icon", OutputShape::string()),
            FieldShape::required("color", OutputShape::string()),
            FieldShape::required("bgColor", OutputShape::string()),
        ])
    }

    /// Case-insensitive substring match on the name; `None` keeps everything
    pub fn filter<'a>(
        locations: &'a [CampusLocation],
        name: Option<&str>,
    ) -> Vec<&'a CampusLocation> {
        match name.map(str::to_lowercase).filter(|n| !n.is_empty()) {
            Some(needle) => locations
                .iter()
                .filter(|loc| loc.name.to_lowercase().contains(&needle))
                .collect(),
            None => locations.iter().collect(),
        }
    }
}

/// Input and output shapes of the two campus tools
pub mod tool_shapes {
    use super::*;

    pub fn events_input() -> OutputShape {
        OutputShape::empty_object()
    }

    pub fn events_output() -> OutputShape {
        OutputShape::array(CampusEvent::shape())
    }

    pub fn locations_input() -> OutputShape {
        OutputShape::object([FieldShape::optional("locationName", OutputShape::string())
            .described("The name of the location to find. If omitted, return all locations.")])
    }

    pub fn locations_output() -> OutputShape {
        OutputShape::array(CampusLocation::shape())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampusInfoInput {
    pub query: String,
}

impl CampusInfoInput {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampusInfoOutput {
    pub answer: String,
}

/// Campus question answering backed by the event and location tools
pub struct CampusInfoFlow;

impl CampusInfoFlow {
    /// Prompt used for the free-text streaming variant
    pub fn stream_prompt(input: &CampusInfoInput) -> String {
        format!(
            r#"You are a helpful AI assistant for a university campus.
Answer the following question about the campus:
{}

If you can't answer, say so."#,
            input.query
        )
    }
}

impl Flow for CampusInfoFlow {
    type Input = CampusInfoInput;
    type Output = CampusInfoOutput;

    const NAME: &'static str = "campus_info";

    fn render_prompt(input: &CampusInfoInput) -> String {
        format!(
            r#"You are a helpful AI assistant for a university campus.
Answer the following question about the campus:
{}

If the user asks about events, use the {} tool to provide accurate, real-time information.
If the user asks about a location, use the {} tool to provide details.
Do not make up information. If the tools return no information, say that you cannot find the information."#,
            input.query, GET_CAMPUS_EVENTS, GET_CAMPUS_LOCATIONS
        )
    }

    fn output_shape() -> OutputShape {
        OutputShape::object([FieldShape::required("answer", OutputShape::string())
            .described("The answer to the user query about campus information.")])
    }

    fn tool_names() -> &'static [&'static str] {
        &[GET_CAMPUS_EVENTS, GET_CAMPUS_LOCATIONS]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::validate_as;
    use serde_json::json;

    fn location(name: &str) -> CampusLocation {
        CampusLocation {
            name: name.to_string(),
            category: "Academic".to_string(),
            status: "Open".to_string(),
            details: String::new(),
            capacity: "Low".to_string(),
            icon: "University".to_string(),
            color: "text-blue-500".to_string(),
            bg_color: "bg-blue-100".to_string(),
        }
    }

    #[test]
    fn test_location_filter() {
        let all = vec![location("University Library (BU)"), location("Digital Hub")];
        assert_eq!(CampusLocation::filter(&all, None).len(), 2);
        assert_eq!(CampusLocation::filter(&all, Some("")).len(), 2);

        let found = CampusLocation::filter(&all, Some("library"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "University Library (BU)");

        assert!(CampusLocation::filter(&all, Some("Pool")).is_empty());
    }

    #[test]
    fn test_location_serializes_camel_case() {
        let value = serde_json::to_value(location("Gymnasium")).unwrap();
        assert_eq!(value["bgColor"], "bg-blue-100");
        let parsed: Vec<CampusLocation> =
            validate_as(&json!([value]), &tool_shapes::locations_output()).unwrap();
        assert_eq!(parsed[0].name, "Gymnasium");
    }

    #[test]
    fn test_prompt_mentions_query_and_tools() {
        let prompt = CampusInfoFlow::render_prompt(&CampusInfoInput::new("What events are today?"));
        assert!(prompt.contains("What events are today?"));
        assert!(prompt.contains(GET_CAMPUS_EVENTS));
        assert!(prompt.contains(GET_CAMPUS_LOCATIONS));
        assert_eq!(CampusInfoFlow::tool_names().len(), 2);

        let stream = CampusInfoFlow::stream_prompt(&CampusInfoInput::new("Where is RU?"));
        assert!(stream.contains("Where is RU?"));
    }

    #[test]
    fn test_output_shape() {
        let output: CampusInfoOutput =
            validate_as(&json!({"answer": "The Career Fair."}), &CampusInfoFlow::output_shape())
                .unwrap();
        assert_eq!(output.answer, "The Career Fair.");
        assert!(validate_as::<CampusInfoOutput>(&json!({}), &CampusInfoFlow::output_shape()).is_err());
    }
}

//! Campus data tools: getCampusEvents, getCampusLocations
//!
//! Both tools read from a [`CampusDirectory`]. The built-in directory holds
//! a fixed snapshot of events and locations.

use async_trait::async_trait;
use genflow_domain::flows::campus::{
    CampusEvent, CampusLocation, GET_CAMPUS_EVENTS, GET_CAMPUS_LOCATIONS, tool_shapes,
};
use genflow_domain::tool::{ToolDefinition, ToolError, ToolHandler};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Source of campus events and locations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampusDirectory {
    events: Vec<CampusEvent>,
    locations: Vec<CampusLocation>,
}

impl CampusDirectory {
    pub fn new(events: Vec<CampusEvent>, locations: Vec<CampusLocation>) -> Self {
        Self { events, locations }
    }

    /// Snapshot used by the CLI
    pub fn builtin() -> Self {
        Self::new(builtin_events(), builtin_locations())
    }

    /// Upcoming events in date order
    pub fn events(&self) -> &[CampusEvent] {
        &self.events
    }

    /// Locations whose name contains `name` (case-insensitive); all when `None`
    pub fn find_locations(&self, name: Option<&str>) -> Vec<&CampusLocation> {
        CampusLocation::filter(&self.locations, name)
    }
}

impl Default for CampusDirectory {
    fn default() -> Self {
        Self::builtin()
    }
}

fn to_output<T: Serialize>(value: T) -> Result<Value, ToolError> {
    serde_json::to_value(value).map_err(|e| ToolError::execution_failed(e.to_string()))
}

struct EventsHandler {
    directory: Arc<CampusDirectory>,
}

#[async_trait]
impl ToolHandler for EventsHandler {
    async fn call(&self, _input: Value) -> Result<Value, ToolError> {
        debug!(count = self.directory.events().len(), "Listing campus events");
        to_output(self.directory.events())
    }
}

struct LocationsHandler {
    directory: Arc<CampusDirectory>,
}

#[async_trait]
impl ToolHandler for LocationsHandler {
    async fn call(&self, input: Value) -> Result<Value, ToolError> {
        let name = input.get("locationName").and_then(Value::as_str);
        let found = self.directory.find_locations(name);
        debug!(filter = ?name, count = found.len(), "Finding campus locations");
        to_output(found)
    }
}

/// Get the tool definition for getCampusEvents
pub fn campus_events_definition(directory: Arc<CampusDirectory>) -> ToolDefinition {
    ToolDefinition::new(
        GET_CAMPUS_EVENTS,
        "Get a list of upcoming events on campus.",
        tool_shapes::events_input(),
        tool_shapes::events_output(),
        EventsHandler { directory },
    )
}

/// Get the tool definition for getCampusLocations
pub fn campus_locations_definition(directory: Arc<CampusDirectory>) -> ToolDefinition {
    ToolDefinition::new(
        GET_CAMPUS_LOCATIONS,
        "Get information about locations on campus, such as the library, restaurant, or specific buildings.",
        tool_shapes::locations_input(),
        tool_shapes::locations_output(),
        LocationsHandler { directory },
    )
}

fn event(name: &str, date: &str, time: &str, location: &str) -> CampusEvent {
    CampusEvent {
        name: name.to_string(),
        date: date.to_string(),
        time: time.to_string(),
        location: location.to_string(),
    }
}

fn builtin_events() -> Vec<CampusEvent> {
    vec![
        event("First Session Exams", "2024-07-15", "9:00 AM", "Central Amphitheatres"),
        event("Course Registration Deadline", "2024-07-22", "11:59 PM", "Online"),
        event("Independence Day Celebration", "2024-08-17", "6:00 PM", "Rectorate Esplanade"),
        event("Career Fair", "2024-09-05", "10:00 AM", "Campus Gymnasium"),
        event("ac Hackathon Kick-off", "2024-09-20", "5:00 PM", "Digital Hub"),
    ]
}

fn builtin_locations() -> Vec<CampusLocation> {
    // name, category, status, details, capacity, icon, color
    let rows = [
        ("University Library (BU)", "Academic", "Open", "Closes at 8 PM", "45% full", "University", "blue"),
        ("University Restaurant (RU)", "Dining", "Serving Lunch", "Daily special, Grills", "70% full", "Utensils", "orange"),
        ("Digital Hub", "Academic", "Open", "Free Wi-Fi & workstations", "60% full", "Wifi", "purple"),
        ("Rectorate", "Administration", "Open", "Administrative services", "Busy", "Building", "green"),
        ("Gymnasium", "Recreation", "Open", "Closes at 9 PM", "Low", "Dumbbell", "red"),
        ("Amphitheater A", "Academic", "Closed", "Opens at 8 AM tomorrow", "N/A", "Lightbulb", "gray"),
    ];

    rows.into_iter()
        .map(|(name, category, status, details, capacity, icon, color)| CampusLocation {
            name: name.to_string(),
            category: category.to_string(),
            status: status.to_string(),
            details: details.to_string(),
            capacity: capacity.to_string(),
            icon: icon.to_string(),
            color: format!("text-{color}-500"),
            bg_color: format!("bg-{color}-100"),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use genflow_domain::{ToolCall, validate};
    use serde_json::json;

    #[test]
    fn test_builtin_snapshot() {
        let directory = CampusDirectory::builtin();
        assert_eq!(directory.events().len(), 5);
        assert_eq!(directory.events()[3].name, "Career Fair");
        assert_eq!(directory.find_locations(None).len(), 6);

        let rectorate = directory.find_locations(Some("rectorate"));
        assert_eq!(rectorate.len(), 1);
        assert_eq!(rectorate[0].capacity, "Busy");
        assert_eq!(rectorate[0].bg_color, "bg-green-100");
    }

    #[tokio::test]
    async fn test_events_tool_output_matches_shape() {
        let definition = campus_events_definition(Arc::new(CampusDirectory::builtin()));
        let output = definition.handler().call(json!({})).await.unwrap();

        assert!(validate(&output, &definition.output_shape).is_ok());
        assert_eq!(output[0]["name"], "First Session Exams");
        assert_eq!(output[0]["location"], "Central Amphitheatres");
    }

    #[tokio::test]
    async fn test_locations_tool_filters_by_name() {
        let definition = campus_locations_definition(Arc::new(CampusDirectory::builtin()));

        let output = definition
            .handler()
            .call(json!({"locationName": "UNIVERSITY"}))
            .await
            .unwrap();
        let names: Vec<_> = output
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["University Library (BU)", "University Restaurant (RU)"]);
        assert!(validate(&output, &definition.output_shape).is_ok());

        let all = definition.handler().call(json!({})).await.unwrap();
        assert_eq!(all.as_array().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_unknown_location_is_empty_list() {
        let definition = campus_locations_definition(Arc::new(CampusDirectory::builtin()));
        let call = ToolCall::new(GET_CAMPUS_LOCATIONS).with_arg("locationName", "Swimming Pool");
        let output = definition.handler().call(call.input).await.unwrap();
        assert_eq!(output, json!([]));
    }

    #[test]
    fn test_location_input_rejects_wrong_type() {
        let definition = campus_locations_definition(Arc::new(CampusDirectory::builtin()));
        assert!(validate(&json!({"locationName": 42}), &definition.input_shape).is_err());
        assert!(validate(&json!({}), &definition.input_shape).is_ok());
    }
}

//! Tool implementations
//!
//! Tools registered here are the ones the campus assistant flow may call.

pub mod campus;

pub use campus::{CampusDirectory, campus_events_definition, campus_locations_definition};

use genflow_application::ToolRegistry;
use std::sync::Arc;

/// Register the campus tools against `directory`
pub fn register_campus_tools(registry: &mut ToolRegistry, directory: Arc<CampusDirectory>) {
    registry.register(campus_events_definition(Arc::clone(&directory)));
    registry.register(campus_locations_definition(directory));
}

/// Registry holding only the campus tools, backed by the built-in directory
pub fn campus_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    register_campus_tools(&mut registry, Arc::new(CampusDirectory::builtin()));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use genflow_domain::flows::campus::{GET_CAMPUS_EVENTS, GET_CAMPUS_LOCATIONS};

    #[test]
    fn test_campus_registry() {
        let registry = campus_registry();
        assert_eq!(registry.len(), 2);
        assert!(registry.has_tool(GET_CAMPUS_EVENTS));
        assert!(registry.has_tool(GET_CAMPUS_LOCATIONS));
    }
}

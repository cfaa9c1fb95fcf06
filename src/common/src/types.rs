use std::fmt;

use serde::Deserialize;
use serde::Serialize;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Hash, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    String,
    Number,
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PropertyType::String => write!(f, "string"),
            PropertyType::Number => write!(f, "number"),
        }
    }
}

/// One typed field on an event.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct EventProperty {
    pub property: String,
    #[serde(rename = "type")]
    pub typ: PropertyType,
}

impl EventProperty {
    pub fn new(property: impl Into<String>, typ: PropertyType) -> Self {
        Self {
            property: property.into(),
            typ,
        }
    }
}

/// Catalog entry. `typ` is unique within a catalog.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct EventDefinition {
    #[serde(rename = "type")]
    pub typ: String,
    #[serde(default)]
    pub properties: Vec<EventProperty>,
}

impl EventDefinition {
    pub fn new(typ: impl Into<String>, properties: Vec<EventProperty>) -> Self {
        Self {
            typ: typ.into(),
            properties,
        }
    }

    pub fn property(&self, name: &str) -> Option<&EventProperty> {
        self.properties.iter().find(|p| p.property == name)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct EventsResponse {
    pub events: Vec<EventDefinition>,
}

#[cfg(test)]
mod tests {
    use crate::types::EventDefinition;
    use crate::types::EventsResponse;
    use crate::types::PropertyType;

    #[test]
    fn test_events_response() -> Result<(), serde_json::Error> {
        let resp: EventsResponse = serde_json::from_str(
            r#"{"events":[{"type":"SignUp","properties":[{"property":"email","type":"string"},{"property":"age","type":"number"}]}]}"#,
        )?;

        assert_eq!(resp.events.len(), 1);
        let ev = &resp.events[0];
        assert_eq!(ev.typ, "SignUp");
        assert_eq!(ev.property("age").map(|p| p.typ), Some(PropertyType::Number));
        assert_eq!(ev.property("email").map(|p| p.typ), Some(PropertyType::String));
        assert!(ev.property("missing").is_none());

        Ok(())
    }

    #[test]
    fn test_event_without_properties() -> Result<(), serde_json::Error> {
        let ev: EventDefinition = serde_json::from_str(r#"{"type":"Logout"}"#)?;
        assert!(ev.properties.is_empty());

        assert!(serde_json::from_str::<EventDefinition>(
            r#"{"type":"X","properties":[{"property":"p","type":"bool"}]}"#
        )
        .is_err());

        Ok(())
    }
}

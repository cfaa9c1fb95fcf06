use serde::Deserialize;
use serde::Serialize;

use crate::input::RangePart;
use crate::operators::AttributeOperator;
use crate::types::AttributeValue;

/// A single user action on the filter, in serializable form.
///
/// ```json
/// [
///   {"command": "selectEvent", "stepId": 1, "eventType": "SignUp"},
///   {"command": "addAttribute", "stepId": 1},
///   {"command": "changeProperty", "stepId": 1, "attributeId": 1, "property": "age"},
///   {"command": "changeOperator", "stepId": 1, "attributeId": 1, "operator": "between"},
///   {"command": "enterValue", "stepId": 1, "attributeId": 1, "raw": "18", "part": "from"}
/// ]
/// ```
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum FilterCommand {
    AddStep,
    #[serde(rename_all = "camelCase")]
    DuplicateStep { step_id: u64 },
    #[serde(rename_all = "camelCase")]
    RemoveStep { step_id: u64 },
    #[serde(rename_all = "camelCase")]
    SelectEvent {
        step_id: u64,
        #[serde(default)]
        event_type: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    AddAttribute { step_id: u64 },
    #[serde(rename_all = "camelCase")]
    RemoveAttribute { step_id: u64, attribute_id: u64 },
    #[serde(rename_all = "camelCase")]
    ChangeProperty {
        step_id: u64,
        attribute_id: u64,
        #[serde(default)]
        property: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    ChangeOperator {
        step_id: u64,
        attribute_id: u64,
        #[serde(default)]
        operator: Option<AttributeOperator>,
    },
    #[serde(rename_all = "camelCase")]
    ChangeValue {
        step_id: u64,
        attribute_id: u64,
        #[serde(default)]
        value: AttributeValue,
    },
    /// Raw text from a value input, sanitized against the attribute's operator.
    #[serde(rename_all = "camelCase")]
    EnterValue {
        step_id: u64,
        attribute_id: u64,
        raw: String,
        #[serde(default)]
        part: Option<RangePart>,
    },
    Discard,
}

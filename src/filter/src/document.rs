use common::types::PropertyType;
use serde::Deserialize;
use serde::Serialize;

use crate::operators::AttributeOperator;
use crate::operators::ValueRequirement;
use crate::types::AttributeFilter;
use crate::types::AttributeValue;
use crate::types::FilterStep;
use crate::types::RangeValue;

/// Normalized query handed to a [`crate::FilterConsumer`].
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FilterDocument {
    pub steps: Vec<StepDocument>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StepDocument {
    pub id: u64,
    pub event: Option<String>,
    pub attributes: Vec<AttributeDocument>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AttributeDocument {
    pub property: String,
    #[serde(rename = "type")]
    pub typ: Option<PropertyType>,
    pub operator: AttributeOperator,
    #[serde(default, skip_serializing_if = "AttributeValue::is_empty")]
    pub value: AttributeValue,
}

impl FilterDocument {
    pub fn from_steps(steps: &[FilterStep]) -> Self {
        FilterDocument {
            steps: steps.iter().map(StepDocument::from_step).collect(),
        }
    }

    pub fn attributes_count(&self) -> usize {
        self.steps.iter().map(|s| s.attributes.len()).sum()
    }
}

impl StepDocument {
    fn from_step(step: &FilterStep) -> Self {
        StepDocument {
            id: step.id,
            event: step.event_type.clone().filter(|e| !e.is_empty()),
            attributes: step
                .attributes
                .iter()
                .filter_map(AttributeDocument::from_attribute)
                .collect(),
        }
    }
}

impl AttributeDocument {
    // incomplete attributes (no or empty property, no operator) are left out
    fn from_attribute(attr: &AttributeFilter) -> Option<Self> {
        let property = attr.property.clone().filter(|p| !p.is_empty())?;
        let operator = attr.operator?;

        Some(AttributeDocument {
            property,
            typ: attr.property_type,
            operator,
            value: normalize_value(attr),
        })
    }
}

/// Value as it must appear in the document for the attribute's current operator.
pub fn normalize_value(attr: &AttributeFilter) -> AttributeValue {
    let Some(option) = attr.option() else {
        return AttributeValue::Empty;
    };

    match option.value_requirement {
        ValueRequirement::None => AttributeValue::Empty,
        ValueRequirement::Range => match &attr.value {
            AttributeValue::Range(range) => {
                AttributeValue::Range(RangeValue::new(range.from, range.to))
            }
            _ => AttributeValue::Range(RangeValue::default()),
        },
        ValueRequirement::Single => attr.value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use common::types::PropertyType;
    use serde_json::json;

    use super::*;

    fn attr(
        id: u64,
        property: Option<&str>,
        typ: Option<PropertyType>,
        operator: Option<AttributeOperator>,
        value: AttributeValue,
    ) -> AttributeFilter {
        AttributeFilter {
            id,
            property: property.map(|p| p.to_string()),
            property_type: typ,
            operator,
            value,
        }
    }

    #[test]
    fn test_normalize_value() {
        // none requirement drops a stale value
        let a = attr(
            1,
            Some("email"),
            Some(PropertyType::String),
            Some(AttributeOperator::IsEmpty),
            "leftover".into(),
        );
        assert_eq!(normalize_value(&a), AttributeValue::Empty);

        // range requirement with a scalar stored
        let a = attr(
            2,
            Some("age"),
            Some(PropertyType::Number),
            Some(AttributeOperator::Between),
            AttributeValue::Number(3.0),
        );
        assert_eq!(normalize_value(&a), AttributeValue::Range(RangeValue::default()));

        let a = attr(
            3,
            Some("age"),
            Some(PropertyType::Number),
            Some(AttributeOperator::Between),
            RangeValue::new(None, Some(10.0)).into(),
        );
        assert_eq!(
            normalize_value(&a),
            AttributeValue::Range(RangeValue::new(None, Some(10.0)))
        );

        // operator not in the table of the property type
        let a = attr(
            4,
            Some("email"),
            Some(PropertyType::String),
            Some(AttributeOperator::GreaterThan),
            AttributeValue::Number(3.0),
        );
        assert_eq!(normalize_value(&a), AttributeValue::Empty);

        let a = attr(
            5,
            Some("email"),
            None,
            Some(AttributeOperator::Contains),
            "@gmail".into(),
        );
        assert_eq!(normalize_value(&a), AttributeValue::String("@gmail".to_string()));
    }

    #[test]
    fn test_document_shape() -> Result<(), serde_json::Error> {
        let steps = vec![
            FilterStep {
                id: 1,
                event_type: Some("SignUp".to_string()),
                attributes: vec![
                    attr(
                        1,
                        Some("age"),
                        Some(PropertyType::Number),
                        Some(AttributeOperator::Between),
                        RangeValue::new(Some(5.0), Some(10.0)).into(),
                    ),
                    attr(2, Some("email"), Some(PropertyType::String), None, AttributeValue::Empty),
                    attr(3, None, None, None, AttributeValue::Empty),
                    attr(
                        4,
                        Some("email"),
                        Some(PropertyType::String),
                        Some(AttributeOperator::IsNotEmpty),
                        AttributeValue::Empty,
                    ),
                    attr(5, Some(""), None, Some(AttributeOperator::IsEmpty), AttributeValue::Empty),
                ],
            },
            FilterStep::new(2),
        ];

        let doc = FilterDocument::from_steps(&steps);
        assert_eq!(doc.attributes_count(), 2);
        assert_eq!(
            serde_json::to_value(&doc)?,
            json!({
                "steps": [
                    {
                        "id": 1,
                        "event": "SignUp",
                        "attributes": [
                            {"property": "age", "type": "number", "operator": "between", "value": {"from": 5, "to": 10}},
                            {"property": "email", "type": "string", "operator": "isNotEmpty"}
                        ]
                    },
                    {"id": 2, "event": null, "attributes": []}
                ]
            })
        );

        Ok(())
    }
}

use common::types::PropertyType;
use serde::Deserialize;
use serde::Serialize;
use serde::Serializer;

use crate::operators::find_option;
use crate::operators::AttributeOperator;
use crate::operators::OperatorOption;

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct RangeValue {
    #[serde(default, serialize_with = "serialize_optional_number")]
    pub from: Option<f64>,
    #[serde(default, serialize_with = "serialize_optional_number")]
    pub to: Option<f64>,
}

impl RangeValue {
    pub fn new(from: Option<f64>, to: Option<f64>) -> Self {
        Self { from, to }
    }
}

/// Value of an attribute predicate. Serialized untagged: `null`, a string, a number
/// or a `{"from": .., "to": ..}` object.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(untagged)]
pub enum AttributeValue {
    #[default]
    Empty,
    String(String),
    Number(#[serde(serialize_with = "serialize_number")] f64),
    Range(RangeValue),
}

const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

// whole numbers are written without a fraction: `18`, not `18.0`
fn serialize_number<S: Serializer>(v: &f64, s: S) -> Result<S::Ok, S::Error> {
    if v.fract() == 0.0 && v.abs() <= MAX_SAFE_INTEGER {
        s.serialize_i64(*v as i64)
    } else {
        s.serialize_f64(*v)
    }
}

fn serialize_optional_number<S: Serializer>(v: &Option<f64>, s: S) -> Result<S::Ok, S::Error> {
    match v {
        Some(v) => serialize_number(v, s),
        None => s.serialize_none(),
    }
}

impl AttributeValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, AttributeValue::Empty)
    }

    pub fn range(&self) -> Option<&RangeValue> {
        match self {
            AttributeValue::Range(range) => Some(range),
            _ => None,
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        AttributeValue::String(v.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(v: String) -> Self {
        AttributeValue::String(v)
    }
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        AttributeValue::Number(v)
    }
}

impl From<RangeValue> for AttributeValue {
    fn from(v: RangeValue) -> Self {
        AttributeValue::Range(v)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttributeFilter {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_type: Option<PropertyType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<AttributeOperator>,
    #[serde(default, skip_serializing_if = "AttributeValue::is_empty")]
    pub value: AttributeValue,
}

impl AttributeFilter {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            property: None,
            property_type: None,
            operator: None,
            value: AttributeValue::Empty,
        }
    }

    /// Copy under a new id. Values are owned, so a copied range never aliases the source.
    pub fn duplicate(&self, id: u64) -> Self {
        Self {
            id,
            property: self.property.clone(),
            property_type: self.property_type,
            operator: self.operator,
            value: self.value.clone(),
        }
    }

    pub fn option(&self) -> Option<&'static OperatorOption> {
        find_option(self.property_type, self.operator)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FilterStep {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(default)]
    pub attributes: Vec<AttributeFilter>,
}

impl FilterStep {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            event_type: None,
            attributes: vec![],
        }
    }

    /// No event and no attributes. An empty event type counts as no event.
    pub fn is_empty(&self) -> bool {
        self.event_type.as_deref().map_or(true, str::is_empty) && self.attributes.is_empty()
    }

    pub fn attribute(&self, id: u64) -> Option<&AttributeFilter> {
        self.attributes.iter().find(|a| a.id == id)
    }

    pub fn attribute_mut(&mut self, id: u64) -> Option<&mut AttributeFilter> {
        self.attributes.iter_mut().find(|a| a.id == id)
    }
}

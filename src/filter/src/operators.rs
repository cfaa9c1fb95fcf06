use std::fmt;

use common::types::PropertyType;
use serde::Deserialize;
use serde::Serialize;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Hash, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum AttributeOperator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    IsEmpty,
    IsNotEmpty,
    GreaterThan,
    LessThan,
    Between,
}

impl fmt::Display for AttributeOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            AttributeOperator::Equals => "equals",
            AttributeOperator::NotEquals => "notEquals",
            AttributeOperator::Contains => "contains",
            AttributeOperator::NotContains => "notContains",
            AttributeOperator::StartsWith => "startsWith",
            AttributeOperator::EndsWith => "endsWith",
            AttributeOperator::IsEmpty => "isEmpty",
            AttributeOperator::IsNotEmpty => "isNotEmpty",
            AttributeOperator::GreaterThan => "greaterThan",
            AttributeOperator::LessThan => "lessThan",
            AttributeOperator::Between => "between",
        };
        write!(f, "{name}")
    }
}

/// Shape of the value an operator expects.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ValueRequirement {
    None,
    Single,
    Range,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    Text,
    Number,
}

#[derive(Serialize, Clone, Copy, Debug, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OperatorOption {
    pub value: AttributeOperator,
    pub label: &'static str,
    pub value_requirement: ValueRequirement,
    pub input_type: InputType,
}

const fn option(
    value: AttributeOperator,
    label: &'static str,
    value_requirement: ValueRequirement,
    input_type: InputType,
) -> OperatorOption {
    OperatorOption {
        value,
        label,
        value_requirement,
        input_type,
    }
}

pub static STRING_OPERATORS: [OperatorOption; 8] = [
    option(AttributeOperator::Equals, "Equals", ValueRequirement::Single, InputType::Text),
    option(AttributeOperator::NotEquals, "Not equals", ValueRequirement::Single, InputType::Text),
    option(AttributeOperator::Contains, "Contains", ValueRequirement::Single, InputType::Text),
    option(
        AttributeOperator::NotContains,
        "Does not contain",
        ValueRequirement::Single,
        InputType::Text,
    ),
    option(AttributeOperator::StartsWith, "Starts with", ValueRequirement::Single, InputType::Text),
    option(AttributeOperator::EndsWith, "Ends with", ValueRequirement::Single, InputType::Text),
    option(AttributeOperator::IsEmpty, "Is empty", ValueRequirement::None, InputType::Text),
    option(AttributeOperator::IsNotEmpty, "Is not empty", ValueRequirement::None, InputType::Text),
];

pub static NUMBER_OPERATORS: [OperatorOption; 4] = [
    option(AttributeOperator::Equals, "Equals", ValueRequirement::Single, InputType::Number),
    option(
        AttributeOperator::GreaterThan,
        "Greater than",
        ValueRequirement::Single,
        InputType::Number,
    ),
    option(AttributeOperator::LessThan, "Less than", ValueRequirement::Single, InputType::Number),
    option(AttributeOperator::Between, "Between", ValueRequirement::Range, InputType::Number),
];

/// Operator table for a property type. Untyped attributes use the string table.
pub fn operator_options(typ: Option<PropertyType>) -> &'static [OperatorOption] {
    match typ {
        Some(PropertyType::Number) => &NUMBER_OPERATORS,
        Some(PropertyType::String) | None => &STRING_OPERATORS,
    }
}

pub fn find_option(
    typ: Option<PropertyType>,
    operator: Option<AttributeOperator>,
) -> Option<&'static OperatorOption> {
    let operator = operator?;
    operator_options(typ).iter().find(|opt| opt.value == operator)
}

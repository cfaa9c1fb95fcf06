//! Turns raw text typed into value inputs into [`AttributeValue`]s.
//!
//! The state model stores whatever value it is given. Callers that collect
//! free-form text run it through these functions first.

use serde::Deserialize;
use serde::Serialize;

use crate::operators::InputType;
use crate::types::AttributeValue;
use crate::types::RangeValue;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum RangePart {
    From,
    To,
}

/// Empty text gives `Empty`. Number inputs that don't parse to a finite number give `Empty`.
pub fn sanitize_single(raw: &str, input_type: InputType) -> AttributeValue {
    let raw = raw.trim();
    if raw.is_empty() {
        return AttributeValue::Empty;
    }

    match input_type {
        InputType::Number => match parse_number(raw) {
            Some(v) => AttributeValue::Number(v),
            None => AttributeValue::Empty,
        },
        InputType::Text => AttributeValue::String(raw.to_string()),
    }
}

/// Replaces one endpoint of `current`. Empty or non-numeric text clears the endpoint.
pub fn sanitize_range(current: &AttributeValue, part: RangePart, raw: &str) -> AttributeValue {
    let mut range = match current {
        AttributeValue::Range(range) => range.clone(),
        _ => RangeValue::default(),
    };

    let v = parse_number(raw.trim());
    match part {
        RangePart::From => range.from = v,
        RangePart::To => range.to = v,
    }

    AttributeValue::Range(range)
}

fn parse_number(raw: &str) -> Option<f64> {
    if raw.is_empty() {
        return None;
    }

    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_single_number() {
        assert_eq!(sanitize_single("", InputType::Number), AttributeValue::Empty);
        assert_eq!(sanitize_single("   ", InputType::Number), AttributeValue::Empty);
        assert_eq!(sanitize_single("abc", InputType::Number), AttributeValue::Empty);
        assert_eq!(sanitize_single("inf", InputType::Number), AttributeValue::Empty);
        assert_eq!(sanitize_single("NaN", InputType::Number), AttributeValue::Empty);
        assert_eq!(sanitize_single("42", InputType::Number), AttributeValue::Number(42.0));
        assert_eq!(sanitize_single(" -1.5 ", InputType::Number), AttributeValue::Number(-1.5));
        assert_eq!(sanitize_single("1e3", InputType::Number), AttributeValue::Number(1000.0));
    }

    #[test]
    fn test_sanitize_single_text() {
        assert_eq!(sanitize_single("", InputType::Text), AttributeValue::Empty);
        assert_eq!(sanitize_single(" \t", InputType::Text), AttributeValue::Empty);
        assert_eq!(
            sanitize_single("  john@doe.com ", InputType::Text),
            AttributeValue::String("john@doe.com".to_string())
        );
        // numeric-looking text stays text
        assert_eq!(
            sanitize_single("42", InputType::Text),
            AttributeValue::String("42".to_string())
        );
    }

    #[test]
    fn test_sanitize_range() {
        let v = sanitize_range(&AttributeValue::Empty, RangePart::From, "5");
        assert_eq!(v, AttributeValue::Range(RangeValue::new(Some(5.0), None)));

        let v = sanitize_range(&v, RangePart::To, "10");
        assert_eq!(v, AttributeValue::Range(RangeValue::new(Some(5.0), Some(10.0))));

        let v = sanitize_range(&v, RangePart::From, "");
        assert_eq!(v, AttributeValue::Range(RangeValue::new(None, Some(10.0))));

        let v = sanitize_range(&v, RangePart::To, "ten");
        assert_eq!(v, AttributeValue::Range(RangeValue::default()));

        // a scalar left over from a previous operator is not kept
        let v = sanitize_range(&AttributeValue::Number(3.0), RangePart::To, "4");
        assert_eq!(v, AttributeValue::Range(RangeValue::new(None, Some(4.0))));
    }
}

//! Attribute value formatting.
//!
//! The two descriptor formats disagree on boolean literals: the main
//! descriptor uses lowercase `true`/`false` tokens while the model
//! descriptor uses Fortran logicals `.true.`/`.false.`. Formatting is total
//! over the closed attribute value set.

use crate::model::AttributeValue;

/// Boolean literal convention of the descriptor being rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolStyle {
    /// `true` / `false`
    Lowercase,
    /// `.true.` / `.false.`
    FortranLogical,
}

/// Render a boolean in the given convention
pub fn format_bool(value: bool, style: BoolStyle) -> &'static str {
    match (style, value) {
        (BoolStyle::Lowercase, true) => "true",
        (BoolStyle::Lowercase, false) => "false",
        (BoolStyle::FortranLogical, true) => ".true.",
        (BoolStyle::FortranLogical, false) => ".false.",
    }
}

/// Render a float with a minimal representation that always carries a
/// fractional part
pub fn format_float(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// Render an attribute value for the given target format
///
/// Integers are undecorated; strings are quoted only when they contain
/// whitespace.
pub fn format_value(value: &AttributeValue, style: BoolStyle) -> String {
    match value {
        AttributeValue::Bool(value) => format_bool(*value, style).to_string(),
        AttributeValue::Int(value) => value.to_string(),
        AttributeValue::Float(value) => format_float(*value),
        AttributeValue::Str(value) => {
            if value.chars().any(char::is_whitespace) {
                format!("\"{value}\"")
            } else {
                value.clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_styles() {
        assert_eq!(format_value(&AttributeValue::Bool(false), BoolStyle::Lowercase), "false");
        assert_eq!(
            format_value(&AttributeValue::Bool(true), BoolStyle::FortranLogical),
            ".true."
        );
    }

    #[test]
    fn test_numeric_formatting() {
        assert_eq!(format_value(&AttributeValue::Int(769), BoolStyle::Lowercase), "769");
        assert_eq!(format_value(&AttributeValue::Float(2.0), BoolStyle::Lowercase), "2.0");
        assert_eq!(format_value(&AttributeValue::Float(0.25), BoolStyle::Lowercase), "0.25");
        assert_eq!(format_value(&AttributeValue::Float(-3.0), BoolStyle::Lowercase), "-3.0");
    }

    #[test]
    fn test_string_quoting() {
        assert_eq!(format_value(&AttributeValue::from("max"), BoolStyle::Lowercase), "max");
        assert_eq!(
            format_value(&AttributeValue::from("two words"), BoolStyle::Lowercase),
            "\"two words\""
        );
    }
}

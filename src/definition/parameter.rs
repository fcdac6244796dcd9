// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

/// Static configuration value attached to a step.
///
/// Lists are homogeneous: a document array becomes either a `StringList` or a
/// `NumberList`, never a mix. An empty array is read as an empty `StringList`.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    String(String),
    Number(f64),
    Bool(bool),
    StringList(Vec<String>),
    NumberList(Vec<f64>),
}

/// Discriminant of a [`ParameterValue`], used in type mismatch diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    String,
    Number,
    Bool,
    StringList,
    NumberList,
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParameterKind::String => "string",
            ParameterKind::Number => "number",
            ParameterKind::Bool => "bool",
            ParameterKind::StringList => "string list",
            ParameterKind::NumberList => "number list",
        };
        f.write_str(name)
    }
}

impl ParameterValue {
    pub fn kind(&self) -> ParameterKind {
        match self {
            ParameterValue::String(_) => ParameterKind::String,
            ParameterValue::Number(_) => ParameterKind::Number,
            ParameterValue::Bool(_) => ParameterKind::Bool,
            ParameterValue::StringList(_) => ParameterKind::StringList,
            ParameterValue::NumberList(_) => ParameterKind::NumberList,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParameterValue::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            ParameterValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParameterValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_string_list(&self) -> Option<&[String]> {
        match self {
            ParameterValue::StringList(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_number_list(&self) -> Option<&[f64]> {
        match self {
            ParameterValue::NumberList(values) => Some(values),
            _ => None,
        }
    }
}

/// Renders a number without a fractional suffix when it is integral (`3.0` -> `"3"`).
pub(crate) fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::String(value) => f.write_str(value),
            ParameterValue::Number(value) => f.write_str(&format_number(*value)),
            ParameterValue::Bool(value) => write!(f, "{}", value),
            ParameterValue::StringList(values) => write!(f, "[{}]", values.join(", ")),
            ParameterValue::NumberList(values) => {
                let rendered: Vec<String> = values.iter().map(|v| format_number(*v)).collect();
                write!(f, "[{}]", rendered.join(", "))
            }
        }
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        ParameterValue::String(value.to_string())
    }
}

impl From<String> for ParameterValue {
    fn from(value: String) -> Self {
        ParameterValue::String(value)
    }
}

impl From<f64> for ParameterValue {
    fn from(value: f64) -> Self {
        ParameterValue::Number(value)
    }
}

impl From<bool> for ParameterValue {
    fn from(value: bool) -> Self {
        ParameterValue::Bool(value)
    }
}

impl From<Vec<String>> for ParameterValue {
    fn from(values: Vec<String>) -> Self {
        ParameterValue::StringList(values)
    }
}

impl From<Vec<f64>> for ParameterValue {
    fn from(values: Vec<f64>) -> Self {
        ParameterValue::NumberList(values)
    }
}

/// Workflow-level variable declaration.
///
/// Declared once per document under `variables` and never re-evaluated per step. The default
/// value is kept in its stringified form; [`Context::seed_variables`](crate::engine::Context::seed_variables)
/// converts it back according to `var_type`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Variable {
    pub name: String,
    pub var_type: String,
    pub description: String,
    pub default_value: String,
    pub required: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integral_numbers_render_without_fraction() {
        assert_eq!(ParameterValue::Number(3.0).to_string(), "3");
        assert_eq!(ParameterValue::Number(-12.0).to_string(), "-12");
        assert_eq!(ParameterValue::Number(2.5).to_string(), "2.5");
        assert_eq!(
            ParameterValue::NumberList(vec![1.0, 2.5]).to_string(),
            "[1, 2.5]"
        );
    }

    #[test]
    fn test_accessors_only_match_their_kind() {
        let value = ParameterValue::from("hello");
        assert_eq!(value.as_str(), Some("hello"));
        assert_eq!(value.as_number(), None);
        assert_eq!(value.kind(), ParameterKind::String);

        let value = ParameterValue::from(vec![1.0, 2.0]);
        assert_eq!(value.as_number_list(), Some(&[1.0, 2.0][..]));
        assert_eq!(value.as_string_list(), None);
        assert_eq!(value.kind().to_string(), "number list");
    }
}

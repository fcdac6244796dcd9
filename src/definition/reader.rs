// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Conversion of raw JSON members into typed step configuration.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::definition::parameter::format_number;
use crate::definition::{ParameterValue, Variable};
use crate::errors::{WorkflowError, WorkflowResult};

const INPUTS_MEMBER: &str = "inputs";
const OUTPUTS_MEMBER: &str = "outputs";

/// Reads parameters, string maps, node identity and variable declarations out of JSON objects.
///
/// The reader is stateless; it exists as a type so the parser, the migrator and tests share a
/// single set of conversion rules.
#[derive(Debug, Default, Clone, Copy)]
pub struct ParameterReader;

impl ParameterReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read_required_string(&self, object: &Map<String, Value>, name: &str) -> WorkflowResult<String> {
        match object.get(name) {
            Some(Value::String(value)) => Ok(value.clone()),
            _ => Err(WorkflowError::shape(format!(
                "workflow member '{}' must be a string",
                name
            ))),
        }
    }

    /// Reads `object[name]` as a string-to-string map. An absent member is an empty map.
    pub fn read_string_map(
        &self,
        object: &Map<String, Value>,
        name: &str,
    ) -> WorkflowResult<HashMap<String, String>> {
        let mut result = HashMap::new();
        let Some(value) = object.get(name) else {
            return Ok(result);
        };
        let Value::Object(members) = value else {
            return Err(WorkflowError::shape(format!(
                "workflow member '{}' must be an object",
                name
            )));
        };
        for (key, entry) in members {
            let Value::String(target) = entry else {
                return Err(WorkflowError::shape(format!(
                    "workflow map '{}' must map to strings (key '{}')",
                    name, key
                )));
            };
            result.insert(key.clone(), target.clone());
        }
        Ok(result)
    }

    /// Reads the object member `name` as a parameter map.
    ///
    /// Nested `inputs`/`outputs` objects are skipped: the parser extracts them separately as the
    /// step's input and output bindings.
    pub fn read_parameter_map(
        &self,
        object: &Map<String, Value>,
        name: &str,
    ) -> WorkflowResult<HashMap<String, ParameterValue>> {
        match object.get(name) {
            None => Ok(HashMap::new()),
            Some(Value::Object(members)) => self.read_parameters(members, &[]),
            Some(_) => Err(WorkflowError::shape(format!(
                "workflow member '{}' must be an object",
                name
            ))),
        }
    }

    /// Converts every member of `members` except the names in `exclude`.
    pub fn read_parameters(
        &self,
        members: &Map<String, Value>,
        exclude: &[&str],
    ) -> WorkflowResult<HashMap<String, ParameterValue>> {
        let mut result = HashMap::new();
        for (key, value) in members {
            if exclude.contains(&key.as_str()) {
                continue;
            }
            if (key == INPUTS_MEMBER || key == OUTPUTS_MEMBER) && value.is_object() {
                continue;
            }
            result.insert(key.clone(), self.read_parameter_value(key, value)?);
        }
        Ok(result)
    }

    pub fn read_parameter_value(&self, key: &str, value: &Value) -> WorkflowResult<ParameterValue> {
        match value {
            Value::String(text) => Ok(ParameterValue::String(text.clone())),
            Value::Bool(flag) => Ok(ParameterValue::Bool(*flag)),
            Value::Number(number) => number
                .as_f64()
                .map(ParameterValue::Number)
                .ok_or_else(|| WorkflowError::InvalidParameter {
                    parameter: key.to_string(),
                    reason: "is not representable as a number".to_string(),
                }),
            Value::Array(entries) => self.read_list(key, entries),
            _ => Err(WorkflowError::InvalidParameter {
                parameter: key.to_string(),
                reason: "must be a string, number, bool, or array".to_string(),
            }),
        }
    }

    fn read_list(&self, key: &str, entries: &[Value]) -> WorkflowResult<ParameterValue> {
        let mut strings = Vec::new();
        let mut numbers = Vec::new();
        for entry in entries {
            match entry {
                Value::String(text) => strings.push(text.clone()),
                Value::Number(number) => match number.as_f64() {
                    Some(value) => numbers.push(value),
                    None => {
                        return Err(WorkflowError::InvalidParameter {
                            parameter: key.to_string(),
                            reason: "array contains a number that is not representable".to_string(),
                        })
                    }
                },
                _ => {
                    return Err(WorkflowError::InvalidParameter {
                        parameter: key.to_string(),
                        reason: "array must contain strings or numbers".to_string(),
                    })
                }
            }
        }
        if !strings.is_empty() && !numbers.is_empty() {
            return Err(WorkflowError::MixedParameterList {
                parameter: key.to_string(),
            });
        }
        if numbers.is_empty() {
            Ok(ParameterValue::StringList(strings))
        } else {
            Ok(ParameterValue::NumberList(numbers))
        }
    }

    /// Node id: `id`, falling back to `name`.
    pub fn read_node_id(&self, node: &Map<String, Value>, index: usize) -> WorkflowResult<String> {
        for member in ["id", "name"] {
            if let Some(Value::String(id)) = node.get(member) {
                return Ok(id.clone());
            }
        }
        Err(WorkflowError::shape(format!(
            "workflow node[{}] requires string id or name",
            index
        )))
    }

    /// Node plugin: `plugin`, falling back to `type`.
    pub fn read_node_plugin(&self, node: &Map<String, Value>, node_id: &str) -> WorkflowResult<String> {
        for member in ["plugin", "type"] {
            if let Some(Value::String(plugin)) = node.get(member) {
                return Ok(plugin.clone());
            }
        }
        Err(WorkflowError::shape(format!(
            "workflow node '{}' requires string plugin or type",
            node_id
        )))
    }

    /// Reads the document-level `variables` object. Non-object entries are skipped.
    pub fn read_variables(&self, document: &Map<String, Value>) -> WorkflowResult<HashMap<String, Variable>> {
        let mut variables = HashMap::new();
        let Some(value) = document.get("variables") else {
            return Ok(variables);
        };
        let Value::Object(entries) = value else {
            return Err(WorkflowError::shape("workflow 'variables' must be an object"));
        };

        for (name, entry) in entries {
            let Value::Object(fields) = entry else {
                continue;
            };
            let text = |member: &str| match fields.get(member) {
                Some(Value::String(value)) => value.clone(),
                _ => String::new(),
            };
            let variable = Variable {
                name: name.clone(),
                var_type: text("type"),
                description: text("description"),
                default_value: fields.get("defaultValue").map(stringify_default).unwrap_or_default(),
                required: fields.get("required").and_then(Value::as_bool).unwrap_or(false),
            };
            variables.insert(name.clone(), variable);
        }
        Ok(variables)
    }
}

fn stringify_default(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => match number.as_f64() {
            Some(n) if number.is_f64() => format_number(n),
            _ => number.to_string(),
        },
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test fixture must be an object"),
        }
    }

    #[test]
    fn test_scalar_and_list_parameters() {
        let reader = ParameterReader::new();
        let node = object(json!({
            "parameters": {
                "title": "Main",
                "width": 1280,
                "vsync": true,
                "tags": ["a", "b"],
                "color": [1, 0.5, 0],
                "empty": []
            }
        }));

        let params = reader.read_parameter_map(&node, "parameters").unwrap();
        assert_eq!(params["title"], ParameterValue::String("Main".to_string()));
        assert_eq!(params["width"], ParameterValue::Number(1280.0));
        assert_eq!(params["vsync"], ParameterValue::Bool(true));
        assert_eq!(
            params["tags"],
            ParameterValue::StringList(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(params["color"], ParameterValue::NumberList(vec![1.0, 0.5, 0.0]));
        assert_eq!(params["empty"], ParameterValue::StringList(vec![]));
    }

    #[test]
    fn test_mixed_list_is_rejected_with_key() {
        let reader = ParameterReader::new();
        let err = reader
            .read_parameter_value("mixed", &json!(["a", 1]))
            .unwrap_err();
        assert!(matches!(err, WorkflowError::MixedParameterList { ref parameter } if parameter == "mixed"));
        assert!(err.to_string().contains("mixed"));
    }

    #[test]
    fn test_unsupported_values_are_rejected() {
        let reader = ParameterReader::new();
        assert!(reader.read_parameter_value("nested", &json!({"a": 1})).is_err());
        assert!(reader.read_parameter_value("nothing", &Value::Null).is_err());
        assert!(reader.read_parameter_value("bools", &json!([true])).is_err());
    }

    #[test]
    fn test_nested_io_objects_are_not_parameters() {
        let reader = ParameterReader::new();
        let node = object(json!({
            "parameters": {
                "inputs": {"path": "config.path"},
                "outputs": {"document": "config.document"},
                "mode": "strict"
            }
        }));

        let params = reader.read_parameter_map(&node, "parameters").unwrap();
        assert_eq!(params.len(), 1);
        assert!(params.contains_key("mode"));
    }

    #[test]
    fn test_string_map_rules() {
        let reader = ParameterReader::new();
        let node = object(json!({
            "inputs": {"a": "key.a"},
            "bad": {"a": 1},
            "scalar": "x"
        }));

        assert_eq!(reader.read_string_map(&node, "inputs").unwrap()["a"], "key.a");
        assert!(reader.read_string_map(&node, "missing").unwrap().is_empty());
        assert!(reader.read_string_map(&node, "bad").is_err());
        assert!(reader.read_string_map(&node, "scalar").is_err());
    }

    #[test]
    fn test_node_identity_fallbacks() {
        let reader = ParameterReader::new();
        let named = object(json!({"name": "Load Config", "type": "config.load"}));
        assert_eq!(reader.read_node_id(&named, 0).unwrap(), "Load Config");
        assert_eq!(reader.read_node_plugin(&named, "Load Config").unwrap(), "config.load");

        let anonymous = object(json!({"position": [0, 0]}));
        let err = reader.read_node_id(&anonymous, 4).unwrap_err();
        assert!(err.to_string().contains("node[4]"));
        let err = reader.read_node_plugin(&anonymous, "n4").unwrap_err();
        assert!(err.to_string().contains("n4"));
    }

    #[test]
    fn test_variables_stringify_defaults_and_skip_malformed() {
        let reader = ParameterReader::new();
        let document = object(json!({
            "variables": {
                "width": {"type": "number", "defaultValue": 1024.0, "required": true},
                "ratio": {"type": "number", "defaultValue": 1.5},
                "title": {"type": "string", "description": "Window title", "defaultValue": "Demo"},
                "fullscreen": {"type": "bool", "defaultValue": false},
                "broken": "not-an-object"
            }
        }));

        let variables = reader.read_variables(&document).unwrap();
        assert_eq!(variables.len(), 4);
        assert_eq!(variables["width"].default_value, "1024");
        assert!(variables["width"].required);
        assert_eq!(variables["ratio"].default_value, "1.5");
        assert_eq!(variables["title"].description, "Window title");
        assert_eq!(variables["fullscreen"].default_value, "false");
        assert!(!variables.contains_key("broken"));
    }
}

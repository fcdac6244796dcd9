// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The shared, type-erased data bus steps exchange values through.
//!
//! Values are stored as `Box<dyn Any>` under string keys. Every read is a runtime downcast:
//! a key holding a different type than requested behaves exactly like an absent key. Callers
//! pick the failure mode they need:
//!
//! | accessor        | absent / wrong type              |
//! |-----------------|----------------------------------|
//! | `try_get`       | `None`                           |
//! | `get`           | the supplied default             |
//! | `get_required`  | `Err(ContextValueMissing)`       |
//!
//! A context belongs to one workflow run and is not synchronized. Child workflows borrow the
//! parent's context mutably, so both see and mutate the same keys.

use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;

use tracing::trace;

use crate::definition::Variable;
use crate::errors::{WorkflowError, WorkflowResult};

#[derive(Default)]
pub struct Context {
    values: HashMap<String, Box<dyn Any>>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `key`, replacing whatever was there regardless of its type.
    pub fn set<T: Any>(&mut self, key: impl Into<String>, value: T) {
        self.values.insert(key.into(), Box::new(value));
    }

    pub fn try_get<T: Any>(&self, key: &str) -> Option<&T> {
        self.values.get(key).and_then(|value| value.downcast_ref::<T>())
    }

    pub fn try_get_mut<T: Any>(&mut self, key: &str) -> Option<&mut T> {
        self.values
            .get_mut(key)
            .and_then(|value| value.downcast_mut::<T>())
    }

    /// Clone of the value at `key`, or `default` when absent or of another type.
    pub fn get<T: Any + Clone>(&self, key: &str, default: T) -> T {
        self.try_get::<T>(key).cloned().unwrap_or(default)
    }

    pub fn get_required<T: Any>(&self, key: &str) -> WorkflowResult<&T> {
        self.try_get::<T>(key)
            .ok_or_else(|| WorkflowError::ContextValueMissing {
                key: key.to_string(),
                expected: type_name::<T>(),
            })
    }

    /// Removes and returns the value at `key` when it has type `T`.
    ///
    /// A value of another type is left in place.
    pub fn take<T: Any>(&mut self, key: &str) -> Option<T> {
        let value = self.values.remove(key)?;
        match value.downcast::<T>() {
            Ok(value) => Some(*value),
            Err(value) => {
                self.values.insert(key.to_string(), value);
                None
            }
        }
    }

    /// Removes `key`. Returns whether anything was stored there.
    pub fn remove(&mut self, key: &str) -> bool {
        self.values.remove(key).is_some()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get_string(&self, key: &str, default: &str) -> String {
        self.try_get::<String>(key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    pub fn get_number(&self, key: &str, default: f64) -> f64 {
        self.get(key, default)
    }

    /// Integer view of `key`. Numbers stored as `f64` are truncated.
    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        if let Some(value) = self.try_get::<i64>(key) {
            return *value;
        }
        match self.try_get::<f64>(key) {
            Some(value) => *value as i64,
            None => default,
        }
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get(key, default)
    }

    /// Writes the default of every declared variable under the variable's name.
    ///
    /// `number` defaults become `f64`, `bool` defaults become `bool`, anything else (or a default
    /// that does not parse as its declared type) is stored as a `String`. Variables without a
    /// default are skipped, and keys that already hold a value are left untouched. Returns the
    /// number of keys written.
    pub fn seed_variables(&mut self, variables: &HashMap<String, Variable>) -> usize {
        let mut seeded = 0;
        for (name, variable) in variables {
            if variable.default_value.is_empty() || self.contains(name) {
                continue;
            }
            let raw = variable.default_value.as_str();
            match variable.var_type.as_str() {
                "number" => match raw.parse::<f64>() {
                    Ok(number) => self.set(name.clone(), number),
                    Err(_) => self.set(name.clone(), raw.to_string()),
                },
                "bool" => match raw.parse::<bool>() {
                    Ok(flag) => self.set(name.clone(), flag),
                    Err(_) => self.set(name.clone(), raw.to_string()),
                },
                _ => self.set(name.clone(), raw.to_string()),
            }
            trace!(variable = %name, var_type = %variable.var_type, "seeded workflow variable");
            seeded += 1;
        }
        seeded
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.keys().collect();
        keys.sort_unstable();
        f.debug_struct("Context")
            .field("value_count", &self.values.len())
            .field("keys", &keys)
            .finish()
    }
}

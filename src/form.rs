//! The add-item form.
//!
//! The form is a flat, ordered set of named text controls. Submitting it sends every
//! control as a key/value pair with the value exactly as typed, including empty ones.

use std::collections::BTreeMap;

/// Controls present on the standard add form.
pub const DEFAULT_FIELDS: [&str; 5] = ["name", "category", "qty", "expiry", "notes"];

#[derive(Debug, Clone, PartialEq, Eq)]
struct Control {
    name: String,
    value: String,
    default: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddItemForm {
    controls: Vec<Control>,
}

impl Default for AddItemForm {
    fn default() -> Self {
        Self::with_fields(DEFAULT_FIELDS)
    }
}

impl AddItemForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// A form with the given controls, all initially empty.
    pub fn with_fields<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            controls: names
                .into_iter()
                .map(|name| Control {
                    name: name.into(),
                    value: String::new(),
                    default: String::new(),
                })
                .collect(),
        }
    }

    /// Sets the value `reset` restores for control `name`, and applies it now.
    pub fn with_default(mut self, name: &str, default: &str) -> Self {
        if let Some(control) = self.controls.iter_mut().find(|c| c.name == name) {
            control.default = default.to_string();
            control.value = default.to_string();
        }
        self
    }

    /// Types `value` into control `name`. Returns false if the form has no such control.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.controls.iter_mut().find(|c| c.name == name) {
            Some(control) => {
                control.value = value.into();
                true
            }
            None => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.controls
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.value.as_str())
    }

    /// Serializes every control into the creation payload.
    pub fn payload(&self) -> BTreeMap<String, String> {
        self.controls
            .iter()
            .map(|c| (c.name.clone(), c.value.clone()))
            .collect()
    }

    pub fn reset(&mut self) {
        for control in &mut self.controls {
            control.value = control.default.clone();
        }
    }
}

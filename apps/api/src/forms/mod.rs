//! Input validation for admin payloads and site forms.
//!
//! Each payload type has a `clean` step that either yields a validated value
//! or a [`FieldErrors`] map keyed by field name.

pub mod account;
pub mod content;
pub mod fields;

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

pub use account::{LoginForm, PreferenceForm, RegisterForm};
pub use content::{
    ExperienceDraft, ExperienceInput, OrderUpdate, ProfileDraft, ProfileInput, ProjectDraft,
    ProjectInput, ServiceDraft, ServiceInput, SkillDraft, SkillInput,
};

/// Key used for errors that belong to the form as a whole.
pub const NON_FIELD: &str = "__all__";

/// Validation messages grouped by field, in field-name order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(test)]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns `value` when no errors were collected.
    pub fn finish<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, messages)| format!("{field}: {}", messages.join(" ")))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

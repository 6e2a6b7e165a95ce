//! Form state held between user selections.

use shared::{
    domain::{Field, FieldSet},
    error::FieldError,
};
use tracing::debug;

/// Owns the current [`FieldSet`] and applies user selections to it.
///
/// Every update is checked against the field's options; a rejected value leaves
/// the held snapshot untouched.
#[derive(Debug, Clone, Default)]
pub struct FormController {
    fields: FieldSet,
}

impl FormController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, field: Field, value: &str) -> Result<FieldSet, FieldError> {
        let next = self.fields.with_value(field, value)?;
        debug!(field = %field, value, "form field updated");
        self.fields = next;
        Ok(next)
    }

    /// Like [`FormController::update`], addressing the field by name or wire key.
    pub fn update_named(&mut self, field: &str, value: &str) -> Result<FieldSet, FieldError> {
        let field = field.parse::<Field>()?;
        self.update(field, value)
    }

    pub fn snapshot(&self) -> FieldSet {
        self.fields
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;

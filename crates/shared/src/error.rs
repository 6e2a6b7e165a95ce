use thiserror::Error;

use crate::domain::Field;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("unknown field '{0}'")]
    UnknownField(String),
    #[error("'{value}' is not a valid {field} option")]
    InvalidValue { field: Field, value: String },
}

impl FieldError {
    pub fn invalid_value(field: Field, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            value: value.into(),
        }
    }
}

use thiserror::Error;

use crate::types::DataType;

/// Error codes for structural model validation (FM1001..FM1006).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelErrorCode {
    MissingRequiredField = 1001,
    EmptyRequiredList = 1002,
    InvalidChoiceType = 1003,
    EmptyLeafElement = 1004,
    UnresolvedBinding = 1005,
    InvalidValue = 1006,
}

impl std::fmt::Display for ModelErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FM{:04}", *self as u32)
    }
}

/// A violated structural rule, raised only when a builder is frozen (or an
/// instance is validated explicitly). Validation is fail-fast, so a single
/// error is reported per attempt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Missing required field: {field} (at {path})")]
    MissingRequiredField { field: &'static str, path: String },

    #[error("Required list is empty: {field} (at {path})")]
    EmptyRequiredList { field: &'static str, path: String },

    #[error("Invalid choice type for {field}: {actual} is not one of [{}] (at {path})", join_types(.allowed))]
    InvalidChoiceType {
        field: &'static str,
        actual: DataType,
        allowed: &'static [DataType],
        path: String,
    },

    #[error("Element {type_name} has no value, children or extensions (at {path})")]
    EmptyLeafElement { type_name: &'static str, path: String },

    #[error("Code '{code}' in {field} is not a member of required value set '{value_set}' (at {path})")]
    UnresolvedBinding {
        field: &'static str,
        code: String,
        value_set: &'static str,
        path: String,
    },

    #[error("Invalid {data_type} value '{value}': {reason} (at {path})")]
    InvalidValue {
        data_type: DataType,
        value: String,
        reason: &'static str,
        path: String,
    },
}

pub type Result<T> = std::result::Result<T, ModelError>;

fn join_types(types: &[DataType]) -> String {
    types
        .iter()
        .map(|t| t.name())
        .collect::<Vec<_>>()
        .join(", ")
}

impl ModelError {
    /// Get the error code for this error
    pub fn code(&self) -> ModelErrorCode {
        match self {
            ModelError::MissingRequiredField { .. } => ModelErrorCode::MissingRequiredField,
            ModelError::EmptyRequiredList { .. } => ModelErrorCode::EmptyRequiredList,
            ModelError::InvalidChoiceType { .. } => ModelErrorCode::InvalidChoiceType,
            ModelError::EmptyLeafElement { .. } => ModelErrorCode::EmptyLeafElement,
            ModelError::UnresolvedBinding { .. } => ModelErrorCode::UnresolvedBinding,
            ModelError::InvalidValue { .. } => ModelErrorCode::InvalidValue,
        }
    }

    /// Name of the offending field, or of the element type for
    /// `EmptyLeafElement` and `InvalidValue`.
    pub fn field(&self) -> &str {
        match self {
            ModelError::MissingRequiredField { field, .. }
            | ModelError::EmptyRequiredList { field, .. }
            | ModelError::InvalidChoiceType { field, .. }
            | ModelError::UnresolvedBinding { field, .. } => field,
            ModelError::EmptyLeafElement { type_name, .. } => type_name,
            ModelError::InvalidValue { data_type, .. } => data_type.name(),
        }
    }

    /// Dotted instance path of the offence, e.g. `CodeSystem.concept[0].code`.
    pub fn path(&self) -> &str {
        match self {
            ModelError::MissingRequiredField { path, .. }
            | ModelError::EmptyRequiredList { path, .. }
            | ModelError::InvalidChoiceType { path, .. }
            | ModelError::EmptyLeafElement { path, .. }
            | ModelError::UnresolvedBinding { path, .. }
            | ModelError::InvalidValue { path, .. } => path,
        }
    }
}

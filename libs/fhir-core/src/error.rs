//! Structural violations raised by `build()`

use thiserror::Error;

/// A single structural violation. Construction is fail-fast: the first
/// violation found aborts the `build()` call that found it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Missing required element: '{field}'")]
    MissingRequiredField { field: String },

    #[error("Missing required element: '{field}' must contain at least one entry")]
    EmptyRequiredList { field: String },

    #[error("Repeating element: '{field}' does not permit null elements (index {index})")]
    NullElementInList { field: String, index: usize },

    #[error(
        "Invalid type: {found} for choice element: '{field}' must be one of: {}",
        .allowed.join(", ")
    )]
    InvalidChoiceType {
        field: String,
        found: String,
        allowed: Vec<String>,
    },

    #[error(
        "Invalid reference value: '{reference}' for element: '{field}' must reference one of: {}",
        .allowed.join(", ")
    )]
    InvalidReferenceTargetType {
        field: String,
        reference: String,
        /// Target type extracted from the reference, if any could be
        found: Option<String>,
        allowed: Vec<String>,
    },

    #[error("ele-1: All FHIR elements must have a @value or children ({type_name})")]
    EmptyNode { type_name: String },

    #[error("Invalid {type_name} value for element: '{field}': {reason}")]
    InvalidPrimitiveValue {
        field: String,
        type_name: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Fieldless discriminant of [`Error`], for matching without destructuring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    MissingRequiredField,
    EmptyRequiredList,
    NullElementInList,
    InvalidChoiceType,
    InvalidReferenceTargetType,
    EmptyNode,
    InvalidPrimitiveValue,
}

impl Error {
    pub fn kind(&self) -> ViolationKind {
        match self {
            Self::MissingRequiredField { .. } => ViolationKind::MissingRequiredField,
            Self::EmptyRequiredList { .. } => ViolationKind::EmptyRequiredList,
            Self::NullElementInList { .. } => ViolationKind::NullElementInList,
            Self::InvalidChoiceType { .. } => ViolationKind::InvalidChoiceType,
            Self::InvalidReferenceTargetType { .. } => ViolationKind::InvalidReferenceTargetType,
            Self::EmptyNode { .. } => ViolationKind::EmptyNode,
            Self::InvalidPrimitiveValue { .. } => ViolationKind::InvalidPrimitiveValue,
        }
    }

    /// Path of the offending field, qualified by the type whose builder
    /// found it, e.g. `Patient.contact.organization`. `EmptyNode` has none;
    /// it names a type.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::MissingRequiredField { field }
            | Self::EmptyRequiredList { field }
            | Self::NullElementInList { field, .. }
            | Self::InvalidChoiceType { field, .. }
            | Self::InvalidReferenceTargetType { field, .. }
            | Self::InvalidPrimitiveValue { field, .. } => Some(field.as_str()),
            Self::EmptyNode { .. } => None,
        }
    }

    /// Last segment of [`path`](Self::path): the field name as declared on
    /// its type.
    pub fn field(&self) -> Option<&str> {
        self.path()
            .map(|path| path.rsplit_once('.').map_or(path, |(_, field)| field))
    }

    fn field_mut(&mut self) -> Option<&mut String> {
        match self {
            Self::MissingRequiredField { field }
            | Self::EmptyRequiredList { field }
            | Self::NullElementInList { field, .. }
            | Self::InvalidChoiceType { field, .. }
            | Self::InvalidReferenceTargetType { field, .. }
            | Self::InvalidPrimitiveValue { field, .. } => Some(field),
            Self::EmptyNode { .. } => None,
        }
    }

    pub(crate) fn invalid_primitive(type_name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidPrimitiveValue {
            field: String::new(),
            type_name: type_name.to_string(),
            reason: reason.into(),
        }
    }

    /// Attaches a field name to a violation raised before the field was
    /// known (a primitive literal rejected during conversion).
    pub fn in_field(mut self, name: &str) -> Self {
        if let Some(field) = self.field_mut() {
            if field.is_empty() {
                *field = name.to_string();
            }
        }
        self
    }

    /// Prefixes a bare field name with the owning type. Paths already
    /// qualified by a nested builder are left alone.
    pub fn qualified(mut self, type_name: &str) -> Self {
        if let Some(field) = self.field_mut() {
            if !field.is_empty() && !field.contains('.') {
                *field = format!("{}.{}", type_name, field);
            }
        }
        self
    }
}

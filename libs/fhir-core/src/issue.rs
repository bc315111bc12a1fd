//! Issue-report shape for structural violations
//!
//! Violations convert into the shape an OperationOutcome issue carries:
//! severity, issue-type code, diagnostics text and the offending location.

use serde_json::Value as JsonValue;

use crate::error::{Error, ViolationKind};

/// Individual validation issue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub severity: IssueSeverity,
    pub code: IssueCode,
    pub diagnostics: String,
    pub location: Option<String>,
    pub expression: Option<Vec<String>>,
}

impl ValidationIssue {
    pub fn error(code: IssueCode, diagnostics: String) -> Self {
        Self {
            severity: IssueSeverity::Error,
            code,
            diagnostics,
            location: None,
            expression: None,
        }
    }

    pub fn warning(code: IssueCode, diagnostics: String) -> Self {
        Self {
            severity: IssueSeverity::Warning,
            code,
            diagnostics,
            location: None,
            expression: None,
        }
    }

    pub fn information(code: IssueCode, diagnostics: String) -> Self {
        Self {
            severity: IssueSeverity::Information,
            code,
            diagnostics,
            location: None,
            expression: None,
        }
    }

    pub fn with_location(mut self, location: String) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_expression(mut self, expression: Vec<String>) -> Self {
        self.expression = Some(expression);
        self
    }

    pub fn to_json(&self) -> JsonValue {
        let mut issue = serde_json::json!({
            "severity": self.severity.as_code(),
            "code": self.code.to_string(),
            "diagnostics": self.diagnostics,
        });

        if let Some(ref loc) = self.location {
            issue["location"] = serde_json::json!([loc]);
        }

        if let Some(ref expr) = self.expression {
            issue["expression"] = serde_json::json!(expr);
        }

        issue
    }
}

impl From<&Error> for ValidationIssue {
    fn from(err: &Error) -> Self {
        let code = match err.kind() {
            ViolationKind::MissingRequiredField | ViolationKind::EmptyRequiredList => {
                IssueCode::Required
            }
            ViolationKind::NullElementInList | ViolationKind::EmptyNode => IssueCode::Structure,
            ViolationKind::InvalidPrimitiveValue => IssueCode::Value,
            ViolationKind::InvalidChoiceType | ViolationKind::InvalidReferenceTargetType => {
                IssueCode::Invalid
            }
        };

        let issue = ValidationIssue::error(code, err.to_string());
        let location = match err {
            Error::EmptyNode { type_name } => type_name.clone(),
            Error::NullElementInList { field, index } => format!("{}[{}]", field, index),
            other => other.path().unwrap_or_default().to_string(),
        };

        issue
            .with_location(location.clone())
            .with_expression(vec![location])
    }
}

impl Error {
    pub fn to_issue(&self) -> ValidationIssue {
        ValidationIssue::from(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueSeverity {
    Fatal,
    Error,
    Warning,
    Information,
}

impl IssueSeverity {
    /// Lower-case code as used on the wire
    pub fn as_code(&self) -> &'static str {
        match self {
            Self::Fatal => "fatal",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Information => "information",
        }
    }
}

impl std::fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fatal => write!(f, "Fatal"),
            Self::Error => write!(f, "Error"),
            Self::Warning => write!(f, "Warning"),
            Self::Information => write!(f, "Information"),
        }
    }
}

/// Issue-type codes relevant to structural checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueCode {
    Invalid,
    Structure,
    Required,
    Value,
    Invariant,
    Processing,
    NotSupported,
    CodeInvalid,
    Extension,
    Informational,
}

impl std::fmt::Display for IssueCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Invalid => "invalid",
            Self::Structure => "structure",
            Self::Required => "required",
            Self::Value => "value",
            Self::Invariant => "invariant",
            Self::Processing => "processing",
            Self::NotSupported => "not-supported",
            Self::CodeInvalid => "code-invalid",
            Self::Extension => "extension",
            Self::Informational => "informational",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_maps_to_required() {
        let err = Error::MissingRequiredField {
            field: "status".to_string(),
        };
        let issue = err.to_issue();

        assert_eq!(issue.severity, IssueSeverity::Error);
        assert_eq!(issue.code, IssueCode::Required);
        assert_eq!(issue.location.as_deref(), Some("status"));

        let json = issue.to_json();
        assert_eq!(json["severity"], "error");
        assert_eq!(json["code"], "required");
        assert_eq!(json["location"][0], "status");
        assert_eq!(json["expression"][0], "status");
    }

    #[test]
    fn test_null_entry_location_carries_index() {
        let err = Error::NullElementInList {
            field: "name".to_string(),
            index: 2,
        };
        let issue = ValidationIssue::from(&err);
        assert_eq!(issue.code, IssueCode::Structure);
        assert_eq!(issue.location.as_deref(), Some("name[2]"));
    }

    #[test]
    fn test_issue_code_display() {
        assert_eq!(IssueCode::NotSupported.to_string(), "not-supported");
        assert_eq!(IssueCode::CodeInvalid.to_string(), "code-invalid");
        assert_eq!(IssueSeverity::Warning.to_string(), "Warning");
    }

    #[test]
    fn test_optional_parts_omitted_from_json() {
        let json = ValidationIssue::information(IssueCode::Informational, "ok".to_string()).to_json();
        assert!(json.get("location").is_none());
        assert!(json.get("expression").is_none());
        assert_eq!(json["severity"], "information");
    }
}

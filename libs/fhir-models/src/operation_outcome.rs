//! OperationOutcome resource and its construction from structural violations

use ferrum_core::builder::{append, replace, restage, restage_one, Builder, IntoField, Staged, StagedList};
use ferrum_core::node::{BackboneElementBase, BackboneStage, DomainResourceBase, DomainResourceStage};
use ferrum_core::visitor::{accept_field, accept_list, NodeKind, Visitable, Visitor};
use ferrum_core::{
    validation, Code, CodeableConcept, Error, FhirString, FhirType, ModelConfig, Resource,
    Result, ValidationIssue,
};
use serde_json::{json, Value as JsonValue};

use crate::AnyResource;

/// A collection of error, warning, or information messages that result from
/// a system action.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperationOutcome {
    domain: DomainResourceBase<AnyResource>,
    issue: Vec<OperationOutcomeIssue>,
}

impl OperationOutcome {
    pub fn builder() -> OperationOutcomeBuilder {
        OperationOutcomeBuilder::default()
    }

    pub fn to_builder(&self) -> OperationOutcomeBuilder {
        OperationOutcomeBuilder::from(self)
    }

    pub fn issue(&self) -> &[OperationOutcomeIssue] {
        &self.issue
    }

    /// Builds an outcome with one issue per entry, in order.
    ///
    /// Blank diagnostics, locations and expressions are left out; an empty
    /// slice fails because an outcome needs at least one issue.
    pub fn from_issues(issues: &[ValidationIssue]) -> Result<Self> {
        tracing::debug!(issues = issues.len(), "building OperationOutcome");
        OperationOutcome::builder()
            .issue(issues.iter().map(OperationOutcomeIssueBuilder::from))
            .build()
    }

    /// Outcome reporting a single rejected build.
    pub fn from_error(err: &Error) -> Result<Self> {
        Self::from_issues(&[err.to_issue()])
    }

    /// Whether any issue has severity `fatal` or `error`
    pub fn has_errors(&self) -> bool {
        self.issue.iter().any(|issue| {
            matches!(
                issue.severity.value().map(String::as_str),
                Some("fatal") | Some("error")
            )
        })
    }

    pub fn to_json(&self) -> JsonValue {
        let mut outcome = json!({ "resourceType": Self::TYPE_NAME });
        if let Some(id) = self.id() {
            outcome["id"] = json!(id);
        }
        outcome["issue"] = self
            .issue
            .iter()
            .map(OperationOutcomeIssue::to_json)
            .collect();
        outcome
    }
}

domain_resource_type!(OperationOutcome, OperationOutcomeBuilder, "OperationOutcome");

impl Visitable for OperationOutcome {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn node_kind(&self) -> NodeKind {
        NodeKind::DomainResource
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn accept_children(&self, visitor: &mut dyn Visitor) {
        self.domain.accept_children(visitor);
        accept_list("issue", &self.issue, visitor);
    }
}

#[derive(Debug, Clone, Default)]
pub struct OperationOutcomeBuilder {
    domain: DomainResourceStage<AnyResource>,
    issue: StagedList<OperationOutcomeIssue>,
}

impl OperationOutcomeBuilder {
    pub fn issue<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<OperationOutcomeIssue>,
    {
        append(&mut self.issue, items);
        self
    }

    pub fn set_issue<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<OperationOutcomeIssue>,
    {
        replace(&mut self.issue, items);
        self
    }
}

impl From<&OperationOutcome> for OperationOutcomeBuilder {
    fn from(outcome: &OperationOutcome) -> Self {
        Self {
            domain: DomainResourceStage::from_base(&outcome.domain),
            issue: restage(&outcome.issue),
        }
    }
}

impl Builder for OperationOutcomeBuilder {
    type Output = OperationOutcome;

    fn assemble(self, _config: &ModelConfig) -> Result<OperationOutcome> {
        Ok(OperationOutcome {
            domain: self.domain.finish()?,
            issue: validation::check_non_empty_list("issue", self.issue)?,
        })
    }
}

// ============================================================================
// OperationOutcome.issue
// ============================================================================

/// A single issue associated with the action
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperationOutcomeIssue {
    backbone: BackboneElementBase,
    /// fatal | error | warning | information
    severity: Code,
    code: Code,
    details: Option<CodeableConcept>,
    diagnostics: Option<FhirString>,
    location: Vec<FhirString>,
    expression: Vec<FhirString>,
}

impl OperationOutcomeIssue {
    pub fn builder() -> OperationOutcomeIssueBuilder {
        OperationOutcomeIssueBuilder::default()
    }

    pub fn to_builder(&self) -> OperationOutcomeIssueBuilder {
        OperationOutcomeIssueBuilder::from(self)
    }

    pub fn severity(&self) -> &Code {
        &self.severity
    }

    pub fn code(&self) -> &Code {
        &self.code
    }

    pub fn details(&self) -> Option<&CodeableConcept> {
        self.details.as_ref()
    }

    pub fn diagnostics(&self) -> Option<&FhirString> {
        self.diagnostics.as_ref()
    }

    pub fn location(&self) -> &[FhirString] {
        &self.location
    }

    pub fn expression(&self) -> &[FhirString] {
        &self.expression
    }

    fn to_json(&self) -> JsonValue {
        let mut issue = json!({
            "severity": self.severity.value(),
            "code": self.code.value(),
        });
        if let Some(text) = self.details.as_ref().and_then(|d| d.text()).and_then(|t| t.as_str()) {
            issue["details"] = json!({ "text": text });
        }
        if let Some(diagnostics) = self.diagnostics.as_ref().and_then(|d| d.as_str()) {
            issue["diagnostics"] = json!(diagnostics);
        }
        if !self.location.is_empty() {
            issue["location"] = strings(&self.location);
        }
        if !self.expression.is_empty() {
            issue["expression"] = strings(&self.expression);
        }
        issue
    }
}

fn strings(items: &[FhirString]) -> JsonValue {
    items.iter().filter_map(|s| s.as_str()).collect()
}

fn non_blank(text: &str) -> Option<&str> {
    Some(text).filter(|t| !t.trim().is_empty())
}

backbone_type!(
    OperationOutcomeIssue,
    OperationOutcomeIssueBuilder,
    "OperationOutcome.issue"
);

impl Visitable for OperationOutcomeIssue {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn node_kind(&self) -> NodeKind {
        NodeKind::BackboneElement
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn element_id(&self) -> Option<&str> {
        ferrum_core::Element::id(self)
    }

    fn accept_children(&self, visitor: &mut dyn Visitor) {
        self.backbone.accept_children(visitor);
        accept_field("severity", Some(&self.severity), visitor);
        accept_field("code", Some(&self.code), visitor);
        accept_field("details", self.details.as_ref(), visitor);
        accept_field("diagnostics", self.diagnostics.as_ref(), visitor);
        accept_list("location", &self.location, visitor);
        accept_list("expression", &self.expression, visitor);
    }
}

#[derive(Debug, Clone, Default)]
pub struct OperationOutcomeIssueBuilder {
    backbone: BackboneStage,
    severity: Staged<Code>,
    code: Staged<Code>,
    details: Staged<CodeableConcept>,
    diagnostics: Staged<FhirString>,
    location: StagedList<FhirString>,
    expression: StagedList<FhirString>,
}

impl OperationOutcomeIssueBuilder {
    pub fn severity(mut self, severity: impl IntoField<Code>) -> Self {
        self.severity = severity.into_field();
        self
    }

    pub fn code(mut self, code: impl IntoField<Code>) -> Self {
        self.code = code.into_field();
        self
    }

    pub fn details(mut self, details: impl IntoField<CodeableConcept>) -> Self {
        self.details = details.into_field();
        self
    }

    pub fn diagnostics(mut self, diagnostics: impl IntoField<FhirString>) -> Self {
        self.diagnostics = diagnostics.into_field();
        self
    }

    pub fn location<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<FhirString>,
    {
        append(&mut self.location, items);
        self
    }

    pub fn set_location<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<FhirString>,
    {
        replace(&mut self.location, items);
        self
    }

    pub fn expression<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<FhirString>,
    {
        append(&mut self.expression, items);
        self
    }

    pub fn set_expression<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<FhirString>,
    {
        replace(&mut self.expression, items);
        self
    }
}

impl From<&OperationOutcomeIssue> for OperationOutcomeIssueBuilder {
    fn from(issue: &OperationOutcomeIssue) -> Self {
        Self {
            backbone: BackboneStage::from_base(&issue.backbone),
            severity: restage_one(Some(&issue.severity)),
            code: restage_one(Some(&issue.code)),
            details: restage_one(issue.details.as_ref()),
            diagnostics: restage_one(issue.diagnostics.as_ref()),
            location: restage(&issue.location),
            expression: restage(&issue.expression),
        }
    }
}

impl From<&ValidationIssue> for OperationOutcomeIssueBuilder {
    fn from(issue: &ValidationIssue) -> Self {
        OperationOutcomeIssue::builder()
            .severity(issue.severity.as_code())
            .code(issue.code.to_string())
            .diagnostics(non_blank(&issue.diagnostics))
            .location(issue.location.as_deref().and_then(non_blank))
            .expression(
                issue
                    .expression
                    .iter()
                    .flatten()
                    .filter_map(|e| non_blank(e)),
            )
    }
}

impl IntoField<OperationOutcomeIssue> for OperationOutcomeIssueBuilder {
    fn into_field(self) -> Staged<OperationOutcomeIssue> {
        Some(self.build())
    }
}

impl Builder for OperationOutcomeIssueBuilder {
    type Output = OperationOutcomeIssue;

    fn assemble(self, _config: &ModelConfig) -> Result<OperationOutcomeIssue> {
        let issue = OperationOutcomeIssue {
            backbone: self.backbone.finish()?,
            severity: validation::require("severity", self.severity)?,
            code: validation::require("code", self.code)?,
            details: validation::optional("details", self.details)?,
            diagnostics: validation::optional("diagnostics", self.diagnostics)?,
            location: validation::check_list("location", self.location)?,
            expression: validation::check_list("expression", self.expression)?,
        };
        validation::require_value_or_children(&issue)?;
        Ok(issue)
    }
}

use std::sync::OnceLock;

use regex::Regex;

use crate::builder::{Builder, IntoField, Staged};
use crate::config::ModelConfig;
use crate::datatypes::Identifier;
use crate::error::Result;
use crate::node::{Element, ElementBase, ElementBuilder, ElementStage};
use crate::primitive::{FhirString, Uri};
use crate::validation;
use crate::value::FhirType;
use crate::visitor::{accept_field, NodeKind, Visitable, Visitor};

/// A reference from one resource to another.
///
/// The allowed target types belong to the field holding the reference, not to
/// the reference itself; they are checked when the holder is built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    element: ElementBase,
    /// Literal reference, relative, internal or absolute URL
    reference: Option<FhirString>,
    /// Type the reference refers to (e.g. "Patient")
    type_: Option<Uri>,
    /// Logical reference, when literal reference is not known
    identifier: Option<Box<Identifier>>,
    /// Text alternative for the resource
    display: Option<FhirString>,
}

impl Reference {
    pub fn builder() -> ReferenceBuilder {
        ReferenceBuilder::default()
    }

    pub fn to_builder(&self) -> ReferenceBuilder {
        ReferenceBuilder::from(self)
    }

    pub fn reference(&self) -> Option<&FhirString> {
        self.reference.as_ref()
    }

    pub fn type_(&self) -> Option<&Uri> {
        self.type_.as_ref()
    }

    pub fn identifier(&self) -> Option<&Identifier> {
        self.identifier.as_deref()
    }

    pub fn display(&self) -> Option<&FhirString> {
        self.display.as_ref()
    }

    pub fn reference_str(&self) -> Option<&str> {
        self.reference.as_ref().and_then(|r| r.value()).map(String::as_str)
    }

    pub fn type_str(&self) -> Option<&str> {
        self.type_.as_ref().and_then(|t| t.value()).map(String::as_str)
    }

    /// Target resource type, when it can be read off the reference.
    pub fn target(&self) -> ReferenceTarget<'_> {
        target_of(self)
    }
}

impl FhirType for Reference {
    const TYPE_NAME: &'static str = "Reference";
}

impl Visitable for Reference {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn node_kind(&self) -> NodeKind {
        NodeKind::Element
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn element_id(&self) -> Option<&str> {
        Element::id(self)
    }

    fn accept_children(&self, visitor: &mut dyn Visitor) {
        self.element.accept_children(visitor);
        accept_field("reference", self.reference.as_ref(), visitor);
        accept_field("type", self.type_.as_ref(), visitor);
        accept_field("identifier", self.identifier.as_deref(), visitor);
        accept_field("display", self.display.as_ref(), visitor);
    }
}

impl Element for Reference {
    fn element(&self) -> &ElementBase {
        &self.element
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReferenceBuilder {
    element: ElementStage,
    reference: Staged<FhirString>,
    type_: Staged<Uri>,
    identifier: Staged<Identifier>,
    display: Staged<FhirString>,
}

impl ReferenceBuilder {
    pub fn reference(mut self, reference: impl IntoField<FhirString>) -> Self {
        self.reference = reference.into_field();
        self
    }

    pub fn type_(mut self, type_: impl IntoField<Uri>) -> Self {
        self.type_ = type_.into_field();
        self
    }

    pub fn identifier(mut self, identifier: impl IntoField<Identifier>) -> Self {
        self.identifier = identifier.into_field();
        self
    }

    pub fn display(mut self, display: impl IntoField<FhirString>) -> Self {
        self.display = display.into_field();
        self
    }
}

impl From<&Reference> for ReferenceBuilder {
    fn from(reference: &Reference) -> Self {
        Self {
            element: ElementStage::from_base(&reference.element),
            reference: reference.reference.clone().map(Ok),
            type_: reference.type_.clone().map(Ok),
            identifier: reference.identifier.as_deref().cloned().map(Ok),
            display: reference.display.clone().map(Ok),
        }
    }
}

impl ElementBuilder for ReferenceBuilder {
    fn element_stage(&mut self) -> &mut ElementStage {
        &mut self.element
    }
}

impl Builder for ReferenceBuilder {
    type Output = Reference;

    fn assemble(self, _config: &ModelConfig) -> Result<Reference> {
        let reference = Reference {
            element: self.element.finish()?,
            reference: validation::optional("reference", self.reference)?,
            type_: validation::optional("type", self.type_)?,
            identifier: validation::optional("identifier", self.identifier)?.map(Box::new),
            display: validation::optional("display", self.display)?,
        };
        validation::require_value_or_children(&reference)?;
        Ok(reference)
    }
}

// ============================================================================
// Target type extraction
// ============================================================================

/// What a reference says about the type of resource it points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceTarget<'a> {
    /// The literal names a resource type
    Typed(&'a str),
    /// Contained (`#id`), URN and other non-RESTful forms, or no literal at all
    Undetermined,
    /// A relative literal that does not have the `Type/id` shape
    Malformed,
}

static REFERENCE_RE: OnceLock<Regex> = OnceLock::new();
static RESOURCE_TYPE_RE: OnceLock<Regex> = OnceLock::new();

fn reference_pattern() -> &'static Regex {
    REFERENCE_RE.get_or_init(|| {
        Regex::new(
            r"^((https?)://([A-Za-z0-9\-\\\.:%\$]*/)+)?([A-Z][A-Za-z]+)/[A-Za-z0-9\-\.]{1,64}(/_history/[A-Za-z0-9\-\.]{1,64})?$",
        )
        .expect("reference regex must compile")
    })
}

fn is_resource_type_name(name: &str) -> bool {
    RESOURCE_TYPE_RE
        .get_or_init(|| Regex::new(r"^[A-Z][A-Za-z]+$").expect("resource type regex must compile"))
        .is_match(name)
}

/// True if the literal starts with a URI scheme followed by a non-empty part.
fn has_scheme(literal: &str) -> bool {
    matches!(literal.find(':'), Some(i) if i > 0 && literal.len() > i + 1)
}

fn literal_target(literal: &str) -> ReferenceTarget<'_> {
    if literal.starts_with('#') {
        return ReferenceTarget::Undetermined;
    }

    // Conditional reference: Type?criteria
    if let Some((prefix, _)) = literal.split_once('?') {
        if !prefix.contains(':') && !prefix.contains('/') {
            return if is_resource_type_name(prefix) {
                ReferenceTarget::Typed(prefix)
            } else {
                ReferenceTarget::Malformed
            };
        }
    }

    let captured = reference_pattern()
        .captures(literal)
        .and_then(|caps| caps.get(4))
        .map(|m| m.as_str());

    match captured {
        Some(name) => ReferenceTarget::Typed(name),
        None if has_scheme(literal) => ReferenceTarget::Undetermined,
        None => ReferenceTarget::Malformed,
    }
}

pub(crate) fn target_of(reference: &Reference) -> ReferenceTarget<'_> {
    match reference.reference_str() {
        Some(literal) => literal_target(literal),
        None => ReferenceTarget::Undetermined,
    }
}

/// Resource type named by `Reference.type`. Absolute URLs name the type in
/// their last segment.
pub(crate) fn resource_type_name(declared: &str) -> Option<&str> {
    let name = declared.rsplit('/').next().unwrap_or(declared);
    is_resource_type_name(name).then_some(name)
}

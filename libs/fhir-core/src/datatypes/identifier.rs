use crate::builder::{Builder, IntoField, Staged};
use crate::config::ModelConfig;
use crate::datatypes::{CodeableConcept, Period, Reference};
use crate::error::Result;
use crate::node::{Element, ElementBase, ElementBuilder, ElementStage};
use crate::primitive::{Code, FhirString, Uri};
use crate::validation;
use crate::value::FhirType;
use crate::visitor::{accept_field, NodeKind, Visitable, Visitor};

/// An identifier intended for computation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    element: ElementBase,
    /// usual | official | temp | secondary | old
    use_: Option<Code>,
    type_: Option<CodeableConcept>,
    /// The namespace for the identifier value
    system: Option<Uri>,
    value: Option<FhirString>,
    period: Option<Period>,
    /// Organization that issued id
    assigner: Option<Reference>,
}

impl Identifier {
    pub fn builder() -> IdentifierBuilder {
        IdentifierBuilder::default()
    }

    pub fn to_builder(&self) -> IdentifierBuilder {
        IdentifierBuilder::from(self)
    }

    pub fn use_(&self) -> Option<&Code> {
        self.use_.as_ref()
    }

    pub fn type_(&self) -> Option<&CodeableConcept> {
        self.type_.as_ref()
    }

    pub fn system(&self) -> Option<&Uri> {
        self.system.as_ref()
    }

    pub fn value(&self) -> Option<&FhirString> {
        self.value.as_ref()
    }

    pub fn period(&self) -> Option<&Period> {
        self.period.as_ref()
    }

    pub fn assigner(&self) -> Option<&Reference> {
        self.assigner.as_ref()
    }
}

impl FhirType for Identifier {
    const TYPE_NAME: &'static str = "Identifier";
}

impl Visitable for Identifier {
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
        accept_field("use", self.use_.as_ref(), visitor);
        accept_field("type", self.type_.as_ref(), visitor);
        accept_field("system", self.system.as_ref(), visitor);
        accept_field("value", self.value.as_ref(), visitor);
        accept_field("period", self.period.as_ref(), visitor);
        accept_field("assigner", self.assigner.as_ref(), visitor);
    }
}

impl Element for Identifier {
    fn element(&self) -> &ElementBase {
        &self.element
    }
}

#[derive(Debug, Clone, Default)]
pub struct IdentifierBuilder {
    element: ElementStage,
    use_: Staged<Code>,
    type_: Staged<CodeableConcept>,
    system: Staged<Uri>,
    value: Staged<FhirString>,
    period: Staged<Period>,
    assigner: Staged<Reference>,
}

impl IdentifierBuilder {
    pub fn use_(mut self, use_: impl IntoField<Code>) -> Self {
        self.use_ = use_.into_field();
        self
    }

    pub fn type_(mut self, type_: impl IntoField<CodeableConcept>) -> Self {
        self.type_ = type_.into_field();
        self
    }

    pub fn system(mut self, system: impl IntoField<Uri>) -> Self {
        self.system = system.into_field();
        self
    }

    pub fn value(mut self, value: impl IntoField<FhirString>) -> Self {
        self.value = value.into_field();
        self
    }

    pub fn period(mut self, period: impl IntoField<Period>) -> Self {
        self.period = period.into_field();
        self
    }

    pub fn assigner(mut self, assigner: impl IntoField<Reference>) -> Self {
        self.assigner = assigner.into_field();
        self
    }
}

impl From<&Identifier> for IdentifierBuilder {
    fn from(identifier: &Identifier) -> Self {
        Self {
            element: ElementStage::from_base(&identifier.element),
            use_: identifier.use_.clone().map(Ok),
            type_: identifier.type_.clone().map(Ok),
            system: identifier.system.clone().map(Ok),
            value: identifier.value.clone().map(Ok),
            period: identifier.period.clone().map(Ok),
            assigner: identifier.assigner.clone().map(Ok),
        }
    }
}

impl ElementBuilder for IdentifierBuilder {
    fn element_stage(&mut self) -> &mut ElementStage {
        &mut self.element
    }
}

impl Builder for IdentifierBuilder {
    type Output = Identifier;

    fn assemble(self, config: &ModelConfig) -> Result<Identifier> {
        let identifier = Identifier {
            element: self.element.finish()?,
            use_: validation::optional("use", self.use_)?,
            type_: validation::optional("type", self.type_)?,
            system: validation::optional("system", self.system)?,
            value: validation::optional("value", self.value)?,
            period: validation::optional("period", self.period)?,
            assigner: validation::optional("assigner", self.assigner)?,
        };
        validation::check_reference_type(
            "assigner",
            identifier.assigner.as_ref(),
            &["Organization"],
            config,
        )?;
        validation::require_value_or_children(&identifier)?;
        Ok(identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, ViolationKind};

    #[test]
    fn test_assigner_must_be_organization() {
        let assigner = Reference::builder()
            .reference("Patient/1")
            .build()
            .expect("reference builds");
        let err = Identifier::builder()
            .value("12345")
            .assigner(assigner)
            .build()
            .expect_err("patient cannot assign identifiers");
        assert_eq!(err.kind(), ViolationKind::InvalidReferenceTargetType);
        assert_eq!(err.field(), Some("assigner"));
    }

    #[test]
    fn test_bad_system_literal_surfaces_at_build() {
        let err = Identifier::builder()
            .system("not a uri")
            .build()
            .expect_err("uri cannot contain spaces");
        match err {
            Error::InvalidPrimitiveValue { field, type_name, .. } => {
                assert_eq!(field, "system");
                assert_eq!(type_name, "uri");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

use crate::builder::{append, replace, restage, Builder, IntoField, Staged, StagedList};
use crate::config::ModelConfig;
use crate::error::Result;
use crate::node::{Element, ElementBase, ElementBuilder, ElementStage};
use crate::primitive::{Boolean, Code, FhirString, Uri};
use crate::validation;
use crate::value::FhirType;
use crate::visitor::{accept_field, accept_list, NodeKind, Visitable, Visitor};

/// A reference to a code defined by a terminology system
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coding {
    element: ElementBase,
    system: Option<Uri>,
    version: Option<FhirString>,
    code: Option<Code>,
    display: Option<FhirString>,
    user_selected: Option<Boolean>,
}

impl Coding {
    pub fn builder() -> CodingBuilder {
        CodingBuilder::default()
    }

    pub fn to_builder(&self) -> CodingBuilder {
        CodingBuilder::from(self)
    }

    pub fn system(&self) -> Option<&Uri> {
        self.system.as_ref()
    }

    pub fn version(&self) -> Option<&FhirString> {
        self.version.as_ref()
    }

    pub fn code(&self) -> Option<&Code> {
        self.code.as_ref()
    }

    pub fn display(&self) -> Option<&FhirString> {
        self.display.as_ref()
    }

    pub fn user_selected(&self) -> Option<&Boolean> {
        self.user_selected.as_ref()
    }

    /// Whether this coding has the given system and code values.
    pub fn is(&self, system: &str, code: &str) -> bool {
        self.system.as_ref().and_then(|s| s.value()).map(String::as_str) == Some(system)
            && self.code.as_ref().and_then(|c| c.value()).map(String::as_str) == Some(code)
    }
}

impl FhirType for Coding {
    const TYPE_NAME: &'static str = "Coding";
}

impl Visitable for Coding {
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
        accept_field("system", self.system.as_ref(), visitor);
        accept_field("version", self.version.as_ref(), visitor);
        accept_field("code", self.code.as_ref(), visitor);
        accept_field("display", self.display.as_ref(), visitor);
        accept_field("userSelected", self.user_selected.as_ref(), visitor);
    }
}

impl Element for Coding {
    fn element(&self) -> &ElementBase {
        &self.element
    }
}

#[derive(Debug, Clone, Default)]
pub struct CodingBuilder {
    element: ElementStage,
    system: Staged<Uri>,
    version: Staged<FhirString>,
    code: Staged<Code>,
    display: Staged<FhirString>,
    user_selected: Staged<Boolean>,
}

impl CodingBuilder {
    pub fn system(mut self, system: impl IntoField<Uri>) -> Self {
        self.system = system.into_field();
        self
    }

    pub fn version(mut self, version: impl IntoField<FhirString>) -> Self {
        self.version = version.into_field();
        self
    }

    pub fn code(mut self, code: impl IntoField<Code>) -> Self {
        self.code = code.into_field();
        self
    }

    pub fn display(mut self, display: impl IntoField<FhirString>) -> Self {
        self.display = display.into_field();
        self
    }

    pub fn user_selected(mut self, user_selected: impl IntoField<Boolean>) -> Self {
        self.user_selected = user_selected.into_field();
        self
    }
}

impl From<&Coding> for CodingBuilder {
    fn from(coding: &Coding) -> Self {
        Self {
            element: ElementStage::from_base(&coding.element),
            system: coding.system.clone().map(Ok),
            version: coding.version.clone().map(Ok),
            code: coding.code.clone().map(Ok),
            display: coding.display.clone().map(Ok),
            user_selected: coding.user_selected.clone().map(Ok),
        }
    }
}

impl ElementBuilder for CodingBuilder {
    fn element_stage(&mut self) -> &mut ElementStage {
        &mut self.element
    }
}

impl Builder for CodingBuilder {
    type Output = Coding;

    fn assemble(self, _config: &ModelConfig) -> Result<Coding> {
        let coding = Coding {
            element: self.element.finish()?,
            system: validation::optional("system", self.system)?,
            version: validation::optional("version", self.version)?,
            code: validation::optional("code", self.code)?,
            display: validation::optional("display", self.display)?,
            user_selected: validation::optional("userSelected", self.user_selected)?,
        };
        validation::require_value_or_children(&coding)?;
        Ok(coding)
    }
}

/// Concept - reference to a terminology or just text
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CodeableConcept {
    element: ElementBase,
    coding: Vec<Coding>,
    text: Option<FhirString>,
}

impl CodeableConcept {
    pub fn builder() -> CodeableConceptBuilder {
        CodeableConceptBuilder::default()
    }

    pub fn to_builder(&self) -> CodeableConceptBuilder {
        CodeableConceptBuilder::from(self)
    }

    pub fn coding(&self) -> &[Coding] {
        &self.coding
    }

    pub fn text(&self) -> Option<&FhirString> {
        self.text.as_ref()
    }

    pub fn has_coding(&self, system: &str, code: &str) -> bool {
        self.coding.iter().any(|c| c.is(system, code))
    }
}

impl FhirType for CodeableConcept {
    const TYPE_NAME: &'static str = "CodeableConcept";
}

impl Visitable for CodeableConcept {
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
        accept_list("coding", &self.coding, visitor);
        accept_field("text", self.text.as_ref(), visitor);
    }
}

impl Element for CodeableConcept {
    fn element(&self) -> &ElementBase {
        &self.element
    }
}

#[derive(Debug, Clone, Default)]
pub struct CodeableConceptBuilder {
    element: ElementStage,
    coding: StagedList<Coding>,
    text: Staged<FhirString>,
}

impl CodeableConceptBuilder {
    pub fn coding<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<Coding>,
    {
        append(&mut self.coding, items);
        self
    }

    pub fn set_coding<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<Coding>,
    {
        replace(&mut self.coding, items);
        self
    }

    pub fn text(mut self, text: impl IntoField<FhirString>) -> Self {
        self.text = text.into_field();
        self
    }
}

impl From<&CodeableConcept> for CodeableConceptBuilder {
    fn from(concept: &CodeableConcept) -> Self {
        Self {
            element: ElementStage::from_base(&concept.element),
            coding: restage(&concept.coding),
            text: concept.text.clone().map(Ok),
        }
    }
}

impl ElementBuilder for CodeableConceptBuilder {
    fn element_stage(&mut self) -> &mut ElementStage {
        &mut self.element
    }
}

impl Builder for CodeableConceptBuilder {
    type Output = CodeableConcept;

    fn assemble(self, _config: &ModelConfig) -> Result<CodeableConcept> {
        let concept = CodeableConcept {
            element: self.element.finish()?,
            coding: validation::check_list("coding", self.coding)?,
            text: validation::optional("text", self.text)?,
        };
        validation::require_value_or_children(&concept)?;
        Ok(concept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ViolationKind;

    fn loinc(code: &str) -> Coding {
        Coding::builder()
            .system("http://loinc.org")
            .code(code)
            .build()
            .expect("coding builds")
    }

    #[test]
    fn test_coding_lookup() {
        let concept = CodeableConcept::builder()
            .coding([loinc("29463-7")])
            .text("Body weight")
            .build()
            .expect("concept builds");
        assert!(concept.has_coding("http://loinc.org", "29463-7"));
        assert!(!concept.has_coding("http://snomed.info/sct", "29463-7"));
    }

    #[test]
    fn test_append_and_replace() {
        let concept = CodeableConcept::builder()
            .coding([loinc("1")])
            .coding([loinc("2")])
            .build()
            .expect("concept builds");
        assert_eq!(concept.coding().len(), 2);

        let replaced = concept
            .to_builder()
            .set_coding([loinc("3")])
            .build()
            .expect("concept builds");
        assert_eq!(replaced.coding(), &[loinc("3")]);
    }

    #[test]
    fn test_null_coding_is_rejected() {
        let err = CodeableConcept::builder()
            .coding([Some(loinc("1")), None])
            .build()
            .expect_err("null entry");
        assert_eq!(err.kind(), ViolationKind::NullElementInList);
    }

    #[test]
    fn test_empty_concept_is_rejected() {
        let err = CodeableConcept::builder().build().expect_err("empty");
        assert_eq!(err.kind(), ViolationKind::EmptyNode);
    }
}

//! Observation resource

use ferrum_core::builder::{append, replace, restage, restage_one, Builder, IntoField, Staged, StagedList};
use ferrum_core::node::{BackboneElementBase, BackboneStage, DomainResourceBase, DomainResourceStage};
use ferrum_core::visitor::{accept_choice, accept_field, accept_list, NodeKind, Visitable, Visitor};
use ferrum_core::{
    choice, validation, Boolean, Code, CodeableConcept, DateTime, FhirString, FhirType,
    Identifier, Instant, Integer, ModelConfig, Period, Quantity, Reference, Result, Value,
};

use crate::AnyResource;

const SUBJECT_TARGETS: &[&str] = &["Patient", "Group", "Device", "Location"];
const FOCUS_TARGETS: &[&str] = &["Resource"];
const PERFORMER_TARGETS: &[&str] = &[
    "Practitioner",
    "PractitionerRole",
    "Organization",
    "CareTeam",
    "Patient",
    "RelatedPerson",
];
const HAS_MEMBER_TARGETS: &[&str] =
    &["Observation", "QuestionnaireResponse", "MolecularSequence"];

choice! {
    /// Clinically relevant time/time-period for the observation
    pub enum ObservationEffective {
        DateTime(DateTime),
        Period(Period),
        Instant(Instant),
    }
}

choice! {
    /// Actual result
    pub enum ObservationValue {
        Quantity(Quantity),
        CodeableConcept(CodeableConcept),
        String(FhirString),
        Boolean(Boolean),
        Integer(Integer),
        DateTime(DateTime),
        Period(Period),
    }
}

/// Measurements and simple assertions made about a patient, device or other
/// subject.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Observation {
    domain: DomainResourceBase<AnyResource>,
    identifier: Vec<Identifier>,
    /// registered | preliminary | final | amended +
    status: Code,
    category: Vec<CodeableConcept>,
    code: CodeableConcept,
    subject: Option<Reference>,
    focus: Vec<Reference>,
    effective: Option<ObservationEffective>,
    issued: Option<Instant>,
    performer: Vec<Reference>,
    value: Option<ObservationValue>,
    data_absent_reason: Option<CodeableConcept>,
    interpretation: Vec<CodeableConcept>,
    has_member: Vec<Reference>,
    component: Vec<ObservationComponent>,
}

impl Observation {
    pub fn builder() -> ObservationBuilder {
        ObservationBuilder::default()
    }

    pub fn to_builder(&self) -> ObservationBuilder {
        ObservationBuilder::from(self)
    }

    pub fn identifier(&self) -> &[Identifier] {
        &self.identifier
    }

    pub fn status(&self) -> &Code {
        &self.status
    }

    pub fn category(&self) -> &[CodeableConcept] {
        &self.category
    }

    pub fn code(&self) -> &CodeableConcept {
        &self.code
    }

    pub fn subject(&self) -> Option<&Reference> {
        self.subject.as_ref()
    }

    pub fn focus(&self) -> &[Reference] {
        &self.focus
    }

    pub fn effective(&self) -> Option<&ObservationEffective> {
        self.effective.as_ref()
    }

    pub fn issued(&self) -> Option<&Instant> {
        self.issued.as_ref()
    }

    pub fn performer(&self) -> &[Reference] {
        &self.performer
    }

    pub fn value(&self) -> Option<&ObservationValue> {
        self.value.as_ref()
    }

    pub fn data_absent_reason(&self) -> Option<&CodeableConcept> {
        self.data_absent_reason.as_ref()
    }

    pub fn interpretation(&self) -> &[CodeableConcept] {
        &self.interpretation
    }

    pub fn has_member(&self) -> &[Reference] {
        &self.has_member
    }

    pub fn component(&self) -> &[ObservationComponent] {
        &self.component
    }
}

domain_resource_type!(Observation, ObservationBuilder, "Observation");

impl Visitable for Observation {
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
        accept_list("identifier", &self.identifier, visitor);
        accept_field("status", Some(&self.status), visitor);
        accept_list("category", &self.category, visitor);
        accept_field("code", Some(&self.code), visitor);
        accept_field("subject", self.subject.as_ref(), visitor);
        accept_list("focus", &self.focus, visitor);
        accept_choice("effective", self.effective.as_ref(), visitor);
        accept_field("issued", self.issued.as_ref(), visitor);
        accept_list("performer", &self.performer, visitor);
        accept_choice("value", self.value.as_ref(), visitor);
        accept_field("dataAbsentReason", self.data_absent_reason.as_ref(), visitor);
        accept_list("interpretation", &self.interpretation, visitor);
        accept_list("hasMember", &self.has_member, visitor);
        accept_list("component", &self.component, visitor);
    }
}

#[derive(Debug, Clone, Default)]
pub struct ObservationBuilder {
    domain: DomainResourceStage<AnyResource>,
    identifier: StagedList<Identifier>,
    status: Staged<Code>,
    category: StagedList<CodeableConcept>,
    code: Staged<CodeableConcept>,
    subject: Staged<Reference>,
    focus: StagedList<Reference>,
    effective: Staged<Value>,
    issued: Staged<Instant>,
    performer: StagedList<Reference>,
    value: Staged<Value>,
    data_absent_reason: Staged<CodeableConcept>,
    interpretation: StagedList<CodeableConcept>,
    has_member: StagedList<Reference>,
    component: StagedList<ObservationComponent>,
}

impl ObservationBuilder {
    pub fn identifier<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<Identifier>,
    {
        append(&mut self.identifier, items);
        self
    }

    pub fn set_identifier<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<Identifier>,
    {
        replace(&mut self.identifier, items);
        self
    }

    pub fn status(mut self, status: impl IntoField<Code>) -> Self {
        self.status = status.into_field();
        self
    }

    pub fn category<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<CodeableConcept>,
    {
        append(&mut self.category, items);
        self
    }

    pub fn set_category<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<CodeableConcept>,
    {
        replace(&mut self.category, items);
        self
    }

    pub fn code(mut self, code: impl IntoField<CodeableConcept>) -> Self {
        self.code = code.into_field();
        self
    }

    pub fn subject(mut self, subject: impl IntoField<Reference>) -> Self {
        self.subject = subject.into_field();
        self
    }

    pub fn focus<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<Reference>,
    {
        append(&mut self.focus, items);
        self
    }

    pub fn set_focus<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<Reference>,
    {
        replace(&mut self.focus, items);
        self
    }

    /// `dateTime`, `Period` or `instant`
    pub fn effective(mut self, effective: impl IntoField<Value>) -> Self {
        self.effective = effective.into_field();
        self
    }

    pub fn issued(mut self, issued: impl IntoField<Instant>) -> Self {
        self.issued = issued.into_field();
        self
    }

    pub fn performer<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<Reference>,
    {
        append(&mut self.performer, items);
        self
    }

    pub fn set_performer<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<Reference>,
    {
        replace(&mut self.performer, items);
        self
    }

    pub fn value(mut self, value: impl IntoField<Value>) -> Self {
        self.value = value.into_field();
        self
    }

    pub fn data_absent_reason(mut self, reason: impl IntoField<CodeableConcept>) -> Self {
        self.data_absent_reason = reason.into_field();
        self
    }

    pub fn interpretation<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<CodeableConcept>,
    {
        append(&mut self.interpretation, items);
        self
    }

    pub fn set_interpretation<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<CodeableConcept>,
    {
        replace(&mut self.interpretation, items);
        self
    }

    pub fn has_member<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<Reference>,
    {
        append(&mut self.has_member, items);
        self
    }

    pub fn set_has_member<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<Reference>,
    {
        replace(&mut self.has_member, items);
        self
    }

    pub fn component<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<ObservationComponent>,
    {
        append(&mut self.component, items);
        self
    }

    pub fn set_component<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<ObservationComponent>,
    {
        replace(&mut self.component, items);
        self
    }
}

impl From<&Observation> for ObservationBuilder {
    fn from(observation: &Observation) -> Self {
        Self {
            domain: DomainResourceStage::from_base(&observation.domain),
            identifier: restage(&observation.identifier),
            status: restage_one(Some(&observation.status)),
            category: restage(&observation.category),
            code: restage_one(Some(&observation.code)),
            subject: restage_one(observation.subject.as_ref()),
            focus: restage(&observation.focus),
            effective: observation.effective.clone().map(|e| Ok(e.into())),
            issued: restage_one(observation.issued.as_ref()),
            performer: restage(&observation.performer),
            value: observation.value.clone().map(|v| Ok(v.into())),
            data_absent_reason: restage_one(observation.data_absent_reason.as_ref()),
            interpretation: restage(&observation.interpretation),
            has_member: restage(&observation.has_member),
            component: restage(&observation.component),
        }
    }
}

impl Builder for ObservationBuilder {
    type Output = Observation;

    fn assemble(self, config: &ModelConfig) -> Result<Observation> {
        let observation = Observation {
            domain: self.domain.finish()?,
            identifier: validation::check_list("identifier", self.identifier)?,
            status: validation::require("status", self.status)?,
            category: validation::check_list("category", self.category)?,
            code: validation::require("code", self.code)?,
            subject: validation::optional("subject", self.subject)?,
            focus: validation::check_list("focus", self.focus)?,
            effective: validation::check_choice("effective", self.effective)?,
            issued: validation::optional("issued", self.issued)?,
            performer: validation::check_list("performer", self.performer)?,
            value: validation::check_choice("value", self.value)?,
            data_absent_reason: validation::optional(
                "dataAbsentReason",
                self.data_absent_reason,
            )?,
            interpretation: validation::check_list("interpretation", self.interpretation)?,
            has_member: validation::check_list("hasMember", self.has_member)?,
            component: validation::check_list("component", self.component)?,
        };
        validation::check_reference_type(
            "subject",
            observation.subject.as_ref(),
            SUBJECT_TARGETS,
            config,
        )?;
        validation::check_reference_types("focus", &observation.focus, FOCUS_TARGETS, config)?;
        validation::check_reference_types(
            "performer",
            &observation.performer,
            PERFORMER_TARGETS,
            config,
        )?;
        validation::check_reference_types(
            "hasMember",
            &observation.has_member,
            HAS_MEMBER_TARGETS,
            config,
        )?;
        Ok(observation)
    }
}

// ============================================================================
// Observation.component
// ============================================================================

/// Component results, e.g. the systolic and diastolic parts of a blood
/// pressure.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObservationComponent {
    backbone: BackboneElementBase,
    code: CodeableConcept,
    value: Option<ObservationValue>,
    data_absent_reason: Option<CodeableConcept>,
    interpretation: Vec<CodeableConcept>,
}

impl ObservationComponent {
    pub fn builder() -> ObservationComponentBuilder {
        ObservationComponentBuilder::default()
    }

    pub fn to_builder(&self) -> ObservationComponentBuilder {
        ObservationComponentBuilder::from(self)
    }

    pub fn code(&self) -> &CodeableConcept {
        &self.code
    }

    pub fn value(&self) -> Option<&ObservationValue> {
        self.value.as_ref()
    }

    pub fn data_absent_reason(&self) -> Option<&CodeableConcept> {
        self.data_absent_reason.as_ref()
    }

    pub fn interpretation(&self) -> &[CodeableConcept] {
        &self.interpretation
    }
}

backbone_type!(
    ObservationComponent,
    ObservationComponentBuilder,
    "Observation.component"
);

impl Visitable for ObservationComponent {
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
        accept_field("code", Some(&self.code), visitor);
        accept_choice("value", self.value.as_ref(), visitor);
        accept_field("dataAbsentReason", self.data_absent_reason.as_ref(), visitor);
        accept_list("interpretation", &self.interpretation, visitor);
    }
}

#[derive(Debug, Clone, Default)]
pub struct ObservationComponentBuilder {
    backbone: BackboneStage,
    code: Staged<CodeableConcept>,
    value: Staged<Value>,
    data_absent_reason: Staged<CodeableConcept>,
    interpretation: StagedList<CodeableConcept>,
}

impl ObservationComponentBuilder {
    pub fn code(mut self, code: impl IntoField<CodeableConcept>) -> Self {
        self.code = code.into_field();
        self
    }

    pub fn value(mut self, value: impl IntoField<Value>) -> Self {
        self.value = value.into_field();
        self
    }

    pub fn data_absent_reason(mut self, reason: impl IntoField<CodeableConcept>) -> Self {
        self.data_absent_reason = reason.into_field();
        self
    }

    pub fn interpretation<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<CodeableConcept>,
    {
        append(&mut self.interpretation, items);
        self
    }

    pub fn set_interpretation<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<CodeableConcept>,
    {
        replace(&mut self.interpretation, items);
        self
    }
}

impl From<&ObservationComponent> for ObservationComponentBuilder {
    fn from(component: &ObservationComponent) -> Self {
        Self {
            backbone: BackboneStage::from_base(&component.backbone),
            code: restage_one(Some(&component.code)),
            value: component.value.clone().map(|v| Ok(v.into())),
            data_absent_reason: restage_one(component.data_absent_reason.as_ref()),
            interpretation: restage(&component.interpretation),
        }
    }
}

impl Builder for ObservationComponentBuilder {
    type Output = ObservationComponent;

    fn assemble(self, _config: &ModelConfig) -> Result<ObservationComponent> {
        let component = ObservationComponent {
            backbone: self.backbone.finish()?,
            code: validation::require("code", self.code)?,
            value: validation::check_choice("value", self.value)?,
            data_absent_reason: validation::optional(
                "dataAbsentReason",
                self.data_absent_reason,
            )?,
            interpretation: validation::check_list("interpretation", self.interpretation)?,
        };
        validation::require_value_or_children(&component)?;
        Ok(component)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferrum_core::prelude::*;
    use ferrum_core::{Coding, Error};

    fn weight_code() -> CodeableConcept {
        CodeableConcept::builder()
            .coding([Coding::builder()
                .system("http://loinc.org")
                .code("29463-7")
                .build()
                .expect("coding builds")])
            .build()
            .expect("concept builds")
    }

    #[test]
    fn test_status_then_code_required() {
        let err = Observation::builder()
            .code(weight_code())
            .build()
            .expect_err("status missing");
        assert_eq!(
            err,
            Error::MissingRequiredField {
                field: "Observation.status".to_string()
            }
        );

        let err = Observation::builder()
            .status("final")
            .build()
            .expect_err("code missing");
        assert_eq!(err.field(), Some("code"));
    }

    #[test]
    fn test_value_choice_narrowing() {
        let observation = Observation::builder()
            .status("final")
            .code(weight_code())
            .value("positive")
            .build()
            .expect("string value");
        assert!(matches!(observation.value(), Some(ObservationValue::String(_))));

        let id = ferrum_core::Id::new("abc").expect("valid id");
        let err = Observation::builder()
            .status("final")
            .code(weight_code())
            .value(id)
            .build()
            .expect_err("id is not an observation value");
        assert_eq!(err.kind(), ViolationKind::InvalidChoiceType);
        assert_eq!(err.field(), Some("value"));
    }

    #[test]
    fn test_focus_admits_any_resource_type() {
        let focus = Reference::builder()
            .reference("Medication/m1")
            .build()
            .expect("reference builds");
        let observation = Observation::builder()
            .status("final")
            .code(weight_code())
            .focus([focus])
            .build()
            .expect("any resource is a valid focus");
        assert_eq!(observation.focus().len(), 1);
    }

    #[test]
    fn test_component_requires_code() {
        let err = ObservationComponent::builder()
            .value(120)
            .build()
            .expect_err("code missing");
        assert_eq!(err.field(), Some("code"));

        let component = ObservationComponent::builder()
            .code(weight_code())
            .value(120)
            .build()
            .expect("component builds");
        assert!(matches!(component.value(), Some(ObservationValue::Integer(_))));
    }
}

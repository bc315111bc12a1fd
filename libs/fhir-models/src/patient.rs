//! Patient resource

use ferrum_core::builder::{append, replace, restage, restage_one, Builder, IntoField, Staged, StagedList};
use ferrum_core::node::{BackboneElementBase, BackboneStage, DomainResourceBase, DomainResourceStage};
use ferrum_core::visitor::{accept_choice, accept_field, accept_list, NodeKind, Visitable, Visitor};
use ferrum_core::{
    choice, validation, Boolean, Code, CodeableConcept, Date, DateTime, FhirType, Identifier,
    ModelConfig, Period, Reference, Result, Value,
};

use crate::{AnyResource, HumanName};

const CONTACT_ORGANIZATION_TARGETS: &[&str] = &["Organization"];
const GENERAL_PRACTITIONER_TARGETS: &[&str] = &["Organization", "Practitioner", "PractitionerRole"];
const MANAGING_ORGANIZATION_TARGETS: &[&str] = &["Organization"];

choice! {
    /// Indicates if the individual is deceased or not
    pub enum PatientDeceased {
        Boolean(Boolean),
        DateTime(DateTime),
    }
}

/// Demographics and other administrative information about an individual
/// receiving care or other health-related services.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Patient {
    domain: DomainResourceBase<AnyResource>,
    identifier: Vec<Identifier>,
    active: Option<Boolean>,
    name: Vec<HumanName>,
    /// male | female | other | unknown
    gender: Option<Code>,
    birth_date: Option<Date>,
    deceased: Option<PatientDeceased>,
    contact: Vec<PatientContact>,
    general_practitioner: Vec<Reference>,
    managing_organization: Option<Reference>,
}

impl Patient {
    pub fn builder() -> PatientBuilder {
        PatientBuilder::default()
    }

    pub fn to_builder(&self) -> PatientBuilder {
        PatientBuilder::from(self)
    }

    pub fn identifier(&self) -> &[Identifier] {
        &self.identifier
    }

    pub fn active(&self) -> Option<&Boolean> {
        self.active.as_ref()
    }

    pub fn name(&self) -> &[HumanName] {
        &self.name
    }

    pub fn gender(&self) -> Option<&Code> {
        self.gender.as_ref()
    }

    pub fn birth_date(&self) -> Option<&Date> {
        self.birth_date.as_ref()
    }

    pub fn deceased(&self) -> Option<&PatientDeceased> {
        self.deceased.as_ref()
    }

    pub fn contact(&self) -> &[PatientContact] {
        &self.contact
    }

    pub fn general_practitioner(&self) -> &[Reference] {
        &self.general_practitioner
    }

    pub fn managing_organization(&self) -> Option<&Reference> {
        self.managing_organization.as_ref()
    }
}

domain_resource_type!(Patient, PatientBuilder, "Patient");

impl Visitable for Patient {
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
        accept_field("active", self.active.as_ref(), visitor);
        accept_list("name", &self.name, visitor);
        accept_field("gender", self.gender.as_ref(), visitor);
        accept_field("birthDate", self.birth_date.as_ref(), visitor);
        accept_choice("deceased", self.deceased.as_ref(), visitor);
        accept_list("contact", &self.contact, visitor);
        accept_list("generalPractitioner", &self.general_practitioner, visitor);
        accept_field(
            "managingOrganization",
            self.managing_organization.as_ref(),
            visitor,
        );
    }
}

#[derive(Debug, Clone, Default)]
pub struct PatientBuilder {
    domain: DomainResourceStage<AnyResource>,
    identifier: StagedList<Identifier>,
    active: Staged<Boolean>,
    name: StagedList<HumanName>,
    gender: Staged<Code>,
    birth_date: Staged<Date>,
    deceased: Staged<Value>,
    contact: StagedList<PatientContact>,
    general_practitioner: StagedList<Reference>,
    managing_organization: Staged<Reference>,
}

impl PatientBuilder {
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

    pub fn active(mut self, active: impl IntoField<Boolean>) -> Self {
        self.active = active.into_field();
        self
    }

    pub fn name<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<HumanName>,
    {
        append(&mut self.name, items);
        self
    }

    pub fn set_name<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<HumanName>,
    {
        replace(&mut self.name, items);
        self
    }

    pub fn gender(mut self, gender: impl IntoField<Code>) -> Self {
        self.gender = gender.into_field();
        self
    }

    pub fn birth_date(mut self, birth_date: impl IntoField<Date>) -> Self {
        self.birth_date = birth_date.into_field();
        self
    }

    /// Accepts a `boolean` or a `dateTime`; anything else fails at build.
    pub fn deceased(mut self, deceased: impl IntoField<Value>) -> Self {
        self.deceased = deceased.into_field();
        self
    }

    pub fn contact<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<PatientContact>,
    {
        append(&mut self.contact, items);
        self
    }

    pub fn set_contact<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<PatientContact>,
    {
        replace(&mut self.contact, items);
        self
    }

    pub fn general_practitioner<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<Reference>,
    {
        append(&mut self.general_practitioner, items);
        self
    }

    pub fn set_general_practitioner<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<Reference>,
    {
        replace(&mut self.general_practitioner, items);
        self
    }

    pub fn managing_organization(mut self, reference: impl IntoField<Reference>) -> Self {
        self.managing_organization = reference.into_field();
        self
    }
}

impl From<&Patient> for PatientBuilder {
    fn from(patient: &Patient) -> Self {
        Self {
            domain: DomainResourceStage::from_base(&patient.domain),
            identifier: restage(&patient.identifier),
            active: restage_one(patient.active.as_ref()),
            name: restage(&patient.name),
            gender: restage_one(patient.gender.as_ref()),
            birth_date: restage_one(patient.birth_date.as_ref()),
            deceased: patient.deceased.clone().map(|d| Ok(d.into())),
            contact: restage(&patient.contact),
            general_practitioner: restage(&patient.general_practitioner),
            managing_organization: restage_one(patient.managing_organization.as_ref()),
        }
    }
}

impl Builder for PatientBuilder {
    type Output = Patient;

    fn assemble(self, config: &ModelConfig) -> Result<Patient> {
        let patient = Patient {
            domain: self.domain.finish()?,
            identifier: validation::check_list("identifier", self.identifier)?,
            active: validation::optional("active", self.active)?,
            name: validation::check_list("name", self.name)?,
            gender: validation::optional("gender", self.gender)?,
            birth_date: validation::optional("birthDate", self.birth_date)?,
            deceased: validation::check_choice("deceased", self.deceased)?,
            contact: validation::check_list("contact", self.contact)?,
            general_practitioner: validation::check_list(
                "generalPractitioner",
                self.general_practitioner,
            )?,
            managing_organization: validation::optional(
                "managingOrganization",
                self.managing_organization,
            )?,
        };
        validation::check_reference_types(
            "generalPractitioner",
            &patient.general_practitioner,
            GENERAL_PRACTITIONER_TARGETS,
            config,
        )?;
        validation::check_reference_type(
            "managingOrganization",
            patient.managing_organization.as_ref(),
            MANAGING_ORGANIZATION_TARGETS,
            config,
        )?;
        Ok(patient)
    }
}

// ============================================================================
// Patient.contact
// ============================================================================

/// A contact party (guardian, partner, friend) for the patient
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PatientContact {
    backbone: BackboneElementBase,
    relationship: Vec<CodeableConcept>,
    name: Option<HumanName>,
    gender: Option<Code>,
    organization: Option<Reference>,
    period: Option<Period>,
}

impl PatientContact {
    pub fn builder() -> PatientContactBuilder {
        PatientContactBuilder::default()
    }

    pub fn to_builder(&self) -> PatientContactBuilder {
        PatientContactBuilder::from(self)
    }

    pub fn relationship(&self) -> &[CodeableConcept] {
        &self.relationship
    }

    pub fn name(&self) -> Option<&HumanName> {
        self.name.as_ref()
    }

    pub fn gender(&self) -> Option<&Code> {
        self.gender.as_ref()
    }

    pub fn organization(&self) -> Option<&Reference> {
        self.organization.as_ref()
    }

    pub fn period(&self) -> Option<&Period> {
        self.period.as_ref()
    }
}

backbone_type!(PatientContact, PatientContactBuilder, "Patient.contact");

impl Visitable for PatientContact {
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
        accept_list("relationship", &self.relationship, visitor);
        accept_field("name", self.name.as_ref(), visitor);
        accept_field("gender", self.gender.as_ref(), visitor);
        accept_field("organization", self.organization.as_ref(), visitor);
        accept_field("period", self.period.as_ref(), visitor);
    }
}

#[derive(Debug, Clone, Default)]
pub struct PatientContactBuilder {
    backbone: BackboneStage,
    relationship: StagedList<CodeableConcept>,
    name: Staged<HumanName>,
    gender: Staged<Code>,
    organization: Staged<Reference>,
    period: Staged<Period>,
}

impl PatientContactBuilder {
    pub fn relationship<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<CodeableConcept>,
    {
        append(&mut self.relationship, items);
        self
    }

    pub fn set_relationship<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<CodeableConcept>,
    {
        replace(&mut self.relationship, items);
        self
    }

    pub fn name(mut self, name: impl IntoField<HumanName>) -> Self {
        self.name = name.into_field();
        self
    }

    pub fn gender(mut self, gender: impl IntoField<Code>) -> Self {
        self.gender = gender.into_field();
        self
    }

    pub fn organization(mut self, organization: impl IntoField<Reference>) -> Self {
        self.organization = organization.into_field();
        self
    }

    pub fn period(mut self, period: impl IntoField<Period>) -> Self {
        self.period = period.into_field();
        self
    }
}

impl From<&PatientContact> for PatientContactBuilder {
    fn from(contact: &PatientContact) -> Self {
        Self {
            backbone: BackboneStage::from_base(&contact.backbone),
            relationship: restage(&contact.relationship),
            name: restage_one(contact.name.as_ref()),
            gender: restage_one(contact.gender.as_ref()),
            organization: restage_one(contact.organization.as_ref()),
            period: restage_one(contact.period.as_ref()),
        }
    }
}

impl Builder for PatientContactBuilder {
    type Output = PatientContact;

    fn assemble(self, config: &ModelConfig) -> Result<PatientContact> {
        let contact = PatientContact {
            backbone: self.backbone.finish()?,
            relationship: validation::check_list("relationship", self.relationship)?,
            name: validation::optional("name", self.name)?,
            gender: validation::optional("gender", self.gender)?,
            organization: validation::optional("organization", self.organization)?,
            period: validation::optional("period", self.period)?,
        };
        validation::check_reference_type(
            "organization",
            contact.organization.as_ref(),
            CONTACT_ORGANIZATION_TARGETS,
            config,
        )?;
        validation::require_value_or_children(&contact)?;
        Ok(contact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferrum_core::prelude::*;
    use ferrum_core::Error;

    fn reference(literal: &str) -> Reference {
        Reference::builder()
            .reference(literal)
            .build()
            .expect("reference builds")
    }

    #[test]
    fn test_deceased_accepts_boolean_and_date_time() {
        let patient = Patient::builder()
            .deceased(true)
            .build()
            .expect("boolean deceased");
        assert!(matches!(
            patient.deceased(),
            Some(PatientDeceased::Boolean(b)) if b.is_true()
        ));

        let dt = DateTime::new("2015-02-07T13:28:17-05:00").expect("valid dateTime");
        let patient = Patient::builder()
            .deceased(dt.clone())
            .build()
            .expect("dateTime deceased");
        assert_eq!(patient.deceased(), Some(&PatientDeceased::DateTime(dt)));
    }

    #[test]
    fn test_deceased_rejects_other_types() {
        let err = Patient::builder()
            .deceased(42)
            .build()
            .expect_err("integer is not allowed");
        assert_eq!(
            err,
            Error::InvalidChoiceType {
                field: "Patient.deceased".to_string(),
                found: "integer".to_string(),
                allowed: vec!["boolean".to_string(), "dateTime".to_string()],
            }
        );
    }

    #[test]
    fn test_general_practitioner_targets() {
        let patient = Patient::builder()
            .general_practitioner([reference("Practitioner/1"), reference("Organization/2")])
            .build()
            .expect("allowed targets");
        assert_eq!(patient.general_practitioner().len(), 2);

        let err = Patient::builder()
            .general_practitioner([reference("Practitioner/1"), reference("Patient/2")])
            .build()
            .expect_err("patient is not a practitioner");
        assert_eq!(err.kind(), ViolationKind::InvalidReferenceTargetType);
        assert_eq!(err.field(), Some("generalPractitioner"));
    }

    #[test]
    fn test_empty_contact_is_rejected() {
        let err = PatientContact::builder().build().expect_err("no content");
        assert_eq!(
            err,
            Error::EmptyNode {
                type_name: "Patient.contact".to_string()
            }
        );

        let contact = PatientContact::builder()
            .gender("female")
            .build()
            .expect("contact with gender");
        assert!(contact.has_children());
    }

    #[test]
    fn test_contact_organization_target() {
        let err = PatientContact::builder()
            .organization(reference("Practitioner/1"))
            .build()
            .expect_err("organization only");
        assert_eq!(err.field(), Some("organization"));
    }
}

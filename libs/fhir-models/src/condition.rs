//! Condition resource

use ferrum_core::builder::{append, replace, restage, restage_one, Builder, IntoField, Staged, StagedList};
use ferrum_core::node::{DomainResourceBase, DomainResourceStage};
use ferrum_core::visitor::{accept_choice, accept_field, accept_list, NodeKind, Visitable, Visitor};
use ferrum_core::{
    choice, validation, CodeableConcept, DateTime, FhirString, FhirType, Identifier,
    ModelConfig, Period, Reference, Result, Value,
};

use crate::AnyResource;

const SUBJECT_TARGETS: &[&str] = &["Patient", "Group"];
const RECORDER_TARGETS: &[&str] = &["Practitioner", "PractitionerRole", "Patient", "RelatedPerson"];
const ASSERTER_TARGETS: &[&str] = &["Practitioner", "PractitionerRole", "Patient", "RelatedPerson"];

choice! {
    /// Estimated or actual date, date-time, or age
    pub enum ConditionOnset {
        DateTime(DateTime),
        Period(Period),
        String(FhirString),
    }
}

choice! {
    /// When in resolution/remission
    pub enum ConditionAbatement {
        DateTime(DateTime),
        Period(Period),
        String(FhirString),
    }
}

/// A clinical condition, problem, diagnosis, or other event, situation, issue,
/// or clinical concept that has risen to a level of concern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Condition {
    domain: DomainResourceBase<AnyResource>,
    identifier: Vec<Identifier>,
    clinical_status: Option<CodeableConcept>,
    verification_status: Option<CodeableConcept>,
    category: Vec<CodeableConcept>,
    severity: Option<CodeableConcept>,
    code: Option<CodeableConcept>,
    body_site: Vec<CodeableConcept>,
    subject: Reference,
    onset: Option<ConditionOnset>,
    abatement: Option<ConditionAbatement>,
    recorded_date: Option<DateTime>,
    recorder: Option<Reference>,
    asserter: Option<Reference>,
}

impl Condition {
    pub fn builder() -> ConditionBuilder {
        ConditionBuilder::default()
    }

    pub fn to_builder(&self) -> ConditionBuilder {
        ConditionBuilder::from(self)
    }

    pub fn identifier(&self) -> &[Identifier] {
        &self.identifier
    }

    pub fn clinical_status(&self) -> Option<&CodeableConcept> {
        self.clinical_status.as_ref()
    }

    pub fn verification_status(&self) -> Option<&CodeableConcept> {
        self.verification_status.as_ref()
    }

    pub fn category(&self) -> &[CodeableConcept] {
        &self.category
    }

    pub fn severity(&self) -> Option<&CodeableConcept> {
        self.severity.as_ref()
    }

    pub fn code(&self) -> Option<&CodeableConcept> {
        self.code.as_ref()
    }

    pub fn body_site(&self) -> &[CodeableConcept] {
        &self.body_site
    }

    /// Who has the condition
    pub fn subject(&self) -> &Reference {
        &self.subject
    }

    pub fn onset(&self) -> Option<&ConditionOnset> {
        self.onset.as_ref()
    }

    pub fn abatement(&self) -> Option<&ConditionAbatement> {
        self.abatement.as_ref()
    }

    pub fn recorded_date(&self) -> Option<&DateTime> {
        self.recorded_date.as_ref()
    }

    pub fn recorder(&self) -> Option<&Reference> {
        self.recorder.as_ref()
    }

    pub fn asserter(&self) -> Option<&Reference> {
        self.asserter.as_ref()
    }
}

domain_resource_type!(Condition, ConditionBuilder, "Condition");

impl Visitable for Condition {
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
        accept_field("clinicalStatus", self.clinical_status.as_ref(), visitor);
        accept_field("verificationStatus", self.verification_status.as_ref(), visitor);
        accept_list("category", &self.category, visitor);
        accept_field("severity", self.severity.as_ref(), visitor);
        accept_field("code", self.code.as_ref(), visitor);
        accept_list("bodySite", &self.body_site, visitor);
        accept_field("subject", Some(&self.subject), visitor);
        accept_choice("onset", self.onset.as_ref(), visitor);
        accept_choice("abatement", self.abatement.as_ref(), visitor);
        accept_field("recordedDate", self.recorded_date.as_ref(), visitor);
        accept_field("recorder", self.recorder.as_ref(), visitor);
        accept_field("asserter", self.asserter.as_ref(), visitor);
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConditionBuilder {
    domain: DomainResourceStage<AnyResource>,
    identifier: StagedList<Identifier>,
    clinical_status: Staged<CodeableConcept>,
    verification_status: Staged<CodeableConcept>,
    category: StagedList<CodeableConcept>,
    severity: Staged<CodeableConcept>,
    code: Staged<CodeableConcept>,
    body_site: StagedList<CodeableConcept>,
    subject: Staged<Reference>,
    onset: Staged<Value>,
    abatement: Staged<Value>,
    recorded_date: Staged<DateTime>,
    recorder: Staged<Reference>,
    asserter: Staged<Reference>,
}

impl ConditionBuilder {
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

    pub fn clinical_status(mut self, status: impl IntoField<CodeableConcept>) -> Self {
        self.clinical_status = status.into_field();
        self
    }

    pub fn verification_status(mut self, status: impl IntoField<CodeableConcept>) -> Self {
        self.verification_status = status.into_field();
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

    pub fn severity(mut self, severity: impl IntoField<CodeableConcept>) -> Self {
        self.severity = severity.into_field();
        self
    }

    pub fn code(mut self, code: impl IntoField<CodeableConcept>) -> Self {
        self.code = code.into_field();
        self
    }

    pub fn body_site<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<CodeableConcept>,
    {
        append(&mut self.body_site, items);
        self
    }

    pub fn set_body_site<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<CodeableConcept>,
    {
        replace(&mut self.body_site, items);
        self
    }

    pub fn subject(mut self, subject: impl IntoField<Reference>) -> Self {
        self.subject = subject.into_field();
        self
    }

    pub fn onset(mut self, onset: impl IntoField<Value>) -> Self {
        self.onset = onset.into_field();
        self
    }

    pub fn abatement(mut self, abatement: impl IntoField<Value>) -> Self {
        self.abatement = abatement.into_field();
        self
    }

    pub fn recorded_date(mut self, recorded_date: impl IntoField<DateTime>) -> Self {
        self.recorded_date = recorded_date.into_field();
        self
    }

    pub fn recorder(mut self, recorder: impl IntoField<Reference>) -> Self {
        self.recorder = recorder.into_field();
        self
    }

    pub fn asserter(mut self, asserter: impl IntoField<Reference>) -> Self {
        self.asserter = asserter.into_field();
        self
    }
}

impl From<&Condition> for ConditionBuilder {
    fn from(condition: &Condition) -> Self {
        Self {
            domain: DomainResourceStage::from_base(&condition.domain),
            identifier: restage(&condition.identifier),
            clinical_status: restage_one(condition.clinical_status.as_ref()),
            verification_status: restage_one(condition.verification_status.as_ref()),
            category: restage(&condition.category),
            severity: restage_one(condition.severity.as_ref()),
            code: restage_one(condition.code.as_ref()),
            body_site: restage(&condition.body_site),
            subject: restage_one(Some(&condition.subject)),
            onset: condition.onset.clone().map(|o| Ok(o.into())),
            abatement: condition.abatement.clone().map(|a| Ok(a.into())),
            recorded_date: restage_one(condition.recorded_date.as_ref()),
            recorder: restage_one(condition.recorder.as_ref()),
            asserter: restage_one(condition.asserter.as_ref()),
        }
    }
}

impl Builder for ConditionBuilder {
    type Output = Condition;

    fn assemble(self, config: &ModelConfig) -> Result<Condition> {
        let condition = Condition {
            domain: self.domain.finish()?,
            identifier: validation::check_list("identifier", self.identifier)?,
            clinical_status: validation::optional("clinicalStatus", self.clinical_status)?,
            verification_status: validation::optional(
                "verificationStatus",
                self.verification_status,
            )?,
            category: validation::check_list("category", self.category)?,
            severity: validation::optional("severity", self.severity)?,
            code: validation::optional("code", self.code)?,
            body_site: validation::check_list("bodySite", self.body_site)?,
            subject: validation::require("subject", self.subject)?,
            onset: validation::check_choice("onset", self.onset)?,
            abatement: validation::check_choice("abatement", self.abatement)?,
            recorded_date: validation::optional("recordedDate", self.recorded_date)?,
            recorder: validation::optional("recorder", self.recorder)?,
            asserter: validation::optional("asserter", self.asserter)?,
        };
        validation::check_reference_type(
            "subject",
            Some(&condition.subject),
            SUBJECT_TARGETS,
            config,
        )?;
        validation::check_reference_type(
            "recorder",
            condition.recorder.as_ref(),
            RECORDER_TARGETS,
            config,
        )?;
        validation::check_reference_type(
            "asserter",
            condition.asserter.as_ref(),
            ASSERTER_TARGETS,
            config,
        )?;
        Ok(condition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferrum_core::Error;

    #[test]
    fn test_subject_is_required() {
        let err = Condition::builder()
            .onset("childhood")
            .build()
            .expect_err("subject missing");
        assert_eq!(
            err,
            Error::MissingRequiredField {
                field: "Condition.subject".to_string()
            }
        );
    }

    #[test]
    fn test_onset_choice() {
        let subject = Reference::builder()
            .reference("Patient/example")
            .build()
            .expect("reference builds");
        let condition = Condition::builder()
            .subject(subject.clone())
            .onset("childhood")
            .build()
            .expect("string onset");
        assert!(matches!(condition.onset(), Some(ConditionOnset::String(_))));

        let err = Condition::builder()
            .subject(subject)
            .abatement(true)
            .build()
            .expect_err("boolean abatement is not allowed here");
        assert_eq!(err.field(), Some("abatement"));
    }
}

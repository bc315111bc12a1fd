//! Organization resource

use ferrum_core::builder::{append, replace, restage, restage_one, Builder, IntoField, Staged, StagedList};
use ferrum_core::node::{DomainResourceBase, DomainResourceStage};
use ferrum_core::visitor::{accept_field, accept_list, NodeKind, Visitable, Visitor};
use ferrum_core::{
    validation, Boolean, CodeableConcept, FhirString, FhirType, Identifier, ModelConfig,
    Reference, Result,
};

use crate::AnyResource;

const PART_OF_TARGETS: &[&str] = &["Organization"];

/// A formally or informally recognized grouping of people or organizations
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Organization {
    domain: DomainResourceBase<AnyResource>,
    identifier: Vec<Identifier>,
    active: Option<Boolean>,
    type_: Vec<CodeableConcept>,
    name: Option<FhirString>,
    alias: Vec<FhirString>,
    /// The organization of which this organization forms a part
    part_of: Option<Reference>,
}

impl Organization {
    pub fn builder() -> OrganizationBuilder {
        OrganizationBuilder::default()
    }

    pub fn to_builder(&self) -> OrganizationBuilder {
        OrganizationBuilder::from(self)
    }

    pub fn identifier(&self) -> &[Identifier] {
        &self.identifier
    }

    pub fn active(&self) -> Option<&Boolean> {
        self.active.as_ref()
    }

    pub fn type_(&self) -> &[CodeableConcept] {
        &self.type_
    }

    pub fn name(&self) -> Option<&FhirString> {
        self.name.as_ref()
    }

    pub fn alias(&self) -> &[FhirString] {
        &self.alias
    }

    pub fn part_of(&self) -> Option<&Reference> {
        self.part_of.as_ref()
    }
}

domain_resource_type!(Organization, OrganizationBuilder, "Organization");

impl Visitable for Organization {
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
        accept_list("type", &self.type_, visitor);
        accept_field("name", self.name.as_ref(), visitor);
        accept_list("alias", &self.alias, visitor);
        accept_field("partOf", self.part_of.as_ref(), visitor);
    }
}

#[derive(Debug, Clone, Default)]
pub struct OrganizationBuilder {
    domain: DomainResourceStage<AnyResource>,
    identifier: StagedList<Identifier>,
    active: Staged<Boolean>,
    type_: StagedList<CodeableConcept>,
    name: Staged<FhirString>,
    alias: StagedList<FhirString>,
    part_of: Staged<Reference>,
}

impl OrganizationBuilder {
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

    pub fn type_<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<CodeableConcept>,
    {
        append(&mut self.type_, items);
        self
    }

    pub fn set_type<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<CodeableConcept>,
    {
        replace(&mut self.type_, items);
        self
    }

    pub fn name(mut self, name: impl IntoField<FhirString>) -> Self {
        self.name = name.into_field();
        self
    }

    pub fn alias<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<FhirString>,
    {
        append(&mut self.alias, items);
        self
    }

    pub fn set_alias<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<FhirString>,
    {
        replace(&mut self.alias, items);
        self
    }

    pub fn part_of(mut self, part_of: impl IntoField<Reference>) -> Self {
        self.part_of = part_of.into_field();
        self
    }
}

impl From<&Organization> for OrganizationBuilder {
    fn from(organization: &Organization) -> Self {
        Self {
            domain: DomainResourceStage::from_base(&organization.domain),
            identifier: restage(&organization.identifier),
            active: restage_one(organization.active.as_ref()),
            type_: restage(&organization.type_),
            name: restage_one(organization.name.as_ref()),
            alias: restage(&organization.alias),
            part_of: restage_one(organization.part_of.as_ref()),
        }
    }
}

impl Builder for OrganizationBuilder {
    type Output = Organization;

    fn assemble(self, config: &ModelConfig) -> Result<Organization> {
        let organization = Organization {
            domain: self.domain.finish()?,
            identifier: validation::check_list("identifier", self.identifier)?,
            active: validation::optional("active", self.active)?,
            type_: validation::check_list("type", self.type_)?,
            name: validation::optional("name", self.name)?,
            alias: validation::check_list("alias", self.alias)?,
            part_of: validation::optional("partOf", self.part_of)?,
        };
        validation::check_reference_type(
            "partOf",
            organization.part_of.as_ref(),
            PART_OF_TARGETS,
            config,
        )?;
        Ok(organization)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_of_must_be_organization() {
        let parent = Reference::builder()
            .reference("Organization/parent")
            .build()
            .expect("reference builds");
        let organization = Organization::builder()
            .name("Burgers University Medical Center")
            .alias(["BUMC"])
            .part_of(parent)
            .build()
            .expect("organization builds");
        assert_eq!(
            organization.part_of().and_then(|r| r.reference_str()),
            Some("Organization/parent")
        );

        let wrong = Reference::builder()
            .reference("Patient/p1")
            .build()
            .expect("reference builds");
        let err = Organization::builder()
            .part_of(wrong)
            .build()
            .expect_err("not an organization");
        assert_eq!(err.field(), Some("partOf"));
    }
}

//! Group resource

use ferrum_core::builder::{append, replace, restage, restage_one, Builder, IntoField, Staged, StagedList};
use ferrum_core::node::{BackboneElementBase, BackboneStage, DomainResourceBase, DomainResourceStage};
use ferrum_core::visitor::{accept_choice, accept_field, accept_list, NodeKind, Visitable, Visitor};
use ferrum_core::{
    choice, validation, Boolean, Code, CodeableConcept, FhirString, FhirType, Identifier,
    ModelConfig, Period, Quantity, Reference, Result, Value,
};

use crate::AnyResource;

const MANAGING_ENTITY_TARGETS: &[&str] =
    &["Organization", "RelatedPerson", "Practitioner", "PractitionerRole"];
const MEMBER_ENTITY_TARGETS: &[&str] = &[
    "Patient",
    "Practitioner",
    "PractitionerRole",
    "Device",
    "Medication",
    "Substance",
    "Group",
];
const CHARACTERISTIC_VALUE_TARGETS: &[&str] = &["Resource"];

choice! {
    /// Value held by the characteristic
    pub enum GroupCharacteristicValue {
        CodeableConcept(CodeableConcept),
        Boolean(Boolean),
        Quantity(Quantity),
        Reference(Reference),
    }
}

/// A defined collection of entities that may be discussed or acted upon
/// collectively.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Group {
    domain: DomainResourceBase<AnyResource>,
    identifier: Vec<Identifier>,
    active: Option<Boolean>,
    /// person | animal | practitioner | device | medication | substance
    type_: Code,
    /// Descriptive or actual
    actual: Boolean,
    code: Option<CodeableConcept>,
    name: Option<FhirString>,
    managing_entity: Option<Reference>,
    characteristic: Vec<GroupCharacteristic>,
    member: Vec<GroupMember>,
}

impl Group {
    pub fn builder() -> GroupBuilder {
        GroupBuilder::default()
    }

    pub fn to_builder(&self) -> GroupBuilder {
        GroupBuilder::from(self)
    }

    pub fn identifier(&self) -> &[Identifier] {
        &self.identifier
    }

    pub fn active(&self) -> Option<&Boolean> {
        self.active.as_ref()
    }

    pub fn type_(&self) -> &Code {
        &self.type_
    }

    pub fn actual(&self) -> &Boolean {
        &self.actual
    }

    pub fn code(&self) -> Option<&CodeableConcept> {
        self.code.as_ref()
    }

    pub fn name(&self) -> Option<&FhirString> {
        self.name.as_ref()
    }

    pub fn managing_entity(&self) -> Option<&Reference> {
        self.managing_entity.as_ref()
    }

    pub fn characteristic(&self) -> &[GroupCharacteristic] {
        &self.characteristic
    }

    pub fn member(&self) -> &[GroupMember] {
        &self.member
    }
}

domain_resource_type!(Group, GroupBuilder, "Group");

impl Visitable for Group {
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
        accept_field("type", Some(&self.type_), visitor);
        accept_field("actual", Some(&self.actual), visitor);
        accept_field("code", self.code.as_ref(), visitor);
        accept_field("name", self.name.as_ref(), visitor);
        accept_field("managingEntity", self.managing_entity.as_ref(), visitor);
        accept_list("characteristic", &self.characteristic, visitor);
        accept_list("member", &self.member, visitor);
    }
}

#[derive(Debug, Clone, Default)]
pub struct GroupBuilder {
    domain: DomainResourceStage<AnyResource>,
    identifier: StagedList<Identifier>,
    active: Staged<Boolean>,
    type_: Staged<Code>,
    actual: Staged<Boolean>,
    code: Staged<CodeableConcept>,
    name: Staged<FhirString>,
    managing_entity: Staged<Reference>,
    characteristic: StagedList<GroupCharacteristic>,
    member: StagedList<GroupMember>,
}

impl GroupBuilder {
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

    pub fn type_(mut self, type_: impl IntoField<Code>) -> Self {
        self.type_ = type_.into_field();
        self
    }

    pub fn actual(mut self, actual: impl IntoField<Boolean>) -> Self {
        self.actual = actual.into_field();
        self
    }

    pub fn code(mut self, code: impl IntoField<CodeableConcept>) -> Self {
        self.code = code.into_field();
        self
    }

    pub fn name(mut self, name: impl IntoField<FhirString>) -> Self {
        self.name = name.into_field();
        self
    }

    pub fn managing_entity(mut self, managing_entity: impl IntoField<Reference>) -> Self {
        self.managing_entity = managing_entity.into_field();
        self
    }

    pub fn characteristic<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<GroupCharacteristic>,
    {
        append(&mut self.characteristic, items);
        self
    }

    pub fn set_characteristic<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<GroupCharacteristic>,
    {
        replace(&mut self.characteristic, items);
        self
    }

    pub fn member<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<GroupMember>,
    {
        append(&mut self.member, items);
        self
    }

    pub fn set_member<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<GroupMember>,
    {
        replace(&mut self.member, items);
        self
    }
}

impl From<&Group> for GroupBuilder {
    fn from(group: &Group) -> Self {
        Self {
            domain: DomainResourceStage::from_base(&group.domain),
            identifier: restage(&group.identifier),
            active: restage_one(group.active.as_ref()),
            type_: restage_one(Some(&group.type_)),
            actual: restage_one(Some(&group.actual)),
            code: restage_one(group.code.as_ref()),
            name: restage_one(group.name.as_ref()),
            managing_entity: restage_one(group.managing_entity.as_ref()),
            characteristic: restage(&group.characteristic),
            member: restage(&group.member),
        }
    }
}

impl Builder for GroupBuilder {
    type Output = Group;

    fn assemble(self, config: &ModelConfig) -> Result<Group> {
        let group = Group {
            domain: self.domain.finish()?,
            identifier: validation::check_list("identifier", self.identifier)?,
            active: validation::optional("active", self.active)?,
            type_: validation::require("type", self.type_)?,
            actual: validation::require("actual", self.actual)?,
            code: validation::optional("code", self.code)?,
            name: validation::optional("name", self.name)?,
            managing_entity: validation::optional("managingEntity", self.managing_entity)?,
            characteristic: validation::check_list("characteristic", self.characteristic)?,
            member: validation::check_list("member", self.member)?,
        };
        validation::check_reference_type(
            "managingEntity",
            group.managing_entity.as_ref(),
            MANAGING_ENTITY_TARGETS,
            config,
        )?;
        Ok(group)
    }
}

// ============================================================================
// Group.characteristic
// ============================================================================

/// Include / Exclude group members by trait
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupCharacteristic {
    backbone: BackboneElementBase,
    code: CodeableConcept,
    value: GroupCharacteristicValue,
    /// Group includes or excludes
    exclude: Boolean,
    period: Option<Period>,
}

impl GroupCharacteristic {
    pub fn builder() -> GroupCharacteristicBuilder {
        GroupCharacteristicBuilder::default()
    }

    pub fn to_builder(&self) -> GroupCharacteristicBuilder {
        GroupCharacteristicBuilder::from(self)
    }

    pub fn code(&self) -> &CodeableConcept {
        &self.code
    }

    pub fn value(&self) -> &GroupCharacteristicValue {
        &self.value
    }

    pub fn exclude(&self) -> &Boolean {
        &self.exclude
    }

    pub fn period(&self) -> Option<&Period> {
        self.period.as_ref()
    }
}

backbone_type!(
    GroupCharacteristic,
    GroupCharacteristicBuilder,
    "Group.characteristic"
);

impl Visitable for GroupCharacteristic {
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
        accept_choice("value", Some(&self.value), visitor);
        accept_field("exclude", Some(&self.exclude), visitor);
        accept_field("period", self.period.as_ref(), visitor);
    }
}

#[derive(Debug, Clone, Default)]
pub struct GroupCharacteristicBuilder {
    backbone: BackboneStage,
    code: Staged<CodeableConcept>,
    value: Staged<Value>,
    exclude: Staged<Boolean>,
    period: Staged<Period>,
}

impl GroupCharacteristicBuilder {
    pub fn code(mut self, code: impl IntoField<CodeableConcept>) -> Self {
        self.code = code.into_field();
        self
    }

    pub fn value(mut self, value: impl IntoField<Value>) -> Self {
        self.value = value.into_field();
        self
    }

    pub fn exclude(mut self, exclude: impl IntoField<Boolean>) -> Self {
        self.exclude = exclude.into_field();
        self
    }

    pub fn period(mut self, period: impl IntoField<Period>) -> Self {
        self.period = period.into_field();
        self
    }
}

impl From<&GroupCharacteristic> for GroupCharacteristicBuilder {
    fn from(characteristic: &GroupCharacteristic) -> Self {
        Self {
            backbone: BackboneStage::from_base(&characteristic.backbone),
            code: restage_one(Some(&characteristic.code)),
            value: Some(Ok(characteristic.value.clone().into())),
            exclude: restage_one(Some(&characteristic.exclude)),
            period: restage_one(characteristic.period.as_ref()),
        }
    }
}

impl Builder for GroupCharacteristicBuilder {
    type Output = GroupCharacteristic;

    fn assemble(self, config: &ModelConfig) -> Result<GroupCharacteristic> {
        let characteristic = GroupCharacteristic {
            backbone: self.backbone.finish()?,
            code: validation::require("code", self.code)?,
            value: validation::require_choice("value", self.value)?,
            exclude: validation::require("exclude", self.exclude)?,
            period: validation::optional("period", self.period)?,
        };
        validation::check_choice_reference(
            "value",
            Some(&characteristic.value),
            CHARACTERISTIC_VALUE_TARGETS,
            config,
        )?;
        Ok(characteristic)
    }
}

// ============================================================================
// Group.member
// ============================================================================

/// Who or what is in the group
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupMember {
    backbone: BackboneElementBase,
    entity: Reference,
    period: Option<Period>,
    inactive: Option<Boolean>,
}

impl GroupMember {
    pub fn builder() -> GroupMemberBuilder {
        GroupMemberBuilder::default()
    }

    pub fn to_builder(&self) -> GroupMemberBuilder {
        GroupMemberBuilder::from(self)
    }

    pub fn entity(&self) -> &Reference {
        &self.entity
    }

    pub fn period(&self) -> Option<&Period> {
        self.period.as_ref()
    }

    pub fn inactive(&self) -> Option<&Boolean> {
        self.inactive.as_ref()
    }
}

backbone_type!(GroupMember, GroupMemberBuilder, "Group.member");

impl Visitable for GroupMember {
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
        accept_field("entity", Some(&self.entity), visitor);
        accept_field("period", self.period.as_ref(), visitor);
        accept_field("inactive", self.inactive.as_ref(), visitor);
    }
}

#[derive(Debug, Clone, Default)]
pub struct GroupMemberBuilder {
    backbone: BackboneStage,
    entity: Staged<Reference>,
    period: Staged<Period>,
    inactive: Staged<Boolean>,
}

impl GroupMemberBuilder {
    pub fn entity(mut self, entity: impl IntoField<Reference>) -> Self {
        self.entity = entity.into_field();
        self
    }

    pub fn period(mut self, period: impl IntoField<Period>) -> Self {
        self.period = period.into_field();
        self
    }

    pub fn inactive(mut self, inactive: impl IntoField<Boolean>) -> Self {
        self.inactive = inactive.into_field();
        self
    }
}

impl From<&GroupMember> for GroupMemberBuilder {
    fn from(member: &GroupMember) -> Self {
        Self {
            backbone: BackboneStage::from_base(&member.backbone),
            entity: restage_one(Some(&member.entity)),
            period: restage_one(member.period.as_ref()),
            inactive: restage_one(member.inactive.as_ref()),
        }
    }
}

impl Builder for GroupMemberBuilder {
    type Output = GroupMember;

    fn assemble(self, config: &ModelConfig) -> Result<GroupMember> {
        let member = GroupMember {
            backbone: self.backbone.finish()?,
            entity: validation::require("entity", self.entity)?,
            period: validation::optional("period", self.period)?,
            inactive: validation::optional("inactive", self.inactive)?,
        };
        validation::check_reference_type(
            "entity",
            Some(&member.entity),
            MEMBER_ENTITY_TARGETS,
            config,
        )?;
        validation::require_value_or_children(&member)?;
        Ok(member)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferrum_core::{Choice, Error};

    #[test]
    fn test_type_and_actual_are_required() {
        let err = Group::builder().build().expect_err("type missing");
        assert_eq!(
            err,
            Error::MissingRequiredField {
                field: "Group.type".to_string()
            }
        );

        let err = Group::builder()
            .type_("person")
            .build()
            .expect_err("actual missing");
        assert_eq!(err.field(), Some("actual"));

        let group = Group::builder()
            .type_("person")
            .actual(true)
            .build()
            .expect("group builds");
        assert!(group.actual().is_true());
        assert!(group.member().is_empty());
    }

    #[test]
    fn test_member_entity_is_required_and_typed() {
        let err = GroupMember::builder()
            .inactive(false)
            .build()
            .expect_err("entity missing");
        assert_eq!(err.field(), Some("entity"));

        let organization = Reference::builder()
            .reference("Organization/1")
            .build()
            .expect("reference builds");
        let err = GroupMember::builder()
            .entity(organization)
            .build()
            .expect_err("organizations are not members");
        assert!(matches!(
            err,
            Error::InvalidReferenceTargetType { ref found, .. } if found.as_deref() == Some("Organization")
        ));
    }

    fn gender_code() -> CodeableConcept {
        CodeableConcept::builder()
            .text("gender")
            .build()
            .expect("concept builds")
    }

    fn characteristic() -> GroupCharacteristicBuilder {
        GroupCharacteristic::builder().code(gender_code()).exclude(false)
    }

    #[test]
    fn test_characteristic_value_is_required() {
        let err = characteristic().build().expect_err("value missing");
        assert_eq!(
            err,
            Error::MissingRequiredField {
                field: "Group.characteristic.value".to_string()
            }
        );

        let err = GroupCharacteristic::builder()
            .code(gender_code())
            .value(true)
            .build()
            .expect_err("exclude missing");
        assert_eq!(err.field(), Some("exclude"));
    }

    #[test]
    fn test_characteristic_value_types() {
        let err = characteristic().value(3).build().expect_err("integer not allowed");
        assert_eq!(
            err,
            Error::InvalidChoiceType {
                field: "Group.characteristic.value".to_string(),
                found: "integer".to_string(),
                allowed: vec![
                    "CodeableConcept".to_string(),
                    "boolean".to_string(),
                    "Quantity".to_string(),
                    "Reference".to_string(),
                ],
            }
        );

        let built = characteristic().value(true).build().expect("boolean allowed");
        assert!(matches!(built.value(), GroupCharacteristicValue::Boolean(b) if b.is_true()));
        assert_eq!(built.to_builder().build().expect("rebuilds"), built);
    }

    #[test]
    fn test_characteristic_reference_value_is_checked() {
        let any_target = Reference::builder()
            .reference("Organization/1")
            .build()
            .expect("reference builds");
        let built = characteristic()
            .value(any_target)
            .build()
            .expect("any resource type is allowed");
        assert!(built.value().reference().is_some());

        let mismatched = Reference::builder()
            .reference("Group/1")
            .type_("Patient")
            .build()
            .expect("reference builds");
        let err = characteristic()
            .value(mismatched.clone())
            .build()
            .expect_err("literal and explicit type disagree");
        assert!(matches!(
            err,
            Error::InvalidReferenceTargetType { ref field, ref found, .. }
                if field == "Group.characteristic.value" && found.as_deref() == Some("Group")
        ));

        let malformed = Reference::builder()
            .reference("group-1")
            .build()
            .expect("reference builds");
        let err = characteristic()
            .value(malformed)
            .build()
            .expect_err("no resource type in literal");
        assert_eq!(err.field(), Some("value"));

        characteristic()
            .value(mismatched)
            .build_with(&ModelConfig::lenient())
            .expect("reference checks disabled");
    }

    #[test]
    fn test_characteristics_visit_before_members() {
        let member = GroupMember::builder()
            .entity(
                Reference::builder()
                    .reference("Patient/1")
                    .build()
                    .expect("reference builds"),
            )
            .build()
            .expect("member builds");
        let group = Group::builder()
            .type_("person")
            .actual(true)
            .member([member])
            .characteristic([characteristic().value(true).build().expect("builds")])
            .build()
            .expect("group builds");

        let mut paths = ferrum_core::PathVisitor::new();
        ferrum_core::traverse(&group, &mut paths);
        assert_eq!(
            paths.into_paths(),
            vec![
                "Group",
                "Group.type",
                "Group.actual",
                "Group.characteristic[0]",
                "Group.characteristic[0].code",
                "Group.characteristic[0].code.text",
                "Group.characteristic[0].value",
                "Group.characteristic[0].exclude",
                "Group.member[0]",
                "Group.member[0].entity",
                "Group.member[0].entity.reference",
            ]
        );
    }
}

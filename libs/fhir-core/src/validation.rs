//! Structural checks run by `build()`
//!
//! Each check takes staged or built values plus the field name and returns the
//! first violation it finds. Builders call them in field declaration order.

use crate::builder::{Staged, StagedList};
use crate::config::ModelConfig;
use crate::datatypes::reference::{resource_type_name, target_of, ReferenceTarget};
use crate::datatypes::Reference;
use crate::error::{Error, Result};
use crate::node::Element;
use crate::value::{Choice, Value};

/// Type name that admits any target resource type.
const ANY_RESOURCE: &str = "Resource";

pub fn require<T>(field: &str, value: Staged<T>) -> Result<T> {
    match value {
        Some(Ok(value)) => Ok(value),
        Some(Err(err)) => Err(err.in_field(field)),
        None => Err(Error::MissingRequiredField {
            field: field.to_string(),
        }),
    }
}

pub fn optional<T>(field: &str, value: Staged<T>) -> Result<Option<T>> {
    value.map(|v| v.map_err(|err| err.in_field(field))).transpose()
}

/// Rejects null entries; every entry is otherwise taken as built.
pub fn check_list<T>(field: &str, items: StagedList<T>) -> Result<Vec<T>> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Some(Ok(item)) => Ok(item),
            Some(Err(err)) => Err(err.in_field(field)),
            None => Err(Error::NullElementInList {
                field: field.to_string(),
                index,
            }),
        })
        .collect()
}

/// `check_list` for fields with a minimum cardinality of one.
pub fn check_non_empty_list<T>(field: &str, items: StagedList<T>) -> Result<Vec<T>> {
    if items.is_empty() {
        return Err(Error::EmptyRequiredList {
            field: field.to_string(),
        });
    }
    check_list(field, items)
}

fn narrow<C: Choice>(field: &str, value: Value) -> Result<C> {
    C::try_from(value).map_err(|rejected| Error::InvalidChoiceType {
        field: field.to_string(),
        found: rejected.type_name().to_string(),
        allowed: C::ALLOWED.iter().map(|t| t.to_string()).collect(),
    })
}

pub fn require_choice<C: Choice>(field: &str, value: Staged<Value>) -> Result<C> {
    narrow(field, require(field, value)?)
}

pub fn check_choice<C: Choice>(field: &str, value: Staged<Value>) -> Result<Option<C>> {
    optional(field, value)?
        .map(|value| narrow(field, value))
        .transpose()
}

/// Checks an optional open value against an explicit allow-list, as used for
/// extension values constrained by a definition.
pub fn check_value_type(field: &str, value: Option<&Value>, allowed: &[String]) -> Result<()> {
    match value {
        Some(value) if !allowed.iter().any(|t| t == value.type_name()) => {
            Err(Error::InvalidChoiceType {
                field: field.to_string(),
                found: value.type_name().to_string(),
                allowed: allowed.to_vec(),
            })
        }
        _ => Ok(()),
    }
}

/// Checks a reference's target type against the field's allowed types.
///
/// The literal reference and the explicit `type` are both consulted; a
/// reference whose target cannot be determined passes.
pub fn check_reference_type(
    field: &str,
    reference: Option<&Reference>,
    allowed: &[&str],
    config: &ModelConfig,
) -> Result<()> {
    let Some(reference) = reference else {
        return Ok(());
    };
    if !config.check_reference_types {
        return Ok(());
    }

    let permits = |name: &str| allowed.iter().any(|t| *t == name || *t == ANY_RESOURCE);
    let fail = |found: Option<&str>| Error::InvalidReferenceTargetType {
        field: field.to_string(),
        reference: reference
            .reference_str()
            .or_else(|| reference.type_str())
            .unwrap_or_default()
            .to_string(),
        found: found.map(str::to_string),
        allowed: allowed.iter().map(|t| t.to_string()).collect(),
    };

    let literal = match target_of(reference) {
        ReferenceTarget::Typed(name) => {
            if !permits(name) {
                return Err(fail(Some(name)));
            }
            Some(name)
        }
        ReferenceTarget::Malformed => return Err(fail(None)),
        ReferenceTarget::Undetermined => None,
    };

    if let Some(declared) = reference.type_str() {
        let name = resource_type_name(declared).ok_or_else(|| fail(Some(declared)))?;
        if !permits(name) {
            return Err(fail(Some(name)));
        }
        if literal.is_some_and(|literal| literal != name) {
            return Err(fail(literal));
        }
    }

    Ok(())
}

/// Checks each reference of a list field; the first failure wins.
pub fn check_reference_types(
    field: &str,
    references: &[Reference],
    allowed: &[&str],
    config: &ModelConfig,
) -> Result<()> {
    references
        .iter()
        .try_for_each(|reference| check_reference_type(field, Some(reference), allowed, config))
}

/// Checks a choice field whose populated type may be a Reference.
pub fn check_choice_reference<C: Choice>(
    field: &str,
    choice: Option<&C>,
    allowed: &[&str],
    config: &ModelConfig,
) -> Result<()> {
    check_reference_type(field, choice.and_then(Choice::reference), allowed, config)
}

/// An element with no value must have at least one child or extension.
pub fn require_value_or_children<E: Element + ?Sized>(node: &E) -> Result<()> {
    if node.has_value() || node.has_children() {
        Ok(())
    } else {
        Err(Error::EmptyNode {
            type_name: node.type_name().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{Builder, IntoField};
    use crate::error::ViolationKind;
    use crate::primitive::FhirString;

    fn reference(literal: &str) -> Reference {
        Reference::builder()
            .reference(literal)
            .build()
            .expect("reference builds")
    }

    fn typed(literal: Option<&str>, type_: &str) -> Reference {
        let mut builder = Reference::builder().type_(type_);
        if let Some(literal) = literal {
            builder = builder.reference(literal);
        }
        builder.build().expect("reference builds")
    }

    const SUBJECT: &[&str] = &["Patient", "Group"];

    fn check(r: &Reference) -> Result<()> {
        check_reference_type("subject", Some(r), SUBJECT, &ModelConfig::default())
    }

    #[test]
    fn test_require_reports_field() {
        let err = require::<FhirString>("status", None).expect_err("absent");
        assert_eq!(
            err,
            Error::MissingRequiredField {
                field: "status".to_string()
            }
        );
    }

    #[test]
    fn test_rejected_literal_takes_field_name() {
        let err = optional::<FhirString>("text", "  ".into_field()).expect_err("blank");
        assert_eq!(err.kind(), ViolationKind::InvalidPrimitiveValue);
        assert_eq!(err.field(), Some("text"));
    }

    #[test]
    fn test_null_entry_reports_index() {
        let items: StagedList<i32> = vec![Some(Ok(1)), None, Some(Ok(3))];
        let err = check_list("given", items).expect_err("null entry");
        assert_eq!(
            err,
            Error::NullElementInList {
                field: "given".to_string(),
                index: 1
            }
        );
    }

    #[test]
    fn test_empty_required_list() {
        let err = check_non_empty_list::<i32>("issue", Vec::new()).expect_err("empty");
        assert_eq!(err.kind(), ViolationKind::EmptyRequiredList);
    }

    #[test]
    fn test_relative_and_absolute_literals() {
        assert!(check(&reference("Patient/123")).is_ok());
        assert!(check(&reference("Group/abc/_history/2")).is_ok());
        assert!(check(&reference("http://example.org/fhir/Patient/123")).is_ok());

        let err = check(&reference("Organization/1")).expect_err("not allowed");
        match err {
            Error::InvalidReferenceTargetType { found, allowed, .. } => {
                assert_eq!(found.as_deref(), Some("Organization"));
                assert_eq!(allowed, vec!["Patient", "Group"]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(check(&reference("https://example.org/Organization/1")).is_err());
    }

    #[test]
    fn test_conditional_reference() {
        assert!(check(&reference("Patient?identifier=http://x|1")).is_ok());
        assert!(check(&reference("Device?identifier=1")).is_err());
    }

    #[test]
    fn test_undeterminable_targets_pass() {
        assert!(check(&reference("#contained-1")).is_ok());
        assert!(check(&reference("urn:uuid:2f1c7e8a-0c7e-4b5e-9c36-4f5a3f3c1d2e")).is_ok());
        assert!(check(&reference("http://example.org/not-a-resource")).is_ok());

        let logical = Reference::builder()
            .display("Somebody")
            .build()
            .expect("display-only reference");
        assert!(check(&logical).is_ok());
    }

    #[test]
    fn test_malformed_relative_literal_fails() {
        assert!(check(&reference("patient-123")).is_err());
    }

    #[test]
    fn test_explicit_type() {
        assert!(check(&typed(None, "Patient")).is_ok());
        assert!(check(&typed(None, "http://hl7.org/fhir/StructureDefinition/Group")).is_ok());
        assert!(check(&typed(None, "Organization")).is_err());
        assert!(check(&typed(Some("Group/1"), "Patient")).is_err());
        assert!(check(&typed(Some("#x"), "Patient")).is_ok());
    }

    #[test]
    fn test_any_resource_and_disabled_checks() {
        let any = &["Resource"];
        let org = reference("Organization/1");
        assert!(check_reference_type("focus", Some(&org), any, &ModelConfig::default()).is_ok());
        assert!(check_reference_type("subject", Some(&org), SUBJECT, &ModelConfig::lenient()).is_ok());
    }

    #[test]
    fn test_list_fails_on_any_entry() {
        let refs = vec![reference("Patient/1"), reference("Organization/2")];
        let err = check_reference_types("member", &refs, SUBJECT, &ModelConfig::default())
            .expect_err("second entry rejected");
        assert_eq!(err.field(), Some("member"));
    }
}

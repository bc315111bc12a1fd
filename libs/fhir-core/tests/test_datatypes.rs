use ferrum_core::prelude::*;
use ferrum_core::{
    traverse, Boolean, CodeableConcept, Coding, Error, Extension, ExtensionDefinition,
    Identifier, IssueCode, Meta, ModelConfig, PathVisitor, Reference, ReferenceTarget, Value,
};
use serde_json::json;

fn reference(literal: &str) -> Reference {
    Reference::builder()
        .reference(literal)
        .build()
        .expect("reference builds")
}

#[test]
fn test_reference_targets() {
    assert_eq!(reference("Patient/123").target(), ReferenceTarget::Typed("Patient"));
    assert_eq!(
        reference("Observation/o1/_history/2").target(),
        ReferenceTarget::Typed("Observation")
    );
    assert_eq!(
        reference("http://example.org/fhir/Organization/1").target(),
        ReferenceTarget::Typed("Organization")
    );
    assert_eq!(
        reference("Patient?identifier=http://acme.org/mrn|123").target(),
        ReferenceTarget::Typed("Patient")
    );
    assert_eq!(reference("#contained").target(), ReferenceTarget::Undetermined);
    assert_eq!(
        reference("urn:oid:1.2.3.4").target(),
        ReferenceTarget::Undetermined
    );
    assert_eq!(reference("not a reference").target(), ReferenceTarget::Malformed);
}

#[test]
fn test_explicit_type_disagreeing_with_literal() {
    let mixed = Reference::builder()
        .reference("Patient/1")
        .type_("Group")
        .build()
        .expect("reference itself builds");
    let err = Identifier::builder()
        .value("1")
        .assigner(mixed)
        .build()
        .expect_err("assigner must be an organization");
    assert_eq!(err.kind(), ViolationKind::InvalidReferenceTargetType);

    let typed_only = Reference::builder()
        .type_("Organization")
        .display("Acme Healthcare")
        .build()
        .expect("reference builds");
    Identifier::builder()
        .value("1")
        .assigner(typed_only)
        .build()
        .expect("explicit type matches");
}

#[test]
fn test_extension_definition_constrains_value() {
    let definition = ExtensionDefinition::new(
        "http://example.org/fhir/StructureDefinition/vip",
        ["boolean"],
    );

    let extension = Extension::builder()
        .conforms_to(&definition)
        .value(true)
        .build()
        .expect("boolean value allowed");
    assert_eq!(extension.url(), definition.url());
    assert!(definition.describes(&extension));
    assert!(matches!(extension.value(), Some(Value::Boolean(b)) if b.is_true()));

    let err = Extension::builder()
        .conforms_to(&definition)
        .value("yes")
        .build()
        .expect_err("string value not allowed");
    assert_eq!(
        err,
        Error::InvalidChoiceType {
            field: "Extension.value".to_string(),
            found: "string".to_string(),
            allowed: vec!["boolean".to_string()],
        }
    );
}

#[test]
fn test_extension_requires_url() {
    let err = Extension::builder()
        .value(Boolean::from(true))
        .build()
        .expect_err("url missing");
    assert_eq!(err.field(), Some("url"));

    let err = Extension::builder()
        .url("has space")
        .value(true)
        .build()
        .expect_err("url with whitespace");
    assert_eq!(err.kind(), ViolationKind::InvalidPrimitiveValue);
}

#[test]
fn test_nested_extensions() {
    let inner = Extension::builder()
        .url("code")
        .value("abc")
        .build()
        .expect("inner builds");
    let outer = Extension::builder()
        .url("http://example.org/fhir/StructureDefinition/complex")
        .extension([inner])
        .build()
        .expect("complex extension builds");
    assert!(outer.value().is_none());
    assert_eq!(outer.sub_extensions("code").len(), 1);

    let mut visitor = PathVisitor::new();
    traverse(&outer, &mut visitor);
    assert_eq!(
        visitor.into_paths(),
        vec!["Extension", "Extension.extension[0]", "Extension.extension[0].value"]
    );
}

#[test]
fn test_meta_visits_in_declaration_order() {
    let meta = Meta::builder()
        .tag([Coding::builder()
            .system("http://example.org/tags")
            .code("test")
            .build()
            .expect("coding builds")])
        .profile(["http://hl7.org/fhir/StructureDefinition/vitalsigns"])
        .last_updated("2023-01-01T00:00:00Z")
        .build()
        .expect("meta builds");

    let mut visitor = PathVisitor::new();
    traverse(&meta, &mut visitor);
    assert_eq!(
        visitor.into_paths(),
        vec![
            "Meta",
            "Meta.lastUpdated",
            "Meta.profile[0]",
            "Meta.tag[0]",
            "Meta.tag[0].system",
            "Meta.tag[0].code",
        ]
    );
}

#[test]
fn test_codeable_concept_lookup() {
    let concept = CodeableConcept::builder()
        .coding([
            Coding::builder()
                .system("http://loinc.org")
                .code("8867-4")
                .build()
                .expect("coding builds"),
            Coding::builder()
                .system("http://snomed.info/sct")
                .code("364075005")
                .build()
                .expect("coding builds"),
        ])
        .build()
        .expect("concept builds");
    assert!(concept.has_coding("http://snomed.info/sct", "364075005"));
    assert!(!concept.has_coding("http://loinc.org", "364075005"));
}

#[test]
fn test_issue_json_and_config() {
    let config = ModelConfig::from_json(json!({ "checkReferenceTypes": false }))
        .expect("config deserializes");
    Identifier::builder()
        .value("1")
        .assigner(reference("Patient/1"))
        .build_with(&config)
        .expect("reference checks disabled");

    let err = Identifier::builder()
        .value("1")
        .assigner(reference("Patient/1"))
        .build()
        .expect_err("default config checks references");
    let issue = err.to_issue();
    assert_eq!(issue.code, IssueCode::Invalid);
    assert_eq!(
        issue.to_json(),
        json!({
            "severity": "error",
            "code": "invalid",
            "diagnostics": err.to_string(),
            "location": ["Identifier.assigner"],
            "expression": ["Identifier.assigner"],
        })
    );
}

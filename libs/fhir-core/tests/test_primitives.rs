use ferrum_core::prelude::*;
use ferrum_core::{
    Boolean, Code, Date, DateTime, Error, Extension, FhirDecimal, FhirString, Id, Instant,
    Integer, NodeKind, PrimitiveValue, Uri, Xhtml,
};
use rust_decimal::Decimal;

fn reason_of(err: Error) -> String {
    match err {
        Error::InvalidPrimitiveValue { reason, .. } => reason,
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_string_shape() {
    assert!(FhirString::new("Peter James").is_ok());
    assert!(FhirString::new("line one\r\nline two\tend").is_ok());
    assert!(FhirString::new("   ").is_err());
    assert!(FhirString::new("").is_err());
    assert!(FhirString::new("bell\u{7}").is_err());
    assert!(FhirString::new("x".repeat(1024 * 1024 + 1)).is_err());
}

#[test]
fn test_code_and_id_shape() {
    assert!(Code::new("final").is_ok());
    assert!(Code::new("two words").is_ok());
    assert!(Code::new(" leading").is_err());
    assert!(Code::new("trailing ").is_err());
    assert!(Code::new("double  space").is_err());

    assert!(Id::new("example-1.a").is_ok());
    assert!(Id::new("a".repeat(64)).is_ok());
    assert!(Id::new("a".repeat(65)).is_err());
    assert!(Id::new("under_score").is_err());
}

#[test]
fn test_uri_rejects_whitespace() {
    assert!(Uri::new("http://hl7.org/fhir").is_ok());
    assert!(Uri::new("urn:uuid:53fefa32-fcbb-4ff8-8a92-55ee120877b7").is_ok());
    assert!(Uri::new("http://hl7.org/ fhir").is_err());
}

#[test]
fn test_temporal_shapes() {
    for date in ["2018", "1973-06", "1905-08-23"] {
        assert!(Date::new(date).is_ok(), "{date}");
    }
    assert!(Date::new("1905-13-01").is_err());
    assert!(Date::new("1905-08-23T10:00:00Z").is_err());

    for dt in ["2018", "2015-02-07T13:28:17-05:00", "2017-01-01T00:00:00.000Z"] {
        assert!(DateTime::new(dt).is_ok(), "{dt}");
    }
    assert!(DateTime::new("2015-02-07T13:28:17").is_err());

    assert!(Instant::new("2015-02-07T13:28:17.239+02:00").is_ok());
    assert!(Instant::new("2015-02-07").is_err());
}

#[test]
fn test_xhtml_must_be_div() {
    assert!(Xhtml::new("<div xmlns=\"http://www.w3.org/1999/xhtml\">text</div>").is_ok());
    let reason = reason_of(Xhtml::new("<p>text</p>").expect_err("not a div"));
    assert!(!reason.is_empty());
}

#[test]
fn test_direct_construction_reports_type_not_field() {
    let err = Date::new("yesterday").expect_err("not a date");
    assert!(matches!(
        err,
        Error::InvalidPrimitiveValue { ref field, ref type_name, .. }
            if field.is_empty() && type_name == "date"
    ));
}

#[test]
fn test_value_or_extension() {
    let err = Boolean::builder().build().expect_err("empty primitive");
    assert_eq!(
        err,
        Error::EmptyNode {
            type_name: "boolean".to_string()
        }
    );

    let extension = Extension::builder()
        .url("http://hl7.org/fhir/StructureDefinition/data-absent-reason")
        .value(Code::new("masked").expect("valid code"))
        .build()
        .expect("extension builds");
    let masked = Boolean::builder()
        .id("b1")
        .extension([extension])
        .build()
        .expect("extension-only primitive");
    assert!(masked.value().is_none());
    assert!(!masked.has_value());
    assert!(masked.has_children());
    assert_eq!(masked.id(), Some("b1"));
}

#[test]
fn test_builder_value_is_checked_as_value_field() {
    let err = Code::builder()
        .value(" padded")
        .build()
        .expect_err("bad code");
    assert_eq!(err.field(), Some("value"));

    let code = Code::builder()
        .value("draft")
        .build()
        .expect("code builds");
    let cleared = code.to_builder().clear_value().build();
    assert_eq!(cleared.map_err(|e| e.kind()), Err(ViolationKind::EmptyNode));
}

#[test]
fn test_primitive_nodes_expose_values() {
    let decimal = FhirDecimal::from(Decimal::new(314, 2));
    assert_eq!(decimal.node_kind(), NodeKind::Primitive);
    assert_eq!(
        decimal.primitive_value(),
        Some(PrimitiveValue::Decimal(&Decimal::new(314, 2)))
    );

    let integer = Integer::from(-7);
    assert_eq!(integer.primitive_value(), Some(PrimitiveValue::Integer(-7)));
    assert_eq!(integer.type_name(), "integer");

    let flag = Boolean::from(true);
    assert!(flag.is_true());
    assert_eq!(flag.primitive_value(), Some(PrimitiveValue::Boolean(true)));
}

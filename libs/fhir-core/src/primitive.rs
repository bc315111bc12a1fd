//! Primitive elements
//!
//! A primitive is an Element with an optional value of a fixed kind. Values
//! are shape-checked when they enter a builder or a field; code meanings are
//! never checked here.

use std::fmt;
use std::hash::Hash;
use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::Decimal;

use crate::builder::{Builder, IntoField, Staged};
use crate::config::ModelConfig;
use crate::error::{Error, Result};
use crate::node::{Element, ElementBase, ElementBuilder, ElementStage};
use crate::validation;
use crate::value::FhirType;
use crate::visitor::{accept_list, NodeKind, PrimitiveValue, Visitable, Visitor};

const MAX_STRING_LENGTH: usize = 1024 * 1024;
const MAX_ID_LENGTH: usize = 64;

/// A primitive value kind: its Rust value type, schema name and shape check.
pub trait PrimitiveKind: fmt::Debug + Clone + PartialEq + Eq + Hash + Send + Sync + 'static {
    type Value: fmt::Debug + Clone + PartialEq + Eq + Hash + Send + Sync + 'static;

    const TYPE_NAME: &'static str;

    fn check(value: &Self::Value) -> std::result::Result<(), String>;

    fn as_primitive_value(value: &Self::Value) -> PrimitiveValue<'_>;
}

macro_rules! string_kind {
    ($(#[$meta:meta])* $kind:ident, $name:literal, $check:path) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $kind;

        impl PrimitiveKind for $kind {
            type Value = String;
            const TYPE_NAME: &'static str = $name;

            fn check(value: &String) -> std::result::Result<(), String> {
                $check(value)
            }

            fn as_primitive_value(value: &String) -> PrimitiveValue<'_> {
                PrimitiveValue::String(value)
            }
        }
    };
}

string_kind!(StringKind, "string", check_string);
string_kind!(CodeKind, "code", check_code);
string_kind!(IdKind, "id", check_id);
string_kind!(UriKind, "uri", check_uri);
string_kind!(DateKind, "date", check_date);
string_kind!(DateTimeKind, "dateTime", check_date_time);
string_kind!(InstantKind, "instant", check_instant);
string_kind!(
    /// Narrative XHTML; only the `<div>` wrapper is checked.
    XhtmlKind,
    "xhtml",
    check_xhtml
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BooleanKind;

impl PrimitiveKind for BooleanKind {
    type Value = bool;
    const TYPE_NAME: &'static str = "boolean";

    fn check(_value: &bool) -> std::result::Result<(), String> {
        Ok(())
    }

    fn as_primitive_value(value: &bool) -> PrimitiveValue<'_> {
        PrimitiveValue::Boolean(*value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IntegerKind;

impl PrimitiveKind for IntegerKind {
    type Value = i32;
    const TYPE_NAME: &'static str = "integer";

    fn check(_value: &i32) -> std::result::Result<(), String> {
        Ok(())
    }

    fn as_primitive_value(value: &i32) -> PrimitiveValue<'_> {
        PrimitiveValue::Integer(*value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DecimalKind;

impl PrimitiveKind for DecimalKind {
    type Value = Decimal;
    const TYPE_NAME: &'static str = "decimal";

    fn check(_value: &Decimal) -> std::result::Result<(), String> {
        Ok(())
    }

    fn as_primitive_value(value: &Decimal) -> PrimitiveValue<'_> {
        PrimitiveValue::Decimal(value)
    }
}

/// A primitive element: optional id, extensions and an optional value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Primitive<K: PrimitiveKind> {
    element: ElementBase,
    value: Option<K::Value>,
}

pub type Boolean = Primitive<BooleanKind>;
pub type Integer = Primitive<IntegerKind>;
pub type FhirDecimal = Primitive<DecimalKind>;
pub type FhirString = Primitive<StringKind>;
pub type Code = Primitive<CodeKind>;
pub type Id = Primitive<IdKind>;
pub type Uri = Primitive<UriKind>;
pub type Date = Primitive<DateKind>;
pub type DateTime = Primitive<DateTimeKind>;
pub type Instant = Primitive<InstantKind>;
pub type Xhtml = Primitive<XhtmlKind>;

impl<K: PrimitiveKind> Primitive<K> {
    /// A bare primitive holding `value`, or `InvalidPrimitiveValue` if the
    /// value does not have the kind's shape.
    pub fn new(value: impl Into<K::Value>) -> Result<Self> {
        let value = value.into();
        K::check(&value).map_err(|reason| Error::invalid_primitive(K::TYPE_NAME, reason))?;
        Ok(Self {
            element: ElementBase::default(),
            value: Some(value),
        })
    }

    pub fn builder() -> PrimitiveBuilder<K> {
        PrimitiveBuilder {
            element: ElementStage::default(),
            value: None,
        }
    }

    pub fn to_builder(&self) -> PrimitiveBuilder<K> {
        PrimitiveBuilder::from(self)
    }

    pub fn value(&self) -> Option<&K::Value> {
        self.value.as_ref()
    }
}

impl Primitive<BooleanKind> {
    pub fn is_true(&self) -> bool {
        self.value == Some(true)
    }
}

impl Primitive<StringKind> {
    pub fn as_str(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl From<bool> for Boolean {
    fn from(value: bool) -> Self {
        Self {
            element: ElementBase::default(),
            value: Some(value),
        }
    }
}

impl From<i32> for Integer {
    fn from(value: i32) -> Self {
        Self {
            element: ElementBase::default(),
            value: Some(value),
        }
    }
}

impl From<Decimal> for FhirDecimal {
    fn from(value: Decimal) -> Self {
        Self {
            element: ElementBase::default(),
            value: Some(value),
        }
    }
}

impl<K: PrimitiveKind> FhirType for Primitive<K> {
    const TYPE_NAME: &'static str = K::TYPE_NAME;
}

impl<K: PrimitiveKind> Visitable for Primitive<K> {
    fn type_name(&self) -> &'static str {
        K::TYPE_NAME
    }

    fn node_kind(&self) -> NodeKind {
        NodeKind::Primitive
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn element_id(&self) -> Option<&str> {
        Element::id(self)
    }

    fn accept_children(&self, visitor: &mut dyn Visitor) {
        accept_list("extension", self.element.extension(), visitor);
    }

    fn primitive_value(&self) -> Option<PrimitiveValue<'_>> {
        self.value.as_ref().map(K::as_primitive_value)
    }
}

impl<K: PrimitiveKind> Element for Primitive<K> {
    fn element(&self) -> &ElementBase {
        &self.element
    }

    fn has_value(&self) -> bool {
        self.value.is_some()
    }
}

// Literal conversions. A literal that fails its shape check is staged as an
// error and surfaces at `build()` under the receiving field's name.

impl<K: PrimitiveKind<Value = String>> IntoField<Primitive<K>> for &str {
    fn into_field(self) -> Staged<Primitive<K>> {
        Some(Primitive::new(self))
    }
}

impl<K: PrimitiveKind<Value = String>> IntoField<Primitive<K>> for String {
    fn into_field(self) -> Staged<Primitive<K>> {
        Some(Primitive::new(self))
    }
}

impl<K: PrimitiveKind<Value = String>> IntoField<Primitive<K>> for Option<&str> {
    fn into_field(self) -> Staged<Primitive<K>> {
        self.map(Primitive::new)
    }
}

impl IntoField<Boolean> for bool {
    fn into_field(self) -> Staged<Boolean> {
        Some(Ok(Boolean::from(self)))
    }
}

impl IntoField<Integer> for i32 {
    fn into_field(self) -> Staged<Integer> {
        Some(Ok(Integer::from(self)))
    }
}

impl IntoField<FhirDecimal> for Decimal {
    fn into_field(self) -> Staged<FhirDecimal> {
        Some(Ok(FhirDecimal::from(self)))
    }
}

#[derive(Debug, Clone)]
pub struct PrimitiveBuilder<K: PrimitiveKind> {
    element: ElementStage,
    value: Option<K::Value>,
}

impl<K: PrimitiveKind> PrimitiveBuilder<K> {
    pub fn value(mut self, value: impl Into<K::Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn clear_value(mut self) -> Self {
        self.value = None;
        self
    }
}

impl<K: PrimitiveKind> From<&Primitive<K>> for PrimitiveBuilder<K> {
    fn from(primitive: &Primitive<K>) -> Self {
        Self {
            element: ElementStage::from_base(&primitive.element),
            value: primitive.value.clone(),
        }
    }
}

impl<K: PrimitiveKind> ElementBuilder for PrimitiveBuilder<K> {
    fn element_stage(&mut self) -> &mut ElementStage {
        &mut self.element
    }
}

impl<K: PrimitiveKind> Builder for PrimitiveBuilder<K> {
    type Output = Primitive<K>;

    fn assemble(self, _config: &ModelConfig) -> Result<Primitive<K>> {
        let element = self.element.finish()?;
        if let Some(value) = &self.value {
            K::check(value).map_err(|reason| {
                Error::invalid_primitive(K::TYPE_NAME, reason).in_field("value")
            })?;
        }
        let primitive = Primitive {
            element,
            value: self.value,
        };
        validation::require_value_or_children(&primitive)?;
        Ok(primitive)
    }
}

// ============================================================================
// Shape checks
// ============================================================================

fn is_unsupported_control(ch: char) -> bool {
    (ch as u32) < 32 && !matches!(ch, '\t' | '\n' | '\r')
}

pub(crate) fn check_string(s: &str) -> std::result::Result<(), String> {
    let length = s.chars().count();
    if length > MAX_STRING_LENGTH {
        return Err(format!(
            "String value length: {} is greater than maximum allowed length: {}",
            length, MAX_STRING_LENGTH
        ));
    }
    let mut count = 0;
    for ch in s.chars() {
        if is_unsupported_control(ch) {
            return Err(format!(
                "String value contains unsupported control character U+{:04X}",
                ch as u32
            ));
        }
        if !ch.is_whitespace() {
            count += 1;
        } else if !matches!(ch, ' ' | '\t' | '\r' | '\n') {
            return Err(format!(
                "String value: {:?} is not valid with respect to pattern: [ \\r\\n\\t\\S]+",
                s
            ));
        }
    }
    if count == 0 {
        return Err(
            "Trimmed String value length: 0 is less than minimum required length: 1".to_string(),
        );
    }
    Ok(())
}

pub(crate) fn check_code(s: &str) -> std::result::Result<(), String> {
    check_string(s)?;
    if s.starts_with(char::is_whitespace) {
        return Err(format!("Code value: {:?} must begin with a non-whitespace character", s));
    }
    if s.ends_with(char::is_whitespace) {
        return Err(format!("Code value: {:?} must end with a non-whitespace character", s));
    }
    let mut previous_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if ch != ' ' {
                return Err(format!(
                    "Code value: {:?} must not contain whitespace other than a single space",
                    s
                ));
            }
            if previous_space {
                return Err(format!("Code value: {:?} must not contain consecutive spaces", s));
            }
            previous_space = true;
        } else {
            previous_space = false;
        }
    }
    Ok(())
}

pub(crate) fn check_id(s: &str) -> std::result::Result<(), String> {
    if s.is_empty() {
        return Err("Id value must not be empty".to_string());
    }
    if s.len() > MAX_ID_LENGTH {
        return Err(format!(
            "Id value length: {} is greater than maximum allowed length: {}",
            s.len(),
            MAX_ID_LENGTH
        ));
    }
    if let Some(c) = s
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '.'))
    {
        return Err(format!("Id value: {:?} contains invalid character {:?}", s, c));
    }
    Ok(())
}

pub(crate) fn check_uri(s: &str) -> std::result::Result<(), String> {
    let length = s.chars().count();
    if length > MAX_STRING_LENGTH {
        return Err(format!(
            "Uri value length: {} is greater than maximum allowed length: {}",
            length, MAX_STRING_LENGTH
        ));
    }
    if s.is_empty() {
        return Err("Uri value must not be empty".to_string());
    }
    if s.chars().any(char::is_whitespace) {
        return Err(format!("Uri value: {:?} must not contain whitespace", s));
    }
    Ok(())
}

static DATE_RE: OnceLock<Regex> = OnceLock::new();
static DATE_TIME_RE: OnceLock<Regex> = OnceLock::new();
static INSTANT_RE: OnceLock<Regex> = OnceLock::new();

fn check_pattern(s: &str, type_name: &str, re: &Regex) -> std::result::Result<(), String> {
    if re.is_match(s) {
        Ok(())
    } else {
        Err(format!("{:?} is not a valid {}", s, type_name))
    }
}

pub(crate) fn check_date(s: &str) -> std::result::Result<(), String> {
    let re = DATE_RE.get_or_init(|| {
        Regex::new(
            r"^([0-9]([0-9]([0-9][1-9]|[1-9]0)|[1-9]00)|[1-9]000)(-(0[1-9]|1[0-2])(-(0[1-9]|[1-2][0-9]|3[0-1]))?)?$",
        )
        .expect("date regex must compile")
    });
    check_pattern(s, "date", re)
}

pub(crate) fn check_date_time(s: &str) -> std::result::Result<(), String> {
    let re = DATE_TIME_RE.get_or_init(|| {
        Regex::new(
            r"^([0-9]([0-9]([0-9][1-9]|[1-9]0)|[1-9]00)|[1-9]000)(-(0[1-9]|1[0-2])(-(0[1-9]|[1-2][0-9]|3[0-1])(T([01][0-9]|2[0-3]):[0-5][0-9]:([0-5][0-9]|60)(\.[0-9]+)?(Z|(\+|-)((0[0-9]|1[0-3]):[0-5][0-9]|14:00)))?)?)?$",
        )
        .expect("dateTime regex must compile")
    });
    check_pattern(s, "dateTime", re)
}

pub(crate) fn check_instant(s: &str) -> std::result::Result<(), String> {
    let re = INSTANT_RE.get_or_init(|| {
        Regex::new(
            r"^([0-9]([0-9]([0-9][1-9]|[1-9]0)|[1-9]00)|[1-9]000)-(0[1-9]|1[0-2])-(0[1-9]|[1-2][0-9]|3[0-1])T([01][0-9]|2[0-3]):[0-5][0-9]:([0-5][0-9]|60)(\.[0-9]+)?(Z|(\+|-)((0[0-9]|1[0-3]):[0-5][0-9]|14:00))$",
        )
        .expect("instant regex must compile")
    });
    check_pattern(s, "instant", re)
}

pub(crate) fn check_xhtml(s: &str) -> std::result::Result<(), String> {
    let trimmed = s.trim();
    if trimmed.starts_with("<div") && trimmed.ends_with('>') {
        Ok(())
    } else {
        Err("Invalid XHTML content: narrative must be a single <div> element".to_string())
    }
}

//! Choice values
//!
//! Setters for a choice field (`value[x]`, `deceased[x]`, ...) accept the open
//! [`Value`] union. At `build()` the staged value is narrowed to the field's
//! closed enum, declared with [`choice!`](crate::choice), which lists the
//! field's allowed types in declaration order.

use crate::builder::{IntoField, Staged};
use crate::datatypes::{CodeableConcept, Coding, Identifier, Period, Quantity, Reference};
use crate::primitive::{
    Boolean, Code, Date, DateTime, FhirDecimal, FhirString, Id, Instant, Integer, Uri,
};
use crate::visitor::Visitable;

/// Schema name of a concrete type, usable in constant context.
pub trait FhirType {
    const TYPE_NAME: &'static str;
}

/// Wrappers that are visited as the node they hold.
pub trait AsVisitable {
    fn as_visitable(&self) -> &dyn Visitable;
}

/// Every type that may populate a choice field or an extension value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Boolean(Boolean),
    Integer(Integer),
    Decimal(FhirDecimal),
    String(FhirString),
    Code(Code),
    Id(Id),
    Uri(Uri),
    Date(Date),
    DateTime(DateTime),
    Instant(Instant),
    Coding(Coding),
    CodeableConcept(CodeableConcept),
    Quantity(Quantity),
    Period(Period),
    Identifier(Identifier),
    Reference(Reference),
}

macro_rules! value_variants {
    ($($variant:ident($ty:ty)),+ $(,)?) => {
        impl Value {
            pub fn type_name(&self) -> &'static str {
                match self {
                    $(Self::$variant(_) => <$ty as FhirType>::TYPE_NAME,)+
                }
            }
        }

        impl AsVisitable for Value {
            fn as_visitable(&self) -> &dyn Visitable {
                match self {
                    $(Self::$variant(v) => v as &dyn Visitable,)+
                }
            }
        }

        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::$variant(v)
                }
            }

            impl IntoField<Value> for $ty {
                fn into_field(self) -> Staged<Value> {
                    Some(Ok(Value::$variant(self)))
                }
            }

            impl IntoField<Value> for Option<$ty> {
                fn into_field(self) -> Staged<Value> {
                    self.map(|v| Ok(Value::$variant(v)))
                }
            }
        )+
    };
}

value_variants!(
    Boolean(Boolean),
    Integer(Integer),
    Decimal(FhirDecimal),
    String(FhirString),
    Code(Code),
    Id(Id),
    Uri(Uri),
    Date(Date),
    DateTime(DateTime),
    Instant(Instant),
    Coding(Coding),
    CodeableConcept(CodeableConcept),
    Quantity(Quantity),
    Period(Period),
    Identifier(Identifier),
    Reference(Reference),
);

impl IntoField<Value> for bool {
    fn into_field(self) -> Staged<Value> {
        Some(Ok(Value::Boolean(Boolean::from(self))))
    }
}

impl IntoField<Value> for i32 {
    fn into_field(self) -> Staged<Value> {
        Some(Ok(Value::Integer(Integer::from(self))))
    }
}

/// A string literal populates the `string` variant.
impl IntoField<Value> for &str {
    fn into_field(self) -> Staged<Value> {
        Some(FhirString::new(self).map(Value::String))
    }
}

/// A closed, per-field union generated by [`choice!`](crate::choice).
pub trait Choice:
    Sized + Clone + AsVisitable + TryFrom<Value, Error = Value> + Into<Value>
{
    /// Allowed type names, in declaration order
    const ALLOWED: &'static [&'static str];

    fn type_name(&self) -> &'static str;

    fn reference(&self) -> Option<&Reference> {
        self.as_visitable().downcast_ref::<Reference>()
    }
}

/// Declares a closed choice enum. Variant names must match the [`Value`]
/// variants they narrow, e.g.
///
/// ```
/// ferrum_core::choice! {
///     /// Patient.deceased[x]
///     pub enum Deceased {
///         Boolean(ferrum_core::Boolean),
///         DateTime(ferrum_core::DateTime),
///     }
/// }
/// use ferrum_core::Choice;
/// assert_eq!(Deceased::ALLOWED, &["boolean", "dateTime"]);
/// ```
#[macro_export]
macro_rules! choice {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident($ty:ty)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($variant($ty)),+
        }

        impl $crate::value::Choice for $name {
            const ALLOWED: &'static [&'static str] =
                &[$(<$ty as $crate::value::FhirType>::TYPE_NAME),+];

            fn type_name(&self) -> &'static str {
                match self {
                    $(Self::$variant(_) => <$ty as $crate::value::FhirType>::TYPE_NAME,)+
                }
            }
        }

        impl $crate::value::AsVisitable for $name {
            fn as_visitable(&self) -> &dyn $crate::visitor::Visitable {
                match self {
                    $(Self::$variant(v) => v as &dyn $crate::visitor::Visitable,)+
                }
            }
        }

        impl ::std::convert::TryFrom<$crate::value::Value> for $name {
            type Error = $crate::value::Value;

            #[allow(unreachable_patterns)]
            fn try_from(
                value: $crate::value::Value,
            ) -> ::std::result::Result<Self, $crate::value::Value> {
                match value {
                    $($crate::value::Value::$variant(v) => Ok(Self::$variant(v)),)+
                    other => Err(other),
                }
            }
        }

        impl ::std::convert::From<$name> for $crate::value::Value {
            fn from(choice: $name) -> Self {
                match choice {
                    $($name::$variant(v) => $crate::value::Value::$variant(v),)+
                }
            }
        }

        impl $crate::builder::IntoField<$crate::value::Value> for $name {
            fn into_field(self) -> $crate::builder::Staged<$crate::value::Value> {
                Some(Ok(self.into()))
            }
        }

        $(
            impl ::std::convert::From<$ty> for $name {
                fn from(v: $ty) -> Self {
                    Self::$variant(v)
                }
            }
        )+
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;

    crate::choice! {
        enum Onset {
            DateTime(DateTime),
            Period(Period),
            String(FhirString),
        }
    }

    #[test]
    fn test_allowed_types_follow_declaration_order() {
        assert_eq!(Onset::ALLOWED, &["dateTime", "Period", "string"]);
    }

    #[test]
    fn test_narrowing_keeps_allowed_value() {
        let value = Value::from(FhirString::new("childhood").expect("valid string"));
        let onset = Onset::try_from(value.clone()).expect("string is allowed");
        assert_eq!(onset.type_name(), "string");
        assert_eq!(Value::from(onset), value);
    }

    #[test]
    fn test_narrowing_returns_rejected_value() {
        let value = Value::from(Boolean::from(true));
        let rejected = Onset::try_from(value.clone()).expect_err("boolean not allowed");
        assert_eq!(rejected, value);
        assert_eq!(rejected.type_name(), "boolean");
    }

    #[test]
    fn test_literals_stage_values() {
        assert_eq!(
            IntoField::<Value>::into_field(true),
            Some(Ok(Value::Boolean(Boolean::from(true))))
        );
        let staged: Staged<Value> = "   ".into_field();
        assert!(matches!(staged, Some(Err(_))));
    }

    #[test]
    fn test_reference_lookup_through_choice() {
        let reference = Reference::builder()
            .reference("Patient/1")
            .build()
            .expect("reference builds");
        crate::choice! {
            enum Subject {
                Reference(Reference),
                CodeableConcept(CodeableConcept),
            }
        }
        let subject = Subject::from(reference.clone());
        assert_eq!(subject.reference(), Some(&reference));
    }
}

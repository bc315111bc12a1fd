//! Structural FHIR model core
//!
//! Every resource is an immutable tree of typed nodes built through a
//! validating builder and walked through a fixed-order visitor.
//!
//! # Architecture Overview
//!
//! ```text
//! Builder (staged fields, literals, nulls)
//!      |
//!   build() -> validation, first violation wins
//!      |
//! Immutable node tree (Send + Sync, Clone, Eq, Hash)
//!      |
//!   traverse() -> Visitor hooks in declaration order
//! ```
//!
//! - [`node`]: field groups and capability traits for elements, backbone
//!   elements, resources and domain resources
//! - [`primitive`]: primitive elements and their shape checks
//! - [`value`]: the open [`Value`] union and closed [`choice!`] enums
//! - [`datatypes`]: Extension, Reference and the other datatypes the engine
//!   itself depends on
//! - [`builder`], [`validation`], [`visitor`]: the three protocols
//! - [`error`], [`issue`]: violations and their issue-report shape
//!
//! # Example
//!
//! ```rust
//! use ferrum_core::prelude::*;
//! use ferrum_core::{CodeableConcept, Coding};
//!
//! let concept = CodeableConcept::builder()
//!     .coding([Coding::builder()
//!         .system("http://loinc.org")
//!         .code("29463-7")
//!         .build()?])
//!     .text("Body weight")
//!     .build()?;
//! assert!(concept.has_coding("http://loinc.org", "29463-7"));
//!
//! let err = CodeableConcept::builder().build().unwrap_err();
//! assert_eq!(err.kind(), ViolationKind::EmptyNode);
//! # Ok::<(), ferrum_core::Error>(())
//! ```

pub mod builder;
pub mod config;
pub mod datatypes;
pub mod error;
pub mod issue;
pub mod node;
pub mod primitive;
pub mod validation;
pub mod value;
pub mod visitor;

// Re-export main types
pub use builder::{Builder, IntoField, Staged, StagedList};
pub use config::ModelConfig;
pub use datatypes::{
    CodeableConcept, Coding, Extension, ExtensionDefinition, Identifier, Meta, Narrative, Period,
    Quantity, Reference, ReferenceTarget,
};
pub use error::{Error, Result, ViolationKind};
pub use issue::{IssueCode, IssueSeverity, ValidationIssue};
pub use node::{
    BackboneElement, BackboneElementBuilder, DomainResource, DomainResourceBuilder, Element,
    ElementBuilder, Resource, ResourceBuilder,
};
pub use primitive::{
    Boolean, Code, Date, DateTime, FhirDecimal, FhirString, Id, Instant, Integer, Primitive,
    PrimitiveKind, Uri, Xhtml,
};
pub use value::{AsVisitable, Choice, FhirType, Value};
pub use visitor::{
    traverse, CollectingVisitor, NodeKind, PathVisitor, PrimitiveValue, Visitable, Visitor,
};

/// Traits needed to call builder setters and node getters.
pub mod prelude {
    pub use crate::builder::Builder;
    pub use crate::error::ViolationKind;
    pub use crate::node::{
        BackboneElement, BackboneElementBuilder, DomainResource, DomainResourceBuilder, Element,
        ElementBuilder, Resource, ResourceBuilder,
    };
    pub use crate::value::{AsVisitable, Choice};
    pub use crate::visitor::{Visitable, Visitor};
}

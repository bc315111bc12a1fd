//! FHIR resource models
//!
//! Concrete schema types on top of `ferrum-core`, in the shape a generator
//! emits them: one immutable struct per type, one builder per struct, and
//! the capability traits of the type's shape.
//!
//! # Module Organization
//!
//! - [`human_name`]: the HumanName datatype
//! - [`patient`], [`group`], [`organization`], [`observation`],
//!   [`condition`], [`operation_outcome`]: resources with their backbone
//!   elements and choice enums
//! - [`any_resource`]: the closed resource union used by `contained`
//!
//! # Example
//!
//! ```rust
//! use ferrum_core::prelude::*;
//! use ferrum_core::Reference;
//! use ferrum_models::{Condition, OperationOutcome};
//!
//! let subject = Reference::builder().reference("Organization/1").build()?;
//! let err = Condition::builder().subject(subject).build().unwrap_err();
//! assert_eq!(err.kind(), ViolationKind::InvalidReferenceTargetType);
//!
//! let outcome = OperationOutcome::from_error(&err)?;
//! assert_eq!(outcome.to_json()["issue"][0]["code"], "invalid");
//! # Ok::<(), ferrum_core::Error>(())
//! ```

#[macro_use]
mod macros;

pub mod any_resource;
pub mod condition;
pub mod group;
pub mod human_name;
pub mod observation;
pub mod operation_outcome;
pub mod organization;
pub mod patient;

// Re-export main types
pub use any_resource::AnyResource;
pub use condition::{Condition, ConditionAbatement, ConditionBuilder, ConditionOnset};
pub use group::{
    Group, GroupBuilder, GroupCharacteristic, GroupCharacteristicBuilder, GroupCharacteristicValue,
    GroupMember, GroupMemberBuilder,
};
pub use human_name::{HumanName, HumanNameBuilder};
pub use observation::{
    Observation, ObservationBuilder, ObservationComponent, ObservationComponentBuilder,
    ObservationEffective, ObservationValue,
};
pub use operation_outcome::{
    OperationOutcome, OperationOutcomeBuilder, OperationOutcomeIssue, OperationOutcomeIssueBuilder,
};
pub use organization::{Organization, OrganizationBuilder};
pub use patient::{Patient, PatientBuilder, PatientContact, PatientContactBuilder, PatientDeceased};

//! Foundational datatypes the structural engine depends on
//!
//! These are the types extension values, references and resource metadata
//! are made of. Domain datatypes such as HumanName live with the resources.

mod coding;
mod extension;
mod identifier;
mod meta;
mod narrative;
mod period;
mod quantity;
pub(crate) mod reference;

pub use coding::{CodeableConcept, CodeableConceptBuilder, Coding, CodingBuilder};
pub use extension::{Extension, ExtensionBuilder, ExtensionDefinition};
pub use identifier::{Identifier, IdentifierBuilder};
pub use meta::{Meta, MetaBuilder};
pub use narrative::{Narrative, NarrativeBuilder};
pub use period::{Period, PeriodBuilder};
pub use quantity::{Quantity, QuantityBuilder};
pub use reference::{Reference, ReferenceBuilder, ReferenceTarget};

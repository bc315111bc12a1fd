//! Closed union of the resource types this crate models
//!
//! Used wherever a field may hold any resource, most notably
//! `DomainResource.contained`.

use ferrum_core::{AsVisitable, Visitable};

use crate::{Condition, Group, Observation, OperationOutcome, Organization, Patient};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnyResource {
    Condition(Condition),
    Group(Group),
    Observation(Observation),
    OperationOutcome(OperationOutcome),
    Organization(Organization),
    Patient(Patient),
}

impl AnyResource {
    /// Resource type name, e.g. `Patient`
    pub fn resource_type(&self) -> &'static str {
        self.as_visitable().type_name()
    }

    /// Logical id of the wrapped resource
    pub fn id(&self) -> Option<&str> {
        use ferrum_core::Resource;
        match self {
            Self::Condition(r) => r.id(),
            Self::Group(r) => r.id(),
            Self::Observation(r) => r.id(),
            Self::OperationOutcome(r) => r.id(),
            Self::Organization(r) => r.id(),
            Self::Patient(r) => r.id(),
        }
    }

    /// The wrapped resource, if it is a `T`.
    pub fn downcast_ref<T: Visitable>(&self) -> Option<&T> {
        self.as_visitable().downcast_ref::<T>()
    }
}

impl AsVisitable for AnyResource {
    fn as_visitable(&self) -> &dyn Visitable {
        match self {
            Self::Condition(r) => r,
            Self::Group(r) => r,
            Self::Observation(r) => r,
            Self::OperationOutcome(r) => r,
            Self::Organization(r) => r,
            Self::Patient(r) => r,
        }
    }
}

//! Builder protocol
//!
//! A builder is plain mutable staging state. Setters record what they were
//! given, including absent entries and rejected literals, and every check is
//! deferred to [`Builder::build`], which reports the first violation in field
//! declaration order.

use crate::config::ModelConfig;
use crate::error::Result;
use crate::value::FhirType;

/// A staged scalar field. `None` is an absent value; `Some(Err(_))` is a
/// literal that failed conversion and is reported at `build()`.
pub type Staged<T> = Option<Result<T>>;

/// A staged list field. `None` entries are nulls passed to a setter.
pub type StagedList<T> = Vec<Staged<T>>;

/// Anything a setter for a `T` field accepts.
pub trait IntoField<T> {
    fn into_field(self) -> Staged<T>;
}

impl<T> IntoField<T> for T {
    fn into_field(self) -> Staged<T> {
        Some(Ok(self))
    }
}

/// `None` stages an absent value, or a null entry in a list.
impl<T> IntoField<T> for Option<T> {
    fn into_field(self) -> Staged<T> {
        self.map(Ok)
    }
}

/// Adds items to a staged list.
pub fn append<T, I>(list: &mut StagedList<T>, items: I)
where
    I: IntoIterator,
    I::Item: IntoField<T>,
{
    list.extend(items.into_iter().map(IntoField::into_field));
}

/// Discards the staged list and installs `items`.
pub fn replace<T, I>(list: &mut StagedList<T>, items: I)
where
    I: IntoIterator,
    I::Item: IntoField<T>,
{
    *list = items.into_iter().map(IntoField::into_field).collect();
}

/// Copies built values back into staged form.
pub fn restage<T: Clone>(items: &[T]) -> StagedList<T> {
    items.iter().cloned().map(|item| Some(Ok(item))).collect()
}

pub fn restage_one<T: Clone>(item: Option<&T>) -> Staged<T> {
    item.cloned().map(Ok)
}

pub trait Builder: Sized {
    type Output: FhirType;

    /// Validates the staged fields and assembles the immutable value.
    fn assemble(self, config: &ModelConfig) -> Result<Self::Output>;

    fn build(self) -> Result<Self::Output> {
        self.build_with(&ModelConfig::default())
    }

    /// Violations name their field by path from the built type, e.g.
    /// `Observation.status`.
    fn build_with(self, config: &ModelConfig) -> Result<Self::Output> {
        let type_name = <Self::Output as FhirType>::TYPE_NAME;
        self.assemble(config).map_err(|err| {
            let err = err.qualified(type_name);
            tracing::debug!(
                type_name,
                violation = ?err.kind(),
                "build rejected: {}",
                err
            );
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_append_keeps_prior_entries() {
        let mut list: StagedList<i32> = Vec::new();
        append(&mut list, [1, 2]);
        append(&mut list, [Some(3), None]);

        assert_eq!(list.len(), 4);
        assert_eq!(list[2], Some(Ok(3)));
        assert_eq!(list[3], None);
    }

    #[test]
    fn test_replace_discards_prior_entries() {
        let mut list: StagedList<i32> = Vec::new();
        append(&mut list, [None::<i32>]);
        replace(&mut list, [7]);
        assert_eq!(list, vec![Some(Ok(7))]);
    }

    #[test]
    fn test_restage_round_trips_values() {
        let staged = restage(&[1, 2]);
        assert_eq!(staged, vec![Some(Ok(1)), Some(Ok(2))]);
        assert_eq!(restage_one(Some(&5)), Some(Ok::<i32, Error>(5)));
        assert_eq!(restage_one::<i32>(None), None);
    }
}

use crate::builder::{Builder, IntoField, Staged};
use crate::config::ModelConfig;
use crate::error::Result;
use crate::node::{Element, ElementBase, ElementBuilder, ElementStage};
use crate::primitive::DateTime;
use crate::validation;
use crate::value::FhirType;
use crate::visitor::{accept_field, NodeKind, Visitable, Visitor};

/// Time range defined by start and end date/time
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Period {
    element: ElementBase,
    start: Option<DateTime>,
    end: Option<DateTime>,
}

impl Period {
    pub fn builder() -> PeriodBuilder {
        PeriodBuilder::default()
    }

    pub fn to_builder(&self) -> PeriodBuilder {
        PeriodBuilder::from(self)
    }

    pub fn start(&self) -> Option<&DateTime> {
        self.start.as_ref()
    }

    /// End time, absent if the period is ongoing
    pub fn end(&self) -> Option<&DateTime> {
        self.end.as_ref()
    }
}

impl FhirType for Period {
    const TYPE_NAME: &'static str = "Period";
}

impl Visitable for Period {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn node_kind(&self) -> NodeKind {
        NodeKind::Element
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn element_id(&self) -> Option<&str> {
        Element::id(self)
    }

    fn accept_children(&self, visitor: &mut dyn Visitor) {
        self.element.accept_children(visitor);
        accept_field("start", self.start.as_ref(), visitor);
        accept_field("end", self.end.as_ref(), visitor);
    }
}

impl Element for Period {
    fn element(&self) -> &ElementBase {
        &self.element
    }
}

#[derive(Debug, Clone, Default)]
pub struct PeriodBuilder {
    element: ElementStage,
    start: Staged<DateTime>,
    end: Staged<DateTime>,
}

impl PeriodBuilder {
    pub fn start(mut self, start: impl IntoField<DateTime>) -> Self {
        self.start = start.into_field();
        self
    }

    pub fn end(mut self, end: impl IntoField<DateTime>) -> Self {
        self.end = end.into_field();
        self
    }
}

impl From<&Period> for PeriodBuilder {
    fn from(period: &Period) -> Self {
        Self {
            element: ElementStage::from_base(&period.element),
            start: period.start.clone().map(Ok),
            end: period.end.clone().map(Ok),
        }
    }
}

impl ElementBuilder for PeriodBuilder {
    fn element_stage(&mut self) -> &mut ElementStage {
        &mut self.element
    }
}

impl Builder for PeriodBuilder {
    type Output = Period;

    fn assemble(self, _config: &ModelConfig) -> Result<Period> {
        let period = Period {
            element: self.element.finish()?,
            start: validation::optional("start", self.start)?,
            end: validation::optional("end", self.end)?,
        };
        validation::require_value_or_children(&period)?;
        Ok(period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_open_ended_period() {
        let period = Period::builder()
            .start("2023-01-01")
            .build()
            .expect("period builds");
        assert_eq!(
            period.start().and_then(|s| s.value()).map(String::as_str),
            Some("2023-01-01")
        );
        assert!(period.end().is_none());
    }

    #[test]
    fn test_invalid_end_is_named() {
        let err = Period::builder()
            .start("2023-01-01")
            .end("yesterday")
            .build()
            .expect_err("not a dateTime");
        assert!(matches!(
            err,
            Error::InvalidPrimitiveValue { ref field, .. } if field == "end"
        ));
    }
}

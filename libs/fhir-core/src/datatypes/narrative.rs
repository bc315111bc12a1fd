use crate::builder::{Builder, IntoField, Staged};
use crate::config::ModelConfig;
use crate::error::Result;
use crate::node::{Element, ElementBase, ElementBuilder, ElementStage};
use crate::primitive::{Code, Xhtml};
use crate::validation;
use crate::value::FhirType;
use crate::visitor::{accept_field, NodeKind, Visitable, Visitor};

/// Human-readable summary of a resource
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Narrative {
    element: ElementBase,
    /// generated | extensions | additional | empty
    status: Code,
    div: Xhtml,
}

impl Narrative {
    pub fn builder() -> NarrativeBuilder {
        NarrativeBuilder::default()
    }

    pub fn to_builder(&self) -> NarrativeBuilder {
        NarrativeBuilder::from(self)
    }

    pub fn status(&self) -> &Code {
        &self.status
    }

    pub fn div(&self) -> &Xhtml {
        &self.div
    }
}

impl FhirType for Narrative {
    const TYPE_NAME: &'static str = "Narrative";
}

impl Visitable for Narrative {
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
        accept_field("status", Some(&self.status), visitor);
        accept_field("div", Some(&self.div), visitor);
    }
}

impl Element for Narrative {
    fn element(&self) -> &ElementBase {
        &self.element
    }
}

#[derive(Debug, Clone, Default)]
pub struct NarrativeBuilder {
    element: ElementStage,
    status: Staged<Code>,
    div: Staged<Xhtml>,
}

impl NarrativeBuilder {
    pub fn status(mut self, status: impl IntoField<Code>) -> Self {
        self.status = status.into_field();
        self
    }

    pub fn div(mut self, div: impl IntoField<Xhtml>) -> Self {
        self.div = div.into_field();
        self
    }
}

impl From<&Narrative> for NarrativeBuilder {
    fn from(narrative: &Narrative) -> Self {
        Self {
            element: ElementStage::from_base(&narrative.element),
            status: Some(Ok(narrative.status.clone())),
            div: Some(Ok(narrative.div.clone())),
        }
    }
}

impl ElementBuilder for NarrativeBuilder {
    fn element_stage(&mut self) -> &mut ElementStage {
        &mut self.element
    }
}

impl Builder for NarrativeBuilder {
    type Output = Narrative;

    fn assemble(self, _config: &ModelConfig) -> Result<Narrative> {
        let narrative = Narrative {
            element: self.element.finish()?,
            status: validation::require("status", self.status)?,
            div: validation::require("div", self.div)?,
        };
        validation::require_value_or_children(&narrative)?;
        Ok(narrative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_required_fields_in_order() {
        let err = Narrative::builder().build().expect_err("status missing");
        assert_eq!(
            err,
            Error::MissingRequiredField {
                field: "Narrative.status".to_string()
            }
        );

        let err = Narrative::builder()
            .status("generated")
            .build()
            .expect_err("div missing");
        assert_eq!(err.field(), Some("div"));
    }

    #[test]
    fn test_div_must_be_xhtml_div() {
        let err = Narrative::builder()
            .status("generated")
            .div("plain text")
            .build()
            .expect_err("not a div");
        assert_eq!(err.field(), Some("div"));

        let narrative = Narrative::builder()
            .status("generated")
            .div("<div xmlns=\"http://www.w3.org/1999/xhtml\">Peter</div>")
            .build()
            .expect("narrative builds");
        assert_eq!(narrative.status().value().map(String::as_str), Some("generated"));
    }
}

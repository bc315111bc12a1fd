use ferrum_core::builder::{append, replace, restage, Builder, IntoField, Staged, StagedList};
use ferrum_core::node::{ElementBase, ElementStage};
use ferrum_core::visitor::{accept_field, accept_list, NodeKind, Visitable, Visitor};
use ferrum_core::{validation, Code, FhirString, FhirType, ModelConfig, Period, Result};

/// Name of a human, with text, parts and usage information
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HumanName {
    element: ElementBase,
    /// usual | official | temp | nickname | anonymous | old | maiden
    use_: Option<Code>,
    text: Option<FhirString>,
    family: Option<FhirString>,
    given: Vec<FhirString>,
    prefix: Vec<FhirString>,
    suffix: Vec<FhirString>,
    period: Option<Period>,
}

impl HumanName {
    pub fn builder() -> HumanNameBuilder {
        HumanNameBuilder::default()
    }

    pub fn to_builder(&self) -> HumanNameBuilder {
        HumanNameBuilder::from(self)
    }

    pub fn use_(&self) -> Option<&Code> {
        self.use_.as_ref()
    }

    pub fn text(&self) -> Option<&FhirString> {
        self.text.as_ref()
    }

    pub fn family(&self) -> Option<&FhirString> {
        self.family.as_ref()
    }

    /// Given names, in order
    pub fn given(&self) -> &[FhirString] {
        &self.given
    }

    pub fn prefix(&self) -> &[FhirString] {
        &self.prefix
    }

    pub fn suffix(&self) -> &[FhirString] {
        &self.suffix
    }

    pub fn period(&self) -> Option<&Period> {
        self.period.as_ref()
    }
}

element_type!(HumanName, HumanNameBuilder, "HumanName");

impl Visitable for HumanName {
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
        ferrum_core::Element::id(self)
    }

    fn accept_children(&self, visitor: &mut dyn Visitor) {
        self.element.accept_children(visitor);
        accept_field("use", self.use_.as_ref(), visitor);
        accept_field("text", self.text.as_ref(), visitor);
        accept_field("family", self.family.as_ref(), visitor);
        accept_list("given", &self.given, visitor);
        accept_list("prefix", &self.prefix, visitor);
        accept_list("suffix", &self.suffix, visitor);
        accept_field("period", self.period.as_ref(), visitor);
    }
}

#[derive(Debug, Clone, Default)]
pub struct HumanNameBuilder {
    element: ElementStage,
    use_: Staged<Code>,
    text: Staged<FhirString>,
    family: Staged<FhirString>,
    given: StagedList<FhirString>,
    prefix: StagedList<FhirString>,
    suffix: StagedList<FhirString>,
    period: Staged<Period>,
}

impl HumanNameBuilder {
    pub fn use_(mut self, use_: impl IntoField<Code>) -> Self {
        self.use_ = use_.into_field();
        self
    }

    pub fn text(mut self, text: impl IntoField<FhirString>) -> Self {
        self.text = text.into_field();
        self
    }

    pub fn family(mut self, family: impl IntoField<FhirString>) -> Self {
        self.family = family.into_field();
        self
    }

    pub fn given<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<FhirString>,
    {
        append(&mut self.given, items);
        self
    }

    pub fn set_given<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<FhirString>,
    {
        replace(&mut self.given, items);
        self
    }

    pub fn prefix<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<FhirString>,
    {
        append(&mut self.prefix, items);
        self
    }

    pub fn set_prefix<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<FhirString>,
    {
        replace(&mut self.prefix, items);
        self
    }

    pub fn suffix<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<FhirString>,
    {
        append(&mut self.suffix, items);
        self
    }

    pub fn set_suffix<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<FhirString>,
    {
        replace(&mut self.suffix, items);
        self
    }

    pub fn period(mut self, period: impl IntoField<Period>) -> Self {
        self.period = period.into_field();
        self
    }
}

impl From<&HumanName> for HumanNameBuilder {
    fn from(name: &HumanName) -> Self {
        Self {
            element: ElementStage::from_base(&name.element),
            use_: name.use_.clone().map(Ok),
            text: name.text.clone().map(Ok),
            family: name.family.clone().map(Ok),
            given: restage(&name.given),
            prefix: restage(&name.prefix),
            suffix: restage(&name.suffix),
            period: name.period.clone().map(Ok),
        }
    }
}

impl Builder for HumanNameBuilder {
    type Output = HumanName;

    fn assemble(self, _config: &ModelConfig) -> Result<HumanName> {
        let name = HumanName {
            element: self.element.finish()?,
            use_: validation::optional("use", self.use_)?,
            text: validation::optional("text", self.text)?,
            family: validation::optional("family", self.family)?,
            given: validation::check_list("given", self.given)?,
            prefix: validation::check_list("prefix", self.prefix)?,
            suffix: validation::check_list("suffix", self.suffix)?,
            period: validation::optional("period", self.period)?,
        };
        validation::require_value_or_children(&name)?;
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferrum_core::Error;

    #[test]
    fn test_given_names_keep_order() {
        let name = HumanName::builder()
            .family("Chalmers")
            .given(["Peter", "James"])
            .build()
            .expect("name builds");
        let given: Vec<_> = name.given().iter().filter_map(|g| g.as_str()).collect();
        assert_eq!(given, vec!["Peter", "James"]);
    }

    #[test]
    fn test_null_given_name_is_reported() {
        let err = HumanName::builder()
            .given([Some("Peter"), None])
            .build()
            .expect_err("null entry");
        assert_eq!(
            err,
            Error::NullElementInList {
                field: "HumanName.given".to_string(),
                index: 1
            }
        );
    }
}

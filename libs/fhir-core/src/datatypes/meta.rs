use crate::builder::{append, replace, restage, Builder, IntoField, Staged, StagedList};
use crate::config::ModelConfig;
use crate::datatypes::Coding;
use crate::error::Result;
use crate::node::{Element, ElementBase, ElementBuilder, ElementStage};
use crate::primitive::{Id, Instant, Uri};
use crate::validation;
use crate::value::FhirType;
use crate::visitor::{accept_field, accept_list, NodeKind, Visitable, Visitor};

/// Metadata about a resource
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Meta {
    element: ElementBase,
    version_id: Option<Id>,
    last_updated: Option<Instant>,
    /// Identifies where the resource comes from
    source: Option<Uri>,
    /// Profiles this resource claims to conform to
    profile: Vec<Uri>,
    security: Vec<Coding>,
    tag: Vec<Coding>,
}

impl Meta {
    pub fn builder() -> MetaBuilder {
        MetaBuilder::default()
    }

    pub fn to_builder(&self) -> MetaBuilder {
        MetaBuilder::from(self)
    }

    pub fn version_id(&self) -> Option<&Id> {
        self.version_id.as_ref()
    }

    pub fn last_updated(&self) -> Option<&Instant> {
        self.last_updated.as_ref()
    }

    pub fn source(&self) -> Option<&Uri> {
        self.source.as_ref()
    }

    pub fn profile(&self) -> &[Uri] {
        &self.profile
    }

    pub fn security(&self) -> &[Coding] {
        &self.security
    }

    pub fn tag(&self) -> &[Coding] {
        &self.tag
    }
}

impl FhirType for Meta {
    const TYPE_NAME: &'static str = "Meta";
}

impl Visitable for Meta {
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
        accept_field("versionId", self.version_id.as_ref(), visitor);
        accept_field("lastUpdated", self.last_updated.as_ref(), visitor);
        accept_field("source", self.source.as_ref(), visitor);
        accept_list("profile", &self.profile, visitor);
        accept_list("security", &self.security, visitor);
        accept_list("tag", &self.tag, visitor);
    }
}

impl Element for Meta {
    fn element(&self) -> &ElementBase {
        &self.element
    }
}

#[derive(Debug, Clone, Default)]
pub struct MetaBuilder {
    element: ElementStage,
    version_id: Staged<Id>,
    last_updated: Staged<Instant>,
    source: Staged<Uri>,
    profile: StagedList<Uri>,
    security: StagedList<Coding>,
    tag: StagedList<Coding>,
}

impl MetaBuilder {
    pub fn version_id(mut self, version_id: impl IntoField<Id>) -> Self {
        self.version_id = version_id.into_field();
        self
    }

    pub fn last_updated(mut self, last_updated: impl IntoField<Instant>) -> Self {
        self.last_updated = last_updated.into_field();
        self
    }

    pub fn source(mut self, source: impl IntoField<Uri>) -> Self {
        self.source = source.into_field();
        self
    }

    pub fn profile<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<Uri>,
    {
        append(&mut self.profile, items);
        self
    }

    pub fn set_profile<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<Uri>,
    {
        replace(&mut self.profile, items);
        self
    }

    pub fn security<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<Coding>,
    {
        append(&mut self.security, items);
        self
    }

    pub fn set_security<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<Coding>,
    {
        replace(&mut self.security, items);
        self
    }

    pub fn tag<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<Coding>,
    {
        append(&mut self.tag, items);
        self
    }

    pub fn set_tag<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<Coding>,
    {
        replace(&mut self.tag, items);
        self
    }
}

impl From<&Meta> for MetaBuilder {
    fn from(meta: &Meta) -> Self {
        Self {
            element: ElementStage::from_base(&meta.element),
            version_id: meta.version_id.clone().map(Ok),
            last_updated: meta.last_updated.clone().map(Ok),
            source: meta.source.clone().map(Ok),
            profile: restage(&meta.profile),
            security: restage(&meta.security),
            tag: restage(&meta.tag),
        }
    }
}

impl ElementBuilder for MetaBuilder {
    fn element_stage(&mut self) -> &mut ElementStage {
        &mut self.element
    }
}

impl Builder for MetaBuilder {
    type Output = Meta;

    fn assemble(self, _config: &ModelConfig) -> Result<Meta> {
        let meta = Meta {
            element: self.element.finish()?,
            version_id: validation::optional("versionId", self.version_id)?,
            last_updated: validation::optional("lastUpdated", self.last_updated)?,
            source: validation::optional("source", self.source)?,
            profile: validation::check_list("profile", self.profile)?,
            security: validation::check_list("security", self.security)?,
            tag: validation::check_list("tag", self.tag)?,
        };
        validation::require_value_or_children(&meta)?;
        Ok(meta)
    }
}

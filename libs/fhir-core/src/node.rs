//! Node shapes
//!
//! Instead of an inheritance chain, every concrete type embeds the field
//! groups of its shape by value and implements the matching capability
//! traits:
//!
//! | shape            | groups                                  | traits                          |
//! |------------------|-----------------------------------------|---------------------------------|
//! | element          | [`ElementBase`]                         | [`Element`]                     |
//! | backbone element | [`BackboneElementBase`]                 | [`Element`], [`BackboneElement`]|
//! | resource         | [`ResourceBase`]                        | [`Resource`]                    |
//! | domain resource  | [`DomainResourceBase`]                  | [`Resource`], [`DomainResource`]|
//!
//! Each group has a stage type holding its builder-side state and a matching
//! builder capability trait providing the shared setters.

use crate::builder::{append, replace, restage, restage_one, IntoField, StagedList, Staged};
use crate::datatypes::{Extension, Meta, Narrative};
use crate::error::{Error, Result};
use crate::primitive::{check_string, Code, Id, Uri};
use crate::validation::{check_list, optional};
use crate::value::AsVisitable;
use crate::visitor::{accept_field, accept_list, accept_nodes, ChildProbe, Visitable, Visitor};

// ============================================================================
// Field groups
// ============================================================================

/// Fields shared by every element: `id` and `extension`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ElementBase {
    id: Option<String>,
    extension: Vec<Extension>,
}

impl ElementBase {
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn extension(&self) -> &[Extension] {
        &self.extension
    }

    /// `id` is an attribute, not a child node, and is not visited.
    pub fn accept_children(&self, visitor: &mut dyn Visitor) {
        accept_list("extension", &self.extension, visitor);
    }
}

/// Element fields plus `modifierExtension`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BackboneElementBase {
    element: ElementBase,
    modifier_extension: Vec<Extension>,
}

impl BackboneElementBase {
    pub fn element(&self) -> &ElementBase {
        &self.element
    }

    pub fn modifier_extension(&self) -> &[Extension] {
        &self.modifier_extension
    }

    pub fn accept_children(&self, visitor: &mut dyn Visitor) {
        self.element.accept_children(visitor);
        accept_list("modifierExtension", &self.modifier_extension, visitor);
    }
}

/// Fields shared by every resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ResourceBase {
    id: Option<Id>,
    meta: Option<Meta>,
    implicit_rules: Option<Uri>,
    language: Option<Code>,
}

impl ResourceBase {
    pub fn id(&self) -> Option<&str> {
        self.id.as_ref().and_then(Id::value).map(String::as_str)
    }

    pub fn id_element(&self) -> Option<&Id> {
        self.id.as_ref()
    }

    pub fn meta(&self) -> Option<&Meta> {
        self.meta.as_ref()
    }

    pub fn implicit_rules(&self) -> Option<&Uri> {
        self.implicit_rules.as_ref()
    }

    pub fn language(&self) -> Option<&Code> {
        self.language.as_ref()
    }

    /// Unlike `Element.id`, the logical id is a child node and comes first.
    pub fn accept_children(&self, visitor: &mut dyn Visitor) {
        accept_field("id", self.id.as_ref(), visitor);
        accept_field("meta", self.meta.as_ref(), visitor);
        accept_field("implicitRules", self.implicit_rules.as_ref(), visitor);
        accept_field("language", self.language.as_ref(), visitor);
    }
}

/// Resource fields plus narrative, contained resources and both extension
/// lists. `R` is the closed union of resource types that may be contained.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DomainResourceBase<R> {
    resource: ResourceBase,
    text: Option<Narrative>,
    contained: Vec<R>,
    extension: Vec<Extension>,
    modifier_extension: Vec<Extension>,
}

impl<R> Default for DomainResourceBase<R> {
    fn default() -> Self {
        Self {
            resource: ResourceBase::default(),
            text: None,
            contained: Vec::new(),
            extension: Vec::new(),
            modifier_extension: Vec::new(),
        }
    }
}

impl<R: AsVisitable> DomainResourceBase<R> {
    pub fn resource(&self) -> &ResourceBase {
        &self.resource
    }

    pub fn text(&self) -> Option<&Narrative> {
        self.text.as_ref()
    }

    pub fn contained(&self) -> &[R] {
        &self.contained
    }

    pub fn extension(&self) -> &[Extension] {
        &self.extension
    }

    pub fn modifier_extension(&self) -> &[Extension] {
        &self.modifier_extension
    }

    pub fn accept_children(&self, visitor: &mut dyn Visitor) {
        self.resource.accept_children(visitor);
        accept_field("text", self.text.as_ref(), visitor);
        accept_nodes(
            "contained",
            self.contained.iter().map(|r| r.as_visitable()),
            visitor,
        );
        accept_list("extension", &self.extension, visitor);
        accept_list("modifierExtension", &self.modifier_extension, visitor);
    }
}

// ============================================================================
// Capability traits
// ============================================================================

fn by_url<'a>(extensions: &'a [Extension], url: &str) -> Vec<&'a Extension> {
    extensions.iter().filter(|e| e.url() == url).collect()
}

pub trait Element: Visitable {
    fn element(&self) -> &ElementBase;

    fn id(&self) -> Option<&str> {
        self.element().id()
    }

    fn extension(&self) -> &[Extension] {
        self.element().extension()
    }

    fn extensions_by_url(&self, url: &str) -> Vec<&Extension> {
        by_url(self.element().extension(), url)
    }

    /// Whether the node carries a scalar value of its own. Only primitives do.
    fn has_value(&self) -> bool {
        false
    }

    /// Whether any child field is populated, extensions included.
    fn has_children(&self) -> bool {
        let mut probe = ChildProbe::default();
        self.accept_children(&mut probe);
        probe.found
    }
}

pub trait BackboneElement: Element {
    fn backbone(&self) -> &BackboneElementBase;

    fn modifier_extension(&self) -> &[Extension] {
        self.backbone().modifier_extension()
    }

    fn modifier_extensions_by_url(&self, url: &str) -> Vec<&Extension> {
        by_url(self.backbone().modifier_extension(), url)
    }
}

pub trait Resource: Visitable {
    fn resource(&self) -> &ResourceBase;

    fn id(&self) -> Option<&str> {
        self.resource().id()
    }

    fn meta(&self) -> Option<&Meta> {
        self.resource().meta()
    }

    fn implicit_rules(&self) -> Option<&Uri> {
        self.resource().implicit_rules()
    }

    fn language(&self) -> Option<&Code> {
        self.resource().language()
    }
}

pub trait DomainResource: Resource {
    type Contained: AsVisitable;

    fn domain(&self) -> &DomainResourceBase<Self::Contained>;

    fn text(&self) -> Option<&Narrative> {
        self.domain().text()
    }

    fn contained(&self) -> &[Self::Contained] {
        self.domain().contained()
    }

    fn extension(&self) -> &[Extension] {
        self.domain().extension()
    }

    fn modifier_extension(&self) -> &[Extension] {
        self.domain().modifier_extension()
    }

    fn extensions_by_url(&self, url: &str) -> Vec<&Extension> {
        by_url(self.domain().extension(), url)
    }

    fn modifier_extensions_by_url(&self, url: &str) -> Vec<&Extension> {
        by_url(self.domain().modifier_extension(), url)
    }
}

// ============================================================================
// Stages
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct ElementStage {
    id: Option<String>,
    extension: StagedList<Extension>,
}

impl ElementStage {
    pub fn from_base(base: &ElementBase) -> Self {
        Self {
            id: base.id.clone(),
            extension: restage(&base.extension),
        }
    }

    pub fn finish(self) -> Result<ElementBase> {
        if let Some(id) = &self.id {
            check_string(id).map_err(|reason| Error::InvalidPrimitiveValue {
                field: "id".to_string(),
                type_name: "string".to_string(),
                reason,
            })?;
        }
        Ok(ElementBase {
            id: self.id,
            extension: check_list("extension", self.extension)?,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct BackboneStage {
    element: ElementStage,
    modifier_extension: StagedList<Extension>,
}

impl BackboneStage {
    pub fn from_base(base: &BackboneElementBase) -> Self {
        Self {
            element: ElementStage::from_base(&base.element),
            modifier_extension: restage(&base.modifier_extension),
        }
    }

    pub fn element_mut(&mut self) -> &mut ElementStage {
        &mut self.element
    }

    pub fn finish(self) -> Result<BackboneElementBase> {
        Ok(BackboneElementBase {
            element: self.element.finish()?,
            modifier_extension: check_list("modifierExtension", self.modifier_extension)?,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResourceStage {
    id: Option<String>,
    meta: Staged<Meta>,
    implicit_rules: Staged<Uri>,
    language: Staged<Code>,
}

impl ResourceStage {
    pub fn from_base(base: &ResourceBase) -> Self {
        Self {
            id: base.id().map(str::to_string),
            meta: restage_one(base.meta.as_ref()),
            implicit_rules: restage_one(base.implicit_rules.as_ref()),
            language: restage_one(base.language.as_ref()),
        }
    }

    pub fn finish(self) -> Result<ResourceBase> {
        Ok(ResourceBase {
            id: self.id.map(Id::new).transpose().map_err(|err| err.in_field("id"))?,
            meta: optional("meta", self.meta)?,
            implicit_rules: optional("implicitRules", self.implicit_rules)?,
            language: optional("language", self.language)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct DomainResourceStage<R> {
    resource: ResourceStage,
    text: Staged<Narrative>,
    contained: StagedList<R>,
    extension: StagedList<Extension>,
    modifier_extension: StagedList<Extension>,
}

impl<R> Default for DomainResourceStage<R> {
    fn default() -> Self {
        Self {
            resource: ResourceStage::default(),
            text: None,
            contained: Vec::new(),
            extension: Vec::new(),
            modifier_extension: Vec::new(),
        }
    }
}

impl<R: Clone> DomainResourceStage<R> {
    pub fn from_base(base: &DomainResourceBase<R>) -> Self {
        Self {
            resource: ResourceStage::from_base(&base.resource),
            text: restage_one(base.text.as_ref()),
            contained: restage(&base.contained),
            extension: restage(&base.extension),
            modifier_extension: restage(&base.modifier_extension),
        }
    }

    pub fn resource_mut(&mut self) -> &mut ResourceStage {
        &mut self.resource
    }

    pub fn finish(self) -> Result<DomainResourceBase<R>> {
        Ok(DomainResourceBase {
            resource: self.resource.finish()?,
            text: optional("text", self.text)?,
            contained: check_list("contained", self.contained)?,
            extension: check_list("extension", self.extension)?,
            modifier_extension: check_list("modifierExtension", self.modifier_extension)?,
        })
    }
}

// ============================================================================
// Builder capabilities
// ============================================================================

pub trait ElementBuilder: Sized {
    fn element_stage(&mut self) -> &mut ElementStage;

    fn id(mut self, id: impl Into<String>) -> Self {
        self.element_stage().id = Some(id.into());
        self
    }

    fn extension<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<Extension>,
    {
        append(&mut self.element_stage().extension, items);
        self
    }

    fn set_extension<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<Extension>,
    {
        replace(&mut self.element_stage().extension, items);
        self
    }
}

pub trait BackboneElementBuilder: ElementBuilder {
    fn backbone_stage(&mut self) -> &mut BackboneStage;

    fn modifier_extension<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<Extension>,
    {
        append(&mut self.backbone_stage().modifier_extension, items);
        self
    }

    fn set_modifier_extension<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<Extension>,
    {
        replace(&mut self.backbone_stage().modifier_extension, items);
        self
    }
}

pub trait ResourceBuilder: Sized {
    fn resource_stage(&mut self) -> &mut ResourceStage;

    fn id(mut self, id: impl Into<String>) -> Self {
        self.resource_stage().id = Some(id.into());
        self
    }

    fn meta(mut self, meta: impl IntoField<Meta>) -> Self {
        self.resource_stage().meta = meta.into_field();
        self
    }

    fn implicit_rules(mut self, implicit_rules: impl IntoField<Uri>) -> Self {
        self.resource_stage().implicit_rules = implicit_rules.into_field();
        self
    }

    fn language(mut self, language: impl IntoField<Code>) -> Self {
        self.resource_stage().language = language.into_field();
        self
    }
}

pub trait DomainResourceBuilder: ResourceBuilder {
    type Contained;

    fn domain_stage(&mut self) -> &mut DomainResourceStage<Self::Contained>;

    fn text(mut self, text: impl IntoField<Narrative>) -> Self {
        self.domain_stage().text = text.into_field();
        self
    }

    fn contained<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<Self::Contained>,
    {
        append(&mut self.domain_stage().contained, items);
        self
    }

    fn set_contained<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<Self::Contained>,
    {
        replace(&mut self.domain_stage().contained, items);
        self
    }

    fn extension<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<Extension>,
    {
        append(&mut self.domain_stage().extension, items);
        self
    }

    fn set_extension<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<Extension>,
    {
        replace(&mut self.domain_stage().extension, items);
        self
    }

    fn modifier_extension<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<Extension>,
    {
        append(&mut self.domain_stage().modifier_extension, items);
        self
    }

    fn set_modifier_extension<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoField<Extension>,
    {
        replace(&mut self.domain_stage().modifier_extension, items);
        self
    }
}

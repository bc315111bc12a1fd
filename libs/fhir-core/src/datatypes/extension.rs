use crate::builder::{Builder, IntoField, Staged};
use crate::config::ModelConfig;
use crate::error::{Error, Result};
use crate::node::{Element, ElementBase, ElementBuilder, ElementStage};
use crate::primitive::check_uri;
use crate::validation;
use crate::value::{FhirType, Value};
use crate::visitor::{accept_choice, NodeKind, Visitable, Visitor};

/// Additional content defined outside the base schema.
///
/// Whether an extension is a modifier depends only on the list it sits in
/// (`modifierExtension` vs `extension`); the structure is the same.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Extension {
    element: ElementBase,
    url: String,
    value: Option<Value>,
}

impl Extension {
    pub fn builder() -> ExtensionBuilder {
        ExtensionBuilder::default()
    }

    pub fn to_builder(&self) -> ExtensionBuilder {
        ExtensionBuilder::from(self)
    }

    /// Identifies the meaning of the extension
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Value of the extension, absent for complex extensions
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Nested extensions with the given url.
    pub fn sub_extensions(&self, url: &str) -> Vec<&Extension> {
        self.extensions_by_url(url)
    }
}

impl FhirType for Extension {
    const TYPE_NAME: &'static str = "Extension";
}

impl Visitable for Extension {
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

    fn extension_url(&self) -> Option<&str> {
        Some(self.url.as_str())
    }

    fn accept_children(&self, visitor: &mut dyn Visitor) {
        self.element.accept_children(visitor);
        accept_choice("value", self.value.as_ref(), visitor);
    }
}

impl Element for Extension {
    fn element(&self) -> &ElementBase {
        &self.element
    }
}

/// Schema-side description of an extension: its url, the value types it
/// admits and whether it changes the meaning of the element carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExtensionDefinition {
    url: String,
    value_types: Vec<String>,
    modifier: bool,
}

impl ExtensionDefinition {
    pub fn new<I, S>(url: impl Into<String>, value_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            url: url.into(),
            value_types: value_types.into_iter().map(Into::into).collect(),
            modifier: false,
        }
    }

    pub fn modifier(mut self) -> Self {
        self.modifier = true;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn value_types(&self) -> &[String] {
        &self.value_types
    }

    pub fn is_modifier(&self) -> bool {
        self.modifier
    }

    /// Whether `extension` carries this definition's url and an allowed value.
    pub fn describes(&self, extension: &Extension) -> bool {
        extension.url() == self.url
            && extension
                .value()
                .map_or(true, |v| self.value_types.iter().any(|t| t == v.type_name()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExtensionBuilder {
    element: ElementStage,
    url: Option<String>,
    value: Staged<Value>,
    value_types: Option<Vec<String>>,
}

impl ExtensionBuilder {
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Replaces any previously set value.
    pub fn value(mut self, value: impl IntoField<Value>) -> Self {
        self.value = value.into_field();
        self
    }

    /// Takes the url from `definition` and restricts the value to the types
    /// it admits.
    pub fn conforms_to(mut self, definition: &ExtensionDefinition) -> Self {
        self.url = Some(definition.url.clone());
        self.value_types = Some(definition.value_types.clone());
        self
    }
}

impl From<&Extension> for ExtensionBuilder {
    fn from(extension: &Extension) -> Self {
        Self {
            element: ElementStage::from_base(&extension.element),
            url: Some(extension.url.clone()),
            value: extension.value.clone().map(Ok),
            value_types: None,
        }
    }
}

impl ElementBuilder for ExtensionBuilder {
    fn element_stage(&mut self) -> &mut ElementStage {
        &mut self.element
    }
}

impl Builder for ExtensionBuilder {
    type Output = Extension;

    fn assemble(self, _config: &ModelConfig) -> Result<Extension> {
        let element = self.element.finish()?;
        let url = validation::require("url", self.url.map(Ok))?;
        check_uri(&url).map_err(|reason| Error::InvalidPrimitiveValue {
            field: "url".to_string(),
            type_name: "uri".to_string(),
            reason,
        })?;
        let value = validation::optional("value", self.value)?;
        if let Some(allowed) = &self.value_types {
            validation::check_value_type("value", value.as_ref(), allowed)?;
        }

        let extension = Extension {
            element,
            url,
            value,
        };
        validation::require_value_or_children(&extension)?;
        Ok(extension)
    }
}

use crate::builder::{Builder, IntoField, Staged};
use crate::config::ModelConfig;
use crate::error::Result;
use crate::node::{Element, ElementBase, ElementBuilder, ElementStage};
use crate::primitive::{Code, FhirDecimal, FhirString, Uri};
use crate::validation;
use crate::value::FhirType;
use crate::visitor::{accept_field, NodeKind, Visitable, Visitor};

/// A measured or measurable amount
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Quantity {
    element: ElementBase,
    value: Option<FhirDecimal>,
    /// < | <= | >= | >
    comparator: Option<Code>,
    unit: Option<FhirString>,
    system: Option<Uri>,
    code: Option<Code>,
}

impl Quantity {
    pub fn builder() -> QuantityBuilder {
        QuantityBuilder::default()
    }

    pub fn to_builder(&self) -> QuantityBuilder {
        QuantityBuilder::from(self)
    }

    pub fn value(&self) -> Option<&FhirDecimal> {
        self.value.as_ref()
    }

    pub fn comparator(&self) -> Option<&Code> {
        self.comparator.as_ref()
    }

    pub fn unit(&self) -> Option<&FhirString> {
        self.unit.as_ref()
    }

    pub fn system(&self) -> Option<&Uri> {
        self.system.as_ref()
    }

    pub fn code(&self) -> Option<&Code> {
        self.code.as_ref()
    }
}

impl FhirType for Quantity {
    const TYPE_NAME: &'static str = "Quantity";
}

impl Visitable for Quantity {
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
        accept_field("value", self.value.as_ref(), visitor);
        accept_field("comparator", self.comparator.as_ref(), visitor);
        accept_field("unit", self.unit.as_ref(), visitor);
        accept_field("system", self.system.as_ref(), visitor);
        accept_field("code", self.code.as_ref(), visitor);
    }
}

impl Element for Quantity {
    fn element(&self) -> &ElementBase {
        &self.element
    }
}

#[derive(Debug, Clone, Default)]
pub struct QuantityBuilder {
    element: ElementStage,
    value: Staged<FhirDecimal>,
    comparator: Staged<Code>,
    unit: Staged<FhirString>,
    system: Staged<Uri>,
    code: Staged<Code>,
}

impl QuantityBuilder {
    pub fn value(mut self, value: impl IntoField<FhirDecimal>) -> Self {
        self.value = value.into_field();
        self
    }

    pub fn comparator(mut self, comparator: impl IntoField<Code>) -> Self {
        self.comparator = comparator.into_field();
        self
    }

    pub fn unit(mut self, unit: impl IntoField<FhirString>) -> Self {
        self.unit = unit.into_field();
        self
    }

    pub fn system(mut self, system: impl IntoField<Uri>) -> Self {
        self.system = system.into_field();
        self
    }

    pub fn code(mut self, code: impl IntoField<Code>) -> Self {
        self.code = code.into_field();
        self
    }
}

impl From<&Quantity> for QuantityBuilder {
    fn from(quantity: &Quantity) -> Self {
        Self {
            element: ElementStage::from_base(&quantity.element),
            value: quantity.value.clone().map(Ok),
            comparator: quantity.comparator.clone().map(Ok),
            unit: quantity.unit.clone().map(Ok),
            system: quantity.system.clone().map(Ok),
            code: quantity.code.clone().map(Ok),
        }
    }
}

impl ElementBuilder for QuantityBuilder {
    fn element_stage(&mut self) -> &mut ElementStage {
        &mut self.element
    }
}

impl Builder for QuantityBuilder {
    type Output = Quantity;

    fn assemble(self, _config: &ModelConfig) -> Result<Quantity> {
        let quantity = Quantity {
            element: self.element.finish()?,
            value: validation::optional("value", self.value)?,
            comparator: validation::optional("comparator", self.comparator)?,
            unit: validation::optional("unit", self.unit)?,
            system: validation::optional("system", self.system)?,
            code: validation::optional("code", self.code)?,
        };
        validation::require_value_or_children(&quantity)?;
        Ok(quantity)
    }
}

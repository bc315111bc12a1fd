//! Visitor protocol
//!
//! Every node runs the same sequence:
//!
//! ```text
//! if pre_visit(node) {
//!     visit_start(name, index, node)
//!     if visit(name, index, node) { children in declaration order }
//!     visit_end(name, index, node)
//!     post_visit(node)
//! }
//! ```
//!
//! Children are inherited field groups first (resource, domain-resource,
//! element, backbone), then the type's own fields. List entries carry their
//! 0-based index; scalar fields carry `None`. Codecs rely on this order to
//! reproduce the same field order across formats.

use std::any::Any;

use rust_decimal::Decimal;

use crate::value::AsVisitable;

/// Structural shape of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Primitive,
    Element,
    BackboneElement,
    Resource,
    DomainResource,
}

/// The value carried by a primitive node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveValue<'a> {
    Boolean(bool),
    Integer(i32),
    Decimal(&'a Decimal),
    String(&'a str),
}

/// Implemented by every concrete node type.
pub trait Visitable: Any + Send + Sync {
    /// Schema name of the concrete type, e.g. `Patient` or `dateTime`
    fn type_name(&self) -> &'static str;

    fn node_kind(&self) -> NodeKind;

    fn as_any(&self) -> &dyn Any;

    /// Runs the protocol over each populated child field, in order.
    fn accept_children(&self, visitor: &mut dyn Visitor);

    fn primitive_value(&self) -> Option<PrimitiveValue<'_>> {
        None
    }

    /// `Element.id`, which is an attribute of the node rather than a child.
    /// Always `None` for resources, whose id is visited as an `id` child.
    fn element_id(&self) -> Option<&str> {
        None
    }

    /// `Extension.url`, the other attribute a node can carry.
    fn extension_url(&self) -> Option<&str> {
        None
    }
}

impl<'a> dyn Visitable + 'a {
    pub fn downcast_ref<T: Visitable>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn is<T: Visitable>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

/// Traversal hooks. Defaults descend everywhere and record nothing.
#[allow(unused_variables)]
pub trait Visitor {
    /// Returning `false` skips the node entirely, including `visit_end`.
    fn pre_visit(&mut self, node: &dyn Visitable) -> bool {
        true
    }

    fn visit_start(&mut self, name: &str, index: Option<usize>, node: &dyn Visitable) {}

    /// Returning `false` skips the node's children.
    fn visit(&mut self, name: &str, index: Option<usize>, node: &dyn Visitable) -> bool {
        true
    }

    fn visit_end(&mut self, name: &str, index: Option<usize>, node: &dyn Visitable) {}

    fn post_visit(&mut self, node: &dyn Visitable) {}

    /// Brackets a non-empty list field.
    fn visit_list_start(&mut self, name: &str, len: usize) {}

    fn visit_list_end(&mut self, name: &str, len: usize) {}
}

/// Runs the protocol over one node.
pub fn accept(node: &dyn Visitable, name: &str, index: Option<usize>, visitor: &mut dyn Visitor) {
    if visitor.pre_visit(node) {
        visitor.visit_start(name, index, node);
        if visitor.visit(name, index, node) {
            node.accept_children(visitor);
        }
        visitor.visit_end(name, index, node);
        visitor.post_visit(node);
    }
}

/// Visits an optional scalar field; absent fields are skipped.
pub fn accept_field<T: Visitable>(name: &str, field: Option<&T>, visitor: &mut dyn Visitor) {
    if let Some(node) = field {
        accept(node, name, None, visitor);
    }
}

/// Visits a populated choice field as its concrete value, under the field's
/// base name (`value`, not `valueQuantity`).
pub fn accept_choice<C: AsVisitable>(name: &str, field: Option<&C>, visitor: &mut dyn Visitor) {
    if let Some(choice) = field {
        accept(choice.as_visitable(), name, None, visitor);
    }
}

pub fn accept_list<T: Visitable>(name: &str, items: &[T], visitor: &mut dyn Visitor) {
    accept_nodes(name, items.iter().map(|item| item as &dyn Visitable), visitor);
}

/// Visits a list of nodes that may be of different concrete types.
pub fn accept_nodes<'a, I>(name: &str, nodes: I, visitor: &mut dyn Visitor)
where
    I: IntoIterator<Item = &'a dyn Visitable>,
    I::IntoIter: ExactSizeIterator,
{
    let nodes = nodes.into_iter();
    let len = nodes.len();
    if len == 0 {
        return;
    }
    visitor.visit_list_start(name, len);
    for (index, node) in nodes.enumerate() {
        accept(node, name, Some(index), visitor);
    }
    visitor.visit_list_end(name, len);
}

/// Traverses a tree from its root. The root is named after its type.
pub fn traverse(root: &dyn Visitable, visitor: &mut dyn Visitor) {
    tracing::trace!(root = root.type_name(), "traversal start");
    accept(root, root.type_name(), None, visitor);
    tracing::trace!(root = root.type_name(), "traversal end");
}

/// Collects a clone of every visited node of type `T`, in traversal order.
#[derive(Debug, Clone)]
pub struct CollectingVisitor<T> {
    result: Vec<T>,
}

impl<T> Default for CollectingVisitor<T> {
    fn default() -> Self {
        Self { result: Vec::new() }
    }
}

impl<T: Visitable + Clone> CollectingVisitor<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn result(&self) -> &[T] {
        &self.result
    }

    pub fn into_result(self) -> Vec<T> {
        self.result
    }
}

impl<T: Visitable + Clone> Visitor for CollectingVisitor<T> {
    fn visit(&mut self, _name: &str, _index: Option<usize>, node: &dyn Visitable) -> bool {
        if let Some(found) = node.downcast_ref::<T>() {
            self.result.push(found.clone());
        }
        true
    }
}

/// Records the path of every visited node, e.g. `Patient.name[0].given[1]`.
#[derive(Debug, Clone, Default)]
pub struct PathVisitor {
    stack: Vec<String>,
    paths: Vec<String>,
}

impl PathVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn into_paths(self) -> Vec<String> {
        self.paths
    }
}

impl Visitor for PathVisitor {
    fn visit_start(&mut self, name: &str, index: Option<usize>, _node: &dyn Visitable) {
        let segment = match index {
            Some(i) => format!("{}[{}]", name, i),
            None => name.to_string(),
        };
        self.stack.push(segment);
        self.paths.push(self.stack.join("."));
    }

    fn visit_end(&mut self, _name: &str, _index: Option<usize>, _node: &dyn Visitable) {
        self.stack.pop();
    }
}

/// Reports whether a node has any populated child field.
#[derive(Default)]
pub(crate) struct ChildProbe {
    pub(crate) found: bool,
}

impl Visitor for ChildProbe {
    fn pre_visit(&mut self, _node: &dyn Visitable) -> bool {
        self.found = true;
        false
    }
}

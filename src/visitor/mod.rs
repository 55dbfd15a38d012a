//! Depth-first traversal of frozen model trees.
//!
//! For every node, given its field name and (for list elements) its
//! position, the walk calls:
//!
//! 1. [`Visitor::pre_visit`]; `false` skips the node and its subtree with no
//!    further callbacks.
//! 2. [`Visitor::visit_start`].
//! 3. [`Visitor::visit`]; `true` descends into the children in declaration
//!    order, `false` prunes them.
//! 4. [`Visitor::visit_end`].
//! 5. [`Visitor::post_visit`].
//!
//! A populated list field is bracketed by [`Visitor::visit_list_start`] and
//! [`Visitor::visit_list_end`] around the walks of its elements; empty lists
//! produce no callbacks at all.
//!
//! Declaration order is also wire order, so a serializer driven by this walk
//! emits fields canonically.

mod node_ref;
mod path;

pub use node_ref::NodeRef;
pub use path::{PathVisitor, unknown_modifier_extensions};

use std::sync::Arc;

use crate::types::{DataType, ModelNode};

/// Consumer of a traversal. Every callback has a pass-through default.
pub trait Visitor {
    /// Gate for the node and its whole subtree
    fn pre_visit(&mut self, node: NodeRef<'_>) -> bool {
        let _ = node;
        true
    }

    fn visit_start(&mut self, name: &str, index: Option<usize>, node: NodeRef<'_>) {
        let _ = (name, index, node);
    }

    /// Whether to descend into the node's children
    fn visit(&mut self, name: &str, index: Option<usize>, node: NodeRef<'_>) -> bool {
        let _ = (name, index, node);
        true
    }

    fn visit_end(&mut self, name: &str, index: Option<usize>, node: NodeRef<'_>) {
        let _ = (name, index, node);
    }

    fn post_visit(&mut self, node: NodeRef<'_>) {
        let _ = node;
    }

    /// Opens a non-empty list field of `len` elements of `data_type`.
    fn visit_list_start(&mut self, name: &str, len: usize, data_type: DataType) {
        let _ = (name, len, data_type);
    }

    fn visit_list_end(&mut self, name: &str, len: usize, data_type: DataType) {
        let _ = (name, len, data_type);
    }
}

/// A node that can be walked by a [`Visitor`].
pub trait Visitable {
    /// Walk this node as field `name` (element `index` of a list field).
    fn accept<V: Visitor + ?Sized>(&self, name: &str, index: Option<usize>, visitor: &mut V);
}

/// Sequence the five callbacks around `children`.
pub(crate) fn walk<V, F>(
    node: NodeRef<'_>,
    name: &str,
    index: Option<usize>,
    visitor: &mut V,
    children: F,
) where
    V: Visitor + ?Sized,
    F: FnOnce(&mut V),
{
    if !visitor.pre_visit(node) {
        return;
    }
    visitor.visit_start(name, index, node);
    if visitor.visit(name, index, node) {
        children(visitor);
    }
    visitor.visit_end(name, index, node);
    visitor.post_visit(node);
}

pub(crate) fn accept_one<T, V>(name: &str, value: &Option<T>, visitor: &mut V)
where
    T: Visitable,
    V: Visitor + ?Sized,
{
    if let Some(value) = value {
        value.accept(name, None, visitor);
    }
}

pub(crate) fn accept_all<T, V>(name: &str, values: &[Arc<T>], visitor: &mut V)
where
    T: ModelNode,
    V: Visitor + ?Sized,
{
    let Some(first) = values.first() else {
        return;
    };
    let data_type = first.data_type();
    visitor.visit_list_start(name, values.len(), data_type);
    for (index, value) in values.iter().enumerate() {
        value.accept(name, Some(index), visitor);
    }
    visitor.visit_list_end(name, values.len(), data_type);
}

use std::sync::Arc;

use crate::resource::{
    CodeSystem, CodeSystemConcept, CodeSystemFilter, CodeSystemProperty, ConceptDesignation,
    ConceptProperty, ValueSet, ValueSetCompose, ValueSetConcept, ValueSetFilter, ValueSetInclude,
};
use crate::terminology::CodedValue;
use crate::types::descriptor::TypeDescriptor;
use crate::types::{
    Canonical, Code, CodeableConcept, Coding, DataType, Extension, FhirBoolean, FhirDateTime,
    FhirDecimal, FhirInteger, FhirString, Identifier, Markdown, Meta, ModelNode, NodeKind,
    UnsignedInt, Uri,
};

use super::{Visitable, Visitor};

/// A borrowed reference to any model node; what visitor callbacks receive.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Boolean(&'a FhirBoolean),
    Integer(&'a FhirInteger),
    UnsignedInt(&'a UnsignedInt),
    Decimal(&'a FhirDecimal),
    String(&'a FhirString),
    Code(&'a Code),
    Uri(&'a Uri),
    Canonical(&'a Canonical),
    Markdown(&'a Markdown),
    DateTime(&'a FhirDateTime),
    Coding(&'a Coding),
    CodeableConcept(&'a CodeableConcept),
    Identifier(&'a Identifier),
    Meta(&'a Meta),
    Extension(&'a Extension),
    CodeSystem(&'a CodeSystem),
    CodeSystemFilter(&'a CodeSystemFilter),
    CodeSystemProperty(&'a CodeSystemProperty),
    CodeSystemConcept(&'a CodeSystemConcept),
    ConceptDesignation(&'a ConceptDesignation),
    ConceptProperty(&'a ConceptProperty),
    ValueSet(&'a ValueSet),
    ValueSetCompose(&'a ValueSetCompose),
    ValueSetInclude(&'a ValueSetInclude),
    ValueSetConcept(&'a ValueSetConcept),
    ValueSetFilter(&'a ValueSetFilter),
}

macro_rules! dispatch {
    ($node:expr, $inner:ident => $body:expr) => {
        match $node {
            NodeRef::Boolean($inner) => $body,
            NodeRef::Integer($inner) => $body,
            NodeRef::UnsignedInt($inner) => $body,
            NodeRef::Decimal($inner) => $body,
            NodeRef::String($inner) => $body,
            NodeRef::Code($inner) => $body,
            NodeRef::Uri($inner) => $body,
            NodeRef::Canonical($inner) => $body,
            NodeRef::Markdown($inner) => $body,
            NodeRef::DateTime($inner) => $body,
            NodeRef::Coding($inner) => $body,
            NodeRef::CodeableConcept($inner) => $body,
            NodeRef::Identifier($inner) => $body,
            NodeRef::Meta($inner) => $body,
            NodeRef::Extension($inner) => $body,
            NodeRef::CodeSystem($inner) => $body,
            NodeRef::CodeSystemFilter($inner) => $body,
            NodeRef::CodeSystemProperty($inner) => $body,
            NodeRef::CodeSystemConcept($inner) => $body,
            NodeRef::ConceptDesignation($inner) => $body,
            NodeRef::ConceptProperty($inner) => $body,
            NodeRef::ValueSet($inner) => $body,
            NodeRef::ValueSetCompose($inner) => $body,
            NodeRef::ValueSetInclude($inner) => $body,
            NodeRef::ValueSetConcept($inner) => $body,
            NodeRef::ValueSetFilter($inner) => $body,
        }
    };
}

impl<'a> NodeRef<'a> {
    pub fn descriptor(&self) -> &'static TypeDescriptor {
        dispatch!(self, node => node.descriptor())
    }

    pub fn type_name(&self) -> &'static str {
        self.descriptor().name
    }

    pub fn kind(&self) -> NodeKind {
        self.descriptor().kind
    }

    pub fn data_type(&self) -> DataType {
        dispatch!(self, node => node.data_type())
    }

    pub fn has_content(&self) -> bool {
        dispatch!(self, node => node.has_content())
    }

    pub fn coded(&self) -> Option<CodedValue<'a>> {
        dispatch!(*self, node => node.coded())
    }

    pub fn id(&self) -> Option<&'a str> {
        dispatch!(*self, node => ModelNode::id(node))
    }

    pub fn extension(&self) -> &'a [Arc<Extension>] {
        dispatch!(*self, node => ModelNode::extension(node))
    }

    pub fn modifier_extension(&self) -> &'a [Arc<Extension>] {
        dispatch!(*self, node => ModelNode::modifier_extension(node))
    }

    /// Start a nested walk from this node.
    pub fn accept<V: Visitor + ?Sized>(&self, name: &str, index: Option<usize>, visitor: &mut V) {
        dispatch!(self, node => node.accept(name, index, visitor))
    }

    /// Same node, compared by address.
    pub fn ptr_eq(&self, other: &NodeRef<'_>) -> bool {
        std::ptr::eq(self.address(), other.address())
    }

    fn address(&self) -> *const () {
        dispatch!(self, node => std::ptr::from_ref(*node).cast::<()>())
    }
}

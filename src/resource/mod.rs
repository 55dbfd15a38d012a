//! Bundled resource types and the registry of every type descriptor.

mod code_system;
mod value_set;

pub use code_system::{
    CodeSystem, CodeSystemBuilder, CodeSystemConcept, CodeSystemConceptBuilder, CodeSystemFilter,
    CodeSystemFilterBuilder, CodeSystemProperty, CodeSystemPropertyBuilder, ConceptDesignation,
    ConceptDesignationBuilder, ConceptProperty, ConceptPropertyBuilder,
};
pub use value_set::{
    ValueSet, ValueSetBuilder, ValueSetCompose, ValueSetComposeBuilder, ValueSetConcept,
    ValueSetConceptBuilder, ValueSetFilter, ValueSetFilterBuilder, ValueSetInclude,
    ValueSetIncludeBuilder,
};

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use std::sync::Arc;

use crate::builder::{Buildable, Builder};
use crate::error::Result;
use crate::types::descriptor::TypeDescriptor;
use crate::types::{DataType, Extension, ModelNode};
use crate::validation::{Validate, ValidationContext};
use crate::visitor::{NodeRef, Visitable, Visitor};

/// A resource nested inside another resource's `contained` list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContainedResource {
    CodeSystem(CodeSystem),
    ValueSet(ValueSet),
}

macro_rules! dispatch {
    ($value:expr, $inner:ident => $body:expr) => {
        match $value {
            ContainedResource::CodeSystem($inner) => $body,
            ContainedResource::ValueSet($inner) => $body,
        }
    };
}

impl ContainedResource {
    pub fn as_code_system(&self) -> Option<&CodeSystem> {
        match self {
            ContainedResource::CodeSystem(code_system) => Some(code_system),
            _ => None,
        }
    }

    pub fn as_value_set(&self) -> Option<&ValueSet> {
        match self {
            ContainedResource::ValueSet(value_set) => Some(value_set),
            _ => None,
        }
    }
}

impl From<CodeSystem> for ContainedResource {
    fn from(value: CodeSystem) -> Self {
        ContainedResource::CodeSystem(value)
    }
}

impl From<ValueSet> for ContainedResource {
    fn from(value: ValueSet) -> Self {
        ContainedResource::ValueSet(value)
    }
}

impl Validate for ContainedResource {
    fn validate(&self, ctx: &mut ValidationContext<'_>) -> Result<()> {
        dispatch!(self, resource => resource.validate(ctx))
    }
}

impl Visitable for ContainedResource {
    fn accept<V: Visitor + ?Sized>(&self, name: &str, index: Option<usize>, visitor: &mut V) {
        dispatch!(self, resource => resource.accept(name, index, visitor))
    }
}

impl ModelNode for ContainedResource {
    fn descriptor(&self) -> &'static TypeDescriptor {
        dispatch!(self, resource => resource.descriptor())
    }

    fn node_ref(&self) -> NodeRef<'_> {
        dispatch!(self, resource => resource.node_ref())
    }

    fn has_content(&self) -> bool {
        dispatch!(self, resource => resource.has_content())
    }

    fn data_type(&self) -> DataType {
        DataType::Resource
    }

    fn id(&self) -> Option<&str> {
        dispatch!(self, resource => ModelNode::id(resource))
    }

    fn extension(&self) -> &[Arc<Extension>] {
        dispatch!(self, resource => ModelNode::extension(resource))
    }

    fn modifier_extension(&self) -> &[Arc<Extension>] {
        dispatch!(self, resource => ModelNode::modifier_extension(resource))
    }
}

fn empty_descriptor<T: Buildable>() -> &'static TypeDescriptor {
    T::builder().build_unvalidated().descriptor()
}

static DESCRIPTORS: Lazy<Vec<&'static TypeDescriptor>> = Lazy::new(|| {
    use crate::types::{
        Canonical, Code, CodeableConcept, Coding, FhirBoolean, FhirDateTime, FhirDecimal,
        FhirInteger, FhirString, Identifier, Markdown, Meta, UnsignedInt, Uri,
    };

    vec![
        empty_descriptor::<FhirBoolean>(),
        empty_descriptor::<FhirInteger>(),
        empty_descriptor::<UnsignedInt>(),
        empty_descriptor::<FhirDecimal>(),
        empty_descriptor::<FhirString>(),
        empty_descriptor::<Code>(),
        empty_descriptor::<Uri>(),
        empty_descriptor::<Canonical>(),
        empty_descriptor::<Markdown>(),
        empty_descriptor::<FhirDateTime>(),
        empty_descriptor::<Extension>(),
        empty_descriptor::<Coding>(),
        empty_descriptor::<CodeableConcept>(),
        empty_descriptor::<Identifier>(),
        empty_descriptor::<Meta>(),
        empty_descriptor::<CodeSystem>(),
        empty_descriptor::<CodeSystemFilter>(),
        empty_descriptor::<CodeSystemProperty>(),
        empty_descriptor::<CodeSystemConcept>(),
        empty_descriptor::<ConceptDesignation>(),
        empty_descriptor::<ConceptProperty>(),
        empty_descriptor::<ValueSet>(),
        empty_descriptor::<ValueSetCompose>(),
        empty_descriptor::<ValueSetInclude>(),
        empty_descriptor::<ValueSetConcept>(),
        empty_descriptor::<ValueSetFilter>(),
    ]
});

static BY_NAME: Lazy<FxHashMap<&'static str, &'static TypeDescriptor>> = Lazy::new(|| {
    DESCRIPTORS
        .iter()
        .map(|descriptor| (descriptor.name, *descriptor))
        .collect()
});

/// Every bundled type descriptor, datatypes first.
pub fn descriptors() -> &'static [&'static TypeDescriptor] {
    &DESCRIPTORS
}

/// Look up a bundled type by name, e.g. `CodeSystem.concept`.
pub fn descriptor(name: &str) -> Option<&'static TypeDescriptor> {
    BY_NAME.get(name).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NodeKind;

    #[test]
    fn test_registry_lookup() {
        let concept = descriptor("CodeSystem.concept").unwrap();
        assert_eq!(concept.kind, NodeKind::BackboneElement);
        assert!(descriptor("Patient").is_none());
        assert_eq!(descriptors().len(), 26);
    }

    #[test]
    fn test_registry_names_are_unique() {
        assert_eq!(BY_NAME.len(), descriptors().len());
    }

    #[test]
    fn test_contained_delegates() {
        let value_set = ValueSet::builder().status("draft").build().unwrap();
        let contained = ContainedResource::from(value_set.clone());
        assert_eq!(contained.type_name(), "ValueSet");
        assert_eq!(contained.data_type(), DataType::Resource);
        assert_eq!(contained.as_value_set(), Some(&value_set));
        assert!(contained.as_code_system().is_none());
    }
}

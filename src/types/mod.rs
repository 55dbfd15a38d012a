pub mod choice;
pub mod complex;
pub mod constraint;
pub mod datatype;
pub mod datetime;
pub mod descriptor;
pub(crate) mod hash;
pub mod node;
pub mod primitive;

pub use choice::ChoiceValue;
pub use complex::{
    CodeableConcept, CodeableConceptBuilder, Coding, CodingBuilder, Extension, ExtensionBuilder,
    Identifier, IdentifierBuilder, Meta, MetaBuilder,
};
pub use constraint::{Constraint, ConstraintLevel};
pub use datatype::{CHOICE_DATA_TYPES, DataType};
pub use datetime::{DateTimeParseError, DateTimeValue};
pub use descriptor::{BindingDescriptor, Cardinality, FieldDescriptor, TypeDescriptor};
pub use node::{
    BackboneBase, BackboneBaseBuilder, BackboneElementBuilder, ElementBase, ElementBaseBuilder,
    ElementBuilder, NodeKind, ResourceBase, ResourceBaseBuilder, ResourceBuilder,
};
pub use primitive::{
    Canonical, Code, FhirBoolean, FhirDateTime, FhirDecimal, FhirInteger, FhirString, Markdown,
    Primitive, PrimitiveBuilder, PrimitiveKind, UnsignedInt, Uri,
};

use std::sync::Arc;

use crate::terminology::CodedValue;
use crate::validation::Validate;
use crate::visitor::{NodeRef, Visitable, Visitor};

/// Behavior shared by every frozen model type.
pub trait ModelNode: Validate + Visitable + Clone + PartialEq + std::fmt::Debug + Send + Sync {
    /// Field table of the concrete type
    fn descriptor(&self) -> &'static TypeDescriptor;

    fn node_ref(&self) -> NodeRef<'_>;

    /// True iff a value is set, a child field is populated, or an extension
    /// or modifier extension is present.
    fn has_content(&self) -> bool;

    fn data_type(&self) -> DataType;

    /// Coded content checked against a field's binding, if any.
    fn coded(&self) -> Option<CodedValue<'_>> {
        None
    }

    fn id(&self) -> Option<&str>;

    fn extension(&self) -> &[Arc<Extension>];

    fn modifier_extension(&self) -> &[Arc<Extension>] {
        &[]
    }

    fn type_name(&self) -> &'static str {
        self.descriptor().name
    }

    fn kind(&self) -> NodeKind {
        self.descriptor().kind
    }

    /// Walk this node as a traversal root, named after its type.
    fn walk<V: Visitor + ?Sized>(&self, visitor: &mut V)
    where
        Self: Sized,
    {
        self.accept(self.type_name(), None, visitor);
    }
}

//! Field-descriptor tables describing the shape of every model type.
//!
//! Each concrete type declares its local fields in wire order. The
//! validation engine reads cardinality, allowed types and bindings from
//! these tables, and the visitor protocol walks fields in the same order.

use serde::Serialize;

use crate::terminology::BindingStrength;
use crate::types::{Constraint, DataType, NodeKind};

/// Declared cardinality of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cardinality {
    /// 0..1
    Optional,
    /// 1..1
    Required,
    /// 0..*
    Repeated,
    /// 1..*
    RequiredNonEmpty,
}

impl Cardinality {
    pub fn is_required(&self) -> bool {
        matches!(self, Cardinality::Required | Cardinality::RequiredNonEmpty)
    }

    pub fn is_repeated(&self) -> bool {
        matches!(self, Cardinality::Repeated | Cardinality::RequiredNonEmpty)
    }

    pub fn min(&self) -> u32 {
        if self.is_required() { 1 } else { 0 }
    }

    pub fn max(&self) -> &'static str {
        if self.is_repeated() { "*" } else { "1" }
    }
}

/// Terminology binding declared on a coded field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BindingDescriptor {
    pub name: &'static str,
    pub strength: BindingStrength,
    pub value_set: &'static str,
    /// Fixed code system for bare `code` values, when the binding implies one
    pub system: Option<&'static str>,
}

impl BindingDescriptor {
    pub const fn required(name: &'static str, value_set: &'static str) -> Self {
        Self {
            name,
            strength: BindingStrength::Required,
            value_set,
            system: None,
        }
    }

    pub const fn extensible(name: &'static str, value_set: &'static str) -> Self {
        Self {
            name,
            strength: BindingStrength::Extensible,
            value_set,
            system: None,
        }
    }

    pub const fn with_system(mut self, system: &'static str) -> Self {
        self.system = Some(system);
        self
    }
}

/// One row of a type's field table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FieldDescriptor {
    pub name: &'static str,
    /// A single type, or the closed set of a choice field
    pub types: &'static [DataType],
    pub cardinality: Cardinality,
    /// Included in summary views
    pub summary: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binding: Option<BindingDescriptor>,
}

impl FieldDescriptor {
    pub const fn new(
        name: &'static str,
        types: &'static [DataType],
        cardinality: Cardinality,
    ) -> Self {
        Self {
            name,
            types,
            cardinality,
            summary: false,
            binding: None,
        }
    }

    pub const fn optional(name: &'static str, types: &'static [DataType]) -> Self {
        Self::new(name, types, Cardinality::Optional)
    }

    pub const fn required(name: &'static str, types: &'static [DataType]) -> Self {
        Self::new(name, types, Cardinality::Required)
    }

    pub const fn repeated(name: &'static str, types: &'static [DataType]) -> Self {
        Self::new(name, types, Cardinality::Repeated)
    }

    pub const fn required_non_empty(name: &'static str, types: &'static [DataType]) -> Self {
        Self::new(name, types, Cardinality::RequiredNonEmpty)
    }

    pub const fn summary(mut self) -> Self {
        self.summary = true;
        self
    }

    pub const fn bound(mut self, binding: BindingDescriptor) -> Self {
        self.binding = Some(binding);
        self
    }

    pub fn is_choice(&self) -> bool {
        self.types.len() > 1
    }

    pub fn allows(&self, data_type: DataType) -> bool {
        self.types.contains(&data_type)
    }

    /// Type-qualified element name of a choice field, e.g. `valueCoding`.
    pub fn choice_element_name(&self, data_type: DataType) -> String {
        format!("{}{}", self.name, data_type.choice_suffix())
    }
}

/// Shape of one concrete model type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TypeDescriptor {
    /// Type name, a path for nested backbone types (`CodeSystem.concept`)
    pub name: &'static str,
    pub kind: NodeKind,
    /// Local fields in declaration (wire) order, after the role fields
    pub fields: &'static [FieldDescriptor],
    pub constraints: &'static [Constraint],
}

impl TypeDescriptor {
    /// Fields contributed by the structural role, followed by local fields.
    pub fn all_fields(&self) -> impl Iterator<Item = &'static FieldDescriptor> {
        self.kind.role_fields().iter().chain(self.fields.iter())
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldDescriptor> {
        self.all_fields().find(|f| f.name == name)
    }

    pub fn is_choice_element(&self, name: &str) -> bool {
        self.field(name).is_some_and(|f| f.is_choice())
    }

    pub fn choice_types(&self, name: &str) -> &'static [DataType] {
        match self.field(name) {
            Some(field) if field.is_choice() => field.types,
            _ => &[],
        }
    }

    pub fn required_fields(&self) -> Vec<&'static str> {
        self.all_fields()
            .filter(|f| f.cardinality.is_required())
            .map(|f| f.name)
            .collect()
    }

    pub fn summary_fields(&self) -> Vec<&'static str> {
        self.all_fields()
            .filter(|f| f.summary)
            .map(|f| f.name)
            .collect()
    }

    pub fn constraint(&self, id: &str) -> Option<&'static Constraint> {
        self.constraints.iter().find(|c| c.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALUE: FieldDescriptor =
        FieldDescriptor::required("value", &[DataType::String, DataType::Coding]);

    #[test]
    fn test_cardinality_bounds() {
        assert_eq!(Cardinality::Optional.min(), 0);
        assert_eq!(Cardinality::Required.max(), "1");
        assert_eq!(Cardinality::RequiredNonEmpty.min(), 1);
        assert_eq!(Cardinality::RequiredNonEmpty.max(), "*");
        assert!(!Cardinality::Repeated.is_required());
    }

    #[test]
    fn test_choice_field() {
        assert!(VALUE.is_choice());
        assert!(VALUE.allows(DataType::Coding));
        assert!(!VALUE.allows(DataType::Integer));
        assert_eq!(VALUE.choice_element_name(DataType::String), "valueString");
    }
}

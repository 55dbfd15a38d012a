//! Structural roles shared by every model type.
//!
//! Each concrete type embeds exactly one role base: [`ElementBase`] for plain
//! elements and datatypes, [`BackboneBase`] for composite parts of a record,
//! and [`ResourceBase`] for records exchanged on their own. The role base
//! owns the inherited fields, validates them before the type's local rules
//! run, and visits them before the type's local fields.

use serde::Serialize;
use std::sync::Arc;

use crate::error::Result;
use crate::resource::ContainedResource;
use crate::types::descriptor::{BindingDescriptor, FieldDescriptor};
use crate::types::{Code, DataType, Extension, Meta, Uri};
use crate::validation::{Validate, ValidationContext};
use crate::visitor::{Visitor, accept_all, accept_one};

/// The structural role a type plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeKind {
    /// A node with an id and extensions
    Element,
    /// An element that may also carry modifier extensions
    BackboneElement,
    /// An independently exchanged record
    Resource,
}

pub(crate) const EXTENSION: FieldDescriptor =
    FieldDescriptor::repeated("extension", &[DataType::Extension]);
pub(crate) const MODIFIER_EXTENSION: FieldDescriptor =
    FieldDescriptor::repeated("modifierExtension", &[DataType::Extension]).summary();
pub(crate) const META: FieldDescriptor =
    FieldDescriptor::optional("meta", &[DataType::Meta]).summary();
pub(crate) const IMPLICIT_RULES: FieldDescriptor =
    FieldDescriptor::optional("implicitRules", &[DataType::Uri]).summary();
pub(crate) const LANGUAGE: FieldDescriptor = FieldDescriptor::optional("language", &[DataType::Code])
    .bound(
        BindingDescriptor::required("Language", "http://hl7.org/fhir/ValueSet/all-languages|5.0.0")
            .with_system("urn:ietf:bcp:47"),
    );
pub(crate) const CONTAINED: FieldDescriptor =
    FieldDescriptor::repeated("contained", &[DataType::Resource]);
const RESOURCE_MODIFIER_EXTENSION: FieldDescriptor =
    FieldDescriptor::repeated("modifierExtension", &[DataType::Extension]);

const ELEMENT_FIELDS: &[FieldDescriptor] = &[EXTENSION];
const BACKBONE_FIELDS: &[FieldDescriptor] = &[EXTENSION, MODIFIER_EXTENSION];
const RESOURCE_FIELDS: &[FieldDescriptor] = &[
    META,
    IMPLICIT_RULES,
    LANGUAGE,
    CONTAINED,
    EXTENSION,
    RESOURCE_MODIFIER_EXTENSION,
];

impl NodeKind {
    /// Fields every type of this role inherits, in wire order.
    pub fn role_fields(&self) -> &'static [FieldDescriptor] {
        match self {
            NodeKind::Element => ELEMENT_FIELDS,
            NodeKind::BackboneElement => BACKBONE_FIELDS,
            NodeKind::Resource => RESOURCE_FIELDS,
        }
    }

    /// Elements and backbone elements must not be empty leaves; resources
    /// are exempt.
    pub fn requires_content(&self) -> bool {
        !matches!(self, NodeKind::Resource)
    }
}

/// Inherited state of a plain element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ElementBase {
    pub(crate) id: Option<String>,
    pub(crate) extension: Arc<[Arc<Extension>]>,
}

impl ElementBase {
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn extension(&self) -> &[Arc<Extension>] {
        &self.extension
    }

    /// The id is an attribute and does not count as content.
    pub fn has_content(&self) -> bool {
        !self.extension.is_empty()
    }

    pub(crate) fn accept_fields<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        accept_all(EXTENSION.name, &self.extension, visitor);
    }
}

impl Validate for ElementBase {
    fn validate(&self, ctx: &mut ValidationContext<'_>) -> Result<()> {
        ctx.check_field(&EXTENSION, &self.extension)
    }
}

/// Inherited state of a backbone element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BackboneBase {
    pub(crate) element: ElementBase,
    pub(crate) modifier_extension: Arc<[Arc<Extension>]>,
}

impl BackboneBase {
    pub fn id(&self) -> Option<&str> {
        self.element.id()
    }

    pub fn extension(&self) -> &[Arc<Extension>] {
        self.element.extension()
    }

    pub fn modifier_extension(&self) -> &[Arc<Extension>] {
        &self.modifier_extension
    }

    pub fn has_content(&self) -> bool {
        self.element.has_content() || !self.modifier_extension.is_empty()
    }

    pub(crate) fn accept_fields<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        self.element.accept_fields(visitor);
        accept_all(MODIFIER_EXTENSION.name, &self.modifier_extension, visitor);
    }
}

impl Validate for BackboneBase {
    fn validate(&self, ctx: &mut ValidationContext<'_>) -> Result<()> {
        self.element.validate(ctx)?;
        ctx.check_field(&MODIFIER_EXTENSION, &self.modifier_extension)
    }
}

/// Inherited state of a resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ResourceBase {
    pub(crate) id: Option<String>,
    pub(crate) meta: Option<Meta>,
    pub(crate) implicit_rules: Option<Uri>,
    pub(crate) language: Option<Code>,
    pub(crate) contained: Arc<[Arc<ContainedResource>]>,
    pub(crate) extension: Arc<[Arc<Extension>]>,
    pub(crate) modifier_extension: Arc<[Arc<Extension>]>,
}

impl ResourceBase {
    /// Logical id of the resource
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
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

    pub fn contained(&self) -> &[Arc<ContainedResource>] {
        &self.contained
    }

    pub fn extension(&self) -> &[Arc<Extension>] {
        &self.extension
    }

    pub fn modifier_extension(&self) -> &[Arc<Extension>] {
        &self.modifier_extension
    }

    pub fn has_content(&self) -> bool {
        self.meta.is_some()
            || self.implicit_rules.is_some()
            || self.language.is_some()
            || !self.contained.is_empty()
            || !self.extension.is_empty()
            || !self.modifier_extension.is_empty()
    }

    pub(crate) fn accept_fields<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        accept_one(META.name, &self.meta, visitor);
        accept_one(IMPLICIT_RULES.name, &self.implicit_rules, visitor);
        accept_one(LANGUAGE.name, &self.language, visitor);
        accept_all(CONTAINED.name, &self.contained, visitor);
        accept_all(EXTENSION.name, &self.extension, visitor);
        accept_all(RESOURCE_MODIFIER_EXTENSION.name, &self.modifier_extension, visitor);
    }
}

impl Validate for ResourceBase {
    fn validate(&self, ctx: &mut ValidationContext<'_>) -> Result<()> {
        ctx.check_field(&META, &self.meta)?;
        ctx.check_field(&IMPLICIT_RULES, &self.implicit_rules)?;
        ctx.check_field(&LANGUAGE, &self.language)?;
        ctx.check_field(&CONTAINED, &self.contained)?;
        ctx.check_field(&EXTENSION, &self.extension)?;
        ctx.check_field(&RESOURCE_MODIFIER_EXTENSION, &self.modifier_extension)
    }
}

/// Staged [`ElementBase`].
#[derive(Debug, Clone, Default)]
pub struct ElementBaseBuilder {
    pub(crate) id: Option<String>,
    pub(crate) extension: Vec<Arc<Extension>>,
}

impl ElementBaseBuilder {
    pub(crate) fn from_base(base: &ElementBase) -> Self {
        Self {
            id: base.id.clone(),
            extension: base.extension.to_vec(),
        }
    }

    pub(crate) fn freeze(self) -> ElementBase {
        ElementBase {
            id: self.id,
            extension: self.extension.into(),
        }
    }
}

/// Staged [`BackboneBase`].
#[derive(Debug, Clone, Default)]
pub struct BackboneBaseBuilder {
    pub(crate) element: ElementBaseBuilder,
    pub(crate) modifier_extension: Vec<Arc<Extension>>,
}

impl BackboneBaseBuilder {
    pub(crate) fn from_base(base: &BackboneBase) -> Self {
        Self {
            element: ElementBaseBuilder::from_base(&base.element),
            modifier_extension: base.modifier_extension.to_vec(),
        }
    }

    pub(crate) fn freeze(self) -> BackboneBase {
        BackboneBase {
            element: self.element.freeze(),
            modifier_extension: self.modifier_extension.into(),
        }
    }
}

/// Staged [`ResourceBase`].
#[derive(Debug, Clone, Default)]
pub struct ResourceBaseBuilder {
    pub(crate) id: Option<String>,
    pub(crate) meta: Option<Meta>,
    pub(crate) implicit_rules: Option<Uri>,
    pub(crate) language: Option<Code>,
    pub(crate) contained: Vec<Arc<ContainedResource>>,
    pub(crate) extension: Vec<Arc<Extension>>,
    pub(crate) modifier_extension: Vec<Arc<Extension>>,
}

impl ResourceBaseBuilder {
    pub(crate) fn from_base(base: &ResourceBase) -> Self {
        Self {
            id: base.id.clone(),
            meta: base.meta.clone(),
            implicit_rules: base.implicit_rules.clone(),
            language: base.language.clone(),
            contained: base.contained.to_vec(),
            extension: base.extension.to_vec(),
            modifier_extension: base.modifier_extension.to_vec(),
        }
    }

    pub(crate) fn freeze(self) -> ResourceBase {
        ResourceBase {
            id: self.id,
            meta: self.meta,
            implicit_rules: self.implicit_rules,
            language: self.language,
            contained: self.contained.into(),
            extension: self.extension.into(),
            modifier_extension: self.modifier_extension.into(),
        }
    }
}

/// Setters every element builder inherits.
///
/// List setters come in pairs: `extension` appends, `set_extension`
/// replaces the whole list.
pub trait ElementBuilder: Sized {
    #[doc(hidden)]
    fn element_base(&mut self) -> &mut ElementBaseBuilder;

    fn id(mut self, id: impl Into<String>) -> Self {
        self.element_base().id = Some(id.into());
        self
    }

    fn extension(mut self, extension: impl IntoIterator<Item = Extension>) -> Self {
        self.element_base().extension.extend(extension.into_iter().map(Arc::new));
        self
    }

    fn set_extension(mut self, extension: impl IntoIterator<Item = Extension>) -> Self {
        self.element_base().extension = extension.into_iter().map(Arc::new).collect();
        self
    }
}

/// Setters every backbone element builder inherits.
pub trait BackboneElementBuilder: ElementBuilder {
    #[doc(hidden)]
    fn backbone_base(&mut self) -> &mut BackboneBaseBuilder;

    fn modifier_extension(mut self, extension: impl IntoIterator<Item = Extension>) -> Self {
        self.backbone_base().modifier_extension.extend(extension.into_iter().map(Arc::new));
        self
    }

    fn set_modifier_extension(mut self, extension: impl IntoIterator<Item = Extension>) -> Self {
        self.backbone_base().modifier_extension = extension.into_iter().map(Arc::new).collect();
        self
    }
}

/// Setters every resource builder inherits.
pub trait ResourceBuilder: Sized {
    #[doc(hidden)]
    fn resource_base(&mut self) -> &mut ResourceBaseBuilder;

    fn id(mut self, id: impl Into<String>) -> Self {
        self.resource_base().id = Some(id.into());
        self
    }

    fn meta(mut self, meta: Meta) -> Self {
        self.resource_base().meta = Some(meta);
        self
    }

    fn implicit_rules(mut self, implicit_rules: impl Into<Uri>) -> Self {
        self.resource_base().implicit_rules = Some(implicit_rules.into());
        self
    }

    fn language(mut self, language: impl Into<Code>) -> Self {
        self.resource_base().language = Some(language.into());
        self
    }

    fn contained(mut self, contained: impl IntoIterator<Item = ContainedResource>) -> Self {
        self.resource_base().contained.extend(contained.into_iter().map(Arc::new));
        self
    }

    fn set_contained(mut self, contained: impl IntoIterator<Item = ContainedResource>) -> Self {
        self.resource_base().contained = contained.into_iter().map(Arc::new).collect();
        self
    }

    fn extension(mut self, extension: impl IntoIterator<Item = Extension>) -> Self {
        self.resource_base().extension.extend(extension.into_iter().map(Arc::new));
        self
    }

    fn set_extension(mut self, extension: impl IntoIterator<Item = Extension>) -> Self {
        self.resource_base().extension = extension.into_iter().map(Arc::new).collect();
        self
    }

    fn modifier_extension(mut self, extension: impl IntoIterator<Item = Extension>) -> Self {
        self.resource_base().modifier_extension.extend(extension.into_iter().map(Arc::new));
        self
    }

    fn set_modifier_extension(mut self, extension: impl IntoIterator<Item = Extension>) -> Self {
        self.resource_base().modifier_extension = extension.into_iter().map(Arc::new).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_fields_order() {
        let names: Vec<_> = NodeKind::Resource
            .role_fields()
            .iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(
            names,
            [
                "meta",
                "implicitRules",
                "language",
                "contained",
                "extension",
                "modifierExtension"
            ]
        );
        assert_eq!(NodeKind::Element.role_fields().len(), 1);
        assert_eq!(NodeKind::BackboneElement.role_fields()[1].name, "modifierExtension");
    }

    #[test]
    fn test_empty_bases_have_no_content() {
        assert!(!ElementBase::default().has_content());
        assert!(!BackboneBase::default().has_content());
        assert!(!ResourceBase::default().has_content());

        let base = ElementBaseBuilder {
            id: Some("a".to_string()),
            extension: Vec::new(),
        }
        .freeze();
        assert_eq!(base.id(), Some("a"));
        assert!(!base.has_content());
    }

    #[test]
    fn test_language_binding() {
        let binding = LANGUAGE.binding.expect("language is bound");
        assert!(binding.strength.is_error_on_failure());
        assert_eq!(binding.system, Some("urn:ietf:bcp:47"));
    }
}

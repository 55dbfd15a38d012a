//! General-purpose complex datatypes.

use std::sync::Arc;

use crate::builder::{Buildable, Builder};
use crate::error::Result;
use crate::terminology::{CodedValue, CodingRef};
use crate::types::datatype::CHOICE_DATA_TYPES;
use crate::types::descriptor::{BindingDescriptor, FieldDescriptor, TypeDescriptor};
use crate::types::hash::{HashCache, memoized_hash};
use crate::types::node::{ElementBase, ElementBaseBuilder, ElementBuilder, NodeKind};
use crate::types::primitive::{PrimitiveKind, UriKind};
use crate::types::{
    Canonical, ChoiceValue, Code, Constraint, DataType, FhirBoolean, FhirDateTime, FhirString,
    ModelNode, Uri,
};
use crate::validation::{Validate, ValidationContext};
use crate::visitor::{NodeRef, Visitable, Visitor, accept_all, accept_one, walk};

/// Additional content defined by implementations, identified by `url`.
///
/// `url` is an attribute: it is required but is not visited as a child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    pub(crate) element: ElementBase,
    pub(crate) url: Option<String>,
    pub(crate) value: Option<ChoiceValue>,
    hash: HashCache,
}

memoized_hash!(Extension { element, url, value });

impl Extension {
    pub const URL: FieldDescriptor = FieldDescriptor::required("url", &[DataType::Uri]);
    pub const VALUE: FieldDescriptor = FieldDescriptor::optional("value", CHOICE_DATA_TYPES);

    const FIELDS: &'static [FieldDescriptor] = &[Self::URL, Self::VALUE];

    pub fn builder() -> ExtensionBuilder {
        ExtensionBuilder::default()
    }

    pub fn to_builder(&self) -> ExtensionBuilder {
        ExtensionBuilder {
            element: ElementBaseBuilder::from_base(&self.element),
            url: self.url.clone(),
            value: self.value.clone(),
        }
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn value(&self) -> Option<&ChoiceValue> {
        self.value.as_ref()
    }
}

static EXTENSION: TypeDescriptor = TypeDescriptor {
    name: "Extension",
    kind: NodeKind::Element,
    fields: Extension::FIELDS,
    constraints: &[Constraint::rule(
        "ext-1",
        Constraint::BASE_LOCATION,
        "Must have either extensions or value[x], not both",
        "extension.exists() != value.exists()",
        "http://hl7.org/fhir/StructureDefinition/Extension",
    )],
};

impl Validate for Extension {
    fn validate(&self, ctx: &mut ValidationContext<'_>) -> Result<()> {
        self.element.validate(ctx)?;
        match &self.url {
            None => return Err(ctx.missing_field(&Self::URL)),
            Some(url) => {
                if ctx.config().check_value_syntax
                    && let Err(reason) = UriKind::check_value(url)
                {
                    return Err(ctx.invalid_value(DataType::Uri, url.clone(), reason));
                }
            }
        }
        ctx.check_field(&Self::VALUE, &self.value)?;
        ctx.require_value_or_children(self)
    }
}

impl Visitable for Extension {
    fn accept<V: Visitor + ?Sized>(&self, name: &str, index: Option<usize>, visitor: &mut V) {
        walk(NodeRef::Extension(self), name, index, visitor, |visitor| {
            self.element.accept_fields(visitor);
            accept_one(Self::VALUE.name, &self.value, visitor);
        });
    }
}

impl ModelNode for Extension {
    fn descriptor(&self) -> &'static TypeDescriptor {
        &EXTENSION
    }

    fn node_ref(&self) -> NodeRef<'_> {
        NodeRef::Extension(self)
    }

    fn has_content(&self) -> bool {
        self.element.has_content() || self.value.is_some()
    }

    fn data_type(&self) -> DataType {
        DataType::Extension
    }

    fn id(&self) -> Option<&str> {
        self.element.id()
    }

    fn extension(&self) -> &[Arc<Extension>] {
        self.element.extension()
    }
}

/// Staged [`Extension`].
#[derive(Debug, Clone, Default)]
pub struct ExtensionBuilder {
    element: ElementBaseBuilder,
    url: Option<String>,
    value: Option<ChoiceValue>,
}

impl ExtensionBuilder {
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn value(mut self, value: impl Into<ChoiceValue>) -> Self {
        self.value = Some(value.into());
        self
    }
}

impl ElementBuilder for ExtensionBuilder {
    fn element_base(&mut self) -> &mut ElementBaseBuilder {
        &mut self.element
    }
}

impl Builder for ExtensionBuilder {
    type Output = Extension;

    fn freeze(self) -> Extension {
        Extension {
            element: self.element.freeze(),
            url: self.url,
            value: self.value,
            hash: HashCache::default(),
        }
    }
}

impl Buildable for Extension {
    type Builder = ExtensionBuilder;

    fn builder() -> ExtensionBuilder {
        Extension::builder()
    }

    fn to_builder(&self) -> ExtensionBuilder {
        Extension::to_builder(self)
    }
}

/// A reference to a code defined by a terminology system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coding {
    pub(crate) element: ElementBase,
    pub(crate) system: Option<Uri>,
    pub(crate) version: Option<FhirString>,
    pub(crate) code: Option<Code>,
    pub(crate) display: Option<FhirString>,
    pub(crate) user_selected: Option<FhirBoolean>,
    hash: HashCache,
}

memoized_hash!(Coding {
    element,
    system,
    version,
    code,
    display,
    user_selected
});

impl Coding {
    pub const SYSTEM: FieldDescriptor =
        FieldDescriptor::optional("system", &[DataType::Uri]).summary();
    pub const VERSION: FieldDescriptor =
        FieldDescriptor::optional("version", &[DataType::String]).summary();
    pub const CODE: FieldDescriptor =
        FieldDescriptor::optional("code", &[DataType::Code]).summary();
    pub const DISPLAY: FieldDescriptor =
        FieldDescriptor::optional("display", &[DataType::String]).summary();
    pub const USER_SELECTED: FieldDescriptor =
        FieldDescriptor::optional("userSelected", &[DataType::Boolean]).summary();

    const FIELDS: &'static [FieldDescriptor] = &[
        Self::SYSTEM,
        Self::VERSION,
        Self::CODE,
        Self::DISPLAY,
        Self::USER_SELECTED,
    ];

    pub fn builder() -> CodingBuilder {
        CodingBuilder::default()
    }

    /// Shorthand for a coding with a system and a code.
    pub fn of(system: impl Into<Uri>, code: impl Into<Code>) -> Self {
        Self::builder().system(system).code(code).freeze()
    }

    pub fn to_builder(&self) -> CodingBuilder {
        CodingBuilder {
            element: ElementBaseBuilder::from_base(&self.element),
            system: self.system.clone(),
            version: self.version.clone(),
            code: self.code.clone(),
            display: self.display.clone(),
            user_selected: self.user_selected.clone(),
        }
    }

    pub fn system(&self) -> Option<&Uri> {
        self.system.as_ref()
    }

    pub fn version(&self) -> Option<&FhirString> {
        self.version.as_ref()
    }

    pub fn code(&self) -> Option<&Code> {
        self.code.as_ref()
    }

    pub fn display(&self) -> Option<&FhirString> {
        self.display.as_ref()
    }

    pub fn user_selected(&self) -> Option<&FhirBoolean> {
        self.user_selected.as_ref()
    }

    pub(crate) fn coding_ref(&self) -> Option<CodingRef<'_>> {
        let code = self.code.as_ref()?.as_str()?;
        Some(CodingRef {
            system: self.system.as_ref().and_then(|s| s.as_str()),
            code,
        })
    }
}

static CODING: TypeDescriptor = TypeDescriptor {
    name: "Coding",
    kind: NodeKind::Element,
    fields: Coding::FIELDS,
    constraints: &[Constraint::warning(
        "cod-1",
        Constraint::BASE_LOCATION,
        "A Coding SHOULD NOT have a display unless a code is also present",
        "code.exists().not() implies display.exists().not()",
        "http://hl7.org/fhir/StructureDefinition/Coding",
    )],
};

impl Validate for Coding {
    fn validate(&self, ctx: &mut ValidationContext<'_>) -> Result<()> {
        self.element.validate(ctx)?;
        ctx.check_field(&Self::SYSTEM, &self.system)?;
        ctx.check_field(&Self::VERSION, &self.version)?;
        ctx.check_field(&Self::CODE, &self.code)?;
        ctx.check_field(&Self::DISPLAY, &self.display)?;
        ctx.check_field(&Self::USER_SELECTED, &self.user_selected)?;
        ctx.require_value_or_children(self)
    }
}

impl Visitable for Coding {
    fn accept<V: Visitor + ?Sized>(&self, name: &str, index: Option<usize>, visitor: &mut V) {
        walk(NodeRef::Coding(self), name, index, visitor, |visitor| {
            self.element.accept_fields(visitor);
            accept_one(Self::SYSTEM.name, &self.system, visitor);
            accept_one(Self::VERSION.name, &self.version, visitor);
            accept_one(Self::CODE.name, &self.code, visitor);
            accept_one(Self::DISPLAY.name, &self.display, visitor);
            accept_one(Self::USER_SELECTED.name, &self.user_selected, visitor);
        });
    }
}

impl ModelNode for Coding {
    fn descriptor(&self) -> &'static TypeDescriptor {
        &CODING
    }

    fn node_ref(&self) -> NodeRef<'_> {
        NodeRef::Coding(self)
    }

    fn has_content(&self) -> bool {
        self.element.has_content()
            || self.system.is_some()
            || self.version.is_some()
            || self.code.is_some()
            || self.display.is_some()
            || self.user_selected.is_some()
    }

    fn data_type(&self) -> DataType {
        DataType::Coding
    }

    fn coded(&self) -> Option<CodedValue<'_>> {
        self.coding_ref().map(CodedValue::Coding)
    }

    fn id(&self) -> Option<&str> {
        self.element.id()
    }

    fn extension(&self) -> &[Arc<Extension>] {
        self.element.extension()
    }
}

/// Staged [`Coding`].
#[derive(Debug, Clone, Default)]
pub struct CodingBuilder {
    element: ElementBaseBuilder,
    system: Option<Uri>,
    version: Option<FhirString>,
    code: Option<Code>,
    display: Option<FhirString>,
    user_selected: Option<FhirBoolean>,
}

impl CodingBuilder {
    pub fn system(mut self, system: impl Into<Uri>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn version(mut self, version: impl Into<FhirString>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn code(mut self, code: impl Into<Code>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn display(mut self, display: impl Into<FhirString>) -> Self {
        self.display = Some(display.into());
        self
    }

    pub fn user_selected(mut self, user_selected: impl Into<FhirBoolean>) -> Self {
        self.user_selected = Some(user_selected.into());
        self
    }
}

impl ElementBuilder for CodingBuilder {
    fn element_base(&mut self) -> &mut ElementBaseBuilder {
        &mut self.element
    }
}

impl Builder for CodingBuilder {
    type Output = Coding;

    fn freeze(self) -> Coding {
        Coding {
            element: self.element.freeze(),
            system: self.system,
            version: self.version,
            code: self.code,
            display: self.display,
            user_selected: self.user_selected,
            hash: HashCache::default(),
        }
    }
}

impl Buildable for Coding {
    type Builder = CodingBuilder;

    fn builder() -> CodingBuilder {
        Coding::builder()
    }

    fn to_builder(&self) -> CodingBuilder {
        Coding::to_builder(self)
    }
}

/// A concept given as a set of codings and/or text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeableConcept {
    pub(crate) element: ElementBase,
    pub(crate) coding: Arc<[Arc<Coding>]>,
    pub(crate) text: Option<FhirString>,
    hash: HashCache,
}

memoized_hash!(CodeableConcept {
    element,
    coding,
    text
});

impl CodeableConcept {
    pub const CODING: FieldDescriptor =
        FieldDescriptor::repeated("coding", &[DataType::Coding]).summary();
    pub const TEXT: FieldDescriptor =
        FieldDescriptor::optional("text", &[DataType::String]).summary();

    const FIELDS: &'static [FieldDescriptor] = &[Self::CODING, Self::TEXT];

    pub fn builder() -> CodeableConceptBuilder {
        CodeableConceptBuilder::default()
    }

    pub fn to_builder(&self) -> CodeableConceptBuilder {
        CodeableConceptBuilder {
            element: ElementBaseBuilder::from_base(&self.element),
            coding: self.coding.to_vec(),
            text: self.text.clone(),
        }
    }

    pub fn coding(&self) -> &[Arc<Coding>] {
        &self.coding
    }

    pub fn text(&self) -> Option<&FhirString> {
        self.text.as_ref()
    }
}

static CODEABLE_CONCEPT: TypeDescriptor = TypeDescriptor {
    name: "CodeableConcept",
    kind: NodeKind::Element,
    fields: CodeableConcept::FIELDS,
    constraints: &[],
};

impl Validate for CodeableConcept {
    fn validate(&self, ctx: &mut ValidationContext<'_>) -> Result<()> {
        self.element.validate(ctx)?;
        ctx.check_field(&Self::CODING, &self.coding)?;
        ctx.check_field(&Self::TEXT, &self.text)?;
        ctx.require_value_or_children(self)
    }
}

impl Visitable for CodeableConcept {
    fn accept<V: Visitor + ?Sized>(&self, name: &str, index: Option<usize>, visitor: &mut V) {
        walk(NodeRef::CodeableConcept(self), name, index, visitor, |visitor| {
            self.element.accept_fields(visitor);
            accept_all(Self::CODING.name, &self.coding, visitor);
            accept_one(Self::TEXT.name, &self.text, visitor);
        });
    }
}

impl ModelNode for CodeableConcept {
    fn descriptor(&self) -> &'static TypeDescriptor {
        &CODEABLE_CONCEPT
    }

    fn node_ref(&self) -> NodeRef<'_> {
        NodeRef::CodeableConcept(self)
    }

    fn has_content(&self) -> bool {
        self.element.has_content() || !self.coding.is_empty() || self.text.is_some()
    }

    fn data_type(&self) -> DataType {
        DataType::CodeableConcept
    }

    fn coded(&self) -> Option<CodedValue<'_>> {
        let codings: Vec<_> = self
            .coding
            .iter()
            .filter_map(|coding| coding.coding_ref())
            .collect();
        if codings.is_empty() {
            None
        } else {
            Some(CodedValue::Concept(codings))
        }
    }

    fn id(&self) -> Option<&str> {
        self.element.id()
    }

    fn extension(&self) -> &[Arc<Extension>] {
        self.element.extension()
    }
}

/// Staged [`CodeableConcept`].
#[derive(Debug, Clone, Default)]
pub struct CodeableConceptBuilder {
    element: ElementBaseBuilder,
    coding: Vec<Arc<Coding>>,
    text: Option<FhirString>,
}

impl CodeableConceptBuilder {
    pub fn coding(mut self, coding: impl IntoIterator<Item = Coding>) -> Self {
        self.coding.extend(coding.into_iter().map(Arc::new));
        self
    }

    pub fn set_coding(mut self, coding: impl IntoIterator<Item = Coding>) -> Self {
        self.coding = coding.into_iter().map(Arc::new).collect();
        self
    }

    pub fn text(mut self, text: impl Into<FhirString>) -> Self {
        self.text = Some(text.into());
        self
    }
}

impl ElementBuilder for CodeableConceptBuilder {
    fn element_base(&mut self) -> &mut ElementBaseBuilder {
        &mut self.element
    }
}

impl Builder for CodeableConceptBuilder {
    type Output = CodeableConcept;

    fn freeze(self) -> CodeableConcept {
        CodeableConcept {
            element: self.element.freeze(),
            coding: self.coding.into(),
            text: self.text,
            hash: HashCache::default(),
        }
    }
}

impl Buildable for CodeableConcept {
    type Builder = CodeableConceptBuilder;

    fn builder() -> CodeableConceptBuilder {
        CodeableConcept::builder()
    }

    fn to_builder(&self) -> CodeableConceptBuilder {
        CodeableConcept::to_builder(self)
    }
}

/// An identifier intended for computation, unique within `system`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    pub(crate) element: ElementBase,
    pub(crate) use_: Option<Code>,
    pub(crate) type_: Option<CodeableConcept>,
    pub(crate) system: Option<Uri>,
    pub(crate) value: Option<FhirString>,
    hash: HashCache,
}

memoized_hash!(Identifier {
    element,
    use_,
    type_,
    system,
    value
});

impl Identifier {
    pub const USE: FieldDescriptor = FieldDescriptor::optional("use", &[DataType::Code])
        .summary()
        .bound(BindingDescriptor::required(
            "IdentifierUse",
            "http://hl7.org/fhir/ValueSet/identifier-use|5.0.0",
        ));
    pub const TYPE: FieldDescriptor =
        FieldDescriptor::optional("type", &[DataType::CodeableConcept])
            .summary()
            .bound(BindingDescriptor::extensible(
                "IdentifierType",
                "http://hl7.org/fhir/ValueSet/identifier-type",
            ));
    pub const SYSTEM: FieldDescriptor =
        FieldDescriptor::optional("system", &[DataType::Uri]).summary();
    pub const VALUE: FieldDescriptor =
        FieldDescriptor::optional("value", &[DataType::String]).summary();

    const FIELDS: &'static [FieldDescriptor] =
        &[Self::USE, Self::TYPE, Self::SYSTEM, Self::VALUE];

    pub fn builder() -> IdentifierBuilder {
        IdentifierBuilder::default()
    }

    pub fn to_builder(&self) -> IdentifierBuilder {
        IdentifierBuilder {
            element: ElementBaseBuilder::from_base(&self.element),
            use_: self.use_.clone(),
            type_: self.type_.clone(),
            system: self.system.clone(),
            value: self.value.clone(),
        }
    }

    pub fn use_(&self) -> Option<&Code> {
        self.use_.as_ref()
    }

    pub fn type_(&self) -> Option<&CodeableConcept> {
        self.type_.as_ref()
    }

    pub fn system(&self) -> Option<&Uri> {
        self.system.as_ref()
    }

    pub fn value(&self) -> Option<&FhirString> {
        self.value.as_ref()
    }
}

static IDENTIFIER: TypeDescriptor = TypeDescriptor {
    name: "Identifier",
    kind: NodeKind::Element,
    fields: Identifier::FIELDS,
    constraints: &[Constraint::warning(
        "ident-1",
        Constraint::BASE_LOCATION,
        "Identifier with no value has limited utility",
        "value.exists()",
        "http://hl7.org/fhir/StructureDefinition/Identifier",
    )],
};

impl Validate for Identifier {
    fn validate(&self, ctx: &mut ValidationContext<'_>) -> Result<()> {
        self.element.validate(ctx)?;
        ctx.check_field(&Self::USE, &self.use_)?;
        ctx.check_field(&Self::TYPE, &self.type_)?;
        ctx.check_field(&Self::SYSTEM, &self.system)?;
        ctx.check_field(&Self::VALUE, &self.value)?;
        ctx.require_value_or_children(self)
    }
}

impl Visitable for Identifier {
    fn accept<V: Visitor + ?Sized>(&self, name: &str, index: Option<usize>, visitor: &mut V) {
        walk(NodeRef::Identifier(self), name, index, visitor, |visitor| {
            self.element.accept_fields(visitor);
            accept_one(Self::USE.name, &self.use_, visitor);
            accept_one(Self::TYPE.name, &self.type_, visitor);
            accept_one(Self::SYSTEM.name, &self.system, visitor);
            accept_one(Self::VALUE.name, &self.value, visitor);
        });
    }
}

impl ModelNode for Identifier {
    fn descriptor(&self) -> &'static TypeDescriptor {
        &IDENTIFIER
    }

    fn node_ref(&self) -> NodeRef<'_> {
        NodeRef::Identifier(self)
    }

    fn has_content(&self) -> bool {
        self.element.has_content()
            || self.use_.is_some()
            || self.type_.is_some()
            || self.system.is_some()
            || self.value.is_some()
    }

    fn data_type(&self) -> DataType {
        DataType::Identifier
    }

    fn id(&self) -> Option<&str> {
        self.element.id()
    }

    fn extension(&self) -> &[Arc<Extension>] {
        self.element.extension()
    }
}

/// Staged [`Identifier`].
#[derive(Debug, Clone, Default)]
pub struct IdentifierBuilder {
    element: ElementBaseBuilder,
    use_: Option<Code>,
    type_: Option<CodeableConcept>,
    system: Option<Uri>,
    value: Option<FhirString>,
}

impl IdentifierBuilder {
    pub fn use_(mut self, use_: impl Into<Code>) -> Self {
        self.use_ = Some(use_.into());
        self
    }

    pub fn type_(mut self, type_: CodeableConcept) -> Self {
        self.type_ = Some(type_);
        self
    }

    pub fn system(mut self, system: impl Into<Uri>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn value(mut self, value: impl Into<FhirString>) -> Self {
        self.value = Some(value.into());
        self
    }
}

impl ElementBuilder for IdentifierBuilder {
    fn element_base(&mut self) -> &mut ElementBaseBuilder {
        &mut self.element
    }
}

impl Builder for IdentifierBuilder {
    type Output = Identifier;

    fn freeze(self) -> Identifier {
        Identifier {
            element: self.element.freeze(),
            use_: self.use_,
            type_: self.type_,
            system: self.system,
            value: self.value,
            hash: HashCache::default(),
        }
    }
}

impl Buildable for Identifier {
    type Builder = IdentifierBuilder;

    fn builder() -> IdentifierBuilder {
        Identifier::builder()
    }

    fn to_builder(&self) -> IdentifierBuilder {
        Identifier::to_builder(self)
    }
}

/// Metadata about a resource: version stamp, profiles and tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Meta {
    pub(crate) element: ElementBase,
    pub(crate) version_id: Option<FhirString>,
    pub(crate) last_updated: Option<FhirDateTime>,
    pub(crate) source: Option<Uri>,
    pub(crate) profile: Arc<[Arc<Canonical>]>,
    pub(crate) security: Arc<[Arc<Coding>]>,
    pub(crate) tag: Arc<[Arc<Coding>]>,
    hash: HashCache,
}

memoized_hash!(Meta {
    element,
    version_id,
    last_updated,
    source,
    profile,
    security,
    tag
});

impl Meta {
    pub const VERSION_ID: FieldDescriptor =
        FieldDescriptor::optional("versionId", &[DataType::String]).summary();
    pub const LAST_UPDATED: FieldDescriptor =
        FieldDescriptor::optional("lastUpdated", &[DataType::DateTime]).summary();
    pub const SOURCE: FieldDescriptor =
        FieldDescriptor::optional("source", &[DataType::Uri]).summary();
    pub const PROFILE: FieldDescriptor =
        FieldDescriptor::repeated("profile", &[DataType::Canonical]).summary();
    pub const SECURITY: FieldDescriptor =
        FieldDescriptor::repeated("security", &[DataType::Coding])
            .summary()
            .bound(BindingDescriptor::extensible(
                "SecurityLabels",
                "http://hl7.org/fhir/ValueSet/security-labels",
            ));
    pub const TAG: FieldDescriptor = FieldDescriptor::repeated("tag", &[DataType::Coding]).summary();

    const FIELDS: &'static [FieldDescriptor] = &[
        Self::VERSION_ID,
        Self::LAST_UPDATED,
        Self::SOURCE,
        Self::PROFILE,
        Self::SECURITY,
        Self::TAG,
    ];

    pub fn builder() -> MetaBuilder {
        MetaBuilder::default()
    }

    pub fn to_builder(&self) -> MetaBuilder {
        MetaBuilder {
            element: ElementBaseBuilder::from_base(&self.element),
            version_id: self.version_id.clone(),
            last_updated: self.last_updated.clone(),
            source: self.source.clone(),
            profile: self.profile.to_vec(),
            security: self.security.to_vec(),
            tag: self.tag.to_vec(),
        }
    }

    pub fn version_id(&self) -> Option<&FhirString> {
        self.version_id.as_ref()
    }

    pub fn last_updated(&self) -> Option<&FhirDateTime> {
        self.last_updated.as_ref()
    }

    pub fn source(&self) -> Option<&Uri> {
        self.source.as_ref()
    }

    pub fn profile(&self) -> &[Arc<Canonical>] {
        &self.profile
    }

    pub fn security(&self) -> &[Arc<Coding>] {
        &self.security
    }

    pub fn tag(&self) -> &[Arc<Coding>] {
        &self.tag
    }
}

static META: TypeDescriptor = TypeDescriptor {
    name: "Meta",
    kind: NodeKind::Element,
    fields: Meta::FIELDS,
    constraints: &[],
};

impl Validate for Meta {
    fn validate(&self, ctx: &mut ValidationContext<'_>) -> Result<()> {
        self.element.validate(ctx)?;
        ctx.check_field(&Self::VERSION_ID, &self.version_id)?;
        ctx.check_field(&Self::LAST_UPDATED, &self.last_updated)?;
        ctx.check_field(&Self::SOURCE, &self.source)?;
        ctx.check_field(&Self::PROFILE, &self.profile)?;
        ctx.check_field(&Self::SECURITY, &self.security)?;
        ctx.check_field(&Self::TAG, &self.tag)?;
        ctx.require_value_or_children(self)
    }
}

impl Visitable for Meta {
    fn accept<V: Visitor + ?Sized>(&self, name: &str, index: Option<usize>, visitor: &mut V) {
        walk(NodeRef::Meta(self), name, index, visitor, |visitor| {
            self.element.accept_fields(visitor);
            accept_one(Self::VERSION_ID.name, &self.version_id, visitor);
            accept_one(Self::LAST_UPDATED.name, &self.last_updated, visitor);
            accept_one(Self::SOURCE.name, &self.source, visitor);
            accept_all(Self::PROFILE.name, &self.profile, visitor);
            accept_all(Self::SECURITY.name, &self.security, visitor);
            accept_all(Self::TAG.name, &self.tag, visitor);
        });
    }
}

impl ModelNode for Meta {
    fn descriptor(&self) -> &'static TypeDescriptor {
        &META
    }

    fn node_ref(&self) -> NodeRef<'_> {
        NodeRef::Meta(self)
    }

    fn has_content(&self) -> bool {
        self.element.has_content()
            || self.version_id.is_some()
            || self.last_updated.is_some()
            || self.source.is_some()
            || !self.profile.is_empty()
            || !self.security.is_empty()
            || !self.tag.is_empty()
    }

    fn data_type(&self) -> DataType {
        DataType::Meta
    }

    fn id(&self) -> Option<&str> {
        self.element.id()
    }

    fn extension(&self) -> &[Arc<Extension>] {
        self.element.extension()
    }
}

/// Staged [`Meta`].
#[derive(Debug, Clone, Default)]
pub struct MetaBuilder {
    element: ElementBaseBuilder,
    version_id: Option<FhirString>,
    last_updated: Option<FhirDateTime>,
    source: Option<Uri>,
    profile: Vec<Arc<Canonical>>,
    security: Vec<Arc<Coding>>,
    tag: Vec<Arc<Coding>>,
}

impl MetaBuilder {
    pub fn version_id(mut self, version_id: impl Into<FhirString>) -> Self {
        self.version_id = Some(version_id.into());
        self
    }

    pub fn last_updated(mut self, last_updated: impl Into<FhirDateTime>) -> Self {
        self.last_updated = Some(last_updated.into());
        self
    }

    pub fn source(mut self, source: impl Into<Uri>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn profile(mut self, profile: impl IntoIterator<Item = Canonical>) -> Self {
        self.profile.extend(profile.into_iter().map(Arc::new));
        self
    }

    pub fn set_profile(mut self, profile: impl IntoIterator<Item = Canonical>) -> Self {
        self.profile = profile.into_iter().map(Arc::new).collect();
        self
    }

    pub fn security(mut self, security: impl IntoIterator<Item = Coding>) -> Self {
        self.security.extend(security.into_iter().map(Arc::new));
        self
    }

    pub fn set_security(mut self, security: impl IntoIterator<Item = Coding>) -> Self {
        self.security = security.into_iter().map(Arc::new).collect();
        self
    }

    pub fn tag(mut self, tag: impl IntoIterator<Item = Coding>) -> Self {
        self.tag.extend(tag.into_iter().map(Arc::new));
        self
    }

    pub fn set_tag(mut self, tag: impl IntoIterator<Item = Coding>) -> Self {
        self.tag = tag.into_iter().map(Arc::new).collect();
        self
    }
}

impl ElementBuilder for MetaBuilder {
    fn element_base(&mut self) -> &mut ElementBaseBuilder {
        &mut self.element
    }
}

impl Builder for MetaBuilder {
    type Output = Meta;

    fn freeze(self) -> Meta {
        Meta {
            element: self.element.freeze(),
            version_id: self.version_id,
            last_updated: self.last_updated,
            source: self.source,
            profile: self.profile.into(),
            security: self.security.into(),
            tag: self.tag.into(),
            hash: HashCache::default(),
        }
    }
}

impl Buildable for Meta {
    type Builder = MetaBuilder;

    fn builder() -> MetaBuilder {
        Meta::builder()
    }

    fn to_builder(&self) -> MetaBuilder {
        Meta::to_builder(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;

    #[test]
    fn test_extension_requires_url() {
        let err = Extension::builder().value("x").build().unwrap_err();
        assert_eq!(
            err,
            ModelError::MissingRequiredField {
                field: "url",
                path: "Extension.url".to_string()
            }
        );
    }

    #[test]
    fn test_extension_without_value_is_empty() {
        let err = Extension::builder()
            .url("http://example.org/ext")
            .build()
            .unwrap_err();
        assert!(matches!(err, ModelError::EmptyLeafElement { .. }));
    }

    #[test]
    fn test_coding_shorthand() {
        let coding = Coding::of("http://loinc.org", "1234-5");
        assert_eq!(coding.code().and_then(|c| c.as_str()), Some("1234-5"));
        assert_eq!(
            coding.coded(),
            Some(CodedValue::Coding(CodingRef {
                system: Some("http://loinc.org"),
                code: "1234-5"
            }))
        );
    }

    #[test]
    fn test_concept_without_codes_is_not_coded() {
        let concept = CodeableConcept::builder().text("free text").build().unwrap();
        assert!(concept.coded().is_none());
    }

    #[test]
    fn test_meta_lists_are_snapshotted() {
        let meta = Meta::builder()
            .version_id("1")
            .tag([Coding::of("http://example.org/tags", "a")])
            .tag([Coding::of("http://example.org/tags", "b")])
            .build()
            .unwrap();
        assert_eq!(meta.tag().len(), 2);

        let replaced = meta
            .to_builder()
            .set_tag([Coding::of("http://example.org/tags", "c")])
            .build()
            .unwrap();
        assert_eq!(replaced.tag().len(), 1);
        assert_eq!(meta.tag().len(), 2);
    }
}

//! The `ValueSet` resource and its compose tree.

use std::sync::Arc;

use crate::builder::{Buildable, Builder};
use crate::error::Result;
use crate::types::descriptor::{BindingDescriptor, FieldDescriptor, TypeDescriptor};
use crate::types::hash::{HashCache, memoized_hash};
use crate::types::node::{
    BackboneBase, BackboneBaseBuilder, BackboneElementBuilder, ElementBaseBuilder, ElementBuilder,
    NodeKind, ResourceBase, ResourceBaseBuilder, ResourceBuilder,
};
use crate::types::{
    Canonical, Code, Constraint, DataType, Extension, FhirBoolean, FhirDateTime, FhirString,
    Identifier, Markdown, ModelNode, Uri,
};
use crate::validation::{Validate, ValidationContext};
use crate::visitor::{NodeRef, Visitable, Visitor, accept_all, accept_one, walk};

const SOURCE: &str = "http://hl7.org/fhir/StructureDefinition/ValueSet";

/// A set of codes drawn from one or more code systems, defined by a
/// composition of includes and excludes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueSet {
    pub(crate) resource: ResourceBase,
    pub(crate) url: Option<Uri>,
    pub(crate) identifier: Arc<[Arc<Identifier>]>,
    pub(crate) version: Option<FhirString>,
    pub(crate) name: Option<FhirString>,
    pub(crate) title: Option<FhirString>,
    pub(crate) status: Option<Code>,
    pub(crate) experimental: Option<FhirBoolean>,
    pub(crate) date: Option<FhirDateTime>,
    pub(crate) publisher: Option<FhirString>,
    pub(crate) description: Option<Markdown>,
    pub(crate) immutable: Option<FhirBoolean>,
    pub(crate) purpose: Option<Markdown>,
    pub(crate) copyright: Option<Markdown>,
    pub(crate) compose: Option<ValueSetCompose>,
    hash: HashCache,
}

memoized_hash!(ValueSet {
    resource,
    url,
    identifier,
    version,
    name,
    title,
    status,
    experimental,
    date,
    publisher,
    description,
    immutable,
    purpose,
    copyright,
    compose
});

impl ValueSet {
    pub const URL: FieldDescriptor = FieldDescriptor::optional("url", &[DataType::Uri]).summary();
    pub const IDENTIFIER: FieldDescriptor =
        FieldDescriptor::repeated("identifier", &[DataType::Identifier]).summary();
    pub const VERSION: FieldDescriptor =
        FieldDescriptor::optional("version", &[DataType::String]).summary();
    pub const NAME: FieldDescriptor =
        FieldDescriptor::optional("name", &[DataType::String]).summary();
    pub const TITLE: FieldDescriptor =
        FieldDescriptor::optional("title", &[DataType::String]).summary();
    pub const STATUS: FieldDescriptor = FieldDescriptor::required("status", &[DataType::Code])
        .summary()
        .bound(
            BindingDescriptor::required(
                "PublicationStatus",
                "http://hl7.org/fhir/ValueSet/publication-status|5.0.0",
            )
            .with_system("http://hl7.org/fhir/publication-status"),
        );
    pub const EXPERIMENTAL: FieldDescriptor =
        FieldDescriptor::optional("experimental", &[DataType::Boolean]).summary();
    pub const DATE: FieldDescriptor =
        FieldDescriptor::optional("date", &[DataType::DateTime]).summary();
    pub const PUBLISHER: FieldDescriptor =
        FieldDescriptor::optional("publisher", &[DataType::String]).summary();
    pub const DESCRIPTION: FieldDescriptor =
        FieldDescriptor::optional("description", &[DataType::Markdown]);
    pub const IMMUTABLE: FieldDescriptor =
        FieldDescriptor::optional("immutable", &[DataType::Boolean]).summary();
    pub const PURPOSE: FieldDescriptor =
        FieldDescriptor::optional("purpose", &[DataType::Markdown]);
    pub const COPYRIGHT: FieldDescriptor =
        FieldDescriptor::optional("copyright", &[DataType::Markdown]);
    pub const COMPOSE: FieldDescriptor =
        FieldDescriptor::optional("compose", &[DataType::BackboneElement]);

    const FIELDS: &'static [FieldDescriptor] = &[
        Self::URL,
        Self::IDENTIFIER,
        Self::VERSION,
        Self::NAME,
        Self::TITLE,
        Self::STATUS,
        Self::EXPERIMENTAL,
        Self::DATE,
        Self::PUBLISHER,
        Self::DESCRIPTION,
        Self::IMMUTABLE,
        Self::PURPOSE,
        Self::COPYRIGHT,
        Self::COMPOSE,
    ];

    pub fn builder() -> ValueSetBuilder {
        ValueSetBuilder::default()
    }

    pub fn to_builder(&self) -> ValueSetBuilder {
        ValueSetBuilder {
            resource: ResourceBaseBuilder::from_base(&self.resource),
            url: self.url.clone(),
            identifier: self.identifier.to_vec(),
            version: self.version.clone(),
            name: self.name.clone(),
            title: self.title.clone(),
            status: self.status.clone(),
            experimental: self.experimental.clone(),
            date: self.date.clone(),
            publisher: self.publisher.clone(),
            description: self.description.clone(),
            immutable: self.immutable.clone(),
            purpose: self.purpose.clone(),
            copyright: self.copyright.clone(),
            compose: self.compose.clone(),
        }
    }

    pub fn resource(&self) -> &ResourceBase {
        &self.resource
    }

    pub fn url(&self) -> Option<&Uri> {
        self.url.as_ref()
    }

    pub fn identifier(&self) -> &[Arc<Identifier>] {
        &self.identifier
    }

    pub fn version(&self) -> Option<&FhirString> {
        self.version.as_ref()
    }

    pub fn name(&self) -> Option<&FhirString> {
        self.name.as_ref()
    }

    pub fn title(&self) -> Option<&FhirString> {
        self.title.as_ref()
    }

    pub fn status(&self) -> Option<&Code> {
        self.status.as_ref()
    }

    pub fn experimental(&self) -> Option<&FhirBoolean> {
        self.experimental.as_ref()
    }

    pub fn date(&self) -> Option<&FhirDateTime> {
        self.date.as_ref()
    }

    pub fn publisher(&self) -> Option<&FhirString> {
        self.publisher.as_ref()
    }

    pub fn description(&self) -> Option<&Markdown> {
        self.description.as_ref()
    }

    pub fn immutable(&self) -> Option<&FhirBoolean> {
        self.immutable.as_ref()
    }

    pub fn purpose(&self) -> Option<&Markdown> {
        self.purpose.as_ref()
    }

    pub fn copyright(&self) -> Option<&Markdown> {
        self.copyright.as_ref()
    }

    pub fn compose(&self) -> Option<&ValueSetCompose> {
        self.compose.as_ref()
    }
}

static VALUE_SET: TypeDescriptor = TypeDescriptor {
    name: "ValueSet",
    kind: NodeKind::Resource,
    fields: ValueSet::FIELDS,
    constraints: &[
        Constraint::warning(
            "cnl-0",
            Constraint::BASE_LOCATION,
            "Name should be usable as an identifier for the module by machine processing applications such as code generation",
            "name.exists() implies name.matches('^[A-Z]([A-Za-z0-9_]){1,254}$')",
            SOURCE,
        ),
        Constraint::warning(
            "cnl-1",
            "ValueSet.url",
            "URL should not contain | or # - these characters make processing canonical references problematic",
            "exists() implies matches('^[^|# ]+$')",
            SOURCE,
        ),
        Constraint::rule(
            "vsd-1",
            "ValueSet.compose.include",
            "A value set include/exclude SHALL have a value set or a system",
            "valueSet.exists() or system.exists()",
            SOURCE,
        ),
        Constraint::rule(
            "vsd-2",
            "ValueSet.compose.include",
            "A value set with concepts or filters SHALL include a system",
            "(concept.exists() or filter.exists()) implies system.exists()",
            SOURCE,
        ),
        Constraint::rule(
            "vsd-3",
            "ValueSet.compose.include",
            "Cannot have both concept and filter",
            "concept.empty() or filter.empty()",
            SOURCE,
        ),
    ],
};

impl Validate for ValueSet {
    fn validate(&self, ctx: &mut ValidationContext<'_>) -> Result<()> {
        self.resource.validate(ctx)?;
        ctx.check_field(&Self::URL, &self.url)?;
        ctx.check_field(&Self::IDENTIFIER, &self.identifier)?;
        ctx.check_field(&Self::VERSION, &self.version)?;
        ctx.check_field(&Self::NAME, &self.name)?;
        ctx.check_field(&Self::TITLE, &self.title)?;
        ctx.check_field(&Self::STATUS, &self.status)?;
        ctx.check_field(&Self::EXPERIMENTAL, &self.experimental)?;
        ctx.check_field(&Self::DATE, &self.date)?;
        ctx.check_field(&Self::PUBLISHER, &self.publisher)?;
        ctx.check_field(&Self::DESCRIPTION, &self.description)?;
        ctx.check_field(&Self::IMMUTABLE, &self.immutable)?;
        ctx.check_field(&Self::PURPOSE, &self.purpose)?;
        ctx.check_field(&Self::COPYRIGHT, &self.copyright)?;
        ctx.check_field(&Self::COMPOSE, &self.compose)
    }
}

impl Visitable for ValueSet {
    fn accept<V: Visitor + ?Sized>(&self, name: &str, index: Option<usize>, visitor: &mut V) {
        walk(NodeRef::ValueSet(self), name, index, visitor, |visitor| {
            self.resource.accept_fields(visitor);
            accept_one(Self::URL.name, &self.url, visitor);
            accept_all(Self::IDENTIFIER.name, &self.identifier, visitor);
            accept_one(Self::VERSION.name, &self.version, visitor);
            accept_one(Self::NAME.name, &self.name, visitor);
            accept_one(Self::TITLE.name, &self.title, visitor);
            accept_one(Self::STATUS.name, &self.status, visitor);
            accept_one(Self::EXPERIMENTAL.name, &self.experimental, visitor);
            accept_one(Self::DATE.name, &self.date, visitor);
            accept_one(Self::PUBLISHER.name, &self.publisher, visitor);
            accept_one(Self::DESCRIPTION.name, &self.description, visitor);
            accept_one(Self::IMMUTABLE.name, &self.immutable, visitor);
            accept_one(Self::PURPOSE.name, &self.purpose, visitor);
            accept_one(Self::COPYRIGHT.name, &self.copyright, visitor);
            accept_one(Self::COMPOSE.name, &self.compose, visitor);
        });
    }
}

impl ModelNode for ValueSet {
    fn descriptor(&self) -> &'static TypeDescriptor {
        &VALUE_SET
    }

    fn node_ref(&self) -> NodeRef<'_> {
        NodeRef::ValueSet(self)
    }

    fn has_content(&self) -> bool {
        self.resource.has_content()
            || self.url.is_some()
            || !self.identifier.is_empty()
            || self.version.is_some()
            || self.name.is_some()
            || self.title.is_some()
            || self.status.is_some()
            || self.experimental.is_some()
            || self.date.is_some()
            || self.publisher.is_some()
            || self.description.is_some()
            || self.immutable.is_some()
            || self.purpose.is_some()
            || self.copyright.is_some()
            || self.compose.is_some()
    }

    fn data_type(&self) -> DataType {
        DataType::Resource
    }

    fn id(&self) -> Option<&str> {
        self.resource.id()
    }

    fn extension(&self) -> &[Arc<Extension>] {
        self.resource.extension()
    }

    fn modifier_extension(&self) -> &[Arc<Extension>] {
        self.resource.modifier_extension()
    }
}

/// Staged [`ValueSet`].
#[derive(Debug, Clone, Default)]
pub struct ValueSetBuilder {
    resource: ResourceBaseBuilder,
    url: Option<Uri>,
    identifier: Vec<Arc<Identifier>>,
    version: Option<FhirString>,
    name: Option<FhirString>,
    title: Option<FhirString>,
    status: Option<Code>,
    experimental: Option<FhirBoolean>,
    date: Option<FhirDateTime>,
    publisher: Option<FhirString>,
    description: Option<Markdown>,
    immutable: Option<FhirBoolean>,
    purpose: Option<Markdown>,
    copyright: Option<Markdown>,
    compose: Option<ValueSetCompose>,
}

impl ValueSetBuilder {
    pub fn url(mut self, url: impl Into<Uri>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn identifier(mut self, identifier: impl IntoIterator<Item = Identifier>) -> Self {
        self.identifier.extend(identifier.into_iter().map(Arc::new));
        self
    }

    pub fn set_identifier(mut self, identifier: impl IntoIterator<Item = Identifier>) -> Self {
        self.identifier = identifier.into_iter().map(Arc::new).collect();
        self
    }

    pub fn version(mut self, version: impl Into<FhirString>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn name(mut self, name: impl Into<FhirString>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn title(mut self, title: impl Into<FhirString>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn status(mut self, status: impl Into<Code>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn experimental(mut self, experimental: impl Into<FhirBoolean>) -> Self {
        self.experimental = Some(experimental.into());
        self
    }

    pub fn date(mut self, date: impl Into<FhirDateTime>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn publisher(mut self, publisher: impl Into<FhirString>) -> Self {
        self.publisher = Some(publisher.into());
        self
    }

    pub fn description(mut self, description: impl Into<Markdown>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn immutable(mut self, immutable: impl Into<FhirBoolean>) -> Self {
        self.immutable = Some(immutable.into());
        self
    }

    pub fn purpose(mut self, purpose: impl Into<Markdown>) -> Self {
        self.purpose = Some(purpose.into());
        self
    }

    pub fn copyright(mut self, copyright: impl Into<Markdown>) -> Self {
        self.copyright = Some(copyright.into());
        self
    }

    pub fn compose(mut self, compose: ValueSetCompose) -> Self {
        self.compose = Some(compose);
        self
    }
}

impl ResourceBuilder for ValueSetBuilder {
    fn resource_base(&mut self) -> &mut ResourceBaseBuilder {
        &mut self.resource
    }
}

impl Builder for ValueSetBuilder {
    type Output = ValueSet;

    fn freeze(self) -> ValueSet {
        ValueSet {
            resource: self.resource.freeze(),
            url: self.url,
            identifier: self.identifier.into(),
            version: self.version,
            name: self.name,
            title: self.title,
            status: self.status,
            experimental: self.experimental,
            date: self.date,
            publisher: self.publisher,
            description: self.description,
            immutable: self.immutable,
            purpose: self.purpose,
            copyright: self.copyright,
            compose: self.compose,
            hash: HashCache::default(),
        }
    }
}

impl Buildable for ValueSet {
    type Builder = ValueSetBuilder;

    fn builder() -> ValueSetBuilder {
        ValueSet::builder()
    }

    fn to_builder(&self) -> ValueSetBuilder {
        ValueSet::to_builder(self)
    }
}

/// Content logical definition of the value set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueSetCompose {
    pub(crate) backbone: BackboneBase,
    pub(crate) inactive: Option<FhirBoolean>,
    pub(crate) include: Arc<[Arc<ValueSetInclude>]>,
    pub(crate) exclude: Arc<[Arc<ValueSetInclude>]>,
    hash: HashCache,
}

memoized_hash!(ValueSetCompose {
    backbone,
    inactive,
    include,
    exclude
});

impl ValueSetCompose {
    pub const INACTIVE: FieldDescriptor =
        FieldDescriptor::optional("inactive", &[DataType::Boolean]).summary();
    pub const INCLUDE: FieldDescriptor =
        FieldDescriptor::required_non_empty("include", &[DataType::BackboneElement]);
    pub const EXCLUDE: FieldDescriptor =
        FieldDescriptor::repeated("exclude", &[DataType::BackboneElement]);

    const FIELDS: &'static [FieldDescriptor] = &[Self::INACTIVE, Self::INCLUDE, Self::EXCLUDE];

    pub fn builder() -> ValueSetComposeBuilder {
        ValueSetComposeBuilder::default()
    }

    pub fn to_builder(&self) -> ValueSetComposeBuilder {
        ValueSetComposeBuilder {
            backbone: BackboneBaseBuilder::from_base(&self.backbone),
            inactive: self.inactive.clone(),
            include: self.include.to_vec(),
            exclude: self.exclude.to_vec(),
        }
    }

    pub fn inactive(&self) -> Option<&FhirBoolean> {
        self.inactive.as_ref()
    }

    pub fn include(&self) -> &[Arc<ValueSetInclude>] {
        &self.include
    }

    pub fn exclude(&self) -> &[Arc<ValueSetInclude>] {
        &self.exclude
    }
}

static VALUE_SET_COMPOSE: TypeDescriptor = TypeDescriptor {
    name: "ValueSet.compose",
    kind: NodeKind::BackboneElement,
    fields: ValueSetCompose::FIELDS,
    constraints: &[],
};

impl Validate for ValueSetCompose {
    fn validate(&self, ctx: &mut ValidationContext<'_>) -> Result<()> {
        self.backbone.validate(ctx)?;
        ctx.check_field(&Self::INACTIVE, &self.inactive)?;
        ctx.check_field(&Self::INCLUDE, &self.include)?;
        ctx.check_field(&Self::EXCLUDE, &self.exclude)?;
        ctx.require_value_or_children(self)
    }
}

impl Visitable for ValueSetCompose {
    fn accept<V: Visitor + ?Sized>(&self, name: &str, index: Option<usize>, visitor: &mut V) {
        walk(NodeRef::ValueSetCompose(self), name, index, visitor, |visitor| {
            self.backbone.accept_fields(visitor);
            accept_one(Self::INACTIVE.name, &self.inactive, visitor);
            accept_all(Self::INCLUDE.name, &self.include, visitor);
            accept_all(Self::EXCLUDE.name, &self.exclude, visitor);
        });
    }
}

impl ModelNode for ValueSetCompose {
    fn descriptor(&self) -> &'static TypeDescriptor {
        &VALUE_SET_COMPOSE
    }

    fn node_ref(&self) -> NodeRef<'_> {
        NodeRef::ValueSetCompose(self)
    }

    fn has_content(&self) -> bool {
        self.backbone.has_content()
            || self.inactive.is_some()
            || !self.include.is_empty()
            || !self.exclude.is_empty()
    }

    fn data_type(&self) -> DataType {
        DataType::BackboneElement
    }

    fn id(&self) -> Option<&str> {
        self.backbone.id()
    }

    fn extension(&self) -> &[Arc<Extension>] {
        self.backbone.extension()
    }

    fn modifier_extension(&self) -> &[Arc<Extension>] {
        self.backbone.modifier_extension()
    }
}

/// Staged [`ValueSetCompose`].
#[derive(Debug, Clone, Default)]
pub struct ValueSetComposeBuilder {
    backbone: BackboneBaseBuilder,
    inactive: Option<FhirBoolean>,
    include: Vec<Arc<ValueSetInclude>>,
    exclude: Vec<Arc<ValueSetInclude>>,
}

impl ValueSetComposeBuilder {
    pub fn inactive(mut self, inactive: impl Into<FhirBoolean>) -> Self {
        self.inactive = Some(inactive.into());
        self
    }

    pub fn include(mut self, include: impl IntoIterator<Item = ValueSetInclude>) -> Self {
        self.include.extend(include.into_iter().map(Arc::new));
        self
    }

    pub fn set_include(mut self, include: impl IntoIterator<Item = ValueSetInclude>) -> Self {
        self.include = include.into_iter().map(Arc::new).collect();
        self
    }

    pub fn exclude(mut self, exclude: impl IntoIterator<Item = ValueSetInclude>) -> Self {
        self.exclude.extend(exclude.into_iter().map(Arc::new));
        self
    }

    pub fn set_exclude(mut self, exclude: impl IntoIterator<Item = ValueSetInclude>) -> Self {
        self.exclude = exclude.into_iter().map(Arc::new).collect();
        self
    }
}

impl ElementBuilder for ValueSetComposeBuilder {
    fn element_base(&mut self) -> &mut ElementBaseBuilder {
        &mut self.backbone.element
    }
}

impl BackboneElementBuilder for ValueSetComposeBuilder {
    fn backbone_base(&mut self) -> &mut BackboneBaseBuilder {
        &mut self.backbone
    }
}

impl Builder for ValueSetComposeBuilder {
    type Output = ValueSetCompose;

    fn freeze(self) -> ValueSetCompose {
        ValueSetCompose {
            backbone: self.backbone.freeze(),
            inactive: self.inactive,
            include: self.include.into(),
            exclude: self.exclude.into(),
            hash: HashCache::default(),
        }
    }
}

impl Buildable for ValueSetCompose {
    type Builder = ValueSetComposeBuilder;

    fn builder() -> ValueSetComposeBuilder {
        ValueSetCompose::builder()
    }

    fn to_builder(&self) -> ValueSetComposeBuilder {
        ValueSetCompose::to_builder(self)
    }
}

/// Codes from one system (or from other value sets) to include or exclude.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueSetInclude {
    pub(crate) backbone: BackboneBase,
    pub(crate) system: Option<Uri>,
    pub(crate) version: Option<FhirString>,
    pub(crate) concept: Arc<[Arc<ValueSetConcept>]>,
    pub(crate) filter: Arc<[Arc<ValueSetFilter>]>,
    pub(crate) value_set: Arc<[Arc<Canonical>]>,
    hash: HashCache,
}

memoized_hash!(ValueSetInclude {
    backbone,
    system,
    version,
    concept,
    filter,
    value_set
});

impl ValueSetInclude {
    pub const SYSTEM: FieldDescriptor =
        FieldDescriptor::optional("system", &[DataType::Uri]).summary();
    pub const VERSION: FieldDescriptor =
        FieldDescriptor::optional("version", &[DataType::String]).summary();
    pub const CONCEPT: FieldDescriptor =
        FieldDescriptor::repeated("concept", &[DataType::BackboneElement]);
    pub const FILTER: FieldDescriptor =
        FieldDescriptor::repeated("filter", &[DataType::BackboneElement]);
    pub const VALUE_SET: FieldDescriptor =
        FieldDescriptor::repeated("valueSet", &[DataType::Canonical]).summary();

    const FIELDS: &'static [FieldDescriptor] = &[
        Self::SYSTEM,
        Self::VERSION,
        Self::CONCEPT,
        Self::FILTER,
        Self::VALUE_SET,
    ];

    pub fn builder() -> ValueSetIncludeBuilder {
        ValueSetIncludeBuilder::default()
    }

    pub fn to_builder(&self) -> ValueSetIncludeBuilder {
        ValueSetIncludeBuilder {
            backbone: BackboneBaseBuilder::from_base(&self.backbone),
            system: self.system.clone(),
            version: self.version.clone(),
            concept: self.concept.to_vec(),
            filter: self.filter.to_vec(),
            value_set: self.value_set.to_vec(),
        }
    }

    pub fn system(&self) -> Option<&Uri> {
        self.system.as_ref()
    }

    pub fn version(&self) -> Option<&FhirString> {
        self.version.as_ref()
    }

    pub fn concept(&self) -> &[Arc<ValueSetConcept>] {
        &self.concept
    }

    pub fn filter(&self) -> &[Arc<ValueSetFilter>] {
        &self.filter
    }

    pub fn value_set(&self) -> &[Arc<Canonical>] {
        &self.value_set
    }
}

static VALUE_SET_INCLUDE: TypeDescriptor = TypeDescriptor {
    name: "ValueSet.compose.include",
    kind: NodeKind::BackboneElement,
    fields: ValueSetInclude::FIELDS,
    constraints: &[],
};

impl Validate for ValueSetInclude {
    fn validate(&self, ctx: &mut ValidationContext<'_>) -> Result<()> {
        self.backbone.validate(ctx)?;
        ctx.check_field(&Self::SYSTEM, &self.system)?;
        ctx.check_field(&Self::VERSION, &self.version)?;
        ctx.check_field(&Self::CONCEPT, &self.concept)?;
        ctx.check_field(&Self::FILTER, &self.filter)?;
        ctx.check_field(&Self::VALUE_SET, &self.value_set)?;
        ctx.require_value_or_children(self)
    }
}

impl Visitable for ValueSetInclude {
    fn accept<V: Visitor + ?Sized>(&self, name: &str, index: Option<usize>, visitor: &mut V) {
        walk(NodeRef::ValueSetInclude(self), name, index, visitor, |visitor| {
            self.backbone.accept_fields(visitor);
            accept_one(Self::SYSTEM.name, &self.system, visitor);
            accept_one(Self::VERSION.name, &self.version, visitor);
            accept_all(Self::CONCEPT.name, &self.concept, visitor);
            accept_all(Self::FILTER.name, &self.filter, visitor);
            accept_all(Self::VALUE_SET.name, &self.value_set, visitor);
        });
    }
}

impl ModelNode for ValueSetInclude {
    fn descriptor(&self) -> &'static TypeDescriptor {
        &VALUE_SET_INCLUDE
    }

    fn node_ref(&self) -> NodeRef<'_> {
        NodeRef::ValueSetInclude(self)
    }

    fn has_content(&self) -> bool {
        self.backbone.has_content()
            || self.system.is_some()
            || self.version.is_some()
            || !self.concept.is_empty()
            || !self.filter.is_empty()
            || !self.value_set.is_empty()
    }

    fn data_type(&self) -> DataType {
        DataType::BackboneElement
    }

    fn id(&self) -> Option<&str> {
        self.backbone.id()
    }

    fn extension(&self) -> &[Arc<Extension>] {
        self.backbone.extension()
    }

    fn modifier_extension(&self) -> &[Arc<Extension>] {
        self.backbone.modifier_extension()
    }
}

/// Staged [`ValueSetInclude`].
#[derive(Debug, Clone, Default)]
pub struct ValueSetIncludeBuilder {
    backbone: BackboneBaseBuilder,
    system: Option<Uri>,
    version: Option<FhirString>,
    concept: Vec<Arc<ValueSetConcept>>,
    filter: Vec<Arc<ValueSetFilter>>,
    value_set: Vec<Arc<Canonical>>,
}

impl ValueSetIncludeBuilder {
    pub fn system(mut self, system: impl Into<Uri>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn version(mut self, version: impl Into<FhirString>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn concept(mut self, concept: impl IntoIterator<Item = ValueSetConcept>) -> Self {
        self.concept.extend(concept.into_iter().map(Arc::new));
        self
    }

    pub fn set_concept(mut self, concept: impl IntoIterator<Item = ValueSetConcept>) -> Self {
        self.concept = concept.into_iter().map(Arc::new).collect();
        self
    }

    pub fn filter(mut self, filter: impl IntoIterator<Item = ValueSetFilter>) -> Self {
        self.filter.extend(filter.into_iter().map(Arc::new));
        self
    }

    pub fn set_filter(mut self, filter: impl IntoIterator<Item = ValueSetFilter>) -> Self {
        self.filter = filter.into_iter().map(Arc::new).collect();
        self
    }

    pub fn value_set<I>(mut self, value_set: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Canonical>,
    {
        self.value_set.extend(value_set.into_iter().map(|item| Arc::new(item.into())));
        self
    }

    pub fn set_value_set<I>(mut self, value_set: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Canonical>,
    {
        self.value_set = value_set.into_iter().map(|item| Arc::new(item.into())).collect();
        self
    }
}

impl ElementBuilder for ValueSetIncludeBuilder {
    fn element_base(&mut self) -> &mut ElementBaseBuilder {
        &mut self.backbone.element
    }
}

impl BackboneElementBuilder for ValueSetIncludeBuilder {
    fn backbone_base(&mut self) -> &mut BackboneBaseBuilder {
        &mut self.backbone
    }
}

impl Builder for ValueSetIncludeBuilder {
    type Output = ValueSetInclude;

    fn freeze(self) -> ValueSetInclude {
        ValueSetInclude {
            backbone: self.backbone.freeze(),
            system: self.system,
            version: self.version,
            concept: self.concept.into(),
            filter: self.filter.into(),
            value_set: self.value_set.into(),
            hash: HashCache::default(),
        }
    }
}

impl Buildable for ValueSetInclude {
    type Builder = ValueSetIncludeBuilder;

    fn builder() -> ValueSetIncludeBuilder {
        ValueSetInclude::builder()
    }

    fn to_builder(&self) -> ValueSetIncludeBuilder {
        ValueSetInclude::to_builder(self)
    }
}

/// A concept listed explicitly in an include or exclude.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueSetConcept {
    pub(crate) backbone: BackboneBase,
    pub(crate) code: Option<Code>,
    pub(crate) display: Option<FhirString>,
    hash: HashCache,
}

memoized_hash!(ValueSetConcept {
    backbone,
    code,
    display
});

impl ValueSetConcept {
    pub const CODE: FieldDescriptor = FieldDescriptor::required("code", &[DataType::Code]);
    pub const DISPLAY: FieldDescriptor =
        FieldDescriptor::optional("display", &[DataType::String]);

    const FIELDS: &'static [FieldDescriptor] = &[Self::CODE, Self::DISPLAY];

    pub fn builder() -> ValueSetConceptBuilder {
        ValueSetConceptBuilder::default()
    }

    pub fn to_builder(&self) -> ValueSetConceptBuilder {
        ValueSetConceptBuilder {
            backbone: BackboneBaseBuilder::from_base(&self.backbone),
            code: self.code.clone(),
            display: self.display.clone(),
        }
    }

    pub fn code(&self) -> Option<&Code> {
        self.code.as_ref()
    }

    pub fn display(&self) -> Option<&FhirString> {
        self.display.as_ref()
    }
}

static VALUE_SET_CONCEPT: TypeDescriptor = TypeDescriptor {
    name: "ValueSet.compose.include.concept",
    kind: NodeKind::BackboneElement,
    fields: ValueSetConcept::FIELDS,
    constraints: &[],
};

impl Validate for ValueSetConcept {
    fn validate(&self, ctx: &mut ValidationContext<'_>) -> Result<()> {
        self.backbone.validate(ctx)?;
        ctx.check_field(&Self::CODE, &self.code)?;
        ctx.check_field(&Self::DISPLAY, &self.display)?;
        ctx.require_value_or_children(self)
    }
}

impl Visitable for ValueSetConcept {
    fn accept<V: Visitor + ?Sized>(&self, name: &str, index: Option<usize>, visitor: &mut V) {
        walk(NodeRef::ValueSetConcept(self), name, index, visitor, |visitor| {
            self.backbone.accept_fields(visitor);
            accept_one(Self::CODE.name, &self.code, visitor);
            accept_one(Self::DISPLAY.name, &self.display, visitor);
        });
    }
}

impl ModelNode for ValueSetConcept {
    fn descriptor(&self) -> &'static TypeDescriptor {
        &VALUE_SET_CONCEPT
    }

    fn node_ref(&self) -> NodeRef<'_> {
        NodeRef::ValueSetConcept(self)
    }

    fn has_content(&self) -> bool {
        self.backbone.has_content() || self.code.is_some() || self.display.is_some()
    }

    fn data_type(&self) -> DataType {
        DataType::BackboneElement
    }

    fn id(&self) -> Option<&str> {
        self.backbone.id()
    }

    fn extension(&self) -> &[Arc<Extension>] {
        self.backbone.extension()
    }

    fn modifier_extension(&self) -> &[Arc<Extension>] {
        self.backbone.modifier_extension()
    }
}

/// Staged [`ValueSetConcept`].
#[derive(Debug, Clone, Default)]
pub struct ValueSetConceptBuilder {
    backbone: BackboneBaseBuilder,
    code: Option<Code>,
    display: Option<FhirString>,
}

impl ValueSetConceptBuilder {
    pub fn code(mut self, code: impl Into<Code>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn display(mut self, display: impl Into<FhirString>) -> Self {
        self.display = Some(display.into());
        self
    }
}

impl ElementBuilder for ValueSetConceptBuilder {
    fn element_base(&mut self) -> &mut ElementBaseBuilder {
        &mut self.backbone.element
    }
}

impl BackboneElementBuilder for ValueSetConceptBuilder {
    fn backbone_base(&mut self) -> &mut BackboneBaseBuilder {
        &mut self.backbone
    }
}

impl Builder for ValueSetConceptBuilder {
    type Output = ValueSetConcept;

    fn freeze(self) -> ValueSetConcept {
        ValueSetConcept {
            backbone: self.backbone.freeze(),
            code: self.code,
            display: self.display,
            hash: HashCache::default(),
        }
    }
}

impl Buildable for ValueSetConcept {
    type Builder = ValueSetConceptBuilder;

    fn builder() -> ValueSetConceptBuilder {
        ValueSetConcept::builder()
    }

    fn to_builder(&self) -> ValueSetConceptBuilder {
        ValueSetConcept::to_builder(self)
    }
}

/// Selects concepts by a property of the code system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueSetFilter {
    pub(crate) backbone: BackboneBase,
    pub(crate) property: Option<Code>,
    pub(crate) op: Option<Code>,
    pub(crate) value: Option<FhirString>,
    hash: HashCache,
}

memoized_hash!(ValueSetFilter {
    backbone,
    property,
    op,
    value
});

impl ValueSetFilter {
    pub const PROPERTY: FieldDescriptor =
        FieldDescriptor::required("property", &[DataType::Code]);
    pub const OP: FieldDescriptor = FieldDescriptor::required("op", &[DataType::Code]).bound(
        BindingDescriptor::required(
            "FilterOperator",
            "http://hl7.org/fhir/ValueSet/filter-operator|5.0.0",
        )
        .with_system("http://hl7.org/fhir/filter-operator"),
    );
    pub const VALUE: FieldDescriptor = FieldDescriptor::required("value", &[DataType::String]);

    const FIELDS: &'static [FieldDescriptor] = &[Self::PROPERTY, Self::OP, Self::VALUE];

    pub fn builder() -> ValueSetFilterBuilder {
        ValueSetFilterBuilder::default()
    }

    pub fn to_builder(&self) -> ValueSetFilterBuilder {
        ValueSetFilterBuilder {
            backbone: BackboneBaseBuilder::from_base(&self.backbone),
            property: self.property.clone(),
            op: self.op.clone(),
            value: self.value.clone(),
        }
    }

    pub fn property(&self) -> Option<&Code> {
        self.property.as_ref()
    }

    pub fn op(&self) -> Option<&Code> {
        self.op.as_ref()
    }

    pub fn value(&self) -> Option<&FhirString> {
        self.value.as_ref()
    }
}

static VALUE_SET_FILTER: TypeDescriptor = TypeDescriptor {
    name: "ValueSet.compose.include.filter",
    kind: NodeKind::BackboneElement,
    fields: ValueSetFilter::FIELDS,
    constraints: &[],
};

impl Validate for ValueSetFilter {
    fn validate(&self, ctx: &mut ValidationContext<'_>) -> Result<()> {
        self.backbone.validate(ctx)?;
        ctx.check_field(&Self::PROPERTY, &self.property)?;
        ctx.check_field(&Self::OP, &self.op)?;
        ctx.check_field(&Self::VALUE, &self.value)?;
        ctx.require_value_or_children(self)
    }
}

impl Visitable for ValueSetFilter {
    fn accept<V: Visitor + ?Sized>(&self, name: &str, index: Option<usize>, visitor: &mut V) {
        walk(NodeRef::ValueSetFilter(self), name, index, visitor, |visitor| {
            self.backbone.accept_fields(visitor);
            accept_one(Self::PROPERTY.name, &self.property, visitor);
            accept_one(Self::OP.name, &self.op, visitor);
            accept_one(Self::VALUE.name, &self.value, visitor);
        });
    }
}

impl ModelNode for ValueSetFilter {
    fn descriptor(&self) -> &'static TypeDescriptor {
        &VALUE_SET_FILTER
    }

    fn node_ref(&self) -> NodeRef<'_> {
        NodeRef::ValueSetFilter(self)
    }

    fn has_content(&self) -> bool {
        self.backbone.has_content()
            || self.property.is_some()
            || self.op.is_some()
            || self.value.is_some()
    }

    fn data_type(&self) -> DataType {
        DataType::BackboneElement
    }

    fn id(&self) -> Option<&str> {
        self.backbone.id()
    }

    fn extension(&self) -> &[Arc<Extension>] {
        self.backbone.extension()
    }

    fn modifier_extension(&self) -> &[Arc<Extension>] {
        self.backbone.modifier_extension()
    }
}

/// Staged [`ValueSetFilter`].
#[derive(Debug, Clone, Default)]
pub struct ValueSetFilterBuilder {
    backbone: BackboneBaseBuilder,
    property: Option<Code>,
    op: Option<Code>,
    value: Option<FhirString>,
}

impl ValueSetFilterBuilder {
    pub fn property(mut self, property: impl Into<Code>) -> Self {
        self.property = Some(property.into());
        self
    }

    pub fn op(mut self, op: impl Into<Code>) -> Self {
        self.op = Some(op.into());
        self
    }

    pub fn value(mut self, value: impl Into<FhirString>) -> Self {
        self.value = Some(value.into());
        self
    }
}

impl ElementBuilder for ValueSetFilterBuilder {
    fn element_base(&mut self) -> &mut ElementBaseBuilder {
        &mut self.backbone.element
    }
}

impl BackboneElementBuilder for ValueSetFilterBuilder {
    fn backbone_base(&mut self) -> &mut BackboneBaseBuilder {
        &mut self.backbone
    }
}

impl Builder for ValueSetFilterBuilder {
    type Output = ValueSetFilter;

    fn freeze(self) -> ValueSetFilter {
        ValueSetFilter {
            backbone: self.backbone.freeze(),
            property: self.property,
            op: self.op,
            value: self.value,
            hash: HashCache::default(),
        }
    }
}

impl Buildable for ValueSetFilter {
    type Builder = ValueSetFilterBuilder;

    fn builder() -> ValueSetFilterBuilder {
        ValueSetFilter::builder()
    }

    fn to_builder(&self) -> ValueSetFilterBuilder {
        ValueSetFilter::to_builder(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;

    #[test]
    fn test_compose_requires_an_include() {
        let err = ValueSetCompose::builder()
            .inactive(true)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ModelError::EmptyRequiredList {
                field: "include",
                path: "ValueSet.compose.include".to_string()
            }
        );
    }

    #[test]
    fn test_nested_error_path() {
        let include = ValueSetInclude::builder()
            .system("http://example.org/cs")
            .concept([ValueSetConcept::builder().display("no code").build_unvalidated()])
            .build_unvalidated();
        let err = ValueSet::builder()
            .status("active")
            .compose(
                ValueSetCompose::builder()
                    .include([include])
                    .build_unvalidated(),
            )
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ModelError::MissingRequiredField {
                field: "code",
                path: "ValueSet.compose.include[0].concept[0].code".to_string()
            }
        );
    }

    #[test]
    fn test_value_set_list_is_snapshotted() {
        let include = ValueSetInclude::builder()
            .value_set(["http://example.org/vs/a"])
            .build()
            .unwrap();
        let appended = include
            .to_builder()
            .value_set(["http://example.org/vs/b"])
            .build()
            .unwrap();
        assert_eq!(include.value_set().len(), 1);
        assert_eq!(appended.value_set().len(), 2);
    }
}

//! The `CodeSystem` resource and its backbone elements.

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
    Canonical, ChoiceValue, Code, CodeableConcept, Coding, Constraint, DataType, Extension,
    FhirBoolean, FhirDateTime, FhirString, Identifier, Markdown, ModelNode, UnsignedInt, Uri,
};
use crate::validation::{Validate, ValidationContext};
use crate::visitor::{NodeRef, Visitable, Visitor, accept_all, accept_one, walk};

const SOURCE: &str = "http://hl7.org/fhir/StructureDefinition/CodeSystem";

/// Declares the existence of a code system or supplement and its key
/// properties, and optionally defines part or all of its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSystem {
    pub(crate) resource: ResourceBase,
    pub(crate) url: Option<Uri>,
    pub(crate) identifier: Arc<[Arc<Identifier>]>,
    pub(crate) version: Option<FhirString>,
    pub(crate) version_algorithm: Option<ChoiceValue>,
    pub(crate) name: Option<FhirString>,
    pub(crate) title: Option<FhirString>,
    pub(crate) status: Option<Code>,
    pub(crate) experimental: Option<FhirBoolean>,
    pub(crate) date: Option<FhirDateTime>,
    pub(crate) publisher: Option<FhirString>,
    pub(crate) description: Option<Markdown>,
    pub(crate) jurisdiction: Arc<[Arc<CodeableConcept>]>,
    pub(crate) purpose: Option<Markdown>,
    pub(crate) copyright: Option<Markdown>,
    pub(crate) copyright_label: Option<FhirString>,
    pub(crate) case_sensitive: Option<FhirBoolean>,
    pub(crate) value_set: Option<Canonical>,
    pub(crate) hierarchy_meaning: Option<Code>,
    pub(crate) compositional: Option<FhirBoolean>,
    pub(crate) version_needed: Option<FhirBoolean>,
    pub(crate) content: Option<Code>,
    pub(crate) supplements: Option<Canonical>,
    pub(crate) count: Option<UnsignedInt>,
    pub(crate) filter: Arc<[Arc<CodeSystemFilter>]>,
    pub(crate) property: Arc<[Arc<CodeSystemProperty>]>,
    pub(crate) concept: Arc<[Arc<CodeSystemConcept>]>,
    hash: HashCache,
}

memoized_hash!(CodeSystem {
    resource,
    url,
    identifier,
    version,
    version_algorithm,
    name,
    title,
    status,
    experimental,
    date,
    publisher,
    description,
    jurisdiction,
    purpose,
    copyright,
    copyright_label,
    case_sensitive,
    value_set,
    hierarchy_meaning,
    compositional,
    version_needed,
    content,
    supplements,
    count,
    filter,
    property,
    concept
});

impl CodeSystem {
    pub const URL: FieldDescriptor = FieldDescriptor::optional("url", &[DataType::Uri]).summary();
    pub const IDENTIFIER: FieldDescriptor =
        FieldDescriptor::repeated("identifier", &[DataType::Identifier]).summary();
    pub const VERSION: FieldDescriptor =
        FieldDescriptor::optional("version", &[DataType::String]).summary();
    pub const VERSION_ALGORITHM: FieldDescriptor =
        FieldDescriptor::optional("versionAlgorithm", &[DataType::String, DataType::Coding])
            .summary()
            .bound(BindingDescriptor::extensible(
                "VersionAlgorithm",
                "http://hl7.org/fhir/ValueSet/version-algorithm",
            ));
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
    pub const JURISDICTION: FieldDescriptor =
        FieldDescriptor::repeated("jurisdiction", &[DataType::CodeableConcept])
            .summary()
            .bound(BindingDescriptor::extensible(
                "Jurisdiction",
                "http://hl7.org/fhir/ValueSet/jurisdiction",
            ));
    pub const PURPOSE: FieldDescriptor =
        FieldDescriptor::optional("purpose", &[DataType::Markdown]);
    pub const COPYRIGHT: FieldDescriptor =
        FieldDescriptor::optional("copyright", &[DataType::Markdown]);
    pub const COPYRIGHT_LABEL: FieldDescriptor =
        FieldDescriptor::optional("copyrightLabel", &[DataType::String]);
    pub const CASE_SENSITIVE: FieldDescriptor =
        FieldDescriptor::optional("caseSensitive", &[DataType::Boolean]).summary();
    pub const VALUE_SET: FieldDescriptor =
        FieldDescriptor::optional("valueSet", &[DataType::Canonical]).summary();
    pub const HIERARCHY_MEANING: FieldDescriptor =
        FieldDescriptor::optional("hierarchyMeaning", &[DataType::Code])
            .summary()
            .bound(
                BindingDescriptor::required(
                    "CodeSystemHierarchyMeaning",
                    "http://hl7.org/fhir/ValueSet/codesystem-hierarchy-meaning|5.0.0",
                )
                .with_system("http://hl7.org/fhir/codesystem-hierarchy-meaning"),
            );
    pub const COMPOSITIONAL: FieldDescriptor =
        FieldDescriptor::optional("compositional", &[DataType::Boolean]).summary();
    pub const VERSION_NEEDED: FieldDescriptor =
        FieldDescriptor::optional("versionNeeded", &[DataType::Boolean]).summary();
    pub const CONTENT: FieldDescriptor = FieldDescriptor::required("content", &[DataType::Code])
        .summary()
        .bound(
            BindingDescriptor::required(
                "CodeSystemContentMode",
                "http://hl7.org/fhir/ValueSet/codesystem-content-mode|5.0.0",
            )
            .with_system("http://hl7.org/fhir/codesystem-content-mode"),
        );
    pub const SUPPLEMENTS: FieldDescriptor =
        FieldDescriptor::optional("supplements", &[DataType::Canonical]).summary();
    pub const COUNT: FieldDescriptor =
        FieldDescriptor::optional("count", &[DataType::UnsignedInt]).summary();
    pub const FILTER: FieldDescriptor =
        FieldDescriptor::repeated("filter", &[DataType::BackboneElement]).summary();
    pub const PROPERTY: FieldDescriptor =
        FieldDescriptor::repeated("property", &[DataType::BackboneElement]).summary();
    pub const CONCEPT: FieldDescriptor =
        FieldDescriptor::repeated("concept", &[DataType::BackboneElement]);

    const FIELDS: &'static [FieldDescriptor] = &[
        Self::URL,
        Self::IDENTIFIER,
        Self::VERSION,
        Self::VERSION_ALGORITHM,
        Self::NAME,
        Self::TITLE,
        Self::STATUS,
        Self::EXPERIMENTAL,
        Self::DATE,
        Self::PUBLISHER,
        Self::DESCRIPTION,
        Self::JURISDICTION,
        Self::PURPOSE,
        Self::COPYRIGHT,
        Self::COPYRIGHT_LABEL,
        Self::CASE_SENSITIVE,
        Self::VALUE_SET,
        Self::HIERARCHY_MEANING,
        Self::COMPOSITIONAL,
        Self::VERSION_NEEDED,
        Self::CONTENT,
        Self::SUPPLEMENTS,
        Self::COUNT,
        Self::FILTER,
        Self::PROPERTY,
        Self::CONCEPT,
    ];

    pub fn builder() -> CodeSystemBuilder {
        CodeSystemBuilder::default()
    }

    pub fn to_builder(&self) -> CodeSystemBuilder {
        CodeSystemBuilder {
            resource: ResourceBaseBuilder::from_base(&self.resource),
            url: self.url.clone(),
            identifier: self.identifier.to_vec(),
            version: self.version.clone(),
            version_algorithm: self.version_algorithm.clone(),
            name: self.name.clone(),
            title: self.title.clone(),
            status: self.status.clone(),
            experimental: self.experimental.clone(),
            date: self.date.clone(),
            publisher: self.publisher.clone(),
            description: self.description.clone(),
            jurisdiction: self.jurisdiction.to_vec(),
            purpose: self.purpose.clone(),
            copyright: self.copyright.clone(),
            copyright_label: self.copyright_label.clone(),
            case_sensitive: self.case_sensitive.clone(),
            value_set: self.value_set.clone(),
            hierarchy_meaning: self.hierarchy_meaning.clone(),
            compositional: self.compositional.clone(),
            version_needed: self.version_needed.clone(),
            content: self.content.clone(),
            supplements: self.supplements.clone(),
            count: self.count.clone(),
            filter: self.filter.to_vec(),
            property: self.property.to_vec(),
            concept: self.concept.to_vec(),
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

    /// `string` or `Coding`
    pub fn version_algorithm(&self) -> Option<&ChoiceValue> {
        self.version_algorithm.as_ref()
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

    pub fn jurisdiction(&self) -> &[Arc<CodeableConcept>] {
        &self.jurisdiction
    }

    pub fn purpose(&self) -> Option<&Markdown> {
        self.purpose.as_ref()
    }

    pub fn copyright(&self) -> Option<&Markdown> {
        self.copyright.as_ref()
    }

    pub fn copyright_label(&self) -> Option<&FhirString> {
        self.copyright_label.as_ref()
    }

    pub fn case_sensitive(&self) -> Option<&FhirBoolean> {
        self.case_sensitive.as_ref()
    }

    pub fn value_set(&self) -> Option<&Canonical> {
        self.value_set.as_ref()
    }

    pub fn hierarchy_meaning(&self) -> Option<&Code> {
        self.hierarchy_meaning.as_ref()
    }

    pub fn compositional(&self) -> Option<&FhirBoolean> {
        self.compositional.as_ref()
    }

    pub fn version_needed(&self) -> Option<&FhirBoolean> {
        self.version_needed.as_ref()
    }

    pub fn content(&self) -> Option<&Code> {
        self.content.as_ref()
    }

    pub fn supplements(&self) -> Option<&Canonical> {
        self.supplements.as_ref()
    }

    pub fn count(&self) -> Option<&UnsignedInt> {
        self.count.as_ref()
    }

    pub fn filter(&self) -> &[Arc<CodeSystemFilter>] {
        &self.filter
    }

    pub fn property(&self) -> &[Arc<CodeSystemProperty>] {
        &self.property
    }

    pub fn concept(&self) -> &[Arc<CodeSystemConcept>] {
        &self.concept
    }
}

static CODE_SYSTEM: TypeDescriptor = TypeDescriptor {
    name: "CodeSystem",
    kind: NodeKind::Resource,
    fields: CodeSystem::FIELDS,
    constraints: &[
        Constraint::warning(
            "cnl-0",
            Constraint::BASE_LOCATION,
            "Name should be usable as an identifier for the module by machine processing applications such as code generation",
            "name.exists() implies name.matches('^[A-Z]([A-Za-z0-9_]){1,254}$')",
            SOURCE,
        ),
        Constraint::rule(
            "csd-1",
            Constraint::BASE_LOCATION,
            "Within a code system definition, all the codes SHALL be unique",
            "concept.exists() implies concept.code.combine(%resource.concept.descendants().concept.code).isDistinct()",
            SOURCE,
        ),
        Constraint::warning(
            "cnl-1",
            "CodeSystem.url",
            "URL should not contain | or # - these characters make processing canonical references problematic",
            "exists() implies matches('^[^|# ]+$')",
            SOURCE,
        ),
        Constraint::warning(
            "csd-2",
            Constraint::BASE_LOCATION,
            "If there is an explicit hierarchy, a hierarchyMeaning should be provided",
            "concept.concept.exists() implies hierarchyMeaning.exists()",
            SOURCE,
        ),
        Constraint::warning(
            "csd-3",
            Constraint::BASE_LOCATION,
            "If there is an implicit hierarchy, a hierarchyMeaning should be provided",
            "concept.where(property.code = 'parent' or property.code = 'child').exists() implies hierarchyMeaning.exists()",
            SOURCE,
        ),
        Constraint::rule(
            "csd-4",
            Constraint::BASE_LOCATION,
            "If the code system content = supplement, it must nominate what it's a supplement for",
            "CodeSystem.content = 'supplement' implies CodeSystem.supplements.exists()",
            SOURCE,
        ),
        Constraint::rule(
            "csd-5",
            "CodeSystem.concept.designation",
            "Must have a value for concept.designation.use if concept.designation.additionalUse is present",
            "additionalUse.exists() implies use.exists()",
            SOURCE,
        ),
    ],
};

impl Validate for CodeSystem {
    fn validate(&self, ctx: &mut ValidationContext<'_>) -> Result<()> {
        self.resource.validate(ctx)?;
        ctx.check_field(&Self::URL, &self.url)?;
        ctx.check_field(&Self::IDENTIFIER, &self.identifier)?;
        ctx.check_field(&Self::VERSION, &self.version)?;
        ctx.check_field(&Self::VERSION_ALGORITHM, &self.version_algorithm)?;
        ctx.check_field(&Self::NAME, &self.name)?;
        ctx.check_field(&Self::TITLE, &self.title)?;
        ctx.check_field(&Self::STATUS, &self.status)?;
        ctx.check_field(&Self::EXPERIMENTAL, &self.experimental)?;
        ctx.check_field(&Self::DATE, &self.date)?;
        ctx.check_field(&Self::PUBLISHER, &self.publisher)?;
        ctx.check_field(&Self::DESCRIPTION, &self.description)?;
        ctx.check_field(&Self::JURISDICTION, &self.jurisdiction)?;
        ctx.check_field(&Self::PURPOSE, &self.purpose)?;
        ctx.check_field(&Self::COPYRIGHT, &self.copyright)?;
        ctx.check_field(&Self::COPYRIGHT_LABEL, &self.copyright_label)?;
        ctx.check_field(&Self::CASE_SENSITIVE, &self.case_sensitive)?;
        ctx.check_field(&Self::VALUE_SET, &self.value_set)?;
        ctx.check_field(&Self::HIERARCHY_MEANING, &self.hierarchy_meaning)?;
        ctx.check_field(&Self::COMPOSITIONAL, &self.compositional)?;
        ctx.check_field(&Self::VERSION_NEEDED, &self.version_needed)?;
        ctx.check_field(&Self::CONTENT, &self.content)?;
        ctx.check_field(&Self::SUPPLEMENTS, &self.supplements)?;
        ctx.check_field(&Self::COUNT, &self.count)?;
        ctx.check_field(&Self::FILTER, &self.filter)?;
        ctx.check_field(&Self::PROPERTY, &self.property)?;
        ctx.check_field(&Self::CONCEPT, &self.concept)
    }
}

impl Visitable for CodeSystem {
    fn accept<V: Visitor + ?Sized>(&self, name: &str, index: Option<usize>, visitor: &mut V) {
        walk(NodeRef::CodeSystem(self), name, index, visitor, |visitor| {
            self.resource.accept_fields(visitor);
            accept_one(Self::URL.name, &self.url, visitor);
            accept_all(Self::IDENTIFIER.name, &self.identifier, visitor);
            accept_one(Self::VERSION.name, &self.version, visitor);
            accept_one(Self::VERSION_ALGORITHM.name, &self.version_algorithm, visitor);
            accept_one(Self::NAME.name, &self.name, visitor);
            accept_one(Self::TITLE.name, &self.title, visitor);
            accept_one(Self::STATUS.name, &self.status, visitor);
            accept_one(Self::EXPERIMENTAL.name, &self.experimental, visitor);
            accept_one(Self::DATE.name, &self.date, visitor);
            accept_one(Self::PUBLISHER.name, &self.publisher, visitor);
            accept_one(Self::DESCRIPTION.name, &self.description, visitor);
            accept_all(Self::JURISDICTION.name, &self.jurisdiction, visitor);
            accept_one(Self::PURPOSE.name, &self.purpose, visitor);
            accept_one(Self::COPYRIGHT.name, &self.copyright, visitor);
            accept_one(Self::COPYRIGHT_LABEL.name, &self.copyright_label, visitor);
            accept_one(Self::CASE_SENSITIVE.name, &self.case_sensitive, visitor);
            accept_one(Self::VALUE_SET.name, &self.value_set, visitor);
            accept_one(Self::HIERARCHY_MEANING.name, &self.hierarchy_meaning, visitor);
            accept_one(Self::COMPOSITIONAL.name, &self.compositional, visitor);
            accept_one(Self::VERSION_NEEDED.name, &self.version_needed, visitor);
            accept_one(Self::CONTENT.name, &self.content, visitor);
            accept_one(Self::SUPPLEMENTS.name, &self.supplements, visitor);
            accept_one(Self::COUNT.name, &self.count, visitor);
            accept_all(Self::FILTER.name, &self.filter, visitor);
            accept_all(Self::PROPERTY.name, &self.property, visitor);
            accept_all(Self::CONCEPT.name, &self.concept, visitor);
        });
    }
}

impl ModelNode for CodeSystem {
    fn descriptor(&self) -> &'static TypeDescriptor {
        &CODE_SYSTEM
    }

    fn node_ref(&self) -> NodeRef<'_> {
        NodeRef::CodeSystem(self)
    }

    fn has_content(&self) -> bool {
        self.resource.has_content()
            || self.url.is_some()
            || !self.identifier.is_empty()
            || self.version.is_some()
            || self.version_algorithm.is_some()
            || self.name.is_some()
            || self.title.is_some()
            || self.status.is_some()
            || self.experimental.is_some()
            || self.date.is_some()
            || self.publisher.is_some()
            || self.description.is_some()
            || !self.jurisdiction.is_empty()
            || self.purpose.is_some()
            || self.copyright.is_some()
            || self.copyright_label.is_some()
            || self.case_sensitive.is_some()
            || self.value_set.is_some()
            || self.hierarchy_meaning.is_some()
            || self.compositional.is_some()
            || self.version_needed.is_some()
            || self.content.is_some()
            || self.supplements.is_some()
            || self.count.is_some()
            || !self.filter.is_empty()
            || !self.property.is_empty()
            || !self.concept.is_empty()
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

/// Staged [`CodeSystem`].
#[derive(Debug, Clone, Default)]
pub struct CodeSystemBuilder {
    resource: ResourceBaseBuilder,
    url: Option<Uri>,
    identifier: Vec<Arc<Identifier>>,
    version: Option<FhirString>,
    version_algorithm: Option<ChoiceValue>,
    name: Option<FhirString>,
    title: Option<FhirString>,
    status: Option<Code>,
    experimental: Option<FhirBoolean>,
    date: Option<FhirDateTime>,
    publisher: Option<FhirString>,
    description: Option<Markdown>,
    jurisdiction: Vec<Arc<CodeableConcept>>,
    purpose: Option<Markdown>,
    copyright: Option<Markdown>,
    copyright_label: Option<FhirString>,
    case_sensitive: Option<FhirBoolean>,
    value_set: Option<Canonical>,
    hierarchy_meaning: Option<Code>,
    compositional: Option<FhirBoolean>,
    version_needed: Option<FhirBoolean>,
    content: Option<Code>,
    supplements: Option<Canonical>,
    count: Option<UnsignedInt>,
    filter: Vec<Arc<CodeSystemFilter>>,
    property: Vec<Arc<CodeSystemProperty>>,
    concept: Vec<Arc<CodeSystemConcept>>,
}

impl CodeSystemBuilder {
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

    /// Accepts `string` or `Coding`; anything else is rejected at build.
    pub fn version_algorithm(mut self, version_algorithm: impl Into<ChoiceValue>) -> Self {
        self.version_algorithm = Some(version_algorithm.into());
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

    pub fn jurisdiction(mut self, jurisdiction: impl IntoIterator<Item = CodeableConcept>) -> Self {
        self.jurisdiction.extend(jurisdiction.into_iter().map(Arc::new));
        self
    }

    pub fn set_jurisdiction(
        mut self,
        jurisdiction: impl IntoIterator<Item = CodeableConcept>,
    ) -> Self {
        self.jurisdiction = jurisdiction.into_iter().map(Arc::new).collect();
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

    pub fn copyright_label(mut self, copyright_label: impl Into<FhirString>) -> Self {
        self.copyright_label = Some(copyright_label.into());
        self
    }

    pub fn case_sensitive(mut self, case_sensitive: impl Into<FhirBoolean>) -> Self {
        self.case_sensitive = Some(case_sensitive.into());
        self
    }

    pub fn value_set(mut self, value_set: impl Into<Canonical>) -> Self {
        self.value_set = Some(value_set.into());
        self
    }

    pub fn hierarchy_meaning(mut self, hierarchy_meaning: impl Into<Code>) -> Self {
        self.hierarchy_meaning = Some(hierarchy_meaning.into());
        self
    }

    pub fn compositional(mut self, compositional: impl Into<FhirBoolean>) -> Self {
        self.compositional = Some(compositional.into());
        self
    }

    pub fn version_needed(mut self, version_needed: impl Into<FhirBoolean>) -> Self {
        self.version_needed = Some(version_needed.into());
        self
    }

    pub fn content(mut self, content: impl Into<Code>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn supplements(mut self, supplements: impl Into<Canonical>) -> Self {
        self.supplements = Some(supplements.into());
        self
    }

    pub fn count(mut self, count: impl Into<UnsignedInt>) -> Self {
        self.count = Some(count.into());
        self
    }

    pub fn filter(mut self, filter: impl IntoIterator<Item = CodeSystemFilter>) -> Self {
        self.filter.extend(filter.into_iter().map(Arc::new));
        self
    }

    pub fn set_filter(mut self, filter: impl IntoIterator<Item = CodeSystemFilter>) -> Self {
        self.filter = filter.into_iter().map(Arc::new).collect();
        self
    }

    pub fn property(mut self, property: impl IntoIterator<Item = CodeSystemProperty>) -> Self {
        self.property.extend(property.into_iter().map(Arc::new));
        self
    }

    pub fn set_property(
        mut self,
        property: impl IntoIterator<Item = CodeSystemProperty>,
    ) -> Self {
        self.property = property.into_iter().map(Arc::new).collect();
        self
    }

    pub fn concept(mut self, concept: impl IntoIterator<Item = CodeSystemConcept>) -> Self {
        self.concept.extend(concept.into_iter().map(Arc::new));
        self
    }

    pub fn set_concept(mut self, concept: impl IntoIterator<Item = CodeSystemConcept>) -> Self {
        self.concept = concept.into_iter().map(Arc::new).collect();
        self
    }
}

impl ResourceBuilder for CodeSystemBuilder {
    fn resource_base(&mut self) -> &mut ResourceBaseBuilder {
        &mut self.resource
    }
}

impl Builder for CodeSystemBuilder {
    type Output = CodeSystem;

    fn freeze(self) -> CodeSystem {
        CodeSystem {
            resource: self.resource.freeze(),
            url: self.url,
            identifier: self.identifier.into(),
            version: self.version,
            version_algorithm: self.version_algorithm,
            name: self.name,
            title: self.title,
            status: self.status,
            experimental: self.experimental,
            date: self.date,
            publisher: self.publisher,
            description: self.description,
            jurisdiction: self.jurisdiction.into(),
            purpose: self.purpose,
            copyright: self.copyright,
            copyright_label: self.copyright_label,
            case_sensitive: self.case_sensitive,
            value_set: self.value_set,
            hierarchy_meaning: self.hierarchy_meaning,
            compositional: self.compositional,
            version_needed: self.version_needed,
            content: self.content,
            supplements: self.supplements,
            count: self.count,
            filter: self.filter.into(),
            property: self.property.into(),
            concept: self.concept.into(),
            hash: HashCache::default(),
        }
    }
}

impl Buildable for CodeSystem {
    type Builder = CodeSystemBuilder;

    fn builder() -> CodeSystemBuilder {
        CodeSystem::builder()
    }

    fn to_builder(&self) -> CodeSystemBuilder {
        CodeSystem::to_builder(self)
    }
}

/// A filter that can be used in a value set compose statement when
/// selecting concepts using a filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSystemFilter {
    pub(crate) backbone: BackboneBase,
    pub(crate) code: Option<Code>,
    pub(crate) description: Option<FhirString>,
    pub(crate) operator: Arc<[Arc<Code>]>,
    pub(crate) value: Option<FhirString>,
    hash: HashCache,
}

memoized_hash!(CodeSystemFilter {
    backbone,
    code,
    description,
    operator,
    value
});

impl CodeSystemFilter {
    pub const CODE: FieldDescriptor =
        FieldDescriptor::required("code", &[DataType::Code]).summary();
    pub const DESCRIPTION: FieldDescriptor =
        FieldDescriptor::optional("description", &[DataType::String]).summary();
    pub const OPERATOR: FieldDescriptor =
        FieldDescriptor::required_non_empty("operator", &[DataType::Code])
            .summary()
            .bound(
                BindingDescriptor::required(
                    "FilterOperator",
                    "http://hl7.org/fhir/ValueSet/filter-operator|5.0.0",
                )
                .with_system("http://hl7.org/fhir/filter-operator"),
            );
    pub const VALUE: FieldDescriptor =
        FieldDescriptor::required("value", &[DataType::String]).summary();

    const FIELDS: &'static [FieldDescriptor] =
        &[Self::CODE, Self::DESCRIPTION, Self::OPERATOR, Self::VALUE];

    pub fn builder() -> CodeSystemFilterBuilder {
        CodeSystemFilterBuilder::default()
    }

    pub fn to_builder(&self) -> CodeSystemFilterBuilder {
        CodeSystemFilterBuilder {
            backbone: BackboneBaseBuilder::from_base(&self.backbone),
            code: self.code.clone(),
            description: self.description.clone(),
            operator: self.operator.to_vec(),
            value: self.value.clone(),
        }
    }

    pub fn code(&self) -> Option<&Code> {
        self.code.as_ref()
    }

    pub fn description(&self) -> Option<&FhirString> {
        self.description.as_ref()
    }

    pub fn operator(&self) -> &[Arc<Code>] {
        &self.operator
    }

    pub fn value(&self) -> Option<&FhirString> {
        self.value.as_ref()
    }
}

static CODE_SYSTEM_FILTER: TypeDescriptor = TypeDescriptor {
    name: "CodeSystem.filter",
    kind: NodeKind::BackboneElement,
    fields: CodeSystemFilter::FIELDS,
    constraints: &[],
};

impl Validate for CodeSystemFilter {
    fn validate(&self, ctx: &mut ValidationContext<'_>) -> Result<()> {
        self.backbone.validate(ctx)?;
        ctx.check_field(&Self::CODE, &self.code)?;
        ctx.check_field(&Self::DESCRIPTION, &self.description)?;
        ctx.check_field(&Self::OPERATOR, &self.operator)?;
        ctx.check_field(&Self::VALUE, &self.value)?;
        ctx.require_value_or_children(self)
    }
}

impl Visitable for CodeSystemFilter {
    fn accept<V: Visitor + ?Sized>(&self, name: &str, index: Option<usize>, visitor: &mut V) {
        walk(NodeRef::CodeSystemFilter(self), name, index, visitor, |visitor| {
            self.backbone.accept_fields(visitor);
            accept_one(Self::CODE.name, &self.code, visitor);
            accept_one(Self::DESCRIPTION.name, &self.description, visitor);
            accept_all(Self::OPERATOR.name, &self.operator, visitor);
            accept_one(Self::VALUE.name, &self.value, visitor);
        });
    }
}

impl ModelNode for CodeSystemFilter {
    fn descriptor(&self) -> &'static TypeDescriptor {
        &CODE_SYSTEM_FILTER
    }

    fn node_ref(&self) -> NodeRef<'_> {
        NodeRef::CodeSystemFilter(self)
    }

    fn has_content(&self) -> bool {
        self.backbone.has_content()
            || self.code.is_some()
            || self.description.is_some()
            || !self.operator.is_empty()
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

/// Staged [`CodeSystemFilter`].
#[derive(Debug, Clone, Default)]
pub struct CodeSystemFilterBuilder {
    backbone: BackboneBaseBuilder,
    code: Option<Code>,
    description: Option<FhirString>,
    operator: Vec<Arc<Code>>,
    value: Option<FhirString>,
}

impl CodeSystemFilterBuilder {
    pub fn code(mut self, code: impl Into<Code>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn description(mut self, description: impl Into<FhirString>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn operator<I>(mut self, operator: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Code>,
    {
        self.operator.extend(operator.into_iter().map(|item| Arc::new(item.into())));
        self
    }

    pub fn set_operator<I>(mut self, operator: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Code>,
    {
        self.operator = operator.into_iter().map(|item| Arc::new(item.into())).collect();
        self
    }

    pub fn value(mut self, value: impl Into<FhirString>) -> Self {
        self.value = Some(value.into());
        self
    }
}

impl ElementBuilder for CodeSystemFilterBuilder {
    fn element_base(&mut self) -> &mut ElementBaseBuilder {
        &mut self.backbone.element
    }
}

impl BackboneElementBuilder for CodeSystemFilterBuilder {
    fn backbone_base(&mut self) -> &mut BackboneBaseBuilder {
        &mut self.backbone
    }
}

impl Builder for CodeSystemFilterBuilder {
    type Output = CodeSystemFilter;

    fn freeze(self) -> CodeSystemFilter {
        CodeSystemFilter {
            backbone: self.backbone.freeze(),
            code: self.code,
            description: self.description,
            operator: self.operator.into(),
            value: self.value,
            hash: HashCache::default(),
        }
    }
}

impl Buildable for CodeSystemFilter {
    type Builder = CodeSystemFilterBuilder;

    fn builder() -> CodeSystemFilterBuilder {
        CodeSystemFilter::builder()
    }

    fn to_builder(&self) -> CodeSystemFilterBuilder {
        CodeSystemFilter::to_builder(self)
    }
}

/// A property defined by the code system, with its meaning and type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSystemProperty {
    pub(crate) backbone: BackboneBase,
    pub(crate) code: Option<Code>,
    pub(crate) uri: Option<Uri>,
    pub(crate) description: Option<FhirString>,
    pub(crate) type_: Option<Code>,
    hash: HashCache,
}

memoized_hash!(CodeSystemProperty {
    backbone,
    code,
    uri,
    description,
    type_
});

impl CodeSystemProperty {
    pub const CODE: FieldDescriptor =
        FieldDescriptor::required("code", &[DataType::Code]).summary();
    pub const URI: FieldDescriptor = FieldDescriptor::optional("uri", &[DataType::Uri]).summary();
    pub const DESCRIPTION: FieldDescriptor =
        FieldDescriptor::optional("description", &[DataType::String]).summary();
    pub const TYPE: FieldDescriptor = FieldDescriptor::required("type", &[DataType::Code])
        .summary()
        .bound(
            BindingDescriptor::required(
                "PropertyType",
                "http://hl7.org/fhir/ValueSet/concept-property-type|5.0.0",
            )
            .with_system("http://hl7.org/fhir/concept-property-type"),
        );

    const FIELDS: &'static [FieldDescriptor] =
        &[Self::CODE, Self::URI, Self::DESCRIPTION, Self::TYPE];

    pub fn builder() -> CodeSystemPropertyBuilder {
        CodeSystemPropertyBuilder::default()
    }

    pub fn to_builder(&self) -> CodeSystemPropertyBuilder {
        CodeSystemPropertyBuilder {
            backbone: BackboneBaseBuilder::from_base(&self.backbone),
            code: self.code.clone(),
            uri: self.uri.clone(),
            description: self.description.clone(),
            type_: self.type_.clone(),
        }
    }

    pub fn code(&self) -> Option<&Code> {
        self.code.as_ref()
    }

    pub fn uri(&self) -> Option<&Uri> {
        self.uri.as_ref()
    }

    pub fn description(&self) -> Option<&FhirString> {
        self.description.as_ref()
    }

    pub fn type_(&self) -> Option<&Code> {
        self.type_.as_ref()
    }
}

static CODE_SYSTEM_PROPERTY: TypeDescriptor = TypeDescriptor {
    name: "CodeSystem.property",
    kind: NodeKind::BackboneElement,
    fields: CodeSystemProperty::FIELDS,
    constraints: &[],
};

impl Validate for CodeSystemProperty {
    fn validate(&self, ctx: &mut ValidationContext<'_>) -> Result<()> {
        self.backbone.validate(ctx)?;
        ctx.check_field(&Self::CODE, &self.code)?;
        ctx.check_field(&Self::URI, &self.uri)?;
        ctx.check_field(&Self::DESCRIPTION, &self.description)?;
        ctx.check_field(&Self::TYPE, &self.type_)?;
        ctx.require_value_or_children(self)
    }
}

impl Visitable for CodeSystemProperty {
    fn accept<V: Visitor + ?Sized>(&self, name: &str, index: Option<usize>, visitor: &mut V) {
        walk(NodeRef::CodeSystemProperty(self), name, index, visitor, |visitor| {
            self.backbone.accept_fields(visitor);
            accept_one(Self::CODE.name, &self.code, visitor);
            accept_one(Self::URI.name, &self.uri, visitor);
            accept_one(Self::DESCRIPTION.name, &self.description, visitor);
            accept_one(Self::TYPE.name, &self.type_, visitor);
        });
    }
}

impl ModelNode for CodeSystemProperty {
    fn descriptor(&self) -> &'static TypeDescriptor {
        &CODE_SYSTEM_PROPERTY
    }

    fn node_ref(&self) -> NodeRef<'_> {
        NodeRef::CodeSystemProperty(self)
    }

    fn has_content(&self) -> bool {
        self.backbone.has_content()
            || self.code.is_some()
            || self.uri.is_some()
            || self.description.is_some()
            || self.type_.is_some()
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

/// Staged [`CodeSystemProperty`].
#[derive(Debug, Clone, Default)]
pub struct CodeSystemPropertyBuilder {
    backbone: BackboneBaseBuilder,
    code: Option<Code>,
    uri: Option<Uri>,
    description: Option<FhirString>,
    type_: Option<Code>,
}

impl CodeSystemPropertyBuilder {
    pub fn code(mut self, code: impl Into<Code>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn uri(mut self, uri: impl Into<Uri>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn description(mut self, description: impl Into<FhirString>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn type_(mut self, type_: impl Into<Code>) -> Self {
        self.type_ = Some(type_.into());
        self
    }
}

impl ElementBuilder for CodeSystemPropertyBuilder {
    fn element_base(&mut self) -> &mut ElementBaseBuilder {
        &mut self.backbone.element
    }
}

impl BackboneElementBuilder for CodeSystemPropertyBuilder {
    fn backbone_base(&mut self) -> &mut BackboneBaseBuilder {
        &mut self.backbone
    }
}

impl Builder for CodeSystemPropertyBuilder {
    type Output = CodeSystemProperty;

    fn freeze(self) -> CodeSystemProperty {
        CodeSystemProperty {
            backbone: self.backbone.freeze(),
            code: self.code,
            uri: self.uri,
            description: self.description,
            type_: self.type_,
            hash: HashCache::default(),
        }
    }
}

impl Buildable for CodeSystemProperty {
    type Builder = CodeSystemPropertyBuilder;

    fn builder() -> CodeSystemPropertyBuilder {
        CodeSystemProperty::builder()
    }

    fn to_builder(&self) -> CodeSystemPropertyBuilder {
        CodeSystemProperty::to_builder(self)
    }
}

/// A concept defined by the code system. Concepts nest to form a
/// hierarchy whose meaning is given by `hierarchyMeaning`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSystemConcept {
    pub(crate) backbone: BackboneBase,
    pub(crate) code: Option<Code>,
    pub(crate) display: Option<FhirString>,
    pub(crate) definition: Option<FhirString>,
    pub(crate) designation: Arc<[Arc<ConceptDesignation>]>,
    pub(crate) property: Arc<[Arc<ConceptProperty>]>,
    pub(crate) concept: Arc<[Arc<CodeSystemConcept>]>,
    hash: HashCache,
}

memoized_hash!(CodeSystemConcept {
    backbone,
    code,
    display,
    definition,
    designation,
    property,
    concept
});

impl CodeSystemConcept {
    pub const CODE: FieldDescriptor = FieldDescriptor::required("code", &[DataType::Code]);
    pub const DISPLAY: FieldDescriptor =
        FieldDescriptor::optional("display", &[DataType::String]);
    pub const DEFINITION: FieldDescriptor =
        FieldDescriptor::optional("definition", &[DataType::String]);
    pub const DESIGNATION: FieldDescriptor =
        FieldDescriptor::repeated("designation", &[DataType::BackboneElement]);
    pub const PROPERTY: FieldDescriptor =
        FieldDescriptor::repeated("property", &[DataType::BackboneElement]);
    pub const CONCEPT: FieldDescriptor =
        FieldDescriptor::repeated("concept", &[DataType::BackboneElement]);

    const FIELDS: &'static [FieldDescriptor] = &[
        Self::CODE,
        Self::DISPLAY,
        Self::DEFINITION,
        Self::DESIGNATION,
        Self::PROPERTY,
        Self::CONCEPT,
    ];

    pub fn builder() -> CodeSystemConceptBuilder {
        CodeSystemConceptBuilder::default()
    }

    pub fn to_builder(&self) -> CodeSystemConceptBuilder {
        CodeSystemConceptBuilder {
            backbone: BackboneBaseBuilder::from_base(&self.backbone),
            code: self.code.clone(),
            display: self.display.clone(),
            definition: self.definition.clone(),
            designation: self.designation.to_vec(),
            property: self.property.to_vec(),
            concept: self.concept.to_vec(),
        }
    }

    pub fn code(&self) -> Option<&Code> {
        self.code.as_ref()
    }

    pub fn display(&self) -> Option<&FhirString> {
        self.display.as_ref()
    }

    pub fn definition(&self) -> Option<&FhirString> {
        self.definition.as_ref()
    }

    pub fn designation(&self) -> &[Arc<ConceptDesignation>] {
        &self.designation
    }

    pub fn property(&self) -> &[Arc<ConceptProperty>] {
        &self.property
    }

    /// Child concepts
    pub fn concept(&self) -> &[Arc<CodeSystemConcept>] {
        &self.concept
    }
}

static CODE_SYSTEM_CONCEPT: TypeDescriptor = TypeDescriptor {
    name: "CodeSystem.concept",
    kind: NodeKind::BackboneElement,
    fields: CodeSystemConcept::FIELDS,
    constraints: &[],
};

impl Validate for CodeSystemConcept {
    fn validate(&self, ctx: &mut ValidationContext<'_>) -> Result<()> {
        self.backbone.validate(ctx)?;
        ctx.check_field(&Self::CODE, &self.code)?;
        ctx.check_field(&Self::DISPLAY, &self.display)?;
        ctx.check_field(&Self::DEFINITION, &self.definition)?;
        ctx.check_field(&Self::DESIGNATION, &self.designation)?;
        ctx.check_field(&Self::PROPERTY, &self.property)?;
        ctx.check_field(&Self::CONCEPT, &self.concept)?;
        ctx.require_value_or_children(self)
    }
}

impl Visitable for CodeSystemConcept {
    fn accept<V: Visitor + ?Sized>(&self, name: &str, index: Option<usize>, visitor: &mut V) {
        walk(NodeRef::CodeSystemConcept(self), name, index, visitor, |visitor| {
            self.backbone.accept_fields(visitor);
            accept_one(Self::CODE.name, &self.code, visitor);
            accept_one(Self::DISPLAY.name, &self.display, visitor);
            accept_one(Self::DEFINITION.name, &self.definition, visitor);
            accept_all(Self::DESIGNATION.name, &self.designation, visitor);
            accept_all(Self::PROPERTY.name, &self.property, visitor);
            accept_all(Self::CONCEPT.name, &self.concept, visitor);
        });
    }
}

impl ModelNode for CodeSystemConcept {
    fn descriptor(&self) -> &'static TypeDescriptor {
        &CODE_SYSTEM_CONCEPT
    }

    fn node_ref(&self) -> NodeRef<'_> {
        NodeRef::CodeSystemConcept(self)
    }

    fn has_content(&self) -> bool {
        self.backbone.has_content()
            || self.code.is_some()
            || self.display.is_some()
            || self.definition.is_some()
            || !self.designation.is_empty()
            || !self.property.is_empty()
            || !self.concept.is_empty()
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

/// Staged [`CodeSystemConcept`].
#[derive(Debug, Clone, Default)]
pub struct CodeSystemConceptBuilder {
    backbone: BackboneBaseBuilder,
    code: Option<Code>,
    display: Option<FhirString>,
    definition: Option<FhirString>,
    designation: Vec<Arc<ConceptDesignation>>,
    property: Vec<Arc<ConceptProperty>>,
    concept: Vec<Arc<CodeSystemConcept>>,
}

impl CodeSystemConceptBuilder {
    pub fn code(mut self, code: impl Into<Code>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn display(mut self, display: impl Into<FhirString>) -> Self {
        self.display = Some(display.into());
        self
    }

    pub fn definition(mut self, definition: impl Into<FhirString>) -> Self {
        self.definition = Some(definition.into());
        self
    }

    pub fn designation(
        mut self,
        designation: impl IntoIterator<Item = ConceptDesignation>,
    ) -> Self {
        self.designation.extend(designation.into_iter().map(Arc::new));
        self
    }

    pub fn set_designation(
        mut self,
        designation: impl IntoIterator<Item = ConceptDesignation>,
    ) -> Self {
        self.designation = designation.into_iter().map(Arc::new).collect();
        self
    }

    pub fn property(mut self, property: impl IntoIterator<Item = ConceptProperty>) -> Self {
        self.property.extend(property.into_iter().map(Arc::new));
        self
    }

    pub fn set_property(mut self, property: impl IntoIterator<Item = ConceptProperty>) -> Self {
        self.property = property.into_iter().map(Arc::new).collect();
        self
    }

    pub fn concept(mut self, concept: impl IntoIterator<Item = CodeSystemConcept>) -> Self {
        self.concept.extend(concept.into_iter().map(Arc::new));
        self
    }

    pub fn set_concept(mut self, concept: impl IntoIterator<Item = CodeSystemConcept>) -> Self {
        self.concept = concept.into_iter().map(Arc::new).collect();
        self
    }
}

impl ElementBuilder for CodeSystemConceptBuilder {
    fn element_base(&mut self) -> &mut ElementBaseBuilder {
        &mut self.backbone.element
    }
}

impl BackboneElementBuilder for CodeSystemConceptBuilder {
    fn backbone_base(&mut self) -> &mut BackboneBaseBuilder {
        &mut self.backbone
    }
}

impl Builder for CodeSystemConceptBuilder {
    type Output = CodeSystemConcept;

    fn freeze(self) -> CodeSystemConcept {
        CodeSystemConcept {
            backbone: self.backbone.freeze(),
            code: self.code,
            display: self.display,
            definition: self.definition,
            designation: self.designation.into(),
            property: self.property.into(),
            concept: self.concept.into(),
            hash: HashCache::default(),
        }
    }
}

impl Buildable for CodeSystemConcept {
    type Builder = CodeSystemConceptBuilder;

    fn builder() -> CodeSystemConceptBuilder {
        CodeSystemConcept::builder()
    }

    fn to_builder(&self) -> CodeSystemConceptBuilder {
        CodeSystemConcept::to_builder(self)
    }
}

/// An additional representation of a concept: another language, an
/// alternative label, and so on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConceptDesignation {
    pub(crate) backbone: BackboneBase,
    pub(crate) language: Option<Code>,
    pub(crate) use_: Option<Coding>,
    pub(crate) additional_use: Arc<[Arc<Coding>]>,
    pub(crate) value: Option<FhirString>,
    hash: HashCache,
}

memoized_hash!(ConceptDesignation {
    backbone,
    language,
    use_,
    additional_use,
    value
});

impl ConceptDesignation {
    pub const LANGUAGE: FieldDescriptor = FieldDescriptor::optional("language", &[DataType::Code])
        .bound(
            BindingDescriptor::required(
                "Language",
                "http://hl7.org/fhir/ValueSet/all-languages|5.0.0",
            )
            .with_system("urn:ietf:bcp:47"),
        );
    pub const USE: FieldDescriptor = FieldDescriptor::optional("use", &[DataType::Coding]).bound(
        BindingDescriptor::extensible(
            "ConceptDesignationUse",
            "http://hl7.org/fhir/ValueSet/designation-use",
        ),
    );
    pub const ADDITIONAL_USE: FieldDescriptor =
        FieldDescriptor::repeated("additionalUse", &[DataType::Coding]).bound(
            BindingDescriptor::extensible(
                "ConceptDesignationUse",
                "http://hl7.org/fhir/ValueSet/designation-use",
            ),
        );
    pub const VALUE: FieldDescriptor = FieldDescriptor::required("value", &[DataType::String]);

    const FIELDS: &'static [FieldDescriptor] =
        &[Self::LANGUAGE, Self::USE, Self::ADDITIONAL_USE, Self::VALUE];

    pub fn builder() -> ConceptDesignationBuilder {
        ConceptDesignationBuilder::default()
    }

    pub fn to_builder(&self) -> ConceptDesignationBuilder {
        ConceptDesignationBuilder {
            backbone: BackboneBaseBuilder::from_base(&self.backbone),
            language: self.language.clone(),
            use_: self.use_.clone(),
            additional_use: self.additional_use.to_vec(),
            value: self.value.clone(),
        }
    }

    pub fn language(&self) -> Option<&Code> {
        self.language.as_ref()
    }

    pub fn use_(&self) -> Option<&Coding> {
        self.use_.as_ref()
    }

    pub fn additional_use(&self) -> &[Arc<Coding>] {
        &self.additional_use
    }

    pub fn value(&self) -> Option<&FhirString> {
        self.value.as_ref()
    }
}

static CONCEPT_DESIGNATION: TypeDescriptor = TypeDescriptor {
    name: "CodeSystem.concept.designation",
    kind: NodeKind::BackboneElement,
    fields: ConceptDesignation::FIELDS,
    constraints: &[],
};

impl Validate for ConceptDesignation {
    fn validate(&self, ctx: &mut ValidationContext<'_>) -> Result<()> {
        self.backbone.validate(ctx)?;
        ctx.check_field(&Self::LANGUAGE, &self.language)?;
        ctx.check_field(&Self::USE, &self.use_)?;
        ctx.check_field(&Self::ADDITIONAL_USE, &self.additional_use)?;
        ctx.check_field(&Self::VALUE, &self.value)?;
        ctx.require_value_or_children(self)
    }
}

impl Visitable for ConceptDesignation {
    fn accept<V: Visitor + ?Sized>(&self, name: &str, index: Option<usize>, visitor: &mut V) {
        walk(NodeRef::ConceptDesignation(self), name, index, visitor, |visitor| {
            self.backbone.accept_fields(visitor);
            accept_one(Self::LANGUAGE.name, &self.language, visitor);
            accept_one(Self::USE.name, &self.use_, visitor);
            accept_all(Self::ADDITIONAL_USE.name, &self.additional_use, visitor);
            accept_one(Self::VALUE.name, &self.value, visitor);
        });
    }
}

impl ModelNode for ConceptDesignation {
    fn descriptor(&self) -> &'static TypeDescriptor {
        &CONCEPT_DESIGNATION
    }

    fn node_ref(&self) -> NodeRef<'_> {
        NodeRef::ConceptDesignation(self)
    }

    fn has_content(&self) -> bool {
        self.backbone.has_content()
            || self.language.is_some()
            || self.use_.is_some()
            || !self.additional_use.is_empty()
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

/// Staged [`ConceptDesignation`].
#[derive(Debug, Clone, Default)]
pub struct ConceptDesignationBuilder {
    backbone: BackboneBaseBuilder,
    language: Option<Code>,
    use_: Option<Coding>,
    additional_use: Vec<Arc<Coding>>,
    value: Option<FhirString>,
}

impl ConceptDesignationBuilder {
    pub fn language(mut self, language: impl Into<Code>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn use_(mut self, use_: Coding) -> Self {
        self.use_ = Some(use_);
        self
    }

    pub fn additional_use(mut self, additional_use: impl IntoIterator<Item = Coding>) -> Self {
        self.additional_use.extend(additional_use.into_iter().map(Arc::new));
        self
    }

    pub fn set_additional_use(
        mut self,
        additional_use: impl IntoIterator<Item = Coding>,
    ) -> Self {
        self.additional_use = additional_use.into_iter().map(Arc::new).collect();
        self
    }

    pub fn value(mut self, value: impl Into<FhirString>) -> Self {
        self.value = Some(value.into());
        self
    }
}

impl ElementBuilder for ConceptDesignationBuilder {
    fn element_base(&mut self) -> &mut ElementBaseBuilder {
        &mut self.backbone.element
    }
}

impl BackboneElementBuilder for ConceptDesignationBuilder {
    fn backbone_base(&mut self) -> &mut BackboneBaseBuilder {
        &mut self.backbone
    }
}

impl Builder for ConceptDesignationBuilder {
    type Output = ConceptDesignation;

    fn freeze(self) -> ConceptDesignation {
        ConceptDesignation {
            backbone: self.backbone.freeze(),
            language: self.language,
            use_: self.use_,
            additional_use: self.additional_use.into(),
            value: self.value,
            hash: HashCache::default(),
        }
    }
}

impl Buildable for ConceptDesignation {
    type Builder = ConceptDesignationBuilder;

    fn builder() -> ConceptDesignationBuilder {
        ConceptDesignation::builder()
    }

    fn to_builder(&self) -> ConceptDesignationBuilder {
        ConceptDesignation::to_builder(self)
    }
}

/// A value for a property declared on the code system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConceptProperty {
    pub(crate) backbone: BackboneBase,
    pub(crate) code: Option<Code>,
    pub(crate) value: Option<ChoiceValue>,
    hash: HashCache,
}

memoized_hash!(ConceptProperty {
    backbone,
    code,
    value
});

impl ConceptProperty {
    pub const CODE: FieldDescriptor = FieldDescriptor::required("code", &[DataType::Code]);
    pub const VALUE: FieldDescriptor = FieldDescriptor::required(
        "value",
        &[
            DataType::Code,
            DataType::Coding,
            DataType::String,
            DataType::Integer,
            DataType::Boolean,
            DataType::DateTime,
            DataType::Decimal,
        ],
    );

    const FIELDS: &'static [FieldDescriptor] = &[Self::CODE, Self::VALUE];

    pub fn builder() -> ConceptPropertyBuilder {
        ConceptPropertyBuilder::default()
    }

    pub fn to_builder(&self) -> ConceptPropertyBuilder {
        ConceptPropertyBuilder {
            backbone: BackboneBaseBuilder::from_base(&self.backbone),
            code: self.code.clone(),
            value: self.value.clone(),
        }
    }

    pub fn code(&self) -> Option<&Code> {
        self.code.as_ref()
    }

    pub fn value(&self) -> Option<&ChoiceValue> {
        self.value.as_ref()
    }
}

static CONCEPT_PROPERTY: TypeDescriptor = TypeDescriptor {
    name: "CodeSystem.concept.property",
    kind: NodeKind::BackboneElement,
    fields: ConceptProperty::FIELDS,
    constraints: &[],
};

impl Validate for ConceptProperty {
    fn validate(&self, ctx: &mut ValidationContext<'_>) -> Result<()> {
        self.backbone.validate(ctx)?;
        ctx.check_field(&Self::CODE, &self.code)?;
        ctx.check_field(&Self::VALUE, &self.value)?;
        ctx.require_value_or_children(self)
    }
}

impl Visitable for ConceptProperty {
    fn accept<V: Visitor + ?Sized>(&self, name: &str, index: Option<usize>, visitor: &mut V) {
        walk(NodeRef::ConceptProperty(self), name, index, visitor, |visitor| {
            self.backbone.accept_fields(visitor);
            accept_one(Self::CODE.name, &self.code, visitor);
            accept_one(Self::VALUE.name, &self.value, visitor);
        });
    }
}

impl ModelNode for ConceptProperty {
    fn descriptor(&self) -> &'static TypeDescriptor {
        &CONCEPT_PROPERTY
    }

    fn node_ref(&self) -> NodeRef<'_> {
        NodeRef::ConceptProperty(self)
    }

    fn has_content(&self) -> bool {
        self.backbone.has_content() || self.code.is_some() || self.value.is_some()
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

/// Staged [`ConceptProperty`].
#[derive(Debug, Clone, Default)]
pub struct ConceptPropertyBuilder {
    backbone: BackboneBaseBuilder,
    code: Option<Code>,
    value: Option<ChoiceValue>,
}

impl ConceptPropertyBuilder {
    pub fn code(mut self, code: impl Into<Code>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// One of `code`, `Coding`, `string`, `integer`, `boolean`, `dateTime`
    /// or `decimal`; other types are rejected at build.
    pub fn value(mut self, value: impl Into<ChoiceValue>) -> Self {
        self.value = Some(value.into());
        self
    }
}

impl ElementBuilder for ConceptPropertyBuilder {
    fn element_base(&mut self) -> &mut ElementBaseBuilder {
        &mut self.backbone.element
    }
}

impl BackboneElementBuilder for ConceptPropertyBuilder {
    fn backbone_base(&mut self) -> &mut BackboneBaseBuilder {
        &mut self.backbone
    }
}

impl Builder for ConceptPropertyBuilder {
    type Output = ConceptProperty;

    fn freeze(self) -> ConceptProperty {
        ConceptProperty {
            backbone: self.backbone.freeze(),
            code: self.code,
            value: self.value,
            hash: HashCache::default(),
        }
    }
}

impl Buildable for ConceptProperty {
    type Builder = ConceptPropertyBuilder;

    fn builder() -> ConceptPropertyBuilder {
        ConceptProperty::builder()
    }

    fn to_builder(&self) -> ConceptPropertyBuilder {
        ConceptProperty::to_builder(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;

    fn filter() -> CodeSystemFilterBuilder {
        CodeSystemFilter::builder()
            .code("concept")
            .operator(["is-a"])
            .value("123")
    }

    #[test]
    fn test_filter_requires_value() {
        let mut builder = filter();
        builder.value = None;
        let err = builder.build().unwrap_err();
        assert_eq!(err.field(), "value");
        assert!(matches!(err, ModelError::MissingRequiredField { .. }));
    }

    #[test]
    fn test_filter_operator_must_not_be_empty() {
        let err = filter().set_operator(Vec::<Code>::new()).build().unwrap_err();
        assert_eq!(
            err,
            ModelError::EmptyRequiredList {
                field: "operator",
                path: "CodeSystem.filter.operator".to_string()
            }
        );
    }

    #[test]
    fn test_backbone_supertype_checked_first() {
        // An invalid modifier extension is reported before the missing code
        let err = CodeSystemConcept::builder()
            .modifier_extension([Extension::builder().url("http://example.org/x").build_unvalidated()])
            .build()
            .unwrap_err();
        assert!(matches!(err, ModelError::EmptyLeafElement { .. }));
        assert_eq!(err.path(), "CodeSystem.concept.modifierExtension[0]");
    }

    #[test]
    fn test_concept_property_choice() {
        let ok = ConceptProperty::builder()
            .code("parent")
            .value(Code::from("A"))
            .build();
        assert!(ok.is_ok());

        let err = ConceptProperty::builder()
            .code("parent")
            .value(Uri::from("http://example.org"))
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ModelError::InvalidChoiceType {
                field: "value",
                actual: DataType::Uri,
                ..
            }
        ));
    }

    #[test]
    fn test_descriptor_metadata() {
        let descriptor = CODE_SYSTEM;
        assert_eq!(descriptor.required_fields(), ["status", "content"]);
        assert!(descriptor.is_choice_element("versionAlgorithm"));
        assert_eq!(
            descriptor.choice_types("versionAlgorithm"),
            [DataType::String, DataType::Coding]
        );
        assert!(descriptor.constraint("csd-1").is_some_and(|c| c.is_base()));
        assert_eq!(
            descriptor.field("language").and_then(|f| f.binding).map(|b| b.name),
            Some("Language")
        );
    }

    #[test]
    fn test_debug_output_is_stable_across_hashing() {
        let concept = CodeSystemConcept::builder()
            .code("A")
            .concept([CodeSystemConcept::builder().code("A.1").build().unwrap()])
            .build()
            .unwrap();

        let before = format!("{concept:?}");
        concept.hash_code();
        assert!(concept.hash.is_computed());
        assert_eq!(format!("{concept:?}"), before);
        assert!(before.contains("hash: .."));
    }
}

//! # OctoFHIR FHIR Resources
//!
//! Immutable FHIR terminology resources with staged builders, closed choice
//! values, fail-fast structural validation and a depth-first visitor.
//!
//! ## Features
//!
//! - **Builder then freeze**: every type is staged in a mutable builder and
//!   frozen into an immutable, cheaply shareable instance
//! - **Structural validation**: required fields, non-empty lists, choice
//!   membership, empty leaves and required terminology bindings are checked
//!   at freeze time
//! - **Pluggable terminology**: required bindings are delegated to a
//!   [`BindingResolver`], optionally behind a TTL cache
//! - **Visitor protocol**: deterministic pre-order traversal with pruning
//!
//! ## Quick Start
//!
//! ```rust
//! use octofhir_fhir_resources::prelude::*;
//! use octofhir_fhir_resources::{CodeSystem, CodeSystemConcept, PathVisitor};
//!
//! # fn main() -> octofhir_fhir_resources::Result<()> {
//! let code_system = CodeSystem::builder()
//!     .url("http://example.org/fhir/CodeSystem/colors")
//!     .status("active")
//!     .content("complete")
//!     .concept([CodeSystemConcept::builder().code("red").build()?])
//!     .build()?;
//!
//! let mut paths = PathVisitor::new();
//! code_system.walk(&mut paths);
//! assert!(paths.paths().contains(&"CodeSystem.concept[0].code".to_string()));
//! # Ok(())
//! # }
//! ```
//!
//! Frozen instances expose no setters; changes go through a new builder:
//!
//! ```rust,compile_fail
//! use octofhir_fhir_resources::prelude::*;
//! use octofhir_fhir_resources::CodeSystemConcept;
//!
//! let concept = CodeSystemConcept::builder().code("A").build().unwrap();
//! concept.code = None;
//! ```

pub mod builder;
pub mod core;
pub mod error;
pub mod resource;
pub mod terminology;
pub mod types;
pub mod validation;
pub mod visitor;

/// Traits needed to stage, freeze and walk model types.
pub mod prelude {
    pub use crate::builder::{Buildable, Builder};
    pub use crate::types::{BackboneElementBuilder, ElementBuilder, ModelNode, ResourceBuilder};
    pub use crate::visitor::{Visitable, Visitor};
}

pub use crate::builder::{Buildable, Builder};
pub use crate::core::ModelConfig;
pub use crate::error::{ModelError, ModelErrorCode, Result};
pub use crate::resource::{
    CodeSystem, CodeSystemBuilder, CodeSystemConcept, CodeSystemConceptBuilder, CodeSystemFilter,
    CodeSystemFilterBuilder, CodeSystemProperty, CodeSystemPropertyBuilder, ConceptDesignation,
    ConceptDesignationBuilder, ConceptProperty, ConceptPropertyBuilder, ContainedResource,
    ValueSet, ValueSetBuilder, ValueSetCompose, ValueSetComposeBuilder, ValueSetConcept,
    ValueSetConceptBuilder, ValueSetFilter, ValueSetFilterBuilder, ValueSetInclude,
    ValueSetIncludeBuilder,
};
pub use crate::terminology::{
    BindingResolver, BindingStrength, CacheConfig, CachedBindingResolver, CodedValue,
    InMemoryBindingResolver, Membership,
};
pub use crate::types::*;
pub use crate::validation::validate;
pub use crate::visitor::{NodeRef, PathVisitor, Visitable, Visitor, unknown_modifier_extensions};

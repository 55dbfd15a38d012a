use std::sync::Arc;

use octofhir_fhir_resources::prelude::*;
use octofhir_fhir_resources::*;

pub const COLORS_URL: &str = "http://example.org/fhir/CodeSystem/colors";

#[allow(dead_code)]
pub fn concept(code: &str) -> CodeSystemConcept {
    CodeSystemConcept::builder().code(code).build().unwrap()
}

/// Concept `A` with the single child `A.1`.
#[allow(dead_code)]
pub fn create_hierarchy() -> CodeSystemConcept {
    CodeSystemConcept::builder()
        .code("A")
        .display("Parent")
        .concept([concept("A.1")])
        .build()
        .unwrap()
}

#[allow(dead_code)]
pub fn create_test_code_system() -> CodeSystem {
    CodeSystem::builder()
        .status("active")
        .content("complete")
        .concept([create_hierarchy()])
        .build()
        .unwrap()
}

#[allow(dead_code)]
pub fn create_full_code_system() -> CodeSystem {
    CodeSystem::builder()
        .url(COLORS_URL)
        .version("1.0.0")
        .version_algorithm(Coding::of(
            "http://hl7.org/fhir/version-algorithm",
            "semver",
        ))
        .name("Colors")
        .status("active")
        .content("complete")
        .hierarchy_meaning("is-a")
        .count(3u32)
        .property([CodeSystemProperty::builder()
            .code("rgb")
            .type_("string")
            .build()
            .unwrap()])
        .filter([CodeSystemFilter::builder()
            .code("concept")
            .operator(["is-a", "descendent-of"])
            .value("a color code")
            .build()
            .unwrap()])
        .concept([
            CodeSystemConcept::builder()
                .code("red")
                .property([ConceptProperty::builder()
                    .code("rgb")
                    .value("#ff0000")
                    .build()
                    .unwrap()])
                .concept([concept("crimson")])
                .build()
                .unwrap(),
            concept("blue"),
        ])
        .build()
        .unwrap()
}

#[allow(dead_code)]
pub fn core_resolver_config() -> ModelConfig {
    ModelConfig::default().with_resolver(Arc::new(InMemoryBindingResolver::with_core_value_sets()))
}

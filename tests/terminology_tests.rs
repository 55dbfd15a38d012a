mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use common::*;
use octofhir_fhir_resources::prelude::*;
use octofhir_fhir_resources::*;

/// Delegates to the core resolver and counts how often it is asked.
#[derive(Debug, Default)]
struct CountingResolver {
    calls: AtomicUsize,
    inner: InMemoryBindingResolver,
}

impl CountingResolver {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            inner: InMemoryBindingResolver::with_core_value_sets(),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl BindingResolver for CountingResolver {
    fn resolve(&self, value_set: &str, system: Option<&str>, code: &str) -> Membership {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.resolve(value_set, system, code)
    }
}

#[test]
fn test_core_value_sets() {
    let resolver = InMemoryBindingResolver::with_core_value_sets();
    let status = "http://hl7.org/fhir/ValueSet/publication-status|5.0.0";

    assert_eq!(
        resolver.resolve(status, Some("http://hl7.org/fhir/publication-status"), "active"),
        Membership::Member
    );
    assert_eq!(resolver.resolve(status, None, "retired"), Membership::Member);
    assert_eq!(resolver.resolve(status, None, "obsolete"), Membership::NotMember);
    assert_eq!(
        resolver.resolve("http://hl7.org/fhir/ValueSet/all-languages", None, "en"),
        Membership::Unknown
    );
}

#[test]
fn test_custom_value_set() {
    let mut resolver = InMemoryBindingResolver::new();
    resolver.add_codes(
        "http://example.org/fhir/ValueSet/colors",
        &[("red", Some(COLORS_URL)), ("blue", None)],
    );

    assert!(resolver.contains_value_set("http://example.org/fhir/ValueSet/colors|2.0"));
    assert_eq!(
        resolver.resolve("http://example.org/fhir/ValueSet/colors", Some("http://other.org"), "red"),
        Membership::NotMember
    );
    assert_eq!(
        resolver.resolve("http://example.org/fhir/ValueSet/colors", Some("http://other.org"), "blue"),
        Membership::Member
    );
}

#[test]
fn test_cached_resolver_reuses_answers() {
    let counting = Arc::new(CountingResolver::new());
    let cached = Arc::new(CachedBindingResolver::new(
        counting.clone(),
        CacheConfig::short_lived(),
    ));
    let config = ModelConfig::default().with_resolver(cached.clone());

    for _ in 0..3 {
        CodeSystem::builder()
            .status("active")
            .content("complete")
            .build_with(&config)
            .unwrap();
    }

    // One lookup each for status and content, then served from cache
    assert_eq!(counting.calls(), 2);
    assert_eq!(cached.cache_stats().entry_count, 2);

    cached.clear_cache();
    assert_eq!(cached.cache_stats().entry_count, 0);
}

#[test]
fn test_cached_resolver_does_not_cache_unknown() {
    let counting = Arc::new(CountingResolver::new());
    let cached = CachedBindingResolver::new(counting.clone(), CacheConfig::default());

    let language = "http://hl7.org/fhir/ValueSet/all-languages|5.0.0";
    for _ in 0..2 {
        assert_eq!(
            cached.resolve(language, Some("urn:ietf:bcp:47"), "de"),
            Membership::Unknown
        );
    }
    assert_eq!(counting.calls(), 2);
}

#[test]
fn test_concept_binding_member_if_any_coding_matches() {
    let mut resolver = InMemoryBindingResolver::new();
    resolver.add_code("http://example.org/vs", "b", Some("http://example.org/cs"));

    let concept = CodeableConcept::builder()
        .coding([
            Coding::of("http://example.org/cs", "a"),
            Coding::of("http://example.org/cs", "b"),
        ])
        .build()
        .unwrap();
    let coded = concept.coded().unwrap();

    assert_eq!(coded.codes(), "a,b");
    assert_eq!(
        coded.resolve(&resolver, "http://example.org/vs", None),
        Membership::Member
    );
}

#[test]
fn test_binding_strength_parsing() {
    assert_eq!(BindingStrength::parse_str("Required"), Some(BindingStrength::Required));
    assert_eq!(BindingStrength::parse_str("extensible"), Some(BindingStrength::Extensible));
    assert_eq!(BindingStrength::parse_str("mandatory"), None);
    assert!(BindingStrength::Required.is_error_on_failure());
    assert!(!BindingStrength::Preferred.is_error_on_failure());
}

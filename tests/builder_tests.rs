mod common;

use common::*;
use octofhir_fhir_resources::prelude::*;
use octofhir_fhir_resources::*;
use std::sync::Arc;

#[test]
fn test_to_builder_round_trip_is_equal() {
    let code_system = create_full_code_system();
    let rebuilt = code_system.to_builder().build().unwrap();

    assert_eq!(rebuilt, code_system);
    assert_eq!(rebuilt.hash_code(), code_system.hash_code());
}

#[test]
fn test_to_builder_shares_nested_nodes() {
    let code_system = create_test_code_system();
    let rebuilt = code_system.to_builder().name("Renamed").build().unwrap();

    assert!(Arc::ptr_eq(&code_system.concept()[0], &rebuilt.concept()[0]));
    assert!(Arc::ptr_eq(
        &code_system.concept()[0].concept()[0],
        &rebuilt.concept()[0].concept()[0]
    ));
    assert_ne!(rebuilt, code_system);
}

#[test]
fn test_to_builder_keeps_direct_children_by_reference() {
    let child = CodeSystemConcept::builder()
        .code("A.1")
        .display("x".repeat(1000))
        .build()
        .unwrap();
    let parent = CodeSystemConcept::builder()
        .code("A")
        .concept([child])
        .build()
        .unwrap();

    let changed = parent.to_builder().display("changed").build().unwrap();

    let before = parent.concept()[0].display().unwrap();
    let after = changed.concept()[0].display().unwrap();
    assert!(std::ptr::eq(before, after));
    assert!(std::ptr::eq(
        before.as_str().unwrap().as_ptr(),
        after.as_str().unwrap().as_ptr()
    ));
    assert_eq!(changed.display().and_then(|d| d.as_str()), Some("changed"));
}

#[test]
fn test_list_setters_append_or_replace() {
    let appended = CodeSystemConcept::builder()
        .code("A")
        .concept([concept("A.1")])
        .concept([concept("A.2"), concept("A.3")])
        .build()
        .unwrap();
    assert_eq!(appended.concept().len(), 3);

    let replaced = appended
        .to_builder()
        .set_concept([concept("B.1")])
        .build()
        .unwrap();
    assert_eq!(replaced.concept().len(), 1);
    assert_eq!(
        replaced.concept()[0].code().and_then(|c| c.as_str()),
        Some("B.1")
    );

    // The source instance is untouched
    assert_eq!(appended.concept().len(), 3);
}

#[test]
fn test_builder_snapshot_is_independent() {
    let builder = CodeSystemFilter::builder()
        .code("concept")
        .operator(["is-a"])
        .value("x");
    let first = builder.clone().build().unwrap();
    let second = builder.operator(["regex"]).build().unwrap();

    assert_eq!(first.operator().len(), 1);
    assert_eq!(second.operator().len(), 2);
}

#[test]
fn test_rejected_build_returns_no_instance() {
    let result = CodeSystem::builder().status("active").build();
    let err = result.unwrap_err();
    assert_eq!(err.code(), ModelErrorCode::MissingRequiredField);
    assert_eq!(err.field(), "content");
}

#[test]
fn test_role_setters() {
    let meta = Meta::builder().version_id("7").build().unwrap();
    let code_system = CodeSystem::builder()
        .id("colors")
        .meta(meta.clone())
        .language("en")
        .status("draft")
        .content("fragment")
        .build()
        .unwrap();

    assert_eq!(code_system.id(), Some("colors"));
    assert_eq!(code_system.resource().meta(), Some(&meta));
    assert_eq!(
        code_system.resource().language().and_then(|c| c.as_str()),
        Some("en")
    );

    let designation = ConceptDesignation::builder()
        .id("d1")
        .extension([Extension::builder()
            .url("http://example.org/ext")
            .value("note")
            .build()
            .unwrap()])
        .value("Rot")
        .build()
        .unwrap();
    assert_eq!(designation.id(), Some("d1"));
    assert_eq!(designation.extension().len(), 1);
}

#[test]
fn test_contained_resources() {
    let value_set = ValueSet::builder()
        .url("http://example.org/fhir/ValueSet/colors")
        .status("active")
        .build()
        .unwrap();
    let code_system = CodeSystem::builder()
        .status("active")
        .content("complete")
        .contained([ContainedResource::from(value_set.clone())])
        .build()
        .unwrap();

    assert_eq!(
        code_system.resource().contained()[0].as_value_set(),
        Some(&value_set)
    );
}

#[test]
fn test_equal_instances_hash_equal() {
    use std::collections::HashSet;

    let a = create_hierarchy();
    let b = create_hierarchy();
    assert_eq!(a, b);

    let mut set = HashSet::new();
    set.insert(a);
    assert!(set.contains(&b));
}

#[test]
fn test_frozen_nodes_are_shareable_across_threads() {
    let code_system = std::sync::Arc::new(create_full_code_system());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let code_system = code_system.clone();
            std::thread::spawn(move || code_system.hash_code())
        })
        .collect();

    let hashes: Vec<u64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(hashes.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn test_partial_publication_date() {
    let code_system = CodeSystem::builder()
        .status("active")
        .content("complete")
        .date("2023-05".parse::<DateTimeValue>().unwrap())
        .build()
        .unwrap();
    let date = code_system.date().and_then(|d| d.value()).unwrap();
    assert_eq!(date, &DateTimeValue::YearMonth(2023, 5));
    assert_eq!(date.to_string(), "2023-05");
    assert_eq!(code_system.to_builder().build().unwrap(), code_system);

    let at = |text: &str| {
        code_system
            .to_builder()
            .date(text.parse::<DateTimeValue>().unwrap())
            .build()
            .unwrap()
    };
    assert_ne!(at("2023-05-01T10:00:00+00:00"), at("2023-05-01T11:00:00+01:00"));
}

mod common;

use std::sync::Arc;

use common::*;
use octofhir_fhir_resources::prelude::*;
use octofhir_fhir_resources::*;

fn filter_without_value() -> CodeSystemFilter {
    CodeSystemFilter::builder()
        .code("concept")
        .operator(["is-a"])
        .build_unvalidated()
}

#[test]
fn test_missing_required_field() {
    let err = CodeSystemFilter::builder()
        .code("concept")
        .operator(["is-a"])
        .build()
        .unwrap_err();

    assert_eq!(
        err,
        ModelError::MissingRequiredField {
            field: "value",
            path: "CodeSystem.filter.value".to_string()
        }
    );
    assert_eq!(err.code().to_string(), "FM1001");
}

#[test]
fn test_error_path_includes_list_index() {
    let err = CodeSystem::builder()
        .status("active")
        .content("complete")
        .filter([filter_without_value()])
        .build()
        .unwrap_err();

    assert_eq!(err.field(), "value");
    assert_eq!(err.path(), "CodeSystem.filter[0].value");
}

#[test]
fn test_empty_required_list() {
    let err = CodeSystemFilter::builder()
        .code("concept")
        .value("x")
        .build()
        .unwrap_err();

    assert_eq!(err.code(), ModelErrorCode::EmptyRequiredList);
    assert_eq!(err.field(), "operator");
}

#[test]
fn test_first_violation_wins() {
    // Both `code` and `value` are missing; `code` is declared first
    let err = CodeSystemFilter::builder()
        .operator(["is-a"])
        .build()
        .unwrap_err();
    assert_eq!(err.field(), "code");
}

#[test]
fn test_empty_leaf_element() {
    let err = Coding::builder().build().unwrap_err();
    assert_eq!(
        err,
        ModelError::EmptyLeafElement {
            type_name: "Coding",
            path: "Coding".to_string()
        }
    );

    let err = CodeSystemConcept::builder()
        .code("A")
        .display(FhirString::builder().build_unvalidated())
        .build()
        .unwrap_err();
    assert_eq!(err.code(), ModelErrorCode::EmptyLeafElement);
    assert_eq!(err.path(), "CodeSystem.concept.display");
}

#[test]
fn test_extension_counts_as_content() {
    let display = FhirString::builder()
        .extension([Extension::builder()
            .url("http://hl7.org/fhir/StructureDefinition/data-absent-reason")
            .value(Code::from("unknown"))
            .build()
            .unwrap()])
        .build()
        .unwrap();
    assert!(!display.has_value());

    let concept = CodeSystemConcept::builder()
        .code("A")
        .display(display)
        .build();
    assert!(concept.is_ok());
}

#[test]
fn test_empty_elements_can_be_permitted() {
    let config = ModelConfig::default().with_empty_elements(true);
    assert!(Coding::builder().build_with(&config).is_ok());
}

#[test]
fn test_value_syntax() {
    let err = CodeSystemConcept::builder()
        .code(" padded")
        .build()
        .unwrap_err();
    assert_eq!(err.code(), ModelErrorCode::InvalidValue);
    assert_eq!(err.path(), "CodeSystem.concept.code");

    let lenient = ModelConfig::default().with_value_syntax_checks(false);
    assert!(
        CodeSystemConcept::builder()
            .code(" padded")
            .build_with(&lenient)
            .is_ok()
    );
}

#[test]
fn test_unsigned_int_range() {
    let err = CodeSystem::builder()
        .status("active")
        .content("complete")
        .count(u32::MAX)
        .build()
        .unwrap_err();
    assert_eq!(err.code(), ModelErrorCode::InvalidValue);
    assert_eq!(err.path(), "CodeSystem.count");
}

#[test]
fn test_non_validating_mode_then_validate() {
    let partial = CodeSystem::builder()
        .status("active")
        .filter([filter_without_value()])
        .build_with(&ModelConfig::non_validating())
        .unwrap();
    assert!(partial.content().is_none());

    let err = validate(&partial, &ModelConfig::default()).unwrap_err();
    assert_eq!(err.field(), "content");

    let completed = partial.to_builder().content("complete").build_unvalidated();
    let err = validate(&completed, &ModelConfig::default()).unwrap_err();
    assert_eq!(err.path(), "CodeSystem.filter[0].value");
}

#[test]
fn test_required_binding_rejects_unknown_code() {
    let err = CodeSystem::builder()
        .status("bogus")
        .content("complete")
        .build_with(&core_resolver_config())
        .unwrap_err();

    assert_eq!(
        err,
        ModelError::UnresolvedBinding {
            field: "status",
            code: "bogus".to_string(),
            value_set: "http://hl7.org/fhir/ValueSet/publication-status|5.0.0",
            path: "CodeSystem.status".to_string()
        }
    );
}

#[test]
fn test_required_binding_on_list_elements() {
    let err = CodeSystemFilter::builder()
        .code("concept")
        .operator(["is-a", "resembles"])
        .value("x")
        .build_with(&core_resolver_config())
        .unwrap_err();

    assert_eq!(err.code(), ModelErrorCode::UnresolvedBinding);
    assert_eq!(err.path(), "CodeSystem.filter.operator[1]");
}

#[test]
fn test_required_binding_skipped_without_resolver() {
    let code_system = CodeSystem::builder()
        .status("bogus")
        .content("complete")
        .build();
    assert!(code_system.is_ok());
}

#[test]
fn test_unknown_membership_does_not_block() {
    // The core resolver does not carry the language value set
    let designation = ConceptDesignation::builder()
        .language("tlh")
        .value("Qapla'")
        .build_with(&core_resolver_config());
    assert!(designation.is_ok());
}

#[test]
fn test_advisory_binding_is_not_enforced() {
    #[derive(Debug)]
    struct RejectEverything;

    impl BindingResolver for RejectEverything {
        fn resolve(&self, _value_set: &str, _system: Option<&str>, _code: &str) -> Membership {
            Membership::NotMember
        }
    }

    let config = ModelConfig::default().with_resolver(Arc::new(RejectEverything));

    // `use` carries an extensible binding only
    let designation = ConceptDesignation::builder()
        .use_(Coding::of("http://example.org/uses", "informal"))
        .value("Red")
        .build_with(&config);
    assert!(designation.is_ok());

    let err = ValueSetFilter::builder()
        .property("concept")
        .op("is-a")
        .value("x")
        .build_with(&config)
        .unwrap_err();
    assert_eq!(err.field(), "op");
}

#[test]
fn test_supertype_rules_checked_first() {
    let err = CodeSystem::builder()
        .language("en")
        .modifier_extension([Extension::builder()
            .url("http://example.org/mod")
            .build_unvalidated()])
        .build()
        .unwrap_err();

    assert_eq!(err.code(), ModelErrorCode::EmptyLeafElement);
    assert_eq!(err.path(), "CodeSystem.modifierExtension[0]");
}

#[test]
fn test_full_fixture_validates_with_resolver() {
    let code_system = create_full_code_system();
    assert!(validate(&code_system, &core_resolver_config()).is_ok());
}

use octofhir_fhir_resources::prelude::*;
use octofhir_fhir_resources::resource::{descriptor, descriptors};
use octofhir_fhir_resources::*;
use serde_json::json;

#[test]
fn test_config_json_round_trip() {
    let config = ModelConfig::default()
        .with_empty_elements(true)
        .with_value_syntax_checks(false);
    let value = serde_json::to_value(&config).unwrap();
    assert_eq!(
        value,
        json!({
            "validating": true,
            "check_value_syntax": false,
            "permit_empty_elements": true
        })
    );

    let parsed: ModelConfig = serde_json::from_value(value).unwrap();
    assert!(parsed.permit_empty_elements);
    assert!(!parsed.check_value_syntax);
    assert!(parsed.resolver().is_none());
}

#[test]
fn test_config_defaults_fill_missing_keys() {
    let parsed: ModelConfig = serde_json::from_str(r#"{"validating": false}"#).unwrap();
    assert!(!parsed.validating);
    assert!(parsed.check_value_syntax);
    assert!(!parsed.permit_empty_elements);
}

#[test]
fn test_descriptor_export() {
    let filter = descriptor("CodeSystem.filter").unwrap();
    let value = serde_json::to_value(filter).unwrap();

    assert_eq!(value["name"], "CodeSystem.filter");
    assert_eq!(value["kind"], "BackboneElement");
    let operator = &value["fields"][2];
    assert_eq!(operator["name"], "operator");
    assert_eq!(operator["cardinality"], "required-non-empty");
    assert_eq!(operator["binding"]["strength"], "required");
    assert_eq!(
        operator["binding"]["value_set"],
        "http://hl7.org/fhir/ValueSet/filter-operator|5.0.0"
    );
    assert!(value["fields"][1].get("binding").is_none());
}

#[test]
fn test_constraints_are_exposed_as_data() {
    let code_system = descriptor("CodeSystem").unwrap();
    let csd_1 = code_system.constraint("csd-1").unwrap();
    assert_eq!(csd_1.level, ConstraintLevel::Rule);
    assert!(csd_1.is_base());
    assert_eq!(
        csd_1.source,
        "http://hl7.org/fhir/StructureDefinition/CodeSystem"
    );

    let cnl_1 = code_system.constraint("cnl-1").unwrap();
    assert_eq!(cnl_1.level, ConstraintLevel::Warning);
    assert_eq!(cnl_1.location, "CodeSystem.url");

    let value_set = descriptor("ValueSet").unwrap();
    assert!(value_set.constraint("vsd-2").is_some());
}

#[test]
fn test_role_fields_precede_local_fields() {
    let concept = descriptor("CodeSystem.concept").unwrap();
    let names: Vec<_> = concept.all_fields().map(|f| f.name).collect();
    assert_eq!(
        names,
        [
            "extension",
            "modifierExtension",
            "code",
            "display",
            "definition",
            "designation",
            "property",
            "concept"
        ]
    );
    assert_eq!(concept.required_fields(), ["code"]);
    assert!(concept.summary_fields().contains(&"modifierExtension"));
}

#[test]
fn test_registry_matches_instances() {
    let code_system = CodeSystem::builder()
        .status("active")
        .content("complete")
        .build()
        .unwrap();
    assert!(std::ptr::eq(
        code_system.descriptor(),
        descriptor("CodeSystem").unwrap()
    ));
    assert!(descriptors().iter().any(|d| d.name == "ValueSet.compose.include.filter"));
    assert_eq!(DataType::from_name("dateTime"), Some(DataType::DateTime));
}

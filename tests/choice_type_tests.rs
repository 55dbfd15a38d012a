use chrono::DateTime;
use octofhir_fhir_resources::prelude::*;
use octofhir_fhir_resources::*;
use rust_decimal::Decimal;

fn property(value: impl Into<ChoiceValue>) -> Result<ConceptProperty> {
    ConceptProperty::builder().code("p").value(value).build()
}

#[test]
fn test_version_algorithm_accepts_string_and_coding() {
    for value in [
        ChoiceValue::from("semver"),
        ChoiceValue::from(Coding::of("http://hl7.org/fhir/version-algorithm", "date")),
    ] {
        let code_system = CodeSystem::builder()
            .status("active")
            .content("complete")
            .version_algorithm(value.clone())
            .build()
            .unwrap();
        assert_eq!(code_system.version_algorithm(), Some(&value));
    }
}

#[test]
fn test_version_algorithm_rejects_other_types() {
    let err = CodeSystem::builder()
        .status("active")
        .content("complete")
        .version_algorithm(42)
        .build()
        .unwrap_err();

    assert_eq!(
        err,
        ModelError::InvalidChoiceType {
            field: "versionAlgorithm",
            actual: DataType::Integer,
            allowed: &[DataType::String, DataType::Coding],
            path: "CodeSystem.versionAlgorithm".to_string()
        }
    );
    assert_eq!(err.code().to_string(), "FM1003");
}

#[test]
fn test_concept_property_value_types() {
    let accepted = [
        ChoiceValue::from(Code::from("active")),
        ChoiceValue::from(Coding::of("http://example.org/cs", "x")),
        ChoiceValue::from("text"),
        ChoiceValue::from(7),
        ChoiceValue::from(false),
        ChoiceValue::from(DateTime::parse_from_rfc3339("2024-05-01T10:00:00+02:00").unwrap()),
        ChoiceValue::from(Decimal::new(314, 2)),
    ];
    for value in accepted {
        let data_type = value.data_type();
        let property = property(value).unwrap();
        assert_eq!(property.value().map(|v| v.data_type()), Some(data_type));
    }

    let rejected = [
        ChoiceValue::from(Uri::from("http://example.org")),
        ChoiceValue::from(Markdown::from("*text*")),
        ChoiceValue::from(UnsignedInt::from(3u32)),
        ChoiceValue::from(CodeableConcept::builder().text("t").build().unwrap()),
    ];
    for value in rejected {
        let data_type = value.data_type();
        let err = property(value).unwrap_err();
        assert_eq!(err.code(), ModelErrorCode::InvalidChoiceType);
        assert_eq!(err.path(), "CodeSystem.concept.property.value");
        assert!(matches!(err, ModelError::InvalidChoiceType { actual, .. } if actual == data_type));
    }
}

#[test]
fn test_choice_membership_checked_before_content() {
    // CodeableConcept is not allowed here at all; the type error wins over emptiness
    let err = ConceptProperty::builder()
        .code("p")
        .value(CodeableConcept::builder().build_unvalidated())
        .build()
        .unwrap_err();
    assert_eq!(err.code(), ModelErrorCode::InvalidChoiceType);
}

#[test]
fn test_extension_value_accepts_every_datatype() {
    let values = [
        ChoiceValue::from(Uri::from("http://example.org")),
        ChoiceValue::from(Canonical::from("http://example.org/vs|1.0")),
        ChoiceValue::from(Identifier::builder().value("123").build().unwrap()),
    ];
    for value in values {
        let extension = Extension::builder()
            .url("http://example.org/ext")
            .value(value)
            .build();
        assert!(extension.is_ok());
    }
}

#[test]
fn test_choice_element_names() {
    let field = ConceptProperty::VALUE;
    assert_eq!(field.choice_element_name(DataType::Coding), "valueCoding");
    assert_eq!(field.choice_element_name(DataType::DateTime), "valueDateTime");
    assert!(CodeSystem::VERSION_ALGORITHM.is_choice());
    assert!(!CodeSystem::NAME.is_choice());
}

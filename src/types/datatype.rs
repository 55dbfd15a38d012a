use serde::{Deserialize, Serialize};

/// The closed set of concrete datatypes a field may declare.
///
/// Choice fields list several of these; the runtime payload of a
/// [`ChoiceValue`](crate::types::ChoiceValue) reports exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    #[serde(rename = "boolean")]
    Boolean,
    #[serde(rename = "integer")]
    Integer,
    #[serde(rename = "unsignedInt")]
    UnsignedInt,
    #[serde(rename = "decimal")]
    Decimal,
    #[serde(rename = "string")]
    String,
    #[serde(rename = "code")]
    Code,
    #[serde(rename = "uri")]
    Uri,
    #[serde(rename = "canonical")]
    Canonical,
    #[serde(rename = "markdown")]
    Markdown,
    #[serde(rename = "dateTime")]
    DateTime,
    Coding,
    CodeableConcept,
    Identifier,
    Meta,
    Extension,
    BackboneElement,
    Resource,
}

/// Every datatype a choice value can carry, in declaration order.
pub const CHOICE_DATA_TYPES: &[DataType] = &[
    DataType::Boolean,
    DataType::Integer,
    DataType::UnsignedInt,
    DataType::Decimal,
    DataType::String,
    DataType::Code,
    DataType::Uri,
    DataType::Canonical,
    DataType::Markdown,
    DataType::DateTime,
    DataType::Coding,
    DataType::CodeableConcept,
    DataType::Identifier,
];

impl DataType {
    /// FHIR name of the type (`string`, `dateTime`, `Coding`, ...)
    pub const fn name(&self) -> &'static str {
        match self {
            DataType::Boolean => "boolean",
            DataType::Integer => "integer",
            DataType::UnsignedInt => "unsignedInt",
            DataType::Decimal => "decimal",
            DataType::String => "string",
            DataType::Code => "code",
            DataType::Uri => "uri",
            DataType::Canonical => "canonical",
            DataType::Markdown => "markdown",
            DataType::DateTime => "dateTime",
            DataType::Coding => "Coding",
            DataType::CodeableConcept => "CodeableConcept",
            DataType::Identifier => "Identifier",
            DataType::Meta => "Meta",
            DataType::Extension => "Extension",
            DataType::BackboneElement => "BackboneElement",
            DataType::Resource => "Resource",
        }
    }

    /// Parse a FHIR type name
    pub fn from_name(name: &str) -> Option<Self> {
        const ALL: &[DataType] = &[
            DataType::Boolean,
            DataType::Integer,
            DataType::UnsignedInt,
            DataType::Decimal,
            DataType::String,
            DataType::Code,
            DataType::Uri,
            DataType::Canonical,
            DataType::Markdown,
            DataType::DateTime,
            DataType::Coding,
            DataType::CodeableConcept,
            DataType::Identifier,
            DataType::Meta,
            DataType::Extension,
            DataType::BackboneElement,
            DataType::Resource,
        ];
        ALL.iter().copied().find(|t| t.name() == name)
    }

    pub fn is_primitive(&self) -> bool {
        self.name().starts_with(|c: char| c.is_ascii_lowercase())
    }

    /// Suffix used when a choice element is named after its type,
    /// e.g. `value` + `Coding` -> `valueCoding`, `value` + `string` -> `valueString`.
    pub fn choice_suffix(&self) -> String {
        let name = self.name();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

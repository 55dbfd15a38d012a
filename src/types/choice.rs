use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::error::Result;
use crate::terminology::CodedValue;
use crate::types::descriptor::TypeDescriptor;
use crate::types::{
    Canonical, Code, CodeableConcept, Coding, DataType, DateTimeValue, Extension, FhirBoolean,
    FhirDateTime, FhirDecimal, FhirInteger, FhirString, Identifier, Markdown, ModelNode,
    UnsignedInt, Uri,
};
use crate::validation::{Validate, ValidationContext};
use crate::visitor::{NodeRef, Visitable, Visitor};

/// The payload of a choice (`value[x]`) field.
///
/// The variant is the runtime type; whether it is one of the types the
/// field declares is checked when the owning builder is frozen, so a
/// builder may hold any variant while it is being staged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChoiceValue {
    Boolean(FhirBoolean),
    Integer(FhirInteger),
    UnsignedInt(UnsignedInt),
    Decimal(FhirDecimal),
    String(FhirString),
    Code(Code),
    Uri(Uri),
    Canonical(Canonical),
    Markdown(Markdown),
    DateTime(FhirDateTime),
    Coding(Coding),
    CodeableConcept(CodeableConcept),
    Identifier(Identifier),
}

macro_rules! dispatch {
    ($value:expr, $inner:ident => $body:expr) => {
        match $value {
            ChoiceValue::Boolean($inner) => $body,
            ChoiceValue::Integer($inner) => $body,
            ChoiceValue::UnsignedInt($inner) => $body,
            ChoiceValue::Decimal($inner) => $body,
            ChoiceValue::String($inner) => $body,
            ChoiceValue::Code($inner) => $body,
            ChoiceValue::Uri($inner) => $body,
            ChoiceValue::Canonical($inner) => $body,
            ChoiceValue::Markdown($inner) => $body,
            ChoiceValue::DateTime($inner) => $body,
            ChoiceValue::Coding($inner) => $body,
            ChoiceValue::CodeableConcept($inner) => $body,
            ChoiceValue::Identifier($inner) => $body,
        }
    };
}

macro_rules! choice_variants {
    ($($variant:ident($ty:ty) => $getter:ident),+ $(,)?) => {
        impl ChoiceValue {
            $(
                pub fn $getter(&self) -> Option<&$ty> {
                    match self {
                        ChoiceValue::$variant(value) => Some(value),
                        _ => None,
                    }
                }
            )+
        }

        $(
            impl From<$ty> for ChoiceValue {
                fn from(value: $ty) -> Self {
                    ChoiceValue::$variant(value)
                }
            }
        )+
    };
}

choice_variants!(
    Boolean(FhirBoolean) => as_boolean,
    Integer(FhirInteger) => as_integer,
    UnsignedInt(UnsignedInt) => as_unsigned_int,
    Decimal(FhirDecimal) => as_decimal,
    String(FhirString) => as_string,
    Code(Code) => as_code,
    Uri(Uri) => as_uri,
    Canonical(Canonical) => as_canonical,
    Markdown(Markdown) => as_markdown,
    DateTime(FhirDateTime) => as_date_time,
    Coding(Coding) => as_coding,
    CodeableConcept(CodeableConcept) => as_codeable_concept,
    Identifier(Identifier) => as_identifier,
);

impl From<bool> for ChoiceValue {
    fn from(value: bool) -> Self {
        ChoiceValue::Boolean(value.into())
    }
}

impl From<i32> for ChoiceValue {
    fn from(value: i32) -> Self {
        ChoiceValue::Integer(value.into())
    }
}

impl From<Decimal> for ChoiceValue {
    fn from(value: Decimal) -> Self {
        ChoiceValue::Decimal(value.into())
    }
}

/// Plain text wraps as `string`; use [`Code`] or [`Uri`] explicitly for those types.
impl From<&str> for ChoiceValue {
    fn from(value: &str) -> Self {
        ChoiceValue::String(value.into())
    }
}

impl From<String> for ChoiceValue {
    fn from(value: String) -> Self {
        ChoiceValue::String(value.into())
    }
}

impl From<DateTime<FixedOffset>> for ChoiceValue {
    fn from(value: DateTime<FixedOffset>) -> Self {
        ChoiceValue::DateTime(value.into())
    }
}

impl From<DateTimeValue> for ChoiceValue {
    fn from(value: DateTimeValue) -> Self {
        ChoiceValue::DateTime(value.into())
    }
}

impl Validate for ChoiceValue {
    fn validate(&self, ctx: &mut ValidationContext<'_>) -> Result<()> {
        dispatch!(self, value => value.validate(ctx))
    }
}

impl Visitable for ChoiceValue {
    fn accept<V: Visitor + ?Sized>(&self, name: &str, index: Option<usize>, visitor: &mut V) {
        dispatch!(self, value => value.accept(name, index, visitor))
    }
}

impl ModelNode for ChoiceValue {
    fn descriptor(&self) -> &'static TypeDescriptor {
        dispatch!(self, value => value.descriptor())
    }

    fn node_ref(&self) -> NodeRef<'_> {
        dispatch!(self, value => value.node_ref())
    }

    fn has_content(&self) -> bool {
        dispatch!(self, value => value.has_content())
    }

    fn data_type(&self) -> DataType {
        dispatch!(self, value => value.data_type())
    }

    fn coded(&self) -> Option<CodedValue<'_>> {
        dispatch!(self, value => value.coded())
    }

    fn id(&self) -> Option<&str> {
        dispatch!(self, value => ModelNode::id(value))
    }

    fn extension(&self) -> &[Arc<Extension>] {
        dispatch!(self, value => ModelNode::extension(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_values_wrap() {
        assert_eq!(ChoiceValue::from("text").data_type(), DataType::String);
        assert_eq!(ChoiceValue::from(true).data_type(), DataType::Boolean);
        assert_eq!(ChoiceValue::from(42).data_type(), DataType::Integer);
        assert_eq!(
            ChoiceValue::from(Decimal::new(15, 1)).data_type(),
            DataType::Decimal
        );
        assert_eq!(
            ChoiceValue::from(Code::from("x")).data_type(),
            DataType::Code
        );
    }

    #[test]
    fn test_variant_accessors() {
        let value = ChoiceValue::from("text");
        assert_eq!(
            value.as_string().and_then(|s| s.as_str()),
            Some("text")
        );
        assert!(value.as_coding().is_none());
        assert_eq!(value.type_name(), "string");
    }
}

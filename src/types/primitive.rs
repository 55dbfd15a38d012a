//! Primitive datatypes.
//!
//! Every primitive is a [`Primitive<K>`] over a kind marker: an optional
//! value plus the id and extensions every element carries. An element with
//! extensions but no value is legal; one with neither is an empty leaf.

use chrono::{DateTime, FixedOffset, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::builder::{Buildable, Builder};
use crate::error::Result;
use crate::terminology::{CodedValue, is_valid_code};
use crate::types::datetime::DateTimeValue;
use crate::types::descriptor::TypeDescriptor;
use crate::types::hash::HashCache;
use crate::types::node::{ElementBase, ElementBaseBuilder, ElementBuilder, NodeKind};
use crate::types::{DataType, Extension, ModelNode};
use crate::validation::{Validate, ValidationContext};
use crate::visitor::{NodeRef, Visitable, Visitor, walk};

/// Largest string FHIR allows (1 MB of characters)
pub const MAX_STRING_LENGTH: usize = 1024 * 1024;

static URI_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\S+$").expect("valid uri pattern"));

/// Marker for one primitive datatype.
pub trait PrimitiveKind: Sized + Send + Sync + 'static {
    type Value: Clone + PartialEq + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync;

    const DATA_TYPE: DataType;

    fn descriptor() -> &'static TypeDescriptor;

    fn node_ref(node: &Primitive<Self>) -> NodeRef<'_>;

    /// Lexical rule for the value; `Err` carries the reason.
    fn check_value(_value: &Self::Value) -> std::result::Result<(), &'static str> {
        Ok(())
    }

    fn coded(_value: &Self::Value) -> Option<CodedValue<'_>> {
        None
    }
}

fn check_text(value: &str) -> std::result::Result<(), &'static str> {
    if value.is_empty() {
        return Err("must not be empty");
    }
    if value.chars().count() > MAX_STRING_LENGTH {
        return Err("exceeds the maximum string length");
    }
    if value
        .chars()
        .any(|c| c.is_control() && !matches!(c, '\r' | '\n' | '\t'))
    {
        return Err("contains control characters");
    }
    Ok(())
}

fn check_uri(value: &str) -> std::result::Result<(), &'static str> {
    if URI_PATTERN.is_match(value) {
        Ok(())
    } else {
        Err("must be non-empty and contain no whitespace")
    }
}

macro_rules! primitive_kind {
    (
        $(#[$meta:meta])*
        $kind:ident, $alias:ident, $value:ty, $data_type:ident, $variant:ident
        $(, check = $check:expr)?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $kind {}

        $(#[$meta])*
        pub type $alias = Primitive<$kind>;

        impl PrimitiveKind for $kind {
            type Value = $value;

            const DATA_TYPE: DataType = DataType::$data_type;

            fn descriptor() -> &'static TypeDescriptor {
                static DESCRIPTOR: TypeDescriptor = TypeDescriptor {
                    name: DataType::$data_type.name(),
                    kind: NodeKind::Element,
                    fields: &[],
                    constraints: &[],
                };
                &DESCRIPTOR
            }

            fn node_ref(node: &Primitive<Self>) -> NodeRef<'_> {
                NodeRef::$variant(node)
            }

            $(
                fn check_value(value: &$value) -> std::result::Result<(), &'static str> {
                    ($check)(value)
                }
            )?
        }
    };
}

primitive_kind!(
    /// `boolean`
    BooleanKind, FhirBoolean, bool, Boolean, Boolean
);
primitive_kind!(
    /// `integer` (32-bit signed)
    IntegerKind, FhirInteger, i32, Integer, Integer
);
primitive_kind!(
    /// `unsignedInt` (0..=2^31-1)
    UnsignedIntKind, UnsignedInt, u32, UnsignedInt, UnsignedInt,
    check = |value: &u32| {
        if i32::try_from(*value).is_ok() {
            Ok(())
        } else {
            Err("exceeds 2147483647")
        }
    }
);
primitive_kind!(
    /// `decimal`
    DecimalKind, FhirDecimal, Decimal, Decimal, Decimal
);
primitive_kind!(
    /// `string`
    StringKind, FhirString, String, String, String,
    check = |value: &String| check_text(value)
);
primitive_kind!(
    /// `uri`
    UriKind, Uri, String, Uri, Uri,
    check = |value: &String| check_uri(value)
);
primitive_kind!(
    /// `canonical`, a uri with an optional `|version` suffix
    CanonicalKind, Canonical, String, Canonical, Canonical,
    check = |value: &String| check_uri(value)
);
primitive_kind!(
    /// `markdown`
    MarkdownKind, Markdown, String, Markdown, Markdown,
    check = |value: &String| check_text(value)
);
primitive_kind!(
    /// `dateTime`, at year, month, day or instant precision
    DateTimeKind, FhirDateTime, DateTimeValue, DateTime, DateTime,
    check = |value: &DateTimeValue| value.check()
);

/// `code`: a token with no leading, trailing or repeated whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeKind {}

/// `code`
pub type Code = Primitive<CodeKind>;

impl PrimitiveKind for CodeKind {
    type Value = String;

    const DATA_TYPE: DataType = DataType::Code;

    fn descriptor() -> &'static TypeDescriptor {
        static DESCRIPTOR: TypeDescriptor = TypeDescriptor {
            name: "code",
            kind: NodeKind::Element,
            fields: &[],
            constraints: &[],
        };
        &DESCRIPTOR
    }

    fn node_ref(node: &Primitive<Self>) -> NodeRef<'_> {
        NodeRef::Code(node)
    }

    fn check_value(value: &String) -> std::result::Result<(), &'static str> {
        if is_valid_code(value) {
            Ok(())
        } else {
            Err("code must be non-empty without leading, trailing or repeated whitespace")
        }
    }

    fn coded(value: &String) -> Option<CodedValue<'_>> {
        Some(CodedValue::Code(value))
    }
}

/// A frozen primitive element.
pub struct Primitive<K: PrimitiveKind> {
    pub(crate) element: ElementBase,
    pub(crate) value: Option<K::Value>,
    hash: HashCache,
    kind: PhantomData<K>,
}

impl<K: PrimitiveKind> Primitive<K> {
    /// A primitive holding `value`, with no id or extensions.
    pub fn of(value: impl Into<K::Value>) -> Self {
        Self::from_parts(ElementBase::default(), Some(value.into()))
    }

    pub fn builder() -> PrimitiveBuilder<K> {
        PrimitiveBuilder::default()
    }

    pub fn to_builder(&self) -> PrimitiveBuilder<K> {
        PrimitiveBuilder {
            element: ElementBaseBuilder::from_base(&self.element),
            value: self.value.clone(),
        }
    }

    fn from_parts(element: ElementBase, value: Option<K::Value>) -> Self {
        Self {
            element,
            value,
            hash: HashCache::default(),
            kind: PhantomData,
        }
    }

    pub fn value(&self) -> Option<&K::Value> {
        self.value.as_ref()
    }

    pub fn id(&self) -> Option<&str> {
        self.element.id()
    }

    pub fn extension(&self) -> &[Arc<Extension>] {
        self.element.extension()
    }

    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    pub fn hash_code(&self) -> u64 {
        self.hash.get_or_compute(|| {
            let mut hasher = rustc_hash::FxHasher::default();
            self.element.hash(&mut hasher);
            self.value.hash(&mut hasher);
            std::hash::Hasher::finish(&hasher)
        })
    }
}

impl<K: PrimitiveKind<Value = String>> Primitive<K> {
    pub fn as_str(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl<K: PrimitiveKind> Clone for Primitive<K> {
    fn clone(&self) -> Self {
        Self {
            element: self.element.clone(),
            value: self.value.clone(),
            hash: self.hash.clone(),
            kind: PhantomData,
        }
    }
}

impl<K: PrimitiveKind> PartialEq for Primitive<K> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && self.element == other.element
    }
}

impl<K: PrimitiveKind> Eq for Primitive<K> {}

impl<K: PrimitiveKind> Hash for Primitive<K> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_code());
    }
}

impl<K: PrimitiveKind> fmt::Debug for Primitive<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct(K::DATA_TYPE.name());
        if let Some(id) = self.element.id() {
            debug.field("id", &id);
        }
        if !self.element.extension().is_empty() {
            debug.field("extension", &self.element.extension());
        }
        debug.field("value", &self.value).finish()
    }
}

impl<K: PrimitiveKind> Validate for Primitive<K> {
    fn validate(&self, ctx: &mut ValidationContext<'_>) -> Result<()> {
        self.element.validate(ctx)?;
        if let Some(value) = &self.value
            && ctx.config().check_value_syntax
            && let Err(reason) = K::check_value(value)
        {
            return Err(ctx.invalid_value(K::DATA_TYPE, value.to_string(), reason));
        }
        ctx.require_value_or_children(self)
    }
}

impl<K: PrimitiveKind> Visitable for Primitive<K> {
    fn accept<V: Visitor + ?Sized>(&self, name: &str, index: Option<usize>, visitor: &mut V) {
        walk(K::node_ref(self), name, index, visitor, |visitor| {
            self.element.accept_fields(visitor)
        });
    }
}

impl<K: PrimitiveKind> ModelNode for Primitive<K> {
    fn descriptor(&self) -> &'static TypeDescriptor {
        K::descriptor()
    }

    fn node_ref(&self) -> NodeRef<'_> {
        K::node_ref(self)
    }

    fn has_content(&self) -> bool {
        self.value.is_some() || self.element.has_content()
    }

    fn data_type(&self) -> DataType {
        K::DATA_TYPE
    }

    fn coded(&self) -> Option<CodedValue<'_>> {
        self.value.as_ref().and_then(K::coded)
    }

    fn id(&self) -> Option<&str> {
        self.element.id()
    }

    fn extension(&self) -> &[Arc<Extension>] {
        self.element.extension()
    }
}

/// Staged [`Primitive`].
pub struct PrimitiveBuilder<K: PrimitiveKind> {
    element: ElementBaseBuilder,
    value: Option<K::Value>,
}

impl<K: PrimitiveKind> Default for PrimitiveBuilder<K> {
    fn default() -> Self {
        Self {
            element: ElementBaseBuilder::default(),
            value: None,
        }
    }
}

impl<K: PrimitiveKind> fmt::Debug for PrimitiveBuilder<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrimitiveBuilder")
            .field("element", &self.element)
            .field("value", &self.value)
            .finish()
    }
}

impl<K: PrimitiveKind> PrimitiveBuilder<K> {
    pub fn value(mut self, value: impl Into<K::Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn clear_value(mut self) -> Self {
        self.value = None;
        self
    }
}

impl<K: PrimitiveKind> ElementBuilder for PrimitiveBuilder<K> {
    fn element_base(&mut self) -> &mut ElementBaseBuilder {
        &mut self.element
    }
}

impl<K: PrimitiveKind> Builder for PrimitiveBuilder<K> {
    type Output = Primitive<K>;

    fn freeze(self) -> Primitive<K> {
        Primitive::from_parts(self.element.freeze(), self.value)
    }
}

impl<K: PrimitiveKind> Buildable for Primitive<K> {
    type Builder = PrimitiveBuilder<K>;

    fn builder() -> PrimitiveBuilder<K> {
        PrimitiveBuilder::default()
    }

    fn to_builder(&self) -> PrimitiveBuilder<K> {
        Primitive::to_builder(self)
    }
}

macro_rules! primitive_from {
    ($alias:ident: $($source:ty),+) => {
        $(
            impl From<$source> for $alias {
                fn from(value: $source) -> Self {
                    Self::of(value)
                }
            }
        )+
    };
}

primitive_from!(FhirBoolean: bool);
primitive_from!(FhirInteger: i32);
primitive_from!(UnsignedInt: u32);
primitive_from!(FhirDecimal: Decimal);
primitive_from!(FhirDateTime: DateTimeValue, DateTime<FixedOffset>, NaiveDate);
primitive_from!(FhirString: String, &str);
primitive_from!(Code: String, &str);
primitive_from!(Uri: String, &str);
primitive_from!(Canonical: String, &str);
primitive_from!(Markdown: String, &str);

//! Terminology binding support for coded fields.
//!
//! Coded fields may declare a binding to a value set. Only `required`
//! bindings are enforced, and only when a [`BindingResolver`] is wired into
//! the [`ModelConfig`](crate::ModelConfig) used to build. Weaker strengths
//! are informational.
//!
//! # Example
//!
//! ```
//! use octofhir_fhir_resources::terminology::{
//!     BindingResolver, CacheConfig, CachedBindingResolver, InMemoryBindingResolver, Membership,
//! };
//! use std::sync::Arc;
//!
//! let mut resolver = InMemoryBindingResolver::new();
//! resolver.add_code("http://example.org/vs", "ABC", None);
//!
//! let cached = CachedBindingResolver::new(Arc::new(resolver), CacheConfig::default());
//! assert_eq!(cached.resolve("http://example.org/vs", None, "ABC"), Membership::Member);
//! ```

use moka::sync::Cache;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

/// FHIR binding strength levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingStrength {
    /// Code MUST be from the value set
    Required,
    /// Code SHOULD be from the value set, but others allowed with text
    Extensible,
    /// Code SHOULD be from the value set for interoperability
    Preferred,
    /// Value set is just an example
    Example,
}

impl BindingStrength {
    /// Parse binding strength from string
    pub fn parse_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "required" => Some(BindingStrength::Required),
            "extensible" => Some(BindingStrength::Extensible),
            "preferred" => Some(BindingStrength::Preferred),
            "example" => Some(BindingStrength::Example),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BindingStrength::Required => "required",
            BindingStrength::Extensible => "extensible",
            BindingStrength::Preferred => "preferred",
            BindingStrength::Example => "example",
        }
    }

    /// Whether a non-member code blocks construction
    pub fn is_error_on_failure(&self) -> bool {
        matches!(self, BindingStrength::Required)
    }
}

impl std::fmt::Display for BindingStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Answer of a resolver for one code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Membership {
    Member,
    NotMember,
    /// The resolver cannot tell (unknown value set, service unavailable, ...)
    Unknown,
}

/// A coding system and code pair borrowed from a model node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodingRef<'a> {
    pub system: Option<&'a str>,
    pub code: &'a str,
}

/// The coded content of a node, as seen by binding checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodedValue<'a> {
    /// A bare `code` primitive; its system is implied by the binding
    Code(&'a str),
    Coding(CodingRef<'a>),
    /// The codings of a CodeableConcept that carry a code
    Concept(Vec<CodingRef<'a>>),
}

impl CodedValue<'_> {
    /// Ask `resolver` whether this value is in `value_set`. A concept is a
    /// member as soon as one of its codings is.
    pub fn resolve(
        &self,
        resolver: &dyn BindingResolver,
        value_set: &str,
        implied_system: Option<&str>,
    ) -> Membership {
        match self {
            CodedValue::Code(code) => resolver.resolve(value_set, implied_system, code),
            CodedValue::Coding(coding) => {
                resolver.resolve(value_set, coding.system.or(implied_system), coding.code)
            }
            CodedValue::Concept(codings) => {
                let mut unknown = false;
                for coding in codings {
                    match resolver.resolve(value_set, coding.system.or(implied_system), coding.code)
                    {
                        Membership::Member => return Membership::Member,
                        Membership::Unknown => unknown = true,
                        Membership::NotMember => {}
                    }
                }
                if unknown {
                    Membership::Unknown
                } else {
                    Membership::NotMember
                }
            }
        }
    }

    /// The code(s) for error reporting
    pub fn codes(&self) -> String {
        match self {
            CodedValue::Code(code) => code.to_string(),
            CodedValue::Coding(coding) => coding.code.to_string(),
            CodedValue::Concept(codings) => codings
                .iter()
                .map(|c| c.code)
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

static CODE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s]+( [^\s]+)*$").expect("valid code pattern"));

/// Lexical rule for FHIR `code` values: no leading, trailing or repeated
/// whitespace, and not empty.
pub fn is_valid_code(code: &str) -> bool {
    CODE_PATTERN.is_match(code)
}

/// Strip a `|version` suffix from a canonical reference.
pub fn canonical_without_version(canonical: &str) -> &str {
    canonical
        .split_once('|')
        .map_or(canonical, |(url, _version)| url)
}

/// Pluggable value-set membership check.
///
/// Only consulted for `required` bindings, synchronously, while a builder is
/// frozen. I/O, caching and network behavior are up to the implementation.
pub trait BindingResolver: Send + Sync + std::fmt::Debug {
    /// Is `code` (from `system`, when known) a member of `value_set`?
    fn resolve(&self, value_set: &str, system: Option<&str>, code: &str) -> Membership;
}

/// A simple in-memory resolver.
///
/// Maintains a map of value sets to member codes. Lookups ignore any
/// `|version` suffix on the value set reference; a value set it has never
/// heard of resolves to [`Membership::Unknown`].
#[derive(Debug, Default, Clone)]
pub struct InMemoryBindingResolver {
    value_sets: HashMap<String, HashSet<(String, Option<String>)>>,
}

impl InMemoryBindingResolver {
    /// Create a new empty resolver
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver preloaded with the value sets bound by the bundled record types.
    pub fn with_core_value_sets() -> Self {
        let mut resolver = Self::new();
        for (value_set, system, codes) in CORE_VALUE_SETS {
            for code in *codes {
                resolver.add_code(value_set, code, Some(*system));
            }
        }
        resolver
    }

    /// Add a code to a value set
    pub fn add_code(&mut self, value_set: &str, code: &str, system: Option<&str>) {
        self.value_sets
            .entry(canonical_without_version(value_set).to_string())
            .or_default()
            .insert((code.to_string(), system.map(str::to_string)));
    }

    /// Add multiple codes to a value set
    pub fn add_codes(&mut self, value_set: &str, codes: &[(&str, Option<&str>)]) {
        for (code, system) in codes {
            self.add_code(value_set, code, *system);
        }
    }

    pub fn contains_value_set(&self, value_set: &str) -> bool {
        self.value_sets
            .contains_key(canonical_without_version(value_set))
    }
}

impl BindingResolver for InMemoryBindingResolver {
    fn resolve(&self, value_set: &str, system: Option<&str>, code: &str) -> Membership {
        let Some(members) = self.value_sets.get(canonical_without_version(value_set)) else {
            return Membership::Unknown;
        };

        let exact = (code.to_string(), system.map(str::to_string));
        if members.contains(&exact) {
            return Membership::Member;
        }

        // Loose matching: a code without a system matches any system, and a
        // code registered without a system matches any input system
        let loose = match system {
            None => members.iter().any(|(c, _)| c == code),
            Some(_) => members.contains(&(code.to_string(), None)),
        };

        if loose {
            Membership::Member
        } else {
            Membership::NotMember
        }
    }
}

/// Configuration for the resolver cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Time-to-live for cached answers
    pub ttl: Duration,
    /// Maximum number of entries in the cache
    pub max_size: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(3600), // 1 hour
            max_size: 10_000,
        }
    }
}

impl CacheConfig {
    pub fn new(ttl: Duration, max_size: u64) -> Self {
        Self { ttl, max_size }
    }

    /// Short-lived caches (5 minutes)
    pub fn short_lived() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            max_size: 1_000,
        }
    }

    /// Long-lived caches (24 hours)
    pub fn long_lived() -> Self {
        Self {
            ttl: Duration::from_secs(86400),
            max_size: 50_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    value_set: String,
    system: Option<String>,
    code: String,
}

/// Statistics about the cache
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub entry_count: u64,
    pub weighted_size: u64,
}

/// A caching wrapper around any [`BindingResolver`].
///
/// Definite answers are cached with TTL-based eviction; `Unknown` is never
/// cached so a temporarily unavailable backend is asked again.
pub struct CachedBindingResolver {
    inner: Arc<dyn BindingResolver>,
    cache: Cache<CacheKey, Membership>,
}

impl CachedBindingResolver {
    pub fn new(inner: Arc<dyn BindingResolver>, config: CacheConfig) -> Self {
        let cache = Cache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_size)
            .build();

        Self { inner, cache }
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.run_pending_tasks();
        CacheStats {
            entry_count: self.cache.entry_count(),
            weighted_size: self.cache.weighted_size(),
        }
    }

    pub fn clear_cache(&self) {
        self.cache.invalidate_all();
    }
}

impl std::fmt::Debug for CachedBindingResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedBindingResolver")
            .field("inner", &self.inner)
            .field("entry_count", &self.cache.entry_count())
            .finish()
    }
}

impl BindingResolver for CachedBindingResolver {
    fn resolve(&self, value_set: &str, system: Option<&str>, code: &str) -> Membership {
        let key = CacheKey {
            value_set: value_set.to_string(),
            system: system.map(str::to_string),
            code: code.to_string(),
        };

        if let Some(membership) = self.cache.get(&key) {
            tracing::debug!(value_set, code, "binding resolver cache hit");
            return membership;
        }

        let membership = self.inner.resolve(value_set, system, code);
        if membership != Membership::Unknown {
            self.cache.insert(key, membership);
        }
        membership
    }
}

const PUBLICATION_STATUS: &str = "http://hl7.org/fhir/ValueSet/publication-status";
const CONTENT_MODE: &str = "http://hl7.org/fhir/ValueSet/codesystem-content-mode";
const HIERARCHY_MEANING: &str = "http://hl7.org/fhir/ValueSet/codesystem-hierarchy-meaning";
const FILTER_OPERATOR: &str = "http://hl7.org/fhir/ValueSet/filter-operator";
const PROPERTY_TYPE: &str = "http://hl7.org/fhir/ValueSet/concept-property-type";

type CoreValueSet = (&'static str, &'static str, &'static [&'static str]);

static CORE_VALUE_SETS: &[CoreValueSet] = &[
    (
        PUBLICATION_STATUS,
        "http://hl7.org/fhir/publication-status",
        &["draft", "active", "retired", "unknown"],
    ),
    (
        CONTENT_MODE,
        "http://hl7.org/fhir/codesystem-content-mode",
        &["not-present", "example", "fragment", "complete", "supplement"],
    ),
    (
        HIERARCHY_MEANING,
        "http://hl7.org/fhir/codesystem-hierarchy-meaning",
        &["grouped-by", "is-a", "part-of", "classified-with"],
    ),
    (
        FILTER_OPERATOR,
        "http://hl7.org/fhir/filter-operator",
        &[
            "=",
            "is-a",
            "descendent-of",
            "is-not-a",
            "regex",
            "in",
            "not-in",
            "generalizes",
            "child-of",
            "descendent-leaf",
            "exists",
        ],
    ),
    (
        PROPERTY_TYPE,
        "http://hl7.org/fhir/concept-property-type",
        &[
            "code", "Coding", "string", "integer", "boolean", "dateTime", "decimal",
        ],
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_resolver() {
        let mut resolver = InMemoryBindingResolver::new();
        resolver.add_code(
            "http://example.org/vs/gender",
            "male",
            Some("http://hl7.org/fhir/administrative-gender"),
        );
        resolver.add_code(
            "http://example.org/vs/gender",
            "female",
            Some("http://hl7.org/fhir/administrative-gender"),
        );

        assert_eq!(
            resolver.resolve(
                "http://example.org/vs/gender",
                Some("http://hl7.org/fhir/administrative-gender"),
                "male"
            ),
            Membership::Member
        );
        assert_eq!(
            resolver.resolve(
                "http://example.org/vs/gender",
                Some("http://hl7.org/fhir/administrative-gender"),
                "unknown"
            ),
            Membership::NotMember
        );
        // Loose match without a system
        assert_eq!(
            resolver.resolve("http://example.org/vs/gender", None, "female"),
            Membership::Member
        );
        assert_eq!(
            resolver.resolve("http://example.org/vs/other", None, "female"),
            Membership::Unknown
        );
    }

    #[test]
    fn test_version_suffix_is_ignored() {
        let resolver = InMemoryBindingResolver::with_core_value_sets();
        assert_eq!(
            resolver.resolve(
                "http://hl7.org/fhir/ValueSet/publication-status|5.0.0",
                None,
                "active"
            ),
            Membership::Member
        );
        assert_eq!(
            resolver.resolve(
                "http://hl7.org/fhir/ValueSet/publication-status|5.0.0",
                None,
                "published"
            ),
            Membership::NotMember
        );
    }

    #[test]
    fn test_cached_resolver() {
        let mut inner = InMemoryBindingResolver::new();
        inner.add_code("http://example.org/vs", "ABC", None);

        let cached = CachedBindingResolver::new(
            Arc::new(inner),
            CacheConfig::new(Duration::from_secs(60), 100),
        );

        assert_eq!(
            cached.resolve("http://example.org/vs", None, "ABC"),
            Membership::Member
        );
        assert_eq!(
            cached.resolve("http://example.org/vs", None, "ABC"),
            Membership::Member
        );
        // Unknown answers are not cached
        assert_eq!(
            cached.resolve("http://example.org/missing", None, "ABC"),
            Membership::Unknown
        );

        assert_eq!(cached.cache_stats().entry_count, 1);
        cached.clear_cache();
        assert_eq!(cached.cache_stats().entry_count, 0);
    }

    #[test]
    fn test_binding_strength() {
        assert_eq!(
            BindingStrength::parse_str("required"),
            Some(BindingStrength::Required)
        );
        assert_eq!(
            BindingStrength::parse_str("EXTENSIBLE"),
            Some(BindingStrength::Extensible)
        );
        assert!(BindingStrength::Required.is_error_on_failure());
        assert!(!BindingStrength::Preferred.is_error_on_failure());
        assert_eq!(BindingStrength::Example.to_string(), "example");
    }

    #[test]
    fn test_code_syntax() {
        assert!(is_valid_code("active"));
        assert!(is_valid_code("is a"));
        assert!(!is_valid_code(""));
        assert!(!is_valid_code(" active"));
        assert!(!is_valid_code("is  a"));
        assert!(!is_valid_code("active\n"));
    }

    #[test]
    fn test_concept_membership_needs_one_member() {
        let mut resolver = InMemoryBindingResolver::new();
        resolver.add_code("http://example.org/vs", "A", Some("http://example.org/cs"));

        let concept = CodedValue::Concept(vec![
            CodingRef {
                system: Some("http://example.org/other"),
                code: "X",
            },
            CodingRef {
                system: Some("http://example.org/cs"),
                code: "A",
            },
        ]);
        assert_eq!(
            concept.resolve(&resolver, "http://example.org/vs", None),
            Membership::Member
        );

        let outsider = CodedValue::Concept(vec![CodingRef {
            system: Some("http://example.org/cs"),
            code: "B",
        }]);
        assert_eq!(
            outsider.resolve(&resolver, "http://example.org/vs", None),
            Membership::NotMember
        );
        assert_eq!(outsider.codes(), "B");
    }
}

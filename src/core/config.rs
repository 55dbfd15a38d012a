use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::terminology::BindingResolver;

/// Settings applied when a builder is frozen.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Run the validation engine on freeze
    pub validating: bool,
    /// Check lexical rules of primitive values (code syntax, empty strings, ...)
    pub check_value_syntax: bool,
    /// Accept elements with no value, children or extensions
    pub permit_empty_elements: bool,
    /// Membership oracle for required bindings; the check is skipped without one
    #[serde(skip)]
    pub resolver: Option<Arc<dyn BindingResolver>>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            validating: true,
            check_value_syntax: true,
            permit_empty_elements: false,
            resolver: None,
        }
    }
}

impl ModelConfig {
    /// Snapshot-only freezing, for partial or bulk-loaded trees.
    pub fn non_validating() -> Self {
        Self {
            validating: false,
            ..Default::default()
        }
    }

    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.validating = enabled;
        self
    }

    pub fn with_value_syntax_checks(mut self, enabled: bool) -> Self {
        self.check_value_syntax = enabled;
        self
    }

    pub fn with_empty_elements(mut self, permitted: bool) -> Self {
        self.permit_empty_elements = permitted;
        self
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn BindingResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn resolver(&self) -> Option<&dyn BindingResolver> {
        self.resolver.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminology::InMemoryBindingResolver;

    #[test]
    fn test_default_config() {
        let config = ModelConfig::default();
        assert!(config.validating);
        assert!(config.check_value_syntax);
        assert!(!config.permit_empty_elements);
        assert!(config.resolver().is_none());
    }

    #[test]
    fn test_builder_methods() {
        let config = ModelConfig::non_validating()
            .with_empty_elements(true)
            .with_resolver(Arc::new(InMemoryBindingResolver::new()));
        assert!(!config.validating);
        assert!(config.permit_empty_elements);
        assert!(config.resolver().is_some());
    }
}

//! Builder-then-freeze construction.
//!
//! A builder stages field values and is consumed by exactly one freeze.
//! Freezing snapshots every staged list into an immutable shared slice and,
//! unless validation is disabled, runs the validation engine on the result.
//! Nothing from a rejected freeze is observable.

use crate::core::ModelConfig;
use crate::error::Result;
use crate::types::ModelNode;
use crate::validation::check_frozen;

/// Mutable staging for one model type.
pub trait Builder: Sized {
    type Output: ModelNode;

    /// Snapshot the staged fields without running validation.
    #[doc(hidden)]
    fn freeze(self) -> Self::Output;

    /// Freeze and validate with the default configuration.
    fn build(self) -> Result<Self::Output> {
        self.build_with(&ModelConfig::default())
    }

    /// Freeze, validating according to `config`.
    fn build_with(self, config: &ModelConfig) -> Result<Self::Output> {
        check_frozen(self.freeze(), config)
    }

    /// Freeze without validation, for partial or bulk-loaded trees.
    fn build_unvalidated(self) -> Self::Output {
        self.freeze()
    }
}

/// A frozen type that can be staged again.
pub trait Buildable: ModelNode {
    type Builder: Builder<Output = Self>;

    fn builder() -> Self::Builder;

    /// A builder pre-populated from this instance. Nested nodes are shared,
    /// not copied.
    fn to_builder(&self) -> Self::Builder;
}

//! Structural validation of frozen model trees.
//!
//! Validation runs once per freeze. Every type checks its role base first
//! and its own fields after, in declaration order; the first violated rule
//! aborts the pass and is returned as the single [`ModelError`].

mod context;

pub use context::{FieldSlot, ValidationContext};

use tracing::{debug, trace};

use crate::core::ModelConfig;
use crate::error::{ModelError, Result};
use crate::types::ModelNode;

/// Structural rules of one type.
pub trait Validate {
    fn validate(&self, ctx: &mut ValidationContext<'_>) -> Result<()>;
}

/// Validate a frozen tree, e.g. one produced by
/// [`build_unvalidated`](crate::Builder::build_unvalidated).
pub fn validate<T: ModelNode>(node: &T, config: &ModelConfig) -> Result<()> {
    let mut ctx = ValidationContext::new(config, node.type_name());
    match node.validate(&mut ctx) {
        Ok(()) => {
            trace!(type_name = node.type_name(), "model node validated");
            Ok(())
        }
        Err(err) => {
            log_rejection(node.type_name(), &err);
            Err(err)
        }
    }
}

pub(crate) fn check_frozen<T: ModelNode>(node: T, config: &ModelConfig) -> Result<T> {
    if config.validating {
        validate(&node, config)?;
    }
    Ok(node)
}

fn log_rejection(type_name: &str, err: &ModelError) {
    debug!(
        type_name,
        code = %err.code(),
        field = err.field(),
        path = err.path(),
        "model node rejected"
    );
}

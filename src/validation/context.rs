use std::fmt::Write as _;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::core::ModelConfig;
use crate::error::{ModelError, Result};
use crate::terminology::Membership;
use crate::types::descriptor::{BindingDescriptor, Cardinality, FieldDescriptor};
use crate::types::{DataType, ModelNode};


/// State carried through one validation pass: the active configuration and
/// the path from the root to the node being checked.
#[derive(Debug)]
pub struct ValidationContext<'a> {
    config: &'a ModelConfig,
    root: &'static str,
    path_stack: Vec<(&'static str, Option<usize>)>,
}

impl<'a> ValidationContext<'a> {
    pub fn new(config: &'a ModelConfig, root: &'static str) -> Self {
        Self {
            config,
            root,
            path_stack: Vec::new(),
        }
    }

    pub fn config(&self) -> &ModelConfig {
        self.config
    }

    /// Dotted path of the node being checked, e.g. `CodeSystem.concept[0].concept[1]`.
    pub fn current_path(&self) -> String {
        let mut path = self.root.to_string();
        for (name, index) in &self.path_stack {
            path.push('.');
            path.push_str(name);
            if let Some(index) = index {
                let _ = write!(path, "[{index}]");
            }
        }
        path
    }

    fn child_path(&self, name: &str) -> String {
        format!("{}.{}", self.current_path(), name)
    }

    /// Check one declared field of the current node: cardinality first, then
    /// every present value in order.
    pub fn check_field<S>(&mut self, field: &'static FieldDescriptor, slot: &S) -> Result<()>
    where
        S: FieldSlot + ?Sized,
    {
        if slot.is_empty() {
            return match field.cardinality {
                Cardinality::Required => Err(self.missing_field(field)),
                Cardinality::RequiredNonEmpty => Err(ModelError::EmptyRequiredList {
                    field: field.name,
                    path: self.child_path(field.name),
                }),
                Cardinality::Optional | Cardinality::Repeated => Ok(()),
            };
        }
        slot.check_each(field, self)
    }

    /// Check a single present value of `field`, at `index` for list elements.
    pub fn check_value<T: ModelNode>(
        &mut self,
        field: &'static FieldDescriptor,
        index: Option<usize>,
        value: &T,
    ) -> Result<()> {
        self.path_stack.push((field.name, index));
        let result = self.check_value_in_place(field, value);
        self.path_stack.pop();
        result
    }

    fn check_value_in_place<T: ModelNode>(
        &mut self,
        field: &'static FieldDescriptor,
        value: &T,
    ) -> Result<()> {
        if field.is_choice() {
            let actual = value.data_type();
            if !field.allows(actual) {
                return Err(ModelError::InvalidChoiceType {
                    field: field.name,
                    actual,
                    allowed: field.types,
                    path: self.current_path(),
                });
            }
        }

        value.validate(self)?;

        if let Some(binding) = &field.binding {
            self.check_binding(field, binding, value)?;
        }
        Ok(())
    }

    fn check_binding<T: ModelNode>(
        &self,
        field: &'static FieldDescriptor,
        binding: &BindingDescriptor,
        value: &T,
    ) -> Result<()> {
        let Some(coded) = value.coded() else {
            return Ok(());
        };

        if !binding.strength.is_error_on_failure() {
            trace!(
                field = field.name,
                strength = %binding.strength,
                value_set = binding.value_set,
                "binding is advisory, not enforced"
            );
            return Ok(());
        }

        let Some(resolver) = self.config.resolver() else {
            debug!(
                field = field.name,
                value_set = binding.value_set,
                "no binding resolver configured, required binding check skipped"
            );
            return Ok(());
        };

        match coded.resolve(resolver, binding.value_set, binding.system) {
            Membership::Member => Ok(()),
            Membership::Unknown => {
                debug!(
                    field = field.name,
                    value_set = binding.value_set,
                    code = %coded.codes(),
                    "binding membership unknown, check skipped"
                );
                Ok(())
            }
            Membership::NotMember => Err(ModelError::UnresolvedBinding {
                field: field.name,
                code: coded.codes(),
                value_set: binding.value_set,
                path: self.current_path(),
            }),
        }
    }

    /// Reject an element that has no value, children or extensions, unless
    /// the configuration permits empty elements.
    pub fn require_value_or_children<N: ModelNode>(&self, node: &N) -> Result<()> {
        if node.kind().requires_content()
            && !node.has_content()
            && !self.config.permit_empty_elements
        {
            return Err(ModelError::EmptyLeafElement {
                type_name: node.type_name(),
                path: self.current_path(),
            });
        }
        Ok(())
    }

    pub fn missing_field(&self, field: &'static FieldDescriptor) -> ModelError {
        ModelError::MissingRequiredField {
            field: field.name,
            path: self.child_path(field.name),
        }
    }

    pub fn invalid_value(
        &self,
        data_type: DataType,
        value: String,
        reason: &'static str,
    ) -> ModelError {
        ModelError::InvalidValue {
            data_type,
            value,
            reason,
            path: self.current_path(),
        }
    }
}

/// Storage of one field on a frozen node: a single optional value or a list.
pub trait FieldSlot {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Validate every present value in stored order.
    fn check_each(
        &self,
        field: &'static FieldDescriptor,
        ctx: &mut ValidationContext<'_>,
    ) -> Result<()>;
}

impl<T: ModelNode> FieldSlot for Option<T> {
    fn len(&self) -> usize {
        usize::from(self.is_some())
    }

    fn check_each(
        &self,
        field: &'static FieldDescriptor,
        ctx: &mut ValidationContext<'_>,
    ) -> Result<()> {
        match self {
            Some(value) => ctx.check_value(field, None, value),
            None => Ok(()),
        }
    }
}

impl<T: ModelNode> FieldSlot for Arc<[Arc<T>]> {
    fn len(&self) -> usize {
        <[Arc<T>]>::len(self)
    }

    fn check_each(
        &self,
        field: &'static FieldDescriptor,
        ctx: &mut ValidationContext<'_>,
    ) -> Result<()> {
        for (index, value) in self.iter().enumerate() {
            ctx.check_value(field, Some(index), value.as_ref())?;
        }
        Ok(())
    }
}

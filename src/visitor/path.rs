use std::collections::HashSet;
use std::fmt::Write as _;

use crate::types::ModelNode;

use super::{NodeRef, Visitor};

#[derive(Debug, Default)]
struct PathStack {
    segments: Vec<String>,
}

impl PathStack {
    fn push(&mut self, name: &str, index: Option<usize>) {
        let mut segment = name.to_string();
        if let Some(index) = index {
            let _ = write!(segment, "[{index}]");
        }
        self.segments.push(segment);
    }

    fn pop(&mut self) {
        self.segments.pop();
    }

    fn current(&self) -> String {
        self.segments.join(".")
    }
}

/// Records the dotted path and type of every visited node, in visit order.
///
/// ```
/// use octofhir_fhir_resources::prelude::*;
/// use octofhir_fhir_resources::{CodeSystemConcept, PathVisitor};
///
/// let concept = CodeSystemConcept::builder()
///     .code("A")
///     .concept([CodeSystemConcept::builder().code("A.1").build().unwrap()])
///     .build()
///     .unwrap();
///
/// let mut paths = PathVisitor::new();
/// concept.walk(&mut paths);
/// assert!(paths.paths().contains(&"CodeSystem.concept.concept[0].code".to_string()));
/// ```
#[derive(Debug, Default)]
pub struct PathVisitor {
    stack: PathStack,
    visited: Vec<(String, &'static str)>,
}

impl PathVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(path, type name)` pairs
    pub fn visited(&self) -> &[(String, &'static str)] {
        &self.visited
    }

    pub fn paths(&self) -> Vec<String> {
        self.visited.iter().map(|(path, _)| path.clone()).collect()
    }

    pub fn into_visited(self) -> Vec<(String, &'static str)> {
        self.visited
    }
}

impl Visitor for PathVisitor {
    fn visit_start(&mut self, name: &str, index: Option<usize>, node: NodeRef<'_>) {
        self.stack.push(name, index);
        self.visited.push((self.stack.current(), node.type_name()));
    }

    fn visit_end(&mut self, _name: &str, _index: Option<usize>, _node: NodeRef<'_>) {
        self.stack.pop();
    }
}

struct ModifierExtensionScan<'u> {
    stack: PathStack,
    understood: HashSet<&'u str>,
    unknown: Vec<String>,
}

impl Visitor for ModifierExtensionScan<'_> {
    fn visit_start(&mut self, name: &str, index: Option<usize>, node: NodeRef<'_>) {
        self.stack.push(name, index);
        if name == "modifierExtension"
            && let NodeRef::Extension(extension) = node
            && !extension
                .url()
                .is_some_and(|url| self.understood.contains(url))
        {
            self.unknown.push(self.stack.current());
        }
    }

    fn visit(&mut self, name: &str, _index: Option<usize>, _node: NodeRef<'_>) -> bool {
        // Nested content of an extension cannot carry modifier extensions
        name != "modifierExtension"
    }

    fn visit_end(&mut self, _name: &str, _index: Option<usize>, _node: NodeRef<'_>) {
        self.stack.pop();
    }
}

/// Paths of modifier extensions in `node` whose URL is not in `understood`.
///
/// Modifier extensions change the meaning of the element that carries them,
/// so a consumer that finds any here must refuse the content rather than
/// drop the extensions.
pub fn unknown_modifier_extensions<N: ModelNode>(node: &N, understood: &[&str]) -> Vec<String> {
    let mut scan = ModifierExtensionScan {
        stack: PathStack::default(),
        understood: understood.iter().copied().collect(),
        unknown: Vec::new(),
    };
    node.walk(&mut scan);
    scan.unknown
}

mod common;

use common::*;
use octofhir_fhir_resources::prelude::*;
use octofhir_fhir_resources::*;

/// Records every callback as a readable event.
#[derive(Default)]
struct Recorder {
    events: Vec<String>,
    prune: Option<&'static str>,
    skip_code: Option<&'static str>,
}

fn label(name: &str, index: Option<usize>) -> String {
    match index {
        Some(index) => format!("{name}[{index}]"),
        None => name.to_string(),
    }
}

impl Visitor for Recorder {
    fn pre_visit(&mut self, node: NodeRef<'_>) -> bool {
        if let (Some(skip), NodeRef::CodeSystemConcept(concept)) = (self.skip_code, node)
            && concept.code().and_then(|c| c.as_str()) == Some(skip)
        {
            return false;
        }
        self.events.push(format!("pre {}", node.type_name()));
        true
    }

    fn visit_start(&mut self, name: &str, index: Option<usize>, _node: NodeRef<'_>) {
        self.events.push(format!("start {}", label(name, index)));
    }

    fn visit(&mut self, name: &str, index: Option<usize>, _node: NodeRef<'_>) -> bool {
        self.events.push(format!("visit {}", label(name, index)));
        self.prune != Some(name)
    }

    fn visit_end(&mut self, name: &str, index: Option<usize>, _node: NodeRef<'_>) {
        self.events.push(format!("end {}", label(name, index)));
    }

    fn post_visit(&mut self, node: NodeRef<'_>) {
        self.events.push(format!("post {}", node.type_name()));
    }
}

#[test]
fn test_callback_order_for_leaf() {
    let mut recorder = Recorder::default();
    concept("A").walk(&mut recorder);

    assert_eq!(
        recorder.events,
        [
            "pre CodeSystem.concept",
            "start CodeSystem.concept",
            "visit CodeSystem.concept",
            "pre code",
            "start code",
            "visit code",
            "end code",
            "post code",
            "end CodeSystem.concept",
            "post CodeSystem.concept",
        ]
    );
}

#[test]
fn test_depth_first_declaration_order() {
    let mut paths = PathVisitor::new();
    create_test_code_system().walk(&mut paths);

    assert_eq!(
        paths.paths(),
        [
            "CodeSystem",
            "CodeSystem.status",
            "CodeSystem.content",
            "CodeSystem.concept[0]",
            "CodeSystem.concept[0].code",
            "CodeSystem.concept[0].display",
            "CodeSystem.concept[0].concept[0]",
            "CodeSystem.concept[0].concept[0].code",
        ]
    );
    assert_eq!(paths.visited()[3].1, "CodeSystem.concept");
}

#[test]
fn test_visit_false_prunes_children_only() {
    let mut recorder = Recorder {
        prune: Some("concept"),
        ..Default::default()
    };
    create_test_code_system().walk(&mut recorder);

    let events = recorder.events;
    assert!(events.contains(&"start concept[0]".to_string()));
    assert!(events.contains(&"end concept[0]".to_string()));
    assert!(!events.contains(&"start display".to_string()));
    assert_eq!(events.iter().filter(|e| e.starts_with("start code")).count(), 0);
}

#[test]
fn test_pre_visit_false_skips_subtree() {
    let mut recorder = Recorder {
        skip_code: Some("A.1"),
        ..Default::default()
    };
    create_hierarchy().walk(&mut recorder);

    let starts: Vec<_> = recorder
        .events
        .iter()
        .filter(|e| e.starts_with("start"))
        .collect();
    assert_eq!(
        starts,
        ["start CodeSystem.concept", "start code", "start display"]
    );
    // No callback of any kind for the skipped node
    assert_eq!(
        recorder.events.iter().filter(|e| e.contains("concept[0]")).count(),
        0
    );
}

#[test]
fn test_traversal_is_deterministic() {
    let code_system = create_full_code_system();

    let mut first = Recorder::default();
    code_system.walk(&mut first);
    let mut second = Recorder::default();
    code_system.walk(&mut second);

    assert_eq!(first.events, second.events);
}

#[test]
fn test_choice_values_are_walked_as_their_type() {
    let mut paths = PathVisitor::new();
    create_full_code_system().walk(&mut paths);

    let visited = paths.into_visited();
    let version_algorithm = visited
        .iter()
        .find(|(path, _)| path == "CodeSystem.versionAlgorithm")
        .unwrap();
    assert_eq!(version_algorithm.1, "Coding");

    let property_value = visited
        .iter()
        .find(|(path, _)| path == "CodeSystem.concept[0].property[0].value")
        .unwrap();
    assert_eq!(property_value.1, "string");
}

#[test]
fn test_default_visitor_walks_everything() {
    struct Counter(usize);

    impl Visitor for Counter {
        fn visit_start(&mut self, _name: &str, _index: Option<usize>, _node: NodeRef<'_>) {
            self.0 += 1;
        }
    }

    let mut counter = Counter(0);
    create_test_code_system().walk(&mut counter);
    assert_eq!(counter.0, 8);
}

#[test]
fn test_node_ref_identity() {
    let code_system = create_test_code_system();
    let a = code_system.concept()[0].node_ref();
    let b = code_system.concept()[0].node_ref();
    assert!(a.ptr_eq(&b));
    assert!(!a.ptr_eq(&code_system.node_ref()));
    assert_eq!(a.kind(), NodeKind::BackboneElement);
}

#[test]
fn test_unknown_modifier_extensions() {
    let flagged = CodeSystemConcept::builder()
        .code("A")
        .modifier_extension([Extension::builder()
            .url("http://example.org/fhir/StructureDefinition/negated")
            .value(true)
            .build()
            .unwrap()])
        .build()
        .unwrap();
    let code_system = CodeSystem::builder()
        .status("active")
        .content("complete")
        .concept([concept("B"), flagged])
        .build()
        .unwrap();

    assert_eq!(
        unknown_modifier_extensions(&code_system, &[]),
        ["CodeSystem.concept[1].modifierExtension[0]"]
    );
    assert!(
        unknown_modifier_extensions(
            &code_system,
            &["http://example.org/fhir/StructureDefinition/negated"]
        )
        .is_empty()
    );
}

/// Writes array brackets the way a JSON generator would.
#[derive(Default)]
struct ArrayWriter(Vec<String>);

impl Visitor for ArrayWriter {
    fn visit_start(&mut self, name: &str, index: Option<usize>, _node: NodeRef<'_>) {
        self.0.push(label(name, index));
    }

    fn visit_list_start(&mut self, name: &str, len: usize, data_type: DataType) {
        self.0.push(format!("[ {name} x{len} {data_type}"));
    }

    fn visit_list_end(&mut self, name: &str, _len: usize, _data_type: DataType) {
        self.0.push(format!("] {name}"));
    }
}

#[test]
fn test_list_fields_are_bracketed() {
    let mut writer = ArrayWriter::default();
    create_hierarchy().walk(&mut writer);
    assert_eq!(
        writer.0,
        [
            "CodeSystem.concept",
            "code",
            "display",
            "[ concept x1 BackboneElement",
            "concept[0]",
            "code",
            "] concept",
        ]
    );

    let filter = CodeSystemFilter::builder()
        .code("concept")
        .operator(["=", "is-a"])
        .value("x")
        .build()
        .unwrap();
    let mut writer = ArrayWriter::default();
    filter.walk(&mut writer);
    assert_eq!(
        writer.0,
        [
            "CodeSystem.filter",
            "code",
            "[ operator x2 code",
            "operator[0]",
            "operator[1]",
            "] operator",
            "value",
        ]
    );
}

#[test]
fn test_pruned_node_opens_no_lists() {
    struct PruneConcepts(ArrayWriter);

    impl Visitor for PruneConcepts {
        fn visit(&mut self, name: &str, _index: Option<usize>, _node: NodeRef<'_>) -> bool {
            name != "CodeSystem.concept"
        }

        fn visit_list_start(&mut self, name: &str, len: usize, data_type: DataType) {
            self.0.visit_list_start(name, len, data_type);
        }
    }

    let mut visitor = PruneConcepts(ArrayWriter::default());
    create_hierarchy().walk(&mut visitor);
    assert!(visitor.0.0.is_empty());
}

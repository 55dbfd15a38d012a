use octofhir_fhir_resources::prelude::*;
use octofhir_fhir_resources::*;
use proptest::prelude::*;

fn code_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9.-]{1,12}( [A-Za-z0-9.-]{1,6}){0,2}"
}

fn concept_tree() -> impl Strategy<Value = CodeSystemConcept> {
    let leaf = (code_strategy(), proptest::option::of("[a-z ]{1,20}")).prop_map(
        |(code, display)| {
            let mut builder = CodeSystemConcept::builder().code(code);
            if let Some(display) = display.filter(|d| !d.trim().is_empty()) {
                builder = builder.display(display.trim().to_string());
            }
            builder.build().unwrap()
        },
    );

    leaf.prop_recursive(3, 24, 4, |inner| {
        (code_strategy(), prop::collection::vec(inner, 0..4)).prop_map(|(code, children)| {
            CodeSystemConcept::builder()
                .code(code)
                .concept(children)
                .build()
                .unwrap()
        })
    })
}

#[derive(Default)]
struct Trace(Vec<(String, Option<usize>)>);

impl Visitor for Trace {
    fn visit_start(&mut self, name: &str, index: Option<usize>, _node: NodeRef<'_>) {
        self.0.push((name.to_string(), index));
    }
}

proptest! {
    #[test]
    fn prop_to_builder_round_trip(concept in concept_tree()) {
        let rebuilt = concept.to_builder().build().unwrap();
        prop_assert_eq!(&rebuilt, &concept);
        prop_assert_eq!(rebuilt.hash_code(), concept.hash_code());
    }

    #[test]
    fn prop_traversal_is_deterministic(concept in concept_tree()) {
        let mut first = Trace::default();
        concept.walk(&mut first);
        let mut second = Trace::default();
        concept.walk(&mut second);
        prop_assert_eq!(first.0, second.0);
    }

    #[test]
    fn prop_every_node_is_visited_once(concept in concept_tree()) {
        fn count(concept: &CodeSystemConcept) -> usize {
            let own = 2 + usize::from(concept.display().is_some());
            own + concept.concept().iter().map(|child| count(child)).sum::<usize>()
        }

        let mut trace = Trace::default();
        concept.walk(&mut trace);
        prop_assert_eq!(trace.0.len(), count(&concept));
    }

    #[test]
    fn prop_padded_codes_are_rejected(code in code_strategy()) {
        let padded = format!("{code} ");
        let err = CodeSystemConcept::builder().code(padded).build().unwrap_err();
        prop_assert_eq!(err.code(), ModelErrorCode::InvalidValue);
    }

    #[test]
    fn prop_appending_preserves_order(codes in prop::collection::vec(code_strategy(), 1..8)) {
        let mut builder = CodeSystemFilter::builder().code("concept").value("x");
        for code in &codes {
            builder = builder.operator([code.as_str()]);
        }
        let filter = builder.build().unwrap();
        let stored: Vec<_> = filter.operator().iter().filter_map(|c| c.as_str()).collect();
        prop_assert_eq!(stored, codes.iter().map(String::as_str).collect::<Vec<_>>());
    }
}

use criterion::{Criterion, criterion_group, criterion_main};
use octofhir_fhir_resources::prelude::*;
use octofhir_fhir_resources::*;
use std::hint::black_box;
use std::sync::Arc;

fn create_large_code_system() -> CodeSystem {
    let concepts = (0..100).map(|i| {
        CodeSystemConcept::builder()
            .code(format!("C{i}"))
            .display(format!("Concept {i}"))
            .property([ConceptProperty::builder()
                .code("order")
                .value(i)
                .build()
                .unwrap()])
            .concept((0..5).map(|j| {
                CodeSystemConcept::builder()
                    .code(format!("C{i}.{j}"))
                    .build()
                    .unwrap()
            }))
            .build()
            .unwrap()
    });

    CodeSystem::builder()
        .url("http://example.org/fhir/CodeSystem/bench")
        .status("active")
        .content("complete")
        .hierarchy_meaning("is-a")
        .concept(concepts)
        .build()
        .unwrap()
}

fn bench_build(c: &mut Criterion) {
    c.bench_function("code_system_build", |b| {
        b.iter(|| black_box(create_large_code_system()))
    });

    let code_system = create_large_code_system();
    let config = ModelConfig::default()
        .with_resolver(Arc::new(InMemoryBindingResolver::with_core_value_sets()));
    c.bench_function("code_system_revalidate", |b| {
        b.iter(|| black_box(validate(&code_system, &config)).unwrap())
    });
}

fn bench_traverse(c: &mut Criterion) {
    let code_system = create_large_code_system();

    c.bench_function("code_system_path_walk", |b| {
        b.iter(|| {
            let mut paths = PathVisitor::new();
            code_system.walk(&mut paths);
            black_box(paths.visited().len())
        })
    });
}

fn bench_hash(c: &mut Criterion) {
    c.bench_function("code_system_hash_first", |b| {
        b.iter_batched(
            create_large_code_system,
            |code_system| black_box(code_system.hash_code()),
            criterion::BatchSize::SmallInput,
        )
    });

    let code_system = create_large_code_system();
    code_system.hash_code();
    c.bench_function("code_system_hash_memoized", |b| {
        b.iter(|| black_box(code_system.hash_code()))
    });
}

criterion_group!(benches, bench_build, bench_traverse, bench_hash);
criterion_main!(benches);

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use relfeed_core::{MemoryIndex, PseudoFeedbackModel, Query};

fn synthetic_index(docs: usize) -> MemoryIndex {
    let vocab: Vec<String> = (0..500).map(|i| format!("t{i}")).collect();
    let mut idx = MemoryIndex::new();
    for d in 0..docs {
        let terms: Vec<&str> = (0..40).map(|j| vocab[(d * 7 + j * j) % vocab.len()].as_str()).collect();
        idx.add_document(&format!("doc-{d}"), &terms);
    }
    idx
}

fn bench_retrieval(c: &mut Criterion) {
    let model = PseudoFeedbackModel::new(synthetic_index(5_000)).unwrap();
    let q = Query::parse("t1 t4 t9 t16 t25");
    c.bench_function("retrieve_top100", |b| b.iter(|| model.retrieve(black_box(&q), 100).unwrap()));
    c.bench_function("retrieve_with_feedback_top100_k10", |b| {
        b.iter(|| model.retrieve_with_feedback(black_box(&q), 100, 10, 0.5).unwrap())
    });
}

criterion_group!(benches, bench_retrieval);
criterion_main!(benches);

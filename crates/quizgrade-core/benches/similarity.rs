use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizgrade_core::similarity::similarity_percent;

fn bench_similarity(c: &mut Criterion) {
    let mut group = c.benchmark_group("similarity_percent");

    group.bench_function("short_words", |b| {
        b.iter(|| similarity_percent(black_box("colour"), black_box("color")))
    });

    group.bench_function("phrase", |b| {
        b.iter(|| {
            similarity_percent(
                black_box("the mitochondria is the powerhouse of the cell"),
                black_box("mitochondria are the power house of a cell"),
            )
        })
    });

    let long_a = "lorem ipsum dolor sit amet ".repeat(20);
    let long_b = "lorem ipsom dolar sit amet ".repeat(20);
    group.bench_function("long_text", |b| {
        b.iter(|| similarity_percent(black_box(&long_a), black_box(&long_b)))
    });

    group.finish();
}

criterion_group!(benches, bench_similarity);
criterion_main!(benches);

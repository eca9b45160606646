use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::{json, Value};

use quizgrade_core::model::QuestionKind;
use quizgrade_core::registry::handler_of;

fn mcq_definition(options: usize) -> Value {
    let options: Vec<Value> = (0..options)
        .map(|i| json!({"text": format!("option {i}"), "is_correct": i % 3 == 0}))
        .collect();
    json!({"question_text": "Pick the multiples of three.", "options": options})
}

fn cloze_definition(blanks: usize) -> Value {
    let passage: String = (0..blanks).map(|i| format!("word {{b{i}}} ")).collect();
    let blanks: Vec<Value> = (0..blanks)
        .map(|i| {
            json!({
                "id": format!("b{i}"),
                "correct_answers": ["photosynthesis", "respiration"],
                "accept_partial": true,
            })
        })
        .collect();
    json!({"passage": passage, "blanks": blanks})
}

fn bench_mcq(c: &mut Criterion) {
    let mut group = c.benchmark_group("mcq");
    let handler = handler_of(QuestionKind::Mcq);

    for n in [4, 26, 100] {
        let def = mcq_definition(n);
        let response = json!({"selected_options": ["a", "b", "d", "g"]});
        group.bench_function(format!("grade_{n}_options"), |b| {
            b.iter(|| handler.grade(black_box(&def), black_box(&json!({})), black_box(&response)))
        });
    }

    group.finish();
}

fn bench_cloze(c: &mut Criterion) {
    let mut group = c.benchmark_group("cloze");
    let handler = handler_of(QuestionKind::Cloze);

    for n in [1, 10, 50] {
        let def = cloze_definition(n);
        let answers: serde_json::Map<String, Value> = (0..n)
            .map(|i| (format!("b{i}"), json!("fotosynthesis")))
            .collect();
        let response = json!({ "answers": answers });
        group.bench_function(format!("grade_{n}_partial_blanks"), |b| {
            b.iter(|| handler.grade(black_box(&def), black_box(&json!({})), black_box(&response)))
        });
    }

    group.finish();
}

fn bench_comprehension(c: &mut Criterion) {
    let mut group = c.benchmark_group("comprehension");
    let handler = handler_of(QuestionKind::Comprehension);

    let subs: Vec<Value> = (0..10)
        .map(|i| {
            let mut sub = mcq_definition(4);
            sub["type"] = json!("mcq");
            sub["marks"] = json!(i + 1);
            sub
        })
        .collect();
    let def = json!({
        "passage": {"title": "Bench", "content": "A passage to read."},
        "sub_questions": subs,
    });
    let response = json!({"sub_answers": [0, 1, 2, 3, 0, 1, 2, 3, 0, 1]});

    group.bench_function("grade_10_sub_questions", |b| {
        b.iter(|| handler.grade(black_box(&def), black_box(&json!({})), black_box(&response)))
    });
    group.bench_function("render_learner_10_sub_questions", |b| {
        b.iter(|| handler.render_for_learner(black_box(&def)))
    });

    group.finish();
}

criterion_group!(benches, bench_mcq, bench_cloze, bench_comprehension);
criterion_main!(benches);

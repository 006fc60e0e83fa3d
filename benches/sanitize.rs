use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use serde_json::json;

use effortgate::sanitizer::{ApiSource, EffortValue, SanitizerConfig, sanitize};

fn bench_sanitizer(c: &mut Criterion) {
    let config = SanitizerConfig::default();
    let third_party = ApiSource::from("openrouter");

    let stripped_body = json!({
        "model": "some-model",
        "messages": [{"role": "user", "content": "hello"}],
        "temperature": 0.7,
        "reasoning_effort": "none"
    });
    c.bench_function("sanitize_strip", |b| {
        b.iter(|| {
            let mut body = stripped_body.clone();
            sanitize(black_box(&mut body), &third_party, &config)
        })
    });

    let untouched_body = json!({
        "model": "gpt-5",
        "messages": [{"role": "user", "content": "hello"}],
        "reasoning_effort": "medium"
    });
    c.bench_function("sanitize_pass_through", |b| {
        b.iter(|| {
            let mut body = untouched_body.clone();
            sanitize(black_box(&mut body), &ApiSource::OpenAi, &config)
        })
    });

    c.bench_function("resolve_effort_min", |b| {
        b.iter(|| {
            config.resolve_effort(
                black_box(&EffortValue::Min),
                &ApiSource::OpenAi,
                "gpt-5-codex",
            )
        })
    });
}

criterion_group!(benches, bench_sanitizer);
criterion_main!(benches);

//! Benchmarks for tool-call assembly
//!
//! This benchmark measures:
//! - Fragment merging
//! - Speculative validation of growing argument text
//! - End-to-end consumption of a decoded SSE body

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::{json, Value};
use std::sync::Arc;
use toolcall_stream::pipeline::fragments_from_sse;
use toolcall_stream::tools::{register_qa_tools, ProvideAiAnnotations, ProvideLinks};
use toolcall_stream::utils::{is_candidate, merge};
use toolcall_stream::{ConsumerConfig, StreamConsumer, ToolCallFragment, ToolRegistry};

/// provideLinks arguments with `n` links.
fn links_arguments(n: usize) -> String {
    let links: Vec<Value> = (0..n)
        .map(|i| {
            json!({
                "label": i.to_string(),
                "url": format!("https://docs.example.com/page/{}", i),
                "title": format!("Page {}", i),
                "type": "documentation",
                "breadcrumbs": ["Docs", "Guides"]
            })
        })
        .collect();
    json!({ "links": links }).to_string()
}

fn split(text: &str, size: usize) -> Vec<String> {
    text.as_bytes()
        .chunks(size)
        .map(|c| String::from_utf8_lossy(c).into_owned())
        .collect()
}

fn registry() -> Arc<ToolRegistry> {
    let registry = register_qa_tools(
        ToolRegistry::builder(),
        |args: ProvideLinks| async move { anyhow::Ok(json!(args.links().len())) },
        |_: ProvideAiAnnotations| async move { anyhow::Ok(Value::Null) },
    )
    .build()
    .unwrap();
    Arc::new(registry)
}

fn sse_body(arguments: &str, chunk: usize) -> String {
    let mut body = String::new();
    let start = json!({"choices": [{"index": 0, "delta": {"tool_calls": [
        {"index": 0, "id": "call_1", "type": "function", "function": {"name": "provideLinks", "arguments": ""}}
    ]}}]});
    body.push_str(&format!("data: {}\n\n", start));
    for piece in split(arguments, chunk) {
        let frame = json!({"choices": [{"index": 0, "delta": {"tool_calls": [
            {"index": 0, "function": {"arguments": piece}}
        ]}}]});
        body.push_str(&format!("data: {}\n\n", frame));
    }
    body.push_str("data: [DONE]\n\n");
    body
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");
    let arguments = links_arguments(5);
    let fragments: Vec<ToolCallFragment> = split(&arguments, 8)
        .into_iter()
        .map(|p| ToolCallFragment::new().with_arguments(p))
        .collect();
    group.throughput(Throughput::Elements(fragments.len() as u64));

    group.bench_function("merge_fragments", |b| {
        b.iter(|| {
            let mut call = merge(
                None,
                &ToolCallFragment::new().with_id("call_1").with_name("provideLinks"),
            );
            for fragment in black_box(&fragments) {
                call = merge(Some(call), fragment);
            }
            black_box(is_candidate(&call))
        })
    });

    group.finish();
}

fn bench_speculative_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("speculative_validation");
    let registry = registry();

    for links in [1usize, 5, 20] {
        let arguments = links_arguments(links);
        let prefixes: Vec<&str> = (1..=arguments.len())
            .step_by(16)
            .map(|end| &arguments[..end])
            .collect();
        group.throughput(Throughput::Elements(prefixes.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(links), &prefixes, |b, prefixes| {
            b.iter(|| {
                for prefix in prefixes.iter() {
                    black_box(registry.validate("provideLinks", prefix));
                }
            })
        });
    }

    group.finish();
}

fn bench_consume_sse(c: &mut Criterion) {
    let mut group = c.benchmark_group("consume_sse");
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let registry = registry();
    let arguments = links_arguments(5);

    for chunk in [4usize, 32] {
        let body = sse_body(&arguments, chunk);
        group.throughput(Throughput::Bytes(body.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(chunk), &body, |b, body| {
            b.to_async(&runtime).iter(|| {
                let registry = Arc::clone(&registry);
                let bytes: Vec<toolcall_stream::Result<bytes::Bytes>> =
                    vec![Ok(bytes::Bytes::from(body.clone()))];
                async move {
                    let summary = StreamConsumer::new(registry, ConsumerConfig::default())
                        .consume(fragments_from_sse(Box::pin(futures::stream::iter(bytes))))
                        .await
                        .unwrap();
                    black_box(summary.results.len())
                }
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_merge, bench_speculative_validation, bench_consume_sse);
criterion_main!(benches);

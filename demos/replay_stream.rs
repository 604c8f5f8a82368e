//! Replay a recorded chat completion SSE body through the consumer.
//!
//! ```text
//! cargo run --example replay_stream                 # built-in QA answer
//! cargo run --example replay_stream -- body.sse     # recorded body
//! ```
//!
//! Set `RUST_LOG=toolcall_stream=debug` and `TOOLCALL_STREAM_DEBUG=1` to
//! watch every merged tool-call state.

use bytes::Bytes;
use serde_json::json;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use toolcall_stream::pipeline::fragments_from_sse;
use toolcall_stream::tools::{register_qa_tools, ProvideAiAnnotations, ProvideLinks};
use toolcall_stream::{ConsumerConfig, StreamConsumer, ToolRegistry};

const SAMPLE: &str = concat!(
    "data: {\"choices\":[{\"index\":0,\"delta\":{\"role\":\"assistant\",\"content\":\"\"}}]}\n\n",
    "data: {\"choices\":[{\"index\":0,\"delta\":{\"content\":\"Streams are assembled \"}}]}\n\n",
    "data: {\"choices\":[{\"index\":0,\"delta\":{\"content\":\"fragment by fragment [1].\"}}]}\n\n",
    "data: {\"choices\":[{\"index\":0,\"delta\":{\"tool_calls\":[{\"index\":0,\"id\":\"call_1\",\"type\":\"function\",\"function\":{\"name\":\"provideLinks\",\"arguments\":\"\"}}]}}]}\n\n",
    "data: {\"choices\":[{\"index\":0,\"delta\":{\"tool_calls\":[{\"index\":0,\"function\":{\"arguments\":\"{\\\"links\\\":[{\\\"label\\\":\\\"1\\\",\"}}]}}]}\n\n",
    "data: {\"choices\":[{\"index\":0,\"delta\":{\"tool_calls\":[{\"index\":0,\"function\":{\"arguments\":\"\\\"url\\\":\\\"https://docs.example.com/streaming\\\"}]}\"}}]}}]}\n\n",
    "data: {\"choices\":[{\"index\":0,\"delta\":{\"tool_calls\":[{\"index\":1,\"id\":\"call_2\",\"type\":\"function\",\"function\":{\"name\":\"provideAIAnnotations\",\"arguments\":\"{\\\"aiAnnotations\\\":{\\\"answerConfidence\\\":\\\"very_confident\\\"}}\"}}]}}]}\n\n",
    "data: {\"choices\":[{\"index\":0,\"delta\":{},\"finish_reason\":\"tool_calls\"}]}\n\n",
    "data: [DONE]\n\n",
);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "toolcall_stream=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let body = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(path)?,
        None => SAMPLE.to_string(),
    };

    let registry = register_qa_tools(
        ToolRegistry::builder(),
        |args: ProvideLinks| async move {
            for link in args.links() {
                eprintln!(
                    "\n[link] {} {}",
                    link.label.as_deref().unwrap_or("-"),
                    link.url
                );
            }
            anyhow::Ok(json!({"links": args.links().len()}))
        },
        |args: ProvideAiAnnotations| async move {
            eprintln!("\n[confidence] {}", args.ai_annotations.confidence());
            anyhow::Ok(json!(null))
        },
    )
    .build()?;

    // Small byte chunks with a delay, to look like a network read.
    let chunks: Vec<toolcall_stream::Result<Bytes>> = body
        .as_bytes()
        .chunks(24)
        .map(|c| Ok(Bytes::copy_from_slice(c)))
        .collect();
    let bytes = futures::StreamExt::then(futures::stream::iter(chunks), |chunk| async move {
        tokio::time::sleep(Duration::from_millis(15)).await;
        chunk
    });

    let summary = StreamConsumer::new(Arc::new(registry), ConsumerConfig::from_env()?)
        .on_content(|delta, _snapshot| {
            print!("{}", delta);
            let _ = std::io::stdout().flush();
        })
        .consume(fragments_from_sse(Box::pin(bytes)))
        .await?;

    println!();
    eprintln!(
        "{} tool call(s) handled, {} failed, {} incomplete parse attempt(s)",
        summary.results.len(),
        summary.failures.len(),
        summary.incomplete_attempts
    );
    for failure in &summary.failures {
        eprintln!("  {}: {}", failure.kind(), failure);
    }
    Ok(())
}

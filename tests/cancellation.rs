use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use toolcall_stream::types::ToolDefinition;
use toolcall_stream::{
    handler_fn, ConsumerConfig, StreamConsumer, StreamFragment, ToolCallFragment, ToolRegistry,
};

#[tokio::test]
async fn test_cancel_while_waiting_for_fragments() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let registry = ToolRegistry::builder()
        .register(
            ToolDefinition::function("record", None, json!({"type": "object"})),
            handler_fn(move |args: Value| {
                counter.fetch_add(1, Ordering::SeqCst);
                async move { anyhow::Ok(args) }
            }),
        )
        .build()
        .unwrap();

    let (tx, rx) = mpsc::channel::<toolcall_stream::Result<StreamFragment>>(8);
    let cancel = CancellationToken::new();
    let consumer = StreamConsumer::new(Arc::new(registry), ConsumerConfig::default());
    let task = tokio::spawn(consumer.consume_until_cancelled(ReceiverStream::new(rx), cancel.clone()));

    tx.send(Ok(StreamFragment::content("partial answer")))
        .await
        .unwrap();
    tx.send(Ok(StreamFragment::tool_call(
        ToolCallFragment::new()
            .with_id("call_1")
            .with_name("record")
            .with_arguments("{\"step\":"),
    )))
    .await
    .unwrap();
    tokio::task::yield_now().await;

    cancel.cancel();
    // Would complete the call if it were still being read.
    let _ = tx
        .send(Ok(StreamFragment::tool_call(
            ToolCallFragment::new().with_arguments("1}"),
        )))
        .await;

    let summary = task.await.unwrap().unwrap();
    assert!(summary.cancelled);
    assert!(summary.results.is_empty());
    assert!(summary.truncated.is_none());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_stream_end_before_cancel_finishes_normally() {
    let registry = ToolRegistry::builder().build().unwrap();
    let (tx, rx) = mpsc::channel::<toolcall_stream::Result<StreamFragment>>(1);
    let cancel = CancellationToken::new();
    let consumer = StreamConsumer::new(Arc::new(registry), ConsumerConfig::default());
    let task = tokio::spawn(consumer.consume_until_cancelled(ReceiverStream::new(rx), cancel.clone()));

    tx.send(Ok(StreamFragment::content("done"))).await.unwrap();
    drop(tx);

    let summary = task.await.unwrap().unwrap();
    assert!(!summary.cancelled);
    assert_eq!(summary.content, "done");
    cancel.cancel();
}

//! Handler trait and closure adapters.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

/// User-supplied function run once a tool call is fully resolved.
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync {
    /// Execute the tool with arguments that already passed schema validation.
    async fn call(&self, args: Value) -> anyhow::Result<Value>;

    /// Extra acceptance check run by the registry after the JSON Schema
    /// passed and before the call is considered resolved.
    ///
    /// Typed handlers use it to make sure the arguments deserialize into
    /// their argument type, so that a mismatch is reported as a schema
    /// violation instead of a handler failure.
    fn check_args(&self, _args: &Value) -> Result<(), String> {
        Ok(())
    }
}

/// Handler over raw JSON arguments.
pub struct FnHandler<F> {
    f: F,
}

#[async_trait::async_trait]
impl<F, Fut> ToolHandler for FnHandler<F>
where
    F: Fn(Value) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<Value>> + Send,
{
    async fn call(&self, args: Value) -> anyhow::Result<Value> {
        (self.f)(args).await
    }
}

/// Handler whose arguments are deserialized into `T` first.
pub struct TypedHandler<T, F> {
    f: F,
    _args: PhantomData<fn(T)>,
}

#[async_trait::async_trait]
impl<T, F, Fut> ToolHandler for TypedHandler<T, F>
where
    T: DeserializeOwned + Send + 'static,
    F: Fn(T) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<Value>> + Send,
{
    async fn call(&self, args: Value) -> anyhow::Result<Value> {
        let typed: T = serde_json::from_value(args)?;
        (self.f)(typed).await
    }

    fn check_args(&self, args: &Value) -> Result<(), String> {
        T::deserialize(args).map(|_| ()).map_err(|e| e.to_string())
    }
}

/// Wrap an async closure over raw JSON arguments.
pub fn handler_fn<F, Fut>(f: F) -> Arc<dyn ToolHandler>
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
{
    Arc::new(FnHandler { f })
}

/// Wrap an async closure over typed arguments.
pub fn typed_handler<T, F, Fut>(f: F) -> Arc<dyn ToolHandler>
where
    T: DeserializeOwned + Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
{
    Arc::new(TypedHandler {
        f,
        _args: PhantomData,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, serde::Deserialize)]
    struct Echo {
        text: String,
    }

    #[tokio::test]
    async fn test_fn_handler_passes_raw_args() {
        let h = handler_fn(|args: Value| async move { anyhow::Ok(json!({"got": args})) });
        let out = h.call(json!({"a": 1})).await.unwrap();
        assert_eq!(out, json!({"got": {"a": 1}}));
        assert!(h.check_args(&json!(null)).is_ok());
    }

    #[tokio::test]
    async fn test_typed_handler_deserializes() {
        let h = typed_handler(|args: Echo| async move { anyhow::Ok(json!(args.text)) });
        assert_eq!(h.call(json!({"text": "hi"})).await.unwrap(), json!("hi"));
    }

    #[test]
    fn test_typed_handler_check_args() {
        let h = typed_handler(|args: Echo| async move { anyhow::Ok(json!(args.text)) });
        assert!(h.check_args(&json!({"text": "hi"})).is_ok());
        let err = h.check_args(&json!({"text": 3})).unwrap_err();
        assert!(err.contains("invalid type"));
    }
}

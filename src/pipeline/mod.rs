//! Byte-stream front end: SSE bytes to [`StreamFragment`]s.
//!
//! ```text
//! Raw Bytes → SseDecoder → ChatCompletionChunk → StreamFragment → StreamConsumer
//! ```
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`decode::SseDecoder`] | Event framing, `[DONE]` handling |
//! | [`fragments_from_sse`] | Decoder plus chunk normalization |
//! | [`fragments_from_chunks`] | Normalization only, for already-decoded chunks |

pub mod decode;

pub use decode::SseDecoder;

use crate::error::Error;
use crate::types::chunk::ChatCompletionChunk;
use crate::types::fragment::StreamFragment;
use crate::{BoxStream, Result};
use bytes::Bytes;
use futures::StreamExt;
use serde_json::Value;

/// Decode an OpenAI-compatible SSE body into fragments.
///
/// An event that is valid JSON but not a completion chunk yields
/// [`Error::Serialization`]; transport errors pass through unchanged.
pub fn fragments_from_sse(input: BoxStream<'static, Bytes>) -> BoxStream<'static, StreamFragment> {
    fragments_from_values(SseDecoder::default().decode_stream(input))
}

/// Normalize decoded JSON events into fragments.
pub fn fragments_from_values(
    input: BoxStream<'static, Value>,
) -> BoxStream<'static, StreamFragment> {
    Box::pin(input.map(|item| -> Result<StreamFragment> {
        let value = item?;
        let chunk: ChatCompletionChunk = serde_json::from_value(value).map_err(Error::from)?;
        Ok(chunk.into_fragment())
    }))
}

/// Normalize typed chunks into fragments.
pub fn fragments_from_chunks<S>(input: S) -> impl futures::Stream<Item = StreamFragment>
where
    S: futures::Stream<Item = ChatCompletionChunk>,
{
    input.map(ChatCompletionChunk::into_fragment)
}

//! Server-sent event framing (Bytes -> JSON Value).

use crate::error::{Error, ErrorContext};
use crate::BoxStream;
use bytes::{Buf, Bytes, BytesMut};
use futures::{stream, StreamExt};
use serde_json::Value;
use tracing::debug;

/// Minimal SSE decoder:
/// - splits by delimiter (default "\n\n")
/// - strips `prefix` (default "data: ")
/// - stops on `done_signal` (default "[DONE]")
#[derive(Debug, Clone)]
pub struct SseDecoder {
    delimiter: String,
    prefix: String,
    done_signal: String,
}

impl Default for SseDecoder {
    fn default() -> Self {
        Self::new(None, None, None)
    }
}

impl SseDecoder {
    pub fn new(
        delimiter: Option<String>,
        prefix: Option<String>,
        done_signal: Option<String>,
    ) -> Self {
        Self {
            delimiter: delimiter.unwrap_or_else(|| "\n\n".to_string()),
            prefix: prefix.unwrap_or_else(|| "data: ".to_string()),
            done_signal: done_signal.unwrap_or_else(|| "[DONE]".to_string()),
        }
    }

    /// Decode a byte stream into one JSON value per event.
    ///
    /// Frames may be split across byte chunks arbitrarily, including inside
    /// a multi-byte character: bytes are buffered and only complete frames
    /// are decoded as UTF-8. A frame that is not valid UTF-8 yields an error
    /// item. Comment frames, empty frames and frames whose payload is not
    /// JSON are skipped. The returned stream does not borrow `self`.
    pub fn decode_stream(&self, input: BoxStream<'static, Bytes>) -> BoxStream<'static, Value> {
        let delimiter = self.delimiter.clone();
        let prefix = self.prefix.clone();
        let done_signal = self.done_signal.clone();

        let stream = stream::unfold(
            (input, BytesMut::new(), false),
            move |(mut input, mut buf, finished)| {
                let delimiter = delimiter.clone();
                let prefix = prefix.clone();
                let done_signal = done_signal.clone();
                async move {
                    if finished {
                        return None;
                    }

                    let is_done = |s: &str| -> bool {
                        let t = s.trim();
                        t == done_signal
                            || t.strip_prefix("data:").map(str::trim) == Some(done_signal.as_str())
                    };

                    let parse_payload = |raw: &str| -> Option<Value> {
                        let trimmed = raw.trim();
                        if trimmed.is_empty() || trimmed.starts_with(':') {
                            return None;
                        }
                        let payload = if let Some(rest) = trimmed.strip_prefix(prefix.as_str()) {
                            rest
                        } else if let Some(rest) = trimmed.strip_prefix("data:") {
                            rest.trim_start()
                        } else {
                            trimmed
                        };
                        match serde_json::from_str(payload) {
                            Ok(v) => Some(v),
                            Err(e) => {
                                debug!(error = %e, "skipping non-JSON SSE frame");
                                None
                            }
                        }
                    };

                    loop {
                        if let Some(idx) = find_delimiter(&buf, delimiter.as_bytes()) {
                            let frame = buf.split_to(idx);
                            buf.advance(delimiter.len());

                            let frame = match std::str::from_utf8(&frame) {
                                Ok(frame) => frame,
                                Err(e) => return Some((Err(invalid_utf8(e)), (input, buf, false))),
                            };
                            if is_done(frame) {
                                return None;
                            }
                            if let Some(v) = parse_payload(frame) {
                                return Some((Ok(v), (input, buf, false)));
                            }
                            continue;
                        }

                        match input.next().await {
                            Some(Ok(bytes)) => buf.extend_from_slice(&bytes),
                            Some(Err(e)) => return Some((Err(e), (input, buf, true))),
                            None => {
                                // EOF: the last frame may lack its delimiter.
                                let rest = match std::str::from_utf8(&buf) {
                                    Ok(rest) => rest,
                                    Err(e) => {
                                        return Some((
                                            Err(invalid_utf8(e)),
                                            (input, BytesMut::new(), true),
                                        ))
                                    }
                                };
                                if is_done(rest) {
                                    return None;
                                }
                                return parse_payload(rest)
                                    .map(|v| (Ok(v), (input, BytesMut::new(), true)));
                            }
                        }
                    }
                }
            },
        );

        Box::pin(stream)
    }
}

fn find_delimiter(buf: &[u8], delimiter: &[u8]) -> Option<usize> {
    if delimiter.is_empty() {
        return None;
    }
    buf.windows(delimiter.len()).position(|w| w == delimiter)
}

fn invalid_utf8(e: std::str::Utf8Error) -> Error {
    Error::runtime_with_context(
        "SSE frame is not valid UTF-8",
        ErrorContext::new()
            .with_details(e.to_string())
            .with_source("sse_decoder"),
    )
}

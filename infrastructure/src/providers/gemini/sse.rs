//! Server-sent event decoding for `streamGenerateContent?alt=sse`

use super::mapping::tool_call_from;
use super::protocol::{GenerateContentResponse, is_blocked_finish_reason};
use bytes::BytesMut;
use genflow_application::{ProviderError, ProviderStreamItem};

type Item = Result<ProviderStreamItem, ProviderError>;

/// Incremental decoder from raw response bytes to stream items.
///
/// `Done` is emitted once the model reports a finish reason (or `[DONE]`
/// arrives); nothing is emitted after `Done` or an error.
#[derive(Debug, Default)]
pub(crate) struct SseDecoder {
    buffer: BytesMut,
    finished: bool,
}

impl SseDecoder {
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Feed a chunk of bytes and return the items completed by it
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Item> {
        if self.finished {
            return Vec::new();
        }
        self.buffer.extend_from_slice(chunk);

        let mut items = Vec::new();
        while !self.finished
            && let Some(pos) = self.buffer.iter().position(|&b| b == b'\n')
        {
            let line = self.buffer.split_to(pos + 1);
            let line = String::from_utf8_lossy(&line);
            if let Some(data) = line.trim().strip_prefix("data:") {
                self.decode_event(data.trim(), &mut items);
            }
        }
        items
    }

    fn decode_event(&mut self, data: &str, items: &mut Vec<Item>) {
        if data.is_empty() {
            return;
        }
        if data == "[DONE]" {
            self.finish(items, Ok(ProviderStreamItem::Done));
            return;
        }

        let response = match serde_json::from_str::<GenerateContentResponse>(data) {
            Ok(response) => response,
            Err(e) => {
                self.finish(
                    items,
                    Err(ProviderError::Unavailable(format!("Malformed stream event: {}", e))),
                );
                return;
            }
        };

        let Some(candidate) = response.into_first_candidate() else {
            return;
        };

        for part in candidate.content.map(|c| c.parts).unwrap_or_default() {
            if let Some(text) = part.text
                && !text.is_empty()
            {
                items.push(Ok(ProviderStreamItem::Text(text)));
            }
            if let Some(call) = part.function_call {
                items.push(Ok(ProviderStreamItem::ToolCall(tool_call_from(call.name, call.args))));
            }
        }

        match candidate.finish_reason.as_deref() {
            Some(reason) if is_blocked_finish_reason(reason) => self.finish(
                items,
                Err(ProviderError::Rejected(format!("Generation blocked: {}", reason))),
            ),
            Some(_) => self.finish(items, Ok(ProviderStreamItem::Done)),
            None => {}
        }
    }

    fn finish(&mut self, items: &mut Vec<Item>, last: Item) {
        self.finished = true;
        items.push(last);
    }
}

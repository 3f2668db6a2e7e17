//! Streaming events delivered to a consumer.
//!
//! A stream is a run of [`StreamEvent::Chunk`]s followed by exactly one
//! terminal event: [`StreamEvent::End`] when the provider finished, or
//! [`StreamEvent::Error`] when it did not. Consumers can always tell
//! "finished" apart from "failed".

use serde::{Deserialize, Serialize};

/// One text fragment with its position in the stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamChunk {
    pub text: String,
    /// 0-based, contiguous across the whole stream
    pub index: u64,
}

impl StreamChunk {
    pub fn new(text: impl Into<String>, index: u64) -> Self {
        Self {
            text: text.into(),
            index,
        }
    }
}

/// An event in a streaming generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum StreamEvent {
    /// A text chunk from the model
    Chunk(StreamChunk),
    /// The provider finished normally
    End,
    /// The stream failed; no further events follow
    Error { message: String },
}

impl StreamEvent {
    pub fn chunk(text: impl Into<String>, index: u64) -> Self {
        StreamEvent::Chunk(StreamChunk::new(text, index))
    }

    pub fn error(message: impl Into<String>) -> Self {
        StreamEvent::Error {
            message: message.into(),
        }
    }

    /// Returns the text content if this is a chunk.
    pub fn text(&self) -> Option<&str> {
        match self {
            StreamEvent::Chunk(chunk) => Some(&chunk.text),
            _ => None,
        }
    }

    /// Returns true if this event ends the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::End | StreamEvent::Error { .. })
    }
}

/// Tracks chunk numbering for a producer
#[derive(Debug, Default)]
pub struct ChunkSequencer {
    next: u64,
}

impl ChunkSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap text into the next chunk event
    pub fn next_chunk(&mut self, text: impl Into<String>) -> StreamEvent {
        let event = StreamEvent::chunk(text, self.next);
        self.next += 1;
        event
    }

    pub fn emitted(&self) -> u64 {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_and_terminal() {
        let chunk = StreamEvent::chunk("Hello", 0);
        assert_eq!(chunk.text(), Some("Hello"));
        assert!(!chunk.is_terminal());

        assert!(StreamEvent::End.is_terminal());
        assert!(StreamEvent::error("connection reset").is_terminal());
        assert_eq!(StreamEvent::End.text(), None);
    }

    #[test]
    fn test_sequencer_is_contiguous() {
        let mut seq = ChunkSequencer::new();
        let indices: Vec<u64> = ["a", "b", "c"]
            .into_iter()
            .map(|t| match seq.next_chunk(t) {
                StreamEvent::Chunk(c) => c.index,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(seq.emitted(), 3);
    }
}

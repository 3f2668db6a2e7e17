//! Write a stream's chunks to a terminal as they arrive

use genflow_application::{OrchestrationError, StreamHandle};
use genflow_domain::StreamEvent;
use std::io::Write;
use tokio_util::sync::CancellationToken;

fn io_error(err: std::io::Error) -> OrchestrationError {
    OrchestrationError::Stream(err.to_string())
}

/// Print every chunk of `handle` to `out` and return the full text.
///
/// Cancelling `cancel` cancels the stream and returns an error.
pub async fn print_stream<W: Write>(
    handle: &mut StreamHandle,
    out: &mut W,
    cancel: &CancellationToken,
) -> Result<String, OrchestrationError> {
    let mut text = String::new();
    loop {
        let event = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                handle.cancel();
                None
            }
            event = handle.recv() => event,
        };

        match event {
            Some(StreamEvent::Chunk(chunk)) => {
                write!(out, "{}", chunk.text).map_err(io_error)?;
                out.flush().map_err(io_error)?;
                text.push_str(&chunk.text);
            }
            Some(StreamEvent::End) => {
                writeln!(out).map_err(io_error)?;
                return Ok(text);
            }
            Some(StreamEvent::Error { message }) => {
                writeln!(out).map_err(io_error)?;
                return Err(OrchestrationError::Stream(message));
            }
            None => return Err(OrchestrationError::Stream("cancelled".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn handle(events: Vec<StreamEvent>) -> StreamHandle {
        let (tx, rx) = mpsc::channel(events.len().max(1));
        for event in events {
            tx.try_send(event).unwrap();
        }
        StreamHandle::new(rx, CancellationToken::new())
    }

    #[tokio::test]
    async fn test_prints_chunks_in_order() {
        let mut handle = handle(vec![
            StreamEvent::chunk("The library ", 0),
            StreamEvent::chunk("opens at 8 AM.", 1),
            StreamEvent::End,
        ]);
        let mut out = Vec::new();

        let text = print_stream(&mut handle, &mut out, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(text, "The library opens at 8 AM.");
        assert_eq!(String::from_utf8(out).unwrap(), "The library opens at 8 AM.\n");
    }

    #[tokio::test]
    async fn test_error_event_is_returned() {
        let mut handle = handle(vec![
            StreamEvent::chunk("partial", 0),
            StreamEvent::error("provider stream ended before completion"),
        ]);
        let mut out = Vec::new();

        let err = print_stream(&mut handle, &mut out, &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            OrchestrationError::Stream("provider stream ended before completion".to_string())
        );
        assert!(String::from_utf8(out).unwrap().starts_with("partial"));
    }

    #[tokio::test]
    async fn test_cancel_stops_printing() {
        let (_tx, rx) = mpsc::channel(1);
        let mut handle = StreamHandle::new(rx, CancellationToken::new());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = print_stream(&mut handle, &mut Vec::new(), &cancel).await.unwrap_err();
        assert_eq!(err, OrchestrationError::Stream("cancelled".to_string()));
        assert!(handle.is_cancelled());
    }
}

//! Stream use case (streaming channel)
//!
//! [`StreamUseCase::open`] spawns a producer task that pulls from the
//! provider stream and pushes [`StreamEvent`]s into a bounded channel. The
//! consumer reads them through a [`StreamHandle`].
//!
//! - Chunks keep provider order; indices are 0-based and contiguous, also
//!   across tool rounds.
//! - Every stream ends with exactly one `End` or `Error`.
//! - [`StreamHandle::cancel`] stops the producer, which drops the provider
//!   stream (closing the connection) and issues no further provider calls.
//!   The handle yields nothing after cancellation.
//!
//! Streaming is free text only; structured output is not validated here.

use crate::config::OrchestrationConfig;
use crate::error::OrchestrationError;
use crate::ports::generation_client::{GenerationClient, ProviderError, ProviderStreamItem};
use crate::ports::generation_logger::{GenerationEvent, GenerationLogger, NoGenerationLogger};
use crate::tools::ToolRegistry;
use crate::use_cases::shared::run_tool_round;
use futures::{Stream, StreamExt};
use genflow_domain::{ChunkSequencer, GenerationRequest, ResolutionState, StreamEvent, ToolCall};
use serde_json::json;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Handle for receiving streaming events.
///
/// Finite and non-restartable: once a terminal event has been returned, or
/// the stream was cancelled, every further read yields `None`.
pub struct StreamHandle {
    receiver: mpsc::Receiver<StreamEvent>,
    cancel: CancellationToken,
    finished: bool,
}

impl StreamHandle {
    pub fn new(receiver: mpsc::Receiver<StreamEvent>, cancel: CancellationToken) -> Self {
        Self {
            receiver,
            cancel,
            finished: false,
        }
    }

    /// Receive the next event
    pub async fn recv(&mut self) -> Option<StreamEvent> {
        self.next().await
    }

    /// Request cancellation. No event is yielded afterwards.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Token shared with the producer, e.g. for wiring Ctrl-C
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Consume the stream and collect all text into a single string.
    pub async fn collect_text(mut self) -> Result<String, OrchestrationError> {
        let mut full_text = String::new();
        while let Some(event) = self.recv().await {
            match event {
                StreamEvent::Chunk(chunk) => full_text.push_str(&chunk.text),
                StreamEvent::End => return Ok(full_text),
                StreamEvent::Error { message } => return Err(OrchestrationError::Stream(message)),
            }
        }
        Err(OrchestrationError::Stream("cancelled".to_string()))
    }
}

impl Stream for StreamHandle {
    type Item = StreamEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<StreamEvent>> {
        if self.finished || self.cancel.is_cancelled() {
            return Poll::Ready(None);
        }

        match self.receiver.poll_recv(cx) {
            Poll::Pending => Poll::Pending,
            // An event that raced with cancellation is dropped
            Poll::Ready(_) if self.cancel.is_cancelled() => {
                self.finished = true;
                Poll::Ready(None)
            }
            Poll::Ready(Some(event)) => {
                if event.is_terminal() {
                    self.finished = true;
                }
                Poll::Ready(Some(event))
            }
            Poll::Ready(None) => {
                // Producer vanished without a terminal event
                self.finished = true;
                Poll::Ready(Some(StreamEvent::error("stream closed unexpectedly")))
            }
        }
    }
}

/// Use case for incremental text generation
pub struct StreamUseCase {
    client: Arc<dyn GenerationClient>,
    registry: Arc<ToolRegistry>,
    config: OrchestrationConfig,
    logger: Arc<dyn GenerationLogger>,
}

impl StreamUseCase {
    pub fn new(client: Arc<dyn GenerationClient>, registry: Arc<ToolRegistry>) -> Self {
        Self {
            client,
            registry,
            config: OrchestrationConfig::default(),
            logger: Arc::new(NoGenerationLogger),
        }
    }

    pub fn with_config(mut self, config: OrchestrationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn GenerationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Open a free-text stream offering the named registered tools
    pub fn generate_stream(
        &self,
        prompt: impl Into<String>,
        tools: Option<&[&str]>,
    ) -> Result<StreamHandle, OrchestrationError> {
        let mut request = GenerationRequest::new(prompt);
        if let Some(names) = tools {
            request = request.with_tools(self.registry.subset(names)?);
        }
        Ok(self.open(request))
    }

    /// Spawn the producer for `request` and return the consumer handle
    pub fn open(&self, request: GenerationRequest) -> StreamHandle {
        let (tx, rx) = mpsc::channel(self.config.stream_buffer.max(1));
        let cancel = CancellationToken::new();

        self.logger.log(GenerationEvent::new(
            "stream_open",
            json!({
                "prompt": request.prompt,
                "tools": request.tools.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
            }),
        ));

        let producer = Producer {
            client: Arc::clone(&self.client),
            registry: Arc::clone(&self.registry),
            config: self.config.clone(),
            logger: Arc::clone(&self.logger),
            tx,
            cancel: cancel.clone(),
        };
        tokio::spawn(producer.run(request));

        StreamHandle::new(rx, cancel)
    }
}

/// Outcome of draining one provider stream
enum Drained {
    Finished,
    ToolRequested(ToolCall),
    Stopped,
}

struct Producer {
    client: Arc<dyn GenerationClient>,
    registry: Arc<ToolRegistry>,
    config: OrchestrationConfig,
    logger: Arc<dyn GenerationLogger>,
    tx: mpsc::Sender<StreamEvent>,
    cancel: CancellationToken,
}

impl Producer {
    async fn run(self, request: GenerationRequest) {
        let mut sequencer = ChunkSequencer::new();
        let mut state = ResolutionState::new(self.config.max_tool_rounds);
        let mut current = request;

        loop {
            match self.drain(&current, &mut sequencer).await {
                Drained::Finished => {
                    info!(chunks = sequencer.emitted(), rounds = state.round_count(), "Stream complete");
                    self.emit(StreamEvent::End).await;
                    return;
                }
                Drained::Stopped => return,
                Drained::ToolRequested(call) => {
                    let round = tokio::select! {
                        biased;
                        _ = self.cancel.cancelled() => return,
                        round = run_tool_round(
                            &self.registry,
                            &mut state,
                            &current,
                            &call,
                            self.config.tool_timeout,
                            self.logger.as_ref(),
                        ) => round,
                    };
                    match round {
                        Ok(next) => current = next,
                        Err(e) => {
                            self.fail(e.to_string()).await;
                            return;
                        }
                    }
                }
            }
        }
    }

    /// Pull one provider stream until it finishes, asks for a tool or fails
    async fn drain(&self, request: &GenerationRequest, sequencer: &mut ChunkSequencer) -> Drained {
        let timeout = self.config.provider_timeout;

        let opened = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Drained::Stopped,
            opened = tokio::time::timeout(timeout, self.client.stream(request)) => opened,
        };
        let mut provider_stream = match opened {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => {
                self.fail(OrchestrationError::from(e).to_string()).await;
                return Drained::Stopped;
            }
            Err(_) => {
                self.fail(OrchestrationError::ProviderTimeout.to_string()).await;
                return Drained::Stopped;
            }
        };

        loop {
            let item = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    debug!("Stream cancelled, closing provider stream");
                    return Drained::Stopped;
                }
                item = tokio::time::timeout(timeout, provider_stream.next()) => item,
            };

            match item {
                Ok(Some(Ok(ProviderStreamItem::Text(text)))) => {
                    if text.is_empty() {
                        continue;
                    }
                    if !self.emit(sequencer.next_chunk(text)).await {
                        return Drained::Stopped;
                    }
                }
                Ok(Some(Ok(ProviderStreamItem::ToolCall(call)))) => {
                    debug!(tool = %call.tool_name, "Tool requested mid-stream");
                    return Drained::ToolRequested(call);
                }
                Ok(Some(Ok(ProviderStreamItem::Done))) => return Drained::Finished,
                Ok(Some(Err(e))) => {
                    self.fail(OrchestrationError::from(e).to_string()).await;
                    return Drained::Stopped;
                }
                Ok(None) => {
                    self.fail("provider stream ended before completion".to_string())
                        .await;
                    return Drained::Stopped;
                }
                Err(_) => {
                    self.fail(OrchestrationError::from(ProviderError::Timeout).to_string())
                        .await;
                    return Drained::Stopped;
                }
            }
        }
    }

    /// Send an event unless the consumer cancelled or went away
    async fn emit(&self, event: StreamEvent) -> bool {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => false,
            sent = self.tx.send(event) => sent.is_ok(),
        }
    }

    async fn fail(&self, message: String) {
        warn!(error = %message, "Stream failed");
        self.logger.log(GenerationEvent::new(
            "stream_error",
            json!({ "error": message }),
        ));
        self.emit(StreamEvent::error(message)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::generation_client::ProviderStream;
    use async_trait::async_trait;
    use futures::stream;
    use genflow_domain::{GenerationResult, OutputShape, ToolDefinition};
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    type Script = Vec<Result<ProviderStreamItem, ProviderError>>;

    /// Each `stream()` call replays the next script
    struct ScriptedStreamClient {
        scripts: Mutex<VecDeque<Script>>,
        requests: Mutex<Vec<GenerationRequest>>,
    }

    impl ScriptedStreamClient {
        fn new(scripts: Vec<Script>) -> Self {
            Self {
                scripts: Mutex::new(scripts.into()),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl GenerationClient for ScriptedStreamClient {
        async fn complete(&self, _request: &GenerationRequest) -> Result<GenerationResult, ProviderError> {
            Err(ProviderError::Rejected("not used".into()))
        }

        async fn stream(&self, request: &GenerationRequest) -> Result<ProviderStream, ProviderError> {
            self.requests.lock().unwrap().push(request.clone());
            let script = self
                .scripts
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| ProviderError::Unavailable("no script".into()))?;
            Ok(Box::pin(stream::iter(script)))
        }
    }

    /// Emits one chunk, then never finishes
    struct EndlessClient {
        opened: AtomicUsize,
    }

    #[async_trait]
    impl GenerationClient for EndlessClient {
        async fn complete(&self, _request: &GenerationRequest) -> Result<GenerationResult, ProviderError> {
            Err(ProviderError::Rejected("not used".into()))
        }

        async fn stream(&self, _request: &GenerationRequest) -> Result<ProviderStream, ProviderError> {
            self.opened.fetch_add(1, Ordering::SeqCst);
            let first = stream::iter(vec![Ok(ProviderStreamItem::Text("first".into()))]);
            Ok(Box::pin(first.chain(stream::pending())))
        }
    }

    fn text(s: &str) -> Result<ProviderStreamItem, ProviderError> {
        Ok(ProviderStreamItem::Text(s.to_string()))
    }

    fn use_case(client: Arc<dyn GenerationClient>, registry: ToolRegistry) -> StreamUseCase {
        StreamUseCase::new(client, Arc::new(registry))
    }

    async fn drain(mut handle: StreamHandle) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        while let Some(event) = handle.recv().await {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn test_chunks_in_order_then_end() {
        let client = Arc::new(ScriptedStreamClient::new(vec![vec![
            text("Hel"),
            text("lo, "),
            text("campus!"),
            Ok(ProviderStreamItem::Done),
        ]]));
        let handle = use_case(client, ToolRegistry::new())
            .generate_stream("Say hello", None)
            .unwrap();

        let events = drain(handle).await;
        assert_eq!(
            events,
            vec![
                StreamEvent::chunk("Hel", 0),
                StreamEvent::chunk("lo, ", 1),
                StreamEvent::chunk("campus!", 2),
                StreamEvent::End,
            ]
        );
    }

    #[tokio::test]
    async fn test_collect_text_reproduces_provider_text() {
        let client = Arc::new(ScriptedStreamClient::new(vec![vec![
            text("The "),
            text("Career "),
            text("Fair"),
            Ok(ProviderStreamItem::Done),
        ]]));
        let text = use_case(client, ToolRegistry::new())
            .generate_stream("x", None)
            .unwrap()
            .collect_text()
            .await
            .unwrap();
        assert_eq!(text, "The Career Fair");
    }

    #[tokio::test]
    async fn test_dropped_connection_is_error_not_truncation() {
        let client = Arc::new(ScriptedStreamClient::new(vec![vec![text("partial")]]));
        let handle = use_case(client, ToolRegistry::new())
            .generate_stream("x", None)
            .unwrap();

        let events = drain(handle).await;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], StreamEvent::chunk("partial", 0));
        assert!(matches!(events[1], StreamEvent::Error { .. }));
    }

    #[tokio::test]
    async fn test_provider_error_mid_stream() {
        let client = Arc::new(ScriptedStreamClient::new(vec![vec![
            text("a"),
            Err(ProviderError::Unavailable("connection reset".into())),
            text("never"),
        ]]));
        let err = use_case(client, ToolRegistry::new())
            .generate_stream("x", None)
            .unwrap()
            .collect_text()
            .await
            .unwrap_err();
        assert!(matches!(err, OrchestrationError::Stream(ref m) if m.contains("connection reset")));
    }

    #[tokio::test]
    async fn test_tool_call_mid_stream_continues_indices() {
        let handler_calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&handler_calls);
        let registry = ToolRegistry::new().with_tool(ToolDefinition::from_fn(
            "getCampusEvents",
            "events",
            OutputShape::empty_object(),
            OutputShape::any(),
            move |_| {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(json!([{"name": "Career Fair"}]))
                }
            },
        ));
        let client = Arc::new(ScriptedStreamClient::new(vec![
            vec![
                text("Let me check. "),
                Ok(ProviderStreamItem::ToolCall(ToolCall::new("getCampusEvents"))),
            ],
            vec![text("The Career Fair."), Ok(ProviderStreamItem::Done)],
        ]));

        let handle = use_case(client.clone(), registry)
            .generate_stream("What events?", Some(&["getCampusEvents"]))
            .unwrap();
        let events = drain(handle).await;

        assert_eq!(
            events,
            vec![
                StreamEvent::chunk("Let me check. ", 0),
                StreamEvent::chunk("The Career Fair.", 1),
                StreamEvent::End,
            ]
        );
        assert_eq!(handler_calls.load(Ordering::SeqCst), 1);
        let requests = client.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].transcript.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_tool_mid_stream_ends_with_error() {
        let client = Arc::new(ScriptedStreamClient::new(vec![vec![Ok(
            ProviderStreamItem::ToolCall(ToolCall::new("nope")),
        )]]));
        let events = drain(
            use_case(client, ToolRegistry::new())
                .generate_stream("x", None)
                .unwrap(),
        )
        .await;
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], StreamEvent::Error { message } if message.contains("nope")));
    }

    struct Exploding;

    #[async_trait]
    impl genflow_domain::tool::ToolHandler for Exploding {
        async fn call(
            &self,
            _input: serde_json::Value,
        ) -> Result<serde_json::Value, genflow_domain::tool::ToolError> {
            panic!("handler exploded")
        }
    }

    #[tokio::test]
    async fn test_panicking_tool_mid_stream_ends_with_error() {
        let registry = ToolRegistry::new().with_tool(ToolDefinition::new(
            "getCampusEvents",
            "events",
            OutputShape::empty_object(),
            OutputShape::any(),
            Exploding,
        ));
        let client = Arc::new(ScriptedStreamClient::new(vec![vec![
            text("Let me check. "),
            Ok(ProviderStreamItem::ToolCall(ToolCall::new("getCampusEvents"))),
        ]]));

        let handle = use_case(client.clone(), registry)
            .generate_stream("What events?", Some(&["getCampusEvents"]))
            .unwrap();
        let events = drain(handle).await;

        assert_eq!(events.len(), 2);
        assert_eq!(events[0], StreamEvent::chunk("Let me check. ", 0));
        assert!(matches!(
            &events[1],
            StreamEvent::Error { message } if message.contains("handler panicked")
        ));
        assert_eq!(client.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_cancel_stops_delivery_and_provider_calls() {
        let client = Arc::new(EndlessClient {
            opened: AtomicUsize::new(0),
        });
        let mut handle = use_case(client.clone(), ToolRegistry::new())
            .generate_stream("x", None)
            .unwrap();

        assert_eq!(handle.recv().await, Some(StreamEvent::chunk("first", 0)));
        handle.cancel();
        assert!(handle.is_cancelled());
        assert_eq!(handle.recv().await, None);
        assert_eq!(handle.recv().await, None);

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(client.opened.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_nothing_after_terminal_event() {
        let client = Arc::new(ScriptedStreamClient::new(vec![vec![Ok(ProviderStreamItem::Done)]]));
        let mut handle = use_case(client, ToolRegistry::new())
            .generate_stream("x", None)
            .unwrap();
        assert_eq!(handle.recv().await, Some(StreamEvent::End));
        assert_eq!(handle.recv().await, None);
    }

    #[tokio::test]
    async fn test_backpressure_bound() {
        let script: Script = (0..10)
            .map(|i| text(&i.to_string()))
            .chain(std::iter::once(Ok(ProviderStreamItem::Done)))
            .collect();
        let client = Arc::new(ScriptedStreamClient::new(vec![script]));
        let uc = StreamUseCase::new(client, Arc::new(ToolRegistry::new()))
            .with_config(OrchestrationConfig::default().with_stream_buffer(2));

        let handle = uc.generate_stream("x", None).unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        let events = drain(handle).await;
        assert_eq!(events.len(), 11);
        for (i, event) in events.iter().take(10).enumerate() {
            assert_eq!(event, &StreamEvent::chunk(i.to_string(), i as u64));
        }
    }
}

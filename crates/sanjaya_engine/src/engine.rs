use std::sync::atomic::{AtomicU64, Ordering};

use sanjaya_core::Phase;
use sanjaya_logging::{sanjaya_debug, sanjaya_info, sanjaya_warn};
use tokio_util::sync::CancellationToken;

use crate::dispatch::{Dispatch, EventDispatcher, EventHandler};
use crate::fetch::{ByteSource, StreamOpener};
use crate::frame::FrameParser;
use crate::session::{Navigator, Presenter, WorkflowSession};
use crate::{StreamOutcome, StreamSummary, TransportError};

static NEXT_RUN_ID: AtomicU64 = AtomicU64::new(1);

/// Single-consumer pull loop: bytes to frames to the dispatcher.
///
/// Each chunk is fully framed and dispatched before the next one is
/// requested. Cancellation stops reading and drops any partial line; it
/// never touches handler state.
pub async fn consume<S, H>(
    source: &mut S,
    parser: &mut FrameParser,
    dispatcher: &mut EventDispatcher<H>,
    cancel: &CancellationToken,
) -> Result<StreamSummary, TransportError>
where
    S: ByteSource + ?Sized,
    H: EventHandler,
{
    let mut summary = StreamSummary::default();
    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            chunk = source.next_chunk() => Some(chunk),
        };

        let chunk = match next {
            None => {
                summary.outcome = StreamOutcome::Cancelled;
                summary.residual_bytes = parser.finish();
                sanjaya_info!("Stream cancelled after {} chunks", summary.chunks);
                return Ok(summary);
            }
            Some(Err(err)) => {
                let dropped = parser.finish();
                sanjaya_warn!("Transport failed: {} ({} buffered bytes dropped)", err, dropped);
                return Err(err);
            }
            Some(Ok(None)) => {
                summary.residual_bytes = parser.finish();
                summary.outcome = if dispatcher.is_terminated() {
                    StreamOutcome::Terminated
                } else {
                    StreamOutcome::EndOfStream
                };
                if summary.residual_bytes > 0 {
                    sanjaya_debug!(
                        "Discarding {} bytes of unterminated trailing frame",
                        summary.residual_bytes
                    );
                }
                sanjaya_info!(
                    "Stream ended: {} chunks={} events={} skipped={}",
                    summary.outcome,
                    summary.chunks,
                    summary.events_dispatched,
                    summary.frames_skipped
                );
                return Ok(summary);
            }
            Some(Ok(Some(chunk))) => chunk,
        };

        summary.chunks += 1;
        for frame in parser.feed(&chunk) {
            match frame {
                Ok(event) => match dispatcher.dispatch(event) {
                    Dispatch::Delivered | Dispatch::Terminated => summary.events_dispatched += 1,
                    Dispatch::Ignored => summary.events_ignored += 1,
                },
                Err(err) => {
                    summary.frames_skipped += 1;
                    sanjaya_warn!("Skipping frame: {}", err);
                }
            }
        }
    }
}

/// What happened to one submitted query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub run_id: u64,
    /// `false` when the session refused the query (blank, or a run in flight).
    pub accepted: bool,
    pub phase: Phase,
    pub summary: Option<StreamSummary>,
    pub transport_error: Option<TransportError>,
}

/// Runs queries end to end against a [`StreamOpener`].
pub struct QueryEngine {
    opener: Box<dyn StreamOpener>,
    max_line_bytes: usize,
}

impl QueryEngine {
    pub fn new(opener: Box<dyn StreamOpener>, max_line_bytes: usize) -> Self {
        Self {
            opener,
            max_line_bytes,
        }
    }

    /// Submits `query` to the session, streams its events and reduces them.
    ///
    /// Transport failures and a close before any terminal event both leave
    /// the session in the errored phase. Cancellation leaves tasks and
    /// progress as the last reduced event left them, and frees the session
    /// for the next query.
    pub async fn run<P, N>(
        &self,
        session: &mut WorkflowSession<P, N>,
        query: &str,
        cancel: &CancellationToken,
    ) -> RunReport
    where
        P: Presenter,
        N: Navigator,
    {
        let run_id = NEXT_RUN_ID.fetch_add(1, Ordering::Relaxed);
        sanjaya_logging::set_run_id(run_id);

        let Some(query) = session.submit(query) else {
            sanjaya_debug!("Query rejected by session");
            return RunReport {
                run_id,
                accepted: false,
                phase: session.state().phase(),
                summary: None,
                transport_error: None,
            };
        };
        sanjaya_info!("Starting query len={}", query.len());

        let opened = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            source = self.opener.open(&query) => Some(source),
        };
        let mut source = match opened {
            None => {
                session.cancel();
                return RunReport {
                    run_id,
                    accepted: true,
                    phase: session.state().phase(),
                    summary: Some(StreamSummary {
                        outcome: StreamOutcome::Cancelled,
                        ..StreamSummary::default()
                    }),
                    transport_error: None,
                };
            }
            Some(Err(err)) => {
                sanjaya_warn!("Failed to open stream: {}", err);
                session.fail(err.to_string());
                return RunReport {
                    run_id,
                    accepted: true,
                    phase: session.state().phase(),
                    summary: None,
                    transport_error: Some(err),
                };
            }
            Some(Ok(source)) => source,
        };

        let mut parser = FrameParser::new(self.max_line_bytes);
        let mut dispatcher = EventDispatcher::new(&mut *session);
        let result = consume(source.as_mut(), &mut parser, &mut dispatcher, cancel).await;
        drop(dispatcher);

        let (summary, transport_error) = match result {
            Ok(summary) if summary.outcome == StreamOutcome::EndOfStream => {
                let err = TransportError::PrematureClose;
                sanjaya_warn!("{}", err);
                session.fail(err.to_string());
                (Some(summary), Some(err))
            }
            Ok(summary) => {
                if summary.outcome == StreamOutcome::Cancelled {
                    session.cancel();
                }
                (Some(summary), None)
            }
            Err(err) => {
                session.fail(err.to_string());
                (None, Some(err))
            }
        };

        RunReport {
            run_id,
            accepted: true,
            phase: session.state().phase(),
            summary,
            transport_error,
        }
    }
}

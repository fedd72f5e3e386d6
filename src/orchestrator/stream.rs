//! Background stream task and its completion guarantee.

use futures::StreamExt;
use tokio::sync::{mpsc, oneshot};

use crate::client::RagClient;
use crate::models::QueryRequest;
use crate::sse::StreamEvent;

/// How a stream attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamOutcome {
    /// `done` received
    Done,
    /// Body ended without `done`
    Ended,
    /// An `error` event or a transport failure was reported
    Failed,
    /// Cancelled by the user; the connection was dropped
    Cancelled,
}

/// Message from the stream task to the UI-side owner, in wire order.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamUpdate {
    /// A decoded event of stream `id`
    Event { id: u64, event: StreamEvent },
    /// Stream `id` is over. Sent exactly once per attempt.
    Finished { id: u64, outcome: StreamOutcome },
}

impl StreamUpdate {
    pub fn id(&self) -> u64 {
        match self {
            StreamUpdate::Event { id, .. } | StreamUpdate::Finished { id, .. } => *id,
        }
    }
}

/// Owner-side handle of the running stream.
#[derive(Debug)]
pub struct StreamHandle {
    id: u64,
    cancel: Option<oneshot::Sender<()>>,
}

impl StreamHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Ask the task to drop the connection. Returns false if already asked.
    pub fn cancel(&mut self) -> bool {
        match self.cancel.take() {
            Some(tx) => {
                // The task may already be gone; its completion is sent anyway.
                let _ = tx.send(());
                true
            }
            None => false,
        }
    }

    pub fn is_cancel_requested(&self) -> bool {
        self.cancel.is_none()
    }
}

/// Sends `Finished` when dropped, whichever way the task exits.
struct CompletionGuard<M: From<StreamUpdate>> {
    id: u64,
    outcome: StreamOutcome,
    tx: mpsc::UnboundedSender<M>,
}

impl<M: From<StreamUpdate>> Drop for CompletionGuard<M> {
    fn drop(&mut self) {
        tracing::info!("Stream {} finished: {:?}", self.id, self.outcome);
        let _ = self.tx.send(M::from(StreamUpdate::Finished {
            id: self.id,
            outcome: self.outcome,
        }));
    }
}

/// Spawn the task for stream `id` and return its handle.
pub(crate) fn spawn_stream<M>(
    client: RagClient,
    request: QueryRequest,
    id: u64,
    tx: mpsc::UnboundedSender<M>,
) -> StreamHandle
where
    M: From<StreamUpdate> + Send + 'static,
{
    let (cancel_tx, cancel_rx) = oneshot::channel();
    tokio::spawn(run_stream(client, request, id, tx, cancel_rx));
    StreamHandle {
        id,
        cancel: Some(cancel_tx),
    }
}

async fn run_stream<M>(
    client: RagClient,
    request: QueryRequest,
    id: u64,
    tx: mpsc::UnboundedSender<M>,
    mut cancel_rx: oneshot::Receiver<()>,
) where
    M: From<StreamUpdate> + Send + 'static,
{
    let mut guard = CompletionGuard {
        id,
        outcome: StreamOutcome::Ended,
        tx: tx.clone(),
    };

    // A dropped handle counts as a cancel request.
    let mut events = tokio::select! {
        events = client.stream_events(&request) => events,
        _ = &mut cancel_rx => {
            guard.outcome = StreamOutcome::Cancelled;
            return;
        }
    };

    loop {
        tokio::select! {
            biased;
            _ = &mut cancel_rx => {
                guard.outcome = StreamOutcome::Cancelled;
                break;
            }
            next = events.next() => {
                let Some(event) = next else { break };
                match &event {
                    StreamEvent::Done if guard.outcome != StreamOutcome::Failed => {
                        guard.outcome = StreamOutcome::Done
                    }
                    StreamEvent::Error(_) => guard.outcome = StreamOutcome::Failed,
                    _ => {}
                }
                if tx.send(M::from(StreamUpdate::Event { id, event })).is_err() {
                    tracing::debug!("Stream {} receiver gone, stopping", id);
                    break;
                }
            }
        }
    }
    // `events` is dropped before the guard, closing the connection first.
    drop(events);
}

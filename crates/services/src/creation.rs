use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use api::{LearningPathApi, PayloadStream};
use futures_util::StreamExt;
use studysync_core::model::{
    AttemptId, CreationRequest, EventOutcome, LearningPathId, OnboardingMachine, StreamMessage,
    StreamSignal,
};
use tracing::{debug, info, warn};

use crate::Clock;
use crate::error::CreationError;

/// Opens learning-path creation streams, keeping at most one alive.
///
/// Every `open` claims a new generation; subscriptions from older
/// generations stop yielding as soon as they notice.
#[derive(Clone)]
pub struct CreationService {
    clock: Clock,
    learning_paths: Arc<dyn LearningPathApi>,
    idle_timeout: Option<Duration>,
    generation: Arc<AtomicU64>,
}

impl CreationService {
    #[must_use]
    pub fn new(
        clock: Clock,
        learning_paths: Arc<dyn LearningPathApi>,
        idle_timeout: Option<Duration>,
    ) -> Self {
        Self {
            clock,
            learning_paths,
            idle_timeout,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    #[must_use]
    pub fn idle_timeout(&self) -> Option<Duration> {
        self.idle_timeout
    }

    /// Open the stream for `request`, superseding any earlier subscription.
    ///
    /// # Errors
    ///
    /// Returns `CreationError::Api` if the stream cannot be opened, or
    /// `CreationError::Superseded` if another attempt started meanwhile.
    pub async fn open(
        &self,
        request: &CreationRequest,
    ) -> Result<ProgressSubscription, CreationError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        info!(
            attempt = %request.attempt,
            topic = request.topic.as_str(),
            commitment = request.commitment.as_str(),
            "starting learning path creation"
        );

        let stream = self.learning_paths.creation_stream(request).await?;
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(attempt = %request.attempt, "creation stream superseded before first event");
            return Err(CreationError::Superseded);
        }

        Ok(ProgressSubscription {
            attempt: request.attempt,
            generation,
            live: Arc::clone(&self.generation),
            stream: Some(stream),
            clock: self.clock,
            idle_timeout: self.idle_timeout,
        })
    }

    /// Stop whichever subscription is current, e.g. when leaving the page.
    pub fn close_current(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Run one full attempt against `machine`: begin, open, drive to a
    /// terminal outcome.
    ///
    /// Returns the new learning path id on success. Failures are recorded
    /// on the machine, which is back on the commitment step.
    ///
    /// # Errors
    ///
    /// Returns `CreationError::Workflow` if the machine cannot start an attempt.
    pub async fn create(
        &self,
        machine: &mut OnboardingMachine,
    ) -> Result<Option<LearningPathId>, CreationError> {
        let request = machine.begin_creation()?;
        let mut subscription = match self.open(&request).await {
            Ok(subscription) => subscription,
            Err(err) => {
                warn!(attempt = %request.attempt, error = %err, "could not open creation stream");
                machine.creation_failed(request.attempt, err.user_message());
                return Ok(None);
            }
        };
        Ok(subscription.drive(|message| machine.receive(message)).await)
    }
}

/// A cancellable, attempt-scoped view of one creation stream.
pub struct ProgressSubscription {
    attempt: AttemptId,
    generation: u64,
    live: Arc<AtomicU64>,
    stream: Option<PayloadStream>,
    clock: Clock,
    idle_timeout: Option<Duration>,
}

impl ProgressSubscription {
    #[must_use]
    pub fn attempt(&self) -> AttemptId {
        self.attempt
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.stream.is_some() && self.live.load(Ordering::SeqCst) == self.generation
    }

    /// Drop the underlying stream. Idempotent.
    pub fn close(&mut self) {
        if self.stream.take().is_some() {
            debug!(attempt = %self.attempt, "creation stream closed");
        }
    }

    /// Wait for the next message.
    ///
    /// Yields `Disconnected` once when the transport fails or ends, and
    /// `TimedOut` once when the idle timeout expires; both close the
    /// subscription. Returns `None` once closed or superseded.
    pub async fn next(&mut self) -> Option<StreamMessage> {
        if !self.is_open() {
            self.close();
            return None;
        }
        let stream = self.stream.as_mut()?;
        let waited = match self.idle_timeout {
            Some(limit) => tokio::time::timeout(limit, stream.next()).await.ok(),
            None => Some(stream.next().await),
        };

        if self.live.load(Ordering::SeqCst) != self.generation {
            self.close();
            return None;
        }

        let Some(item) = waited else {
            warn!(attempt = %self.attempt, "no creation progress within the idle timeout");
            self.close();
            return Some(self.message(StreamSignal::TimedOut));
        };

        let message = match item {
            Some(Ok(payload)) => {
                StreamMessage::decode(self.attempt, self.clock.now(), &payload)
            }
            Some(Err(err)) => {
                warn!(attempt = %self.attempt, error = %err, "creation stream failed");
                self.close();
                self.message(StreamSignal::Disconnected)
            }
            None => {
                debug!(attempt = %self.attempt, "creation stream ended");
                self.close();
                self.message(StreamSignal::Disconnected)
            }
        };

        match &message.signal {
            StreamSignal::Malformed { payload, reason } => {
                warn!(attempt = %self.attempt, %reason, payload = payload.as_str(), "dropping malformed progress payload");
            }
            StreamSignal::Event(event) if event.is_terminal() => self.close(),
            _ => {}
        }
        Some(message)
    }

    /// Feed messages to `apply` until it reports a terminal outcome or the
    /// stream is exhausted. Closes the subscription before returning.
    pub async fn drive<F>(&mut self, mut apply: F) -> Option<LearningPathId>
    where
        F: FnMut(StreamMessage) -> EventOutcome,
    {
        let mut created = None;
        while let Some(message) = self.next().await {
            let outcome = apply(message);
            if outcome.is_terminal() {
                if let EventOutcome::Completed(id) = outcome {
                    info!(attempt = %self.attempt, learning_path_id = %id, "learning path created");
                    created = Some(id);
                }
                break;
            }
        }
        self.close();
        created
    }

    fn message(&self, signal: StreamSignal) -> StreamMessage {
        StreamMessage::new(self.attempt, self.clock.now(), signal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::{InMemoryBackend, ScriptedFrame};
    use studysync_core::model::{OnboardingVariant, ProgressEvent};
    use studysync_core::time::fixed_clock;

    fn request(machine: &mut OnboardingMachine) -> CreationRequest {
        machine.begin_creation().unwrap()
    }

    fn simple_machine() -> OnboardingMachine {
        let mut machine = OnboardingMachine::new(OnboardingVariant::Simple);
        machine.set_topic_input("Rust").unwrap();
        machine.submit_topic().unwrap();
        machine
    }

    fn service(backend: &InMemoryBackend, timeout: Option<Duration>) -> CreationService {
        CreationService::new(fixed_clock(), Arc::new(backend.clone()), timeout)
    }

    #[tokio::test]
    async fn terminal_event_closes_subscription() {
        let backend = InMemoryBackend::new();
        backend.push_stream(vec![
            ScriptedFrame::payload(r#"{"type":"error","message":"boom"}"#),
            ScriptedFrame::payload(r#"{"type":"progress","phase":"late"}"#),
        ]);
        let service = service(&backend, None);
        let mut machine = simple_machine();

        let mut subscription = service.open(&request(&mut machine)).await.unwrap();
        let first = subscription.next().await.unwrap();
        assert!(matches!(
            first.signal,
            StreamSignal::Event(ProgressEvent::Error { .. })
        ));
        assert!(!subscription.is_open());
        assert!(subscription.next().await.is_none());
    }

    #[tokio::test]
    async fn clean_end_reports_disconnect_once() {
        let backend = InMemoryBackend::new();
        backend.push_stream(vec![ScriptedFrame::payload(
            r#"{"type":"progress","phase":"profiling","message":"Profiling"}"#,
        )]);
        let service = service(&backend, None);
        let mut machine = simple_machine();

        let mut subscription = service.open(&request(&mut machine)).await.unwrap();
        assert!(matches!(
            subscription.next().await.unwrap().signal,
            StreamSignal::Event(_)
        ));
        assert_eq!(
            subscription.next().await.unwrap().signal,
            StreamSignal::Disconnected
        );
        assert!(subscription.next().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_stream_times_out() {
        let backend = InMemoryBackend::new();
        backend.push_stream(vec![ScriptedFrame::Stall]);
        let service = service(&backend, Some(Duration::from_secs(600)));
        let mut machine = simple_machine();

        let mut subscription = service.open(&request(&mut machine)).await.unwrap();
        assert_eq!(
            subscription.next().await.unwrap().signal,
            StreamSignal::TimedOut
        );
        assert!(!subscription.is_open());
    }

    #[tokio::test]
    async fn close_current_stops_open_subscription() {
        let backend = InMemoryBackend::new();
        backend.push_stream(vec![
            ScriptedFrame::payload(r#"{"type":"progress","phase":"profiling"}"#),
            ScriptedFrame::Stall,
        ]);
        let service = service(&backend, None);
        let mut machine = simple_machine();

        let mut subscription = service.open(&request(&mut machine)).await.unwrap();
        service.close_current();
        assert!(!subscription.is_open());
        assert!(subscription.next().await.is_none());
    }
}

//! Webhook ingestion: partner registry, HMAC verification, a single-consumer
//! queue, and the per-event retry state machine.
//!
//! Lifecycle: `RECEIVED -> PROCESSING -> COMPLETED`, or
//! `RECEIVED -> PROCESSING -> RETRYING -> PROCESSING -> {COMPLETED | FAILED}`.
//! One consumer task drains the queue; `processing` guards against a second
//! consumer starting while one is already running, matching the
//! single-writer discipline the rest of the platform uses for shared state.

pub mod error;
pub mod handlers;
pub mod model;
pub mod partners;

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hmac::{Hmac, Mac};
use parking_lot::Mutex as SyncMutex;
use platform_core::now_rfc3339;
use rand::RngCore;
use serde_json::{json, Map, Value};
use sha2::Sha256;
use tokio::sync::{mpsc, Mutex as AsyncMutex};

pub use error::{Result, WebhookError};
pub use model::{EventType, WebhookEvent, WebhookPartner, WebhookStats, WebhookStatus};

type HmacSha256 = Hmac<Sha256>;
pub type Handler = dyn Fn(&mut WebhookEvent) -> Result<()> + Send + Sync;

struct State {
    events: HashMap<String, WebhookEvent>,
}

/// Partner registry, queue, and per-event state, shared by clone via `Arc`.
#[derive(Clone)]
pub struct WebhookPipeline {
    state: Arc<SyncMutex<State>>,
    partners: Arc<HashMap<String, WebhookPartner>>,
    sender: mpsc::UnboundedSender<String>,
    receiver: Arc<AsyncMutex<mpsc::UnboundedReceiver<String>>>,
    processing: Arc<AtomicBool>,
    handler: Arc<Handler>,
    /// Multiplied by `2^retry_count` to compute the retry delay. One real
    /// minute in production; tests shrink this to keep the suite fast.
    retry_unit: Duration,
}

impl WebhookPipeline {
    pub fn new() -> Self {
        Self::with_handler(Arc::new(handlers::dispatch))
    }

    pub fn with_handler(handler: Arc<Handler>) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            state: Arc::new(SyncMutex::new(State { events: HashMap::new() })),
            partners: Arc::new(partners::default_partners()),
            sender,
            receiver: Arc::new(AsyncMutex::new(receiver)),
            processing: Arc::new(AtomicBool::new(false)),
            handler,
            retry_unit: Duration::from_secs(60),
        }
    }

    pub fn with_retry_unit(mut self, unit: Duration) -> Self {
        self.retry_unit = unit;
        self
    }

    pub fn partner(&self, partner_id: &str) -> Option<WebhookPartner> {
        self.partners.get(partner_id).cloned()
    }

    /// `valid ⇔ partner exists ∧ active ∧ HMAC_SHA256(secret, payload) ==`
    /// the hex after `sha256=`. Uses `Mac::verify_slice`, which compares in
    /// constant time.
    pub fn verify_signature(&self, partner_id: &str, payload: &str, signature: &str) -> bool {
        let Some(partner) = self.partners.get(partner_id) else { return false };
        if !partner.active {
            return false;
        }
        let Some(hex_sig) = signature.strip_prefix("sha256=") else { return false };
        let Ok(sig_bytes) = hex::decode(hex_sig) else { return false };
        let Ok(mut mac) = HmacSha256::new_from_slice(partner.secret.as_bytes()) else { return false };
        mac.update(payload.as_bytes());
        mac.verify_slice(&sig_bytes).is_ok()
    }

    /// Admits an event: validates the partner and event type, assigns an
    /// id, stores it `RECEIVED`, and enqueues it for the consumer.
    pub async fn submit(
        &self,
        partner_id: &str,
        event_type: EventType,
        data: Map<String, Value>,
        signature: Option<String>,
    ) -> Result<WebhookEvent> {
        let partner = self
            .partners
            .get(partner_id)
            .cloned()
            .ok_or_else(|| WebhookError::UnknownPartner(partner_id.to_string()))?;
        if !partner.active {
            return Err(WebhookError::InactivePartner(partner_id.to_string()));
        }
        if !partner.supports(event_type) {
            return Err(WebhookError::UnsupportedEvent(event_type.as_str().to_string()));
        }

        let event_id = format!("{partner_id}_{}_{}", random_hex8(), unix_seconds());
        let event = WebhookEvent {
            event_id: event_id.clone(),
            partner_id: partner_id.to_string(),
            event_type,
            data,
            timestamp: now_rfc3339(),
            status: WebhookStatus::Received,
            signature,
            retry_count: 0,
            max_retries: partner.max_retries,
            next_retry: None,
            error_message: None,
            processed_at: None,
        };
        self.state.lock().events.insert(event_id.clone(), event.clone());
        tracing::info!(event_id, partner_id, event_type = %event_type, "webhook event received");
        self.requeue(event_id);
        Ok(event)
    }

    fn requeue(&self, event_id: String) {
        let _ = self.sender.send(event_id);
        self.ensure_consumer();
    }

    fn ensure_consumer(&self) {
        if self
            .processing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            let pipeline = self.clone();
            tokio::spawn(async move { pipeline.run_consumer().await });
        }
    }

    /// Drains the queue until it's empty, then hands the running slot back.
    ///
    /// The handoff at the end is the delicate part: if we simply stored
    /// `false` after seeing an empty queue, a `submit`/`requeue` landing in
    /// the gap between our last `try_recv` and that store would enqueue an
    /// event and find `processing` still `true`, so `ensure_consumer` would
    /// decline to spawn a replacement -- the event would sit in the channel
    /// until some unrelated submit happened to come along later. Resetting
    /// the flag and re-checking the channel while still holding the
    /// receiver lock closes that window: any send that raced the reset is
    /// either visible to the re-check (so we keep draining) or happened
    /// after the reset (so the sender's own `ensure_consumer` call will see
    /// `false` and spawn a consumer itself).
    async fn run_consumer(&self) {
        loop {
            let mut receiver = self.receiver.lock().await;
            match receiver.try_recv() {
                Ok(event_id) => {
                    drop(receiver);
                    self.process_event(&event_id).await;
                }
                Err(_) => {
                    self.processing.store(false, Ordering::SeqCst);
                    match receiver.try_recv() {
                        Ok(event_id) => {
                            drop(receiver);
                            if self
                                .processing
                                .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
                                .is_err()
                            {
                                // Another consumer already spun up in the
                                // gap; finish this one event ourselves and
                                // let that consumer own the queue from here.
                                self.process_event(&event_id).await;
                                return;
                            }
                            self.process_event(&event_id).await;
                        }
                        Err(_) => return,
                    }
                }
            }
        }
    }

    async fn process_event(&self, event_id: &str) {
        let Some(mut event) = self.state.lock().events.get(event_id).cloned() else { return };
        event.status = WebhookStatus::Processing;
        self.state.lock().events.insert(event_id.to_string(), event.clone());

        match (self.handler)(&mut event) {
            Ok(()) => {
                event.status = WebhookStatus::Completed;
                event.processed_at = Some(now_rfc3339());
                event.error_message = None;
                tracing::info!(event_id, "webhook event completed");
                self.state.lock().events.insert(event_id.to_string(), event);
            }
            Err(err) => {
                event.error_message = Some(err.to_string());
                if event.retry_count < event.max_retries {
                    self.state.lock().events.insert(event_id.to_string(), event);
                    self.schedule_retry(event_id).await;
                } else {
                    event.status = WebhookStatus::Failed;
                    tracing::warn!(event_id, "webhook event failed permanently");
                    self.state.lock().events.insert(event_id.to_string(), event);
                }
            }
        }
    }

    /// Exponential backoff: the kth retry fires `2^k` minutes after the
    /// failing attempt. The timer runs in its own task so the consumer
    /// keeps draining other events in the meantime.
    async fn schedule_retry(&self, event_id: &str) {
        let delay_minutes = {
            let mut state = self.state.lock();
            let event = state.events.get_mut(event_id).expect("event just inserted");
            event.retry_count += 1;
            event.status = WebhookStatus::Retrying;
            let delay_minutes = 2u32.pow(event.retry_count);
            let next_retry = now_rfc3339_plus_minutes(delay_minutes);
            event.next_retry = Some(next_retry);
            delay_minutes
        };
        tracing::info!(event_id, delay_minutes, "webhook event scheduled for retry");

        let pipeline = self.clone();
        let event_id = event_id.to_string();
        let wait = self.retry_unit * delay_minutes;
        tokio::spawn(async move {
            tokio::time::sleep(wait).await;
            pipeline.requeue(event_id);
        });
    }

    pub fn get_event(&self, event_id: &str) -> Option<WebhookEvent> {
        self.state.lock().events.get(event_id).cloned()
    }

    pub fn partner_events(&self, partner_id: &str, limit: usize) -> Vec<WebhookEvent> {
        let state = self.state.lock();
        let mut events: Vec<WebhookEvent> = state
            .events
            .values()
            .filter(|e| e.partner_id == partner_id)
            .cloned()
            .collect();
        events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        events.truncate(limit);
        events
    }

    pub fn events_by_status(&self, status: WebhookStatus) -> Vec<WebhookEvent> {
        self.state
            .lock()
            .events
            .values()
            .filter(|e| e.status == status)
            .cloned()
            .collect()
    }

    pub fn stats(&self) -> WebhookStats {
        let state = self.state.lock();
        let mut status_distribution: Map<String, Value> = Map::new();
        let mut partner_distribution: Map<String, Value> = Map::new();
        for event in state.events.values() {
            let status_key = event.status.as_str().to_string();
            let count = status_distribution.get(&status_key).and_then(Value::as_u64).unwrap_or(0);
            status_distribution.insert(status_key, json!(count + 1));
            let partner_count = partner_distribution
                .get(&event.partner_id)
                .and_then(Value::as_u64)
                .unwrap_or(0);
            partner_distribution.insert(event.partner_id.clone(), json!(partner_count + 1));
        }
        WebhookStats {
            total_events: state.events.len(),
            status_distribution,
            partner_distribution,
            active_partners: self.partners.values().filter(|p| p.active).count(),
            queue_size: 0,
        }
    }
}

impl Default for WebhookPipeline {
    fn default() -> Self {
        Self::new()
    }
}

fn random_hex8() -> String {
    let mut bytes = [0u8; 4];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

fn unix_seconds() -> i64 {
    chrono::Utc::now().timestamp()
}

fn now_rfc3339_plus_minutes(minutes: u32) -> String {
    let at = chrono::Utc::now() + chrono::Duration::minutes(minutes as i64);
    platform_core::time::to_rfc3339(at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn illumina_payload() -> Map<String, Value> {
        json!({"sample_id": "s1", "file_urls": []}).as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn verify_signature_accepts_matching_hmac_and_rejects_bit_flip() {
        let pipeline = WebhookPipeline::new();
        let payload = r#"{"event_type":"sequencing_complete"}"#;
        let partner = pipeline.partner("illumina").unwrap();
        let mut mac = HmacSha256::new_from_slice(partner.secret.as_bytes()).unwrap();
        mac.update(payload.as_bytes());
        let signature = format!("sha256={}", hex::encode(mac.finalize().into_bytes()));

        assert!(pipeline.verify_signature("illumina", payload, &signature));
        let mut flipped = signature.clone();
        flipped.replace_range(8..9, "0");
        if flipped == signature {
            flipped.replace_range(8..9, "1");
        }
        assert!(!pipeline.verify_signature("illumina", payload, &flipped));
        assert!(!pipeline.verify_signature("illumina", "tampered payload", &signature));
    }

    #[tokio::test]
    async fn submit_rejects_unsupported_event_type() {
        let pipeline = WebhookPipeline::new();
        let err = pipeline
            .submit("illumina", EventType::UploadComplete, Map::new(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, WebhookError::UnsupportedEvent(_)));
    }

    #[tokio::test]
    async fn submit_runs_the_happy_path_to_completion() {
        let pipeline = WebhookPipeline::new().with_retry_unit(Duration::from_millis(5));
        let event = pipeline
            .submit("illumina", EventType::SequencingComplete, illumina_payload(), None)
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;
        let stored = pipeline.get_event(&event.event_id).unwrap();
        assert_eq!(stored.status, WebhookStatus::Completed);
        assert_eq!(stored.retry_count, 0);
    }

    #[tokio::test]
    async fn s6_retries_once_then_completes() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_in_handler = calls.clone();
        let handler: Arc<Handler> = Arc::new(move |event: &mut WebhookEvent| {
            if calls_in_handler.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(WebhookError::HandlerFailed("synthetic transient failure".to_string()))
            } else {
                handlers::dispatch(event)
            }
        });
        let pipeline = WebhookPipeline::with_handler(handler).with_retry_unit(Duration::from_millis(5));
        let event = pipeline
            .submit("illumina", EventType::SequencingComplete, illumina_payload(), None)
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(100)).await;
        let stored = pipeline.get_event(&event.event_id).unwrap();
        assert_eq!(stored.status, WebhookStatus::Completed);
        assert_eq!(stored.retry_count, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn exhausting_retries_marks_event_failed() {
        let handler: Arc<Handler> =
            Arc::new(|_event: &mut WebhookEvent| Err(WebhookError::HandlerFailed("always fails".to_string())));
        let pipeline = WebhookPipeline::with_handler(handler).with_retry_unit(Duration::from_millis(2));
        let event = pipeline
            .submit("illumina", EventType::SequencingComplete, illumina_payload(), None)
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(200)).await;
        let stored = pipeline.get_event(&event.event_id).unwrap();
        assert_eq!(stored.status, WebhookStatus::Failed);
        assert_eq!(stored.retry_count, stored.max_retries);
    }
}

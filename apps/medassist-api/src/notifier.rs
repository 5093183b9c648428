//! Background delivery of reception requests to the CRM.
//!
//! Request handlers only enqueue. A single worker task drains the queue and
//! pushes each record through the configured `CrmForwarder`, retrying
//! transient failures with exponential backoff. Delivery outcomes are only
//! visible in the logs; the HTTP response was sent long before.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use medassist_domain::{
    crm::CrmError,
    ports::{CrmForwarder, IntakeNotifier},
    ReceptionRecord,
};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

/// How long shutdown waits for queued notifications before abandoning them
const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per record, first try included
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Delay before the attempt following `attempt` (1-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

/// Enqueues persisted reception records for CRM delivery
///
/// Cheap to clone; all clones feed the same worker.
#[derive(Clone)]
pub struct CrmDispatcher {
    inner: Arc<DispatcherInner>,
}

struct DispatcherInner {
    sender: Mutex<Option<mpsc::Sender<ReceptionRecord>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl CrmDispatcher {
    /// Start the delivery worker on the current tokio runtime
    pub fn spawn<F>(forwarder: F, policy: RetryPolicy, capacity: usize) -> Self
    where
        F: CrmForwarder + 'static,
    {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let worker = tokio::spawn(run_worker(forwarder, policy, receiver));

        Self {
            inner: Arc::new(DispatcherInner {
                sender: Mutex::new(Some(sender)),
                worker: Mutex::new(Some(worker)),
            }),
        }
    }

    /// Stop accepting records and wait for the queue to drain. Idempotent.
    pub async fn shutdown(&self) {
        drop(lock(&self.inner.sender).take());

        let worker = lock(&self.inner.worker).take();
        let Some(mut worker) = worker else {
            return;
        };

        match tokio::time::timeout(DRAIN_TIMEOUT, &mut worker).await {
            Ok(Ok(())) => info!("CRM dispatcher drained"),
            Ok(Err(err)) => error!(error = %err, "CRM dispatcher worker failed"),
            Err(_) => {
                warn!(
                    timeout_secs = DRAIN_TIMEOUT.as_secs(),
                    "CRM dispatcher did not drain in time, abandoning queued notifications"
                );
                worker.abort();
            }
        }
    }
}

impl IntakeNotifier for CrmDispatcher {
    fn notify(&self, record: &ReceptionRecord) {
        let guard = lock(&self.inner.sender);
        let Some(sender) = guard.as_ref() else {
            warn!(user_id = %record.user_id(), "CRM dispatcher is shut down, dropping notification");
            return;
        };

        match sender.try_send(record.clone()) {
            Ok(()) => debug!(user_id = %record.user_id(), "Queued reception request for CRM"),
            Err(TrySendError::Full(_)) => {
                warn!(user_id = %record.user_id(), "CRM queue is full, dropping notification")
            }
            Err(TrySendError::Closed(_)) => {
                error!(user_id = %record.user_id(), "CRM worker is gone, dropping notification")
            }
        }
    }
}

async fn run_worker<F: CrmForwarder>(
    forwarder: F,
    policy: RetryPolicy,
    mut receiver: mpsc::Receiver<ReceptionRecord>,
) {
    while let Some(record) = receiver.recv().await {
        deliver(&forwarder, &policy, &record).await;
    }
    debug!("CRM queue closed, worker exiting");
}

#[instrument(skip_all, fields(user_id = %record.user_id(), request_id = ?record.id()))]
async fn deliver<F: CrmForwarder>(forwarder: &F, policy: &RetryPolicy, record: &ReceptionRecord) {
    let mut attempt = 1;
    loop {
        match forwarder.push(record).await {
            Ok(()) => {
                info!(attempt, "Forwarded reception request to CRM");
                return;
            }
            Err(err) if err.is_retryable() && attempt < policy.max_attempts => {
                let delay = policy.backoff(attempt);
                warn!(
                    attempt,
                    error = %err,
                    delay_ms = delay.as_millis() as u64,
                    "CRM push failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => {
                error!(attempt, error = %err, "Giving up on CRM push");
                return;
            }
        }
    }
}

/// Forwarder used when no CRM is configured
pub struct LogOnlyForwarder;

impl CrmForwarder for LogOnlyForwarder {
    async fn push(&self, record: &ReceptionRecord) -> Result<(), CrmError> {
        info!(
            user_id = %record.user_id(),
            "CRM forwarding disabled, reception request kept in the document store only"
        );
        Ok(())
    }
}

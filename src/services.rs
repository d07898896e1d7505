use crate::error::ServiceError;
use crate::model::{
    Draw, JackpotStatus, Order, SubmitOrderPayload, SubmitReceipt, SuperballWinnerRecord, Ticket,
    Win,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Jackpot/draw status polling cadence.
pub const STATUS_POLL_SECS: u64 = 30;

#[async_trait]
pub trait DrawService: Send + Sync {
    async fn list_upcoming_draws(&self) -> ServiceResult<Vec<Draw>>;
}

#[async_trait]
pub trait OrderService: Send + Sync {
    async fn list_my_paid_orders(&self) -> ServiceResult<Vec<Order>>;
    async fn submit_order(&self, payload: SubmitOrderPayload) -> ServiceResult<SubmitReceipt>;
}

#[async_trait]
pub trait RewardsService: Send + Sync {
    async fn get_my_wins(&self, token: &str) -> ServiceResult<Vec<Win>>;
}

#[async_trait]
pub trait SuperballService: Send + Sync {
    async fn get_my_entries(&self, token: &str) -> ServiceResult<Vec<Ticket>>;
    async fn get_winners(&self) -> ServiceResult<Vec<SuperballWinnerRecord>>;
    async fn jackpot_status(&self) -> ServiceResult<JackpotStatus>;
}

/// External cart collaborator, cleared after a successful submit.
pub trait Cart: Send + Sync {
    fn clear(&self);
}

/// Toast/notification collaborator.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Platform clipboard collaborator.
pub trait ClipboardSink: Send + Sync {
    fn copy_text(&self, text: &str);
}

/// A missing auth token yields an empty wins list, not an error.
pub async fn my_wins(service: &dyn RewardsService, token: Option<&str>) -> ServiceResult<Vec<Win>> {
    match token {
        Some(token) => service.get_my_wins(token).await,
        None => Ok(Vec::new()),
    }
}

/// A missing auth token yields an empty entries list, not an error.
pub async fn my_superball_entries(
    service: &dyn SuperballService,
    token: Option<&str>,
) -> ServiceResult<Vec<Ticket>> {
    match token {
        Some(token) => service.get_my_entries(token).await,
        None => Ok(Vec::new()),
    }
}

/// Polls the jackpot status endpoint on the 30-second cadence shared with
/// the draw refresh. Failures are logged and retried next cycle; a
/// response resolving after cancellation is discarded.
pub struct JackpotWatcher {
    service: Arc<dyn SuperballService>,
    poll_interval: Duration,
    cancel: CancellationToken,
}

impl JackpotWatcher {
    pub fn new(service: Arc<dyn SuperballService>, cancel: CancellationToken) -> Self {
        Self::with_interval(service, cancel, Duration::from_secs(STATUS_POLL_SECS))
    }

    pub fn with_interval(
        service: Arc<dyn SuperballService>,
        cancel: CancellationToken,
        poll_interval: Duration,
    ) -> Self {
        Self {
            service,
            poll_interval,
            cancel,
        }
    }

    pub async fn watch<F>(&self, mut on_update: F) -> Result<(), anyhow::Error>
    where
        F: FnMut(JackpotStatus) + Send,
    {
        info!("starting jackpot watcher");

        loop {
            if self.cancel.is_cancelled() {
                break;
            }

            let fetched = tokio::select! {
                res = self.service.jackpot_status() => res,
                _ = self.cancel.cancelled() => break,
            };

            match fetched {
                Ok(status) => on_update(status),
                Err(e) => error!("jackpot status refresh failed: {}", e),
            }

            tokio::select! {
                _ = sleep(self.poll_interval) => continue,
                _ = self.cancel.cancelled() => {
                    info!("jackpot watcher cancelled during sleep");
                    break;
                }
            }
        }

        Ok(())
    }
}

/// How long the "copied" flag stays raised after a copy.
pub const COPIED_FLAG_MS: u64 = 2_000;

/// Copy-to-clipboard helper with the transient "copied" indicator flag.
pub struct Clipboard {
    sink: Arc<dyn ClipboardSink>,
    copied: Arc<AtomicBool>,
}

impl Clipboard {
    pub fn new(sink: Arc<dyn ClipboardSink>) -> Self {
        Self {
            sink,
            copied: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn copy(&self, text: &str) {
        self.sink.copy_text(text);
        self.copied.store(true, Ordering::SeqCst);
        debug!("copied {} bytes to clipboard", text.len());
        let copied = Arc::clone(&self.copied);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(COPIED_FLAG_MS)).await;
            copied.store(false, Ordering::SeqCst);
        });
    }

    pub fn just_copied(&self) -> bool {
        self.copied.load(Ordering::SeqCst)
    }
}

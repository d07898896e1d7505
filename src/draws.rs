use crate::model::Draw;
use crate::services::DrawService;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Draw refresh cadence.
pub const DRAW_POLL_SECS: u64 = 30;

/// Soonest strictly-future draw, or `None` when every draw has passed.
/// Ties are broken by input order.
pub fn next_draw(draws: &[Draw], now: DateTime<Utc>) -> Option<&Draw> {
    draws
        .iter()
        .filter(|d| d.draw_date > now)
        .fold(None, |best: Option<&Draw>, d| match best {
            Some(b) if d.draw_date < b.draw_date => Some(d),
            None => Some(d),
            other => other,
        })
}

/// Polls the draw service and pushes the freshly selected next draw through
/// a callback. The selection is recomputed on every refresh; nothing is
/// cached across updates to the source collection.
pub struct DrawWatcher {
    service: Arc<dyn DrawService>,
    poll_interval: Duration,
    cancel: CancellationToken,
}

impl DrawWatcher {
    pub fn new(service: Arc<dyn DrawService>, cancel: CancellationToken) -> Self {
        Self::with_interval(service, cancel, Duration::from_secs(DRAW_POLL_SECS))
    }

    pub fn with_interval(
        service: Arc<dyn DrawService>,
        cancel: CancellationToken,
        poll_interval: Duration,
    ) -> Self {
        Self {
            service,
            poll_interval,
            cancel,
        }
    }

    /// Runs until cancelled. Fetch failures are logged and retried on the
    /// next cycle; a response that resolves after cancellation is discarded.
    pub async fn watch<F>(&self, mut on_update: F) -> Result<(), anyhow::Error>
    where
        F: FnMut(Option<Draw>) + Send,
    {
        info!("starting draw watcher");

        loop {
            if self.cancel.is_cancelled() {
                info!("draw watcher received cancellation");
                break;
            }

            let fetched = tokio::select! {
                res = self.service.list_upcoming_draws() => res,
                _ = self.cancel.cancelled() => {
                    info!("draw watcher cancelled mid-fetch");
                    break;
                }
            };

            match fetched {
                Ok(draws) => {
                    on_update(next_draw(&draws, Utc::now()).cloned());
                }
                Err(e) => {
                    error!("draw refresh failed: {}", e);
                }
            }

            tokio::select! {
                _ = sleep(self.poll_interval) => continue,
                _ = self.cancel.cancelled() => {
                    info!("draw watcher cancelled during sleep");
                    break;
                }
            }
        }

        Ok(())
    }
}

use crate::model::CountdownState;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Countdown recomputation period.
pub const TICK_MS: u64 = 1_000;

/// Compute the structured time remaining until `target`.
///
/// Returns the all-zero state when the target is absent or already passed.
/// `total_ms` carries the raw millisecond delta; the display fields come
/// from successive floor-division of the whole-second remainder.
pub fn time_remaining(target: Option<DateTime<Utc>>, now: DateTime<Utc>) -> CountdownState {
    let Some(target) = target else {
        return CountdownState::default();
    };
    let total_ms = target.signed_duration_since(now).num_milliseconds();
    if total_ms <= 0 {
        return CountdownState::default();
    }
    let total_secs = total_ms / 1_000;
    CountdownState {
        total_ms,
        days: total_secs / 86_400,
        hours: total_secs / 3_600 % 24,
        minutes: total_secs / 60 % 60,
        seconds: total_secs % 60,
    }
}

/// Parse a service-supplied timestamp. Unparsable input degrades to `None`,
/// which `time_remaining` renders as the all-zero state.
pub fn parse_target(raw: &str) -> Option<DateTime<Utc>> {
    raw.parse::<DateTime<Utc>>().ok()
}

/// Periodic driver around [`time_remaining`].
///
/// Owns exactly one timer task. The owning session must call [`stop`] (or
/// drop the driver) when it ends; ticks never outlive cancellation. The
/// `on_expired` callback fires exactly once per expiry, not once per tick
/// while the target stays in the past.
///
/// [`stop`]: CountdownDriver::stop
pub struct CountdownDriver {
    cancel: CancellationToken,
}

impl CountdownDriver {
    pub fn spawn<T, E>(target: Option<DateTime<Utc>>, on_tick: T, on_expired: E) -> Self
    where
        T: FnMut(CountdownState) + Send + 'static,
        E: FnMut() + Send + 'static,
    {
        Self::spawn_with_clock(target, Utc::now, on_tick, on_expired)
    }

    /// Same as [`spawn`](Self::spawn) with an injected clock, so expiry
    /// behaviour can be exercised under a paused runtime.
    pub fn spawn_with_clock<C, T, E>(
        target: Option<DateTime<Utc>>,
        clock: C,
        mut on_tick: T,
        mut on_expired: E,
    ) -> Self
    where
        C: Fn() -> DateTime<Utc> + Send + 'static,
        T: FnMut(CountdownState) + Send + 'static,
        E: FnMut() + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_millis(TICK_MS));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut expiry_reported = false;
            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        debug!("countdown driver cancelled");
                        break;
                    }
                    _ = ticker.tick() => {}
                }
                let state = time_remaining(target, clock());
                if !state.is_running() && !expiry_reported {
                    expiry_reported = true;
                    on_expired();
                }
                on_tick(state);
            }
        });
        Self { cancel }
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for CountdownDriver {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

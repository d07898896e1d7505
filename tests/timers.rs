use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use lotto_session::countdown::CountdownDriver;
use lotto_session::draws::DrawWatcher;
use lotto_session::effects::schedule_winner_modal;
use lotto_session::model::Draw;
use lotto_session::services::{Clipboard, ClipboardSink, DrawService, ServiceResult};
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn base() -> chrono::DateTime<chrono::Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// Manually advanced wall clock, so driver expiry can be exercised under
/// the paused tokio runtime.
#[derive(Clone)]
struct TestClock(Arc<AtomicI64>);

impl TestClock {
    fn new() -> Self {
        Self(Arc::new(AtomicI64::new(0)))
    }

    fn advance_secs(&self, secs: i64) {
        self.0.fetch_add(secs * 1_000, Ordering::SeqCst);
    }

    fn now(&self) -> chrono::DateTime<chrono::Utc> {
        base() + ChronoDuration::milliseconds(self.0.load(Ordering::SeqCst))
    }
}

#[tokio::test(start_paused = true)]
async fn countdown_driver_reports_expiry_exactly_once() {
    let clock = TestClock::new();
    let ticks = Arc::new(AtomicUsize::new(0));
    let expiries = Arc::new(AtomicUsize::new(0));

    let target = base() + ChronoDuration::seconds(5);
    let driver = {
        let clock = clock.clone();
        let ticks = Arc::clone(&ticks);
        let expiries = Arc::clone(&expiries);
        CountdownDriver::spawn_with_clock(
            Some(target),
            move || clock.now(),
            move |_| {
                ticks.fetch_add(1, Ordering::SeqCst);
            },
            move || {
                expiries.fetch_add(1, Ordering::SeqCst);
            },
        )
    };

    // Still in the future: ticks accumulate, no expiry.
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert!(ticks.load(Ordering::SeqCst) >= 2);
    assert_eq!(expiries.load(Ordering::SeqCst), 0);

    // Jump the wall clock past the target and let several ticks run: the
    // expired callback must fire on the first one only.
    clock.advance_secs(60);
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(expiries.load(Ordering::SeqCst), 1);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(expiries.load(Ordering::SeqCst), 1);

    // Stopping the driver stops the ticking.
    driver.stop();
    tokio::time::sleep(Duration::from_millis(50)).await;
    let after_stop = ticks.load(Ordering::SeqCst);
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(ticks.load(Ordering::SeqCst), after_stop);
}

#[tokio::test(start_paused = true)]
async fn countdown_driver_with_past_target_expires_on_first_tick() {
    let clock = TestClock::new();
    let expiries = Arc::new(AtomicUsize::new(0));
    let target = base() - ChronoDuration::seconds(1);

    let _driver = {
        let clock = clock.clone();
        let expiries = Arc::clone(&expiries);
        CountdownDriver::spawn_with_clock(
            Some(target),
            move || clock.now(),
            |_| {},
            move || {
                expiries.fetch_add(1, Ordering::SeqCst);
            },
        )
    };

    tokio::time::sleep(Duration::from_secs(4)).await;
    assert_eq!(expiries.load(Ordering::SeqCst), 1);
}

struct CountingDrawService {
    calls: AtomicUsize,
}

#[async_trait]
impl DrawService for CountingDrawService {
    async fn list_upcoming_draws(&self) -> ServiceResult<Vec<Draw>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![Draw {
            id: "future".to_string(),
            country: "IT".to_string(),
            draw_date: Utc.with_ymd_and_hms(2999, 1, 1, 0, 0, 0).unwrap(),
            display_name: None,
        }])
    }
}

#[tokio::test(start_paused = true)]
async fn draw_watcher_polls_and_stops_on_cancel() {
    let service = Arc::new(CountingDrawService {
        calls: AtomicUsize::new(0),
    });
    let cancel = CancellationToken::new();
    let updates: Arc<Mutex<Vec<Option<Draw>>>> = Arc::new(Mutex::new(Vec::new()));

    let watcher = DrawWatcher::with_interval(
        Arc::clone(&service) as Arc<dyn DrawService>,
        cancel.clone(),
        Duration::from_secs(30),
    );
    let sink = Arc::clone(&updates);
    let handle = tokio::spawn(async move {
        watcher
            .watch(move |next| sink.lock().unwrap().push(next))
            .await
    });

    tokio::time::sleep(Duration::from_secs(95)).await;
    let polled = service.calls.load(Ordering::SeqCst);
    assert!(polled >= 3, "expected at least 3 polls, saw {polled}");
    assert!(updates
        .lock()
        .unwrap()
        .iter()
        .all(|u| u.as_ref().map(|d| d.id.as_str()) == Some("future")));

    cancel.cancel();
    handle.await.unwrap().unwrap();
    let after_cancel = service.calls.load(Ordering::SeqCst);
    tokio::time::sleep(Duration::from_secs(90)).await;
    assert_eq!(service.calls.load(Ordering::SeqCst), after_cancel);
}

struct CountingSuperball {
    calls: AtomicUsize,
}

#[async_trait]
impl lotto_session::services::SuperballService for CountingSuperball {
    async fn get_my_entries(&self, _token: &str) -> ServiceResult<Vec<lotto_session::model::Ticket>> {
        Ok(Vec::new())
    }

    async fn get_winners(
        &self,
    ) -> ServiceResult<Vec<lotto_session::model::SuperballWinnerRecord>> {
        Ok(Vec::new())
    }

    async fn jackpot_status(&self) -> ServiceResult<lotto_session::model::JackpotStatus> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(lotto_session::model::JackpotStatus {
            active: true,
            amount: 1_000.0,
            current_streak: 2,
        })
    }
}

#[tokio::test(start_paused = true)]
async fn jackpot_watcher_polls_every_thirty_seconds() {
    let service = Arc::new(CountingSuperball {
        calls: AtomicUsize::new(0),
    });
    let cancel = CancellationToken::new();
    let seen = Arc::new(AtomicUsize::new(0));

    let watcher = lotto_session::services::JackpotWatcher::new(
        Arc::clone(&service) as Arc<dyn lotto_session::services::SuperballService>,
        cancel.clone(),
    );
    let sink = Arc::clone(&seen);
    let handle = tokio::spawn(async move {
        watcher
            .watch(move |status| {
                assert!(status.active);
                sink.fetch_add(1, Ordering::SeqCst);
            })
            .await
    });

    tokio::time::sleep(Duration::from_secs(65)).await;
    assert!(service.calls.load(Ordering::SeqCst) >= 2);
    assert!(seen.load(Ordering::SeqCst) >= 2);

    cancel.cancel();
    handle.await.unwrap().unwrap();
}

#[derive(Default)]
struct RecordingSink {
    copies: Mutex<Vec<String>>,
}

impl ClipboardSink for RecordingSink {
    fn copy_text(&self, text: &str) {
        self.copies.lock().unwrap().push(text.to_string());
    }
}

#[tokio::test(start_paused = true)]
async fn clipboard_copied_flag_resets_after_two_seconds() {
    let sink = Arc::new(RecordingSink::default());
    let clipboard = Clipboard::new(Arc::clone(&sink) as Arc<dyn ClipboardSink>);

    clipboard.copy("payment-address");
    assert!(clipboard.just_copied());
    assert_eq!(sink.copies.lock().unwrap().as_slice(), ["payment-address"]);

    tokio::time::sleep(Duration::from_millis(2_100)).await;
    assert!(!clipboard.just_copied());
}

#[tokio::test(start_paused = true)]
async fn winner_modal_fires_after_delay_unless_cancelled() {
    let shown = Arc::new(AtomicUsize::new(0));
    let cancel = CancellationToken::new();

    let counter = Arc::clone(&shown);
    let handle = schedule_winner_modal(Duration::from_millis(1_200), cancel.clone(), move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    tokio::time::sleep(Duration::from_millis(1_300)).await;
    handle.await.unwrap();
    assert_eq!(shown.load(Ordering::SeqCst), 1);

    // Tearing the view down before the delay elapses discards the modal.
    let counter = Arc::clone(&shown);
    let handle = schedule_winner_modal(Duration::from_millis(1_200), cancel.clone(), move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    cancel.cancel();
    handle.await.unwrap();
    assert_eq!(shown.load(Ordering::SeqCst), 1);
}

use rand::Rng;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// How long the caller keeps the effect on screen before clearing it.
pub const EFFECT_DISPLAY_MS: u64 = 6_000;

/// Delay before the Superball "you won" modal follows the effect, so the
/// effect is perceived first.
pub const WINNER_MODAL_DELAY_MS: u64 = 1_200;

/// Upper bound on generated pieces.
pub const MAX_EFFECT_PIECES: usize = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectMode {
    Lottery,
    Superball,
}

/// One particle handed to the external effect renderer.
#[derive(Debug, Clone)]
pub struct EffectPiece {
    /// Horizontal placement, 0–100.
    pub left_percent: f64,
    pub delay_ms: u64,
    pub hue: u16,
}

#[derive(Debug, Clone)]
pub struct EffectParams {
    pub pieces: Vec<EffectPiece>,
}

impl EffectParams {
    fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let count = rng.gen_range(MAX_EFFECT_PIECES / 2..=MAX_EFFECT_PIECES);
        let pieces = (0..count)
            .map(|_| EffectPiece {
                left_percent: rng.gen_range(0.0..100.0),
                delay_ms: rng.gen_range(0..2_000),
                hue: rng.gen_range(0..360),
            })
            .collect();
        Self { pieces }
    }
}

/// What the owning view does with a detected win.
#[derive(Debug, Clone)]
pub struct EffectTrigger {
    pub params: EffectParams,
    /// Set for Superball wins; the caller schedules the secondary modal
    /// with [`schedule_winner_modal`].
    pub winner_modal_delay: Option<Duration>,
}

/// Derives the "did this user win" effect trigger from reconciliation
/// output, firing at most once per distinct result.
///
/// Identity is an explicit fingerprint of the results collection, so
/// re-fetching byte-identical data never re-fires; it is not left to
/// incidental re-render suppression.
#[derive(Debug, Default)]
pub struct WinnerDetector {
    last_fingerprint: Option<String>,
}

impl WinnerDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn maybe_trigger<T: Serialize>(
        &mut self,
        mode: EffectMode,
        won: bool,
        results: &T,
    ) -> Option<EffectTrigger> {
        let fingerprint = fingerprint(results);
        if self.last_fingerprint.as_deref() == Some(fingerprint.as_str()) {
            return None;
        }
        debug!("reconciliation result changed: {}", &fingerprint[..12]);
        self.last_fingerprint = Some(fingerprint);
        if !won {
            return None;
        }
        Some(EffectTrigger {
            params: EffectParams::generate(),
            winner_modal_delay: (mode == EffectMode::Superball)
                .then(|| Duration::from_millis(WINNER_MODAL_DELAY_MS)),
        })
    }
}

fn fingerprint<T: Serialize>(value: &T) -> String {
    let bytes = serde_json::to_vec(value).unwrap_or_default();
    hex::encode(Sha256::digest(&bytes))
}

/// Spawn the delayed "you won" modal trigger. Cancelling the session token
/// before the delay elapses discards the modal.
pub fn schedule_winner_modal<F>(
    delay: Duration,
    cancel: CancellationToken,
    on_show: F,
) -> tokio::task::JoinHandle<()>
where
    F: FnOnce() + Send + 'static,
{
    tokio::spawn(async move {
        tokio::select! {
            _ = tokio::time::sleep(delay) => on_show(),
            _ = cancel.cancelled() => {}
        }
    })
}

#[cfg(test)]
mod tests {
    use super::{EffectMode, WinnerDetector, MAX_EFFECT_PIECES};

    #[test]
    fn fires_once_per_distinct_result() {
        let mut detector = WinnerDetector::new();
        let results = vec![("a@x.com", 50.0)];

        assert!(detector
            .maybe_trigger(EffectMode::Superball, true, &results)
            .is_some());
        // Re-fetching identical data must not re-fire.
        assert!(detector
            .maybe_trigger(EffectMode::Superball, true, &results)
            .is_none());

        let changed = vec![("a@x.com", 50.0), ("b@x.com", 10.0)];
        assert!(detector
            .maybe_trigger(EffectMode::Superball, true, &changed)
            .is_some());
    }

    #[test]
    fn losing_results_update_identity_without_firing() {
        let mut detector = WinnerDetector::new();
        let results = vec![("nobody", 0.0)];
        assert!(detector
            .maybe_trigger(EffectMode::Lottery, false, &results)
            .is_none());
        assert!(detector
            .maybe_trigger(EffectMode::Lottery, false, &results)
            .is_none());
    }

    #[test]
    fn trigger_shape_matches_mode() {
        let mut detector = WinnerDetector::new();
        let trigger = detector
            .maybe_trigger(EffectMode::Lottery, true, &"r1")
            .unwrap();
        assert!(trigger.winner_modal_delay.is_none());
        assert!(!trigger.params.pieces.is_empty());
        assert!(trigger.params.pieces.len() <= MAX_EFFECT_PIECES);
        for piece in &trigger.params.pieces {
            assert!((0.0..100.0).contains(&piece.left_percent));
            assert!(piece.hue < 360);
        }

        let trigger = detector
            .maybe_trigger(EffectMode::Superball, true, &"r2")
            .unwrap();
        assert!(trigger.winner_modal_delay.is_some());
    }
}

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::warn;

/// Durable snapshot of an in-progress payment, used only to avoid
/// spuriously redirecting away from it after a refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingOrder {
    pub provider: String,
    pub deadline: DateTime<Utc>,
}

/// The persisted client state. Read once at session start, written on the
/// events that change it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientState {
    /// Whether the one-time payment instructions guide was dismissed.
    #[serde(default)]
    pub payment_guide_seen: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_order: Option<PendingOrder>,
}

/// JSON-file-backed store for [`ClientState`]. Read failures degrade to
/// the default state; the session never crashes over a bad file.
pub struct ClientStore {
    path: PathBuf,
}

impl ClientStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> ClientState {
        match fs::read(&self.path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                warn!("client state file unreadable, using defaults: {}", e);
                ClientState::default()
            }),
            Err(_) => ClientState::default(),
        }
    }

    pub fn save(&self, state: &ClientState) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(state)?;
        fs::write(&self.path, bytes)
            .with_context(|| format!("Failed to write client state to {}", self.path.display()))?;
        Ok(())
    }

    /// Written when the user dismisses the payment instructions guide.
    pub fn mark_guide_seen(&self) -> Result<()> {
        let mut state = self.load();
        state.payment_guide_seen = true;
        self.save(&state)
    }

    pub fn record_pending_order(&self, pending: PendingOrder) -> Result<()> {
        let mut state = self.load();
        state.pending_order = Some(pending);
        self.save(&state)
    }

    pub fn clear_pending_order(&self) -> Result<()> {
        let mut state = self.load();
        state.pending_order = None;
        self.save(&state)
    }
}

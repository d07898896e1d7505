use crate::countdown::time_remaining;
use crate::error::PaymentError;
use crate::model::{CountdownState, SubmitOrderPayload, Ticket};
use crate::services::{Cart, Notifier, OrderService};
use crate::validate::validate_transaction_id;
use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};
use tracing::{info, warn};

/// Payment window opened on provider selection.
pub const PAYMENT_WINDOW_MINS: i64 = 30;

const GENERIC_SUBMIT_ERROR: &str = "Failed to submit order. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentStage {
    NoProvider,
    ProviderSelected {
        provider: String,
        deadline: DateTime<Utc>,
    },
}

/// Outcome of a 1-second tick while a provider is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Idle,
    Running(CountdownState),
    /// Deadline reached: the session has already reverted to
    /// `NoProvider` and surfaced the expiry message. The owner must stop
    /// its tick driver.
    Expired,
}

/// The payment-session finite-state machine.
///
/// `NoProvider -> ProviderSelected -> { submit | Expired }`, with the
/// deadline set exactly once per provider selection and an
/// already-submitted guard that outlives `reset_flow`. All timer driving is
/// external: the owner calls [`tick`](Self::tick) once per second.
#[derive(Debug)]
pub struct PaymentSession {
    stage: PaymentStage,
    transaction_id: String,
    tkid_valid: Option<bool>,
    submitting: bool,
    submitted: bool,
    error: Option<String>,
}

impl Default for PaymentSession {
    fn default() -> Self {
        Self::new()
    }
}

impl PaymentSession {
    pub fn new() -> Self {
        Self {
            stage: PaymentStage::NoProvider,
            transaction_id: String::new(),
            tkid_valid: None,
            submitting: false,
            submitted: false,
            error: None,
        }
    }

    pub fn stage(&self) -> &PaymentStage {
        &self.stage
    }

    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        match &self.stage {
            PaymentStage::ProviderSelected { deadline, .. } => Some(*deadline),
            PaymentStage::NoProvider => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn transaction_validity(&self) -> Option<bool> {
        self.tkid_valid
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// The durable guard set by a successful submit. Consumed by the
    /// owning view to suppress the stale empty-cart redirect that races
    /// with cart clearing.
    pub fn suppress_empty_cart_redirect(&self) -> bool {
        self.submitted
    }

    /// Enter `ProviderSelected`. The deadline is set exactly once per
    /// selection: re-selecting the current provider (a re-render, say)
    /// never extends it. Picking a different provider starts a new window.
    pub fn select_provider(&mut self, code: &str, now: DateTime<Utc>) {
        if let PaymentStage::ProviderSelected { provider, .. } = &self.stage {
            if provider == code {
                return;
            }
        }
        info!("payment provider selected: {}", code);
        self.stage = PaymentStage::ProviderSelected {
            provider: code.to_string(),
            deadline: now + Duration::minutes(PAYMENT_WINDOW_MINS),
        };
        self.error = None;
    }

    /// The payment address / QR payload for the selected provider.
    /// Derived on demand, never stored.
    pub fn payment_address(&self) -> Option<String> {
        match &self.stage {
            PaymentStage::ProviderSelected { provider, .. } => {
                let digest = Sha256::digest(provider.as_bytes());
                Some(hex::encode(&digest[..20]))
            }
            PaymentStage::NoProvider => None,
        }
    }

    /// One 1-second driver tick. On reaching the deadline the session
    /// force-resets to `NoProvider` and surfaces the fixed expiry message.
    pub fn tick(&mut self, now: DateTime<Utc>) -> TickOutcome {
        let deadline = match &self.stage {
            PaymentStage::ProviderSelected { deadline, .. } => *deadline,
            PaymentStage::NoProvider => return TickOutcome::Idle,
        };
        let state = time_remaining(Some(deadline), now);
        if state.is_running() {
            return TickOutcome::Running(state);
        }
        warn!("payment deadline expired, resetting session");
        self.stage = PaymentStage::NoProvider;
        self.error = Some(PaymentError::DeadlineExpired.to_string());
        TickOutcome::Expired
    }

    /// Re-validate on every input change.
    pub fn set_transaction_id(&mut self, input: &str) {
        self.transaction_id = input.to_string();
        self.tkid_valid = validate_transaction_id(input);
    }

    pub fn transaction_id(&self) -> &str {
        &self.transaction_id
    }

    /// Attempt the single external submit call.
    ///
    /// Preconditions are checked in a fixed order (validity, then length,
    /// then amount); a violation fails locally without a state transition.
    /// The already-submitted guard is raised before the call and reverted
    /// on failure, so a success that races with cart clearing still
    /// suppresses the empty-cart redirect.
    pub async fn submit(
        &mut self,
        tickets: Vec<Ticket>,
        total_amount: f64,
        orders: &dyn OrderService,
        cart: &dyn Cart,
        notifier: &dyn Notifier,
    ) -> Result<(), PaymentError> {
        let provider = match &self.stage {
            PaymentStage::ProviderSelected { provider, .. } => provider.clone(),
            PaymentStage::NoProvider => return self.fail_local(PaymentError::NoProviderSelected),
        };
        if self.tkid_valid != Some(true) {
            return self.fail_local(PaymentError::InvalidTransactionId);
        }
        if self.transaction_id.len() < 6 {
            return self.fail_local(PaymentError::TransactionIdTooShort);
        }
        if total_amount <= 0.0 {
            return self.fail_local(PaymentError::NonPositiveAmount);
        }

        self.submitting = true;
        self.submitted = true;
        let payload = SubmitOrderPayload {
            tickets,
            tkid: self.transaction_id.clone(),
            payment_method: provider,
        };
        let result = orders.submit_order(payload).await;
        self.submitting = false;

        match result {
            Ok(receipt) => {
                info!(order_id = ?receipt.order_id, "order submitted");
                cart.clear();
                // Best-effort refresh; a failure here must not undo the
                // successful submit.
                if let Err(e) = orders.list_my_paid_orders().await {
                    warn!("order list refresh after submit failed: {}", e);
                }
                notifier.success("Order submitted. We will confirm your payment shortly.");
                self.error = None;
                Ok(())
            }
            Err(e) => {
                self.submitted = false;
                let message = match e.to_string() {
                    m if m.is_empty() => GENERIC_SUBMIT_ERROR.to_string(),
                    m => m,
                };
                self.error = Some(message.clone());
                notifier.error(&message);
                Err(PaymentError::SubmitFailed(message))
            }
        }
    }

    /// "Choose another method": unconditionally back to `NoProvider`,
    /// clearing provider, transaction id, validity, error and deadline.
    /// The already-submitted guard survives on purpose.
    pub fn reset_flow(&mut self) {
        self.stage = PaymentStage::NoProvider;
        self.transaction_id.clear();
        self.tkid_valid = None;
        self.error = None;
    }

    fn fail_local(&mut self, err: PaymentError) -> Result<(), PaymentError> {
        self.error = Some(err.to_string());
        Err(err)
    }
}

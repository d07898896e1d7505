use thiserror::Error;

/// Transport-level failure talking to an external service. Caught at the
/// call site and converted to a user-facing message; never fatal to the
/// session.
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected response: {0}")]
    BadResponse(String),
}

/// Local payment-session failures. Validation variants are recovered in
/// place and shown inline; `DeadlineExpired` forces a full session reset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    #[error("Please enter a valid transaction ID (letters and numbers only).")]
    InvalidTransactionId,
    #[error("Transaction ID must be at least 6 characters.")]
    TransactionIdTooShort,
    #[error("Order total must be greater than zero.")]
    NonPositiveAmount,
    #[error("Payment deadline expired. Please start over.")]
    DeadlineExpired,
    #[error("Please select a payment method first.")]
    NoProviderSelected,
    #[error("{0}")]
    SubmitFailed(String),
}

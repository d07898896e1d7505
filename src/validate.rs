/// Tri-state transaction-id validity used to gate submission.
///
/// `None` while the field is empty, `Some(true)` for alphanumeric input of
/// at least 6 characters, `Some(false)` otherwise. Re-evaluated on every
/// input change.
pub fn validate_transaction_id(input: &str) -> Option<bool> {
    if input.is_empty() {
        return None;
    }
    Some(input.len() >= 6 && input.chars().all(|c| c.is_ascii_alphanumeric()))
}

#[cfg(test)]
mod tests {
    use super::validate_transaction_id;

    #[test]
    fn empty_input_is_indeterminate() {
        assert_eq!(validate_transaction_id(""), None);
    }

    #[test]
    fn short_input_is_invalid() {
        assert_eq!(validate_transaction_id("abc12"), Some(false));
    }

    #[test]
    fn six_alphanumerics_are_valid() {
        assert_eq!(validate_transaction_id("abc123"), Some(true));
        assert_eq!(validate_transaction_id("ABCDEF123456"), Some(true));
    }

    #[test]
    fn punctuation_is_invalid() {
        assert_eq!(validate_transaction_id("ab!123"), Some(false));
        assert_eq!(validate_transaction_id("abc 123"), Some(false));
    }
}

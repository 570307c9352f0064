use chrono::{DateTime, Utc};

/// Token held in the manager's single cache slot.
///
/// Replaced wholesale on regeneration, never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedToken {
    /// `bearer <jwt>`, ready for the authorization header
    pub value: String,
    /// Clock reading taken right before signing
    pub issued_at: DateTime<Utc>,
}

impl CachedToken {
    pub fn new(value: String, issued_at: DateTime<Utc>) -> Self {
        Self { value, issued_at }
    }
}

//! Uniqueness Mutator
//!
//! Repeated runs hit the same persistent backend, so names and emails from
//! the fixture must be rewritten to values that cannot collide. Tokens are
//! millisecond wall-clock stamps with an atomic floor: when calls outpace
//! the clock, the floor advances by one per call, so two tokens minted in
//! the same process are always distinct.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::record::DomainRecord;

#[derive(Debug, Default)]
pub struct UniqueStamper {
    floor: AtomicU64,
}

impl UniqueStamper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint the next token: the current millisecond stamp, or one past the
    /// previous token when the clock has not advanced.
    pub fn next_token(&self) -> u64 {
        let now = chrono::Utc::now().timestamp_millis().max(0) as u64;
        let prev = self
            .floor
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |prev| {
                Some(now.max(prev + 1))
            })
            .unwrap_or_else(|prev| prev);
        now.max(prev + 1)
    }

    /// Return a copy of `record` with one fresh token interpolated into
    /// every field named in `unique_fields`. Fields outside the list are
    /// untouched. All listed fields of one record share the same token.
    pub fn make_unique(&self, record: &DomainRecord, unique_fields: &[&str]) -> DomainRecord {
        let token = self.next_token();
        let mut out = record.clone();
        for field in unique_fields {
            let value = out.get(field).to_string();
            out.set(*field, apply_token(&value, token));
        }
        out
    }
}

/// Interpolate `token` into `value`. An email-shaped value gets `+<token>`
/// spliced in before its last `@` so the result still parses as
/// local-part@domain; anything else gets the token appended.
fn apply_token(value: &str, token: u64) -> String {
    match value.rfind('@') {
        Some(at) if at > 0 => {
            format!("{}+{}{}", &value[..at], token, &value[at..])
        }
        _ if value.is_empty() => token.to_string(),
        _ => format!("{} {}", value, token),
    }
}

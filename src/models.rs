use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use rand::Rng;
use serde::Serialize;

/// Upper bound (exclusive) for generated account numbers. Stays below 2^53 so
/// JSON clients that read numbers as doubles see the exact value.
const ACCOUNT_NUMBER_RANGE: i64 = 1_000_000_000_000_000;

#[derive(Serialize, Clone)]
#[cfg_attr(test, derive(Debug, PartialEq))]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub number: i64,
    pub encrypted_password: String,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Builds an unsaved account. The id stays `0` until a repository assigns one.
    ///
    /// The number is pseudo-random and not guaranteed unique here; the store
    /// enforces uniqueness. No password scheme exists yet, so the field is empty.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: 0,
            first_name: first_name.into(),
            last_name: last_name.into(),
            number: rand::thread_rng().gen_range(0..ACCOUNT_NUMBER_RANGE),
            encrypted_password: String::new(),
            balance: 0,
            created_at: now(),
        }
    }
}

// postgres keeps microseconds, so anything finer would not survive a round trip
fn now() -> DateTime<Utc> {
    let now = Utc::now();
    now.duration_trunc(TimeDelta::microseconds(1)).unwrap_or(now)
}

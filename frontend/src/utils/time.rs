use chrono::{DateTime, Utc};

/// Source of the current instant. Session expiry checks go through this so
/// they can be driven deterministically.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

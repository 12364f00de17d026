use chrono::{DateTime, Local, NaiveDateTime, Utc};

pub trait Clock: Send {
    /// Local wall-clock time, used for "today" and past-slot checks.
    fn now(&self) -> NaiveDateTime;

    /// Timestamp stamped on new bookings.
    fn timestamp(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock stuck at one instant, for tests and demos.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.0.and_utc()
    }
}

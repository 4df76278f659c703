use chrono::{NaiveDate, NaiveDateTime, Utc};

/// Source of the current time. Injected so OTP expiry and booking-date
/// validation can be tested against a fake clock.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().naive_utc()
    }
}

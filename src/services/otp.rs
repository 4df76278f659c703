use chrono::{Duration, NaiveDateTime};
use rusqlite::Connection;

use crate::clock::Clock;
use crate::db::queries;
use crate::rng::RandomSource;

/// Validity window for an issued code. The countdown shown to callers is
/// derived from the stored absolute expiry, never tracked separately.
pub const OTP_TTL_SECONDS: i64 = 300;

pub const OTP_CODE_LEN: usize = 6;

#[derive(Debug, Clone)]
pub struct IssuedOtp {
    pub code: String,
    pub expires_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpOutcome {
    Verified,
    /// Wrong code; the record stays so the caller can retry until expiry.
    Mismatch,
    /// The window had elapsed; the record has been purged.
    Expired,
    /// No code was ever issued for this phone (or it was already consumed).
    Missing,
}

impl OtpOutcome {
    pub fn is_verified(&self) -> bool {
        matches!(self, OtpOutcome::Verified)
    }
}

/// Issues a fresh 6-digit code for the phone, overwriting any unconsumed
/// prior record, and returns the code so the caller can surface it as a
/// simulated SMS. A real deployment would hand it to the SMS gateway
/// instead.
pub fn issue(
    conn: &Connection,
    clock: &dyn Clock,
    rng: &dyn RandomSource,
    phone: &str,
) -> anyhow::Result<IssuedOtp> {
    let code = rng.otp_code();
    let expires_at = clock.now() + Duration::seconds(OTP_TTL_SECONDS);

    queries::upsert_otp(conn, phone, &code, &expires_at)?;

    tracing::info!(phone, "sms gateway: verification code dispatched, expires in 5m");

    Ok(IssuedOtp { code, expires_at })
}

/// Single-use check of a submitted code. Verification consumes the record;
/// an expired attempt purges it; a mismatch leaves it intact for retry.
/// There is no lockout after repeated failures -- a known production gap.
pub fn verify(
    conn: &Connection,
    clock: &dyn Clock,
    phone: &str,
    submitted: &str,
) -> anyhow::Result<OtpOutcome> {
    let Some(record) = queries::get_otp(conn, phone)? else {
        return Ok(OtpOutcome::Missing);
    };

    if clock.now() > record.expires_at {
        queries::delete_otp(conn, phone)?;
        return Ok(OtpOutcome::Expired);
    }

    if record.code == submitted {
        queries::delete_otp(conn, phone)?;
        Ok(OtpOutcome::Verified)
    } else {
        Ok(OtpOutcome::Mismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    use std::sync::Mutex;

    struct FakeClock(Mutex<NaiveDateTime>);

    impl FakeClock {
        fn at(s: &str) -> Self {
            Self(Mutex::new(
                NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap(),
            ))
        }

        fn advance(&self, seconds: i64) {
            let mut t = self.0.lock().unwrap();
            *t += Duration::seconds(seconds);
        }
    }

    impl Clock for FakeClock {
        fn now(&self) -> NaiveDateTime {
            *self.0.lock().unwrap()
        }
    }

    struct FixedCodes(Mutex<Vec<u32>>);

    impl RandomSource for FixedCodes {
        fn otp_code(&self) -> String {
            self.0.lock().unwrap().remove(0).to_string()
        }

        fn booking_number(&self) -> u32 {
            self.0.lock().unwrap().remove(0)
        }
    }

    fn setup() -> (Connection, FakeClock) {
        let conn = db::init_db(":memory:").unwrap();
        let clock = FakeClock::at("2025-06-01 12:00:00");
        (conn, clock)
    }

    #[test]
    fn test_round_trip_single_use() {
        let (conn, clock) = setup();
        let rng = FixedCodes(Mutex::new(vec![123456]));

        let issued = issue(&conn, &clock, &rng, "+10000000000").unwrap();
        assert_eq!(issued.code, "123456");
        assert_eq!(issued.code.len(), OTP_CODE_LEN);

        let first = verify(&conn, &clock, "+10000000000", "123456").unwrap();
        assert_eq!(first, OtpOutcome::Verified);

        // Consumed on success: the same code never verifies twice.
        let second = verify(&conn, &clock, "+10000000000", "123456").unwrap();
        assert_eq!(second, OtpOutcome::Missing);
    }

    #[test]
    fn test_mismatch_allows_retry() {
        let (conn, clock) = setup();
        let rng = FixedCodes(Mutex::new(vec![123456]));

        issue(&conn, &clock, &rng, "+10000000000").unwrap();

        let wrong = verify(&conn, &clock, "+10000000000", "000000").unwrap();
        assert_eq!(wrong, OtpOutcome::Mismatch);

        // The record survives a mismatch.
        let right = verify(&conn, &clock, "+10000000000", "123456").unwrap();
        assert_eq!(right, OtpOutcome::Verified);
    }

    #[test]
    fn test_expired_code_purged() {
        let (conn, clock) = setup();
        let rng = FixedCodes(Mutex::new(vec![123456]));

        issue(&conn, &clock, &rng, "+10000000000").unwrap();
        clock.advance(OTP_TTL_SECONDS + 1);

        let expired = verify(&conn, &clock, "+10000000000", "123456").unwrap();
        assert_eq!(expired, OtpOutcome::Expired);

        // Purged: a later attempt no longer finds a record.
        let gone = verify(&conn, &clock, "+10000000000", "123456").unwrap();
        assert_eq!(gone, OtpOutcome::Missing);
    }

    #[test]
    fn test_exact_boundary_still_valid() {
        let (conn, clock) = setup();
        let rng = FixedCodes(Mutex::new(vec![123456]));

        issue(&conn, &clock, &rng, "+10000000000").unwrap();
        clock.advance(OTP_TTL_SECONDS);

        // now == expires_at is inside the window.
        let outcome = verify(&conn, &clock, "+10000000000", "123456").unwrap();
        assert_eq!(outcome, OtpOutcome::Verified);
    }

    #[test]
    fn test_reissue_invalidates_previous_code() {
        let (conn, clock) = setup();
        let rng = FixedCodes(Mutex::new(vec![111111, 222222]));

        issue(&conn, &clock, &rng, "+10000000000").unwrap();
        issue(&conn, &clock, &rng, "+10000000000").unwrap();

        let old = verify(&conn, &clock, "+10000000000", "111111").unwrap();
        assert_eq!(old, OtpOutcome::Mismatch);

        let new = verify(&conn, &clock, "+10000000000", "222222").unwrap();
        assert_eq!(new, OtpOutcome::Verified);
    }

    #[test]
    fn test_verify_without_issue() {
        let (conn, clock) = setup();
        let outcome = verify(&conn, &clock, "+10000000000", "123456").unwrap();
        assert_eq!(outcome, OtpOutcome::Missing);
    }

    #[test]
    fn test_records_are_per_phone() {
        let (conn, clock) = setup();
        let rng = FixedCodes(Mutex::new(vec![111111, 222222]));

        issue(&conn, &clock, &rng, "+15550000001").unwrap();
        issue(&conn, &clock, &rng, "+15550000002").unwrap();

        assert_eq!(
            verify(&conn, &clock, "+15550000002", "111111").unwrap(),
            OtpOutcome::Mismatch
        );
        assert_eq!(
            verify(&conn, &clock, "+15550000001", "111111").unwrap(),
            OtpOutcome::Verified
        );
        assert_eq!(
            verify(&conn, &clock, "+15550000002", "222222").unwrap(),
            OtpOutcome::Verified
        );
    }
}

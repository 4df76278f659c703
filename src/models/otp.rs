use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One pending verification code per phone number. Overwritten on re-issue,
/// removed on successful verification or an expired attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpRecord {
    pub phone: String,
    pub code: String,
    pub expires_at: NaiveDateTime,
}

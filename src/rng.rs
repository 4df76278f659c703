use rand::Rng;

/// Source of the short numeric codes the system hands out: OTP codes and
/// the numeric half of booking reference ids. Both are drawn from
/// 100000..=999999, so a code is always six digits with no leading zero.
pub trait RandomSource: Send + Sync {
    fn otp_code(&self) -> String;

    fn booking_number(&self) -> u32;
}

pub struct ThreadRngSource;

impl RandomSource for ThreadRngSource {
    fn otp_code(&self) -> String {
        rand::thread_rng().gen_range(100_000..1_000_000).to_string()
    }

    fn booking_number(&self) -> u32 {
        rand::thread_rng().gen_range(100_000..1_000_000)
    }
}

pub mod booking;
pub mod catalog;
pub mod otp;

pub use booking::{Booking, BookingDraft, BookingStatus};
pub use catalog::{Service, ServiceCategory, Stylist};
pub use otp::OtpRecord;

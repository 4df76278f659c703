pub mod admin;
pub mod bookings;
pub mod notify;
pub mod otp;
pub mod workflow;

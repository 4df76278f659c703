pub mod admin;
pub mod bookings;
pub mod catalog;
pub mod flow;
pub mod health;
pub mod otp;

pub mod catalog;
pub mod clock;
pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod rng;
pub mod services;
pub mod state;

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::config::AppConfig;
use crate::clock::Clock;
use crate::rng::RandomSource;
use crate::services::notify::NotificationSink;
use crate::services::workflow::WorkflowSession;

pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub config: AppConfig,
    pub clock: Box<dyn Clock>,
    pub rng: Box<dyn RandomSource>,
    pub notifier: Box<dyn NotificationSink>,
    /// The single active booking wizard session, if any.
    pub flow: Mutex<Option<WorkflowSession>>,
}

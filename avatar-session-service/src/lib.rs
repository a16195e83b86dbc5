pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;

use services::SessionBroker;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub broker: Arc<SessionBroker>,
}

impl AppState {
    pub fn new(broker: Arc<SessionBroker>) -> Self {
        Self { broker }
    }
}

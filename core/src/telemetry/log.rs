use log::{debug, info};

/// Scoped logger handed to each conditioning component.
pub struct LogManager {
    scope: &'static str,
}

impl LogManager {
    pub fn new(scope: &'static str) -> Self {
        Self { scope }
    }

    pub fn record(&self, message: &str) {
        info!("[{}] {}", self.scope, message);
    }

    pub fn trace(&self, message: &str) {
        debug!("[{}] {}", self.scope, message);
    }
}

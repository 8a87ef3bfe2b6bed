use business::domain::logger::Logger;
use tracing::{debug, error, info, warn};

pub struct TracingLogger;

impl Logger for TracingLogger {
    fn info(&self, message: &str) {
        info!(target: "visual_search", "{}", message);
    }
    fn warn(&self, message: &str) {
        warn!(target: "visual_search", "{}", message);
    }
    fn error(&self, message: &str) {
        error!(target: "visual_search", "{}", message);
    }
    fn debug(&self, message: &str) {
        debug!(target: "visual_search", "{}", message);
    }
}

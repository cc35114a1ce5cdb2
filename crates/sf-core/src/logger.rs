//! Log sinks for migration progress and failures.

use std::sync::Mutex;

/// Best-effort message sink handed to the migration engine.
pub trait MigrationLogger: Send + Sync {
    fn log(&self, message: &str);
}

impl<F> MigrationLogger for F
where
    F: Fn(&str) + Send + Sync,
{
    fn log(&self, message: &str) {
        self(message)
    }
}

/// Forwards every message to the `log` facade at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogCrateLogger;

impl MigrationLogger for LogCrateLogger {
    fn log(&self, message: &str) {
        log::info!("{message}");
    }
}

/// Keeps every message in memory, in arrival order.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    messages: Mutex<Vec<String>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the messages received so far
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// True if any message contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.messages().iter().any(|m| m.contains(needle))
    }
}

impl MigrationLogger for MemoryLogger {
    fn log(&self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_memory_logger_collects_in_order() {
        let logger = MemoryLogger::new();
        logger.log("first");
        logger.log("second");
        assert_eq!(logger.messages(), vec!["first", "second"]);
        assert!(logger.contains("sec"));
        assert!(!logger.contains("third"));
    }

    #[test]
    fn test_closure_logger() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = {
            let seen = Arc::clone(&seen);
            move |message: &str| seen.lock().unwrap().push(message.to_string())
        };
        let logger: &dyn MigrationLogger = &sink;
        logger.log("hello");
        assert_eq!(*seen.lock().unwrap(), vec!["hello".to_string()]);
    }
}

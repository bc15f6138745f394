use log::{debug, error, info, trace, warn, Level};
use std::fmt::Display;
use std::sync::Arc;

/// Per-session log sink handed to every server session and client connection.
///
/// Records go through the `log` facade with the session label in front, so
/// they can be filtered with `RUST_LOG` like any other record.
#[derive(Debug, Clone)]
pub struct SessionLogger {
    label: Arc<str>,
}

impl SessionLogger {
    pub fn new(label: impl Display) -> Self {
        Self {
            label: Arc::from(label.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn log(&self, level: Level, message: impl Display) {
        match level {
            Level::Error => error!("[{}] {}", self.label, message),
            Level::Warn => warn!("[{}] {}", self.label, message),
            Level::Info => info!("[{}] {}", self.label, message),
            Level::Debug => debug!("[{}] {}", self.label, message),
            Level::Trace => trace!("[{}] {}", self.label, message),
        }
    }

    pub fn info(&self, message: impl Display) {
        self.log(Level::Info, message);
    }

    pub fn warn(&self, message: impl Display) {
        self.log(Level::Warn, message);
    }

    pub fn error(&self, message: impl Display) {
        self.log(Level::Error, message);
    }

    pub fn debug(&self, message: impl Display) {
        self.log(Level::Debug, message);
    }

    /// A line received on the control connection.
    pub fn received(&self, line: &str) {
        self.log(Level::Debug, format_args!("<<< {}", line));
    }

    /// A line sent on the control connection.
    pub fn sent(&self, line: &str) {
        self.log(Level::Debug, format_args!(">>> {}", line));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_is_kept() {
        let logger = SessionLogger::new("127.0.0.1:2121");
        assert_eq!(logger.label(), "127.0.0.1:2121");
        let clone = logger.clone();
        assert_eq!(clone.label(), logger.label());
    }
}

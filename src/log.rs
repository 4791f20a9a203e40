use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Severity of a navigator log message.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// Logging collaborator injected into a navigator.
pub trait NavigatorLog {
    fn log(&self, message: &str, tag: &str, severity: Severity);
}

impl<L: NavigatorLog + ?Sized> NavigatorLog for Rc<L> {
    fn log(&self, message: &str, tag: &str, severity: Severity) {
        (**self).log(message, tag, severity);
    }
}

impl<L: NavigatorLog + ?Sized> NavigatorLog for Box<L> {
    fn log(&self, message: &str, tag: &str, severity: Severity) {
        (**self).log(message, tag, severity);
    }
}

/// Forwards navigator messages to `tracing` events.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLog;

impl NavigatorLog for TracingLog {
    fn log(&self, message: &str, tag: &str, severity: Severity) {
        match severity {
            Severity::Info | Severity::Success => {
                tracing::info!(tag, %severity, "{message}");
            }
            Severity::Warning => tracing::warn!(tag, %severity, "{message}"),
            Severity::Error => tracing::error!(tag, %severity, "{message}"),
        }
    }
}

/// One recorded message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    pub message: String,
    pub tag: String,
    pub severity: Severity,
}

/// In-memory log; clones share the same buffer.
#[derive(Clone, Debug, Default)]
pub struct MemoryLog {
    entries: Rc<RefCell<Vec<LogEntry>>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all recorded entries in order.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.borrow().clone()
    }

    pub fn last(&self) -> Option<LogEntry> {
        self.entries.borrow().last().cloned()
    }

    /// Number of entries with the given severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|entry| entry.severity == severity)
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

impl NavigatorLog for MemoryLog {
    fn log(&self, message: &str, tag: &str, severity: Severity) {
        self.entries.borrow_mut().push(LogEntry {
            message: message.to_owned(),
            tag: tag.to_owned(),
            severity,
        });
    }
}

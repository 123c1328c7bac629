//! # Diagnostics
//!
//! Non-fatal findings raised while a class is modelled. Recording a
//! diagnostic never changes the model or the control flow of the modeller.
//!
//! Three sinks are provided:
//!
//! - [`DiagnosticLog`] keeps every record in memory, in arrival order, and
//!   can be shared between threads introspecting different classes.
//! - [`TracingSink`] turns each record into a `tracing` warning.
//! - [`NullSink`] drops everything.

use parking_lot::Mutex;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A parameter carries more than one source tag.
    AmbiguousParameter,
    NonPublicResourceMethod,
    NonPublicSubResourceMethod,
    NonPublicSubResourceLocator,
}

impl DiagnosticKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticKind::AmbiguousParameter => "ambiguous_parameter",
            DiagnosticKind::NonPublicResourceMethod => "non_public_resource_method",
            DiagnosticKind::NonPublicSubResourceMethod => "non_public_sub_resource_method",
            DiagnosticKind::NonPublicSubResourceLocator => "non_public_sub_resource_locator",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One warning record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Member the warning is about (constructor, field or method signature).
    pub member: String,
    /// 1-based parameter position, for parameter-level warnings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
}

impl Diagnostic {
    pub fn ambiguous_parameter(member: impl Into<String>, position: usize) -> Self {
        Diagnostic {
            kind: DiagnosticKind::AmbiguousParameter,
            member: member.into(),
            position: Some(position),
        }
    }

    pub fn non_public(kind: DiagnosticKind, member: impl Into<String>) -> Self {
        Diagnostic {
            kind,
            member: member.into(),
            position: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DiagnosticKind::AmbiguousParameter => write!(
                f,
                "ambiguous parameter source on {}, position {}",
                self.member,
                self.position.unwrap_or_default()
            ),
            DiagnosticKind::NonPublicResourceMethod => {
                write!(f, "non-public resource method {}", self.member)
            }
            DiagnosticKind::NonPublicSubResourceMethod => {
                write!(f, "non-public sub-resource method {}", self.member)
            }
            DiagnosticKind::NonPublicSubResourceLocator => {
                write!(f, "non-public sub-resource locator {}", self.member)
            }
        }
    }
}

/// Receiver of diagnostics. Takes `&self` so one sink can serve several
/// threads at once.
pub trait DiagnosticsSink: Send + Sync {
    fn record(&self, diagnostic: Diagnostic);
}

/// Append-only in-memory log.
#[derive(Debug, Default)]
pub struct DiagnosticLog {
    entries: Mutex<Vec<Diagnostic>>,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        DiagnosticLog::default()
    }

    /// Copy of everything recorded so far.
    pub fn snapshot(&self) -> Vec<Diagnostic> {
        self.entries.lock().clone()
    }

    /// Take everything recorded so far, leaving the log empty.
    pub fn drain(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.entries.lock())
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.lock().iter().filter(|d| d.kind == kind).count()
    }
}

impl DiagnosticsSink for DiagnosticLog {
    fn record(&self, diagnostic: Diagnostic) {
        self.entries.lock().push(diagnostic);
    }
}

/// Emits every diagnostic as a `tracing` warning.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn record(&self, diagnostic: Diagnostic) {
        tracing::warn!(
            kind = diagnostic.kind.as_str(),
            member = %diagnostic.member,
            position = diagnostic.position,
            "{diagnostic}"
        );
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticsSink for NullSink {
    fn record(&self, _diagnostic: Diagnostic) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_messages() {
        let d = Diagnostic::ambiguous_parameter("void A.get(String)", 1);
        assert_eq!(
            d.to_string(),
            "ambiguous parameter source on void A.get(String), position 1"
        );
        let d = Diagnostic::non_public(DiagnosticKind::NonPublicSubResourceLocator, "B A.sub()");
        assert_eq!(d.to_string(), "non-public sub-resource locator B A.sub()");
    }

    #[test]
    fn test_log_is_append_only_and_drains() {
        let log = DiagnosticLog::new();
        assert!(log.is_empty());
        log.record(Diagnostic::ambiguous_parameter("m", 1));
        log.record(Diagnostic::non_public(DiagnosticKind::NonPublicResourceMethod, "n"));
        assert_eq!(log.len(), 2);
        assert_eq!(log.count(DiagnosticKind::AmbiguousParameter), 1);
        assert_eq!(log.snapshot()[0].member, "m");
        assert_eq!(log.drain().len(), 2);
        assert!(log.is_empty());
    }

    #[test]
    fn test_log_concurrent_appends() {
        let log = Arc::new(DiagnosticLog::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let log = Arc::clone(&log);
                std::thread::spawn(move || {
                    for i in 0..100 {
                        log.record(Diagnostic::ambiguous_parameter(format!("t{t}"), i));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(log.len(), 800);
    }
}

//! Degradation notices collected during a conversion
//!
//! Every notice is logged through the `log` facade when recorded and is
//! also kept in a [`Diagnostics`] value so callers can inspect it.

use std::fmt;

/// How serious a notice is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(rename_all = "lowercase"))]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{}", name)
    }
}

/// A single data-quality notice
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct Notice {
    pub severity: Severity,
    /// Component that raised the notice (e.g. "extract", "patient/study info")
    pub source: String,
    pub message: String,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.source, self.message)
    }
}

/// Ordered list of notices for one conversion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(transparent))]
pub struct Diagnostics {
    notices: Vec<Notice>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, source: &str, message: impl Into<String>) {
        self.push(Severity::Warning, source, message.into());
    }

    pub fn info(&mut self, source: &str, message: impl Into<String>) {
        self.push(Severity::Info, source, message.into());
    }

    pub fn error(&mut self, source: &str, message: impl Into<String>) {
        self.push(Severity::Error, source, message.into());
    }

    fn push(&mut self, severity: Severity, source: &str, message: String) {
        match severity {
            Severity::Info => log::info!("{}: {}", source, message),
            Severity::Warning => log::warn!("{}: {}", source, message),
            Severity::Error => log::error!("{}: {}", source, message),
        }
        self.notices.push(Notice {
            severity,
            source: source.to_string(),
            message,
        });
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }

    /// Returns notices with at least the given severity
    pub fn at_least(&self, severity: Severity) -> impl Iterator<Item = &Notice> {
        self.notices.iter().filter(move |n| n.severity >= severity)
    }

    /// Checks whether any notice message contains the given text
    pub fn mentions(&self, text: &str) -> bool {
        self.notices.iter().any(|n| n.message.contains(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notices_keep_order() {
        let mut diag = Diagnostics::new();
        diag.warn("extract", "first");
        diag.info("extract", "second");
        diag.error("assemble", "third");

        let messages: Vec<_> = diag.notices().iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second", "third"]);
        assert_eq!(diag.at_least(Severity::Warning).count(), 2);
    }

    #[test]
    fn test_mentions() {
        let mut diag = Diagnostics::new();
        diag.warn("extract", "No 'Median' waveform found");
        diag.warn("patient/study info", "PatientAge missing");

        assert_eq!(diag.len(), 2);
        assert!(diag.mentions("Median"));
        assert!(diag.mentions("PatientAge"));
        assert!(!diag.mentions("Rhythm"));
    }

    #[test]
    fn test_notice_display() {
        let notice = Notice {
            severity: Severity::Warning,
            source: "extract".to_string(),
            message: "something degraded".to_string(),
        };
        assert_eq!(notice.to_string(), "[warning] extract: something degraded");
    }
}

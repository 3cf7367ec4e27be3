use crate::api::ConversionReport;
use crate::diagnostics::Severity;
use std::fmt;

/// Text report formatter for a finished conversion
pub struct TextReport<'a> {
    report: &'a ConversionReport,
}

impl<'a> TextReport<'a> {
    /// Creates a new text report
    pub fn new(report: &'a ConversionReport) -> Self {
        Self { report }
    }
}

impl<'a> fmt::Display for TextReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ECG Conversion")?;
        writeln!(f, "==============")?;
        writeln!(f)?;
        writeln!(f, "Source:         {}", self.report.source.display())?;
        writeln!(f, "Output:         {}", self.report.output.display())?;
        writeln!(f, "Rhythm Leads:   {}", self.report.rhythm_leads)?;
        writeln!(f, "Median Leads:   {}", self.report.median_leads)?;
        writeln!(f, "Warnings:       {}", self.report.warning_count())?;
        writeln!(f)?;

        let notices = self.report.diagnostics.notices();
        if notices.is_empty() {
            return Ok(());
        }

        writeln!(f, "Notices")?;
        writeln!(f, "-------")?;
        for notice in notices {
            let marker = match notice.severity {
                Severity::Info => " ",
                Severity::Warning => "!",
                Severity::Error => "x",
            };
            writeln!(f, "{} {}: {}", marker, notice.source, notice.message)?;
        }

        Ok(())
    }
}

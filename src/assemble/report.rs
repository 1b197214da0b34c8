//! Assembly report types for per-run skip diagnostics.
//!
//! Fatal configuration problems abort a run through `MaskcocoError`;
//! everything recoverable lands here instead. The report tells the user
//! which instances or images were dropped and why, so a document with
//! fewer annotations than input files is never a silent surprise.

use serde::Serialize;
use std::fmt;

/// A report generated while assembling a COCO document.
#[derive(Clone, Debug, Default, Serialize)]
pub struct AssemblyReport {
    /// Counts of what went in and what came out.
    pub counts: AssemblyCounts,
    /// Recoverable anomalies and policy notes gathered during the run.
    pub issues: Vec<AssemblyIssue>,
}

impl AssemblyReport {
    /// Creates a new empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an issue to the report.
    pub fn add(&mut self, issue: AssemblyIssue) {
        self.issues.push(issue);
    }

    /// Count of warning-level issues (skipped instances or images).
    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == AssemblySeverity::Warning)
            .count()
    }

    /// Count of info-level issues (policy notes).
    pub fn info_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == AssemblySeverity::Info)
            .count()
    }

    /// Returns true if nothing was skipped.
    pub fn is_clean(&self) -> bool {
        self.warning_count() == 0
    }
}

impl fmt::Display for AssemblyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "  {} images in, {} images out, {} annotations",
            self.counts.images_in, self.counts.images_out, self.counts.annotations
        )?;

        if !self.issues.is_empty() {
            let warnings = self.warning_count();
            let infos = self.info_count();

            if warnings > 0 {
                writeln!(f)?;
                writeln!(f, "Skipped ({}):", warnings)?;
                for issue in self
                    .issues
                    .iter()
                    .filter(|i| i.severity == AssemblySeverity::Warning)
                {
                    writeln!(f, "  - {}", issue.message)?;
                }
            }

            if infos > 0 {
                writeln!(f)?;
                writeln!(f, "Notes ({}):", infos)?;
                for issue in self
                    .issues
                    .iter()
                    .filter(|i| i.severity == AssemblySeverity::Info)
                {
                    writeln!(f, "  - {}", issue.message)?;
                }
            }
        }

        Ok(())
    }
}

/// Counts of dataset elements seen and emitted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AssemblyCounts {
    /// Mask definition entries processed.
    pub images_in: usize,
    /// Image records present in the output document.
    pub images_out: usize,
    /// Annotation records emitted.
    pub annotations: usize,
    /// Instance regions that produced no annotation.
    pub skipped_instances: usize,
}

/// A single recoverable anomaly or policy note.
#[derive(Clone, Debug, Serialize)]
pub struct AssemblyIssue {
    pub severity: AssemblySeverity,
    pub code: AssemblyIssueCode,
    pub message: String,
}

impl AssemblyIssue {
    /// Creates a warning-level issue (something was skipped).
    pub fn warning(code: AssemblyIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: AssemblySeverity::Warning,
            code,
            message: message.into(),
        }
    }

    /// Creates an info-level issue (policy note).
    pub fn info(code: AssemblyIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: AssemblySeverity::Info,
            code,
            message: message.into(),
        }
    }
}

/// Severity level for assembly issues.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssemblySeverity {
    /// Something in the input did not make it into the document.
    Warning,
    /// A policy decision worth surfacing; nothing was lost.
    Info,
}

/// Stable issue codes for programmatic consumption.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssemblyIssueCode {
    /// A mask decomposed to zero instances (all background).
    EmptyMask,
    /// A mask color had no entry in the category map. Deliberately
    /// permissive: stray anti-aliased colors are expected in hand-painted
    /// masks.
    UnknownMaskColor,
    /// An instance produced no annotation (sub-pixel foreground or no
    /// polygon after simplification).
    InvisibleInstance,
    /// An image ended up with zero annotations and was excluded.
    EmptyImageExcluded,
    /// An image ended up with zero annotations and was kept (policy flag).
    EmptyImageKept,
    /// Negative RLE counts were clamped to zero while decoding.
    NegativeRleCounts,
}

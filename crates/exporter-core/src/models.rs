use serde::{Deserialize, Serialize};

// ── Label constants ────────────────────────────────────────────────────────────

/// Default label applied when a dimension is absent from a source record.
pub const UNKNOWN: &str = "UNKNOWN";

/// Account label used when neither the record nor the file path names one.
pub const UNKNOWN_ACCOUNT: &str = "unknown";

/// Severity label for critical findings.
pub const SEVERITY_CRITICAL: &str = "CRITICAL";

/// Severity label for high-severity findings.
pub const SEVERITY_HIGH: &str = "HIGH";

/// Compliance status for passing checks.
pub const COMPLIANCE_PASSED: &str = "PASSED";

/// Compliance status for failing checks.
pub const COMPLIANCE_FAILED: &str = "FAILED";

/// Compliance status for checks that passed with warnings.
pub const COMPLIANCE_WARNING: &str = "WARNING";

// ── Finding ────────────────────────────────────────────────────────────────────

/// One normalized security finding extracted from an export file.
///
/// Findings are ephemeral: they exist only for the duration of a single
/// file's parse pass, are folded into the aggregate metric state and then
/// dropped. No finding is individually retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Account the finding belongs to. Taken from the record's own
    /// `AccountId`/`AwsAccountId` field when present, otherwise derived
    /// from the export file's path.
    pub account: String,
    /// Severity label (`CRITICAL`, `HIGH`, `MEDIUM`, `LOW`, ...) or
    /// [`UNKNOWN`].
    pub severity: String,
    /// Compliance check outcome: `PASSED`, `FAILED`, `WARNING` or
    /// [`UNKNOWN`].
    pub compliance_status: String,
    /// Type of the first affected resource, or [`UNKNOWN`].
    pub resource_type: String,
}

// ── ScanReport ─────────────────────────────────────────────────────────────────

/// Summary of one scan pass over the ingestion root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReport {
    /// Files parsed and folded during this pass.
    pub files_scanned: u64,
    /// Files discovered but skipped because their modification time had
    /// not advanced since the last pass.
    pub files_skipped: u64,
    /// Individual records that could not be parsed across all files.
    pub records_failed: u64,
}

impl ScanReport {
    /// Merge another report's counts into this one.
    pub fn absorb(&mut self, other: &ScanReport) {
        self.files_scanned += other.files_scanned;
        self.files_skipped += other.files_skipped;
        self.records_failed += other.records_failed;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Record normalization for the two supported export formats.
//!
//! Converts raw CSV rows and nested JSON finding documents into canonical
//! [`Finding`] records. A single malformed record never aborts its file:
//! it is skipped and counted, and parsing continues with the next record.

use std::path::Path;

use exporter_core::error::{ExporterError, Result};
use exporter_core::models::{Finding, UNKNOWN};
use serde_json::Value;
use tracing::debug;

// ── ParsedFile ────────────────────────────────────────────────────────────────

/// The outcome of parsing one export file.
#[derive(Debug, Default)]
pub struct ParsedFile {
    /// Findings successfully normalized from the file.
    pub findings: Vec<Finding>,
    /// Records that could not be parsed and were skipped.
    pub records_failed: u64,
}

// ── CSV exports ───────────────────────────────────────────────────────────────

/// Parse a CSV export file.
///
/// Reads the named columns `AccountId`, `Severity`, `ComplianceStatus` and
/// `ResourceType`; extra columns are ignored and absent or empty cells
/// default to `UNKNOWN` (the account cell defaults to `fallback_account`).
pub fn parse_csv_file(path: &Path, fallback_account: &str) -> Result<ParsedFile> {
    let file = std::fs::File::open(path).map_err(|source| ExporterError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|source| ExporterError::CsvParse {
            path: path.to_path_buf(),
            source,
        })?
        .clone();

    let account_col = column_index(&headers, "AccountId");
    let severity_col = column_index(&headers, "Severity");
    let compliance_col = column_index(&headers, "ComplianceStatus");
    let resource_col = column_index(&headers, "ResourceType");

    let mut parsed = ParsedFile::default();

    for record in reader.records() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                debug!("Skipping malformed CSV row in {}: {}", path.display(), e);
                parsed.records_failed += 1;
                continue;
            }
        };

        parsed.findings.push(Finding {
            account: cell(&record, account_col)
                .unwrap_or(fallback_account)
                .to_string(),
            severity: cell(&record, severity_col).unwrap_or(UNKNOWN).to_string(),
            compliance_status: cell(&record, compliance_col).unwrap_or(UNKNOWN).to_string(),
            resource_type: cell(&record, resource_col).unwrap_or(UNKNOWN).to_string(),
        });
    }

    Ok(parsed)
}

/// Position of `name` in the header row, if present.
fn column_index(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

/// Trimmed, non-empty cell value at `col`, if the column exists.
fn cell(record: &csv::StringRecord, col: Option<usize>) -> Option<&str> {
    col.and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

// ── JSON exports ──────────────────────────────────────────────────────────────

/// Parse a JSON export document.
///
/// The document carries its findings in a top-level `Findings` array; each
/// element nests `Severity.Label` and `Compliance.Status`, takes the
/// resource type from the first `Resources` element and names its account
/// in `AwsAccountId`. A document without a `Findings` array yields zero
/// findings; an element that is not an object is skipped and counted.
pub fn parse_json_file(path: &Path, fallback_account: &str) -> Result<ParsedFile> {
    let content = std::fs::read_to_string(path).map_err(|source| ExporterError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let document: Value =
        serde_json::from_str(&content).map_err(|source| ExporterError::JsonParse {
            path: path.to_path_buf(),
            source,
        })?;

    let mut parsed = ParsedFile::default();

    let entries = match document.get("Findings").and_then(Value::as_array) {
        Some(entries) => entries,
        None => return Ok(parsed),
    };

    for entry in entries {
        if !entry.is_object() {
            debug!(
                "Skipping non-object finding entry in {}",
                path.display()
            );
            parsed.records_failed += 1;
            continue;
        }
        parsed.findings.push(normalize_json_finding(entry, fallback_account));
    }

    Ok(parsed)
}

/// Map one JSON finding object to a [`Finding`], applying defaults for
/// every absent field.
fn normalize_json_finding(entry: &Value, fallback_account: &str) -> Finding {
    let account = entry
        .get("AwsAccountId")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(fallback_account);

    let severity = entry
        .get("Severity")
        .and_then(|s| s.get("Label"))
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN);

    let compliance_status = entry
        .get("Compliance")
        .and_then(|c| c.get("Status"))
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN);

    let resource_type = entry
        .get("Resources")
        .and_then(Value::as_array)
        .and_then(|resources| resources.first())
        .and_then(|r| r.get("Type"))
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN);

    Finding {
        account: account.to_string(),
        severity: severity.to_string(),
        compliance_status: compliance_status.to_string(),
        resource_type: resource_type.to_string(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "{}", content).unwrap();
        path
    }

    // ── CSV ───────────────────────────────────────────────────────────────────

    #[test]
    fn test_csv_reads_named_columns() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            dir.path(),
            "findings-1.csv",
            "AccountId,Severity,ComplianceStatus,ResourceType\n\
             111122223333,CRITICAL,FAILED,AwsS3Bucket\n\
             111122223333,LOW,PASSED,AwsIamRole\n",
        );

        let parsed = parse_csv_file(&path, "prod").unwrap();
        assert_eq!(parsed.records_failed, 0);
        assert_eq!(parsed.findings.len(), 2);
        assert_eq!(parsed.findings[0].account, "111122223333");
        assert_eq!(parsed.findings[0].severity, "CRITICAL");
        assert_eq!(parsed.findings[1].compliance_status, "PASSED");
        assert_eq!(parsed.findings[1].resource_type, "AwsIamRole");
    }

    #[test]
    fn test_csv_missing_columns_default_to_unknown() {
        let dir = TempDir::new().unwrap();
        // No AccountId or ResourceType column at all.
        let path = write_file(
            dir.path(),
            "findings-1.csv",
            "Severity,ComplianceStatus\nHIGH,WARNING\n",
        );

        let parsed = parse_csv_file(&path, "prod").unwrap();
        let finding = &parsed.findings[0];
        assert_eq!(finding.account, "prod");
        assert_eq!(finding.severity, "HIGH");
        assert_eq!(finding.compliance_status, "WARNING");
        assert_eq!(finding.resource_type, "UNKNOWN");
    }

    #[test]
    fn test_csv_empty_cells_default_to_unknown() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            dir.path(),
            "findings-1.csv",
            "AccountId,Severity,ComplianceStatus,ResourceType\n,,,\n",
        );

        let parsed = parse_csv_file(&path, "fallback").unwrap();
        let finding = &parsed.findings[0];
        assert_eq!(finding.account, "fallback");
        assert_eq!(finding.severity, "UNKNOWN");
        assert_eq!(finding.compliance_status, "UNKNOWN");
        assert_eq!(finding.resource_type, "UNKNOWN");
    }

    #[test]
    fn test_csv_extra_columns_tolerated() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            dir.path(),
            "findings-1.csv",
            "Id,AccountId,Severity,Title,ComplianceStatus,ResourceType\n\
             f-1,acct,MEDIUM,Some finding,FAILED,AwsEc2Instance\n",
        );

        let parsed = parse_csv_file(&path, "prod").unwrap();
        assert_eq!(parsed.findings[0].severity, "MEDIUM");
        assert_eq!(parsed.findings[0].resource_type, "AwsEc2Instance");
    }

    #[test]
    fn test_csv_missing_file_is_read_error() {
        let err = parse_csv_file(Path::new("/tmp/no-such-findings.csv"), "prod").unwrap_err();
        assert!(matches!(err, ExporterError::FileRead { .. }));
    }

    // ── JSON ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_json_nested_fields() {
        let dir = TempDir::new().unwrap();
        let doc = serde_json::json!({
            "Findings": [{
                "AwsAccountId": "111122223333",
                "Severity": {"Label": "CRITICAL"},
                "Compliance": {"Status": "FAILED"},
                "Resources": [{"Type": "AwsS3Bucket", "Id": "arn:aws:s3:::b"}],
            }]
        });
        let path = write_file(dir.path(), "findings-1.json", &doc.to_string());

        let parsed = parse_json_file(&path, "prod").unwrap();
        assert_eq!(parsed.findings.len(), 1);
        let finding = &parsed.findings[0];
        assert_eq!(finding.account, "111122223333");
        assert_eq!(finding.severity, "CRITICAL");
        assert_eq!(finding.compliance_status, "FAILED");
        assert_eq!(finding.resource_type, "AwsS3Bucket");
    }

    #[test]
    fn test_json_missing_resources_defaults_and_continues() {
        let dir = TempDir::new().unwrap();
        let doc = serde_json::json!({
            "Findings": [
                {
                    "Severity": {"Label": "HIGH"},
                    "Compliance": {"Status": "WARNING"},
                    // No Resources list at all.
                },
                {
                    "Severity": {"Label": "LOW"},
                    "Compliance": {"Status": "PASSED"},
                    "Resources": [],
                },
            ]
        });
        let path = write_file(dir.path(), "findings-1.json", &doc.to_string());

        let parsed = parse_json_file(&path, "prod").unwrap();
        assert_eq!(parsed.findings.len(), 2);
        assert_eq!(parsed.findings[0].resource_type, "UNKNOWN");
        assert_eq!(parsed.findings[0].account, "prod");
        assert_eq!(parsed.findings[1].severity, "LOW");
    }

    #[test]
    fn test_json_non_object_entry_skipped_and_counted() {
        let dir = TempDir::new().unwrap();
        let doc = serde_json::json!({
            "Findings": [
                "not an object",
                {"Severity": {"Label": "MEDIUM"}},
            ]
        });
        let path = write_file(dir.path(), "findings-1.json", &doc.to_string());

        let parsed = parse_json_file(&path, "prod").unwrap();
        assert_eq!(parsed.records_failed, 1);
        assert_eq!(parsed.findings.len(), 1);
        assert_eq!(parsed.findings[0].severity, "MEDIUM");
    }

    #[test]
    fn test_json_document_without_findings_list() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "findings-1.json", "{\"Other\": 1}");

        let parsed = parse_json_file(&path, "prod").unwrap();
        assert!(parsed.findings.is_empty());
        assert_eq!(parsed.records_failed, 0);
    }

    #[test]
    fn test_json_malformed_document_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "findings-1.json", "{broken");

        let err = parse_json_file(&path, "prod").unwrap_err();
        assert!(matches!(err, ExporterError::JsonParse { .. }));
    }
}

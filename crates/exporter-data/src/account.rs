//! Path-derived account resolution.
//!
//! Export files are laid out as `<root>/<account>/...`; the account label
//! for a file is the path segment immediately after the segment matching
//! the ingestion root's own directory name.

use std::path::Path;

use exporter_core::models::UNKNOWN_ACCOUNT;

/// Derive the account name for an export file from its path.
///
/// Walks the path's components looking for one equal to `root_name` (the
/// file name of the configured ingestion root, e.g. `"output"`) and returns
/// the component that follows it. Falls back to `"unknown"` when the
/// sentinel segment is absent or is the last component.
///
/// This is distinct from the per-record `AccountId`/`AwsAccountId` fields,
/// which take precedence on individual findings; the path-derived account
/// labels the per-account gauge series.
pub fn account_for_path(path: &Path, root_name: &str) -> String {
    let mut components = path.components();
    while let Some(component) = components.next() {
        if component.as_os_str() == root_name {
            if let Some(next) = components.next() {
                return next.as_os_str().to_string_lossy().to_string();
            }
        }
    }
    UNKNOWN_ACCOUNT.to_string()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_account_after_root_segment() {
        let path = PathBuf::from("/data/output/prod-account/csv/findings-2024.csv");
        assert_eq!(account_for_path(&path, "output"), "prod-account");
    }

    #[test]
    fn test_json_export_layout() {
        let path = PathBuf::from("/output/123456789012/findings-01.json");
        assert_eq!(account_for_path(&path, "output"), "123456789012");
    }

    #[test]
    fn test_missing_root_segment_falls_back_to_unknown() {
        let path = PathBuf::from("/somewhere/else/findings-01.json");
        assert_eq!(account_for_path(&path, "output"), "unknown");
    }

    #[test]
    fn test_file_directly_under_root_falls_back_to_unknown() {
        // The segment after "output" is the file itself; the original
        // exporter resolved this to the file name, but a file directly
        // under the root has no account directory at all when the
        // sentinel is the final directory component.
        let path = PathBuf::from("/output");
        assert_eq!(account_for_path(&path, "output"), "unknown");
    }

    #[test]
    fn test_custom_root_name() {
        let path = PathBuf::from("/srv/exports/staging/csv/findings-x.csv");
        assert_eq!(account_for_path(&path, "exports"), "staging");
    }
}

//! Aggregate metric state over a dedicated Prometheus registry.
//!
//! One [`FindingMetrics`] instance exists per process. The cumulative
//! `security_hub_findings_total` counter only ever increases; all gauge
//! families reflect the most recently processed file for an account and
//! are replaced wholesale, never merged, on each re-processing pass.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use exporter_core::error::Result;
use exporter_core::models::{
    Finding, COMPLIANCE_FAILED, COMPLIANCE_PASSED, COMPLIANCE_WARNING, SEVERITY_CRITICAL,
    SEVERITY_HIGH,
};
use prometheus::{
    GaugeVec, Histogram, HistogramOpts, IntCounterVec, IntGaugeVec, Opts, Registry, TextEncoder,
};
use tracing::debug;

/// Shared handle to the process-wide metric state.
///
/// The lock is held across each whole-file fold and across each export
/// render, so readers never observe a partially folded file.
pub type SharedMetrics = Arc<Mutex<FindingMetrics>>;

// ── FindingMetrics ────────────────────────────────────────────────────────────

/// The process-wide aggregate state backing the `/metrics` endpoint.
pub struct FindingMetrics {
    registry: Registry,
    findings_total: IntCounterVec,
    findings_by_severity: IntGaugeVec,
    resource_types: IntGaugeVec,
    critical_findings: IntGaugeVec,
    high_findings: IntGaugeVec,
    compliance_score: GaugeVec,
    processing_seconds: Histogram,
    /// Severity label values currently set per account, so a re-fold can
    /// drop series that the newer file no longer produces.
    severity_series: HashMap<String, HashSet<String>>,
    /// Resource-type label values currently set per account.
    resource_series: HashMap<String, HashSet<String>>,
}

impl FindingMetrics {
    /// Build the metric families and register them with a fresh registry.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let findings_total = IntCounterVec::new(
            Opts::new("security_hub_findings_total", "Total security findings"),
            &["account", "severity", "compliance_status", "resource_type"],
        )?;
        let findings_by_severity = IntGaugeVec::new(
            Opts::new(
                "security_hub_findings_by_severity",
                "Findings by severity level",
            ),
            &["account", "severity"],
        )?;
        let resource_types = IntGaugeVec::new(
            Opts::new(
                "security_hub_resource_types",
                "Resource types with findings",
            ),
            &["account", "resource_type"],
        )?;
        let critical_findings = IntGaugeVec::new(
            Opts::new("security_hub_critical_findings", "Critical findings count"),
            &["account"],
        )?;
        let high_findings = IntGaugeVec::new(
            Opts::new("security_hub_high_findings", "High severity findings count"),
            &["account"],
        )?;
        let compliance_score = GaugeVec::new(
            Opts::new(
                "security_hub_compliance_score",
                "Compliance score by account",
            ),
            &["account"],
        )?;
        let processing_seconds = Histogram::with_opts(HistogramOpts::new(
            "security_hub_processing_seconds",
            "Time spent processing findings",
        ))?;

        registry.register(Box::new(findings_total.clone()))?;
        registry.register(Box::new(findings_by_severity.clone()))?;
        registry.register(Box::new(resource_types.clone()))?;
        registry.register(Box::new(critical_findings.clone()))?;
        registry.register(Box::new(high_findings.clone()))?;
        registry.register(Box::new(compliance_score.clone()))?;
        registry.register(Box::new(processing_seconds.clone()))?;

        Ok(Self {
            registry,
            findings_total,
            findings_by_severity,
            resource_types,
            critical_findings,
            high_findings,
            compliance_score,
            processing_seconds,
            severity_series: HashMap::new(),
            resource_series: HashMap::new(),
        })
    }

    /// Fold one file's findings into the aggregate state.
    ///
    /// `account` is the path-derived account that labels the per-account
    /// gauge series; each finding's own `account` field (which may come
    /// from the record itself) labels the cumulative counter.
    pub fn fold_file(&mut self, account: &str, findings: &[Finding]) {
        let mut severity_counts: HashMap<&str, i64> = HashMap::new();
        let mut resource_counts: HashMap<&str, i64> = HashMap::new();
        let mut passed = 0i64;
        let mut failed = 0i64;
        let mut warning = 0i64;

        for finding in findings {
            self.findings_total
                .with_label_values(&[
                    finding.account.as_str(),
                    finding.severity.as_str(),
                    finding.compliance_status.as_str(),
                    finding.resource_type.as_str(),
                ])
                .inc();

            *severity_counts.entry(finding.severity.as_str()).or_insert(0) += 1;
            *resource_counts
                .entry(finding.resource_type.as_str())
                .or_insert(0) += 1;

            // An UNKNOWN status counts toward none of the three buckets.
            match finding.compliance_status.as_str() {
                COMPLIANCE_PASSED => passed += 1,
                COMPLIANCE_FAILED => failed += 1,
                COMPLIANCE_WARNING => warning += 1,
                _ => {}
            }
        }

        Self::replace_series(
            &self.findings_by_severity,
            self.severity_series.entry(account.to_string()).or_default(),
            account,
            &severity_counts,
        );
        Self::replace_series(
            &self.resource_types,
            self.resource_series.entry(account.to_string()).or_default(),
            account,
            &resource_counts,
        );

        self.critical_findings
            .with_label_values(&[account])
            .set(severity_counts.get(SEVERITY_CRITICAL).copied().unwrap_or(0));
        self.high_findings
            .with_label_values(&[account])
            .set(severity_counts.get(SEVERITY_HIGH).copied().unwrap_or(0));

        let total = passed + failed + warning;
        if total > 0 {
            let score = 100.0 * passed as f64 / total as f64;
            self.compliance_score.with_label_values(&[account]).set(score);
        } else {
            debug!(
                "No compliance-relevant records for account {}; score unchanged",
                account
            );
        }
    }

    /// Record how long one scan pass took.
    pub fn observe_scan_duration(&self, seconds: f64) {
        self.processing_seconds.observe(seconds);
    }

    /// Render the current state in the Prometheus text exposition format.
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = String::new();
        encoder.encode_utf8(&self.registry.gather(), &mut buffer)?;
        Ok(buffer)
    }

    /// Overwrite one account's gauge series with freshly computed tallies,
    /// removing series the new tallies no longer contain.
    fn replace_series(
        gauge: &IntGaugeVec,
        current: &mut HashSet<String>,
        account: &str,
        tallies: &HashMap<&str, i64>,
    ) {
        for stale in current.iter().filter(|l| !tallies.contains_key(l.as_str())) {
            let _ = gauge.remove_label_values(&[account, stale.as_str()]);
        }
        current.retain(|l| tallies.contains_key(l.as_str()));

        for (&label, &count) in tallies {
            gauge.with_label_values(&[account, label]).set(count);
            current.insert(label.to_string());
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

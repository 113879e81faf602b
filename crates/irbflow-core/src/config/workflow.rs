//! Workflow policy configuration.

use serde::{Deserialize, Serialize};

/// Tunable policy knobs for the proposal workflow engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Prefix for derived certificate numbers, e.g. `"REC"`.
    #[serde(default = "default_certificate_prefix")]
    pub certificate_prefix: String,
    /// Validity of an issued certificate, in months.
    #[serde(default = "default_certificate_validity_months")]
    pub certificate_validity_months: u32,
    /// Interval between required progress reports, in months.
    #[serde(default = "default_report_interval_months")]
    pub report_interval_months: u32,
    /// Extension granted by an approved renewal, in months.
    #[serde(default = "default_renewal_extension_months")]
    pub renewal_extension_months: u32,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            certificate_prefix: default_certificate_prefix(),
            certificate_validity_months: default_certificate_validity_months(),
            report_interval_months: default_report_interval_months(),
            renewal_extension_months: default_renewal_extension_months(),
        }
    }
}

fn default_certificate_prefix() -> String {
    "REC".to_string()
}

fn default_certificate_validity_months() -> u32 {
    12
}

fn default_report_interval_months() -> u32 {
    6
}

fn default_renewal_extension_months() -> u32 {
    12
}

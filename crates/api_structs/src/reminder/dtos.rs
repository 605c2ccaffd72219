use reeni_domain::DispatchReport;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DispatchReportDTO {
    pub attempted: usize,
    pub sent: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl DispatchReportDTO {
    pub fn new(report: DispatchReport) -> Self {
        Self {
            attempted: report.attempted,
            sent: report.sent,
            failed: report.failed,
            skipped: report.skipped,
        }
    }
}

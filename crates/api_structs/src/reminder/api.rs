use crate::dtos::DispatchReportDTO;
use reeni_domain::DispatchReport;
use serde::{Deserialize, Serialize};

pub mod send_due_reminders {
    use super::*;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub report: DispatchReportDTO,
    }

    impl APIResponse {
        pub fn new(report: DispatchReport) -> Self {
            Self {
                report: DispatchReportDTO::new(report),
            }
        }
    }
}

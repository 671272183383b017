use super::entities::StudentProgress;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "progress.ts")]
pub struct ProgressListResponse {
    pub items: Vec<StudentProgress>,
}

use super::entities::Assignment;
use crate::models::submissions::responses::{GradeStats, StatusCount};
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "assignment.ts")]
pub struct AssignmentListResponse {
    pub items: Vec<Assignment>,
}

/// 作业统计响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "assignment.ts")]
pub struct AssignmentStatsResponse {
    pub assignment_id: i64,
    pub total_students: i64,
    pub submitted_count: i64,
    pub submission_rate: f64,
    pub grades: GradeStats,
    pub status_breakdown: Vec<StatusCount>,
}

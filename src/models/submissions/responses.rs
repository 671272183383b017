use serde::Serialize;
use ts_rs::TS;

use super::entities::{AssignmentSubmission, SubmissionStatus};
use crate::models::PaginationInfo;

/// 提交者信息
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "submission.ts")]
pub struct SubmissionCreator {
    pub id: i64,
    pub name: String,
    pub avatar_url: Option<String>,
}

/// 提交列表项（包含提交者信息）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "submission.ts")]
pub struct SubmissionListItem {
    pub submission: AssignmentSubmission,
    pub creator: Option<SubmissionCreator>,
}

/// 提交列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "submission.ts")]
pub struct SubmissionListResponse {
    pub items: Vec<SubmissionListItem>,
    pub pagination: PaginationInfo,
}

/// 分数统计
#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export, export_to = "submission.ts")]
pub struct GradeStats {
    pub graded_count: i64,
    pub average: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// 各状态的提交数
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "submission.ts")]
pub struct StatusCount {
    pub status: SubmissionStatus,
    pub count: i64,
}

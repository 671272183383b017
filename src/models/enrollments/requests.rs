use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

// 选课请求；教师或管理员可以指定学生
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "enrollment.ts")]
pub struct EnrollRequest {
    pub user_id: Option<i64>,
}

// 选课列表查询参数
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "enrollment.ts")]
pub struct EnrollmentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
}

// 更新进度请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "enrollment.ts")]
pub struct UpdateProgressRequest {
    pub progress: f64,
}

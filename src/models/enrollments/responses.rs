use super::entities::CourseEnrollment;
use crate::models::common::PaginationInfo;
use crate::models::users::entities::User;
use serde::Serialize;
use ts_rs::TS;

// 选课记录及学生信息
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "enrollment.ts")]
pub struct EnrollmentDetail {
    pub enrollment: CourseEnrollment,
    pub user: Option<User>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "enrollment.ts")]
pub struct EnrollmentListResponse {
    pub items: Vec<EnrollmentDetail>,
    pub pagination: PaginationInfo,
}

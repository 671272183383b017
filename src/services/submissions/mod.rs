pub mod detail;
pub mod grade;
pub mod list;
pub mod submit;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::submissions::entities::AssignmentSubmission;
use crate::models::submissions::requests::{
    GradeSubmissionRequest, SubmissionListParams, SubmitAssignmentRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::lms_error_response;
use crate::storage::Storage;

pub struct SubmissionService {
    storage: Option<Arc<dyn Storage>>,
}

impl SubmissionService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from(request),
        }
    }

    /// 提交或重新提交作业
    pub async fn submit(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        submission: SubmitAssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        submit::submit(self, request, assignment_id, submission).await
    }

    /// 作业的提交列表
    pub async fn list_submissions(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        query: SubmissionListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_submissions(self, request, assignment_id, query).await
    }

    /// 当前学生在该作业下的提交
    pub async fn get_my_submission(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        detail::get_my_submission(self, request, assignment_id).await
    }

    /// 提交详情，提交者本人或课程管理者可见
    pub async fn get_submission(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        submission_id: i64,
    ) -> ActixResult<HttpResponse> {
        detail::get_submission(self, request, assignment_id, submission_id).await
    }

    /// 批改
    pub async fn grade_submission(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        submission_id: i64,
        grade: GradeSubmissionRequest,
    ) -> ActixResult<HttpResponse> {
        grade::grade_submission(self, request, assignment_id, submission_id, grade).await
    }
}

pub(crate) fn submission_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::SubmissionNotFound,
        "Submission not found",
    ))
}

/// 读取提交并确认属于该作业
pub(crate) async fn submission_in_assignment(
    storage: &Arc<dyn Storage>,
    submission_id: i64,
    assignment_id: i64,
) -> Result<AssignmentSubmission, HttpResponse> {
    match storage.get_submission(submission_id).await {
        Ok(Some(submission)) if submission.assignment_id == assignment_id => Ok(submission),
        Ok(_) => Err(submission_not_found()),
        Err(e) => Err(lms_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Failed to get submission",
        )),
    }
}

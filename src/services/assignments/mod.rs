pub mod list;
pub mod manage;
pub mod stats;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::assignments::entities::Assignment;
use crate::models::assignments::requests::{CreateAssignmentRequest, UpdateAssignmentRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::lms_error_response;
use crate::storage::Storage;

pub struct AssignmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl AssignmentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from(request),
        }
    }

    // 课程作业列表，按截止时间排序
    pub async fn list_assignments(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_assignments(self, request).await
    }

    pub async fn get_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        list::get_assignment(self, request, assignment_id).await
    }

    pub async fn create_assignment(
        &self,
        request: &HttpRequest,
        assignment_data: CreateAssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        manage::create_assignment(self, request, assignment_data).await
    }

    pub async fn update_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        update_data: UpdateAssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        manage::update_assignment(self, request, assignment_id, update_data).await
    }

    pub async fn delete_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        manage::delete_assignment(self, request, assignment_id).await
    }

    // 作业统计：提交率、分数分布与状态分布
    pub async fn get_assignment_stats(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        stats::get_assignment_stats(self, request, assignment_id).await
    }
}

pub(crate) fn assignment_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::AssignmentNotFound,
        "Assignment not found",
    ))
}

/// 读取作业并确认属于该课程，否则按不存在处理
pub(crate) async fn assignment_in_course(
    storage: &Arc<dyn Storage>,
    assignment_id: i64,
    course_id: i64,
) -> Result<Assignment, HttpResponse> {
    match storage.get_assignment(assignment_id).await {
        Ok(Some(assignment)) if assignment.course_id == course_id => Ok(assignment),
        Ok(_) => Err(assignment_not_found()),
        Err(e) => Err(lms_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Failed to get assignment",
        )),
    }
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EnrollmentService;
use crate::models::enrollments::requests::UpdateProgressRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_membership, lms_error_response};

pub async fn update_progress(
    service: &EnrollmentService,
    request: &HttpRequest,
    user_id: i64,
    progress_data: UpdateProgressRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let membership = match current_membership(request) {
        Ok(membership) => membership,
        Err(response) => return Ok(response),
    };

    if !progress_data.progress.is_finite() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "progress must be a number",
        )));
    }

    // 超出 0..=100 的进度由存储层截断
    match storage
        .update_enrollment_progress(user_id, membership.course.id, progress_data.progress)
        .await
    {
        Ok(Some(enrollment)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            enrollment,
            "Progress updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::EnrollmentNotFound,
            "Enrollment not found",
        ))),
        Err(e) => Ok(lms_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Failed to update progress",
        )),
    }
}

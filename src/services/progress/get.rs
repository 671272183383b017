use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ProgressService;
use crate::models::progress::responses::ProgressListResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_membership, current_user, lms_error_response};

pub async fn list_course_progress(
    service: &ProgressService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let membership = match current_membership(request) {
        Ok(membership) => membership,
        Err(response) => return Ok(response),
    };

    match storage.list_course_progress(membership.course.id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ProgressListResponse { items },
            "Progress list retrieved successfully",
        ))),
        Err(e) => Ok(lms_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Failed to retrieve progress list",
        )),
    }
}

pub async fn get_my_progress(
    service: &ProgressService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let membership = match current_membership(request) {
        Ok(membership) => membership,
        Err(response) => return Ok(response),
    };

    // 没有汇总记录时现场计算一次
    let progress = match storage.get_progress(user.id, membership.course.id).await {
        Ok(Some(progress)) => Ok(progress),
        Ok(None) => {
            storage
                .recompute_progress(user.id, membership.course.id)
                .await
        }
        Err(e) => Err(e),
    };

    match progress {
        Ok(progress) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            progress,
            "Progress retrieved successfully",
        ))),
        Err(e) if e.is_not_found() => Ok(HttpResponse::NotFound().json(
            ApiResponse::error_empty(ErrorCode::ProgressNotFound, "Progress not found"),
        )),
        Err(e) => Ok(lms_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Failed to get progress",
        )),
    }
}

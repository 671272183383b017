use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, assignment_in_course};
use crate::models::assignments::responses::AssignmentListResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_membership, lms_error_response};

pub async fn list_assignments(
    service: &AssignmentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let membership = match current_membership(request) {
        Ok(membership) => membership,
        Err(response) => return Ok(response),
    };

    match storage.list_course_assignments(membership.course.id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AssignmentListResponse { items },
            "Assignment list retrieved successfully",
        ))),
        Err(e) => Ok(lms_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Failed to retrieve assignment list",
        )),
    }
}

pub async fn get_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let membership = match current_membership(request) {
        Ok(membership) => membership,
        Err(response) => return Ok(response),
    };

    match assignment_in_course(&storage, assignment_id, membership.course.id).await {
        Ok(assignment) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            assignment,
            "Assignment retrieved successfully",
        ))),
        Err(resp) => Ok(resp),
    }
}

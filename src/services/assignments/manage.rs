use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{AssignmentService, assignment_in_course, assignment_not_found};
use crate::errors::LmsError;
use crate::models::assignments::entities::validate_total_points;
use crate::models::assignments::requests::{CreateAssignmentRequest, UpdateAssignmentRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_membership, lms_error_response};
use crate::utils::validate::validate_title;

const ASSIGNMENT_TITLE_MAX_CHARS: usize = 200;

fn invalid(msg: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::AssignmentInvalid, msg))
}

fn assignment_error(e: &LmsError, context: &str) -> HttpResponse {
    match e {
        LmsError::Validation(msg) => invalid(msg.as_str()),
        _ => lms_error_response(e, ErrorCode::InternalServerError, context),
    }
}

pub async fn create_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    mut assignment_data: CreateAssignmentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let membership = match current_membership(request) {
        Ok(membership) => membership,
        Err(response) => return Ok(response),
    };

    if let Err(msg) = validate_title(&assignment_data.title, ASSIGNMENT_TITLE_MAX_CHARS) {
        return Ok(invalid(msg));
    }
    if let Err(msg) = validate_total_points(assignment_data.total_points) {
        return Ok(invalid(msg));
    }
    assignment_data.title = assignment_data.title.trim().to_string();

    // 新作业会改变课程内所有学生的完成率
    match storage
        .create_assignment(membership.course.id, assignment_data)
        .await
    {
        Ok(assignment) => {
            info!(
                "Assignment {} created in course {}",
                assignment.id, membership.course.id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                assignment,
                "Assignment created successfully",
            )))
        }
        Err(e) => Ok(assignment_error(&e, "Assignment creation failed")),
    }
}

pub async fn update_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
    mut update_data: UpdateAssignmentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let membership = match current_membership(request) {
        Ok(membership) => membership,
        Err(response) => return Ok(response),
    };

    if let Err(resp) = assignment_in_course(&storage, assignment_id, membership.course.id).await {
        return Ok(resp);
    }

    if let Some(title) = update_data.title.take() {
        if let Err(msg) = validate_title(&title, ASSIGNMENT_TITLE_MAX_CHARS) {
            return Ok(invalid(msg));
        }
        update_data.title = Some(title.trim().to_string());
    }
    if let Some(points) = update_data.total_points
        && let Err(msg) = validate_total_points(points)
    {
        return Ok(invalid(msg));
    }

    match storage.update_assignment(assignment_id, update_data).await {
        Ok(Some(assignment)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            assignment,
            "Assignment updated successfully",
        ))),
        Ok(None) => Ok(assignment_not_found()),
        Err(e) => Ok(assignment_error(&e, "Assignment update failed")),
    }
}

pub async fn delete_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let membership = match current_membership(request) {
        Ok(membership) => membership,
        Err(response) => return Ok(response),
    };

    if let Err(resp) = assignment_in_course(&storage, assignment_id, membership.course.id).await {
        return Ok(resp);
    }

    match storage.delete_assignment(assignment_id).await {
        Ok(true) => Ok(
            HttpResponse::Ok().json(ApiResponse::success_empty("Assignment deleted successfully")),
        ),
        Ok(false) => Ok(assignment_not_found()),
        Err(e) => Ok(lms_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Assignment deletion failed",
        )),
    }
}

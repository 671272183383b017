use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SubmissionService, submission_in_assignment, submission_not_found};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::assignments::assignment_in_course;
use crate::services::{current_membership, current_user, lms_error_response};

pub async fn get_my_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: i64,
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

    if let Err(resp) = assignment_in_course(&storage, assignment_id, membership.course.id).await {
        return Ok(resp);
    }

    match storage.get_user_submission(assignment_id, user.id).await {
        Ok(Some(submission)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            submission,
            "Submission retrieved successfully",
        ))),
        Ok(None) => Ok(submission_not_found()),
        Err(e) => Ok(lms_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Failed to get submission",
        )),
    }
}

pub async fn get_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: i64,
    submission_id: i64,
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

    if let Err(resp) = assignment_in_course(&storage, assignment_id, membership.course.id).await {
        return Ok(resp);
    }

    let submission = match submission_in_assignment(&storage, submission_id, assignment_id).await {
        Ok(submission) => submission,
        Err(resp) => return Ok(resp),
    };

    // 学生只能查看自己的提交
    if !membership.role.can_manage() && submission.user_id != user.id {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::CoursePermissionDenied,
            "You can only view your own submission",
        )));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        submission,
        "Submission retrieved successfully",
    )))
}

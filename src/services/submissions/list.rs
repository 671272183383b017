use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::models::submissions::requests::SubmissionListParams;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::assignments::assignment_in_course;
use crate::services::{current_membership, lms_error_response};

pub async fn list_submissions(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: i64,
    query: SubmissionListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let membership = match current_membership(request) {
        Ok(membership) => membership,
        Err(response) => return Ok(response),
    };

    if let Err(resp) = assignment_in_course(&storage, assignment_id, membership.course.id).await {
        return Ok(resp);
    }

    match storage
        .list_assignment_submissions_with_pagination(assignment_id, query.into())
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Submission list retrieved successfully",
        ))),
        Err(e) => Ok(lms_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Failed to retrieve submission list",
        )),
    }
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{SubmissionService, submission_in_assignment, submission_not_found};
use crate::errors::LmsError;
use crate::models::submissions::requests::GradeSubmissionRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::assignments::assignment_in_course;
use crate::services::{current_membership, lms_error_response};

pub async fn grade_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: i64,
    submission_id: i64,
    grade: GradeSubmissionRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let membership = match current_membership(request) {
        Ok(membership) => membership,
        Err(response) => return Ok(response),
    };

    let assignment =
        match assignment_in_course(&storage, assignment_id, membership.course.id).await {
            Ok(assignment) => assignment,
            Err(resp) => return Ok(resp),
        };

    if let Err(resp) = submission_in_assignment(&storage, submission_id, assignment_id).await {
        return Ok(resp);
    }

    if !assignment.accepts_grade(grade.grade) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::GradeOutOfRange,
            format!("Grade must be between 0 and {}", assignment.total_points),
        )));
    }

    match storage.grade_submission(submission_id, grade).await {
        Ok(Some(submission)) => {
            info!(
                "Submission {} graded: {:?}",
                submission.id, submission.grade
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                submission,
                "Submission graded successfully",
            )))
        }
        Ok(None) => Ok(submission_not_found()),
        Err(LmsError::Validation(msg)) => Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::GradeOutOfRange, msg))),
        Err(e) => Ok(lms_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Grading failed",
        )),
    }
}

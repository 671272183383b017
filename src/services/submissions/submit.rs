use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SubmissionService;
use crate::errors::LmsError;
use crate::models::submissions::requests::SubmitAssignmentRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::assignments::assignment_in_course;
use crate::services::{current_membership, current_user, lms_error_response};

/// 提交内容与附件至少有一项
pub(crate) fn has_payload(submission: &SubmitAssignmentRequest) -> bool {
    let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
    present(&submission.content) || present(&submission.file_url)
}

pub async fn submit(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: i64,
    submission: SubmitAssignmentRequest,
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

    if !has_payload(&submission) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "content or file_url is required",
        )));
    }

    // 截止后提交记为 late，已批改的提交不能再覆盖
    match storage
        .submit_assignment(assignment_id, user.id, submission)
        .await
    {
        Ok(submission) => {
            info!(
                "User {} submitted assignment {} ({})",
                user.id, assignment_id, submission.status
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                submission,
                "Assignment submitted successfully",
            )))
        }
        Err(LmsError::Conflict(msg)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::SubmissionAlreadyGraded, msg),
        )),
        Err(e) => Ok(lms_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Submission failed",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_needs_payload() {
        let empty = SubmitAssignmentRequest {
            content: Some("   ".into()),
            file_url: None,
        };
        assert!(!has_payload(&empty));

        let with_file = SubmitAssignmentRequest {
            content: None,
            file_url: Some("https://files.lms.test/a.pdf".into()),
        };
        assert!(has_payload(&with_file));
    }
}

pub mod announcements;
pub mod assignments;
pub mod auth;
pub mod courses;
pub mod enrollments;
pub mod materials;
pub mod messages;
pub mod progress;
pub mod submissions;
pub mod system;
pub mod users;

pub use announcements::AnnouncementService;
pub use assignments::AssignmentService;
pub use auth::AuthService;
pub use courses::CourseService;
pub use enrollments::EnrollmentService;
pub use materials::MaterialService;
pub use messages::MessageService;
pub use progress::ProgressService;
pub use submissions::SubmissionService;
pub use system::SystemService;
pub use users::UserService;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode, web};
use std::sync::Arc;
use tracing::error;

use crate::errors::LmsError;
use crate::middlewares::{RequireCourseRole, RequireJWT};
use crate::models::courses::entities::CourseMembership;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

/// 从 app_data 取出存储
pub(crate) fn storage_from(request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| {
            error!("Storage not found in app data");
            actix_web::error::ErrorInternalServerError("Storage not configured")
        })
}

/// LmsError 到 HTTP 状态码与错误码的映射，未归类的错误使用 `fallback`
pub(crate) fn error_status(err: &LmsError, fallback: ErrorCode) -> (StatusCode, ErrorCode) {
    match err {
        LmsError::Validation(_) => (StatusCode::BAD_REQUEST, ErrorCode::ValidationFailed),
        LmsError::NotFound(_) | LmsError::RecordNotFound(_) => {
            (StatusCode::NOT_FOUND, ErrorCode::NotFound)
        }
        LmsError::UniqueConstraint(_) | LmsError::Conflict(_) => {
            (StatusCode::CONFLICT, ErrorCode::Conflict)
        }
        LmsError::ForeignKeyConstraint(_) | LmsError::InvalidQuery(_) => {
            (StatusCode::BAD_REQUEST, ErrorCode::BadRequest)
        }
        LmsError::Authentication(_) => (StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized),
        LmsError::Authorization(_) => (StatusCode::FORBIDDEN, ErrorCode::Forbidden),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, fallback),
    }
}

/// 将存储层错误转换为统一的错误响应
pub(crate) fn lms_error_response(err: &LmsError, fallback: ErrorCode, context: &str) -> HttpResponse {
    let (status, code) = error_status(err, fallback);
    if status.is_server_error() {
        error!("{}: {}", context, err);
    }
    HttpResponse::build(status).json(ApiResponse::error_empty(
        code,
        format!("{context}: {}", err.message()),
    ))
}

pub(crate) fn unauthorized_response() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::Unauthorized,
        "Unauthorized access, please login",
    ))
}

/// 当前登录用户
pub(crate) fn current_user(request: &HttpRequest) -> Result<User, HttpResponse> {
    RequireJWT::extract_user_claims(request).ok_or_else(unauthorized_response)
}

/// 当前用户在路径课程中的身份
pub(crate) fn current_membership(request: &HttpRequest) -> Result<CourseMembership, HttpResponse> {
    RequireCourseRole::extract_membership(request).ok_or_else(|| {
        HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::CoursePermissionDenied,
            "No permission for this course",
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        let fallback = ErrorCode::InternalServerError;
        assert_eq!(
            error_status(&LmsError::validation("x"), fallback),
            (StatusCode::BAD_REQUEST, ErrorCode::ValidationFailed)
        );
        assert_eq!(
            error_status(&LmsError::record_not_found("x"), fallback).0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_status(&LmsError::unique_constraint("x"), fallback).0,
            StatusCode::CONFLICT
        );
        assert_eq!(
            error_status(&LmsError::conflict("x"), fallback).1,
            ErrorCode::Conflict
        );
        assert_eq!(
            error_status(&LmsError::database_operation("x"), ErrorCode::CourseCreationFailed),
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::CourseCreationFailed
            )
        );
    }

    #[actix_web::test]
    async fn test_storage_missing_is_error() {
        let req = actix_web::test::TestRequest::default().to_http_request();
        assert!(storage_from(&req).is_err());
        assert!(current_user(&req).is_err());
    }
}

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::EnrollmentService;
use crate::errors::LmsError;
use crate::models::courses::entities::Course;
use crate::models::enrollments::requests::EnrollRequest;
use crate::models::users::entities::{User, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, lms_error_response};
use crate::storage::Storage;

fn forbidden(message: &str) -> HttpResponse {
    HttpResponse::Forbidden().json(ApiResponse::error_empty(
        ErrorCode::CoursePermissionDenied,
        message,
    ))
}

pub async fn enroll(
    service: &EnrollmentService,
    request: &HttpRequest,
    course_id: i64,
    enroll_data: EnrollRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    let course = match storage.get_course_by_id(course_id).await {
        Ok(Some(course)) => course,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::CourseNotFound,
                "Course not found",
            )));
        }
        Err(e) => {
            return Ok(lms_error_response(
                &e,
                ErrorCode::InternalServerError,
                "Failed to get course",
            ));
        }
    };

    let student_id = match resolve_student(&user, &course, &enroll_data, &storage).await {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };

    match storage.enroll_user(student_id, course.id).await {
        Ok(enrollment) => {
            info!("User {} enrolled in course {}", student_id, course.id);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(enrollment, "Enrolled successfully")))
        }
        Err(e) if matches!(e, LmsError::Conflict(_)) || e.is_unique_violation() => {
            Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::CourseAlreadyEnrolled,
                "Already enrolled in this course",
            )))
        }
        Err(e) => Ok(lms_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Enrollment failed",
        )),
    }
}

/// 确定选课的学生
async fn resolve_student(
    user: &User,
    course: &Course,
    enroll_data: &EnrollRequest,
    storage: &Arc<dyn Storage>,
) -> Result<i64, HttpResponse> {
    match user.role {
        UserRole::Student => {
            if enroll_data.user_id.is_some_and(|id| id != user.id) {
                return Err(forbidden("Students can only enroll themselves"));
            }
            if !course.is_published {
                return Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::CourseNotPublished,
                    "Course is not published",
                )));
            }
            Ok(user.id)
        }
        UserRole::Teacher | UserRole::Admin => {
            if user.role == UserRole::Teacher && course.teacher_id != user.id {
                return Err(forbidden("Only the course teacher can enroll students"));
            }
            let Some(student_id) = enroll_data.user_id else {
                return Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::ValidationFailed,
                    "user_id is required",
                )));
            };
            match storage.get_user_by_id(student_id).await {
                Ok(Some(student)) if student.role == UserRole::Student => Ok(student.id),
                Ok(Some(_)) => Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::ValidationFailed,
                    "Only students can be enrolled",
                ))),
                Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::UserNotFound,
                    "User not found",
                ))),
                Err(e) => Err(lms_error_response(
                    &e,
                    ErrorCode::InternalServerError,
                    "Failed to fetch user",
                )),
            }
        }
    }
}

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::CourseService;
use crate::models::courses::{requests::CreateCourseRequest, responses::CourseResponse};
use crate::models::users::entities::{User, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, lms_error_response};
use crate::storage::Storage;
use crate::utils::validate::validate_title;

/// 课程标题最大字符数
pub const COURSE_TITLE_MAX_CHARS: usize = 200;

pub async fn create_course(
    service: &CourseService,
    request: &HttpRequest,
    mut course_data: CreateCourseRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    if let Err(msg) = validate_title(&course_data.title, COURSE_TITLE_MAX_CHARS) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }
    course_data.title = course_data.title.trim().to_string();

    // 权限校验
    let teacher_id = match resolve_teacher(&user, &course_data, &storage).await {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };

    match storage.create_course(teacher_id, course_data).await {
        Ok(course) => {
            info!("Course {} created by user {}", course.id, user.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                CourseResponse { course },
                "Course created successfully",
            )))
        }
        Err(e) => Ok(lms_error_response(
            &e,
            ErrorCode::CourseCreationFailed,
            "Course creation failed",
        )),
    }
}

/// 确定授课教师：教师只能为自己建课，管理员必须指定一名教师
async fn resolve_teacher(
    user: &User,
    course_data: &CreateCourseRequest,
    storage: &Arc<dyn Storage>,
) -> Result<i64, HttpResponse> {
    match user.role {
        UserRole::Teacher => match course_data.teacher_id {
            Some(id) if id != user.id => Err(HttpResponse::Forbidden().json(
                ApiResponse::error_empty(
                    ErrorCode::CoursePermissionDenied,
                    "You do not have permission to create a course for another teacher",
                ),
            )),
            _ => Ok(user.id),
        },
        UserRole::Admin => {
            let Some(teacher_id) = course_data.teacher_id else {
                return Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::ValidationFailed,
                    "teacher_id is required when an admin creates a course",
                )));
            };
            match storage.get_user_by_id(teacher_id).await {
                Ok(Some(teacher)) if teacher.role == UserRole::Teacher => Ok(teacher.id),
                Ok(Some(_)) => Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::CoursePermissionDenied,
                    "Admin can only create courses for teachers",
                ))),
                Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::UserNotFound,
                    "Teacher not found",
                ))),
                Err(e) => Err(lms_error_response(
                    &e,
                    ErrorCode::InternalServerError,
                    "Failed to fetch teacher",
                )),
            }
        }
        UserRole::Student => Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::CoursePermissionDenied,
            "You do not have permission to create a course",
        ))),
    }
}

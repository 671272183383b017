use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use crate::models::courses::responses::CourseResponse;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, lms_error_response};

fn course_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::CourseNotFound,
        "Course not found",
    ))
}

pub async fn get_course(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    let course = match storage.get_course_by_id(course_id).await {
        Ok(Some(course)) => course,
        Ok(None) => return Ok(course_not_found()),
        Err(e) => {
            return Ok(lms_error_response(
                &e,
                ErrorCode::InternalServerError,
                "Failed to get course",
            ));
        }
    };

    // 未发布课程只对授课教师、管理员与已选学生可见
    if !course.is_published && user.role != UserRole::Admin && course.teacher_id != user.id {
        match storage.get_enrollment(user.id, course_id).await {
            Ok(Some(_)) => {}
            Ok(None) => return Ok(course_not_found()),
            Err(e) => {
                return Ok(lms_error_response(
                    &e,
                    ErrorCode::InternalServerError,
                    "Failed to get course",
                ));
            }
        }
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        CourseResponse { course },
        "Course retrieved successfully",
    )))
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use super::create::COURSE_TITLE_MAX_CHARS;
use crate::models::courses::{requests::UpdateCourseRequest, responses::CourseResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_membership, lms_error_response};
use crate::utils::validate::validate_title;

pub async fn update_course(
    service: &CourseService,
    request: &HttpRequest,
    mut update_data: UpdateCourseRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let membership = match current_membership(request) {
        Ok(membership) => membership,
        Err(response) => return Ok(response),
    };

    if let Some(title) = update_data.title.take() {
        if let Err(msg) = validate_title(&title, COURSE_TITLE_MAX_CHARS) {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
        }
        update_data.title = Some(title.trim().to_string());
    }

    match storage
        .update_course(membership.course.id, update_data)
        .await
    {
        Ok(Some(course)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            CourseResponse { course },
            "Course updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CourseNotFound,
            "Course not found",
        ))),
        Err(e) => Ok(lms_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Course update failed",
        )),
    }
}

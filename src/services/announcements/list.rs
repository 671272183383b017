use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AnnouncementService;
use crate::models::announcements::responses::AnnouncementListResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_membership, lms_error_response};

pub async fn list_announcements(
    service: &AnnouncementService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let membership = match current_membership(request) {
        Ok(membership) => membership,
        Err(response) => return Ok(response),
    };

    match storage.list_course_announcements(membership.course.id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AnnouncementListResponse { items },
            "Announcement list retrieved successfully",
        ))),
        Err(e) => Ok(lms_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Failed to retrieve announcement list",
        )),
    }
}

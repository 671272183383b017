use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::{AnnouncementService, announcement_not_found};
use crate::models::announcements::requests::{
    CreateAnnouncementRequest, UpdateAnnouncementRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_membership, current_user, lms_error_response};
use crate::storage::Storage;
use crate::utils::validate::validate_title;

const ANNOUNCEMENT_TITLE_MAX_CHARS: usize = 200;

fn invalid(msg: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg))
}

async fn announcement_in_course(
    storage: &Arc<dyn Storage>,
    announcement_id: i64,
    course_id: i64,
) -> Result<(), HttpResponse> {
    match storage.get_announcement(announcement_id).await {
        Ok(Some(announcement)) if announcement.course_id == course_id => Ok(()),
        Ok(_) => Err(announcement_not_found()),
        Err(e) => Err(lms_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Failed to get announcement",
        )),
    }
}

pub async fn create_announcement(
    service: &AnnouncementService,
    request: &HttpRequest,
    mut announcement: CreateAnnouncementRequest,
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

    if let Err(msg) = validate_title(&announcement.title, ANNOUNCEMENT_TITLE_MAX_CHARS) {
        return Ok(invalid(msg));
    }
    if announcement.content.trim().is_empty() {
        return Ok(invalid("Content must not be empty"));
    }
    announcement.title = announcement.title.trim().to_string();

    match storage
        .create_announcement(membership.course.id, user.id, announcement)
        .await
    {
        Ok(announcement) => Ok(HttpResponse::Created().json(ApiResponse::success(
            announcement,
            "Announcement created successfully",
        ))),
        Err(e) => Ok(lms_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Announcement creation failed",
        )),
    }
}

pub async fn update_announcement(
    service: &AnnouncementService,
    request: &HttpRequest,
    announcement_id: i64,
    mut update_data: UpdateAnnouncementRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let membership = match current_membership(request) {
        Ok(membership) => membership,
        Err(response) => return Ok(response),
    };

    if let Err(resp) = announcement_in_course(&storage, announcement_id, membership.course.id).await
    {
        return Ok(resp);
    }

    if let Some(title) = update_data.title.take() {
        if let Err(msg) = validate_title(&title, ANNOUNCEMENT_TITLE_MAX_CHARS) {
            return Ok(invalid(msg));
        }
        update_data.title = Some(title.trim().to_string());
    }
    if update_data
        .content
        .as_deref()
        .is_some_and(|c| c.trim().is_empty())
    {
        return Ok(invalid("Content must not be empty"));
    }

    match storage
        .update_announcement(announcement_id, update_data)
        .await
    {
        Ok(Some(announcement)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            announcement,
            "Announcement updated successfully",
        ))),
        Ok(None) => Ok(announcement_not_found()),
        Err(e) => Ok(lms_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Announcement update failed",
        )),
    }
}

pub async fn delete_announcement(
    service: &AnnouncementService,
    request: &HttpRequest,
    announcement_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let membership = match current_membership(request) {
        Ok(membership) => membership,
        Err(response) => return Ok(response),
    };

    if let Err(resp) = announcement_in_course(&storage, announcement_id, membership.course.id).await
    {
        return Ok(resp);
    }

    match storage.delete_announcement(announcement_id).await {
        Ok(true) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success_empty("Announcement deleted successfully"))),
        Ok(false) => Ok(announcement_not_found()),
        Err(e) => Ok(lms_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Announcement deletion failed",
        )),
    }
}

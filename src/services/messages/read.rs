use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{MessageService, message_not_found};
use crate::models::messages::responses::UnreadCountResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, lms_error_response};

pub async fn unread_count(
    service: &MessageService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    match storage.count_unread_messages(user.id).await {
        Ok(count) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UnreadCountResponse {
                unread_count: count as i64,
            },
            "Unread count retrieved successfully",
        ))),
        Err(e) => Ok(lms_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Failed to count unread messages",
        )),
    }
}

pub async fn mark_read(
    service: &MessageService,
    request: &HttpRequest,
    message_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    // 只有收件人可以标记已读，其他情况一律视为不存在
    match storage.mark_message_read(message_id, user.id).await {
        Ok(true) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Message marked as read")))
        }
        Ok(false) => Ok(message_not_found()),
        Err(e) => Ok(lms_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Failed to mark message as read",
        )),
    }
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::MessageService;
use crate::models::messages::requests::MessageListParams;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, lms_error_response};

pub async fn list_inbox(
    service: &MessageService,
    request: &HttpRequest,
    query: MessageListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    match storage
        .list_inbox_with_pagination(user.id, query.pagination, query.unread_only)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Inbox retrieved successfully",
        ))),
        Err(e) => Ok(lms_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Failed to retrieve inbox",
        )),
    }
}

pub async fn list_sent(
    service: &MessageService,
    request: &HttpRequest,
    query: MessageListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    match storage
        .list_sent_with_pagination(user.id, query.pagination)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Sent messages retrieved successfully",
        ))),
        Err(e) => Ok(lms_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Failed to retrieve sent messages",
        )),
    }
}

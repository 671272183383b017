use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{MessageService, message_not_found};
use crate::models::messages::requests::SendMessageRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, lms_error_response};

/// 消息正文最大字符数
pub const MESSAGE_CONTENT_MAX_CHARS: usize = 5000;

pub(crate) fn validate_message(message: &SendMessageRequest, sender_id: i64) -> Result<(), &'static str> {
    if message.receiver_id == sender_id {
        return Err("Cannot send a message to yourself");
    }
    let length = message.content.trim().chars().count();
    if length == 0 {
        return Err("Content must not be empty");
    }
    if length > MESSAGE_CONTENT_MAX_CHARS {
        return Err("Content must be at most 5000 characters");
    }
    Ok(())
}

pub async fn send_message(
    service: &MessageService,
    request: &HttpRequest,
    message: SendMessageRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    if let Err(msg) = validate_message(&message, user.id) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    match storage.get_user_by_id(message.receiver_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                "Receiver not found",
            )));
        }
        Err(e) => {
            return Ok(lms_error_response(
                &e,
                ErrorCode::InternalServerError,
                "Failed to fetch receiver",
            ));
        }
    }

    match storage.send_message(user.id, message).await {
        Ok(message) => {
            info!("Message {} sent by user {}", message.id, user.id);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(message, "Message sent successfully")))
        }
        Err(e) => Ok(lms_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Failed to send message",
        )),
    }
}

pub async fn delete_message(
    service: &MessageService,
    request: &HttpRequest,
    message_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    match storage.get_message(message_id).await {
        Ok(Some(message)) if message.sender_id == user.id || message.receiver_id == user.id => {}
        Ok(_) => return Ok(message_not_found()),
        Err(e) => {
            return Ok(lms_error_response(
                &e,
                ErrorCode::InternalServerError,
                "Failed to get message",
            ));
        }
    }

    match storage.delete_message(message_id).await {
        Ok(true) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Message deleted successfully")))
        }
        Ok(false) => Ok(message_not_found()),
        Err(e) => Ok(lms_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Failed to delete message",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(receiver_id: i64, content: &str) -> SendMessageRequest {
        SendMessageRequest {
            receiver_id,
            subject: None,
            content: content.to_string(),
        }
    }

    #[test]
    fn test_validate_message() {
        assert!(validate_message(&message(2, "hello"), 1).is_ok());
        assert!(validate_message(&message(1, "hello"), 1).is_err());
        assert!(validate_message(&message(2, "  "), 1).is_err());
        assert!(validate_message(&message(2, &"x".repeat(5001)), 1).is_err());
    }
}

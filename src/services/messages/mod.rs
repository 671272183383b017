pub mod list;
pub mod read;
pub mod send;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::messages::requests::{MessageListParams, SendMessageRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub struct MessageService {
    storage: Option<Arc<dyn Storage>>,
}

impl MessageService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from(request),
        }
    }

    pub async fn send_message(
        &self,
        request: &HttpRequest,
        message: SendMessageRequest,
    ) -> ActixResult<HttpResponse> {
        send::send_message(self, request, message).await
    }

    // 收件箱
    pub async fn list_inbox(
        &self,
        request: &HttpRequest,
        query: MessageListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_inbox(self, request, query).await
    }

    // 已发送
    pub async fn list_sent(
        &self,
        request: &HttpRequest,
        query: MessageListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_sent(self, request, query).await
    }

    pub async fn unread_count(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        read::unread_count(self, request).await
    }

    pub async fn mark_read(
        &self,
        request: &HttpRequest,
        message_id: i64,
    ) -> ActixResult<HttpResponse> {
        read::mark_read(self, request, message_id).await
    }

    // 发件人或收件人可以删除
    pub async fn delete_message(
        &self,
        request: &HttpRequest,
        message_id: i64,
    ) -> ActixResult<HttpResponse> {
        send::delete_message(self, request, message_id).await
    }
}

pub(crate) fn message_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::MessageNotFound,
        "Message not found",
    ))
}

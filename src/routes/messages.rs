use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::messages::requests::{MessageListParams, SendMessageRequest};
use crate::services::MessageService;
use crate::utils::SafeMessageIdI64;

// 懒加载的全局 MessageService 实例
static MESSAGE_SERVICE: Lazy<MessageService> = Lazy::new(MessageService::new_lazy);

pub async fn send_message(
    req: HttpRequest,
    message: web::Json<SendMessageRequest>,
) -> ActixResult<HttpResponse> {
    MESSAGE_SERVICE
        .send_message(&req, message.into_inner())
        .await
}

pub async fn list_inbox(
    req: HttpRequest,
    query: web::Query<MessageListParams>,
) -> ActixResult<HttpResponse> {
    MESSAGE_SERVICE.list_inbox(&req, query.into_inner()).await
}

pub async fn list_sent(
    req: HttpRequest,
    query: web::Query<MessageListParams>,
) -> ActixResult<HttpResponse> {
    MESSAGE_SERVICE.list_sent(&req, query.into_inner()).await
}

pub async fn unread_count(req: HttpRequest) -> ActixResult<HttpResponse> {
    MESSAGE_SERVICE.unread_count(&req).await
}

pub async fn mark_read(req: HttpRequest, message_id: SafeMessageIdI64) -> ActixResult<HttpResponse> {
    MESSAGE_SERVICE.mark_read(&req, message_id.0).await
}

pub async fn delete_message(
    req: HttpRequest,
    message_id: SafeMessageIdI64,
) -> ActixResult<HttpResponse> {
    MESSAGE_SERVICE.delete_message(&req, message_id.0).await
}

// 配置路由
pub fn configure_message_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/messages")
            .wrap(middlewares::RequireJWT)
            .route(
                "",
                web::post()
                    .to(send_message)
                    .wrap(middlewares::RateLimit::messages()),
            )
            .route("/inbox", web::get().to(list_inbox))
            .route("/sent", web::get().to(list_sent))
            .route("/unread-count", web::get().to(unread_count))
            .route("/{message_id}/read", web::put().to(mark_read))
            .route("/{message_id}", web::delete().to(delete_message)),
    );
}

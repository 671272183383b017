use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

// 发送消息请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "message.ts")]
pub struct SendMessageRequest {
    pub receiver_id: i64,
    pub subject: Option<String>,
    pub content: String,
}

// 消息列表查询参数
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "message.ts")]
pub struct MessageListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default)]
    pub unread_only: bool,
}

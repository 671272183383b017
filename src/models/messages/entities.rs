use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 站内消息
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "message.ts")]
pub struct Message {
    pub id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub subject: Option<String>,
    pub content: String,
    pub is_read: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

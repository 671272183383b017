use serde::Serialize;
use ts_rs::TS;

/// 健康检查响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "system.ts")]
pub struct HealthResponse {
    pub status: String,
    pub database: bool,
    pub version: String,
    pub environment: String,
    /// 启动至今的秒数
    pub uptime_secs: i64,
}

use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "announcement.ts")]
pub struct CreateAnnouncementRequest {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "announcement.ts")]
pub struct UpdateAnnouncementRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

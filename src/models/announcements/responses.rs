use super::entities::Announcement;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "announcement.ts")]
pub struct AnnouncementListResponse {
    pub items: Vec<Announcement>,
}

pub mod list;
pub mod manage;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::announcements::requests::{
    CreateAnnouncementRequest, UpdateAnnouncementRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub struct AnnouncementService {
    storage: Option<Arc<dyn Storage>>,
}

impl AnnouncementService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from(request),
        }
    }

    // 课程公告，新的在前
    pub async fn list_announcements(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_announcements(self, request).await
    }

    pub async fn create_announcement(
        &self,
        request: &HttpRequest,
        announcement: CreateAnnouncementRequest,
    ) -> ActixResult<HttpResponse> {
        manage::create_announcement(self, request, announcement).await
    }

    pub async fn update_announcement(
        &self,
        request: &HttpRequest,
        announcement_id: i64,
        update_data: UpdateAnnouncementRequest,
    ) -> ActixResult<HttpResponse> {
        manage::update_announcement(self, request, announcement_id, update_data).await
    }

    pub async fn delete_announcement(
        &self,
        request: &HttpRequest,
        announcement_id: i64,
    ) -> ActixResult<HttpResponse> {
        manage::delete_announcement(self, request, announcement_id).await
    }
}

pub(crate) fn announcement_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::AnnouncementNotFound,
        "Announcement not found",
    ))
}

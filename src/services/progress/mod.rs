pub mod get;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::storage::Storage;

pub struct ProgressService {
    storage: Option<Arc<dyn Storage>>,
}

impl ProgressService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from(request),
        }
    }

    // 课程内所有学生的进度
    pub async fn list_course_progress(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::list_course_progress(self, request).await
    }

    // 当前学生在课程中的进度
    pub async fn get_my_progress(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_my_progress(self, request).await
    }
}

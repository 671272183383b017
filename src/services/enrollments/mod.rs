pub mod enroll;
pub mod list;
pub mod progress;
pub mod unenroll;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::enrollments::requests::{
    EnrollRequest, EnrollmentListParams, UpdateProgressRequest,
};
use crate::storage::Storage;

pub struct EnrollmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl EnrollmentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from(request),
        }
    }

    // 选课：学生为自己选课，授课教师或管理员为指定学生选课
    pub async fn enroll(
        &self,
        request: &HttpRequest,
        course_id: i64,
        enroll_data: EnrollRequest,
    ) -> ActixResult<HttpResponse> {
        enroll::enroll(self, request, course_id, enroll_data).await
    }

    // 课程选课名单
    pub async fn list_enrollments(
        &self,
        request: &HttpRequest,
        query: EnrollmentListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_enrollments(self, request, query).await
    }

    // 退课
    pub async fn unenroll(&self, request: &HttpRequest, user_id: i64) -> ActixResult<HttpResponse> {
        unenroll::unenroll(self, request, user_id).await
    }

    // 手动设置进度
    pub async fn update_progress(
        &self,
        request: &HttpRequest,
        user_id: i64,
        progress_data: UpdateProgressRequest,
    ) -> ActixResult<HttpResponse> {
        progress::update_progress(self, request, user_id, progress_data).await
    }
}

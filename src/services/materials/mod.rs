pub mod list;
pub mod manage;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::materials::requests::{CreateMaterialRequest, UpdateMaterialRequest};
use crate::storage::Storage;

pub struct MaterialService {
    storage: Option<Arc<dyn Storage>>,
}

impl MaterialService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from(request),
        }
    }

    // 课程资料列表，按 position 排序
    pub async fn list_materials(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_materials(self, request).await
    }

    pub async fn get_material(
        &self,
        request: &HttpRequest,
        material_id: i64,
    ) -> ActixResult<HttpResponse> {
        list::get_material(self, request, material_id).await
    }

    pub async fn create_material(
        &self,
        request: &HttpRequest,
        material_data: CreateMaterialRequest,
    ) -> ActixResult<HttpResponse> {
        manage::create_material(self, request, material_data).await
    }

    pub async fn update_material(
        &self,
        request: &HttpRequest,
        material_id: i64,
        update_data: UpdateMaterialRequest,
    ) -> ActixResult<HttpResponse> {
        manage::update_material(self, request, material_id, update_data).await
    }

    pub async fn delete_material(
        &self,
        request: &HttpRequest,
        material_id: i64,
    ) -> ActixResult<HttpResponse> {
        manage::delete_material(self, request, material_id).await
    }
}

pub(crate) fn material_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(crate::models::ApiResponse::error_empty(
        crate::models::ErrorCode::MaterialNotFound,
        "Material not found",
    ))
}

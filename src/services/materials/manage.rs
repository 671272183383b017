use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::{MaterialService, material_not_found};
use crate::errors::LmsError;
use crate::models::materials::requests::{CreateMaterialRequest, UpdateMaterialRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_membership, lms_error_response};
use crate::storage::Storage;
use crate::utils::validate::validate_title;

const MATERIAL_TITLE_MAX_CHARS: usize = 200;

fn material_error(e: &LmsError, context: &str) -> HttpResponse {
    match e {
        LmsError::Validation(msg) => HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::MaterialInvalid,
            msg.as_str(),
        )),
        _ => lms_error_response(e, ErrorCode::InternalServerError, context),
    }
}

/// 资料存在且属于该课程
async fn material_in_course(
    storage: &Arc<dyn Storage>,
    material_id: i64,
    course_id: i64,
) -> Result<(), HttpResponse> {
    match storage.get_material(material_id).await {
        Ok(Some(material)) if material.course_id == course_id => Ok(()),
        Ok(_) => Err(material_not_found()),
        Err(e) => Err(lms_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Failed to get material",
        )),
    }
}

pub async fn create_material(
    service: &MaterialService,
    request: &HttpRequest,
    mut material_data: CreateMaterialRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let membership = match current_membership(request) {
        Ok(membership) => membership,
        Err(response) => return Ok(response),
    };

    if let Err(msg) = validate_title(&material_data.title, MATERIAL_TITLE_MAX_CHARS) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::MaterialInvalid, msg)));
    }
    material_data.title = material_data.title.trim().to_string();

    match storage
        .create_material(membership.course.id, material_data)
        .await
    {
        Ok(material) => Ok(HttpResponse::Created()
            .json(ApiResponse::success(material, "Material created successfully"))),
        Err(e) => Ok(material_error(&e, "Material creation failed")),
    }
}

pub async fn update_material(
    service: &MaterialService,
    request: &HttpRequest,
    material_id: i64,
    mut update_data: UpdateMaterialRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let membership = match current_membership(request) {
        Ok(membership) => membership,
        Err(response) => return Ok(response),
    };

    if let Err(resp) = material_in_course(&storage, material_id, membership.course.id).await {
        return Ok(resp);
    }

    if let Some(title) = update_data.title.take() {
        if let Err(msg) = validate_title(&title, MATERIAL_TITLE_MAX_CHARS) {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::MaterialInvalid, msg)));
        }
        update_data.title = Some(title.trim().to_string());
    }

    match storage.update_material(material_id, update_data).await {
        Ok(Some(material)) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(material, "Material updated successfully"))),
        Ok(None) => Ok(material_not_found()),
        Err(e) => Ok(material_error(&e, "Material update failed")),
    }
}

pub async fn delete_material(
    service: &MaterialService,
    request: &HttpRequest,
    material_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let membership = match current_membership(request) {
        Ok(membership) => membership,
        Err(response) => return Ok(response),
    };

    if let Err(resp) = material_in_course(&storage, material_id, membership.course.id).await {
        return Ok(resp);
    }

    match storage.delete_material(material_id).await {
        Ok(true) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Material deleted successfully")))
        }
        Ok(false) => Ok(material_not_found()),
        Err(e) => Ok(lms_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Material deletion failed",
        )),
    }
}

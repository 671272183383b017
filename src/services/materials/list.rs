use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{MaterialService, material_not_found};
use crate::models::materials::responses::MaterialListResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_membership, lms_error_response};

pub async fn list_materials(
    service: &MaterialService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let membership = match current_membership(request) {
        Ok(membership) => membership,
        Err(response) => return Ok(response),
    };

    match storage.list_course_materials(membership.course.id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            MaterialListResponse { items },
            "Material list retrieved successfully",
        ))),
        Err(e) => Ok(lms_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Failed to retrieve material list",
        )),
    }
}

pub async fn get_material(
    service: &MaterialService,
    request: &HttpRequest,
    material_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let membership = match current_membership(request) {
        Ok(membership) => membership,
        Err(response) => return Ok(response),
    };

    match storage.get_material(material_id).await {
        Ok(Some(material)) if material.course_id == membership.course.id => Ok(
            HttpResponse::Ok().json(ApiResponse::success(material, "Material retrieved successfully")),
        ),
        Ok(_) => Ok(material_not_found()),
        Err(e) => Ok(lms_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Failed to get material",
        )),
    }
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::courses::entities::CourseRole;
use crate::models::materials::requests::{CreateMaterialRequest, UpdateMaterialRequest};
use crate::services::MaterialService;
use crate::utils::SafeMaterialIdI64;

// 懒加载的全局 MaterialService 实例
static MATERIAL_SERVICE: Lazy<MaterialService> = Lazy::new(MaterialService::new_lazy);

pub async fn list_materials(req: HttpRequest) -> ActixResult<HttpResponse> {
    MATERIAL_SERVICE.list_materials(&req).await
}

pub async fn create_material(
    req: HttpRequest,
    material_data: web::Json<CreateMaterialRequest>,
) -> ActixResult<HttpResponse> {
    MATERIAL_SERVICE
        .create_material(&req, material_data.into_inner())
        .await
}

pub async fn get_material(
    req: HttpRequest,
    material_id: SafeMaterialIdI64,
) -> ActixResult<HttpResponse> {
    MATERIAL_SERVICE.get_material(&req, material_id.0).await
}

pub async fn update_material(
    req: HttpRequest,
    material_id: SafeMaterialIdI64,
    update_data: web::Json<UpdateMaterialRequest>,
) -> ActixResult<HttpResponse> {
    MATERIAL_SERVICE
        .update_material(&req, material_id.0, update_data.into_inner())
        .await
}

pub async fn delete_material(
    req: HttpRequest,
    material_id: SafeMaterialIdI64,
) -> ActixResult<HttpResponse> {
    MATERIAL_SERVICE.delete_material(&req, material_id.0).await
}

// 配置路由
pub fn configure_material_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/courses/{course_id}/materials")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(
                        web::get()
                            .to(list_materials)
                            .wrap(middlewares::RequireCourseRole::new_any(
                                CourseRole::members(),
                            )),
                    )
                    .route(
                        web::post()
                            .to(create_material)
                            .wrap(middlewares::RequireCourseRole::new_any(
                                CourseRole::managers(),
                            )),
                    ),
            )
            .service(
                web::resource("/{material_id}")
                    .route(
                        web::get()
                            .to(get_material)
                            .wrap(middlewares::RequireCourseRole::new_any(
                                CourseRole::members(),
                            )),
                    )
                    .route(
                        web::put()
                            .to(update_material)
                            .wrap(middlewares::RequireCourseRole::new_any(
                                CourseRole::managers(),
                            )),
                    )
                    .route(
                        web::delete()
                            .to(delete_material)
                            .wrap(middlewares::RequireCourseRole::new_any(
                                CourseRole::managers(),
                            )),
                    ),
            ),
    );
}

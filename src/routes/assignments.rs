use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::assignments::requests::{CreateAssignmentRequest, UpdateAssignmentRequest};
use crate::models::courses::entities::CourseRole;
use crate::services::AssignmentService;
use crate::utils::SafeAssignmentIdI64;

// 懒加载的全局 AssignmentService 实例
static ASSIGNMENT_SERVICE: Lazy<AssignmentService> = Lazy::new(AssignmentService::new_lazy);

pub async fn list_assignments(req: HttpRequest) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.list_assignments(&req).await
}

pub async fn create_assignment(
    req: HttpRequest,
    assignment_data: web::Json<CreateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .create_assignment(&req, assignment_data.into_inner())
        .await
}

pub async fn get_assignment(
    req: HttpRequest,
    assignment_id: SafeAssignmentIdI64,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.get_assignment(&req, assignment_id.0).await
}

pub async fn update_assignment(
    req: HttpRequest,
    assignment_id: SafeAssignmentIdI64,
    update_data: web::Json<UpdateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .update_assignment(&req, assignment_id.0, update_data.into_inner())
        .await
}

pub async fn delete_assignment(
    req: HttpRequest,
    assignment_id: SafeAssignmentIdI64,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .delete_assignment(&req, assignment_id.0)
        .await
}

pub async fn get_assignment_stats(
    req: HttpRequest,
    assignment_id: SafeAssignmentIdI64,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .get_assignment_stats(&req, assignment_id.0)
        .await
}

// 配置路由
pub fn configure_assignment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/courses/{course_id}/assignments")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(
                        web::get()
                            .to(list_assignments)
                            .wrap(middlewares::RequireCourseRole::new_any(
                                CourseRole::members(),
                            )),
                    )
                    .route(
                        web::post()
                            .to(create_assignment)
                            .wrap(middlewares::RequireCourseRole::new_any(
                                CourseRole::managers(),
                            )),
                    ),
            )
            .service(
                web::resource("/{assignment_id}")
                    .route(
                        web::get()
                            .to(get_assignment)
                            .wrap(middlewares::RequireCourseRole::new_any(
                                CourseRole::members(),
                            )),
                    )
                    .route(
                        web::put()
                            .to(update_assignment)
                            .wrap(middlewares::RequireCourseRole::new_any(
                                CourseRole::managers(),
                            )),
                    )
                    .route(
                        web::delete()
                            .to(delete_assignment)
                            .wrap(middlewares::RequireCourseRole::new_any(
                                CourseRole::managers(),
                            )),
                    ),
            )
            .service(
                web::resource("/{assignment_id}/stats").route(
                    web::get()
                        .to(get_assignment_stats)
                        .wrap(middlewares::RequireCourseRole::new_any(
                            CourseRole::managers(),
                        )),
                ),
            ),
    );
}

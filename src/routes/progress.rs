use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::courses::entities::CourseRole;
use crate::services::ProgressService;

// 懒加载的全局 ProgressService 实例
static PROGRESS_SERVICE: Lazy<ProgressService> = Lazy::new(ProgressService::new_lazy);

pub async fn list_course_progress(req: HttpRequest) -> ActixResult<HttpResponse> {
    PROGRESS_SERVICE.list_course_progress(&req).await
}

pub async fn get_my_progress(req: HttpRequest) -> ActixResult<HttpResponse> {
    PROGRESS_SERVICE.get_my_progress(&req).await
}

// 配置路由
pub fn configure_progress_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/courses/{course_id}/progress")
            .wrap(middlewares::RequireJWT)
            .route(
                "",
                web::get()
                    .to(list_course_progress)
                    .wrap(middlewares::RequireCourseRole::new_any(
                        CourseRole::managers(),
                    )),
            )
            .route(
                "/me",
                web::get()
                    .to(get_my_progress)
                    .wrap(middlewares::RequireCourseRole::new(CourseRole::Student)),
            ),
    );
}

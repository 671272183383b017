use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::announcements::requests::{
    CreateAnnouncementRequest, UpdateAnnouncementRequest,
};
use crate::models::courses::entities::CourseRole;
use crate::services::AnnouncementService;
use crate::utils::SafeAnnouncementIdI64;

// 懒加载的全局 AnnouncementService 实例
static ANNOUNCEMENT_SERVICE: Lazy<AnnouncementService> =
    Lazy::new(AnnouncementService::new_lazy);

pub async fn list_announcements(req: HttpRequest) -> ActixResult<HttpResponse> {
    ANNOUNCEMENT_SERVICE.list_announcements(&req).await
}

pub async fn create_announcement(
    req: HttpRequest,
    announcement: web::Json<CreateAnnouncementRequest>,
) -> ActixResult<HttpResponse> {
    ANNOUNCEMENT_SERVICE
        .create_announcement(&req, announcement.into_inner())
        .await
}

pub async fn update_announcement(
    req: HttpRequest,
    announcement_id: SafeAnnouncementIdI64,
    update_data: web::Json<UpdateAnnouncementRequest>,
) -> ActixResult<HttpResponse> {
    ANNOUNCEMENT_SERVICE
        .update_announcement(&req, announcement_id.0, update_data.into_inner())
        .await
}

pub async fn delete_announcement(
    req: HttpRequest,
    announcement_id: SafeAnnouncementIdI64,
) -> ActixResult<HttpResponse> {
    ANNOUNCEMENT_SERVICE
        .delete_announcement(&req, announcement_id.0)
        .await
}

// 配置路由
pub fn configure_announcement_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/courses/{course_id}/announcements")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(
                        web::get()
                            .to(list_announcements)
                            .wrap(middlewares::RequireCourseRole::new_any(
                                CourseRole::members(),
                            )),
                    )
                    .route(
                        web::post()
                            .to(create_announcement)
                            .wrap(middlewares::RequireCourseRole::new_any(
                                CourseRole::managers(),
                            )),
                    ),
            )
            .service(
                web::resource("/{announcement_id}")
                    .route(
                        web::put()
                            .to(update_announcement)
                            .wrap(middlewares::RequireCourseRole::new_any(
                                CourseRole::managers(),
                            )),
                    )
                    .route(
                        web::delete()
                            .to(delete_announcement)
                            .wrap(middlewares::RequireCourseRole::new_any(
                                CourseRole::managers(),
                            )),
                    ),
            ),
    );
}

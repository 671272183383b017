use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::courses::entities::CourseRole;
use crate::models::enrollments::requests::{
    EnrollRequest, EnrollmentListParams, UpdateProgressRequest,
};
use crate::services::EnrollmentService;
use crate::utils::{SafeCourseIdI64, SafeUserIdI64};

// 懒加载的全局 EnrollmentService 实例
static ENROLLMENT_SERVICE: Lazy<EnrollmentService> = Lazy::new(EnrollmentService::new_lazy);

pub async fn enroll(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
    enroll_data: Option<web::Json<EnrollRequest>>,
) -> ActixResult<HttpResponse> {
    // 学生自助选课时可以不带请求体
    let enroll_data = enroll_data.map(|d| d.into_inner()).unwrap_or_default();
    ENROLLMENT_SERVICE
        .enroll(&req, course_id.0, enroll_data)
        .await
}

pub async fn list_enrollments(
    req: HttpRequest,
    query: web::Query<EnrollmentListParams>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .list_enrollments(&req, query.into_inner())
        .await
}

pub async fn unenroll(req: HttpRequest, user_id: SafeUserIdI64) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE.unenroll(&req, user_id.0).await
}

pub async fn update_progress(
    req: HttpRequest,
    user_id: SafeUserIdI64,
    progress_data: web::Json<UpdateProgressRequest>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .update_progress(&req, user_id.0, progress_data.into_inner())
        .await
}

// 配置路由
pub fn configure_enrollment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/courses/{course_id}/enrollments")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    // 选课者此时还不是课程成员，权限在服务层判断
                    .route(web::post().to(enroll))
                    .route(
                        web::get()
                            .to(list_enrollments)
                            .wrap(middlewares::RequireCourseRole::new_any(
                                CourseRole::managers(),
                            )),
                    ),
            )
            .service(
                web::resource("/{user_id}").route(
                    web::delete()
                        .to(unenroll)
                        // 学生本人或课程管理者
                        .wrap(middlewares::RequireCourseRole::new_any(
                            CourseRole::members(),
                        )),
                ),
            )
            .service(
                web::resource("/{user_id}/progress").route(
                    web::put()
                        .to(update_progress)
                        .wrap(middlewares::RequireCourseRole::new_any(
                            CourseRole::managers(),
                        )),
                ),
            ),
    );
}

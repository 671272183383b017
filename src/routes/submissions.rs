use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::courses::entities::CourseRole;
use crate::models::submissions::requests::{
    GradeSubmissionRequest, SubmissionListParams, SubmitAssignmentRequest,
};
use crate::services::SubmissionService;
use crate::utils::{SafeAssignmentIdI64, SafeSubmissionIdI64};

// 懒加载的全局 SubmissionService 实例
static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);

pub async fn submit(
    req: HttpRequest,
    assignment_id: SafeAssignmentIdI64,
    submission: web::Json<SubmitAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .submit(&req, assignment_id.0, submission.into_inner())
        .await
}

pub async fn list_submissions(
    req: HttpRequest,
    assignment_id: SafeAssignmentIdI64,
    query: web::Query<SubmissionListParams>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .list_submissions(&req, assignment_id.0, query.into_inner())
        .await
}

pub async fn get_my_submission(
    req: HttpRequest,
    assignment_id: SafeAssignmentIdI64,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .get_my_submission(&req, assignment_id.0)
        .await
}

pub async fn get_submission(
    req: HttpRequest,
    assignment_id: SafeAssignmentIdI64,
    submission_id: SafeSubmissionIdI64,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .get_submission(&req, assignment_id.0, submission_id.0)
        .await
}

pub async fn grade_submission(
    req: HttpRequest,
    assignment_id: SafeAssignmentIdI64,
    submission_id: SafeSubmissionIdI64,
    grade: web::Json<GradeSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .grade_submission(&req, assignment_id.0, submission_id.0, grade.into_inner())
        .await
}

// 配置路由
pub fn configure_submission_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/courses/{course_id}/assignments/{assignment_id}/submissions")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(
                        web::post()
                            .to(submit)
                            // 只有已选课的学生可以提交
                            .wrap(middlewares::RequireCourseRole::new(CourseRole::Student)),
                    )
                    .route(
                        web::get()
                            .to(list_submissions)
                            .wrap(middlewares::RequireCourseRole::new_any(
                                CourseRole::managers(),
                            )),
                    ),
            )
            .service(
                web::resource("/mine").route(
                    web::get()
                        .to(get_my_submission)
                        .wrap(middlewares::RequireCourseRole::new(CourseRole::Student)),
                ),
            )
            .service(
                web::resource("/{submission_id}").route(
                    web::get()
                        .to(get_submission)
                        .wrap(middlewares::RequireCourseRole::new_any(
                            CourseRole::members(),
                        )),
                ),
            )
            .service(
                web::resource("/{submission_id}/grade").route(
                    web::put()
                        .to(grade_submission)
                        .wrap(middlewares::RequireCourseRole::new_any(
                            CourseRole::managers(),
                        )),
                ),
            ),
    );
}

/*!
 * 基于课程身份的访问控制中间件
 *
 * 必须在 RequireJWT 之后使用，作用于带 `{course_id}` 路径参数的路由。
 * 管理员、授课教师与已选课学生分别对应 [`CourseRole`] 的三种身份。
 *
 * ```rust,ignore
 * web::resource("/{course_id}/materials")
 *     .route(web::get().to(list_materials).wrap(RequireCourseRole::new_any(CourseRole::members())))
 *     .route(web::post().to(create_material).wrap(RequireCourseRole::new_any(CourseRole::managers())))
 * ```
 *
 * 通过后把 [`CourseMembership`] 写入请求扩展，处理函数可直接取用课程信息。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, error};

use crate::{
    models::{
        ErrorCode,
        courses::entities::{CourseMembership, CourseRole},
        users::entities::User,
    },
    storage::Storage,
    utils::extractor::parse_positive_id,
};

use super::create_error_response;

#[derive(Clone)]
pub struct RequireCourseRole {
    required_roles: Vec<CourseRole>,
}

impl RequireCourseRole {
    pub fn new(role: CourseRole) -> Self {
        Self {
            required_roles: vec![role],
        }
    }

    pub fn new_any(roles: &[CourseRole]) -> Self {
        Self {
            required_roles: roles.to_vec(),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireCourseRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireCourseRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireCourseRoleMiddleware {
            service: Rc::new(service),
            required_roles: self.required_roles.clone(),
        }))
    }
}

pub struct RequireCourseRoleMiddleware<S> {
    service: Rc<S>,
    required_roles: Vec<CourseRole>,
}

/// 拒绝原因
enum Rejection {
    Unauthorized,
    BadCourseId,
    CourseNotFound,
    NotMember,
    RoleMismatch,
    Internal,
}

impl Rejection {
    fn response(&self) -> actix_web::HttpResponse {
        match self {
            Rejection::Unauthorized => create_error_response(
                StatusCode::UNAUTHORIZED,
                ErrorCode::Unauthorized,
                "Unauthorized: missing user",
            ),
            Rejection::BadCourseId => create_error_response(
                StatusCode::BAD_REQUEST,
                ErrorCode::BadRequest,
                "Missing or invalid course_id",
            ),
            Rejection::CourseNotFound => create_error_response(
                StatusCode::NOT_FOUND,
                ErrorCode::CourseNotFound,
                "Course not found",
            ),
            Rejection::NotMember => create_error_response(
                StatusCode::FORBIDDEN,
                ErrorCode::CourseNotEnrolled,
                "Not a member of this course",
            ),
            Rejection::RoleMismatch => create_error_response(
                StatusCode::FORBIDDEN,
                ErrorCode::CoursePermissionDenied,
                "No permission for this course",
            ),
            Rejection::Internal => create_error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
                "Failed to check course permission",
            ),
        }
    }
}

async fn resolve_membership(req: &ServiceRequest) -> Result<CourseMembership, Rejection> {
    let user = req
        .extensions()
        .get::<User>()
        .cloned()
        .ok_or(Rejection::Unauthorized)?;

    let course_id = req
        .match_info()
        .get("course_id")
        .and_then(|raw| parse_positive_id(raw).ok())
        .ok_or(Rejection::BadCourseId)?;

    let storage = req
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or(Rejection::Internal)?;

    let course = storage
        .get_course_by_id(course_id)
        .await
        .map_err(|e| {
            error!("查询课程失败: {}", e);
            Rejection::Internal
        })?
        .ok_or(Rejection::CourseNotFound)?;

    // 管理员与授课教师无需查询选课记录
    let enrolled = if user.is_admin() || course.teacher_id == user.id {
        false
    } else {
        storage
            .get_enrollment(user.id, course_id)
            .await
            .map_err(|e| {
                error!("查询选课记录失败: {}", e);
                Rejection::Internal
            })?
            .is_some()
    };

    CourseMembership::resolve(&user, course, enrolled).ok_or(Rejection::NotMember)
}

impl<S, B> Service<ServiceRequest> for RequireCourseRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let required_roles = self.required_roles.clone();

        Box::pin(async move {
            let membership = match resolve_membership(&req).await {
                Ok(m) if required_roles.contains(&m.role) => m,
                Ok(_) => {
                    return Ok(req.into_response(
                        Rejection::RoleMismatch.response().map_into_right_body(),
                    ));
                }
                Err(rejection) => {
                    return Ok(req.into_response(rejection.response().map_into_right_body()));
                }
            };

            debug!(
                "Course {} access granted as {:?}",
                membership.course.id, membership.role
            );
            req.extensions_mut().insert(membership);
            Ok(srv.call(req).await?.map_into_left_body())
        })
    }
}

impl RequireCourseRole {
    /// 从请求扩展中提取课程身份
    /// 此函数应该在应用了RequireCourseRole中间件的路由处理程序中使用
    pub fn extract_membership(req: &actix_web::HttpRequest) -> Option<CourseMembership> {
        req.extensions().get::<CourseMembership>().cloned()
    }
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use crate::models::courses::requests::{CourseListQuery, CourseQueryParams};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, lms_error_response};

fn to_list_query(query: CourseQueryParams) -> CourseListQuery {
    CourseListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        teacher_id: query.teacher_id,
        search: query.search,
        is_published: query.is_published,
    }
}

/// 学生只能看到已发布的课程
pub(crate) fn scope_for_role(role: UserRole, mut query: CourseListQuery) -> CourseListQuery {
    if role == UserRole::Student {
        query.is_published = Some(true);
    }
    query
}

pub async fn list_courses(
    service: &CourseService,
    request: &HttpRequest,
    query: CourseQueryParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    let list_query = scope_for_role(user.role, to_list_query(query));

    match storage.list_courses_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Course list retrieved successfully",
        ))),
        Err(e) => Ok(lms_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Failed to retrieve course list",
        )),
    }
}

pub async fn list_my_courses(
    service: &CourseService,
    request: &HttpRequest,
    query: CourseQueryParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    let mut list_query = to_list_query(query);
    let result = match user.role {
        UserRole::Student => {
            storage
                .list_student_courses_with_pagination(user.id, list_query)
                .await
        }
        UserRole::Teacher | UserRole::Admin => {
            list_query.teacher_id = Some(user.id);
            storage.list_courses_with_pagination(list_query).await
        }
    };

    match result {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Course list retrieved successfully",
        ))),
        Err(e) => Ok(lms_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Failed to retrieve course list",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_students_only_see_published() {
        let query = CourseListQuery {
            is_published: Some(false),
            ..Default::default()
        };
        assert_eq!(
            scope_for_role(UserRole::Student, query.clone()).is_published,
            Some(true)
        );
        assert_eq!(
            scope_for_role(UserRole::Teacher, query).is_published,
            Some(false)
        );
    }
}

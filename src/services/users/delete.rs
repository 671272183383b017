use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::courses::requests::CourseListQuery;
use crate::models::users::entities::UserRole;
use crate::services::lms_error_response;
use crate::{
    middlewares::RequireJWT,
    models::{ApiResponse, ErrorCode},
};

pub async fn delete_user(
    service: &UserService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    // 禁止删除当前登录用户
    if RequireJWT::extract_user_id(request) == Some(user_id) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::CanNotDeleteCurrentUser,
            "Cannot delete current user",
        )));
    }

    let user = match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                "User not found",
            )));
        }
        Err(e) => {
            return Ok(lms_error_response(
                &e,
                ErrorCode::UserDeleteFailed,
                "User deletion failed",
            ));
        }
    };

    // 教师名下仍有课程时不能删除，需先删除或转移课程
    if user.role == UserRole::Teacher {
        let owned = storage
            .list_courses_with_pagination(CourseListQuery {
                teacher_id: Some(user.id),
                size: Some(1),
                ..Default::default()
            })
            .await;
        match owned {
            Ok(courses) if courses.pagination.total > 0 => {
                return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                    ErrorCode::UserDeleteFailed,
                    format!(
                        "Teacher still owns {} course(s)",
                        courses.pagination.total
                    ),
                )));
            }
            Ok(_) => {}
            Err(e) => {
                return Ok(lms_error_response(
                    &e,
                    ErrorCode::UserDeleteFailed,
                    "User deletion failed",
                ));
            }
        }
    }

    // 选课、提交与消息随用户级联删除
    match storage.delete_user(user_id).await {
        Ok(true) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("User deleted successfully")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(e) => Ok(lms_error_response(
            &e,
            ErrorCode::UserDeleteFailed,
            "User deletion failed",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;
    use actix_web::web;
    use std::sync::Arc;

    use crate::client::LmsClient;
    use crate::config::DatabaseConfig;
    use crate::models::courses::requests::CreateCourseRequest;
    use crate::models::users::requests::CreateUserRequest;
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::SeaOrmStorage;

    async fn storage() -> Arc<dyn Storage> {
        let client = LmsClient::connect(&DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            pool_size: 1,
            timeout: 5,
        })
        .await
        .unwrap();
        Arc::new(SeaOrmStorage::from_client(client))
    }

    async fn delete_status(storage: &Arc<dyn Storage>, user_id: i64) -> StatusCode {
        let req = TestRequest::default()
            .app_data(web::Data::new(storage.clone()))
            .to_http_request();
        delete_user(&UserService::new_lazy(), user_id, &req)
            .await
            .unwrap()
            .status()
    }

    #[actix_web::test]
    async fn test_teacher_with_courses_cannot_be_deleted() {
        let storage = storage().await;
        let teacher = storage
            .create_user(CreateUserRequest {
                email: "teacher@lms.test".to_string(),
                password: "hash".to_string(),
                name: "Teacher".to_string(),
                role: UserRole::Teacher,
                avatar_url: None,
                bio: None,
            })
            .await
            .unwrap();
        let course = storage
            .create_course(
                teacher.id,
                CreateCourseRequest {
                    teacher_id: None,
                    title: "Rust".to_string(),
                    description: None,
                    cover_image: None,
                    is_published: true,
                },
            )
            .await
            .unwrap();

        assert_eq!(delete_status(&storage, teacher.id).await, StatusCode::CONFLICT);
        assert!(storage.get_user_by_id(teacher.id).await.unwrap().is_some());

        assert!(storage.delete_course(course.id).await.unwrap());
        assert_eq!(delete_status(&storage, teacher.id).await, StatusCode::OK);
        assert_eq!(delete_status(&storage, teacher.id).await, StatusCode::NOT_FOUND);
    }
}

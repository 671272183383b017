use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::middlewares::require_jwt::user_cache_key;
use crate::models::auth::requests::UpdateProfileRequest;
use crate::models::users::requests::UpdateUserRequest;
use crate::models::users::responses::UserResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::validate::validate_name;

use super::AuthService;

pub async fn handle_update_profile(
    service: &AuthService,
    update_data: UpdateProfileRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let current_user = match super::super::current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    if let Some(name) = &update_data.name
        && let Err(msg) = validate_name(name)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserNameInvalid, msg)));
    }

    // 个人资料不包含邮箱、密码与角色
    let storage_update = UpdateUserRequest {
        name: update_data.name.map(|n| n.trim().to_string()),
        avatar_url: update_data.avatar_url,
        bio: update_data.bio,
        ..Default::default()
    };

    match storage.update_user(current_user.id, storage_update).await {
        Ok(Some(user)) => {
            // 缓存中的用户信息已过期
            if let Some(token) = request
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.strip_prefix("Bearer "))
                && let Some(cache) = request.app_data::<web::Data<Arc<dyn ObjectCache>>>()
            {
                cache.remove(&user_cache_key(token)).await;
            }

            Ok(HttpResponse::Ok().json(ApiResponse::success(
                UserResponse { user },
                "用户信息更新成功",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "用户不存在",
        ))),
        Err(e) => Ok(super::super::lms_error_response(
            &e,
            ErrorCode::UserUpdateFailed,
            "更新用户信息失败",
        )),
    }
}

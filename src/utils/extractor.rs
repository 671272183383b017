//! 路径参数提取
//!
//! 路径中的 ID 必须是正整数，解析失败时直接返回统一格式的 400 响应。

use actix_web::{HttpResponse, error::InternalError};

use crate::models::{ApiResponse, ErrorCode};

/// 解析为正整数 ID
pub fn parse_positive_id(raw: &str) -> Result<i64, String> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        Ok(id) => Err(format!("ID 必须为正整数: {id}")),
        Err(_) => Err(format!("无效的 ID: '{raw}'")),
    }
}

/// 路径参数错误响应
pub fn bad_path_param(param: &str, msg: impl Into<String>) -> actix_web::Error {
    let msg = format!("路径参数 {param} 错误: {}", msg.into());
    let response =
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, &msg));
    InternalError::from_response(msg, response).into()
}

/// 定义一个从路径参数安全提取 i64 ID 的类型
///
/// 生成的类型既可以单独作为 handler 参数（按参数名读取 match_info），
/// 也可以放在 `web::Path<(A, B)>` 元组中按位置反序列化。
#[macro_export]
macro_rules! define_safe_i64_extractor {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name(pub i64);

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                let raw = <String as ::serde::Deserialize>::deserialize(deserializer)?;
                $crate::utils::extractor::parse_positive_id(&raw)
                    .map($name)
                    .map_err(::serde::de::Error::custom)
            }
        }

        impl ::actix_web::FromRequest for $name {
            type Error = ::actix_web::Error;
            type Future = ::std::future::Ready<::std::result::Result<Self, Self::Error>>;

            fn from_request(
                req: &::actix_web::HttpRequest,
                _: &mut ::actix_web::dev::Payload,
            ) -> Self::Future {
                let result = match req.match_info().get($param) {
                    Some(raw) => $crate::utils::extractor::parse_positive_id(raw)
                        .map($name)
                        .map_err(|msg| $crate::utils::extractor::bad_path_param($param, msg)),
                    None => Err($crate::utils::extractor::bad_path_param(
                        $param,
                        "缺少路径参数",
                    )),
                };
                ::std::future::ready(result)
            }
        }
    };
}

define_safe_i64_extractor!(SafeUserIdI64, "user_id");
define_safe_i64_extractor!(SafeCourseIdI64, "course_id");
define_safe_i64_extractor!(SafeMaterialIdI64, "material_id");
define_safe_i64_extractor!(SafeAssignmentIdI64, "assignment_id");
define_safe_i64_extractor!(SafeSubmissionIdI64, "submission_id");
define_safe_i64_extractor!(SafeAnnouncementIdI64, "announcement_id");
define_safe_i64_extractor!(SafeMessageIdI64, "message_id");

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{FromRequest, test::TestRequest};

    #[test]
    fn test_parse_positive_id() {
        assert_eq!(parse_positive_id("42"), Ok(42));
        assert_eq!(parse_positive_id(" 7 "), Ok(7));
        assert!(parse_positive_id("0").is_err());
        assert!(parse_positive_id("-3").is_err());
        assert!(parse_positive_id("abc").is_err());
    }

    #[actix_web::test]
    async fn test_extract_from_match_info() {
        let req = TestRequest::default()
            .param("course_id", "12")
            .to_http_request();
        let id = SafeCourseIdI64::extract(&req).await.unwrap();
        assert_eq!(id, SafeCourseIdI64(12));

        let req = TestRequest::default()
            .param("course_id", "x")
            .to_http_request();
        assert!(SafeCourseIdI64::extract(&req).await.is_err());
    }

    #[test]
    fn test_deserialize_from_string() {
        let id: SafeAssignmentIdI64 = serde_json::from_str("\"5\"").unwrap();
        assert_eq!(id.0, 5);
        assert!(serde_json::from_str::<SafeAssignmentIdI64>("\"0\"").is_err());
    }
}

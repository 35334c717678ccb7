//! 路径参数安全提取器
//!
//! 路由里的数字 ID 统一经过这里解析，非法输入直接变成
//! 统一错误响应，处理函数拿到的一定是正整数。

use actix_web::HttpResponse;

use crate::models::{ApiResponse, ErrorCode};

/// 定义一个从路径提取正整数参数的提取器
#[macro_export]
macro_rules! define_safe_i64_extractor {
    ($name:ident, $param:literal) => {
        pub struct $name(pub i64);

        impl actix_web::FromRequest for $name {
            type Error = actix_web::Error;
            type Future = ::std::future::Ready<Result<Self, Self::Error>>;

            fn from_request(
                req: &actix_web::HttpRequest,
                _payload: &mut actix_web::dev::Payload,
            ) -> Self::Future {
                let parsed = req
                    .match_info()
                    .get($param)
                    .and_then(|raw| raw.parse::<i64>().ok())
                    .filter(|id| *id > 0);

                ::std::future::ready(match parsed {
                    Some(id) => Ok($name(id)),
                    None => Err($crate::utils::extractor::invalid_path_param($param)),
                })
            }
        }
    };
}

/// 非法路径参数的统一错误
pub fn invalid_path_param(param: &str) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(ApiResponse::<()>::error_empty(
        ErrorCode::BadRequest,
        format!("Missing or invalid path parameter: {param}"),
    ));
    actix_web::error::InternalError::from_response("invalid path parameter", response).into()
}

define_safe_i64_extractor!(SafeClassIdI64, "class_id");
define_safe_i64_extractor!(SafeAssignmentIdI64, "assignment_id");

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::FromRequest;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_valid_class_id_extracted() {
        let req = TestRequest::default()
            .param("class_id", "42")
            .to_http_request();
        let mut payload = actix_web::dev::Payload::None;
        let extracted = SafeClassIdI64::from_request(&req, &mut payload)
            .await
            .unwrap();
        assert_eq!(extracted.0, 42);
    }

    #[actix_web::test]
    async fn test_non_numeric_class_id_rejected() {
        let req = TestRequest::default()
            .param("class_id", "abc")
            .to_http_request();
        let mut payload = actix_web::dev::Payload::None;
        assert!(
            SafeClassIdI64::from_request(&req, &mut payload)
                .await
                .is_err()
        );
    }

    #[actix_web::test]
    async fn test_non_positive_class_id_rejected() {
        let req = TestRequest::default()
            .param("class_id", "0")
            .to_http_request();
        let mut payload = actix_web::dev::Payload::None;
        assert!(
            SafeClassIdI64::from_request(&req, &mut payload)
                .await
                .is_err()
        );
    }
}

//! HTTP 中间件
//!
//! 认证、班级角色校验与速率限制，按路由粒度组合使用。

pub mod rate_limit;
pub mod require_class_role;
pub mod require_jwt;

pub use rate_limit::RateLimit;
pub use require_class_role::RequireClassRole;
pub use require_jwt::RequireJWT;

use crate::models::{ApiResponse, ErrorCode};
use actix_web::{HttpResponse, http::StatusCode, http::header::CONTENT_TYPE};

// 中间件共享的 JSON 错误响应
pub(crate) fn create_error_response(
    status: StatusCode,
    code: ErrorCode,
    message: &str,
) -> HttpResponse {
    HttpResponse::build(status)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .json(ApiResponse::<()>::error_empty(code, message))
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::errors::ClassHubError;
use crate::models::{
    ApiResponse, ErrorCode, auth::RegisterRequest, users::requests::CreateUserRequest,
};
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_password_simple, validate_username};

use super::AuthService;

/// 注册新用户
///
/// 先做格式校验再查唯一性，并发场景由数据库唯一索引兜底。
pub async fn handle_register(
    service: &AuthService,
    register_request: RegisterRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Err(msg) = validate_username(&register_request.username) {
        return Ok(bad_request(ErrorCode::UserNameInvalid, msg));
    }
    if let Err(msg) = validate_email(&register_request.email) {
        return Ok(bad_request(ErrorCode::UserEmailInvalid, msg));
    }
    if let Err(msg) = validate_password_simple(&register_request.password) {
        return Ok(bad_request(ErrorCode::UserPasswordInvalid, msg));
    }

    match storage
        .get_user_by_username(&register_request.username)
        .await
    {
        Ok(Some(_)) => {
            return Ok(conflict(ErrorCode::UserNameAlreadyExists, "用户名已存在"));
        }
        Ok(None) => {}
        Err(e) => return Ok(register_failed(e)),
    }

    match storage.get_user_by_email(&register_request.email).await {
        Ok(Some(_)) => {
            return Ok(conflict(ErrorCode::UserEmailAlreadyExists, "邮箱已被注册"));
        }
        Ok(None) => {}
        Err(e) => return Ok(register_failed(e)),
    }

    // 存储层只接受哈希后的密码
    let password_hash = match hash_password(&register_request.password) {
        Ok(hash) => hash,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::RegisterFailed,
                    format!("密码哈希失败: {e}"),
                )),
            );
        }
    };

    let create_request = CreateUserRequest {
        username: register_request.username,
        email: register_request.email,
        password: password_hash,
        display_name: register_request.display_name,
    };

    match storage.create_user(create_request).await {
        Ok(user) => Ok(HttpResponse::Created().json(ApiResponse::success(user, "注册成功"))),
        Err(e) => Ok(register_failed(e)),
    }
}

fn bad_request(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
}

fn conflict(code: ErrorCode, message: &str) -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(code, message))
}

fn register_failed(e: ClassHubError) -> HttpResponse {
    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
        ErrorCode::RegisterFailed,
        format!("注册失败: {e}"),
    ))
}

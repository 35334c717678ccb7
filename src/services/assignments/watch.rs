use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use tracing::{error, info};

use super::AssignmentService;
use crate::models::assignments::requests::AssignmentWatchQuery;
use crate::models::users::entities::{User, UserStatus};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::watch::{AssignmentSnapshot, WatchService};
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;

pub async fn watch_assignments(
    service: &AssignmentService,
    request: &HttpRequest,
    class_id: i64,
    query: AssignmentWatchQuery,
    body: web::Payload,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // token 来自查询参数，校验流程与 RequireJWT 一致
    let user = match authenticate_watcher(&storage, &query.token).await {
        Ok(user) => user,
        Err(message) => {
            info!("Assignment watch rejected: {}", message);
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                format!("Unauthorized: {message}"),
            )));
        }
    };

    // 只有班级成员可以订阅
    match storage.get_class_member(class_id, user.id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::ClassPermissionDenied,
                "No permission for this class",
            )));
        }
        Err(e) => {
            error!("Failed to check class membership: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to check class membership",
                )),
            );
        }
    }

    // 升级前先取一次全量列表，连接建立后立即推送
    let initial = match storage.list_all_class_assignments(class_id).await {
        Ok(items) => AssignmentSnapshot::new(class_id, items),
        Err(e) => {
            error!(
                "Failed to load assignments for class {} watch: {}",
                class_id, e
            );
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to load assignments",
                )),
            );
        }
    };

    let (response, session, stream) = actix_ws::handle(request, body)?;

    actix_web::rt::spawn(WatchService::handle_connection(
        class_id, user.id, session, stream, initial,
    ));

    Ok(response)
}

// 校验 access token 并加载对应的活跃用户
async fn authenticate_watcher(
    storage: &Arc<dyn Storage>,
    token: &str,
) -> Result<User, String> {
    JwtUtils::verify_access_token(token).map_err(|_| "Invalid JWT token".to_string())?;

    let claims =
        JwtUtils::decode_token(token).map_err(|_| "Invalid JWT token format".to_string())?;

    let user_id = claims
        .sub
        .parse::<i64>()
        .map_err(|_| "Invalid user ID in JWT".to_string())?;

    let user = storage
        .get_user_by_id(user_id)
        .await
        .map_err(|_| "Failed to retrieve user from storage".to_string())?
        .ok_or_else(|| "User not found".to_string())?;

    if user.status != UserStatus::Active {
        return Err("User is not active".to_string());
    }

    Ok(user)
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::ClassService;
use crate::errors::ClassHubError;
use crate::middlewares::RequireClassRole;
use crate::models::classes::responses::ClassDetailResponse;
use crate::models::{ApiResponse, ErrorCode};

/// 班级详情，附带成员数和请求者在班内的角色。
/// 请求者是否在班内由路由层的 RequireClassRole 把关。
pub async fn get_class(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    // 中间件校验通过后成员关系就在请求扩展里
    let Some(member) = RequireClassRole::extract_class_member(request) else {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::ClassPermissionDenied,
            "No permission for this class",
        )));
    };

    let storage = service.get_storage(request);

    let found = match storage.get_class_by_id(class_id).await {
        Ok(found) => found,
        Err(e) => return Ok(detail_failed(e)),
    };
    let Some(class) = found else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ClassNotFound,
            "Class not found",
        )));
    };

    // 成员数单独一条 COUNT，详情页访问量撑不起联表的复杂度
    let member_count = match storage.count_class_members(class_id).await {
        Ok(count) => count,
        Err(e) => return Ok(detail_failed(e)),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        ClassDetailResponse {
            class,
            member_count,
            role: member.role,
        },
        "Class information retrieved successfully",
    )))
}

fn detail_failed(e: ClassHubError) -> HttpResponse {
    error!("Failed to load class detail: {}", e);
    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
        ErrorCode::InternalServerError,
        format!("Failed to get class information: {e}"),
    ))
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::ClassService;
use crate::models::common::PaginationQuery;
use crate::models::{ApiResponse, ErrorCode};

/// 当前用户加入的班级列表，教师身份创建的班也在其中
pub async fn list_user_classes(
    service: &ClassService,
    request: &HttpRequest,
    user_id: i64,
    query: PaginationQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // 成员关系指向的班级可能已不存在，存储层列表会直接丢弃这类条目
    let listed = storage.list_user_classes(user_id, query).await;
    match listed {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "User class list retrieved successfully",
        ))),
        Err(e) => {
            error!("Failed to list classes for user {}: {}", user_id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to retrieve user class list: {e}"),
                )),
            )
        }
    }
}

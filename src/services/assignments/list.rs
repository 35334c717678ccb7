use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::AssignmentService;
use crate::models::assignments::requests::AssignmentListParams;
use crate::models::{ApiResponse, ErrorCode};

/// 班级作业列表，按创建时间倒序分页
pub async fn list_assignments(
    service: &AssignmentService,
    request: &HttpRequest,
    class_id: i64,
    query: AssignmentListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let listed = storage
        .list_class_assignments(class_id, query.pagination)
        .await;
    match listed {
        Ok(resp) => Ok(HttpResponse::Ok().json(ApiResponse::success(resp, "获取作业列表成功"))),
        Err(e) => {
            error!("Failed to list assignments for class {}: {}", class_id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("获取作业列表失败: {e}"),
                )),
            )
        }
    }
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::AssignmentService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::watch;

/// 删除作业，作业没有软删除语义，直接硬删
pub async fn delete_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    class_id: i64,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // class_id 一起进 WHERE，防止拿着别的班的作业 id 来删
    match storage.delete_assignment(class_id, assignment_id).await {
        Ok(true) => {
            info!("Assignment {} deleted from class {}", assignment_id, class_id);
            // 变更后向订阅者推送最新列表
            watch::publish_assignments(&storage, class_id).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("作业已删除")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AssignmentNotFound,
            "作业不存在",
        ))),
        Err(e) => {
            error!("Failed to delete assignment {}: {}", assignment_id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("删除作业失败: {e}"),
                )),
            )
        }
    }
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::ClassService;
use crate::errors::ClassHubError;
use crate::models::classes::requests::CreateClassRequest;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};

pub async fn create_class(
    service: &ClassService,
    request: &HttpRequest,
    creator: &User,
    class_data: CreateClassRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // 班级行与创建者的教师成员行在同一事务内写入
    match storage.create_class(creator, class_data).await {
        Ok(class) => {
            info!(
                "Class {} created successfully by {}",
                class.name, creator.username
            );
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(class, "Class created successfully")))
        }
        Err(e) => Ok(handle_class_create_error(&e)),
    }
}

/// 错误响应辅助函数
fn handle_class_create_error(e: &ClassHubError) -> HttpResponse {
    error!("Class creation failed: {}", e);
    match e {
        // 随机码连续碰撞且兜底码也冲突，极小概率事件，提示重试即可
        ClassHubError::ClassCodeExhausted(_) => HttpResponse::InternalServerError().json(
            ApiResponse::error_empty(
                ErrorCode::ClassCreationFailed,
                "Class code generation failed, please try again",
            ),
        ),
        _ => HttpResponse::InternalServerError().json(ApiResponse::error_empty(
            ErrorCode::ClassCreationFailed,
            format!("Class creation failed: {e}"),
        )),
    }
}

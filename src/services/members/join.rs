use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::ClassMemberService;
use crate::errors::ClassHubError;
use crate::models::classes::requests::JoinClassRequest;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};

pub async fn join_class(
    service: &ClassMemberService,
    request: &HttpRequest,
    user: &User,
    join_data: JoinClassRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // 加入码先去空白再转大写，生成侧只产出大写字母和数字
    let class_code = join_data.class_code.trim().to_uppercase();

    match storage.join_class(user, &class_code).await {
        Ok(member) => {
            info!("User {} joined class {}", user.username, member.class_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(member, "Class joined successfully")))
        }
        Err(ClassHubError::NotFound(_)) => Ok(HttpResponse::NotFound().json(
            ApiResponse::error_empty(
                ErrorCode::ClassCodeInvalid,
                "Class not found or class code is invalid",
            ),
        )),
        Err(ClassHubError::MemberConflict(_)) => {
            Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::ClassAlreadyJoined,
                "User has already joined the class",
            )))
        }
        Err(ClassHubError::ClassFull(_)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::ClassFull, "Class is full"),
        )),
        Err(e) => {
            error!("Error joining class: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::ClassJoinFailed,
                    "Failed to join class",
                )),
            )
        }
    }
}

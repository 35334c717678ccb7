use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::ClassMemberService;
use crate::models::class_members::responses::{ClassMemberEntry, ClassMemberListResponse};
use crate::models::{ApiResponse, ErrorCode};

pub async fn list_class_members(
    service: &ClassMemberService,
    request: &HttpRequest,
    class_id: i64,
    current_user_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // 存储层按加入时间升序返回，这里只做展示规范化
    match storage.list_class_members(class_id).await {
        Ok(members) => {
            let items: Vec<ClassMemberEntry> = members
                .into_iter()
                .map(|member| ClassMemberEntry {
                    id: member.id,
                    user_id: member.user_id,
                    display_name: member
                        .display_name
                        .unwrap_or_else(|| "Unnamed User".to_string()),
                    email: member.email,
                    role: member.role,
                    joined_at: member.joined_at,
                    is_current_user: member.user_id == current_user_id,
                })
                .collect();

            let total = items.len() as i64;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                ClassMemberListResponse { items, total },
                "Class members retrieved successfully",
            )))
        }
        Err(err) => {
            error!("Failed to retrieve class members: {}", err);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to retrieve class members",
                )),
            )
        }
    }
}

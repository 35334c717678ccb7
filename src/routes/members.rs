use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit, RequireJWT};
use crate::models::class_members::entities::ClassMemberRole;
use crate::models::classes::requests::JoinClassRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::ClassMemberService;
use crate::utils::SafeClassIdI64;

// 懒加载的全局 ClassMemberService 实例
static CLASS_MEMBER_SERVICE: Lazy<ClassMemberService> = Lazy::new(ClassMemberService::new_lazy);

// HTTP处理程序
pub async fn join_class(
    req: HttpRequest,
    join_data: web::Json<JoinClassRequest>,
) -> ActixResult<HttpResponse> {
    let user = match RequireJWT::extract_user_claims(&req) {
        Some(user) => user,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "无法获取用户信息",
            )));
        }
    };

    CLASS_MEMBER_SERVICE
        .join_class(&req, &user, join_data.into_inner())
        .await
}

pub async fn list_class_members(
    req: HttpRequest,
    class_id: SafeClassIdI64,
) -> ActixResult<HttpResponse> {
    let user_id = match RequireJWT::extract_user_id(&req) {
        Some(id) => id,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "无法获取用户信息",
            )));
        }
    };

    CLASS_MEMBER_SERVICE
        .list_class_members(&req, class_id.0, user_id)
        .await
}

// 配置路由
//
// 必须在班级路由之前注册，否则 "join" 会被当成 {class_id} 解析。
pub fn configure_members_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/v1/classes/join")
            .route(
                web::post()
                    .to(join_class)
                    // 加入码只有 6 位，必须限流防止枚举
                    .wrap(RateLimit::join_code()),
            )
            .wrap(middlewares::RequireJWT),
    );
    cfg.service(
        web::scope("/api/v1/classes/{class_id}/members")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("").route(
                    web::get()
                        .to(list_class_members)
                        // 成员列表仅成员可见
                        .wrap(middlewares::RequireClassRole::new_any(
                            ClassMemberRole::all_roles(),
                        )),
                ),
            ),
    );
}

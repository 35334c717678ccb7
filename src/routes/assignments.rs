use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireJWT};
use crate::models::assignments::requests::{
    AssignmentListParams, AssignmentWatchQuery, CreateAssignmentRequest, UpdateAssignmentRequest,
};
use crate::models::class_members::entities::ClassMemberRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::AssignmentService;
use crate::utils::{SafeAssignmentIdI64, SafeClassIdI64};

// 懒加载的全局 AssignmentService 实例
static ASSIGNMENT_SERVICE: Lazy<AssignmentService> = Lazy::new(AssignmentService::new_lazy);

// 列出班级作业
pub async fn list_assignments(
    req: HttpRequest,
    class_id: SafeClassIdI64,
    query: web::Query<AssignmentListParams>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .list_assignments(&req, class_id.0, query.into_inner())
        .await
}

// 创建作业
pub async fn create_assignment(
    req: HttpRequest,
    class_id: SafeClassIdI64,
    body: web::Json<CreateAssignmentRequest>,
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

    ASSIGNMENT_SERVICE
        .create_assignment(&req, class_id.0, user_id, body.into_inner())
        .await
}

// 更新作业
pub async fn update_assignment(
    req: HttpRequest,
    class_id: SafeClassIdI64,
    assignment_id: SafeAssignmentIdI64,
    body: web::Json<UpdateAssignmentRequest>,
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

    ASSIGNMENT_SERVICE
        .update_assignment(&req, class_id.0, assignment_id.0, user_id, body.into_inner())
        .await
}

// 删除作业
pub async fn delete_assignment(
    req: HttpRequest,
    class_id: SafeClassIdI64,
    assignment_id: SafeAssignmentIdI64,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .delete_assignment(&req, class_id.0, assignment_id.0)
        .await
}

// 订阅班级作业列表（WebSocket）
pub async fn watch_assignments(
    req: HttpRequest,
    class_id: SafeClassIdI64,
    query: web::Query<AssignmentWatchQuery>,
    body: web::Payload,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .watch_assignments(&req, class_id.0, query.into_inner(), body)
        .await
}

// 配置路由
pub fn configure_assignments_routes(cfg: &mut web::ServiceConfig) {
    // WebSocket 握手用查询参数里的 token 鉴权，注册在 JWT 作用域之外，
    // 且要先于 /{assignment_id} 资源，避免 "ws" 被当成作业 ID
    cfg.service(
        web::resource("/api/v1/classes/{class_id}/assignments/ws")
            .route(web::get().to(watch_assignments)),
    );
    cfg.service(
        web::scope("/api/v1/classes/{class_id}/assignments")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    // 列出作业 - 班级成员可访问
                    .route(
                        web::get().to(list_assignments).wrap(
                            middlewares::RequireClassRole::new_any(ClassMemberRole::all_roles()),
                        ),
                    )
                    // 创建作业 - 仅班级教师
                    .route(
                        web::post().to(create_assignment).wrap(
                            middlewares::RequireClassRole::new_any(
                                ClassMemberRole::class_teacher_roles(),
                            ),
                        ),
                    ),
            )
            .service(
                web::resource("/{assignment_id}")
                    // 更新作业 - 仅班级教师
                    .route(
                        web::put().to(update_assignment).wrap(
                            middlewares::RequireClassRole::new_any(
                                ClassMemberRole::class_teacher_roles(),
                            ),
                        ),
                    )
                    // 删除作业 - 仅班级教师
                    .route(
                        web::delete().to(delete_assignment).wrap(
                            middlewares::RequireClassRole::new_any(
                                ClassMemberRole::class_teacher_roles(),
                            ),
                        ),
                    ),
            ),
    );
}

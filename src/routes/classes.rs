use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireJWT};
use crate::models::class_members::entities::ClassMemberRole;
use crate::models::classes::requests::CreateClassRequest;
use crate::models::common::PaginationQuery;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::ClassService;
use crate::utils::SafeClassIdI64;

// 懒加载的全局 ClassService 实例
static CLASS_SERVICE: Lazy<ClassService> = Lazy::new(ClassService::new_lazy);

// HTTP处理程序
pub async fn list_classes(
    req: HttpRequest,
    query: web::Query<PaginationQuery>,
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

    CLASS_SERVICE
        .list_user_classes(&req, user_id, query.into_inner())
        .await
}

pub async fn create_class(
    req: HttpRequest,
    class_data: web::Json<CreateClassRequest>,
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

    CLASS_SERVICE
        .create_class(&req, &user, class_data.into_inner())
        .await
}

pub async fn get_class(req: HttpRequest, class_id: SafeClassIdI64) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.get_class(&req, class_id.0).await
}

// 配置路由
pub fn configure_classes_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/classes")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    // 用户查询自己加入的班级列表
                    .route(web::get().to(list_classes))
                    // 创建班级，创建者自动成为班级教师
                    .route(web::post().to(create_class)),
            )
            .service(
                web::resource("/{class_id}").route(
                    web::get()
                        .to(get_class)
                        // 班级详情仅成员可见
                        .wrap(middlewares::RequireClassRole::new_any(
                            ClassMemberRole::all_roles(),
                        )),
                ),
            ),
    );
}

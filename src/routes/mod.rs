pub mod assignments;
pub mod auth;
pub mod classes;
pub mod members;

pub use assignments::configure_assignments_routes;
pub use auth::configure_auth_routes;
pub use classes::configure_classes_routes;
pub use members::configure_members_routes;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::{ApiResponse, ErrorCode};

/// 未匹配到任何路由时的兜底，保持响应包格式一致
pub async fn not_found_handler(request: HttpRequest) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::NotFound,
        format!("No route for {} {}", request.method(), request.path()),
    )))
}

pub mod assignments;
pub mod auth;
pub mod classes;
pub mod members;
pub mod watch;

pub use assignments::AssignmentService;
pub use auth::AuthService;
pub use classes::ClassService;
pub use members::ClassMemberService;

use actix_web::HttpRequest;
use std::sync::Arc;

use crate::storage::Storage;

/// 从请求的 app_data 取存储句柄
///
/// 各服务以 `new_lazy()` 构建为静态实例，存储在 main 里注入
/// app_data，这里是唯一的取用入口。
pub(crate) fn storage_from_request(request: &HttpRequest) -> Arc<dyn Storage> {
    request
        .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
        .expect("Storage not found in app data")
        .get_ref()
        .clone()
}

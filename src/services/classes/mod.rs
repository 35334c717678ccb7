pub mod create;
pub mod get;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::classes::requests::CreateClassRequest;
use crate::models::common::PaginationQuery;
use crate::models::users::entities::User;
use crate::storage::Storage;

pub struct ClassService {
    storage: Option<Arc<dyn Storage>>,
}

impl ClassService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        match &self.storage {
            Some(storage) => storage.clone(),
            None => super::storage_from_request(request),
        }
    }

    // 创建班级，creator 为当前登录用户
    pub async fn create_class(
        &self,
        request: &HttpRequest,
        creator: &User,
        class_data: CreateClassRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_class(self, request, creator, class_data).await
    }

    // 获取当前用户已加入的班级列表
    pub async fn list_user_classes(
        &self,
        request: &HttpRequest,
        user_id: i64,
        query: PaginationQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_user_classes(self, request, user_id, query).await
    }

    // 获取班级详情，路由上由 RequireClassRole 保证请求者是班级成员
    pub async fn get_class(
        &self,
        request: &HttpRequest,
        class_id: i64,
    ) -> ActixResult<HttpResponse> {
        get::get_class(self, request, class_id).await
    }
}

pub mod join;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::classes::requests::JoinClassRequest;
use crate::models::users::entities::User;
use crate::storage::Storage;

pub struct ClassMemberService {
    storage: Option<Arc<dyn Storage>>,
}

impl ClassMemberService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        match &self.storage {
            Some(storage) => storage.clone(),
            None => super::storage_from_request(request),
        }
    }

    // 凭加入码加入班级，user 为当前登录用户
    pub async fn join_class(
        &self,
        request: &HttpRequest,
        user: &User,
        join_data: JoinClassRequest,
    ) -> ActixResult<HttpResponse> {
        join::join_class(self, request, user, join_data).await
    }

    // 列出班级成员
    pub async fn list_class_members(
        &self,
        request: &HttpRequest,
        class_id: i64,
        current_user_id: i64,
    ) -> ActixResult<HttpResponse> {
        list::list_class_members(self, request, class_id, current_user_id).await
    }
}

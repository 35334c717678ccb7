pub mod create;
pub mod delete;
pub mod list;
pub mod update;
pub mod watch;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::models::assignments::requests::{
    AssignmentListParams, AssignmentWatchQuery, CreateAssignmentRequest, UpdateAssignmentRequest,
};
use crate::storage::Storage;

pub struct AssignmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl AssignmentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        match &self.storage {
            Some(storage) => storage.clone(),
            None => super::storage_from_request(request),
        }
    }

    // 列出班级作业
    pub async fn list_assignments(
        &self,
        request: &HttpRequest,
        class_id: i64,
        query: AssignmentListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_assignments(self, request, class_id, query).await
    }

    // 创建作业
    pub async fn create_assignment(
        &self,
        request: &HttpRequest,
        class_id: i64,
        created_by: i64,
        req: CreateAssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_assignment(self, request, class_id, created_by, req).await
    }

    // 更新作业
    pub async fn update_assignment(
        &self,
        request: &HttpRequest,
        class_id: i64,
        assignment_id: i64,
        updated_by: i64,
        req: UpdateAssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_assignment(self, request, class_id, assignment_id, updated_by, req).await
    }

    // 删除作业
    pub async fn delete_assignment(
        &self,
        request: &HttpRequest,
        class_id: i64,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_assignment(self, request, class_id, assignment_id).await
    }

    // 订阅班级作业列表（WebSocket 升级）
    pub async fn watch_assignments(
        &self,
        request: &HttpRequest,
        class_id: i64,
        query: AssignmentWatchQuery,
        body: web::Payload,
    ) -> ActixResult<HttpResponse> {
        watch::watch_assignments(self, request, class_id, query, body).await
    }
}

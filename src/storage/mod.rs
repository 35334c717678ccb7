use std::sync::Arc;

use crate::models::{
    assignments::{
        entities::Assignment,
        requests::{CreateAssignmentRequest, UpdateAssignmentRequest},
        responses::AssignmentListResponse,
    },
    class_members::entities::ClassMember,
    classes::{entities::Class, requests::CreateClassRequest, responses::UserClassListResponse},
    common::PaginationQuery,
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateProfileRequest},
    },
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 更新用户资料，password 字段须已经是哈希值
    async fn update_profile(&self, id: i64, update: UpdateProfileRequest) -> Result<Option<User>>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;

    /// 班级管理方法
    // 创建班级，班级行与创建者的教师成员行在同一事务内写入
    async fn create_class(&self, creator: &User, class: CreateClassRequest) -> Result<Class>;
    // 通过ID获取班级信息
    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>>;
    // 分页列出用户已加入的班级
    async fn list_user_classes(
        &self,
        user_id: i64,
        query: PaginationQuery,
    ) -> Result<UserClassListResponse>;
    // 统计班级成员数量
    async fn count_class_members(&self, class_id: i64) -> Result<i64>;

    /// 班级成员管理方法
    // 凭加入码以学生身份加入班级，码无效/重复加入/班级已满分别报错
    async fn join_class(&self, user: &User, class_code: &str) -> Result<ClassMember>;
    // 获取用户在班级中的成员关系
    async fn get_class_member(&self, class_id: i64, user_id: i64) -> Result<Option<ClassMember>>;
    // 列出班级全部成员，按加入时间升序
    async fn list_class_members(&self, class_id: i64) -> Result<Vec<ClassMember>>;

    /// 作业管理方法
    // 创建作业
    async fn create_assignment(
        &self,
        class_id: i64,
        created_by: i64,
        assignment: CreateAssignmentRequest,
    ) -> Result<Assignment>;
    // 更新作业，请求中提供的字段覆盖原值
    async fn update_assignment(
        &self,
        class_id: i64,
        assignment_id: i64,
        updated_by: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>>;
    // 删除作业
    async fn delete_assignment(&self, class_id: i64, assignment_id: i64) -> Result<bool>;
    // 分页列出班级作业，按创建时间降序
    async fn list_class_assignments(
        &self,
        class_id: i64,
        query: PaginationQuery,
    ) -> Result<AssignmentListResponse>;
    // 获取班级全部作业，推送订阅的全量快照用
    async fn list_all_class_assignments(&self, class_id: i64) -> Result<Vec<Assignment>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}

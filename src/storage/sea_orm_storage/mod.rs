//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod assignments;
mod class_members;
mod classes;
mod users;

use crate::config::AppConfig;
use crate::errors::{ClassHubError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::new_with_url(&config.database.url, config.database.pool_size).await
    }

    /// 以指定连接串创建存储实例并执行迁移
    ///
    /// 测试用内存库走这里，连接数固定为 1 以保住单个内存实例。
    pub async fn new_with_url(url: &str, pool_size: u32) -> Result<Self> {
        let db_url = Self::build_database_url(url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, pool_size).await?
        } else {
            Self::connect_generic(&db_url, pool_size).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| ClassHubError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, pool_size: u32) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| ClassHubError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(AppConfig::get().database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| ClassHubError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, pool_size: u32) -> Result<DatabaseConnection> {
        let timeout = AppConfig::get().database.timeout;
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(timeout))
            .acquire_timeout(Duration::from_secs(timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| ClassHubError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(ClassHubError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
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
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn update_profile(&self, id: i64, update: UpdateProfileRequest) -> Result<Option<User>> {
        self.update_profile_impl(id, update).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    // 班级模块
    async fn create_class(&self, creator: &User, class: CreateClassRequest) -> Result<Class> {
        self.create_class_impl(creator, class).await
    }

    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>> {
        self.get_class_by_id_impl(class_id).await
    }

    async fn list_user_classes(
        &self,
        user_id: i64,
        query: PaginationQuery,
    ) -> Result<UserClassListResponse> {
        self.list_user_classes_impl(user_id, query).await
    }

    async fn count_class_members(&self, class_id: i64) -> Result<i64> {
        self.count_class_members_impl(class_id).await
    }

    // 班级成员模块
    async fn join_class(&self, user: &User, class_code: &str) -> Result<ClassMember> {
        self.join_class_impl(user, class_code).await
    }

    async fn get_class_member(&self, class_id: i64, user_id: i64) -> Result<Option<ClassMember>> {
        self.get_class_member_impl(class_id, user_id).await
    }

    async fn list_class_members(&self, class_id: i64) -> Result<Vec<ClassMember>> {
        self.list_class_members_impl(class_id).await
    }

    // 作业模块
    async fn create_assignment(
        &self,
        class_id: i64,
        created_by: i64,
        assignment: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        self.create_assignment_impl(class_id, created_by, assignment)
            .await
    }

    async fn update_assignment(
        &self,
        class_id: i64,
        assignment_id: i64,
        updated_by: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        self.update_assignment_impl(class_id, assignment_id, updated_by, update)
            .await
    }

    async fn delete_assignment(&self, class_id: i64, assignment_id: i64) -> Result<bool> {
        self.delete_assignment_impl(class_id, assignment_id).await
    }

    async fn list_class_assignments(
        &self,
        class_id: i64,
        query: PaginationQuery,
    ) -> Result<AssignmentListResponse> {
        self.list_class_assignments_impl(class_id, query).await
    }

    async fn list_all_class_assignments(&self, class_id: i64) -> Result<Vec<Assignment>> {
        self.list_all_class_assignments_impl(class_id).await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::SeaOrmStorage;
    use crate::models::classes::{entities::Class, requests::CreateClassRequest};
    use crate::models::users::{entities::User, requests::CreateUserRequest};

    /// 连接独立内存库并完成迁移
    pub async fn memory_storage() -> SeaOrmStorage {
        SeaOrmStorage::new_with_url(":memory:", 1)
            .await
            .expect("in-memory storage should initialize")
    }

    /// 造一个测试用户，密码字段存占位哈希
    pub async fn seed_user(storage: &SeaOrmStorage, username: &str) -> User {
        storage
            .create_user_impl(CreateUserRequest {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password: "$argon2id$test-hash".to_string(),
                display_name: Some(format!("{username} 的昵称")),
            })
            .await
            .expect("seed user should insert")
    }

    /// 造一个测试班级，创建者自动成为教师成员
    pub async fn seed_class(
        storage: &SeaOrmStorage,
        teacher: &User,
        name: &str,
        max_users: Option<i32>,
    ) -> Class {
        storage
            .create_class_impl(
                teacher,
                CreateClassRequest {
                    name: name.to_string(),
                    description: None,
                    max_users,
                },
            )
            .await
            .expect("seed class should insert")
    }
}

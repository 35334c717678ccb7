use super::SeaOrmStorage;
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{ClassHubError, Result};
use crate::models::users::{
    entities::{User, UserStatus},
    requests::{CreateUserRequest, UpdateProfileRequest},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, Set};

impl SeaOrmStorage {
    /// 创建用户
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            username: Set(req.username),
            email: Set(req.email),
            password_hash: Set(req.password),
            status: Set(UserStatus::Active.to_string()),
            display_name: Set(req.display_name),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| ClassHubError::database_operation(format!("创建用户失败: {e}")))?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ClassHubError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过用户名获取用户
    pub async fn get_user_by_username_impl(&self, username: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| ClassHubError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过邮箱获取用户
    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| ClassHubError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过用户名或邮箱获取用户
    pub async fn get_user_by_username_or_email_impl(
        &self,
        identifier: &str,
    ) -> Result<Option<User>> {
        let result = Users::find()
            .filter(
                Condition::any()
                    .add(Column::Username.eq(identifier))
                    .add(Column::Email.eq(identifier)),
            )
            .one(&self.db)
            .await
            .map_err(|e| ClassHubError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 更新用户资料
    ///
    /// password 字段由服务层先行校验并哈希，这里原样落库。
    pub async fn update_profile_impl(
        &self,
        id: i64,
        update: UpdateProfileRequest,
    ) -> Result<Option<User>> {
        // 先检查用户是否存在
        let existing = self.get_user_by_id_impl(id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(display_name) = update.display_name {
            model.display_name = Set(Some(display_name));
        }

        if let Some(password) = update.password {
            model.password_hash = Set(password);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| ClassHubError::database_operation(format!("更新用户失败: {e}")))?;

        self.get_user_by_id_impl(id).await
    }

    /// 更新用户最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(Column::LastLogin, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| ClassHubError::database_operation(format!("更新最后登录时间失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{memory_storage, seed_user};
    use crate::models::users::{entities::UserStatus, requests::UpdateProfileRequest};

    #[tokio::test]
    async fn test_create_and_lookup_user() {
        let storage = memory_storage().await;
        let user = seed_user(&storage, "alice").await;

        assert_eq!(user.status, UserStatus::Active);
        assert!(user.last_login.is_none());

        let by_name = storage
            .get_user_by_username_impl("alice")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_name.id, user.id);

        let by_email = storage
            .get_user_by_email_impl("alice@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, user.id);

        // 用户名和邮箱都能作为登录标识
        for identifier in ["alice", "alice@example.com"] {
            let found = storage
                .get_user_by_username_or_email_impl(identifier)
                .await
                .unwrap();
            assert_eq!(found.map(|u| u.id), Some(user.id));
        }

        assert!(
            storage
                .get_user_by_username_or_email_impl("nobody")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_update_profile_partial_fields() {
        let storage = memory_storage().await;
        let user = seed_user(&storage, "bob").await;

        let updated = storage
            .update_profile_impl(
                user.id,
                UpdateProfileRequest {
                    display_name: Some("Bobby".to_string()),
                    password: None,
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.display_name.as_deref(), Some("Bobby"));
        // 未提供的字段保持原值
        assert_eq!(updated.password_hash, user.password_hash);

        let missing = storage
            .update_profile_impl(
                user.id + 999,
                UpdateProfileRequest {
                    display_name: Some("ghost".to_string()),
                    password: None,
                },
            )
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_update_last_login() {
        let storage = memory_storage().await;
        let user = seed_user(&storage, "carol").await;

        assert!(storage.update_last_login_impl(user.id).await.unwrap());
        let refreshed = storage
            .get_user_by_id_impl(user.id)
            .await
            .unwrap()
            .unwrap();
        assert!(refreshed.last_login.is_some());

        assert!(!storage.update_last_login_impl(user.id + 999).await.unwrap());
    }
}

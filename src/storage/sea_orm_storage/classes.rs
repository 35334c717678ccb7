//! 班级存储操作

use super::SeaOrmStorage;
use crate::config::AppConfig;
use crate::entity::class_members::ActiveModel as ClassMemberActiveModel;
use crate::entity::classes::{ActiveModel, Column, Entity as Classes};
use crate::errors::{ClassHubError, Result};
use crate::models::{
    class_members::entities::ClassMemberRole,
    classes::{entities::Class, requests::CreateClassRequest},
    users::entities::User,
};
use crate::utils::class_code::{fallback_class_code, generate_class_code};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set, SqlErr,
    TransactionTrait,
};

/// 常规产码的最大尝试次数，耗尽后改用兜底码
const CLASS_CODE_ATTEMPTS: usize = 5;

impl SeaOrmStorage {
    /// 创建班级
    ///
    /// 班级行和创建者的教师成员行在同一事务内写入，不会出现
    /// 只有班级没有教师的中间状态。
    pub async fn create_class_impl(&self, creator: &User, req: CreateClassRequest) -> Result<Class> {
        let now = chrono::Utc::now().timestamp();
        let max_users = req
            .max_users
            .unwrap_or(AppConfig::get().class.default_max_users as i32);
        let class_code = self.reserve_class_code().await?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| ClassHubError::database_operation(format!("开启事务失败: {e}")))?;

        let class = ActiveModel {
            name: Set(req.name),
            description: Set(req.description),
            max_users: Set(max_users),
            created_by: Set(creator.id),
            class_code: Set(class_code),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| match e.sql_err() {
            // classes 表上唯一约束只有 class_code，兜底码也撞了才会到这里
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                ClassHubError::class_code_exhausted(format!("加入码冲突: {e}"))
            }
            _ => ClassHubError::database_operation(format!("创建班级失败: {e}")),
        })?;

        ClassMemberActiveModel {
            class_id: Set(class.id),
            user_id: Set(creator.id),
            role: Set(ClassMemberRole::Teacher.to_string()),
            display_name: Set(creator.display_name.clone()),
            email: Set(creator.email.clone()),
            joined_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| ClassHubError::database_operation(format!("写入教师成员失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| ClassHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(class.into_class())
    }

    /// 产出一个未被占用的加入码
    ///
    /// 常规码逐个回查占用情况，连续撞码则使用兜底码。兜底码不再
    /// 回查，真正的冲突由 class_code 唯一索引在插入时拦截。
    async fn reserve_class_code(&self) -> Result<String> {
        for _ in 0..CLASS_CODE_ATTEMPTS {
            let candidate = generate_class_code();
            let occupied = Classes::find()
                .filter(Column::ClassCode.eq(&candidate))
                .count(&self.db)
                .await
                .map_err(|e| ClassHubError::database_operation(format!("查询加入码失败: {e}")))?;
            if occupied == 0 {
                return Ok(candidate);
            }
        }
        Ok(fallback_class_code())
    }

    /// 通过 ID 获取班级
    pub async fn get_class_by_id_impl(&self, class_id: i64) -> Result<Option<Class>> {
        let result = Classes::find_by_id(class_id)
            .one(&self.db)
            .await
            .map_err(|e| ClassHubError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_class()))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{memory_storage, seed_user};
    use crate::models::{
        class_members::entities::ClassMemberRole, classes::requests::CreateClassRequest,
    };
    use crate::utils::class_code::{CODE_ALPHABET, CODE_LENGTH};

    fn create_request(name: &str, max_users: Option<i32>) -> CreateClassRequest {
        CreateClassRequest {
            name: name.to_string(),
            description: Some(format!("{name} 的测试班级")),
            max_users,
        }
    }

    #[tokio::test]
    async fn test_create_class_defaults_and_teacher_membership() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "ms_chen").await;

        let class = storage
            .create_class_impl(&teacher, create_request("Algebra I", None))
            .await
            .unwrap();

        // 未指定人数上限时取配置默认值
        assert_eq!(class.max_users, 30);
        assert!(class.active);
        assert_eq!(class.created_by, teacher.id);
        assert_eq!(class.class_code.len(), CODE_LENGTH);
        assert!(
            class
                .class_code
                .bytes()
                .all(|b| CODE_ALPHABET.contains(&b))
        );

        // 创建者同时成为班级教师成员
        let member = storage
            .get_class_member_impl(class.id, teacher.id)
            .await
            .unwrap()
            .expect("creator should be a member");
        assert_eq!(member.role, ClassMemberRole::Teacher);
        assert_eq!(member.email, teacher.email);
        assert_eq!(member.display_name, teacher.display_name);

        assert_eq!(
            storage.count_class_members_impl(class.id).await.unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_create_class_explicit_max_users() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "mr_li").await;

        let class = storage
            .create_class_impl(&teacher, create_request("Chemistry", Some(5)))
            .await
            .unwrap();
        assert_eq!(class.max_users, 5);
    }

    #[tokio::test]
    async fn test_class_codes_are_distinct() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "prof_wang").await;

        let mut codes = std::collections::HashSet::new();
        for i in 0..10 {
            let class = storage
                .create_class_impl(&teacher, create_request(&format!("Class {i}"), None))
                .await
                .unwrap();
            assert!(codes.insert(class.class_code));
        }
    }

    #[tokio::test]
    async fn test_deactivated_class_keeps_its_code() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "ms_zhao").await;

        let class = storage
            .create_class_impl(&teacher, create_request("History", None))
            .await
            .unwrap();

        use crate::entity::classes;
        use sea_orm::{ActiveModelTrait, Set};
        classes::ActiveModel {
            id: Set(class.id),
            active: Set(false),
            ..Default::default()
        }
        .update(&storage.db)
        .await
        .unwrap();

        // 停用只是挡住加入，码还占着，产码的占用检查必须能看到它
        let fetched = storage
            .get_class_by_id_impl(class.id)
            .await
            .unwrap()
            .expect("class row should survive deactivation");
        assert_eq!(fetched.class_code, class.class_code);
        assert!(!fetched.active);
    }
}

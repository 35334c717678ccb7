//! 班级成员关联存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::class_members::{ActiveModel, Column, Entity as ClassMembers};
use crate::entity::classes::{Column as ClassColumn, Entity as Classes};
use crate::errors::{ClassHubError, Result};
use crate::models::{
    PaginationInfo,
    class_members::entities::{ClassMember, ClassMemberRole},
    classes::responses::{UserClassEntry, UserClassListResponse},
    common::PaginationQuery,
    users::entities::User,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, SqlErr, TransactionTrait,
};

impl SeaOrmStorage {
    /// 通过加入码以学生身份加入班级
    ///
    /// 查码、查重、查容量、写成员行在同一事务内完成，班级行加
    /// 排它锁串行化并发加入（SQLite 方言不生成锁子句，由库级
    /// 写锁兜底）。任何一步失败整个事务回滚。
    pub async fn join_class_impl(&self, user: &User, class_code: &str) -> Result<ClassMember> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| ClassHubError::database_operation(format!("开启事务失败: {e}")))?;

        let class = Classes::find()
            .filter(ClassColumn::ClassCode.eq(class_code))
            .filter(ClassColumn::Active.eq(true))
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| ClassHubError::database_operation(format!("查询班级失败: {e}")))?
            .ok_or_else(|| {
                ClassHubError::not_found(format!("加入码 {class_code} 不存在或班级已停用"))
            })?;

        let joined = ClassMembers::find()
            .filter(
                Condition::all()
                    .add(Column::ClassId.eq(class.id))
                    .add(Column::UserId.eq(user.id)),
            )
            .count(&txn)
            .await
            .map_err(|e| ClassHubError::database_operation(format!("查询班级成员失败: {e}")))?;
        if joined > 0 {
            return Err(ClassHubError::member_conflict(format!(
                "用户 {} 已在班级 {} 中",
                user.id, class.id
            )));
        }

        let members = ClassMembers::find()
            .filter(Column::ClassId.eq(class.id))
            .count(&txn)
            .await
            .map_err(|e| ClassHubError::database_operation(format!("统计班级成员失败: {e}")))?;
        if members >= class.max_users as u64 {
            return Err(ClassHubError::class_full(format!(
                "班级 {} 人数已满: {}/{}",
                class.id, members, class.max_users
            )));
        }

        let now = chrono::Utc::now().timestamp();
        let inserted = ActiveModel {
            class_id: Set(class.id),
            user_id: Set(user.id),
            role: Set(ClassMemberRole::Student.to_string()),
            display_name: Set(user.display_name.clone()),
            email: Set(user.email.clone()),
            joined_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| match e.sql_err() {
            // (class_id, user_id) 唯一索引兜底并发下的重复加入
            Some(SqlErr::UniqueConstraintViolation(_)) => ClassHubError::member_conflict(format!(
                "用户 {} 已在班级 {} 中",
                user.id, class.id
            )),
            _ => ClassHubError::database_operation(format!("加入班级失败: {e}")),
        })?;

        txn.commit()
            .await
            .map_err(|e| ClassHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(inserted.into_class_member())
    }

    /// 获取用户在班级中的成员关系
    pub async fn get_class_member_impl(
        &self,
        class_id: i64,
        user_id: i64,
    ) -> Result<Option<ClassMember>> {
        let result = ClassMembers::find()
            .filter(
                Condition::all()
                    .add(Column::ClassId.eq(class_id))
                    .add(Column::UserId.eq(user_id)),
            )
            .one(&self.db)
            .await
            .map_err(|e| ClassHubError::database_operation(format!("查询班级成员失败: {e}")))?;

        Ok(result.map(|m| m.into_class_member()))
    }

    /// 列出班级全部成员，按加入时间升序
    pub async fn list_class_members_impl(&self, class_id: i64) -> Result<Vec<ClassMember>> {
        let members = ClassMembers::find()
            .filter(Column::ClassId.eq(class_id))
            .order_by_asc(Column::JoinedAt)
            .all(&self.db)
            .await
            .map_err(|e| ClassHubError::database_operation(format!("查询班级成员失败: {e}")))?;

        Ok(members.into_iter().map(|m| m.into_class_member()).collect())
    }

    /// 统计班级成员数量
    pub async fn count_class_members_impl(&self, class_id: i64) -> Result<i64> {
        let count = ClassMembers::find()
            .filter(Column::ClassId.eq(class_id))
            .count(&self.db)
            .await
            .map_err(|e| ClassHubError::database_operation(format!("统计班级成员失败: {e}")))?;

        Ok(count as i64)
    }

    /// 分页列出用户已加入的班级
    ///
    /// 以成员关系为主体分页（按加入时间降序），再批量回查班级
    /// 信息拼装条目。
    pub async fn list_user_classes_impl(
        &self,
        user_id: i64,
        query: PaginationQuery,
    ) -> Result<UserClassListResponse> {
        let page = query.page.max(1) as u64;
        let size = query.size.clamp(1, 100) as u64;

        let paginator = ClassMembers::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_desc(Column::JoinedAt)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| ClassHubError::database_operation(format!("查询用户班级总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| ClassHubError::database_operation(format!("查询用户班级页数失败: {e}")))?;

        let memberships = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| ClassHubError::database_operation(format!("查询用户班级列表失败: {e}")))?;

        let pagination = PaginationInfo {
            page: page as i64,
            page_size: size as i64,
            total: total as i64,
            total_pages: pages as i64,
        };

        let class_ids: Vec<i64> = memberships.iter().map(|m| m.class_id).collect();
        if class_ids.is_empty() {
            return Ok(UserClassListResponse {
                pagination,
                items: vec![],
            });
        }

        let mut classes_by_id: HashMap<i64, _> = Classes::find()
            .filter(ClassColumn::Id.is_in(class_ids))
            .all(&self.db)
            .await
            .map_err(|e| ClassHubError::database_operation(format!("查询班级信息失败: {e}")))?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        // 成员关系指向的班级可能已被带外删除，这类记录直接丢弃
        let items = memberships
            .into_iter()
            .filter_map(|m| {
                let member = m.into_class_member();
                classes_by_id.remove(&member.class_id).map(|c| {
                    let class = c.into_class();
                    UserClassEntry {
                        id: class.id,
                        name: class.name,
                        description: class.description,
                        role: member.role,
                        joined_at: member.joined_at,
                        class_code: class.class_code,
                        created_by: class.created_by,
                    }
                })
            })
            .collect();

        Ok(UserClassListResponse { pagination, items })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{memory_storage, seed_class, seed_user};
    use crate::errors::ClassHubError;
    use crate::models::{class_members::entities::ClassMemberRole, common::PaginationQuery};

    #[tokio::test]
    async fn test_join_class_inserts_single_student_row() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "teacher_a").await;
        let student = seed_user(&storage, "student_a").await;
        let class = seed_class(&storage, &teacher, "Physics", None).await;

        let member = storage
            .join_class_impl(&student, &class.class_code)
            .await
            .unwrap();

        assert_eq!(member.class_id, class.id);
        assert_eq!(member.user_id, student.id);
        assert_eq!(member.role, ClassMemberRole::Student);
        assert_eq!(member.email, student.email);

        // 教师 + 新学生
        assert_eq!(
            storage.count_class_members_impl(class.id).await.unwrap(),
            2
        );
    }

    #[tokio::test]
    async fn test_join_with_unknown_code_fails() {
        let storage = memory_storage().await;
        let student = seed_user(&storage, "student_b").await;

        let err = storage
            .join_class_impl(&student, "ZZZZZZ")
            .await
            .unwrap_err();
        assert!(matches!(err, ClassHubError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_join_twice_fails_with_conflict() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "teacher_c").await;
        let student = seed_user(&storage, "student_c").await;
        let class = seed_class(&storage, &teacher, "Biology", None).await;

        storage
            .join_class_impl(&student, &class.class_code)
            .await
            .unwrap();
        let err = storage
            .join_class_impl(&student, &class.class_code)
            .await
            .unwrap_err();
        assert!(matches!(err, ClassHubError::MemberConflict(_)));

        // 失败的第二次不落新行
        assert_eq!(
            storage.count_class_members_impl(class.id).await.unwrap(),
            2
        );
    }

    #[tokio::test]
    async fn test_creator_joining_own_class_conflicts() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "teacher_d").await;
        let class = seed_class(&storage, &teacher, "Geography", None).await;

        // 创建时已经写入教师成员行
        let err = storage
            .join_class_impl(&teacher, &class.class_code)
            .await
            .unwrap_err();
        assert!(matches!(err, ClassHubError::MemberConflict(_)));
    }

    #[tokio::test]
    async fn test_join_full_class_fails_without_insert() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "teacher_e").await;
        // 上限 2：教师占一席，只剩一个学生名额
        let class = seed_class(&storage, &teacher, "Art", Some(2)).await;

        let first = seed_user(&storage, "student_e1").await;
        storage
            .join_class_impl(&first, &class.class_code)
            .await
            .unwrap();

        let second = seed_user(&storage, "student_e2").await;
        let err = storage
            .join_class_impl(&second, &class.class_code)
            .await
            .unwrap_err();
        assert!(matches!(err, ClassHubError::ClassFull(_)));

        assert_eq!(
            storage.count_class_members_impl(class.id).await.unwrap(),
            2
        );
        assert!(
            storage
                .get_class_member_impl(class.id, second.id)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_join_inactive_class_fails() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "teacher_f").await;
        let class = seed_class(&storage, &teacher, "Music", None).await;

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

        let student = seed_user(&storage, "student_f").await;
        let err = storage
            .join_class_impl(&student, &class.class_code)
            .await
            .unwrap_err();
        assert!(matches!(err, ClassHubError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_class_members_ordered_by_join_time() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "teacher_g").await;
        let class = seed_class(&storage, &teacher, "Latin", None).await;

        for name in ["student_g1", "student_g2"] {
            let student = seed_user(&storage, name).await;
            storage
                .join_class_impl(&student, &class.class_code)
                .await
                .unwrap();
        }

        let members = storage.list_class_members_impl(class.id).await.unwrap();
        assert_eq!(members.len(), 3);
        // 教师最先加入，排在最前
        assert_eq!(members[0].user_id, teacher.id);
        assert!(
            members
                .windows(2)
                .all(|w| w[0].joined_at <= w[1].joined_at)
        );
    }

    #[tokio::test]
    async fn test_list_user_classes_includes_role_and_code() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "teacher_h").await;
        let student = seed_user(&storage, "student_h").await;

        let own = seed_class(&storage, &teacher, "Owned", None).await;
        let other_teacher = seed_user(&storage, "teacher_h2").await;
        let joined = seed_class(&storage, &other_teacher, "Joined", None).await;
        storage
            .join_class_impl(&teacher, &joined.class_code)
            .await
            .unwrap();

        let listed = storage
            .list_user_classes_impl(teacher.id, PaginationQuery::default())
            .await
            .unwrap();
        assert_eq!(listed.pagination.total, 2);
        assert_eq!(listed.items.len(), 2);

        let own_entry = listed.items.iter().find(|e| e.id == own.id).unwrap();
        assert_eq!(own_entry.role, ClassMemberRole::Teacher);
        assert_eq!(own_entry.class_code, own.class_code);
        assert_eq!(own_entry.created_by, teacher.id);

        let joined_entry = listed.items.iter().find(|e| e.id == joined.id).unwrap();
        assert_eq!(joined_entry.role, ClassMemberRole::Student);

        // 旁观者看不到任何班级
        let empty = storage
            .list_user_classes_impl(student.id, PaginationQuery::default())
            .await
            .unwrap();
        assert_eq!(empty.pagination.total, 0);
        assert!(empty.items.is_empty());
    }

    #[tokio::test]
    async fn test_list_user_classes_drops_orphan_memberships() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "teacher_i").await;
        let kept = seed_class(&storage, &teacher, "Kept", None).await;
        let doomed = seed_class(&storage, &teacher, "Doomed", None).await;

        // 带外删掉班级行，留下孤儿成员关系
        use sea_orm::EntityTrait;
        crate::entity::classes::Entity::delete_by_id(doomed.id)
            .exec(&storage.db)
            .await
            .unwrap();

        let listed = storage
            .list_user_classes_impl(teacher.id, PaginationQuery::default())
            .await
            .unwrap();
        assert_eq!(listed.items.len(), 1);
        assert_eq!(listed.items[0].id, kept.id);
    }
}

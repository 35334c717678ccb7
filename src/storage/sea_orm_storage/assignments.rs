//! 作业存储操作

use super::SeaOrmStorage;
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments};
use crate::errors::{ClassHubError, Result};
use crate::models::{
    PaginationInfo,
    assignments::{
        entities::Assignment,
        requests::{CreateAssignmentRequest, UpdateAssignmentRequest},
        responses::AssignmentListResponse,
    },
    common::PaginationQuery,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

// 扩展字段以 JSON 文本入库，空集合存 NULL
fn encode_extra(extra: &serde_json::Map<String, serde_json::Value>) -> Result<Option<String>> {
    if extra.is_empty() {
        return Ok(None);
    }
    let raw = serde_json::to_string(extra)
        .map_err(|e| ClassHubError::serialization(format!("扩展字段序列化失败: {e}")))?;
    Ok(Some(raw))
}

impl SeaOrmStorage {
    /// 创建作业
    pub async fn create_assignment_impl(
        &self,
        class_id: i64,
        created_by: i64,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            class_id: Set(class_id),
            created_by: Set(created_by),
            title: Set(req.title),
            description: Set(req.description),
            deadline: Set(req.deadline.map(|dt| dt.timestamp())),
            extra: Set(encode_extra(&req.extra)?),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| ClassHubError::database_operation(format!("创建作业失败: {e}")))?;

        Ok(result.into_assignment())
    }

    /// 获取班级内指定作业
    pub async fn get_assignment_impl(
        &self,
        class_id: i64,
        assignment_id: i64,
    ) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(assignment_id)
            .filter(Column::ClassId.eq(class_id))
            .one(&self.db)
            .await
            .map_err(|e| ClassHubError::database_operation(format!("查询作业失败: {e}")))?;

        Ok(result.map(|m| m.into_assignment()))
    }

    /// 更新作业
    ///
    /// 请求中提供的字段覆盖原值，扩展字段按键合并，未提及的键
    /// 保持不变。
    pub async fn update_assignment_impl(
        &self,
        class_id: i64,
        assignment_id: i64,
        updated_by: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        // 先确认作业存在且属于该班级
        let existing = Assignments::find_by_id(assignment_id)
            .filter(Column::ClassId.eq(class_id))
            .one(&self.db)
            .await
            .map_err(|e| ClassHubError::database_operation(format!("查询作业失败: {e}")))?;
        let Some(existing) = existing else {
            return Ok(None);
        };

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(assignment_id),
            updated_by: Set(Some(updated_by)),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(title) = update.title {
            model.title = Set(title);
        }

        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }

        if let Some(deadline) = update.deadline {
            model.deadline = Set(Some(deadline.timestamp()));
        }

        if !update.extra.is_empty() {
            let mut merged: serde_json::Map<String, serde_json::Value> = existing
                .extra
                .as_deref()
                .and_then(|raw| serde_json::from_str(raw).ok())
                .unwrap_or_default();
            merged.extend(update.extra);
            model.extra = Set(encode_extra(&merged)?);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| ClassHubError::database_operation(format!("更新作业失败: {e}")))?;

        self.get_assignment_impl(class_id, assignment_id).await
    }

    /// 删除作业
    pub async fn delete_assignment_impl(
        &self,
        class_id: i64,
        assignment_id: i64,
    ) -> Result<bool> {
        let result = Assignments::delete_many()
            .filter(
                Condition::all()
                    .add(Column::Id.eq(assignment_id))
                    .add(Column::ClassId.eq(class_id)),
            )
            .exec(&self.db)
            .await
            .map_err(|e| ClassHubError::database_operation(format!("删除作业失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 分页列出班级作业，新作业在前
    pub async fn list_class_assignments_impl(
        &self,
        class_id: i64,
        query: PaginationQuery,
    ) -> Result<AssignmentListResponse> {
        let page = query.page.max(1) as u64;
        let size = query.size.clamp(1, 100) as u64;

        let paginator = Assignments::find()
            .filter(Column::ClassId.eq(class_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| ClassHubError::database_operation(format!("查询作业总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| ClassHubError::database_operation(format!("查询作业页数失败: {e}")))?;

        let assignments = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| ClassHubError::database_operation(format!("查询作业列表失败: {e}")))?;

        Ok(AssignmentListResponse {
            items: assignments
                .into_iter()
                .map(|m| m.into_assignment())
                .collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 获取班级全部作业，推送快照用，排序与分页列表一致
    pub async fn list_all_class_assignments_impl(&self, class_id: i64) -> Result<Vec<Assignment>> {
        let assignments = Assignments::find()
            .filter(Column::ClassId.eq(class_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| ClassHubError::database_operation(format!("查询作业列表失败: {e}")))?;

        Ok(assignments.into_iter().map(|m| m.into_assignment()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{memory_storage, seed_class, seed_user};
    use crate::models::{
        assignments::requests::{CreateAssignmentRequest, UpdateAssignmentRequest},
        common::PaginationQuery,
    };

    fn extra_of(pairs: &[(&str, serde_json::Value)]) -> serde_json::Map<String, serde_json::Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn create_request(
        title: &str,
        extra: serde_json::Map<String, serde_json::Value>,
    ) -> CreateAssignmentRequest {
        CreateAssignmentRequest {
            title: title.to_string(),
            description: Some(format!("{title} 的说明")),
            deadline: None,
            extra,
        }
    }

    #[tokio::test]
    async fn test_create_assignment_persists_extra_fields() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "assign_t1").await;
        let class = seed_class(&storage, &teacher, "Calculus", None).await;

        let created = storage
            .create_assignment_impl(
                class.id,
                teacher.id,
                create_request(
                    "Week 1",
                    extra_of(&[
                        ("points", serde_json::json!(100)),
                        ("attachments", serde_json::json!(["syllabus.pdf"])),
                    ]),
                ),
            )
            .await
            .unwrap();

        assert_eq!(created.class_id, class.id);
        assert_eq!(created.created_by, teacher.id);
        assert!(created.updated_by.is_none());
        assert_eq!(created.extra["points"], serde_json::json!(100));

        let fetched = storage
            .get_assignment_impl(class.id, created.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.title, "Week 1");
        assert_eq!(
            fetched.extra["attachments"],
            serde_json::json!(["syllabus.pdf"])
        );
    }

    #[tokio::test]
    async fn test_update_assignment_overwrites_supplied_keys_only() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "assign_t2").await;
        let grader = seed_user(&storage, "assign_t2b").await;
        let class = seed_class(&storage, &teacher, "Statistics", None).await;

        let created = storage
            .create_assignment_impl(
                class.id,
                teacher.id,
                create_request(
                    "Survey",
                    extra_of(&[
                        ("points", serde_json::json!(100)),
                        ("room", serde_json::json!("A1")),
                    ]),
                ),
            )
            .await
            .unwrap();

        let updated = storage
            .update_assignment_impl(
                class.id,
                created.id,
                grader.id,
                UpdateAssignmentRequest {
                    title: Some("Survey v2".to_string()),
                    description: None,
                    deadline: Some(chrono::Utc::now() + chrono::Duration::days(7)),
                    extra: extra_of(&[("points", serde_json::json!(150))]),
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.title, "Survey v2");
        // 未提供的字段保持原值
        assert_eq!(updated.description, created.description);
        assert!(updated.deadline.is_some());
        // 扩展字段按键合并
        assert_eq!(updated.extra["points"], serde_json::json!(150));
        assert_eq!(updated.extra["room"], serde_json::json!("A1"));
        assert_eq!(updated.updated_by, Some(grader.id));
    }

    #[tokio::test]
    async fn test_assignment_operations_scoped_to_class() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "assign_t3").await;
        let class_a = seed_class(&storage, &teacher, "Class A", None).await;
        let class_b = seed_class(&storage, &teacher, "Class B", None).await;

        let assignment = storage
            .create_assignment_impl(
                class_a.id,
                teacher.id,
                create_request("Only in A", Default::default()),
            )
            .await
            .unwrap();

        // 其他班级的 ID 查不到、改不动、删不掉
        assert!(
            storage
                .get_assignment_impl(class_b.id, assignment.id)
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            storage
                .update_assignment_impl(
                    class_b.id,
                    assignment.id,
                    teacher.id,
                    UpdateAssignmentRequest {
                        title: Some("hijack".to_string()),
                        description: None,
                        deadline: None,
                        extra: Default::default(),
                    },
                )
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            !storage
                .delete_assignment_impl(class_b.id, assignment.id)
                .await
                .unwrap()
        );

        let listed = storage
            .list_class_assignments_impl(class_b.id, PaginationQuery::default())
            .await
            .unwrap();
        assert!(listed.items.is_empty());
    }

    #[tokio::test]
    async fn test_delete_assignment_removes_row() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "assign_t4").await;
        let class = seed_class(&storage, &teacher, "Ethics", None).await;

        let assignment = storage
            .create_assignment_impl(
                class.id,
                teacher.id,
                create_request("Essay", Default::default()),
            )
            .await
            .unwrap();

        assert!(
            storage
                .delete_assignment_impl(class.id, assignment.id)
                .await
                .unwrap()
        );
        assert!(
            storage
                .get_assignment_impl(class.id, assignment.id)
                .await
                .unwrap()
                .is_none()
        );
        // 二次删除无行可删
        assert!(
            !storage
                .delete_assignment_impl(class.id, assignment.id)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_list_assignments_newest_first_with_pagination() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "assign_t5").await;
        let class = seed_class(&storage, &teacher, "Reading", None).await;

        let mut ids = Vec::new();
        for i in 0..3 {
            let a = storage
                .create_assignment_impl(
                    class.id,
                    teacher.id,
                    create_request(&format!("Week {i}"), Default::default()),
                )
                .await
                .unwrap();
            ids.push(a.id);
        }

        // 同秒创建时按 ID 降序补位，最后创建的排最前
        let first_page = storage
            .list_class_assignments_impl(class.id, PaginationQuery { page: 1, size: 2 })
            .await
            .unwrap();
        assert_eq!(first_page.pagination.total, 3);
        assert_eq!(first_page.pagination.total_pages, 2);
        assert_eq!(first_page.items.len(), 2);
        assert_eq!(first_page.items[0].id, ids[2]);
        assert_eq!(first_page.items[1].id, ids[1]);

        let second_page = storage
            .list_class_assignments_impl(class.id, PaginationQuery { page: 2, size: 2 })
            .await
            .unwrap();
        assert_eq!(second_page.items.len(), 1);
        assert_eq!(second_page.items[0].id, ids[0]);

        let all = storage.list_all_class_assignments_impl(class.id).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].id, ids[2]);
    }
}

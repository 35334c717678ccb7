use serde::Serialize;
use ts_rs::TS;

use super::entities::ClassMemberRole;

// 班级成员列表条目
//
// 展示层做过规范化：缺失的展示名补 "Unnamed User"，角色缺损按学生处理。
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../app/src/types/generated/class-member.ts")]
pub struct ClassMemberEntry {
    pub id: i64,
    pub user_id: i64,
    pub display_name: String,
    pub email: String,
    pub role: ClassMemberRole,
    pub joined_at: chrono::DateTime<chrono::Utc>,
    pub is_current_user: bool,
}

// 班级成员列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../app/src/types/generated/class-member.ts")]
pub struct ClassMemberListResponse {
    pub items: Vec<ClassMemberEntry>,
    pub total: i64,
}

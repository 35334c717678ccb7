use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::entities::Class;
use crate::models::class_members::entities::ClassMemberRole;
use crate::models::common::PaginationInfo;

// 用户班级列表条目（班级信息 + 本人在班级中的身份）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../app/src/types/generated/class.ts")]
pub struct UserClassEntry {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub role: ClassMemberRole,
    pub joined_at: chrono::DateTime<chrono::Utc>,
    pub class_code: String,
    pub created_by: i64,
}

// 用户班级列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../app/src/types/generated/class.ts")]
pub struct UserClassListResponse {
    pub pagination: PaginationInfo,
    pub items: Vec<UserClassEntry>,
}

// 班级详情响应，role 是请求者本人在该班级中的身份
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../app/src/types/generated/class.ts")]
pub struct ClassDetailResponse {
    pub class: Class,
    pub member_count: i64,
    pub role: ClassMemberRole,
}

use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

// 创建作业请求
//
// 固定字段之外的键不做校验，收进 extra 原样入库。
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../app/src/types/generated/assignment.ts")]
pub struct CreateAssignmentRequest {
    pub title: String,
    pub description: Option<String>,
    pub deadline: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(flatten)]
    #[ts(skip)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// 更新作业请求，未提供的字段保持原值
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../app/src/types/generated/assignment.ts")]
pub struct UpdateAssignmentRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub deadline: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(flatten)]
    #[ts(skip)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// 作业列表查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../app/src/types/generated/assignment.ts")]
pub struct AssignmentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
}

// 作业订阅握手参数
//
// WebSocket 握手带不了 Authorization 头，access token 走查询参数。
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../app/src/types/generated/assignment.ts")]
pub struct AssignmentWatchQuery {
    pub token: String,
}

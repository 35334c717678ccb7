use serde::Deserialize;
use ts_rs::TS;

// 用户创建请求（注册与存储层共用）
//
// password 字段在进入存储层前必须已经是 argon2 哈希。
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../app/src/types/generated/user.ts")]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
}

// 用户资料更新请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../app/src/types/generated/user.ts")]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub password: Option<String>,
}

use serde::Deserialize;
use ts_rs::TS;

// 创建班级请求
//
// max_users 不填时使用配置的默认上限。
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../app/src/types/generated/class.ts")]
pub struct CreateClassRequest {
    pub name: String,
    pub description: Option<String>,
    pub max_users: Option<i32>,
}

// 加入班级请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../app/src/types/generated/class.ts")]
pub struct JoinClassRequest {
    pub class_code: String,
}

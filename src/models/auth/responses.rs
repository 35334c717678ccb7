use crate::models::users::entities::User;
use serde::Serialize;
use ts_rs::TS;

// 登录成功响应，refresh token 走 HttpOnly cookie 不进响应体
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../app/src/types/generated/auth.ts")]
pub struct LoginResponse {
    pub access_token: String,
    /// access token 有效期，秒
    pub expires_in: i64,
    pub user: User,
    /// 签发时间
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 刷新令牌响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../app/src/types/generated/auth.ts")]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub expires_in: i64,
}

// GET /me 响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../app/src/types/generated/auth.ts")]
pub struct UserInfoResponse {
    pub user: User,
}

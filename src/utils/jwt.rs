//! JWT 签发与验证
//!
//! access token 走 Authorization 头，refresh token 走 HttpOnly Cookie。
//! 两类 token 共用一个 HS256 密钥，靠 claims 里的 token_type 区分，
//! 验证时类型不符直接按无效处理。

use actix_web::cookie::{Cookie, SameSite};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;

const TOKEN_TYPE_ACCESS: &str = "access";
const TOKEN_TYPE_REFRESH: &str = "refresh";
const REFRESH_COOKIE: &str = "refresh_token";

// 平台没有全局角色，claims 只携带用户标识和 token 类型
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 用户 ID
    pub sub: String,
    /// "access" 或 "refresh"
    pub token_type: String,
    /// 过期时间（Unix 秒）
    pub exp: usize,
    /// 签发时间（Unix 秒）
    pub iat: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

pub struct JwtUtils;

impl JwtUtils {
    fn secret() -> String {
        AppConfig::get().jwt.secret.clone()
    }

    /// 签发指定类型和有效期的 token
    pub fn generate_token_with_expiry(
        user_id: i64,
        token_type: &str,
        expiry: chrono::Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            token_type: token_type.to_string(),
            exp: (now + expiry).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        let key = EncodingKey::from_secret(Self::secret().as_ref());
        encode(&Header::default(), &claims, &key)
    }

    pub fn generate_access_token(user_id: i64) -> Result<String, jsonwebtoken::errors::Error> {
        let minutes = AppConfig::get().jwt.access_token_expiry;
        Self::generate_token_with_expiry(
            user_id,
            TOKEN_TYPE_ACCESS,
            chrono::Duration::minutes(minutes),
        )
    }

    /// 签发 refresh token，expiry 为 None 时用配置的默认天数
    pub fn generate_refresh_token(
        user_id: i64,
        expiry: Option<chrono::Duration>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let expiry = expiry.unwrap_or_else(|| {
            chrono::Duration::days(AppConfig::get().jwt.refresh_token_expiry)
        });
        Self::generate_token_with_expiry(user_id, TOKEN_TYPE_REFRESH, expiry)
    }

    /// 一次签发 access + refresh token
    pub fn generate_token_pair(
        user_id: i64,
        refresh_token_expiry: Option<chrono::Duration>,
    ) -> Result<TokenPair, jsonwebtoken::errors::Error> {
        Ok(TokenPair {
            access_token: Self::generate_access_token(user_id)?,
            refresh_token: Self::generate_refresh_token(user_id, refresh_token_expiry)?,
        })
    }

    /// 验签并返回 claims，过期校验由 jsonwebtoken 默认开启
    pub fn verify_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let key = DecodingKey::from_secret(Self::secret().as_ref());
        decode::<Claims>(token, &key, &Validation::default()).map(|data| data.claims)
    }

    fn verify_token_type(
        token: &str,
        expected: &str,
    ) -> Result<Claims, jsonwebtoken::errors::Error> {
        let claims = Self::verify_token(token)?;
        if claims.token_type != expected {
            return Err(jsonwebtoken::errors::ErrorKind::InvalidToken.into());
        }
        Ok(claims)
    }

    pub fn verify_access_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::verify_token_type(token, TOKEN_TYPE_ACCESS)
    }

    pub fn verify_refresh_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::verify_token_type(token, TOKEN_TYPE_REFRESH)
    }

    pub fn decode_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::verify_token(token)
    }

    /// 用 refresh token 换一个新的 access token
    pub fn refresh_access_token(
        refresh_token: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Self::verify_refresh_token(refresh_token)?;
        let user_id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| jsonwebtoken::errors::ErrorKind::InvalidToken)?;
        Self::generate_access_token(user_id)
    }

    fn build_refresh_cookie(
        value: String,
        max_age: actix_web::cookie::time::Duration,
    ) -> Cookie<'static> {
        Cookie::build(REFRESH_COOKIE, value)
            .path("/")
            .max_age(max_age)
            .same_site(SameSite::Strict)
            .http_only(true)
            // 生产环境只经 HTTPS 发送
            .secure(AppConfig::get().is_production())
            .finish()
    }

    pub fn create_refresh_token_cookie(refresh_token: &str) -> Cookie<'static> {
        let days = AppConfig::get().jwt.refresh_token_expiry;
        Self::build_refresh_cookie(
            refresh_token.to_string(),
            actix_web::cookie::time::Duration::days(days),
        )
    }

    /// max_age 置零的空 cookie，让浏览器删除已存的 refresh token
    pub fn create_empty_refresh_token_cookie() -> Cookie<'static> {
        Self::build_refresh_cookie(String::new(), actix_web::cookie::time::Duration::seconds(0))
    }

    pub fn extract_refresh_token_from_cookie(req: &actix_web::HttpRequest) -> Option<String> {
        req.cookie(REFRESH_COOKIE)
            .map(|cookie| cookie.value().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_token_round_trip() {
        let token = JwtUtils::generate_access_token(42).unwrap();
        let claims = JwtUtils::verify_access_token(&token).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.token_type, "access");
    }

    #[test]
    fn test_token_type_mismatch_rejected() {
        let refresh = JwtUtils::generate_refresh_token(7, None).unwrap();
        assert!(JwtUtils::verify_access_token(&refresh).is_err());
        assert!(JwtUtils::verify_refresh_token(&refresh).is_ok());
    }

    #[test]
    fn test_refresh_flow_issues_new_access_token() {
        let pair = JwtUtils::generate_token_pair(9, None).unwrap();
        let access = JwtUtils::refresh_access_token(&pair.refresh_token).unwrap();
        let claims = JwtUtils::verify_access_token(&access).unwrap();
        assert_eq!(claims.sub, "9");
    }

    #[test]
    fn test_empty_cookie_expires_immediately() {
        let cookie = JwtUtils::create_empty_refresh_token_cookie();
        assert_eq!(cookie.name(), "refresh_token");
        assert_eq!(
            cookie.max_age(),
            Some(actix_web::cookie::time::Duration::seconds(0))
        );
        assert!(cookie.value().is_empty());
    }
}

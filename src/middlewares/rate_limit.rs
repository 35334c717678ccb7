/*!
 * 速率限制中间件
 *
 * 固定窗口计数：同一限制键在窗口内的请求数超过上限后返回
 * 429 Too Many Requests，窗口由计数缓存的 TTL 充当。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use crate::middlewares::RateLimit;
 *
 * web::resource("/api/v1/classes/join")
 *     .route(web::post().to(join_class).wrap(RateLimit::join_code()))
 * ```
 *
 * ## 限制键
 *
 * - 已认证请求按用户 ID 计数（RequireJWT 先于本中间件执行时）
 * - 匿名请求按客户端 IP 计数
 * - 不同端点通过前缀隔离，互不占用额度
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::CONTENT_TYPE,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::net::IpAddr;
use std::rc::Rc;
use std::time::Duration;
use tracing::warn;

use crate::models::{ApiResponse, ErrorCode};

/// 全局计数缓存，键为 "前缀:user:{id}" 或 "前缀:ip:{addr}"
///
/// TTL 即限制窗口，所有预设共用 60 秒。
static HIT_COUNTERS: Lazy<Cache<String, u32>> = Lazy::new(|| {
    Cache::builder()
        .time_to_live(Duration::from_secs(60))
        .max_capacity(100_000)
        .build()
});

/// 速率限制配置
#[derive(Clone)]
pub struct RateLimit {
    /// 窗口内允许的最大请求数
    max_requests: u32,
    /// 窗口长度（秒），用于 Retry-After 响应头
    window_secs: u64,
    /// 端点前缀，隔离不同端点的计数
    key_prefix: String,
}

impl RateLimit {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs,
            key_prefix: String::new(),
        }
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.key_prefix = prefix.to_string();
        self
    }

    /// 登录：5 次/分钟
    pub fn login() -> Self {
        Self::new(5, 60).with_prefix("login")
    }

    /// 注册：3 次/分钟
    pub fn register() -> Self {
        Self::new(3, 60).with_prefix("register")
    }

    /// 刷新令牌：10 次/分钟
    pub fn refresh_token() -> Self {
        Self::new(10, 60).with_prefix("refresh")
    }

    /// 凭加入码入班：10 次/分钟，加入码只有 6 位，必须拦枚举
    pub fn join_code() -> Self {
        Self::new(10, 60).with_prefix("join_code")
    }

    /// 通用接口：100 次/分钟
    pub fn api() -> Self {
        Self::new(100, 60).with_prefix("api")
    }

    /// 当前请求的限制键
    ///
    /// RequireJWT 在外层时扩展里已有用户，按用户计数；否则退回 IP。
    fn request_key(&self, req: &ServiceRequest) -> String {
        use crate::models::users::entities::User;

        let who = match req.extensions().get::<User>() {
            Some(user) => format!("user:{}", user.id),
            None => format!("ip:{}", client_ip(req)),
        };
        if self.key_prefix.is_empty() {
            who
        } else {
            format!("{}:{}", self.key_prefix, who)
        }
    }
}

/// 请求的客户端 IP
///
/// 转发头可以被伪造，只接受能解析成 IpAddr 的值；
/// 部署在反向代理之后时代理必须负责覆写 X-Forwarded-For / X-Real-IP。
fn client_ip(req: &ServiceRequest) -> String {
    let peer = req
        .connection_info()
        .realip_remote_addr()
        .map(|s| s.to_string());

    if let Some(ref ip) = peer
        && ip.parse::<IpAddr>().is_ok()
    {
        return ip.clone();
    }

    // X-Forwarded-For 取第一跳
    if let Some(forwarded) = req.headers().get("X-Forwarded-For")
        && let Ok(value) = forwarded.to_str()
        && let Some(first) = value.split(',').next()
        && first.trim().parse::<IpAddr>().is_ok()
    {
        return first.trim().to_string();
    }

    if let Some(real_ip) = req.headers().get("X-Real-IP")
        && let Ok(value) = real_ip.to_str()
        && value.trim().parse::<IpAddr>().is_ok()
    {
        return value.trim().to_string();
    }

    peer.unwrap_or_else(|| "unknown".to_string())
}

fn too_many_requests(retry_after: u64) -> HttpResponse {
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .insert_header(("Retry-After", retry_after.to_string()))
        .insert_header(("X-RateLimit-Remaining", "0"))
        .json(ApiResponse::<()>::error_empty(
            ErrorCode::RateLimitExceeded,
            "请求过于频繁，请稍后再试",
        ))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            config: self.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    config: RateLimit,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let config = self.config.clone();

        Box::pin(async move {
            let cache_key = config.request_key(&req);

            // 本次请求计入后的总次数
            let hits = HIT_COUNTERS.get(&cache_key).await.unwrap_or(0) + 1;

            if hits > config.max_requests {
                warn!(
                    "Rate limit exceeded for key: {} ({}/{})",
                    cache_key,
                    hits - 1,
                    config.max_requests
                );
                return Ok(
                    req.into_response(too_many_requests(config.window_secs).map_into_right_body())
                );
            }

            // 被拒绝的请求不计入窗口
            HIT_COUNTERS.insert(cache_key, hits).await;

            req.extensions_mut().insert(RateLimitInfo {
                remaining: config.max_requests - hits,
                limit: config.max_requests,
                reset: config.window_secs,
            });

            let res = srv.call(req).await?.map_into_left_body();
            Ok(res)
        })
    }
}

/// 当前窗口的额度信息，写进请求扩展供响应侧取用
#[derive(Clone)]
pub struct RateLimitInfo {
    pub remaining: u32,
    pub limit: u32,
    pub reset: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_carry_expected_quota() {
        let login = RateLimit::login();
        assert_eq!(login.max_requests, 5);
        assert_eq!(login.window_secs, 60);
        assert_eq!(login.key_prefix, "login");

        let join = RateLimit::join_code();
        assert_eq!(join.max_requests, 10);
        assert_eq!(join.key_prefix, "join_code");

        assert_eq!(RateLimit::register().max_requests, 3);
    }

    #[test]
    fn test_prefix_composition() {
        let limiter = RateLimit::new(1, 60).with_prefix("demo");
        assert_eq!(limiter.key_prefix, "demo");

        let bare = RateLimit::new(1, 60);
        assert!(bare.key_prefix.is_empty());
    }
}

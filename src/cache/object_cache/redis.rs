use async_trait::async_trait;
use redis::{AsyncCommands, aio::MultiplexedConnection};
use tracing::{debug, error};

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;

declare_object_cache_plugin!("redis", RedisObjectCache);

pub struct RedisObjectCache {
    client: redis::Client,
    key_prefix: String,
    ttl: u64, // 秒
}

impl RedisObjectCache {
    pub fn new() -> Result<Self, String> {
        let config = AppConfig::get();
        let redis_config = &config.cache.redis;

        let client = redis::Client::open(redis_config.url.clone())
            .map_err(|e| format!("Invalid Redis URL: {e}"))?;

        // 启动时做一次同步 PING，连不上就让上层回退到内存缓存
        let mut conn = client
            .get_connection()
            .map_err(|e| format!("Redis connection failed: {e}"))?;
        let response: String = redis::cmd("PING")
            .query(&mut conn)
            .map_err(|e| format!("Redis ping failed: {e}"))?;

        debug!(
            "RedisObjectCache ready (ping: {}, prefix: '{}', TTL: {}s)",
            response, redis_config.key_prefix, config.cache.default_ttl
        );

        Ok(Self {
            client,
            key_prefix: redis_config.key_prefix.clone(),
            ttl: config.cache.default_ttl,
        })
    }

    /// 拿一条多路复用连接，失败时记日志并返回 None，调用方按各自语义降级。
    async fn connect(&self, op: &str) -> Option<MultiplexedConnection> {
        match self.client.get_multiplexed_async_connection().await {
            Ok(conn) => Some(conn),
            Err(e) => {
                error!("Redis connection unavailable during {}: {}", op, e);
                None
            }
        }
    }

    fn prefixed(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl ObjectCache for RedisObjectCache {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        let Some(mut conn) = self.connect("GET").await else {
            // 连接异常和值异常对调用方是一回事，都不能当缓存未命中
            return CacheResult::ExistsButNoValue;
        };

        match conn.get::<String, Option<String>>(self.prefixed(key)).await {
            Ok(Some(data)) => {
                debug!("Redis hit: {}", key);
                CacheResult::Found(data)
            }
            Ok(None) => {
                debug!("Redis miss: {}", key);
                CacheResult::NotFound
            }
            Err(e) => {
                error!("Redis GET '{}' failed: {}", key, e);
                CacheResult::ExistsButNoValue
            }
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        let Some(mut conn) = self.connect("SETEX").await else {
            return;
        };

        // ttl 为 0 时使用默认 TTL
        let effective_ttl = if ttl == 0 { self.ttl } else { ttl };

        if let Err(e) = conn
            .set_ex::<String, String, ()>(self.prefixed(&key), value, effective_ttl)
            .await
        {
            error!("Redis SETEX '{}' failed: {}", key, e);
        }
    }

    async fn remove(&self, key: &str) {
        let Some(mut conn) = self.connect("DEL").await else {
            return;
        };

        match conn.del::<String, i32>(self.prefixed(key)).await {
            Ok(0) => debug!("Redis DEL '{}': no such key", key),
            Ok(_) => {}
            Err(e) => error!("Redis DEL '{}' failed: {}", key, e),
        }
    }
}

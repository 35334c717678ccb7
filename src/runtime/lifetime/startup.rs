use std::sync::Arc;
use tracing::warn;

use crate::cache::{ObjectCache, register::get_object_cache_plugin};
use crate::config::AppConfig;
use crate::storage::Storage;

/// 启动阶段准备好的基础设施句柄，注入 actix 的 app_data
pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

/// 按配置创建缓存后端，失败或未注册时退回内存缓存
async fn create_cache() -> Result<Arc<dyn ObjectCache>, Box<dyn std::error::Error>> {
    let configured = AppConfig::get().cache.cache_type.clone();

    let mut candidates = vec![configured.as_str()];
    if configured != "moka" {
        candidates.push("moka");
    }

    for name in candidates {
        let Some(constructor) = get_object_cache_plugin(name) else {
            warn!("Cache backend '{}' not found in registry", name);
            continue;
        };
        match constructor().await {
            Ok(cache) => {
                warn!("Cache backend '{}' ready", name);
                return Ok(Arc::from(cache));
            }
            Err(e) => {
                warn!("Failed to create '{}' cache backend: {}", name, e);
            }
        }
    }

    Err(format!("No cache backend available (tried: {configured})").into())
}

/// 服务启动前的准备：先装 TLS provider，再初始化存储（含迁移）和缓存
pub async fn prepare_server_startup() -> StartupContext {
    // redis 的 TLS 连接依赖进程级默认 crypto provider
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
    }

    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized, migrations applied");

    let cache = create_cache().await.expect("Failed to create cache");

    StartupContext { storage, cache }
}

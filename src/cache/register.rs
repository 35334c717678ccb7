//! 缓存后端注册表
//!
//! 后端通过 `declare_object_cache_plugin!` 在 main 之前登记构造函数，
//! 启动逻辑按配置名取出并实例化。

use crate::cache::traits::ObjectCache;
use crate::errors::Result;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::{future::Future, pin::Pin, sync::Arc};

pub type BoxedObjectCacheFuture =
    Pin<Box<dyn Future<Output = Result<Box<dyn ObjectCache>>> + Send>>;
pub type ObjectCacheConstructor = Arc<dyn Fn() -> BoxedObjectCacheFuture + Send + Sync>;

static OBJECT_CACHE_REGISTRY: Lazy<DashMap<String, ObjectCacheConstructor>> =
    Lazy::new(DashMap::new);

/// 登记一个缓存后端，同名后注册的覆盖先注册的
pub fn register_object_cache_plugin<S: Into<String>>(name: S, constructor: ObjectCacheConstructor) {
    OBJECT_CACHE_REGISTRY.insert(name.into(), constructor);
}

/// 按名称取出已登记的构造函数
pub fn get_object_cache_plugin(name: &str) -> Option<ObjectCacheConstructor> {
    OBJECT_CACHE_REGISTRY
        .get(name)
        .map(|entry| entry.value().clone())
}

pub fn debug_object_cache_registry() {
    let names: Vec<String> = OBJECT_CACHE_REGISTRY
        .iter()
        .map(|entry| entry.key().clone())
        .collect();
    if names.is_empty() {
        tracing::debug!("No object cache backends registered");
    } else {
        tracing::debug!("Registered object cache backends: {}", names.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_backends_registered() {
        // ctor 注册发生在测试进程启动时
        assert!(get_object_cache_plugin("moka").is_some());
        assert!(get_object_cache_plugin("redis").is_some());
        assert!(get_object_cache_plugin("memcached").is_none());
    }
}

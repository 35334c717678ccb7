use async_trait::async_trait;

/// 缓存查询结果
///
/// `ExistsButNoValue` 表示后端异常或值不可用，调用方应按未命中处理
/// 且不要回写覆盖。
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    ExistsButNoValue,
}

/// 对象缓存统一接口
///
/// 值以 JSON 字符串存取，序列化由调用方负责。
#[async_trait]
pub trait ObjectCache: Send + Sync {
    /// 按键读取原始字符串值
    async fn get_raw(&self, key: &str) -> CacheResult<String>;

    /// 写入原始字符串值，ttl 为 0 时使用后端默认 TTL
    async fn insert_raw(&self, key: String, value: String, ttl: u64);

    /// 删除指定键
    async fn remove(&self, key: &str);
}

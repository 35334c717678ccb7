//! 对象缓存抽象与插件注册
//!
//! 缓存后端以插件形式注册，进程启动时通过 `declare_object_cache_plugin!`
//! 自动登记到注册表，运行时按配置选择后端。

pub mod object_cache;
pub mod register;
pub mod traits;

pub use traits::{CacheResult, ObjectCache};

/// 声明并注册一个对象缓存插件
///
/// 插件类型需要提供 `fn new() -> Result<Self, String>`。
/// 注册发生在 main 之前，注册失败不会中断进程，由启动逻辑兜底。
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:expr, $plugin:ident) => {
        ::paste::paste! {
            #[::ctor::ctor]
            fn [<__register_object_cache_ $plugin:snake>]() {
                $crate::cache::register::register_object_cache_plugin(
                    $name,
                    ::std::sync::Arc::new(|| {
                        ::std::boxed::Box::pin(async {
                            match $plugin::new() {
                                Ok(cache) => Ok(::std::boxed::Box::new(cache)
                                    as ::std::boxed::Box<dyn $crate::cache::ObjectCache>),
                                Err(e) => Err(
                                    $crate::errors::ClassHubError::cache_connection(e),
                                ),
                            }
                        })
                            as $crate::cache::register::BoxedObjectCacheFuture
                    }),
                );
            }
        }
    };
}

//! 键值存储封装模块
//!
//! `KeyValueStorage` 是会话存储的注入点：生产环境使用浏览器的
//! `window.localStorage`，测试使用内存实现。

/// 字符串键值存储接口
///
/// 所有操作都不会 panic，失败时分别返回 `None` / `false`。
pub trait KeyValueStorage {
    /// 获取存储的字符串值
    fn get(&self, key: &str) -> Option<String>;

    /// 设置存储值，成功返回 `true`
    fn set(&self, key: &str, value: &str) -> bool;

    /// 删除存储的键值对，成功返回 `true`
    fn remove(&self, key: &str) -> bool;
}

/// 浏览器 LocalStorage
///
/// 零大小类型，可以自由复制并放入 Leptos 上下文。
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl KeyValueStorage for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) -> bool {
        Self::storage()
            .and_then(|s| s.set_item(key, value).ok())
            .is_some()
    }

    fn remove(&self, key: &str) -> bool {
        Self::storage()
            .and_then(|s| s.remove_item(key).ok())
            .is_some()
    }
}

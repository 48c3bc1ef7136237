//! LocalStorage 封装模块
//!
//! 使用 `web_sys::Storage` 提供简洁的本地存储接口。
//! 只用于"记住用户名"，令牌永远不进 LocalStorage。

pub const REMEMBERED_USERNAME_KEY: &str = "remembered_username";

/// 本地存储操作封装
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }

    /// 获取存储的字符串值
    pub fn get(key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    /// 设置存储值，返回是否成功
    pub fn set(key: &str, value: &str) -> bool {
        Self::storage()
            .and_then(|s| s.set_item(key, value).ok())
            .is_some()
    }

    /// 删除存储的键值对，返回是否成功
    pub fn delete(key: &str) -> bool {
        Self::storage()
            .and_then(|s| s.remove_item(key).ok())
            .is_some()
    }

    pub fn remembered_username() -> Option<String> {
        Self::get(REMEMBERED_USERNAME_KEY).filter(|u| !u.is_empty())
    }

    /// 勾选"记住我"时保存用户名，否则清除
    pub fn remember_username(username: &str, remember: bool) {
        let ok = if remember {
            Self::set(REMEMBERED_USERNAME_KEY, username)
        } else {
            Self::delete(REMEMBERED_USERNAME_KEY)
        };
        if !ok {
            log::warn!("localStorage unavailable, username not remembered");
        }
    }
}

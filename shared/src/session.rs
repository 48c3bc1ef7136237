//! 会话存储
//!
//! 令牌与角色保存在 Cookie 中（`access_token` / `user_type`，有效期 1 天）。
//! 具体的 Cookie 读写由 [`CookieStore`] 注入：浏览器里是 `document.cookie`，测试里是内存表。
//!
//! 每次写入或清除后都会通知订阅者，前端据此把响应式认证状态与 Cookie 保持一致，
//! 包括 API 客户端在收到 401 时触发的清除。

use crate::{COOKIE_ACCESS_TOKEN, COOKIE_USER_TYPE, Role, SESSION_COOKIE_DAYS};
use std::cell::{Cell, RefCell};

/// Cookie 读写抽象
pub trait CookieStore {
    fn get(&self, name: &str) -> Option<String>;
    fn set(&self, name: &str, value: &str, max_age_days: u32);
    fn remove(&self, name: &str);
}

/// 访问层级
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTier {
    Unauthenticated,
    /// 已登录的普通用户
    Restricted,
    Privileged,
}

/// 当前会话快照
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    pub token: Option<String>,
    pub role: Option<Role>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn new(token: impl Into<String>, role: Option<Role>) -> Self {
        Self {
            token: Some(token.into()),
            role,
        }
    }

    /// 只检查令牌是否存在，不校验有效期
    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// 没有令牌时角色没有意义
    pub fn is_admin(&self) -> bool {
        self.is_authenticated() && self.role.is_some_and(|r| r.is_admin())
    }

    pub fn tier(&self) -> SessionTier {
        if !self.is_authenticated() {
            SessionTier::Unauthenticated
        } else if self.is_admin() {
            SessionTier::Privileged
        } else {
            SessionTier::Restricted
        }
    }
}

type Listener = Box<dyn Fn(&Session)>;

/// 订阅句柄，用于取消订阅
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(u64);

pub struct SessionStore {
    cookies: Box<dyn CookieStore>,
    listeners: RefCell<Vec<(ListenerId, Listener)>>,
    next_id: Cell<u64>,
}

impl SessionStore {
    pub fn new(cookies: impl CookieStore + 'static) -> Self {
        Self {
            cookies: Box::new(cookies),
            listeners: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    pub fn snapshot(&self) -> Session {
        Session {
            token: self.token(),
            role: self.role(),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.cookies
            .get(COOKIE_ACCESS_TOKEN)
            .filter(|t| !t.is_empty())
    }

    pub fn role(&self) -> Option<Role> {
        self.cookies
            .get(COOKIE_USER_TYPE)
            .filter(|r| !r.is_empty())
            .map(|r| Role::parse(&r))
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// 登录成功后写入令牌与角色
    ///
    /// 角色缺失时删除旧的角色 Cookie，避免沿用上一个会话的角色。
    pub fn store(&self, token: &str, role: Option<Role>) {
        self.cookies
            .set(COOKIE_ACCESS_TOKEN, token, SESSION_COOKIE_DAYS);
        match role {
            Some(role) => self
                .cookies
                .set(COOKIE_USER_TYPE, role.as_str(), SESSION_COOKIE_DAYS),
            None => self.cookies.remove(COOKIE_USER_TYPE),
        }
        self.notify();
    }

    /// 删除两个 Cookie，无论当前是否已登录
    pub fn clear(&self) {
        self.cookies.remove(COOKIE_ACCESS_TOKEN);
        self.cookies.remove(COOKIE_USER_TYPE);
        self.notify();
    }

    pub fn subscribe(&self, listener: impl Fn(&Session) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: ListenerId) {
        self.listeners.borrow_mut().retain(|(lid, _)| *lid != id);
    }

    fn notify(&self) {
        let session = self.snapshot();
        for (_, listener) in self.listeners.borrow().iter() {
            listener(&session);
        }
    }
}

// =========================================================
// 测试工具: MemoryCookies
// =========================================================

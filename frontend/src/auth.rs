//! 认证模块
//!
//! 管理用户认证状态，与路由系统解耦。
//! 会话真正保存在 Cookie 中（`SessionStore`），这里只维护一个与之同步的响应式快照：
//! 任何写入或清除（包括 API 客户端遇到 401 时的清除）都会通过订阅回调更新信号，
//! 路由服务再根据信号变化自动重定向。

use crate::config::AppConfig;
use crate::web::{BrowserCookies, FetchClient};
use gatewise_shared::{ApiClient, Session, SessionStore};
use leptos::prelude::*;
use std::rc::Rc;

/// 浏览器环境下的 API 客户端
pub type Api = ApiClient<FetchClient>;

const LOGIN_FAILED: &str = "Invalid username or password";

/// 认证上下文
///
/// `ApiClient` 内部使用 `Rc`，不是 `Send` 的，因此放在本地存储的 `StoredValue` 里。
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 会话快照（只读）
    pub session: ReadSignal<Session>,
    api: StoredValue<Api, leptos::prelude::LocalStorage>,
}

impl AuthContext {
    /// 创建认证上下文并订阅会话变化
    pub fn new(config: &AppConfig) -> Self {
        let store = Rc::new(SessionStore::new(BrowserCookies));
        let (session, set_session) = signal(store.snapshot());

        store.subscribe(move |s| {
            let _ = set_session.try_set(s.clone());
        });

        let api = ApiClient::new(&config.api_base_url, FetchClient, store);
        Self {
            session,
            api: StoredValue::new_local(api),
        }
    }

    /// 获取 API 客户端（克隆开销只是几个 `Rc`）
    pub fn api(&self) -> Api {
        self.api.get_value()
    }

    /// 获取会话信号（用于路由服务注入）
    pub fn session_signal(&self) -> Signal<Session> {
        let session = self.session;
        Signal::derive(move || session.get())
    }

    pub fn is_admin(&self) -> Signal<bool> {
        let session = self.session;
        Signal::derive(move || session.with(Session::is_admin))
    }

    /// 登录；所有失败都折叠为同一条提示，不暴露账号是否存在
    pub async fn login(&self, username: String, password: String) -> Result<(), String> {
        match self.api().login(&username, &password).await {
            Ok(_) => Ok(()),
            Err(e) => {
                log::warn!("login failed for {username}: {e}");
                Err(LOGIN_FAILED.to_string())
            }
        }
    }

    /// 注销并清除状态
    ///
    /// 导航将由路由服务的认证状态监听自动处理。
    pub fn logout(&self) {
        self.api().logout();
    }

    /// 先通知服务端注销，再清除本地状态
    pub async fn server_logout(&self) {
        self.api().server_logout().await;
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 从 Context 获取配置
pub fn use_config() -> AppConfig {
    use_context::<AppConfig>().expect("AppConfig should be provided")
}

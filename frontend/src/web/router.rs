//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，实现高内聚：
//! 所有对 window.history 的操作都集中在此模块。
//! 实现了"监听 -> 守卫 -> 处理 -> 加载"的导航流程，守卫决策来自 `gatewise_shared::route::guard`。

use gatewise_shared::Session;
use gatewise_shared::route::{AppRoute, GuardDecision, guard};
use leptos::prelude::*;
use wasm_bindgen::prelude::*;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态（内部工具函数）
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（内部工具函数，用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 通过注入会话信号实现与认证系统的解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前路由（只读信号）
    current_route: ReadSignal<AppRoute>,
    /// 设置当前路由（写入信号）
    set_route: WriteSignal<AppRoute>,
    /// 会话快照（注入的信号，实现解耦）
    session: Signal<Session>,
}

impl RouterService {
    /// 创建新的路由服务，首次加载同样经过守卫
    fn new(session: Signal<Session>) -> Self {
        let requested = AppRoute::from_path(&current_path());
        let decision = guard(&requested, &session.get_untracked());
        if let GuardDecision::Redirect { to, .. } = decision {
            log::info!("[Router] Initial load of {requested} redirected to {to}");
            replace_history_state(&to.to_path());
        }
        let (current_route, set_route) = signal(decision.target());

        Self {
            current_route,
            set_route,
            session,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// **核心方法：导航与守卫**
    pub fn navigate(&self, path: &str) {
        self.navigate_to_route(AppRoute::from_path(path));
    }

    /// 导航到指定路由
    ///
    /// 守卫放行时 pushState；重定向时按守卫要求 replaceState，后退键不会回到被拒绝的页面。
    pub fn navigate_to_route(&self, target_route: AppRoute) {
        let session = self.session.get_untracked();
        match guard(&target_route, &session) {
            GuardDecision::Render(route) => {
                push_history_state(&route.to_path());
                self.set_route.set(route);
            }
            GuardDecision::Redirect { to, replace } => {
                log::info!("[Router] Access to {target_route} denied, redirecting to {to}");
                if replace {
                    replace_history_state(&to.to_path());
                } else {
                    push_history_state(&to.to_path());
                }
                self.set_route.set(to);
            }
        }
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let set_route = self.set_route;
        let session = self.session;

        let closure = Closure::<dyn Fn()>::new(move || {
            let target_route = AppRoute::from_path(&current_path());

            // popstate 时也执行守卫逻辑
            let decision = guard(&target_route, &session.get_untracked());
            if let GuardDecision::Redirect { to, .. } = decision {
                log::info!("[Router] History entry {target_route} denied, redirecting to {to}");
                replace_history_state(&to.to_path());
            }
            set_route.set(decision.target());
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 设置会话变化时的自动重定向
    ///
    /// 登录成功后离开登录页；注销、401 清除会话或角色变化后重新守卫当前页。
    fn setup_auth_redirect(&self) {
        let current_route = self.current_route;
        let set_route = self.set_route;
        let session = self.session;

        Effect::new(move |_| {
            let session = session.get();
            let route = current_route.get_untracked();

            if session.is_authenticated() && route.should_redirect_when_authenticated() {
                let redirect = AppRoute::auth_success_redirect();
                push_history_state(&redirect.to_path());
                set_route.set(redirect);
                log::info!("[Router] Auth state changed: logged in, redirecting to {redirect}.");
                return;
            }

            if let GuardDecision::Redirect { to, .. } = guard(&route, &session) {
                replace_history_state(&to.to_path());
                set_route.set(to);
                log::info!("[Router] Auth state changed: {route} no longer allowed, redirecting to {to}.");
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(session: Signal<Session>) -> RouterService {
    let router = RouterService::new(session);

    // 初始化监听器
    router.init_popstate_listener();
    router.setup_auth_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 会话信号
    session: Signal<Session>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    provide_router(session);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}

/// 站内链接，点击时走路由服务而不是整页跳转
#[component]
pub fn Link(
    /// 目标路由
    to: AppRoute,
    #[prop(optional, into)] class: String,
    /// 子内容
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let on_click = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        router.navigate_to_route(to);
    };

    view! {
        <a href=to.to_path() class=class on:click=on_click>
            {children()}
        </a>
    }
}

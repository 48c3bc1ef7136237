//! GateWise 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `gatewise_shared::route`: 路由定义与守卫（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `auth`: 认证状态管理
//! - `hooks`: 列表页共用的分页状态
//! - `components`: 通用 UI 组件
//! - `pages`: 各个路由对应的页面

mod auth;
mod config;
mod hooks;
mod components {
    pub mod chart;
    pub mod form;
    pub mod layout;
    pub mod notification;
    pub mod table;
}
mod pages {
    pub mod dashboard;
    pub mod history;
    pub mod info;
    pub mod login;
    pub mod monitoring;
    pub mod parking_spaces;
    pub mod payments;
    pub mod plans;
    pub mod reports;
    pub mod settings;
    pub mod subscriptions;
    pub mod users;
    pub mod vehicles;
}

pub use config::AppConfig;

use crate::auth::AuthContext;
use crate::components::layout::Shell;
use crate::components::notification::{Toast, provide_notifier};
use crate::pages::dashboard::DashboardPage;
use crate::pages::history::HistoryPage;
use crate::pages::info::{
    AboutPage, AlertsPage, ContactInternalPage, ContactPage, HelpPage, LandingPage, NotFoundPage,
};
use crate::pages::login::LoginPage;
use crate::pages::monitoring::MonitoringPage;
use crate::pages::parking_spaces::{
    AddParkingSpacePage, EditParkingSpacePage, ParkingLotPage, ParkingSpacesPage,
};
use crate::pages::payments::{AddPaymentPage, PaymentLinkPage, PaymentsPage};
use crate::pages::plans::{AddPlanPage, EditPlanPage, PlansPage};
use crate::pages::reports::ReportsPage;
use crate::pages::settings::SettingsPage;
use crate::pages::subscriptions::{AddSubscriptionPage, AssignSpacesPage, SubscriptionsPage};
use crate::pages::users::{AddUserPage, EditUserPage, UsersPage};
use crate::pages::vehicles::{AddVehiclePage, EditVehiclePage, VehiclesPage};

use gatewise_shared::route::{AppRoute, RouteAccess};
use leptos::prelude::*;

// 浏览器 API 适配层
// 共享 crate 只定义 trait（HTTP、Cookie），这里给出基于 web_sys 的实现。
pub(crate) mod web {
    mod cookies;
    mod http;
    pub mod router;
    mod socket;
    mod storage;

    pub use cookies::BrowserCookies;
    pub use http::FetchClient;
    pub use socket::MonitorSocket;
    pub use storage::LocalStorage;
}

use web::router::{Router, RouterOutlet};

/// 登录后页面的内容部分
fn app_page(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Dashboard => view! { <DashboardPage /> }.into_any(),
        AppRoute::Vehicles => view! { <VehiclesPage /> }.into_any(),
        AppRoute::AddVehicle => view! { <AddVehiclePage /> }.into_any(),
        AppRoute::EditVehicle(id) => view! { <EditVehiclePage id=id /> }.into_any(),
        AppRoute::Subscriptions => view! { <SubscriptionsPage /> }.into_any(),
        AppRoute::AddSubscription => view! { <AddSubscriptionPage /> }.into_any(),
        AppRoute::AssignSpaces(id) => view! { <AssignSpacesPage id=id /> }.into_any(),
        AppRoute::Help => view! { <HelpPage /> }.into_any(),
        AppRoute::History => view! { <HistoryPage /> }.into_any(),
        AppRoute::Monitoring => view! { <MonitoringPage /> }.into_any(),
        AppRoute::Settings => view! { <SettingsPage /> }.into_any(),
        AppRoute::Users => view! { <UsersPage /> }.into_any(),
        AppRoute::AddUser => view! { <AddUserPage /> }.into_any(),
        AppRoute::EditUser(id) => view! { <EditUserPage id=id /> }.into_any(),
        AppRoute::Plans => view! { <PlansPage /> }.into_any(),
        AppRoute::AddPlan => view! { <AddPlanPage /> }.into_any(),
        AppRoute::EditPlan(id) => view! { <EditPlanPage id=id /> }.into_any(),
        AppRoute::ParkingSpaces => view! { <ParkingSpacesPage /> }.into_any(),
        AppRoute::AddParkingSpace => view! { <AddParkingSpacePage /> }.into_any(),
        AppRoute::EditParkingSpace(id) => view! { <EditParkingSpacePage id=id /> }.into_any(),
        AppRoute::ParkingLot => view! { <ParkingLotPage /> }.into_any(),
        AppRoute::Reports => view! { <ReportsPage /> }.into_any(),
        AppRoute::Payments => view! { <PaymentsPage /> }.into_any(),
        AppRoute::AddPayment => view! { <AddPaymentPage /> }.into_any(),
        AppRoute::PaymentLink(id) => view! { <PaymentLinkPage id=id /> }.into_any(),
        AppRoute::Alerts => view! { <AlertsPage /> }.into_any(),
        AppRoute::ContactInternal | AppRoute::DashboardContact => {
            view! { <ContactInternalPage /> }.into_any()
        }
        _ => view! { <NotFoundPage /> }.into_any(),
    }
}

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件，需要登录的页面统一套上布局外壳。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Landing => view! { <LandingPage /> }.into_any(),
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::About => view! { <AboutPage /> }.into_any(),
        AppRoute::Contact => view! { <ContactPage /> }.into_any(),
        AppRoute::NotFound => view! { <NotFoundPage /> }.into_any(),
        route if route.access() == RouteAccess::Public => view! { <NotFoundPage /> }.into_any(),
        route => view! { <Shell>{app_page(route)}</Shell> }.into_any(),
    }
}

#[component]
pub fn App(config: AppConfig) -> impl IntoView {
    // 1. 创建认证上下文（会话来自 Cookie）
    let auth_ctx = AuthContext::new(&config);
    provide_context(config);
    provide_context(auth_ctx);

    // 2. 全局通知
    provide_notifier();

    // 3. 会话信号注入路由服务，路由守卫据此重定向
    let session = auth_ctx.session_signal();

    view! {
        <Router session=session>
            <RouterOutlet matcher=route_matcher />
        </Router>
        <Toast />
    }
}

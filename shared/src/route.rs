//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由、访问级别以及导航守卫。
//!
//! 客户端守卫只负责体验，真正的授权由服务端决定。

use crate::session::Session;
use std::fmt::Display;

/// 路由访问级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    Public,
    Authenticated,
    AdminOnly,
}

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    // ---- 公开页面 ----
    #[default]
    Landing,
    Login,
    About,
    Contact,
    /// 页面未找到
    NotFound,

    // ---- 登录后可访问 ----
    Dashboard,
    Vehicles,
    EditVehicle(i64),
    Subscriptions,
    Help,
    /// 当前用户自己的通行记录
    History,
    Monitoring,
    /// 支付链接：住户确认一笔付款
    PaymentLink(i64),

    // ---- 仅管理员 ----
    Settings,
    Users,
    AddUser,
    EditUser(i64),
    Plans,
    AddPlan,
    EditPlan(i64),
    ParkingSpaces,
    AddParkingSpace,
    EditParkingSpace(i64),
    Reports,
    Payments,
    AddPayment,
    Alerts,
    ContactInternal,
    DashboardContact,
    AddVehicle,
    AddSubscription,
    /// 为订阅分配车位
    AssignSpaces(i64),
    /// 车位占用布局图
    ParkingLot,
}

fn parse_id(segment: &str) -> Option<i64> {
    segment.parse::<i64>().ok().filter(|id| *id > 0)
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    ///
    /// 按段精确匹配：忽略查询串与片段，丢弃空段（因此 `/vehicles/` 与 `/vehicles` 等价）。
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let route = match segments.as_slice() {
            [] => Some(Self::Landing),
            ["login"] => Some(Self::Login),
            ["about"] => Some(Self::About),
            ["contact"] => Some(Self::Contact),

            ["dashboard"] => Some(Self::Dashboard),
            ["vehicles"] => Some(Self::Vehicles),
            ["vehicles", "add"] => Some(Self::AddVehicle),
            ["vehicles", id, "edit"] => parse_id(id).map(Self::EditVehicle),
            ["subscriptions"] => Some(Self::Subscriptions),
            ["subscriptions", "add"] => Some(Self::AddSubscription),
            ["subscriptions", id, "assign"] => parse_id(id).map(Self::AssignSpaces),
            ["help"] => Some(Self::Help),
            ["history"] => Some(Self::History),
            ["monitoring"] => Some(Self::Monitoring),

            ["settings"] => Some(Self::Settings),
            ["users"] => Some(Self::Users),
            ["users", "add"] => Some(Self::AddUser),
            ["users", id, "edit"] => parse_id(id).map(Self::EditUser),
            ["plans"] => Some(Self::Plans),
            ["plans", "add"] => Some(Self::AddPlan),
            ["plans", id, "edit"] => parse_id(id).map(Self::EditPlan),
            ["parking-spaces"] => Some(Self::ParkingSpaces),
            ["parking-spaces", "add"] => Some(Self::AddParkingSpace),
            ["parking-spaces", id, "edit"] => parse_id(id).map(Self::EditParkingSpace),
            ["reports"] => Some(Self::Reports),
            ["payments"] => Some(Self::Payments),
            ["payments", "add"] => Some(Self::AddPayment),
            ["payments", id, "pay"] => parse_id(id).map(Self::PaymentLink),
            ["parking-lot"] => Some(Self::ParkingLot),
            ["alerts"] => Some(Self::Alerts),
            ["contact-internal"] => Some(Self::ContactInternal),
            ["dashboard-contact"] => Some(Self::DashboardContact),
            _ => None,
        };
        route.unwrap_or(Self::NotFound)
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::Landing => "/".to_string(),
            Self::Login => "/login".to_string(),
            Self::About => "/about".to_string(),
            Self::Contact => "/contact".to_string(),
            Self::NotFound => "/404".to_string(),
            Self::Dashboard => "/dashboard".to_string(),
            Self::Vehicles => "/vehicles".to_string(),
            Self::EditVehicle(id) => format!("/vehicles/{id}/edit"),
            Self::Subscriptions => "/subscriptions".to_string(),
            Self::Help => "/help".to_string(),
            Self::History => "/history".to_string(),
            Self::Monitoring => "/monitoring".to_string(),
            Self::Settings => "/settings".to_string(),
            Self::Users => "/users".to_string(),
            Self::AddUser => "/users/add".to_string(),
            Self::EditUser(id) => format!("/users/{id}/edit"),
            Self::Plans => "/plans".to_string(),
            Self::AddPlan => "/plans/add".to_string(),
            Self::EditPlan(id) => format!("/plans/{id}/edit"),
            Self::ParkingSpaces => "/parking-spaces".to_string(),
            Self::AddParkingSpace => "/parking-spaces/add".to_string(),
            Self::EditParkingSpace(id) => format!("/parking-spaces/{id}/edit"),
            Self::Reports => "/reports".to_string(),
            Self::Payments => "/payments".to_string(),
            Self::AddPayment => "/payments/add".to_string(),
            Self::Alerts => "/alerts".to_string(),
            Self::ContactInternal => "/contact-internal".to_string(),
            Self::DashboardContact => "/dashboard-contact".to_string(),
            Self::AddVehicle => "/vehicles/add".to_string(),
            Self::AddSubscription => "/subscriptions/add".to_string(),
            Self::AssignSpaces(id) => format!("/subscriptions/{id}/assign"),
            Self::PaymentLink(id) => format!("/payments/{id}/pay"),
            Self::ParkingLot => "/parking-lot".to_string(),
        }
    }

    /// **核心守卫逻辑：定义该路由的访问级别**
    pub fn access(&self) -> RouteAccess {
        match self {
            Self::Landing | Self::Login | Self::About | Self::Contact | Self::NotFound => {
                RouteAccess::Public
            }
            Self::Dashboard
            | Self::Vehicles
            | Self::EditVehicle(_)
            | Self::Subscriptions
            | Self::Help
            | Self::History
            | Self::Monitoring
            | Self::PaymentLink(_) => RouteAccess::Authenticated,
            Self::Settings
            | Self::Users
            | Self::AddUser
            | Self::EditUser(_)
            | Self::Plans
            | Self::AddPlan
            | Self::EditPlan(_)
            | Self::ParkingSpaces
            | Self::AddParkingSpace
            | Self::EditParkingSpace(_)
            | Self::Reports
            | Self::Payments
            | Self::AddPayment
            | Self::Alerts
            | Self::ContactInternal
            | Self::DashboardContact
            | Self::AddVehicle
            | Self::AddSubscription
            | Self::AssignSpaces(_)
            | Self::ParkingLot => RouteAccess::AdminOnly,
        }
    }

    pub fn requires_auth(&self) -> bool {
        self.access() != RouteAccess::Public
    }

    /// 已认证用户登录成功后应离开的路由
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login)
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 获取认证成功（或权限不足）时的重定向目标
    pub fn auth_success_redirect() -> Self {
        Self::Dashboard
    }

    /// 页面标题
    pub fn title(&self) -> &'static str {
        match self {
            Self::Landing => "GateWise",
            Self::Login => "Login",
            Self::About => "About Us",
            Self::Contact | Self::ContactInternal | Self::DashboardContact => "Contact Us",
            Self::NotFound => "Page not found",
            Self::Dashboard => "Dashboard",
            Self::Vehicles => "Vehicles",
            Self::AddVehicle => "Add Vehicle",
            Self::EditVehicle(_) => "Edit Vehicle",
            Self::Subscriptions => "Subscriptions",
            Self::AddSubscription => "Add Subscription",
            Self::Help => "Help",
            Self::History => "Access History",
            Self::Monitoring => "Live Monitoring",
            Self::Settings => "Settings",
            Self::Users => "Users",
            Self::AddUser => "Add User",
            Self::EditUser(_) => "Edit User",
            Self::Plans => "Plans",
            Self::AddPlan => "Add Plan",
            Self::EditPlan(_) => "Edit Plan",
            Self::ParkingSpaces => "Parking Spaces",
            Self::AddParkingSpace => "Add Parking Space",
            Self::EditParkingSpace(_) => "Edit Parking Space",
            Self::Reports => "Reports",
            Self::Payments => "Payments",
            Self::AddPayment => "Add Payment",
            Self::Alerts => "Alerts",
            Self::PaymentLink(_) => "Complete Payment",
            Self::AssignSpaces(_) => "Assign Parking Spaces",
            Self::ParkingLot => "Parking Lot Layout",
        }
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

// =========================================================
// 导航守卫
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Render(AppRoute),
    Redirect { to: AppRoute, replace: bool },
}

impl GuardDecision {
    /// 最终落地的路由
    pub fn target(&self) -> AppRoute {
        match self {
            Self::Render(route) | Self::Redirect { to: route, .. } => *route,
        }
    }
}

/// 纯函数守卫：每次导航（包括首次加载与前进后退）都先经过这里
pub fn guard(route: &AppRoute, session: &Session) -> GuardDecision {
    match route.access() {
        RouteAccess::Public => GuardDecision::Render(*route),
        _ if !session.is_authenticated() => GuardDecision::Redirect {
            to: AppRoute::auth_failure_redirect(),
            replace: true,
        },
        RouteAccess::AdminOnly if !session.is_admin() => GuardDecision::Redirect {
            to: AppRoute::auth_success_redirect(),
            replace: true,
        },
        _ => GuardDecision::Render(*route),
    }
}

// =========================================================
// 侧边栏菜单
// =========================================================

const MENU: &[(AppRoute, &str)] = &[
    (AppRoute::Dashboard, "Dashboard"),
    (AppRoute::Vehicles, "Vehicles"),
    (AppRoute::Subscriptions, "Subscriptions"),
    (AppRoute::History, "My Access History"),
    (AppRoute::Monitoring, "Live Monitoring"),
    (AppRoute::Users, "Users"),
    (AppRoute::Plans, "Plans"),
    (AppRoute::ParkingSpaces, "Parking Spaces"),
    (AppRoute::ParkingLot, "Parking Lot"),
    (AppRoute::Payments, "Payments"),
    (AppRoute::Reports, "Reports"),
    (AppRoute::Alerts, "Alerts"),
    (AppRoute::Settings, "Settings"),
    (AppRoute::Help, "Help"),
];

/// 当前会话可以进入的菜单项
pub fn menu_for(session: &Session) -> Vec<(AppRoute, &'static str)> {
    MENU.iter()
        .copied()
        .filter(|(route, _)| guard(route, session) == GuardDecision::Render(*route))
        .collect()
}

/// 列表页对应的所属菜单（编辑页高亮其列表）
pub fn menu_parent(route: &AppRoute) -> AppRoute {
    match route {
        AppRoute::AddVehicle | AppRoute::EditVehicle(_) => AppRoute::Vehicles,
        AppRoute::AddSubscription | AppRoute::AssignSpaces(_) => AppRoute::Subscriptions,
        AppRoute::AddUser | AppRoute::EditUser(_) => AppRoute::Users,
        AppRoute::AddPlan | AppRoute::EditPlan(_) => AppRoute::Plans,
        AppRoute::AddParkingSpace | AppRoute::EditParkingSpace(_) => AppRoute::ParkingSpaces,
        AppRoute::AddPayment => AppRoute::Payments,
        AppRoute::DashboardContact | AppRoute::PaymentLink(_) => AppRoute::Dashboard,
        other => *other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;

    fn anonymous() -> Session {
        Session::anonymous()
    }

    fn user() -> Session {
        Session::new("tok", Some(Role::User))
    }

    fn admin() -> Session {
        Session::new("tok", Some(Role::Admin))
    }

    const PUBLIC: &[&str] = &["/", "/login", "/about", "/contact", "/no/such/page"];
    const ADMIN_ONLY: &[&str] = &[
        "/settings",
        "/users",
        "/users/add",
        "/users/4/edit",
        "/plans",
        "/plans/add",
        "/plans/2/edit",
        "/parking-spaces",
        "/parking-spaces/add",
        "/parking-spaces/8/edit",
        "/reports",
        "/payments",
        "/payments/add",
        "/alerts",
        "/contact-internal",
        "/dashboard-contact",
        "/vehicles/add",
        "/subscriptions/add",
        "/subscriptions/5/assign",
        "/parking-lot",
    ];
    const AUTHENTICATED: &[&str] = &[
        "/dashboard",
        "/vehicles",
        "/vehicles/3/edit",
        "/subscriptions",
        "/help",
        "/history",
        "/monitoring",
        "/payments/7/pay",
    ];

    #[test]
    fn test_public_paths_render_for_every_session() {
        for path in PUBLIC {
            let route = AppRoute::from_path(path);
            for session in [anonymous(), user(), admin()] {
                assert_eq!(guard(&route, &session), GuardDecision::Render(route), "{path}");
            }
        }
    }

    #[test]
    fn test_protected_paths_without_token_go_to_login() {
        for path in AUTHENTICATED.iter().chain(ADMIN_ONLY) {
            let decision = guard(&AppRoute::from_path(path), &anonymous());
            assert_eq!(
                decision,
                GuardDecision::Redirect {
                    to: AppRoute::Login,
                    replace: true
                },
                "{path}"
            );
        }
    }

    #[test]
    fn test_admin_only_paths_send_users_to_dashboard() {
        for path in ADMIN_ONLY {
            let route = AppRoute::from_path(path);
            assert_eq!(
                guard(&route, &user()),
                GuardDecision::Redirect {
                    to: AppRoute::Dashboard,
                    replace: true
                },
                "{path}"
            );
            assert_eq!(guard(&route, &admin()), GuardDecision::Render(route), "{path}");
        }
    }

    #[test]
    fn test_user_role_reaches_vehicles_and_subscriptions() {
        for path in AUTHENTICATED {
            let route = AppRoute::from_path(path);
            assert_eq!(guard(&route, &user()), GuardDecision::Render(route), "{path}");
        }
    }

    #[test]
    fn test_add_routes_are_admin_only() {
        for path in ["/vehicles/add", "/subscriptions/add"] {
            let route = AppRoute::from_path(path);
            assert_eq!(guard(&route, &user()).target(), AppRoute::Dashboard);
            assert_eq!(guard(&route, &admin()).target(), route);
        }
    }

    #[test]
    fn test_token_without_role_is_not_admin() {
        let session = Session::new("tok", None);
        assert_eq!(guard(&AppRoute::Users, &session).target(), AppRoute::Dashboard);
        assert_eq!(guard(&AppRoute::Vehicles, &session).target(), AppRoute::Vehicles);
    }

    #[test]
    fn test_dashboard_contact_is_not_dashboard() {
        assert_eq!(AppRoute::from_path("/dashboard-contact"), AppRoute::DashboardContact);
        assert_eq!(AppRoute::from_path("/dashboard"), AppRoute::Dashboard);
        assert_eq!(guard(&AppRoute::DashboardContact, &user()).target(), AppRoute::Dashboard);
        assert_eq!(guard(&AppRoute::Dashboard, &user()).target(), AppRoute::Dashboard);
    }

    #[test]
    fn test_matching_is_segment_aware() {
        assert_eq!(AppRoute::from_path("/vehicles/12/edit"), AppRoute::EditVehicle(12));
        assert_eq!(AppRoute::from_path("/vehicles//edit"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_path("/vehicles/abc/edit"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_path("/vehicles/12/edit/more"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_path("/usersx"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_path("/vehicles/"), AppRoute::Vehicles);
        assert_eq!(AppRoute::from_path("/plans?page=2#top"), AppRoute::Plans);
    }

    #[test]
    fn test_paths_round_trip() {
        for path in PUBLIC[..4].iter().chain(AUTHENTICATED).chain(ADMIN_ONLY) {
            assert_eq!(AppRoute::from_path(path).to_path(), *path);
        }
    }

    #[test]
    fn test_menu_is_filtered_by_role() {
        let user_menu: Vec<AppRoute> = menu_for(&user()).into_iter().map(|(r, _)| r).collect();
        assert!(user_menu.contains(&AppRoute::Vehicles));
        assert!(!user_menu.contains(&AppRoute::Users));
        assert!(!user_menu.contains(&AppRoute::Reports));

        let admin_menu = menu_for(&admin());
        assert_eq!(admin_menu.len(), MENU.len());
        assert!(menu_for(&anonymous()).is_empty());
    }

    #[test]
    fn test_edit_pages_highlight_their_list() {
        assert_eq!(menu_parent(&AppRoute::EditPlan(3)), AppRoute::Plans);
        assert_eq!(menu_parent(&AppRoute::AssignSpaces(3)), AppRoute::Subscriptions);
        assert_eq!(menu_parent(&AppRoute::Help), AppRoute::Help);
    }

    #[test]
    fn test_payment_link_is_open_to_residents() {
        let route = AppRoute::from_path("/payments/7/pay");
        assert_eq!(route, AppRoute::PaymentLink(7));
        assert_eq!(guard(&route, &user()).target(), route);
        assert_eq!(guard(&route, &anonymous()).target(), AppRoute::Login);
        // 支付列表仍然只对管理员开放
        assert_eq!(guard(&AppRoute::Payments, &user()).target(), AppRoute::Dashboard);
        assert_eq!(AppRoute::from_path("/payments/0/pay"), AppRoute::NotFound);
    }
}

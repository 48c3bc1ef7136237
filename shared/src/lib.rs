//! GateWise 平台无关核心
//!
//! 不依赖 DOM 的全部逻辑都在这里，前端只负责把它接到浏览器 API 上：
//! - `models` / `protocol`: 领域模型与 REST 接口定义
//! - `http` / `api`: 传输抽象与带鉴权的 API 客户端
//! - `session`: Cookie 会话存储
//! - `route`: 路由表与守卫
//! - `date` / `dashboard`: 按天聚合的图表数据
//! - `monitor`: 实时监控消息

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod api;
pub mod checkout;
pub mod dashboard;
pub mod date;
pub mod error;
pub mod http;
pub mod models;
pub mod monitor;
pub mod pagination;
pub mod parking;
pub mod protocol;
pub mod route;
pub mod session;

pub use api::{ApiClient, ResourceService};
pub use error::{ApiError, ErrorKind};
pub use models::*;
pub use pagination::{Page, PageQuery};
pub use session::{CookieStore, Session, SessionStore};

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const COOKIE_ACCESS_TOKEN: &str = "access_token";
pub const COOKIE_USER_TYPE: &str = "user_type";
/// 会话 Cookie 的有效期（天）
pub const SESSION_COOKIE_DAYS: u32 = 1;

pub const API_PREFIX: &str = "/api/v1";
pub const MONITORING_PREFIX: &str = "/api/monitoring";
pub const HEADER_AUTHORIZATION: &str = "Authorization";

pub const DEFAULT_PAGE_SIZE: u32 = 10;

// =========================================================
// 角色 (Role)
// =========================================================

/// 粗粒度权限层级
///
/// 未知的角色字符串一律按普通用户处理。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("admin") {
            Role::Admin
        } else {
            Role::User
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        Role::parse(&s)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing_is_lenient() {
        assert_eq!(Role::parse("admin"), Role::Admin);
        assert_eq!(Role::parse(" ADMIN "), Role::Admin);
        assert_eq!(Role::parse("user"), Role::User);
        assert_eq!(Role::parse("resident"), Role::User);
        assert_eq!(Role::parse(""), Role::User);
    }

    #[test]
    fn test_role_serializes_as_lowercase_string() {
        let json = serde_json::to_string(&Role::Admin).unwrap();
        assert_eq!(json, "\"admin\"");
        let back: Role = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(back, Role::User);
    }
}

//! 领域模型 (Domain Models)
//!
//! 与后端 REST 接口一一对应的实体与 DTO。
//! 时间字段保留为后端返回的 ISO-8601 字符串，聚合时再用 `date::parse_day` 解析。

use crate::Role;
use serde::{Deserialize, Serialize};

// =========================================================
// 认证 (Auth)
// =========================================================

/// `POST /login` 的响应
///
/// 角色字段在不同后端版本中叫 `type` 或 `user_type`，两者可能同时出现。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_type: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl LoginResponse {
    /// `type` 优先，其次 `user_type`；空字符串视为缺失
    pub fn role_name(&self) -> Option<&str> {
        [self.r#type.as_deref(), self.user_type.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
    }
}

/// `GET /me` 的响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub username: String,
    #[serde(default, rename = "type")]
    pub role: Option<Role>,
}

// =========================================================
// 车辆 (Vehicles)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    pub id: i64,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: i64,
    pub license_plate: String,
    #[serde(default)]
    pub make: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub owner_id: Option<i64>,
    #[serde(default)]
    pub owner: Option<Owner>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct VehicleCreate {
    pub license_plate: String,
    pub make: String,
    pub model: String,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct VehicleUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_plate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

// =========================================================
// 车位 (Parking spaces)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParkingSpace {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_allocated: bool,
    #[serde(default)]
    pub is_occupied: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ParkingSpaceCreate {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ParkingSpaceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_allocated: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_occupied: Option<bool>,
}

// =========================================================
// 套餐 (Plans)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    pub num_spaces: u32,
    pub duration_days: u32,
    /// 后端以整数存储：1 启用，0 停用
    #[serde(default = "default_active")]
    pub active: i64,
}

fn default_active() -> i64 {
    1
}

impl Plan {
    pub fn is_active(&self) -> bool {
        self.active != 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PlanCreate {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub num_spaces: u32,
    pub duration_days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PlanUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_spaces: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_days: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<i64>,
}

// =========================================================
// 订阅 (Subscriptions)
// =========================================================

pub const SUBSCRIPTION_ACTIVE: &str = "active";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: i64,
    pub user_id: i64,
    pub plan_id: i64,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub spaces_allocated: u32,
    #[serde(default)]
    pub price_at_subscription: f64,
    #[serde(default)]
    pub user_full_name: Option<String>,
    #[serde(default)]
    pub plan_name: Option<String>,
}

impl Subscription {
    pub fn is_active(&self) -> bool {
        self.status.eq_ignore_ascii_case(SUBSCRIPTION_ACTIVE)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SubscriptionCreate {
    pub user_id: i64,
    pub plan_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SubscriptionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

// =========================================================
// 支付 (Payments)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Paid,
    Pending,
    Failed,
    #[serde(other)]
    Unknown,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::Pending => "pending",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub subscription_id: i64,
    pub amount: f64,
    #[serde(default)]
    pub paid_at: Option<String>,
    #[serde(default)]
    pub status: PaymentStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PaymentCreate {
    pub subscription_id: i64,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PaymentStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PaymentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PaymentStatus>,
}

// =========================================================
// 用户 (Users)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, rename = "type")]
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UserCreate {
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "type")]
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

// =========================================================
// 通行记录 (Access logs)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessLog {
    pub id: i64,
    pub license_plate: String,
    #[serde(default)]
    pub vehicle_id: Option<i64>,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub granted: bool,
    #[serde(default)]
    pub reason: String,
    pub timestamp: String,
}

/// 手动车牌核验请求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessCheckRequest {
    pub license_plate: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessCheckResponse {
    pub access_granted: bool,
    #[serde(default)]
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_login_response_accepts_both_role_field_names() {
        let a: LoginResponse =
            serde_json::from_value(json!({"access_token": "t", "type": "admin"})).unwrap();
        let b: LoginResponse =
            serde_json::from_value(json!({"access_token": "t", "user_type": "admin"})).unwrap();
        assert_eq!(a.role_name(), Some("admin"));
        assert_eq!(b.role_name(), Some("admin"));
    }

    #[test]
    fn test_login_response_with_both_role_fields_prefers_type() {
        let r: LoginResponse = serde_json::from_str(
            r#"{"access_token":"t","type":"admin","user_type":"user"}"#,
        )
        .unwrap();
        assert_eq!(r.role_name(), Some("admin"));

        let blank: LoginResponse = serde_json::from_value(
            json!({"access_token": "t", "type": "", "user_type": "user"}),
        )
        .unwrap();
        assert_eq!(blank.role_name(), Some("user"));
    }

    #[test]
    fn test_login_response_without_role_is_accepted() {
        let r: LoginResponse =
            serde_json::from_value(json!({"access_token": "t", "token_type": "bearer"})).unwrap();
        assert_eq!(r.access_token.as_deref(), Some("t"));
        assert!(r.role_name().is_none());
    }

    #[test]
    fn test_unknown_payment_status_maps_to_unknown() {
        let p: Payment = serde_json::from_value(
            json!({"id": 1, "subscription_id": 2, "amount": 9.5, "status": "refunded"}),
        )
        .unwrap();
        assert_eq!(p.status, PaymentStatus::Unknown);
    }

    #[test]
    fn test_update_dtos_skip_unset_fields() {
        let update = VehicleUpdate {
            color: Some("red".into()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({"color": "red"}));
    }

    #[test]
    fn test_user_role_uses_type_field() {
        let user: User = serde_json::from_value(
            json!({"id": 3, "username": "ana", "full_name": "Ana", "email": "a@x", "type": "admin"}),
        )
        .unwrap();
        assert!(user.role.is_admin());
    }
}

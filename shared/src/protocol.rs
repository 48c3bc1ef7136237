use crate::http::HttpMethod;
use crate::models::*;
use crate::monitor::SystemStatus;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The URL path, relative to the API base URL.
    const PATH: &'static str;
    /// The HTTP method.
    const METHOD: HttpMethod;
}

/// A paginated REST collection with CRUD endpoints under one path.
///
/// `Item` is what the server returns, `Create` and `Update` are the request bodies.
pub trait Resource {
    type Item: DeserializeOwned + Clone + Send + Sync + 'static;
    type Create: Serialize;
    type Update: Serialize;
    const PATH: &'static str;
    /// Plural noun used in user-facing messages ("Failed to fetch vehicles").
    const NAME: &'static str;

    fn id_of(item: &Self::Item) -> i64;
}

// =========================================================
// Auth endpoints
// =========================================================

pub const LOGIN_PATH: &str = "/api/v1/login";
pub const ME_PATH: &str = "/api/v1/me";
pub const LOGOUT_PATH: &str = "/api/v1/users/logout";
pub const MY_ACCESS_LOGS_PATH: &str = "/api/v1/access_logs/my";
pub const MONITORING_WS_PATH: &str = "/api/monitoring/ws";

// =========================================================
// Resource Definitions
// =========================================================

pub struct Vehicles;

impl Resource for Vehicles {
    type Item = Vehicle;
    type Create = VehicleCreate;
    type Update = VehicleUpdate;
    const PATH: &'static str = "/api/v1/vehicles";
    const NAME: &'static str = "vehicles";

    fn id_of(item: &Self::Item) -> i64 {
        item.id
    }
}

pub struct ParkingSpaces;

impl Resource for ParkingSpaces {
    type Item = ParkingSpace;
    type Create = ParkingSpaceCreate;
    type Update = ParkingSpaceUpdate;
    const PATH: &'static str = "/api/v1/parking-spaces";
    const NAME: &'static str = "parking spaces";

    fn id_of(item: &Self::Item) -> i64 {
        item.id
    }
}

pub struct Plans;

impl Resource for Plans {
    type Item = Plan;
    type Create = PlanCreate;
    type Update = PlanUpdate;
    const PATH: &'static str = "/api/v1/plans";
    const NAME: &'static str = "plans";

    fn id_of(item: &Self::Item) -> i64 {
        item.id
    }
}

pub struct Subscriptions;

impl Resource for Subscriptions {
    type Item = Subscription;
    type Create = SubscriptionCreate;
    type Update = SubscriptionUpdate;
    const PATH: &'static str = "/api/v1/subscriptions";
    const NAME: &'static str = "subscriptions";

    fn id_of(item: &Self::Item) -> i64 {
        item.id
    }
}

pub struct Payments;

impl Resource for Payments {
    type Item = Payment;
    type Create = PaymentCreate;
    type Update = PaymentUpdate;
    const PATH: &'static str = "/api/v1/payments";
    const NAME: &'static str = "payments";

    fn id_of(item: &Self::Item) -> i64 {
        item.id
    }
}

pub struct Users;

impl Resource for Users {
    type Item = User;
    type Create = UserCreate;
    type Update = UserUpdate;
    const PATH: &'static str = "/api/v1/users";
    const NAME: &'static str = "users";

    fn id_of(item: &Self::Item) -> i64 {
        item.id
    }
}

/// Access logs are written by the gate, never by the dashboard.
pub struct AccessLogs;

impl Resource for AccessLogs {
    type Item = AccessLog;
    type Create = AccessCheckRequest;
    type Update = ();
    const PATH: &'static str = "/api/v1/access_logs";
    const NAME: &'static str = "access logs";

    fn id_of(item: &Self::Item) -> i64 {
        item.id
    }
}

// =========================================================
// Request Definitions
// =========================================================

/// Manual plate check from the reports page
impl ApiRequest for AccessCheckRequest {
    type Response = AccessCheckResponse;
    const PATH: &'static str = "/api/v1/access_check";
    const METHOD: HttpMethod = HttpMethod::Post;
}

/// `{status, message}` returned by start/stop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MonitoringAck {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StartMonitoring;

impl ApiRequest for StartMonitoring {
    type Response = MonitoringAck;
    const PATH: &'static str = "/api/monitoring/start";
    const METHOD: HttpMethod = HttpMethod::Post;
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StopMonitoring;

impl ApiRequest for StopMonitoring {
    type Response = MonitoringAck;
    const PATH: &'static str = "/api/monitoring/stop";
    const METHOD: HttpMethod = HttpMethod::Post;
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MonitoringStatusRequest;

impl ApiRequest for MonitoringStatusRequest {
    type Response = SystemStatus;
    const PATH: &'static str = "/api/monitoring/status";
    const METHOD: HttpMethod = HttpMethod::Get;
}

use super::*;
use crate::checkout;
use crate::dashboard::DashboardSection;
use crate::http::MockHttpClient;
use crate::models::{Vehicle, VehicleCreate};
use crate::pagination::PageQuery;
use crate::protocol::{ParkingSpaces, Payments, Users, Vehicles};
use crate::session::memory::MemoryCookies;
use crate::{COOKIE_ACCESS_TOKEN, COOKIE_USER_TYPE, CookieStore, Role};
use serde_json::json;

const BASE: &str = "http://api.test";

// =========================================================
// 辅助函数
// =========================================================

fn create_client() -> (ApiClient<MockHttpClient>, MemoryCookies) {
    let cookies = MemoryCookies::default();
    let session = Rc::new(SessionStore::new(cookies.clone()));
    (ApiClient::new(BASE, MockHttpClient::new(), session), cookies)
}

fn logged_in_client(role: Role) -> (ApiClient<MockHttpClient>, MemoryCookies) {
    let (client, cookies) = create_client();
    client.session().store("tok-123", Some(role));
    (client, cookies)
}

fn vehicle_json(id: i64) -> serde_json::Value {
    json!({
        "id": id,
        "license_plate": format!("AA-{id:02}-BB"),
        "make": "Renault",
        "model": "Clio",
        "color": "blue",
        "owner_id": 7
    })
}

fn url(path: &str) -> String {
    format!("{BASE}{path}")
}

// =========================================================
// login / logout
// =========================================================

#[tokio::test]
async fn test_login_posts_form_and_stores_session() {
    let (client, cookies) = create_client();
    client.transport().mock_response(
        HttpMethod::Post,
        &url("/api/v1/login"),
        200,
        json!({"access_token": "tok", "token_type": "bearer", "type": "admin"}),
    );

    client.login("ana", "s3cret!").await.unwrap();

    let req = client.transport().last_request().unwrap();
    assert_eq!(req.header("Content-Type"), Some("application/x-www-form-urlencoded"));
    assert_eq!(req.body.as_deref(), Some("username=ana&password=s3cret%21"));
    assert!(req.header(HEADER_AUTHORIZATION).is_none());
    assert_eq!(cookies.get(COOKIE_ACCESS_TOKEN).as_deref(), Some("tok"));
    assert_eq!(cookies.get(COOKIE_USER_TYPE).as_deref(), Some("admin"));
}

#[tokio::test]
async fn test_login_reads_user_type_field() {
    let (client, _) = create_client();
    client.transport().mock_response(
        HttpMethod::Post,
        &url("/api/v1/login"),
        200,
        json!({"access_token": "tok", "user_type": "user"}),
    );

    client.login("bob", "pw").await.unwrap();

    assert_eq!(client.session().role(), Some(Role::User));
}

#[tokio::test]
async fn test_login_accepts_both_role_fields() {
    let (client, cookies) = create_client();
    client.transport().mock_response(
        HttpMethod::Post,
        &url("/api/v1/login"),
        200,
        json!({"access_token": "tok", "type": "admin", "user_type": "admin"}),
    );

    client.login("ana", "pw").await.unwrap();

    assert_eq!(client.session().role(), Some(Role::Admin));
    assert_eq!(cookies.get(COOKIE_ACCESS_TOKEN).as_deref(), Some("tok"));
}

#[tokio::test]
async fn test_login_without_token_is_rejected() {
    let (client, cookies) = create_client();
    client
        .transport()
        .mock_response(HttpMethod::Post, &url("/api/v1/login"), 200, json!({"type": "admin"}));

    let err = client.login("ana", "pw").await.unwrap_err();

    assert_eq!(err.user_message("x"), "Invalid login response");
    assert!(!cookies.contains(COOKIE_ACCESS_TOKEN));
}

#[tokio::test]
async fn test_login_failure_leaves_session_empty() {
    let (client, _) = create_client();
    client.transport().mock_response(
        HttpMethod::Post,
        &url("/api/v1/login"),
        401,
        json!({"detail": "Incorrect username or password"}),
    );

    let err = client.login("ana", "wrong").await.unwrap_err();

    assert!(err.is_unauthorized());
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn test_is_authenticated_follows_login_and_logout_without_requests() {
    let (client, _) = create_client();
    client.transport().mock_response(
        HttpMethod::Post,
        &url("/api/v1/login"),
        200,
        json!({"access_token": "tok", "type": "user"}),
    );

    assert!(!client.is_authenticated());
    client.login("ana", "pw").await.unwrap();
    let calls_after_login = client.transport().request_count();

    assert!(client.is_authenticated());
    client.logout();
    assert!(!client.is_authenticated());
    assert_eq!(client.transport().request_count(), calls_after_login);
}

#[tokio::test]
async fn test_server_logout_clears_session_even_on_failure() {
    let (client, cookies) = logged_in_client(Role::User);
    client.transport().mock_response(
        HttpMethod::Post,
        &url("/api/v1/users/logout"),
        500,
        json!({"detail": "db down"}),
    );

    client.server_logout().await;

    assert_eq!(client.transport().request_count(), 1);
    assert!(!cookies.contains(COOKIE_ACCESS_TOKEN));
    assert!(!cookies.contains(COOKIE_USER_TYPE));
}

#[tokio::test]
async fn test_current_user_soft_fails() {
    let (client, _) = logged_in_client(Role::User);
    client.transport().fail_network();

    assert!(client.current_user().await.is_none());
}

#[tokio::test]
async fn test_current_user_decodes_role() {
    let (client, _) = logged_in_client(Role::Admin);
    client.transport().mock_response(
        HttpMethod::Get,
        &url("/api/v1/me"),
        200,
        json!({"username": "ana", "type": "admin"}),
    );

    let me = client.current_user().await.unwrap();
    assert_eq!(me.username, "ana");
    assert_eq!(me.role, Some(Role::Admin));
}

// =========================================================
// 鉴权头与 401 处理
// =========================================================

#[tokio::test]
async fn test_bearer_token_is_attached() {
    let (client, _) = logged_in_client(Role::Admin);
    client
        .transport()
        .mock_response(HttpMethod::Get, &url("/api/v1/vehicles/3"), 200, vehicle_json(3));

    client.resource::<Vehicles>().get(3).await.unwrap();

    let req = client.transport().last_request().unwrap();
    assert_eq!(req.header(HEADER_AUTHORIZATION), Some("Bearer tok-123"));
}

#[tokio::test]
async fn test_unauthorized_response_clears_token_cookie() {
    let (client, cookies) = logged_in_client(Role::Admin);
    client.transport().mock_response(
        HttpMethod::Get,
        &url("/api/v1/plans/1"),
        401,
        json!({"detail": "Token expired"}),
    );

    let err = client.resource::<crate::protocol::Plans>().get(1).await.unwrap_err();

    assert_eq!(err, ApiError::Unauthorized);
    assert!(!cookies.contains(COOKIE_ACCESS_TOKEN));
    assert!(!cookies.contains(COOKIE_USER_TYPE));
}

#[tokio::test]
async fn test_unauthorized_notifies_subscribers() {
    let (client, _) = logged_in_client(Role::User);
    let cleared = Rc::new(std::cell::Cell::new(false));
    let flag = cleared.clone();
    client
        .session()
        .subscribe(move |s| flag.set(!s.is_authenticated()));
    client.transport().mock_response(
        HttpMethod::Get,
        &url("/api/v1/me"),
        401,
        json!({"detail": "expired"}),
    );

    let _ = client.current_user().await;

    assert!(cleared.get());
}

#[tokio::test]
async fn test_forbidden_keeps_session() {
    let (client, cookies) = logged_in_client(Role::User);
    client.transport().mock_response(
        HttpMethod::Delete,
        &url("/api/v1/users/9"),
        403,
        json!({"detail": "Admin privileges required"}),
    );

    let err = client.resource::<Users>().delete(9).await.unwrap_err();

    assert_eq!(err.user_message("x"), "Admin privileges required");
    assert!(cookies.contains(COOKIE_ACCESS_TOKEN));
}

#[tokio::test]
async fn test_network_failure_is_reported() {
    let (client, _) = logged_in_client(Role::Admin);
    client.transport().fail_network();

    let err = client
        .resource::<Vehicles>()
        .list(&PageQuery::new(1, 10))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), crate::ErrorKind::NetworkOrServerFailure);
    assert!(client.is_authenticated());
}

// =========================================================
// 分页资源
// =========================================================

#[tokio::test]
async fn test_each_page_change_issues_a_request() {
    let (client, _) = logged_in_client(Role::Admin);
    let first_items: Vec<_> = (1..=10).map(vehicle_json).collect();
    client.transport().mock_response(
        HttpMethod::Get,
        &url("/api/v1/vehicles?page=2&size=10"),
        200,
        json!({"items": [vehicle_json(11), vehicle_json(12)], "total": 12, "page": 2, "size": 10, "pages": 7}),
    );
    client.transport().mock_response(
        HttpMethod::Get,
        &url("/api/v1/vehicles?page=1&size=10"),
        200,
        json!({"items": first_items, "total": 12, "page": 1, "size": 10}),
    );
    let service = client.resource::<Vehicles>();

    let second = service.list(&PageQuery::new(2, 10)).await.unwrap();
    let first = service.list(&PageQuery::new(1, 10)).await.unwrap();

    assert_eq!(client.transport().request_count(), 2);
    assert_eq!(second.pages, 2);
    assert_eq!(first.pages, 2);
    assert_eq!(second.items.len(), 2);
    assert_eq!(first.items[0].id, 1);
}

#[tokio::test]
async fn test_list_without_session_skips_network() {
    let (client, _) = create_client();

    let err = client
        .resource::<Vehicles>()
        .list(&PageQuery::default())
        .await
        .unwrap_err();

    assert_eq!(err, ApiError::Unauthorized);
    assert_eq!(client.transport().request_count(), 0);
}

#[tokio::test]
async fn test_list_passes_filters() {
    let (client, _) = logged_in_client(Role::Admin);
    client.transport().mock_response(
        HttpMethod::Get,
        &url("/api/v1/vehicles?page=1&size=5&search=AA%2011"),
        200,
        json!({"items": [], "total": 0, "page": 1, "size": 5}),
    );

    let page = client
        .resource::<Vehicles>()
        .list(&PageQuery::new(1, 5).with_search("AA 11"))
        .await
        .unwrap();

    assert!(page.items.is_empty());
    assert_eq!(page.pages, 0);
}

#[tokio::test]
async fn test_create_sends_json_body() {
    let (client, _) = logged_in_client(Role::Admin);
    client
        .transport()
        .mock_response(HttpMethod::Post, &url("/api/v1/vehicles"), 201, vehicle_json(5));

    let dto = VehicleCreate {
        license_plate: "AA-05-BB".into(),
        make: "Renault".into(),
        model: "Clio".into(),
        color: "blue".into(),
        owner_id: Some(7),
    };
    let created: Vehicle = client.resource::<Vehicles>().create(&dto).await.unwrap();

    let req = client.transport().last_request().unwrap();
    assert_eq!(req.header("Content-Type"), Some("application/json"));
    let sent: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
    assert_eq!(sent["license_plate"], "AA-05-BB");
    assert_eq!(created.id, 5);
}

#[tokio::test]
async fn test_validation_detail_surfaces() {
    let (client, _) = logged_in_client(Role::Admin);
    client.transport().mock_response(
        HttpMethod::Post,
        &url("/api/v1/vehicles"),
        400,
        json!({"detail": "License plate already registered"}),
    );

    let err = client
        .resource::<Vehicles>()
        .create(&VehicleCreate::default())
        .await
        .unwrap_err();

    assert_eq!(err.user_message("Failed to save vehicle"), "License plate already registered");
}

#[tokio::test]
async fn test_delete_accepts_empty_body() {
    let (client, _) = logged_in_client(Role::Admin);
    client
        .transport()
        .mock_raw(HttpMethod::Delete, &url("/api/v1/vehicles/4"), 204, "");

    client.resource::<Vehicles>().delete(4).await.unwrap();
}

// =========================================================
// 通行记录与监控
// =========================================================

#[tokio::test]
async fn test_check_access_posts_plate() {
    let (client, _) = logged_in_client(Role::Admin);
    client.transport().mock_response(
        HttpMethod::Post,
        &url("/api/v1/access_check"),
        200,
        json!({"access_granted": false, "reason": "Vehicle not found"}),
    );

    let resp = client.check_access("  aa 11 bb ").await.unwrap();

    assert!(!resp.access_granted);
    let req = client.transport().last_request().unwrap();
    assert_eq!(req.body.as_deref(), Some(r#"{"license_plate":"aa 11 bb"}"#));
}

#[tokio::test]
async fn test_monitoring_calls_have_no_body() {
    let (client, _) = logged_in_client(Role::Admin);
    client.transport().mock_response(
        HttpMethod::Post,
        &url("/api/monitoring/start"),
        200,
        json!({"status": "success", "message": "Monitoring started"}),
    );
    client.transport().mock_response(
        HttpMethod::Get,
        &url("/api/monitoring/status"),
        200,
        json!({"is_monitoring": true, "camera_status": true, "camera_message": "ok", "active_vehicles": 2, "connected_clients": 1}),
    );

    let ack = client.start_monitoring().await.unwrap();
    assert!(client.transport().last_request().unwrap().body.is_none());
    let status = client.monitoring_status().await.unwrap();

    assert_eq!(ack.message, "Monitoring started");
    assert!(status.is_monitoring);
    assert_eq!(status.active_vehicles, 2);
}

#[tokio::test]
async fn test_my_access_logs_normalizes_page() {
    let (client, _) = logged_in_client(Role::User);
    client.transport().mock_response(
        HttpMethod::Get,
        &url("/api/v1/access_logs/my?page=1&size=10"),
        200,
        json!({"items": [{"id": 1, "license_plate": "AA", "granted": true, "reason": "ok", "timestamp": "2024-05-01T10:00:00"}], "total": 21, "page": 1, "size": 10}),
    );

    let page = client.my_access_logs(&PageQuery::new(1, 10)).await.unwrap();

    assert_eq!(page.pages, 3);
    assert!(page.items[0].granted);
}

// =========================================================
// 仪表盘聚合
// =========================================================

fn log_json(id: i64, timestamp: &str) -> serde_json::Value {
    json!({"id": id, "license_plate": "AA-00-BB", "granted": id % 2 == 0, "reason": "", "timestamp": timestamp})
}

fn page_json(items: Vec<serde_json::Value>, total: u64, page: u32, size: u32) -> serde_json::Value {
    json!({"items": items, "total": total, "page": page, "size": size})
}

fn mock_empty_dashboard(client: &ApiClient<MockHttpClient>) {
    client.transport().mock_response(
        HttpMethod::Get,
        &url("/api/v1/vehicles?page=1&size=1"),
        200,
        page_json(vec![vehicle_json(1)], 12, 1, 1),
    );
    client.transport().mock_response(
        HttpMethod::Get,
        &url("/api/v1/subscriptions?page=1&size=100"),
        200,
        page_json(vec![], 0, 1, 100),
    );
    client.transport().mock_response(
        HttpMethod::Get,
        &url("/api/v1/payments?page=1&size=100"),
        200,
        page_json(vec![], 0, 1, 100),
    );
}

fn end_day() -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(2024, 5, 30).unwrap()
}

#[tokio::test]
async fn test_dashboard_pages_through_access_logs() {
    let (client, _) = logged_in_client(Role::Admin);
    mock_empty_dashboard(&client);
    let first: Vec<_> = (1..=100).map(|id| log_json(id, "2024-05-20T08:00:00")).collect();
    let second: Vec<_> = (101..=150).map(|id| log_json(id, "2024-05-10T08:00:00")).collect();
    client.transport().mock_response(
        HttpMethod::Get,
        &url("/api/v1/access_logs?page=1&size=100"),
        200,
        page_json(first, 150, 1, 100),
    );
    client.transport().mock_response(
        HttpMethod::Get,
        &url("/api/v1/access_logs?page=2&size=100"),
        200,
        page_json(second, 150, 2, 100),
    );

    let load = client.load_dashboard(true, end_day()).await;

    assert!(load.is_complete());
    assert_eq!(load.data.vehicles_total, 12);
    assert_eq!(load.data.access_logs.len(), 150);
}

#[tokio::test]
async fn test_dashboard_stops_paging_before_the_window() {
    let (client, _) = logged_in_client(Role::User);
    mock_empty_dashboard(&client);
    let mut first: Vec<_> = (1..=99).map(|id| log_json(id, "2024-05-20T08:00:00")).collect();
    first.push(log_json(100, "2024-03-01T08:00:00"));
    client.transport().mock_response(
        HttpMethod::Get,
        &url("/api/v1/access_logs/my?page=1&size=100"),
        200,
        page_json(first, 500, 1, 100),
    );

    let load = client.load_dashboard(false, end_day()).await;

    assert!(load.is_complete());
    assert_eq!(load.data.access_logs.len(), 100);
    let asked_second = client
        .transport()
        .requests
        .borrow()
        .iter()
        .any(|r| r.url.contains("access_logs/my?page=2"));
    assert!(!asked_second);
    // 普通用户不请求支付
    assert!(!client.transport().requests.borrow().iter().any(|r| r.url.contains("payments")));
}

#[tokio::test]
async fn test_dashboard_keeps_other_sections_when_one_fails() {
    let (client, _) = logged_in_client(Role::Admin);
    mock_empty_dashboard(&client);
    client.transport().mock_response(
        HttpMethod::Get,
        &url("/api/v1/payments?page=1&size=100"),
        500,
        json!({"detail": "boom"}),
    );
    client.transport().mock_response(
        HttpMethod::Get,
        &url("/api/v1/access_logs?page=1&size=100"),
        200,
        page_json(vec![log_json(2, "2024-05-29T08:00:00")], 1, 1, 100),
    );

    let load = client.load_dashboard(true, end_day()).await;

    assert!(load.failed(DashboardSection::Payments));
    assert!(!load.failed(DashboardSection::AccessLogs));
    assert_eq!(load.failures[0].message, "Failed to fetch payments");
    assert_eq!(load.data.vehicles_total, 12);
    assert_eq!(load.data.access_logs.len(), 1);
}

// =========================================================
// 支付链接与车位分配
// =========================================================

#[tokio::test]
async fn test_mark_as_paid_posts_empty_object() {
    let (client, _) = logged_in_client(Role::User);
    client.transport().mock_response(
        HttpMethod::Post,
        &url("/api/v1/payments/7/mark_as_paid"),
        200,
        json!({"id": 7, "subscription_id": 1, "amount": 45.0, "status": "paid"}),
    );

    client.resource::<Payments>().mark_as_paid(7).await.unwrap();

    let req = client.transport().last_request().unwrap();
    assert_eq!(req.body.as_deref(), Some("{}"));
    assert_eq!(req.header("Content-Type"), Some("application/json"));
}

#[tokio::test]
async fn test_mark_as_paid_maps_forbidden_to_link_message() {
    let (client, _) = logged_in_client(Role::User);
    client.transport().mock_response(
        HttpMethod::Post,
        &url("/api/v1/payments/7/mark_as_paid"),
        403,
        json!({"detail": "Not enough permissions"}),
    );

    let err = client.resource::<Payments>().mark_as_paid(7).await.unwrap_err();

    assert_eq!(checkout::pay_error_message(&err), checkout::NOT_AUTHORIZED);
}

#[tokio::test]
async fn test_missing_payment_maps_to_not_found() {
    let (client, _) = logged_in_client(Role::User);

    let err = client.resource::<Payments>().get(99).await.unwrap_err();

    assert_eq!(checkout::load_error_message(&err), checkout::NOT_FOUND);
}

fn space_json(id: i64, allocated: bool) -> serde_json::Value {
    json!({"id": id, "name": format!("P{id}"), "description": "", "is_allocated": allocated, "is_occupied": false})
}

#[tokio::test]
async fn test_allocate_marks_each_space() {
    let (client, _) = logged_in_client(Role::Admin);
    for id in [3, 5] {
        client.transport().mock_response(
            HttpMethod::Put,
            &url(&format!("/api/v1/parking-spaces/{id}")),
            200,
            space_json(id, true),
        );
    }

    let spaces = client.resource::<ParkingSpaces>().allocate(&[3, 5]).await.unwrap();

    assert_eq!(spaces.len(), 2);
    assert!(spaces.iter().all(|s| s.is_allocated));
    let req = client.transport().last_request().unwrap();
    assert_eq!(req.body.as_deref(), Some(r#"{"is_allocated":true}"#));
}

#[tokio::test]
async fn test_allocate_stops_at_first_failure() {
    let (client, _) = logged_in_client(Role::Admin);
    client.transport().mock_response(
        HttpMethod::Put,
        &url("/api/v1/parking-spaces/3"),
        400,
        json!({"detail": "Parking space already allocated"}),
    );

    let err = client.resource::<ParkingSpaces>().allocate(&[3, 5]).await.unwrap_err();

    assert_eq!(err.user_message("x"), "Parking space already allocated");
    assert_eq!(client.transport().request_count(), 1);
}

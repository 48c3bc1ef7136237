//! 带鉴权的 API 客户端
//!
//! `ApiClient` 负责拼接 URL、附加 Bearer 令牌、统一处理非 2xx 响应。
//! 收到 401 时清除会话后返回 [`ApiError::Unauthorized`]，跳转由页面决定。

use crate::HEADER_AUTHORIZATION;
use crate::error::{ApiError, ApiResult};
use crate::http::{HttpClient, HttpMethod, HttpRequest, RequestBody, encode_pairs};
use crate::protocol::ApiRequest;
use crate::session::SessionStore;
use serde::de::DeserializeOwned;
use std::rc::Rc;

mod auth;
mod dashboard;
mod monitoring;
mod resource;

pub use dashboard::{DASHBOARD_MAX_PAGES, DASHBOARD_PAGE_SIZE};
pub use resource::ResourceService;

pub struct ApiClient<C> {
    base_url: String,
    http: Rc<C>,
    session: Rc<SessionStore>,
}

// 手动实现，避免要求 C: Clone
impl<C> Clone for ApiClient<C> {
    fn clone(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            http: self.http.clone(),
            session: self.session.clone(),
        }
    }
}

impl<C: HttpClient> ApiClient<C> {
    pub fn new(base_url: &str, http: C, session: Rc<SessionStore>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Rc::new(http),
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Rc<SessionStore> {
        &self.session
    }

    pub fn transport(&self) -> &C {
        &self.http
    }

    fn url(&self, path: &str, query: &[(String, String)]) -> String {
        let mut url = if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        };
        if !query.is_empty() {
            url.push('?');
            url.push_str(&encode_pairs(query));
        }
        url
    }

    /// 发送请求并解析响应体
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<RequestBody>,
        query: &[(String, String)],
    ) -> ApiResult<T> {
        let mut req = HttpRequest::new(&self.url(path, query), method);
        if let Some(token) = self.session.token() {
            req = req.with_header(HEADER_AUTHORIZATION, &format!("Bearer {token}"));
        }
        if let Some(body) = &body {
            req = req.with_body(body);
        }

        let resp = self.http.send(req).await?;

        if resp.status == 401 {
            log::warn!("{} {} returned 401, clearing session", method.as_str(), path);
            self.session.clear();
            return Err(ApiError::Unauthorized);
        }
        if !resp.ok() {
            let err = ApiError::from_response(resp.status, &resp.body);
            log::debug!("{} {} failed: {}", method.as_str(), path, err);
            return Err(err);
        }

        resp.json()
    }

    /// 发送 JSON 请求体
    pub async fn send_json<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.request(method, path, Some(RequestBody::Json(value)), &[])
            .await
    }

    /// 按 [`ApiRequest`] 的元数据发送请求
    ///
    /// 单元结构体序列化为 `null`，此时不带请求体。
    pub async fn call<R: ApiRequest>(&self, req: &R) -> ApiResult<R::Response> {
        let value = serde_json::to_value(req).map_err(|e| ApiError::Decode(e.to_string()))?;
        let body = match (R::METHOD, value) {
            (HttpMethod::Get, _) | (_, serde_json::Value::Null) => None,
            (_, value) => Some(RequestBody::Json(value)),
        };
        self.request(R::METHOD, R::PATH, body, &[]).await
    }
}

#[cfg(test)]
mod tests;

use super::ApiClient;
use crate::error::{ApiError, ApiResult};
use crate::http::{HttpClient, HttpMethod, RequestBody};
use crate::models::{CurrentUser, LoginResponse};
use crate::protocol::{LOGIN_PATH, LOGOUT_PATH, ME_PATH};
use crate::Role;

impl<C: HttpClient> ApiClient<C> {
    /// 表单方式登录，成功后把令牌和角色写入会话
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<LoginResponse> {
        let form = RequestBody::Form(vec![
            ("username".to_string(), username.to_string()),
            ("password".to_string(), password.to_string()),
        ]);
        let resp: LoginResponse = self
            .request(HttpMethod::Post, LOGIN_PATH, Some(form), &[])
            .await?;

        let token = resp
            .access_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::Validation {
                status: 200,
                detail: "Invalid login response".to_string(),
            })?;

        let role = resp.role_name().map(Role::parse);
        self.session.store(token, role);
        log::info!(
            "login succeeded for {username} (role: {})",
            role.map_or("none", |r| r.as_str())
        );
        Ok(resp)
    }

    /// 只清除本地会话，不请求服务端
    pub fn logout(&self) {
        self.session.clear();
        log::info!("logged out");
    }

    /// 通知服务端注销，然后无论结果如何都清除本地会话
    pub async fn server_logout(&self) {
        let result: ApiResult<serde_json::Value> =
            self.request(HttpMethod::Post, LOGOUT_PATH, None, &[]).await;
        if let Err(e) = result {
            log::warn!("server logout failed: {e}");
        }
        self.logout();
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// 任何失败都返回 `None`
    pub async fn current_user(&self) -> Option<CurrentUser> {
        match self.request(HttpMethod::Get, ME_PATH, None, &[]).await {
            Ok(user) => Some(user),
            Err(e) => {
                log::debug!("current user lookup failed: {e}");
                None
            }
        }
    }
}

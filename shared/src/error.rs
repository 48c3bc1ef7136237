use serde_json::Value;
use thiserror::Error;

// =========================================================
// 错误分类
// =========================================================

/// 面向界面的错误分类
///
/// 所有错误都只影响触发它的页面或操作，没有任何一类是致命的。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 401：本地凭据已清除，需要重新登录
    AuthenticationFailure,
    /// 403 或客户端角色检查失败
    AuthorizationFailure,
    /// 其余 4xx，通常带 `detail`
    ValidationFailure,
    /// 5xx、连接失败、响应无法解析
    NetworkOrServerFailure,
}

// =========================================================
// 核心错误类型
// =========================================================

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("not authenticated")]
    Unauthorized,
    #[error("forbidden: {detail}")]
    Forbidden { detail: String },
    #[error("request rejected ({status}): {detail}")]
    Validation { status: u16, detail: String },
    #[error("server error ({status}): {detail}")]
    Server { status: u16, detail: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid response: {0}")]
    Decode(String),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// 根据非 2xx 响应构造错误，保留服务端返回的 `detail`
    pub fn from_response(status: u16, body: &str) -> Self {
        let detail = extract_detail(body).unwrap_or_default();
        match status {
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden { detail },
            400..=499 => ApiError::Validation { status, detail },
            _ => ApiError::Server { status, detail },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Unauthorized => ErrorKind::AuthenticationFailure,
            ApiError::Forbidden { .. } => ErrorKind::AuthorizationFailure,
            ApiError::Validation { .. } => ErrorKind::ValidationFailure,
            ApiError::Server { .. } | ApiError::Network(_) | ApiError::Decode(_) => {
                ErrorKind::NetworkOrServerFailure
            }
        }
    }

    /// HTTP 状态码（网络与解析错误没有）
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => Some(401),
            ApiError::Forbidden { .. } => Some(403),
            ApiError::Validation { status, .. } | ApiError::Server { status, .. } => Some(*status),
            ApiError::Network(_) | ApiError::Decode(_) => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    /// 展示给用户的一行文字
    ///
    /// 校验错误原样显示服务端的 `detail`，网络与服务端错误统一用调用方给出的兜底文案。
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Unauthorized => "You are not authenticated, please log in again".to_string(),
            ApiError::Forbidden { detail } if !detail.is_empty() => detail.clone(),
            ApiError::Forbidden { .. } => "You are not authorized to perform this action".to_string(),
            ApiError::Validation { detail, .. } if !detail.is_empty() => detail.clone(),
            _ => fallback.to_string(),
        }
    }
}

/// 提取 FastAPI 风格的 `detail` 字段
///
/// `detail` 可能是字符串，也可能是校验错误对象数组（取其中的 `msg`）。
fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_map_to_variants() {
        assert_eq!(ApiError::from_response(401, ""), ApiError::Unauthorized);
        assert!(matches!(
            ApiError::from_response(403, r#"{"detail":"Admin privileges required"}"#),
            ApiError::Forbidden { ref detail } if detail == "Admin privileges required"
        ));
        assert!(matches!(
            ApiError::from_response(422, "{}"),
            ApiError::Validation { status: 422, .. }
        ));
        assert!(matches!(
            ApiError::from_response(502, "Bad Gateway"),
            ApiError::Server { status: 502, .. }
        ));
    }

    #[test]
    fn test_validation_detail_list_is_joined() {
        let body = r#"{"detail":[{"loc":["body","email"],"msg":"value is not a valid email"},{"msg":"field required"}]}"#;
        let err = ApiError::from_response(422, body);
        assert_eq!(
            err.user_message("Failed to save"),
            "value is not a valid email; field required"
        );
    }

    #[test]
    fn test_server_errors_use_fallback_message() {
        let err = ApiError::from_response(500, r#"{"detail":"boom"}"#);
        assert_eq!(err.kind(), ErrorKind::NetworkOrServerFailure);
        assert_eq!(err.user_message("Failed to fetch vehicles"), "Failed to fetch vehicles");
        assert_eq!(
            ApiError::Network("offline".into()).user_message("Failed to fetch plans"),
            "Failed to fetch plans"
        );
    }

    #[test]
    fn test_validation_without_detail_uses_fallback() {
        let err = ApiError::from_response(400, "not json");
        assert_eq!(err.user_message("Failed to save vehicle"), "Failed to save vehicle");
        assert_eq!(err.status(), Some(400));
    }
}

//! HTTP 传输实现
//!
//! 使用 `web_sys::fetch` 实现 `gatewise_shared::http::HttpClient`。

use gatewise_shared::ApiError;
use gatewise_shared::http::{HttpClient, HttpRequest, HttpResponse};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

fn network(context: &str, err: JsValue) -> ApiError {
    ApiError::Network(format!("{context}: {err:?}"))
}

/// 浏览器 fetch 客户端
#[derive(Clone, Copy, Default)]
pub struct FetchClient;

impl FetchClient {
    fn build(req: &HttpRequest) -> Result<Request, ApiError> {
        let headers = Headers::new().map_err(|e| network("创建 Headers 失败", e))?;
        for (key, value) in &req.headers {
            headers
                .set(key, value)
                .map_err(|e| network("设置 Header 失败", e))?;
        }

        let opts = RequestInit::new();
        opts.set_method(req.method.as_str());
        opts.set_headers(&headers.into());
        if let Some(body) = &req.body {
            opts.set_body(&JsValue::from_str(body));
        }

        Request::new_with_str_and_init(&req.url, &opts).map_err(|e| network("请求构建失败", e))
    }

    async fn text(response: &Response) -> Result<String, ApiError> {
        let promise = response
            .text()
            .map_err(|e| ApiError::Decode(format!("{e:?}")))?;
        let text = JsFuture::from(promise)
            .await
            .map_err(|e| ApiError::Decode(format!("{e:?}")))?;
        Ok(text.as_string().unwrap_or_default())
    }
}

#[async_trait::async_trait(?Send)]
impl HttpClient for FetchClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, ApiError> {
        let request = Self::build(&req)?;

        let window =
            web_sys::window().ok_or_else(|| ApiError::Network("无法获取 window 对象".into()))?;
        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| network("网络错误", e))?;
        let response: Response = resp_value
            .dyn_into()
            .map_err(|e| ApiError::Decode(format!("Response 类型转换失败: {e:?}")))?;

        let status = response.status();
        let body = Self::text(&response).await?;
        log::debug!("{} {} -> {}", req.method.as_str(), req.url, status);
        Ok(HttpResponse { status, body })
    }
}

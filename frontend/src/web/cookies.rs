//! `document.cookie` 封装

use gatewise_shared::CookieStore;
use wasm_bindgen::JsCast;
use web_sys::HtmlDocument;

const SECONDS_PER_DAY: u32 = 24 * 60 * 60;

/// 浏览器 Cookie 存储，所有 Cookie 都写在根路径并使用 `SameSite=Lax`
#[derive(Clone, Copy, Default)]
pub struct BrowserCookies;

impl BrowserCookies {
    fn document() -> Option<HtmlDocument> {
        web_sys::window()?.document()?.dyn_into::<HtmlDocument>().ok()
    }

    fn write(raw: &str) {
        match Self::document() {
            Some(doc) => {
                if doc.set_cookie(raw).is_err() {
                    log::warn!("failed to write cookie");
                }
            }
            None => log::warn!("document unavailable, cookie not written"),
        }
    }
}

/// 在 `a=1; b=2` 中查找指定名称，值按百分号编码解码
fn find_cookie(all: &str, name: &str) -> Option<String> {
    all.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        if key != name {
            return None;
        }
        match urlencoding::decode(value) {
            Ok(decoded) => Some(decoded.into_owned()),
            Err(e) => {
                log::warn!("cookie {name} is not valid UTF-8 after decoding: {e}");
                None
            }
        }
    })
}

impl CookieStore for BrowserCookies {
    fn get(&self, name: &str) -> Option<String> {
        let all = Self::document()?.cookie().ok()?;
        find_cookie(&all, name)
    }

    fn set(&self, name: &str, value: &str, max_age_days: u32) {
        Self::write(&format!(
            "{name}={}; Max-Age={}; Path=/; SameSite=Lax",
            urlencoding::encode(value),
            max_age_days * SECONDS_PER_DAY
        ));
    }

    fn remove(&self, name: &str) {
        Self::write(&format!("{name}=; Max-Age=0; Path=/; SameSite=Lax"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_cookie_by_exact_name() {
        let all = "user_type=admin; access_token=abc.def; x_access_token=nope";
        assert_eq!(find_cookie(all, "access_token").as_deref(), Some("abc.def"));
        assert_eq!(find_cookie(all, "user_type").as_deref(), Some("admin"));
        assert_eq!(find_cookie(all, "missing"), None);
    }

    #[test]
    fn test_encoded_value_survives_separators() {
        let raw = "a b;c,d%=é";
        let encoded = urlencoding::encode(raw);
        assert!(!encoded.contains([';', ',', ' ', '=']));
        let all = format!("user_type=admin; note={encoded}");
        assert_eq!(find_cookie(&all, "note").as_deref(), Some(raw));
    }

    #[test]
    fn test_jwt_token_is_stored_unchanged() {
        let token = "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiJhbmEifQ.sig-_x";
        assert_eq!(urlencoding::encode(token), token);
    }

    #[test]
    fn test_invalid_utf8_value_is_ignored() {
        assert_eq!(find_cookie("access_token=%FF%FE", "access_token"), None);
    }
}

//! 实时监控 WebSocket
//!
//! 连接在 `MonitorSocket` 被 drop 时自动关闭，回调闭包与连接同生命周期。

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CloseEvent, Event, MessageEvent, WebSocket};

pub struct MonitorSocket {
    ws: WebSocket,
    _on_message: Closure<dyn FnMut(MessageEvent)>,
    _on_error: Closure<dyn FnMut(Event)>,
    _on_close: Closure<dyn FnMut(CloseEvent)>,
}

impl MonitorSocket {
    /// 建立连接
    ///
    /// `on_frame` 收到每一帧文本，`on_error` 在连接出错时调用，`on_close` 在连接关闭时调用。
    pub fn connect(
        url: &str,
        mut on_frame: impl FnMut(String) + 'static,
        mut on_error: impl FnMut() + 'static,
        mut on_close: impl FnMut() + 'static,
    ) -> Result<Self, String> {
        let ws = WebSocket::new(url).map_err(|e| format!("{e:?}"))?;

        let on_message = Closure::<dyn FnMut(MessageEvent)>::new(move |ev: MessageEvent| {
            if let Some(text) = ev.data().as_string() {
                on_frame(text);
            } else {
                log::debug!("ignoring non-text monitor frame");
            }
        });
        let on_err = Closure::<dyn FnMut(Event)>::new(move |_: Event| {
            log::error!("monitoring websocket error");
            on_error();
        });
        let on_cls = Closure::<dyn FnMut(CloseEvent)>::new(move |ev: CloseEvent| {
            log::info!("monitoring websocket closed (code {})", ev.code());
            on_close();
        });

        ws.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
        ws.set_onerror(Some(on_err.as_ref().unchecked_ref()));
        ws.set_onclose(Some(on_cls.as_ref().unchecked_ref()));
        log::info!("monitoring websocket connecting to {url}");

        Ok(Self {
            ws,
            _on_message: on_message,
            _on_error: on_err,
            _on_close: on_cls,
        })
    }
}

impl Drop for MonitorSocket {
    fn drop(&mut self) {
        // 先解绑回调，避免闭包释放后仍被调用
        self.ws.set_onmessage(None);
        self.ws.set_onerror(None);
        self.ws.set_onclose(None);
        let _ = self.ws.close();
    }
}

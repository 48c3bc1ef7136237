//! 全局通知提示
//!
//! 新消息会替换旧消息并重新计时，3 秒后自动消失。

use gloo_timers::callback::Timeout;
use leptos::prelude::*;

const DISMISS_AFTER_MS: u32 = 3_000;

#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
}

#[derive(Clone, Copy)]
pub struct Notifier {
    notice: RwSignal<Option<Notice>>,
    timer: StoredValue<Option<Timeout>, LocalStorage>,
}

impl Notifier {
    fn new() -> Self {
        Self {
            notice: RwSignal::new(None),
            timer: StoredValue::new_local(None),
        }
    }

    fn show(&self, text: String, is_error: bool) {
        self.notice.set(Some(Notice { text, is_error }));
        let notice = self.notice;
        // 旧的 Timeout 被替换时 drop，即取消
        self.timer.set_value(Some(Timeout::new(DISMISS_AFTER_MS, move || {
            let _ = notice.try_set(None);
        })));
    }

    pub fn success(&self, text: impl Into<String>) {
        self.show(text.into(), false);
    }

    pub fn error(&self, text: impl Into<String>) {
        self.show(text.into(), true);
    }
}

pub fn provide_notifier() {
    provide_context(Notifier::new());
}

pub fn use_notifier() -> Notifier {
    use_context::<Notifier>().expect("Notifier should be provided")
}

/// 通知提示框
#[component]
pub fn Toast() -> impl IntoView {
    let notifier = use_notifier();
    let notice = notifier.notice;

    move || {
        notice.get().map(|n| {
            let class = if n.is_error {
                "alert alert-error shadow-lg"
            } else {
                "alert alert-success shadow-lg"
            };
            view! {
                <div class="toast toast-top toast-end z-50">
                    <div class=class>
                        <span>{n.text}</span>
                    </div>
                </div>
            }
        })
    }
}

//! 表单通用部件
//!
//! 每个实体的 `FormState` 放在各自页面模块里，这里只有输入控件、
//! 提交/加载流程以及字符串到数值的解析。

use crate::auth::{AuthContext, use_auth};
use crate::components::notification::{Notifier, use_notifier};
use crate::components::table::ErrorAlert;
use crate::web::FetchClient;
use crate::web::router::{Link, RouterService, use_router};
use gatewise_shared::protocol::Resource;
use gatewise_shared::route::AppRoute;
use gatewise_shared::ResourceService;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 下拉选项逐页加载，每页条数与页数上限
const OPTIONS_PAGE_SIZE: u32 = 100;
const OPTIONS_MAX_PAGES: u32 = 10;

// =========================================================
// 输入控件
// =========================================================

#[component]
pub fn TextField(
    id: &'static str,
    label: &'static str,
    value: RwSignal<String>,
    #[prop(default = "text")] input_type: &'static str,
    #[prop(optional)] placeholder: &'static str,
    #[prop(optional)] required: bool,
) -> impl IntoView {
    view! {
        <div class="form-control">
            <label for=id class="label">
                <span class="label-text">{label}</span>
            </label>
            <input
                id=id
                type=input_type
                placeholder=placeholder
                required=required
                class="input input-bordered w-full"
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
            />
        </div>
    }
}

#[component]
pub fn TextArea(id: &'static str, label: &'static str, value: RwSignal<String>) -> impl IntoView {
    view! {
        <div class="form-control">
            <label for=id class="label">
                <span class="label-text">{label}</span>
            </label>
            <textarea
                id=id
                class="textarea textarea-bordered w-full"
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
            ></textarea>
        </div>
    }
}

/// 下拉框，选项为 (value, label)
#[component]
pub fn SelectField(
    id: &'static str,
    label: &'static str,
    value: RwSignal<String>,
    #[prop(into)] options: Signal<Vec<(String, String)>>,
    #[prop(optional)] placeholder: Option<&'static str>,
) -> impl IntoView {
    view! {
        <div class="form-control">
            <label for=id class="label">
                <span class="label-text">{label}</span>
            </label>
            <select
                id=id
                class="select select-bordered w-full"
                prop:value=move || value.get()
                on:change=move |ev| value.set(event_target_value(&ev))
            >
                {placeholder.map(|p| view! { <option value="">{p}</option> })}
                {move || {
                    options
                        .get()
                        .into_iter()
                        .map(|(v, l)| {
                            let selected = value.get_untracked() == v;
                            view! { <option value=v selected=selected>{l}</option> }
                        })
                        .collect_view()
                }}
            </select>
        </div>
    }
}

#[component]
pub fn CheckboxField(label: &'static str, value: RwSignal<bool>) -> impl IntoView {
    view! {
        <label class="label cursor-pointer justify-start gap-3">
            <input
                type="checkbox"
                class="checkbox checkbox-primary"
                prop:checked=move || value.get()
                on:change=move |ev| value.set(event_target_checked(&ev))
            />
            <span class="label-text">{label}</span>
        </label>
    }
}

/// 表单外框：标题、错误提示、提交与返回按钮
#[component]
pub fn FormCard(
    title: &'static str,
    back: AppRoute,
    submitting: RwSignal<bool>,
    error: RwSignal<Option<String>>,
    on_submit: Callback<()>,
    children: Children,
) -> impl IntoView {
    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if !submitting.get_untracked() {
            on_submit.run(());
        }
    };

    view! {
        <div class="card bg-base-100 shadow-xl max-w-2xl">
            <form class="card-body gap-4" on:submit=submit>
                <h2 class="card-title">{title}</h2>
                <ErrorAlert error=error />
                {children()}
                <div class="card-actions justify-end mt-4">
                    <Link to=back class="btn btn-ghost">"Cancel"</Link>
                    <button type="submit" class="btn btn-primary" disabled=move || submitting.get()>
                        {move || if submitting.get() {
                            view! { <span class="loading loading-spinner loading-sm"></span> "Saving..." }.into_any()
                        } else {
                            "Save".into_any()
                        }}
                    </button>
                </div>
            </form>
        </div>
    }
}

// =========================================================
// 提交与加载
// =========================================================

/// 一次保存操作：新增或按 id 更新
pub enum Save<R: Resource> {
    Create(R::Create),
    Update(i64, R::Update),
}

/// 表单页用到的上下文，在组件初始化时取出，事件回调里直接使用
#[derive(Clone, Copy)]
pub struct FormServices {
    auth: AuthContext,
    notifier: Notifier,
    router: RouterService,
}

pub fn use_form_services() -> FormServices {
    FormServices {
        auth: use_auth(),
        notifier: use_notifier(),
        router: use_router(),
    }
}

impl FormServices {
    /// 提交表单；成功后提示并返回列表页，失败时把错误写到表单上
    pub fn save<R: Resource + 'static>(
        &self,
        op: Save<R>,
        submitting: RwSignal<bool>,
        error: RwSignal<Option<String>>,
        back: AppRoute,
    ) {
        let service = self.auth.api().resource::<R>();
        let notifier = self.notifier;
        let router = self.router;

        submitting.set(true);
        error.set(None);
        spawn_local(async move {
            let result = match &op {
                Save::Create(dto) => service.create(dto).await,
                Save::Update(id, dto) => service.update(*id, dto).await,
            };
            submitting.try_set(false);
            match result {
                Ok(_) => {
                    notifier.success("Saved successfully");
                    router.navigate_to_route(back);
                }
                Err(e) => {
                    log::warn!("saving {} failed: {e}", R::NAME);
                    error.try_set(Some(e.user_message(&format!("Failed to save {}", R::NAME))));
                }
            }
        });
    }

    /// 编辑页加载单条记录，成功后交给 `fill` 填充表单
    pub fn load_item<R: Resource + 'static>(
        &self,
        id: i64,
        loading: RwSignal<bool>,
        error: RwSignal<Option<String>>,
        fill: impl FnOnce(R::Item) + 'static,
    ) {
        let service = self.auth.api().resource::<R>();
        loading.set(true);
        spawn_local(async move {
            match service.get(id).await {
                Ok(item) => fill(item),
                Err(e) => {
                    log::warn!("loading {} #{id} failed: {e}", R::NAME);
                    let fallback = ResourceService::<R, FetchClient>::fetch_failed_message();
                    error.try_set(Some(e.user_message(&fallback)));
                }
            }
            loading.try_set(false);
        });
    }

    /// 拉取第一页作为下拉选项
    pub fn load_options<R: Resource + 'static>(
        &self,
        label_of: fn(&R::Item) -> String,
    ) -> RwSignal<Vec<(String, String)>> {
        let options = RwSignal::new(Vec::new());
        let service = self.auth.api().resource::<R>();
        spawn_local(async move {
            match service.collect(OPTIONS_PAGE_SIZE, OPTIONS_MAX_PAGES, |_| false).await {
                Ok(all) => {
                    let opts = all
                        .items
                        .iter()
                        .map(|item| (R::id_of(item).to_string(), label_of(item)))
                        .collect();
                    options.try_set(opts);
                }
                Err(e) => log::warn!("loading {} options failed: {e}", R::NAME),
            }
        });
        options
    }
}

// =========================================================
// 解析
// =========================================================

/// 必填的正整数 id
pub fn parse_id(field: &str, raw: &str) -> Result<i64, String> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| format!("Please select a {field}"))
}

pub fn parse_count(field: &str, raw: &str) -> Result<u32, String> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| format!("{field} must be a positive whole number"))
}

/// 金额，不接受负数
pub fn parse_amount(field: &str, raw: &str) -> Result<f64, String> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .ok_or_else(|| format!("{field} must be a non-negative number"))
}

pub fn required(field: &str, raw: &str) -> Result<String, String> {
    let value = raw.trim();
    if value.is_empty() {
        Err(format!("{field} is required"))
    } else {
        Ok(value.to_string())
    }
}

/// 空字符串视为未修改
pub fn changed(raw: &str) -> Option<String> {
    let value = raw.trim();
    (!value.is_empty()).then(|| value.to_string())
}

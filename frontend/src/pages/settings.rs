use crate::auth::{use_auth, use_config};
use crate::components::table::PageHeader;
use gatewise_shared::CurrentUser;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 当前账号与前端运行配置
#[component]
pub fn SettingsPage() -> impl IntoView {
    let auth = use_auth();
    let config = use_config();
    let me = RwSignal::new(Option::<CurrentUser>::None);

    let api = auth.api();
    spawn_local(async move {
        // 失败时保持为空，只是不显示账号信息
        let user = api.current_user().await;
        me.try_set(user);
    });

    let rows = [
        ("API base URL", config.api_base_url.clone()),
        ("Live feed URL", config.ws_base_url.clone()),
        ("Page size", config.page_size.to_string()),
        ("Log level", config.log_level.to_string()),
    ];

    view! {
        <PageHeader title="Settings" />
        <div class="grid lg:grid-cols-2 gap-6">
            <div class="card bg-base-100 shadow">
                <div class="card-body">
                    <h2 class="card-title">"Account"</h2>
                    {move || match me.get() {
                        Some(user) => view! {
                            <p>"Signed in as " <span class="font-semibold">{user.username}</span></p>
                            <p>"Role: " {user.role.unwrap_or_default().as_str()}</p>
                        }
                        .into_any(),
                        None => view! { <p class="text-base-content/60">"Account details unavailable"</p> }.into_any(),
                    }}
                </div>
            </div>
            <div class="card bg-base-100 shadow">
                <div class="card-body">
                    <h2 class="card-title">"Client configuration"</h2>
                    <table class="table table-sm">
                        <tbody>
                            {rows
                                .into_iter()
                                .map(|(k, v)| view! { <tr><th>{k}</th><td class="font-mono">{v}</td></tr> })
                                .collect_view()}
                        </tbody>
                    </table>
                </div>
            </div>
        </div>
    }
}

use crate::auth::use_auth;
use crate::components::table::ErrorAlert;
use crate::web::LocalStorage;
use crate::web::router::Link;
use gatewise_shared::route::AppRoute;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();

    let remembered = LocalStorage::remembered_username();
    let (username, set_username) = signal(remembered.clone().unwrap_or_default());
    let (password, set_password) = signal(String::new());
    let (remember, set_remember) = signal(remembered.is_some());
    let (is_submitting, set_is_submitting) = signal(false);
    let error_msg = RwSignal::new(Option::<String>::None);

    // 登录成功后由路由服务的认证监听跳转到仪表盘，这里不导航
    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let user = username.get_untracked().trim().to_string();
        let pass = password.get_untracked();
        if user.is_empty() || pass.is_empty() {
            error_msg.set(Some("Please fill in all fields".to_string()));
            return;
        }

        set_is_submitting.set(true);
        error_msg.set(None);

        let remember = remember.get_untracked();
        spawn_local(async move {
            match auth.login(user.clone(), pass).await {
                Ok(()) => LocalStorage::remember_username(&user, remember),
                Err(msg) => {
                    error_msg.try_set(Some(msg));
                }
            }
            set_is_submitting.try_set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"GateWise"</h1>
                    <p class="text-base-content/70">"Sign in to manage your parking access"</p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <ErrorAlert error=error_msg />

                        <div class="form-control">
                            <label class="label" for="username">
                                <span class="label-text">"Username"</span>
                            </label>
                            <input
                                id="username"
                                type="text"
                                autocomplete="username"
                                on:input=move |ev| set_username.set(event_target_value(&ev))
                                prop:value=username
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                autocomplete="current-password"
                                placeholder="••••••••"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <label class="label cursor-pointer justify-start gap-3">
                            <input
                                type="checkbox"
                                class="checkbox checkbox-sm"
                                prop:checked=remember
                                on:change=move |ev| set_remember.set(event_target_checked(&ev))
                            />
                            <span class="label-text">"Remember me"</span>
                        </label>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Signing in..." }.into_any()
                                } else {
                                    "Sign in".into_any()
                                }}
                            </button>
                        </div>
                        <div class="text-center text-sm mt-2">
                            <Link to=AppRoute::Landing class="link link-hover">"Back to home"</Link>
                        </div>
                    </form>
                </div>
            </div>
        </div>
    }
}

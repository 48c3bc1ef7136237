//! 登录后页面的外框：侧边菜单与顶栏

use crate::auth::use_auth;
use crate::web::router::{Link, use_router};
use gatewise_shared::Session;
use gatewise_shared::route::{menu_for, menu_parent};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn Shell(children: Children) -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let session = auth.session;

    let active = move || menu_parent(&router.current_route().get());
    let title = move || router.current_route().get().title();
    let role_label = move || {
        if session.with(Session::is_admin) {
            "Administrator"
        } else {
            "Resident"
        }
    };

    let on_logout = move |_| {
        spawn_local(async move {
            auth.server_logout().await;
        });
    };

    view! {
        <div class="drawer lg:drawer-open">
            <input id="gatewise-drawer" type="checkbox" class="drawer-toggle" />
            <div class="drawer-content flex flex-col min-h-screen bg-base-200">
                <div class="navbar bg-base-100 shadow-sm px-4">
                    <div class="flex-1 gap-2">
                        <label for="gatewise-drawer" class="btn btn-ghost btn-sm lg:hidden">"☰"</label>
                        <span class="text-lg font-semibold">{title}</span>
                    </div>
                    <div class="flex-none gap-3 items-center">
                        <span class="badge badge-outline">{role_label}</span>
                        <button class="btn btn-ghost btn-sm" on:click=on_logout>"Log out"</button>
                    </div>
                </div>
                <main class="p-6 flex-1">{children()}</main>
            </div>
            <div class="drawer-side">
                <label for="gatewise-drawer" class="drawer-overlay"></label>
                <aside class="w-64 min-h-full bg-base-100 border-r border-base-300">
                    <div class="p-4 text-xl font-bold text-primary">"GateWise"</div>
                    <ul class="menu px-2">
                        {move || {
                            let current = active();
                            session
                                .with(menu_for)
                                .into_iter()
                                .map(|(route, label)| {
                                    let class = if route == current { "active" } else { "" };
                                    view! {
                                        <li>
                                            <Link to=route class=class>{label}</Link>
                                        </li>
                                    }
                                })
                                .collect_view()
                        }}
                    </ul>
                </aside>
            </div>
        </div>
    }
}

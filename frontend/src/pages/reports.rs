//! 通行报表：全部通行记录与手动车牌核验

use crate::auth::use_auth;
use crate::components::table::{ErrorAlert, PageHeader, ResourceTable, SearchBar, StatusFilter};
use crate::hooks::{Paginated, use_paginated};
use gatewise_shared::protocol::AccessLogs;
use gatewise_shared::{AccessCheckResponse, AccessLog};
use leptos::prelude::*;
use leptos::task::spawn_local;

const HEADERS: &[&str] = &["Time", "Plate", "Result", "Reason"];
const RESULTS: &[(&str, &str)] = &[("granted", "Authorized"), ("denied", "Blocked")];

/// 通行结果徽章，报表与个人历史共用
pub fn access_badge(granted: bool) -> AnyView {
    if granted {
        view! { <span class="badge badge-success">"Authorized"</span> }.into_any()
    } else {
        view! { <span class="badge badge-error">"Blocked"</span> }.into_any()
    }
}

pub fn access_row(log: AccessLog) -> AnyView {
    view! {
        <tr>
            <td class="whitespace-nowrap">{log.timestamp.replace('T', " ")}</td>
            <td class="font-mono">{log.license_plate}</td>
            <td>{access_badge(log.granted)}</td>
            <td>{log.reason}</td>
        </tr>
    }
    .into_any()
}

fn report_row(log: AccessLog, _: Paginated<AccessLogs>) -> AnyView {
    access_row(log)
}

#[component]
fn AccessCheck() -> impl IntoView {
    let auth = use_auth();
    let plate = RwSignal::new(String::new());
    let checking = RwSignal::new(false);
    let result = RwSignal::new(Option::<AccessCheckResponse>::None);
    let error = RwSignal::new(Option::<String>::None);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let value = plate.get_untracked();
        if value.trim().is_empty() {
            error.set(Some("Please enter a license plate".to_string()));
            return;
        }
        checking.set(true);
        error.set(None);
        result.set(None);
        let api = auth.api();
        spawn_local(async move {
            match api.check_access(&value).await {
                Ok(resp) => {
                    log::info!("manual check for {value}: granted={}", resp.access_granted);
                    result.try_set(Some(resp));
                }
                Err(e) => {
                    log::warn!("manual check failed: {e}");
                    error.try_set(Some(e.user_message("Failed to check access")));
                }
            }
            checking.try_set(false);
        });
    };

    view! {
        <div class="card bg-base-100 shadow mb-6">
            <form class="card-body" on:submit=on_submit>
                <h2 class="card-title">"Manual access check"</h2>
                <ErrorAlert error=error />
                <div class="join">
                    <input
                        type="text"
                        class="input input-bordered join-item w-64 font-mono"
                        placeholder="AA-00-BB"
                        prop:value=move || plate.get()
                        on:input=move |ev| plate.set(event_target_value(&ev))
                    />
                    <button type="submit" class="btn btn-primary join-item" disabled=move || checking.get()>
                        "Check"
                    </button>
                </div>
                {move || result.get().map(|r| view! {
                    <div class="flex items-center gap-3 mt-2">
                        {access_badge(r.access_granted)}
                        <span>{r.reason}</span>
                    </div>
                })}
            </form>
        </div>
    }
}

#[component]
pub fn ReportsPage() -> impl IntoView {
    let list = use_paginated::<AccessLogs>();

    view! {
        <PageHeader title="Reports" />
        <AccessCheck />
        <div class="flex items-center">
            <SearchBar list=list placeholder="Search by plate" />
            <StatusFilter list=list options=RESULTS />
            <button class="btn btn-ghost btn-sm mb-4 ml-auto" on:click=move |_| list.reload()>"Refresh"</button>
        </div>
        <ResourceTable list=list headers=HEADERS row=report_row />
    }
}

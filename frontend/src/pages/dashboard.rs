//! 仪表盘
//!
//! 车辆、订阅、支付与通行记录分别拉取，某一项失败只影响对应的卡片。
//! 图表序列在 `Memo` 里按 (数据, 时间窗口, 指标) 派生，切换窗口不会重新请求。

use crate::auth::use_auth;
use crate::components::chart::LineChart;
use crate::components::table::{ErrorAlert, Spinner};
use gatewise_shared::dashboard::{
    ChartMetric, DashboardLoad, DashboardSection, DashboardSummary, chart_series, summarize,
};
use gatewise_shared::date::{DayWindow, today};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
fn StatCard(
    title: &'static str,
    value: Signal<String>,
    #[prop(optional)] accent: &'static str,
) -> impl IntoView {
    view! {
        <div class="stat bg-base-100 rounded-box shadow">
            <div class="stat-title">{title}</div>
            <div class={format!("stat-value text-2xl {accent}")}>{move || value.get()}</div>
        </div>
    }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = use_auth();
    let is_admin = auth.is_admin().get_untracked();
    let end = today();

    let load = RwSignal::new(DashboardLoad::default());
    let loading = RwSignal::new(true);
    let window = RwSignal::new(DayWindow::Last14);
    let metric = RwSignal::new(ChartMetric::Access);

    let api = auth.api();
    spawn_local(async move {
        let loaded = api.load_dashboard(is_admin, end).await;
        load.try_set(loaded);
        loading.try_set(false);
    });

    let series = Memo::new(move |_| {
        let (metric, window) = (metric.get(), window.get());
        load.with(|l| chart_series(metric, &l.data, end, window))
    });
    let summary = Memo::new(move |_| {
        let window = window.get();
        load.with(|l| summarize(&l.data, end, window))
    });

    // 对应分区加载失败时卡片显示占位符
    let card = move |section: DashboardSection, f: fn(&DashboardSummary) -> String| {
        Signal::derive(move || {
            if load.with(|l| l.failed(section)) {
                "n/a".to_string()
            } else {
                summary.with(f)
            }
        })
    };
    let failures = move || load.with(|l| l.failures.clone());
    let truncated = Signal::derive(move || {
        load.with(|l| {
            (!l.truncated.is_empty()).then(|| {
                let names: Vec<_> = l.truncated.iter().map(|s| s.label()).collect();
                format!("Showing the most recent records only for {}", names.join(", "))
            })
        })
    });

    let metrics: Vec<ChartMetric> = ChartMetric::ALL
        .into_iter()
        .filter(|m| is_admin || *m != ChartMetric::Revenue)
        .collect();

    view! {
        <div class="space-y-6">
            <For
                each=failures
                key=|f| f.section
                children=|f| view! { <ErrorAlert error=Signal::derive(move || Some(f.message.clone())) /> }
            />
            {move || truncated.get().map(|msg| view! {
                <div role="alert" class="alert alert-warning text-sm py-2"><span>{msg}</span></div>
            })}
            <Show when=move || !loading.get() fallback=|| view! { <Spinner /> }>
                <div class="grid grid-cols-2 lg:grid-cols-5 gap-4">
                    <StatCard title="Vehicles" value=card(DashboardSection::Vehicles, |s| s.vehicles.to_string()) />
                    <StatCard
                        title="Active subscriptions"
                        value=card(DashboardSection::Subscriptions, |s| s.active_subscriptions.to_string())
                    />
                    <StatCard
                        title="Revenue"
                        value=card(DashboardSection::Payments, |s| format!("{:.2}", s.revenue))
                        accent="text-primary"
                    />
                    <StatCard
                        title="Authorized"
                        value=card(DashboardSection::AccessLogs, |s| s.granted.to_string())
                        accent="text-success"
                    />
                    <StatCard
                        title="Blocked"
                        value=card(DashboardSection::AccessLogs, |s| s.denied.to_string())
                        accent="text-error"
                    />
                </div>
            </Show>

            <div class="card bg-base-100 shadow">
                <div class="card-body">
                    <div class="flex flex-wrap items-center justify-between gap-4">
                        <h2 class="card-title">{move || metric.get().label()}</h2>
                        <div class="flex gap-2">
                            <select
                                class="select select-bordered select-sm"
                                on:change=move |ev| metric.set(ChartMetric::from_key(&event_target_value(&ev)))
                            >
                                {metrics.into_iter().map(|m| view! {
                                    <option value={m.key()} selected=move || metric.get() == m>{m.label()}</option>
                                }).collect_view()}
                            </select>
                            <select
                                class="select select-bordered select-sm"
                                on:change=move |ev| {
                                    let days = event_target_value(&ev).parse().unwrap_or(14);
                                    window.set(DayWindow::from_days(days).unwrap_or_default());
                                }
                            >
                                {DayWindow::ALL.into_iter().map(|w| view! {
                                    <option value={w.days().to_string()} selected=move || window.get() == w>{w.label()}</option>
                                }).collect_view()}
                            </select>
                        </div>
                    </div>
                    <LineChart series=series />
                </div>
            </div>
        </div>
    }
}

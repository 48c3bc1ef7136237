//! 实时监控
//!
//! 启动监控后打开 WebSocket，每一帧都整体覆盖车辆列表或系统状态；
//! 另外每 5 秒轮询一次状态接口。页面销毁时连接与定时器随之释放。

use crate::auth::{use_auth, use_config};
use crate::components::notification::use_notifier;
use crate::components::table::{ErrorAlert, PageHeader};
use crate::web::MonitorSocket;
use gatewise_shared::monitor::{MonitorMessage, MonitorState, SystemStatus};
use gatewise_shared::protocol::MONITORING_WS_PATH;
use gloo_timers::callback::Interval;
use leptos::prelude::*;
use leptos::task::spawn_local;

const STATUS_POLL_MS: u32 = 5_000;

#[component]
pub fn MonitoringPage() -> impl IntoView {
    let auth = use_auth();
    let notifier = use_notifier();
    let ws_url = StoredValue::new(format!("{}{}", use_config().ws_base_url, MONITORING_WS_PATH));

    let state = RwSignal::new(MonitorState::default());
    let connected = RwSignal::new(false);
    let busy = RwSignal::new(false);
    let error = RwSignal::new(Option::<String>::None);
    let socket = StoredValue::<Option<MonitorSocket>, LocalStorage>::new_local(None);
    let poll = StoredValue::<Option<Interval>, LocalStorage>::new_local(None);

    let apply_status = move |status: SystemStatus| {
        state.try_update(|s| s.apply(MonitorMessage::StatusUpdate { status }));
    };

    let refresh_status = move || {
        let api = auth.api();
        spawn_local(async move {
            match api.monitoring_status().await {
                Ok(status) => apply_status(status),
                Err(e) => log::debug!("monitoring status poll failed: {e}"),
            }
        });
    };

    let connect = move || {
        let url = ws_url.get_value();
        let result = MonitorSocket::connect(
            &url,
            move |frame| {
                state.try_update(|s| s.apply_frame(&frame));
            },
            move || {
                error.try_set(Some("Live connection error".to_string()));
            },
            move || {
                connected.try_set(false);
            },
        );
        match result {
            Ok(ws) => {
                // 页面已销毁时连接随返回值一起 drop
                let _ = socket.try_set_value(Some(ws));
                connected.try_set(true);
            }
            Err(e) => {
                log::error!("failed to open monitoring websocket: {e}");
                error.try_set(Some("Failed to open live connection".to_string()));
            }
        }
    };

    // 首次进入：读取状态，若监控已在运行则直接连上
    {
        let api = auth.api();
        spawn_local(async move {
            match api.monitoring_status().await {
                Ok(status) => {
                    let running = status.is_monitoring;
                    apply_status(status);
                    if running {
                        connect();
                    }
                }
                Err(e) => {
                    log::warn!("monitoring status failed: {e}");
                    error.try_set(Some(e.user_message("Failed to fetch monitoring status")));
                }
            }
        });
    }
    poll.set_value(Some(Interval::new(STATUS_POLL_MS, refresh_status)));

    let on_start = move |_| {
        busy.set(true);
        error.set(None);
        let api = auth.api();
        spawn_local(async move {
            match api.start_monitoring().await {
                Ok(ack) => {
                    log::info!("monitoring started: {}", ack.message);
                    notifier.success("Monitoring started");
                    connect();
                    refresh_status();
                }
                Err(e) => {
                    error.try_set(Some(e.user_message("Failed to start monitoring")));
                }
            }
            busy.try_set(false);
        });
    };

    let on_stop = move |_| {
        busy.set(true);
        error.set(None);
        let api = auth.api();
        spawn_local(async move {
            match api.stop_monitoring().await {
                Ok(ack) => {
                    log::info!("monitoring stopped: {}", ack.message);
                    notifier.success("Monitoring stopped");
                    let _ = socket.try_set_value(None);
                    connected.try_set(false);
                    refresh_status();
                }
                Err(e) => {
                    error.try_set(Some(e.user_message("Failed to stop monitoring")));
                }
            }
            busy.try_set(false);
        });
    };

    on_cleanup(move || {
        log::debug!("leaving monitoring view");
        socket.dispose();
        poll.dispose();
    });

    let status = move || state.with(|s| s.status.clone().unwrap_or_default());

    view! {
        <PageHeader title="Live Monitoring" />
        <ErrorAlert error=error />
        <div class="grid grid-cols-2 lg:grid-cols-4 gap-4 my-4">
            <div class="stat bg-base-100 rounded-box shadow">
                <div class="stat-title">"Monitoring"</div>
                <div class="stat-value text-xl">
                    {move || if status().is_monitoring { "Running" } else { "Stopped" }}
                </div>
            </div>
            <div class="stat bg-base-100 rounded-box shadow">
                <div class="stat-title">"Camera"</div>
                <div class="stat-value text-xl">{move || if status().camera_status { "Online" } else { "Offline" }}</div>
                <div class="stat-desc">{move || status().camera_message}</div>
            </div>
            <div class="stat bg-base-100 rounded-box shadow">
                <div class="stat-title">"Vehicles on site"</div>
                <div class="stat-value text-xl">{move || status().active_vehicles}</div>
            </div>
            <div class="stat bg-base-100 rounded-box shadow">
                <div class="stat-title">"Live feed"</div>
                <div class="stat-value text-xl">{move || if connected.get() { "Connected" } else { "Offline" }}</div>
                <div class="stat-desc">{move || format!("{} viewers", status().connected_clients)}</div>
            </div>
        </div>

        <div class="flex gap-2 mb-4">
            <button class="btn btn-success btn-sm" disabled={move || busy.get() || status().is_monitoring} on:click=on_start>
                "Start"
            </button>
            <button class="btn btn-error btn-sm" disabled={move || busy.get() || !status().is_monitoring} on:click=on_stop>
                "Stop"
            </button>
        </div>

        <div class="overflow-x-auto">
            <table class="table table-zebra w-full">
                <thead>
                    <tr><th>"Plate"</th><th>"Entry"</th><th>"Exit"</th><th>"Confidence"</th><th>"Status"</th></tr>
                </thead>
                <tbody>
                    {move || state.with(|s| {
                        if s.vehicles.is_empty() {
                            view! {
                                <tr><td colspan="5" class="text-center text-base-content/60">"No vehicles detected"</td></tr>
                            }
                            .into_any()
                        } else {
                            s.vehicles
                                .iter()
                                .map(|v| view! {
                                    <tr>
                                        <td class="font-mono">{v.license_plate.clone()}</td>
                                        <td>{v.entry_time.clone()}</td>
                                        <td>{v.exit_time.clone().unwrap_or_else(|| "-".to_string())}</td>
                                        <td>{v.confidence_percent()}</td>
                                        <td>{v.status.clone()}</td>
                                    </tr>
                                })
                                .collect_view()
                                .into_any()
                        }
                    })}
                </tbody>
            </table>
        </div>
    }
}

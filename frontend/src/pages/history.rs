use crate::auth::{use_auth, use_config};
use crate::components::table::{ErrorAlert, PageHeader, Pagination};
use crate::hooks::RequestSeq;
use crate::pages::reports::access_row;
use gatewise_shared::{AccessLog, Page, PageQuery};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 当前用户自己的通行记录
#[component]
pub fn HistoryPage() -> impl IntoView {
    let auth = use_auth();
    let size = use_config().page_size;

    let page = RwSignal::new(1u32);
    let data = RwSignal::new(Page::<AccessLog>::empty(1, size));
    let loading = RwSignal::new(true);
    let error = RwSignal::new(Option::<String>::None);
    let seq = StoredValue::new(RequestSeq::default());

    Effect::new(move |_| {
        let query = PageQuery::new(page.get(), size);
        let api = auth.api();
        let current = seq.try_update_value(RequestSeq::next).unwrap_or_default();
        loading.set(true);
        spawn_local(async move {
            let result = api.my_access_logs(&query).await;
            if !seq.try_with_value(|s| s.is_current(current)).unwrap_or(false) {
                return;
            }
            match result {
                Ok(p) => {
                    data.try_set(p);
                    error.try_set(None);
                }
                Err(e) => {
                    log::warn!("my access logs failed: {e}");
                    error.try_set(Some(e.user_message("Failed to fetch access history")));
                }
            }
            loading.try_set(false);
        });
    });

    let pages = Signal::derive(move || data.with(|p| p.pages));
    let total = Signal::derive(move || data.with(|p| p.total));

    view! {
        <PageHeader title="My Access History" />
        <ErrorAlert error=error />
        <div class="overflow-x-auto">
            <table class="table table-zebra w-full">
                <thead>
                    <tr><th>"Time"</th><th>"Plate"</th><th>"Result"</th><th>"Reason"</th></tr>
                </thead>
                <tbody>
                    {move || {
                        if loading.get() && data.with(|p| p.items.is_empty()) {
                            view! {
                                <tr><td colspan="4" class="text-center"><span class="loading loading-spinner"></span></td></tr>
                            }
                            .into_any()
                        } else {
                            data.get().items.into_iter().map(access_row).collect_view().into_any()
                        }
                    }}
                </tbody>
            </table>
        </div>
        <Pagination page=page pages=pages total=total />
    }
}

//! 列表页通用组件：表格、分页、搜索框、错误提示

use crate::hooks::Paginated;
use crate::web::router::Link;
use gatewise_shared::protocol::Resource;
use gatewise_shared::route::AppRoute;
use leptos::prelude::*;

/// 错误提示条，没有错误时不渲染
#[component]
pub fn ErrorAlert(#[prop(into)] error: Signal<Option<String>>) -> impl IntoView {
    move || {
        error.get().map(|msg| {
            view! {
                <div role="alert" class="alert alert-error text-sm py-2">
                    <span>{msg}</span>
                </div>
            }
        })
    }
}

#[component]
pub fn Spinner() -> impl IntoView {
    view! {
        <div class="flex justify-center py-10">
            <span class="loading loading-spinner loading-lg text-primary"></span>
        </div>
    }
}

/// 页面标题栏，右侧可选"新增"按钮
#[component]
pub fn PageHeader(
    title: &'static str,
    #[prop(default = None)] add: Option<(AppRoute, &'static str)>,
) -> impl IntoView {
    view! {
        <div class="flex items-center justify-between mb-6">
            <h1 class="text-2xl font-bold">{title}</h1>
            {add.map(|(to, label)| view! {
                <Link to=to class="btn btn-primary btn-sm">{label}</Link>
            })}
        </div>
    }
}

/// 上一页/下一页
#[component]
pub fn Pagination(
    page: RwSignal<u32>,
    #[prop(into)] pages: Signal<u32>,
    #[prop(into)] total: Signal<u64>,
) -> impl IntoView {
    let has_prev = move || page.get() > 1;
    let has_next = move || page.get() < pages.get();

    view! {
        <div class="flex items-center justify-between mt-4 text-sm">
            <span class="text-base-content/70">
                {move || format!("Page {} of {} ({} total)", page.get(), pages.get().max(1), total.get())}
            </span>
            <div class="join">
                <button
                    class="join-item btn btn-sm"
                    disabled=move || !has_prev()
                    on:click=move |_| page.update(|p| *p = p.saturating_sub(1).max(1))
                >
                    "«"
                </button>
                <button
                    class="join-item btn btn-sm"
                    disabled=move || !has_next()
                    on:click=move |_| page.update(|p| *p += 1)
                >
                    "»"
                </button>
            </div>
        </div>
    }
}

/// 搜索框，提交时回到第一页
#[component]
pub fn SearchBar<R: Resource + 'static>(
    list: Paginated<R>,
    placeholder: &'static str,
) -> impl IntoView {
    let draft = RwSignal::new(list.search.get_untracked());

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        list.set_search(draft.get_untracked().trim().to_string());
    };

    view! {
        <form class="join mb-4" on:submit=on_submit>
            <input
                type="search"
                class="input input-bordered input-sm join-item w-64"
                placeholder=placeholder
                prop:value=move || draft.get()
                on:input=move |ev| draft.set(event_target_value(&ev))
            />
            <button type="submit" class="btn btn-sm join-item">"Search"</button>
        </form>
    }
}

/// 状态筛选下拉框，空值表示全部
#[component]
pub fn StatusFilter<R: Resource + 'static>(
    list: Paginated<R>,
    options: &'static [(&'static str, &'static str)],
) -> impl IntoView {
    view! {
        <select
            class="select select-bordered select-sm mb-4 ml-2"
            on:change=move |ev| list.set_status(event_target_value(&ev))
        >
            <option value="">"All statuses"</option>
            {options
                .iter()
                .map(|(value, label)| view! { <option value=*value>{*label}</option> })
                .collect_view()}
        </select>
    }
}

/// 分页资源表格
///
/// `row` 渲染一行 `<tr>`，拿到 `list` 以便行内删除。
#[component]
pub fn ResourceTable<R: Resource + 'static>(
    list: Paginated<R>,
    headers: &'static [&'static str],
    row: fn(R::Item, Paginated<R>) -> AnyView,
) -> impl IntoView {
    let empty = move || list.data.with(|p| p.items.is_empty());

    view! {
        <ErrorAlert error=list.error />
        <div class="overflow-x-auto">
            <table class="table table-zebra w-full">
                <thead>
                    <tr>
                        {headers.iter().map(|h| view! { <th>{*h}</th> }).collect_view()}
                    </tr>
                </thead>
                <tbody>
                    <Show when=move || list.loading.get() && empty()>
                        <tr>
                            <td colspan={headers.len().to_string()} class="text-center">
                                <span class="loading loading-spinner"></span>
                            </td>
                        </tr>
                    </Show>
                    <Show when=move || !list.loading.get() && empty()>
                        <tr>
                            <td colspan={headers.len().to_string()} class="text-center text-base-content/60">"No records found"</td>
                        </tr>
                    </Show>
                    <For
                        each=move || list.items()
                        key=|item| R::id_of(item)
                        children=move |item| row(item, list)
                    />
                </tbody>
            </table>
        </div>
        <Pagination page=list.page pages=list.pages() total=list.total() />
    }
}

/// 行内操作：编辑链接与带确认的删除按钮
#[component]
pub fn RowActions<R: Resource + 'static>(
    list: Paginated<R>,
    id: i64,
    #[prop(optional)] edit: Option<AppRoute>,
    #[prop(default = true)] deletable: bool,
) -> impl IntoView {
    let on_delete = move |_| {
        if confirm(&format!("Delete this record (#{id})?")) {
            list.delete(id);
        }
    };

    view! {
        <td class="flex gap-2">
            {edit.map(|to| view! { <Link to=to class="btn btn-ghost btn-xs">"Edit"</Link> })}
            <Show when=move || deletable>
                <button class="btn btn-error btn-outline btn-xs" on:click=on_delete>"Delete"</button>
            </Show>
        </td>
    }
}

fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

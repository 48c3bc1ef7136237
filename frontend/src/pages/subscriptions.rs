use crate::auth::use_auth;
use crate::components::form::{FormCard, Save, SelectField, TextField, changed, parse_id, use_form_services};
use crate::components::notification::use_notifier;
use crate::components::table::{PageHeader, ResourceTable, RowActions, Spinner, StatusFilter};
use crate::hooks::{Paginated, use_paginated};
use crate::web::router::{Link, use_router};
use gatewise_shared::parking::SpaceAssignment;
use gatewise_shared::protocol::{ParkingSpaces, Plans, Subscriptions, Users};
use gatewise_shared::route::AppRoute;
use gatewise_shared::{ParkingSpace, Subscription, SubscriptionCreate};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 候选车位逐页加载的上限
const SPACES_PAGE_SIZE: u32 = 100;
const SPACES_MAX_PAGES: u32 = 10;

const HEADERS: &[&str] = &["Resident", "Plan", "Start", "End", "Spaces", "Price", "Status", ""];
const STATUSES: &[(&str, &str)] = &[("active", "Active"), ("expired", "Expired"), ("cancelled", "Cancelled")];

#[derive(Clone, Copy)]
pub struct SubscriptionForm {
    pub user_id: RwSignal<String>,
    pub plan_id: RwSignal<String>,
    pub start_date: RwSignal<String>,
}

impl SubscriptionForm {
    pub fn new() -> Self {
        Self {
            user_id: RwSignal::new(String::new()),
            plan_id: RwSignal::new(String::new()),
            start_date: RwSignal::new(String::new()),
        }
    }

    /// 未填开始日期时由服务端取当天
    pub fn to_request(&self) -> Result<SubscriptionCreate, String> {
        Ok(SubscriptionCreate {
            user_id: parse_id("resident", &self.user_id.get_untracked())?,
            plan_id: parse_id("plan", &self.plan_id.get_untracked())?,
            start_date: changed(&self.start_date.get_untracked()),
        })
    }
}

impl Default for SubscriptionForm {
    fn default() -> Self {
        Self::new()
    }
}

fn status_badge(status: &str) -> &'static str {
    match status {
        "active" => "badge badge-success",
        "expired" => "badge badge-ghost",
        _ => "badge badge-warning",
    }
}

fn subscription_row(s: Subscription, list: Paginated<Subscriptions>) -> AnyView {
    let is_admin = use_auth().is_admin().get_untracked();
    let resident = s.user_full_name.clone().unwrap_or_else(|| format!("#{}", s.user_id));
    let plan = s.plan_name.clone().unwrap_or_else(|| format!("#{}", s.plan_id));
    let id = s.id;
    view! {
        <tr>
            <td>{resident}</td>
            <td>{plan}</td>
            <td>{s.start_date.clone()}</td>
            <td>{s.end_date.clone()}</td>
            <td>
                {s.spaces_allocated}
                {(is_admin && s.spaces_allocated > 0).then(|| view! {
                    <Link to=AppRoute::AssignSpaces(id) class="btn btn-ghost btn-xs ml-2">"Assign"</Link>
                })}
            </td>
            <td>{format!("{:.2}", s.price_at_subscription)}</td>
            <td><span class={status_badge(&s.status)}>{s.status.clone()}</span></td>
            <Show when=move || is_admin fallback=|| view! { <td></td> }>
                <RowActions list=list id=id />
            </Show>
        </tr>
    }
    .into_any()
}

#[component]
pub fn SubscriptionsPage() -> impl IntoView {
    let list = use_paginated::<Subscriptions>();
    let is_admin = use_auth().is_admin().get_untracked();
    let add = is_admin.then_some((AppRoute::AddSubscription, "Add subscription"));

    view! {
        <PageHeader title="Subscriptions" add=add />
        <StatusFilter list=list options=STATUSES />
        <ResourceTable list=list headers=HEADERS row=subscription_row />
    }
}

#[component]
pub fn AddSubscriptionPage() -> impl IntoView {
    let services = use_form_services();
    let form = SubscriptionForm::new();
    let submitting = RwSignal::new(false);
    let error = RwSignal::new(None);
    let residents = services.load_options::<Users>(|u| format!("{} ({})", u.full_name, u.username));
    let plans = services.load_options::<Plans>(|p| format!("{} - {:.2} / {} days", p.name, p.price, p.duration_days));

    let on_submit = Callback::new(move |_| match form.to_request() {
        Ok(dto) => services.save::<Subscriptions>(Save::Create(dto), submitting, error, AppRoute::Subscriptions),
        Err(msg) => error.set(Some(msg)),
    });

    view! {
        <FormCard title="Add subscription" back=AppRoute::Subscriptions submitting=submitting error=error on_submit=on_submit>
            <SelectField id="user" label="Resident" value=form.user_id options=residents placeholder="Select a resident" />
            <SelectField id="plan" label="Plan" value=form.plan_id options=plans placeholder="Select a plan" />
            <TextField id="start_date" label="Start date" value=form.start_date input_type="date" />
        </FormCard>
    }
}

/// 把下拉框的值转成车位 id，空值表示未选
fn parse_slot(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|id| *id > 0)
}

/// 为订阅的每个名额挑选一个未分配车位，提交后逐个标记为已分配
#[component]
pub fn AssignSpacesPage(id: i64) -> impl IntoView {
    let auth = use_auth();
    let notifier = use_notifier();
    let router = use_router();
    let subscription = RwSignal::new(Option::<Subscription>::None);
    let spaces = RwSignal::new(Vec::<ParkingSpace>::new());
    let assignment = RwSignal::new(SpaceAssignment::default());
    let loading = RwSignal::new(true);
    let submitting = RwSignal::new(false);
    let error = RwSignal::new(Option::<String>::None);

    let api = auth.api();
    spawn_local(async move {
        match api.resource::<Subscriptions>().get(id).await {
            Ok(s) => {
                assignment.try_set(SpaceAssignment::new(s.spaces_allocated));
                subscription.try_set(Some(s));
            }
            Err(e) => {
                log::warn!("loading subscription #{id} failed: {e}");
                error.try_set(Some(e.user_message("Failed to fetch subscriptions")));
            }
        }
        match api
            .resource::<ParkingSpaces>()
            .collect(SPACES_PAGE_SIZE, SPACES_MAX_PAGES, |_| false)
            .await
        {
            Ok(all) => {
                spaces.try_set(all.items);
            }
            Err(e) => {
                log::warn!("loading parking spaces failed: {e}");
                error.try_set(Some(e.user_message("Failed to fetch parking spaces.")));
            }
        }
        loading.try_set(false);
    });

    let on_submit = Callback::new(move |_| {
        let ids = match assignment.with_untracked(SpaceAssignment::validate) {
            Ok(ids) => ids,
            Err(msg) => {
                error.set(Some(msg));
                return;
            }
        };
        submitting.set(true);
        error.set(None);
        let service = auth.api().resource::<ParkingSpaces>();
        spawn_local(async move {
            let result = service.allocate(&ids).await;
            submitting.try_set(false);
            match result {
                Ok(_) => {
                    notifier.success(format!("Assigned {} parking spaces", ids.len()));
                    router.navigate_to_route(AppRoute::Subscriptions);
                }
                Err(e) => {
                    error.try_set(Some(e.user_message("Failed to assign parking spaces")));
                }
            }
        });
    });

    let summary = move || {
        subscription.get().map(|s| {
            let resident = s.user_full_name.clone().unwrap_or_else(|| format!("#{}", s.user_id));
            let plan = s.plan_name.clone().unwrap_or_else(|| format!("#{}", s.plan_id));
            view! {
                <p>"Resident: " <span class="font-semibold">{resident}</span></p>
                <p>"Plan: " <span class="font-semibold">{plan}</span></p>
            }
        })
    };

    let slots = move || {
        let count = assignment.with(SpaceAssignment::len);
        (0..count)
            .map(|slot| {
                let options = move || {
                    let chosen = assignment.with(|a| a.selected(slot));
                    spaces.with(|all| {
                        assignment.with(|a| {
                            a.candidates(slot, all)
                                .into_iter()
                                .map(|space| {
                                    let selected = chosen == Some(space.id);
                                    view! {
                                        <option value=space.id.to_string() selected=selected>{space.name.clone()}</option>
                                    }
                                })
                                .collect_view()
                        })
                    })
                };
                view! {
                    <div class="form-control">
                        <label class="label">
                            <span class="label-text">{format!("Parking Space #{}", slot + 1)}</span>
                        </label>
                        <select
                            class="select select-bordered w-full"
                            on:change=move |ev| {
                                let picked = parse_slot(&event_target_value(&ev));
                                assignment.update(|a| a.select(slot, picked));
                            }
                        >
                            <option value="">"Select a parking space"</option>
                            {options}
                        </select>
                    </div>
                }
            })
            .collect_view()
    };

    view! {
        <Show when=move || !loading.get() fallback=|| view! { <Spinner /> }>
            <FormCard
                title="Assign parking spaces"
                back=AppRoute::Subscriptions
                submitting=submitting
                error=error
                on_submit=on_submit
            >
                {summary}
                {slots}
            </FormCard>
        </Show>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_slot_treats_blank_as_unselected() {
        assert_eq!(parse_slot(""), None);
        assert_eq!(parse_slot("0"), None);
        assert_eq!(parse_slot(" 12 "), Some(12));
        assert_eq!(parse_slot("abc"), None);
    }
}

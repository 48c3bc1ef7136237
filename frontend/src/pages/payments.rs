use crate::auth::use_auth;
use crate::components::form::{FormCard, Save, SelectField, TextField, parse_amount, parse_id, use_form_services};
use crate::components::notification::use_notifier;
use crate::components::table::{ErrorAlert, PageHeader, ResourceTable, RowActions, Spinner, StatusFilter};
use crate::hooks::{Paginated, use_paginated};
use crate::web::router::{Link, use_router};
use gatewise_shared::checkout;
use gatewise_shared::protocol::{Payments, Subscriptions};
use gatewise_shared::route::AppRoute;
use gatewise_shared::{Payment, PaymentCreate, PaymentStatus};
use leptos::prelude::*;
use leptos::task::spawn_local;

const HEADERS: &[&str] = &["#", "Subscription", "Amount", "Paid at", "Status", "", ""];
const STATUSES: &[(&str, &str)] = &[("paid", "Paid"), ("pending", "Pending"), ("failed", "Failed")];

fn parse_status(raw: &str) -> PaymentStatus {
    match raw {
        "pending" => PaymentStatus::Pending,
        "failed" => PaymentStatus::Failed,
        _ => PaymentStatus::Paid,
    }
}

#[derive(Clone, Copy)]
pub struct PaymentForm {
    pub subscription_id: RwSignal<String>,
    pub amount: RwSignal<String>,
    pub status: RwSignal<String>,
}

impl PaymentForm {
    pub fn new() -> Self {
        Self {
            subscription_id: RwSignal::new(String::new()),
            amount: RwSignal::new(String::new()),
            status: RwSignal::new(PaymentStatus::Paid.as_str().to_string()),
        }
    }

    pub fn to_request(&self) -> Result<PaymentCreate, String> {
        Ok(PaymentCreate {
            subscription_id: parse_id("subscription", &self.subscription_id.get_untracked())?,
            amount: parse_amount("Amount", &self.amount.get_untracked())?,
            status: Some(parse_status(&self.status.get_untracked())),
        })
    }
}

impl Default for PaymentForm {
    fn default() -> Self {
        Self::new()
    }
}

fn payment_row(p: Payment, list: Paginated<Payments>) -> AnyView {
    let badge = match p.status {
        PaymentStatus::Paid => "badge badge-success",
        PaymentStatus::Pending => "badge badge-warning",
        PaymentStatus::Failed => "badge badge-error",
        PaymentStatus::Unknown => "badge badge-ghost",
    };
    view! {
        <tr>
            <td>{p.id}</td>
            <td>{format!("#{}", p.subscription_id)}</td>
            <td>{format!("{:.2}", p.amount)}</td>
            <td>{p.paid_at.clone().unwrap_or_else(|| "-".to_string())}</td>
            <td><span class=badge>{p.status.as_str()}</span></td>
            <td>
                {(p.status != PaymentStatus::Paid).then(|| view! {
                    <Link to=AppRoute::PaymentLink(p.id) class="btn btn-ghost btn-xs">"Payment link"</Link>
                })}
            </td>
            <RowActions list=list id=p.id />
        </tr>
    }
    .into_any()
}

#[component]
pub fn PaymentsPage() -> impl IntoView {
    let list = use_paginated::<Payments>();

    view! {
        <PageHeader title="Payments" add={Some((AppRoute::AddPayment, "Add payment"))} />
        <StatusFilter list=list options=STATUSES />
        <ResourceTable list=list headers=HEADERS row=payment_row />
    }
}

#[component]
pub fn AddPaymentPage() -> impl IntoView {
    let services = use_form_services();
    let form = PaymentForm::new();
    let submitting = RwSignal::new(false);
    let error = RwSignal::new(None);
    let subscriptions = services.load_options::<Subscriptions>(|s| {
        let who = s.user_full_name.clone().unwrap_or_else(|| format!("user #{}", s.user_id));
        let plan = s.plan_name.clone().unwrap_or_else(|| format!("plan #{}", s.plan_id));
        format!("#{} {who} - {plan}", s.id)
    });
    let statuses = Signal::stored(
        STATUSES
            .iter()
            .map(|(v, l)| (v.to_string(), l.to_string()))
            .collect::<Vec<_>>(),
    );

    let on_submit = Callback::new(move |_| match form.to_request() {
        Ok(dto) => services.save::<Payments>(Save::Create(dto), submitting, error, AppRoute::Payments),
        Err(msg) => error.set(Some(msg)),
    });

    view! {
        <FormCard title="Add payment" back=AppRoute::Payments submitting=submitting error=error on_submit=on_submit>
            <SelectField id="subscription" label="Subscription" value=form.subscription_id options=subscriptions placeholder="Select a subscription" />
            <TextField id="amount" label="Amount" value=form.amount input_type="number" required=true />
            <SelectField id="status" label="Status" value=form.status options=statuses />
        </FormCard>
    }
}

/// 支付链接页：加载一笔付款，确认后标记为已支付
#[component]
pub fn PaymentLinkPage(id: i64) -> impl IntoView {
    let auth = use_auth();
    let notifier = use_notifier();
    let router = use_router();
    let payment = RwSignal::new(Option::<Payment>::None);
    let loading = RwSignal::new(true);
    let processing = RwSignal::new(false);
    let error = RwSignal::new(Option::<String>::None);

    let service = auth.api().resource::<Payments>();
    spawn_local(async move {
        match service.get(id).await {
            Ok(p) => {
                if let Err(msg) = checkout::check_payable(&p) {
                    error.try_set(Some(msg.to_string()));
                }
                payment.try_set(Some(p));
            }
            Err(e) => {
                log::warn!("loading payment #{id} failed: {e}");
                error.try_set(Some(checkout::load_error_message(&e).to_string()));
            }
        }
        loading.try_set(false);
    });

    let payable = move || {
        payment.with(|p| p.as_ref().is_some_and(|p| checkout::check_payable(p).is_ok()))
    };

    let on_pay = move |_| {
        if processing.get_untracked() || !payable() {
            return;
        }
        processing.set(true);
        error.set(None);
        let service = auth.api().resource::<Payments>();
        spawn_local(async move {
            let result = service.mark_as_paid(id).await;
            processing.try_set(false);
            match result {
                Ok(()) => {
                    log::info!("payment #{id} completed");
                    notifier.success(checkout::PAY_SUCCEEDED);
                    router.navigate_to_route(AppRoute::Payments);
                }
                Err(e) => {
                    log::warn!("completing payment #{id} failed: {e}");
                    error.try_set(Some(checkout::pay_error_message(&e).to_string()));
                }
            }
        });
    };

    let details = move || {
        payment.get().map(|p| {
            let rows = [
                ("Payment ID", p.id.to_string()),
                ("Subscription ID", p.subscription_id.to_string()),
                ("Amount", format!("€{:.2}", p.amount)),
                ("Status", p.status.as_str().to_string()),
            ];
            view! {
                <table class="table table-sm">
                    <tbody>
                        {rows
                            .into_iter()
                            .map(|(k, v)| view! { <tr><th>{k}</th><td>{v}</td></tr> })
                            .collect_view()}
                    </tbody>
                </table>
            }
        })
    };

    view! {
        <div class="card bg-base-100 shadow-xl max-w-xl mx-auto">
            <div class="card-body gap-4">
                <h2 class="card-title">"Complete Payment"</h2>
                <Show when=move || !loading.get() fallback=|| view! { <Spinner /> }>
                    <ErrorAlert error=error />
                    <Show when=payable>
                        <p class="text-sm text-base-content/70">
                            "Please review the payment details below and click \"Complete Payment\" to proceed."
                        </p>
                    </Show>
                    {details}
                    <div class="card-actions justify-end mt-4">
                        <Link to=AppRoute::Dashboard class="btn btn-ghost">"Cancel"</Link>
                        <button
                            class="btn btn-primary"
                            disabled=move || processing.get() || !payable()
                            on:click=on_pay
                        >
                            {move || if processing.get() {
                                view! { <span class="loading loading-spinner loading-sm"></span> "Processing..." }.into_any()
                            } else {
                                "Complete Payment".into_any()
                            }}
                        </button>
                    </div>
                </Show>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status_defaults_to_paid() {
        assert_eq!(parse_status("pending"), PaymentStatus::Pending);
        assert_eq!(parse_status("failed"), PaymentStatus::Failed);
        assert_eq!(parse_status(""), PaymentStatus::Paid);
    }
}

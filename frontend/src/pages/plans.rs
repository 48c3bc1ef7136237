use crate::components::form::{
    CheckboxField, FormCard, Save, TextArea, TextField, parse_amount, parse_count, required,
    use_form_services,
};
use crate::components::table::{PageHeader, ResourceTable, RowActions, SearchBar, Spinner};
use crate::hooks::{Paginated, use_paginated};
use gatewise_shared::protocol::Plans;
use gatewise_shared::route::AppRoute;
use gatewise_shared::{Plan, PlanCreate, PlanUpdate};
use leptos::prelude::*;

const HEADERS: &[&str] = &["Name", "Price", "Spaces", "Duration", "Status", ""];

#[derive(Clone, Copy)]
pub struct PlanForm {
    pub name: RwSignal<String>,
    pub description: RwSignal<String>,
    pub price: RwSignal<String>,
    pub num_spaces: RwSignal<String>,
    pub duration_days: RwSignal<String>,
    pub active: RwSignal<bool>,
}

impl PlanForm {
    pub fn new() -> Self {
        Self {
            name: RwSignal::new(String::new()),
            description: RwSignal::new(String::new()),
            price: RwSignal::new(String::new()),
            num_spaces: RwSignal::new("1".to_string()),
            duration_days: RwSignal::new("30".to_string()),
            active: RwSignal::new(true),
        }
    }

    pub fn fill(&self, p: &Plan) {
        self.name.set(p.name.clone());
        self.description.set(p.description.clone().unwrap_or_default());
        self.price.set(p.price.to_string());
        self.num_spaces.set(p.num_spaces.to_string());
        self.duration_days.set(p.duration_days.to_string());
        self.active.set(p.is_active());
    }

    pub fn to_create(&self) -> Result<PlanCreate, String> {
        Ok(PlanCreate {
            name: required("Name", &self.name.get_untracked())?,
            description: self.description.get_untracked().trim().to_string(),
            price: parse_amount("Price", &self.price.get_untracked())?,
            num_spaces: parse_count("Spaces", &self.num_spaces.get_untracked())?,
            duration_days: parse_count("Duration", &self.duration_days.get_untracked())?,
        })
    }

    /// 更新时发送全部字段，`active` 以 0/1 表示
    pub fn to_update(&self) -> Result<PlanUpdate, String> {
        let create = self.to_create()?;
        Ok(PlanUpdate {
            name: Some(create.name),
            description: Some(create.description),
            price: Some(create.price),
            num_spaces: Some(create.num_spaces),
            duration_days: Some(create.duration_days),
            active: Some(i64::from(self.active.get_untracked())),
        })
    }
}

impl Default for PlanForm {
    fn default() -> Self {
        Self::new()
    }
}

fn plan_row(p: Plan, list: Paginated<Plans>) -> AnyView {
    let (badge, label) = if p.is_active() {
        ("badge badge-success", "Active")
    } else {
        ("badge badge-ghost", "Inactive")
    };
    view! {
        <tr>
            <td>
                <div class="font-semibold">{p.name.clone()}</div>
                <div class="text-xs text-base-content/60">{p.description.clone().unwrap_or_default()}</div>
            </td>
            <td>{format!("{:.2}", p.price)}</td>
            <td>{p.num_spaces}</td>
            <td>{format!("{} days", p.duration_days)}</td>
            <td><span class=badge>{label}</span></td>
            <RowActions list=list id=p.id edit={AppRoute::EditPlan(p.id)} />
        </tr>
    }
    .into_any()
}

#[component]
pub fn PlansPage() -> impl IntoView {
    let list = use_paginated::<Plans>();

    view! {
        <PageHeader title="Plans" add={Some((AppRoute::AddPlan, "Add plan"))} />
        <SearchBar list=list placeholder="Search plans" />
        <ResourceTable list=list headers=HEADERS row=plan_row />
    }
}

#[component]
pub fn AddPlanPage() -> impl IntoView {
    let services = use_form_services();
    let form = PlanForm::new();
    let submitting = RwSignal::new(false);
    let error = RwSignal::new(None);

    let on_submit = Callback::new(move |_| match form.to_create() {
        Ok(dto) => services.save::<Plans>(Save::Create(dto), submitting, error, AppRoute::Plans),
        Err(msg) => error.set(Some(msg)),
    });

    view! {
        <FormCard title="Add plan" back=AppRoute::Plans submitting=submitting error=error on_submit=on_submit>
            <PlanFields form=form />
        </FormCard>
    }
}

#[component]
pub fn EditPlanPage(id: i64) -> impl IntoView {
    let services = use_form_services();
    let form = PlanForm::new();
    let loading = RwSignal::new(true);
    let submitting = RwSignal::new(false);
    let error = RwSignal::new(None);

    services.load_item::<Plans>(id, loading, error, move |p| form.fill(&p));

    let on_submit = Callback::new(move |_| match form.to_update() {
        Ok(dto) => services.save::<Plans>(Save::Update(id, dto), submitting, error, AppRoute::Plans),
        Err(msg) => error.set(Some(msg)),
    });

    view! {
        <Show when=move || !loading.get() fallback=|| view! { <Spinner /> }>
            <FormCard title="Edit plan" back=AppRoute::Plans submitting=submitting error=error on_submit=on_submit>
                <PlanFields form=form />
                <CheckboxField label="Active" value=form.active />
            </FormCard>
        </Show>
    }
}

#[component]
fn PlanFields(form: PlanForm) -> impl IntoView {
    view! {
        <TextField id="name" label="Name" value=form.name required=true />
        <TextArea id="description" label="Description" value=form.description />
        <div class="grid grid-cols-3 gap-4">
            <TextField id="price" label="Price" value=form.price input_type="number" required=true />
            <TextField id="num_spaces" label="Spaces" value=form.num_spaces input_type="number" required=true />
            <TextField id="duration_days" label="Duration (days)" value=form.duration_days input_type="number" required=true />
        </div>
    }
}

//! 车辆列表与新增/编辑表单

use crate::auth::use_auth;
use crate::components::form::{
    FormCard, Save, SelectField, TextField, changed, parse_id, required, use_form_services,
};
use crate::components::table::{PageHeader, ResourceTable, RowActions, SearchBar, Spinner};
use crate::hooks::{Paginated, use_paginated};
use gatewise_shared::protocol::{Users, Vehicles};
use gatewise_shared::route::AppRoute;
use gatewise_shared::{Vehicle, VehicleCreate, VehicleUpdate};
use leptos::prelude::*;

/// 车辆表单状态，新增与编辑共用
#[derive(Clone, Copy)]
pub struct VehicleForm {
    pub license_plate: RwSignal<String>,
    pub make: RwSignal<String>,
    pub model: RwSignal<String>,
    pub color: RwSignal<String>,
    pub owner_id: RwSignal<String>,
}

impl VehicleForm {
    pub fn new() -> Self {
        Self {
            license_plate: RwSignal::new(String::new()),
            make: RwSignal::new(String::new()),
            model: RwSignal::new(String::new()),
            color: RwSignal::new(String::new()),
            owner_id: RwSignal::new(String::new()),
        }
    }

    pub fn fill(&self, v: &Vehicle) {
        self.license_plate.set(v.license_plate.clone());
        self.make.set(v.make.clone());
        self.model.set(v.model.clone());
        self.color.set(v.color.clone());
        self.owner_id
            .set(v.owner_id.map(|id| id.to_string()).unwrap_or_default());
    }

    /// 管理员新增时必须指定车主
    pub fn to_create(&self) -> Result<VehicleCreate, String> {
        Ok(VehicleCreate {
            license_plate: required("License plate", &self.license_plate.get_untracked())?,
            make: self.make.get_untracked().trim().to_string(),
            model: self.model.get_untracked().trim().to_string(),
            color: self.color.get_untracked().trim().to_string(),
            owner_id: Some(parse_id("owner", &self.owner_id.get_untracked())?),
        })
    }

    pub fn to_update(&self) -> Result<VehicleUpdate, String> {
        Ok(VehicleUpdate {
            license_plate: Some(required("License plate", &self.license_plate.get_untracked())?),
            make: changed(&self.make.get_untracked()),
            model: changed(&self.model.get_untracked()),
            color: changed(&self.color.get_untracked()),
        })
    }
}

impl Default for VehicleForm {
    fn default() -> Self {
        Self::new()
    }
}

const HEADERS: &[&str] = &["Plate", "Vehicle", "Color", "Owner", ""];

fn vehicle_row(v: Vehicle, list: Paginated<Vehicles>) -> AnyView {
    let is_admin = use_auth().is_admin().get_untracked();
    let owner = v
        .owner
        .as_ref()
        .map(|o| o.full_name.clone())
        .unwrap_or_else(|| "-".to_string());
    view! {
        <tr>
            <td class="font-mono">{v.license_plate.clone()}</td>
            <td>{format!("{} {}", v.make, v.model)}</td>
            <td>{v.color.clone()}</td>
            <td>{owner}</td>
            <RowActions list=list id=v.id edit={AppRoute::EditVehicle(v.id)} deletable=is_admin />
        </tr>
    }
    .into_any()
}

#[component]
pub fn VehiclesPage() -> impl IntoView {
    let list = use_paginated::<Vehicles>();
    let is_admin = use_auth().is_admin().get_untracked();
    let add = is_admin.then_some((AppRoute::AddVehicle, "Add vehicle"));

    view! {
        <PageHeader title="Vehicles" add=add />
        <SearchBar list=list placeholder="Search by plate" />
        <ResourceTable list=list headers=HEADERS row=vehicle_row />
    }
}

#[component]
pub fn AddVehiclePage() -> impl IntoView {
    let services = use_form_services();
    let form = VehicleForm::new();
    let submitting = RwSignal::new(false);
    let error = RwSignal::new(None);
    let owners = services.load_options::<Users>(|u| format!("{} ({})", u.full_name, u.username));

    let on_submit = Callback::new(move |_| match form.to_create() {
        Ok(dto) => services.save::<Vehicles>(Save::Create(dto), submitting, error, AppRoute::Vehicles),
        Err(msg) => error.set(Some(msg)),
    });

    view! {
        <FormCard title="Add vehicle" back=AppRoute::Vehicles submitting=submitting error=error on_submit=on_submit>
            <VehicleFields form=form />
            <SelectField id="owner" label="Owner" value=form.owner_id options=owners placeholder="Select an owner" />
        </FormCard>
    }
}

#[component]
pub fn EditVehiclePage(id: i64) -> impl IntoView {
    let services = use_form_services();
    let form = VehicleForm::new();
    let loading = RwSignal::new(true);
    let submitting = RwSignal::new(false);
    let error = RwSignal::new(None);

    services.load_item::<Vehicles>(id, loading, error, move |v| form.fill(&v));

    let on_submit = Callback::new(move |_| match form.to_update() {
        Ok(dto) => services.save::<Vehicles>(Save::Update(id, dto), submitting, error, AppRoute::Vehicles),
        Err(msg) => error.set(Some(msg)),
    });

    view! {
        <Show when=move || !loading.get() fallback=|| view! { <Spinner /> }>
            <FormCard title="Edit vehicle" back=AppRoute::Vehicles submitting=submitting error=error on_submit=on_submit>
                <VehicleFields form=form />
            </FormCard>
        </Show>
    }
}

#[component]
fn VehicleFields(form: VehicleForm) -> impl IntoView {
    view! {
        <TextField id="license_plate" label="License plate" value=form.license_plate placeholder="AA-00-BB" required=true />
        <div class="grid grid-cols-2 gap-4">
            <TextField id="make" label="Make" value=form.make />
            <TextField id="model" label="Model" value=form.model />
        </div>
        <TextField id="color" label="Color" value=form.color />
    }
}

use crate::components::form::{
    CheckboxField, FormCard, Save, TextArea, TextField, required, use_form_services,
};
use crate::auth::use_auth;
use crate::components::table::{ErrorAlert, PageHeader, ResourceTable, RowActions, SearchBar, Spinner};
use crate::hooks::{Paginated, use_paginated};
use crate::web::router::Link;
use gatewise_shared::parking::{LotOccupancy, SpaceState, lot_rows};
use gatewise_shared::protocol::ParkingSpaces;
use gatewise_shared::route::AppRoute;
use gatewise_shared::{ParkingSpace, ParkingSpaceCreate, ParkingSpaceUpdate};
use leptos::prelude::*;
use leptos::task::spawn_local;

const HEADERS: &[&str] = &["Name", "Description", "Allocated", "Occupied", ""];

#[derive(Clone, Copy)]
pub struct ParkingSpaceForm {
    pub name: RwSignal<String>,
    pub description: RwSignal<String>,
    pub is_allocated: RwSignal<bool>,
    pub is_occupied: RwSignal<bool>,
}

impl ParkingSpaceForm {
    pub fn new() -> Self {
        Self {
            name: RwSignal::new(String::new()),
            description: RwSignal::new(String::new()),
            is_allocated: RwSignal::new(false),
            is_occupied: RwSignal::new(false),
        }
    }

    pub fn fill(&self, s: &ParkingSpace) {
        self.name.set(s.name.clone());
        self.description.set(s.description.clone());
        self.is_allocated.set(s.is_allocated);
        self.is_occupied.set(s.is_occupied);
    }

    pub fn to_create(&self) -> Result<ParkingSpaceCreate, String> {
        Ok(ParkingSpaceCreate {
            name: required("Name", &self.name.get_untracked())?,
            description: self.description.get_untracked().trim().to_string(),
        })
    }

    pub fn to_update(&self) -> Result<ParkingSpaceUpdate, String> {
        let base = self.to_create()?;
        Ok(ParkingSpaceUpdate {
            name: Some(base.name),
            description: Some(base.description),
            is_allocated: Some(self.is_allocated.get_untracked()),
            is_occupied: Some(self.is_occupied.get_untracked()),
        })
    }
}

impl Default for ParkingSpaceForm {
    fn default() -> Self {
        Self::new()
    }
}

fn yes_no(flag: bool) -> AnyView {
    if flag {
        view! { <span class="badge badge-warning">"Yes"</span> }.into_any()
    } else {
        view! { <span class="badge badge-ghost">"No"</span> }.into_any()
    }
}

fn space_row(s: ParkingSpace, list: Paginated<ParkingSpaces>) -> AnyView {
    view! {
        <tr>
            <td class="font-semibold">{s.name.clone()}</td>
            <td>{s.description.clone()}</td>
            <td>{yes_no(s.is_allocated)}</td>
            <td>{yes_no(s.is_occupied)}</td>
            <RowActions list=list id=s.id edit={AppRoute::EditParkingSpace(s.id)} />
        </tr>
    }
    .into_any()
}

#[component]
pub fn ParkingSpacesPage() -> impl IntoView {
    let list = use_paginated::<ParkingSpaces>();

    view! {
        <PageHeader title="Parking Spaces" add={Some((AppRoute::AddParkingSpace, "Add space"))} />
        <SearchBar list=list placeholder="Search spaces" />
        <ResourceTable list=list headers=HEADERS row=space_row />
    }
}

#[component]
pub fn AddParkingSpacePage() -> impl IntoView {
    let services = use_form_services();
    let form = ParkingSpaceForm::new();
    let submitting = RwSignal::new(false);
    let error = RwSignal::new(None);

    let on_submit = Callback::new(move |_| match form.to_create() {
        Ok(dto) => {
            services.save::<ParkingSpaces>(Save::Create(dto), submitting, error, AppRoute::ParkingSpaces)
        }
        Err(msg) => error.set(Some(msg)),
    });

    view! {
        <FormCard title="Add parking space" back=AppRoute::ParkingSpaces submitting=submitting error=error on_submit=on_submit>
            <TextField id="name" label="Name" value=form.name placeholder="P-01" required=true />
            <TextArea id="description" label="Description" value=form.description />
        </FormCard>
    }
}

#[component]
pub fn EditParkingSpacePage(id: i64) -> impl IntoView {
    let services = use_form_services();
    let form = ParkingSpaceForm::new();
    let loading = RwSignal::new(true);
    let submitting = RwSignal::new(false);
    let error = RwSignal::new(None);

    services.load_item::<ParkingSpaces>(id, loading, error, move |s| form.fill(&s));

    let on_submit = Callback::new(move |_| match form.to_update() {
        Ok(dto) => services.save::<ParkingSpaces>(
            Save::Update(id, dto),
            submitting,
            error,
            AppRoute::ParkingSpaces,
        ),
        Err(msg) => error.set(Some(msg)),
    });

    view! {
        <Show when=move || !loading.get() fallback=|| view! { <Spinner /> }>
            <FormCard title="Edit parking space" back=AppRoute::ParkingSpaces submitting=submitting error=error on_submit=on_submit>
                <TextField id="name" label="Name" value=form.name required=true />
                <TextArea id="description" label="Description" value=form.description />
                <CheckboxField label="Allocated" value=form.is_allocated />
                <CheckboxField label="Occupied" value=form.is_occupied />
            </FormCard>
        </Show>
    }
}

// =========================================================
// 布局图
// =========================================================

const LOT_PAGE_SIZE: u32 = 100;
const LOT_MAX_PAGES: u32 = 10;

fn state_class(state: SpaceState) -> &'static str {
    match state {
        SpaceState::Available => "bg-success text-success-content",
        SpaceState::Allocated => "bg-warning text-warning-content",
        SpaceState::Occupied => "bg-error text-error-content",
    }
}

fn space_tile(space: ParkingSpace) -> impl IntoView {
    let state = SpaceState::of(&space);
    view! {
        <Link
            to=AppRoute::EditParkingSpace(space.id)
            class=format!("rounded-box p-3 text-center shadow {}", state_class(state))
        >
            <div class="font-semibold">{space.name.clone()}</div>
            <div class="text-xs">{state.label()}</div>
        </Link>
    }
}

/// 车位占用布局图，每行五个车位
#[component]
pub fn ParkingLotPage() -> impl IntoView {
    let auth = use_auth();
    let spaces = RwSignal::new(Vec::<ParkingSpace>::new());
    let loading = RwSignal::new(true);
    let error = RwSignal::new(Option::<String>::None);

    let service = auth.api().resource::<ParkingSpaces>();
    spawn_local(async move {
        match service.collect(LOT_PAGE_SIZE, LOT_MAX_PAGES, |_| false).await {
            Ok(all) => {
                spaces.try_set(all.items);
            }
            Err(e) => {
                log::warn!("loading parking lot failed: {e}");
                error.try_set(Some(e.user_message("Failed to fetch parking spaces")));
            }
        }
        loading.try_set(false);
    });

    let occupancy = Memo::new(move |_| spaces.with(|all| LotOccupancy::count(all)));

    let legend = SpaceState::ALL
        .into_iter()
        .map(|state| {
            view! {
                <div class="flex items-center gap-2">
                    <span class=format!("w-4 h-4 rounded {}", state_class(state))></span>
                    <span>{state.label()}</span>
                    <span class="badge badge-ghost">{move || occupancy.get().get(state)}</span>
                </div>
            }
        })
        .collect_view();

    view! {
        <PageHeader title="Parking Lot Layout" />
        <ErrorAlert error=error />
        <div class="card bg-base-100 shadow">
            <div class="card-body gap-4">
                <div class="flex flex-wrap gap-6">{legend}</div>
                <Show when=move || !loading.get() fallback=|| view! { <Spinner /> }>
                    <div class="bg-base-200 rounded-box p-4 space-y-3">
                        <div class="bg-neutral text-neutral-content rounded-box text-center font-semibold py-1">
                            "ENTRANCE"
                        </div>
                        {move || {
                            spaces.with(|all| {
                                lot_rows(all)
                                    .into_iter()
                                    .map(|row| view! {
                                        <div class="grid grid-cols-5 gap-3">
                                            {row.into_iter().map(space_tile).collect_view()}
                                        </div>
                                    })
                                    .collect_view()
                            })
                        }}
                        <Show when=move || occupancy.get().total() == 0>
                            <p class="text-center text-base-content/60">"No parking spaces yet"</p>
                        </Show>
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
    fn test_each_state_has_its_own_color() {
        let classes: Vec<_> = SpaceState::ALL.into_iter().map(state_class).collect();
        assert_eq!(classes.len(), 3);
        assert!(classes[0].contains("success"));
        assert!(classes[1].contains("warning"));
        assert!(classes[2].contains("error"));
    }
}

use crate::components::form::{
    FormCard, Save, SelectField, TextField, changed, required, use_form_services,
};
use crate::components::table::{PageHeader, ResourceTable, RowActions, SearchBar, Spinner};
use crate::hooks::{Paginated, use_paginated};
use gatewise_shared::protocol::Users;
use gatewise_shared::route::AppRoute;
use gatewise_shared::{Role, User, UserCreate, UserUpdate};
use leptos::prelude::*;

const HEADERS: &[&str] = &["Username", "Full name", "Email", "Role", ""];

fn role_options() -> Vec<(String, String)> {
    vec![
        (Role::User.as_str().to_string(), "Resident".to_string()),
        (Role::Admin.as_str().to_string(), "Administrator".to_string()),
    ]
}

#[derive(Clone, Copy)]
pub struct UserForm {
    pub username: RwSignal<String>,
    pub full_name: RwSignal<String>,
    pub email: RwSignal<String>,
    pub password: RwSignal<String>,
    pub role: RwSignal<String>,
}

impl UserForm {
    pub fn new() -> Self {
        Self {
            username: RwSignal::new(String::new()),
            full_name: RwSignal::new(String::new()),
            email: RwSignal::new(String::new()),
            password: RwSignal::new(String::new()),
            role: RwSignal::new(Role::User.as_str().to_string()),
        }
    }

    pub fn fill(&self, u: &User) {
        self.username.set(u.username.clone());
        self.full_name.set(u.full_name.clone());
        self.email.set(u.email.clone());
        self.password.set(String::new());
        self.role.set(u.role.as_str().to_string());
    }

    pub fn to_create(&self) -> Result<UserCreate, String> {
        Ok(UserCreate {
            username: required("Username", &self.username.get_untracked())?,
            full_name: required("Full name", &self.full_name.get_untracked())?,
            email: required("Email", &self.email.get_untracked())?,
            password: required("Password", &self.password.get_untracked())?,
            role: Role::parse(&self.role.get_untracked()),
        })
    }

    /// 密码留空表示不修改
    pub fn to_update(&self) -> Result<UserUpdate, String> {
        Ok(UserUpdate {
            username: Some(required("Username", &self.username.get_untracked())?),
            full_name: Some(required("Full name", &self.full_name.get_untracked())?),
            email: Some(required("Email", &self.email.get_untracked())?),
            password: changed(&self.password.get_untracked()),
            role: Some(Role::parse(&self.role.get_untracked())),
        })
    }
}

impl Default for UserForm {
    fn default() -> Self {
        Self::new()
    }
}

fn user_row(u: User, list: Paginated<Users>) -> AnyView {
    let badge = if u.role.is_admin() {
        "badge badge-primary"
    } else {
        "badge badge-ghost"
    };
    view! {
        <tr>
            <td class="font-semibold">{u.username.clone()}</td>
            <td>{u.full_name.clone()}</td>
            <td>{u.email.clone()}</td>
            <td><span class=badge>{u.role.as_str()}</span></td>
            <RowActions list=list id=u.id edit={AppRoute::EditUser(u.id)} />
        </tr>
    }
    .into_any()
}

#[component]
pub fn UsersPage() -> impl IntoView {
    let list = use_paginated::<Users>();

    view! {
        <PageHeader title="Users" add={Some((AppRoute::AddUser, "Add user"))} />
        <SearchBar list=list placeholder="Search by name or email" />
        <ResourceTable list=list headers=HEADERS row=user_row />
    }
}

#[component]
pub fn AddUserPage() -> impl IntoView {
    let services = use_form_services();
    let form = UserForm::new();
    let submitting = RwSignal::new(false);
    let error = RwSignal::new(None);

    let on_submit = Callback::new(move |_| match form.to_create() {
        Ok(dto) => services.save::<Users>(Save::Create(dto), submitting, error, AppRoute::Users),
        Err(msg) => error.set(Some(msg)),
    });

    view! {
        <FormCard title="Add user" back=AppRoute::Users submitting=submitting error=error on_submit=on_submit>
            <UserFields form=form password_label="Password" />
        </FormCard>
    }
}

#[component]
pub fn EditUserPage(id: i64) -> impl IntoView {
    let services = use_form_services();
    let form = UserForm::new();
    let loading = RwSignal::new(true);
    let submitting = RwSignal::new(false);
    let error = RwSignal::new(None);

    services.load_item::<Users>(id, loading, error, move |u| form.fill(&u));

    let on_submit = Callback::new(move |_| match form.to_update() {
        Ok(dto) => services.save::<Users>(Save::Update(id, dto), submitting, error, AppRoute::Users),
        Err(msg) => error.set(Some(msg)),
    });

    view! {
        <Show when=move || !loading.get() fallback=|| view! { <Spinner /> }>
            <FormCard title="Edit user" back=AppRoute::Users submitting=submitting error=error on_submit=on_submit>
                <UserFields form=form password_label="New password (leave blank to keep)" />
            </FormCard>
        </Show>
    }
}

#[component]
fn UserFields(form: UserForm, password_label: &'static str) -> impl IntoView {
    view! {
        <div class="grid grid-cols-2 gap-4">
            <TextField id="username" label="Username" value=form.username required=true />
            <TextField id="full_name" label="Full name" value=form.full_name required=true />
        </div>
        <TextField id="email" label="Email" value=form.email input_type="email" required=true />
        <TextField id="password" label=password_label value=form.password input_type="password" />
        <SelectField id="role" label="Role" value=form.role options={Signal::stored(role_options())} />
    }
}

//! 静态页面：首页、关于、联系、帮助、告警、404

use crate::auth::use_auth;
use crate::components::notification::use_notifier;
use crate::components::table::{ErrorAlert, PageHeader};
use crate::web::router::Link;
use gatewise_shared::route::AppRoute;
use leptos::prelude::*;

const FEATURES: &[(&str, &str)] = &[
    (
        "Automated License Plate Recognition",
        "Seamless vehicle entry and exit without tickets or RFID devices.",
    ),
    (
        "Fraud Detection",
        "Unrecognised plates and expired subscriptions are blocked at the gate.",
    ),
    (
        "Real-time Monitoring",
        "Follow vehicle movements and camera status as they happen.",
    ),
    (
        "Smart Alerts",
        "Notifications for security incidents, occupancy levels and system events.",
    ),
];

const FAQS: &[(&str, &str)] = &[
    (
        "How do I add a new vehicle?",
        "Ask an administrator to register it from the Vehicles page. You can edit your own vehicles afterwards.",
    ),
    (
        "How can I manage my subscriptions?",
        "The Subscriptions page lists your active and expired subscriptions.",
    ),
    (
        "Where can I see when my car entered?",
        "My Access History lists every gate decision recorded for your vehicles.",
    ),
    (
        "How do I log out?",
        "Use the Log out button in the top bar. Your session also expires after one day.",
    ),
    (
        "How do I contact support?",
        "Use the Contact page from the sidebar to send a message to the parking office.",
    ),
];

/// 公共页面的顶栏
#[component]
fn PublicNav() -> impl IntoView {
    let session = use_auth().session;
    view! {
        <div class="navbar bg-base-100 shadow-sm px-6">
            <div class="flex-1">
                <Link to=AppRoute::Landing class="text-xl font-bold text-primary">"GateWise"</Link>
            </div>
            <div class="flex-none gap-2">
                <Link to=AppRoute::About class="btn btn-ghost btn-sm">"About"</Link>
                <Link to=AppRoute::Contact class="btn btn-ghost btn-sm">"Contact"</Link>
                {move || if session.with(|s| s.is_authenticated()) {
                    view! { <Link to=AppRoute::Dashboard class="btn btn-primary btn-sm">"Dashboard"</Link> }.into_any()
                } else {
                    view! { <Link to=AppRoute::Login class="btn btn-primary btn-sm">"Sign in"</Link> }.into_any()
                }}
            </div>
        </div>
    }
}

#[component]
pub fn LandingPage() -> impl IntoView {
    view! {
        <div class="min-h-screen bg-base-200">
            <PublicNav />
            <div class="hero py-20">
                <div class="hero-content text-center">
                    <div class="max-w-2xl">
                        <h1 class="text-5xl font-bold">"Smart parking access"</h1>
                        <p class="py-6 text-lg">
                            "GateWise recognises your plate at the gate, checks your subscription and lets you in."
                        </p>
                        <Link to=AppRoute::Login class="btn btn-primary">"Get started"</Link>
                    </div>
                </div>
            </div>
            <div class="grid md:grid-cols-2 lg:grid-cols-4 gap-6 px-8 pb-16">
                {FEATURES
                    .iter()
                    .map(|(title, text)| view! {
                        <div class="card bg-base-100 shadow">
                            <div class="card-body">
                                <h3 class="card-title text-base">{*title}</h3>
                                <p class="text-sm text-base-content/70">{*text}</p>
                            </div>
                        </div>
                    })
                    .collect_view()}
            </div>
        </div>
    }
}

#[component]
pub fn AboutPage() -> impl IntoView {
    view! {
        <div class="min-h-screen bg-base-200">
            <PublicNav />
            <div class="max-w-3xl mx-auto card bg-base-100 shadow mt-10">
                <div class="card-body space-y-3">
                    <h1 class="text-3xl font-bold">"About GateWise"</h1>
                    <p>"GateWise manages residential and commercial parking with automatic plate recognition."</p>
                    <p>"Residents register their vehicles once, subscribe to a plan and drive in."</p>
                    <p>"Administrators manage plans, parking spaces, payments and follow every gate decision."</p>
                </div>
            </div>
        </div>
    }
}

/// 联系表单，只做本地校验
#[component]
fn ContactForm() -> impl IntoView {
    let notifier = use_notifier();
    let name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let subject = RwSignal::new(String::new());
    let message = RwSignal::new(String::new());
    let error = RwSignal::new(Option::<String>::None);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let fields = [name, email, subject, message];
        if fields.iter().any(|f| f.with_untracked(|v| v.trim().is_empty())) {
            error.set(Some("All fields are required.".to_string()));
            return;
        }
        error.set(None);
        log::info!("contact message from {}", email.get_untracked());
        notifier.success("Thank you, we will get back to you soon");
        for f in fields {
            f.set(String::new());
        }
    };

    let input = move |label: &'static str, value: RwSignal<String>| {
        view! {
            <label class="form-control">
                <span class="label-text mb-1">{label}</span>
                <input
                    class="input input-bordered"
                    prop:value=move || value.get()
                    on:input=move |ev| value.set(event_target_value(&ev))
                />
            </label>
        }
    };

    view! {
        <form class="space-y-3" on:submit=on_submit>
            <ErrorAlert error=error />
            {input("Name", name)}
            {input("Email", email)}
            {input("Subject", subject)}
            <label class="form-control">
                <span class="label-text mb-1">"Message"</span>
                <textarea
                    class="textarea textarea-bordered h-32"
                    prop:value=move || message.get()
                    on:input=move |ev| message.set(event_target_value(&ev))
                ></textarea>
            </label>
            <button type="submit" class="btn btn-primary">"Send"</button>
        </form>
    }
}

#[component]
pub fn ContactPage() -> impl IntoView {
    view! {
        <div class="min-h-screen bg-base-200">
            <PublicNav />
            <div class="max-w-xl mx-auto card bg-base-100 shadow mt-10">
                <div class="card-body">
                    <h1 class="text-3xl font-bold mb-2">"Contact Us"</h1>
                    <ContactForm />
                </div>
            </div>
        </div>
    }
}

/// 登录后的联系页（`/contact-internal` 与 `/dashboard-contact`）
#[component]
pub fn ContactInternalPage() -> impl IntoView {
    view! {
        <PageHeader title="Contact Us" />
        <div class="card bg-base-100 shadow max-w-xl">
            <div class="card-body">
                <ContactForm />
            </div>
        </div>
    }
}

#[component]
pub fn HelpPage() -> impl IntoView {
    view! {
        <PageHeader title="Help" />
        <div class="max-w-3xl space-y-2">
            {FAQS
                .iter()
                .map(|(q, a)| view! {
                    <div class="collapse collapse-arrow bg-base-100 shadow">
                        <input type="checkbox" />
                        <div class="collapse-title font-semibold">{*q}</div>
                        <div class="collapse-content"><p>{*a}</p></div>
                    </div>
                })
                .collect_view()}
        </div>
    }
}

#[component]
pub fn AlertsPage() -> impl IntoView {
    view! {
        <PageHeader title="Alerts" />
        <div class="alert">
            <span>"No alerts at the moment."</span>
        </div>
    }
}

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <div class="text-center">
                <h1 class="text-6xl font-bold text-error">"404"</h1>
                <p class="text-xl mt-4">"Page not found"</p>
                <Link to=AppRoute::Landing class="btn btn-primary mt-6">"Back to home"</Link>
            </div>
        </div>
    }
}

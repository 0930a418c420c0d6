//! Toaster Component
//!
//! Stack of transient notifications; click a toast to dismiss it early.

use leptos::prelude::*;

use crate::context::use_dashboard;
use crate::notify::NotificationKind;

#[component]
pub fn Toaster() -> impl IntoView {
    let notifier = use_dashboard().notifier;

    view! {
        <div class="toaster" aria-live="polite">
            <For
                each=move || notifier.toasts().get()
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    let class = match toast.notification.kind {
                        NotificationKind::Success => "toast toast--success",
                        NotificationKind::Error => "toast toast--error",
                    };
                    view! {
                        <div class=class on:click=move |_| notifier.dismiss(id)>
                            {toast.notification.message}
                        </div>
                    }
                }
            />
        </div>
    }
}

//! Delete Confirm Button Component
//!
//! Inline delete confirmation with confirm/cancel actions.

use leptos::prelude::*;

use crate::context::use_dashboard;
use crate::models::Item;
use crate::store::{use_dashboard_store, DashboardStateStoreFields};

/// Inline delete confirmation button
///
/// Shows a Delete button initially. Clicking it marks the item as pending in
/// the controller; only the ✓ action issues the request.
#[component]
pub fn DeleteConfirmButton(item: Item) -> impl IntoView {
    let ctx = use_dashboard();
    let store = use_dashboard_store();

    let id = item.id.clone();
    let confirming = Memo::new(move |_| store.pending_delete().get().is_some_and(|p| p.id == id));
    let busy = move || store.busy().get();
    let prompt = format!("Delete \"{}\"?", item.title);

    let on_request = {
        let ctx = ctx.clone();
        move |ev: web_sys::MouseEvent| {
            ev.stop_propagation();
            ctx.controller().request_delete(item.clone());
        }
    };
    let on_confirm = {
        let ctx = ctx.clone();
        move |ev: web_sys::MouseEvent| {
            ev.stop_propagation();
            ctx.run(|c| async move {
                c.confirm_delete().await;
            });
        }
    };
    let on_cancel = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        ctx.controller().cancel_delete();
    };

    view! {
        <Show when=move || !confirming.get()>
            <button
                type="button"
                class="danger"
                disabled=busy
                on:click=on_request.clone()
            >
                "Delete"
            </button>
        </Show>
        <Show when=move || confirming.get()>
            <span class="delete-confirm">
                <span class="delete-confirm-text">{prompt.clone()}</span>
                <button
                    type="button"
                    class="confirm-btn"
                    disabled=busy
                    on:click=on_confirm.clone()
                >
                    "✓"
                </button>
                <button
                    type="button"
                    class="cancel-btn"
                    disabled=busy
                    on:click=on_cancel.clone()
                >
                    "✗"
                </button>
            </span>
        </Show>
    }
}

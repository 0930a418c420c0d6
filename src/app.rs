//! Inventory Dashboard App
//!
//! Wires the HTTP client, toasts and display store into the list controller,
//! then lays out toolbar, table, pagination and the item modal.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::api::ItemClient;
use crate::components::{ItemFormModal, ItemTable, Pagination, SearchBar, Toaster};
use crate::config::{ApiConfig, TOAST_DURATION_MS};
use crate::context::DashboardContext;
use crate::controller::ListController;
use crate::notify::ToastNotifier;
use crate::store::{store_apply_snapshot, DashboardState};

#[component]
pub fn App() -> impl IntoView {
    let store = Store::new(DashboardState::default());
    provide_context(store);

    let origin = window().location().origin().unwrap_or_default();
    let config = ApiConfig::from_build_env(&origin);
    log::info!("[APP] Using API at {}", config.base_url);

    let notifier = ToastNotifier::new(TOAST_DURATION_MS);
    let controller = ListController::new(ItemClient::new(&config), notifier)
        .with_listener(move |snapshot| store_apply_snapshot(&store, snapshot));
    let ctx = DashboardContext::new(controller, notifier);
    provide_context(ctx.clone());

    // Initial load; later fetches are triggered by filter changes and mutations
    ctx.run(|c| async move { c.refresh().await });

    view! {
        <Toaster />
        <main class="page">
            <header class="page__header">
                <div>
                    <h1>"Inventory"</h1>
                    <p>"Track inventory items with live search, pagination, and quick edits."</p>
                </div>
            </header>
            <SearchBar />
            <ItemTable />
            <Pagination />
        </main>
        <ItemFormModal />
    }
}
